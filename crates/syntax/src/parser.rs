//! Recursive-descent parser over the semicolon-inserting token stream.
//!
//! The parser stops at the first syntax error. Composite literals inside
//! `if`/`for`/`switch` headers follow the usual Go rule: a bare type name
//! followed by `{` opens the statement body unless it sits inside parentheses,
//! brackets or another literal.

use crate::ast::*;
use crate::error::{Diag, ParseError};
use crate::lexer::{Lexer, RawComment, Tok};

type PResult<T> = Result<T, Diag>;

/// Arena, interner and root of a parsed file.
#[derive(Debug)]
pub struct ParsedFile {
    pub arena: AstArena,
    pub interner: Interner,
    pub file: SourceFile,
}

/// Parses one Go source file. Comments are attached only when `with_comments`.
pub fn parse_source(filename: &str, src: &str, with_comments: bool) -> Result<ParsedFile, ParseError> {
    let mut lexer = Lexer::new(src);
    let toks: Vec<_> = lexer.by_ref().collect();
    let diags = lexer.take_diags();
    if !diags.is_empty() {
        return Err(ParseError::new(filename, diags));
    }
    let comments = if with_comments {
        lexer.take_comments()
    } else {
        Vec::new()
    };

    let mut parser = Parser::new(src, toks);
    let file = parser
        .parse_file(&comments)
        .map_err(|diag| ParseError::new(filename, vec![diag]))?;

    log::trace!(
        "parsed {filename}: {} exprs, {} stmts, {} comment groups",
        parser.arena.exprs.len(),
        parser.arena.stmts.len(),
        parser.arena.comment_groups.len()
    );

    Ok(ParsedFile {
        arena: parser.arena,
        interner: parser.interner,
        file,
    })
}

/// Position to rewind to when a speculative parse fails.
#[derive(Clone, Copy)]
struct Checkpoint {
    pos: usize,
    prev_end: usize,
    expr_lev: i32,
}

/// Header of a `for` statement before the body.
enum Header {
    Simple(SimpleStmtId),
    Range {
        lhs: Option<RangeLhs>,
        range_pos: Span,
        expr: ExprId,
    },
}

/// One comma-separated entry of a parameter list before grouping.
struct ParamEntry {
    name: Option<IdentName>,
    ellipsis_pos: Option<Span>,
    typ: Option<TypeId>,
    span: Span,
}

struct Parser<'src> {
    src: &'src str,
    toks: Vec<(usize, Tok<'src>, usize)>,
    pos: usize,
    prev_end: usize,
    /// < 0 in control clause headers, > 0 inside parens, brackets and literals
    expr_lev: i32,
    arena: AstArena,
    interner: Interner,
}

impl<'src> Parser<'src> {
    fn new(src: &'src str, toks: Vec<(usize, Tok<'src>, usize)>) -> Self {
        let mut interner = Interner::new();
        interner.reserve(toks.len() / 4);
        Self {
            src,
            toks,
            pos: 0,
            prev_end: 0,
            expr_lev: 0,
            arena: AstArena::new(),
            interner,
        }
    }

    // -------------------------------------------------------------------------
    // Token cursor
    // -------------------------------------------------------------------------

    #[inline]
    fn peek(&self) -> &Tok<'src> {
        self.peek_at(0)
    }

    #[inline]
    fn peek_at(&self, n: usize) -> &Tok<'src> {
        match self.toks.get(self.pos + n) {
            Some((_, tok, _)) => tok,
            None => &Tok::Error,
        }
    }

    #[inline]
    fn at(&self, tok: Tok<'static>) -> bool {
        !self.at_eof() && *self.peek() == tok
    }

    #[inline]
    fn at_eof(&self) -> bool {
        self.pos >= self.toks.len()
    }

    #[inline]
    fn at_ident(&self) -> bool {
        matches!(self.peek(), Tok::Ident(_))
    }

    /// Start offset of the current token.
    #[inline]
    fn start(&self) -> usize {
        self.toks.get(self.pos).map_or(self.src.len(), |t| t.0)
    }

    #[inline]
    fn cur_span(&self) -> Span {
        match self.toks.get(self.pos) {
            Some((s, _, e)) => Span::new(*s, *e),
            None => Span::empty_at(self.src.len()),
        }
    }

    fn bump(&mut self) -> Span {
        let span = self.cur_span();
        if self.pos < self.toks.len() {
            self.prev_end = span.end as usize;
            self.pos += 1;
        }
        span
    }

    fn eat(&mut self, tok: Tok<'static>) -> Option<Span> {
        if self.at(tok) {
            Some(self.bump())
        } else {
            None
        }
    }

    fn expect(&mut self, tok: Tok<'static>, what: &str) -> PResult<Span> {
        if self.at(tok) {
            Ok(self.bump())
        } else {
            Err(self.unexpected(what))
        }
    }

    /// A `;` may be omitted before a closing `)` or `}`.
    fn expect_semi(&mut self) -> PResult<()> {
        if self.eat(Tok::Semi).is_some() || self.at(Tok::RParen) || self.at(Tok::RBrace) || self.at_eof() {
            Ok(())
        } else {
            Err(self.unexpected("';' or newline"))
        }
    }

    #[inline]
    fn finish(&self, start: usize) -> Span {
        Span::new(start, self.prev_end.max(start))
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.pos,
            prev_end: self.prev_end,
            expr_lev: self.expr_lev,
        }
    }

    fn rewind(&mut self, cp: Checkpoint) {
        self.pos = cp.pos;
        self.prev_end = cp.prev_end;
        self.expr_lev = cp.expr_lev;
    }

    fn describe(&self) -> String {
        match self.toks.get(self.pos) {
            None => "EOF".to_string(),
            Some((s, Tok::Semi, e)) if s == e => "newline".to_string(),
            Some((s, _, e)) => format!("'{}'", self.src.get(*s..*e).unwrap_or_default()),
        }
    }

    fn unexpected(&self, expected: &str) -> Diag {
        Diag::parse(self.cur_span(), format!("expected {expected}, found {}", self.describe()))
    }

    // -------------------------------------------------------------------------
    // Leaves
    // -------------------------------------------------------------------------

    fn ident(&mut self) -> PResult<IdentName> {
        let Tok::Ident(name) = self.peek() else {
            return Err(self.unexpected("identifier"));
        };
        let name: &'src str = *name;
        let pos = self.bump();
        let sym = self.interner.intern(name);
        Ok(IdentName { sym, pos })
    }

    fn ident_list(&mut self) -> PResult<Vec<IdentName>> {
        let mut names = vec![self.ident()?];
        while self.eat(Tok::Comma).is_some() {
            names.push(self.ident()?);
        }
        Ok(names)
    }

    fn string_lit(&mut self, what: &str) -> PResult<StringLit> {
        match self.peek() {
            Tok::StringLit(_) | Tok::RawStringLit(_) => Ok(StringLit { raw: self.bump() }),
            _ => Err(self.unexpected(what)),
        }
    }

    fn alloc_expr(&mut self, expr: Expr, start: usize) -> ExprId {
        let span = self.finish(start);
        self.arena.exprs.alloc(expr, span)
    }

    fn alloc_type(&mut self, typ: Type, start: usize) -> TypeId {
        let span = self.finish(start);
        self.arena.types.alloc(typ, span)
    }

    fn alloc_stmt(&mut self, stmt: Stmt, start: usize) -> StmtId {
        let span = self.finish(start);
        self.arena.stmts.alloc(stmt, span)
    }

    fn alloc_simple(&mut self, stmt: SimpleStmt, start: usize) -> SimpleStmtId {
        let span = self.finish(start);
        self.arena.simple_stmts.alloc(stmt, span)
    }

    fn named_type(&mut self, name: IdentName) -> TypeId {
        self.arena.types.alloc(
            Type::Named {
                pkg: None,
                name,
                args: ListRef::EMPTY,
            },
            name.pos,
        )
    }

    // -------------------------------------------------------------------------
    // File and declarations
    // -------------------------------------------------------------------------

    fn parse_file(&mut self, comments: &[RawComment]) -> PResult<SourceFile> {
        let package_pos = self.expect(Tok::KwPackage, "'package'")?;
        let name = self.ident()?;
        self.expect_semi()?;

        let mut decls = Vec::new();
        while self.at(Tok::KwImport) {
            decls.push(TopLevelDecl::Decl(self.gen_decl(GenDeclKind::Import)?));
            self.expect_semi()?;
        }

        while !self.at_eof() {
            let decl = match self.peek() {
                Tok::KwFunc => TopLevelDecl::Func(self.func_decl()?),
                Tok::KwConst => TopLevelDecl::Decl(self.gen_decl(GenDeclKind::Const)?),
                Tok::KwType => TopLevelDecl::Decl(self.gen_decl(GenDeclKind::Type)?),
                Tok::KwVar => TopLevelDecl::Decl(self.gen_decl(GenDeclKind::Var)?),
                Tok::KwImport => {
                    return Err(Diag::parse(
                        self.cur_span(),
                        "imports must appear before other declarations",
                    ))
                }
                _ => return Err(self.unexpected("declaration")),
            };
            decls.push(decl);
            if self.eat(Tok::Semi).is_none() && !self.at_eof() {
                return Err(self.unexpected("';' after top level declaration"));
            }
        }

        let comment_groups = self.comment_groups(comments);
        let doc = self.doc_for(&comment_groups, package_pos.start);
        for decl in &decls {
            match *decl {
                TopLevelDecl::Decl(id) => {
                    let start = self.arena.decls.span(id).start;
                    self.arena.decls[id].doc = self.doc_for(&comment_groups, start);
                }
                TopLevelDecl::Func(id) => {
                    let start = self.arena.funcs.span(id).start;
                    self.arena.funcs[id].doc = self.doc_for(&comment_groups, start);
                }
            }
        }

        Ok(SourceFile {
            package_pos,
            name,
            decls: self.arena.list_top_decls(decls),
            comments: self.arena.list_comment_group_ids(comment_groups),
            doc,
        })
    }

    fn gen_decl(&mut self, kind: GenDeclKind) -> PResult<DeclId> {
        let kw_pos = self.bump();
        let mut specs = Vec::new();
        let (l_paren, r_paren) = if let Some(l_paren) = self.eat(Tok::LParen) {
            while !self.at(Tok::RParen) && !self.at_eof() {
                specs.push(self.spec(kind)?);
                self.expect_semi()?;
            }
            let r_paren = self.expect(Tok::RParen, "')'")?;
            (Some(l_paren), Some(r_paren))
        } else {
            specs.push(self.spec(kind)?);
            (None, None)
        };

        let decl = GenDecl {
            doc: None,
            kw_pos,
            kind,
            l_paren,
            specs: self.arena.list_specs(specs),
            r_paren,
        };
        let span = self.finish(kw_pos.start as usize);
        Ok(self.arena.decls.alloc(decl, span))
    }

    fn spec(&mut self, kind: GenDeclKind) -> PResult<Spec> {
        match kind {
            GenDeclKind::Import => self.import_spec().map(Spec::Import),
            GenDeclKind::Type => self.type_spec().map(Spec::Type),
            GenDeclKind::Const => self.value_spec(true).map(Spec::Value),
            GenDeclKind::Var => self.value_spec(false).map(Spec::Value),
        }
    }

    fn import_spec(&mut self) -> PResult<ImportSpec> {
        let name = match self.peek() {
            Tok::Dot => Some(ImportName::Dot(self.bump())),
            Tok::Ident("_") => Some(ImportName::Blank(self.bump())),
            Tok::Ident(_) => Some(ImportName::Name(self.ident()?)),
            _ => None,
        };
        let path = self.string_lit("import path")?;
        Ok(ImportSpec { name, path })
    }

    fn value_spec(&mut self, is_const: bool) -> PResult<ValueSpec> {
        let names = self.ident_list()?;
        let at_end = |p: &Self| p.at(Tok::Semi) || p.at(Tok::RParen) || p.at_eof();

        let typ = if !self.at(Tok::Assign) && !at_end(self) {
            Some(self.parse_type()?)
        } else {
            None
        };
        let values = if self.eat(Tok::Assign).is_some() {
            self.expr_list()?
        } else {
            Vec::new()
        };
        if !is_const && typ.is_none() && values.is_empty() {
            return Err(self.unexpected("type or initialization"));
        }

        Ok(ValueSpec {
            names: self.arena.list_ident_names(names),
            typ,
            values: self.arena.list_exprs(values),
        })
    }

    fn type_spec(&mut self) -> PResult<TypeSpec> {
        let name = self.ident()?;
        let type_params = if self.at(Tok::LBrack) && self.looks_like_type_params() {
            Some(self.type_params()?)
        } else {
            None
        };
        let assign_pos = self.eat(Tok::Assign);
        let typ = self.parse_type()?;
        Ok(TypeSpec {
            name,
            type_params,
            assign_pos,
            typ,
        })
    }

    /// `type T[P C]` versus `type T [N]E`.
    fn looks_like_type_params(&self) -> bool {
        matches!(self.peek_at(1), Tok::Ident(_))
            && matches!(
                self.peek_at(2),
                Tok::Ident(_)
                    | Tok::Comma
                    | Tok::Star
                    | Tok::LBrack
                    | Tok::Tilde
                    | Tok::KwInterface
                    | Tok::KwFunc
                    | Tok::KwChan
                    | Tok::KwMap
                    | Tok::KwStruct
                    | Tok::Arrow
            )
    }

    fn type_params(&mut self) -> PResult<TypeParamsId> {
        let start = self.start();
        let l_brack = self.expect(Tok::LBrack, "'['")?;
        let mut decls = Vec::new();
        while !self.at(Tok::RBrack) {
            let decl_start = self.start();
            let names = self.ident_list()?;
            let constraint = self.type_elem()?;
            let decl = TypeParamDecl {
                names: self.arena.list_ident_names(names),
                constraint,
            };
            let span = self.finish(decl_start);
            decls.push(self.arena.type_param_decls.alloc(decl, span));
            if self.eat(Tok::Comma).is_none() {
                break;
            }
        }
        if decls.is_empty() {
            return Err(Diag::parse(self.cur_span(), "empty type parameter list"));
        }
        let r_brack = self.expect(Tok::RBrack, "']'")?;

        let params = TypeParams {
            l_brack,
            params: self.arena.list_type_param_decl_ids(decls),
            r_brack,
        };
        let span = self.finish(start);
        Ok(self.arena.type_params.alloc(params, span))
    }

    fn type_elem(&mut self) -> PResult<TypeElem> {
        let mut terms = vec![self.type_term()?];
        while self.eat(Tok::Pipe).is_some() {
            terms.push(self.type_term()?);
        }
        Ok(TypeElem {
            terms: self.arena.list_type_terms(terms),
        })
    }

    fn type_term(&mut self) -> PResult<TypeTerm> {
        let tilde_pos = self.eat(Tok::Tilde);
        let typ = self.parse_type()?;
        Ok(TypeTerm { tilde_pos, typ })
    }

    fn func_decl(&mut self) -> PResult<FuncDeclId> {
        let func_pos = self.bump();
        let recv = if self.at(Tok::LParen) {
            Some(self.receiver()?)
        } else {
            None
        };
        let name = self.ident()?;
        let type_params = if self.at(Tok::LBrack) {
            Some(self.type_params()?)
        } else {
            None
        };
        let signature = self.signature()?;
        let body = if self.at(Tok::LBrace) {
            Some(self.func_body()?)
        } else {
            None
        };

        let decl = FuncDecl {
            doc: None,
            func_pos,
            recv,
            name,
            type_params,
            signature,
            body,
        };
        let span = self.finish(func_pos.start as usize);
        Ok(self.arena.funcs.alloc(decl, span))
    }

    fn receiver(&mut self) -> PResult<Receiver> {
        let l_paren = self.bump();
        let name = if self.at_ident() && matches!(self.peek_at(1), Tok::Ident(_) | Tok::Star) {
            Some(self.ident()?)
        } else {
            None
        };

        let star = self.eat(Tok::Star);
        let base = self.ident()?;
        let type_params = if let Some(l_brack) = self.eat(Tok::LBrack) {
            let mut names = vec![self.ident()?];
            while self.eat(Tok::Comma).is_some() && !self.at(Tok::RBrack) {
                names.push(self.ident()?);
            }
            let r_brack = self.expect(Tok::RBrack, "']'")?;
            Some(ReceiverTypeParams {
                l_brack,
                names: self.arena.list_ident_names(names),
                r_brack,
            })
        } else {
            None
        };

        let named = self.named_type(base);
        let typ = match star {
            Some(star_pos) => self.arena.types.alloc(
                Type::Pointer {
                    star_pos,
                    elem: named,
                },
                star_pos.to(base.pos),
            ),
            None => named,
        };
        self.eat(Tok::Comma);
        let r_paren = self.expect(Tok::RParen, "')'")?;

        Ok(Receiver {
            l_paren,
            name,
            typ,
            type_params,
            r_paren,
        })
    }

    fn func_body(&mut self) -> PResult<Block> {
        let saved = self.expr_lev;
        self.expr_lev = 0;
        let body = self.block();
        self.expr_lev = saved;
        body
    }

    // -------------------------------------------------------------------------
    // Signatures
    // -------------------------------------------------------------------------

    fn signature(&mut self) -> PResult<SignatureId> {
        let start = self.start();
        let params = self.parameters()?;
        let results = if self.at(Tok::LParen) {
            Some(Results::Params(self.parameters()?))
        } else if self.at_type_start() {
            Some(Results::Type(self.parse_type()?))
        } else {
            None
        };
        let span = self.finish(start);
        Ok(self.arena.signatures.alloc(Signature { params, results }, span))
    }

    fn at_type_start(&self) -> bool {
        !self.at_eof()
            && matches!(
                self.peek(),
                Tok::Ident(_)
                    | Tok::LBrack
                    | Tok::Star
                    | Tok::KwStruct
                    | Tok::KwInterface
                    | Tok::KwFunc
                    | Tok::KwMap
                    | Tok::KwChan
                    | Tok::Arrow
                    | Tok::LParen
            )
    }

    fn parameters(&mut self) -> PResult<FieldList> {
        let l_paren = self.expect(Tok::LParen, "'('")?;
        let mut entries = Vec::new();
        while !self.at(Tok::RParen) {
            entries.push(self.param_entry()?);
            if self.eat(Tok::Comma).is_none() {
                break;
            }
        }
        let r_paren = self.expect(Tok::RParen, "')'")?;
        let fields = self.group_params(entries)?;
        Ok(FieldList {
            l_paren,
            fields: self.arena.list_fields(fields),
            r_paren,
        })
    }

    fn param_entry(&mut self) -> PResult<ParamEntry> {
        let start = self.start();
        if self.at_ident() {
            let cp = self.checkpoint();
            let name = self.ident()?;
            match self.peek() {
                Tok::Comma | Tok::RParen => {
                    return Ok(ParamEntry {
                        name: Some(name),
                        ellipsis_pos: None,
                        typ: None,
                        span: name.pos,
                    })
                }
                Tok::Dot => self.rewind(cp),
                _ => {
                    let ellipsis_pos = self.eat(Tok::Ellipsis);
                    match self.parse_type() {
                        Ok(typ) if self.at(Tok::Comma) || self.at(Tok::RParen) => {
                            return Ok(ParamEntry {
                                name: Some(name),
                                ellipsis_pos,
                                typ: Some(typ),
                                span: self.finish(start),
                            })
                        }
                        _ => self.rewind(cp),
                    }
                }
            }
        }

        let ellipsis_pos = self.eat(Tok::Ellipsis);
        let typ = self.parse_type()?;
        Ok(ParamEntry {
            name: None,
            ellipsis_pos,
            typ: Some(typ),
            span: self.finish(start),
        })
    }

    /// Either every entry is a type, or names distribute over the next type:
    /// `(a, b int, s ...string)`.
    fn group_params(&mut self, entries: Vec<ParamEntry>) -> PResult<Vec<FieldId>> {
        let named = entries.iter().any(|e| e.name.is_some() && e.typ.is_some());
        let mut out = Vec::with_capacity(entries.len());

        if !named {
            for entry in entries {
                let typ = match (entry.typ, entry.name) {
                    (Some(typ), _) => typ,
                    (None, Some(name)) => self.named_type(name),
                    (None, None) => return Err(Diag::parse(entry.span, "expected parameter type")),
                };
                let field = Field {
                    names: ListRef::EMPTY,
                    ellipsis_pos: entry.ellipsis_pos,
                    typ,
                    tag: None,
                };
                out.push(self.arena.fields.alloc(field, entry.span));
            }
            return Ok(out);
        }

        let mut pending: Vec<IdentName> = Vec::new();
        let mut pending_start = None;
        for entry in entries {
            match (entry.name, entry.typ) {
                (Some(name), None) => {
                    pending_start.get_or_insert(entry.span.start);
                    pending.push(name);
                }
                (Some(name), Some(typ)) => {
                    pending.push(name);
                    let start = pending_start.take().unwrap_or(entry.span.start);
                    let field = Field {
                        names: self.arena.list_ident_names(pending.drain(..)),
                        ellipsis_pos: entry.ellipsis_pos,
                        typ,
                        tag: None,
                    };
                    let span = Span {
                        start,
                        end: entry.span.end,
                    };
                    out.push(self.arena.fields.alloc(field, span));
                }
                (None, _) => {
                    return Err(Diag::parse(entry.span, "mixed named and unnamed parameters"));
                }
            }
        }
        if let Some(name) = pending.last() {
            return Err(Diag::parse(name.pos, "mixed named and unnamed parameters"));
        }
        Ok(out)
    }

    // -------------------------------------------------------------------------
    // Types
    // -------------------------------------------------------------------------

    fn parse_type(&mut self) -> PResult<TypeId> {
        let start = self.start();
        let typ = match self.peek() {
            Tok::Ident(_) => return self.type_name(),
            Tok::LBrack => return self.array_or_slice_type(),
            Tok::KwStruct => return self.struct_type(),
            Tok::KwInterface => return self.interface_type(),
            Tok::Star => {
                let star_pos = self.bump();
                let elem = self.parse_type()?;
                Type::Pointer { star_pos, elem }
            }
            Tok::KwMap => {
                let map_pos = self.bump();
                self.expect(Tok::LBrack, "'['")?;
                let key = self.parse_type()?;
                self.expect(Tok::RBrack, "']'")?;
                let val = self.parse_type()?;
                Type::Map { map_pos, key, val }
            }
            Tok::KwChan => {
                let chan_pos = self.bump();
                let dir = if self.eat(Tok::Arrow).is_some() {
                    ChanDir::Send
                } else {
                    ChanDir::Both
                };
                let elem = self.parse_type()?;
                Type::Chan { chan_pos, dir, elem }
            }
            Tok::Arrow => {
                let chan_pos = self.bump();
                self.expect(Tok::KwChan, "'chan'")?;
                let elem = self.parse_type()?;
                Type::Chan {
                    chan_pos,
                    dir: ChanDir::Recv,
                    elem,
                }
            }
            Tok::KwFunc => {
                let func_pos = self.bump();
                let sig = self.signature()?;
                Type::Func { func_pos, sig }
            }
            Tok::LParen => {
                let l_paren = self.bump();
                let typ = self.parse_type()?;
                let r_paren = self.expect(Tok::RParen, "')'")?;
                Type::Paren { l_paren, typ, r_paren }
            }
            _ => return Err(self.unexpected("type")),
        };
        Ok(self.alloc_type(typ, start))
    }

    fn type_name(&mut self) -> PResult<TypeId> {
        let start = self.start();
        let first = self.ident()?;
        let (pkg, name) = if self.eat(Tok::Dot).is_some() {
            (Some(first), self.ident()?)
        } else {
            (None, first)
        };
        let args = if self.at(Tok::LBrack) {
            self.type_args()?
        } else {
            ListRef::EMPTY
        };
        Ok(self.alloc_type(Type::Named { pkg, name, args }, start))
    }

    fn type_args(&mut self) -> PResult<ListRef<TypeId>> {
        self.expect(Tok::LBrack, "'['")?;
        let mut args = vec![self.parse_type()?];
        while self.eat(Tok::Comma).is_some() && !self.at(Tok::RBrack) {
            args.push(self.parse_type()?);
        }
        self.expect(Tok::RBrack, "']'")?;
        Ok(self.arena.list_types(args))
    }

    fn array_or_slice_type(&mut self) -> PResult<TypeId> {
        let start = self.start();
        let l_brack = self.bump();
        if self.eat(Tok::RBrack).is_some() {
            let elem = self.parse_type()?;
            return Ok(self.alloc_type(Type::Slice { l_brack, elem }, start));
        }

        let len = if self.at(Tok::Ellipsis) && matches!(self.peek_at(1), Tok::RBrack) {
            ArrayLen::Ellipsis(self.bump())
        } else {
            self.expr_lev += 1;
            let len = self.expr();
            self.expr_lev -= 1;
            ArrayLen::Expr(len?)
        };
        self.expect(Tok::RBrack, "']'")?;
        let elem = self.parse_type()?;
        Ok(self.alloc_type(Type::Array { l_brack, len, elem }, start))
    }

    fn struct_type(&mut self) -> PResult<TypeId> {
        let start = self.start();
        let struct_pos = self.bump();
        let l_brace = self.expect(Tok::LBrace, "'{'")?;
        let mut fields = Vec::new();
        while !self.at(Tok::RBrace) && !self.at_eof() {
            fields.push(self.field_decl()?);
            self.expect_semi()?;
        }
        let r_brace = self.expect(Tok::RBrace, "'}'")?;
        let fields = self.arena.list_fields(fields);
        Ok(self.alloc_type(
            Type::Struct {
                struct_pos,
                l_brace,
                fields,
                r_brace,
            },
            start,
        ))
    }

    fn field_decl(&mut self) -> PResult<FieldId> {
        let start = self.start();
        let field_end = |p: &Self| {
            p.at(Tok::Semi)
                || p.at(Tok::RBrace)
                || matches!(p.peek(), Tok::StringLit(_) | Tok::RawStringLit(_))
        };

        let named = if self.at_ident() {
            match self.peek_at(1) {
                Tok::Dot | Tok::Semi | Tok::RBrace | Tok::StringLit(_) | Tok::RawStringLit(_) => None,
                Tok::LBrack => {
                    let cp = self.checkpoint();
                    match self.ident_list().and_then(|names| Ok((names, self.parse_type()?))) {
                        Ok(found) if field_end(self) => Some(found),
                        _ => {
                            self.rewind(cp);
                            None
                        }
                    }
                }
                _ => {
                    let names = self.ident_list()?;
                    Some((names, self.parse_type()?))
                }
            }
        } else {
            None
        };

        let (names, typ) = match named {
            Some((names, typ)) => (self.arena.list_ident_names(names), typ),
            None => (ListRef::EMPTY, self.parse_type()?),
        };
        let tag = match self.peek() {
            Tok::StringLit(_) | Tok::RawStringLit(_) => Some(StringLit { raw: self.bump() }),
            _ => None,
        };

        let field = Field {
            names,
            ellipsis_pos: None,
            typ,
            tag,
        };
        let span = self.finish(start);
        Ok(self.arena.fields.alloc(field, span))
    }

    fn interface_type(&mut self) -> PResult<TypeId> {
        let start = self.start();
        let interface_pos = self.bump();
        let l_brace = self.expect(Tok::LBrace, "'{'")?;
        let mut elems = Vec::new();
        while !self.at(Tok::RBrace) && !self.at_eof() {
            let elem = if self.at_ident() && matches!(self.peek_at(1), Tok::LParen) {
                let name = self.ident()?;
                let sig = self.signature()?;
                InterfaceElem::Method { name, sig }
            } else {
                InterfaceElem::Embed(self.type_elem()?)
            };
            elems.push(elem);
            self.expect_semi()?;
        }
        let r_brace = self.expect(Tok::RBrace, "'}'")?;
        let elems = self.arena.list_interface_elems(elems);
        Ok(self.alloc_type(
            Type::Interface {
                interface_pos,
                l_brace,
                elems,
                r_brace,
            },
            start,
        ))
    }

    // -------------------------------------------------------------------------
    // Expressions
    // -------------------------------------------------------------------------

    fn expr(&mut self) -> PResult<ExprId> {
        self.binary_expr(1)
    }

    fn expr_list(&mut self) -> PResult<Vec<ExprId>> {
        let mut list = vec![self.expr()?];
        while self.eat(Tok::Comma).is_some() {
            list.push(self.expr()?);
        }
        Ok(list)
    }

    fn binary_expr(&mut self, min_prec: u8) -> PResult<ExprId> {
        let mut x = self.unary_expr()?;
        while let Some(op) = binary_op(self.peek()) {
            if op.precedence() < min_prec {
                break;
            }
            let op_pos = self.bump();
            let y = self.binary_expr(op.precedence() + 1)?;
            let span = self.arena.exprs.span(x).to(self.arena.exprs.span(y));
            x = self.arena.exprs.alloc(
                Expr::Binary {
                    left: x,
                    op,
                    op_pos,
                    right: y,
                },
                span,
            );
        }
        Ok(x)
    }

    fn unary_expr(&mut self) -> PResult<ExprId> {
        let start = self.start();
        let op = match self.peek() {
            Tok::Plus => UnaryOp::Add,
            Tok::Minus => UnaryOp::Sub,
            Tok::Bang => UnaryOp::Not,
            Tok::Caret => UnaryOp::Xor,
            Tok::Amp => UnaryOp::Addr,
            Tok::Tilde => UnaryOp::Tilde,
            Tok::Star => UnaryOp::Deref,
            // `<-chan T` in expression position is a type
            Tok::Arrow if !matches!(self.peek_at(1), Tok::KwChan) => UnaryOp::Recv,
            _ => return self.primary_expr(),
        };
        let op_pos = self.bump();
        let expr = self.unary_expr()?;
        Ok(self.alloc_expr(Expr::Unary { op, op_pos, expr }, start))
    }

    fn operand(&mut self) -> PResult<ExprId> {
        let start = self.start();
        let lit = |kind, p: &mut Self| Expr::BasicLit(BasicLit { kind, raw: p.bump() });
        let expr = match self.peek() {
            Tok::Ident(_) => Expr::Ident(self.ident()?),
            Tok::IntLit(_) => lit(BasicLitKind::Int, self),
            Tok::FloatLit(_) => lit(BasicLitKind::Float, self),
            Tok::ImagLit(_) => lit(BasicLitKind::Imag, self),
            Tok::RuneLit(_) => lit(BasicLitKind::Rune, self),
            Tok::StringLit(_) | Tok::RawStringLit(_) => lit(BasicLitKind::String, self),
            Tok::LParen => {
                let l_paren = self.bump();
                self.expr_lev += 1;
                let inner = self.expr();
                self.expr_lev -= 1;
                let expr = inner?;
                let r_paren = self.expect(Tok::RParen, "')'")?;
                Expr::Paren {
                    l_paren,
                    expr,
                    r_paren,
                }
            }
            Tok::KwFunc => {
                let func_pos = self.bump();
                let sig = self.signature()?;
                if self.at(Tok::LBrace) {
                    self.expr_lev += 1;
                    let body = self.func_body();
                    self.expr_lev -= 1;
                    Expr::FuncLit {
                        func_pos,
                        sig,
                        body: body?,
                    }
                } else {
                    let typ = self.alloc_type(Type::Func { func_pos, sig }, start);
                    Expr::TypeExpr(typ)
                }
            }
            Tok::LBrack | Tok::KwStruct | Tok::KwMap | Tok::KwChan | Tok::KwInterface | Tok::Arrow => {
                Expr::TypeExpr(self.parse_type()?)
            }
            _ => return Err(self.unexpected("expression")),
        };
        Ok(self.alloc_expr(expr, start))
    }

    fn primary_expr(&mut self) -> PResult<ExprId> {
        let mut x = self.operand()?;
        loop {
            let start = self.arena.exprs.span(x).start as usize;
            x = match self.peek() {
                Tok::Dot => {
                    self.bump();
                    if self.at_ident() {
                        let sel = self.ident()?;
                        self.alloc_expr(Expr::Selector { expr: x, sel }, start)
                    } else if self.eat(Tok::LParen).is_some() {
                        let typ = if self.eat(Tok::KwType).is_some() {
                            None
                        } else {
                            Some(self.parse_type()?)
                        };
                        let r_paren = self.expect(Tok::RParen, "')'")?;
                        self.alloc_expr(Expr::TypeAssert { expr: x, typ, r_paren }, start)
                    } else {
                        return Err(self.unexpected("selector or type assertion"));
                    }
                }
                Tok::LBrack => {
                    self.expr_lev += 1;
                    let indexed = self.index_or_slice(x, start);
                    self.expr_lev -= 1;
                    indexed?
                }
                Tok::LParen => {
                    self.expr_lev += 1;
                    let call = self.call(x, start);
                    self.expr_lev -= 1;
                    call?
                }
                Tok::LBrace if self.is_literal_type(x) => {
                    let lit = self.literal_value()?;
                    self.alloc_expr(Expr::CompositeLit { typ: x, lit }, start)
                }
                _ => break,
            };
        }
        Ok(x)
    }

    fn is_literal_type(&self, x: ExprId) -> bool {
        match self.arena.exprs[x] {
            Expr::Ident(_) | Expr::Selector { .. } | Expr::Index { .. } => self.expr_lev >= 0,
            Expr::TypeExpr(t) => matches!(
                self.arena.types[t],
                Type::Array { .. } | Type::Slice { .. } | Type::Map { .. } | Type::Struct { .. }
            ),
            _ => false,
        }
    }

    fn index_or_slice(&mut self, x: ExprId, start: usize) -> PResult<ExprId> {
        let l_brack = self.bump();
        let mut index: [Option<ExprId>; 3] = [None; 3];
        if !self.at(Tok::Colon) {
            index[0] = Some(self.expr()?);
        }

        if self.at(Tok::Colon) {
            let mut colons = 0;
            while colons < 2 && self.eat(Tok::Colon).is_some() {
                colons += 1;
                if !self.at(Tok::Colon) && !self.at(Tok::RBrack) {
                    index[colons] = Some(self.expr()?);
                }
            }
            let slice3 = colons == 2;
            if slice3 && (index[1].is_none() || index[2].is_none()) {
                return Err(Diag::parse(
                    self.cur_span(),
                    "middle and final index required in 3-index slice",
                ));
            }
            let r_brack = self.expect(Tok::RBrack, "']'")?;
            let [lo, hi, max] = index;
            return Ok(self.alloc_expr(
                Expr::Slice {
                    expr: x,
                    l_brack,
                    lo,
                    hi,
                    max,
                    slice3,
                    r_brack,
                },
                start,
            ));
        }

        let Some(first) = index[0] else {
            return Err(self.unexpected("index"));
        };
        let mut args = vec![first];
        while self.eat(Tok::Comma).is_some() && !self.at(Tok::RBrack) {
            args.push(self.expr()?);
        }
        let r_brack = self.expect(Tok::RBrack, "']'")?;
        let args = self.arena.list_exprs(args);
        Ok(self.alloc_expr(
            Expr::Index {
                base: x,
                l_brack,
                args,
                r_brack,
            },
            start,
        ))
    }

    fn call(&mut self, func: ExprId, start: usize) -> PResult<ExprId> {
        let l_paren = self.bump();
        let mut args = Vec::new();
        let mut ellipsis = None;
        while !self.at(Tok::RParen) {
            args.push(self.expr()?);
            if let Some(pos) = self.eat(Tok::Ellipsis) {
                ellipsis = Some(pos);
            }
            if self.eat(Tok::Comma).is_none() {
                break;
            }
        }
        let r_paren = self.expect(Tok::RParen, "')'")?;
        let args = self.arena.list_exprs(args);
        Ok(self.alloc_expr(
            Expr::Call {
                func,
                l_paren,
                args,
                ellipsis,
                r_paren,
            },
            start,
        ))
    }

    fn literal_value(&mut self) -> PResult<LiteralValue> {
        let l_brace = self.bump();
        self.expr_lev += 1;
        let elements = self.literal_elements();
        self.expr_lev -= 1;
        let elements = elements?;
        let r_brace = self.expect(Tok::RBrace, "'}'")?;
        Ok(LiteralValue {
            l_brace,
            elements: self.arena.list_keyed_elems(elements),
            r_brace,
        })
    }

    fn literal_elements(&mut self) -> PResult<Vec<KeyedElement>> {
        let mut elements = Vec::new();
        while !self.at(Tok::RBrace) {
            elements.push(self.keyed_element()?);
            if self.eat(Tok::Comma).is_none() {
                break;
            }
        }
        Ok(elements)
    }

    fn keyed_element(&mut self) -> PResult<KeyedElement> {
        let first = self.element()?;
        if self.eat(Tok::Colon).is_none() {
            return Ok(KeyedElement {
                key: None,
                value: first,
            });
        }
        let key = match first {
            Element::Literal(lit) => Key::Literal(lit),
            Element::Expr(e) => match self.arena.exprs[e] {
                Expr::Ident(name) => Key::FieldName(name),
                _ => Key::Expr(e),
            },
        };
        let value = self.element()?;
        Ok(KeyedElement {
            key: Some(key),
            value,
        })
    }

    fn element(&mut self) -> PResult<Element> {
        if self.at(Tok::LBrace) {
            Ok(Element::Literal(self.literal_value()?))
        } else {
            Ok(Element::Expr(self.expr()?))
        }
    }

    // -------------------------------------------------------------------------
    // Statements
    // -------------------------------------------------------------------------

    fn block(&mut self) -> PResult<Block> {
        let l_brace = self.expect(Tok::LBrace, "'{'")?;
        let stmts = self.stmt_list()?;
        let r_brace = self.expect(Tok::RBrace, "'}'")?;
        Ok(Block {
            l_brace,
            stmts,
            r_brace,
        })
    }

    fn stmt_list(&mut self) -> PResult<ListRef<StmtId>> {
        let mut stmts = Vec::new();
        while !self.at_eof() {
            match self.peek() {
                Tok::RBrace | Tok::KwCase | Tok::KwDefault => break,
                Tok::Semi => {
                    self.bump();
                }
                _ => {
                    stmts.push(self.stmt()?);
                    self.expect_semi()?;
                }
            }
        }
        Ok(self.arena.list_stmts(stmts))
    }

    fn stmt(&mut self) -> PResult<StmtId> {
        let start = self.start();
        let stmt = match self.peek() {
            Tok::KwVar => Stmt::Decl(self.gen_decl(GenDeclKind::Var)?),
            Tok::KwConst => Stmt::Decl(self.gen_decl(GenDeclKind::Const)?),
            Tok::KwType => Stmt::Decl(self.gen_decl(GenDeclKind::Type)?),
            Tok::Ident(_) if matches!(self.peek_at(1), Tok::Colon) => {
                let label = self.ident()?;
                let colon_pos = self.bump();
                let stmt = self.stmt()?;
                Stmt::Labeled {
                    label,
                    colon_pos,
                    stmt,
                }
            }
            Tok::KwGo => {
                let go_pos = self.bump();
                let call = self.expr()?;
                Stmt::Go { go_pos, call }
            }
            Tok::KwDefer => {
                let defer_pos = self.bump();
                let call = self.expr()?;
                Stmt::Defer { defer_pos, call }
            }
            Tok::KwReturn => {
                let return_pos = self.bump();
                let results = if self.at(Tok::Semi) || self.at(Tok::RBrace) {
                    Vec::new()
                } else {
                    self.expr_list()?
                };
                Stmt::Return {
                    return_pos,
                    results: self.arena.list_exprs(results),
                }
            }
            Tok::KwBreak | Tok::KwContinue | Tok::KwGoto | Tok::KwFallthrough => {
                let kind = match self.peek() {
                    Tok::KwBreak => BranchKind::Break,
                    Tok::KwContinue => BranchKind::Continue,
                    Tok::KwGoto => BranchKind::Goto,
                    _ => BranchKind::Fallthrough,
                };
                let pos = self.bump();
                let label = if kind != BranchKind::Fallthrough && self.at_ident() {
                    Some(self.ident()?)
                } else {
                    None
                };
                Stmt::Branch(BranchStmt { kind, pos, label })
            }
            Tok::LBrace => Stmt::Block(self.block()?),
            Tok::KwIf => return self.if_stmt(),
            Tok::KwFor => return self.for_stmt(),
            Tok::KwSwitch => return self.switch_stmt(),
            Tok::KwSelect => return self.select_stmt(),
            Tok::Semi | Tok::RBrace => {
                let span = Span::empty_at(start);
                let empty = self.arena.simple_stmts.alloc(SimpleStmt::Empty(span), span);
                return Ok(self.arena.stmts.alloc(Stmt::Simple(empty), span));
            }
            _ => Stmt::Simple(self.simple_stmt()?),
        };
        Ok(self.alloc_stmt(stmt, start))
    }

    fn simple_stmt(&mut self) -> PResult<SimpleStmtId> {
        match self.simple_stmt_or_range(false)? {
            Header::Simple(id) => Ok(id),
            Header::Range { range_pos, .. } => Err(Diag::parse(range_pos, "unexpected range clause")),
        }
    }

    fn simple_stmt_or_range(&mut self, range_ok: bool) -> PResult<Header> {
        let start = self.start();
        if range_ok && self.at(Tok::KwRange) {
            let range_pos = self.bump();
            let expr = self.expr()?;
            return Ok(Header::Range {
                lhs: None,
                range_pos,
                expr,
            });
        }

        let lhs = self.expr_list()?;

        if let Some(op) = assign_op(self.peek()) {
            let op_pos = self.bump();
            if range_ok && op == AssignOp::Assign && self.at(Tok::KwRange) {
                let range_pos = self.bump();
                let expr = self.expr()?;
                let exprs = self.arena.list_exprs(lhs);
                return Ok(Header::Range {
                    lhs: Some(RangeLhs::Assign { exprs, op_pos }),
                    range_pos,
                    expr,
                });
            }
            let rhs = self.expr_list()?;
            let stmt = SimpleStmt::Assign {
                lhs: self.arena.list_exprs(lhs),
                op,
                op_pos,
                rhs: self.arena.list_exprs(rhs),
            };
            return Ok(Header::Simple(self.alloc_simple(stmt, start)));
        }

        let stmt = match self.peek() {
            Tok::Define => {
                let op_pos = self.bump();
                let names = self.names_of(&lhs)?;
                if range_ok && self.at(Tok::KwRange) {
                    let range_pos = self.bump();
                    let expr = self.expr()?;
                    let idents = self.arena.list_ident_names(names);
                    return Ok(Header::Range {
                        lhs: Some(RangeLhs::Def { idents, op_pos }),
                        range_pos,
                        expr,
                    });
                }
                let values = self.expr_list()?;
                SimpleStmt::ShortVarDecl {
                    names: self.arena.list_ident_names(names),
                    op_pos,
                    values: self.arena.list_exprs(values),
                }
            }
            Tok::Arrow => {
                let chan = self.single(&lhs)?;
                let op_pos = self.bump();
                let value = self.expr()?;
                SimpleStmt::Send { chan, op_pos, value }
            }
            Tok::Inc | Tok::Dec => {
                let expr = self.single(&lhs)?;
                let op = if self.at(Tok::Inc) { IncDecOp::Inc } else { IncDecOp::Dec };
                let op_pos = self.bump();
                SimpleStmt::IncDec { expr, op, op_pos }
            }
            _ => SimpleStmt::Expr(self.single(&lhs)?),
        };
        Ok(Header::Simple(self.alloc_simple(stmt, start)))
    }

    fn single(&self, list: &[ExprId]) -> PResult<ExprId> {
        match list {
            [only] => Ok(*only),
            [_, second, ..] => Err(Diag::parse(
                self.arena.exprs.span(*second),
                format!("expected 1 expression, found {}", list.len()),
            )),
            [] => Err(self.unexpected("expression")),
        }
    }

    fn names_of(&self, list: &[ExprId]) -> PResult<Vec<IdentName>> {
        list.iter()
            .map(|&e| match self.arena.exprs[e] {
                Expr::Ident(name) => Ok(name),
                _ => Err(Diag::parse(self.arena.exprs.span(e), "non-name on left side of :=")),
            })
            .collect()
    }

    fn expect_condition(&self, stmt: Option<SimpleStmtId>, what: &str) -> PResult<ExprId> {
        match stmt.map(|s| self.arena.simple_stmts[s]) {
            Some(SimpleStmt::Expr(x)) => Ok(x),
            Some(_) => Err(Diag::parse(
                stmt.map_or_else(|| self.cur_span(), |s| self.arena.simple_stmts.span(s)),
                format!("cannot use statement as {what}"),
            )),
            None => Err(Diag::parse(self.cur_span(), format!("missing {what}"))),
        }
    }

    /// Runs `f` with composite literals of named types disabled.
    fn in_header<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        let saved = self.expr_lev;
        self.expr_lev = -1;
        let result = f(self);
        self.expr_lev = saved;
        result
    }

    fn if_stmt(&mut self) -> PResult<StmtId> {
        let start = self.start();
        let if_pos = self.bump();
        let (init, cond) = self.in_header(|p| {
            let first = if p.at(Tok::Semi) || p.at(Tok::LBrace) {
                None
            } else {
                Some(p.simple_stmt()?)
            };
            if p.eat(Tok::Semi).is_some() {
                let cond = if p.at(Tok::LBrace) {
                    None
                } else {
                    Some(p.simple_stmt()?)
                };
                Ok((first, p.expect_condition(cond, "condition in if statement")?))
            } else {
                Ok((None, p.expect_condition(first, "condition in if statement")?))
            }
        })?;
        let then_block = self.block()?;

        let else_stmt = if self.eat(Tok::KwElse).is_some() {
            match self.peek() {
                Tok::KwIf => Some(self.if_stmt()?),
                Tok::LBrace => {
                    let else_start = self.start();
                    let block = self.block()?;
                    Some(self.alloc_stmt(Stmt::Block(block), else_start))
                }
                _ => return Err(self.unexpected("'if' or '{' after else")),
            }
        } else {
            None
        };

        Ok(self.alloc_stmt(
            Stmt::If {
                if_pos,
                init,
                cond,
                then_block,
                else_stmt,
            },
            start,
        ))
    }

    fn for_stmt(&mut self) -> PResult<StmtId> {
        let start = self.start();
        let for_pos = self.bump();
        let kind = self.in_header(Self::for_header)?;
        let block = self.block()?;
        Ok(self.alloc_stmt(Stmt::For { for_pos, kind, block }, start))
    }

    fn for_header(&mut self) -> PResult<ForKind> {
        if self.at(Tok::LBrace) {
            return Ok(ForKind::Infinite);
        }

        let mut init = None;
        if !self.at(Tok::Semi) {
            match self.simple_stmt_or_range(true)? {
                Header::Range {
                    lhs,
                    range_pos,
                    expr,
                } => {
                    return Ok(ForKind::Range {
                        lhs,
                        range_pos,
                        expr,
                    })
                }
                Header::Simple(s) => init = Some(s),
            }
        }

        if self.eat(Tok::Semi).is_none() {
            return self.expect_condition(init, "for loop condition").map(ForKind::Cond);
        }
        let cond = if self.at(Tok::Semi) {
            None
        } else {
            Some(self.expr()?)
        };
        self.expect(Tok::Semi, "';' in for clause")?;
        let post = if self.at(Tok::LBrace) {
            None
        } else {
            Some(self.simple_stmt()?)
        };
        Ok(ForKind::ForClause { init, cond, post })
    }

    fn switch_stmt(&mut self) -> PResult<StmtId> {
        let start = self.start();
        let switch_pos = self.bump();
        let (init, tag) = self.in_header(|p| {
            if p.at(Tok::LBrace) {
                return Ok((None, None));
            }
            let first = if p.at(Tok::Semi) {
                None
            } else {
                Some(p.simple_stmt()?)
            };
            if p.eat(Tok::Semi).is_some() {
                let tag = if p.at(Tok::LBrace) {
                    None
                } else {
                    Some(p.simple_stmt()?)
                };
                Ok((first, tag))
            } else {
                Ok((None, first))
            }
        })?;

        if let Some(guard) = tag.and_then(|s| self.type_switch_guard(s)) {
            let (l_brace, clauses, r_brace) = self.switch_body(true)?;
            return Ok(self.alloc_stmt(
                Stmt::TypeSwitch {
                    switch_pos,
                    init,
                    guard,
                    l_brace,
                    clauses,
                    r_brace,
                },
                start,
            ));
        }

        let tag = match tag {
            Some(s) => Some(self.expect_condition(Some(s), "switch expression")?),
            None => None,
        };
        let (l_brace, clauses, r_brace) = self.switch_body(false)?;
        Ok(self.alloc_stmt(
            Stmt::Switch {
                switch_pos,
                init,
                tag,
                l_brace,
                clauses,
                r_brace,
            },
            start,
        ))
    }

    /// `x.(type)` or `v := x.(type)`.
    fn type_switch_guard(&self, s: SimpleStmtId) -> Option<TypeSwitchGuard> {
        let operand = |e: ExprId| match self.arena.exprs[e] {
            Expr::TypeAssert { expr, typ: None, .. } => Some(expr),
            _ => None,
        };
        match self.arena.simple_stmts[s] {
            SimpleStmt::Expr(e) => operand(e).map(|x| TypeSwitchGuard { bind: None, x }),
            SimpleStmt::ShortVarDecl { names, values, .. } => {
                match (self.arena.ident_names(names), self.arena.exprs_list(values)) {
                    ([name], [value]) => operand(*value).map(|x| TypeSwitchGuard {
                        bind: Some(*name),
                        x,
                    }),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    fn switch_body(&mut self, type_switch: bool) -> PResult<(Span, ListRef<SwitchClauseId>, Span)> {
        let l_brace = self.expect(Tok::LBrace, "'{'")?;
        let mut clauses = Vec::new();
        while self.at(Tok::KwCase) || self.at(Tok::KwDefault) {
            clauses.push(self.switch_clause(type_switch)?);
        }
        let r_brace = self.expect(Tok::RBrace, "'}' or case clause")?;
        Ok((l_brace, self.arena.list_switch_clause_ids(clauses), r_brace))
    }

    fn switch_clause(&mut self, type_switch: bool) -> PResult<SwitchClauseId> {
        let start = self.start();
        let is_case = self.at(Tok::KwCase);
        let case_pos = self.bump();

        let clause = if type_switch {
            let items = if is_case {
                let mut types = vec![self.parse_type()?];
                while self.eat(Tok::Comma).is_some() {
                    types.push(self.parse_type()?);
                }
                Some(self.arena.list_types(types))
            } else {
                None
            };
            let colon_pos = self.expect(Tok::Colon, "':'")?;
            let stmts = self.stmt_list()?;
            SwitchClause::TypeCase {
                case_pos,
                items,
                colon_pos,
                stmts,
            }
        } else {
            let items = if is_case {
                let exprs = self.expr_list()?;
                Some(self.arena.list_exprs(exprs))
            } else {
                None
            };
            let colon_pos = self.expect(Tok::Colon, "':'")?;
            let stmts = self.stmt_list()?;
            SwitchClause::ExprCase {
                case_pos,
                items,
                colon_pos,
                stmts,
            }
        };

        let span = self.finish(start);
        Ok(self.arena.switch_clauses.alloc(clause, span))
    }

    fn select_stmt(&mut self) -> PResult<StmtId> {
        let start = self.start();
        let select_pos = self.bump();
        let l_brace = self.expect(Tok::LBrace, "'{'")?;
        let mut clauses = Vec::new();
        while self.at(Tok::KwCase) || self.at(Tok::KwDefault) {
            let clause_start = self.start();
            let is_case = self.at(Tok::KwCase);
            let case_pos = self.bump();
            let comm = if is_case {
                Some(self.simple_stmt()?)
            } else {
                None
            };
            let colon_pos = self.expect(Tok::Colon, "':'")?;
            let stmts = self.stmt_list()?;
            let clause = CommClause {
                case_pos,
                comm,
                colon_pos,
                stmts,
            };
            let span = self.finish(clause_start);
            clauses.push(self.arena.comm_clauses.alloc(clause, span));
        }
        let r_brace = self.expect(Tok::RBrace, "'}' or case clause")?;
        let clauses = self.arena.list_comm_clause_ids(clauses);
        Ok(self.alloc_stmt(
            Stmt::Select {
                select_pos,
                l_brace,
                clauses,
                r_brace,
            },
            start,
        ))
    }

    // -------------------------------------------------------------------------
    // Comments
    // -------------------------------------------------------------------------

    /// Newlines between two offsets, or `None` if anything but whitespace sits there.
    fn blank_gap(&self, from: u32, to: u32) -> Option<usize> {
        let gap = self.src.get(from as usize..to as usize)?;
        gap.bytes()
            .all(|b| b.is_ascii_whitespace())
            .then(|| gap.bytes().filter(|&b| b == b'\n').count())
    }

    fn comment_groups(&mut self, raw: &[RawComment]) -> Vec<CommentGroupId> {
        let mut groups = Vec::new();
        let mut i = 0;
        while i < raw.len() {
            let mut j = i + 1;
            while j < raw.len() && self.blank_gap(raw[j - 1].span.end, raw[j].span.start).is_some_and(|n| n <= 1) {
                j += 1;
            }
            let ids: Vec<CommentId> = raw[i..j]
                .iter()
                .map(|c| self.arena.comments.alloc(Comment { kind: c.kind }, c.span))
                .collect();
            let span = raw[i].span.to(raw[j - 1].span);
            let comments = self.arena.list_comment_ids(ids);
            groups.push(self.arena.comment_groups.alloc(CommentGroup { comments }, span));
            i = j;
        }
        groups
    }

    /// Comment group ending on the line right above `start`.
    fn doc_for(&self, groups: &[CommentGroupId], start: u32) -> Option<CommentGroupId> {
        let idx = groups.partition_point(|&g| self.arena.comment_groups.span(g).end <= start);
        let candidate = *groups.get(idx.checked_sub(1)?)?;
        let end = self.arena.comment_groups.span(candidate).end;
        (self.blank_gap(end, start) == Some(1)).then_some(candidate)
    }
}

fn binary_op(tok: &Tok<'_>) -> Option<BinaryOp> {
    Some(match tok {
        Tok::Plus => BinaryOp::Add,
        Tok::Minus => BinaryOp::Sub,
        Tok::Star => BinaryOp::Mul,
        Tok::Slash => BinaryOp::Div,
        Tok::Percent => BinaryOp::Mod,
        Tok::Amp => BinaryOp::And,
        Tok::Pipe => BinaryOp::Or,
        Tok::Caret => BinaryOp::Xor,
        Tok::Shl => BinaryOp::Shl,
        Tok::Shr => BinaryOp::Shr,
        Tok::AndNot => BinaryOp::AndNot,
        Tok::LAnd => BinaryOp::LAnd,
        Tok::LOr => BinaryOp::LOr,
        Tok::EqEq => BinaryOp::Eq,
        Tok::NotEq => BinaryOp::Ne,
        Tok::Lt => BinaryOp::Lt,
        Tok::Le => BinaryOp::Le,
        Tok::Gt => BinaryOp::Gt,
        Tok::Ge => BinaryOp::Ge,
        _ => return None,
    })
}

fn assign_op(tok: &Tok<'_>) -> Option<AssignOp> {
    Some(match tok {
        Tok::Assign => AssignOp::Assign,
        Tok::AddAssign => AssignOp::AddAssign,
        Tok::SubAssign => AssignOp::SubAssign,
        Tok::MulAssign => AssignOp::MulAssign,
        Tok::DivAssign => AssignOp::DivAssign,
        Tok::ModAssign => AssignOp::ModAssign,
        Tok::AndAssign => AssignOp::AndAssign,
        Tok::OrAssign => AssignOp::OrAssign,
        Tok::XorAssign => AssignOp::XorAssign,
        Tok::ShlAssign => AssignOp::ShlAssign,
        Tok::ShrAssign => AssignOp::ShrAssign,
        Tok::AndNotAssign => AssignOp::AndNotAssign,
        _ => return None,
    })
}
