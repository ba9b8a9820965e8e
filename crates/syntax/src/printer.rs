//! Canonical printer.
//!
//! The output is a fixed layout (tab indentation, one statement per line, single
//! spaces around binary operators) chosen so that printing the re-parsed output
//! yields the same text again. Literal and comment text is copied from the
//! source. Comments are emitted on their own line before the first statement,
//! declaration, field or element that follows them; anything left over goes at
//! the end of the file.

use thiserror::Error;

use crate::ast::*;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("span {start}..{end} lies outside the source text")]
    SpanOutOfRange { start: u32, end: u32 },
}

type Fmt = Result<(), FormatError>;

/// Prints `file` in canonical form. `src` must be the text the tree was parsed from.
pub fn print_file(arena: &AstArena, interner: &Interner, file: &SourceFile, src: &str) -> Result<String, FormatError> {
    let mut comments: Vec<(u32, CommentId)> = arena
        .comment_group_ids(file.comments)
        .iter()
        .flat_map(|&g| arena.comment_ids(arena.comment_groups[g].comments))
        .map(|&c| (arena.comments.span(c).start, c))
        .collect();
    comments.sort_unstable_by_key(|&(start, _)| start);

    let mut p = Printer {
        a: arena,
        interner,
        src,
        out: String::with_capacity(src.len() + src.len() / 8),
        indent: 0,
        comments,
        next: 0,
    };
    p.file(file)?;
    Ok(p.out)
}

struct Printer<'a> {
    a: &'a AstArena,
    interner: &'a Interner,
    src: &'a str,
    out: String,
    indent: usize,
    /// All comments, sorted by start offset
    comments: Vec<(u32, CommentId)>,
    /// First comment not yet printed
    next: usize,
}

impl<'a> Printer<'a> {
    // -------------------------------------------------------------------------
    // Output primitives
    // -------------------------------------------------------------------------

    #[inline]
    fn w(&mut self, s: &str) {
        self.out.push_str(s);
    }

    fn newline(&mut self) {
        self.out.push('\n');
        for _ in 0..self.indent {
            self.out.push('\t');
        }
    }

    fn text(&self, span: Span) -> Result<&'a str, FormatError> {
        self.src
            .get(span.start as usize..span.end as usize)
            .ok_or(FormatError::SpanOutOfRange {
                start: span.start,
                end: span.end,
            })
    }

    #[inline]
    fn name(&mut self, name: IdentName) {
        let s = self.interner.resolve(name.sym);
        self.out.push_str(s);
    }

    fn names(&mut self, names: ListRef<IdentName>) {
        for (i, &name) in self.a.ident_names(names).iter().enumerate() {
            if i > 0 {
                self.w(", ");
            }
            self.name(name);
        }
    }

    fn comma_list<T: Copy>(&mut self, items: &[T], mut f: impl FnMut(&mut Self, T) -> Fmt) -> Fmt {
        for (i, &item) in items.iter().enumerate() {
            if i > 0 {
                self.w(", ");
            }
            f(self, item)?;
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Comments
    // -------------------------------------------------------------------------

    fn comment(&mut self) -> Fmt {
        let (_, id) = self.comments[self.next];
        self.next += 1;
        let text = self.text(self.a.comments.span(id))?;
        self.w(text);
        Ok(())
    }

    #[inline]
    fn pending_before(&self, pos: u32) -> bool {
        self.comments.get(self.next).is_some_and(|&(start, _)| start < pos)
    }

    /// Comments starting before `pos`, each followed by a line break.
    /// Call at the start of a line.
    fn leading_comments(&mut self, pos: u32) -> Fmt {
        while self.pending_before(pos) {
            self.comment()?;
            self.newline();
        }
        Ok(())
    }

    /// Comments starting before `pos`, each on a fresh line.
    fn trailing_comments(&mut self, pos: u32) -> Fmt {
        while self.pending_before(pos) {
            self.newline();
            self.comment()?;
        }
        Ok(())
    }

    fn has_comment_within(&self, from: u32, to: u32) -> bool {
        let idx = self.comments.partition_point(|&(start, _)| start < from);
        self.comments.get(idx).is_some_and(|&(start, _)| start < to)
    }

    /// Ends an indented section: remaining inner comments, dedent, `closer`.
    fn close(&mut self, pos: u32, closer: &str) -> Fmt {
        self.trailing_comments(pos)?;
        self.indent -= 1;
        self.newline();
        self.w(closer);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // File and declarations
    // -------------------------------------------------------------------------

    fn file(&mut self, file: &SourceFile) -> Fmt {
        self.leading_comments(file.package_pos.start)?;
        self.w("package ");
        self.name(file.name);

        let a = self.a;
        for &decl in a.top_decls(file.decls) {
            self.out.push('\n');
            self.newline();
            match decl {
                TopLevelDecl::Decl(id) => {
                    self.leading_comments(a.decls.span(id).start)?;
                    self.gen_decl(&a.decls[id], a.decls.span(id))?;
                }
                TopLevelDecl::Func(id) => {
                    self.leading_comments(a.funcs.span(id).start)?;
                    self.func_decl(&a.funcs[id])?;
                }
            }
        }

        if self.next < self.comments.len() {
            self.out.push('\n');
            self.trailing_comments(u32::MAX)?;
        }
        self.out.push('\n');
        Ok(())
    }

    fn gen_decl(&mut self, decl: &GenDecl, span: Span) -> Fmt {
        let a = self.a;
        self.w(decl.kind.keyword());
        let specs = a.specs_list(decl.specs);
        if decl.l_paren.is_none() {
            for spec in specs {
                self.w(" ");
                self.spec(spec)?;
            }
            return Ok(());
        }

        self.w(" (");
        self.indent += 1;
        for spec in specs {
            self.newline();
            self.leading_comments(spec_start(a, spec))?;
            self.spec(spec)?;
        }
        let end = decl.r_paren.map_or(span.end, |r| r.start);
        self.close(end, ")")
    }

    fn spec(&mut self, spec: &Spec) -> Fmt {
        match *spec {
            Spec::Import(ref import) => {
                match import.name {
                    Some(ImportName::Dot(_)) => self.w(". "),
                    Some(ImportName::Blank(_)) => self.w("_ "),
                    Some(ImportName::Name(name)) => {
                        self.name(name);
                        self.w(" ");
                    }
                    None => {}
                }
                let path = self.text(import.path.raw)?;
                self.w(path);
            }
            Spec::Value(ref value) => {
                self.names(value.names);
                if let Some(typ) = value.typ {
                    self.w(" ");
                    self.typ(typ)?;
                }
                let values = self.a.exprs_list(value.values);
                if !values.is_empty() {
                    self.w(" = ");
                    self.comma_list(values, Self::expr)?;
                }
            }
            Spec::Type(ref spec) => {
                self.name(spec.name);
                if let Some(params) = spec.type_params {
                    self.type_params(params)?;
                }
                self.w(if spec.assign_pos.is_some() { " = " } else { " " });
                self.typ(spec.typ)?;
            }
        }
        Ok(())
    }

    fn func_decl(&mut self, func: &FuncDecl) -> Fmt {
        self.w("func ");
        if let Some(recv) = &func.recv {
            self.receiver(recv)?;
            self.w(" ");
        }
        self.name(func.name);
        if let Some(params) = func.type_params {
            self.type_params(params)?;
        }
        self.signature(func.signature)?;
        if let Some(body) = &func.body {
            self.w(" ");
            self.block(body)?;
        }
        Ok(())
    }

    fn receiver(&mut self, recv: &Receiver) -> Fmt {
        self.w("(");
        if let Some(name) = recv.name {
            self.name(name);
            self.w(" ");
        }
        self.typ(recv.typ)?;
        if let Some(params) = recv.type_params {
            self.w("[");
            self.names(params.names);
            self.w("]");
        }
        self.w(")");
        Ok(())
    }

    fn type_params(&mut self, id: TypeParamsId) -> Fmt {
        let a = self.a;
        self.w("[");
        self.comma_list(a.type_param_decl_ids(a.type_params[id].params), |p, decl| {
            let decl = &a.type_param_decls[decl];
            p.names(decl.names);
            p.w(" ");
            p.type_elem(&decl.constraint)
        })?;
        self.w("]");
        Ok(())
    }

    fn type_elem(&mut self, elem: &TypeElem) -> Fmt {
        for (i, term) in self.a.type_terms(elem.terms).iter().enumerate() {
            if i > 0 {
                self.w(" | ");
            }
            if term.tilde_pos.is_some() {
                self.w("~");
            }
            self.typ(term.typ)?;
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Signatures and fields
    // -------------------------------------------------------------------------

    fn signature(&mut self, id: SignatureId) -> Fmt {
        let sig = self.a.signatures[id];
        self.field_list(&sig.params)?;
        match sig.results {
            Some(Results::Params(ref list)) => {
                self.w(" ");
                self.field_list(list)?;
            }
            Some(Results::Type(typ)) => {
                self.w(" ");
                self.typ(typ)?;
            }
            None => {}
        }
        Ok(())
    }

    fn field_list(&mut self, list: &FieldList) -> Fmt {
        self.w("(");
        self.comma_list(self.a.fields_list(list.fields), Self::field)?;
        self.w(")");
        Ok(())
    }

    fn field(&mut self, id: FieldId) -> Fmt {
        let field = self.a.fields[id];
        if !field.is_embedded() {
            self.names(field.names);
            self.w(" ");
        }
        if field.ellipsis_pos.is_some() {
            self.w("...");
        }
        self.typ(field.typ)?;
        if let Some(tag) = field.tag {
            let tag = self.text(tag.raw)?;
            self.w(" ");
            self.w(tag);
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Types
    // -------------------------------------------------------------------------

    fn typ(&mut self, id: TypeId) -> Fmt {
        let a = self.a;
        match a.types[id] {
            Type::Named { pkg, name, args } => {
                if let Some(pkg) = pkg {
                    self.name(pkg);
                    self.w(".");
                }
                self.name(name);
                let args = a.types_list(args);
                if !args.is_empty() {
                    self.w("[");
                    self.comma_list(args, Self::typ)?;
                    self.w("]");
                }
            }
            Type::Pointer { elem, .. } => {
                self.w("*");
                self.typ(elem)?;
            }
            Type::Array { len, elem, .. } => {
                self.w("[");
                match len {
                    ArrayLen::Expr(e) => self.expr(e)?,
                    ArrayLen::Ellipsis(_) => self.w("..."),
                }
                self.w("]");
                self.typ(elem)?;
            }
            Type::Slice { elem, .. } => {
                self.w("[]");
                self.typ(elem)?;
            }
            Type::Map { key, val, .. } => {
                self.w("map[");
                self.typ(key)?;
                self.w("]");
                self.typ(val)?;
            }
            Type::Chan { dir, elem, .. } => {
                self.w(match dir {
                    ChanDir::Both => "chan ",
                    ChanDir::Send => "chan<- ",
                    ChanDir::Recv => "<-chan ",
                });
                self.typ(elem)?;
            }
            Type::Struct {
                l_brace,
                fields,
                r_brace,
                ..
            } => {
                let fields = a.fields_list(fields);
                if fields.is_empty() && !self.has_comment_within(l_brace.start, r_brace.start) {
                    self.w("struct{}");
                    return Ok(());
                }
                self.w("struct {");
                self.indent += 1;
                for &field in fields {
                    self.newline();
                    self.leading_comments(a.fields.span(field).start)?;
                    self.field(field)?;
                }
                self.close(r_brace.start, "}")?;
            }
            Type::Interface {
                l_brace,
                elems,
                r_brace,
                ..
            } => {
                let elems = a.interface_elems(elems);
                if elems.is_empty() && !self.has_comment_within(l_brace.start, r_brace.start) {
                    self.w("interface{}");
                    return Ok(());
                }
                self.w("interface {");
                self.indent += 1;
                for elem in elems {
                    self.newline();
                    self.leading_comments(interface_elem_start(a, elem))?;
                    match *elem {
                        InterfaceElem::Method { name, sig } => {
                            self.name(name);
                            self.signature(sig)?;
                        }
                        InterfaceElem::Embed(ref embed) => self.type_elem(embed)?,
                    }
                }
                self.close(r_brace.start, "}")?;
            }
            Type::Func { sig, .. } => {
                self.w("func");
                self.signature(sig)?;
            }
            Type::Paren { typ, .. } => {
                self.w("(");
                self.typ(typ)?;
                self.w(")");
            }
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Statements
    // -------------------------------------------------------------------------

    fn block(&mut self, block: &Block) -> Fmt {
        self.w("{");
        self.indent += 1;
        self.stmt_list(block.stmts)?;
        self.close(block.r_brace.start, "}")
    }

    fn stmt_list(&mut self, stmts: ListRef<StmtId>) -> Fmt {
        let a = self.a;
        for &id in a.stmts_list(stmts) {
            if is_empty_stmt(a, id) {
                continue;
            }
            self.newline();
            self.leading_comments(a.stmts.span(id).start)?;
            self.stmt(id)?;
        }
        Ok(())
    }

    fn stmt(&mut self, id: StmtId) -> Fmt {
        let a = self.a;
        match a.stmts[id] {
            Stmt::Simple(s) => self.simple_stmt(s)?,
            Stmt::Decl(d) => self.gen_decl(&a.decls[d], a.decls.span(d))?,
            Stmt::Labeled { label, stmt, .. } => {
                self.name(label);
                self.w(":");
                if !is_empty_stmt(a, stmt) {
                    self.newline();
                    self.leading_comments(a.stmts.span(stmt).start)?;
                    self.stmt(stmt)?;
                }
            }
            Stmt::Go { call, .. } => {
                self.w("go ");
                self.expr(call)?;
            }
            Stmt::Defer { call, .. } => {
                self.w("defer ");
                self.expr(call)?;
            }
            Stmt::Return { results, .. } => {
                self.w("return");
                let results = a.exprs_list(results);
                if !results.is_empty() {
                    self.w(" ");
                    self.comma_list(results, Self::expr)?;
                }
            }
            Stmt::Branch(branch) => {
                self.w(branch.kind.keyword());
                if let Some(label) = branch.label {
                    self.w(" ");
                    self.name(label);
                }
            }
            Stmt::Block(ref block) => self.block(block)?,
            Stmt::If {
                init,
                cond,
                ref then_block,
                else_stmt,
                ..
            } => {
                self.w("if ");
                if let Some(init) = init {
                    self.simple_stmt(init)?;
                    self.w("; ");
                }
                self.expr(cond)?;
                self.w(" ");
                self.block(then_block)?;
                if let Some(else_stmt) = else_stmt {
                    self.w(" else ");
                    self.stmt(else_stmt)?;
                }
            }
            Stmt::For { kind, ref block, .. } => {
                self.for_header(kind)?;
                self.block(block)?;
            }
            Stmt::Switch {
                init,
                tag,
                clauses,
                r_brace,
                ..
            } => {
                self.w("switch ");
                if let Some(init) = init {
                    self.simple_stmt(init)?;
                    self.w("; ");
                }
                if let Some(tag) = tag {
                    self.expr(tag)?;
                    self.w(" ");
                }
                self.switch_body(clauses, r_brace)?;
            }
            Stmt::TypeSwitch {
                init,
                guard,
                clauses,
                r_brace,
                ..
            } => {
                self.w("switch ");
                if let Some(init) = init {
                    self.simple_stmt(init)?;
                    self.w("; ");
                }
                if let Some(bind) = guard.bind {
                    self.name(bind);
                    self.w(" := ");
                }
                self.expr(guard.x)?;
                self.w(".(type) ");
                self.switch_body(clauses, r_brace)?;
            }
            Stmt::Select { clauses, r_brace, .. } => {
                self.w("select {");
                for &clause in a.comm_clause_ids(clauses) {
                    let c = a.comm_clauses[clause];
                    self.newline();
                    self.leading_comments(a.comm_clauses.span(clause).start)?;
                    match c.comm {
                        Some(comm) => {
                            self.w("case ");
                            self.simple_stmt(comm)?;
                            self.w(":");
                        }
                        None => self.w("default:"),
                    }
                    self.clause_body(c.stmts)?;
                }
                self.trailing_comments(r_brace.start)?;
                self.newline();
                self.w("}");
            }
        }
        Ok(())
    }

    fn for_header(&mut self, kind: ForKind) -> Fmt {
        match kind {
            ForKind::Infinite => self.w("for "),
            ForKind::Cond(cond) => {
                self.w("for ");
                self.expr(cond)?;
                self.w(" ");
            }
            ForKind::ForClause { init, cond, post } => {
                self.w("for ");
                if let Some(init) = init {
                    self.simple_stmt(init)?;
                }
                self.w(";");
                if let Some(cond) = cond {
                    self.w(" ");
                    self.expr(cond)?;
                }
                self.w(";");
                if let Some(post) = post {
                    self.w(" ");
                    self.simple_stmt(post)?;
                }
                self.w(" ");
            }
            ForKind::Range { lhs, expr, .. } => {
                self.w("for ");
                match lhs {
                    Some(RangeLhs::Def { idents, .. }) => {
                        self.names(idents);
                        self.w(" := ");
                    }
                    Some(RangeLhs::Assign { exprs, .. }) => {
                        self.comma_list(self.a.exprs_list(exprs), Self::expr)?;
                        self.w(" = ");
                    }
                    None => {}
                }
                self.w("range ");
                self.expr(expr)?;
                self.w(" ");
            }
        }
        Ok(())
    }

    fn switch_body(&mut self, clauses: ListRef<SwitchClauseId>, r_brace: Span) -> Fmt {
        let a = self.a;
        self.w("{");
        for &clause in a.switch_clause_ids(clauses) {
            self.newline();
            self.leading_comments(a.switch_clauses.span(clause).start)?;
            let stmts = match a.switch_clauses[clause] {
                SwitchClause::ExprCase { items, stmts, .. } => {
                    match items {
                        Some(items) => {
                            self.w("case ");
                            self.comma_list(a.exprs_list(items), Self::expr)?;
                            self.w(":");
                        }
                        None => self.w("default:"),
                    }
                    stmts
                }
                SwitchClause::TypeCase { items, stmts, .. } => {
                    match items {
                        Some(items) => {
                            self.w("case ");
                            self.comma_list(a.types_list(items), Self::typ)?;
                            self.w(":");
                        }
                        None => self.w("default:"),
                    }
                    stmts
                }
            };
            self.clause_body(stmts)?;
        }
        self.trailing_comments(r_brace.start)?;
        self.newline();
        self.w("}");
        Ok(())
    }

    fn clause_body(&mut self, stmts: ListRef<StmtId>) -> Fmt {
        self.indent += 1;
        self.stmt_list(stmts)?;
        self.indent -= 1;
        Ok(())
    }

    fn simple_stmt(&mut self, id: SimpleStmtId) -> Fmt {
        let a = self.a;
        match a.simple_stmts[id] {
            SimpleStmt::Empty(_) => {}
            SimpleStmt::Expr(e) => self.expr(e)?,
            SimpleStmt::Send { chan, value, .. } => {
                self.expr(chan)?;
                self.w(" <- ");
                self.expr(value)?;
            }
            SimpleStmt::IncDec { expr, op, .. } => {
                self.expr(expr)?;
                self.w(op.as_str());
            }
            SimpleStmt::Assign { lhs, op, rhs, .. } => {
                self.comma_list(a.exprs_list(lhs), Self::expr)?;
                self.w(" ");
                self.w(op.as_str());
                self.w(" ");
                self.comma_list(a.exprs_list(rhs), Self::expr)?;
            }
            SimpleStmt::ShortVarDecl { names, values, .. } => {
                self.names(names);
                self.w(" := ");
                self.comma_list(a.exprs_list(values), Self::expr)?;
            }
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Expressions
    // -------------------------------------------------------------------------

    fn expr(&mut self, id: ExprId) -> Fmt {
        let a = self.a;
        match a.exprs[id] {
            Expr::Ident(name) => self.name(name),
            Expr::BasicLit(lit) => {
                let raw = self.text(lit.raw)?;
                self.w(raw);
            }
            Expr::FuncLit { sig, ref body, .. } => {
                self.w("func");
                self.signature(sig)?;
                self.w(" ");
                self.block(body)?;
            }
            Expr::CompositeLit { typ, ref lit } => {
                self.expr(typ)?;
                self.literal(lit)?;
            }
            Expr::Index { base, args, .. } => {
                self.expr(base)?;
                self.w("[");
                self.comma_list(a.exprs_list(args), Self::expr)?;
                self.w("]");
            }
            Expr::Paren { expr, .. } => {
                self.w("(");
                self.expr(expr)?;
                self.w(")");
            }
            Expr::Selector { expr, sel } => {
                self.expr(expr)?;
                self.w(".");
                self.name(sel);
            }
            Expr::Slice {
                expr, lo, hi, max, slice3, ..
            } => {
                self.expr(expr)?;
                self.w("[");
                if let Some(lo) = lo {
                    self.expr(lo)?;
                }
                self.w(":");
                if let Some(hi) = hi {
                    self.expr(hi)?;
                }
                if slice3 {
                    self.w(":");
                    if let Some(max) = max {
                        self.expr(max)?;
                    }
                }
                self.w("]");
            }
            Expr::TypeAssert { expr, typ, .. } => {
                self.expr(expr)?;
                self.w(".(");
                match typ {
                    Some(typ) => self.typ(typ)?,
                    None => self.w("type"),
                }
                self.w(")");
            }
            Expr::Call {
                func, args, ellipsis, ..
            } => {
                self.expr(func)?;
                self.w("(");
                self.comma_list(a.exprs_list(args), Self::expr)?;
                if ellipsis.is_some() {
                    self.w("...");
                }
                self.w(")");
            }
            Expr::Unary { op, expr, .. } => {
                let op = op.as_str();
                self.w(op);
                let at = self.out.len();
                self.expr(expr)?;
                // `- -x` must not print as `--x`.
                let glued = matches!(
                    (op.as_bytes().last().copied(), self.out.as_bytes().get(at).copied()),
                    (Some(b'-'), Some(b'-')) | (Some(b'+'), Some(b'+')) | (Some(b'&'), Some(b'&' | b'^'))
                );
                if glued {
                    self.out.insert(at, ' ');
                }
            }
            Expr::Binary { left, op, right, .. } => {
                self.expr(left)?;
                self.w(" ");
                self.w(op.as_str());
                self.w(" ");
                self.expr(right)?;
            }
            Expr::TypeExpr(typ) => self.typ(typ)?,
        }
        Ok(())
    }

    fn literal(&mut self, lit: &LiteralValue) -> Fmt {
        let a = self.a;
        let elems = a.keyed_elems_list(lit.elements);
        let multiline = match elems.first() {
            Some(first) => {
                let from = lit.l_brace.end as usize;
                let to = keyed_element_start(a, first) as usize;
                self.src.get(from..to).is_some_and(|gap| gap.contains('\n'))
            }
            None => self.has_comment_within(lit.l_brace.start, lit.r_brace.start),
        };

        if !multiline {
            self.w("{");
            self.comma_list(elems, |p, elem| p.keyed_element(&elem))?;
            self.w("}");
            return Ok(());
        }

        self.w("{");
        self.indent += 1;
        for elem in elems {
            self.newline();
            self.leading_comments(keyed_element_start(a, elem))?;
            self.keyed_element(elem)?;
            self.w(",");
        }
        self.close(lit.r_brace.start, "}")
    }

    fn keyed_element(&mut self, elem: &KeyedElement) -> Fmt {
        match elem.key {
            Some(Key::FieldName(name)) => {
                self.name(name);
                self.w(": ");
            }
            Some(Key::Expr(e)) => {
                self.expr(e)?;
                self.w(": ");
            }
            Some(Key::Literal(ref lit)) => {
                self.literal(lit)?;
                self.w(": ");
            }
            None => {}
        }
        match elem.value {
            Element::Expr(e) => self.expr(e),
            Element::Literal(ref lit) => self.literal(lit),
        }
    }
}

fn is_empty_stmt(a: &AstArena, id: StmtId) -> bool {
    matches!(a.stmts[id], Stmt::Simple(s) if matches!(a.simple_stmts[s], SimpleStmt::Empty(_)))
}

fn spec_start(a: &AstArena, spec: &Spec) -> u32 {
    match *spec {
        Spec::Import(ref import) => match import.name {
            Some(ImportName::Dot(span) | ImportName::Blank(span)) => span.start,
            Some(ImportName::Name(name)) => name.pos.start,
            None => import.path.raw.start,
        },
        Spec::Value(ref value) => a.ident_names(value.names).first().map_or(0, |n| n.pos.start),
        Spec::Type(ref spec) => spec.name.pos.start,
    }
}

fn interface_elem_start(a: &AstArena, elem: &InterfaceElem) -> u32 {
    match *elem {
        InterfaceElem::Method { name, .. } => name.pos.start,
        InterfaceElem::Embed(ref embed) => a.type_terms(embed.terms).first().map_or(0, |term| match term.tilde_pos {
            Some(tilde) => tilde.start,
            None => a.types.span(term.typ).start,
        }),
    }
}

fn keyed_element_start(a: &AstArena, elem: &KeyedElement) -> u32 {
    match elem.key {
        Some(Key::FieldName(name)) => name.pos.start,
        Some(Key::Expr(e)) => a.exprs.span(e).start,
        Some(Key::Literal(lit)) => lit.l_brace.start,
        None => match elem.value {
            Element::Expr(e) => a.exprs.span(e).start,
            Element::Literal(lit) => lit.l_brace.start,
        },
    }
}
