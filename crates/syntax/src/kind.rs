//! Node kind catalog and the `inspect` walk.
//!
//! The arena AST is more compact than the classic Go node set (a parenthesized
//! result list and a single result type are both `Results`, a dereference is a
//! `Unary`, ...). `inspect` maps it back onto the classic catalog so coverage can
//! be reported in the terms Go programmers know.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ast::*;
use crate::tree::SyntaxTree;
use crate::walk::{Visitor, Walk};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeCategory {
    Expr,
    Type,
    Stmt,
    Decl,
    Spec,
    Structural,
}

impl NodeCategory {
    pub const ALL: [NodeCategory; 6] = [
        Self::Expr,
        Self::Type,
        Self::Stmt,
        Self::Decl,
        Self::Spec,
        Self::Structural,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Expr => "Expressions",
            Self::Type => "Types",
            Self::Stmt => "Statements",
            Self::Decl => "Declarations",
            Self::Spec => "Specifications",
            Self::Structural => "Structural",
        }
    }
}

impl fmt::Display for NodeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

macro_rules! node_kinds {
    ($($cat:ident => [$($kind:ident),* $(,)?]),* $(,)?) => {
        /// Go syntax node kinds.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum NodeKind {
            $($($kind,)*)*
        }

        impl NodeKind {
            /// Every kind, grouped by category.
            pub const ALL: &'static [NodeKind] = &[$($(NodeKind::$kind,)*)*];

            pub const fn name(self) -> &'static str {
                match self {
                    $($(NodeKind::$kind => stringify!($kind),)*)*
                }
            }

            pub const fn category(self) -> NodeCategory {
                match self {
                    $($(NodeKind::$kind => NodeCategory::$cat,)*)*
                }
            }

            pub fn from_name(name: &str) -> Option<NodeKind> {
                match name {
                    $($(stringify!($kind) => Some(NodeKind::$kind),)*)*
                    _ => None,
                }
            }
        }
    };
}

node_kinds! {
    Expr => [
        BadExpr, Ident, Ellipsis, BasicLit, FuncLit, CompositeLit, ParenExpr,
        SelectorExpr, IndexExpr, IndexListExpr, SliceExpr, TypeAssertExpr, CallExpr,
        StarExpr, UnaryExpr, BinaryExpr, KeyValueExpr,
    ],
    Type => [ArrayType, StructType, FuncType, InterfaceType, MapType, ChanType],
    Stmt => [
        BadStmt, DeclStmt, EmptyStmt, LabeledStmt, ExprStmt, SendStmt, IncDecStmt,
        AssignStmt, GoStmt, DeferStmt, ReturnStmt, BranchStmt, BlockStmt, IfStmt,
        CaseClause, SwitchStmt, TypeSwitchStmt, CommClause, SelectStmt, ForStmt,
        RangeStmt,
    ],
    Decl => [BadDecl, GenDecl, FuncDecl],
    Spec => [ImportSpec, ValueSpec, TypeSpec],
    Structural => [Comment, CommentGroup, Field, FieldList, File, Package],
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Calls `f` once for every node of `tree`, in depth-first order.
///
/// `Package` is never reported: it describes a directory, not a file.
pub fn inspect(tree: &SyntaxTree, f: impl FnMut(NodeKind, Span)) {
    let mut inspector = Inspector { emit: f };
    let file = tree.file();
    (inspector.emit)(NodeKind::File, Span::new(file.package_pos.start as usize, tree.source().len()));
    inspector.visit_source_file(tree.arena(), file);
}

/// Number of nodes `inspect` reports for `tree`.
pub fn node_count(tree: &SyntaxTree) -> usize {
    let mut n = 0;
    inspect(tree, |_, _| n += 1);
    n
}

struct Inspector<F> {
    emit: F,
}

impl<F: FnMut(NodeKind, Span)> Inspector<F> {
    #[inline]
    fn emit(&mut self, kind: NodeKind, span: Span) {
        (self.emit)(kind, span);
    }

    /// A union `A | ~B | C` is a chain of binary expressions over its terms.
    fn type_elem<'ast>(&mut self, a: &'ast AstArena, elem: &TypeElem) {
        let terms = a.type_terms(elem.terms);
        let Some(first) = terms.first() else { return };
        let start = term_span(a, first);
        for (i, term) in terms.iter().enumerate() {
            let span = term_span(a, term);
            if i > 0 {
                self.emit(NodeKind::BinaryExpr, start.to(span));
            }
            if term.tilde_pos.is_some() {
                self.emit(NodeKind::UnaryExpr, span);
            }
            self.visit_type(a, term.typ);
        }
    }

    fn single_field(&mut self, span: Span) {
        self.emit(NodeKind::FieldList, span);
        self.emit(NodeKind::Field, span);
    }
}

impl<'ast, F: FnMut(NodeKind, Span)> Visitor<'ast> for Inspector<F> {
    fn visit_ident(&mut self, _a: &'ast AstArena, name: IdentName) {
        self.emit(NodeKind::Ident, name.pos);
    }

    fn visit_comment_group(&mut self, a: &'ast AstArena, id: CommentGroupId) {
        self.emit(NodeKind::CommentGroup, a.comment_groups.span(id));
        a.comment_groups[id].walk(a, self);
    }

    fn visit_comment(&mut self, a: &'ast AstArena, id: CommentId) {
        self.emit(NodeKind::Comment, a.comments.span(id));
    }

    fn visit_decl(&mut self, a: &'ast AstArena, id: DeclId) {
        self.emit(NodeKind::GenDecl, a.decls.span(id));
        a.decls[id].walk(a, self);
    }

    fn visit_spec(&mut self, a: &'ast AstArena, spec: &Spec) {
        match *spec {
            Spec::Import(ref import) => {
                let start = match import.name {
                    Some(ImportName::Dot(span) | ImportName::Blank(span)) => {
                        self.emit(NodeKind::Ident, span);
                        span
                    }
                    Some(ImportName::Name(name)) => {
                        self.visit_ident(a, name);
                        name.pos
                    }
                    None => import.path.raw,
                };
                self.emit(NodeKind::ImportSpec, start.to(import.path.raw));
                self.emit(NodeKind::BasicLit, import.path.raw);
            }
            Spec::Value(ref value) => {
                let names = a.ident_names(value.names);
                let mut span = names.first().map_or_else(Span::default, |n| n.pos);
                if let Some(last) = names.last() {
                    span = span.to(last.pos);
                }
                if let Some(typ) = value.typ {
                    span = span.to(a.types.span(typ));
                }
                if let Some(&last) = a.exprs_list(value.values).last() {
                    span = span.to(a.exprs.span(last));
                }
                self.emit(NodeKind::ValueSpec, span);
                spec.walk_children(a, self);
            }
            Spec::Type(ref ts) => {
                self.emit(NodeKind::TypeSpec, ts.name.pos.to(a.types.span(ts.typ)));
                spec.walk_children(a, self);
            }
        }
    }

    fn visit_func_decl(&mut self, a: &'ast AstArena, id: FuncDeclId) {
        self.emit(NodeKind::FuncDecl, a.funcs.span(id));
        a.funcs[id].walk(a, self);
    }

    fn visit_receiver(&mut self, a: &'ast AstArena, recv: &Receiver) {
        self.emit(NodeKind::FieldList, recv.l_paren.to(recv.r_paren));
        let typ = a.types.span(recv.typ);
        let start = recv.name.map_or(typ, |n| n.pos);
        match recv.type_params {
            Some(params) => {
                self.emit(NodeKind::Field, start.to(params.r_brack));
                let kind = if params.names.len() == 1 {
                    NodeKind::IndexExpr
                } else {
                    NodeKind::IndexListExpr
                };
                self.emit(kind, typ.to(params.r_brack));
            }
            None => self.emit(NodeKind::Field, start.to(typ)),
        }
        recv.walk_children(a, self);
    }

    fn visit_type_params(&mut self, a: &'ast AstArena, id: TypeParamsId) {
        self.emit(NodeKind::FieldList, a.type_params.span(id));
        a.type_params[id].walk(a, self);
    }

    fn visit_type_param_decl(&mut self, a: &'ast AstArena, id: TypeParamDeclId) {
        self.emit(NodeKind::Field, a.type_param_decls.span(id));
        let decl = a.type_param_decls[id];
        decl.names.walk(a, self);
        self.type_elem(a, &decl.constraint);
    }

    fn visit_signature(&mut self, a: &'ast AstArena, id: SignatureId) {
        self.emit(NodeKind::FuncType, a.signatures.span(id));
        let sig = a.signatures[id];
        self.visit_field_list(a, &sig.params);
        match sig.results {
            Some(Results::Params(ref list)) => self.visit_field_list(a, list),
            Some(Results::Type(typ)) => {
                self.single_field(a.types.span(typ));
                self.visit_type(a, typ);
            }
            None => {}
        }
    }

    fn visit_field_list(&mut self, a: &'ast AstArena, list: &FieldList) {
        self.emit(NodeKind::FieldList, list.l_paren.to(list.r_paren));
        list.walk_children(a, self);
    }

    fn visit_field(&mut self, a: &'ast AstArena, id: FieldId) {
        let field = a.fields[id];
        self.emit(NodeKind::Field, a.fields.span(id));
        if let Some(ellipsis) = field.ellipsis_pos {
            self.emit(NodeKind::Ellipsis, ellipsis.to(a.types.span(field.typ)));
        }
        if let Some(tag) = field.tag {
            self.emit(NodeKind::BasicLit, tag.raw);
        }
        field.walk(a, self);
    }

    fn visit_block(&mut self, a: &'ast AstArena, block: &Block) {
        self.emit(NodeKind::BlockStmt, block.l_brace.to(block.r_brace));
        block.walk_children(a, self);
    }

    fn visit_stmt(&mut self, a: &'ast AstArena, id: StmtId) {
        let span = a.stmts.span(id);
        let stmt = &a.stmts[id];
        match *stmt {
            // Reported by their own hooks.
            Stmt::Simple(_) | Stmt::Block(_) => {}
            Stmt::Decl(_) => self.emit(NodeKind::DeclStmt, span),
            Stmt::Labeled { .. } => self.emit(NodeKind::LabeledStmt, span),
            Stmt::Go { .. } => self.emit(NodeKind::GoStmt, span),
            Stmt::Defer { .. } => self.emit(NodeKind::DeferStmt, span),
            Stmt::Return { .. } => self.emit(NodeKind::ReturnStmt, span),
            Stmt::Branch(_) => self.emit(NodeKind::BranchStmt, span),
            Stmt::If { .. } => self.emit(NodeKind::IfStmt, span),
            Stmt::For { kind, .. } => match kind {
                ForKind::Range { .. } => self.emit(NodeKind::RangeStmt, span),
                _ => self.emit(NodeKind::ForStmt, span),
            },
            Stmt::Switch { l_brace, r_brace, .. } => {
                self.emit(NodeKind::SwitchStmt, span);
                self.emit(NodeKind::BlockStmt, l_brace.to(r_brace));
            }
            Stmt::TypeSwitch {
                guard, l_brace, r_brace, ..
            } => {
                self.emit(NodeKind::TypeSwitchStmt, span);
                self.emit(NodeKind::BlockStmt, l_brace.to(r_brace));
                let x = a.exprs.span(guard.x);
                match guard.bind {
                    Some(bind) => self.emit(NodeKind::AssignStmt, bind.pos.to(x)),
                    None => self.emit(NodeKind::ExprStmt, x),
                }
                self.emit(NodeKind::TypeAssertExpr, x);
            }
            Stmt::Select { l_brace, r_brace, .. } => {
                self.emit(NodeKind::SelectStmt, span);
                self.emit(NodeKind::BlockStmt, l_brace.to(r_brace));
            }
        }
        stmt.walk(a, self);
    }

    fn visit_simple_stmt(&mut self, a: &'ast AstArena, id: SimpleStmtId) {
        let kind = match a.simple_stmts[id] {
            SimpleStmt::Empty(_) => NodeKind::EmptyStmt,
            SimpleStmt::Expr(_) => NodeKind::ExprStmt,
            SimpleStmt::Send { .. } => NodeKind::SendStmt,
            SimpleStmt::IncDec { .. } => NodeKind::IncDecStmt,
            SimpleStmt::Assign { .. } | SimpleStmt::ShortVarDecl { .. } => NodeKind::AssignStmt,
        };
        self.emit(kind, a.simple_stmts.span(id));
        a.simple_stmts[id].walk(a, self);
    }

    fn visit_switch_clause(&mut self, a: &'ast AstArena, id: SwitchClauseId) {
        self.emit(NodeKind::CaseClause, a.switch_clauses.span(id));
        a.switch_clauses[id].walk(a, self);
    }

    fn visit_comm_clause(&mut self, a: &'ast AstArena, id: CommClauseId) {
        self.emit(NodeKind::CommClause, a.comm_clauses.span(id));
        a.comm_clauses[id].walk(a, self);
    }

    fn visit_expr(&mut self, a: &'ast AstArena, id: ExprId) {
        let span = a.exprs.span(id);
        let expr = &a.exprs[id];
        let kind = match *expr {
            Expr::Ident(_) | Expr::TypeExpr(_) => None,
            Expr::BasicLit(_) => Some(NodeKind::BasicLit),
            Expr::FuncLit { .. } => Some(NodeKind::FuncLit),
            Expr::CompositeLit { .. } => Some(NodeKind::CompositeLit),
            Expr::Index { args, .. } if args.len() > 1 => Some(NodeKind::IndexListExpr),
            Expr::Index { .. } => Some(NodeKind::IndexExpr),
            Expr::Paren { .. } => Some(NodeKind::ParenExpr),
            Expr::Selector { .. } => Some(NodeKind::SelectorExpr),
            Expr::Slice { .. } => Some(NodeKind::SliceExpr),
            Expr::TypeAssert { .. } => Some(NodeKind::TypeAssertExpr),
            Expr::Call { .. } => Some(NodeKind::CallExpr),
            Expr::Unary { op: UnaryOp::Deref, .. } => Some(NodeKind::StarExpr),
            Expr::Unary { .. } => Some(NodeKind::UnaryExpr),
            Expr::Binary { .. } => Some(NodeKind::BinaryExpr),
        };
        if let Some(kind) = kind {
            self.emit(kind, span);
        }
        expr.walk(a, self);
    }

    fn visit_keyed_element(&mut self, a: &'ast AstArena, elem: &KeyedElement) {
        let value = match elem.value {
            Element::Expr(e) => a.exprs.span(e),
            Element::Literal(lit) => lit.l_brace.to(lit.r_brace),
        };
        if let Some(key) = elem.key {
            let key = match key {
                Key::FieldName(name) => name.pos,
                Key::Expr(e) => a.exprs.span(e),
                Key::Literal(lit) => {
                    let span = lit.l_brace.to(lit.r_brace);
                    self.emit(NodeKind::CompositeLit, span);
                    span
                }
            };
            self.emit(NodeKind::KeyValueExpr, key.to(value));
        }
        if let Element::Literal(_) = elem.value {
            self.emit(NodeKind::CompositeLit, value);
        }
        elem.walk_children(a, self);
    }

    fn visit_type(&mut self, a: &'ast AstArena, id: TypeId) {
        let span = a.types.span(id);
        let typ = &a.types[id];
        match *typ {
            Type::Named { pkg, name, args } => {
                if let Some(pkg) = pkg {
                    self.emit(NodeKind::SelectorExpr, pkg.pos.to(name.pos));
                }
                match args.len() {
                    0 => {}
                    1 => self.emit(NodeKind::IndexExpr, span),
                    _ => self.emit(NodeKind::IndexListExpr, span),
                }
            }
            Type::Pointer { .. } => self.emit(NodeKind::StarExpr, span),
            Type::Array { len, .. } => {
                self.emit(NodeKind::ArrayType, span);
                if let ArrayLen::Ellipsis(dots) = len {
                    self.emit(NodeKind::Ellipsis, dots);
                }
            }
            Type::Slice { .. } => self.emit(NodeKind::ArrayType, span),
            Type::Map { .. } => self.emit(NodeKind::MapType, span),
            Type::Chan { .. } => self.emit(NodeKind::ChanType, span),
            Type::Struct { l_brace, r_brace, .. } => {
                self.emit(NodeKind::StructType, span);
                self.emit(NodeKind::FieldList, l_brace.to(r_brace));
            }
            Type::Interface {
                l_brace, elems, r_brace, ..
            } => {
                self.emit(NodeKind::InterfaceType, span);
                self.emit(NodeKind::FieldList, l_brace.to(r_brace));
                for elem in a.interface_elems(elems) {
                    match *elem {
                        InterfaceElem::Method { name, sig } => {
                            self.emit(NodeKind::Field, name.pos.to(a.signatures.span(sig)));
                            self.visit_ident(a, name);
                            self.visit_signature(a, sig);
                        }
                        InterfaceElem::Embed(ref embed) => {
                            let terms = a.type_terms(embed.terms);
                            if let (Some(first), Some(last)) = (terms.first(), terms.last()) {
                                self.emit(NodeKind::Field, term_span(a, first).to(term_span(a, last)));
                            }
                            self.type_elem(a, embed);
                        }
                    }
                }
                return;
            }
            // The signature hook reports the FuncType.
            Type::Func { .. } => {}
            Type::Paren { .. } => self.emit(NodeKind::ParenExpr, span),
        }
        typ.walk(a, self);
    }
}

fn term_span(a: &AstArena, term: &TypeTerm) -> Span {
    let typ = a.types.span(term.typ);
    term.tilde_pos.map_or(typ, |tilde| tilde.to(typ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_56_distinct_kinds() {
        assert_eq!(NodeKind::ALL.len(), 56);
        let mut names: Vec<_> = NodeKind::ALL.iter().map(|k| k.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 56);
    }

    #[test]
    fn names_round_trip() {
        for &kind in NodeKind::ALL {
            assert_eq!(NodeKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(NodeKind::from_name("Nope"), None);
    }

    #[test]
    fn category_sizes() {
        let count = |cat| NodeKind::ALL.iter().filter(|k| k.category() == cat).count();
        assert_eq!(count(NodeCategory::Expr), 17);
        assert_eq!(count(NodeCategory::Type), 6);
        assert_eq!(count(NodeCategory::Stmt), 21);
        assert_eq!(count(NodeCategory::Decl), 3);
        assert_eq!(count(NodeCategory::Spec), 3);
        assert_eq!(count(NodeCategory::Structural), 6);
    }
}
