//! Scope and object resolution.
//!
//! Resolution is a side table keyed by identifier occurrence (its start offset).
//! Objects point back at their declaring occurrence by span, so the tree itself
//! stays acyclic plain data.
//!
//! The rules follow Go's legacy `ast.Object` resolution: package-level names live
//! in the file scope and are bound to forward references once the whole file has
//! been walked; imports, method names, selectors and universe names are never
//! resolved; `_` is never entered in a scope.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::ast::*;
use crate::walk::{Visitor, Walk};

pub type ObjId = Id<Object>;
pub type ScopeId = Id<Scope>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjKind {
    Package,
    Const,
    Type,
    Var,
    Func,
    Label,
}

impl ObjKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Package => "package",
            Self::Const => "const",
            Self::Type => "type",
            Self::Var => "var",
            Self::Func => "func",
            Self::Label => "label",
        }
    }
}

/// A declared entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Object {
    pub kind: ObjKind,
    pub name: Symbol,
    /// Span of the declaring occurrence
    pub decl: Span,
    /// Receiver type parameters are in scope but never recorded as the
    /// resolution of an occurrence.
    pub receiver_param: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Scope {
    pub outer: Option<ScopeId>,
    names: HashMap<Symbol, ObjId>,
}

impl Scope {
    fn new(outer: Option<ScopeId>) -> Self {
        Self {
            outer,
            names: HashMap::new(),
        }
    }

    #[inline]
    pub fn lookup(&self, name: Symbol) -> Option<ObjId> {
        self.names.get(&name).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, ObjId)> + '_ {
        self.names.iter().map(|(&sym, &obj)| (sym, obj))
    }
}

/// Scope graph and occurrence bindings of one file.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    objects: Vec<Object>,
    scopes: Vec<Scope>,
    refs: HashMap<u32, ObjId>,
    file_scope: Option<ScopeId>,
    unresolved: Vec<IdentName>,
}

impl Resolution {
    #[inline]
    pub fn object(&self, id: ObjId) -> &Object {
        &self.objects[id.to_usize()]
    }

    #[inline]
    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    #[inline]
    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.to_usize()]
    }

    #[inline]
    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    pub fn file_scope(&self) -> Option<&Scope> {
        self.file_scope.map(|id| self.scope(id))
    }

    /// Object an identifier occurrence refers to or declares.
    #[inline]
    pub fn lookup(&self, occurrence: IdentName) -> Option<ObjId> {
        self.refs.get(&occurrence.pos.start).copied()
    }

    #[inline]
    pub fn is_resolved(&self, occurrence: IdentName) -> bool {
        self.refs.contains_key(&occurrence.pos.start)
    }

    /// Occurrences bound to an object (declarations included).
    #[inline]
    pub fn binding_count(&self) -> usize {
        self.refs.len()
    }

    /// Identifiers bound neither locally nor in the file scope, in walk order.
    #[inline]
    pub fn unresolved(&self) -> &[IdentName] {
        &self.unresolved
    }

    fn new_object(&mut self, object: Object) -> ObjId {
        let id = Id::from_raw(self.objects.len() as u32);
        self.objects.push(object);
        id
    }

    fn new_scope(&mut self, outer: Option<ScopeId>) -> ScopeId {
        let id = Id::from_raw(self.scopes.len() as u32);
        self.scopes.push(Scope::new(outer));
        id
    }
}

/// Builds the resolution for a parsed file.
pub fn resolve_file(arena: &AstArena, interner: &Interner, file: &SourceFile) -> Resolution {
    let mut resolver = Resolver {
        res: Resolution::default(),
        top: None,
        labels: Vec::new(),
        targets: Vec::new(),
        blank: interner.get("_"),
        init: interner.get("init"),
    };

    let file_scope = resolver.open_scope();
    resolver.res.file_scope = Some(file_scope);
    file.decls.walk(arena, &mut resolver);
    resolver.close_scope();
    debug_assert!(resolver.top.is_none());
    debug_assert!(resolver.labels.is_empty());

    // Forward references to package-level names.
    let pending = std::mem::take(&mut resolver.res.unresolved);
    let mut unresolved = Vec::with_capacity(pending.len());
    for ident in pending {
        match resolver.res.scope(file_scope).lookup(ident.sym) {
            Some(obj) => {
                resolver.res.refs.insert(ident.pos.start, obj);
            }
            None => unresolved.push(ident),
        }
    }
    resolver.res.unresolved = unresolved;

    log::trace!(
        "resolved {} occurrences, {} unresolved, {} scopes",
        resolver.res.refs.len(),
        resolver.res.unresolved.len(),
        resolver.res.scopes.len()
    );
    resolver.res
}

struct Resolver {
    res: Resolution,
    top: Option<ScopeId>,
    /// One label scope per function body
    labels: Vec<HashMap<Symbol, ObjId>>,
    /// Branch statements waiting for their label scope to close
    targets: Vec<Vec<IdentName>>,
    blank: Option<Symbol>,
    init: Option<Symbol>,
}

impl Resolver {
    #[inline]
    fn is_blank(&self, name: IdentName) -> bool {
        Some(name.sym) == self.blank
    }

    fn open_scope(&mut self) -> ScopeId {
        let id = self.res.new_scope(self.top);
        self.top = Some(id);
        id
    }

    fn close_scope(&mut self) {
        self.top = self.top.and_then(|id| self.res.scope(id).outer);
    }

    fn scoped(&mut self, f: impl FnOnce(&mut Self)) {
        self.open_scope();
        f(self);
        self.close_scope();
    }

    fn declare_in(&mut self, scope: Option<ScopeId>, kind: ObjKind, name: IdentName, receiver_param: bool) {
        let obj = self.res.new_object(Object {
            kind,
            name: name.sym,
            decl: name.pos,
            receiver_param,
        });
        if !receiver_param {
            self.res.refs.insert(name.pos.start, obj);
        }
        if self.is_blank(name) {
            return;
        }
        if let Some(scope) = scope {
            // The first declaration wins.
            self.res.scopes[scope.to_usize()].names.entry(name.sym).or_insert(obj);
        }
    }

    fn declare(&mut self, kind: ObjKind, names: &[IdentName]) {
        for &name in names {
            self.declare_in(self.top, kind, name, false);
        }
    }

    fn resolve(&mut self, name: IdentName, collect: bool) {
        if self.is_blank(name) {
            return;
        }
        let mut scope = self.top;
        while let Some(id) = scope {
            let s = self.res.scope(id);
            if let Some(obj) = s.lookup(name.sym) {
                if !self.res.object(obj).receiver_param {
                    self.res.refs.insert(name.pos.start, obj);
                }
                return;
            }
            scope = s.outer;
        }
        if collect {
            self.res.unresolved.push(name);
        }
    }

    /// `:=` binds every name; names already declared in the current scope are
    /// reused instead of redeclared.
    fn short_var_decl(&mut self, names: &[IdentName]) {
        for &name in names {
            let obj = self.res.new_object(Object {
                kind: ObjKind::Var,
                name: name.sym,
                decl: name.pos,
                receiver_param: false,
            });
            let mut bound = obj;
            if !self.is_blank(name) {
                if let Some(top) = self.top {
                    match self.res.scopes[top.to_usize()].names.entry(name.sym) {
                        Entry::Occupied(existing) => bound = *existing.get(),
                        Entry::Vacant(slot) => {
                            slot.insert(obj);
                        }
                    }
                }
            }
            self.res.refs.insert(name.pos.start, bound);
        }
    }

    fn open_label_scope(&mut self) {
        self.labels.push(HashMap::new());
        self.targets.push(Vec::new());
    }

    fn close_label_scope(&mut self) {
        let scope = self.labels.pop().unwrap_or_default();
        for target in self.targets.pop().unwrap_or_default() {
            if let Some(&obj) = scope.get(&target.sym) {
                self.res.refs.insert(target.pos.start, obj);
            }
        }
    }

    fn declare_label(&mut self, label: IdentName) {
        let obj = self.res.new_object(Object {
            kind: ObjKind::Label,
            name: label.sym,
            decl: label.pos,
            receiver_param: false,
        });
        self.res.refs.insert(label.pos.start, obj);
        if self.is_blank(label) {
            return;
        }
        if let Some(scope) = self.labels.last_mut() {
            scope.entry(label.sym).or_insert(obj);
        }
    }

    // -------------------------------------------------------------------------
    // Field lists
    // -------------------------------------------------------------------------

    fn resolve_fields<'ast>(&mut self, a: &'ast AstArena, fields: ListRef<FieldId>) {
        for &field in a.fields_list(fields) {
            self.visit_type(a, a.fields[field].typ);
        }
    }

    fn declare_fields(&mut self, a: &AstArena, fields: ListRef<FieldId>, kind: ObjKind) {
        for &field in a.fields_list(fields) {
            self.declare(kind, a.ident_names(a.fields[field].names));
        }
    }

    fn resolve_results<'ast>(&mut self, a: &'ast AstArena, results: Option<Results>) {
        match results {
            Some(Results::Params(list)) => self.resolve_fields(a, list.fields),
            Some(Results::Type(t)) => self.visit_type(a, t),
            None => {}
        }
    }

    fn declare_results(&mut self, a: &AstArena, results: Option<Results>) {
        if let Some(Results::Params(list)) = results {
            self.declare_fields(a, list.fields, ObjKind::Var);
        }
    }

    /// Parameter and result types first, then their names.
    fn walk_signature<'ast>(&mut self, a: &'ast AstArena, sig: SignatureId) {
        let sig = a.signatures[sig];
        self.resolve_fields(a, sig.params.fields);
        self.resolve_results(a, sig.results);
        self.declare_fields(a, sig.params.fields, ObjKind::Var);
        self.declare_results(a, sig.results);
    }

    /// Type parameter names are in scope for their own constraints.
    fn walk_type_params<'ast>(&mut self, a: &'ast AstArena, id: TypeParamsId) {
        let params = a.type_param_decl_ids(a.type_params[id].params);
        for &decl in params {
            self.declare(ObjKind::Type, a.ident_names(a.type_param_decls[decl].names));
        }
        for &decl in params {
            a.type_param_decls[decl].constraint.walk(a, self);
        }
    }

    fn walk_body<'ast>(&mut self, a: &'ast AstArena, body: &Block) {
        self.open_label_scope();
        body.stmts.walk(a, self);
        self.close_label_scope();
    }

    fn walk_literal<'ast>(&mut self, a: &'ast AstArena, lit: &LiteralValue) {
        for elem in a.keyed_elems_list(lit.elements) {
            match elem.key {
                Some(Key::FieldName(name)) => self.resolve(name, false),
                Some(Key::Expr(e)) => self.visit_expr(a, e),
                Some(Key::Literal(ref l)) => self.walk_literal(a, l),
                None => {}
            }
            match elem.value {
                Element::Expr(e) => self.visit_expr(a, e),
                Element::Literal(ref l) => self.walk_literal(a, l),
            }
        }
    }

    fn walk_gen_decl<'ast>(&mut self, a: &'ast AstArena, decl: &GenDecl) {
        // Scopes opened for type parameters stay open until the declaration ends.
        let mut opened = 0;
        for spec in a.specs_list(decl.specs) {
            match *spec {
                Spec::Import(_) => {}
                Spec::Value(ref value) => {
                    value.values.walk(a, self);
                    value.typ.walk(a, self);
                    let kind = if decl.kind == GenDeclKind::Const {
                        ObjKind::Const
                    } else {
                        ObjKind::Var
                    };
                    self.declare(kind, a.ident_names(value.names));
                }
                Spec::Type(ref spec) => {
                    self.declare_in(self.top, ObjKind::Type, spec.name, false);
                    if let Some(params) = spec.type_params {
                        self.open_scope();
                        opened += 1;
                        self.walk_type_params(a, params);
                    }
                    self.visit_type(a, spec.typ);
                }
            }
        }
        for _ in 0..opened {
            self.close_scope();
        }
    }

    fn walk_clause_body<'ast>(&mut self, a: &'ast AstArena, stmts: ListRef<StmtId>) {
        self.scoped(|r| stmts.walk(a, r));
    }
}

impl<'ast> Visitor<'ast> for Resolver {
    fn visit_ident(&mut self, _a: &'ast AstArena, name: IdentName) {
        self.resolve(name, true);
    }

    fn visit_decl(&mut self, a: &'ast AstArena, id: DeclId) {
        self.walk_gen_decl(a, &a.decls[id]);
    }

    fn visit_func_decl(&mut self, a: &'ast AstArena, id: FuncDeclId) {
        let func = a.funcs[id];
        self.open_scope();

        if let Some(recv) = func.recv {
            if let Some(params) = recv.type_params {
                for &name in a.ident_names(params.names) {
                    self.declare_in(self.top, ObjKind::Type, name, true);
                }
            }
            self.visit_type(a, recv.typ);
        }
        if let Some(params) = func.type_params {
            self.walk_type_params(a, params);
        }

        let sig = a.signatures[func.signature];
        self.resolve_fields(a, sig.params.fields);
        self.resolve_results(a, sig.results);
        if let Some(name) = func.recv.and_then(|recv| recv.name) {
            self.declare(ObjKind::Var, &[name]);
        }
        self.declare_fields(a, sig.params.fields, ObjKind::Var);
        self.declare_results(a, sig.results);

        if let Some(body) = &func.body {
            self.walk_body(a, body);
        }
        self.close_scope();

        if func.recv.is_none() && Some(func.name.sym) != self.init {
            let file_scope = self.res.file_scope;
            self.declare_in(file_scope, ObjKind::Func, func.name, false);
        }
    }

    fn visit_block(&mut self, a: &'ast AstArena, block: &Block) {
        self.scoped(|r| block.stmts.walk(a, r));
    }

    fn visit_simple_stmt(&mut self, a: &'ast AstArena, id: SimpleStmtId) {
        match a.simple_stmts[id] {
            SimpleStmt::Assign { lhs, rhs, .. } => {
                rhs.walk(a, self);
                lhs.walk(a, self);
            }
            SimpleStmt::ShortVarDecl { names, values, .. } => {
                values.walk(a, self);
                self.short_var_decl(a.ident_names(names));
            }
            ref other => other.walk(a, self),
        }
    }

    fn visit_stmt(&mut self, a: &'ast AstArena, id: StmtId) {
        match a.stmts[id] {
            Stmt::Labeled { label, stmt, .. } => {
                self.declare_label(label);
                self.visit_stmt(a, stmt);
            }
            Stmt::Branch(branch) => {
                if let (Some(label), Some(targets)) = (branch.label, self.targets.last_mut()) {
                    if branch.kind != BranchKind::Fallthrough {
                        targets.push(label);
                    }
                }
            }
            Stmt::If {
                init,
                cond,
                ref then_block,
                else_stmt,
                ..
            } => self.scoped(|r| {
                init.walk(a, r);
                r.visit_expr(a, cond);
                r.visit_block(a, then_block);
                else_stmt.walk(a, r);
            }),
            Stmt::For { kind, ref block, .. } => self.scoped(|r| {
                match kind {
                    ForKind::Infinite => {}
                    ForKind::Cond(cond) => r.visit_expr(a, cond),
                    ForKind::ForClause { init, cond, post } => {
                        init.walk(a, r);
                        cond.walk(a, r);
                        post.walk(a, r);
                    }
                    ForKind::Range { lhs, expr, .. } => {
                        r.visit_expr(a, expr);
                        match lhs {
                            Some(RangeLhs::Def { idents, .. }) => r.short_var_decl(a.ident_names(idents)),
                            Some(RangeLhs::Assign { exprs, .. }) => exprs.walk(a, r),
                            None => {}
                        }
                    }
                }
                r.visit_block(a, block);
            }),
            Stmt::Switch {
                init, tag, clauses, ..
            } => self.scoped(|r| {
                init.walk(a, r);
                // An initialized tag gets its own scope around the clauses.
                let extra = init.is_some() && tag.is_some();
                if extra {
                    r.open_scope();
                }
                tag.walk(a, r);
                clauses.walk(a, r);
                if extra {
                    r.close_scope();
                }
            }),
            Stmt::TypeSwitch {
                init, guard, clauses, ..
            } => {
                if init.is_some() {
                    self.open_scope();
                    init.walk(a, self);
                }
                self.scoped(|r| {
                    r.visit_expr(a, guard.x);
                    if let Some(bind) = guard.bind {
                        r.short_var_decl(&[bind]);
                    }
                    clauses.walk(a, r);
                });
                if init.is_some() {
                    self.close_scope();
                }
            }
            ref other => other.walk(a, self),
        }
    }

    fn visit_switch_clause(&mut self, a: &'ast AstArena, id: SwitchClauseId) {
        match a.switch_clauses[id] {
            SwitchClause::ExprCase { items, stmts, .. } => {
                items.walk(a, self);
                self.walk_clause_body(a, stmts);
            }
            SwitchClause::TypeCase { items, stmts, .. } => {
                items.walk(a, self);
                self.walk_clause_body(a, stmts);
            }
        }
    }

    fn visit_comm_clause(&mut self, a: &'ast AstArena, id: CommClauseId) {
        let clause = a.comm_clauses[id];
        self.scoped(|r| {
            clause.comm.walk(a, r);
            clause.stmts.walk(a, r);
        });
    }

    fn visit_expr(&mut self, a: &'ast AstArena, id: ExprId) {
        match a.exprs[id] {
            Expr::Selector { expr, .. } => self.visit_expr(a, expr),
            Expr::FuncLit { sig, ref body, .. } => self.scoped(|r| {
                r.walk_signature(a, sig);
                r.walk_body(a, body);
            }),
            Expr::CompositeLit { typ, ref lit } => {
                self.visit_expr(a, typ);
                self.walk_literal(a, lit);
            }
            ref other => other.walk(a, self),
        }
    }

    fn visit_type(&mut self, a: &'ast AstArena, id: TypeId) {
        match a.types[id] {
            Type::Named { pkg, name, args } => {
                self.resolve(pkg.unwrap_or(name), true);
                args.walk(a, self);
            }
            Type::Struct { fields, .. } => self.scoped(|r| {
                r.resolve_fields(a, fields);
                r.declare_fields(a, fields, ObjKind::Var);
            }),
            Type::Interface { elems, .. } => self.scoped(|r| {
                let elems = a.interface_elems(elems);
                for elem in elems {
                    match *elem {
                        InterfaceElem::Method { sig, .. } => r.scoped(|r| r.walk_signature(a, sig)),
                        InterfaceElem::Embed(ref embed) => embed.walk(a, r),
                    }
                }
                for elem in elems {
                    if let InterfaceElem::Method { name, .. } = *elem {
                        r.declare(ObjKind::Func, &[name]);
                    }
                }
            }),
            Type::Func { sig, .. } => self.scoped(|r| r.walk_signature(a, sig)),
            ref other => other.walk(a, self),
        }
    }
}
