//! Read-only extraction helpers over a tree's top-level declarations.

use goast_syntax::ast::{FuncDecl, GenDecl, GenDeclKind, ImportName, Spec, Span, TopLevelDecl, Type, TypeId, TypeSpec};
use goast_syntax::{inspect, NodeKind, SyntaxTree};

#[derive(Debug, Clone, Copy)]
pub struct Function<'t> {
    pub name: &'t str,
    /// Base type name of a method receiver (`T` for both `T` and `*T`)
    pub receiver: Option<&'t str>,
    pub decl: &'t FuncDecl,
}

impl Function<'_> {
    pub fn is_method(&self) -> bool {
        self.receiver.is_some()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TypeDecl<'t> {
    pub name: &'t str,
    pub spec: &'t TypeSpec,
}

impl TypeDecl<'_> {
    pub fn is_alias(&self) -> bool {
        self.spec.assign_pos.is_some()
    }

    pub fn is_generic(&self) -> bool {
        self.spec.type_params.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Import<'t> {
    /// Import path without quotes
    pub path: &'t str,
    /// Explicit local name: an identifier, `_` or `.`
    pub name: Option<&'t str>,
}

fn gen_decls(tree: &SyntaxTree, kind: GenDeclKind) -> impl Iterator<Item = &GenDecl> {
    let a = tree.arena();
    a.top_decls(tree.file().decls)
        .iter()
        .filter_map(move |decl| match *decl {
            TopLevelDecl::Decl(id) => Some(&a.decls[id]),
            TopLevelDecl::Func(_) => None,
        })
        .filter(move |decl| decl.kind == kind)
}

fn base_type_name(tree: &SyntaxTree, mut ty: TypeId) -> Option<&str> {
    loop {
        match tree.arena().types[ty] {
            Type::Pointer { elem, .. } => ty = elem,
            Type::Named { name, .. } => return Some(tree.name(name.sym)),
            _ => return None,
        }
    }
}

/// Top-level functions and methods in source order.
pub fn functions(tree: &SyntaxTree) -> Vec<Function<'_>> {
    let a = tree.arena();
    a.top_decls(tree.file().decls)
        .iter()
        .filter_map(|decl| match *decl {
            TopLevelDecl::Func(id) => Some(&a.funcs[id]),
            TopLevelDecl::Decl(_) => None,
        })
        .map(|decl| Function {
            name: tree.name(decl.name.sym),
            receiver: decl.recv.and_then(|recv| base_type_name(tree, recv.typ)),
            decl,
        })
        .collect()
}

pub fn function_names(tree: &SyntaxTree) -> Vec<&str> {
    functions(tree).into_iter().map(|f| f.name).collect()
}

/// Top-level type specs in source order.
pub fn types(tree: &SyntaxTree) -> Vec<TypeDecl<'_>> {
    let a = tree.arena();
    gen_decls(tree, GenDeclKind::Type)
        .flat_map(|decl| a.specs_list(decl.specs))
        .filter_map(|spec| match spec {
            Spec::Type(spec) => Some(TypeDecl {
                name: tree.name(spec.name.sym),
                spec,
            }),
            _ => None,
        })
        .collect()
}

pub fn type_names(tree: &SyntaxTree) -> Vec<&str> {
    types(tree).into_iter().map(|t| t.name).collect()
}

pub fn imports(tree: &SyntaxTree) -> Vec<Import<'_>> {
    let a = tree.arena();
    gen_decls(tree, GenDeclKind::Import)
        .flat_map(|decl| a.specs_list(decl.specs))
        .filter_map(|spec| match spec {
            Spec::Import(spec) => Some(spec),
            _ => None,
        })
        .filter_map(|spec| {
            let path = tree.text(spec.path.raw)?.trim_matches(['"', '`']);
            let name = match spec.name {
                None => None,
                Some(ImportName::Dot(_)) => Some("."),
                Some(ImportName::Blank(_)) => Some("_"),
                Some(ImportName::Name(ident)) => Some(tree.name(ident.sym)),
            };
            Some(Import { path, name })
        })
        .collect()
}

pub fn import_paths(tree: &SyntaxTree) -> Vec<&str> {
    imports(tree).into_iter().map(|i| i.path).collect()
}

/// Spans of every node of `kind`, in walk order.
pub fn find_by_kind(tree: &SyntaxTree, kind: NodeKind) -> Vec<Span> {
    let mut found = Vec::new();
    inspect(tree, |k, span| {
        if k == kind {
            found.push(span);
        }
    });
    found
}
