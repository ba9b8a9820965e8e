//! Depth-first traversal over the arena AST.
//!
//! Nodes implement `Walk` (mostly through `#[derive(WalkAst)]`). Arena ids
//! dispatch to a `Visitor` hook named after the node; so do the few inline node
//! types marked `#[walk(hook = ..)]`. A hook that wants the default descent calls
//! `walk` on the arena node or `walk_children` on the inline one.

use crate::ast::*;

pub trait Walk<'ast> {
    fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V);
}

/// Default hooks for nodes that live in an arena: look the id up and walk it.
macro_rules! arena_hooks {
    ($lt:lifetime; $($visit:ident($id:ty) => $arena:ident),* $(,)?) => {
        $(
            #[inline(always)]
            fn $visit(&mut self, a: &$lt AstArena, id: $id) {
                a.$arena[id].walk(a, self);
            }
        )*
    };
}

/// Default hooks for inline nodes carrying a `walk_children`.
macro_rules! inline_hooks {
    ($lt:lifetime; $($visit:ident(&$node:ty)),* $(,)?) => {
        $(
            #[inline(always)]
            fn $visit(&mut self, a: &$lt AstArena, node: &$node) {
                node.walk_children(a, self);
            }
        )*
    };
}

pub trait Visitor<'ast> {
    #[inline(always)]
    fn visit_source_file(&mut self, a: &'ast AstArena, f: &SourceFile) {
        f.walk(a, self);
    }

    arena_hooks! { 'ast;
        visit_decl(DeclId) => decls,
        visit_func_decl(FuncDeclId) => funcs,
        visit_stmt(StmtId) => stmts,
        visit_simple_stmt(SimpleStmtId) => simple_stmts,
        visit_expr(ExprId) => exprs,
        visit_type(TypeId) => types,
        visit_field(FieldId) => fields,
        visit_signature(SignatureId) => signatures,
        visit_switch_clause(SwitchClauseId) => switch_clauses,
        visit_comm_clause(CommClauseId) => comm_clauses,
        visit_type_params(TypeParamsId) => type_params,
        visit_type_param_decl(TypeParamDeclId) => type_param_decls,
        visit_comment(CommentId) => comments,
        visit_comment_group(CommentGroupId) => comment_groups,
    }

    inline_hooks! { 'ast;
        visit_spec(&Spec),
        visit_block(&Block),
        visit_keyed_element(&KeyedElement),
        visit_field_list(&FieldList),
        visit_receiver(&Receiver),
    }

    /// Every identifier occurrence, in source order.
    #[inline(always)]
    fn visit_ident(&mut self, _a: &'ast AstArena, _name: IdentName) {}
}

// Ids are walked by handing them to their hook.
macro_rules! dispatch_to_hook {
    ($($node:ty => $visit:ident),* $(,)?) => {
        $(
            impl<'ast> Walk<'ast> for $node {
                #[inline(always)]
                fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V) {
                    v.$visit(a, *self);
                }
            }
        )*
    };
}

dispatch_to_hook! {
    DeclId => visit_decl,
    FuncDeclId => visit_func_decl,
    StmtId => visit_stmt,
    SimpleStmtId => visit_simple_stmt,
    ExprId => visit_expr,
    TypeId => visit_type,
    FieldId => visit_field,
    SignatureId => visit_signature,
    SwitchClauseId => visit_switch_clause,
    CommClauseId => visit_comm_clause,
    TypeParamsId => visit_type_params,
    TypeParamDeclId => visit_type_param_decl,
    CommentId => visit_comment,
    CommentGroupId => visit_comment_group,
    IdentName => visit_ident,
}

/// Buffer lookup for `ListRef<T>`.
pub trait ListSlice<T> {
    fn slice(&self, r: ListRef<T>) -> &[T];
}

macro_rules! list_buffers {
    ($($item:ty => $getter:ident),* $(,)?) => {
        $(
            impl ListSlice<$item> for AstArena {
                #[inline(always)]
                fn slice(&self, r: ListRef<$item>) -> &[$item] {
                    self.$getter(r)
                }
            }
        )*
    };
}

list_buffers! {
    IdentName => ident_names,
    ExprId => exprs_list,
    StmtId => stmts_list,
    TypeId => types_list,
    FieldId => fields_list,
    Spec => specs_list,
    KeyedElement => keyed_elems_list,
    TopLevelDecl => top_decls,
    SwitchClauseId => switch_clause_ids,
    CommClauseId => comm_clause_ids,
    TypeTerm => type_terms,
    InterfaceElem => interface_elems,
    TypeParamDeclId => type_param_decl_ids,
    CommentId => comment_ids,
    CommentGroupId => comment_group_ids,
}

impl<'ast, T> Walk<'ast> for ListRef<T>
where
    AstArena: ListSlice<T>,
    T: Walk<'ast> + 'ast,
{
    #[inline(always)]
    fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V) {
        a.slice(*self).iter().for_each(|item| item.walk(a, v));
    }
}

impl<'ast, T: Walk<'ast>> Walk<'ast> for Option<T> {
    #[inline(always)]
    fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V) {
        if let Some(node) = self {
            node.walk(a, v);
        }
    }
}

// Leaves: positions, literal tokens and operator tags.
macro_rules! leaves {
    ($($ty:ty),* $(,)?) => {
        $(
            impl<'ast> Walk<'ast> for $ty {
                #[inline(always)]
                fn walk<V: Visitor<'ast> + ?Sized>(&self, _: &'ast AstArena, _: &mut V) {}
            }
        )*
    };
}

leaves! {
    Span, bool, BasicLit, StringLit, CommentKind, GenDeclKind, BasicLitKind, BranchKind,
    ChanDir, UnaryOp, BinaryOp, AssignOp, IncDecOp,
}
