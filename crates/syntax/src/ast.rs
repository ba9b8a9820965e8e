//! # Go syntax tree
//!
//! Arena-allocated AST for Go source files.
//!
//! ## Architecture
//!
//! - **Nodes**: allocated in typed arenas (`SpannedArena<T>`), addressed by `Id<T>`
//! - **Lists**: centralized buffers in `ExtraData`, addressed by `ListRef<T>`
//! - **Spans**: stored in a side table next to each arena
//! - **Symbols**: identifiers are interned; every occurrence is an `IdentName`
//!
//! ## Notes
//!
//! - The tree models syntax only. Name resolution lives in a side table
//!   (`crate::resolve::Resolution`) and never inside the nodes, so every type in
//!   this module is plain data and serializes without cycles.
//! - `#[derive(WalkAst)]` generates `impl crate::walk::Walk`; `#[walk(hook = ..)]`
//!   routes inline nodes through a `Visitor` method.

use ast_derive::WalkAst;
use core::marker::PhantomData;
use core::ops::{Index, IndexMut};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::hash::{BuildHasher, BuildHasherDefault, Hasher, RandomState};

// =============================================================================
// Core Foundation Types
// =============================================================================

/// Byte range in the source text, `end` exclusive.
///
/// Positions are stored as `u32`, limiting file size to 4GB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// Creates a span from usize positions, clamping to `u32::MAX`.
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        Self {
            start: clamp_u32(start),
            end: clamp_u32(end),
        }
    }

    #[inline]
    pub const fn empty_at(pos: usize) -> Self {
        Self::new(pos, pos)
    }

    /// One-byte span at `pos` (used for invalid tokens).
    #[inline]
    pub const fn single_at(pos: usize) -> Self {
        let p = clamp_u32(pos);
        Self {
            start: p,
            end: p.saturating_add(1),
        }
    }

    pub const fn from_range(range: std::ops::Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }

    /// Smallest span covering both.
    #[inline]
    pub const fn to(self, other: Span) -> Span {
        let start = if self.start < other.start { self.start } else { other.start };
        let end = if self.end > other.end { self.end } else { other.end };
        Span { start, end }
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[inline]
const fn clamp_u32(x: usize) -> u32 {
    if x > u32::MAX as usize {
        u32::MAX
    } else {
        x as u32
    }
}

/// Type-safe identifier for arena-allocated nodes.
#[derive(Debug)]
#[repr(transparent)]
pub struct Id<T> {
    raw: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Copy for Id<T> {}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T> Eq for Id<T> {}

impl<T> std::hash::Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<T> Id<T> {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub const fn to_usize(&self) -> usize {
        self.raw as usize
    }

    #[inline]
    pub const fn raw(&self) -> u32 {
        self.raw
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(s)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        u32::deserialize(d).map(Self::from_raw)
    }
}

/// Typed reference into a centralized list buffer.
///
/// Each `ListRef` points to a contiguous slice of the matching buffer in
/// `AstArena::extras`.
#[derive(Debug)]
pub struct ListRef<T> {
    start: u32,
    len: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Copy for ListRef<T> {}

impl<T> Clone for ListRef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> PartialEq for ListRef<T> {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.len == other.len
    }
}

impl<T> Eq for ListRef<T> {}

impl<T> Default for ListRef<T> {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl<T> ListRef<T> {
    pub const EMPTY: Self = Self {
        start: 0,
        len: 0,
        _marker: PhantomData,
    };

    #[inline]
    pub const fn new(start: u32, len: u32) -> Self {
        Self {
            start,
            len,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub const fn start(&self) -> u32 {
        self.start
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.len
    }

    /// End index (exclusive).
    #[inline]
    pub const fn end(&self) -> u32 {
        self.start + self.len
    }
}

impl<T> Serialize for ListRef<T> {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        (self.start, self.len).serialize(s)
    }
}

impl<'de, T> Deserialize<'de> for ListRef<T> {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let (start, len) = <(u32, u32)>::deserialize(d)?;
        Ok(Self::new(start, len))
    }
}

// =============================================================================
// Symbol Interning System
// =============================================================================

/// Interned string symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Symbol(u32);

pub type Ident = Symbol;

impl Symbol {
    #[inline]
    pub const fn from_raw(v: u32) -> Self {
        Self(v)
    }

    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

/// Identifier occurrence (interned symbol + source position).
///
/// Every identifier in the tree is stored this way, so an occurrence is uniquely
/// addressed by `pos.start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentName {
    pub sym: Ident,
    pub pos: Span,
}

/// Identity hasher for u64 values (used for symbol hash buckets).
#[derive(Default)]
struct U64IdentityHasher(u64);

impl Hasher for U64IdentityHasher {
    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 = (self.0 << 8) | u64::from(b);
        }
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.0 = i;
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }
}

type U64IdentityBuild = BuildHasherDefault<U64IdentityHasher>;

/// String interner.
///
/// Symbols are stored once and looked up via hash buckets keyed by a seeded
/// random hasher. Serializes as its string table; buckets are rebuilt on load.
#[derive(Debug, Default, Clone)]
pub struct Interner {
    strings: Vec<Box<str>>,
    buckets: HashMap<u64, SmallVec<[Symbol; 1]>, U64IdentityBuild>,
    state: RandomState,
}

impl Interner {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn reserve(&mut self, additional: usize) {
        self.strings.reserve(additional);
        self.buckets.reserve(additional);
    }

    #[inline(always)]
    pub fn hash_str(&self, s: &str) -> u64 {
        self.state.hash_one(s)
    }

    /// Interns a string and returns its symbol.
    #[inline]
    pub fn intern(&mut self, s: &str) -> Symbol {
        let h = self.hash_str(s);
        self.intern_with_hash(s, h)
    }

    #[inline]
    pub fn intern_with_hash(&mut self, s: &str, h: u64) -> Symbol {
        let entry = self.buckets.entry(h).or_default();

        for &sym in entry.iter() {
            if self.strings[sym.0 as usize].as_ref() == s {
                return sym;
            }
        }

        let sym = Symbol(self.strings.len() as u32);
        self.strings.push(s.into());
        entry.push(sym);
        sym
    }

    /// Looks up an already interned string.
    pub fn get(&self, s: &str) -> Option<Symbol> {
        let h = self.hash_str(s);
        self.buckets
            .get(&h)?
            .iter()
            .copied()
            .find(|sym| self.strings[sym.0 as usize].as_ref() == s)
    }

    /// Resolves a symbol back to its string. Unknown symbols resolve to `""`.
    #[inline]
    pub fn resolve(&self, sym: Symbol) -> &str {
        debug_assert!((sym.0 as usize) < self.strings.len());
        self.strings.get(sym.0 as usize).map_or("", AsRef::as_ref)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl Serialize for Interner {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        self.strings.serialize(s)
    }
}

impl<'de> Deserialize<'de> for Interner {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let strings = Vec::<String>::deserialize(d)?;
        let mut interner = Interner::new();
        interner.reserve(strings.len());
        // Symbols are table indices; keep every entry in place.
        for s in strings {
            let h = interner.hash_str(&s);
            let sym = Symbol(interner.strings.len() as u32);
            interner.strings.push(s.into_boxed_str());
            interner.buckets.entry(h).or_default().push(sym);
        }
        Ok(interner)
    }
}

// =============================================================================
// Arena Allocation
// =============================================================================

/// Arena for nodes with associated spans, stored in parallel vectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpannedArena<T> {
    data: Vec<T>,
    spans: Vec<Span>,
}

impl<T> Default for SpannedArena<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            spans: Vec::new(),
        }
    }
}

impl<T> SpannedArena<T> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc(&mut self, node: T, span: Span) -> Id<T> {
        let id = Id::from_raw(self.data.len() as u32);
        self.data.push(node);
        self.spans.push(span);
        id
    }

    #[inline]
    pub fn get(&self, id: Id<T>) -> &T {
        &self.data[id.to_usize()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: Id<T>) -> &mut T {
        &mut self.data[id.to_usize()]
    }

    #[inline]
    pub fn span(&self, id: Id<T>) -> Span {
        self.spans[id.to_usize()]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T> Index<Id<T>> for SpannedArena<T> {
    type Output = T;
    fn index(&self, id: Id<T>) -> &T {
        self.get(id)
    }
}

impl<T> IndexMut<Id<T>> for SpannedArena<T> {
    fn index_mut(&mut self, id: Id<T>) -> &mut T {
        self.get_mut(id)
    }
}

// =============================================================================
// Type Aliases for Node IDs
// =============================================================================

pub type DeclId = Id<GenDecl>;
pub type StmtId = Id<Stmt>;
pub type SimpleStmtId = Id<SimpleStmt>;
pub type ExprId = Id<Expr>;
pub type TypeId = Id<Type>;
pub type FieldId = Id<Field>;
pub type SignatureId = Id<Signature>;
pub type FuncDeclId = Id<FuncDecl>;
pub type SwitchClauseId = Id<SwitchClause>;
pub type CommClauseId = Id<CommClause>;
pub type TypeParamsId = Id<TypeParams>;
pub type TypeParamDeclId = Id<TypeParamDecl>;
pub type CommentId = Id<Comment>;
pub type CommentGroupId = Id<CommentGroup>;

// =============================================================================
// Centralized List Storage
// =============================================================================

/// Buffers that `ListRef<T>` points into.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ExtraData {
    pub ident_names: Vec<IdentName>,
    pub exprs: Vec<ExprId>,
    pub stmts: Vec<StmtId>,
    pub types: Vec<TypeId>,
    pub fields: Vec<FieldId>,
    pub specs: Vec<Spec>,
    pub keyed_elems: Vec<KeyedElement>,
    pub top_decls: Vec<TopLevelDecl>,
    pub switch_clause_ids: Vec<SwitchClauseId>,
    pub comm_clause_ids: Vec<CommClauseId>,
    pub type_terms: Vec<TypeTerm>,
    pub interface_elems: Vec<InterfaceElem>,
    pub type_param_decl_ids: Vec<TypeParamDeclId>,
    pub comment_ids: Vec<CommentId>,
    pub comment_group_ids: Vec<CommentGroupId>,
}

// =============================================================================
// Main AST Arena
// =============================================================================

/// Central arena holding all AST nodes and list buffers.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AstArena {
    pub decls: SpannedArena<GenDecl>,
    pub stmts: SpannedArena<Stmt>,
    pub simple_stmts: SpannedArena<SimpleStmt>,
    pub exprs: SpannedArena<Expr>,
    pub types: SpannedArena<Type>,
    pub signatures: SpannedArena<Signature>,
    pub funcs: SpannedArena<FuncDecl>,
    pub fields: SpannedArena<Field>,
    pub switch_clauses: SpannedArena<SwitchClause>,
    pub comm_clauses: SpannedArena<CommClause>,
    pub type_params: SpannedArena<TypeParams>,
    pub type_param_decls: SpannedArena<TypeParamDecl>,
    pub comments: SpannedArena<Comment>,
    pub comment_groups: SpannedArena<CommentGroup>,
    pub extras: ExtraData,
}

macro_rules! list_methods {
    ($($build:ident / $get:ident : $t:ty => $buf:ident),* $(,)?) => {
        $(
            pub fn $build(&mut self, items: impl IntoIterator<Item = $t>) -> ListRef<$t> {
                Self::push_list(&mut self.extras.$buf, items)
            }

            pub fn $get(&self, r: ListRef<$t>) -> &[$t] {
                Self::slice_of(&self.extras.$buf, r)
            }
        )*
    };
}

impl AstArena {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn push_list<T>(buf: &mut Vec<T>, items: impl IntoIterator<Item = T>) -> ListRef<T> {
        let start = buf.len();
        buf.extend(items);
        let len = buf.len() - start;
        debug_assert!(start <= u32::MAX as usize);
        debug_assert!(len <= u32::MAX as usize);
        if len == 0 {
            return ListRef::EMPTY;
        }
        ListRef::new(start as u32, len as u32)
    }

    /// Out-of-range references (possible only in a damaged snapshot) read as empty.
    #[inline]
    fn slice_of<T>(buf: &[T], r: ListRef<T>) -> &[T] {
        let s = r.start() as usize;
        let e = r.end() as usize;
        buf.get(s..e).unwrap_or(&[])
    }

    list_methods! {
        list_ident_names / ident_names: IdentName => ident_names,
        list_exprs / exprs_list: ExprId => exprs,
        list_stmts / stmts_list: StmtId => stmts,
        list_types / types_list: TypeId => types,
        list_fields / fields_list: FieldId => fields,
        list_specs / specs_list: Spec => specs,
        list_keyed_elems / keyed_elems_list: KeyedElement => keyed_elems,
        list_top_decls / top_decls: TopLevelDecl => top_decls,
        list_switch_clause_ids / switch_clause_ids: SwitchClauseId => switch_clause_ids,
        list_comm_clause_ids / comm_clause_ids: CommClauseId => comm_clause_ids,
        list_type_terms / type_terms: TypeTerm => type_terms,
        list_interface_elems / interface_elems: InterfaceElem => interface_elems,
        list_type_param_decl_ids / type_param_decl_ids: TypeParamDeclId => type_param_decl_ids,
        list_comment_ids / comment_ids: CommentId => comment_ids,
        list_comment_group_ids / comment_group_ids: CommentGroupId => comment_group_ids,
    }
}

// =============================================================================
// Comments
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommentKind {
    Line,
    Block,
}

/// Comment token (text is recovered from source via span).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, WalkAst)]
pub struct Comment {
    pub kind: CommentKind,
}

/// Run of comments with no blank line between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, WalkAst)]
pub struct CommentGroup {
    pub comments: ListRef<CommentId>,
}

// =============================================================================
// Source File (Root Node)
// =============================================================================

/// A complete Go source file.
///
/// ```text
/// SourceFile = PackageClause ";" { ImportDecl ";" } { TopLevelDecl ";" }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, WalkAst)]
pub struct SourceFile {
    pub package_pos: Span,
    pub name: IdentName,
    /// Top-level declarations in source order, imports included
    pub decls: ListRef<TopLevelDecl>,
    /// Every comment group in the file, in source order
    pub comments: ListRef<CommentGroupId>,
    /// Package doc comment
    #[walk(skip)]
    pub doc: Option<CommentGroupId>,
}

// =============================================================================
// Declarations
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, WalkAst)]
pub enum TopLevelDecl {
    Decl(DeclId),
    Func(FuncDeclId),
}

/// Generic declaration (import, const, type, var).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, WalkAst)]
pub struct GenDecl {
    #[walk(skip)]
    pub doc: Option<CommentGroupId>,
    pub kw_pos: Span,
    pub kind: GenDeclKind,
    /// Present for grouped declarations
    pub l_paren: Option<Span>,
    pub specs: ListRef<Spec>,
    pub r_paren: Option<Span>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum GenDeclKind {
    Import,
    Const,
    Type,
    Var,
}

impl GenDeclKind {
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Import => "import",
            Self::Const => "const",
            Self::Type => "type",
            Self::Var => "var",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, WalkAst)]
#[walk(hook = visit_spec)]
pub enum Spec {
    Import(ImportSpec),
    Value(ValueSpec),
    Type(TypeSpec),
}

/// `ImportSpec = [ "." | PackageName ] ImportPath`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, WalkAst)]
pub struct ImportSpec {
    pub name: Option<ImportName>,
    pub path: StringLit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, WalkAst)]
pub enum ImportName {
    /// `import . "pkg"`
    Dot(Span),
    /// `import _ "pkg"`
    Blank(Span),
    /// `import name "pkg"`
    Name(IdentName),
}

/// Const or var spec.
///
/// ```text
/// ConstSpec = IdentifierList [ [ Type ] "=" ExpressionList ]
/// VarSpec   = IdentifierList ( Type [ "=" ExpressionList ] | "=" ExpressionList )
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, WalkAst)]
pub struct ValueSpec {
    pub names: ListRef<IdentName>,
    pub typ: Option<TypeId>,
    pub values: ListRef<ExprId>,
}

/// `TypeSpec = AliasDecl | TypeDef`; an alias has `assign_pos`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, WalkAst)]
pub struct TypeSpec {
    pub name: IdentName,
    pub type_params: Option<TypeParamsId>,
    pub assign_pos: Option<Span>,
    pub typ: TypeId,
}

/// Function or method declaration.
///
/// ```text
/// FunctionDecl = "func" FunctionName [ TypeParameters ] Signature [ FunctionBody ]
/// MethodDecl   = "func" Receiver MethodName Signature [ FunctionBody ]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, WalkAst)]
pub struct FuncDecl {
    #[walk(skip)]
    pub doc: Option<CommentGroupId>,
    pub func_pos: Span,
    pub recv: Option<Receiver>,
    pub name: IdentName,
    pub type_params: Option<TypeParamsId>,
    pub signature: SignatureId,
    /// None for declarations without a body (assembly stubs)
    pub body: Option<Block>,
}

// =============================================================================
// Generics
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, WalkAst)]
pub struct TypeParams {
    pub l_brack: Span,
    pub params: ListRef<TypeParamDeclId>,
    pub r_brack: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, WalkAst)]
pub struct TypeParamDecl {
    pub names: ListRef<IdentName>,
    pub constraint: TypeElem,
}

/// `TypeTerm { "|" TypeTerm }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, WalkAst)]
pub struct TypeElem {
    pub terms: ListRef<TypeTerm>,
}

/// `[ "~" ] Type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, WalkAst)]
pub struct TypeTerm {
    pub tilde_pos: Option<Span>,
    pub typ: TypeId,
}

/// Method receiver. `typ` is the base type (`T` or `*T`) without the receiver
/// type parameter names, which live in `type_params`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, WalkAst)]
#[walk(hook = visit_receiver)]
pub struct Receiver {
    pub l_paren: Span,
    pub name: Option<IdentName>,
    pub typ: TypeId,
    pub type_params: Option<ReceiverTypeParams>,
    pub r_paren: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, WalkAst)]
pub struct ReceiverTypeParams {
    pub l_brack: Span,
    pub names: ListRef<IdentName>,
    pub r_brack: Span,
}

// =============================================================================
// Signatures and Fields
// =============================================================================

/// `Signature = Parameters [ Result ]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, WalkAst)]
pub struct Signature {
    pub params: FieldList,
    pub results: Option<Results>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, WalkAst)]
pub enum Results {
    /// Parenthesized results: `(int, error)`, `(n int)`
    Params(FieldList),
    /// Single unparenthesized result: `int`
    Type(TypeId),
}

/// Parenthesized parameter or result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, WalkAst)]
#[walk(hook = visit_field_list)]
pub struct FieldList {
    pub l_paren: Span,
    pub fields: ListRef<FieldId>,
    pub r_paren: Span,
}

/// Parameter, result or struct field. Embedded fields have no names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, WalkAst)]
pub struct Field {
    pub names: ListRef<IdentName>,
    /// `...` of a variadic parameter
    pub ellipsis_pos: Option<Span>,
    pub typ: TypeId,
    /// Struct tag
    pub tag: Option<StringLit>,
}

impl Field {
    #[inline]
    pub const fn is_embedded(&self) -> bool {
        self.names.is_empty()
    }
}

// =============================================================================
// Statements
// =============================================================================

/// `SimpleStmt = EmptyStmt | ExpressionStmt | SendStmt | IncDecStmt | Assignment | ShortVarDecl`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, WalkAst)]
pub enum SimpleStmt {
    Empty(Span),
    Expr(ExprId),
    Send {
        chan: ExprId,
        op_pos: Span,
        value: ExprId,
    },
    IncDec {
        expr: ExprId,
        op: IncDecOp,
        op_pos: Span,
    },
    Assign {
        lhs: ListRef<ExprId>,
        op: AssignOp,
        op_pos: Span,
        rhs: ListRef<ExprId>,
    },
    ShortVarDecl {
        names: ListRef<IdentName>,
        op_pos: Span,
        values: ListRef<ExprId>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, WalkAst)]
pub enum Stmt {
    Simple(SimpleStmtId),
    Decl(DeclId),
    Labeled {
        label: IdentName,
        colon_pos: Span,
        stmt: StmtId,
    },
    Go {
        go_pos: Span,
        call: ExprId,
    },
    Defer {
        defer_pos: Span,
        call: ExprId,
    },
    Return {
        return_pos: Span,
        results: ListRef<ExprId>,
    },
    Branch(BranchStmt),
    Block(Block),
    If {
        if_pos: Span,
        init: Option<SimpleStmtId>,
        cond: ExprId,
        then_block: Block,
        /// Either another `If` or a `Block`
        else_stmt: Option<StmtId>,
    },
    For {
        for_pos: Span,
        kind: ForKind,
        block: Block,
    },
    Switch {
        switch_pos: Span,
        init: Option<SimpleStmtId>,
        tag: Option<ExprId>,
        l_brace: Span,
        clauses: ListRef<SwitchClauseId>,
        r_brace: Span,
    },
    TypeSwitch {
        switch_pos: Span,
        init: Option<SimpleStmtId>,
        guard: TypeSwitchGuard,
        l_brace: Span,
        clauses: ListRef<SwitchClauseId>,
        r_brace: Span,
    },
    Select {
        select_pos: Span,
        l_brace: Span,
        clauses: ListRef<CommClauseId>,
        r_brace: Span,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, WalkAst)]
pub enum ForKind {
    /// `for { ... }`
    Infinite,
    /// `for cond { ... }`
    Cond(ExprId),
    /// `for init; cond; post { ... }`
    ForClause {
        init: Option<SimpleStmtId>,
        cond: Option<ExprId>,
        post: Option<SimpleStmtId>,
    },
    /// `for k, v := range x { ... }`
    Range {
        lhs: Option<RangeLhs>,
        range_pos: Span,
        expr: ExprId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, WalkAst)]
pub enum RangeLhs {
    /// `k, v :=`
    Def {
        idents: ListRef<IdentName>,
        op_pos: Span,
    },
    /// `k, v =`
    Assign {
        exprs: ListRef<ExprId>,
        op_pos: Span,
    },
}

/// Case clause of an expression or type switch. `items` is `None` for `default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, WalkAst)]
pub enum SwitchClause {
    ExprCase {
        case_pos: Span,
        items: Option<ListRef<ExprId>>,
        colon_pos: Span,
        stmts: ListRef<StmtId>,
    },
    TypeCase {
        case_pos: Span,
        items: Option<ListRef<TypeId>>,
        colon_pos: Span,
        stmts: ListRef<StmtId>,
    },
}

/// Select clause. `comm` is a send, a receive expression statement, or a receive
/// assignment; `None` for `default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, WalkAst)]
pub struct CommClause {
    pub case_pos: Span,
    pub comm: Option<SimpleStmtId>,
    pub colon_pos: Span,
    pub stmts: ListRef<StmtId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, WalkAst)]
pub struct BranchStmt {
    pub kind: BranchKind,
    pub pos: Span,
    pub label: Option<IdentName>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BranchKind {
    Break,
    Continue,
    Goto,
    Fallthrough,
}

impl BranchKind {
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Break => "break",
            Self::Continue => "continue",
            Self::Goto => "goto",
            Self::Fallthrough => "fallthrough",
        }
    }
}

/// `Block = "{" StatementList "}"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, WalkAst)]
#[walk(hook = visit_block)]
pub struct Block {
    pub l_brace: Span,
    pub stmts: ListRef<StmtId>,
    pub r_brace: Span,
}

/// `TypeSwitchGuard = [ identifier ":=" ] PrimaryExpr "." "(" "type" ")"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, WalkAst)]
pub struct TypeSwitchGuard {
    pub bind: Option<IdentName>,
    pub x: ExprId,
}

// =============================================================================
// Expressions
// =============================================================================

/// `LiteralValue = "{" [ ElementList [ "," ] ] "}"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, WalkAst)]
pub struct LiteralValue {
    pub l_brace: Span,
    pub elements: ListRef<KeyedElement>,
    pub r_brace: Span,
}

/// `KeyedElement = [ Key ":" ] Element`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, WalkAst)]
#[walk(hook = visit_keyed_element)]
pub struct KeyedElement {
    pub key: Option<Key>,
    pub value: Element,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, WalkAst)]
pub enum Key {
    /// Bare identifier key: struct field name, or a constant in a map/array literal
    FieldName(IdentName),
    Expr(ExprId),
    /// Elided nested literal: `map[[2]int]string{{1, 2}: "a"}`
    Literal(LiteralValue),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, WalkAst)]
pub enum Element {
    Expr(ExprId),
    /// Elided nested literal: `[][]int{{1, 2}}`
    Literal(LiteralValue),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, WalkAst)]
pub enum Expr {
    Ident(IdentName),
    BasicLit(BasicLit),
    FuncLit {
        func_pos: Span,
        sig: SignatureId,
        body: Block,
    },
    /// `T{...}`; `typ` is any expression denoting a literal type
    CompositeLit {
        typ: ExprId,
        lit: LiteralValue,
    },
    /// `a[i]` or a generic instantiation `F[T, U]`; syntax cannot tell them apart
    Index {
        base: ExprId,
        l_brack: Span,
        args: ListRef<ExprId>,
        r_brack: Span,
    },
    Paren {
        l_paren: Span,
        expr: ExprId,
        r_paren: Span,
    },
    Selector {
        expr: ExprId,
        sel: IdentName,
    },
    /// `a[lo:hi]`, `a[lo:hi:max]`
    Slice {
        expr: ExprId,
        l_brack: Span,
        lo: Option<ExprId>,
        hi: Option<ExprId>,
        max: Option<ExprId>,
        slice3: bool,
        r_brack: Span,
    },
    /// `x.(T)`; `typ` is `None` for `x.(type)`
    TypeAssert {
        expr: ExprId,
        typ: Option<TypeId>,
        r_paren: Span,
    },
    /// Call or conversion
    Call {
        func: ExprId,
        l_paren: Span,
        args: ListRef<ExprId>,
        /// `f(xs...)`
        ellipsis: Option<Span>,
        r_paren: Span,
    },
    Unary {
        op: UnaryOp,
        op_pos: Span,
        expr: ExprId,
    },
    Binary {
        left: ExprId,
        op: BinaryOp,
        op_pos: Span,
        right: ExprId,
    },
    /// Type in expression position: `[]int{}`, `make(map[string]int)`, `(*T)(x)`
    TypeExpr(TypeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicLit {
    pub kind: BasicLitKind,
    pub raw: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum BasicLitKind {
    Int,
    Float,
    Imag,
    Rune,
    String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringLit {
    pub raw: Span,
}

// =============================================================================
// Types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, WalkAst)]
pub enum Type {
    /// `Name`, `pkg.Name`, `Name[T, U]`
    Named {
        pkg: Option<IdentName>,
        name: IdentName,
        args: ListRef<TypeId>,
    },
    Pointer {
        star_pos: Span,
        elem: TypeId,
    },
    /// `[N]T`, `[...]T`
    Array {
        l_brack: Span,
        len: ArrayLen,
        elem: TypeId,
    },
    Slice {
        l_brack: Span,
        elem: TypeId,
    },
    Map {
        map_pos: Span,
        key: TypeId,
        val: TypeId,
    },
    Chan {
        chan_pos: Span,
        dir: ChanDir,
        elem: TypeId,
    },
    Struct {
        struct_pos: Span,
        l_brace: Span,
        fields: ListRef<FieldId>,
        r_brace: Span,
    },
    Interface {
        interface_pos: Span,
        l_brace: Span,
        elems: ListRef<InterfaceElem>,
        r_brace: Span,
    },
    Func {
        func_pos: Span,
        sig: SignatureId,
    },
    Paren {
        l_paren: Span,
        typ: TypeId,
        r_paren: Span,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, WalkAst)]
pub enum ArrayLen {
    Expr(ExprId),
    /// `[...]T`
    Ellipsis(Span),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChanDir {
    /// `chan T`
    Both,
    /// `chan<- T`
    Send,
    /// `<-chan T`
    Recv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, WalkAst)]
pub enum InterfaceElem {
    /// `Method(...) ...`
    Method { name: IdentName, sig: SignatureId },
    /// Embedded type (`io.Reader`) or union (`~int | ~float64`)
    Embed(TypeElem),
}

// =============================================================================
// Operators
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Add,   // +
    Sub,   // -
    Not,   // !
    Xor,   // ^
    Deref, // *
    Addr,  // &
    Recv,  // <-
    Tilde, // ~
}

impl UnaryOp {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Not => "!",
            Self::Xor => "^",
            Self::Deref => "*",
            Self::Addr => "&",
            Self::Recv => "<-",
            Self::Tilde => "~",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,    // +
    Sub,    // -
    Mul,    // *
    Div,    // /
    Mod,    // %
    And,    // &
    Or,     // |
    Xor,    // ^
    Shl,    // <<
    Shr,    // >>
    AndNot, // &^
    LAnd,   // &&
    LOr,    // ||
    Eq,     // ==
    Ne,     // !=
    Lt,     // <
    Le,     // <=
    Gt,     // >
    Ge,     // >=
}

impl BinaryOp {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::And => "&",
            Self::Or => "|",
            Self::Xor => "^",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::AndNot => "&^",
            Self::LAnd => "&&",
            Self::LOr => "||",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }

    /// Go operator precedence, 5 binds tightest.
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Mul | Self::Div | Self::Mod | Self::Shl | Self::Shr | Self::And | Self::AndNot => 5,
            Self::Add | Self::Sub | Self::Or | Self::Xor => 4,
            Self::Eq | Self::Ne | Self::Lt | Self::Le | Self::Gt | Self::Ge => 3,
            Self::LAnd => 2,
            Self::LOr => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignOp {
    Assign,       // =
    AddAssign,    // +=
    SubAssign,    // -=
    MulAssign,    // *=
    DivAssign,    // /=
    ModAssign,    // %=
    AndAssign,    // &=
    OrAssign,     // |=
    XorAssign,    // ^=
    ShlAssign,    // <<=
    ShrAssign,    // >>=
    AndNotAssign, // &^=
}

impl AssignOp {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Assign => "=",
            Self::AddAssign => "+=",
            Self::SubAssign => "-=",
            Self::MulAssign => "*=",
            Self::DivAssign => "/=",
            Self::ModAssign => "%=",
            Self::AndAssign => "&=",
            Self::OrAssign => "|=",
            Self::XorAssign => "^=",
            Self::ShlAssign => "<<=",
            Self::ShrAssign => ">>=",
            Self::AndNotAssign => "&^=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncDecOp {
    Inc, // ++
    Dec, // --
}

impl IncDecOp {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inc => "++",
            Self::Dec => "--",
        }
    }
}
