//! Owned syntax trees: source text, arena, interner, root and resolution.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ast::{AstArena, GenDeclKind, Interner, SourceFile, Span, Spec, Symbol, TopLevelDecl};
use crate::resolve::Resolution;

/// Flags controlling what `parse_file` builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ParseMode(u8);

impl ParseMode {
    pub const NONE: Self = Self(0);
    /// Collect comment groups.
    pub const PARSE_COMMENTS: Self = Self(1 << 0);
    /// Produce no resolution side table.
    pub const SKIP_OBJECT_RESOLUTION: Self = Self(1 << 1);

    const ALL_BITS: u8 = Self::PARSE_COMMENTS.0 | Self::SKIP_OBJECT_RESOLUTION.0;

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Rejects unknown bits.
    #[inline]
    pub const fn from_bits(bits: u8) -> Option<Self> {
        if bits & !Self::ALL_BITS == 0 {
            Some(Self(bits))
        } else {
            None
        }
    }

    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[inline]
    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }
}

impl Default for ParseMode {
    fn default() -> Self {
        Self::PARSE_COMMENTS
    }
}

impl BitOr for ParseMode {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for ParseMode {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

impl fmt::Display for ParseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        if self.contains(Self::PARSE_COMMENTS) {
            names.push("PARSE_COMMENTS");
        }
        if self.contains(Self::SKIP_OBJECT_RESOLUTION) {
            names.push("SKIP_OBJECT_RESOLUTION");
        }
        if names.is_empty() {
            f.write_str("NONE")
        } else {
            f.write_str(&names.join(" | "))
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("unknown parse mode bits {0:#04x}")]
pub struct InvalidParseMode(pub u8);

impl TryFrom<u8> for ParseMode {
    type Error = InvalidParseMode;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        Self::from_bits(bits).ok_or(InvalidParseMode(bits))
    }
}

impl From<ParseMode> for u8 {
    fn from(mode: ParseMode) -> u8 {
        mode.0
    }
}

/// Structural part of a tree: everything except the resolution.
///
/// This is the only tree form that is ever serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub arena: AstArena,
    pub interner: Interner,
    pub file: SourceFile,
}

/// A parsed compilation unit.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    filename: String,
    source: String,
    mode: ParseMode,
    arena: AstArena,
    interner: Interner,
    file: SourceFile,
    resolution: Option<Resolution>,
}

impl SyntaxTree {
    pub(crate) fn new(
        filename: String,
        source: String,
        mode: ParseMode,
        snapshot: Snapshot,
        resolution: Option<Resolution>,
    ) -> Self {
        Self {
            filename,
            source,
            mode,
            arena: snapshot.arena,
            interner: snapshot.interner,
            file: snapshot.file,
            resolution,
        }
    }

    /// Rebuilds an unresolved tree from a stored snapshot of `source`.
    pub fn from_snapshot(filename: impl Into<String>, source: impl Into<String>, mode: ParseMode, snapshot: Snapshot) -> Self {
        Self::new(
            filename.into(),
            source.into(),
            mode.union(ParseMode::SKIP_OBJECT_RESOLUTION),
            snapshot,
            None,
        )
    }

    pub fn into_snapshot(self) -> Snapshot {
        Snapshot {
            arena: self.arena,
            interner: self.interner,
            file: self.file,
        }
    }

    #[inline]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[inline]
    pub fn mode(&self) -> ParseMode {
        self.mode
    }

    #[inline]
    pub fn arena(&self) -> &AstArena {
        &self.arena
    }

    #[inline]
    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    #[inline]
    pub fn file(&self) -> &SourceFile {
        &self.file
    }

    /// `None` when parsed with `SKIP_OBJECT_RESOLUTION`.
    #[inline]
    pub fn resolution(&self) -> Option<&Resolution> {
        self.resolution.as_ref()
    }

    #[inline]
    pub fn name(&self, sym: Symbol) -> &str {
        self.interner.resolve(sym)
    }

    /// Source text covered by `span`, or `None` if it does not lie in the source.
    pub fn text(&self, span: Span) -> Option<&str> {
        self.source.get(span.start as usize..span.end as usize)
    }

    pub fn package_name(&self) -> &str {
        self.name(self.file.name.sym)
    }

    /// Top-level declarations, import declarations included.
    pub fn decl_count(&self) -> usize {
        self.file.decls.len() as usize
    }

    /// Import specs across all import declarations.
    pub fn import_count(&self) -> usize {
        self.arena
            .top_decls(self.file.decls)
            .iter()
            .filter_map(|decl| match *decl {
                TopLevelDecl::Decl(id) => Some(&self.arena.decls[id]),
                TopLevelDecl::Func(_) => None,
            })
            .filter(|decl| decl.kind == GenDeclKind::Import)
            .flat_map(|decl| self.arena.specs_list(decl.specs))
            .filter(|spec| matches!(spec, Spec::Import(_)))
            .count()
    }
}
