//! Checks that a restored tree is equivalent to the one that was archived.
//!
//! Trees are compared on their canonical text, the shape of their file scope
//! (present or not, and how many names it binds) and the number of resolved
//! identifier occurrences. `Strictness::KindPreserving`
//! also compares which kinds of objects those occurrences resolve to.

use std::collections::BTreeMap;
use std::fmt;

use goast_syntax::ast::{AstArena, IdentName};
use goast_syntax::walk::Visitor;
use goast_syntax::resolve::Scope;
use goast_syntax::{format_tree, ObjKind, Resolution, SyntaxTree};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FidelityAxis {
    CanonicalText,
    ScopeShape,
    ResolvedCount,
    ObjectKinds,
}

impl FidelityAxis {
    pub const fn name(self) -> &'static str {
        match self {
            Self::CanonicalText => "canonical text",
            Self::ScopeShape => "scope shape",
            Self::ResolvedCount => "resolved count",
            Self::ObjectKinds => "object kinds",
        }
    }
}

impl fmt::Display for FidelityAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Text, scope shape and resolved-occurrence count.
    #[default]
    CountOnly,
    /// Additionally compare the kinds of the resolved objects.
    KindPreserving,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Original,
    Restored,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Original => "original",
            Self::Restored => "restored",
        })
    }
}

/// Resolved occurrences per object kind.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KindCounts(pub BTreeMap<ObjKind, usize>);

impl fmt::Display for KindCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (kind, n)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {n}", kind.as_str())?;
        }
        f.write_str("}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FidelityError {
    #[error("canonical text differs at line {line}: {original:?} != {restored:?}")]
    CanonicalText {
        line: usize,
        original: String,
        restored: String,
    },
    #[error("cannot format the {side} tree: {message}")]
    Unformattable { side: Side, message: String },
    #[error("file scope present: {original} != {restored}")]
    FileScope { original: bool, restored: bool },
    #[error("file scope bindings: {original} != {restored}")]
    BindingCount { original: usize, restored: usize },
    #[error("resolved occurrences: {original} != {restored}")]
    ResolvedCount { original: usize, restored: usize },
    #[error("resolved object kinds: {original} != {restored}")]
    ObjectKinds { original: KindCounts, restored: KindCounts },
}

impl FidelityError {
    pub fn axis(&self) -> FidelityAxis {
        match self {
            Self::CanonicalText { .. } | Self::Unformattable { .. } => FidelityAxis::CanonicalText,
            Self::FileScope { .. } | Self::BindingCount { .. } => FidelityAxis::ScopeShape,
            Self::ResolvedCount { .. } => FidelityAxis::ResolvedCount,
            Self::ObjectKinds { .. } => FidelityAxis::ObjectKinds,
        }
    }
}

/// Every axis on which two trees disagree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FidelityReport {
    failures: Vec<FidelityError>,
}

impl FidelityReport {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failures(&self) -> &[FidelityError] {
        &self.failures
    }

    pub fn failed_axes(&self) -> Vec<FidelityAxis> {
        let mut axes: Vec<_> = self.failures.iter().map(FidelityError::axis).collect();
        axes.dedup();
        axes
    }

    /// The first failure, if any.
    pub fn into_result(self) -> Result<(), FidelityError> {
        match self.failures.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl fmt::Display for FidelityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ok() {
            return f.write_str("ok");
        }
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}: {failure}", failure.axis())?;
        }
        Ok(())
    }
}

struct Occurrences<'r> {
    resolution: &'r Resolution,
    resolved: usize,
    kinds: BTreeMap<ObjKind, usize>,
}

impl<'ast> Visitor<'ast> for Occurrences<'_> {
    fn visit_ident(&mut self, _a: &'ast AstArena, name: IdentName) {
        if let Some(obj) = self.resolution.lookup(name) {
            self.resolved += 1;
            *self.kinds.entry(self.resolution.object(obj).kind).or_default() += 1;
        }
    }
}

/// Identifier occurrences of `tree` with a binding, and their object kinds.
///
/// An unresolved tree has none.
pub fn resolved_occurrences(tree: &SyntaxTree) -> (usize, KindCounts) {
    let Some(resolution) = tree.resolution() else {
        return (0, KindCounts::default());
    };
    let mut counter = Occurrences {
        resolution,
        resolved: 0,
        kinds: BTreeMap::new(),
    };
    counter.visit_source_file(tree.arena(), tree.file());
    (counter.resolved, KindCounts(counter.kinds))
}

fn compare_text(original: &SyntaxTree, restored: &SyntaxTree) -> Option<FidelityError> {
    let left = match format_tree(original) {
        Ok(text) => text,
        Err(e) => {
            return Some(FidelityError::Unformattable {
                side: Side::Original,
                message: e.to_string(),
            })
        }
    };
    let right = match format_tree(restored) {
        Ok(text) => text,
        Err(e) => {
            return Some(FidelityError::Unformattable {
                side: Side::Restored,
                message: e.to_string(),
            })
        }
    };
    if left == right {
        return None;
    }
    let (a, b): (Vec<_>, Vec<_>) = (left.split('\n').collect(), right.split('\n').collect());
    let line = (0..a.len().max(b.len()))
        .find(|&i| a.get(i) != b.get(i))
        .unwrap_or(0);
    let at = |lines: &[&str]| lines.get(line).map_or_else(|| "<end of file>".to_owned(), |l| (*l).to_owned());
    Some(FidelityError::CanonicalText {
        line: line + 1,
        original: at(&a),
        restored: at(&b),
    })
}

fn compare_scopes(original: &SyntaxTree, restored: &SyntaxTree) -> Option<FidelityError> {
    let has_file_scope = |t: &SyntaxTree| t.resolution().is_some_and(|r| r.file_scope().is_some());
    let (left, right) = (has_file_scope(original), has_file_scope(restored));
    if left != right {
        return Some(FidelityError::FileScope {
            original: left,
            restored: right,
        });
    }
    if !left {
        return None;
    }
    let bindings = |t: &SyntaxTree| t.resolution().and_then(Resolution::file_scope).map_or(0, Scope::len);
    let (left, right) = (bindings(original), bindings(restored));
    (left != right).then_some(FidelityError::BindingCount {
        original: left,
        restored: right,
    })
}

/// Compares `original` and `restored` on every axis.
pub fn check(original: &SyntaxTree, restored: &SyntaxTree) -> FidelityReport {
    check_with(original, restored, Strictness::default())
}

pub fn check_with(original: &SyntaxTree, restored: &SyntaxTree, strictness: Strictness) -> FidelityReport {
    let mut failures = Vec::new();
    failures.extend(compare_text(original, restored));
    failures.extend(compare_scopes(original, restored));

    let (left, left_kinds) = resolved_occurrences(original);
    let (right, right_kinds) = resolved_occurrences(restored);
    if left != right {
        failures.push(FidelityError::ResolvedCount {
            original: left,
            restored: right,
        });
    }
    if strictness == Strictness::KindPreserving && left_kinds != right_kinds {
        failures.push(FidelityError::ObjectKinds {
            original: left_kinds,
            restored: right_kinds,
        });
    }
    FidelityReport { failures }
}

/// First axis on which the trees disagree.
pub fn verify(original: &SyntaxTree, restored: &SyntaxTree) -> Result<(), FidelityError> {
    check(original, restored).into_result()
}

pub fn verify_with(original: &SyntaxTree, restored: &SyntaxTree, strictness: Strictness) -> Result<(), FidelityError> {
    check_with(original, restored, strictness).into_result()
}
