//! Go syntax: lexer, arena AST, parser, canonical printer and object resolution.
//!
//! - The lexer uses Logos and implements Go semicolon insertion; comments are
//!   collected on the side.
//! - The parser is recursive descent and stops at the first syntax error.
//! - Resolution is a side table over the finished tree (`resolve::Resolution`).

pub mod ast;
pub mod error;
pub mod kind;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod resolve;
pub mod tree;
pub mod walk;

// Re-exports for convenience
pub use error::ParseError;
pub use kind::{inspect, NodeCategory, NodeKind};
pub use lexer::Lexer;
pub use printer::FormatError;
pub use resolve::{ObjKind, Resolution};
pub use tree::{ParseMode, Snapshot, SyntaxTree};

/// Parses one Go source file.
///
/// Comments are kept with `ParseMode::PARSE_COMMENTS`; the resolution side table
/// is built unless `ParseMode::SKIP_OBJECT_RESOLUTION` is set.
pub fn parse_file(filename: &str, src: &str, mode: ParseMode) -> Result<SyntaxTree, ParseError> {
    let parsed = parser::parse_source(filename, src, mode.contains(ParseMode::PARSE_COMMENTS))?;
    let resolution = if mode.contains(ParseMode::SKIP_OBJECT_RESOLUTION) {
        None
    } else {
        Some(resolve::resolve_file(&parsed.arena, &parsed.interner, &parsed.file))
    };
    let snapshot = Snapshot {
        arena: parsed.arena,
        interner: parsed.interner,
        file: parsed.file,
    };
    Ok(SyntaxTree::new(filename.to_owned(), src.to_owned(), mode, snapshot, resolution))
}

/// Canonical source text of `tree`.
///
/// `parse_file` of the result prints the same text again.
pub fn format_tree(tree: &SyntaxTree) -> Result<String, FormatError> {
    printer::print_file(tree.arena(), tree.interner(), tree.file(), tree.source())
}
