//! Archives of parsed Go files.
//!
//! `archive::save` stores the canonical text of a tree together with a small
//! metadata table and an optional structural snapshot; `archive::load` parses
//! the text again, which rebuilds the scope resolution. `verify` proves the two
//! trees equivalent, `corpus` works on directories of archives and `coverage`
//! reports which node kinds a set of files exercises. `dump` writes indented
//! node trees for reading.

pub mod archive;
pub mod cli;
pub mod codec;
pub mod corpus;
pub mod coverage;
pub mod dump;
pub mod error;
pub mod query;
pub mod verify;

pub use archive::{load, save, Archive, Bundle, MetaValue, SaveOptions};
pub use error::ArchiveError;
pub use goast_syntax::{format_tree, parse_file, NodeCategory, NodeKind, ParseMode, SyntaxTree};
pub use verify::{check, verify, FidelityAxis, FidelityError, FidelityReport, Strictness};
