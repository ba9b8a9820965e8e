//! Saving parsed files as archives and loading them back.
//!
//! An archive stores the canonical text of a tree, the parse mode, a few
//! metadata entries and optionally a structural snapshot. The resolution is
//! never stored; loading rebuilds it by parsing the stored text again.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use goast_syntax::{format_tree, kind, parse_file, ParseMode, Snapshot, SyntaxTree};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::codec;
use crate::error::ArchiveError;

/// File extension of archives, without the dot.
pub const EXTENSION: &str = "asta";

/// Metadata keys written by `save`.
pub mod meta {
    pub const PACKAGE: &str = "package";
    pub const NUM_DECLARATIONS: &str = "num_declarations";
    pub const NUM_IMPORTS: &str = "num_imports";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetaValue {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl MetaValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match *self {
            Self::Int(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Self::Bool(b) => Some(b),
            _ => None,
        }
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Everything one archive holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bundle {
    /// Canonical text of the archived tree
    pub source_code: String,
    pub filename: String,
    pub parse_mode: ParseMode,
    pub snapshot: Option<Snapshot>,
    pub metadata: BTreeMap<String, MetaValue>,
}

/// Options for `save`. The stored parse mode is always the tree's own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOptions {
    /// Store a structural snapshot next to the text.
    pub snapshot: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self { snapshot: true }
    }
}

fn metadata_of(tree: &SyntaxTree) -> BTreeMap<String, MetaValue> {
    BTreeMap::from([
        (meta::PACKAGE.to_owned(), MetaValue::Str(tree.package_name().to_owned())),
        (meta::NUM_DECLARATIONS.to_owned(), MetaValue::Int(tree.decl_count() as i64)),
        (meta::NUM_IMPORTS.to_owned(), MetaValue::Int(tree.import_count() as i64)),
    ])
}

/// Writes `tree` to `output_path` as an archive.
///
/// `origin` names the file the tree came from; it is stored as the archive's
/// filename, and `tree.mode()` as its parse mode. Nothing appears at
/// `output_path` unless the whole write succeeds.
pub fn save(tree: &SyntaxTree, origin: &str, output_path: &Path, options: &SaveOptions) -> Result<(), ArchiveError> {
    let canonical = format_tree(tree).map_err(|e| ArchiveError::format("save", output_path, e))?;
    let parse_mode = tree.mode();

    let snapshot = if options.snapshot {
        match parse_file(origin, &canonical, parse_mode | ParseMode::SKIP_OBJECT_RESOLUTION) {
            Ok(structure) => Some(structure.into_snapshot()),
            Err(err) => {
                warn!("Saving {} without a snapshot: {err}", output_path.display());
                None
            }
        }
    } else {
        None
    };

    let bundle = Bundle {
        source_code: canonical,
        filename: origin.to_owned(),
        parse_mode,
        snapshot,
        metadata: metadata_of(tree),
    };
    let bytes = codec::encode(&bundle).map_err(|source| ArchiveError::Encode {
        op: "save",
        path: output_path.to_owned(),
        source,
    })?;

    write_atomic(output_path, &bytes).map_err(|e| ArchiveError::io("save", output_path, e))?;
    debug!(
        "Saved {} ({} bytes, snapshot: {})",
        output_path.display(),
        bytes.len(),
        bundle.snapshot.is_some()
    );
    Ok(())
}

pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp_file = tempfile::Builder::new()
        .prefix(".goast-")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    temp_file.write_all(bytes)?;
    temp_file.flush()?;
    temp_file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Reads an archive and parses its text again.
///
/// Returns the fresh, resolved tree and the stored canonical text.
pub fn load(path: &Path) -> Result<(SyntaxTree, String), ArchiveError> {
    let archive = Archive::open(path)?;
    let tree = archive.reconstruct()?;
    Ok((tree, archive.into_source_code()))
}

/// A decoded archive. Opening does not parse anything.
#[derive(Debug, Clone)]
pub struct Archive {
    path: PathBuf,
    bundle: Bundle,
}

impl Archive {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ArchiveError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| ArchiveError::io("open", path, e))?;
        let bundle = codec::decode(&bytes).map_err(|e| ArchiveError::decode("open", path, e))?;
        debug!("Opened {} ({})", path.display(), bundle.filename);
        Ok(Self {
            path: path.to_owned(),
            bundle,
        })
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn bundle(&self) -> &Bundle {
        &self.bundle
    }

    #[inline]
    pub fn source_code(&self) -> &str {
        &self.bundle.source_code
    }

    pub fn into_source_code(self) -> String {
        self.bundle.source_code
    }

    #[inline]
    pub fn filename(&self) -> &str {
        &self.bundle.filename
    }

    #[inline]
    pub fn parse_mode(&self) -> ParseMode {
        self.bundle.parse_mode
    }

    pub fn metadata(&self, key: &str) -> Option<&MetaValue> {
        self.bundle.metadata.get(key)
    }

    pub fn all_metadata(&self) -> &BTreeMap<String, MetaValue> {
        &self.bundle.metadata
    }

    pub fn package_name(&self) -> Option<&str> {
        self.metadata(meta::PACKAGE).and_then(MetaValue::as_str)
    }

    pub fn declaration_count(&self) -> Option<usize> {
        self.count(meta::NUM_DECLARATIONS)
    }

    pub fn import_count(&self) -> Option<usize> {
        self.count(meta::NUM_IMPORTS)
    }

    fn count(&self, key: &str) -> Option<usize> {
        self.metadata(key)
            .and_then(MetaValue::as_int)
            .and_then(|n| usize::try_from(n).ok())
    }

    #[inline]
    pub fn has_snapshot(&self) -> bool {
        self.bundle.snapshot.is_some()
    }

    /// Unresolved tree built from the stored snapshot, without parsing.
    pub fn snapshot(&self) -> Option<SyntaxTree> {
        let snapshot = self.bundle.snapshot.clone()?;
        Some(SyntaxTree::from_snapshot(
            &self.bundle.filename,
            &self.bundle.source_code,
            self.bundle.parse_mode,
            snapshot,
        ))
    }

    /// The snapshot tree, or an unresolved parse of the text when there is none.
    pub fn structure(&self) -> Result<SyntaxTree, ArchiveError> {
        match self.snapshot() {
            Some(tree) => Ok(tree),
            None => self.parse(self.bundle.parse_mode | ParseMode::SKIP_OBJECT_RESOLUTION),
        }
    }

    /// Parses the stored text with the stored mode.
    pub fn reconstruct(&self) -> Result<SyntaxTree, ArchiveError> {
        let tree = self.parse(self.bundle.parse_mode)?;
        debug!("Reconstructed {} from {}", tree.filename(), self.path.display());
        Ok(tree)
    }

    fn parse(&self, mode: ParseMode) -> Result<SyntaxTree, ArchiveError> {
        parse_file(&self.bundle.filename, &self.bundle.source_code, mode)
            .map_err(|e| ArchiveError::parse("reconstruct", &self.path, e))
    }

    /// Number of nodes in the archived tree.
    pub fn node_count(&self) -> Result<usize, ArchiveError> {
        Ok(kind::node_count(&self.structure()?))
    }
}
