//! Directories of archives.

use std::fs;
use std::path::{Path, PathBuf};

use goast_syntax::SyntaxTree;
use log::debug;
use walkdir::WalkDir;

use crate::archive::{Archive, EXTENSION};
use crate::error::ArchiveError;

/// An opened archive and the resolved tree its text parses to.
#[derive(Debug, Clone)]
pub struct Loaded {
    pub archive: Archive,
    pub tree: SyntaxTree,
}

/// Opens one archive and reconstructs its tree.
pub fn load_one(path: impl AsRef<Path>) -> Result<Loaded, ArchiveError> {
    let archive = Archive::open(path)?;
    let tree = archive.reconstruct()?;
    Ok(Loaded { archive, tree })
}

/// Files directly inside `dir` with the given extension, sorted by file name.
///
/// A `dir` that exists but is not a directory is an error, as is any entry
/// that cannot be read.
pub(crate) fn list_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, ArchiveError> {
    if fs::metadata(dir).is_ok_and(|meta| !meta.is_dir()) {
        return Err(ArchiveError::NotADirectory { path: dir.to_owned() });
    }
    let mut paths = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|source| ArchiveError::Directory {
            path: dir.to_owned(),
            source,
        })?;
        if entry.file_type().is_file() && entry.path().extension().is_some_and(|ext| ext == extension) {
            paths.push(entry.into_path());
        }
    }
    Ok(paths)
}

/// Loads every archive in `dir`, or fails on the first one that does not load.
pub fn load_all(dir: impl AsRef<Path>) -> Result<Vec<Loaded>, ArchiveError> {
    let dir = dir.as_ref();
    let archives = list_files(dir, EXTENSION)?
        .into_iter()
        .map(load_one)
        .collect::<Result<Vec<_>, _>>()?;
    debug!("Loaded {} archives from {}", archives.len(), dir.display());
    Ok(archives)
}

/// Loads the archives of `dir` one at a time and hands each to `visit`.
///
/// The first error, from loading or from `visit`, stops the walk. Returns the
/// number of archives visited.
pub fn for_each<E, F>(dir: impl AsRef<Path>, mut visit: F) -> Result<usize, E>
where
    E: From<ArchiveError>,
    F: FnMut(Loaded) -> Result<(), E>,
{
    let mut visited = 0;
    for path in list_files(dir.as_ref(), EXTENSION)? {
        let loaded = load_one(path)?;
        visited += 1;
        visit(loaded)?;
    }
    Ok(visited)
}
