//! Human-readable syntax tree dumps, one `.ast` file per Go source.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use goast_syntax::ast::Span;
use goast_syntax::{inspect, parse_file, NodeKind, ParseMode, SyntaxTree};
use log::{debug, warn};

use crate::archive::write_atomic;
use crate::corpus;
use crate::error::ArchiveError;
use crate::query;

/// File extension of dumps, without the dot.
pub const EXTENSION: &str = "ast";

const INDENT: &str = "  ";

/// Displays a file summary followed by every node of the tree, one per line,
/// indented by nesting depth.
pub struct Dump<'t>(pub &'t SyntaxTree);

impl Dump<'_> {
    fn nodes(&self) -> Vec<(NodeKind, Span)> {
        let mut nodes = Vec::new();
        inspect(self.0, |kind, span| nodes.push((kind, span)));
        nodes
    }
}

/// 1-based line and byte column of source offsets.
struct Lines {
    starts: Vec<usize>,
}

impl Lines {
    fn new(src: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(src.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { starts }
    }

    fn position(&self, offset: usize) -> (usize, usize) {
        let line = self.starts.partition_point(|&start| start <= offset).max(1);
        (line, offset - self.starts[line - 1] + 1)
    }
}

fn contains(outer: Span, inner: Span) -> bool {
    outer.start <= inner.start && inner.end <= outer.end
}

impl fmt::Display for Dump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tree = self.0;
        let name = Path::new(tree.filename())
            .file_name()
            .map_or_else(|| tree.filename().into(), |n| n.to_string_lossy());
        writeln!(f, "=== syntax tree of {name} ===\n")?;

        writeln!(f, "File information:")?;
        writeln!(f, "{INDENT}Package: {}", tree.package_name())?;
        let imports = query::imports(tree);
        if !imports.is_empty() {
            writeln!(f, "{INDENT}Imports:")?;
            for import in imports {
                match import.name {
                    Some(local) => writeln!(f, "{INDENT}{INDENT}{local} {:?}", import.path)?,
                    None => writeln!(f, "{INDENT}{INDENT}{:?}", import.path)?,
                }
            }
        }
        let groups = tree.arena().comment_group_ids(tree.file().comments).len();
        if groups > 0 {
            writeln!(f, "{INDENT}Comment groups: {groups}")?;
        }
        writeln!(f, "{INDENT}Declarations: {}", tree.decl_count())?;

        writeln!(f, "\n=== node tree ===\n")?;
        let lines = Lines::new(tree.source());
        let mut open: Vec<Span> = Vec::new();
        for (kind, span) in self.nodes() {
            while open.last().is_some_and(|&parent| !contains(parent, span)) {
                open.pop();
            }
            let (line, col) = lines.position(span.start as usize);
            write!(f, "{}{kind} {line}:{col}", INDENT.repeat(open.len()))?;
            if matches!(kind, NodeKind::Ident | NodeKind::BasicLit) {
                if let Some(text) = tree.text(span) {
                    write!(f, " {}", text.replace('\n', "\\n"))?;
                }
            }
            writeln!(f)?;
            open.push(span);
        }
        Ok(())
    }
}

/// Dump of `tree` as a string.
pub fn render(tree: &SyntaxTree) -> String {
    Dump(tree).to_string()
}

/// Writes a dump of every `*.go` file directly inside `src_dir` into
/// `out_dir`, creating it if needed.
///
/// Files that do not parse are logged and skipped. Returns the dumps written,
/// in file name order.
pub fn write_dumps(src_dir: &Path, out_dir: &Path) -> Result<Vec<PathBuf>, ArchiveError> {
    fs::create_dir_all(out_dir).map_err(|e| ArchiveError::io("dump", out_dir, e))?;

    let mut written = Vec::new();
    for path in corpus::list_files(src_dir, "go")? {
        let src = fs::read_to_string(&path).map_err(|e| ArchiveError::io("read", &path, e))?;
        let mode = ParseMode::PARSE_COMMENTS | ParseMode::SKIP_OBJECT_RESOLUTION;
        let tree = match parse_file(&path.to_string_lossy(), &src, mode) {
            Ok(tree) => tree,
            Err(err) => {
                warn!("Skipping {}: {err}", path.display());
                continue;
            }
        };
        let stem = path.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
        let output = out_dir.join(format!("{stem}.{EXTENSION}"));
        write_atomic(&output, render(&tree).as_bytes()).map_err(|e| ArchiveError::io("dump", &output, e))?;
        debug!("Dumped {} -> {}", path.display(), output.display());
        written.push(output);
    }
    Ok(written)
}
