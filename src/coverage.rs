//! Node-kind coverage of a set of Go files.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use goast_syntax::{inspect, parse_file, NodeCategory, NodeKind, ParseMode, SyntaxTree};
use log::{debug, warn};
use serde::Serialize;

use crate::archive;
use crate::corpus;
use crate::error::ArchiveError;

/// Node counts of one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileCoverage {
    pub file_name: String,
    pub counts: BTreeMap<NodeKind, usize>,
    pub total_nodes: usize,
}

impl FileCoverage {
    pub fn unique_kinds(&self) -> usize {
        self.counts.len()
    }

    pub fn count(&self, kind: NodeKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }
}

pub fn tally(tree: &SyntaxTree) -> FileCoverage {
    let mut counts: BTreeMap<NodeKind, usize> = BTreeMap::new();
    let mut total_nodes = 0;
    inspect(tree, |kind, _| {
        *counts.entry(kind).or_default() += 1;
        total_nodes += 1;
    });
    FileCoverage {
        file_name: tree.filename().to_owned(),
        counts,
        total_nodes,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCoverage {
    pub category: NodeCategory,
    pub covered: Vec<NodeKind>,
    pub missing: Vec<NodeKind>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageReport {
    pub total_kinds: usize,
    pub covered_kinds: usize,
    pub coverage_percent: f64,
    /// Sorted by name
    pub covered: Vec<NodeKind>,
    /// Sorted by name
    pub missing: Vec<NodeKind>,
    pub categories: Vec<CategoryCoverage>,
    pub files: Vec<FileCoverage>,
}

impl CoverageReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn covers(&self, kinds: &[NodeKind]) -> bool {
        kinds.iter().all(|kind| self.covered.contains(kind))
    }

    /// Occurrences of each kind across all files.
    pub fn totals(&self) -> BTreeMap<NodeKind, usize> {
        let mut totals: BTreeMap<NodeKind, usize> = BTreeMap::new();
        for file in &self.files {
            for (&kind, &n) in &file.counts {
                *totals.entry(kind).or_default() += n;
            }
        }
        totals
    }
}

/// Aggregates per-file tallies.
///
/// A kind is covered when some file contains it. No walk produces `Package`,
/// so it is always reported missing.
pub fn summarize(files: Vec<FileCoverage>) -> CoverageReport {
    let seen = |kind: NodeKind| files.iter().any(|f| f.count(kind) > 0);
    let (mut covered, mut missing): (Vec<_>, Vec<_>) = NodeKind::ALL.iter().copied().partition(|&kind| seen(kind));
    covered.sort_by_key(|k| k.name());
    missing.sort_by_key(|k| k.name());

    let categories = NodeCategory::ALL
        .iter()
        .map(|&category| CategoryCoverage {
            category,
            covered: covered.iter().copied().filter(|k| k.category() == category).collect(),
            missing: missing.iter().copied().filter(|k| k.category() == category).collect(),
        })
        .collect();

    let total_kinds = NodeKind::ALL.len();
    CoverageReport {
        total_kinds,
        covered_kinds: covered.len(),
        coverage_percent: covered.len() as f64 * 100.0 / total_kinds as f64,
        covered,
        missing,
        categories,
        files,
    }
}

const GO_EXTENSION: &str = "go";

/// Tallies the `*.go` files directly inside `dir`.
///
/// Files that do not parse are logged and left out of the report.
pub fn analyze_sources(dir: impl AsRef<Path>) -> Result<CoverageReport, ArchiveError> {
    let dir = dir.as_ref();
    let mut files = Vec::new();
    for path in corpus::list_files(dir, GO_EXTENSION)? {
        let src = fs::read_to_string(&path).map_err(|e| ArchiveError::io("read", &path, e))?;
        match parse_file(&path.to_string_lossy(), &src, ParseMode::PARSE_COMMENTS) {
            Ok(tree) => files.push(tally(&tree)),
            Err(err) => warn!("Skipping {}: {err}", path.display()),
        }
    }
    debug!("Analyzed {} files in {}", files.len(), dir.display());
    Ok(summarize(files))
}

/// Tallies every archive in `dir`; any archive that fails to load fails the report.
pub fn analyze_corpus(dir: impl AsRef<Path>) -> Result<CoverageReport, ArchiveError> {
    let mut files = Vec::new();
    corpus::for_each(dir, |loaded| -> Result<(), ArchiveError> {
        files.push(tally(&loaded.tree));
        Ok(())
    })?;
    Ok(summarize(files))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl CoverageReport {
    /// The report as text or pretty-printed JSON.
    pub fn render(&self, format: ReportFormat) -> serde_json::Result<String> {
        match format {
            ReportFormat::Text => Ok(self.to_string()),
            ReportFormat::Json => serde_json::to_string_pretty(self),
        }
    }

    /// Writes the rendered report to `path`, replacing any previous report.
    pub fn save(&self, path: &Path, format: ReportFormat) -> Result<(), ArchiveError> {
        let mut text = self
            .render(format)
            .map_err(|e| ArchiveError::io("write report", path, e.into()))?;
        text.push('\n');
        archive::write_atomic(path, text.as_bytes()).map_err(|e| ArchiveError::io("write report", path, e))?;
        debug!("Wrote coverage report to {}", path.display());
        Ok(())
    }
}

const RULE: usize = 72;
const BAR: usize = 50;

fn base_name(path: &str) -> &str {
    Path::new(path).file_name().and_then(|n| n.to_str()).unwrap_or(path)
}

impl fmt::Display for CoverageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let heavy = "=".repeat(RULE);
        let light = "-".repeat(RULE);

        writeln!(f, "{heavy}\nGO SYNTAX NODE COVERAGE\n{heavy}")?;
        writeln!(f, "Node kinds:  {}", self.total_kinds)?;
        writeln!(f, "Covered:     {}", self.covered_kinds)?;
        writeln!(f, "Missing:     {}", self.missing.len())?;
        let filled = ((self.coverage_percent / 100.0) * BAR as f64) as usize;
        writeln!(
            f,
            "Coverage:    [{}{}] {:.2}%\n",
            "#".repeat(filled.min(BAR)),
            ".".repeat(BAR - filled.min(BAR)),
            self.coverage_percent
        )?;

        writeln!(f, "FILES\n{light}")?;
        for file in &self.files {
            writeln!(
                f,
                "{:<32} nodes: {:>6}  kinds: {:>3}",
                base_name(&file.file_name),
                file.total_nodes,
                file.unique_kinds()
            )?;
        }

        writeln!(f, "\nBY CATEGORY\n{light}")?;
        for cat in &self.categories {
            let total = cat.covered.len() + cat.missing.len();
            writeln!(f, "{} ({}/{total})", cat.category, cat.covered.len())?;
            for kind in &cat.covered {
                writeln!(f, "  + {kind}")?;
            }
            for kind in &cat.missing {
                writeln!(f, "  - {kind}")?;
            }
        }
        write!(f, "{heavy}")
    }
}
