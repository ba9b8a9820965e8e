use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::InfoLevel;

/// Archive, restore and verify Go syntax trees.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity:
    /// -v -> Debug
    /// -vv -> Trace
    /// -q -> Warn
    /// -qq -> Error
    /// -qqq -> Off.
    /// Default (/ no argument given): 'info'
    #[command(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity<InfoLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone)]
pub struct ArchiveArgs {
    /// Go source files to archive
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Directory the archives are written to
    #[arg(short, long)]
    pub out: PathBuf,

    /// Do not store a structural snapshot
    #[arg(long, default_value_t = false)]
    pub no_snapshot: bool,

    /// Parse without collecting comments
    #[arg(long, default_value_t = false)]
    pub no_comments: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Parse Go files and save one archive per file.
    Archive(ArchiveArgs),
    /// Print the canonical text stored in an archive.
    Restore { archive: PathBuf },
    /// Print the metadata, functions, types and imports of an archive.
    Inspect { archive: PathBuf },
    /// Round-trip Go files through an archive and check fidelity.
    Verify {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Also compare the kinds of resolved objects
        #[arg(long, default_value_t = false)]
        strict: bool,
    },
    /// Report node-kind coverage of a directory.
    Coverage {
        dir: PathBuf,

        /// Read `.asta` archives instead of `.go` sources
        #[arg(long, default_value_t = false)]
        archives: bool,

        /// Print the report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Write the report to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Write an indented node tree for every Go file of a directory.
    Dump {
        dir: PathBuf,

        /// Directory the `.ast` files are written to
        #[arg(short, long)]
        out: PathBuf,
    },
}
