use std::fs;
use std::io::Write;
use std::path::Path;
use std::process;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use log::info;

use goast::archive::{self, Archive, SaveOptions, EXTENSION};
use goast::cli::{ArchiveArgs, Cli, Command};
use goast::coverage::{self, ReportFormat};
use goast::verify::{self, Strictness};
use goast::{dump, query, ParseMode};

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .format(|buf, record| writeln!(buf, "{}:\n{}", record.level(), record.args()))
        .filter_level(cli.verbose.log_level_filter())
        .target(env_logger::fmt::Target::Stderr)
        .init();

    match cli.command {
        Command::Archive(args) => archive_files(&args),
        Command::Restore { archive: path } => {
            let archive = Archive::open(&path).with_context(|| format!("Could not restore {}", path.display()))?;
            print!("{}", archive.source_code());
            Ok(())
        }
        Command::Inspect { archive } => inspect(&archive),
        Command::Verify { files, strict } => {
            let strictness = if strict {
                Strictness::KindPreserving
            } else {
                Strictness::CountOnly
            };
            if !verify_files(&files, strictness)? {
                process::exit(1);
            }
            Ok(())
        }
        Command::Coverage {
            dir,
            archives,
            json,
            output,
        } => {
            let report = if archives {
                coverage::analyze_corpus(&dir)
            } else {
                coverage::analyze_sources(&dir)
            }
            .with_context(|| format!("Could not analyze {}", dir.display()))?;
            let format = if json { ReportFormat::Json } else { ReportFormat::Text };
            match output {
                Some(path) => {
                    report.save(&path, format)?;
                    info!("Wrote {}", path.display());
                }
                None => println!("{}", report.render(format)?),
            }
            Ok(())
        }
        Command::Dump { dir, out } => {
            let written = dump::write_dumps(&dir, &out).with_context(|| format!("Could not dump {}", dir.display()))?;
            ensure!(!written.is_empty(), "No Go files could be dumped from {}", dir.display());
            for path in &written {
                info!("Generated {}", path.display());
            }
            Ok(())
        }
    }
}

fn parse_path(path: &Path, mode: ParseMode) -> Result<goast::SyntaxTree> {
    let src = fs::read_to_string(path).with_context(|| format!("Could not read {}", path.display()))?;
    Ok(goast::parse_file(&path.to_string_lossy(), &src, mode)?)
}

fn archive_files(args: &ArchiveArgs) -> Result<()> {
    let mode = if args.no_comments {
        ParseMode::NONE
    } else {
        ParseMode::PARSE_COMMENTS
    };
    let options = SaveOptions {
        snapshot: !args.no_snapshot,
    };
    fs::create_dir_all(&args.out).with_context(|| format!("Could not create {}", args.out.display()))?;

    for file in &args.files {
        let tree = parse_path(file, mode)?;
        let stem = file
            .file_stem()
            .with_context(|| format!("{} has no file name", file.display()))?;
        let output = args.out.join(format!("{}.{EXTENSION}", stem.to_string_lossy()));
        archive::save(&tree, &file.to_string_lossy(), &output, &options)?;
        info!("Archived {} -> {}", file.display(), output.display());
    }
    Ok(())
}

fn inspect(path: &Path) -> Result<()> {
    let archive = Archive::open(path).with_context(|| format!("Could not inspect {}", path.display()))?;
    println!("file:      {}", archive.filename());
    println!("mode:      {}", archive.parse_mode());
    println!("snapshot:  {}", if archive.has_snapshot() { "yes" } else { "no" });
    for (key, value) in archive.all_metadata() {
        println!("{key}: {value}");
    }

    let tree = archive.reconstruct()?;
    println!("\nfunctions:");
    for function in query::functions(&tree) {
        match function.receiver {
            Some(recv) => println!("  ({recv}) {}", function.name),
            None => println!("  {}", function.name),
        }
    }
    println!("types:");
    for name in query::type_names(&tree) {
        println!("  {name}");
    }
    println!("imports:");
    for import in query::imports(&tree) {
        match import.name {
            Some(name) => println!("  {name} {:?}", import.path),
            None => println!("  {:?}", import.path),
        }
    }
    Ok(())
}

/// Round-trips every file through an archive in a scratch directory.
fn verify_files(files: &[impl AsRef<Path>], strictness: Strictness) -> Result<bool> {
    let scratch = tempfile::tempdir().context("Could not create a scratch directory")?;
    let mut all_ok = true;

    for (i, file) in files.iter().enumerate() {
        let file = file.as_ref();
        let original = parse_path(file, ParseMode::default())?;
        let output = scratch.path().join(format!("{i}.{EXTENSION}"));
        archive::save(&original, &file.to_string_lossy(), &output, &SaveOptions::default())?;
        let (restored, _) = archive::load(&output)?;

        let report = verify::check_with(&original, &restored, strictness);
        if report.is_ok() {
            println!("ok    {}", file.display());
        } else {
            all_ok = false;
            println!("FAIL  {}", file.display());
            for line in report.to_string().lines() {
                println!("      {line}");
            }
        }
    }
    Ok(all_ok)
}
