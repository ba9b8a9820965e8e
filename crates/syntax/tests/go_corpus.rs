use goast_syntax::{format_tree, parse_file, ParseMode};
use walkdir::WalkDir;

/// Parses and formats every `.go` file under `$GOAST_CORPUS`, checking that the
/// canonical text is a fixed point.
#[test]
fn canonical_text_is_stable_over_corpus() {
    let Some(root) = std::env::var_os("GOAST_CORPUS") else {
        eprintln!("GOAST_CORPUS not set; skipping corpus test");
        return;
    };

    let mut total = 0usize;
    for entry in WalkDir::new(&root).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().and_then(|e| e.to_str()) != Some("go") {
            continue;
        }
        // testdata trees hold deliberately broken files.
        if path.components().any(|c| c.as_os_str() == "testdata") {
            continue;
        }
        let Ok(src) = std::fs::read_to_string(path) else {
            continue;
        };
        let name = path.display().to_string();

        let tree = match parse_file(&name, &src, ParseMode::default()) {
            Ok(tree) => tree,
            Err(err) => {
                for d in err.diags.iter().take(8) {
                    eprintln!("  {:?} {:?}: {}", d.kind, d.span, d.message);
                }
                panic!("parse failed after {total} files: {name}");
            }
        };
        let once = format_tree(&tree).unwrap_or_else(|e| panic!("{name}: {e}"));
        let again = parse_file(&name, &once, ParseMode::default()).unwrap_or_else(|e| panic!("reparse {e}"));
        let twice = format_tree(&again).unwrap_or_else(|e| panic!("{name}: {e}"));
        assert!(once == twice, "canonical text of {name} is not stable");
        total += 1;
    }

    eprintln!("formatted {total} Go files");
}
