use std::fs;
use std::path::Path;

use goast::dump::{self, render};
use goast::{parse_file, ArchiveError, ParseMode};
use goast_syntax::kind::node_count;

const GREET: &str = "package main

import \"fmt\"

// Say greets.
func Say() {
\tfmt.Println(\"hi\")
}
";

fn node_lines(text: &str) -> Vec<&str> {
    let (_, nodes) = text.split_once("=== node tree ===\n\n").expect("node section");
    nodes.lines().collect()
}

fn indent(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

#[test]
fn file_information() {
    let tree = parse_file("dir/greet.go", GREET, ParseMode::default()).expect("parse");
    let text = render(&tree);
    assert!(text.starts_with("=== syntax tree of greet.go ===\n"));
    assert!(text.contains("\n  Package: main\n"));
    assert!(text.contains("\n  Imports:\n    \"fmt\"\n"));
    assert!(text.contains("\n  Comment groups: 1\n"));
    assert!(text.contains("\n  Declarations: 2\n"));
}

#[test]
fn one_line_per_node_indented_by_nesting() {
    let tree = parse_file("greet.go", GREET, ParseMode::default()).expect("parse");
    let text = render(&tree);
    let lines = node_lines(&text);
    assert_eq!(lines.len(), node_count(&tree));
    assert_eq!(lines[0], "File 1:1");
    assert!(lines.contains(&"  Ident 1:9 main"));

    let call = lines
        .iter()
        .position(|l| l.trim_start().starts_with("CallExpr 7:2"))
        .expect("call");
    let literal = lines
        .iter()
        .position(|l| l.trim_start() == "BasicLit 7:14 \"hi\"")
        .expect("literal");
    assert!(literal > call);
    assert!(indent(lines[literal]) > indent(lines[call]));
}

#[test]
fn multi_line_literals_stay_on_one_line() {
    let src = "package p\n\nvar s = `a\nb`\n";
    let tree = parse_file("raw.go", src, ParseMode::default()).expect("parse");
    let text = render(&tree);
    assert!(node_lines(&text).iter().any(|l| l.trim_start() == "BasicLit 3:9 `a\\nb`"));
}

#[test]
fn writes_one_dump_per_parsable_file() {
    let src = tempfile::tempdir().expect("tempdir");
    fs::write(src.path().join("b.go"), "package p\nfunc (\n").expect("write");
    fs::write(src.path().join("a.go"), "package p\n\nvar x = 1\n").expect("write");
    fs::write(src.path().join("notes.txt"), "not go").expect("write");
    let out = tempfile::tempdir().expect("tempdir");
    let target = out.path().join("dumps");

    let written = dump::write_dumps(src.path(), &target).expect("dump");
    assert_eq!(written, vec![target.join("a.ast")]);
    let text = fs::read_to_string(&written[0]).expect("read");
    assert!(text.starts_with("=== syntax tree of a.go ===\n"));
    assert!(text.contains("ValueSpec 3:5"));
}

#[test]
fn dumps_every_fixture() {
    let fixtures = Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/testdata/go-nodes"));
    let out = tempfile::tempdir().expect("tempdir");
    let written = dump::write_dumps(fixtures, out.path()).expect("dump");
    let names: Vec<_> = written
        .iter()
        .map(|p| p.file_name().expect("name").to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["declarations.ast", "expressions.ast", "statements.ast", "types.ast"]);
}

#[test]
fn source_must_be_a_directory() {
    let out = tempfile::tempdir().expect("tempdir");
    let file = out.path().join("lone.go");
    fs::write(&file, "package p\n").expect("write");
    let err = dump::write_dumps(&file, &out.path().join("dumps")).unwrap_err();
    assert!(matches!(err, ArchiveError::NotADirectory { .. }), "{err}");
}
