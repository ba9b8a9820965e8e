use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use goast::archive::{self, Bundle, SaveOptions};
use goast::codec;
use goast::corpus::{for_each, load_all, load_one};
use goast::query;
use goast::{parse_file, ArchiveError, NodeKind, ParseMode};

const PERSON: &str = "package people

import \"fmt\"

type Person struct {
\tName string
\tAge  int
}

func NewPerson(name string, age int) *Person {
\treturn &Person{Name: name, Age: age}
}

func (p *Person) Greet() string {
\treturn fmt.Sprintf(\"hi, %s\", p.Name)
}

func (p Person) Adult() bool {
\tif p.Age >= 18 {
\t\treturn true
\t}
\treturn false
}
";

fn write_archive(dir: &Path, name: &str, src: &str) {
    let tree = parse_file(name, src, ParseMode::default()).expect("parse");
    let out = dir.join(name).with_extension("asta");
    archive::save(&tree, name, &out, &SaveOptions::default()).expect("save");
}

fn populated() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    write_archive(dir.path(), "b.go", "package b\nfunc B() {}\n");
    write_archive(dir.path(), "a.go", "package a\nvar A = 1\n");
    fs::write(dir.path().join("notes.txt"), "not an archive").expect("write");
    fs::create_dir(dir.path().join("nested.asta")).expect("mkdir");
    dir
}

#[test]
fn load_all_is_sorted_and_skips_other_entries() {
    let dir = populated();
    let archives = load_all(dir.path()).expect("load_all");
    let packages: Vec<_> = archives
        .iter()
        .map(|loaded| loaded.archive.package_name().expect("package"))
        .collect();
    assert!(archives.iter().all(|loaded| loaded.tree.resolution().is_some()));
    assert_eq!(packages, vec!["a", "b"]);
}

#[test]
fn one_corrupt_archive_fails_the_whole_load() {
    let dir = populated();
    fs::write(dir.path().join("c.asta"), b"ASTA garbage").expect("write");
    let err = load_all(dir.path()).unwrap_err();
    assert!(matches!(err, ArchiveError::Decode { .. }), "{err}");
    assert_eq!(err.path(), dir.path().join("c.asta"));
}

#[test]
fn missing_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = load_all(dir.path().join("absent")).unwrap_err();
    assert!(matches!(err, ArchiveError::Directory { .. }), "{err}");
    assert_eq!(err.op(), "list");
}

#[test]
fn a_file_is_not_a_directory() {
    let dir = populated();
    let file = dir.path().join("a.asta");
    let err = load_all(&file).unwrap_err();
    assert!(matches!(err, ArchiveError::NotADirectory { .. }), "{err}");
    assert_eq!(err.op(), "list");
    assert_eq!(err.path(), file);

    let result = for_each(&file, |_| -> Result<(), ArchiveError> { Ok(()) });
    assert!(matches!(result, Err(ArchiveError::NotADirectory { .. })));
}

#[test]
fn archive_text_that_no_longer_parses_fails_the_load() {
    let dir = populated();
    let bundle = Bundle {
        source_code: "package broken\nfunc (\n".to_owned(),
        filename: "broken.go".to_owned(),
        parse_mode: ParseMode::default(),
        snapshot: None,
        metadata: BTreeMap::new(),
    };
    let path = dir.path().join("broken.asta");
    fs::write(&path, codec::encode(&bundle).expect("encode")).expect("write");

    let err = load_all(dir.path()).unwrap_err();
    assert!(matches!(err, ArchiveError::Parse { op: "reconstruct", .. }), "{err}");
    assert_eq!(err.path(), path);
}

#[test]
fn for_each_visits_every_archive() {
    let dir = populated();
    let mut seen = Vec::new();
    let visited = for_each(dir.path(), |loaded| -> Result<(), ArchiveError> {
        seen.push(loaded.archive.filename().to_owned());
        Ok(())
    })
    .expect("walk");
    assert_eq!(visited, 2);
    assert_eq!(seen, vec!["a.go", "b.go"]);
}

#[derive(Debug)]
enum WalkError {
    Archive(ArchiveError),
    Stop,
}

impl From<ArchiveError> for WalkError {
    fn from(err: ArchiveError) -> Self {
        Self::Archive(err)
    }
}

#[test]
fn for_each_stops_at_the_first_visitor_error() {
    let dir = populated();
    let mut calls = 0;
    let result = for_each(dir.path(), |_| {
        calls += 1;
        Err(WalkError::Stop)
    });
    assert!(matches!(result, Err(WalkError::Stop)));
    assert_eq!(calls, 1);
}

#[test]
fn for_each_stops_at_a_corrupt_archive() {
    let dir = populated();
    fs::write(dir.path().join("0.asta"), b"nope").expect("write");
    let mut calls = 0;
    let result = for_each(dir.path(), |_| -> Result<(), WalkError> {
        calls += 1;
        Ok(())
    });
    assert!(matches!(result, Err(WalkError::Archive(ArchiveError::Decode { .. }))));
    assert_eq!(calls, 0);
}

#[test]
fn consumer_api() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_archive(dir.path(), "person.go", PERSON);

    let loaded = load_one(dir.path().join("person.asta")).expect("load");
    let tree = &loaded.tree;

    let functions = query::functions(tree);
    assert_eq!(functions.len(), 3);
    assert_eq!(query::function_names(tree), vec!["NewPerson", "Greet", "Adult"]);
    assert_eq!(
        functions.iter().map(|f| f.receiver).collect::<Vec<_>>(),
        vec![None, Some("Person"), Some("Person")]
    );
    assert_eq!(functions.iter().filter(|f| f.is_method()).count(), 2);

    let types = query::types(tree);
    assert_eq!(types.len(), 1);
    assert_eq!(types[0].name, "Person");
    assert!(!types[0].is_alias());

    assert_eq!(query::import_paths(tree), vec!["fmt"]);
    assert_eq!(query::find_by_kind(tree, NodeKind::ReturnStmt).len(), 4);
    assert_eq!(query::find_by_kind(tree, NodeKind::IfStmt).len(), 1);
}

#[test]
fn import_names() {
    let tree = parse_file(
        "i.go",
        "package p\nimport (\n\tf \"fmt\"\n\t_ \"embed\"\n\t. \"math\"\n\t\"strings\"\n)\n",
        ParseMode::default(),
    )
    .expect("parse");
    let imports: Vec<_> = query::imports(&tree).into_iter().map(|i| (i.name, i.path)).collect();
    assert_eq!(
        imports,
        vec![
            (Some("f"), "fmt"),
            (Some("_"), "embed"),
            (Some("."), "math"),
            (None, "strings"),
        ]
    );
}

#[test]
fn generic_and_alias_types() {
    let tree = parse_file(
        "t.go",
        "package p\ntype (\n\tID = int\n\tSet[T comparable] map[T]struct{}\n)\nfunc f() { type local int }\n",
        ParseMode::default(),
    )
    .expect("parse");
    let types = query::types(&tree);
    assert_eq!(query::type_names(&tree), vec!["ID", "Set"]);
    assert!(types[0].is_alias());
    assert!(types[1].is_generic());
}
