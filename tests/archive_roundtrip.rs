use std::fs;
use std::path::Path;

use goast::archive::{self, meta, Archive, MetaValue, SaveOptions};
use goast::codec::DecodeError;
use goast::verify::{self, resolved_occurrences, FidelityAxis, FidelityError, Strictness};
use goast::{format_tree, parse_file, ArchiveError, ParseMode, SyntaxTree};
use proptest::prelude::*;
use tempfile::TempDir;

const SIMPLE: &str = "package main\nimport \"fmt\"\nfunc main(){x:=42; fmt.Println(x)}";

const SCOPES: &str = "package shapes

var registry = map[string]int{}

type Square struct {
\tside int
}

func (s *Square) Area() int {
\tif area := s.side * s.side; area > 0 {
\t\treturn area
\t}
\treturn 0
}

func Sum(xs []int) int {
\ttotal := 0
\tfor i := 0; i < len(xs); i++ {
\t\ttotal += xs[i]
\t}
\tadd := func(n int) { total += n }
\tadd(registry[\"extra\"])
\treturn total
}
";

fn parse(src: &str) -> SyntaxTree {
    parse_file("input.go", src, ParseMode::default()).expect("parse")
}

fn round_trip(src: &str, mode: ParseMode, options: &SaveOptions) -> (SyntaxTree, SyntaxTree, TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("unit.asta");
    let original = parse_file("input.go", src, mode).expect("parse");
    archive::save(&original, "input.go", &path, options).expect("save");
    let (restored, _) = archive::load(&path).expect("load");
    (original, restored, dir)
}

#[test]
fn simple_program_round_trips() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("main.asta");
    let original = parse(SIMPLE);
    archive::save(&original, "main.go", &path, &SaveOptions::default()).expect("save");

    let (restored, text) = archive::load(&path).expect("load");
    assert_eq!(text, format_tree(&original).expect("format"));
    assert_eq!(restored.filename(), "main.go");
    assert_eq!(restored.source(), text);
    verify::verify(&original, &restored).expect("fidelity");

    let res = restored.resolution().expect("resolved");
    assert_eq!(res.binding_count(), 3);
    assert_eq!(resolved_occurrences(&restored).0, 3);
}

#[test]
fn scopes_are_rebuilt() {
    let (original, restored, _dir) = round_trip(SCOPES, ParseMode::default(), &SaveOptions::default());
    let (count, _) = resolved_occurrences(&original);
    assert!(count > 0);
    assert_eq!(resolved_occurrences(&restored).0, count);
    verify::verify_with(&original, &restored, Strictness::KindPreserving).expect("fidelity");
}

#[test]
fn generics_and_comments_round_trip() {
    let src = "// Package coll has containers.
package coll

// Stack is a LIFO.
type Stack[T any] struct {
\titems []T // backing store
}

/* Push adds v. */
func (s *Stack[T]) Push(v T) {
\ts.items = append(s.items, v)
}

func Map[T, U any](xs []T, f func(T) U) []U {
\tvar out []U
\tfor _, x := range xs {
\t\tout = append(out, f(x))
\t}
\treturn out
}
";
    let (original, restored, _dir) = round_trip(src, ParseMode::default(), &SaveOptions::default());
    let report = verify::check(&original, &restored);
    assert!(report.is_ok(), "{report}");
    assert!(format_tree(&restored).expect("format").contains("// backing store"));
}

#[test]
fn metadata_is_recorded() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("m.asta");
    let tree = parse(
        "package geo\nimport (\n\t\"fmt\"\n\t\"math\"\n)\nconst Pi = 3\nfunc Dist() float64 { return math.Sqrt(2) }\nfunc Show() { fmt.Println(Pi) }\n",
    );
    archive::save(&tree, "geo.go", &path, &SaveOptions::default()).expect("save");

    let archive = Archive::open(&path).expect("open");
    assert_eq!(archive.filename(), "geo.go");
    assert_eq!(archive.parse_mode(), ParseMode::PARSE_COMMENTS);
    assert_eq!(archive.package_name(), Some("geo"));
    assert_eq!(archive.declaration_count(), Some(4));
    assert_eq!(archive.import_count(), Some(2));
    assert_eq!(archive.metadata(meta::NUM_IMPORTS), Some(&MetaValue::Int(2)));
    assert_eq!(archive.metadata(meta::PACKAGE).and_then(MetaValue::as_bool), None);
    assert_eq!(MetaValue::Bool(true).as_bool(), Some(true));
    assert_eq!(archive.metadata("missing"), None);
    assert_eq!(archive.all_metadata().len(), 3);
}

#[test]
fn snapshot_gives_structure_without_parsing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("s.asta");
    let original = parse(SCOPES);
    archive::save(&original, "s.go", &path, &SaveOptions::default()).expect("save");

    let archive = Archive::open(&path).expect("open");
    assert!(archive.has_snapshot());
    let structure = archive.snapshot().expect("snapshot");
    assert!(structure.resolution().is_none());
    assert_eq!(structure.decl_count(), original.decl_count());
    assert_eq!(format_tree(&structure).expect("format"), archive.source_code());
    assert_eq!(
        archive.node_count().expect("count"),
        goast_syntax::kind::node_count(&original)
    );
}

#[test]
fn archive_without_snapshot() {
    let options = SaveOptions { snapshot: false };
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bare.asta");
    let original = parse(SCOPES);
    archive::save(&original, "bare.go", &path, &options).expect("save");

    let archive = Archive::open(&path).expect("open");
    assert!(!archive.has_snapshot());
    assert!(archive.snapshot().is_none());
    assert!(archive.structure().expect("structure").resolution().is_none());

    let restored = archive.reconstruct().expect("reconstruct");
    let report = verify::check(&original, &restored);
    assert!(report.is_ok(), "{report}");
}

#[test]
fn truncated_archive_is_a_decode_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("t.asta");
    archive::save(&parse(SIMPLE), "t.go", &path, &SaveOptions::default()).expect("save");

    let bytes = fs::read(&path).expect("read");
    fs::write(&path, &bytes[..bytes.len() - bytes.len() / 10]).expect("truncate");

    let err = archive::load(&path).unwrap_err();
    assert!(matches!(err, ArchiveError::Decode { .. }), "{err}");
    assert!(matches!(err.as_decode(), Some(DecodeError::Truncated { .. })));
    assert_eq!(err.path(), path);
}

#[test]
fn corrupted_payload_fails_the_checksum() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("c.asta");
    archive::save(&parse(SIMPLE), "c.go", &path, &SaveOptions::default()).expect("save");

    let mut bytes = fs::read(&path).expect("read");
    let mid = bytes.len() / 2;
    bytes[mid] ^= 0x55;
    fs::write(&path, &bytes).expect("write");
    assert!(matches!(
        Archive::open(&path).unwrap_err().as_decode(),
        Some(DecodeError::ChecksumMismatch)
    ));
}

#[test]
fn failed_save_leaves_nothing_behind() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("missing").join("x.asta");
    let err = archive::save(&parse(SIMPLE), "x.go", &path, &SaveOptions::default()).unwrap_err();
    assert!(matches!(err, ArchiveError::Io { op: "save", .. }), "{err}");
    assert!(!path.exists());
}

#[test]
fn successful_save_leaves_only_the_archive() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("only.asta");
    archive::save(&parse(SIMPLE), "only.go", &path, &SaveOptions::default()).expect("save");
    archive::save(&parse(SCOPES), "only.go", &path, &SaveOptions::default()).expect("overwrite");

    let names: Vec<_> = fs::read_dir(dir.path())
        .expect("list")
        .map(|e| e.expect("entry").file_name())
        .collect();
    assert_eq!(names, vec![std::ffi::OsString::from("only.asta")]);
    assert_eq!(Archive::open(&path).expect("open").package_name(), Some("shapes"));
}

#[test]
fn missing_file() {
    let err = Archive::open(Path::new("/nonexistent/dir/none.asta")).unwrap_err();
    assert!(matches!(err, ArchiveError::Io { op: "open", .. }));
}

#[test]
fn text_difference_reports_the_line() {
    let original = parse("package p\nvar v int\nfunc f() { _ = v }\n");
    let other = parse("package p\nconst v = 1\nfunc f() { _ = v }\n");

    let err = verify::verify(&original, &other).unwrap_err();
    assert_eq!(
        err,
        FidelityError::CanonicalText {
            line: 3,
            original: "var v int".into(),
            restored: "const v = 1".into(),
        }
    );
    assert_eq!(err.axis(), FidelityAxis::CanonicalText);

    // Same number of resolved occurrences, different object kinds.
    assert_eq!(verify::check(&original, &other).failed_axes(), vec![FidelityAxis::CanonicalText]);
    assert_eq!(
        verify::check_with(&original, &other, Strictness::KindPreserving).failed_axes(),
        vec![FidelityAxis::CanonicalText, FidelityAxis::ObjectKinds]
    );
}

#[test]
fn archives_keep_the_mode_the_tree_was_parsed_with() {
    let src = "package p\n\n// doc\nfunc f() { x := 1; _ = x }\n";
    for mode in [
        ParseMode::NONE,
        ParseMode::PARSE_COMMENTS,
        ParseMode::SKIP_OBJECT_RESOLUTION,
        ParseMode::PARSE_COMMENTS | ParseMode::SKIP_OBJECT_RESOLUTION,
    ] {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("mode.asta");
        let original = parse_file("mode.go", src, mode).expect("parse");
        archive::save(&original, "mode.go", &path, &SaveOptions::default()).expect("save");

        let archive = Archive::open(&path).expect("open");
        assert_eq!(archive.parse_mode(), mode);
        assert_eq!(archive.source_code().contains("// doc"), mode.contains(ParseMode::PARSE_COMMENTS));
        let snapshot = archive.snapshot().expect("snapshot");
        assert_eq!(format_tree(&snapshot).expect("format"), archive.source_code());

        let restored = archive.reconstruct().expect("reconstruct");
        assert_eq!(restored.resolution().is_some(), original.resolution().is_some());
        let report = verify::check(&original, &restored);
        assert!(report.is_ok(), "{mode}: {report}");
    }
}

#[test]
fn file_scopes_of_different_size() {
    let original = parse("package p\n\nvar a, b int\n");
    let other = parse("package p\n\nfunc f(a int) {}\n");
    let report = verify::check(&original, &other);
    assert!(report.failed_axes().contains(&FidelityAxis::ScopeShape), "{report}");
    assert!(report.failures().contains(&FidelityError::BindingCount {
        original: 2,
        restored: 1,
    }));
}

#[test]
fn missing_resolution_is_caught() {
    let original = parse(SIMPLE);
    let unresolved = parse_file("input.go", SIMPLE, ParseMode::PARSE_COMMENTS | ParseMode::SKIP_OBJECT_RESOLUTION)
        .expect("parse");
    let report = verify::check(&original, &unresolved);
    assert_eq!(
        report.failed_axes(),
        vec![FidelityAxis::ScopeShape, FidelityAxis::ResolvedCount]
    );
    assert_eq!(
        report.failures()[0],
        FidelityError::FileScope {
            original: true,
            restored: false,
        }
    );
    assert_eq!(
        report.failures()[1],
        FidelityError::ResolvedCount {
            original: 3,
            restored: 0,
        }
    );
}

#[test]
fn trees_and_archives_cross_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SyntaxTree>();
    assert_send_sync::<Archive>();
    assert_send_sync::<ArchiveError>();
}

const DECLS: &[&str] = &[
    "var counter int",
    "const limit = 10",
    "type Pair struct{ A, B int }",
    "type List[T any] []T",
    "func inc() { counter++ }",
    "func (p Pair) Sum() int { return p.A + p.B }",
    "func loop() { for i := 0; i < limit; i++ { if j := i * 2; j > 3 { _ = j } } }",
    "func closure() func() int { n := 0; return func() int { n++; return n } }",
    "func sw(v any) { switch t := v.(type) { case int: _ = t } }",
    "// comment\nvar docs = []string{\"a\", \"b\"}",
    "func labels() {\nouter:\n\tfor { break outer }\n}",
    "func ranges(m map[string]int) { for k, v := range m { _, _ = k, v } }",
];

fn program() -> impl Strategy<Value = String> {
    prop::sample::subsequence(DECLS, 0..DECLS.len()).prop_map(|decls| {
        let mut src = String::from("package gen\n");
        for decl in decls {
            src.push_str(decl);
            src.push('\n');
        }
        src
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 32,
        .. ProptestConfig::default()
    })]

    #[test]
    fn archives_preserve_fidelity(src in program(), snapshot in any::<bool>()) {
        let options = SaveOptions { snapshot };
        let (original, restored, _dir) = round_trip(&src, ParseMode::default(), &options);
        let report = verify::check_with(&original, &restored, Strictness::KindPreserving);
        prop_assert!(report.is_ok(), "{}\n{}", report, src);
    }
}
