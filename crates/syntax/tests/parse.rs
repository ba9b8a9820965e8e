use goast_syntax::error::DiagKind;
use goast_syntax::{parse_file, ParseMode, Snapshot, SyntaxTree};

fn parse(src: &str) -> SyntaxTree {
    parse_file("parse.go", src, ParseMode::default()).expect("parse")
}

#[test]
fn package_metadata() {
    let tree = parse(
        "package shapes\n\
         import \"fmt\"\n\
         import (\n\
         \t\"math\"\n\
         \tstr \"strings\"\n\
         )\n\
         type Circle struct{ R float64 }\n\
         func (c Circle) Area() float64 { return math.Pi * c.R * c.R }\n\
         func main() { fmt.Println(str.ToUpper(\"x\")) }\n",
    );
    assert_eq!(tree.package_name(), "shapes");
    assert_eq!(tree.decl_count(), 5);
    assert_eq!(tree.import_count(), 3);
    assert_eq!(tree.filename(), "parse.go");
}

#[test]
fn source_and_mode_are_kept() {
    let src = "package p\n";
    let tree = parse_file("x.go", src, ParseMode::NONE).expect("parse");
    assert_eq!(tree.source(), src);
    assert_eq!(tree.mode(), ParseMode::NONE);
    assert!(tree.resolution().is_some());
}

#[test]
fn first_syntax_error_aborts() {
    let err = parse_file("bad.go", "package p\nfunc f( {\n", ParseMode::default()).unwrap_err();
    assert_eq!(err.filename, "bad.go");
    assert_eq!(err.diags.len(), 1);
    assert_eq!(err.diags[0].kind, DiagKind::Parse);
    assert!(err.to_string().starts_with("bad.go: "), "{err}");
}

#[test]
fn lexer_errors_come_first() {
    let err = parse_file("lex.go", "package p\nvar x = 0x\nvar y = \"\\q\"\n", ParseMode::default()).unwrap_err();
    assert!(err.diags.len() >= 2);
    assert!(err.diags.iter().all(|d| d.kind == DiagKind::Lex));
}

#[test]
fn missing_package_clause() {
    assert!(parse_file("np.go", "func f() {}\n", ParseMode::default()).is_err());
}

#[test]
fn accepts_modern_syntax() {
    for src in [
        "package p\nfunc f() { for i := range 10 { _ = i } }\n",
        "package p\ntype Set[T comparable] map[T]struct{}\n",
        "package p\ntype A = int\n",
        "package p\nfunc F[S ~[]E, E any](s S) {}\n",
        "package p\nvar ch <-chan chan<- int\n",
        "package p\nfunc f() { defer func() { recover() }() }\n",
        "package p\nvar a [...]string\n",
        "package p\nfunc stub(int) int\n",
    ] {
        parse_file("m.go", src, ParseMode::default()).unwrap_or_else(|e| panic!("{src}: {e}"));
    }
}

#[test]
fn snapshot_round_trip_keeps_structure() {
    let src = "package p\n\n// doc\nfunc f() int {\n\treturn 1\n}\n";
    let tree = parse(src);
    let decls = tree.decl_count();
    let snapshot: Snapshot = tree.into_snapshot();
    let rebuilt = SyntaxTree::from_snapshot("p.go", src, ParseMode::default(), snapshot);
    assert_eq!(rebuilt.decl_count(), decls);
    assert!(rebuilt.resolution().is_none());
    assert!(rebuilt.mode().contains(ParseMode::SKIP_OBJECT_RESOLUTION));
    assert_eq!(goast_syntax::format_tree(&rebuilt).expect("format"), src);
}

#[test]
fn parse_mode_bits() {
    assert_eq!(ParseMode::default(), ParseMode::PARSE_COMMENTS);
    assert_eq!(ParseMode::from_bits(0b11), Some(ParseMode::PARSE_COMMENTS | ParseMode::SKIP_OBJECT_RESOLUTION));
    assert_eq!(ParseMode::from_bits(0b100), None);
    assert_eq!(
        (ParseMode::PARSE_COMMENTS | ParseMode::SKIP_OBJECT_RESOLUTION).to_string(),
        "PARSE_COMMENTS | SKIP_OBJECT_RESOLUTION"
    );
    assert_eq!(ParseMode::NONE.to_string(), "NONE");
}
