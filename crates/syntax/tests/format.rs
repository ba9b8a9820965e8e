use goast_syntax::{format_tree, parse_file, ParseMode};
use proptest::prelude::*;

fn fmt(src: &str) -> String {
    let tree = parse_file("fmt.go", src, ParseMode::default()).unwrap_or_else(|e| panic!("{e}\n{src}"));
    format_tree(&tree).expect("format")
}

fn assert_canonical(src: &str) {
    assert_eq!(fmt(src), src);
}

#[test]
fn normalizes_layout() {
    assert_eq!(
        fmt("package p\nfunc f(){x:=1;_=x}"),
        "package p\n\nfunc f() {\n\tx := 1\n\t_ = x\n}\n"
    );
}

#[test]
fn canonical_program_is_a_fixed_point() {
    assert_canonical(
        "package main

import (
\t\"fmt\"
\tm \"math\"
)

// Point is a point.
type Point struct {
\tX, Y int `json:\"x\"`
}

func (p *Point) Add(q Point) Point {
\treturn Point{X: p.X + q.X, Y: p.Y + q.Y}
}

func main() {
\tfor i := 0; i < 3; i++ {
\t\tfmt.Println(i, m.Pi)
\t}
}
",
    );
}

#[test]
fn generics() {
    assert_canonical(
        "package p

type Number interface {
\t~int | ~float64
}

func Map[T any, U any](xs []T, f func(T) U) []U {
\tout := make([]U, 0, len(xs))
\tfor _, x := range xs {
\t\tout = append(out, f(x))
\t}
\treturn out
}

type Pair[K comparable, V any] struct {
\tKey K
\tVal V
}

func (p Pair[K, V]) Swap() Pair[V, K] {
\treturn Pair[V, K]{Key: p.Val, Val: p.Key}
}
",
    );
}

#[test]
fn control_flow() {
    assert_canonical(
        "package p

func f(v any, ch chan int) {
\tswitch x := g(); x {
\tcase 1, 2:
\t\th()
\tdefault:
\t}
\tswitch t := v.(type) {
\tcase int, string:
\t\t_ = t
\t}
\tselect {
\tcase n := <-ch:
\t\t_ = n
\tdefault:
\t}
\tif err := g(); err != nil {
\t\treturn
\t} else if v == nil {
\t} else {
\t}
\tfor {
\t\tbreak
\t}
}
",
    );
}

#[test]
fn multiline_composite_literals_keep_their_shape() {
    assert_canonical(
        "package p

var table = map[string][]int{
\t\"a\": {1, 2},
\t\"b\": nil,
}

var inline = []string{\"x\", \"y\"}
",
    );
}

#[test]
fn comments_move_to_line_starts() {
    assert_eq!(
        fmt("package p\n\nfunc f() {\n\tx() // trailing\n\ty()\n}\n"),
        "package p\n\nfunc f() {\n\tx()\n\t// trailing\n\ty()\n}\n"
    );
    assert_eq!(
        fmt("package p\n\nvar x = 1 // end\n"),
        "package p\n\nvar x = 1\n\n// end\n"
    );
}

#[test]
fn unary_operators_do_not_glue() {
    assert_eq!(fmt("package p\nvar x = - -1\n"), "package p\n\nvar x = - -1\n");
    assert_eq!(fmt("package p\nvar y = & &z\n"), "package p\n\nvar y = & &z\n");
}

#[test]
fn empty_struct_and_interface() {
    assert_canonical("package p\n\ntype E struct{}\n\ntype A interface{}\n");
    assert_eq!(
        fmt("package p\ntype S struct{ a int; b string }\n"),
        "package p\n\ntype S struct {\n\ta int\n\tb string\n}\n"
    );
}

#[test]
fn raw_strings_and_literals_are_copied() {
    assert_canonical("package p\n\nconst (\n\tr = `a\nb`\n\th = 0x_FF\n\tc = 'λ'\n\ti = 1.5i\n)\n");
}

const STATEMENTS: &[&str] = &[
    "x := 1",
    "x, y = y, x",
    "ch <- v",
    "i++",
    "go f(x)",
    "defer g()",
    "return",
    "if a > b { return } else { c() }",
    "for i := range n { _ = i }",
    "for k, v := range m { use(k, v) }",
    "for ; ; { break }",
    "switch { case a: b() }",
    "switch t := v.(type) { case int, string: _ = t; default: }",
    "select { case <-done: return; default: }",
    "var z = []int{1, 2, 3}",
    "p := &T{A: 1, B: []string{\"x\"}}",
    "f := func(a ...int) (n int, err error) { return len(a), nil }",
    "s = s[1:len(s):cap(s)]",
    "v, ok := m[k].(interface{ M() })",
    "x = -(-y) + ^z &^ w",
    "lbl: for { continue lbl }",
    "type local struct{ a int; b string }",
    "const c = iota",
    "// note\nx = 2",
    "q := Pair[int, string]{Key: 1}",
    "m := map[string]int{\n\"a\": 1,\n}",
];

fn program() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(STATEMENTS), 0..12).prop_map(|stmts| {
        let mut src = String::from("package gen\n\nfunc body() {\n");
        for stmt in stmts {
            src.push_str(stmt);
            src.push('\n');
        }
        src.push_str("}\n");
        src
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    #[test]
    fn formatting_is_idempotent(src in program()) {
        let once = fmt(&src);
        let twice = fmt(&once);
        prop_assert_eq!(&once, &twice, "input:\n{}", src);
    }

    #[test]
    fn formatting_preserves_node_count(src in program()) {
        let mode = ParseMode::default();
        let before = parse_file("a.go", &src, mode).expect("parse");
        let after = parse_file("b.go", &fmt(&src), mode).expect("reparse");
        prop_assert_eq!(
            goast_syntax::kind::node_count(&before),
            goast_syntax::kind::node_count(&after)
        );
    }
}
