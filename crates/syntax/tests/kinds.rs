use std::collections::BTreeSet;

use goast_syntax::kind::node_count;
use goast_syntax::{inspect, parse_file, NodeKind, ParseMode, SyntaxTree};

fn parse(src: &str) -> SyntaxTree {
    parse_file("kinds.go", src, ParseMode::default()).expect("parse")
}

fn kinds(src: &str) -> Vec<NodeKind> {
    let tree = parse(src);
    let mut out = Vec::new();
    inspect(&tree, |kind, _| out.push(kind));
    out
}

fn kind_set(src: &str) -> BTreeSet<NodeKind> {
    kinds(src).into_iter().collect()
}

#[test]
fn minimal_file() {
    assert_eq!(kinds("package p\n"), vec![NodeKind::File, NodeKind::Ident]);
    assert_eq!(node_count(&parse("package p\n")), 2);
}

#[test]
fn value_spec_order() {
    use NodeKind::*;
    assert_eq!(
        kinds("package p\nvar x = 1\n"),
        vec![File, Ident, GenDecl, ValueSpec, Ident, BasicLit]
    );
}

#[test]
fn comments_are_reported() {
    use NodeKind::*;
    let got = kinds("// Package p.\npackage p\n\n/* a */\n/* b */\n");
    assert_eq!(got, vec![File, Ident, CommentGroup, Comment, CommentGroup, Comment, Comment]);
}

#[test]
fn comments_dropped_without_parse_comments() {
    let tree = parse_file("k.go", "// doc\npackage p\n", ParseMode::NONE).expect("parse");
    assert_eq!(node_count(&tree), 2);
}

#[test]
fn spans_lie_inside_the_source() {
    let src = "package p\n\nimport \"fmt\"\n\nfunc main() {\n\tfmt.Println(\"hi\")\n}\n";
    let tree = parse(src);
    inspect(&tree, |kind, span| {
        assert!(span.start <= span.end, "{kind}: {span:?}");
        assert!(span.end as usize <= src.len(), "{kind}: {span:?}");
    });
}

#[test]
fn expression_kinds() {
    use NodeKind::*;
    let got = kind_set(
        "package p\n\
         func f(xs []int, m map[string]*T, ch chan int, v any) {\n\
         \t_ = xs[1:2]\n\
         \t_ = *m[\"k\"]\n\
         \t_ = -(xs[0] + 1)\n\
         \t_ = v.(fmt.Stringer)\n\
         \t_ = T{A: 1, B: []int{2}}\n\
         \t_ = func() {}\n\
         \t_ = Pair[int, string]{}\n\
         \t_ = <-ch\n\
         \t_ = [...]int{1}\n\
         \tf(xs...)\n\
         }\n",
    );
    for kind in [
        SliceExpr,
        StarExpr,
        IndexExpr,
        UnaryExpr,
        ParenExpr,
        BinaryExpr,
        TypeAssertExpr,
        SelectorExpr,
        CompositeLit,
        KeyValueExpr,
        FuncLit,
        IndexListExpr,
        Ellipsis,
        CallExpr,
        ArrayType,
        MapType,
        ChanType,
        FuncType,
    ] {
        assert!(got.contains(&kind), "missing {kind}");
    }
}

#[test]
fn statement_kinds() {
    use NodeKind::*;
    let got = kind_set(
        "package p\n\
         func f(ch chan int, v any) {\n\
         \tvar n int\n\
         \tn++\n\
         \tch <- n\n\
         \tgo f(ch, v)\n\
         \tdefer f(ch, v)\n\
         loop:\n\
         \tfor i := 0; i < 3; i++ {\n\
         \t\tcontinue loop\n\
         \t}\n\
         \tfor range ch {\n\
         \t}\n\
         \tif n > 0 {\n\
         \t}\n\
         \tswitch n {\n\
         \tcase 1:\n\
         \t}\n\
         \tswitch v.(type) {\n\
         \tdefault:\n\
         \t}\n\
         \tselect {\n\
         \tcase <-ch:\n\
         \t}\n\
         \treturn\n\
         end:\n\
         }\n",
    );
    for kind in [
        DeclStmt,
        IncDecStmt,
        SendStmt,
        GoStmt,
        DeferStmt,
        LabeledStmt,
        ForStmt,
        BranchStmt,
        RangeStmt,
        IfStmt,
        SwitchStmt,
        CaseClause,
        TypeSwitchStmt,
        SelectStmt,
        CommClause,
        ReturnStmt,
        BlockStmt,
        ExprStmt,
        EmptyStmt,
    ] {
        assert!(got.contains(&kind), "missing {kind}");
    }
}

#[test]
fn declaration_kinds() {
    use NodeKind::*;
    let got = kind_set(
        "package p\n\
         import m \"math\"\n\
         type S struct {\n\
         \tName string `json:\"name\"`\n\
         }\n\
         type I interface {\n\
         \tM() int\n\
         }\n\
         func (s *S) Get() (n int, err error) { return 0, nil }\n",
    );
    for kind in [
        ImportSpec, TypeSpec, StructType, InterfaceType, Field, FieldList, FuncDecl, GenDecl, BasicLit,
    ] {
        assert!(got.contains(&kind), "missing {kind}");
    }
}

#[test]
fn error_recovery_kinds_never_appear() {
    let got = kind_set("package p\nfunc f() { x := 1; _ = x }\n");
    for kind in [NodeKind::BadExpr, NodeKind::BadStmt, NodeKind::BadDecl, NodeKind::Package] {
        assert!(!got.contains(&kind));
    }
}

#[test]
fn single_index_vs_index_list() {
    let one = kinds("package p\nvar v List[int]\n");
    assert!(one.contains(&NodeKind::IndexExpr));
    assert!(!one.contains(&NodeKind::IndexListExpr));
    let two = kinds("package p\nvar v Map[string, int]\n");
    assert!(two.contains(&NodeKind::IndexListExpr));
}
