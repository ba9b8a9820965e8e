use goast_syntax::ast::{IdentName, Span};
use goast_syntax::resolve::ObjId;
use goast_syntax::{parse_file, ObjKind, ParseMode, SyntaxTree};

fn parse(src: &str) -> SyntaxTree {
    parse_file("test.go", src, ParseMode::default()).expect("parse")
}

/// The `nth` occurrence of identifier `name` in the source.
fn occurrence(tree: &SyntaxTree, name: &str, nth: usize) -> IdentName {
    let src = tree.source();
    let start = src
        .match_indices(name)
        .map(|(i, _)| i)
        .filter(|&i| {
            let before = src[..i].chars().next_back();
            let after = src[i + name.len()..].chars().next();
            let word = |c: Option<char>| c.is_some_and(|c| c == '_' || c.is_alphanumeric());
            !word(before) && !word(after)
        })
        .nth(nth)
        .unwrap_or_else(|| panic!("no occurrence {nth} of {name}"));
    IdentName {
        sym: tree.interner().get(name).expect("interned"),
        pos: Span::new(start, start + name.len()),
    }
}

fn binding(tree: &SyntaxTree, name: &str, nth: usize) -> Option<ObjId> {
    tree.resolution().expect("resolved").lookup(occurrence(tree, name, nth))
}

fn unresolved_names(tree: &SyntaxTree) -> Vec<&str> {
    let res = tree.resolution().expect("resolved");
    res.unresolved().iter().map(|id| tree.name(id.sym)).collect()
}

#[test]
fn simple_program() {
    let tree = parse("package main\nimport \"fmt\"\nfunc main(){x:=42; fmt.Println(x)}");
    let res = tree.resolution().expect("resolved");
    // `main`, the declaration of `x` and its use
    assert_eq!(res.binding_count(), 3);
    assert_eq!(unresolved_names(&tree), vec!["fmt"]);
    // occurrence 0 of `fmt` is the import path
    assert!(!res.is_resolved(occurrence(&tree, "fmt", 1)));
    assert!(res.is_resolved(occurrence(&tree, "x", 1)));
    assert_eq!(binding(&tree, "x", 0), binding(&tree, "x", 1));
    let obj = res.object(binding(&tree, "x", 0).expect("bound"));
    assert_eq!(obj.kind, ObjKind::Var);
}

#[test]
fn file_scope_holds_package_level_names() {
    let tree = parse(
        "package p\n\
         const limit = 3\n\
         var count int\n\
         type Shape interface{}\n\
         func area() {}\n\
         func init() {}\n\
         func (s square) side() {}\n",
    );
    let res = tree.resolution().expect("resolved");
    let scope = res.file_scope().expect("file scope");
    let mut names: Vec<_> = scope.iter().map(|(sym, obj)| (tree.name(sym), res.object(obj).kind)).collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            ("Shape", ObjKind::Type),
            ("area", ObjKind::Func),
            ("count", ObjKind::Var),
            ("limit", ObjKind::Const),
        ]
    );
}

#[test]
fn forward_references_resolve_against_file_scope() {
    let tree = parse("package p\nfunc first() int { return second() }\nfunc second() int { return 1 }\n");
    let decl = binding(&tree, "second", 1).expect("declared");
    assert_eq!(binding(&tree, "second", 0), Some(decl));
    assert!(unresolved_names(&tree).iter().all(|&n| n == "int"));
}

#[test]
fn inner_block_shadows_outer() {
    let tree = parse(
        "package p\n\
         func f() {\n\
         \tvalue := 1\n\
         \t{\n\
         \t\tvalue := 2\n\
         \t\t_ = value\n\
         \t}\n\
         \t_ = value\n\
         }\n",
    );
    let outer = binding(&tree, "value", 0);
    let inner = binding(&tree, "value", 1);
    assert_ne!(outer, inner);
    assert_eq!(binding(&tree, "value", 2), inner);
    assert_eq!(binding(&tree, "value", 3), outer);

    let flat = parse("package p\nfunc f() {\n\tvalue := 1\n\t_ = value\n}\n");
    let nested = tree.resolution().expect("resolved");
    assert_eq!(nested.scope_count(), flat.resolution().expect("resolved").scope_count() + 1);
}

#[test]
fn short_var_decl_reuses_existing_names() {
    let tree = parse("package p\nfunc f() {\n\ta, err := g()\n\tb, err := g()\n\t_, _, _ = a, b, err\n}\n");
    let first = binding(&tree, "err", 0).expect("bound");
    assert_eq!(binding(&tree, "err", 1), Some(first));
    assert_eq!(binding(&tree, "err", 2), Some(first));
    assert_ne!(binding(&tree, "a", 0), binding(&tree, "b", 0));
}

#[test]
fn parameters_and_results_live_in_function_scope() {
    let tree = parse("package p\nfunc f(in int) (out int) {\n\tout = in\n\treturn\n}\n");
    assert_eq!(binding(&tree, "in", 0), binding(&tree, "in", 1));
    assert_eq!(binding(&tree, "out", 0), binding(&tree, "out", 1));
}

#[test]
fn labels_resolve_when_the_function_closes() {
    let tree = parse("package p\nfunc f() {\n\tgoto done\ndone:\n\tfor {\n\t\tbreak done\n\t}\n}\n");
    let res = tree.resolution().expect("resolved");
    let label = binding(&tree, "done", 1).expect("label declared");
    assert_eq!(res.object(label).kind, ObjKind::Label);
    assert_eq!(binding(&tree, "done", 0), Some(label));
    assert_eq!(binding(&tree, "done", 2), Some(label));
}

#[test]
fn composite_literal_keys_are_never_unresolved() {
    let tree = parse("package p\ntype T struct{ Field int }\nvar v = T{Field: 1}\nvar w = map[string]int{missing: 2}\n");
    let names = unresolved_names(&tree);
    assert!(!names.contains(&"Field"), "{names:?}");
    assert!(!names.contains(&"missing"), "{names:?}");
    assert!(binding(&tree, "T", 1).is_some());
}

#[test]
fn blank_identifiers() {
    let tree = parse("package p\nvar _ = 1\nfunc f() { _ = 2 }\n");
    let res = tree.resolution().expect("resolved");
    // The blank declaration gets an object; the blank use does not.
    assert!(binding(&tree, "_", 0).is_some());
    assert!(binding(&tree, "_", 1).is_none());
    assert!(res.file_scope().expect("file scope").lookup(occurrence(&tree, "_", 0).sym).is_none());
}

#[test]
fn methods_and_selectors_are_not_resolved() {
    let tree = parse("package p\ntype R struct{}\nfunc (r R) Name() string { return r.label }\n");
    let res = tree.resolution().expect("resolved");
    let scope = res.file_scope().expect("file scope");
    assert!(scope.lookup(occurrence(&tree, "Name", 0).sym).is_none());
    assert_eq!(binding(&tree, "r", 0), binding(&tree, "r", 1));
    assert!(binding(&tree, "label", 0).is_none());
    assert!(!unresolved_names(&tree).contains(&"label"));
}

#[test]
fn type_switch_binding() {
    let tree = parse(
        "package p\n\
         func f(v any) {\n\
         \tswitch kind := v.(type) {\n\
         \tcase int:\n\
         \t\t_ = kind\n\
         \t}\n\
         }\n",
    );
    let res = tree.resolution().expect("resolved");
    let decl = binding(&tree, "kind", 0).expect("declared");
    assert_eq!(res.object(decl).kind, ObjKind::Var);
    assert_eq!(binding(&tree, "kind", 1), Some(decl));
}

#[test]
fn closures_capture_enclosing_variables() {
    let tree = parse("package p\nfunc f() func() int {\n\ttotal := 0\n\treturn func() int { total++; return total }\n}\n");
    let decl = binding(&tree, "total", 0).expect("declared");
    assert_eq!(binding(&tree, "total", 1), Some(decl));
    assert_eq!(binding(&tree, "total", 2), Some(decl));
}

#[test]
fn generic_type_parameters() {
    let tree = parse("package p\nfunc Map[Elem any](xs []Elem) []Elem { return xs }\n");
    let res = tree.resolution().expect("resolved");
    let param = binding(&tree, "Elem", 0).expect("declared");
    assert_eq!(res.object(param).kind, ObjKind::Type);
    assert_eq!(binding(&tree, "Elem", 1), Some(param));
    assert_eq!(binding(&tree, "Elem", 2), Some(param));
}

#[test]
fn skip_object_resolution() {
    let mode = ParseMode::PARSE_COMMENTS | ParseMode::SKIP_OBJECT_RESOLUTION;
    let tree = parse_file("t.go", "package p\nvar x = 1\n", mode).expect("parse");
    assert!(tree.resolution().is_none());
}
