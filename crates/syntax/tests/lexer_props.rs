use goast_syntax::lexer::{Lexer, Tok};
use proptest::prelude::*;

fn go_fragment() -> impl Strategy<Value = String> {
    let atom = prop_oneof![
        Just("x".to_string()),
        Just("return".to_string()),
        Just("0x1p-2".to_string()),
        Just("1e".to_string()),
        Just("'a'".to_string()),
        Just("\"s\\n\"".to_string()),
        Just("`raw`".to_string()),
        Just("/* c */".to_string()),
        Just("// c".to_string()),
        Just("&^=".to_string()),
        Just("...".to_string()),
        Just("\n".to_string()),
        Just(" ".to_string()),
        "[ -~]{0,3}",
    ];
    prop::collection::vec(atom, 0..24).prop_map(|parts| parts.concat())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn spans_are_ordered_and_in_bounds(s in ".*") {
        let mut frontier = 0usize;
        for (start, tok, end) in Lexer::new(&s) {
            prop_assert!(start <= end && end <= s.len(), "({start},{end}) {tok:?} in {s:?}");
            prop_assert!(start >= frontier, "token at {start} before {frontier} in {s:?}");
            frontier = end;
        }
    }

    #[test]
    fn auto_semicolons_are_zero_width(s in go_fragment()) {
        for (start, tok, end) in Lexer::new(&s) {
            if tok == Tok::Semi && start == end {
                prop_assert!(s[start..].starts_with(['\n', '\r']) || start == s.len() || s[start..].starts_with("/*") || s.is_char_boundary(start));
            }
        }
    }

    #[test]
    fn every_error_token_has_a_diagnostic(s in go_fragment()) {
        let mut lx = Lexer::new(&s);
        let errors = lx.by_ref().filter(|(_, t, _)| *t == Tok::Error).count();
        prop_assert_eq!(errors, lx.take_diags().len());
    }
}
