use goast_syntax::error::{Diag, DiagKind};
use goast_syntax::lexer::{Lexer, Tok};

fn single(src: &str) -> (Tok<'_>, Vec<Diag>) {
    let mut lx = Lexer::new(src);
    let toks: Vec<_> = lx.by_ref().collect();
    let diags = lx.take_diags();
    (toks[0].1, diags)
}

fn assert_ok(src: &str, want: Tok<'_>) {
    let (tok, diags) = single(src);
    assert!(diags.is_empty(), "{src:?}: {diags:?}");
    assert_eq!(tok, want, "{src:?}");
}

fn assert_rejected(src: &str, message: &str) {
    let (tok, diags) = single(src);
    assert_eq!(tok, Tok::Error, "{src:?}");
    assert_eq!(diags.len(), 1, "{src:?}: {diags:?}");
    assert_eq!(diags[0].kind, DiagKind::Lex);
    assert_eq!(diags[0].message, message, "{src:?}");
}

#[test]
fn integers() {
    for src in ["0", "42", "1_000_000", "0x_dead_BEEF", "0o755", "0O7", "0b1010", "0755"] {
        assert_ok(src, Tok::IntLit(src));
    }
}

#[test]
fn floats() {
    for src in ["1.5", "1.", ".5", "1e10", "1E-3", "0x1p-2", "0x1.8p3", "0X.8P0", "089.5", "1_0.2_5"] {
        assert_ok(src, Tok::FloatLit(src));
    }
}

#[test]
fn imaginary_suffix() {
    for src in ["1i", "1.5i", "0x1p2i", "0123i", "089i", "1e3i"] {
        assert_ok(src, Tok::ImagLit(src));
    }
}

#[test]
fn malformed_numbers() {
    for src in ["0x", "0b102", "0o8", "089", "1__2", "1_", "0x1.5", "1e+", "0b1.0", "0x_"] {
        assert_rejected(src, "invalid numeric literal");
    }
}

#[test]
fn malformed_number_is_one_token() {
    let toks: Vec<_> = Lexer::new("0x1.5 + y").collect();
    assert_eq!(toks[0], (0, Tok::Error, 5));
    assert_eq!(toks[1].1, Tok::Plus);
}

#[test]
fn strings() {
    for src in [r#""""#, r#""plain""#, r#""a\tb\n""#, r#""\x41\101é\U0001F600""#, r#""\"\\""#, "\"héllo\""] {
        assert_ok(src, Tok::StringLit(src));
    }
    assert_ok("`raw\\n\nlines`", Tok::RawStringLit("`raw\\n\nlines`"));
}

#[test]
fn bad_escapes() {
    for src in [r#""\q""#, r#""\400""#, r#""\x4""#, r#""\uD800""#, r#""\'""#, r#""\U00110000""#] {
        assert_rejected(src, "invalid escape");
    }
}

#[test]
fn runes() {
    for src in ["'a'", "'é'", r"'\n'", r"'\''", r"'\x7f'", r"'ዤ'", r"'\377'"] {
        assert_ok(src, Tok::RuneLit(src));
    }
}

#[test]
fn bad_runes() {
    assert_rejected("'ab'", "invalid token");
    assert_rejected(r"'\k'", "invalid escape");
    assert_rejected(r#"'\"'"#, "invalid escape");
}

#[test]
fn unterminated() {
    assert_rejected("\"abc", "unterminated string");
    assert_rejected("`abc", "unterminated string");
    assert_rejected("/* never closed", "unterminated comment");
}

#[test]
fn byte_order_mark() {
    assert_ok("\u{FEFF}package", Tok::KwPackage);
    let (_, diags) = {
        let mut lx = Lexer::new("x\u{FEFF}");
        let toks: Vec<_> = lx.by_ref().collect();
        (toks, lx.take_diags())
    };
    assert_eq!(diags.len(), 1);
}

#[test]
fn stray_character() {
    let mut lx = Lexer::new("a @ b");
    let toks: Vec<_> = lx.by_ref().map(|(_, t, _)| t).collect();
    assert_eq!(toks, vec![Tok::Ident("a"), Tok::Error, Tok::Ident("b"), Tok::Semi]);
    assert_eq!(lx.take_diags()[0].message, "invalid token");
}
