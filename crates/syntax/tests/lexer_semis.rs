use goast_syntax::lexer::{Lexer, Tok};

fn tokens(src: &str) -> Vec<(usize, Tok<'_>, usize)> {
    Lexer::new(src).collect()
}

fn auto_semis(src: &str) -> Vec<usize> {
    tokens(src)
        .into_iter()
        .filter(|(s, t, e)| *t == Tok::Semi && s == e)
        .map(|(s, _, _)| s)
        .collect()
}

#[test]
fn semicolon_after_line_enders() {
    for src in ["x\n", "1\n", "1.5\n", "2i\n", "'a'\n", "\"s\"\n", "`r`\n", "break\n", "continue\n",
        "fallthrough\n", "return\n", "x++\n", "x--\n", "f()\n", "a[0]\n", "T{}\n"]
    {
        assert_eq!(auto_semis(src), vec![src.len() - 1], "{src:?}");
    }
}

#[test]
fn no_semicolon_after_operators_and_keywords() {
    for src in ["x +\n", "func\n", "if\n", "a,\n", "(\n", "{\n", "x =\n", "package\n"] {
        assert!(auto_semis(src).is_empty(), "{src:?}");
    }
}

#[test]
fn semicolon_at_eof() {
    assert_eq!(auto_semis("return"), vec![6]);
    assert!(auto_semis("return;").is_empty());
}

#[test]
fn one_semicolon_per_line_run() {
    assert_eq!(auto_semis("x\n\n\ny"), vec![1, 5]);
}

#[test]
fn line_comment_keeps_pending_semicolon() {
    let src = "x // trailing\ny";
    assert_eq!(auto_semis(src), vec![13, 15]);
}

#[test]
fn block_comment_with_newline_acts_as_newline() {
    let src = "x /* a\nb */ y";
    assert_eq!(auto_semis(src), vec![6, 13]);
    assert_eq!(auto_semis("x /* one line */ y"), vec![18]);
}

#[test]
fn crlf_is_one_newline() {
    assert_eq!(auto_semis("x\r\ny\r\n"), vec![1, 4]);
}

#[test]
fn explicit_semicolon_has_width() {
    let toks = tokens("a; b");
    assert_eq!(toks[1], (1, Tok::Semi, 2));
}

#[test]
fn keywords_and_identifiers() {
    let kinds: Vec<_> = tokens("func main chan map _x δ").into_iter().map(|(_, t, _)| t).collect();
    assert_eq!(
        kinds,
        vec![
            Tok::KwFunc,
            Tok::Ident("main"),
            Tok::KwChan,
            Tok::KwMap,
            Tok::Ident("_x"),
            Tok::Ident("δ"),
            Tok::Semi,
        ]
    );
}

#[test]
fn longest_operator_wins() {
    let kinds: Vec<_> = tokens("&^= <<= ... <- := &^ ..").into_iter().map(|(_, t, _)| t).collect();
    assert_eq!(
        kinds,
        vec![
            Tok::AndNotAssign,
            Tok::ShlAssign,
            Tok::Ellipsis,
            Tok::Arrow,
            Tok::Define,
            Tok::AndNot,
            Tok::Dot,
            Tok::Dot,
        ]
    );
}

#[test]
fn comments_are_collected_in_order() {
    let src = "// a\nx /* b */\n/* c\n*/";
    let mut lx = Lexer::new(src);
    lx.by_ref().for_each(drop);
    let texts: Vec<_> = lx
        .take_comments()
        .iter()
        .map(|c| &src[c.span.start as usize..c.span.end as usize])
        .collect();
    assert_eq!(texts, vec!["// a", "/* b */", "/* c\n*/"]);
}
