//! Go tokenizer.
//!
//! `logos` finds lexeme boundaries; everything Go-specific (keywords, literal
//! validation, automatic semicolons, the imaginary suffix) happens in
//! [`Lexer`], which is the only public entry point.

use std::ops::Range;

use logos::{Lexer as LogosLexer, Logos};

use crate::ast::{CommentKind, Span};
use crate::error::{Diag, LexError, LexErrorKind};

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(error = LexErrorKind)]
#[logos(skip r"[ \t]+")]
enum Raw {
    #[token("\u{FEFF}")]
    Bom,
    #[regex(r"\r\n|\n|\r")]
    Newline,
    #[regex(r"//[^\n\r]*", allow_greedy = true)]
    LineComment,
    #[token("/*", block_comment)]
    BlockComment,
    /// Identifier or keyword.
    #[regex(r"[_\p{L}][_\p{L}\p{Nd}]*")]
    Word,
    #[regex(r"[0-9]|\.[0-9]", number)]
    Number,
    #[regex(r"`[^`]*`")]
    RawString,
    #[regex(r#""([^"\\\n\r]|\\.)*""#, interpreted_string)]
    String,
    #[regex(r"'([^'\\\n\r]|\\.)+'", rune)]
    Rune,
    #[regex(r"\.\.\.|<<=|>>=|&\^=|&\^|<<|>>|&&|\|\||\+\+|--|==|!=|<=|>=|:=|<-|[-+*/%&|^]=|[-+*/%&|^~!<>=()\[\]{},;:.]")]
    Punct,
    #[regex(r".", priority = 0)]
    Error,
}

// -----------------------------------------------------------------------------
// logos callbacks
// -----------------------------------------------------------------------------

fn block_comment(lex: &mut LogosLexer<'_, Raw>) -> Result<(), LexErrorKind> {
    let rest = lex.remainder().as_bytes();
    match memchr::memmem::find(rest, b"*/") {
        Some(at) => {
            lex.bump(at + 2);
            Ok(())
        }
        None => {
            lex.bump(rest.len());
            Err(LexErrorKind::UnterminatedComment)
        }
    }
}

fn interpreted_string(lex: &mut LogosLexer<'_, Raw>) -> Result<(), LexErrorKind> {
    let s = lex.slice().as_bytes();
    check_escapes(&s[1..s.len() - 1], b'"')
}

fn rune(lex: &mut LogosLexer<'_, Raw>) -> Result<(), LexErrorKind> {
    let s = lex.slice();
    let body = &s[1..s.len() - 1];
    if let Some(rest) = body.strip_prefix('\\') {
        return match escape_len(rest.as_bytes(), b'\'')? {
            n if n == rest.len() => Ok(()),
            _ => Err(LexErrorKind::InvalidToken),
        };
    }
    if body.chars().count() == 1 {
        Ok(())
    } else {
        Err(LexErrorKind::InvalidToken)
    }
}

/// Extends the match to the longest run that could belong to a number, so
/// malformed literals such as `0x` or `1e+` surface as one invalid token.
fn number(lex: &mut LogosLexer<'_, Raw>) {
    let src = lex.source().as_bytes();
    let Range { start, end } = lex.span();
    let lower = |i: usize| src.get(i).map(u8::to_ascii_lowercase);

    let mut i = start;
    let hex = src[i] == b'0' && lower(i + 1) == Some(b'x');
    if src[i] == b'.' {
        i = digit_munch(src, i + 1, false);
    } else {
        if src[i] == b'0' && matches!(lower(i + 1), Some(b'x' | b'o' | b'b')) {
            i += 2;
        }
        i = digit_munch(src, i, hex);
        if src.get(i) == Some(&b'.') && src.get(i + 1) != Some(&b'.') {
            i = digit_munch(src, i + 1, hex);
        }
    }
    if matches!(lower(i), Some(b'e' | b'p')) {
        i += 1;
        if matches!(src.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        i = digit_munch(src, i, false);
    }
    lex.bump(i - end);
}

fn digit_munch(src: &[u8], mut i: usize, hex: bool) -> usize {
    while let Some(&b) = src.get(i) {
        if b.is_ascii_digit() || b == b'_' || (hex && b.is_ascii_hexdigit()) {
            i += 1;
        } else {
            break;
        }
    }
    i
}

// -----------------------------------------------------------------------------
// literal validation
// -----------------------------------------------------------------------------

fn check_escapes(body: &[u8], quote: u8) -> Result<(), LexErrorKind> {
    let mut i = 0;
    while let Some(off) = memchr::memchr(b'\\', &body[i..]) {
        i += off + 1;
        i += escape_len(&body[i..], quote)?;
    }
    Ok(())
}

/// Length of the escape sequence following a backslash.
fn escape_len(rest: &[u8], quote: u8) -> Result<usize, LexErrorKind> {
    let invalid = Err(LexErrorKind::InvalidEscape);
    let Some(&c) = rest.first() else {
        return invalid;
    };
    match c {
        b'a' | b'b' | b'f' | b'n' | b'r' | b't' | b'v' | b'\\' => Ok(1),
        _ if c == quote => Ok(1),
        b'0'..=b'7' => {
            let digits = rest.get(..3).filter(|d| d.iter().all(|b| (b'0'..=b'7').contains(b)));
            match digits.and_then(|d| u32::from_str_radix(std::str::from_utf8(d).ok()?, 8).ok()) {
                Some(v) if v <= 0xFF => Ok(3),
                _ => invalid,
            }
        }
        b'x' | b'u' | b'U' => {
            let width = match c {
                b'x' => 2,
                b'u' => 4,
                _ => 8,
            };
            let value = rest
                .get(1..=width)
                .filter(|d| d.iter().all(u8::is_ascii_hexdigit))
                .and_then(|d| u32::from_str_radix(std::str::from_utf8(d).ok()?, 16).ok());
            match value {
                Some(_) if c == b'x' => Ok(1 + width),
                Some(v) if char::from_u32(v).is_some() => Ok(1 + width),
                _ => invalid,
            }
        }
        _ => invalid,
    }
}

/// Validates a Go numeric literal without its imaginary suffix.
/// Returns `Ok(true)` for floating-point literals.
pub(crate) fn classify_number(lit: &[u8]) -> Result<bool, LexErrorKind> {
    const BAD: Result<bool, LexErrorKind> = Err(LexErrorKind::InvalidNumber);

    let (radix, mut i) = match lit {
        [b'0', b'x' | b'X', ..] => (16, 2),
        [b'0', b'o' | b'O', ..] => (8, 2),
        [b'0', b'b' | b'B', ..] => (2, 2),
        _ => (10, 0),
    };
    let prefixed = i == 2;

    let (end, int_digits) = digit_run(lit, i, radix, prefixed)?;
    i = end;

    let mut float = false;
    let mut frac_digits = 0;
    if lit.get(i) == Some(&b'.') {
        if prefixed && radix != 16 {
            return BAD;
        }
        float = true;
        let (end, n) = digit_run(lit, i + 1, radix, false)?;
        i = end;
        frac_digits = n;
    }
    if int_digits + frac_digits == 0 {
        return BAD;
    }

    let mut exponent = false;
    match lit.get(i).map(u8::to_ascii_lowercase) {
        Some(b'e') if radix == 10 => exponent = true,
        Some(b'p') if radix == 16 => exponent = true,
        None => {}
        Some(_) => return BAD,
    }
    if exponent {
        i += 1;
        if matches!(lit.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let (end, n) = digit_run(lit, i, 10, false)?;
        if n == 0 || end != lit.len() {
            return BAD;
        }
        i = end;
        float = true;
    } else if radix == 16 && float {
        return BAD;
    }
    if i != lit.len() {
        return BAD;
    }

    // 0-prefixed decimal integers are legacy octal.
    let legacy_octal = radix == 10 && !float && lit.len() > 1 && lit[0] == b'0';
    if legacy_octal && lit.iter().any(|b| matches!(b, b'8' | b'9')) {
        return BAD;
    }
    Ok(float)
}

/// Consumes digits of `radix` with `_` separators starting at `start`.
/// Returns the end offset and the number of digits seen.
fn digit_run(lit: &[u8], start: usize, radix: u32, lead_sep: bool) -> Result<(usize, usize), LexErrorKind> {
    // Decimal runs also carry legacy octal literals, checked afterwards.
    let is_digit = |b: u8| (b as char).to_digit(radix).is_some();
    let mut i = start;
    let mut count = 0;
    while let Some(&b) = lit.get(i) {
        if is_digit(b) {
            count += 1;
        } else if b == b'_' {
            let after_digit = i > start && is_digit(lit[i - 1]);
            let leading = i == start && lead_sep;
            let before_digit = lit.get(i + 1).is_some_and(|&n| is_digit(n));
            if !(after_digit || leading) || !before_digit {
                return Err(LexErrorKind::InvalidNumber);
            }
        } else {
            break;
        }
        i += 1;
    }
    Ok((i, count))
}

fn is_decimal_run(lit: &[u8]) -> bool {
    matches!(digit_run(lit, 0, 10, false), Ok((end, n)) if n > 0 && end == lit.len())
}

// -----------------------------------------------------------------------------
// tokens
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tok<'input> {
    Ident(&'input str),
    IntLit(&'input str),
    FloatLit(&'input str),
    ImagLit(&'input str),
    RuneLit(&'input str),
    StringLit(&'input str),
    RawStringLit(&'input str),

    KwBreak,
    KwCase,
    KwChan,
    KwConst,
    KwContinue,
    KwDefault,
    KwDefer,
    KwElse,
    KwFallthrough,
    KwFor,
    KwFunc,
    KwGo,
    KwGoto,
    KwIf,
    KwImport,
    KwInterface,
    KwMap,
    KwPackage,
    KwRange,
    KwReturn,
    KwSelect,
    KwStruct,
    KwSwitch,
    KwType,
    KwVar,

    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Amp,
    Pipe,
    Caret,
    Shl,
    Shr,
    AndNot,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    AndAssign,
    OrAssign,
    XorAssign,
    ShlAssign,
    ShrAssign,
    AndNotAssign,
    LAnd,
    LOr,
    Arrow,
    Inc,
    Dec,
    EqEq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    Assign,
    Define,
    Bang,
    Tilde,
    Ellipsis,
    LParen,
    RParen,
    LBrack,
    RBrack,
    LBrace,
    RBrace,
    Comma,
    Dot,
    Semi,
    Colon,

    /// Placeholder for an invalid lexeme; a diagnostic is always recorded.
    Error,
}

impl<'input> Tok<'input> {
    fn word(s: &'input str) -> Self {
        match s {
            "break" => Tok::KwBreak,
            "case" => Tok::KwCase,
            "chan" => Tok::KwChan,
            "const" => Tok::KwConst,
            "continue" => Tok::KwContinue,
            "default" => Tok::KwDefault,
            "defer" => Tok::KwDefer,
            "else" => Tok::KwElse,
            "fallthrough" => Tok::KwFallthrough,
            "for" => Tok::KwFor,
            "func" => Tok::KwFunc,
            "go" => Tok::KwGo,
            "goto" => Tok::KwGoto,
            "if" => Tok::KwIf,
            "import" => Tok::KwImport,
            "interface" => Tok::KwInterface,
            "map" => Tok::KwMap,
            "package" => Tok::KwPackage,
            "range" => Tok::KwRange,
            "return" => Tok::KwReturn,
            "select" => Tok::KwSelect,
            "struct" => Tok::KwStruct,
            "switch" => Tok::KwSwitch,
            "type" => Tok::KwType,
            "var" => Tok::KwVar,
            _ => Tok::Ident(s),
        }
    }

    fn punct(s: &str) -> Self {
        match s {
            "+" => Tok::Plus,
            "-" => Tok::Minus,
            "*" => Tok::Star,
            "/" => Tok::Slash,
            "%" => Tok::Percent,
            "&" => Tok::Amp,
            "|" => Tok::Pipe,
            "^" => Tok::Caret,
            "<<" => Tok::Shl,
            ">>" => Tok::Shr,
            "&^" => Tok::AndNot,
            "+=" => Tok::AddAssign,
            "-=" => Tok::SubAssign,
            "*=" => Tok::MulAssign,
            "/=" => Tok::DivAssign,
            "%=" => Tok::ModAssign,
            "&=" => Tok::AndAssign,
            "|=" => Tok::OrAssign,
            "^=" => Tok::XorAssign,
            "<<=" => Tok::ShlAssign,
            ">>=" => Tok::ShrAssign,
            "&^=" => Tok::AndNotAssign,
            "&&" => Tok::LAnd,
            "||" => Tok::LOr,
            "<-" => Tok::Arrow,
            "++" => Tok::Inc,
            "--" => Tok::Dec,
            "==" => Tok::EqEq,
            "!=" => Tok::NotEq,
            "<" => Tok::Lt,
            "<=" => Tok::Le,
            ">" => Tok::Gt,
            ">=" => Tok::Ge,
            "=" => Tok::Assign,
            ":=" => Tok::Define,
            "!" => Tok::Bang,
            "~" => Tok::Tilde,
            "..." => Tok::Ellipsis,
            "(" => Tok::LParen,
            ")" => Tok::RParen,
            "[" => Tok::LBrack,
            "]" => Tok::RBrack,
            "{" => Tok::LBrace,
            "}" => Tok::RBrace,
            "," => Tok::Comma,
            "." => Tok::Dot,
            ";" => Tok::Semi,
            ":" => Tok::Colon,
            _ => Tok::Error,
        }
    }

    /// Whether a newline after this token terminates the statement.
    pub fn ends_line(&self) -> bool {
        matches!(
            self,
            Tok::Ident(_)
                | Tok::IntLit(_)
                | Tok::FloatLit(_)
                | Tok::ImagLit(_)
                | Tok::RuneLit(_)
                | Tok::StringLit(_)
                | Tok::RawStringLit(_)
                | Tok::KwBreak
                | Tok::KwContinue
                | Tok::KwFallthrough
                | Tok::KwReturn
                | Tok::Inc
                | Tok::Dec
                | Tok::RParen
                | Tok::RBrack
                | Tok::RBrace
        )
    }
}

impl std::fmt::Display for Tok<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tok::Ident(s)
            | Tok::IntLit(s)
            | Tok::FloatLit(s)
            | Tok::ImagLit(s)
            | Tok::RuneLit(s)
            | Tok::StringLit(s)
            | Tok::RawStringLit(s) => f.write_str(s),
            other => write!(f, "{other:?}"),
        }
    }
}

// -----------------------------------------------------------------------------
// lexer
// -----------------------------------------------------------------------------

/// A comment seen while lexing. The text is recovered from the source via `span`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawComment {
    pub kind: CommentKind,
    pub span: Span,
}

type Item<'src> = (usize, Tok<'src>, usize);

/// Token stream over one source file, yielding `(start, token, end)`.
///
/// Automatic semicolons are zero-width tokens placed where the newline (or
/// end of input) that produced them begins. Comments never reach the stream;
/// collect them with [`Lexer::take_comments`] once the iterator is drained.
pub struct Lexer<'src> {
    inner: LogosLexer<'src, Raw>,
    semi_ok: bool,
    finished: bool,
    diags: Vec<Diag>,
    comments: Vec<RawComment>,
}

impl<'src> Lexer<'src> {
    pub fn new(input: &'src str) -> Self {
        Self {
            inner: Raw::lexer(input),
            semi_ok: false,
            finished: false,
            diags: Vec::new(),
            comments: Vec::new(),
        }
    }

    pub fn take_diags(&mut self) -> Vec<Diag> {
        std::mem::take(&mut self.diags)
    }

    /// Comments in source order.
    pub fn take_comments(&mut self) -> Vec<RawComment> {
        std::mem::take(&mut self.comments)
    }

    fn auto_semi(&mut self, at: usize) -> Option<Item<'src>> {
        std::mem::take(&mut self.semi_ok).then_some((at, Tok::Semi, at))
    }

    fn fail(&mut self, kind: LexErrorKind, span: Range<usize>) -> Item<'src> {
        self.diags.push(
            LexError {
                kind,
                span: Span::from_range(span.clone()),
            }
            .diag(),
        );
        self.semi_ok = false;
        (span.start, Tok::Error, span.end)
    }

    fn comment(&mut self, kind: CommentKind, span: Range<usize>) {
        self.comments.push(RawComment {
            kind,
            span: Span::from_range(span),
        });
    }

    fn number(&mut self, span: Range<usize>) -> Item<'src> {
        let src = self.inner.source();
        let lit = &src[span.clone()];
        if src.as_bytes().get(span.end) == Some(&b'i') {
            self.inner.bump(1);
            let end = span.end + 1;
            if classify_number(lit.as_bytes()).is_err() && !is_decimal_run(lit.as_bytes()) {
                return self.fail(LexErrorKind::InvalidNumber, span.start..end);
            }
            self.semi_ok = true;
            return (span.start, Tok::ImagLit(&src[span.start..end]), end);
        }
        match classify_number(lit.as_bytes()) {
            Ok(true) => self.token(span, Tok::FloatLit(lit)),
            Ok(false) => self.token(span, Tok::IntLit(lit)),
            Err(kind) => self.fail(kind, span),
        }
    }

    fn token(&mut self, span: Range<usize>, tok: Tok<'src>) -> Item<'src> {
        self.semi_ok = tok.ends_line();
        (span.start, tok, span.end)
    }

    /// Handles one raw lexeme; `None` means it produced nothing.
    fn step(&mut self, raw: Result<Raw, LexErrorKind>) -> Option<Item<'src>> {
        let span = self.inner.span();
        let text: &'src str = self.inner.slice();
        let raw = match raw {
            Ok(raw) => raw,
            Err(LexErrorKind::UnterminatedComment) => {
                self.comment(CommentKind::Block, span.clone());
                return Some(self.fail(LexErrorKind::UnterminatedComment, span));
            }
            Err(kind) => return Some(self.fail(kind, span)),
        };
        match raw {
            Raw::Bom if span.start == 0 => None,
            Raw::Bom => Some(self.fail(LexErrorKind::InvalidToken, span)),
            Raw::Newline => self.auto_semi(span.start),
            Raw::LineComment => {
                self.comment(CommentKind::Line, span);
                None
            }
            Raw::BlockComment => {
                let newline = memchr::memchr2(b'\n', b'\r', text.as_bytes());
                self.comment(CommentKind::Block, span.clone());
                newline.and_then(|off| self.auto_semi(span.start + off))
            }
            Raw::Word => Some(self.token(span, Tok::word(text))),
            Raw::Number => Some(self.number(span)),
            Raw::String => Some(self.token(span, Tok::StringLit(text))),
            Raw::RawString => Some(self.token(span, Tok::RawStringLit(text))),
            Raw::Rune => Some(self.token(span, Tok::RuneLit(text))),
            Raw::Punct => Some(self.token(span, Tok::punct(text))),
            Raw::Error => {
                let kind = match text {
                    "\"" | "`" => LexErrorKind::UnterminatedString,
                    _ => LexErrorKind::InvalidToken,
                };
                Some(self.fail(kind, span))
            }
        }
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Item<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            match self.inner.next() {
                Some(raw) => {
                    if let Some(item) = self.step(raw) {
                        return Some(item);
                    }
                }
                None => {
                    self.finished = true;
                    let end = self.inner.source().len();
                    return self.auto_semi(end);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::classify_number;

    #[test]
    fn numbers() {
        for ok in ["0", "42", "0x_1F", "0o17", "0b1010", "1_000", "017", "09.5", "1e9", "0x1p-2", ".5", "1."] {
            assert!(classify_number(ok.as_bytes()).is_ok(), "{ok}");
        }
        for bad in ["0x", "1__0", "1_", "089", "0b2", "0x1.8", "1e", "0o1.5", "_1"] {
            assert!(classify_number(bad.as_bytes()).is_err(), "{bad}");
        }
        assert_eq!(classify_number(b"1.5"), Ok(true));
        assert_eq!(classify_number(b"15"), Ok(false));
    }
}
