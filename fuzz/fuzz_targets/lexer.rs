#![no_main]

use goast_syntax::lexer::{Lexer, Tok};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let s = String::from_utf8_lossy(data);
    let mut lx = Lexer::new(&s);

    let mut frontier = 0usize;
    let mut errors = 0usize;
    let mut steps = 0usize;
    let max_steps = s.len().saturating_mul(2) + 2;

    for (start, tok, end) in lx.by_ref() {
        assert!(start <= end && end <= s.len());
        assert!(start >= frontier);
        if tok == Tok::Semi && start == end {
            assert!(s.is_char_boundary(start));
        }
        if tok == Tok::Error {
            errors += 1;
        }
        frontier = end;
        steps += 1;
        assert!(steps <= max_steps);
    }
    assert_eq!(errors, lx.take_diags().len());
});
