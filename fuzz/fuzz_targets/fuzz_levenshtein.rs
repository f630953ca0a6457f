//! Fuzz target: metric axioms on arbitrary UTF-8.
//!
//! Splits the input into three strings and checks symmetry, identity and
//! the triangle inequality.

#![no_main]

use libfuzzer_sys::fuzz_target;
use platematch::levenshtein;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let mut parts = text.splitn(3, '\u{0}');
    let a = parts.next().unwrap_or_default();
    let b = parts.next().unwrap_or_default();
    let c = parts.next().unwrap_or_default();

    let ab = levenshtein(a, b);
    assert_eq!(ab, levenshtein(b, a));
    assert_eq!(levenshtein(a, a), 0);
    assert!(levenshtein(a, c) <= ab + levenshtein(b, c));
});
