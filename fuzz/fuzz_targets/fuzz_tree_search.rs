//! Fuzz target: tree search agrees with a linear scan.
//!
//! The first byte picks the distance threshold; the rest is split on
//! newlines into a corpus, whose last line is used as the query.

#![no_main]

use libfuzzer_sys::fuzz_target;
use platematch::{levenshtein, BkTree, DuplicatePolicy, Match};

fuzz_target!(|data: &[u8]| {
    let Some((&k, rest)) = data.split_first() else {
        return;
    };
    let Ok(text) = std::str::from_utf8(rest) else {
        return;
    };
    let k = usize::from(k % 6);

    let mut lines: Vec<&str> = text.lines().collect();
    let query = lines.pop().unwrap_or_default();

    let mut tree = BkTree::new().with_policy(DuplicatePolicy::Keep);
    tree.extend(lines.iter().copied());

    let mut got = tree.search(query, k);
    got.sort();

    let mut expected: Vec<Match> = lines
        .iter()
        .filter_map(|s| {
            let d = levenshtein(query, s);
            (d <= k).then(|| Match::new(*s, d))
        })
        .collect();
    expected.sort();

    assert_eq!(got, expected);
});
