//! Property tests for the metric and the BK-tree.
//!
//! Every search result is compared against a linear scan over the same
//! corpus. Pruning must never drop a true match, and must never report
//! a distance the metric disagrees with.

use std::collections::HashSet;

use proptest::prelude::*;

use platematch::{levenshtein, BkTree, DuplicatePolicy, Match};

/// Plate-like strings over a small alphabet so random corpora collide
/// often enough to exercise deep subtrees and distance-0 children.
fn plate() -> impl Strategy<Value = String> {
    "[AB1l0O]{0,7}"
}

fn corpus() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(plate(), 0..60)
}

fn linear_scan(corpus: &[String], query: &str, k: usize) -> Vec<Match> {
    let mut matches: Vec<Match> = corpus
        .iter()
        .filter_map(|s| {
            let d = levenshtein(query, s);
            (d <= k).then(|| Match::new(s.as_str(), d))
        })
        .collect();
    matches.sort();
    matches
}

fn build(corpus: &[String], policy: DuplicatePolicy) -> BkTree {
    let mut tree = BkTree::new().with_policy(policy);
    tree.extend(corpus.iter().cloned());
    tree
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_distance_symmetric(a in plate(), b in plate()) {
        prop_assert_eq!(levenshtein(&a, &b), levenshtein(&b, &a));
    }

    #[test]
    fn prop_distance_identity(a in plate()) {
        prop_assert_eq!(levenshtein(&a, &a), 0);
    }

    #[test]
    fn prop_distance_zero_only_for_equal(a in plate(), b in plate()) {
        prop_assert_eq!(levenshtein(&a, &b) == 0, a == b);
    }

    #[test]
    fn prop_triangle_inequality(a in plate(), b in plate(), c in plate()) {
        prop_assert!(levenshtein(&a, &c) <= levenshtein(&a, &b) + levenshtein(&b, &c));
    }

    #[test]
    fn prop_distance_bounded_by_lengths(a in plate(), b in plate()) {
        let (la, lb) = (a.chars().count(), b.chars().count());
        let d = levenshtein(&a, &b);
        prop_assert!(d >= la.abs_diff(lb));
        prop_assert!(d <= la.max(lb));
    }

    #[test]
    fn prop_insertion_invariant(corpus in corpus()) {
        for policy in [DuplicatePolicy::Skip, DuplicatePolicy::Keep] {
            let tree = build(&corpus, policy);
            for (parent, key, child) in tree.edges() {
                prop_assert_eq!(levenshtein(parent, child), key);
            }
        }
    }

    #[test]
    fn prop_stored_plates_match_themselves(corpus in corpus(), k in 0usize..4) {
        let tree = build(&corpus, DuplicatePolicy::Skip);
        for s in &corpus {
            let matches = tree.search(s, k);
            prop_assert!(matches.contains(&Match::new(s.as_str(), 0)));
        }
    }

    #[test]
    fn prop_search_sound(corpus in corpus(), query in plate(), k in 0usize..5) {
        let tree = build(&corpus, DuplicatePolicy::Keep);
        for m in tree.search(&query, k) {
            prop_assert!(m.distance <= k);
            prop_assert_eq!(m.distance, levenshtein(&query, &m.term));
        }
    }

    #[test]
    fn prop_pruning_equals_linear_scan(corpus in corpus(), query in plate(), k in 0usize..5) {
        // Keep: every corpus entry is a node, so multisets must agree
        let tree = build(&corpus, DuplicatePolicy::Keep);
        let mut got = tree.search(&query, k);
        got.sort();
        prop_assert_eq!(got, linear_scan(&corpus, &query, k));
    }

    #[test]
    fn prop_skip_policy_equals_deduplicated_scan(
        corpus in corpus(),
        query in plate(),
        k in 0usize..5,
    ) {
        let tree = build(&corpus, DuplicatePolicy::Skip);
        let unique: Vec<String> = corpus
            .iter()
            .cloned()
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        prop_assert_eq!(tree.len(), unique.len());

        let mut got = tree.search(&query, k);
        got.sort();
        prop_assert_eq!(got, linear_scan(&unique, &query, k));
    }

    #[test]
    fn prop_terms_cover_corpus(corpus in corpus()) {
        let tree = build(&corpus, DuplicatePolicy::Keep);
        let mut terms: Vec<&str> = tree.terms().collect();
        let mut expected: Vec<&str> = corpus.iter().map(String::as_str).collect();
        terms.sort_unstable();
        expected.sort_unstable();
        prop_assert_eq!(terms, expected);
    }
}
