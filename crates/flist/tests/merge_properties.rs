//! Property tests for the sorted merge algebra.

use flist::sorted::{difference, is_sorted_strict, union};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn sorted_names() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::btree_set("[a-d]{1,3}", 0..12)
        .prop_map(|set: BTreeSet<String>| set.into_iter().collect())
}

proptest! {
    #[test]
    fn union_is_sorted_and_covers_both_inputs(a in sorted_names(), b in sorted_names()) {
        let merged = union(&a, &b, str::cmp);
        prop_assert!(is_sorted_strict(&merged, str::cmp));
        for name in a.iter().chain(b.iter()) {
            prop_assert!(merged.binary_search(name).is_ok());
        }
        prop_assert!(merged.len() <= a.len() + b.len());
    }

    #[test]
    fn difference_never_contains_subtracted_names(a in sorted_names(), b in sorted_names()) {
        let kept = difference(&a, &b, str::cmp);
        prop_assert!(is_sorted_strict(&kept, str::cmp));
        for name in &kept {
            prop_assert!(b.binary_search(name).is_err());
            prop_assert!(a.binary_search(name).is_ok());
        }
    }

    #[test]
    fn union_then_difference_recovers_left_minus_right(a in sorted_names(), b in sorted_names()) {
        let merged = union(&a, &b, str::cmp);
        let back = difference(&merged, &b, str::cmp);
        let expected: Vec<String> = a
            .iter()
            .filter(|name| b.binary_search(name).is_err())
            .cloned()
            .collect();
        prop_assert_eq!(back, expected);
    }
}
