//! Linear merge operations over strictly sorted, duplicate-free sequences.
//!
//! Both operations run in `O(|a| + |b|)` and never look at an element twice.
//! Sortedness of the inputs is a precondition: it is checked with
//! `debug_assert!` and silently assumed in release builds, where a violated
//! precondition produces an unspecified (but safe) result.

use std::cmp::Ordering;

/// Merges two strictly sorted sequences into one, coalescing equal elements.
///
/// The output is strictly sorted under `cmp` and contains every element of
/// `a` and `b` exactly once.
#[must_use]
pub fn union<F>(a: &[String], b: &[String], cmp: F) -> Vec<String>
where
    F: Fn(&str, &str) -> Ordering,
{
    debug_assert!(is_sorted_strict(a, &cmp));
    debug_assert!(is_sorted_strict(b, &cmp));

    if a.is_empty() {
        return b.to_vec();
    }
    if b.is_empty() {
        return a.to_vec();
    }

    let mut out = Vec::with_capacity(a.len() + b.len());
    let mut ia = 0;
    let mut ib = 0;
    while ia < a.len() && ib < b.len() {
        match cmp(&a[ia], &b[ib]) {
            Ordering::Less => {
                out.push(a[ia].clone());
                ia += 1;
            }
            Ordering::Greater => {
                out.push(b[ib].clone());
                ib += 1;
            }
            Ordering::Equal => {
                out.push(a[ia].clone());
                ia += 1;
                ib += 1;
            }
        }
    }
    out.extend_from_slice(&a[ia..]);
    out.extend_from_slice(&b[ib..]);
    out
}

/// Removes from `a` every element also present in `b`.
///
/// Order and uniqueness of the surviving elements are preserved.
#[must_use]
pub fn difference<F>(a: &[String], b: &[String], cmp: F) -> Vec<String>
where
    F: Fn(&str, &str) -> Ordering,
{
    debug_assert!(is_sorted_strict(a, &cmp));
    debug_assert!(is_sorted_strict(b, &cmp));

    if a.is_empty() || b.is_empty() {
        return a.to_vec();
    }

    let mut out = Vec::with_capacity(a.len());
    let mut ib = 0;
    for item in a {
        while ib < b.len() && cmp(&b[ib], item) == Ordering::Less {
            ib += 1;
        }
        if ib < b.len() && cmp(&b[ib], item) == Ordering::Equal {
            ib += 1;
        } else {
            out.push(item.clone());
        }
    }
    out
}

/// Returns `true` if `items` is strictly ascending under `cmp`.
#[must_use]
pub fn is_sorted_strict<F>(items: &[String], cmp: F) -> bool
where
    F: Fn(&str, &str) -> Ordering,
{
    items
        .windows(2)
        .all(|pair| cmp(&pair[0], &pair[1]) == Ordering::Less)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn union_coalesces_shared_elements() {
        let merged = union(&names(&["a", "c"]), &names(&["b", "c"]), str::cmp);
        assert_eq!(merged, names(&["a", "b", "c"]));
    }

    #[test]
    fn union_with_empty_side_is_identity() {
        let left = names(&["a", "b"]);
        assert_eq!(union(&left, &[], str::cmp), left);
        assert_eq!(union(&[], &left, str::cmp), left);
    }

    #[test]
    fn difference_removes_only_shared_elements() {
        let kept = difference(&names(&["a", "b", "c"]), &names(&["b"]), str::cmp);
        assert_eq!(kept, names(&["a", "c"]));
    }

    #[test]
    fn difference_of_disjoint_sets_is_identity() {
        let left = names(&["a", "c"]);
        assert_eq!(difference(&left, &names(&["b", "d"]), str::cmp), left);
    }

    #[test]
    fn difference_can_empty_the_left_side() {
        let kept = difference(&names(&["a", "b"]), &names(&["a", "b", "c"]), str::cmp);
        assert!(kept.is_empty());
    }

    #[test]
    fn round_trip_union_then_difference() {
        let a = names(&["a", "c", "e"]);
        let b = names(&["b", "c", "d"]);
        let merged = union(&a, &b, str::cmp);
        let back = difference(&merged, &b, str::cmp);
        // `c` was in both inputs, so subtracting `b` removes it from `a` too.
        assert_eq!(back, names(&["a", "e"]));
    }
}
