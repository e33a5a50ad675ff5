//! Minimum repeat gap enforcement.
//!
//! Moves occurrences apart with position swaps so that no identifier shows up
//! again within `min_gap` positions of itself. Best-effort: a sequence that
//! is dominated by one identifier cannot satisfy the gap, and the leftover
//! conflicts are reported back instead of raised.

use crate::track::Item;

/// Enforce the minimum gap on `items` in place, keyed by `key`.
///
/// Scans left to right. When position `i` repeats an identifier from the
/// `min_gap` positions before it, the first later position whose identifier
/// is absent from that window is swapped into `i`. The length and the
/// multiset of identifiers never change, and an already compliant sequence is
/// left untouched.
///
/// Returns the number of conflicts for which no swap partner existed.
pub fn enforce_min_gap<T, K, F>(items: &mut [T], min_gap: usize, key: F) -> usize
where
    F: Fn(&T) -> &K,
    K: PartialEq + ?Sized,
{
    if min_gap == 0 {
        return 0;
    }

    let mut unresolved = 0;
    for i in 0..items.len() {
        let start = i.saturating_sub(min_gap);
        if !in_window(&*items, start, i, key(&items[i]), &key) {
            continue;
        }

        let partner = (i + 1..items.len())
            .find(|&k| !in_window(&*items, start, i, key(&items[k]), &key));

        match partner {
            Some(k) => {
                log::trace!("gap conflict at {i}, swapping with {k}");
                items.swap(i, k);
            }
            None => unresolved += 1,
        }
    }

    if unresolved > 0 {
        log::debug!("{unresolved} repeat gap conflicts left unresolved");
    }
    unresolved
}

/// [`enforce_min_gap`] keyed by track id.
pub fn enforce_item_gap(items: &mut [Item], min_gap: usize) -> usize {
    enforce_min_gap(items, min_gap, |item| item.id.as_str())
}

/// Number of positions whose identifier already appeared within the
/// previous `min_gap` positions.
#[must_use]
pub fn count_violations<T, K, F>(items: &[T], min_gap: usize, key: F) -> usize
where
    F: Fn(&T) -> &K,
    K: PartialEq + ?Sized,
{
    if min_gap == 0 {
        return 0;
    }

    (0..items.len())
        .filter(|&i| in_window(items, i.saturating_sub(min_gap), i, key(&items[i]), &key))
        .count()
}

fn in_window<T, K, F>(items: &[T], start: usize, end: usize, id: &K, key: &F) -> bool
where
    F: Fn(&T) -> &K,
    K: PartialEq + ?Sized,
{
    items[start..end].iter().any(|other| key(other) == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::SliceRandom;
    use rand::{rngs::StdRng, SeedableRng};

    fn ids(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn sorted(mut v: Vec<char>) -> Vec<char> {
        v.sort_unstable();
        v
    }

    #[test]
    fn test_resolves_adjacent_repeat() {
        let mut seq = ids("AABCD");
        let unresolved = enforce_min_gap(&mut seq, 3, |c| c);

        assert_eq!(unresolved, 0);
        assert_eq!(seq, ids("ABCDA"));
        assert_eq!(count_violations(&seq, 3, |c| c), 0);
    }

    #[test]
    fn test_swaps_with_first_compatible_position() {
        let mut seq = ids("ABACDEFB");
        enforce_min_gap(&mut seq, 2, |c| c);

        assert_eq!(seq, ids("ABCADEFB"));
        assert_eq!(count_violations(&seq, 2, |c| c), 0);
    }

    #[test]
    fn test_idempotent_on_compliant_sequence() {
        let original = ids("ABCDABCDEA");
        assert_eq!(count_violations(&original, 3, |c| c), 0);

        let mut seq = original.clone();
        assert_eq!(enforce_min_gap(&mut seq, 3, |c| c), 0);
        assert_eq!(seq, original);

        enforce_min_gap(&mut seq, 3, |c| c);
        assert_eq!(seq, original);
    }

    #[test]
    fn test_single_identifier_is_best_effort() {
        let mut seq = ids("XXXX");
        let unresolved = enforce_min_gap(&mut seq, 3, |c| c);

        // Every later X conflicts and nothing can be swapped in.
        assert_eq!(unresolved, 3);
        assert_eq!(seq, ids("XXXX"));
        assert_eq!(count_violations(&seq, 3, |c| c), 3);
    }

    #[test]
    fn test_zero_gap_is_noop() {
        let mut seq = ids("AAAB");
        assert_eq!(enforce_min_gap(&mut seq, 0, |c| c), 0);
        assert_eq!(seq, ids("AAAB"));
        assert_eq!(count_violations(&seq, 0, |c| c), 0);
    }

    #[test]
    fn test_empty_and_single() {
        let mut empty: Vec<char> = Vec::new();
        assert_eq!(enforce_min_gap(&mut empty, 3, |c| c), 0);

        let mut one = ids("A");
        assert_eq!(enforce_min_gap(&mut one, 3, |c| c), 0);
        assert_eq!(one, ids("A"));
    }

    #[test]
    fn test_multiset_preserved_on_random_sequences() {
        let mut rng = StdRng::seed_from_u64(7);
        let alphabet = ids("AAAABBBCCDEFGHIJ");

        for _ in 0..200 {
            let mut seq = alphabet.clone();
            seq.shuffle(&mut rng);
            let before = sorted(seq.clone());

            enforce_min_gap(&mut seq, 3, |c| c);

            assert_eq!(seq.len(), alphabet.len());
            assert_eq!(sorted(seq), before);
        }
    }

    #[test]
    fn test_items_keyed_by_id() {
        let item = |id: &str| Item {
            id: id.to_string(),
            uri: format!("uri:{id}"),
            name: id.to_uppercase(),
            is_favorite: false,
            is_double: false,
            weight: 1.0,
        };
        let mut seq = vec![item("a"), item("a"), item("b"), item("c"), item("d")];

        assert_eq!(enforce_item_gap(&mut seq, 3), 0);
        let order: Vec<&str> = seq.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c", "d", "a"]);
    }
}
