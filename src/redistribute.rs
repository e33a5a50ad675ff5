//! Even spacing for favorite repeats.
//!
//! The sampler's random walk tends to bunch a favorite's occurrences
//! together. This pass lays each favorite's occurrences out on an even grid
//! across the whole sequence, lets the non-favorites flow into the remaining
//! slots in their original order, and finishes with the gap pass.
//!
//! ```text
//! spacing   = total / count
//! ideal(i)  = round(spacing * i + spacing / 2)      (clamped into the sequence)
//! ```
//!
//! Taken slots are resolved by searching outward from the ideal slot, trying
//! the later slot before the earlier one at each distance.

use crate::gap::enforce_item_gap;
use crate::track::Item;
use std::collections::HashMap;

/// Respace favorite occurrences in `items`, then enforce `min_gap`.
///
/// The result has the same length and the same multiset of ids as `items`.
#[must_use]
pub fn redistribute_favorites(items: Vec<Item>, min_gap: usize) -> Vec<Item> {
    let total = items.len();
    if total == 0 {
        return items;
    }

    let mut regular = Vec::with_capacity(total);
    let mut groups: Vec<Vec<Item>> = Vec::new();
    let mut group_of: HashMap<String, usize> = HashMap::new();
    for item in items {
        if !item.is_favorite {
            regular.push(item);
        } else if let Some(&group) = group_of.get(&item.id) {
            groups[group].push(item);
        } else {
            group_of.insert(item.id.clone(), groups.len());
            groups.push(vec![item]);
        }
    }
    log::debug!("Redistributing {} favorites across {} slots", groups.len(), total);

    let mut slots: Vec<Option<Item>> = vec![None; total];
    for group in groups {
        #[allow(clippy::cast_precision_loss)]
        let spacing = total as f64 / group.len() as f64;
        for (i, item) in group.into_iter().enumerate() {
            let ideal = ideal_position(spacing, i, total);
            match nearest_free_slot(&slots, ideal) {
                Some(slot) => slots[slot] = Some(item),
                None => regular.push(item),
            }
        }
    }

    let mut regular = regular.into_iter();
    let mut output: Vec<Item> = slots
        .into_iter()
        .filter_map(|slot| slot.or_else(|| regular.next()))
        .collect();
    output.extend(regular);

    enforce_item_gap(&mut output, min_gap);
    output
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn ideal_position(spacing: f64, index: usize, total: usize) -> usize {
    let position = (spacing * index as f64 + spacing / 2.0).round().max(0.0) as usize;
    position.min(total - 1)
}

fn nearest_free_slot(slots: &[Option<Item>], ideal: usize) -> Option<usize> {
    (0..=slots.len()).find_map(|offset| {
        let later = ideal + offset;
        if later < slots.len() && slots[later].is_none() {
            return Some(later);
        }
        let earlier = ideal.checked_sub(offset)?;
        (earlier < slots.len() && slots[earlier].is_none()).then_some(earlier)
    })
}
