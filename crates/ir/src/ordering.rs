//! Attribute ordering within a table
//!
//! Every attribute carries a `sort` index. Display and compile order follow
//! `sort` (stable for ties), never the position in the attribute vector.

use crate::attribute::Attribute;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which neighbor to swap with when reordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Towards lower sort indices
    Up,
    /// Towards higher sort indices
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// The sort index a newly appended attribute gets.
///
/// This is the current maximum plus one. When the maximum is already
/// `i64::MAX` the attributes are renumbered `0..n` in their current order
/// first, so the new attribute still sorts last.
pub fn next_sort(attributes: &mut [Attribute]) -> i64 {
    let Some(max) = attributes.iter().map(|a| a.sort).max() else {
        return 0;
    };
    match max.checked_add(1) {
        Some(next) => next,
        None => {
            renumber(attributes);
            attributes.len() as i64
        }
    }
}

/// Reassign sort indices `0..n` keeping the current display order
fn renumber(attributes: &mut [Attribute]) {
    let mut order: Vec<usize> = (0..attributes.len()).collect();
    order.sort_by_key(|&i| attributes[i].sort);
    for (rank, index) in order.into_iter().enumerate() {
        attributes[index].sort = rank as i64;
    }
}

/// Attributes ordered by `sort`, ties keeping their relative order
pub fn sorted_by_sort(attributes: &[Attribute]) -> Vec<&Attribute> {
    let mut sorted: Vec<&Attribute> = attributes.iter().collect();
    sorted.sort_by_key(|a| a.sort);
    sorted
}

/// Swap the sort index of `attribute_id` with its neighbor in `direction`.
///
/// Returns `false` when the attribute is unknown or already at the boundary.
/// When the two indices are equal the table is first renumbered `0..n` in
/// its current order so the swap is observable.
pub fn reorder(attributes: &mut [Attribute], attribute_id: &str, direction: Direction) -> bool {
    let mut order: Vec<usize> = (0..attributes.len()).collect();
    order.sort_by_key(|&i| attributes[i].sort);

    let Some(position) = order.iter().position(|&i| attributes[i].id == attribute_id) else {
        return false;
    };
    let neighbor = match direction {
        Direction::Up if position > 0 => position - 1,
        Direction::Down if position + 1 < order.len() => position + 1,
        _ => return false,
    };

    let (current, other) = (order[position], order[neighbor]);
    if attributes[current].sort == attributes[other].sort {
        renumber(attributes);
    }

    let sort = attributes[current].sort;
    attributes[current].sort = attributes[other].sort;
    attributes[other].sort = sort;
    true
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AttributeKind;
    use pretty_assertions::assert_eq;

    fn attrs(sorts: &[(&str, i64)]) -> Vec<Attribute> {
        sorts
            .iter()
            .map(|(name, sort)| {
                Attribute::new(*name, AttributeKind::integer())
                    .with_id(*name)
                    .with_sort(*sort)
            })
            .collect()
    }

    fn order(attributes: &[Attribute]) -> Vec<&str> {
        sorted_by_sort(attributes)
            .into_iter()
            .map(|a| a.id.as_str())
            .collect()
    }

    #[test]
    fn test_next_sort() {
        assert_eq!(next_sort(&mut []), 0);
        assert_eq!(next_sort(&mut attrs(&[("a", 0), ("b", 4), ("c", 2)])), 5);
    }

    #[test]
    fn test_next_sort_at_upper_limit_renumbers() {
        let mut attributes = attrs(&[("a", i64::MAX), ("b", -3), ("c", 7)]);
        assert_eq!(next_sort(&mut attributes), 3);
        assert_eq!(order(&attributes), vec!["b", "c", "a"]);
        let sorts: Vec<i64> = attributes.iter().map(|a| a.sort).collect();
        assert_eq!(sorts, vec![2, 0, 1]);
    }

    #[test]
    fn test_sorted_by_sort_is_stable() {
        let attributes = attrs(&[("c", 2), ("a", 0), ("b", 2), ("d", 1)]);
        assert_eq!(order(&attributes), vec!["a", "d", "c", "b"]);
    }

    #[test]
    fn test_reorder_swaps_neighbors() {
        let mut attributes = attrs(&[("a", 0), ("b", 1), ("c", 2)]);
        assert!(reorder(&mut attributes, "c", Direction::Up));
        assert_eq!(order(&attributes), vec!["a", "c", "b"]);
        assert!(reorder(&mut attributes, "a", Direction::Down));
        assert_eq!(order(&attributes), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_reorder_at_boundary_is_noop() {
        let mut attributes = attrs(&[("a", 0), ("b", 1)]);
        assert!(!reorder(&mut attributes, "a", Direction::Up));
        assert!(!reorder(&mut attributes, "b", Direction::Down));
        assert!(!reorder(&mut attributes, "missing", Direction::Up));
        assert_eq!(order(&attributes), vec!["a", "b"]);
        assert_eq!(attributes[0].sort, 0);
        assert_eq!(attributes[1].sort, 1);
    }

    #[test]
    fn test_reorder_with_tied_sorts() {
        let mut attributes = attrs(&[("a", 0), ("b", 0), ("c", 0)]);
        assert!(reorder(&mut attributes, "b", Direction::Up));
        assert_eq!(order(&attributes), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_reorder_is_permutation() {
        let mut attributes = attrs(&[("a", 3), ("b", 10), ("c", 7)]);
        let mut before: Vec<i64> = attributes.iter().map(|a| a.sort).collect();
        reorder(&mut attributes, "c", Direction::Down);
        let mut after: Vec<i64> = attributes.iter().map(|a| a.sort).collect();
        before.sort();
        after.sort();
        assert_eq!(before, after);
        assert_eq!(order(&attributes), vec!["a", "b", "c"]);
    }
}
