//! Positional moves shared by column and board reordering.
//!
//! Moves use splice semantics: the element is removed from `from` and
//! reinserted at `to` in the shortened sequence, so everything in between
//! shifts by one. Two endpoints are never swapped.

/// Returns a new sequence with the element at `from` moved to `to`.
///
/// Out-of-range indices and `from == to` return an unchanged copy.
///
/// # Examples
/// ```
/// use laneboard_core::domain::reorder::move_item;
///
/// let moved = move_item(&["A", "B", "C", "D"], 0, 2);
/// assert_eq!(moved, vec!["B", "C", "A", "D"]);
/// ```
pub fn move_item<T: Clone>(items: &[T], from: usize, to: usize) -> Vec<T> {
    let mut moved = items.to_vec();
    move_in_place(&mut moved, from, to);
    moved
}

/// In-place variant of [`move_item`]. Returns whether the order changed.
pub fn move_in_place<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from == to || from >= items.len() || to >= items.len() {
        return false;
    }
    let item = items.remove(from);
    items.insert(to, item);
    true
}

/// Moves the element equal to `item` to the position currently held by
/// `target`. No-op when either is missing or they are the same element.
pub fn move_to_position_of<T: PartialEq>(items: &mut Vec<T>, item: &T, target: &T) -> bool {
    let from = items.iter().position(|candidate| candidate == item);
    let to = items.iter().position(|candidate| candidate == target);
    match (from, to) {
        (Some(from), Some(to)) => move_in_place(items, from, to),
        _ => false,
    }
}

/// Rebuilds `saved` into a permutation of `expected`.
///
/// Duplicates and ids outside `expected` are dropped; ids missing from
/// `saved` are appended in their `expected` order.
pub fn reconcile_order<T: PartialEq + Clone>(saved: &[T], expected: &[T]) -> Vec<T> {
    let mut order: Vec<T> = Vec::with_capacity(expected.len());
    for id in saved {
        if expected.contains(id) && !order.contains(id) {
            order.push(id.clone());
        }
    }
    for id in expected {
        if !order.contains(id) {
            order.push(id.clone());
        }
    }
    order
}
