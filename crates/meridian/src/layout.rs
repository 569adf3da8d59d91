//! Row constraint layout.
//!
//! This module provides [`RowLayout`], a generic one-dimensional packing
//! algorithm over named items with measured widths and a fixed margin.
//! The sequence pipeline uses it to place participant heads left to right,
//! but it is deliberately generic over the item identifier type.
//!
//! # Algorithm
//!
//! Items are placed strictly in their original order: the first item's
//! left edge is 0, and each subsequent item's left edge is the previous
//! item's right edge plus the configured margin. No reordering or
//! optimization is attempted; callers rely on order fidelity (participants
//! must render left to right in declaration order).

use std::{fmt, hash::Hash};

use indexmap::IndexMap;
use log::debug;
use thiserror::Error;

/// Errors raised by the row layout.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    /// A dimension was applied for an identifier outside the original set.
    #[error("unknown layout item `{0}`")]
    UnknownItem(String),
}

/// Configuration for a [`RowLayout`].
#[derive(Debug, Clone, Copy)]
pub struct RowOptions {
    /// Minimum horizontal gap between the right edge of one item and the
    /// left edge of the next.
    pub item_margin: f32,
}

impl Default for RowOptions {
    fn default() -> Self {
        Self { item_margin: 40.0 }
    }
}

/// The computed extent of one item along the row axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub left: f32,
    pub right: f32,
    pub center: f32,
}

/// The result of a [`RowLayout::compute`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct RowPlacement<K: Eq + Hash> {
    total: f32,
    extents: IndexMap<K, Extent>,
}

impl<K: Eq + Hash> RowPlacement<K> {
    /// The minimal overall span containing all items with their margins.
    pub fn total(&self) -> f32 {
        self.total
    }

    /// The extent computed for `key`, if it was part of the layout.
    pub fn extent(&self, key: &K) -> Option<Extent> {
        self.extents.get(key).copied()
    }

    /// Iterate over all extents in original item order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, Extent)> {
        self.extents.iter().map(|(key, extent)| (key, *extent))
    }
}

/// A one-dimensional packing solver over an ordered set of named items.
///
/// Construct it with the full item set up front, feed measured widths via
/// [`RowLayout::apply_dimension`], then call [`RowLayout::compute`].
/// `compute` is pure with respect to the stored widths, so re-running it
/// without intervening changes yields identical results.
#[derive(Debug)]
pub struct RowLayout<K> {
    widths: IndexMap<K, Option<f32>>,
    options: RowOptions,
}

impl<K: Copy + Eq + Hash + fmt::Debug> RowLayout<K> {
    /// Create a solver for the given ordered set of distinct identifiers.
    ///
    /// A repeated identifier keeps its first position.
    pub fn new(keys: impl IntoIterator<Item = K>, options: RowOptions) -> Self {
        let widths: IndexMap<K, Option<f32>> =
            keys.into_iter().map(|key| (key, None)).collect();
        Self { widths, options }
    }

    /// Record the measured width for `key`, overwriting any earlier value.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnknownItem`] when `key` was not part of the
    /// set this solver was constructed with.
    pub fn apply_dimension(&mut self, key: K, width: f32) -> Result<(), LayoutError> {
        match self.widths.get_mut(&key) {
            Some(slot) => {
                *slot = Some(width);
                Ok(())
            }
            None => Err(LayoutError::UnknownItem(format!("{key:?}"))),
        }
    }

    /// Pack all items left to right and return their extents.
    ///
    /// Items with no applied dimension are treated as zero-width. Calling
    /// this before any [`RowLayout::apply_dimension`] is valid and yields
    /// all-zero-width placements.
    pub fn compute(&self) -> RowPlacement<K> {
        let mut extents = IndexMap::with_capacity(self.widths.len());
        let mut cursor = 0.0f32;

        for (index, (key, width)) in self.widths.iter().enumerate() {
            if index > 0 {
                cursor += self.options.item_margin;
            }
            let width = width.unwrap_or(0.0);
            let left = cursor;
            let right = left + width;
            extents.insert(
                *key,
                Extent {
                    left,
                    right,
                    center: (left + right) / 2.0,
                },
            );
            cursor = right;
        }

        debug!(items_len = extents.len(), total = cursor; "Row layout computed");
        RowPlacement {
            total: cursor,
            extents,
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_worked_example() {
        // Items [A, B] with widths {A: 10, B: 20} and margin 5
        let mut layout = RowLayout::new(["A", "B"], RowOptions { item_margin: 5.0 });
        layout.apply_dimension("A", 10.0).unwrap();
        layout.apply_dimension("B", 20.0).unwrap();

        let placement = layout.compute();

        let a = placement.extent(&"A").unwrap();
        assert_approx_eq!(f32, a.left, 0.0);
        assert_approx_eq!(f32, a.right, 10.0);
        assert_approx_eq!(f32, a.center, 5.0);

        let b = placement.extent(&"B").unwrap();
        assert_approx_eq!(f32, b.left, 15.0);
        assert_approx_eq!(f32, b.right, 35.0);
        assert_approx_eq!(f32, b.center, 25.0);

        assert_approx_eq!(f32, placement.total(), 35.0);
    }

    #[test]
    fn test_original_order_preserved() {
        let keys = ["delta", "alpha", "zulu", "bravo"];
        let layout = RowLayout::new(keys, RowOptions::default());
        let placement = layout.compute();

        let placed: Vec<_> = placement.iter().map(|(key, _)| *key).collect();
        assert_eq!(placed, keys);
    }

    #[test]
    fn test_unmeasured_items_are_zero_width() {
        let mut layout = RowLayout::new([1, 2, 3], RowOptions { item_margin: 10.0 });
        layout.apply_dimension(2, 8.0).unwrap();

        let placement = layout.compute();

        let first = placement.extent(&1).unwrap();
        assert_approx_eq!(f32, first.left, 0.0);
        assert_approx_eq!(f32, first.right, 0.0);

        let second = placement.extent(&2).unwrap();
        assert_approx_eq!(f32, second.left, 10.0);
        assert_approx_eq!(f32, second.right, 18.0);

        let third = placement.extent(&3).unwrap();
        assert_approx_eq!(f32, third.left, 28.0);
        assert_approx_eq!(f32, third.right, 28.0);

        assert_approx_eq!(f32, placement.total(), 28.0);
    }

    #[test]
    fn test_compute_before_any_dimension() {
        let layout = RowLayout::new(["a", "b"], RowOptions { item_margin: 7.0 });
        let placement = layout.compute();

        assert_approx_eq!(f32, placement.extent(&"a").unwrap().right, 0.0);
        assert_approx_eq!(f32, placement.extent(&"b").unwrap().left, 7.0);
        assert_approx_eq!(f32, placement.total(), 7.0);
    }

    #[test]
    fn test_empty_layout() {
        let layout = RowLayout::<&str>::new([], RowOptions::default());
        let placement = layout.compute();
        assert_approx_eq!(f32, placement.total(), 0.0);
        assert_eq!(placement.iter().count(), 0);
    }

    #[test]
    fn test_unknown_item_rejected() {
        let mut layout = RowLayout::new(["a"], RowOptions::default());
        let err = layout.apply_dimension("b", 5.0).unwrap_err();
        assert_eq!(err, LayoutError::UnknownItem("\"b\"".to_string()));
    }

    #[test]
    fn test_reapplied_dimension_overwrites() {
        let mut layout = RowLayout::new(["a"], RowOptions::default());
        layout.apply_dimension("a", 5.0).unwrap();
        layout.apply_dimension("a", 12.0).unwrap();

        let placement = layout.compute();
        assert_approx_eq!(f32, placement.extent(&"a").unwrap().right, 12.0);
    }

    #[test]
    fn test_compute_is_idempotent() {
        let mut layout = RowLayout::new(["a", "b", "c"], RowOptions { item_margin: 3.0 });
        layout.apply_dimension("a", 4.0).unwrap();
        layout.apply_dimension("c", 9.0).unwrap();

        let first = layout.compute();
        let second = layout.compute();
        assert_eq!(first, second);
    }

    #[test]
    fn test_duplicate_key_keeps_first_position() {
        let layout = RowLayout::new(["a", "b", "a"], RowOptions::default());
        let placement = layout.compute();
        let placed: Vec<_> = placement.iter().map(|(key, _)| *key).collect();
        assert_eq!(placed, ["a", "b"]);
    }
}
