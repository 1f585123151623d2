#![forbid(unsafe_code)]

//! Layout arithmetic for terminal rows and lists.
//!
//! - [`distribute_space`] / [`FlexRow`] - split a row width among fixed and
//!   weighted items, integer-exact
//! - [`scroll`] - pick the visible window of a list that keeps the selected
//!   item on screen
//!
//! # Example
//! ```
//! use cellfit_layout::{FlexItem, FlexRow, distribute_space};
//!
//! let widths = distribute_space(100, &[FlexItem::weighted(1); 3], 0);
//! assert_eq!(widths, vec![34, 33, 33]);
//!
//! let row = FlexRow::new()
//!     .gap(1)
//!     .items([FlexItem::fixed(10), FlexItem::weighted(1)]);
//! let slots = row.split(40);
//! assert_eq!(slots[1].x, 11);
//! assert_eq!(slots[1].width, 29);
//! ```

pub mod scroll;

pub use scroll::{
    ScrollConfig, ScrollWindow, VisibleItem, calculate_scroll_state, calculate_scroll_state_with,
};

/// Sizing rule for one item of a row.
///
/// An item with an explicit `width` is fixed: it receives exactly that width
/// and its other fields are ignored. Every other item shares the space left
/// after fixed items and gaps in proportion to its `flex` weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlexItem {
    /// Exact width in cells. Overrides every other field.
    pub width: Option<usize>,
    /// Proportional share of the remaining space.
    pub flex: u32,
    /// Floor applied after distribution unless `squish` is set.
    pub min_width: Option<usize>,
    /// Ceiling applied after distribution.
    pub max_width: Option<usize>,
    /// Allow the computed width to stay below `min_width`.
    pub squish: bool,
}

impl FlexItem {
    /// A flex item with weight 1.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            width: None,
            flex: 1,
            min_width: None,
            max_width: None,
            squish: false,
        }
    }

    /// An item of exactly `width` cells.
    #[must_use]
    pub const fn fixed(width: usize) -> Self {
        Self {
            width: Some(width),
            ..Self::new()
        }
    }

    /// A flex item with the given weight.
    #[must_use]
    pub const fn weighted(flex: u32) -> Self {
        Self {
            flex,
            ..Self::new()
        }
    }

    /// Set the flex weight.
    #[must_use]
    pub const fn flex(mut self, flex: u32) -> Self {
        self.flex = flex;
        self
    }

    /// Set the minimum width.
    #[must_use]
    pub const fn min_width(mut self, min_width: usize) -> Self {
        self.min_width = Some(min_width);
        self
    }

    /// Set the maximum width.
    #[must_use]
    pub const fn max_width(mut self, max_width: usize) -> Self {
        self.max_width = Some(max_width);
        self
    }

    /// Set whether the item may shrink below its minimum width.
    #[must_use]
    pub const fn squish(mut self, squish: bool) -> Self {
        self.squish = squish;
        self
    }

    /// Whether this item takes part in proportional distribution.
    #[inline]
    #[must_use]
    pub const fn is_flex(&self) -> bool {
        self.width.is_none()
    }

    /// Apply the min/max bounds to a computed width.
    fn bound(&self, mut size: usize) -> usize {
        if let Some(min) = self.min_width
            && size < min
            && !self.squish
        {
            size = min;
        }
        if let Some(max) = self.max_width
            && size > max
        {
            size = max;
        }
        size
    }
}

impl Default for FlexItem {
    fn default() -> Self {
        Self::new()
    }
}

/// Distribute `total` cells among `items`, with `gap` cells between neighbours.
///
/// Returns one width per item, in order.
///
/// 1. Gaps and fixed widths are taken off the top; an over-committed budget
///    leaves nothing for flex items.
/// 2. Flex items receive `floor(available * flex / flex_total)`, and the
///    remainder is handed out one cell at a time, left to right, to items with
///    a non-zero weight. Flex allocations sum to the available space exactly.
/// 3. `min_width` (unless `squish`) and then `max_width` are applied to flex
///    items. A raised minimum can make the row wider than `total`.
#[must_use]
pub fn distribute_space(total: usize, items: &[FlexItem], gap: usize) -> Vec<usize> {
    #[cfg(feature = "tracing")]
    let _span = tracing::debug_span!("distribute_space", total, items = items.len(), gap).entered();

    let count = items.len();
    if count == 0 {
        return Vec::new();
    }

    let total_gap = gap.saturating_mul(count - 1);
    let after_gaps = total.saturating_sub(total_gap);
    let fixed_sum = items
        .iter()
        .filter_map(|item| item.width)
        .fold(0usize, usize::saturating_add);
    let available = after_gaps.saturating_sub(fixed_sum);

    #[cfg(feature = "tracing")]
    {
        if fixed_sum > after_gaps {
            tracing::trace!(fixed_sum, after_gaps, "fixed widths exceed the row");
        }
    }

    let flex_total: u128 = items
        .iter()
        .filter(|item| item.is_flex())
        .map(|item| u128::from(item.flex))
        .sum();

    let mut sizes = Vec::with_capacity(count);
    let mut assigned = 0usize;
    for item in items {
        let size = match item.width {
            Some(width) => width,
            None if flex_total > 0 && available > 0 => {
                // Bounded by `available`, so the narrowing cast is lossless.
                (available as u128 * u128::from(item.flex) / flex_total) as usize
            }
            None => 0,
        };
        if item.is_flex() {
            assigned += size;
        }
        sizes.push(size);
    }

    if flex_total > 0 {
        let mut leftover = available - assigned;
        for (size, item) in sizes.iter_mut().zip(items) {
            if leftover == 0 {
                break;
            }
            if item.is_flex() && item.flex > 0 {
                *size += 1;
                leftover -= 1;
            }
        }
        debug_assert_eq!(leftover, 0, "flooring leaves less than one cell per weighted item");
    }

    for (size, item) in sizes.iter_mut().zip(items) {
        if item.is_flex() {
            *size = item.bound(*size);
        }
    }

    sizes
}

/// Column span assigned to one item by [`FlexRow::split`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Slot {
    /// Column of the first cell.
    pub x: usize,
    /// Width in cells.
    pub width: usize,
}

impl Slot {
    /// Column just past the last cell.
    #[inline]
    #[must_use]
    pub const fn end(&self) -> usize {
        self.x.saturating_add(self.width)
    }
}

/// A row of [`FlexItem`]s separated by a fixed gap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlexRow {
    items: Vec<FlexItem>,
    gap: usize,
}

impl FlexRow {
    /// Create an empty row with no gap.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the gap between items.
    #[must_use]
    pub fn gap(mut self, gap: usize) -> Self {
        self.gap = gap;
        self
    }

    /// Set the items.
    #[must_use]
    pub fn items(mut self, items: impl IntoIterator<Item = FlexItem>) -> Self {
        self.items = items.into_iter().collect();
        self
    }

    /// Append one item.
    #[must_use]
    pub fn item(mut self, item: FlexItem) -> Self {
        self.items.push(item);
        self
    }

    /// Number of items (and thus of widths returned by [`distribute`](Self::distribute)).
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Widths for a row of `total` cells. See [`distribute_space`].
    #[must_use]
    pub fn distribute(&self, total: usize) -> Vec<usize> {
        distribute_space(total, &self.items, self.gap)
    }

    /// Widths plus column offsets for a row of `total` cells starting at column 0.
    #[must_use]
    pub fn split(&self, total: usize) -> Vec<Slot> {
        let sizes = self.distribute(total);
        let mut slots = Vec::with_capacity(sizes.len());
        let mut x = 0usize;
        for width in sizes {
            slots.push(Slot { x, width });
            x = x.saturating_add(width).saturating_add(self.gap);
        }
        slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flex(n: usize) -> Vec<FlexItem> {
        vec![FlexItem::new(); n]
    }

    #[test]
    fn equal_split_exact() {
        assert_eq!(distribute_space(99, &flex(3), 0), vec![33, 33, 33]);
    }

    #[test]
    fn remainder_goes_left_first() {
        assert_eq!(distribute_space(100, &flex(3), 0), vec![34, 33, 33]);
        assert_eq!(distribute_space(101, &flex(3), 0), vec![34, 34, 33]);
    }

    #[test]
    fn weighted_split() {
        let items = [FlexItem::weighted(2), FlexItem::weighted(1)];
        assert_eq!(distribute_space(90, &items, 0), vec![60, 30]);
    }

    #[test]
    fn gaps_are_removed_first() {
        assert_eq!(distribute_space(32, &flex(3), 1), vec![10, 10, 10]);
    }

    #[test]
    fn fixed_items_take_their_width() {
        let items = [FlexItem::fixed(10), FlexItem::new(), FlexItem::fixed(5)];
        assert_eq!(distribute_space(40, &items, 0), vec![10, 25, 5]);
    }

    #[test]
    fn fixed_ignores_min_and_max() {
        let items = [FlexItem::fixed(10).max_width(3).min_width(20)];
        assert_eq!(distribute_space(40, &items, 0), vec![10]);
    }

    #[test]
    fn overcommitted_fixed_starves_flex() {
        let items = [FlexItem::fixed(30), FlexItem::fixed(30), FlexItem::new()];
        assert_eq!(distribute_space(40, &items, 0), vec![30, 30, 0]);
    }

    #[test]
    fn gaps_larger_than_total() {
        assert_eq!(distribute_space(3, &flex(3), 5), vec![0, 0, 0]);
    }

    #[test]
    fn min_width_raises_even_past_total() {
        let items = [FlexItem::new().min_width(8), FlexItem::new()];
        assert_eq!(distribute_space(10, &items, 0), vec![8, 5]);
    }

    #[test]
    fn squish_keeps_computed_width() {
        let items = [FlexItem::new().min_width(8).squish(true), FlexItem::new()];
        assert_eq!(distribute_space(10, &items, 0), vec![5, 5]);
    }

    #[test]
    fn max_width_wins_over_min() {
        let items = [FlexItem::new().min_width(10).max_width(4)];
        assert_eq!(distribute_space(2, &items, 0), vec![4]);
    }

    #[test]
    fn max_width_caps_without_redistribution() {
        let items = [FlexItem::new().max_width(10), FlexItem::new()];
        assert_eq!(distribute_space(100, &items, 0), vec![10, 50]);
    }

    #[test]
    fn zero_weight_gets_nothing() {
        let items = [FlexItem::weighted(0), FlexItem::weighted(1), FlexItem::weighted(1)];
        assert_eq!(distribute_space(11, &items, 0), vec![0, 6, 5]);
    }

    #[test]
    fn all_zero_weights() {
        let items = [FlexItem::weighted(0), FlexItem::weighted(0).min_width(2)];
        assert_eq!(distribute_space(10, &items, 0), vec![0, 2]);
    }

    #[test]
    fn empty_items() {
        assert!(distribute_space(80, &[], 2).is_empty());
    }

    #[test]
    fn huge_values_do_not_overflow() {
        let items = [FlexItem::weighted(u32::MAX), FlexItem::weighted(u32::MAX)];
        let sizes = distribute_space(usize::MAX, &items, usize::MAX);
        assert_eq!(sizes, vec![0, 0]);

        let sizes = distribute_space(usize::MAX, &items, 0);
        assert_eq!(sizes[0] + sizes[1], usize::MAX);
    }

    #[test]
    fn row_split_offsets() {
        let row = FlexRow::new()
            .gap(2)
            .items([FlexItem::fixed(4), FlexItem::new(), FlexItem::new()]);
        let slots = row.split(20);
        assert_eq!(
            slots,
            vec![
                Slot { x: 0, width: 4 },
                Slot { x: 6, width: 6 },
                Slot { x: 14, width: 6 },
            ]
        );
        assert_eq!(slots[2].end(), 20);
    }

    #[test]
    fn row_builder() {
        let row = FlexRow::new().item(FlexItem::new()).item(FlexItem::fixed(3));
        assert_eq!(row.item_count(), 2);
        assert_eq!(row.distribute(10), vec![7, 3]);
    }

    #[test]
    fn default_item_is_weight_one() {
        let item = FlexItem::default();
        assert_eq!(item.flex, 1);
        assert!(item.is_flex());
        assert!(!item.squish);
    }
}
