#![forbid(unsafe_code)]

//! Scroll window calculation for selectable lists.
//!
//! Given a list, a selected index and the height available, picks the
//! contiguous run of items to render so that the selection stays on screen.
//! Optional overflow indicators ("more above" / "more below") each take one
//! row when shown.
//!
//! Two height models are supported:
//! - every item is `item_height` rows ([`calculate_scroll_state`])
//! - each item reports its own height ([`calculate_scroll_state_with`])
//!
//! # Example
//! ```
//! use cellfit_layout::scroll::{ScrollConfig, calculate_scroll_state};
//!
//! let items: Vec<u32> = (0..100).collect();
//! let config = ScrollConfig::new(10);
//! let window = calculate_scroll_state(&items, 50, &config);
//!
//! assert_eq!(window.range(), 45..55);
//! assert_eq!(window.overflow_top, 45);
//! assert_eq!(window.overflow_bottom, 45);
//! ```

use std::ops::Range;

/// Upper bound on window recomputation passes.
const MAX_PASSES: usize = 3;

/// Inputs for a scroll window calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollConfig {
    /// Rows available for items, gaps and indicators.
    pub available_height: usize,
    /// Rows per item in the fixed-height model.
    pub item_height: usize,
    /// Rows after each item.
    pub gap: usize,
    /// Reserve one row for each overflow indicator that is shown.
    pub overflow_indicator: bool,
}

impl ScrollConfig {
    /// One-row items, no gap, no indicators.
    #[must_use]
    pub const fn new(available_height: usize) -> Self {
        Self {
            available_height,
            item_height: 1,
            gap: 0,
            overflow_indicator: false,
        }
    }

    /// Set the rows per item.
    #[must_use]
    pub const fn item_height(mut self, item_height: usize) -> Self {
        self.item_height = item_height;
        self
    }

    /// Set the rows between items.
    #[must_use]
    pub const fn gap(mut self, gap: usize) -> Self {
        self.gap = gap;
        self
    }

    /// Set whether overflow indicators reserve rows.
    #[must_use]
    pub const fn overflow_indicator(mut self, enabled: bool) -> Self {
        self.overflow_indicator = enabled;
        self
    }

    fn indicator_rows(&self, hidden_above: bool, hidden_below: bool) -> usize {
        if self.overflow_indicator {
            usize::from(hidden_above) + usize::from(hidden_below)
        } else {
            0
        }
    }
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self::new(0)
    }
}

/// An item inside the window, with its index in the full list.
#[derive(Debug, PartialEq, Eq)]
pub struct VisibleItem<'a, T> {
    /// The item itself, borrowed from the list.
    pub item: &'a T,
    /// Position in the full list.
    pub index: usize,
}

impl<T> Clone for VisibleItem<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for VisibleItem<'_, T> {}

/// The visible part of a list.
///
/// `overflow_top + visible.len() + overflow_bottom` always equals the list
/// length, and `scroll_offset` is the index of the first visible item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollWindow<'a, T> {
    /// Items to draw, top to bottom, in list order.
    pub visible: Vec<VisibleItem<'a, T>>,
    /// Index of the first visible item. 0 for an empty list.
    pub scroll_offset: usize,
    /// Items hidden above the window.
    pub overflow_top: usize,
    /// Items hidden below the window.
    pub overflow_bottom: usize,
}

impl<T> Default for ScrollWindow<'_, T> {
    fn default() -> Self {
        Self {
            visible: Vec::new(),
            scroll_offset: 0,
            overflow_top: 0,
            overflow_bottom: 0,
        }
    }
}

impl<'a, T> ScrollWindow<'a, T> {
    fn from_range(items: &'a [T], range: Range<usize>) -> Self {
        let visible: Vec<_> = items[range.clone()]
            .iter()
            .zip(range.clone())
            .map(|(item, index)| VisibleItem { item, index })
            .collect();
        Self {
            visible,
            scroll_offset: range.start,
            overflow_top: range.start,
            overflow_bottom: items.len() - range.end,
        }
    }

    /// Indices of the visible items in the full list.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.scroll_offset..self.scroll_offset + self.visible.len()
    }

    /// Number of visible items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.visible.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// Whether items are hidden above the window.
    #[must_use]
    pub fn show_top_indicator(&self) -> bool {
        self.overflow_top > 0
    }

    /// Whether items are hidden below the window.
    #[must_use]
    pub fn show_bottom_indicator(&self) -> bool {
        self.overflow_bottom > 0
    }

    /// Iterate over the visible items.
    pub fn iter(&self) -> impl Iterator<Item = &VisibleItem<'a, T>> {
        self.visible.iter()
    }
}

/// Window for a list whose items are all `config.item_height` rows tall.
///
/// The window is centred on `selected` and clamped to the list ends. When
/// indicators are enabled, the rows they take are only known once the window
/// position is known, so the size is refined in a bounded loop of at most
/// three passes, then shrunk if the indicators it ends up showing do not fit.
/// The result is an approximation: the selection is always visible and the
/// window fits, but in rare cases one more item would have fit.
#[must_use]
pub fn calculate_scroll_state<'a, T>(
    items: &'a [T],
    selected: usize,
    config: &ScrollConfig,
) -> ScrollWindow<'a, T> {
    #[cfg(feature = "tracing")]
    let _span = tracing::debug_span!(
        "scroll_window",
        items = items.len(),
        selected,
        available_height = config.available_height,
        variable = false
    )
    .entered();

    let Some(selected) = clamp_selected(items.len(), selected) else {
        return ScrollWindow::default();
    };
    let range = fixed_range(items.len(), selected, config);
    finish(items, selected, range)
}

/// Window for a list whose items report their own height.
///
/// `height_of` is called exactly once per item. `config.item_height` is not
/// used. The window starts with the selected item near the vertical centre,
/// grows forward while items fit, and is re-anchored on the selection if it
/// ends up outside.
#[must_use]
pub fn calculate_scroll_state_with<'a, T, F>(
    items: &'a [T],
    selected: usize,
    config: &ScrollConfig,
    height_of: F,
) -> ScrollWindow<'a, T>
where
    F: FnMut(&T) -> usize,
{
    #[cfg(feature = "tracing")]
    let _span = tracing::debug_span!(
        "scroll_window",
        items = items.len(),
        selected,
        available_height = config.available_height,
        variable = true
    )
    .entered();

    let heights: Vec<usize> = items.iter().map(height_of).collect();
    let Some(selected) = clamp_selected(items.len(), selected) else {
        return ScrollWindow::default();
    };
    let range = VariableWindow::new(&heights, config).range(selected);
    finish(items, selected, range)
}

fn clamp_selected(len: usize, selected: usize) -> Option<usize> {
    let last = len.checked_sub(1)?;
    if selected > last {
        #[cfg(feature = "tracing")]
        tracing::trace!(selected, last, "selected index clamped");
        return Some(last);
    }
    Some(selected)
}

fn finish<'a, T>(items: &'a [T], selected: usize, range: Range<usize>) -> ScrollWindow<'a, T> {
    debug_assert!(range.start <= selected && selected < range.end);
    debug_assert!(range.end <= items.len());
    ScrollWindow::from_range(items, range)
}

// ============================================================================
// Fixed-height items
// ============================================================================

// `converged` is only read by the trace event.
#[cfg_attr(not(feature = "tracing"), allow(unused_variables, unused_assignments))]
fn fixed_range(len: usize, selected: usize, config: &ScrollConfig) -> Range<usize> {
    let row = config.item_height.saturating_add(config.gap);
    if row == 0 {
        return 0..len;
    }
    let capacity = config.available_height / row;
    if capacity >= len {
        return 0..len;
    }

    let mut max_visible = capacity.max(1);
    let mut converged = false;
    for _ in 0..MAX_PASSES {
        let offset = centred_offset(selected, max_visible, len);
        let reserved = config.indicator_rows(offset > 0, offset + max_visible < len);
        let next = (config.available_height.saturating_sub(reserved) / row).clamp(1, len);
        if next == max_visible {
            converged = true;
            break;
        }
        max_visible = next;
    }

    #[cfg(feature = "tracing")]
    {
        if !converged {
            tracing::trace!(max_visible, "indicator reservation did not settle");
        }
    }

    // Shrink until items plus the indicators actually shown fit.
    let mut offset = centred_offset(selected, max_visible, len);
    while max_visible > 1 {
        let reserved = config.indicator_rows(offset > 0, offset + max_visible < len);
        if max_visible.saturating_mul(row).saturating_add(reserved) <= config.available_height {
            break;
        }
        max_visible -= 1;
        offset = centred_offset(selected, max_visible, len);
    }
    offset..offset + max_visible
}

/// Offset that puts `selected` in the middle of a `count`-item window.
fn centred_offset(selected: usize, count: usize, len: usize) -> usize {
    selected.saturating_sub(count / 2).min(len - count)
}

// ============================================================================
// Variable-height items
// ============================================================================

struct VariableWindow<'h> {
    heights: &'h [usize],
    gap: usize,
    available: usize,
    indicators: bool,
}

impl<'h> VariableWindow<'h> {
    fn new(heights: &'h [usize], config: &ScrollConfig) -> Self {
        Self {
            heights,
            gap: config.gap,
            available: config.available_height,
            indicators: config.overflow_indicator,
        }
    }

    fn len(&self) -> usize {
        self.heights.len()
    }

    /// Rows taken by item `index` and the gap after it.
    fn cost(&self, index: usize) -> usize {
        self.heights[index].saturating_add(self.gap)
    }

    fn indicator(&self, shown: bool) -> usize {
        usize::from(self.indicators && shown)
    }

    fn range(&self, selected: usize) -> Range<usize> {
        let len = self.len();
        let total = (0..len).map(|i| self.cost(i)).fold(0usize, usize::saturating_add);
        if total <= self.available {
            return 0..len;
        }

        let mut start = self.centred_start(selected).min(self.last_start());
        let mut end = self.grow_forward(start);

        for _ in 0..MAX_PASSES {
            if selected < start {
                start = selected;
            } else if selected >= end {
                start = self.grow_backward(selected);
            } else {
                break;
            }
            #[cfg(feature = "tracing")]
            tracing::trace!(start, selected, "window recentred");
            end = self.grow_forward(start);
        }

        if !(start..end).contains(&selected) {
            start = selected;
            end = self.grow_forward(start);
        }
        start..end
    }

    /// First index such that the selected item's midpoint sits near the centre.
    fn centred_start(&self, selected: usize) -> usize {
        let mut budget = (self.available / 2).saturating_sub(self.heights[selected] / 2);
        let mut start = selected;
        while start > 0 {
            let cost = self.cost(start - 1);
            if cost > budget {
                break;
            }
            budget -= cost;
            start -= 1;
        }
        start
    }

    /// Latest start index whose tail still fills the available height.
    fn last_start(&self) -> usize {
        let len = self.len();
        let mut tail = 0usize;
        let mut last = len - 1;
        for start in (0..len).rev() {
            tail = tail.saturating_add(self.cost(start));
            if tail.saturating_add(self.indicator(start > 0)) > self.available {
                break;
            }
            last = start;
        }
        last
    }

    /// End of the window starting at `start`. Always includes `start`.
    fn grow_forward(&self, start: usize) -> usize {
        let len = self.len();
        let mut budget = self.available.saturating_sub(self.indicator(start > 0));
        let mut end = start;
        while end < len {
            let cost = self.cost(end);
            let limit = budget.saturating_sub(self.indicator(end + 1 < len));
            if cost > limit {
                // An item taller than the window is shown alone.
                if end == start {
                    end += 1;
                }
                break;
            }
            budget = budget.saturating_sub(cost);
            end += 1;
        }
        end
    }

    /// Earliest start of a window that ends with `last`.
    fn grow_backward(&self, last: usize) -> usize {
        let mut used = self
            .cost(last)
            .saturating_add(self.indicator(last + 1 < self.len()));
        let mut start = last;
        while start > 0 {
            let candidate = used.saturating_add(self.cost(start - 1));
            if candidate.saturating_add(self.indicator(start - 1 > 0)) > self.available {
                break;
            }
            used = candidate;
            start -= 1;
        }
        start
    }
}
