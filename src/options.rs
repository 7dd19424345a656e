use std::cmp::Ordering;
use std::sync::Arc;

use crate::table::TableView;

/// Extracts the text a row is matched against when filtering.
pub type FilterValueFn<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

/// An externally supplied row predicate, composed AND-wise with the text
/// filter.
pub type FilterPredicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// A custom comparator hook. When set, it fully replaces the default
/// alphanumeric ordering; the active sort direction still applies by
/// reversing its result.
pub type SortComparator<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// A callback fired when derived table state changes.
///
/// Use [`TableView::batch_update`] to coalesce several mutations into a
/// single notification.
pub type OnChangeCallback<T> = Arc<dyn Fn(&TableView<T>) + Send + Sync>;

/// Configuration for [`TableView`].
///
/// Cheap to clone: closures are stored in `Arc`s.
pub struct TableOptions<T> {
    /// Allows ctrl-toggle and shift-range selection. Off, every click is a
    /// single select.
    pub multi_selection: bool,
    /// When the active row disappears from the derived sequence (filtered
    /// out, removed), re-select the row now occupying its former index.
    pub keep_last_selected: bool,
    /// Fixed row height in pixels. Values below 1 are treated as 1.
    pub row_height: u32,
    /// Page-buckets materialized around the current page. Silently clamped
    /// to a minimum of 3 (current + one before + one after).
    pub preload_count: usize,
    /// Scroll debounce in milliseconds.
    pub delay_ms: u64,
    /// Settle delay for deferred sort/filter passes, in milliseconds. This
    /// decouples the busy flag from the (fast) computation itself.
    pub settle_delay_ms: u64,
    /// Text accessor rows are matched against when filtering.
    pub filter_value: FilterValueFn<T>,
    /// Optional comparator replacing the default alphanumeric ordering.
    pub sort: Option<SortComparator<T>>,
    /// Optional callback fired when derived state changes.
    pub on_change: Option<OnChangeCallback<T>>,
}

pub(crate) const DEFAULT_ROW_HEIGHT: u32 = 29;
pub(crate) const MIN_PRELOAD_COUNT: usize = 3;
pub(crate) const DEFAULT_SCROLL_DELAY_MS: u64 = 100;
pub(crate) const DEFAULT_SETTLE_DELAY_MS: u64 = 30;

impl<T> TableOptions<T> {
    /// Creates options with defaults and the given filter-text accessor.
    ///
    /// `filter_value(row)` should return the text the free-text filter terms
    /// are matched against (typically the row's display label).
    pub fn new(filter_value: impl Fn(&T) -> String + Send + Sync + 'static) -> Self {
        Self {
            multi_selection: false,
            keep_last_selected: false,
            row_height: DEFAULT_ROW_HEIGHT,
            preload_count: MIN_PRELOAD_COUNT,
            delay_ms: DEFAULT_SCROLL_DELAY_MS,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            filter_value: Arc::new(filter_value),
            sort: None,
            on_change: None,
        }
    }

    pub fn with_multi_selection(mut self, multi_selection: bool) -> Self {
        self.multi_selection = multi_selection;
        self
    }

    pub fn with_keep_last_selected(mut self, keep_last_selected: bool) -> Self {
        self.keep_last_selected = keep_last_selected;
        self
    }

    pub fn with_row_height(mut self, row_height: u32) -> Self {
        self.row_height = row_height.max(1);
        self
    }

    pub fn with_preload_count(mut self, preload_count: usize) -> Self {
        self.preload_count = preload_count.max(MIN_PRELOAD_COUNT);
        self
    }

    pub fn with_delay_ms(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn with_settle_delay_ms(mut self, settle_delay_ms: u64) -> Self {
        self.settle_delay_ms = settle_delay_ms;
        self
    }

    pub fn with_sort(
        mut self,
        sort: Option<impl Fn(&T, &T) -> Ordering + Send + Sync + 'static>,
    ) -> Self {
        self.sort = sort.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_on_change(
        mut self,
        on_change: Option<impl Fn(&TableView<T>) + Send + Sync + 'static>,
    ) -> Self {
        self.on_change = on_change.map(|f| Arc::new(f) as _);
        self
    }
}

impl<T> Clone for TableOptions<T> {
    fn clone(&self) -> Self {
        Self {
            multi_selection: self.multi_selection,
            keep_last_selected: self.keep_last_selected,
            row_height: self.row_height,
            preload_count: self.preload_count,
            delay_ms: self.delay_ms,
            settle_delay_ms: self.settle_delay_ms,
            filter_value: Arc::clone(&self.filter_value),
            sort: self.sort.clone(),
            on_change: self.on_change.clone(),
        }
    }
}

impl<T> core::fmt::Debug for TableOptions<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TableOptions")
            .field("multi_selection", &self.multi_selection)
            .field("keep_last_selected", &self.keep_last_selected)
            .field("row_height", &self.row_height)
            .field("preload_count", &self.preload_count)
            .field("delay_ms", &self.delay_ms)
            .field("settle_delay_ms", &self.settle_delay_ms)
            .finish_non_exhaustive()
    }
}
