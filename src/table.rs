use std::cell::Cell;
use std::sync::Arc;

use crate::completion::CompletionHandle;
use crate::filter::FilterLayer;
use crate::options::{MIN_PRELOAD_COUNT, OnChangeCallback, TableOptions};
use crate::row::{Row, index_of_row};
use crate::selection::SelectionLayer;
use crate::sort::{SortKey, SortLayer};
use crate::state::{FilterState, SortState, WindowState};
use crate::types::{Modifiers, SortDirection, Viewport};
use crate::window::{self, SliceBounds};

#[derive(Clone, Copy, Debug)]
struct PendingScroll {
    deadline_ms: u64,
    offset_px: u64,
}

/// A headless, layered table view-model.
///
/// This type is intentionally UI-agnostic:
/// - It does not hold any UI objects.
/// - The hosting renderer drives it with item snapshots, viewport geometry,
///   scroll offsets, and a `tick(now_ms)` per frame.
/// - It derives the visible row slice, spacer offsets, and selection/sort/
///   filter state the renderer redraws from.
///
/// Internally it composes four layers over the item collection, wired in a
/// fixed order by [`TableView::new`]: selection & active-row tracking, a
/// deferred sort pass, a deferred multi-term text filter, and viewport
/// windowing (this type). Each layer re-derives its output when its own
/// inputs or the layer beneath it change; no layer ever observes a
/// half-applied upstream sequence.
///
/// All timing is caller-driven: timed entry points take `now_ms`, and
/// [`tick`](TableView::tick) advances every deferred pass. Tests drive it
/// with a hand-advanced counter instead of a real clock.
pub struct TableView<T> {
    inner: FilterLayer<T>,

    row_height: u32,
    preload_count: usize,
    delay_ms: u64,
    viewport_height: u32,

    scroll_offset_px: u64,
    current_page: usize,
    window_dirty: bool,
    slice: SliceBounds,
    visible: Vec<Row<T>>,

    debounce: Option<PendingScroll>,
    pending_scroll: Vec<(Row<T>, CompletionHandle)>,

    on_change: Option<OnChangeCallback<T>>,
    disposed: bool,
    notify_depth: Cell<usize>,
    notify_pending: Cell<bool>,
}

impl<T> TableView<T> {
    /// Builds the layer chain (selection → sort → filter → window) from
    /// options.
    pub fn new(options: TableOptions<T>) -> Self {
        tdebug!(
            multi_selection = options.multi_selection,
            keep_last_selected = options.keep_last_selected,
            row_height = options.row_height,
            preload_count = options.preload_count,
            "TableView::new"
        );
        let selection = SelectionLayer::new(options.multi_selection, options.keep_last_selected);
        let sort = SortLayer::new(selection, options.sort, options.settle_delay_ms);
        let filter = FilterLayer::new(sort, options.filter_value, options.settle_delay_ms);
        Self {
            inner: filter,
            row_height: options.row_height.max(1),
            preload_count: options.preload_count.max(MIN_PRELOAD_COUNT),
            delay_ms: options.delay_ms,
            viewport_height: 0,
            scroll_offset_px: 0,
            current_page: 0,
            window_dirty: false,
            slice: SliceBounds::default(),
            visible: Vec::new(),
            debounce: None,
            pending_scroll: Vec::new(),
            on_change: options.on_change,
            disposed: false,
            notify_depth: Cell::new(0),
            notify_pending: Cell::new(false),
        }
    }

    fn sort_layer(&mut self) -> &mut SortLayer<T> {
        &mut self.inner.inner
    }

    fn selection(&self) -> &SelectionLayer<T> {
        &self.inner.inner.inner
    }

    fn selection_mut(&mut self) -> &mut SelectionLayer<T> {
        &mut self.inner.inner.inner
    }

    // --- items ---------------------------------------------------------

    /// Replaces the item snapshot. Insertion order is the canonical pre-sort,
    /// pre-filter order; the rows themselves are never touched.
    pub fn set_items(&mut self, items: Vec<Row<T>>, now_ms: u64) {
        if self.disposed {
            return;
        }
        tdebug!(items = items.len(), "set_items");
        self.sort_layer().set_items(items, now_ms);
        self.notify();
    }

    /// The canonical (insertion-ordered) item collection.
    pub fn items(&self) -> &[Row<T>] {
        self.inner.inner.items()
    }

    /// The materialized (sorted + filtered) row sequence.
    pub fn rows(&self) -> &[Row<T>] {
        self.inner.filtered_rows()
    }

    // --- selection -----------------------------------------------------

    /// Applies a selection click; see [`Modifiers`]. Returns whether the
    /// selection changed. Rows absent from the materialized sequence are
    /// no-ops.
    pub fn change_selection(&mut self, row: &Row<T>, modifiers: Modifiers) -> bool {
        if self.disposed {
            return false;
        }
        let rows = self.inner.filtered_rows().to_vec();
        let changed = self.selection_mut().change_selection(&rows, row, modifiers);
        if changed {
            self.notify();
        }
        changed
    }

    /// Clears the selection, selects `row`, makes it active.
    ///
    /// With `scroll_to_row`, the window is paged so the row is in view; if
    /// that moves the current page, the selection update and the returned
    /// handle wait until the new slice has applied (so the renderer never
    /// highlights a row it has not materialized). Otherwise both happen
    /// synchronously.
    pub fn set_active_row(&mut self, row: &Row<T>, scroll_to_row: bool) -> CompletionHandle {
        if self.disposed {
            return CompletionHandle::abandoned();
        }
        let rows = self.inner.filtered_rows().to_vec();
        let Some(index) = index_of_row(&rows, row) else {
            return CompletionHandle::done();
        };

        if scroll_to_row {
            let target_offset = window::scroll_target_for_row(
                index,
                rows.len(),
                self.row_height,
                self.viewport_height,
            );
            let target_page = window::page_for_offset(target_offset, self.viewport_height);
            if target_page != self.current_page {
                ttrace!(index, target_page, "set_active_row: page change");
                let handle = CompletionHandle::pending();
                self.pending_scroll.push((row.clone(), handle.clone()));
                self.scroll_offset_px = target_offset;
                self.current_page = target_page;
                self.window_dirty = true;
                self.notify();
                return handle;
            }
        }

        self.selection_mut().set_active(&rows, row);
        self.notify();
        CompletionHandle::done()
    }

    pub fn is_selected(&self, row: &Row<T>) -> bool {
        self.selection().is_selected(row)
    }

    /// The selected rows, in materialized order.
    pub fn selected_rows(&self) -> Vec<Row<T>> {
        self.selection().selected_rows(self.inner.filtered_rows())
    }

    pub fn selected_count(&self) -> usize {
        self.selection().selected_count()
    }

    pub fn active_row(&self) -> Option<Row<T>> {
        self.selection().active_row().cloned()
    }

    /// Position of the active row in the materialized sequence, as of the
    /// last applied pass.
    pub fn active_index(&self) -> Option<usize> {
        self.selection().active_index()
    }

    pub fn clear_selection(&mut self) {
        if self.disposed {
            return;
        }
        self.selection_mut().clear();
        self.notify();
    }

    // --- sorting -------------------------------------------------------

    /// Sorts by `key`, ascending; a repeated key flips the direction.
    pub fn sort_by(&mut self, key: SortKey<T>, now_ms: u64) {
        if self.disposed {
            return;
        }
        self.sort_layer().sort_by(key, now_ms);
        self.notify();
    }

    /// Forces a re-sort pass even when no tracked input changed, for
    /// externally mutated row contents. The handle resolves once the pass
    /// has applied (and is abandoned if the table is disposed first).
    pub fn update(&mut self, now_ms: u64) -> CompletionHandle {
        if self.disposed {
            return CompletionHandle::abandoned();
        }
        let handle = self.sort_layer().update(now_ms);
        self.notify();
        handle
    }

    /// Whether a deferred sort pass is in flight.
    pub fn is_sorting(&self) -> bool {
        self.inner.inner.is_busy()
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.inner.inner.direction()
    }

    pub fn sort_state(&self) -> SortState {
        SortState {
            key: self.inner.inner.key_name().map(str::to_owned),
            direction: self.inner.inner.direction(),
            busy: self.inner.inner.is_busy(),
        }
    }

    // --- filtering -----------------------------------------------------

    /// Sets the free-text query. Whitespace-separated terms must all match
    /// the configured filter accessor's output, case-insensitively.
    pub fn set_filter_text(&mut self, query: impl Into<String>, now_ms: u64) {
        if self.disposed {
            return;
        }
        self.inner.set_filter_text(query, now_ms);
        self.notify();
    }

    /// Resets the free-text query to empty.
    pub fn clear_filter(&mut self, now_ms: u64) {
        if self.disposed {
            return;
        }
        self.inner.clear_filter(now_ms);
        self.notify();
    }

    /// Sets (or clears) the external row predicate, composed AND-wise with
    /// the text filter.
    pub fn set_filter_fn(
        &mut self,
        filter: Option<impl Fn(&T) -> bool + Send + Sync + 'static>,
        now_ms: u64,
    ) {
        if self.disposed {
            return;
        }
        self.inner
            .set_filter_fn(filter.map(|f| Arc::new(f) as _), now_ms);
        self.notify();
    }

    /// Whether a deferred filter pass is in flight.
    pub fn is_filtering(&self) -> bool {
        self.inner.is_busy()
    }

    pub fn filter_text(&self) -> &str {
        self.inner.query()
    }

    /// Synchronously filters the applied sorted sequence, without waiting
    /// for the deferred pass.
    pub fn compute_filtered(&self) -> Vec<Row<T>> {
        self.inner.compute_filtered()
    }

    /// Synchronously filters the canonical item collection (insertion
    /// order).
    pub fn filter_items(&self) -> Vec<Row<T>> {
        self.inner.filter_items()
    }

    pub fn filter_state(&self) -> FilterState {
        FilterState {
            query: self.inner.query().to_owned(),
            has_external_filter: self.inner.has_external_filter(),
            busy: self.inner.is_busy(),
        }
    }

    // --- windowing -----------------------------------------------------

    /// Applies a viewport size reported by the hosting renderer.
    pub fn resize(&mut self, viewport: Viewport) {
        if self.disposed {
            return;
        }
        if self.viewport_height == viewport.height {
            return;
        }
        self.viewport_height = viewport.height;
        self.window_dirty = true;
        self.notify();
    }

    /// Debounced scroll: the offset lands in [`set_scroll`](Self::set_scroll)
    /// once `delay_ms` elapses without another call.
    pub fn scroll(&mut self, offset_px: u64, now_ms: u64) {
        if self.disposed {
            return;
        }
        ttrace!(offset_px, now_ms, "scroll");
        self.debounce = Some(PendingScroll {
            deadline_ms: now_ms.saturating_add(self.delay_ms),
            offset_px,
        });
    }

    /// Clamps the offset and moves the current page bucket.
    pub fn set_scroll(&mut self, offset_px: u64) {
        if self.disposed {
            return;
        }
        let total = self.inner.filtered_rows().len();
        let clamped = offset_px.min(window::max_scroll_offset(
            total,
            self.row_height,
            self.viewport_height,
        ));
        let page = window::page_for_offset(clamped, self.viewport_height);
        ttrace!(offset_px, clamped, page, "set_scroll");
        self.scroll_offset_px = clamped;
        self.current_page = page;
        self.window_dirty = true;
        self.notify();
    }

    pub fn scroll_offset(&self) -> u64 {
        self.scroll_offset_px
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// The last applied visible slice.
    pub fn visible_rows(&self) -> &[Row<T>] {
        &self.visible
    }

    /// Spacer height above the visible slice, in pixels.
    pub fn top_offset_px(&self) -> u64 {
        self.slice.top_offset_px
    }

    /// Spacer height below the visible slice, in pixels.
    pub fn bottom_offset_px(&self) -> u64 {
        self.slice.bottom_offset_px
    }

    pub fn window_state(&self) -> WindowState {
        WindowState {
            row_height: self.row_height,
            viewport_height: self.viewport_height,
            preload_count: self.preload_count,
            current_page: self.current_page,
            total_rows: self.inner.filtered_rows().len(),
            visible_rows: self.visible.len(),
            top_offset_px: self.slice.top_offset_px,
            bottom_offset_px: self.slice.bottom_offset_px,
        }
    }

    // --- option setters ------------------------------------------------

    pub fn row_height(&self) -> u32 {
        self.row_height
    }

    pub fn set_row_height(&mut self, row_height: u32) {
        if self.disposed {
            return;
        }
        self.row_height = row_height.max(1);
        self.window_dirty = true;
        self.notify();
    }

    pub fn preload_count(&self) -> usize {
        self.preload_count
    }

    /// Silently clamped to a minimum of 3.
    pub fn set_preload_count(&mut self, preload_count: usize) {
        if self.disposed {
            return;
        }
        self.preload_count = preload_count.max(MIN_PRELOAD_COUNT);
        self.window_dirty = true;
        self.notify();
    }

    pub fn set_delay_ms(&mut self, delay_ms: u64) {
        self.delay_ms = delay_ms;
    }

    pub fn set_settle_delay_ms(&mut self, settle_delay_ms: u64) {
        self.inner.set_settle_delay_ms(settle_delay_ms);
        self.inner.inner.set_settle_delay_ms(settle_delay_ms);
    }

    pub fn set_multi_selection(&mut self, multi_selection: bool) {
        self.selection_mut().set_multi_selection(multi_selection);
    }

    pub fn set_keep_last_selected(&mut self, keep_last_selected: bool) {
        self.selection_mut().set_keep_last_selected(keep_last_selected);
    }

    pub fn set_on_change(
        &mut self,
        on_change: Option<impl Fn(&TableView<T>) + Send + Sync + 'static>,
    ) {
        self.on_change = on_change.map(|f| Arc::new(f) as _);
    }

    // --- the tick pipeline ---------------------------------------------

    /// Advances all deferred work up to `now_ms`.
    ///
    /// Order within one call: debounced scroll, then the sort pass, then the
    /// filter pass, then the window slice. A sort apply cascades a filter
    /// re-schedule (the filter never reads a half-applied sorted sequence);
    /// a filter apply re-syncs the selection and dirties the window; the
    /// window apply services pending scroll-to-row completions.
    pub fn tick(&mut self, now_ms: u64) {
        if self.disposed {
            return;
        }
        self.batch_update(|t| {
            if let Some(debounce) = t.debounce {
                if now_ms >= debounce.deadline_ms {
                    t.debounce = None;
                    t.set_scroll(debounce.offset_px);
                }
            }

            if t.inner.inner.tick(now_ms) {
                // New sort order applied: re-anchor the selection against
                // the synchronously derived filtered view, then cascade.
                let rows = t.inner.compute_filtered();
                t.selection_mut().sync(&rows);
                t.inner.schedule(now_ms);
                t.notify();
            }

            if t.inner.tick(now_ms) {
                let rows = t.inner.filtered_rows().to_vec();
                t.selection_mut().sync(&rows);
                t.window_dirty = true;
                t.notify();
            }

            if t.window_dirty {
                t.apply_window();
            }
        });
    }

    fn apply_window(&mut self) {
        self.window_dirty = false;
        let total = self.inner.filtered_rows().len();
        self.slice = window::slice_bounds(
            total,
            self.row_height,
            self.viewport_height,
            self.current_page,
            self.preload_count,
        );
        self.visible =
            self.inner.filtered_rows()[self.slice.start_row..self.slice.end_row].to_vec();
        ttrace!(
            start = self.slice.start_row,
            end = self.slice.end_row,
            page = self.current_page,
            "window applied"
        );

        if !self.pending_scroll.is_empty() {
            let rows = self.inner.filtered_rows().to_vec();
            for (row, handle) in std::mem::take(&mut self.pending_scroll) {
                self.selection_mut().set_active(&rows, &row);
                handle.complete();
            }
        }
        self.notify();
    }

    // --- notification --------------------------------------------------

    fn notify_now(&self) {
        if let Some(cb) = &self.on_change {
            cb(self);
        }
    }

    fn notify(&self) {
        if self.notify_depth.get() > 0 {
            self.notify_pending.set(true);
            return;
        }
        self.notify_now();
    }

    /// Batches multiple updates into a single `on_change` notification.
    pub fn batch_update(&mut self, f: impl FnOnce(&mut Self)) {
        let depth = self.notify_depth.get();
        self.notify_depth.set(depth.saturating_add(1));

        f(self);

        let depth = self.notify_depth.get();
        debug_assert!(depth > 0, "notify_depth underflow");
        let next = depth.saturating_sub(1);
        self.notify_depth.set(next);

        if next == 0 && self.notify_pending.replace(false) {
            self.notify_now();
        }
    }

    // --- lifecycle -----------------------------------------------------

    /// Cancels pending timers, abandons outstanding completion handles, and
    /// makes every further mutation a no-op. Idempotent; also runs on drop.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        tdebug!("dispose");
        self.disposed = true;
        self.debounce = None;
        self.window_dirty = false;
        for (_, handle) in self.pending_scroll.drain(..) {
            handle.abandon();
        }
        self.inner.cancel();
        self.inner.inner.cancel();
        self.on_change = None;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl<T> Drop for TableView<T> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<T> core::fmt::Debug for TableView<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TableView")
            .field("items", &self.inner.inner.items().len())
            .field("rows", &self.inner.filtered_rows().len())
            .field("visible_rows", &self.visible.len())
            .field("current_page", &self.current_page)
            .field("viewport_height", &self.viewport_height)
            .field("row_height", &self.row_height)
            .field("preload_count", &self.preload_count)
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}
