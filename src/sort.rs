use std::sync::Arc;

use crate::alphanum;
use crate::completion::CompletionHandle;
use crate::options::SortComparator;
use crate::row::Row;
use crate::selection::SelectionLayer;
use crate::types::SortDirection;

/// A sortable column: a display-independent name plus a value extractor.
///
/// [`TableView::sort_by`](crate::TableView::sort_by) flips the direction when
/// called twice with the same `name`; the closure itself has no equality.
pub struct SortKey<T> {
    name: String,
    get: Arc<dyn Fn(&T) -> String + Send + Sync>,
}

impl<T> SortKey<T> {
    pub fn new(name: impl Into<String>, get: impl Fn(&T) -> String + Send + Sync + 'static) -> Self {
        Self {
            name: name.into(),
            get: Arc::new(get),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<T> Clone for SortKey<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            get: Arc::clone(&self.get),
        }
    }
}

impl<T> core::fmt::Debug for SortKey<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("SortKey").field(&self.name).finish()
    }
}

/// Deferred, busy-flagged sorting over the canonical item snapshot.
///
/// Any input change re-arms a single settle deadline; the pass itself runs
/// when [`tick`](SortLayer::tick) crosses it, so N synchronous mutations in
/// one turn cost one re-sort.
pub(crate) struct SortLayer<T> {
    pub(crate) inner: SelectionLayer<T>,
    items: Vec<Row<T>>,
    key: Option<SortKey<T>>,
    direction: SortDirection,
    comparator: Option<SortComparator<T>>,
    sorted: Vec<Row<T>>,
    busy: bool,
    deadline_ms: Option<u64>,
    settle_delay_ms: u64,
    pending: Vec<CompletionHandle>,
}

impl<T> SortLayer<T> {
    pub(crate) fn new(
        inner: SelectionLayer<T>,
        comparator: Option<SortComparator<T>>,
        settle_delay_ms: u64,
    ) -> Self {
        Self {
            inner,
            items: Vec::new(),
            key: None,
            direction: SortDirection::None,
            comparator,
            sorted: Vec::new(),
            busy: false,
            deadline_ms: None,
            settle_delay_ms,
            pending: Vec::new(),
        }
    }

    pub(crate) fn set_items(&mut self, items: Vec<Row<T>>, now_ms: u64) {
        self.items = items;
        self.schedule(now_ms);
    }

    pub(crate) fn items(&self) -> &[Row<T>] {
        &self.items
    }

    /// Same key flips the direction; a new key starts ascending.
    pub(crate) fn sort_by(&mut self, key: SortKey<T>, now_ms: u64) {
        tdebug!(key = key.name.as_str(), "sort_by");
        if self.key.as_ref().is_some_and(|k| k.name == key.name) {
            self.direction = self.direction.flipped();
        } else {
            self.direction = SortDirection::Ascending;
        }
        self.key = Some(key);
        self.schedule(now_ms);
    }

    /// Forces a pass even when no tracked input changed (externally mutated
    /// row contents). The handle resolves once the pass has applied.
    pub(crate) fn update(&mut self, now_ms: u64) -> CompletionHandle {
        let handle = CompletionHandle::pending();
        self.pending.push(handle.clone());
        self.schedule(now_ms);
        handle
    }

    /// Single-flight: re-arming cancels any pending deadline.
    pub(crate) fn schedule(&mut self, now_ms: u64) {
        self.busy = true;
        self.deadline_ms = Some(now_ms.saturating_add(self.settle_delay_ms));
    }

    /// Applies the pass if the settle deadline has been crossed.
    pub(crate) fn tick(&mut self, now_ms: u64) -> bool {
        let Some(deadline) = self.deadline_ms else {
            return false;
        };
        if now_ms < deadline {
            return false;
        }
        self.deadline_ms = None;
        self.sorted = self.compute_sorted();
        self.busy = false;
        for handle in self.pending.drain(..) {
            handle.complete();
        }
        ttrace!(rows = self.sorted.len(), "sort pass applied");
        true
    }

    fn compute_sorted(&self) -> Vec<Row<T>> {
        let mut rows = self.items.clone();
        if self.direction == SortDirection::None {
            return rows;
        }
        let reverse = self.direction == SortDirection::Descending;

        if let Some(comparator) = &self.comparator {
            rows.sort_by(|a, b| {
                let ord = comparator(a, b);
                if reverse { ord.reverse() } else { ord }
            });
        } else if let Some(key) = &self.key {
            let get = &key.get;
            rows.sort_by(|a, b| {
                let ord = alphanum::compare(&get(a), &get(b));
                if reverse { ord.reverse() } else { ord }
            });
        }
        rows
    }

    pub(crate) fn sorted_rows(&self) -> &[Row<T>] {
        &self.sorted
    }

    pub(crate) fn is_busy(&self) -> bool {
        self.busy
    }

    pub(crate) fn direction(&self) -> SortDirection {
        self.direction
    }

    pub(crate) fn key_name(&self) -> Option<&str> {
        self.key.as_ref().map(|k| k.name.as_str())
    }

    pub(crate) fn set_settle_delay_ms(&mut self, settle_delay_ms: u64) {
        self.settle_delay_ms = settle_delay_ms;
    }

    /// Cancels the pending deadline and abandons outstanding futures.
    pub(crate) fn cancel(&mut self) {
        self.deadline_ms = None;
        self.busy = false;
        for handle in self.pending.drain(..) {
            handle.abandon();
        }
    }
}
