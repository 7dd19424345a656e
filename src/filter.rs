use regex::{Regex, RegexBuilder};

use crate::options::{FilterPredicate, FilterValueFn};
use crate::row::Row;
use crate::sort::SortLayer;

/// Deferred multi-term text filtering over the applied sorted sequence,
/// composed with an optional external predicate.
///
/// The raw query is regex-escaped and split on whitespace; every term must
/// match (case-insensitively) the text extracted by the configured accessor.
/// No terms means every row matches.
pub(crate) struct FilterLayer<T> {
    pub(crate) inner: SortLayer<T>,
    query: String,
    terms: Vec<Regex>,
    external: Option<FilterPredicate<T>>,
    filter_value: FilterValueFn<T>,
    filtered: Vec<Row<T>>,
    busy: bool,
    deadline_ms: Option<u64>,
    settle_delay_ms: u64,
}

impl<T> FilterLayer<T> {
    pub(crate) fn new(
        inner: SortLayer<T>,
        filter_value: FilterValueFn<T>,
        settle_delay_ms: u64,
    ) -> Self {
        Self {
            inner,
            query: String::new(),
            terms: Vec::new(),
            external: None,
            filter_value,
            filtered: Vec::new(),
            busy: false,
            deadline_ms: None,
            settle_delay_ms,
        }
    }

    pub(crate) fn set_filter_text(&mut self, query: impl Into<String>, now_ms: u64) {
        self.query = query.into();
        self.terms = compile_terms(&self.query);
        tdebug!(query = self.query.as_str(), terms = self.terms.len(), "set_filter_text");
        self.schedule(now_ms);
    }

    pub(crate) fn clear_filter(&mut self, now_ms: u64) {
        self.set_filter_text(String::new(), now_ms);
    }

    pub(crate) fn set_filter_fn(&mut self, external: Option<FilterPredicate<T>>, now_ms: u64) {
        self.external = external;
        self.schedule(now_ms);
    }

    pub(crate) fn query(&self) -> &str {
        &self.query
    }

    pub(crate) fn has_external_filter(&self) -> bool {
        self.external.is_some()
    }

    pub(crate) fn matches(&self, item: &T) -> bool {
        if let Some(external) = &self.external {
            if !external(item) {
                return false;
            }
        }
        if self.terms.is_empty() {
            return true;
        }
        let text = (self.filter_value)(item);
        self.terms.iter().all(|term| term.is_match(&text))
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
        self.filtered = self.compute_filtered();
        self.busy = false;
        ttrace!(rows = self.filtered.len(), "filter pass applied");
        true
    }

    /// Pure synchronous derivation over the applied sorted sequence, usable
    /// without waiting for the deferred pass.
    pub(crate) fn compute_filtered(&self) -> Vec<Row<T>> {
        self.inner
            .sorted_rows()
            .iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect()
    }

    /// Like [`compute_filtered`](Self::compute_filtered), but over the
    /// canonical (insertion-ordered) item collection.
    pub(crate) fn filter_items(&self) -> Vec<Row<T>> {
        self.inner
            .items()
            .iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect()
    }

    /// The last applied filtered sequence.
    pub(crate) fn filtered_rows(&self) -> &[Row<T>] {
        &self.filtered
    }

    pub(crate) fn is_busy(&self) -> bool {
        self.busy
    }

    pub(crate) fn set_settle_delay_ms(&mut self, settle_delay_ms: u64) {
        self.settle_delay_ms = settle_delay_ms;
    }

    /// Cancels the pending deadline.
    pub(crate) fn cancel(&mut self) {
        self.deadline_ms = None;
        self.busy = false;
    }
}

/// Terms are escaped before compilation, so each regex is a case-insensitive
/// literal; a term that still fails to compile is dropped.
fn compile_terms(query: &str) -> Vec<Regex> {
    query
        .split_whitespace()
        .filter_map(|term| {
            RegexBuilder::new(&regex::escape(term))
                .case_insensitive(true)
                .build()
                .ok()
        })
        .collect()
}
