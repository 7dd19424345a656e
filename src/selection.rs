use std::collections::HashSet;

use crate::row::{Row, RowId, index_of_row};
use crate::types::Modifiers;

/// Selection and active-row tracking.
///
/// A pure state machine: it owns the selected set and the active row, and is
/// driven against whatever row sequence the outer layers have materialized.
/// It never schedules anything and holds no timers.
pub(crate) struct SelectionLayer<T> {
    multi_selection: bool,
    keep_last_selected: bool,
    selected: HashSet<RowId>,
    active: Option<Row<T>>,
    /// Last known position of the active row in the materialized sequence.
    /// Kept across removals so the fallback can re-select by index.
    active_index: Option<usize>,
}

impl<T> SelectionLayer<T> {
    pub(crate) fn new(multi_selection: bool, keep_last_selected: bool) -> Self {
        Self {
            multi_selection,
            keep_last_selected,
            selected: HashSet::new(),
            active: None,
            active_index: None,
        }
    }

    pub(crate) fn set_multi_selection(&mut self, multi_selection: bool) {
        self.multi_selection = multi_selection;
    }

    pub(crate) fn set_keep_last_selected(&mut self, keep_last_selected: bool) {
        self.keep_last_selected = keep_last_selected;
    }

    /// Applies a selection click against the materialized sequence `rows`.
    ///
    /// Priority order: shift-range, ctrl-toggle, single select. Returns
    /// whether the selection changed. Clicks on rows absent from `rows` are
    /// no-ops.
    pub(crate) fn change_selection(
        &mut self,
        rows: &[Row<T>],
        row: &Row<T>,
        modifiers: Modifiers,
    ) -> bool {
        let Some(index) = index_of_row(rows, row) else {
            return false;
        };

        if modifiers.shift && self.multi_selection && self.active.is_some() {
            return self.range_select(rows, row, index);
        }

        if modifiers.ctrl && self.multi_selection {
            return self.toggle_select(row, index);
        }

        self.single_select(row, index);
        true
    }

    /// Clears the selection, selects `row`, makes it active.
    pub(crate) fn set_active(&mut self, rows: &[Row<T>], row: &Row<T>) -> bool {
        let Some(index) = index_of_row(rows, row) else {
            return false;
        };
        self.single_select(row, index);
        true
    }

    fn single_select(&mut self, row: &Row<T>, index: usize) {
        self.selected.clear();
        self.selected.insert(RowId::of(row));
        self.active = Some(row.clone());
        self.active_index = Some(index);
    }

    fn range_select(&mut self, rows: &[Row<T>], row: &Row<T>, index: usize) -> bool {
        let Some(active) = self.active.clone() else {
            return false;
        };
        if crate::row::same_row(&active, row) {
            return false;
        }
        let Some(active_index) = index_of_row(rows, &active) else {
            return false;
        };

        // Span start is always the smaller index, independent of click
        // direction; the clicked row becomes the new anchor.
        let (from, to) = if active_index <= index {
            (active_index, index)
        } else {
            (index, active_index)
        };
        for r in &rows[from..=to] {
            self.selected.insert(RowId::of(r));
        }
        self.active = Some(row.clone());
        self.active_index = Some(index);
        true
    }

    fn toggle_select(&mut self, row: &Row<T>, index: usize) -> bool {
        let id = RowId::of(row);
        if self.selected.remove(&id) {
            self.active = None;
            self.active_index = None;
        } else {
            self.selected.insert(id);
            self.active = Some(row.clone());
            self.active_index = Some(index);
        }
        true
    }

    /// Re-establishes consistency after the materialized sequence changed.
    ///
    /// Stale selected ids are pruned. If the active row vanished, either the
    /// row now occupying its former index (or the preceding one) is selected
    /// (`keep_last_selected`), or the active row is cleared.
    pub(crate) fn sync(&mut self, rows: &[Row<T>]) {
        if !self.selected.is_empty() {
            let live: HashSet<RowId> = rows.iter().map(RowId::of).collect();
            self.selected.retain(|id| live.contains(id));
        }

        let Some(active) = self.active.clone() else {
            return;
        };
        if let Some(index) = index_of_row(rows, &active) {
            self.active_index = Some(index);
            return;
        }

        if !self.keep_last_selected {
            self.active = None;
            self.active_index = None;
            return;
        }
        self.select_next_available_row(rows);
    }

    /// Selects the row at the former active index, falling back to the
    /// preceding index, else clears the active row.
    fn select_next_available_row(&mut self, rows: &[Row<T>]) {
        let candidate = self.active_index.and_then(|former| {
            rows.get(former)
                .or_else(|| former.checked_sub(1).and_then(|i| rows.get(i)))
                .cloned()
        });
        match candidate {
            Some(row) => {
                let _ = self.set_active(rows, &row);
            }
            None => {
                self.active = None;
                self.active_index = None;
            }
        }
    }

    pub(crate) fn is_selected(&self, row: &Row<T>) -> bool {
        self.selected.contains(&RowId::of(row))
    }

    pub(crate) fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// The selected rows in materialized order.
    pub(crate) fn selected_rows(&self, rows: &[Row<T>]) -> Vec<Row<T>> {
        if self.selected.is_empty() {
            return Vec::new();
        }
        rows.iter()
            .filter(|r| self.selected.contains(&RowId::of(r)))
            .cloned()
            .collect()
    }

    pub(crate) fn active_row(&self) -> Option<&Row<T>> {
        self.active.as_ref()
    }

    pub(crate) fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    pub(crate) fn clear(&mut self) {
        self.selected.clear();
        self.active = None;
        self.active_index = None;
    }
}
