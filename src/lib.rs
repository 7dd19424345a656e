//! A headless layered table view-model.
//!
//! This crate implements the state-and-math core of a virtualized table as
//! four composable layers over a live item collection: multi-mode row
//! selection, deferred (busy-flagged) sorting, multi-term text filtering
//! combined with an external predicate, and viewport windowing with
//! read-ahead paging and scroll-to-row synchronization.
//!
//! It is UI-agnostic. A TUI/GUI layer is expected to provide:
//! - the item snapshot (an ordered sequence of `Arc`-shared rows)
//! - viewport height and scroll offsets
//! - a monotonic `now_ms` clock, plus one [`TableView::tick`] per frame
//!
//! and to redraw from [`TableView::visible_rows`], the spacer offsets, and
//! the selection/sort/filter state. The table never touches the UI and never
//! mutates rows.
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod alphanum;
mod completion;
mod filter;
mod options;
mod row;
mod selection;
mod sort;
mod state;
mod table;
mod types;
mod window;


pub use completion::{CompletionHandle, CompletionState};
pub use options::{FilterPredicate, FilterValueFn, OnChangeCallback, SortComparator, TableOptions};
pub use row::{Row, RowId, same_row};
pub use sort::SortKey;
pub use state::{FilterState, SortState, WindowState};
pub use table::TableView;
pub use types::{Modifiers, SortDirection, Viewport};
