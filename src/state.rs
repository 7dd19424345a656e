use crate::types::SortDirection;

/// A lightweight, serializable snapshot of the sort layer.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SortState {
    /// Name of the active sort key, if any.
    pub key: Option<String>,
    pub direction: SortDirection,
    /// Whether a deferred sort pass is in flight.
    pub busy: bool,
}

/// A lightweight, serializable snapshot of the filter layer.
///
/// The external predicate is a closure and cannot be captured; only its
/// presence is recorded.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilterState {
    pub query: String,
    pub has_external_filter: bool,
    /// Whether a deferred filter pass is in flight.
    pub busy: bool,
}

/// A lightweight, serializable snapshot of the virtualization window.
///
/// `top_offset_px`/`bottom_offset_px` are the spacer heights the renderer
/// places around the visible slice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowState {
    pub row_height: u32,
    pub viewport_height: u32,
    pub preload_count: usize,
    pub current_page: usize,
    pub total_rows: usize,
    pub visible_rows: usize,
    pub top_offset_px: u64,
    pub bottom_offset_px: u64,
}
