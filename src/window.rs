use crate::options::MIN_PRELOAD_COUNT;

/// Row-index and pixel bounds of one materialized window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct SliceBounds {
    pub(crate) start_row: usize,
    /// Exclusive.
    pub(crate) end_row: usize,
    pub(crate) top_offset_px: u64,
    pub(crate) bottom_offset_px: u64,
}

/// Preload margin around the current page: `floor` of `(n-1)/2` pages above,
/// the remainder below. Asymmetric for even counts; intentionally so.
pub(crate) fn preload_split(preload_count: usize) -> (usize, usize) {
    let n = preload_count.max(MIN_PRELOAD_COUNT);
    let top = (n - 1) / 2;
    (top, n - 1 - top)
}

/// Computes the materialized slice for a page window.
///
/// Pages are viewport-height-sized buckets, not rows. A zero viewport, zero
/// rows, or zero row height degrades to an empty slice with zero offsets.
pub(crate) fn slice_bounds(
    total_rows: usize,
    row_height: u32,
    viewport_height: u32,
    current_page: usize,
    preload_count: usize,
) -> SliceBounds {
    if total_rows == 0 || row_height == 0 || viewport_height == 0 {
        return SliceBounds::default();
    }

    let (preload_top, preload_bottom) = preload_split(preload_count);
    let page_from = current_page.saturating_sub(preload_top) as u64;
    let page_to = (current_page + preload_bottom + 1) as u64;
    let page_count = page_to - page_from;

    let rh = row_height as u64;
    let vh = viewport_height as u64;
    let total = total_rows as u64;

    let start_row = (page_from * vh).div_ceil(rh).min(total);
    let end_row = (start_row + page_count * vh / rh).min(total);

    SliceBounds {
        start_row: start_row as usize,
        end_row: end_row as usize,
        top_offset_px: start_row * rh,
        bottom_offset_px: (total - end_row) * rh,
    }
}

/// Largest scroll offset that keeps the last row inside the viewport.
pub(crate) fn max_scroll_offset(total_rows: usize, row_height: u32, viewport_height: u32) -> u64 {
    (total_rows as u64 * row_height as u64).saturating_sub(viewport_height as u64)
}

/// The page bucket a (clamped) scroll offset falls into.
pub(crate) fn page_for_offset(offset_px: u64, viewport_height: u32) -> usize {
    if viewport_height == 0 {
        return 0;
    }
    (offset_px / viewport_height as u64) as usize
}

/// Scroll offset that brings a row into view: the row's pixel position,
/// clamped so it stays within one viewport of the end.
pub(crate) fn scroll_target_for_row(
    row_index: usize,
    total_rows: usize,
    row_height: u32,
    viewport_height: u32,
) -> u64 {
    let row_px = row_index as u64 * row_height as u64;
    row_px.min(max_scroll_offset(total_rows, row_height, viewport_height))
}
