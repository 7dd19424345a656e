use std::sync::Arc;

/// A row is an opaque, shared reference to caller-owned domain data.
///
/// The table never clones or mutates the underlying value; it only moves
/// `Arc` handles between derived sequences. All lookups (selection
/// membership, active-row checks) use pointer identity, not value equality,
/// so two rows with equal contents are still distinct rows.
pub type Row<T> = Arc<T>;

/// Pointer identity of a [`Row`], usable as a hash-map/set key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RowId(usize);

impl RowId {
    pub fn of<T>(row: &Row<T>) -> Self {
        RowId(Arc::as_ptr(row) as usize)
    }
}

/// Whether two handles refer to the same row.
pub fn same_row<T>(a: &Row<T>, b: &Row<T>) -> bool {
    Arc::ptr_eq(a, b)
}

/// Position of `row` within `rows`, by identity.
pub(crate) fn index_of_row<T>(rows: &[Row<T>], row: &Row<T>) -> Option<usize> {
    rows.iter().position(|r| Arc::ptr_eq(r, row))
}
