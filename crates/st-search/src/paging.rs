//! Offset pagination.

/// Offset of `page` (zero-based) at `limit` records per page.
pub const fn offset(page: u32, limit: u32) -> u64 {
    page as u64 * limit as u64
}

/// Whether a page after `page` exists.
pub const fn has_more(page: u32, limit: u32, total: u64) -> bool {
    (page as u64 + 1) * (limit as u64) < total
}
