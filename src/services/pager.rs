/// Rows shown per catalog page
pub const PAGE_SIZE: usize = 25;

/// Number of pages for `len` items; an empty list still has one page.
pub fn page_count(len: usize, size: usize) -> usize {
    len.div_ceil(size.max(1)).max(1)
}

/// Items on the 1-based `page`, clamped to the slice bounds.
///
/// The page number itself is not clamped: the caller keeps it within
/// `1..=page_count`. Page 0 yields nothing.
pub fn page_slice<T>(items: &[T], page: usize, size: usize) -> &[T] {
    if page == 0 {
        return &[];
    }

    let start = ((page - 1) * size).min(items.len());
    let end = (page * size).min(items.len());
    &items[start..end]
}

/// 1-based first and last row numbers plus total, for "Showing a–b of n".
///
/// An empty list, page 0 or a page past the end reports `(0, 0, len)`.
pub fn page_bounds(len: usize, page: usize, size: usize) -> (usize, usize, usize) {
    let start = page.saturating_sub(1).saturating_mul(size);
    if len == 0 || page == 0 || start >= len {
        return (0, 0, len);
    }

    let last = page.saturating_mul(size).min(len);
    (start + 1, last, len)
}
