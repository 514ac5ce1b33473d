//! Fixed-size page slicing over filtered views.

use std::num::NonZeroUsize;

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based, always within `1..=total_pages`.
    pub current_page: usize,
    /// At least 1, even for an empty sequence.
    pub total_pages: usize,
    pub total_items: usize,
    pub page_size: usize,
}

impl<T> Page<T> {
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// 1-based positions of the first and last row on this page, for
    /// "Showing x to y of z" captions. `None` on an empty page.
    pub fn row_range(&self) -> Option<(usize, usize)> {
        if self.items.is_empty() {
            return None;
        }
        let first = (self.current_page - 1) * self.page_size + 1;
        Some((first, first + self.items.len() - 1))
    }
}

pub fn total_pages(item_count: usize, page_size: NonZeroUsize) -> usize {
    item_count.div_ceil(page_size.get()).max(1)
}

/// Clamp a requested page number (which may be zero, negative or past the
/// end) into `1..=total_pages`.
pub fn clamp_page(requested: i64, total_pages: usize) -> usize {
    let last = total_pages.max(1);
    if requested < 1 {
        return 1;
    }
    usize::try_from(requested).unwrap_or(usize::MAX).min(last)
}

pub fn paginate<T: Clone>(items: &[T], page_size: NonZeroUsize, requested: i64) -> Page<T> {
    let total_pages = total_pages(items.len(), page_size);
    let current_page = clamp_page(requested, total_pages);
    let start = (current_page - 1) * page_size.get();
    let end = (start + page_size.get()).min(items.len());
    Page {
        items: items.get(start..end).map(<[T]>::to_vec).unwrap_or_default(),
        current_page,
        total_pages,
        total_items: items.len(),
        page_size: page_size.get(),
    }
}

/// Current page for one table.
///
/// The stored page is clamped when set, and clamped again against the
/// current item count on every read, so a shrinking view never leaves the
/// pager past its last page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    page_size: NonZeroUsize,
    current_page: usize,
}

impl Pager {
    pub fn new(page_size: NonZeroUsize) -> Self {
        Self {
            page_size,
            current_page: 1,
        }
    }

    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    /// Page number as of the last write, before re-clamping.
    pub fn stored_page(&self) -> usize {
        self.current_page
    }

    pub fn current_page(&self, item_count: usize) -> usize {
        clamp_page(
            i64::try_from(self.current_page).unwrap_or(i64::MAX),
            total_pages(item_count, self.page_size),
        )
    }

    pub fn go_to_page(&mut self, requested: i64, item_count: usize) -> usize {
        self.current_page = clamp_page(requested, total_pages(item_count, self.page_size));
        tracing::debug!(requested, page = self.current_page, "page changed");
        self.current_page
    }

    pub fn next_page(&mut self, item_count: usize) -> usize {
        let next = self.current_page(item_count).saturating_add(1);
        self.go_to_page(i64::try_from(next).unwrap_or(i64::MAX), item_count)
    }

    pub fn previous_page(&mut self, item_count: usize) -> usize {
        let previous = self.current_page(item_count).saturating_sub(1);
        self.go_to_page(i64::try_from(previous).unwrap_or(i64::MAX), item_count)
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    pub fn view<T: Clone>(&mut self, items: &[T]) -> Page<T> {
        self.current_page = self.current_page(items.len());
        paginate(
            items,
            self.page_size,
            i64::try_from(self.current_page).unwrap_or(i64::MAX),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_empty_sequence_has_one_page() {
        let page = paginate::<u32>(&[], size(10), 3);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.current_page, 1);
        assert!(page.items.is_empty());
        assert_eq!(page.row_range(), None);
    }

    #[test]
    fn test_last_page_is_partial() {
        let items: Vec<u32> = (1..=23).collect();
        let page = paginate(&items, size(10), 3);
        assert_eq!(page.items, vec![21, 22, 23]);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.row_range(), Some((21, 23)));
        assert!(!page.has_next());
        assert!(page.has_previous());
    }

    #[test]
    fn test_out_of_range_requests_clamp() {
        let items: Vec<u32> = (1..=23).collect();
        assert_eq!(paginate(&items, size(10), 0).current_page, 1);
        assert_eq!(paginate(&items, size(10), -4).current_page, 1);
        assert_eq!(paginate(&items, size(10), 99).current_page, 3);
        assert_eq!(paginate(&items, size(10), i64::MAX).current_page, 3);
    }

    #[test]
    fn test_pager_reclamps_when_view_shrinks() {
        let mut pager = Pager::new(size(10));
        assert_eq!(pager.go_to_page(3, 25), 3);
        let shrunk: Vec<u32> = (1..=12).collect();
        let page = pager.view(&shrunk);
        assert_eq!(page.current_page, 2);
        assert_eq!(page.items, vec![11, 12]);
        assert_eq!(pager.stored_page(), 2);
    }

    #[test]
    fn test_pager_next_and_previous_stop_at_bounds() {
        let mut pager = Pager::new(size(5));
        assert_eq!(pager.previous_page(12), 1);
        assert_eq!(pager.next_page(12), 2);
        assert_eq!(pager.next_page(12), 3);
        assert_eq!(pager.next_page(12), 3);
        pager.reset();
        assert_eq!(pager.current_page(12), 1);
    }

    proptest! {
        #[test]
        fn prop_page_always_in_bounds(len in 0usize..200, page_size in 1usize..30, requested in any::<i64>()) {
            let items: Vec<usize> = (0..len).collect();
            let page = paginate(&items, size(page_size), requested);
            prop_assert!(page.total_pages >= 1);
            prop_assert!(page.current_page >= 1 && page.current_page <= page.total_pages);
            prop_assert!(page.items.len() <= page_size);
            prop_assert_eq!(page.total_items, len);
            prop_assert_eq!(page.total_pages, len.div_ceil(page_size).max(1));
        }

        #[test]
        fn prop_pages_cover_items_in_order(len in 0usize..120, page_size in 1usize..25) {
            let items: Vec<usize> = (0..len).collect();
            let pages = total_pages(len, size(page_size));
            let mut joined = Vec::new();
            for number in 1..=pages {
                joined.extend(paginate(&items, size(page_size), number as i64).items);
            }
            prop_assert_eq!(joined, items);
        }
    }
}
