use std::ops::Range;

/// Jobs shown per page in both table and grid views.
pub const ITEMS_PER_PAGE: usize = 8;

/// Client-side pagination cursor over the fetched collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    current_page: usize,
    items_per_page: usize,
}

impl Default for PageState {
    fn default() -> Self {
        Self::new(ITEMS_PER_PAGE)
    }
}

impl PageState {
    pub fn new(items_per_page: usize) -> Self {
        Self {
            current_page: 1,
            items_per_page: items_per_page.max(1),
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    /// `ceil(total / items_per_page)`; zero for an empty collection.
    pub fn total_pages(&self, total: usize) -> usize {
        total.div_ceil(self.items_per_page)
    }

    /// Index range of the visible slice for a collection of `total` items.
    pub fn visible_range(&self, total: usize) -> Range<usize> {
        let start = ((self.current_page - 1) * self.items_per_page).min(total);
        let end = (self.current_page * self.items_per_page).min(total);
        start..end
    }

    pub(crate) fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Moves to `page` when it lies in `[1, total_pages]`. Returns whether the
    /// cursor changed.
    pub(crate) fn select(&mut self, page: usize, total: usize) -> bool {
        if page < 1 || page > self.total_pages(total) || page == self.current_page {
            return false;
        }
        self.current_page = page;
        true
    }

    /// Keeps `current_page` inside `[1, max(1, total_pages)]`.
    pub(crate) fn clamp(&mut self, total: usize) {
        let last = self.total_pages(total).max(1);
        self.current_page = self.current_page.clamp(1, last);
    }
}
