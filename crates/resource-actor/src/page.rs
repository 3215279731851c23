//! # Pagination
//!
//! Page-number pagination for `List` requests. Pages are 1-based; a page past the end is
//! simply empty.

/// Which slice of a listing to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: usize,
    /// Maximum number of items on a page.
    pub items_per_page: usize,
}

impl PageRequest {
    pub fn new(page: usize, items_per_page: usize) -> Self {
        Self {
            page: page.max(1),
            items_per_page: items_per_page.max(1),
        }
    }

    /// A single page large enough to hold everything.
    pub fn all() -> Self {
        Self {
            page: 1,
            items_per_page: usize::MAX,
        }
    }

    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.items_per_page)
    }
}

/// One page of results plus the totals needed to build navigation links.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Number of matching items across all pages.
    pub total_items: usize,
    pub page: usize,
    pub items_per_page: usize,
}

impl<T> Page<T> {
    /// Number of the last page; `1` for an empty listing.
    pub fn last_page(&self) -> usize {
        if self.total_items == 0 {
            1
        } else {
            self.total_items.div_ceil(self.items_per_page)
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.last_page()
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Builds a page out of the full, already filtered result list.
    pub fn slice(matching: Vec<T>, request: PageRequest) -> Self {
        let total_items = matching.len();
        let items = matching
            .into_iter()
            .skip(request.offset())
            .take(request.items_per_page)
            .collect();
        Self {
            items,
            total_items,
            page: request.page,
            items_per_page: request.items_per_page,
        }
    }
}
