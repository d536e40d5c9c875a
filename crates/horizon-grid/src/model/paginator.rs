//! Page slicing for filtered record sets.
//!
//! A [`Paginator`] holds the current 1-based page and the page size. It never
//! owns records; callers hand it the filtered slice and it returns the window
//! for the current page. Navigation past either end clamps instead of
//! failing, since a stale "next" click is a normal UI event.
//!
//! ```
//! use horizon_grid::model::Paginator;
//!
//! let items: Vec<u32> = (1..=12).collect();
//! let mut pager = Paginator::new(8)?;
//!
//! assert_eq!(pager.get_page(&items), &items[..8]);
//! pager.go_to_page(5, items.len());
//! assert_eq!(pager.page(), 2);
//! assert_eq!(pager.get_page(&items), &items[8..]);
//! # Ok::<(), horizon_grid::GridError>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Current page and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page: usize,
    page_size: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Paginator {
    /// Creates a paginator on page 1.
    pub fn new(page_size: usize) -> Result<Self> {
        check_page_size(page_size)?;
        Ok(Self { page: 1, page_size })
    }

    /// The current 1-based page.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Rows per page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Changes the page size and returns to page 1.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<()> {
        check_page_size(page_size)?;
        self.page_size = page_size;
        self.page = 1;
        Ok(())
    }

    /// Number of pages needed for `total` items. Zero when there are none.
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size)
    }

    /// Moves to page `n`, clamped to `[1, page_count]`.
    pub fn go_to_page(&mut self, n: usize, total: usize) {
        self.page = n.clamp(1, self.page_count(total).max(1));
    }

    /// Advances one page if there is one.
    pub fn next_page(&mut self, total: usize) {
        self.go_to_page(self.page.saturating_add(1), total);
    }

    /// Goes back one page if there is one.
    pub fn previous_page(&mut self, total: usize) {
        self.go_to_page(self.page.saturating_sub(1), total);
    }

    /// Returns to page 1.
    pub fn first_page(&mut self) {
        self.page = 1;
    }

    /// Jumps to the last page.
    pub fn last_page(&mut self, total: usize) {
        self.go_to_page(usize::MAX, total);
    }

    /// Re-clamps the current page after the item count changed.
    ///
    /// Returns true if the page moved.
    pub fn clamp(&mut self, total: usize) -> bool {
        let before = self.page;
        self.go_to_page(before, total);
        self.page != before
    }

    /// Returns the current page's window of `items`.
    ///
    /// The page is clamped against `items.len()` for the slice computation,
    /// so the result never exceeds the page size and is empty only when
    /// `items` is.
    pub fn get_page<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let page = self.page.clamp(1, self.page_count(items.len()).max(1));
        let start = ((page - 1) * self.page_size).min(items.len());
        let end = (start + self.page_size).min(items.len());
        &items[start..end]
    }

    /// Describes the current page for a filtered set of `total` items.
    pub fn meta(&self, total: usize) -> PageMeta {
        let page_count = self.page_count(total);
        let page = self.page.clamp(1, page_count.max(1));
        let (first_item, last_item) = if total == 0 {
            (0, 0)
        } else {
            let first = (page - 1) * self.page_size + 1;
            (first, (first + self.page_size - 1).min(total))
        };
        PageMeta {
            page,
            page_size: self.page_size,
            page_count,
            total_items: total,
            first_item,
            last_item,
            has_previous: page > 1,
            has_next: page < page_count,
        }
    }
}

fn check_page_size(page_size: usize) -> Result<()> {
    if page_size == 0 {
        return Err(GridError::invalid_argument("page size must be positive"));
    }
    Ok(())
}

/// Position of the current page within a filtered set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// Current 1-based page.
    pub page: usize,
    pub page_size: usize,
    /// Zero when the filtered set is empty.
    pub page_count: usize,
    pub total_items: usize,
    /// 1-based index of the first row shown, 0 when empty.
    pub first_item: usize,
    /// 1-based index of the last row shown, 0 when empty.
    pub last_item: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

impl PageMeta {
    /// Text for a "Showing x-y of z" label.
    pub fn range_label(&self) -> String {
        if self.total_items == 0 {
            return "No results".to_string();
        }
        format!(
            "Showing {}-{} of {}",
            self.first_item, self.last_item, self.total_items
        )
    }

    /// Page links for a pagination bar showing at most `width` numbered
    /// pages.
    ///
    /// The first and last page are always included, the current page is
    /// centered where possible, and [`PageLink::Gap`] marks skipped ranges.
    pub fn window(&self, width: usize) -> Vec<PageLink> {
        let count = self.page_count;
        if count == 0 {
            return Vec::new();
        }
        let width = width.max(3);
        let link = |n: usize| PageLink::Page {
            number: n,
            current: n == self.page,
        };

        if count <= width {
            return (1..=count).map(link).collect();
        }

        // Pages strictly between first and last that fit in the window.
        let inner = width - 2;
        let half = inner / 2;
        let mut start = self.page.saturating_sub(half).max(2);
        let mut end = start + inner - 1;
        if end > count - 1 {
            end = count - 1;
            start = end + 1 - inner;
        }

        let mut links = Vec::with_capacity(width + 2);
        links.push(link(1));
        if start > 2 {
            links.push(PageLink::Gap);
        }
        links.extend((start..=end).map(link));
        if end < count - 1 {
            links.push(PageLink::Gap);
        }
        links.push(link(count));
        links
    }
}

/// One element of a pagination bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageLink {
    /// A numbered page.
    Page { number: usize, current: bool },
    /// Skipped pages ("...").
    Gap,
}
