//! Paginated image carousels.
//!
//! Popups wrap around when stepping past either end; the mission panel
//! stops at the edges instead.

use serde::{Deserialize, Serialize};

/// Images shown per page.
pub const PAGE_SIZE: usize = 3;

/// What happens when stepping past the first or last page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgePolicy {
    #[default]
    Wrap,
    Stop,
}

impl EdgePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgePolicy::Wrap => "wrap",
            EdgePolicy::Stop => "stop",
        }
    }
}

/// Number of pages needed for `len` items; zero items means zero pages.
pub fn page_count(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

/// Items on `page`, empty when the page is out of range.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let start = page.saturating_mul(page_size);
    if page_size == 0 || start >= items.len() {
        return &[];
    }
    let end = (start + page_size).min(items.len());
    &items[start..end]
}

/// Page cursor over a list of `len` items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Carousel {
    len: usize,
    page_size: usize,
    page: usize,
    policy: EdgePolicy,
}

impl Carousel {
    pub fn new(len: usize, policy: EdgePolicy) -> Self {
        Self::with_page_size(len, PAGE_SIZE, policy)
    }

    pub fn with_page_size(len: usize, page_size: usize, policy: EdgePolicy) -> Self {
        Self {
            len,
            page_size,
            page: 0,
            policy,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn policy(&self) -> EdgePolicy {
        self.policy
    }

    pub fn page_count(&self) -> usize {
        page_count(self.len, self.page_size)
    }

    /// Step `offset` pages from the current one and return the new page.
    pub fn move_by(&mut self, offset: isize) -> usize {
        let count = self.page_count();
        if count == 0 {
            self.page = 0;
            return 0;
        }
        let count = count as isize;
        let target = self.page as isize + offset;
        self.page = match self.policy {
            EdgePolicy::Wrap => target.rem_euclid(count) as usize,
            EdgePolicy::Stop => target.clamp(0, count - 1) as usize,
        };
        self.page
    }

    /// Jump directly to `page`, clamped to the last page.
    pub fn jump(&mut self, page: usize) -> usize {
        self.page = page.min(self.page_count().saturating_sub(1));
        self.page
    }

    pub fn can_prev(&self) -> bool {
        match self.policy {
            EdgePolicy::Wrap => self.page_count() > 1,
            EdgePolicy::Stop => self.page > 0,
        }
    }

    pub fn can_next(&self) -> bool {
        match self.policy {
            EdgePolicy::Wrap => self.page_count() > 1,
            EdgePolicy::Stop => self.page + 1 < self.page_count(),
        }
    }

    /// Index range of the current page.
    pub fn range(&self) -> std::ops::Range<usize> {
        let start = (self.page * self.page_size).min(self.len);
        let end = (start + self.page_size).min(self.len);
        start..end
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        paginate(items, self.page, self.page_size)
    }

    /// Snapshot of the current page for rendering.
    pub fn view<T: Clone>(&self, items: &[T]) -> CarouselView<T> {
        CarouselView {
            page: self.page,
            page_count: self.page_count(),
            items: self.slice(items).to_vec(),
            pages: (0..self.page_count()).collect(),
            prev_enabled: self.can_prev(),
            next_enabled: self.can_next(),
            policy: self.policy,
        }
    }
}

/// One rendered carousel page plus its controls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarouselView<T> {
    pub page: usize,
    pub page_count: usize,
    pub items: Vec<T>,
    /// One jump button per page
    pub pages: Vec<usize>,
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub policy: EdgePolicy,
}
