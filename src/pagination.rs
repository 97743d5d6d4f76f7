use serde::{Deserialize, Serialize};

/// Pages always shown at each end of the footer.
const EDGE_PAGES: usize = 2;
/// Pages shown before and after the current one.
const PAGES_BEFORE: usize = 2;
const PAGES_AFTER: usize = 4;

/// One page of a cursor-paginated collection as returned by the CRM API.
///
/// `next` and `previous` are opaque URLs handed back verbatim on navigation.
/// A list is always replaced wholesale by the next successful fetch.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PagedList<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub count: usize,
}

impl<T> Default for PagedList<T> {
    fn default() -> Self {
        Self {
            results: Vec::new(),
            next: None,
            previous: None,
            count: 0,
        }
    }
}

impl<T> PagedList<T> {
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    /// Checks that the page never holds more rows than the reported total.
    pub fn is_consistent(&self) -> bool {
        self.results.len() <= self.count
    }

    /// Number of pages needed for `count` rows at `page_size` rows per page.
    pub fn total_pages(&self, page_size: usize) -> usize {
        if page_size == 0 {
            return 0;
        }
        self.count.div_ceil(page_size)
    }

    /// Page-number window for a footer, with `None` marking elided ranges.
    ///
    /// `current` is the zero-based page counter kept by the view-model; the
    /// returned numbers are one-based.
    pub fn page_links(&self, current: usize, page_size: usize) -> Vec<Option<usize>> {
        let last = self.total_pages(page_size);
        let current = (current + 1).min(last);
        let visible = |page: usize| {
            page <= EDGE_PAGES
                || page > last.saturating_sub(EDGE_PAGES)
                || (page + PAGES_BEFORE >= current && page <= current + PAGES_AFTER)
        };

        let mut links = Vec::new();
        let mut shown = 0;
        for page in (1..=last).filter(|&page| visible(page)) {
            if page > shown + 1 {
                links.push(None);
            }
            links.push(Some(page));
            shown = page;
        }
        links
    }
}
