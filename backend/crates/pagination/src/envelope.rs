//! Page metadata and the `data`/`meta`/`links` response envelope.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::request::{PAGE_QUERY_PARAM, PageRequest};

/// Positional metadata describing one page of a listing.
///
/// `from` and `to` are 1-based positions of the first and last item on the
/// page and are `None` when the page is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    current_page: u32,
    per_page: u32,
    total: u64,
    last_page: u64,
    from: Option<u64>,
    to: Option<u64>,
}

impl PageMeta {
    /// Compute metadata for `count` items returned for `request` out of
    /// `total` matching items.
    #[must_use]
    pub fn new(request: PageRequest, total: u64, count: usize) -> Self {
        let count = u64::try_from(count).unwrap_or(u64::MAX);
        let last_page = total.div_ceil(request.limit()).max(1);
        let (from, to) = if count == 0 {
            (None, None)
        } else {
            let first = request.offset().saturating_add(1);
            (Some(first), Some(request.offset().saturating_add(count)))
        };
        Self {
            current_page: request.page(),
            per_page: request.per_page(),
            total,
            last_page,
            from,
            to,
        }
    }

    /// The 1-based page number that was served.
    #[must_use]
    pub const fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Configured page size.
    #[must_use]
    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Total number of items across all pages.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Number of the final page; never less than one.
    #[must_use]
    pub const fn last_page(&self) -> u64 {
        self.last_page
    }

    /// Position of the first item on this page.
    #[must_use]
    pub const fn from(&self) -> Option<u64> {
        self.from
    }

    /// Position of the last item on this page.
    #[must_use]
    pub const fn to(&self) -> Option<u64> {
        self.to
    }

    const fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    const fn has_next(&self) -> bool {
        (self.current_page as u64) < self.last_page
    }
}

/// Items for one page together with their metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    items: Vec<T>,
    meta: PageMeta,
}

impl<T> Page<T> {
    /// Pair `items` fetched for `request` with metadata derived from `total`.
    #[must_use]
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        let meta = PageMeta::new(request, total, items.len());
        Self { items, meta }
    }

    /// Items on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Metadata for this page.
    #[must_use]
    pub const fn meta(&self) -> &PageMeta {
        &self.meta
    }

    /// Convert every item while keeping the metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }

    /// Build the response envelope, deriving navigation links from `base`.
    ///
    /// Query parameters already present on `base`, other than the page
    /// number, are preserved on every link.
    #[must_use]
    pub fn into_envelope(self, base: &Url) -> Paginated<T> {
        let links = PageLinks::from_meta(base, &self.meta);
        Paginated {
            data: self.items,
            meta: self.meta,
            links,
        }
    }
}

/// Navigation links for a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLinks {
    first: String,
    last: String,
    prev: Option<String>,
    next: Option<String>,
}

impl PageLinks {
    /// Derive links for `meta` relative to the listing URL `base`.
    #[must_use]
    pub fn from_meta(base: &Url, meta: &PageMeta) -> Self {
        let prev = meta
            .has_previous()
            .then(|| page_url(base, u64::from(meta.current_page) - 1));
        let next = meta
            .has_next()
            .then(|| page_url(base, u64::from(meta.current_page) + 1));
        Self {
            first: page_url(base, 1),
            last: page_url(base, meta.last_page),
            prev,
            next,
        }
    }

    /// Link to the first page.
    #[must_use]
    pub fn first(&self) -> &str {
        &self.first
    }

    /// Link to the last page.
    #[must_use]
    pub fn last(&self) -> &str {
        &self.last
    }

    /// Link to the previous page, when one exists.
    #[must_use]
    pub fn prev(&self) -> Option<&str> {
        self.prev.as_deref()
    }

    /// Link to the next page, when one exists.
    #[must_use]
    pub fn next(&self) -> Option<&str> {
        self.next.as_deref()
    }
}

fn page_url(base: &Url, page: u64) -> String {
    let retained: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| key != PAGE_QUERY_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    let mut url = base.clone();
    url.set_query(None);
    {
        let mut pairs = url.query_pairs_mut();
        pairs.extend_pairs(retained);
        pairs.append_pair(PAGE_QUERY_PARAM, &page.to_string());
    }
    url.into()
}

/// Paginated response envelope: `{ "data": [...], "meta": {...}, "links": {...} }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    data: Vec<T>,
    meta: PageMeta,
    links: PageLinks,
}

impl<T> Paginated<T> {
    /// Items on this page.
    #[must_use]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Page metadata.
    #[must_use]
    pub const fn meta(&self) -> &PageMeta {
        &self.meta
    }

    /// Navigation links.
    #[must_use]
    pub const fn links(&self) -> &PageLinks {
        &self.links
    }
}
