//! Page-number pagination primitives shared by HTTP endpoints.
//!
//! The crate splits pagination into three layers:
//!
//! - [`PageRequest`] validates the requested page number and page size and
//!   derives the `OFFSET`/`LIMIT` pair used by persistence adapters.
//! - [`Page`] pairs the items returned for one request with the computed
//!   [`PageMeta`], without knowing anything about URLs.
//! - [`Paginated`] is the wire envelope (`data`, `meta`, `links`) built from a
//!   [`Page`] and the base URL of the listing endpoint.
//!
//! # Examples
//! ```
//! use pagination::{Page, PageRequest};
//! use url::Url;
//!
//! let request = PageRequest::new(2, 15).expect("valid page request");
//! let page = Page::new(vec!["a", "b"], request, 17);
//! assert_eq!(page.meta().last_page(), 2);
//!
//! let base = Url::parse("https://example.test/api/v1/users").expect("url");
//! let envelope = page.into_envelope(&base);
//! assert_eq!(envelope.links().prev(), Some("https://example.test/api/v1/users?page=1"));
//! assert!(envelope.links().next().is_none());
//! ```

mod envelope;
mod request;

pub use envelope::{Page, PageLinks, PageMeta, Paginated};
pub use request::{DEFAULT_PER_PAGE, MAX_PER_PAGE, PAGE_QUERY_PARAM, PageRequest, PageRequestError};
