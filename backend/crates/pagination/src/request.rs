//! Validated page requests.

use thiserror::Error;

/// Page size used when the caller does not configure one.
pub const DEFAULT_PER_PAGE: u32 = 15;

/// Largest page size a listing endpoint will serve.
pub const MAX_PER_PAGE: u32 = 100;

/// Query string parameter carrying the 1-based page number.
pub const PAGE_QUERY_PARAM: &str = "page";

/// Errors raised when a page request violates its bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// Page numbers start at one.
    #[error("page must be at least 1")]
    ZeroPage,
    /// A page must hold at least one item.
    #[error("page size must be at least 1")]
    ZeroPerPage,
    /// The page size exceeds [`MAX_PER_PAGE`].
    #[error("page size must be at most {max}")]
    PerPageTooLarge {
        /// Largest accepted page size.
        max: u32,
    },
}

/// A 1-based page number paired with a page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl PageRequest {
    /// Validate and construct a page request.
    ///
    /// # Errors
    ///
    /// Returns [`PageRequestError`] when `page` or `per_page` is zero, or when
    /// `per_page` exceeds [`MAX_PER_PAGE`].
    ///
    /// # Examples
    /// ```
    /// use pagination::{PageRequest, PageRequestError};
    ///
    /// assert!(PageRequest::new(1, 15).is_ok());
    /// assert_eq!(PageRequest::new(0, 15), Err(PageRequestError::ZeroPage));
    /// ```
    pub const fn new(page: u32, per_page: u32) -> Result<Self, PageRequestError> {
        if page == 0 {
            return Err(PageRequestError::ZeroPage);
        }
        if per_page == 0 {
            return Err(PageRequestError::ZeroPerPage);
        }
        if per_page > MAX_PER_PAGE {
            return Err(PageRequestError::PerPageTooLarge { max: MAX_PER_PAGE });
        }
        Ok(Self { page, per_page })
    }

    /// First page with the given size.
    ///
    /// # Errors
    ///
    /// Returns [`PageRequestError`] when `per_page` is out of bounds.
    pub const fn first(per_page: u32) -> Result<Self, PageRequestError> {
        Self::new(1, per_page)
    }

    /// The 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Number of items per page.
    #[must_use]
    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Number of rows to skip before this page starts.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.per_page as u64
    }

    /// Maximum number of rows to fetch for this page.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.per_page as u64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}
