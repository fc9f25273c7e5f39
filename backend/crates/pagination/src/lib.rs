//! Page request primitives shared by list endpoints.
//!
//! List endpoints accept a JSON body describing which page of results the
//! client wants. [`PageRequest`] validates that body once at the edge so
//! handlers and ports only ever see in-range values.
//!
//! ```
//! use pagination::PageRequest;
//!
//! let request: PageRequest = serde_json::from_str(r#"{"page":3,"page_size":10}"#)
//!     .expect("valid page request");
//! assert_eq!(request.offset(), 20);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// First page number; pages are 1-based.
pub const FIRST_PAGE: u32 = 1;
/// Page size applied when the client omits one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;
/// Largest page size a client may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Validation failures raised when constructing a [`PageRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// Page numbers start at one.
    #[error("page must be at least 1")]
    PageOutOfRange {
        /// Value supplied by the client.
        page: u32,
    },
    /// Page size is zero or above [`MAX_PAGE_SIZE`].
    #[error("page_size must be between 1 and 100")]
    PageSizeOutOfRange {
        /// Value supplied by the client.
        page_size: u32,
    },
}

impl PageRequestError {
    /// Wire name of the field that failed validation.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::PageOutOfRange { .. } => "page",
            Self::PageSizeOutOfRange { .. } => "page_size",
        }
    }

    /// Offending value as supplied by the client.
    #[must_use]
    pub const fn value(&self) -> u32 {
        match self {
            Self::PageOutOfRange { page } => *page,
            Self::PageSizeOutOfRange { page_size } => *page_size,
        }
    }
}

/// Validated request for one page of a listing.
///
/// ## Invariants
/// - `page >= 1`.
/// - `1 <= page_size <= MAX_PAGE_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PageRequestDto", into = "PageRequestDto")]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    /// Validate and construct a page request.
    ///
    /// # Errors
    /// Returns [`PageRequestError`] when either value is out of range.
    ///
    /// # Examples
    /// ```
    /// use pagination::{PageRequest, PageRequestError};
    ///
    /// assert!(PageRequest::new(1, 50).is_ok());
    /// assert_eq!(
    ///     PageRequest::new(0, 50),
    ///     Err(PageRequestError::PageOutOfRange { page: 0 })
    /// );
    /// ```
    pub const fn new(page: u32, page_size: u32) -> Result<Self, PageRequestError> {
        if page < FIRST_PAGE {
            return Err(PageRequestError::PageOutOfRange { page });
        }
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(PageRequestError::PageSizeOutOfRange { page_size });
        }
        Ok(Self { page, page_size })
    }

    /// 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of items on the page.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of items preceding this page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        // Both factors fit in u32 so the product fits in u64.
        (u64::from(self.page) - 1) * u64::from(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: FIRST_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

const fn default_page() -> u32 {
    FIRST_PAGE
}

const fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct PageRequestDto {
    #[serde(default = "default_page")]
    page: u32,
    #[serde(default = "default_page_size", alias = "pageSize")]
    page_size: u32,
}

impl From<PageRequest> for PageRequestDto {
    fn from(value: PageRequest) -> Self {
        Self {
            page: value.page,
            page_size: value.page_size,
        }
    }
}

impl TryFrom<PageRequestDto> for PageRequest {
    type Error = PageRequestError;

    fn try_from(value: PageRequestDto) -> Result<Self, Self::Error> {
        Self::new(value.page, value.page_size)
    }
}
