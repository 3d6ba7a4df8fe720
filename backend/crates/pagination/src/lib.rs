//! Pagination envelope primitives shared by backend endpoints.
//!
//! Endpoints expose offset pagination: a zero-indexed page number plus an
//! items-per-page size, with totals reported alongside each slice. The types
//! here validate loosely-typed request input once, so handlers and
//! repositories only ever see well-formed descriptors.

use serde::{Deserialize, Serialize};

/// Default page index applied when a request omits `page`.
pub const DEFAULT_PAGE: u32 = 0;
/// Default page size applied when a request omits `size`.
pub const DEFAULT_SIZE: u32 = 10;

/// Validation errors raised by [`PageRequest::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    /// Page size must be strictly positive.
    #[error("page size must be greater than zero")]
    ZeroSize,
}

/// Validated page descriptor: zero-indexed page number and page size.
///
/// ## Invariants
/// - `size` is strictly positive.
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::new(2, 25).unwrap();
/// assert_eq!(request.offset(), 50);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

impl PageRequest {
    /// Construct a page request, rejecting a zero size.
    pub fn new(page: u32, size: u32) -> Result<Self, PageRequestError> {
        if size == 0 {
            return Err(PageRequestError::ZeroSize);
        }
        Ok(Self { page, size })
    }

    /// Zero-indexed page number.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Number of items per page.
    #[must_use]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Number of items preceding this page in the full result set.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            size: DEFAULT_SIZE,
        }
    }
}

/// Single-field sort direction.
///
/// Direction tokens are matched case-insensitively; any token other than
/// `desc` sorts ascending, which keeps request parsing deterministic without
/// rejecting harmless input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl SortDirection {
    /// Parse a direction token case-insensitively.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        if token.eq_ignore_ascii_case("desc") {
            Self::Desc
        } else {
            Self::Asc
        }
    }
}

/// One bounded slice of a larger ordered result set, with totals.
///
/// Serialises with camelCase keys so the wire shape matches the rest of the
/// API surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    items: Vec<T>,
    page: u32,
    size: u32,
    total_elements: u64,
    total_pages: u64,
}

impl<T> Page<T> {
    /// Assemble a page from an item slice and the total element count.
    #[must_use]
    pub fn new(items: Vec<T>, request: PageRequest, total_elements: u64) -> Self {
        let size = u64::from(request.size());
        let total_pages = total_elements.div_ceil(size);
        Self {
            items,
            page: request.page(),
            size: request.size(),
            total_elements,
            total_pages,
        }
    }

    /// Items on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Zero-indexed page number of this slice.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Requested page size (the slice may hold fewer items).
    #[must_use]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Total number of elements across all pages.
    #[must_use]
    pub fn total_elements(&self) -> u64 {
        self.total_elements
    }

    /// Total number of pages at the requested size.
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        self.total_pages
    }

    /// Convert the item type while preserving the envelope.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}
