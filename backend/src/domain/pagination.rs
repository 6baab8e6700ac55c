//! Offset pagination for contact listings.

use std::fmt;

/// Validation errors for [`Page`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageValidationError {
    /// `limit` fell outside the accepted range.
    LimitOutOfRange {
        /// Smallest accepted limit.
        min: i64,
        /// Largest accepted limit.
        max: i64,
    },
    /// `offset` was below zero.
    NegativeOffset,
}

impl PageValidationError {
    /// Query parameter the error refers to.
    #[must_use]
    pub const fn field(self) -> &'static str {
        match self {
            Self::LimitOutOfRange { .. } => "limit",
            Self::NegativeOffset => "offset",
        }
    }
}

impl fmt::Display for PageValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LimitOutOfRange { min, max } => {
                write!(f, "limit must be between {min} and {max}")
            }
            Self::NegativeOffset => write!(f, "offset must not be negative"),
        }
    }
}

impl std::error::Error for PageValidationError {}

/// Validated `limit`/`offset` pair.
///
/// # Examples
/// ```
/// use backend::domain::Page;
///
/// let page = Page::new(Some(20), None).expect("valid page");
/// assert_eq!((page.limit(), page.offset()), (20, 0));
/// assert!(Page::new(Some(5), None).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    limit: i64,
    offset: i64,
}

impl Page {
    /// Page size used when `limit` is omitted.
    pub const DEFAULT_LIMIT: i64 = 10;
    /// Smallest accepted page size.
    pub const MIN_LIMIT: i64 = 10;
    /// Largest accepted page size.
    pub const MAX_LIMIT: i64 = 500;

    /// Apply defaults to missing values, then validate.
    ///
    /// # Errors
    /// Returns a [`PageValidationError`] naming the offending parameter.
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Result<Self, PageValidationError> {
        let size = limit.unwrap_or(Self::DEFAULT_LIMIT);
        let skip = offset.unwrap_or(0);
        if !(Self::MIN_LIMIT..=Self::MAX_LIMIT).contains(&size) {
            return Err(PageValidationError::LimitOutOfRange {
                min: Self::MIN_LIMIT,
                max: Self::MAX_LIMIT,
            });
        }
        if skip < 0 {
            return Err(PageValidationError::NegativeOffset);
        }
        Ok(Self {
            limit: size,
            offset: skip,
        })
    }

    /// Maximum number of rows to return.
    #[must_use]
    pub const fn limit(self) -> i64 {
        self.limit
    }

    /// Rows to skip before the first returned row.
    #[must_use]
    pub const fn offset(self) -> i64 {
        self.offset
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: Self::DEFAULT_LIMIT,
            offset: 0,
        }
    }
}
