//! Exact-match contact search filters.

use crate::domain::{Contact, EmailAddress};

/// Optional filters for contact search.
///
/// Provided filters are combined with OR: a contact matches when any one of
/// them equals the corresponding field exactly. With no filters every contact
/// in the owner's scope matches. Blank strings count as absent.
///
/// # Examples
/// ```
/// use backend::domain::ContactSearch;
///
/// let search = ContactSearch::new(Some("Ada".into()), Some("  ".into()), None);
/// assert_eq!(search.first_name(), Some("Ada"));
/// assert!(search.last_name().is_none());
/// assert!(ContactSearch::default().is_unfiltered());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactSearch {
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl ContactSearch {
    /// Build a search, discarding blank filters.
    #[must_use]
    pub fn new(
        first_name: Option<String>,
        last_name: Option<String>,
        email: Option<String>,
    ) -> Self {
        Self {
            first_name: non_blank(first_name),
            last_name: non_blank(last_name),
            email: non_blank(email),
        }
    }

    /// Exact first-name filter.
    #[must_use]
    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    /// Exact last-name filter.
    #[must_use]
    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    /// Exact email filter.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// True when no filter was supplied.
    #[must_use]
    pub const fn is_unfiltered(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.email.is_none()
    }

    /// Apply the filters to an already owner-scoped contact.
    #[must_use]
    pub fn matches(&self, contact: &Contact) -> bool {
        if self.is_unfiltered() {
            return true;
        }
        self.first_name() == Some(contact.first_name())
            || self.last_name() == Some(contact.last_name())
            || (self.email.is_some() && self.email() == contact.email().map(EmailAddress::as_str))
    }
}
