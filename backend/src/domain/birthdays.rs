//! Upcoming-birthday window.
//!
//! A birthday is upcoming when its next month-day occurrence, counted from
//! `today`, lands within `[today, today + window]`. The window wraps across
//! the year boundary, and February 29 falls back to February 28 in non-leap
//! years.

use std::fmt;

use chrono::{Datelike, NaiveDate};

use crate::domain::Contact;

/// Validation errors for [`BirthdayWindow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BirthdayWindowError {
    /// Requested window fell outside the permitted bounds.
    OutOfRange {
        /// Smallest accepted window.
        min: u16,
        /// Largest accepted window.
        max: u16,
    },
}

impl fmt::Display for BirthdayWindowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { min, max } => {
                write!(f, "days must be between {min} and {max}")
            }
        }
    }
}

impl std::error::Error for BirthdayWindowError {}

/// Number of days ahead of today to look for birthdays.
///
/// # Examples
/// ```
/// use backend::domain::BirthdayWindow;
///
/// assert_eq!(BirthdayWindow::default().days(), 7);
/// assert!(BirthdayWindow::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthdayWindow(u16);

impl BirthdayWindow {
    /// Window used when the caller supplies none.
    pub const DEFAULT_DAYS: u16 = 7;
    /// Shortest accepted window.
    pub const MIN_DAYS: u16 = 1;
    /// Longest accepted window.
    pub const MAX_DAYS: u16 = 365;

    /// Validate a window length in days.
    ///
    /// # Errors
    /// Returns [`BirthdayWindowError::OutOfRange`] outside `1..=365`.
    pub const fn new(days: u16) -> Result<Self, BirthdayWindowError> {
        if days < Self::MIN_DAYS || days > Self::MAX_DAYS {
            return Err(BirthdayWindowError::OutOfRange {
                min: Self::MIN_DAYS,
                max: Self::MAX_DAYS,
            });
        }
        Ok(Self(days))
    }

    /// Window length in days.
    #[must_use]
    pub const fn days(self) -> u16 {
        self.0
    }
}

impl Default for BirthdayWindow {
    fn default() -> Self {
        Self(Self::DEFAULT_DAYS)
    }
}

fn anniversary_in(birthday: NaiveDate, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, birthday.month(), birthday.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 2, 28))
}

/// First occurrence of `birthday`'s month and day on or after `today`.
///
/// Returns `None` only when the date would overflow the calendar range.
///
/// # Examples
/// ```
/// use backend::domain::next_occurrence;
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2025, 12, 30).unwrap();
/// let birthday = NaiveDate::from_ymd_opt(1990, 1, 2).unwrap();
/// assert_eq!(next_occurrence(birthday, today), NaiveDate::from_ymd_opt(2026, 1, 2));
/// ```
#[must_use]
pub fn next_occurrence(birthday: NaiveDate, today: NaiveDate) -> Option<NaiveDate> {
    let this_year = anniversary_in(birthday, today.year())?;
    if this_year >= today {
        return Some(this_year);
    }
    anniversary_in(birthday, today.year().checked_add(1)?)
}

/// Days from `today` until the next occurrence of `birthday`.
#[must_use]
pub fn days_until(birthday: NaiveDate, today: NaiveDate) -> Option<i64> {
    next_occurrence(birthday, today).map(|next| (next - today).num_days())
}

/// Whether `birthday` falls inside `window` days from `today`, inclusive.
#[must_use]
pub fn is_upcoming(birthday: NaiveDate, today: NaiveDate, window: BirthdayWindow) -> bool {
    days_until(birthday, today).is_some_and(|days| days <= i64::from(window.days()))
}

/// Keep contacts with an upcoming birthday, ordered by next occurrence then id.
pub fn select_upcoming(
    contacts: impl IntoIterator<Item = Contact>,
    today: NaiveDate,
    window: BirthdayWindow,
) -> Vec<Contact> {
    let mut upcoming: Vec<(i64, Contact)> = contacts
        .into_iter()
        .filter_map(|contact| {
            let days = days_until(contact.birthday()?, today)?;
            (days <= i64::from(window.days())).then_some((days, contact))
        })
        .collect();
    upcoming.sort_by_key(|(days, contact)| (*days, contact.id()));
    upcoming.into_iter().map(|(_, contact)| contact).collect()
}
