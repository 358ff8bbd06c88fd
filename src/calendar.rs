//! Calendar keys and the viewer's time zone.
//!
//! Every transaction is mapped to exactly one calendar day in the viewer's
//! zone, once, when it is ingested. Daily buckets are keyed by that
//! [`NaiveDate`]; monthly buckets by the [`MonthKey`] containing it.

use core::fmt;
use core::str::FromStr;

use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::BankViewError;

/// Time zone whose calendar the viewer sees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewerZone {
    /// The host's local zone.
    #[default]
    System,
    /// A named IANA zone (e.g. `America/New_York`).
    Named(Tz),
}

impl ViewerZone {
    /// Returns the calendar day an instant falls on in this zone.
    #[inline]
    #[must_use]
    pub fn day_of<Z: TimeZone>(&self, instant: &DateTime<Z>) -> NaiveDate {
        match *self {
            Self::System => instant.with_timezone(&Local).date_naive(),
            Self::Named(tz) => instant.with_timezone(&tz).date_naive(),
        }
    }

    /// Returns today's date in this zone.
    #[inline]
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.day_of(&Utc::now())
    }
}

impl FromStr for ViewerZone {
    type Err = BankViewError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if name.is_empty() || name.eq_ignore_ascii_case("local") || name.eq_ignore_ascii_case("system")
        {
            return Ok(Self::System);
        }
        name.parse::<Tz>()
            .map(Self::Named)
            .map_err(|err| BankViewError::InvalidTimeZone(format!("{name} ({err})")))
    }
}

impl fmt::Display for ViewerZone {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::System => f.write_str("local"),
            Self::Named(tz) => f.write_str(tz.name()),
        }
    }
}

/// A calendar month, ordered chronologically.
///
/// Stored as the first day of the month so that ordering and arithmetic
/// come straight from [`NaiveDate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey(NaiveDate);

impl MonthKey {
    /// Returns the month containing `date`.
    #[inline]
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self(date.with_day(1).unwrap_or(date))
    }

    /// Builds a month key from a year and a 1-based month number.
    ///
    /// Returns `None` if `month` is not in `1..=12`.
    #[inline]
    #[must_use]
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    /// Returns the calendar year.
    #[inline]
    #[must_use]
    pub fn year(self) -> i32 {
        self.0.year()
    }

    /// Returns the 1-based month number.
    #[inline]
    #[must_use]
    pub fn month(self) -> u32 {
        self.0.month()
    }

    /// Returns the first day of the month.
    #[inline]
    #[must_use]
    pub const fn first_day(self) -> NaiveDate {
        self.0
    }

    /// Returns `true` if `date` lies in this month.
    #[inline]
    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        Self::of(date) == self
    }

    /// Returns the display label, e.g. `March 2025`.
    #[inline]
    #[must_use]
    pub fn label(self) -> String {
        self.0.format("%B %Y").to_string()
    }
}

/// Sortable `YYYY-MM` form.
impl fmt::Display for MonthKey {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m"))
    }
}

impl FromStr for MonthKey {
    type Err = BankViewError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d")
            .map(Self)
            .map_err(|err| BankViewError::InvalidDate(format!("{trimmed}: {err}")))
    }
}
