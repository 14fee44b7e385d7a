//! Format versions expressed as calendar dates.
//!
//! A version is the date the format last changed, packed as
//! `((year - 2010) * 12 + (month - 1)) * 31 + (day - 1)`. Later dates give
//! larger numbers; dates up to 2186-03-02 fit in 16 bits.

use std::fmt;

/// Year that maps to version zero.
pub const BASE_YEAR: u16 = 2010;

/// A revision file format version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FormatVersion(u16);

impl FormatVersion {
    /// The version this build reads and writes.
    pub const CURRENT: FormatVersion = FormatVersion::from_date(2010, 2, 23);

    /// Packs a calendar date into a version.
    ///
    /// # Panics
    ///
    /// Panics if the date is outside the range [`Self::checked_from_date`]
    /// accepts. In a const context this is a compile error.
    #[must_use]
    pub const fn from_date(year: u16, month: u8, day: u8) -> Self {
        match Self::checked_from_date(year, month, day) {
            Some(version) => version,
            None => panic!("format version date out of range"),
        }
    }

    /// Packs a calendar date into a version, or returns `None` if it does
    /// not fit.
    ///
    /// `year` must be at least [`BASE_YEAR`], `month` in `1..=12` and `day`
    /// in `1..=31`, and the packed value must fit in 16 bits.
    #[must_use]
    pub const fn checked_from_date(year: u16, month: u8, day: u8) -> Option<Self> {
        if month < 1 || month > 12 || day < 1 || day > 31 {
            return None;
        }
        let years = match year.checked_sub(BASE_YEAR) {
            Some(years) => years,
            None => return None,
        };
        let months = match years.checked_mul(12) {
            Some(whole) => match whole.checked_add(month as u16 - 1) {
                Some(months) => months,
                None => return None,
            },
            None => return None,
        };
        match months.checked_mul(31) {
            Some(days) => match days.checked_add(day as u16 - 1) {
                Some(raw) => Some(Self(raw)),
                None => None,
            },
            None => None,
        }
    }

    /// Wraps a raw on-disk version number.
    #[must_use]
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    /// Returns the raw on-disk version number.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// Returns the year this version encodes.
    #[must_use]
    pub const fn year(self) -> u16 {
        self.0 / 31 / 12 + BASE_YEAR
    }

    /// Returns the month (1-12) this version encodes.
    #[must_use]
    pub const fn month(self) -> u8 {
        (self.0 / 31 % 12 + 1) as u8
    }

    /// Returns the day of month (1-31) this version encodes.
    #[must_use]
    pub const fn day(self) -> u8 {
        (self.0 % 31 + 1) as u8
    }

    /// Returns the `(year, month, day)` this version encodes.
    #[must_use]
    pub const fn date(self) -> (u16, u8, u8) {
        (self.year(), self.month(), self.day())
    }
}

/// Renders the version as `YYYYMMDD`.
impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{:02}{:02}", self.year(), self.month(), self.day())
    }
}
