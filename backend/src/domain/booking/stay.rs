//! Stay date normalisation and pricing.

use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;

/// Failures raised while building a [`StayRange`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StayRangeError {
    /// Check-out is not strictly after check-in.
    #[error("check-out {check_out} must be after check-in {check_in}")]
    InvalidDateRange {
        /// Normalised check-in day.
        check_in: NaiveDate,
        /// Normalised check-out day.
        check_out: NaiveDate,
    },
    /// The input was neither an RFC 3339 timestamp nor a calendar date.
    #[error("unrecognised date: {0}")]
    UnparseableDate(String),
}

/// Reduce a client supplied date to the calendar day the guest selected.
///
/// Timestamps keep the day shown in their own offset and drop the time of
/// day, so `2024-05-10T23:30:00+02:00` selects 10 May.
///
/// # Examples
/// ```
/// use backend::domain::parse_stay_date;
/// use chrono::NaiveDate;
///
/// let day = NaiveDate::from_ymd_opt(2024, 5, 10).expect("valid date");
/// assert_eq!(parse_stay_date("2024-05-10").expect("date"), day);
/// assert_eq!(parse_stay_date("2024-05-10T23:30:00+02:00").expect("timestamp"), day);
/// ```
pub fn parse_stay_date(raw: &str) -> Result<NaiveDate, StayRangeError> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|timestamp| timestamp.date_naive())
        .map_err(|_| StayRangeError::UnparseableDate(trimmed.to_owned()))
}

/// Largest booking total the ledger stores (`NUMERIC(12, 2)`).
pub fn max_total_amount() -> Decimal {
    Decimal::new(999_999_999_999, 2)
}

/// A validated check-in/check-out pair of UTC calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StayRange {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl StayRange {
    /// Validate that check-out falls strictly after check-in.
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Result<Self, StayRangeError> {
        if check_in >= check_out {
            return Err(StayRangeError::InvalidDateRange {
                check_in,
                check_out,
            });
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    /// First day of the stay.
    pub const fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    /// Last day of the stay.
    pub const fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    /// Days charged for the stay.
    ///
    /// Both ends are counted, so a one-night stay is charged two days.
    pub fn charged_days(&self) -> i64 {
        (self.check_out - self.check_in).num_days() + 1
    }

    /// Total price for the stay at the given nightly rate.
    ///
    /// Returns `None` when the total overflows or exceeds
    /// [`max_total_amount`].
    ///
    /// # Examples
    /// ```
    /// use backend::domain::StayRange;
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let stay = StayRange::new(
    ///     NaiveDate::from_ymd_opt(2024, 5, 10).expect("date"),
    ///     NaiveDate::from_ymd_opt(2024, 5, 12).expect("date"),
    /// )
    /// .expect("valid range");
    /// assert_eq!(stay.total_amount(Decimal::new(10_050, 2)), Some(Decimal::new(30_150, 2)));
    /// assert_eq!(stay.total_amount(Decimal::MAX), None);
    /// ```
    pub fn total_amount(&self, price_per_night: Decimal) -> Option<Decimal> {
        Decimal::from(self.charged_days())
            .checked_mul(price_per_night)
            .filter(|total| *total <= max_total_amount())
    }

    /// Whether `day` falls within the stay, both ends included.
    pub fn covers(&self, day: NaiveDate) -> bool {
        self.check_in <= day && day <= self.check_out
    }
}
