//! ART record types and validation.

use chrono::{Days, NaiveDate};
use kaizen_shared::types::{CompanyId, EmployeeId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Days a test stays valid unless configured otherwise.
pub const DEFAULT_VALIDITY_DAYS: u32 = 7;

/// Errors raised while recording a test.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArtError {
    /// The test date lies after today.
    #[error("test date {date} is in the future (today is {today})")]
    FutureTestDate {
        /// Submitted test date.
        date: NaiveDate,
        /// Reference date.
        today: NaiveDate,
    },

    /// The expiry date cannot be represented.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

impl ArtError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        400
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::FutureTestDate { .. } => "FUTURE_TEST_DATE",
            Self::InvalidValue(_) => "INVALID_VALUE",
        }
    }
}

/// A test result as reported by a company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewArt {
    /// Employee who took the test.
    pub employee_id: EmployeeId,
    /// Company reporting the test.
    pub company_id: CompanyId,
    /// Day the test was taken.
    pub date_of_test: NaiveDate,
    /// `true` when the test was positive.
    pub result: bool,
}

impl NewArt {
    /// Validates the test date against `today` and computes the expiry.
    ///
    /// # Errors
    ///
    /// Returns `FutureTestDate` if the test was taken after `today`.
    pub fn into_entry(self, today: NaiveDate, validity_days: u32) -> Result<ArtEntry, ArtError> {
        if self.date_of_test > today {
            return Err(ArtError::FutureTestDate {
                date: self.date_of_test,
                today,
            });
        }
        let expiry_date = self
            .date_of_test
            .checked_add_days(Days::new(u64::from(validity_days)))
            .ok_or_else(|| {
                ArtError::InvalidValue(format!(
                    "expiry of {} plus {validity_days} days overflows",
                    self.date_of_test
                ))
            })?;

        Ok(ArtEntry {
            employee_id: self.employee_id,
            company_id: self.company_id,
            date_of_test: self.date_of_test,
            expiry_date,
            result: self.result,
        })
    }
}

/// A validated test ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtEntry {
    /// Employee who took the test.
    pub employee_id: EmployeeId,
    /// Company reporting the test.
    pub company_id: CompanyId,
    /// Day the test was taken.
    pub date_of_test: NaiveDate,
    /// Last day the test counts.
    pub expiry_date: NaiveDate,
    /// `true` when the test was positive.
    pub result: bool,
}

/// A stored test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtRecord {
    /// Store-assigned id.
    pub id: i64,
    /// Employee who took the test.
    pub employee_id: EmployeeId,
    /// Company reporting the test.
    pub company_id: CompanyId,
    /// Day the test was taken.
    pub date_of_test: NaiveDate,
    /// Last day the test counts.
    pub expiry_date: NaiveDate,
    /// `true` when the test was positive.
    pub result: bool,
}

impl ArtRecord {
    /// Returns true if this is a negative test covering `date`.
    #[must_use]
    pub fn is_valid_on(&self, date: NaiveDate) -> bool {
        !self.result && self.date_of_test <= date && date <= self.expiry_date
    }
}
