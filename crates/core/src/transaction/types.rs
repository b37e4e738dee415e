//! Transaction domain types.

use chrono::NaiveDate;
use kaizen_shared::types::{CompanyId, EmployeeId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::TransactionError;

/// Status of a worker-loan transaction.
///
/// Any status may be set from any other; there is no terminal state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Awaiting a decision from the borrowing side.
    #[default]
    Pending,
    /// Loan agreed.
    Accepted,
    /// Loan refused.
    Rejected,
}

impl TransactionStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a status from a string, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "accepted" => Some(Self::Accepted),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Loan period, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    /// First day of the loan.
    pub start: NaiveDate,
    /// Last day of the loan.
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a range without checking the order of its ends.
    #[must_use]
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Returns true if `date` lies strictly between start and end.
    #[must_use]
    pub fn strictly_contains(&self, date: NaiveDate) -> bool {
        self.start < date && date < self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// Composite identity of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransactionKey {
    /// Company lending the employee.
    pub loaning_company_id: CompanyId,
    /// Company receiving the employee.
    pub borrowing_company_id: CompanyId,
    /// Employee on loan (work permit number).
    pub employee_id: EmployeeId,
    /// First day of the loan.
    pub start_date: NaiveDate,
}

impl fmt::Display for TransactionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.loaning_company_id, self.borrowing_company_id, self.employee_id, self.start_date
        )
    }
}

/// A stored worker-loan transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Composite identity.
    #[serde(flatten)]
    pub key: TransactionKey,
    /// Last day of the loan.
    pub end_date: NaiveDate,
    /// Agreed cost of the loan.
    pub total_cost: Decimal,
    /// Current status.
    pub status: TransactionStatus,
}

impl Transaction {
    /// Returns the loan period.
    #[must_use]
    pub const fn range(&self) -> DateRange {
        DateRange::new(self.key.start_date, self.end_date)
    }

    /// Returns the employee on loan.
    #[must_use]
    pub const fn employee_id(&self) -> &EmployeeId {
        &self.key.employee_id
    }
}

/// An unvalidated transaction as submitted by a client.
///
/// Every field is optional so that a missing value can be reported by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDraft {
    /// Company lending the employee.
    pub loaning_company_id: Option<CompanyId>,
    /// Company receiving the employee.
    pub borrowing_company_id: Option<CompanyId>,
    /// Employee on loan.
    pub employee_id: Option<EmployeeId>,
    /// First day of the loan.
    pub start_date: Option<NaiveDate>,
    /// Last day of the loan.
    pub end_date: Option<NaiveDate>,
    /// Agreed cost of the loan.
    pub total_cost: Option<Decimal>,
    /// Initial status; defaults to pending.
    pub status: Option<TransactionStatus>,
}

impl TransactionDraft {
    /// Checks required fields and value rules and builds a transaction.
    ///
    /// # Errors
    ///
    /// Returns `MissingValue` naming the first absent field, or `InvalidValue`
    /// for a negative cost or an end date not after the start date.
    pub fn into_transaction(self) -> Result<Transaction, TransactionError> {
        let employee_id = self
            .employee_id
            .filter(|id| !id.is_blank())
            .ok_or(TransactionError::MissingValue("employee_id"))?;
        let loaning_company_id = self
            .loaning_company_id
            .filter(|id| !id.is_blank())
            .ok_or(TransactionError::MissingValue("loaning_company_id"))?;
        let borrowing_company_id = self
            .borrowing_company_id
            .filter(|id| !id.is_blank())
            .ok_or(TransactionError::MissingValue("borrowing_company_id"))?;
        let start_date = self
            .start_date
            .ok_or(TransactionError::MissingValue("start_date"))?;
        let end_date = self
            .end_date
            .ok_or(TransactionError::MissingValue("end_date"))?;
        let total_cost = self
            .total_cost
            .ok_or(TransactionError::MissingValue("total_cost"))?;

        if total_cost < Decimal::ZERO {
            return Err(TransactionError::InvalidValue(format!(
                "total_cost must not be negative, got {total_cost}"
            )));
        }
        if end_date <= start_date {
            return Err(TransactionError::InvalidValue(format!(
                "end_date {end_date} must be after start_date {start_date}"
            )));
        }

        Ok(Transaction {
            key: TransactionKey {
                loaning_company_id,
                borrowing_company_id,
                employee_id,
                start_date,
            },
            end_date,
            total_cost,
            status: self.status.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn complete_draft() -> TransactionDraft {
        TransactionDraft {
            loaning_company_id: Some("201912345K".into()),
            borrowing_company_id: Some("201954321Z".into()),
            employee_id: Some("G12345678".into()),
            start_date: Some(date(2024, 1, 1)),
            end_date: Some(date(2024, 1, 31)),
            total_cost: Some(dec!(1000)),
            status: None,
        }
    }

    #[test]
    fn test_status_parse_and_display() {
        assert_eq!(TransactionStatus::parse("Accepted"), Some(TransactionStatus::Accepted));
        assert_eq!(TransactionStatus::parse(" rejected "), Some(TransactionStatus::Rejected));
        assert_eq!(TransactionStatus::parse("approved"), None);
        assert_eq!(TransactionStatus::Pending.to_string(), "pending");
    }

    #[test]
    fn test_draft_defaults_status_to_pending() {
        let tx = complete_draft().into_transaction().unwrap();
        assert_eq!(tx.status, TransactionStatus::Pending);
        assert_eq!(tx.range(), DateRange::new(date(2024, 1, 1), date(2024, 1, 31)));
    }

    #[test]
    fn test_draft_reports_missing_field_by_name() {
        let draft = TransactionDraft {
            end_date: None,
            ..complete_draft()
        };
        assert!(matches!(
            draft.into_transaction(),
            Err(TransactionError::MissingValue("end_date"))
        ));

        let draft = TransactionDraft {
            employee_id: Some("  ".into()),
            ..complete_draft()
        };
        assert!(matches!(
            draft.into_transaction(),
            Err(TransactionError::MissingValue("employee_id"))
        ));
    }

    #[test]
    fn test_draft_rejects_negative_cost() {
        let draft = TransactionDraft {
            total_cost: Some(dec!(-0.01)),
            ..complete_draft()
        };
        assert!(matches!(
            draft.into_transaction(),
            Err(TransactionError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_draft_accepts_zero_cost() {
        let draft = TransactionDraft {
            total_cost: Some(dec!(0)),
            ..complete_draft()
        };
        assert!(draft.into_transaction().is_ok());
    }

    #[test]
    fn test_draft_rejects_end_not_after_start() {
        let draft = TransactionDraft {
            end_date: Some(date(2024, 1, 1)),
            ..complete_draft()
        };
        assert!(matches!(
            draft.into_transaction(),
            Err(TransactionError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_transaction_json_is_flat() {
        let tx = complete_draft().into_transaction().unwrap();
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["employee_id"], "G12345678");
        assert_eq!(json["start_date"], "2024-01-01");
        assert_eq!(json["status"], "pending");
    }
}
