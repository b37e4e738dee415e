//! `SeaORM` active enums mapped to PostgreSQL enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// `loan_status` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "loan_status")]
pub enum LoanStatus {
    /// Awaiting a decision.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Loan agreed.
    #[sea_orm(string_value = "accepted")]
    Accepted,
    /// Loan refused.
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl From<kaizen_core::transaction::TransactionStatus> for LoanStatus {
    fn from(status: kaizen_core::transaction::TransactionStatus) -> Self {
        use kaizen_core::transaction::TransactionStatus as S;
        match status {
            S::Pending => Self::Pending,
            S::Accepted => Self::Accepted,
            S::Rejected => Self::Rejected,
        }
    }
}

impl From<LoanStatus> for kaizen_core::transaction::TransactionStatus {
    fn from(status: LoanStatus) -> Self {
        match status {
            LoanStatus::Pending => Self::Pending,
            LoanStatus::Accepted => Self::Accepted,
            LoanStatus::Rejected => Self::Rejected,
        }
    }
}

/// `feed_kind` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "feed_kind")]
pub enum FeedKind {
    /// COVID-19 news.
    #[sea_orm(string_value = "news")]
    News,
    /// Construction-sector updates.
    #[sea_orm(string_value = "updates")]
    Updates,
}

impl From<kaizen_core::feed::FeedKind> for FeedKind {
    fn from(kind: kaizen_core::feed::FeedKind) -> Self {
        match kind {
            kaizen_core::feed::FeedKind::News => Self::News,
            kaizen_core::feed::FeedKind::Updates => Self::Updates,
        }
    }
}
