//! Payment port and value types.

use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while charging a card.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Amount is zero, negative or too large.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// The card token was blank.
    #[error("missing card token")]
    MissingSource,

    /// The gateway refused the charge.
    #[error("charge declined: {0}")]
    Declined(String),

    /// The gateway could not be reached or answered unexpectedly.
    #[error("payment gateway error: {0}")]
    Gateway(String),
}

impl PaymentError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidAmount(_) | Self::MissingSource => 400,
            Self::Declined(_) => 402,
            Self::Gateway(_) => 502,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::MissingSource => "MISSING_SOURCE",
            Self::Declined(_) => "PAYMENT_DECLINED",
            Self::Gateway(_) => "PAYMENT_GATEWAY_ERROR",
        }
    }
}

/// A charge to place on a tokenized card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeRequest {
    /// Card token issued by the gateway's client library.
    pub source_token: String,
    /// Amount in major units (e.g. dollars).
    pub amount: Decimal,
    /// ISO 4217 currency; the processor default applies when absent.
    #[serde(default)]
    pub currency: Option<String>,
}

/// Result of a successful charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeReceipt {
    /// Gateway charge id.
    pub id: String,
    /// Charged amount in minor units (e.g. cents).
    pub amount_minor: i64,
    /// Currency charged.
    pub currency: String,
    /// Gateway status, e.g. `succeeded`.
    pub status: String,
}

/// Places charges with a payment gateway.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Charges `request.amount` to the card behind `request.source_token`.
    async fn charge(&self, request: ChargeRequest) -> Result<ChargeReceipt, PaymentError>;
}

/// Converts a major-unit amount to minor units (×100), rounding half away from zero.
///
/// # Errors
///
/// Returns `InvalidAmount` if the amount is not positive after rounding or
/// does not fit in an `i64`.
pub fn to_minor_units(amount: Decimal) -> Result<i64, PaymentError> {
    if amount <= Decimal::ZERO {
        return Err(PaymentError::InvalidAmount(format!(
            "amount must be positive, got {amount}"
        )));
    }
    let minor = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|v| v.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|v| v.to_i64())
        .ok_or_else(|| PaymentError::InvalidAmount(format!("amount {amount} is too large")))?;
    if minor == 0 {
        return Err(PaymentError::InvalidAmount(format!(
            "amount {amount} is below the smallest currency unit"
        )));
    }
    Ok(minor)
}
