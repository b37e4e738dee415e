//! Card payments through an external gateway.
//!
//! The API charges a tokenized card; card details never reach this service.

mod stripe;
mod types;

pub use stripe::StripeGateway;
pub use types::{ChargeReceipt, ChargeRequest, PaymentError, PaymentProcessor, to_minor_units};
