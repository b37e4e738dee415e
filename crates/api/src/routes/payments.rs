//! Payment routes.

use axum::{Json, Router, extract::State, routing::post};
use kaizen_core::payment::{ChargeReceipt, ChargeRequest};
use kaizen_shared::AppError;
use tracing::info;

use crate::{AppState, error::ApiResult, middleware::AuthUser};

/// Creates the payment routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/payments/charge", post(charge))
}

/// POST `/payments/charge` - Charge a tokenized card.
async fn charge(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<ChargeRequest>,
) -> ApiResult<Json<ChargeReceipt>> {
    let Some(processor) = state.payments.clone() else {
        return Err(AppError::Unavailable("payments are not configured".to_string()).into());
    };
    let receipt = processor.charge(request).await?;
    info!(
        charge_id = %receipt.id,
        amount_minor = receipt.amount_minor,
        currency = %receipt.currency,
        charged_by = auth.subject(),
        "card charged"
    );
    Ok(Json(receipt))
}
