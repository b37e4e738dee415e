//! Stripe charges API client.

use std::time::Duration;

use async_trait::async_trait;
use kaizen_shared::config::PaymentConfig;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{error, info, warn};

use super::types::{ChargeReceipt, ChargeRequest, PaymentError, PaymentProcessor, to_minor_units};

#[derive(Debug, Deserialize)]
struct ChargeResponse {
    id: String,
    amount: i64,
    currency: String,
    status: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

/// [`PaymentProcessor`] backed by the Stripe charges API.
pub struct StripeGateway {
    client: Client,
    api_base: String,
    api_key: String,
    default_currency: String,
}

impl std::fmt::Debug for StripeGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeGateway")
            .field("api_base", &self.api_base)
            .field("api_key", &"[hidden]")
            .field("default_currency", &self.default_currency)
            .finish()
    }
}

impl StripeGateway {
    /// Creates a gateway client.
    ///
    /// # Errors
    ///
    /// Returns `Gateway` if the HTTP client cannot be built.
    pub fn new(config: &PaymentConfig) -> Result<Self, PaymentError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PaymentError::Gateway(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            default_currency: config.currency.to_lowercase(),
        })
    }
}

#[async_trait]
impl PaymentProcessor for StripeGateway {
    async fn charge(&self, request: ChargeRequest) -> Result<ChargeReceipt, PaymentError> {
        if request.source_token.trim().is_empty() {
            return Err(PaymentError::MissingSource);
        }
        let amount = to_minor_units(request.amount)?;
        let currency = request
            .currency
            .map_or_else(|| self.default_currency.clone(), |c| c.to_lowercase());

        let url = format!("{}/v1/charges", self.api_base);
        let params = [
            ("amount", amount.to_string()),
            ("currency", currency.clone()),
            ("source", request.source_token),
        ];

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "charge request failed");
                PaymentError::Gateway(format!("charge request failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorEnvelope>(&text)
                .ok()
                .and_then(|env| env.error.message.or(env.error.code))
                .unwrap_or_else(|| format!("status {status}"));
            return Err(if status == StatusCode::PAYMENT_REQUIRED {
                warn!(%detail, "charge declined");
                PaymentError::Declined(detail)
            } else {
                error!(%status, %detail, "gateway rejected charge");
                PaymentError::Gateway(detail)
            });
        }

        let charge = response
            .json::<ChargeResponse>()
            .await
            .map_err(|e| PaymentError::Gateway(format!("failed to parse response: {e}")))?;

        info!(charge_id = %charge.id, amount = charge.amount, currency = %charge.currency, "card charged");

        Ok(ChargeReceipt {
            id: charge.id,
            amount_minor: charge.amount,
            currency: charge.currency,
            status: charge.status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway(base: &str) -> StripeGateway {
        StripeGateway::new(&PaymentConfig {
            api_key: "sk_test_123".to_string(),
            api_base: base.to_string(),
            currency: "USD".to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    fn request(amount: rust_decimal::Decimal) -> ChargeRequest {
        ChargeRequest {
            source_token: "tok_visa".to_string(),
            amount,
            currency: None,
        }
    }

    #[tokio::test]
    async fn test_charge_posts_minor_units() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/charges"))
            .and(header("authorization", "Bearer sk_test_123"))
            .and(body_string_contains("amount=1999"))
            .and(body_string_contains("currency=usd"))
            .and(body_string_contains("source=tok_visa"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "ch_1",
                "amount": 1999,
                "currency": "usd",
                "status": "succeeded"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let receipt = gateway(&server.uri()).charge(request(dec!(19.99))).await.unwrap();
        assert_eq!(receipt.id, "ch_1");
        assert_eq!(receipt.amount_minor, 1999);
        assert_eq!(receipt.status, "succeeded");
    }

    #[tokio::test]
    async fn test_declined_card() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/charges"))
            .respond_with(ResponseTemplate::new(402).set_body_json(json!({
                "error": {"message": "Your card was declined.", "code": "card_declined"}
            })))
            .mount(&server)
            .await;

        let err = gateway(&server.uri()).charge(request(dec!(5))).await.unwrap_err();
        match err {
            PaymentError::Declined(msg) => assert_eq!(msg, "Your card was declined."),
            other => panic!("expected Declined, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_gateway_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = gateway(&server.uri()).charge(request(dec!(5))).await.unwrap_err();
        assert!(matches!(err, PaymentError::Gateway(_)));
    }

    #[tokio::test]
    async fn test_invalid_input_never_calls_gateway() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let gw = gateway(&server.uri());
        assert!(matches!(
            gw.charge(request(dec!(0))).await,
            Err(PaymentError::InvalidAmount(_))
        ));
        assert!(matches!(
            gw.charge(ChargeRequest {
                source_token: " ".to_string(),
                ..request(dec!(5))
            })
            .await,
            Err(PaymentError::MissingSource)
        ));
    }
}
