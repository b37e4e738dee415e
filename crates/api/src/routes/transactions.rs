//! Worker-loan transaction routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, post, put},
};
use chrono::NaiveDate;
use kaizen_core::transaction::{
    Transaction, TransactionDraft, TransactionError, TransactionKey, TransactionStatus,
};
use kaizen_shared::types::{CompanyId, EmployeeId};
use serde::Deserialize;
use tracing::info;

use crate::{
    AppState,
    error::ApiResult,
    extract::{Path, Query},
    middleware::AuthUser,
};

/// Creates the transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions/incoming", get(list_incoming))
        .route("/transactions/outgoing", get(list_outgoing))
        .route("/transactions/status", put(change_status))
        .route(
            "/transactions",
            post(submit_transaction).delete(remove_by_employee_and_date),
        )
        .route(
            "/transactions/{loaning_company_id}/{borrowing_company_id}/{employee_id}/{start_date}",
            delete(remove_by_key),
        )
}

// ============================================================================
// Request Types
// ============================================================================

/// Query for the company projections.
#[derive(Debug, Deserialize)]
pub struct CompanyQuery {
    /// Company UEN.
    #[serde(rename = "compId", default)]
    pub comp_id: Option<String>,
}

/// Query for the status update.
#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    /// Employee work permit number.
    #[serde(rename = "empId", default)]
    pub emp_id: Option<String>,
    /// Start date of the loan.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// New status.
    #[serde(default)]
    pub status: Option<String>,
}

/// Query identifying a loan by employee and start date.
#[derive(Debug, Deserialize)]
pub struct EmployeeDateQuery {
    /// Employee work permit number.
    #[serde(rename = "empId", default)]
    pub emp_id: Option<String>,
    /// Start date of the loan.
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/transactions/incoming?compId=` - Loans where the company lends.
async fn list_incoming(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<CompanyQuery>,
) -> ApiResult<Json<Vec<Transaction>>> {
    let company = CompanyId::new(query.comp_id.unwrap_or_default());
    Ok(Json(state.transactions.list_by_loaning_company(&company).await?))
}

/// GET `/transactions/outgoing?compId=` - Loans where the company borrows.
async fn list_outgoing(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<CompanyQuery>,
) -> ApiResult<Json<Vec<Transaction>>> {
    let company = CompanyId::new(query.comp_id.unwrap_or_default());
    Ok(Json(
        state.transactions.list_by_borrowing_company(&company).await?,
    ))
}

/// POST `/transactions` - Submit a new loan.
async fn submit_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(draft): Json<TransactionDraft>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    let transaction = state.transactions.submit(draft).await?;
    info!(key = %transaction.key, submitted_by = auth.subject(), "loan submitted");
    Ok((StatusCode::CREATED, Json(transaction)))
}

/// PUT `/transactions/status?empId=&date=&status=` - Change the status of a loan.
async fn change_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<StatusQuery>,
) -> ApiResult<Json<Transaction>> {
    let date = query
        .date
        .ok_or(TransactionError::MissingValue("start_date"))?;
    let raw_status = query.status.ok_or(TransactionError::MissingValue("status"))?;
    let status = TransactionStatus::parse(&raw_status).ok_or_else(|| {
        TransactionError::InvalidValue(format!("unknown status '{raw_status}'"))
    })?;
    let employee = EmployeeId::new(query.emp_id.unwrap_or_default());

    let transaction = state
        .transactions
        .change_status(&employee, date, status)
        .await?;
    info!(key = %transaction.key, %status, changed_by = auth.subject(), "loan status changed");
    Ok(Json(transaction))
}

/// DELETE `/transactions?empId=&date=` - Remove the loan starting on `date`.
async fn remove_by_employee_and_date(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<EmployeeDateQuery>,
) -> ApiResult<StatusCode> {
    let date = query
        .date
        .ok_or(TransactionError::MissingValue("start_date"))?;
    let employee = EmployeeId::new(query.emp_id.unwrap_or_default());
    if employee.is_blank() {
        return Err(TransactionError::MissingValue("employee_id").into());
    }

    let transaction = state
        .transactions
        .find_by_employee_and_start_date(&employee, date)
        .await?;
    state.transactions.remove(&transaction.key).await?;
    info!(key = %transaction.key, removed_by = auth.subject(), "loan removed");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE `/transactions/{loan}/{borrow}/{emp}/{date}` - Remove a loan by its full key.
async fn remove_by_key(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((loaning_company_id, borrowing_company_id, employee_id, start_date)): Path<(
        String,
        String,
        String,
        NaiveDate,
    )>,
) -> ApiResult<StatusCode> {
    let key = TransactionKey {
        loaning_company_id: loaning_company_id.into(),
        borrowing_company_id: borrowing_company_id.into(),
        employee_id: employee_id.into(),
        start_date,
    };
    state.transactions.remove(&key).await?;
    info!(%key, removed_by = auth.subject(), "loan removed");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, header::AUTHORIZATION},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::{create_router, test_support};

    fn loan(borrow: &str, start: &str, end: &str) -> Value {
        json!({
            "loaning_company_id": "201900001A",
            "borrowing_company_id": borrow,
            "employee_id": "G12345678",
            "start_date": start,
            "end_date": end,
            "total_cost": "1000.00",
        })
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(AUTHORIZATION, format!("Bearer {}", test_support::user_token()));
        let body = match body {
            Some(value) => {
                builder = builder.header("Content-Type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        app.clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_submit_requires_token() {
        let app = create_router(test_support::state());
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/transactions")
                    .header("Content-Type", "application/json")
                    .body(Body::from(
                        loan("201900002B", "2024-01-01", "2024-01-31").to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_submit_then_conflict() {
        let app = create_router(test_support::state());

        let response = send(
            &app,
            "POST",
            "/api/v1/transactions",
            Some(loan("201900002B", "2024-01-01", "2024-01-31")),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = test_support::json_body(response).await;
        assert_eq!(body["status"], "pending");
        assert_eq!(body["employee_id"], "G12345678");

        let response = send(
            &app,
            "POST",
            "/api/v1/transactions",
            Some(loan("201900003C", "2024-01-15", "2024-02-15")),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = test_support::json_body(response).await;
        assert_eq!(body["error"], "date_conflict");
    }

    #[tokio::test]
    async fn test_loan_starting_on_previous_end_is_accepted() {
        let app = create_router(test_support::state());
        send(
            &app,
            "POST",
            "/api/v1/transactions",
            Some(loan("201900002B", "2024-01-01", "2024-01-31")),
        )
        .await;

        let response = send(
            &app,
            "POST",
            "/api/v1/transactions",
            Some(loan("201900003C", "2024-01-31", "2024-02-28")),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_missing_field_is_400() {
        let app = create_router(test_support::state());
        let mut body = loan("201900002B", "2024-01-01", "2024-01-31");
        body.as_object_mut().unwrap().remove("end_date");

        let response = send(&app, "POST", "/api/v1/transactions", Some(body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = test_support::json_body(response).await;
        assert_eq!(body["error"], "missing_value");
    }

    #[tokio::test]
    async fn test_status_change_and_projections() {
        let app = create_router(test_support::state());
        send(
            &app,
            "POST",
            "/api/v1/transactions",
            Some(loan("201900002B", "2024-01-01", "2024-01-31")),
        )
        .await;

        let response = send(
            &app,
            "PUT",
            "/api/v1/transactions/status?empId=G12345678&date=2024-01-01&status=accepted",
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = test_support::json_body(response).await;
        assert_eq!(body["status"], "accepted");

        let response = send(
            &app,
            "GET",
            "/api/v1/transactions/incoming?compId=201900001A",
            None,
        )
        .await;
        let incoming = test_support::json_body(response).await;
        assert_eq!(incoming.as_array().unwrap().len(), 1);

        let response = send(
            &app,
            "GET",
            "/api/v1/transactions/outgoing?compId=201900001A",
            None,
        )
        .await;
        let outgoing = test_support::json_body(response).await;
        assert!(outgoing.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_status_is_400() {
        let app = create_router(test_support::state());
        let response = send(
            &app,
            "PUT",
            "/api/v1/transactions/status?empId=G12345678&date=2024-01-01&status=cancelled",
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_date_uses_error_envelope() {
        let app = create_router(test_support::state());
        for (method, uri) in [
            (
                "PUT",
                "/api/v1/transactions/status?empId=G12345678&date=2024-13-01&status=accepted",
            ),
            ("DELETE", "/api/v1/transactions?empId=G12345678&date=2024-13-01"),
            (
                "DELETE",
                "/api/v1/transactions/201900001A/201900002B/G12345678/2024-13-01",
            ),
        ] {
            let response = send(&app, method, uri, None).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{method} {uri}");
            let body = test_support::json_body(response).await;
            assert_eq!(body["error"], "validation_error");
        }
    }

    #[tokio::test]
    async fn test_projection_without_company_is_400() {
        let app = create_router(test_support::state());
        let response = send(&app, "GET", "/api/v1/transactions/incoming", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_unknown_is_404() {
        let app = create_router(test_support::state());

        let response = send(
            &app,
            "DELETE",
            "/api/v1/transactions?empId=G12345678&date=2024-01-01",
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(
            &app,
            "DELETE",
            "/api/v1/transactions/201900001A/201900002B/G12345678/2024-01-01",
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_by_employee_and_date() {
        let app = create_router(test_support::state());
        send(
            &app,
            "POST",
            "/api/v1/transactions",
            Some(loan("201900002B", "2024-01-01", "2024-01-31")),
        )
        .await;

        let response = send(
            &app,
            "DELETE",
            "/api/v1/transactions?empId=G12345678&date=2024-01-01",
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = send(
            &app,
            "GET",
            "/api/v1/transactions/incoming?compId=201900001A",
            None,
        )
        .await;
        let incoming = test_support::json_body(response).await;
        assert!(incoming.as_array().unwrap().is_empty());
    }
}
