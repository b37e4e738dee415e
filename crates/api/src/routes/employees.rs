//! Employee routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use chrono::NaiveDate;
use kaizen_db::{
    EmployeeRepository,
    entities::employees,
    repositories::{CreateEmployeeInput, UpdateEmployeeInput},
};
use kaizen_shared::AppError;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::{
    AppState,
    error::ApiResult,
    extract::{Path, Query},
    middleware::{AuthUser, require_admin},
};

/// Creates the employee routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/companies/{uen}/employees", get(list_employees))
        .route("/employees", post(create_employee))
        .route(
            "/employees/{work_permit_number}",
            get(get_employee)
                .put(update_employee)
                .delete(delete_employee),
        )
}

/// Request body for creating an employee.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateEmployeeRequest {
    /// Work permit number.
    #[validate(length(min = 9, max = 32))]
    pub work_permit_number: String,
    /// Owning company UEN.
    #[validate(length(min = 9, max = 10))]
    pub company_id: String,
    /// Full name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Passport number.
    #[validate(length(min = 10, max = 32))]
    pub passport_number: String,
    /// Company-issued work id.
    #[validate(length(min = 10, max = 32))]
    pub work_id: String,
    /// Job role.
    #[validate(length(min = 1, max = 100))]
    pub employee_role: String,
    /// Monthly levy.
    #[validate(range(min = 0))]
    pub levy: i32,
    /// Issue date of the work permit.
    pub work_permit_date_of_issue: NaiveDate,
    /// Expiry date of the work permit.
    pub work_permit_expiry_date: NaiveDate,
    /// Local contact number.
    #[validate(length(equal = 8))]
    pub work_contact_number: String,
    /// Current work site.
    #[validate(length(min = 10, max = 255))]
    pub work_site_location: String,
    /// Address in Singapore.
    #[validate(length(min = 10, max = 255))]
    pub singapore_address: String,
    /// Whether the employee is vaccinated.
    #[serde(default)]
    pub vaccination_status: bool,
    /// Offered for loan to other companies.
    #[serde(default)]
    pub for_sharing: bool,
    /// Currently on loan.
    #[serde(default)]
    pub shared: bool,
    /// Free text notes.
    #[serde(default)]
    pub description: Option<String>,
}

impl From<CreateEmployeeRequest> for CreateEmployeeInput {
    fn from(req: CreateEmployeeRequest) -> Self {
        Self {
            work_permit_number: req.work_permit_number,
            company_id: req.company_id,
            name: req.name,
            passport_number: req.passport_number,
            work_id: req.work_id,
            employee_role: req.employee_role,
            levy: req.levy,
            work_permit_date_of_issue: req.work_permit_date_of_issue,
            work_permit_expiry_date: req.work_permit_expiry_date,
            work_contact_number: req.work_contact_number,
            work_site_location: req.work_site_location,
            singapore_address: req.singapore_address,
            vaccination_status: req.vaccination_status,
            for_sharing: req.for_sharing,
            shared: req.shared,
            description: req.description,
        }
    }
}

/// Request body for replacing an employee's details.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateEmployeeRequest {
    /// Full name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Passport number.
    #[validate(length(min = 10, max = 32))]
    pub passport_number: String,
    /// Company-issued work id.
    #[validate(length(min = 10, max = 32))]
    pub work_id: String,
    /// Job role.
    #[validate(length(min = 1, max = 100))]
    pub employee_role: String,
    /// Monthly levy.
    #[validate(range(min = 0))]
    pub levy: i32,
    /// Issue date of the work permit.
    pub work_permit_date_of_issue: NaiveDate,
    /// Expiry date of the work permit.
    pub work_permit_expiry_date: NaiveDate,
    /// Local contact number.
    #[validate(length(equal = 8))]
    pub work_contact_number: String,
    /// Current work site.
    #[validate(length(min = 10, max = 255))]
    pub work_site_location: String,
    /// Address in Singapore.
    #[validate(length(min = 10, max = 255))]
    pub singapore_address: String,
    /// Whether the employee is vaccinated.
    #[serde(default)]
    pub vaccination_status: bool,
    /// Offered for loan to other companies.
    #[serde(default)]
    pub for_sharing: bool,
    /// Currently on loan.
    #[serde(default)]
    pub shared: bool,
    /// Free text notes.
    #[serde(default)]
    pub description: Option<String>,
}

impl UpdateEmployeeRequest {
    fn into_input(self, company_id: String) -> UpdateEmployeeInput {
        UpdateEmployeeInput {
            company_id,
            name: self.name,
            passport_number: self.passport_number,
            work_id: self.work_id,
            employee_role: self.employee_role,
            levy: self.levy,
            work_permit_date_of_issue: self.work_permit_date_of_issue,
            work_permit_expiry_date: self.work_permit_expiry_date,
            work_contact_number: self.work_contact_number,
            work_site_location: self.work_site_location,
            singapore_address: self.singapore_address,
            vaccination_status: self.vaccination_status,
            for_sharing: self.for_sharing,
            shared: self.shared,
            description: self.description,
        }
    }
}

/// Query naming the employee's company.
#[derive(Debug, Deserialize)]
pub struct CompanyQuery {
    /// Company UEN.
    #[serde(rename = "compId", default)]
    pub comp_id: Option<String>,
}

/// GET `/companies/{uen}/employees` - Employees of a company.
async fn list_employees(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(uen): Path<String>,
) -> ApiResult<Json<Vec<employees::Model>>> {
    let repo = EmployeeRepository::new((*state.db).clone());
    Ok(Json(repo.list_by_company(&uen).await?))
}

/// POST `/employees` - Register an employee.
async fn create_employee(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateEmployeeRequest>,
) -> ApiResult<(StatusCode, Json<employees::Model>)> {
    payload.validate()?;
    let repo = EmployeeRepository::new((*state.db).clone());
    let employee = repo.create(payload.into()).await?;
    info!(
        work_permit_number = %employee.work_permit_number,
        created_by = auth.subject(),
        "employee registered"
    );
    Ok((StatusCode::CREATED, Json(employee)))
}

/// GET `/employees/{work_permit_number}` - Get one employee.
async fn get_employee(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(work_permit_number): Path<String>,
) -> ApiResult<Json<employees::Model>> {
    let repo = EmployeeRepository::new((*state.db).clone());
    Ok(Json(repo.get(&work_permit_number).await?))
}

/// PUT `/employees/{work_permit_number}?compId=` - Replace an employee's details.
async fn update_employee(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(work_permit_number): Path<String>,
    Query(query): Query<CompanyQuery>,
    Json(payload): Json<UpdateEmployeeRequest>,
) -> ApiResult<Json<employees::Model>> {
    let company_id = query.comp_id.unwrap_or_default();
    if company_id.trim().is_empty() {
        return Err(AppError::Validation("compId is required".to_string()).into());
    }
    payload.validate()?;

    let repo = EmployeeRepository::new((*state.db).clone());
    let employee = repo
        .update(&work_permit_number, payload.into_input(company_id))
        .await?;
    info!(
        work_permit_number = %employee.work_permit_number,
        updated_by = auth.subject(),
        "employee updated"
    );
    Ok(Json(employee))
}

/// DELETE `/employees/{work_permit_number}` - Remove an employee. Admin only.
async fn delete_employee(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(work_permit_number): Path<String>,
) -> ApiResult<StatusCode> {
    require_admin(&auth)?;
    let repo = EmployeeRepository::new((*state.db).clone());
    repo.delete(&work_permit_number).await?;
    info!(%work_permit_number, deleted_by = auth.subject(), "employee deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, header::AUTHORIZATION},
    };
    use sea_orm::{DatabaseBackend, MockDatabase};
    use serde_json::json;
    use tower::ServiceExt;

    use crate::{create_router, test_support};

    fn request() -> CreateEmployeeRequest {
        CreateEmployeeRequest {
            work_permit_number: "G12345678".to_string(),
            company_id: "201900001A".to_string(),
            name: "Rahim Uddin".to_string(),
            passport_number: "BD12345678".to_string(),
            work_id: "ALPHA-00001".to_string(),
            employee_role: "Welder".to_string(),
            levy: 300,
            work_permit_date_of_issue: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            work_permit_expiry_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            work_contact_number: "91234567".to_string(),
            work_site_location: "Tuas South Avenue 1".to_string(),
            singapore_address: "10 Kranji Way Dormitory".to_string(),
            vaccination_status: true,
            for_sharing: false,
            shared: false,
            description: None,
        }
    }

    #[test]
    fn test_valid_employee() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_contact_number_must_be_eight_characters() {
        let mut req = request();
        req.work_contact_number = "9123456".to_string();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("work_contact_number"));
    }

    #[test]
    fn test_negative_levy_rejected() {
        let mut req = request();
        req.levy = -1;
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("levy"));
    }

    #[test]
    fn test_short_work_permit_rejected() {
        let mut req = request();
        req.work_permit_number = "G1234".to_string();
        assert!(req.validate().is_err());
    }

    fn stored(company_id: &str, site: &str) -> employees::Model {
        employees::Model {
            work_permit_number: "G12345678".to_string(),
            company_id: company_id.to_string(),
            name: "Rahim Uddin".to_string(),
            passport_number: "BD12345678".to_string(),
            work_id: "ALPHA-00001".to_string(),
            employee_role: "Welder".to_string(),
            levy: 300,
            work_permit_date_of_issue: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            work_permit_expiry_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            work_contact_number: "91234567".to_string(),
            work_site_location: site.to_string(),
            singapore_address: "10 Kranji Way Dormitory".to_string(),
            vaccination_status: true,
            for_sharing: false,
            shared: false,
            description: None,
            created_at: chrono::Utc::now().fixed_offset(),
        }
    }

    fn update_body(site: &str) -> String {
        json!({
            "name": "Rahim Uddin",
            "passport_number": "BD12345678",
            "work_id": "ALPHA-00001",
            "employee_role": "Welder",
            "levy": 300,
            "work_permit_date_of_issue": "2023-01-01",
            "work_permit_expiry_date": "2025-01-01",
            "work_contact_number": "91234567",
            "work_site_location": site,
            "singapore_address": "10 Kranji Way Dormitory",
            "vaccination_status": true,
        })
        .to_string()
    }

    fn put(uri: &str, body: String) -> Request<Body> {
        Request::builder()
            .method("PUT")
            .uri(uri)
            .header(AUTHORIZATION, format!("Bearer {}", test_support::user_token()))
            .header("Content-Type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_update_employee_moves_company_and_site() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored("201900001A", "Tuas South Avenue 1")]])
            .append_query_results([vec![stored("201900002B", "Jurong Island Highway")]])
            .into_connection();
        let app = create_router(test_support::state_with_db(db));

        let response = app
            .oneshot(put(
                "/api/v1/employees/G12345678?compId=201900002B",
                update_body("Jurong Island Highway"),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = test_support::json_body(response).await;
        assert_eq!(body["company_id"], "201900002B");
        assert_eq!(body["work_site_location"], "Jurong Island Highway");
    }

    #[tokio::test]
    async fn test_update_unknown_employee_is_404() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<employees::Model>::new()])
            .into_connection();
        let app = create_router(test_support::state_with_db(db));

        let response = app
            .oneshot(put(
                "/api/v1/employees/G00000000?compId=201900001A",
                update_body("Tuas South Avenue 1"),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = test_support::json_body(response).await;
        assert_eq!(body["error"], "not_found");
    }

    #[tokio::test]
    async fn test_update_requires_company_and_valid_body() {
        let app = create_router(test_support::state());
        let response = app
            .clone()
            .oneshot(put(
                "/api/v1/employees/G12345678",
                update_body("Tuas South Avenue 1"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(put(
                "/api/v1/employees/G12345678?compId=201900001A",
                update_body("short"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = test_support::json_body(response).await;
        assert_eq!(body["error"], "validation_error");
    }
}
