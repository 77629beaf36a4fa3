//! Company directory handlers.
//!
//! ```text
//! GET /companies/search?query=ac
//! PUT /company/form {"schemaVersion":1,"config":{"require_resume":false}}
//! ```

use actix_web::{get, put, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{CompanyValidationError, Error, FORM_SCHEMA_VERSION, FormConfig};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::CompanyResponse;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{ErrorCode, FieldName, field_error};

/// Query string for `GET /companies/search`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Case-insensitive substring of the company name; empty lists all.
    #[serde(default)]
    pub query: String,
}

/// Search companies by name.
#[utoipa::path(
    get,
    path = "/companies/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching companies ordered by name", body = [CompanyResponse]),
        (status = 400, description = "Malformed query", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["companies"],
    operation_id = "searchCompanies",
    security([])
)]
#[get("/companies/search")]
pub async fn search_companies(
    state: web::Data<HttpState>,
    params: web::Query<SearchParams>,
) -> ApiResult<web::Json<Vec<CompanyResponse>>> {
    let companies = state.companies.search(params.query.trim()).await?;
    Ok(web::Json(companies.into_iter().map(Into::into).collect()))
}

fn default_schema_version() -> u16 {
    FORM_SCHEMA_VERSION
}

/// Replacement referral form configuration for the caller's company.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormConfigBody {
    #[serde(default = "default_schema_version")]
    #[schema(example = 1)]
    pub schema_version: u16,
    /// JSON object of form options, at most 16 KiB serialised.
    #[schema(example = json!({"require_resume": true, "require_job_id": false}))]
    pub config: Value,
}

fn map_form_error(err: CompanyValidationError) -> Error {
    let field = match err {
        CompanyValidationError::UnsupportedFormVersion { .. } => "schemaVersion",
        _ => "config",
    };
    field_error(FieldName::new(field), ErrorCode::InvalidValue, err.to_string())
}

/// Replace the caller's company form configuration.
#[utoipa::path(
    put,
    path = "/company/form",
    request_body = FormConfigBody,
    responses(
        (status = 200, description = "Updated company", body = CompanyResponse),
        (status = 400, description = "Invalid configuration", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 403, description = "Caller is not an employee", body = Error),
        (status = 404, description = "Company no longer exists", body = Error)
    ),
    tags = ["companies"],
    operation_id = "updateCompanyForm",
    security(("BearerToken" = []))
)]
#[put("/company/form")]
pub async fn update_company_form(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<FormConfigBody>,
) -> ApiResult<web::Json<CompanyResponse>> {
    let employee = caller.employee()?;
    let FormConfigBody {
        schema_version,
        config,
    } = payload.into_inner();
    let config = FormConfig::new(schema_version, config).map_err(map_form_error)?;
    let company = state.companies.update_form(employee, config).await?;
    Ok(web::Json(company.into()))
}
