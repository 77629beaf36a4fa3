//! Referral request handlers.
//!
//! ```text
//! POST /request/referral {"companyId":"…","candidateName":"Sam",…}
//! PUT /request/{id}/status {"status":"accepted"}
//! GET /requests
//! GET /my-requests
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::ports::CreateReferral;
use crate::domain::{
    CandidateDetails, CandidateInput, CompanyId, Decision, Error, ReferralRequestId,
    ReferralStatus, ReferralTarget, ReferralValidationError, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::{ReferralOverviewResponse, ReferralResponse};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    ErrorCode, FieldName, field_error, missing_field_error, parse_id,
};

const EMPLOYEE_ID: FieldName = FieldName::new("employeeId");
const COMPANY_ID: FieldName = FieldName::new("companyId");
const STATUS: FieldName = FieldName::new("status");

/// Body for `POST /request/referral`.
///
/// Exactly one of `employeeId` (direct request) or `companyId` (broadcast to
/// every employee at the company) must be present.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReferralBody {
    pub employee_id: Option<String>,
    pub company_id: Option<String>,
    #[schema(example = "Sam Student")]
    pub candidate_name: String,
    #[schema(example = "sam@uni.edu")]
    pub candidate_contact: String,
    #[schema(example = "https://drive.example.com/sam.pdf")]
    pub resume_link: String,
    #[schema(example = "acme.com/jobs/1")]
    pub job_link: String,
    pub motivation: Option<String>,
}

impl CreateReferralBody {
    fn target(&self) -> Result<ReferralTarget, Error> {
        match (self.employee_id.as_deref(), self.company_id.as_deref()) {
            (Some(employee), None) => parse_id::<UserId>(employee, EMPLOYEE_ID)
                .map(ReferralTarget::Employee),
            (None, Some(company)) => parse_id::<CompanyId>(company, COMPANY_ID)
                .map(ReferralTarget::Company),
            (Some(_), Some(_)) => Err(field_error(
                EMPLOYEE_ID,
                ErrorCode::InvalidValue,
                "provide either employeeId or companyId, not both",
            )),
            (None, None) => Err(missing_field_error(EMPLOYEE_ID)),
        }
    }

    fn into_command(self) -> Result<CreateReferral, Error> {
        let target = self.target()?;
        let candidate = CandidateDetails::new(CandidateInput {
            name: self.candidate_name,
            contact: self.candidate_contact,
            resume_link: self.resume_link,
            job_link: self.job_link,
            motivation: self.motivation,
        })
        .map_err(map_candidate_error)?;
        Ok(CreateReferral { target, candidate })
    }
}

fn map_candidate_error(err: ReferralValidationError) -> Error {
    let code = match err {
        ReferralValidationError::Empty { .. } => ErrorCode::MissingField,
        _ => ErrorCode::InvalidValue,
    };
    field_error(FieldName::new(err.field()), code, err.to_string())
}

/// Ask an employee, or any employee at a company, for a referral.
#[utoipa::path(
    post,
    path = "/request/referral",
    request_body = CreateReferralBody,
    responses(
        (status = 201, description = "Request created", body = ReferralResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 403, description = "Caller is not a student", body = Error),
        (status = 404, description = "Unknown employee or company", body = Error),
        (status = 409, description = "A pending request to this employee already exists", body = Error)
    ),
    tags = ["referrals"],
    operation_id = "createReferral",
    security(("BearerToken" = []))
)]
#[post("/request/referral")]
pub async fn create_referral(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<CreateReferralBody>,
) -> ApiResult<HttpResponse> {
    let student = caller.student()?;
    let command = payload.into_inner().into_command()?;
    let created = state.referrals.create(student, command).await?;
    info!(
        request_id = %created.id,
        broadcast = created.employee_id.is_none(),
        "referral request created"
    );
    Ok(HttpResponse::Created().json(ReferralResponse::from(created)))
}

/// Body for `PUT /request/{id}/status`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DecisionBody {
    /// `accepted` or `rejected`, case-insensitive.
    #[schema(example = "accepted")]
    pub status: String,
}

fn parse_decision(raw: &str) -> Result<Decision, Error> {
    let invalid = || {
        field_error(
            STATUS,
            ErrorCode::InvalidValue,
            format!("status must be accepted or rejected, got '{raw}'"),
        )
    };
    let status: ReferralStatus = raw.parse().map_err(|_| invalid())?;
    Decision::try_from(status).map_err(|_| invalid())
}

/// Accept or reject a request.
///
/// Accepting an unassigned company request claims it for the caller; only
/// one employee can win a claim.
#[utoipa::path(
    put,
    path = "/request/{id}/status",
    params(("id" = String, Path, description = "Referral request id")),
    request_body = DecisionBody,
    responses(
        (status = 200, description = "Request decided", body = ReferralResponse),
        (status = 400, description = "Invalid status or id", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 403, description = "Caller may not decide this request", body = Error),
        (status = 404, description = "Unknown request", body = Error),
        (status = 409, description = "Already decided, expired or claimed", body = Error)
    ),
    tags = ["referrals"],
    operation_id = "decideReferral",
    security(("BearerToken" = []))
)]
#[put("/request/{id}/status")]
pub async fn decide_referral(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
    payload: web::Json<DecisionBody>,
) -> ApiResult<web::Json<ReferralResponse>> {
    let employee = caller.employee()?;
    let id: ReferralRequestId = parse_id(&path.into_inner(), FieldName::new("id"))?;
    let decision = parse_decision(&payload.status)?;
    let decided = state.referrals.decide(employee, &id, decision).await?;
    Ok(web::Json(decided.into()))
}

/// Requests addressed to the calling employee or open at their company.
#[utoipa::path(
    get,
    path = "/requests",
    responses(
        (status = 200, description = "Requests newest first", body = [ReferralOverviewResponse]),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 403, description = "Caller is not an employee", body = Error)
    ),
    tags = ["referrals"],
    operation_id = "listEmployeeRequests",
    security(("BearerToken" = []))
)]
#[get("/requests")]
pub async fn employee_requests(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<web::Json<Vec<ReferralOverviewResponse>>> {
    let employee = caller.employee()?;
    let listed = state.referrals_query.for_employee(employee).await?;
    Ok(web::Json(listed.into_iter().map(Into::into).collect()))
}

/// Requests created by the calling student.
#[utoipa::path(
    get,
    path = "/my-requests",
    responses(
        (status = 200, description = "Requests newest first", body = [ReferralOverviewResponse]),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 403, description = "Caller is not a student", body = Error)
    ),
    tags = ["referrals"],
    operation_id = "listStudentRequests",
    security(("BearerToken" = []))
)]
#[get("/my-requests")]
pub async fn student_requests(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<web::Json<Vec<ReferralOverviewResponse>>> {
    let student = caller.student()?;
    let listed = state.referrals_query.for_student(student).await?;
    Ok(web::Json(listed.into_iter().map(Into::into).collect()))
}

#[cfg(test)]
#[path = "referrals_tests.rs"]
mod tests;
