//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST endpoint, the wire DTOs from
//! `inbound::http::schemas`, and the bearer token security scheme. The
//! document backs Swagger UI in debug builds and is exported by
//! `cargo run --bin openapi-dump`.

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::accounts::{LoginBody, LoginResponse, SignupBody};
use crate::inbound::http::companies::FormConfigBody;
use crate::inbound::http::referrals::{CreateReferralBody, DecisionBody};
use crate::inbound::http::schemas::{
    CandidateResponse, CompanyResponse, CompanySummaryResponse, NotificationResponse,
    PartyResponse, ReferralOverviewResponse, ReferralResponse, UserResponse,
};

/// Adds the `BearerToken` scheme referenced by protected operations.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        let mut scheme = Http::new(HttpAuthScheme::Bearer);
        scheme.bearer_format = Some("JWT".to_owned());
        scheme.description = Some("Token issued by POST /login.".to_owned());
        components.add_security_scheme("BearerToken", SecurityScheme::Http(scheme));
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Campus referrals API",
        description = "Students request job referrals from employees at verified companies."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::accounts::signup,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::verify,
        crate::inbound::http::accounts::profile,
        crate::inbound::http::companies::search_companies,
        crate::inbound::http::companies::update_company_form,
        crate::inbound::http::referrals::create_referral,
        crate::inbound::http::referrals::decide_referral,
        crate::inbound::http::referrals::employee_requests,
        crate::inbound::http::referrals::student_requests,
        crate::inbound::http::notifications::list_notifications,
        crate::inbound::http::notifications::mark_notification_read,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        SignupBody,
        LoginBody,
        LoginResponse,
        UserResponse,
        CompanyResponse,
        FormConfigBody,
        CreateReferralBody,
        DecisionBody,
        CandidateResponse,
        ReferralResponse,
        PartyResponse,
        CompanySummaryResponse,
        ReferralOverviewResponse,
        NotificationResponse,
    )),
    tags(
        (name = "accounts", description = "Signup, login and profile"),
        (name = "companies", description = "Company directory and referral forms"),
        (name = "referrals", description = "Referral request workflow"),
        (name = "notifications", description = "Per-user notification inbox"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
