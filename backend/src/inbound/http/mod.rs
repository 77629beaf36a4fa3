//! HTTP inbound adapter exposing the REST endpoints.
//!
//! Handlers translate JSON payloads into domain requests, call the driving
//! ports held in [`state::HttpState`], and map results back to wire DTOs.
//! [`configure`] registers every endpoint plus the extractor configs that
//! keep parse failures in the shared error envelope.

use actix_web::web;

pub mod accounts;
pub mod auth;
pub mod auth_config;
pub mod companies;
pub mod error;
pub mod health;
pub mod notifications;
pub mod referrals;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;

/// Register the API endpoints and extractor configuration.
///
/// Expects `web::Data<HttpState>` to be supplied by the caller.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(validation::json_config())
        .app_data(validation::path_config())
        .app_data(validation::query_config())
        .service(accounts::signup)
        .service(accounts::login)
        .service(accounts::verify)
        .service(accounts::profile)
        .service(companies::search_companies)
        .service(companies::update_company_form)
        .service(referrals::create_referral)
        .service(referrals::decide_referral)
        .service(referrals::employee_requests)
        .service(referrals::student_requests)
        .service(notifications::list_notifications)
        .service(notifications::mark_notification_read);
}
