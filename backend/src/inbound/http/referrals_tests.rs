//! Handler tests for the referral endpoints.

use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{MockReferralCommand, MockReferralQuery};
use crate::domain::{
    NewReferralRequest, PartySummary, Principal, ReferralOverview, ReferralRequest,
};
use crate::inbound::http::test_utils::{
    fixed_now, resolver_for, state_with, test_principal_employee, test_principal_student,
};
use crate::inbound::http::validation::json_config;
use crate::test_support::fixtures;

fn app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .app_data(json_config())
        .service(create_referral)
        .service(decide_referral)
        .service(employee_requests)
        .service(student_requests)
}

fn stored(student: UserId, employee: Option<UserId>, company: CompanyId) -> ReferralRequest {
    let new = NewReferralRequest::new(student, employee, company, fixtures::candidate(), fixed_now());
    ReferralRequest {
        id: new.id,
        student_id: student,
        employee_id: employee,
        company_id: Some(company),
        status: ReferralStatus::Pending,
        candidate: new.candidate,
        expires_at: new.expires_at,
        created_at: new.created_at,
        updated_at: new.created_at,
    }
}

fn body_for(target: Value) -> Value {
    let mut body = json!({
        "candidateName": "Sam Student",
        "candidateContact": "sam@uni.edu",
        "resumeLink": "https://drive.example.com/sam.pdf",
        "jobLink": "acme.com/jobs/1",
    });
    if let (Some(body), Some(target)) = (body.as_object_mut(), target.as_object()) {
        body.extend(target.clone());
    }
    body
}

#[actix_web::test]
async fn broadcast_requests_target_the_company() {
    let student = test_principal_student();
    let company = CompanyId::random();
    let created = stored(student.id(), None, company);
    let mut referrals = MockReferralCommand::new();
    referrals
        .expect_create()
        .withf(move |_, command| command.target == ReferralTarget::Company(company))
        .return_once(move |_, _| Ok(created));
    let service = test::init_service(app(state_with(|ports| {
        ports.referrals = Arc::new(referrals);
        ports.principals = Arc::new(resolver_for("sam", student));
    })))
    .await;

    let req = test::TestRequest::post()
        .uri("/request/referral")
        .insert_header((header::AUTHORIZATION, "Bearer sam"))
        .set_json(body_for(json!({ "companyId": company.to_string() })))
        .to_request();
    let res = test::call_service(&service, req).await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: ReferralResponse = test::read_body_json(res).await;
    assert_eq!(body.status, "pending");
    assert_eq!(body.employee_id, None);
    assert_eq!(body.candidate.job_link, "acme.com/jobs/1");
}

#[rstest]
#[case(json!({}), "employeeId", "missing_field")]
#[case(json!({ "employeeId": UserId::random().to_string(), "companyId": CompanyId::random().to_string() }), "employeeId", "invalid_value")]
#[case(json!({ "employeeId": "nope" }), "employeeId", "invalid_uuid")]
#[case(json!({ "companyId": CompanyId::random().to_string(), "jobLink": "ftp://acme.com" }), "jobLink", "invalid_value")]
#[case(json!({ "companyId": CompanyId::random().to_string(), "candidateName": "  " }), "candidateName", "missing_field")]
#[actix_web::test]
async fn invalid_create_bodies_are_rejected(
    #[case] overrides: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let service = test::init_service(app(state_with(|ports| {
        ports.principals = Arc::new(resolver_for("sam", test_principal_student()));
    })))
    .await;

    let req = test::TestRequest::post()
        .uri("/request/referral")
        .insert_header((header::AUTHORIZATION, "Bearer sam"))
        .set_json(body_for(overrides))
        .to_request();
    let res = test::call_service(&service, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let error: Value = test::read_body_json(res).await;
    assert_eq!(error["details"]["field"], field);
    assert_eq!(error["details"]["code"], code);
}

#[rstest]
#[actix_web::test]
async fn untargeted_requests_report_the_missing_employee_id() {
    let service = test::init_service(app(state_with(|ports| {
        ports.principals = Arc::new(resolver_for("sam", test_principal_student()));
    })))
    .await;

    let req = test::TestRequest::post()
        .uri("/request/referral")
        .insert_header((header::AUTHORIZATION, "Bearer sam"))
        .set_json(body_for(json!({})))
        .to_request();
    let res = test::call_service(&service, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let error: Value = test::read_body_json(res).await;
    assert_eq!(error["message"], "missing required field: employeeId");
}

#[actix_web::test]
async fn employees_cannot_create_requests() {
    let service = test::init_service(app(state_with(|ports| {
        ports.principals = Arc::new(resolver_for(
            "erin",
            test_principal_employee(CompanyId::random()),
        ));
    })))
    .await;

    let req = test::TestRequest::post()
        .uri("/request/referral")
        .insert_header((header::AUTHORIZATION, "Bearer erin"))
        .set_json(body_for(json!({ "companyId": CompanyId::random().to_string() })))
        .to_request();
    let res = test::call_service(&service, req).await;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[rstest]
#[case("accepted", Decision::Accept)]
#[case("ACCEPTED", Decision::Accept)]
#[case("Rejected", Decision::Reject)]
#[actix_web::test]
async fn decisions_parse_case_insensitively(#[case] status: &str, #[case] expected: Decision) {
    let company = CompanyId::random();
    let employee = test_principal_employee(company);
    let mut decided = stored(UserId::random(), Some(employee.id()), company);
    decided.status = expected.target_status();
    let request_id = decided.id;
    let mut referrals = MockReferralCommand::new();
    referrals
        .expect_decide()
        .withf(move |_, id, decision| *id == request_id && *decision == expected)
        .return_once(move |_, _, _| Ok(decided));
    let service = test::init_service(app(state_with(|ports| {
        ports.referrals = Arc::new(referrals);
        ports.principals = Arc::new(resolver_for("erin", employee));
    })))
    .await;

    let req = test::TestRequest::put()
        .uri(&format!("/request/{request_id}/status"))
        .insert_header((header::AUTHORIZATION, "Bearer erin"))
        .set_json(json!({ "status": status }))
        .to_request();
    let body: ReferralResponse = test::call_and_read_body_json(&service, req).await;

    assert_eq!(body.status, expected.target_status().as_str());
}

#[rstest]
#[case("pending")]
#[case("expired")]
#[case("maybe")]
#[actix_web::test]
async fn non_decision_statuses_are_rejected(#[case] status: &str) {
    let service = test::init_service(app(state_with(|ports| {
        ports.principals = Arc::new(resolver_for(
            "erin",
            test_principal_employee(CompanyId::random()),
        ));
    })))
    .await;

    let req = test::TestRequest::put()
        .uri(&format!("/request/{}/status", ReferralRequestId::random()))
        .insert_header((header::AUTHORIZATION, "Bearer erin"))
        .set_json(json!({ "status": status }))
        .to_request();
    let res = test::call_service(&service, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let error: Value = test::read_body_json(res).await;
    assert_eq!(error["details"]["field"], "status");
}

#[actix_web::test]
async fn lost_claims_surface_as_conflict() {
    let mut referrals = MockReferralCommand::new();
    referrals
        .expect_decide()
        .return_once(|_, _, _| Err(Error::conflict("request already claimed by another employee")));
    let service = test::init_service(app(state_with(|ports| {
        ports.referrals = Arc::new(referrals);
        ports.principals = Arc::new(resolver_for(
            "fred",
            test_principal_employee(CompanyId::random()),
        ));
    })))
    .await;

    let req = test::TestRequest::put()
        .uri(&format!("/request/{}/status", ReferralRequestId::random()))
        .insert_header((header::AUTHORIZATION, "Bearer fred"))
        .set_json(json!({ "status": "accepted" }))
        .to_request();
    let res = test::call_service(&service, req).await;

    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn students_list_their_requests_with_summaries() {
    let now = fixed_now();
    let acme = fixtures::company("Acme", "acme.com");
    let sam = fixtures::student("Sam Student", "sam@uni.edu", now);
    let erin = fixtures::employee("Erin", "erin@acme.com", acme.id, now);
    let principal = Principal::Student(fixtures::student_principal(&sam));
    let mut request = stored(sam.id, Some(erin.id), acme.id);
    request.status = ReferralStatus::Accepted;
    let overview = ReferralOverview {
        request,
        student: PartySummary {
            id: sam.id,
            name: sam.name.clone(),
        },
        employee: Some(PartySummary {
            id: erin.id,
            name: erin.name.clone(),
        }),
        company: Some(crate::domain::CompanySummary {
            id: acme.id,
            name: acme.name.clone(),
        }),
    };
    let mut query = MockReferralQuery::new();
    query
        .expect_for_student()
        .withf(move |student| student.id == sam.id)
        .return_once(move |_| Ok(vec![overview]));
    let service = test::init_service(app(state_with(|ports| {
        ports.referrals_query = Arc::new(query);
        ports.principals = Arc::new(resolver_for("sam", principal));
    })))
    .await;

    let req = test::TestRequest::get()
        .uri("/my-requests")
        .insert_header((header::AUTHORIZATION, "Bearer sam"))
        .to_request();
    let body: Vec<ReferralOverviewResponse> = test::call_and_read_body_json(&service, req).await;

    assert_eq!(body.len(), 1);
    assert_eq!(body[0].request.status, "accepted");
    assert_eq!(body[0].employee.as_ref().map(|e| e.name.as_str()), Some("Erin"));
    assert_eq!(body[0].company.as_ref().map(|c| c.name.as_str()), Some("Acme"));
}

#[rstest]
#[case("/requests", "sam")]
#[case("/my-requests", "erin")]
#[actix_web::test]
async fn listings_are_role_gated(#[case] uri: &str, #[case] token: &'static str) {
    let service = test::init_service(app(state_with(|ports| {
        let principal = if token == "sam" {
            test_principal_student()
        } else {
            test_principal_employee(CompanyId::random())
        };
        ports.principals = Arc::new(resolver_for(token, principal));
    })))
    .await;

    let req = test::TestRequest::get()
        .uri(uri)
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    let res = test::call_service(&service, req).await;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}
