//! End-to-end referral workflow over the HTTP surface.
//!
//! Each test builds the full route table against one in-memory store with
//! real Argon2 hashing and HS256 tokens, then drives it through
//! `actix_web::test`. A [`MutableClock`] lets the expiry scenarios move time
//! forward without sleeping.

use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use chrono::TimeDelta;
use referrals::Trace;
use referrals::inbound::http::configure;
use referrals::test_support::{MutableClock, memory_state};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

const PASSWORD: &str = "correct-horse-battery";

/// Send `$req` to `$app` and decode the JSON reply.
macro_rules! send {
    ($app:expr, $req:expr) => {{
        let response = test::call_service(&$app, $req.to_request()).await;
        let status = response.status();
        let body: Value = test::read_body_json(response).await;
        (status, body)
    }};
}

macro_rules! app {
    ($clock:expr) => {{
        let (state, _store) = memory_state($clock.clone());
        test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .wrap(Trace)
                .configure(configure),
        )
        .await
    }};
}

#[fixture]
fn clock() -> Arc<MutableClock> {
    Arc::new(MutableClock::fixed())
}

fn signup_student(name: &str, email: &str) -> test::TestRequest {
    test::TestRequest::post().uri("/signup").set_json(json!({
        "name": name,
        "email": email,
        "password": PASSWORD,
        "role": "student",
    }))
}

fn signup_employee(name: &str, email: &str, company: &str, work_email: &str) -> test::TestRequest {
    test::TestRequest::post().uri("/signup").set_json(json!({
        "name": name,
        "email": email,
        "password": PASSWORD,
        "role": "employee",
        "companyName": company,
        "workEmail": work_email,
        "position": "Engineer",
    }))
}

fn login(email: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "email": email, "password": PASSWORD }))
}

fn authed(request: test::TestRequest, token: &str) -> test::TestRequest {
    request.insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
}

fn referral_body(target: Value) -> Value {
    let mut body = json!({
        "candidateName": "Sam Student",
        "candidateContact": "sam@uni.edu",
        "resumeLink": "https://drive.example.com/sam.pdf",
        "jobLink": "acme.com/jobs/1",
        "motivation": "I have wanted to build rockets since I was nine.",
    });
    if let (Some(body), Some(target)) = (body.as_object_mut(), target.as_object()) {
        body.extend(target.clone());
    }
    body
}

fn decide(token: &str, request_id: &str, status: &str) -> test::TestRequest {
    authed(
        test::TestRequest::put()
            .uri(&format!("/request/{request_id}/status"))
            .set_json(json!({ "status": status })),
        token,
    )
}

fn text<'a>(body: &'a Value, pointer: &str) -> &'a str {
    body.pointer(pointer)
        .and_then(Value::as_str)
        .unwrap_or_else(|| panic!("{pointer} missing from {body}"))
}

#[rstest]
#[actix_web::test]
async fn broadcast_request_is_claimed_by_the_first_employee(clock: Arc<MutableClock>) {
    let app = app!(clock);

    let (status, sam) = send!(app, signup_student("Sam Student", "sam@uni.edu"));
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(text(&sam, "/role"), "student");

    let (status, erin) = send!(
        app,
        signup_employee("Erin", "erin@gmail.com", "Acme", "erin@acme.com")
    );
    assert_eq!(status, StatusCode::CREATED);
    let company_id = text(&erin, "/companyId").to_owned();
    let (status, fred) = send!(
        app,
        signup_employee("Fred", "fred@gmail.com", "Acme", "fred@acme.com")
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(text(&fred, "/companyId"), company_id);

    let (_, sam_login) = send!(app, login("sam@uni.edu"));
    let (_, erin_login) = send!(app, login("erin@gmail.com"));
    let (_, fred_login) = send!(app, login("fred@gmail.com"));
    let sam_token = text(&sam_login, "/token").to_owned();
    let erin_token = text(&erin_login, "/token").to_owned();
    let fred_token = text(&fred_login, "/token").to_owned();

    let (status, created) = send!(
        app,
        authed(
            test::TestRequest::post()
                .uri("/request/referral")
                .set_json(referral_body(json!({ "companyId": company_id }))),
            &sam_token,
        )
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(text(&created, "/status"), "pending");
    assert!(created["employeeId"].is_null());
    let request_id = text(&created, "/id").to_owned();

    // Both colleagues see the unclaimed request.
    for token in [&erin_token, &fred_token] {
        let (status, queue) = send!(
            app,
            authed(test::TestRequest::get().uri("/requests"), token)
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(queue.as_array().map(Vec::len), Some(1));
        assert_eq!(text(&queue, "/0/company/name"), "Acme");
    }

    let (status, accepted) = send!(app, decide(&erin_token, &request_id, "accepted"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text(&accepted, "/status"), "accepted");
    assert_eq!(text(&accepted, "/employeeId"), text(&erin, "/id"));

    let (status, late) = send!(app, decide(&fred_token, &request_id, "accepted"));
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(text(&late, "/code"), "conflict");

    let (status, mine) = send!(
        app,
        authed(test::TestRequest::get().uri("/my-requests"), &sam_token)
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text(&mine, "/0/status"), "accepted");
    assert_eq!(text(&mine, "/0/employee/name"), "Erin");
    assert_eq!(text(&mine, "/0/candidate/jobLink"), "acme.com/jobs/1");

    let (_, fred_queue) = send!(
        app,
        authed(test::TestRequest::get().uri("/requests"), &fred_token)
    );
    assert_eq!(fred_queue, json!([]));

    let (status, inbox) = send!(
        app,
        authed(test::TestRequest::get().uri("/notifications"), &sam_token)
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text(&inbox, "/0/kind"), "status_update");
    assert_eq!(
        text(&inbox, "/0/message"),
        "Your referral request was accepted by Erin"
    );
    assert_eq!(inbox[0]["isRead"], json!(false));

    let notification_id = text(&inbox, "/0/id").to_owned();
    let (status, read) = send!(
        app,
        authed(
            test::TestRequest::put().uri(&format!("/notifications/{notification_id}/read")),
            &sam_token,
        )
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(read["isRead"], json!(true));
}

#[rstest]
#[actix_web::test]
async fn company_domain_is_locked_by_the_first_employee(clock: Arc<MutableClock>) {
    let app = app!(clock);

    let (status, _) = send!(
        app,
        signup_employee("Erin", "erin@gmail.com", "Acme", "erin@acme.com")
    );
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send!(
        app,
        signup_employee("Mallory", "mallory@gmail.com", "Acme", "mallory@evil.com")
    );
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(text(&body, "/details/code"), "domain_mismatch");
    assert_eq!(text(&body, "/details/expectedDomain"), "acme.com");

    // The rejected signup left no account behind.
    let (status, _) = send!(app, login("mallory@gmail.com"));
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, found) = send!(
        app,
        test::TestRequest::get().uri("/companies/search?query=ac")
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found.as_array().map(Vec::len), Some(1));
    assert_eq!(text(&found, "/0/domain"), "acme.com");
}

#[rstest]
#[actix_web::test]
async fn second_pending_request_to_the_same_employee_conflicts(clock: Arc<MutableClock>) {
    let app = app!(clock);
    send!(app, signup_student("Sam Student", "sam@uni.edu"));
    let (_, erin) = send!(
        app,
        signup_employee("Erin", "erin@gmail.com", "Acme", "erin@acme.com")
    );
    let erin_id = text(&erin, "/id").to_owned();
    let (_, sam_login) = send!(app, login("sam@uni.edu"));
    let sam_token = text(&sam_login, "/token").to_owned();
    let direct = || {
        authed(
            test::TestRequest::post()
                .uri("/request/referral")
                .set_json(referral_body(json!({ "employeeId": erin_id }))),
            &sam_token,
        )
    };

    let (status, created) = send!(app, direct());
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(text(&created, "/employeeId"), erin_id);

    let (status, body) = send!(app, direct());
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(text(&body, "/details/code"), "duplicate_pending");

    let (_, erin_login) = send!(app, login("erin@gmail.com"));
    let (_, inbox) = send!(
        app,
        authed(
            test::TestRequest::get().uri("/notifications"),
            text(&erin_login, "/token"),
        )
    );
    assert_eq!(inbox.as_array().map(Vec::len), Some(1));
    assert_eq!(text(&inbox, "/0/kind"), "request_received");
}

#[rstest]
#[actix_web::test]
async fn requests_lapse_after_five_days(clock: Arc<MutableClock>) {
    let app = app!(clock);
    send!(app, signup_student("Sam Student", "sam@uni.edu"));
    let (_, erin) = send!(
        app,
        signup_employee("Erin", "erin@gmail.com", "Acme", "erin@acme.com")
    );
    let erin_id = text(&erin, "/id").to_owned();
    let (_, sam_login) = send!(app, login("sam@uni.edu"));
    let (_, erin_login) = send!(app, login("erin@gmail.com"));
    let sam_token = text(&sam_login, "/token").to_owned();
    let erin_token = text(&erin_login, "/token").to_owned();

    let (_, created) = send!(
        app,
        authed(
            test::TestRequest::post()
                .uri("/request/referral")
                .set_json(referral_body(json!({ "employeeId": erin_id }))),
            &sam_token,
        )
    );
    let request_id = text(&created, "/id").to_owned();

    clock.advance(TimeDelta::days(6));

    let (status, body) = send!(app, decide(&erin_token, &request_id, "accepted"));
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(text(&body, "/details/status"), "expired");

    let (_, mine) = send!(
        app,
        authed(test::TestRequest::get().uri("/my-requests"), &sam_token)
    );
    assert_eq!(text(&mine, "/0/status"), "expired");

    let (_, queue) = send!(
        app,
        authed(test::TestRequest::get().uri("/requests"), &erin_token)
    );
    assert_eq!(queue.as_array().map(Vec::len), Some(1));
    assert_eq!(text(&queue, "/0/status"), "expired");

    // The expired request no longer blocks a fresh one.
    let (status, _) = send!(
        app,
        authed(
            test::TestRequest::post()
                .uri("/request/referral")
                .set_json(referral_body(json!({ "employeeId": erin_id }))),
            &sam_token,
        )
    );
    assert_eq!(status, StatusCode::CREATED);
}

#[rstest]
#[actix_web::test]
async fn roles_gate_the_endpoints(clock: Arc<MutableClock>) {
    let app = app!(clock);
    send!(app, signup_student("Sam Student", "sam@uni.edu"));
    let (_, sam_login) = send!(app, login("sam@uni.edu"));
    let sam_token = text(&sam_login, "/token").to_owned();

    let (status, _) = send!(
        app,
        authed(test::TestRequest::get().uri("/requests"), &sam_token)
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send!(
        app,
        authed(
            test::TestRequest::put()
                .uri("/company/form")
                .set_json(json!({ "config": { "fields": [] } })),
            &sam_token,
        )
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send!(app, test::TestRequest::get().uri("/my-requests"));
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["traceId"].is_string());
}

#[rstest]
#[actix_web::test]
async fn tokens_stop_working_after_thirty_days(clock: Arc<MutableClock>) {
    let app = app!(clock);
    send!(app, signup_student("Sam Student", "sam@uni.edu"));
    let (_, sam_login) = send!(app, login("sam@uni.edu"));
    let sam_token = text(&sam_login, "/token").to_owned();

    let (status, profile) = send!(
        app,
        authed(test::TestRequest::get().uri("/profile"), &sam_token)
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text(&profile, "/email"), "sam@uni.edu");

    clock.advance(TimeDelta::days(31));

    let (status, _) = send!(
        app,
        authed(test::TestRequest::get().uri("/profile"), &sam_token)
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
