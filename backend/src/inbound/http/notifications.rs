//! Notification inbox handlers.

use actix_web::{get, put, web};

use crate::domain::{Error, NotificationId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::NotificationResponse;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};

/// The caller's notifications, newest first.
#[utoipa::path(
    get,
    path = "/notifications",
    responses(
        (status = 200, description = "Notifications", body = [NotificationResponse]),
        (status = 401, description = "Missing or invalid token", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "listNotifications",
    security(("BearerToken" = []))
)]
#[get("/notifications")]
pub async fn list_notifications(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<web::Json<Vec<NotificationResponse>>> {
    let listed = state.notifications.list(&caller.principal().id()).await?;
    Ok(web::Json(listed.into_iter().map(Into::into).collect()))
}

/// Mark one of the caller's notifications read.
#[utoipa::path(
    put,
    path = "/notifications/{id}/read",
    params(("id" = String, Path, description = "Notification id")),
    responses(
        (status = 200, description = "Notification marked read", body = NotificationResponse),
        (status = 400, description = "Malformed id", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 404, description = "Unknown notification", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "markNotificationRead",
    security(("BearerToken" = []))
)]
#[put("/notifications/{id}/read")]
pub async fn mark_notification_read(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<NotificationResponse>> {
    let id: NotificationId = parse_id(&path.into_inner(), FieldName::new("id"))?;
    let marked = state
        .notifications
        .mark_read(&caller.principal().id(), &id)
        .await?;
    Ok(web::Json(marked.into()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::{StatusCode, header};
    use actix_web::{App, test};

    use super::*;
    use crate::domain::Notification;
    use crate::domain::ports::MockNotificationInbox;
    use crate::inbound::http::test_utils::{fixed_now, resolver_for, state_with, test_principal_student};

    #[actix_web::test]
    async fn listing_maps_kinds_and_read_flags() {
        let student = test_principal_student();
        let owner = student.id();
        let mut notification = Notification::new(
            owner,
            crate::domain::NotificationKind::StatusUpdate,
            "Your referral request was accepted by Erin",
            fixed_now(),
        );
        notification.is_read = true;
        let mut inbox = MockNotificationInbox::new();
        inbox
            .expect_list()
            .withf(move |user| *user == owner)
            .return_once(move |_| Ok(vec![notification]));
        let service = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(|ports| {
                    ports.notifications = Arc::new(inbox);
                    ports.principals = Arc::new(resolver_for("sam", student));
                })))
                .service(list_notifications),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/notifications")
            .insert_header((header::AUTHORIZATION, "Bearer sam"))
            .to_request();
        let body: Vec<NotificationResponse> = test::call_and_read_body_json(&service, req).await;

        assert_eq!(body.len(), 1);
        assert_eq!(body[0].kind, "status_update");
        assert!(body[0].is_read);
    }

    #[actix_web::test]
    async fn foreign_notifications_are_not_found() {
        let mut inbox = MockNotificationInbox::new();
        inbox
            .expect_mark_read()
            .return_once(|_, _| Err(Error::not_found("notification not found")));
        let service = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(|ports| {
                    ports.notifications = Arc::new(inbox);
                    ports.principals = Arc::new(resolver_for("sam", test_principal_student()));
                })))
                .service(mark_notification_read),
        )
        .await;

        let req = test::TestRequest::put()
            .uri(&format!("/notifications/{}/read", NotificationId::random()))
            .insert_header((header::AUTHORIZATION, "Bearer sam"))
            .to_request();
        let res = test::call_service(&service, req).await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
