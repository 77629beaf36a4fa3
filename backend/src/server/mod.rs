//! Server construction and middleware wiring.

mod config;
#[cfg(feature = "metrics")]
mod metrics;
mod settings;
mod state_builders;

pub use config::ServerConfig;
pub use settings::ServerSettings;

#[cfg(feature = "metrics")]
use metrics::MetricsLayer;
use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use referrals::Trace;
#[cfg(debug_assertions)]
use referrals::doc::ApiDoc;
use referrals::inbound::http::configure;
use referrals::inbound::http::health::{HealthState, live, ready};
use referrals::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .configure(configure)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Bind the listener and start serving.
///
/// Readiness flips once the socket is bound; the returned [`Server`] must be
/// awaited to drive it.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ServerConfig {
        bind_addr,
        signing_secret,
        db_pool,
        #[cfg(feature = "metrics")]
        metrics_enabled,
    } = config;
    let http_state = build_http_state(db_pool.as_ref(), &signing_secret);
    #[cfg(feature = "metrics")]
    let metrics_layer = MetricsLayer::new(metrics_enabled);

    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        let app = build_app(server_health_state.clone(), http_state.clone());

        #[cfg(feature = "metrics")]
        let app = app.wrap(metrics_layer.clone());

        app
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use referrals::inbound::http::auth_config::SigningSecret;

    #[actix_web::test]
    async fn memory_backed_app_serves_public_routes() {
        let health = web::Data::new(HealthState::new());
        health.mark_ready();
        let state = build_http_state(None, &SigningSecret::ephemeral());
        let app = test::init_service(build_app(health, state)).await;

        let readiness = test::call_service(
            &app,
            test::TestRequest::get().uri("/health/ready").to_request(),
        )
        .await;
        let search = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/companies/search?query=acme")
                .to_request(),
        )
        .await;

        assert_eq!(readiness.status(), StatusCode::OK);
        assert!(readiness.headers().contains_key("trace-id"));
        assert_eq!(search.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn protected_routes_require_a_bearer_token() {
        let state = build_http_state(None, &SigningSecret::ephemeral());
        let app =
            test::init_service(build_app(web::Data::new(HealthState::new()), state)).await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/requests").to_request()).await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert!(res.headers().contains_key("trace-id"));
    }
}
