//! Optional Prometheus middleware exposing `/metrics`.
//!
//! `actix-web-prom` rewrites the response body type, so the layer boxes the
//! wrapped service either way to keep one concrete `App` type.

use std::sync::Arc;

use actix_service::{
    Service, ServiceExt as _, Transform,
    boxed::{self, BoxService},
};
use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Compat;
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

const NAMESPACE: &str = "referrals";
const ENDPOINT: &str = "/metrics";

#[derive(Clone)]
pub(crate) struct MetricsLayer {
    prometheus: Option<Arc<PrometheusMetrics>>,
}

impl MetricsLayer {
    /// Register the default HTTP metrics, or pass requests through when
    /// disabled or registration fails.
    pub(crate) fn new(enabled: bool) -> Self {
        if !enabled {
            return Self { prometheus: None };
        }
        let prometheus = match PrometheusMetricsBuilder::new(NAMESPACE)
            .endpoint(ENDPOINT)
            .build()
        {
            Ok(metrics) => Some(Arc::new(metrics)),
            Err(error) => {
                warn!(%error, "prometheus registration failed; metrics disabled");
                None
            }
        };
        Self { prometheus }
    }
}

type Boxed = BoxService<ServiceRequest, ServiceResponse<BoxBody>, actix_web::Error>;

impl<S, B> Transform<S, ServiceRequest> for MetricsLayer
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = Boxed;
    type Future = LocalBoxFuture<'static, Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        let Some(prometheus) = self.prometheus.clone() else {
            return Box::pin(async move {
                let passthrough = service.map(|res: ServiceResponse<B>| res.map_into_boxed_body());
                Ok(boxed::service(passthrough))
            });
        };
        let fut = Compat::new((*prometheus).clone()).new_transform(service);
        Box::pin(async move { Ok(boxed::service(fut.await?)) })
    }
}
