//! Prometheus request metrics, compiled only with the `metrics` feature.
//!
//! Health probes and the change feed socket are not measured.

use actix_service::{
    Service, ServiceExt as _, Transform,
    boxed::{self, BoxService},
};
use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Compat;
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use futures_util::future::LocalBoxFuture;
use std::sync::Arc;

const NAMESPACE: &str = "hotel";
const ENDPOINT: &str = "/metrics";
const UNMEASURED_PATHS: [&str; 3] = ["/health/live", "/health/ready", "/ws/changes"];

/// Build the request metrics middleware, which also answers `GET /metrics`.
///
/// # Errors
/// Returns [`std::io::Error`] when the Prometheus registry rejects a metric.
pub(crate) fn make_metrics() -> std::io::Result<PrometheusMetrics> {
    UNMEASURED_PATHS
        .iter()
        .fold(
            PrometheusMetricsBuilder::new(NAMESPACE).endpoint(ENDPOINT),
            |builder, path| builder.exclude(*path),
        )
        .build()
        .map_err(|error| std::io::Error::other(format!("metrics registration failed: {error}")))
}

/// Wraps the app in the Prometheus middleware when a registry is present.
///
/// Responses are boxed on both paths, so the wrapped app has one concrete
/// type regardless of configuration.
#[derive(Clone)]
pub(crate) struct MetricsLayer(Option<Arc<PrometheusMetrics>>);

impl MetricsLayer {
    #[must_use]
    pub(crate) fn from_option(metrics: Option<PrometheusMetrics>) -> Self {
        Self(metrics.map(Arc::new))
    }
}

impl<S, B> Transform<S, ServiceRequest> for MetricsLayer
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = BoxService<ServiceRequest, ServiceResponse<BoxBody>, actix_web::Error>;
    type Future = LocalBoxFuture<'static, Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        let Some(metrics) = self.0.clone() else {
            return Box::pin(async move {
                let unmeasured = service.map(ServiceResponse::map_into_boxed_body);
                Ok(boxed::service(unmeasured))
            });
        };
        let pending = Compat::new((*metrics).clone()).new_transform(service);
        Box::pin(async move { Ok(boxed::service(pending.await?)) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, http::StatusCode, test, web};

    async fn body_of<S>(app: &S, uri: &str) -> String
    where
        S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    {
        let response = test::call_service(app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = test::read_body(response).await;
        String::from_utf8(bytes.to_vec()).expect("utf-8 body")
    }

    #[actix_web::test]
    async fn measured_routes_appear_and_probes_do_not() {
        let metrics = make_metrics().expect("metrics build");
        let app = test::init_service(
            App::new()
                .wrap(MetricsLayer::from_option(Some(metrics)))
                .route("/api/v1/hotels", web::get().to(HttpResponse::Ok))
                .route("/health/live", web::get().to(HttpResponse::Ok)),
        )
        .await;

        body_of(&app, "/api/v1/hotels").await;
        body_of(&app, "/health/live").await;
        let exposition = body_of(&app, ENDPOINT).await;

        assert!(exposition.contains("hotel_http_requests_total"));
        assert!(exposition.contains("/api/v1/hotels"));
        assert!(!exposition.contains("/health/live"));
    }

    #[actix_web::test]
    async fn disabled_layer_leaves_the_metrics_path_unrouted() {
        let app = test::init_service(
            App::new()
                .wrap(MetricsLayer::from_option(None))
                .route("/api/v1/hotels", web::get().to(HttpResponse::Ok)),
        )
        .await;

        body_of(&app, "/api/v1/hotels").await;
        let response =
            test::call_service(&app, test::TestRequest::get().uri(ENDPOINT).to_request()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
