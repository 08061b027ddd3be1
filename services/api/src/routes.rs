use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use hireboard::store::UnitOfWork;
use hireboard::{api_router, ServiceContext};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_api_routes<U>(context: Arc<ServiceContext<U>>) -> axum::Router
where
    U: UnitOfWork + 'static,
{
    api_router(context)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use hireboard::pagination::PageLimits;
    use hireboard::principal::PRINCIPAL_HEADER;
    use hireboard::store::MemoryStore;
    use tower::ServiceExt;

    fn router() -> axum::Router {
        let store = crate::infra::build_store(None).expect("bundled fixture");
        let context = Arc::new(ServiceContext::new(Arc::new(store), PageLimits::default()));
        with_api_routes::<MemoryStore>(context)
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn api_routes_are_mounted_next_to_health() {
        let response = router()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/recruitment/applications?status=ACCEPTED")
                    .header(PRINCIPAL_HEADER, "1")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("body");
        let payload: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(payload["posts"]["content"][0]["post_id"], json!(11));
    }

    #[tokio::test]
    async fn health_route_responds() {
        let response = router()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);
    }
}
