//! API route configuration.

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::server::handlers;
use crate::server::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/stock/:symbol", get(handlers::get_stock))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::services::quote_service::tests::StubSource;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use std::sync::atomic::Ordering;
    use tower::ServiceExt;

    fn test_app(source: Arc<StubSource>) -> Router {
        let state = Arc::new(AppState::with_source(AppConfig::default(), source));
        create_router(state)
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health_check() {
        let (status, body) = get_json(test_app(Arc::new(StubSource::new(vec![]))), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_stock_returns_envelope() {
        let app = test_app(Arc::new(StubSource::new(vec!["TCS"])));
        let (status, body) = get_json(app, "/stock/tcs").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["source"], "NSE");
        assert_eq!(body["data"]["symbol"], "TCS");
        assert_eq!(body["data"]["latestPrice"], 100.0);
        assert!(body["data"]["dayHigh"].is_null());
    }

    #[tokio::test]
    async fn test_repeat_request_uses_cache() {
        let source = Arc::new(StubSource::new(vec!["INFY"]));
        let app = test_app(source.clone());

        let (first, _) = get_json(app.clone(), "/stock/INFY").await;
        let (second, _) = get_json(app, "/stock/infy").await;

        assert_eq!(first, StatusCode::OK);
        assert_eq!(second, StatusCode::OK);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unknown_symbol_is_bad_request() {
        let app = test_app(Arc::new(StubSource::new(vec![])));
        let (status, body) = get_json(app, "/stock/NOPE").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["detail"], "Invalid NSE symbol: NOPE");
    }

    #[tokio::test]
    async fn test_upstream_failure_is_bad_request() {
        let app = test_app(Arc::new(StubSource::failing()));
        let (status, body) = get_json(app, "/stock/TCS").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().contains("503"));
    }
}
