#![cfg(feature = "web")]
//! Web handler integration tests.
//!
//! Tests cover:
//! - Forecast page renders the rounded prediction and disclaimer
//! - JSON endpoint returns symbol and forecast
//! - Pipeline failures map to statuses and a generic failure page
//! - Slow providers hit the request timeout (504)
//! - Concurrent requests each run their own fetch and fit
//! - Unknown paths return 404

mod common;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use nextclose::adapters::web::{AppState, build_router};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use common::*;

fn create_test_app(port: MockPricePort) -> Router {
    create_test_app_with_timeout(port, Duration::from_secs(30))
}

fn create_test_app_with_timeout(port: MockPricePort, request_timeout: Duration) -> Router {
    build_router(AppState {
        price_port: Arc::new(port),
        request_timeout,
    })
}

async fn get(app: Router, uri: &str) -> (StatusCode, Option<String>, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, content_type, String::from_utf8_lossy(&body).into_owned())
}

mod forecast_page_tests {
    use super::*;

    #[tokio::test]
    async fn renders_forecast_with_ok_status() {
        let app = create_test_app(MockPricePort::new().with_closes(&linear_closes(40)));

        let (status, content_type, html) = get(app, "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(content_type.unwrap().starts_with("text/html"));
        assert!(html.contains("<title>S&amp;P 500 Forecast</title>"));
        assert!(html.contains("next trading day closing price forecast"));
        assert!(html.contains("Predicted close: 140.00"));
        assert!(html.contains("not financial advice"));
    }

    #[tokio::test]
    async fn each_request_fetches_again() {
        let port = Arc::new(MockPricePort::new().with_closes(&linear_closes(30)));
        let app = build_router(AppState {
            price_port: port.clone(),
            request_timeout: Duration::from_secs(30),
        });

        let (first, _, _) = get(app.clone(), "/").await;
        let (second, _, _) = get(app, "/").await;

        assert_eq!(first, StatusCode::OK);
        assert_eq!(second, StatusCode::OK);
        assert_eq!(port.calls(), 2);
    }
}

mod concurrency_tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_requests_run_independently() {
        let port = Arc::new(
            MockPricePort::new()
                .with_closes(&linear_closes(40))
                .with_delay(Duration::from_millis(100)),
        );
        let app = build_router(AppState {
            price_port: port.clone(),
            request_timeout: Duration::from_secs(30),
        });

        let ((page_status, _, html), (api_status, _, body)) =
            tokio::join!(get(app.clone(), "/"), get(app, "/api/forecast"));

        assert_eq!(page_status, StatusCode::OK);
        assert_eq!(api_status, StatusCode::OK);
        assert!(html.contains("Predicted close: 140.00"));
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert!((json["forecast"].as_f64().unwrap() - 140.0).abs() < 0.05);
        assert_eq!(port.calls(), 2);
    }
}

mod api_tests {
    use super::*;

    #[tokio::test]
    async fn returns_symbol_and_forecast() {
        let app = create_test_app(MockPricePort::new().with_closes(&[4500.0; 20]));

        let (status, content_type, body) = get(app, "/api/forecast").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("application/json"));
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["symbol"], "^GSPC");
        assert_eq!(json["forecast"].as_f64(), Some(4500.0));
    }

    #[tokio::test]
    async fn errors_are_json_too() {
        let app = create_test_app(MockPricePort::new().with_error("HTTP 429"));

        let (status, _, body) = get(app, "/api/forecast").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["status"], 502);
        assert!(json["error"].is_string());
        assert!(!body.contains("429"));
    }
}

mod error_tests {
    use super::*;

    #[tokio::test]
    async fn provider_failure_is_bad_gateway() {
        let app = create_test_app(MockPricePort::new().with_error("dns lookup failed"));

        let (status, _, html) = get(app, "/").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(html.contains("Error 502"));
        assert!(!html.contains("dns lookup failed"));
    }

    #[tokio::test]
    async fn no_data_is_service_unavailable() {
        let app = create_test_app(MockPricePort::new());
        let (status, _, html) = get(app, "/").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(html.contains("Error 503"));
    }

    #[tokio::test]
    async fn short_history_is_unprocessable() {
        let app = create_test_app(MockPricePort::new().with_closes(&linear_closes(5)));
        let (status, _, _) = get(app, "/").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn slow_provider_times_out() {
        let port = MockPricePort::new()
            .with_closes(&linear_closes(30))
            .with_delay(Duration::from_millis(500));
        let app = create_test_app_with_timeout(port, Duration::from_millis(50));

        let (status, _, html) = get(app, "/").await;

        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert!(html.contains("Error 504"));
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let app = create_test_app(MockPricePort::new().with_closes(&linear_closes(30)));
        let (status, _, html) = get(app, "/nonexistent").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(html.contains("Error 404"));
    }
}
