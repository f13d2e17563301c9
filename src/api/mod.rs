//! API module for the onboarding dashboard
//!
//! Serves the dashboard page and the JSON routes it polls.

pub mod handlers;
pub mod service;

pub use service::OnboardingService;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Routes served by the dashboard backend, in the order the banner lists them
pub const ROUTES: &[(&str, &str)] = &[
    ("/", "Dashboard page"),
    ("/get_suppliers", "Supplier names"),
    ("/get_overall_metrics", "Week-over-week comparison"),
    ("/get_all_suppliers_data", "Per-supplier comparison table"),
    ("/api/v1/health", "Health check"),
];

pub fn create_rest_router(service: Arc<OnboardingService>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index))
        .route("/get_suppliers", get(handlers::get_suppliers))
        .route("/get_overall_metrics", get(handlers::get_overall_metrics))
        .route("/get_all_suppliers_data", get(handlers::get_all_suppliers_data))
        .route("/api/v1/health", get(handlers::health))
        // State and middleware
        .with_state(service)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use chrono::NaiveDate;
    use serde_json::Value;
    use std::io::Write;
    use std::path::Path;
    use tempfile::NamedTempFile;
    use tower::ServiceExt;

    const HEADER: &str = "supplier_name,onboard_date_v2,cw_num,sla_end_to_end_exclude_weekend1,wo_adv_std_exclude_weekend,complaince_activation_exclude_weekend,xws_activation_to_idv,xws_idv_to_system_activation";

    fn fixture(rows: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        writeln!(file, "{}", HEADER).unwrap();
        for row in rows {
            writeln!(file, "{}", row).unwrap();
        }
        file
    }

    fn router_for(path: &Path) -> Router {
        let today = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        let config = ServiceConfig::new(path).with_as_of(today);
        create_rest_router(Arc::new(OnboardingService::new(config)))
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
    async fn test_overall_metrics_shape() {
        let file = fixture(&[
            "Acme,13/10/2026,A1,5.0,2.0,,,",
            "Acme,06/10/2026,A0,7.0,3.0,,,",
        ]);
        let (status, body) = get_json(router_for(file.path()), "/get_overall_metrics").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["current_metrics"]["overall_tat"], 5.0);
        assert_eq!(body["previous_metrics"]["overall_tat"], 7.0);
        assert_eq!(body["differences"]["overall_tat"], -2.0);
        assert_eq!(body["differences"]["xws_activation"], -1.0);
        assert!(body["differences"]["idv_to_system"].is_null());
    }

    #[tokio::test]
    async fn test_overall_metrics_not_enough_data() {
        let file = fixture(&["Acme,13/10/2026,A1,5.0,2.0,,,"]);
        let (status, body) = get_json(router_for(file.path()), "/get_overall_metrics").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not enough data to compare");
    }

    #[tokio::test]
    async fn test_supplier_rows_shape() {
        let file = fixture(&[
            "Acme,13/10/2026,A,5.0,,,,",
            "Acme,14/10/2026,A,7.0,,,,",
            "Acme,15/10/2026,B,9.0,,,,",
            "Globex,13/10/2026,G,1.0,,,,",
        ]);
        let (status, body) = get_json(router_for(file.path()), "/get_all_suppliers_data").await;

        assert_eq!(status, StatusCode::OK);
        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["supplier"], "Acme");
        assert_eq!(rows[0]["total_onboarding"], 2);
        assert_eq!(rows[0]["current_overall_tat"], 7.0);
        assert!(rows[0]["previous_overall_tat"].is_null());
        assert!(rows[0]["overall_tat_diff"].is_null());
        assert_eq!(rows[1]["supplier"], "Globex");
    }

    #[tokio::test]
    async fn test_suppliers_and_health() {
        let file = fixture(&["Acme,13/10/2026,A,5.0,,,,", "Globex,bad-date,G,1.0,,,,"]);

        let (status, body) = get_json(router_for(file.path()), "/get_suppliers").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!(["Acme", "Globex"]));

        let (status, body) = get_json(router_for(file.path()), "/api/v1/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_missing_dataset_serves_empty_lists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nothing-here.csv");

        let (status, body) = get_json(router_for(&path), "/get_suppliers").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!([]));

        let (status, _) = get_json(router_for(&path), "/get_overall_metrics").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
