//! REST API handlers for the onboarding dashboard
//!
//! These handlers use the shared OnboardingService.

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use super::service::{OnboardingService, SupplierComparison};
use crate::metrics::Comparison;
use crate::models::IndicatorValues;

// ============================================================================
// Response Types (JSON-serializable versions)
// ============================================================================

#[derive(Serialize)]
pub struct OverallMetricsResponse {
    pub differences: IndicatorValues,
    pub current_metrics: IndicatorValues,
    pub previous_metrics: IndicatorValues,
}

impl From<Comparison> for OverallMetricsResponse {
    fn from(c: Comparison) -> Self {
        Self {
            differences: c.differences,
            current_metrics: c.current.means,
            previous_metrics: c.previous.means,
        }
    }
}

#[derive(Serialize)]
pub struct SupplierRowResponse {
    pub supplier: String,
    pub total_onboarding: usize,
    pub overall_tat_diff: Option<f64>,
    pub xws_activation_diff: Option<f64>,
    pub system_activation_diff: Option<f64>,
    pub xws_to_idv_diff: Option<f64>,
    pub idv_to_system_diff: Option<f64>,
    pub current_overall_tat: Option<f64>,
    pub previous_overall_tat: Option<f64>,
    pub current_xws_activation: Option<f64>,
    pub previous_xws_activation: Option<f64>,
    pub current_system_activation: Option<f64>,
    pub previous_system_activation: Option<f64>,
    pub current_xws_to_idv: Option<f64>,
    pub previous_xws_to_idv: Option<f64>,
    pub current_idv_to_system: Option<f64>,
    pub previous_idv_to_system: Option<f64>,
}

impl From<SupplierComparison> for SupplierRowResponse {
    fn from(s: SupplierComparison) -> Self {
        let diff = s.comparison.differences;
        let cur = s.comparison.current.means;
        let prev = s.comparison.previous.means;
        Self {
            supplier: s.supplier,
            total_onboarding: s.total_onboarding,
            overall_tat_diff: diff.overall_tat,
            xws_activation_diff: diff.xws_activation,
            system_activation_diff: diff.system_activation,
            xws_to_idv_diff: diff.xws_to_idv,
            idv_to_system_diff: diff.idv_to_system,
            current_overall_tat: cur.overall_tat,
            previous_overall_tat: prev.overall_tat,
            current_xws_activation: cur.xws_activation,
            previous_xws_activation: prev.xws_activation,
            current_system_activation: cur.system_activation,
            previous_system_activation: prev.system_activation,
            current_xws_to_idv: cur.xws_to_idv,
            previous_xws_to_idv: prev.xws_to_idv,
            current_idv_to_system: cur.idv_to_system,
            previous_idv_to_system: prev.idv_to_system,
        }
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn internal_error(e: anyhow::Error) -> ApiError {
    tracing::error!("Request failed: {:#}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

pub type AppState = Arc<OnboardingService>;

const DASHBOARD_HTML: &str = include_str!("../../static/index.html");

/// GET /
pub async fn index() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

/// GET /api/v1/health
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

/// GET /get_suppliers
pub async fn get_suppliers(
    State(service): State<AppState>,
) -> Result<Json<Vec<String>>, ApiError> {
    service.get_suppliers().await.map(Json).map_err(internal_error)
}

/// GET /get_overall_metrics
pub async fn get_overall_metrics(
    State(service): State<AppState>,
) -> Result<Json<OverallMetricsResponse>, ApiError> {
    match service.get_overall_metrics().await {
        Ok(Some(comparison)) => Ok(Json(OverallMetricsResponse::from(comparison))),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Not enough data to compare".to_string(),
            }),
        )),
        Err(e) => Err(internal_error(e)),
    }
}

/// GET /get_all_suppliers_data
pub async fn get_all_suppliers_data(
    State(service): State<AppState>,
) -> Result<Json<Vec<SupplierRowResponse>>, ApiError> {
    match service.get_all_suppliers_data().await {
        Ok(rows) => Ok(Json(rows.into_iter().map(SupplierRowResponse::from).collect())),
        Err(e) => Err(internal_error(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_internal_error_is_500_with_message() {
        let (status, Json(body)) = internal_error(anyhow!("boom"));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "boom");
    }

    #[test]
    fn test_internal_error_differs_from_not_enough_data() {
        let (status, Json(body)) = internal_error(anyhow!("Not enough data to compare"));
        assert_ne!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"error": "Not enough data to compare"})
        );
    }
}
