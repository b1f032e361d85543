//! Health Check Endpoint
//!
//! `/health` reports whether the ledger answers reads.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

use idm_ledger::LedgerStore;

const HEALTH_KEY: &str = "__health_check";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    Up,
    Down,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: HealthStatus,

    /// Ledger backend name
    pub ledger: String,

    pub timestamp: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Clone)]
pub struct HealthState {
    pub ledger: Arc<dyn LedgerStore>,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Ledger reachable", body = HealthResponse),
        (status = 503, description = "Ledger unavailable", body = HealthResponse)
    )
)]
pub async fn get_health(State(state): State<HealthState>) -> Response {
    let (status, message) = match state.ledger.get(HEALTH_KEY).await {
        Ok(_) => (HealthStatus::Up, None),
        Err(e) => {
            warn!(error = %e, "Ledger health check failed");
            (HealthStatus::Down, Some(e.to_string()))
        }
    };

    let response = HealthResponse {
        status,
        ledger: state.ledger.backend_name().to_string(),
        timestamp: Utc::now(),
        message,
    };

    let status_code = match status {
        HealthStatus::Up => StatusCode::OK,
        HealthStatus::Down => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(response)).into_response()
}

/// Create the health router. Serves `/health`; merge it at the root.
pub fn health_router(ledger: Arc<dyn LedgerStore>) -> Router {
    Router::new()
        .route("/health", get(get_health))
        .with_state(HealthState { ledger })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_status_serialization() {
        assert_eq!(serde_json::to_string(&HealthStatus::Up).unwrap(), "\"UP\"");
        assert_eq!(serde_json::to_string(&HealthStatus::Down).unwrap(), "\"DOWN\"");
    }

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: HealthStatus::Up,
            ledger: "memory".to_string(),
            timestamp: Utc::now(),
            message: None,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"UP\""));
        assert!(json.contains("\"ledger\":\"memory\""));
        assert!(!json.contains("message"));
    }
}
