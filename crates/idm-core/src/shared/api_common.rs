//! Common API types and utilities

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::usecase::UseCaseError;

/// Standard API error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    pub error: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&UseCaseError> for ApiError {
    fn from(err: &UseCaseError) -> Self {
        let details = if err.details().is_empty() {
            None
        } else {
            serde_json::to_value(err.details()).ok()
        };
        Self {
            error: err.code().to_string(),
            message: err.message().to_string(),
            details,
        }
    }
}

/// Acknowledgement for commands that return no payload
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            status: "OK".to_string(),
        }
    }
}

impl IntoResponse for UseCaseError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ApiError::from(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::details;

    #[test]
    fn test_error_body() {
        let err = UseCaseError::not_found_with_details(
            "ENTRY_NOT_FOUND",
            "no such entry",
            details! { "dataKey" => "dob" },
        );
        let json = serde_json::to_value(ApiError::from(&err)).unwrap();
        assert_eq!(json["error"], "ENTRY_NOT_FOUND");
        assert_eq!(json["message"], "no such entry");
        assert_eq!(json["details"]["dataKey"], "dob");

        let err = UseCaseError::validation("INCORRECT_ARGUMENTS", "bad");
        let json = serde_json::to_value(ApiError::from(&err)).unwrap();
        assert!(json.get("details").is_none());
    }

    #[test]
    fn test_error_status_mapping() {
        let response = UseCaseError::authorization("INSTITUTION_MISMATCH", "no").into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = UseCaseError::conflict("PERSON_EXISTS", "taken").into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
