//! Chaincode HTTP API
//!
//! - `POST /api/invoke/{function}` - run a mutating command
//! - `POST /api/query/{function}` - run a read-only query
//!
//! An `x-correlation-id` request header is carried into the command's
//! execution context and echoed on the invoke response.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use super::chaincode::{IdentityChaincode, QueryPayload};
use crate::shared::api_common::{ApiError, StatusResponse};
use crate::usecase::{DomainEvent, UseCaseError};

pub const CORRELATION_HEADER: &str = "x-correlation-id";

/// Positional arguments for a chaincode function
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ChaincodeRequest {
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Clone)]
pub struct ChaincodeState {
    pub chaincode: Arc<IdentityChaincode>,
}

fn malformed_body(rejection: JsonRejection) -> UseCaseError {
    UseCaseError::validation("MALFORMED_REQUEST", rejection.body_text())
}

/// Run a mutating command
#[utoipa::path(
    post,
    path = "/invoke/{function}",
    tag = "chaincode",
    operation_id = "postApiInvoke",
    params(
        (
            "function" = String,
            Path,
            description = "register, mergeData, approve, requestAccess, grantAccess or revokeAccess"
        ),
        ("x-correlation-id" = Option<String>, Header, description = "Upstream correlation id")
    ),
    request_body = ChaincodeRequest,
    responses(
        (status = 200, description = "Command committed", body = StatusResponse),
        (status = 400, description = "Bad arguments or payload", body = ApiError),
        (status = 401, description = "Invalid credentials", body = ApiError),
        (status = 403, description = "Not the approving institution", body = ApiError),
        (status = 404, description = "Unknown person or data key", body = ApiError),
        (status = 409, description = "Person already registered", body = ApiError)
    )
)]
pub async fn invoke_function(
    State(state): State<ChaincodeState>,
    Path(function): Path<String>,
    headers: HeaderMap,
    body: Result<Json<ChaincodeRequest>, JsonRejection>,
) -> Result<Response, UseCaseError> {
    let Json(request) = body.map_err(malformed_body)?;
    let upstream = headers.get(CORRELATION_HEADER).and_then(|v| v.to_str().ok());
    let event = state
        .chaincode
        .invoke_correlated(&function, &request.args, upstream)
        .await?;

    let mut response = Json(StatusResponse::ok()).into_response();
    if let Ok(value) = HeaderValue::from_str(event.correlation_id()) {
        response.headers_mut().insert(CORRELATION_HEADER, value);
    }
    Ok(response)
}

/// Run a read-only query
#[utoipa::path(
    post,
    path = "/query/{function}",
    tag = "chaincode",
    operation_id = "postApiQuery",
    params(
        (
            "function" = String,
            Path,
            description = "listPendingApprovals, getPerson or getPersonForRequestor"
        )
    ),
    request_body = ChaincodeRequest,
    responses(
        (status = 200, description = "Pending approvals, a person, or a projection"),
        (status = 400, description = "Bad arguments", body = ApiError),
        (status = 401, description = "Invalid credentials", body = ApiError),
        (status = 404, description = "Person not found", body = ApiError)
    )
)]
pub async fn query_function(
    State(state): State<ChaincodeState>,
    Path(function): Path<String>,
    body: Result<Json<ChaincodeRequest>, JsonRejection>,
) -> Result<Response, UseCaseError> {
    let Json(request) = body.map_err(malformed_body)?;
    match state.chaincode.query(&function, &request.args).await? {
        QueryPayload::Json(value) => Ok(Json(value).into_response()),
        QueryPayload::NotFound => {
            let body = ApiError {
                error: "PERSON_NOT_FOUND".to_string(),
                message: "No person stored under the requested id".to_string(),
                details: None,
            };
            Ok((StatusCode::NOT_FOUND, Json(body)).into_response())
        }
    }
}

/// Create the chaincode router, nested under `/api`.
pub fn chaincode_router(chaincode: Arc<IdentityChaincode>) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(invoke_function))
        .routes(routes!(query_function))
        .with_state(ChaincodeState { chaincode })
}
