//! Assistant query handler

use super::types::{ErrorResponse, QueryRequest, QueryResponse};
use crate::auth::Claims;
use crate::AppState;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use campusai_core::AssistantError;
use tracing::info;

/// Shown inside the chat bubble when the caller has no valid credential.
const SIGN_IN_REFUSAL: &str = "I apologize, but you need to sign in to use CampusAI.";

/// Handle an assistant query.
///
/// Auth failures are answered with HTTP 200 and a refusal message so the
/// failure renders inside the chat bubble like any other assistant turn.
/// The pipeline is never invoked for them.
#[utoipa::path(
    post,
    path = "/api/query",
    tag = "Assistant",
    summary = "Ask the assistant",
    description = "Ask a question about Northgate University",
    request_body = QueryRequest,
    responses(
        (status = 200, description = "Answer (or sign-in refusal)", body = QueryResponse),
        (status = 400, description = "Malformed request", body = ErrorResponse),
        (status = 500, description = "Answer generation failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn handle_query(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<QueryRequest>,
) -> Response {
    let claims = match Claims::from_headers(&headers) {
        Ok(claims) => claims,
        Err(e) => {
            info!(error = %e, "unauthenticated query, returning refusal");
            return Json(QueryResponse {
                response: SIGN_IN_REFUSAL.to_string(),
            })
            .into_response();
        }
    };

    let identity = claims.to_identity();
    info!(email = %identity.email, "processing query");

    match state.pipeline.answer(&identity, &request.query).await {
        Ok(answer) => Json(QueryResponse { response: answer }).into_response(),
        Err(e) => {
            e.log();
            match e {
                AssistantError::BadRequest { message } => (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse { error: message }),
                )
                    .into_response(),
                _ => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "Failed to generate a response".to_string(),
                    }),
                )
                    .into_response(),
            }
        }
    }
}
