//! Request and response types for the HTTP API

use crate::auth::UserInfo;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Assistant query request
#[derive(Debug, Deserialize, ToSchema)]
pub struct QueryRequest {
    /// The question to ask the assistant
    pub query: String,
}

/// Assistant query response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QueryResponse {
    /// The assistant's answer
    pub response: String,
}

/// Generic error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Signup confirmation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SignupResponse {
    pub message: String,
}

/// Login response with bearer token
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

/// Token verification response
#[derive(Debug, Serialize, ToSchema)]
pub struct VerifyResponse {
    pub user: UserInfo,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: String,
}
