//! JWT authentication implementation based on Axum official examples

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use campusai_core::Identity;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// JWT signing keys - initialized from environment variable
static KEYS: LazyLock<Keys> = LazyLock::new(|| {
    let secret = std::env::var("JWT_SECRET")
        .unwrap_or_else(|_| "campusai-default-secret-change-in-production".to_string());
    Keys::new(secret.as_bytes())
});

/// JWT signing and verification keys
struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Keys {
    fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user email)
    pub sub: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    /// Issued at (timestamp)
    pub iat: i64,
    /// Expiration time (timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a signed-in user. Tokens expire after 24 hours.
    pub fn for_user(email: &str, first_name: &str, last_name: &str, role: &str) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(24);

        Self {
            sub: email.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            role: role.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }

    /// Convert claims to the pipeline identity.
    pub fn to_identity(&self) -> Identity {
        Identity::new(&self.sub, &self.first_name, &self.last_name, &self.role)
    }

    /// Check if token is expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    /// Extract and verify claims from request headers. The query handler
    /// uses this directly so an auth failure can become a chat-styled
    /// refusal instead of the extractor's 401.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, AuthError> {
        let auth_header = headers
            .get("authorization")
            .ok_or(AuthError::MissingAuthHeader)?
            .to_str()
            .map_err(|_| AuthError::InvalidToken)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidToken)?;

        JwtService::verify_token(token)
    }
}

/// JWT authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Missing credentials")]
    MissingCredentials,
    #[error("Email already registered")]
    EmailTaken,
    #[error("Token creation failed")]
    TokenCreation,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Missing authorization header")]
    MissingAuthHeader,
    #[error("User not found")]
    UserNotFound,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid email or password")
            }
            AuthError::MissingCredentials => {
                (StatusCode::BAD_REQUEST, "Missing required fields")
            }
            AuthError::EmailTaken => (StatusCode::CONFLICT, "Email already registered"),
            AuthError::TokenCreation => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to create authentication token",
            ),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token"),
            AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "Token has expired"),
            AuthError::MissingAuthHeader => {
                (StatusCode::UNAUTHORIZED, "Authorization header is required")
            }
            AuthError::UserNotFound => (StatusCode::UNAUTHORIZED, "User not found"),
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

/// JWT token utilities
pub struct JwtService;

impl JwtService {
    /// Generate a signed token for a user
    pub fn generate_token(claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::default(), claims, &KEYS.encoding).map_err(|e| {
            warn!("Failed to encode JWT token: {}", e);
            AuthError::TokenCreation
        })
    }

    /// Verify and decode token
    pub fn verify_token(token: &str) -> Result<Claims, AuthError> {
        let token_data =
            decode::<Claims>(token, &KEYS.decoding, &Validation::default()).map_err(|e| {
                debug!("Token verification failed: {}", e);
                AuthError::InvalidToken
            })?;

        let claims = token_data.claims;

        if claims.is_expired() {
            return Err(AuthError::TokenExpired);
        }

        Ok(claims)
    }
}

/// FromRequestParts implementation for Claims (JWT extraction)
impl<S> FromRequestParts<S> for Claims
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Claims::from_headers(&parts.headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn token_round_trip_preserves_identity() {
        let claims = Claims::for_user("maya@northgate.edu", "Maya", "Laurent", "student");
        let token = JwtService::generate_token(&claims).unwrap();

        let decoded = JwtService::verify_token(&token).unwrap();
        assert_eq!(decoded.sub, "maya@northgate.edu");
        assert_eq!(decoded.first_name, "Maya");
        assert_eq!(decoded.role, "student");

        let identity = decoded.to_identity();
        assert_eq!(identity.email, "maya@northgate.edu");
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(matches!(
            JwtService::verify_token("not-a-token"),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn missing_header_and_wrong_scheme_are_rejected() {
        let headers = HeaderMap::new();
        assert!(matches!(
            Claims::from_headers(&headers),
            Err(AuthError::MissingAuthHeader)
        ));

        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Basic abc123"));
        assert!(matches!(
            Claims::from_headers(&headers),
            Err(AuthError::InvalidToken)
        ));
    }
}
