//! Signup, login, and token verification handlers

use super::types::{LoginResponse, SignupResponse, VerifyResponse};
use crate::auth::{AuthError, Claims, JwtService, LoginRequest, SignupRequest};
use crate::AppState;
use axum::{extract::State, http::StatusCode, response::Json};
use tracing::info;

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "Auth",
    summary = "Register",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = SignupResponse),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), AuthError> {
    state.users.register(request)?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "User registered successfully".to_string(),
        }),
    ))
}

/// Log in and receive a bearer token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    summary = "Log in",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    let user = state.users.authenticate(&request)?;

    let claims = Claims::for_user(&user.email, &user.first_name, &user.last_name, &user.role);
    let token = JwtService::generate_token(&claims)?;

    info!(email = %user.email, "user logged in");

    Ok(Json(LoginResponse {
        token,
        user: user.to_user_info(),
    }))
}

/// Verify a bearer token and return its account
#[utoipa::path(
    get,
    path = "/api/auth/verify",
    tag = "Auth",
    summary = "Verify token",
    responses(
        (status = 200, description = "Token is valid", body = VerifyResponse),
        (status = 401, description = "Invalid or expired token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn verify(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<VerifyResponse>, AuthError> {
    let user = state.users.get(&claims.sub).ok_or(AuthError::UserNotFound)?;

    Ok(Json(VerifyResponse {
        user: user.to_user_info(),
    }))
}
