//! OpenAPI documentation

use crate::auth::{LoginRequest, SignupRequest, UserInfo};
use crate::handlers;
use crate::handlers::types::{
    ErrorResponse, HealthResponse, LoginResponse, QueryRequest, QueryResponse, SignupResponse,
    VerifyResponse,
};
use axum::response::Json;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "CampusAI API",
        description = "Question-answering assistant for Northgate University"
    ),
    paths(
        handlers::query::handle_query,
        handlers::auth::signup,
        handlers::auth::login,
        handlers::auth::verify,
        handlers::health::health_check,
    ),
    components(schemas(
        QueryRequest,
        QueryResponse,
        ErrorResponse,
        SignupRequest,
        SignupResponse,
        LoginRequest,
        LoginResponse,
        VerifyResponse,
        UserInfo,
        HealthResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Assistant", description = "Assistant queries"),
        (name = "Auth", description = "Account management"),
        (name = "Health", description = "Service health")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Serve the OpenAPI document as JSON
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
