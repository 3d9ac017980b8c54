//! Unified error handling
//!
//! One taxonomy for the whole pipeline so the web layer can map every
//! outcome to a response without inspecting error strings.

use thiserror::Error;
use tracing::{error, warn};

pub type CoreResult<T> = Result<T, AssistantError>;

/// Main error type for the CampusAI system
#[derive(Error, Debug)]
pub enum AssistantError {
    /// Missing or invalid bearer credential. Surfaces to the caller as an
    /// assistant-styled refusal, never as a bare HTTP error.
    #[error("access denied: {message}")]
    AccessDenied { message: String },

    /// Malformed request from the caller (empty query, missing fields).
    #[error("bad request: {message}")]
    BadRequest { message: String },

    /// A local resource (embedding index) is unavailable. Non-fatal: the
    /// orchestrator decides whether to serve with reduced context.
    #[error("service degraded: {message}")]
    ServiceDegraded { message: String },

    /// An external service (completion, embedding, course catalog) failed.
    #[error("upstream {service} failure: {message}")]
    Upstream { service: String, message: String },

    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AssistantError {
    pub fn access_denied(message: impl Into<String>) -> Self {
        Self::AccessDenied {
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn degraded(message: impl Into<String>) -> Self {
        Self::ServiceDegraded {
            message: message.into(),
        }
    }

    pub fn upstream(service: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Upstream {
            service: service.into(),
            message: message.to_string(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether the error is the caller's fault rather than the service's.
    pub fn is_caller_fault(&self) -> bool {
        matches!(
            self,
            AssistantError::AccessDenied { .. } | AssistantError::BadRequest { .. }
        )
    }

    /// Log the error with the appropriate level. Degraded and upstream
    /// conditions are expected operational states, not programming errors.
    pub fn log(&self) {
        match self {
            AssistantError::ServiceDegraded { .. } | AssistantError::Upstream { .. } => {
                warn!(error = %self, "degraded or upstream error");
            }
            AssistantError::AccessDenied { .. } | AssistantError::BadRequest { .. } => {
                warn!(error = %self, "request rejected");
            }
            _ => {
                error!(error = %self, "internal error");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_fault_classification() {
        assert!(AssistantError::access_denied("no token").is_caller_fault());
        assert!(AssistantError::bad_request("empty query").is_caller_fault());
        assert!(!AssistantError::upstream("completion", "timeout").is_caller_fault());
        assert!(!AssistantError::degraded("index missing").is_caller_fault());
    }
}
