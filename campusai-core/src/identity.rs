//! Authenticated caller identity
//!
//! Resolved once per request from a verified bearer credential. The pipeline
//! only reads it: the first name personalizes the system prompt, the email
//! identifies the caller in logs.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
}

impl Identity {
    pub fn new(
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            role: role.into(),
        }
    }
}
