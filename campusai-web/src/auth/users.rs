//! User management and authentication

use super::jwt::AuthError;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, info};
use utoipa::ToSchema;

/// User signup request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    /// "student", "applicant", or "staff"
    pub role: String,
}

/// User login request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public user information
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
}

/// Internal user data with password hash
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub password_hash: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl UserRecord {
    /// Create new user with hashed password
    pub fn new(request: SignupRequest) -> Result<Self, AuthError> {
        let password_hash = hash_password(&request.password)?;

        Ok(Self {
            email: request.email,
            first_name: request.first_name,
            last_name: request.last_name,
            role: request.role,
            password_hash,
            created_at: chrono::Utc::now(),
        })
    }

    /// Verify password
    pub fn verify_password(&self, password: &str) -> bool {
        verify_password(password, &self.password_hash).unwrap_or(false)
    }

    /// Convert to public user info
    pub fn to_user_info(&self) -> UserInfo {
        UserInfo {
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            role: self.role.clone(),
        }
    }
}

/// In-memory user store keyed by lowercased email. Accounts live for the
/// process lifetime; there is no persistence layer.
#[derive(Debug, Clone, Default)]
pub struct UserStore {
    users: Arc<RwLock<HashMap<String, UserRecord>>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register new user. Duplicate email is a conflict.
    pub fn register(&self, request: SignupRequest) -> Result<UserRecord, AuthError> {
        if request.email.is_empty()
            || request.password.is_empty()
            || request.first_name.is_empty()
            || request.last_name.is_empty()
            || request.role.is_empty()
        {
            debug!("Registration failed: missing fields");
            return Err(AuthError::MissingCredentials);
        }

        if request.password.len() < 6 {
            debug!("Registration failed: password too short");
            return Err(AuthError::InvalidCredentials);
        }

        let key = request.email.to_lowercase();
        let mut users = self.users.write().unwrap_or_else(|e| e.into_inner());

        if users.contains_key(&key) {
            debug!("Registration failed: email '{}' already exists", key);
            return Err(AuthError::EmailTaken);
        }

        let record = UserRecord::new(request)?;
        users.insert(key, record.clone());

        info!("Registered new user: {}", record.email);
        Ok(record)
    }

    /// Authenticate user by email and password
    pub fn authenticate(&self, request: &LoginRequest) -> Result<UserRecord, AuthError> {
        let users = self.users.read().unwrap_or_else(|e| e.into_inner());

        let user = users
            .get(&request.email.to_lowercase())
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.verify_password(&request.password) {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user.clone())
    }

    /// Look up a user by email
    pub fn get(&self, email: &str) -> Option<UserRecord> {
        let users = self.users.read().unwrap_or_else(|e| e.into_inner());
        users.get(&email.to_lowercase()).cloned()
    }
}

/// Hash password with Argon2
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::TokenCreation)
}

/// Verify password against hash
fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidToken)?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
