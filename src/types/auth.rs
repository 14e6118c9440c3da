//! Authentication request and response types.
//!
//! Field names follow the backend's camelCase JSON.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Email/password credentials for login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl LoginRequest {
    /// Create a login request.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Signup uses the same shape as login.
pub type SignupRequest = LoginRequest;

/// Profile of the signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Backend user identifier.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Account email.
    #[serde(default)]
    pub email: String,
    /// Role used to scope task listings.
    #[serde(default)]
    pub role: String,
}

/// Successful login or signup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// New access token.
    pub access_token: String,
    /// New refresh token.
    pub refresh_token: String,
    /// The signed-in user.
    pub user: UserProfile,
    /// Project selected after login.
    #[serde(default)]
    pub default_project_id: Option<String>,
    /// Project name to project id.
    #[serde(default)]
    pub projects: HashMap<String, String>,
}

/// Successful token refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    /// New access token.
    pub access_token: String,
    /// New refresh token.
    pub refresh_token: String,
}

/// Password change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    /// The password currently set.
    pub current_password: String,
    /// The replacement password.
    pub new_password: String,
}

impl ChangePasswordRequest {
    /// Create a password change request.
    pub fn new(current_password: impl Into<String>, new_password: impl Into<String>) -> Self {
        Self {
            current_password: current_password.into(),
            new_password: new_password.into(),
        }
    }
}
