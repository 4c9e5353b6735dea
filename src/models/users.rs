use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{Validate, Validator};

/// Stored account document. Never returned to clients as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub login_code_hash: Option<String>,
    #[serde(default)]
    pub login_code_salt: Option<String>,
    #[serde(default)]
    pub login_code_expires: Option<DateTime<Utc>>,
    #[serde(default)]
    pub password_hash: Option<String>,
    #[serde(default)]
    pub password_salt: Option<String>,
}

impl User {
    pub fn new(id: String, email: String) -> Self {
        Self {
            id,
            email,
            created_at: Some(Utc::now()),
            login_code_hash: None,
            login_code_salt: None,
            login_code_expires: None,
            password_hash: None,
            password_salt: None,
        }
    }
}

/// Lower-cased, trimmed form used for lookups and storage.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailLoginRequest {
    pub email: String,
}

impl Validate for EmailLoginRequest {
    fn validate(&self, v: &mut Validator) {
        v.email("email", &self.email);
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PasswordLoginRequest {
    pub email: String,
    pub password: String,
}

impl Validate for PasswordLoginRequest {
    fn validate(&self, v: &mut Validator) {
        v.email("email", &self.email);
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeLoginRequest {
    pub email: String,
    #[serde(alias = "login_code")]
    pub login_code: String,
}

impl Validate for CodeLoginRequest {
    fn validate(&self, v: &mut Validator) {
        v.email("email", &self.email);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub id: String,
    pub email: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginCodeResponse {
    pub login_code: String,
}
