// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use serde_json::{json, Value};

/// One entry of a 422 response body: `{"loc": [...], "msg": "...", "type": "..."}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl FieldError {
    pub fn new(field: &str, msg: impl Into<String>, kind: &str) -> Self {
        let mut loc = vec!["body".to_string()];
        loc.extend(field.split('.').filter(|s| !s.is_empty()).map(str::to_string));
        Self {
            loc,
            msg: msg.into(),
            kind: kind.to_string(),
        }
    }

    pub fn query(field: &str, msg: impl Into<String>, kind: &str) -> Self {
        Self {
            loc: vec!["query".to_string(), field.to_string()],
            msg: msg.into(),
            kind: kind.to_string(),
        }
    }
}

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict
    Conflict(String),

    // 422 Unprocessable Entity
    UnprocessableEntity(Vec<FieldError>),

    // 500 Internal Server Error
    InternalServerError(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Unauthorized(_) => 401,
            ApiError::Forbidden(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::Conflict(_) => 409,
            ApiError::UnprocessableEntity(_) => 422,
            ApiError::InternalServerError(_) => 500,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> String {
        match self {
            ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::InternalServerError(msg) => msg.clone(),
            ApiError::UnprocessableEntity(errors) => errors
                .iter()
                .map(|e| format!("{}: {}", e.loc.join("."), e.msg))
                .collect::<Vec<_>>()
                .join("; "),
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::UnprocessableEntity(errors) => json!({ "detail": errors }),
            _ => json!({ "detail": self.message() }),
        }
    }
}

// Static constructor methods, each producing the prefixed detail string
impl ApiError {
    pub fn unauthorized(reason: impl Into<String>) -> Self {
        ApiError::Unauthorized(format!("Unauthorized: {}", reason.into()))
    }

    pub fn forbidden(operation: impl Into<String>) -> Self {
        ApiError::Forbidden(format!("Forbidden operation: {}", operation.into()))
    }

    /// Forbidden without naming the operation
    pub fn forbidden_bare() -> Self {
        ApiError::Forbidden("Forbidden".to_string())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        ApiError::NotFound(format!("Not Found: {}", resource.into()))
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(format!("Conflict: {}", message.into()))
    }

    pub fn unprocessable(errors: Vec<FieldError>) -> Self {
        ApiError::UnprocessableEntity(errors)
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        ApiError::InternalServerError(format!("Internal server error: {}", detail.into()))
    }
}

impl From<crate::database::DatabaseError> for ApiError {
    fn from(err: crate::database::DatabaseError) -> Self {
        tracing::error!("Database error: {}", err);
        ApiError::internal(err.to_string())
    }
}

impl From<crate::auth::AuthError> for ApiError {
    fn from(err: crate::auth::AuthError) -> Self {
        match err {
            crate::auth::AuthError::TokenExpired => ApiError::unauthorized("Token has expired"),
            crate::auth::AuthError::InvalidToken(_) => ApiError::unauthorized("Invalid token"),
            crate::auth::AuthError::LoginCodeExpired => ApiError::unauthorized("Login code has expired"),
            crate::auth::AuthError::InvalidLoginCode => ApiError::unauthorized("Invalid login code"),
            crate::auth::AuthError::InvalidPassword => ApiError::unauthorized("Invalid password"),
            other => ApiError::internal(other.to_string()),
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!("{} Error response: {}", status.as_u16(), self.message());
        } else {
            tracing::warn!("{} Error response: {}", status.as_u16(), self.message());
        }
        (status, Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_prefix_detail() {
        assert_eq!(ApiError::unauthorized("Invalid token").message(), "Unauthorized: Invalid token");
        assert_eq!(ApiError::not_found("Flight").message(), "Not Found: Flight");
        assert_eq!(ApiError::forbidden("Sign up").message(), "Forbidden operation: Sign up");
        assert!(ApiError::internal("boom").message().starts_with("Internal server error: "));
    }

    #[test]
    fn validation_body_is_a_detail_list() {
        let err = ApiError::unprocessable(vec![FieldError::new("links.0.url", "Input should be a valid URL", "url_parsing")]);
        assert_eq!(err.status_code(), 422);
        let body = err.to_json();
        assert_eq!(body["detail"][0]["loc"], json!(["body", "links", "0", "url"]));
        assert_eq!(body["detail"][0]["type"], "url_parsing");
    }

    #[test]
    fn plain_errors_use_detail_string() {
        let body = ApiError::conflict("User with this email already exists").to_json();
        assert!(body["detail"].as_str().unwrap().contains("User with this email already exists"));
    }
}
