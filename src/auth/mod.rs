pub mod hashing;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use hashing::{hash_secret, new_login_code, verify_login_code, verify_password, HashedSecret, LoginCode};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: String,
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT secret")]
    InvalidSecret,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Login code has expired")]
    LoginCodeExpired,

    #[error("Invalid login code")]
    InvalidLoginCode,

    #[error("Invalid password")]
    InvalidPassword,

    #[error("Stored credential is malformed: {0}")]
    MalformedCredential(String),
}

/// Issues an HS256 token for `user_id` that expires `expiry_days` from now.
pub fn generate_jwt(user_id: &str, secret: &str, expiry_days: i64) -> Result<(String, DateTime<Utc>), AuthError> {
    if secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    let expires_at = Utc::now() + Duration::days(expiry_days);
    let claims = Claims {
        user_id: user_id.to_string(),
        exp: expires_at.timestamp(),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::TokenGeneration(e.to_string()))?;

    Ok((token, expires_at))
}

/// Validate JWT token and extract claims
pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::new(Algorithm::HS256);

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken(e.to_string()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issues_and_verifies_token() {
        let (token, expires_at) = generate_jwt("user-1", "secret", 7).unwrap();
        let claims = verify_jwt(&token, "secret").unwrap();
        assert_eq!(claims.user_id, "user-1");
        assert_eq!(claims.exp, expires_at.timestamp());
        assert!(expires_at > Utc::now() + Duration::days(6));
    }

    #[test]
    fn claims_use_snake_case_user_id() {
        let claims = Claims { user_id: "user-1".to_string(), exp: 1 };
        assert_eq!(serde_json::to_value(&claims).unwrap(), serde_json::json!({ "user_id": "user-1", "exp": 1 }));
    }

    #[test]
    fn rejects_wrong_secret() {
        let (token, _) = generate_jwt("user-1", "secret", 1).unwrap();
        assert!(matches!(verify_jwt(&token, "other"), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn rejects_garbage_token() {
        assert!(matches!(verify_jwt("not-a-token", "secret"), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn reports_expired_token() {
        let claims = Claims {
            user_id: "user-1".to_string(),
            exp: (Utc::now() - Duration::days(2)).timestamp(),
        };
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"secret")).unwrap();
        assert!(matches!(verify_jwt(&token, "secret"), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn empty_secret_is_refused() {
        assert!(matches!(generate_jwt("user-1", "", 1), Err(AuthError::InvalidSecret)));
    }
}
