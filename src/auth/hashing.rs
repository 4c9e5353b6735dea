// auth/hashing.rs - salted PBKDF2 for passwords and one-time login codes

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use rand::{thread_rng, Rng};
use sha2::Sha256;

use super::AuthError;

pub const PBKDF2_ROUNDS: u32 = 100_000;
const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;

/// Base64 encoded hash and the salt it was derived with
#[derive(Debug, Clone)]
pub struct HashedSecret {
    pub hash: String,
    pub salt: String,
}

/// A freshly issued login code. `code` is what gets emailed, only the hash is stored.
#[derive(Debug, Clone)]
pub struct LoginCode {
    pub code: String,
    pub hashed: HashedSecret,
    pub expires_at: DateTime<Utc>,
}

fn derive(raw: &str, salt: &[u8]) -> String {
    let mut out = [0u8; HASH_LEN];
    pbkdf2::pbkdf2_hmac::<Sha256>(raw.as_bytes(), salt, PBKDF2_ROUNDS, &mut out);
    STANDARD.encode(out)
}

/// Hash `raw` with a new random salt.
pub fn hash_secret(raw: &str) -> HashedSecret {
    let mut salt = [0u8; SALT_LEN];
    thread_rng().fill(&mut salt);
    HashedSecret {
        hash: derive(raw, &salt),
        salt: STANDARD.encode(salt),
    }
}

fn matches(raw: &str, hash: &str, salt: &str) -> Result<bool, AuthError> {
    let salt = STANDARD
        .decode(salt.as_bytes())
        .map_err(|e| AuthError::MalformedCredential(e.to_string()))?;
    Ok(derive(raw, &salt) == hash)
}

/// Random six digit code, valid for `expiry_minutes`.
pub fn new_login_code(expiry_minutes: i64) -> LoginCode {
    let code = thread_rng().gen_range(100_000..=999_999).to_string();
    let hashed = hash_secret(&code);
    LoginCode {
        code,
        hashed,
        expires_at: Utc::now() + Duration::minutes(expiry_minutes),
    }
}

/// Expiry is checked before the hash.
pub fn verify_login_code(raw: &str, hash: &str, salt: &str, expires_at: DateTime<Utc>) -> Result<(), AuthError> {
    if Utc::now() > expires_at {
        return Err(AuthError::LoginCodeExpired);
    }
    if !matches(raw, hash, salt)? {
        return Err(AuthError::InvalidLoginCode);
    }
    Ok(())
}

pub fn verify_password(raw: &str, hash: &str, salt: &str) -> Result<(), AuthError> {
    if !matches(raw, hash, salt)? {
        return Err(AuthError::InvalidPassword);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_round_trip() {
        let hashed = hash_secret("hunter2");
        assert!(verify_password("hunter2", &hashed.hash, &hashed.salt).is_ok());
        assert!(matches!(
            verify_password("hunter3", &hashed.hash, &hashed.salt),
            Err(AuthError::InvalidPassword)
        ));
    }

    #[test]
    fn salts_differ_per_record() {
        let a = hash_secret("same");
        let b = hash_secret("same");
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.hash, b.hash);
        assert_eq!(STANDARD.decode(&a.salt).unwrap().len(), SALT_LEN);
    }

    #[test]
    fn login_code_is_six_digits() {
        let login = new_login_code(15);
        assert_eq!(login.code.len(), 6);
        assert!(login.code.chars().all(|c| c.is_ascii_digit()));
        assert!(login.expires_at > Utc::now() + Duration::minutes(14));
        assert!(verify_login_code(&login.code, &login.hashed.hash, &login.hashed.salt, login.expires_at).is_ok());
    }

    #[test]
    fn wrong_login_code_is_rejected() {
        let login = new_login_code(15);
        let wrong = if login.code == "123456" { "654321" } else { "123456" };
        assert!(matches!(
            verify_login_code(wrong, &login.hashed.hash, &login.hashed.salt, login.expires_at),
            Err(AuthError::InvalidLoginCode)
        ));
    }

    #[test]
    fn expired_code_fails_before_hash_check() {
        let login = new_login_code(15);
        let past = Utc::now() - Duration::minutes(1);
        assert!(matches!(
            verify_login_code(&login.code, &login.hashed.hash, &login.hashed.salt, past),
            Err(AuthError::LoginCodeExpired)
        ));
    }

    #[test]
    fn malformed_salt_is_an_error() {
        assert!(matches!(
            verify_password("x", "hash", "***"),
            Err(AuthError::MalformedCredential(_))
        ));
    }
}
