// handlers/public/auth.rs - POST /auth/* token acquisition
//
// Emails are lower-cased and trimmed before any lookup. Signup paths honour the
// EMAILS_ALLOWED allowlist.

use axum::extract::State;
use tracing::{error, info, warn};

use crate::auth::{generate_jwt, verify_login_code, verify_password, AuthError};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, ValidJson};
use crate::models::common::{IdResponse, MessageResponse};
use crate::models::users::{
    normalize_email, CodeLoginRequest, EmailLoginRequest, LoginCodeResponse, LoginResponse, PasswordLoginRequest, User,
};
use crate::services::accounts;
use crate::services::email::EmailManager;
use crate::state::AppState;

fn check_allowlist(state: &AppState, email: &str) -> Result<(), ApiError> {
    if state.config.security.emails_allowed.permits(email) {
        Ok(())
    } else {
        warn!("Sign up attempt outside the allowlist: {}", email);
        Err(ApiError::forbidden("Sign up"))
    }
}

/// Issue a token for an authenticated user.
pub(crate) fn login_response(state: &AppState, user_id: &str, email: &str) -> Result<LoginResponse, ApiError> {
    let (token, expires_at) = generate_jwt(
        user_id,
        &state.config.security.jwt_secret,
        state.config.security.token_expiry_days,
    )?;
    Ok(LoginResponse {
        id: user_id.to_string(),
        email: email.to_string(),
        token,
        expires_at,
    })
}

fn login_code_failure(email: &str, e: impl std::fmt::Display) -> ApiError {
    error!("Error requesting login code for {}: {}", email, e);
    ApiError::internal(format!(
        "An error occurred while requesting the login code. Please try again later.{}",
        e
    ))
}

/// POST /auth/login-code - email a one-time code, creating the account on first use
pub async fn login_code(
    State(state): State<AppState>,
    ValidJson { body, .. }: ValidJson<EmailLoginRequest>,
) -> ApiResult<MessageResponse> {
    let email = normalize_email(&body.email);
    check_allowlist(&state, &email)?;

    let mailer = EmailManager::new(state.http.clone(), &state.config);
    accounts::sign_up_or_login(&state.db, Some(&mailer), &email, state.config.security.login_code_expiry_minutes)
        .await
        .map_err(|e| login_code_failure(&email, e))?;

    Ok(ApiResponse::created(MessageResponse::new("Check your inbox")))
}

/// POST /auth/instant-login-code - return the code in the response; dev and test only
pub async fn instant_login_code(
    State(state): State<AppState>,
    ValidJson { body, .. }: ValidJson<EmailLoginRequest>,
) -> ApiResult<LoginCodeResponse> {
    if !state.config.environment.is_dev_or_test() {
        return Err(ApiError::forbidden(
            "Instant login code is only available in development environments.",
        ));
    }

    let email = normalize_email(&body.email);
    let login_code = accounts::sign_up_or_login(&state.db, None, &email, state.config.security.login_code_expiry_minutes)
        .await
        .map_err(|e| login_code_failure(&email, e))?;

    warn!("User {} is getting an instant login code on {:?}", email, state.config.environment);
    Ok(ApiResponse::created(LoginCodeResponse { login_code }))
}

/// POST /auth/verify-login-code - trade a valid code for a token. The code is single use.
pub async fn verify_code(
    State(state): State<AppState>,
    ValidJson { body, .. }: ValidJson<CodeLoginRequest>,
) -> ApiResult<LoginResponse> {
    let email = normalize_email(&body.email);
    let invalid = || ApiError::unauthorized("Invalid email or login code");

    let user = accounts::find_user_by_email(&state.db, &email)
        .await
        .map_err(|e| ApiError::internal(format!("An error occurred while logging in. Please try again later.{}", e)))?
        .ok_or_else(invalid)?;

    let User {
        login_code_hash: Some(hash),
        login_code_salt: Some(salt),
        login_code_expires: Some(expires),
        ..
    } = &user
    else {
        return Err(invalid());
    };

    verify_login_code(body.login_code.trim(), hash, salt, *expires)?;

    accounts::clear_login_code(&state.db, &user.id)
        .await
        .map_err(|e| ApiError::internal(format!("An error occurred while logging in. Please try again later.{}", e)))?;

    info!("User {} logged in with a login code", user.id);
    Ok(ApiResponse::success(login_response(&state, &user.id, &email)?))
}

/// POST /auth/password-signup - create an account with a password
pub async fn password_signup(
    State(state): State<AppState>,
    ValidJson { body, .. }: ValidJson<PasswordLoginRequest>,
) -> ApiResult<IdResponse> {
    let email = normalize_email(&body.email);
    check_allowlist(&state, &email)?;

    let existing = accounts::find_user_by_email(&state.db, &email).await.map_err(|e| {
        ApiError::internal(format!("An error occurred while signing up with password. Please try again later.{}", e))
    })?;
    if existing.is_some() {
        return Err(ApiError::conflict("User with this email already exists"));
    }

    let result = async {
        let user = accounts::create_initial_user(&state.db, &email).await?;
        accounts::set_password(&state.db, &user.id, body.password.trim()).await?;
        EmailManager::new(state.http.clone(), &state.config)
            .send_signup_notification(&email)
            .await?;
        Ok::<_, accounts::AccountError>(user.id)
    }
    .await;

    match result {
        Ok(id) => Ok(ApiResponse::created(IdResponse { id })),
        Err(e) => {
            error!("Error during password signup {}: {}", email, e);
            if let Err(rollback) = accounts::delete_account_by_email(&state.db, &email).await {
                error!("Failed to roll back signup of {}: {}", email, rollback);
            }
            Err(ApiError::internal(format!(
                "An error occurred while signing up with password. Please try again later.{}",
                e
            )))
        }
    }
}

/// POST /auth/password-login
pub async fn password_login(
    State(state): State<AppState>,
    ValidJson { body, .. }: ValidJson<PasswordLoginRequest>,
) -> ApiResult<LoginResponse> {
    let email = normalize_email(&body.email);
    let invalid = || ApiError::unauthorized("Invalid email or password");

    let user = accounts::find_user_by_email(&state.db, &email)
        .await
        .map_err(|e| {
            error!("Error fetching user {}: {}", email, e);
            ApiError::internal(format!("An error occurred while logging in. Please try again later.{}", e))
        })?
        .ok_or_else(invalid)?;

    let (Some(hash), Some(salt)) = (&user.password_hash, &user.password_salt) else {
        return Err(invalid());
    };

    verify_password(body.password.trim(), hash, salt).map_err(|e| match e {
        AuthError::InvalidPassword => invalid(),
        other => ApiError::from(other),
    })?;

    Ok(ApiResponse::success(login_response(&state, &user.id, &email)?))
}
