mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::json;

use pk_central::config::{EmailsAllowed, Environment};

#[tokio::test]
async fn root_describes_the_service() -> Result<()> {
    let state = common::offline_state();
    let (status, body) = common::send(&state, Method::GET, "/", None, None).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "PK-Central API");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    Ok(())
}

#[tokio::test]
async fn health_reports_degraded_without_database() -> Result<()> {
    let state = common::offline_state();
    let (status, body) = common::send(&state, Method::GET, "/health", None, None).await?;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["detail"], "Database unavailable");
    assert_eq!(body["status"], "degraded");
    assert!(body["databaseError"].is_string());
    Ok(())
}

#[tokio::test]
async fn instant_login_code_is_refused_in_production() -> Result<()> {
    let mut config = common::offline_config();
    config.environment = Environment::Production;
    let state = common::state_for(config);

    let (status, body) = common::send(
        &state,
        Method::POST,
        "/auth/instant-login-code",
        None,
        Some(json!({ "email": "someone@example.com" })),
    )
    .await?;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["detail"],
        "Forbidden operation: Instant login code is only available in development environments."
    );
    Ok(())
}

#[tokio::test]
async fn login_code_outside_allowlist_is_forbidden() -> Result<()> {
    let mut config = common::offline_config();
    config.security.emails_allowed = EmailsAllowed::parse("kim@example.com");
    let state = common::state_for(config);

    let (status, body) = common::send(
        &state,
        Method::POST,
        "/auth/login-code",
        None,
        Some(json!({ "email": "stranger@example.com" })),
    )
    .await?;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["detail"], "Forbidden operation: Sign up");
    Ok(())
}

#[tokio::test]
async fn invalid_email_is_rejected_with_field_location() -> Result<()> {
    let state = common::offline_state();
    let (status, body) = common::send(
        &state,
        Method::POST,
        "/auth/password-login",
        None,
        Some(json!({ "email": "not-an-email", "password": "secret" })),
    )
    .await?;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"][0]["loc"], json!(["body", "email"]));
    Ok(())
}

#[tokio::test]
async fn missing_field_is_unprocessable() -> Result<()> {
    let state = common::offline_state();
    let (status, body) = common::send(
        &state,
        Method::POST,
        "/auth/verify-login-code",
        None,
        Some(json!({ "email": "someone@example.com" })),
    )
    .await?;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_array());
    Ok(())
}
