// services/email.rs - transactional email through the HTTP mailer endpoint
//
// The mailer takes `{apiKey, subject, to, html, attachments?}` as JSON. In the test
// environment nothing leaves the process; the message is only logged.

use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::config::AppConfig;

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("Failed to send email to {to}: {source}")]
    Send {
        to: String,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct EmailAttachment {
    pub content: String,
    pub filename: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MailerPayload<'a> {
    api_key: &'a str,
    subject: &'a str,
    to: &'a str,
    html: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    attachments: Option<&'a [EmailAttachment]>,
}

#[derive(Clone)]
pub struct EmailManager {
    http: reqwest::Client,
    url: String,
    api_key: String,
    notification_email: String,
    login_code_expiry_minutes: i64,
    enabled: bool,
}

impl EmailManager {
    pub fn new(http: reqwest::Client, config: &AppConfig) -> Self {
        Self {
            http,
            url: config.mailer.url.clone(),
            api_key: config.mailer.api_key.clone(),
            notification_email: config.mailer.notification_email.clone(),
            login_code_expiry_minutes: config.security.login_code_expiry_minutes,
            enabled: config.environment.sends_email(),
        }
    }

    pub async fn send_signup_notification(&self, email: &str) -> Result<(), MailerError> {
        let html = templates::signup_notification(email);
        self.send("A user signed up to PK-Central", &self.notification_email, &html, &[])
            .await
    }

    pub async fn send_login_code(&self, email: &str, login_code: &str) -> Result<(), MailerError> {
        let subject = format!("{} - Log in to PK-Central", login_code);
        let html = templates::login_code(login_code, self.login_code_expiry_minutes);
        self.send(&subject, email, &html, &[]).await
    }

    pub async fn send_data_backup(&self, name: &str, email: &str, files: &[EmailAttachment]) -> Result<(), MailerError> {
        let subject = backup_subject(&Utc::now().format("%Y-%m-%d").to_string());
        let html = templates::data_backup(name);
        self.send(&subject, email, &html, files).await
    }

    async fn send(&self, subject: &str, to: &str, html: &str, attachments: &[EmailAttachment]) -> Result<(), MailerError> {
        if !self.enabled {
            info!("Email sending disabled, skipping '{}' to {}", subject, to);
            return Ok(());
        }

        let payload = MailerPayload {
            api_key: &self.api_key,
            subject,
            to,
            html,
            attachments: (!attachments.is_empty()).then_some(attachments),
        };

        // The mail host rejects non-browser user agents
        self.http
            .post(&self.url)
            .header(reqwest::header::USER_AGENT, "Mozilla/5.0")
            .timeout(Duration::from_secs(10))
            .json(&payload)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|source| MailerError::Send { to: to.to_string(), source })?;

        info!("Sent '{}' to {}", subject, to);
        Ok(())
    }
}

fn backup_subject(date: &str) -> String {
    format!("Data backup for PK-Central {}", date)
}

pub mod templates {
    pub fn login_code(login_code: &str, expires_in_minutes: i64) -> String {
        format!(
            "<h3>Hello!</h3>\n\
             <p>Please use the code below to log in, it expires in {expires_in_minutes} minutes.</p>\n\
             <h1>{login_code}</h1>\n"
        )
    }

    pub fn signup_notification(email: &str) -> String {
        format!(
            "<h3>Hey Peter!</h3>\n\
             <p>A user just signed up to PK-Central:</p>\n\
             <p>Email: {email}</p>\n"
        )
    }

    pub fn data_backup(name: &str) -> String {
        format!(
            "<h3>Hey {name}!</h3>\n\
             <p>As requested, please find attached the backup files of your data.</p>\n"
        )
    }
}
