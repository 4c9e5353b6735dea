// services/mod.rs - outbound integrations and the multi-step operations handlers delegate to

pub mod accounts;     // User bootstrap and login-code issuing
pub mod country_data; // ISO country code -> name
pub mod data_backup;  // Collect a user's documents as JSON attachments
pub mod deepl;        // DeepL translation
pub mod email;        // HTTP mailer and templates
pub mod gemini;       // Gemini airport lookup
pub mod location_iq;  // LocationIQ reverse geocoding
pub mod reddit_api;   // Reddit OAuth + listings
pub mod routemap;     // Heatmap points from stored routes
pub mod strava_api;   // Strava REST client
pub mod strava_sync;  // Incremental route import

use thiserror::Error;

/// Failure talking to a third-party API.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Unexpected(String),
}

impl UpstreamError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        UpstreamError::Unexpected(message.into())
    }
}
