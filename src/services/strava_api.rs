// services/strava_api.rs - Strava REST client (athlete, activity pages, latlng streams)

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use super::UpstreamError;
use crate::models::strava::{Coords, StravaAthlete, StravaSummaryActivity};

const PAGE_SIZE: u32 = 200;

/// The slice of Strava the route sync needs.
#[async_trait]
pub trait StravaSource: Send + Sync {
    async fn get_athlete(&self) -> Result<StravaAthlete, UpstreamError>;

    /// Every activity, optionally only those starting after `after` (epoch seconds).
    async fn get_all_activities(&self, after: Option<i64>) -> Result<Vec<StravaSummaryActivity>, UpstreamError>;

    /// GPS track of one activity; `None` when Strava has no latlng stream for it.
    async fn get_latlng_stream(&self, activity_id: i64) -> Result<Option<Vec<Coords>>, UpstreamError>;
}

#[derive(Debug, Deserialize)]
struct StreamSet {
    #[serde(default)]
    latlng: Option<Stream>,
}

#[derive(Debug, Deserialize)]
struct Stream {
    #[serde(default)]
    data: Vec<Coords>,
}

impl StreamSet {
    fn into_route(self) -> Option<Vec<Coords>> {
        self.latlng.map(|s| s.data).filter(|d| !d.is_empty())
    }
}

pub struct StravaApi {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl StravaApi {
    pub fn new(http: reqwest::Client, base_url: &str, access_token: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
        }
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T, UpstreamError> {
        Ok(self
            .http
            .get(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.access_token)
            .query(query)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?)
    }
}

#[async_trait]
impl StravaSource for StravaApi {
    async fn get_athlete(&self) -> Result<StravaAthlete, UpstreamError> {
        self.get("/athlete", &[]).await
    }

    async fn get_all_activities(&self, after: Option<i64>) -> Result<Vec<StravaSummaryActivity>, UpstreamError> {
        let mut activities = Vec::new();
        let mut page = 1u32;

        loop {
            let mut query = vec![("page", page.to_string()), ("per_page", PAGE_SIZE.to_string())];
            if let Some(after) = after {
                query.push(("after", after.to_string()));
            }

            let batch: Vec<StravaSummaryActivity> = self.get("/athlete/activities", &query).await?;
            if batch.is_empty() {
                break;
            }
            info!("Fetched page {} with {} activities", page, batch.len());
            activities.extend(batch);
            page += 1;
        }

        Ok(activities)
    }

    async fn get_latlng_stream(&self, activity_id: i64) -> Result<Option<Vec<Coords>>, UpstreamError> {
        let path = format!("/activities/{}/streams", activity_id);
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.access_token)
            .query(&[("keys", "latlng"), ("key_by_type", "true")])
            .send()
            .await?;

        // Manual activities have no streams at all
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let streams: StreamSet = response.error_for_status()?.json().await?;
        Ok(streams.into_route())
    }
}
