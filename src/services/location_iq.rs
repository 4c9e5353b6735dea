// services/location_iq.rs - reverse geocoding through LocationIQ

use serde::Deserialize;

use super::UpstreamError;

#[derive(Debug, Default, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub town: Option<String>,
    #[serde(default)]
    pub village: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
}

impl Address {
    /// First non-empty of city, town, village.
    pub fn settlement(&self) -> String {
        [&self.city, &self.town, &self.village]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
            .cloned()
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
pub struct ReverseResponse {
    #[serde(default)]
    pub address: Option<Address>,
}

pub struct LocationIqApi<'a> {
    http: &'a reqwest::Client,
    reverse_url: &'a str,
    api_key: &'a str,
}

impl<'a> LocationIqApi<'a> {
    pub fn new(http: &'a reqwest::Client, reverse_url: &'a str, api_key: &'a str) -> Self {
        Self { http, reverse_url, api_key }
    }

    pub async fn reverse_geocode(&self, lat: f64, lon: f64) -> Result<ReverseResponse, UpstreamError> {
        let response = self
            .http
            .get(self.reverse_url)
            .query(&[
                ("key", self.api_key.to_string()),
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("format", "json".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn settlement_falls_back_to_town_and_village() {
        let address: Address = serde_json::from_value(json!({ "town": "Szentendre", "country_code": "hu" })).unwrap();
        assert_eq!(address.settlement(), "Szentendre");

        let address: Address = serde_json::from_value(json!({ "city": "", "village": "Tihany" })).unwrap();
        assert_eq!(address.settlement(), "Tihany");

        assert_eq!(Address::default().settlement(), "");
    }

    #[test]
    fn missing_address_is_none() {
        let response: ReverseResponse = serde_json::from_value(json!({ "error": "Unable to geocode" })).unwrap();
        assert!(response.address.is_none());
    }
}
