// services/gemini.rs - Gemini text generation with Google Search grounding

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::error;

use super::UpstreamError;

// Non-greedy, so only flat objects survive extraction
static JSON_OBJECT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*?\}").unwrap());

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.iter().filter_map(|p| p.text.as_deref()).collect())
            .unwrap_or_default()
    }
}

pub struct GeminiApi<'a> {
    http: &'a reqwest::Client,
    base_url: &'a str,
    api_key: &'a str,
    model: &'a str,
}

impl<'a> GeminiApi<'a> {
    pub fn new(http: &'a reqwest::Client, base_url: &'a str, api_key: &'a str, model: &'a str) -> Self {
        Self { http, base_url, api_key, model }
    }

    pub async fn generate_json(&self, prompt: &str) -> Result<Map<String, Value>, UpstreamError> {
        let url = format!("{}/models/{}:generateContent", self.base_url.trim_end_matches('/'), self.model);
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "tools": [{ "google_search": {} }],
        });

        let response: GenerateResponse = self
            .http
            .post(url)
            .query(&[("key", self.api_key)])
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let text = response.text();
        if text.is_empty() {
            error!("No response text received from the Gemini API");
            return Err(UpstreamError::unexpected("No response text received from the Gemini API."));
        }

        extract_json(&text)
    }
}

pub fn extract_json(text: &str) -> Result<Map<String, Value>, UpstreamError> {
    let Some(found) = JSON_OBJECT.find(text) else {
        error!("No valid JSON found in the response: {}", text);
        return Err(UpstreamError::unexpected("No valid JSON found in the response."));
    };

    serde_json::from_str(found.as_str()).map_err(|e| {
        error!("Invalid JSON format: {}", e);
        UpstreamError::unexpected(format!("Invalid JSON format: {}", e))
    })
}

pub fn airport_data_prompt(iata_code: &str) -> String {
    format!(
        r#"
Please act as a travel professional and look for information about the airport that has IATA code: {iata_code}.
Make sure the IATA code exactly matches the airport you are looking for. Only return the information if the airports IATA code is exactly {iata_code}.

You should find the following information about the airport:
- The ICAO code of the airport
- Coordinates as latitude and longitude of the airport in number format with decimals
- The official name of the airport in English if possible
- The city the airport is located at, using its English name if possible. If there is no specific city then the nearest city or the region/state is also accepted.
- The English name of the country the airport is located in.

Make sure to respond in JSON format, for example:
{{ "iata": "BUD", "icao": "LHBP", "name": "Liszt Ferenc International Airport", "city": "Budapest", "country": "Hungary", "lat": 19.223311, "lng": 41.1231123 }}
"#
    )
}
