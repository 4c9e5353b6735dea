// services/deepl.rs - text translation through DeepL

use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::UpstreamError;
use crate::models::proxy::{DeeplLanguage, Translation};

#[derive(Debug, Deserialize)]
struct DeeplResponse {
    #[serde(default)]
    translations: Vec<DeeplTranslation>,
}

#[derive(Debug, Deserialize)]
struct DeeplTranslation {
    text: String,
}

pub struct DeeplApi<'a> {
    http: &'a reqwest::Client,
    translate_url: &'a str,
    api_key: &'a str,
}

impl<'a> DeeplApi<'a> {
    pub fn new(http: &'a reqwest::Client, translate_url: &'a str, api_key: &'a str) -> Self {
        Self { http, translate_url, api_key }
    }

    pub async fn translate_text(
        &self,
        text: &str,
        source_lang: DeeplLanguage,
        target_lang: DeeplLanguage,
    ) -> Result<Translation, UpstreamError> {
        let body = json!({
            "text": [text],
            "target_lang": target_lang.target_code(),
            "source_lang": source_lang.source_code(),
        });

        let response = self
            .http
            .post(self.translate_url)
            .header(reqwest::header::AUTHORIZATION, format!("DeepL-Auth-Key {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!("Error during DeepL API call: {} - {}", status.as_u16(), text);
            return Err(UpstreamError::unexpected(format!("DeepL responded with {}", status)));
        }

        let data: DeeplResponse = response.json().await?;
        Ok(Translation {
            original: text.to_string(),
            translation: join_translations(data),
            source_lang,
            target_lang,
        })
    }
}

fn join_translations(data: DeeplResponse) -> String {
    data.translations
        .into_iter()
        .map(|t| t.text)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_all_segments() {
        let data: DeeplResponse = serde_json::from_value(serde_json::json!({
            "translations": [
                { "detected_source_language": "HU", "text": "Hello" },
                { "detected_source_language": "HU", "text": "world" }
            ]
        }))
        .unwrap();
        assert_eq!(join_translations(data), "Hello world");

        let empty: DeeplResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(join_translations(empty), "");
    }
}
