use serde::{Deserialize, Serialize};

use super::validation::{Validate, Validator};
use crate::config::IntegrationsConfig;

/// Stored per-user start page settings, one document per user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSettingsDoc {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub shortcut_icon_base_url: Option<String>,
    #[serde(default)]
    pub birthdays_url: Option<String>,
    #[serde(default)]
    pub strava_redirect_uri: Option<String>,
}

/// Settings as returned to the client, together with the keys the frontend needs for
/// third-party widgets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSettings {
    #[serde(flatten)]
    pub settings: StartSettingsDoc,
    pub open_weather_api_key: Option<String>,
    pub location_iq_api_key: Option<String>,
    pub unsplash_api_key: Option<String>,
    pub strava_client_id: Option<String>,
    pub strava_client_secret: Option<String>,
}

impl StartSettings {
    pub fn with_keys(settings: StartSettingsDoc, keys: &IntegrationsConfig) -> Self {
        Self {
            settings,
            open_weather_api_key: non_empty(&keys.open_weather_api_key),
            location_iq_api_key: non_empty(&keys.location_iq_api_key),
            unsplash_api_key: non_empty(&keys.unsplash_api_key),
            strava_client_id: non_empty(&keys.strava_client_id),
            strava_client_secret: non_empty(&keys.strava_client_secret),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSettingsRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "shortcut_icon_base_url")]
    pub shortcut_icon_base_url: Option<String>,
    #[serde(default, alias = "birthdays_url")]
    pub birthdays_url: Option<String>,
    #[serde(default, alias = "strava_redirect_uri")]
    pub strava_redirect_uri: Option<String>,
}

impl Validate for StartSettingsRequest {
    fn validate(&self, v: &mut Validator) {
        v.opt_http_url("shortcutIconBaseUrl", self.shortcut_icon_base_url.as_deref());
        v.opt_http_url("birthdaysUrl", self.birthdays_url.as_deref());
        v.opt_http_url("stravaRedirectUri", self.strava_redirect_uri.as_deref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::validation::validate;
    use serde_json::json;

    #[test]
    fn keys_are_flattened_next_to_settings() {
        let keys = IntegrationsConfig {
            open_weather_api_key: "ow".to_string(),
            unsplash_api_key: String::new(),
            ..crate::config::AppConfig::test().integrations
        };
        let doc: StartSettingsDoc = serde_json::from_value(json!({
            "id": "s1",
            "userId": "u1",
            "name": "Kim",
            "shortcutIconBaseUrl": null,
            "stravaRedirectUri": null
        }))
        .unwrap();
        let out = serde_json::to_value(StartSettings::with_keys(doc, &keys)).unwrap();
        assert_eq!(out["id"], "s1");
        assert_eq!(out["name"], "Kim");
        assert_eq!(out["openWeatherApiKey"], "ow");
        assert!(out["birthdaysUrl"].is_null());
        assert!(out["unsplashApiKey"].is_null());
        assert!(out.get("userId").is_none());
    }

    #[test]
    fn urls_are_checked_only_when_present() {
        let body = StartSettingsRequest {
            name: Some("Kim".to_string()),
            ..Default::default()
        };
        assert!(validate(&body).is_ok());

        let body = StartSettingsRequest {
            birthdays_url: Some("calendar".to_string()),
            ..Default::default()
        };
        let errors = validate(&body).unwrap_err();
        assert_eq!(errors[0].loc, vec!["body", "birthdaysUrl"]);
    }
}
