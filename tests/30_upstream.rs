mod common;

use std::sync::{Arc, Mutex};

use anyhow::Result;
use axum::{
    extract::{Path, Query},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;

use pk_central::config::AppConfig;
use pk_central::models::proxy::DeeplLanguage;
use pk_central::services::deepl::DeeplApi;
use pk_central::services::email::EmailManager;
use pk_central::services::gemini::GeminiApi;
use pk_central::services::location_iq::LocationIqApi;
use pk_central::services::strava_api::{StravaApi, StravaSource};

#[tokio::test]
async fn location_iq_sends_key_and_coordinates() -> Result<()> {
    let seen = Arc::new(Mutex::new(HashMap::new()));
    let recorder = seen.clone();
    let stub = Router::new().route(
        "/v1/reverse",
        get(move |Query(params): Query<HashMap<String, String>>| {
            let recorder = recorder.clone();
            async move {
                *recorder.lock().unwrap() = params;
                Json(json!({ "address": { "town": "Hallstatt", "country_code": "at" } }))
            }
        }),
    );
    let base = common::spawn_stub(stub).await?;
    let url = format!("{}/v1/reverse", base);

    let http = reqwest::Client::new();
    let response = LocationIqApi::new(&http, &url, "liq-key").reverse_geocode(47.56, 13.64).await?;

    let address = response.address.expect("address");
    assert_eq!(address.settlement(), "Hallstatt");
    let params = seen.lock().unwrap().clone();
    assert_eq!(params.get("key").map(String::as_str), Some("liq-key"));
    assert_eq!(params.get("lat").map(String::as_str), Some("47.56"));
    assert_eq!(params.get("format").map(String::as_str), Some("json"));
    Ok(())
}

#[tokio::test]
async fn deepl_joins_translations_and_maps_target_codes() -> Result<()> {
    let seen = Arc::new(Mutex::new(Value::Null));
    let recorder = seen.clone();
    let stub = Router::new().route(
        "/v2/translate",
        post(move |headers: HeaderMap, Json(body): Json<Value>| {
            let recorder = recorder.clone();
            async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                *recorder.lock().unwrap() = json!({ "auth": auth, "body": body });
                Json(json!({ "translations": [{ "text": "Good" }, { "text": "morning" }] }))
            }
        }),
    );
    let base = common::spawn_stub(stub).await?;
    let url = format!("{}/v2/translate", base);

    let http = reqwest::Client::new();
    let translation = DeeplApi::new(&http, &url, "dl-key")
        .translate_text("Guten Morgen", DeeplLanguage::De, DeeplLanguage::En)
        .await?;

    assert_eq!(translation.translation, "Good morning");
    assert_eq!(translation.original, "Guten Morgen");
    let seen = seen.lock().unwrap().clone();
    assert_eq!(seen["auth"], "DeepL-Auth-Key dl-key");
    assert_eq!(seen["body"]["target_lang"], "EN-US");
    assert_eq!(seen["body"]["source_lang"], "DE");
    assert_eq!(seen["body"]["text"], json!(["Guten Morgen"]));
    Ok(())
}

#[tokio::test]
async fn deepl_error_status_is_an_error() -> Result<()> {
    let stub = Router::new().route("/v2/translate", post(|| async { StatusCode::FORBIDDEN }));
    let base = common::spawn_stub(stub).await?;
    let url = format!("{}/v2/translate", base);

    let http = reqwest::Client::new();
    let result = DeeplApi::new(&http, &url, "bad")
        .translate_text("Hallo", DeeplLanguage::De, DeeplLanguage::En)
        .await;
    assert!(result.is_err());
    Ok(())
}

#[tokio::test]
async fn gemini_answer_is_reduced_to_the_json_object() -> Result<()> {
    let stub = Router::new().route(
        "/models/:call",
        post(|Path(call): Path<String>| async move {
            assert_eq!(call, "test-model:generateContent");
            Json(json!({
                "candidates": [{
                    "content": { "parts": [
                        { "text": "Sure! Here it is:\n```json\n{\"iata\": \"VIE\", " },
                        { "text": "\"lat\": 48.11}\n```" }
                    ] }
                }]
            }))
        }),
    );
    let base = common::spawn_stub(stub).await?;

    let http = reqwest::Client::new();
    let data = GeminiApi::new(&http, &base, "g-key", "test-model")
        .generate_json("airport VIE")
        .await?;

    assert_eq!(data.get("iata"), Some(&json!("VIE")));
    assert_eq!(data.get("lat"), Some(&json!(48.11)));
    Ok(())
}

#[tokio::test]
async fn strava_pages_until_empty_and_tolerates_missing_streams() -> Result<()> {
    let stub = Router::new()
        .route(
            "/athlete/activities",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                let page = params.get("page").cloned().unwrap_or_default();
                let body = match page.as_str() {
                    "1" => json!([
                        { "id": 1, "name": "Morning Walk", "type": "Walk", "start_date": "2024-05-01T06:00:00Z", "distance": 3100.0 },
                        { "id": 2, "name": "Commute", "type": "Ride", "start_date": "2024-05-01T08:00:00Z", "distance": 8000.0 }
                    ]),
                    "2" => json!([
                        { "id": 3, "name": "Evening Run", "type": "Run", "start_date": "2024-05-02T18:00:00Z", "distance": 5000.0 }
                    ]),
                    _ => json!([]),
                };
                Json(body)
            }),
        )
        .route(
            "/activities/:id/streams",
            get(|Path(id): Path<i64>| async move {
                if id == 2 {
                    return Err(StatusCode::NOT_FOUND);
                }
                Ok(Json(json!({ "latlng": { "data": [[48.2, 16.37], [48.21, 16.38]] } })))
            }),
        );
    let base = common::spawn_stub(stub).await?;

    let api = StravaApi::new(reqwest::Client::new(), &base, "strava-token");
    let activities = api.get_all_activities(None).await?;
    assert_eq!(activities.iter().map(|a| a.id).collect::<Vec<_>>(), vec![1, 2, 3]);

    assert_eq!(api.get_latlng_stream(1).await?, Some(vec![(48.2, 16.37), (48.21, 16.38)]));
    assert_eq!(api.get_latlng_stream(2).await?, None);
    Ok(())
}

#[tokio::test]
async fn login_code_mail_is_posted_outside_test_environment() -> Result<()> {
    let seen = Arc::new(Mutex::new(Value::Null));
    let recorder = seen.clone();
    let stub = Router::new().route(
        "/send",
        post(move |Json(body): Json<Value>| {
            let recorder = recorder.clone();
            async move {
                *recorder.lock().unwrap() = body;
                StatusCode::OK
            }
        }),
    );
    let base = common::spawn_stub(stub).await?;

    let mut config = AppConfig::development();
    config.mailer.url = format!("{}/send", base);
    config.mailer.api_key = "mail-key".to_string();

    EmailManager::new(reqwest::Client::new(), &config)
        .send_login_code("kim@example.com", "ABC123")
        .await?;

    let body = seen.lock().unwrap().clone();
    assert_eq!(body["apiKey"], "mail-key");
    assert_eq!(body["to"], "kim@example.com");
    assert!(body["subject"].as_str().unwrap_or_default().starts_with("ABC123"));
    assert!(body["html"].as_str().unwrap_or_default().contains("ABC123"));
    Ok(())
}

#[tokio::test]
async fn mail_is_suppressed_in_test_environment() -> Result<()> {
    let mut config = AppConfig::test();
    // Nothing listens here; sending would fail.
    config.mailer.url = "http://127.0.0.1:9/send".to_string();

    EmailManager::new(reqwest::Client::new(), &config)
        .send_signup_notification("kim@example.com")
        .await?;
    Ok(())
}
