// handlers/protected/proxy.rs - GET /proxy/location/city, POST /proxy/translate

use axum::extract::State;
use tracing::error;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, ValidJson, ValidQuery};
use crate::models::proxy::{CityLocation, CityQuery, Translation, TranslationRequest};
use crate::services::country_data::country_label;
use crate::services::deepl::DeeplApi;
use crate::services::location_iq::LocationIqApi;
use crate::state::AppState;

/// GET /proxy/location/city?lat=&lng= - nearest settlement and its country
pub async fn get_city(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<CityQuery>,
) -> ApiResult<CityLocation> {
    let integrations = &state.config.integrations;
    let api = LocationIqApi::new(&state.http, &integrations.location_reverse_url, &integrations.location_iq_api_key);

    let response = api.reverse_geocode(query.lat, query.lng).await.map_err(|e| {
        error!("Failed to get city location: {}", e);
        ApiError::internal(format!("Failed to retrieve city location:{}", e))
    })?;

    let Some(address) = response.address else {
        error!("Address not found for coordinates: {}, {}", query.lat, query.lng);
        return Err(ApiError::not_found("Location"));
    };

    let code = address.country_code.clone().unwrap_or_default();
    let country = country_label(&code);

    Ok(ApiResponse::success(CityLocation {
        city: address.settlement(),
        country,
        lat: query.lat,
        lng: query.lng,
    }))
}

/// POST /proxy/translate - DeepL between the supported languages
pub async fn post_translate(
    State(state): State<AppState>,
    ValidJson { body, .. }: ValidJson<TranslationRequest>,
) -> ApiResult<Translation> {
    let integrations = &state.config.integrations;
    let api = DeeplApi::new(&state.http, &integrations.deepl_translate_url, &integrations.deepl_api_key);

    let translation = api
        .translate_text(&body.text, body.source_lang, body.target_lang)
        .await
        .map_err(|e| {
            error!("Translation failed: {}", e);
            ApiError::internal(format!("Translation failed due to error:{}", e))
        })?;

    Ok(ApiResponse::success(translation))
}
