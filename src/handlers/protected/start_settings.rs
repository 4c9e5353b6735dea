// handlers/protected/start_settings.rs - GET/PUT /start-settings

use axum::{extract::State, Extension};
use serde_json::{json, Value};
use tracing::error;

use crate::database::{DbCollection, DatabaseManager};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser, ValidJson};
use crate::models::start_settings::{StartSettings, StartSettingsDoc, StartSettingsRequest};
use crate::state::AppState;

fn decode(doc: Value) -> Result<StartSettingsDoc, String> {
    serde_json::from_value(doc).map_err(|e| e.to_string())
}

async fn load(db: &DatabaseManager, user_id: &str) -> Result<Option<StartSettingsDoc>, String> {
    db.collection(DbCollection::StartSettings)
        .find_one(json!({ "userId": user_id }))
        .await
        .map_err(|e| e.to_string())?
        .map(decode)
        .transpose()
}

/// GET /start-settings - the stored settings plus the frontend's third-party keys
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<StartSettings> {
    let settings = load(&state.db, &user.id)
        .await
        .map_err(|e| {
            error!("Error retrieving Start Settings for user {}: {}", user.id, e);
            ApiError::internal(format!("An error occurred while retrieving the Start Settings{}", e))
        })?
        .ok_or_else(|| {
            error!("Start Settings not found for user {}", user.id);
            ApiError::not_found("Start Settings")
        })?;

    Ok(ApiResponse::success(StartSettings::with_keys(settings, &state.config.integrations)))
}

/// PUT /start-settings - sets the fields sent with a non-null value
pub async fn put(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    request: ValidJson<StartSettingsRequest>,
) -> ApiResult<StartSettings> {
    let mut patch = request.patch()?;
    patch.retain(|_, v| !v.is_null());

    let failure = |e: String| {
        error!("Error updating Start Settings for user {}: {}", user.id, e);
        ApiError::internal(format!("An error occurred while updating the Start Settings{}", e))
    };

    let updated = state
        .db
        .collection(DbCollection::StartSettings)
        .update_one(json!({ "userId": user.id }), patch)
        .await
        .map_err(|e| failure(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Start Settings"))?;

    let settings = decode(updated).map_err(failure)?;
    Ok(ApiResponse::success(StartSettings::with_keys(settings, &state.config.integrations)))
}
