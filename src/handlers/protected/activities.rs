// handlers/protected/activities.rs - /activities: goals and cycling chores
//
// One config document per user. Chore edits are single UPDATE statements on its
// `chores` array.

use axum::{
    extract::{Path, State},
    Extension,
};
use serde_json::{json, Value};
use tracing::{error, info};
use uuid::Uuid;

use crate::database::{Collection, DbCollection};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser, ValidJson};
use crate::models::activities::{ActivitiesConfig, ChoreRequest, GoalsRequest};
use crate::state::AppState;

const CHORES: &str = "chores";

fn failure(action: &str, user_id: &str, e: impl std::fmt::Display) -> ApiError {
    error!("Error {} for user {}: {}", action, user_id, e);
    ApiError::internal(format!("An error occurred while {}: {}", action, e))
}

async fn load(collection: &Collection, user_id: &str) -> Result<Option<ActivitiesConfig>, String> {
    collection
        .find_one(json!({ "userId": user_id }))
        .await
        .map_err(|e| e.to_string())?
        .map(|doc| serde_json::from_value(doc).map_err(|e| e.to_string()))
        .transpose()
}

fn parse(doc: Value, action: &str, user_id: &str) -> Result<ActivitiesConfig, ApiError> {
    serde_json::from_value(doc).map_err(|e| failure(action, user_id, e))
}

/// GET /activities
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<ActivitiesConfig> {
    let collection = state.db.collection(DbCollection::Activities);
    let config = load(&collection, &user.id)
        .await
        .map_err(|e| failure("retrieving the activities config", &user.id, e))?
        .ok_or_else(|| ApiError::not_found("Activities config"))?;
    Ok(ApiResponse::success(config))
}

/// PATCH /activities/goals
pub async fn patch_goals(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    request: ValidJson<GoalsRequest>,
) -> ApiResult<ActivitiesConfig> {
    let patch = request.patch()?;
    let doc = state
        .db
        .collection(DbCollection::Activities)
        .update_one(json!({ "userId": user.id }), patch)
        .await
        .map_err(|e| failure("updating the activity goals", &user.id, e))?
        .ok_or_else(|| ApiError::not_found("Activity goals"))?;

    Ok(ApiResponse::success(parse(doc, "updating the activity goals", &user.id)?))
}

/// POST /activities/chores - 201 with the whole config
pub async fn post_chore(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidJson { body, .. }: ValidJson<ChoreRequest>,
) -> ApiResult<ActivitiesConfig> {
    let chore = body.into_chore(Uuid::new_v4().to_string());
    let item = serde_json::to_value(&chore).map_err(|e| failure("adding the chore", &user.id, e))?;
    info!("Adding chore {} for user {}", chore.id, user.id);

    let doc = state
        .db
        .collection(DbCollection::Activities)
        .push_one(json!({ "userId": user.id }), CHORES, item)
        .await
        .map_err(|e| failure("adding the chore", &user.id, e))?
        .ok_or_else(|| ApiError::not_found("Chore"))?;
    Ok(ApiResponse::created(parse(doc, "adding the chore", &user.id)?))
}

/// PUT /activities/chores/:id - replace one chore, keeping its id
pub async fn put_chore(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    ValidJson { body, .. }: ValidJson<ChoreRequest>,
) -> ApiResult<ActivitiesConfig> {
    let item = serde_json::to_value(body.into_chore(id.clone()))
        .map_err(|e| failure("updating the chore", &user.id, e))?;

    let doc = state
        .db
        .collection(DbCollection::Activities)
        .replace_in_one(json!({ "userId": user.id }), CHORES, &id, item)
        .await
        .map_err(|e| failure("updating the chore", &user.id, e))?
        .ok_or_else(|| ApiError::not_found("Chore"))?;
    Ok(ApiResponse::success(parse(doc, "updating the chore", &user.id)?))
}

/// DELETE /activities/chores/:id
pub async fn delete_chore(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<ActivitiesConfig> {
    let doc = state
        .db
        .collection(DbCollection::Activities)
        .pull_one(json!({ "userId": user.id }), CHORES, &id)
        .await
        .map_err(|e| failure("deleting the chore", &user.id, e))?
        .ok_or_else(|| ApiError::not_found("Chore"))?;
    Ok(ApiResponse::success(parse(doc, "deleting the chore", &user.id)?))
}
