// handlers/protected/reddit.rs - /reddit config and image feeds
//
// Feed endpoints never fail on upstream trouble; they answer with an empty list.

use axum::{extract::State, Extension};
use serde_json::{json, Value};
use tracing::{error, info};

use crate::error::ApiError;
use crate::database::{DbCollection, DatabaseManager};
use crate::middleware::{ApiResponse, ApiResult, CurrentUser, ValidJson};
use crate::models::common::ListResponse;
use crate::models::reddit::{RedditConfig, RedditConfigRequest, RedditPost, RedditSubsRequest, RedditUsersRequest};
use crate::services::reddit_api::{without_blocked, RedditApi, Source};
use crate::state::AppState;

fn decode(doc: Value) -> Result<RedditConfig, String> {
    serde_json::from_value(doc).map_err(|e| e.to_string())
}

async fn load(db: &DatabaseManager, user_id: &str) -> Result<Option<RedditConfig>, String> {
    db.collection(DbCollection::Reddit)
        .find_one(json!({ "userId": user_id }))
        .await
        .map_err(|e| e.to_string())?
        .map(decode)
        .transpose()
}

/// GET /reddit/config
pub async fn get_config(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<RedditConfig> {
    let config = load(&state.db, &user.id)
        .await
        .map_err(|e| {
            error!("Error retrieving Reddit configuration for user {}: {}", user.id, e);
            ApiError::internal(format!("An error occurred while retrieving the Reddit configuration{}", e))
        })?
        .ok_or_else(|| {
            error!("Reddit configuration not found for user {}", user.id);
            ApiError::not_found("Reddit configuration")
        })?;
    Ok(ApiResponse::success(config))
}

/// PUT /reddit/config - replaces `sets` and/or `blockedUsers`, whichever was sent
pub async fn put_config(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    request: ValidJson<RedditConfigRequest>,
) -> ApiResult<RedditConfig> {
    let failure = |e: String| {
        error!("Error updating Reddit configuration for user {}: {}", user.id, e);
        ApiError::internal(format!("An error occurred while updating the Reddit configuration{}", e))
    };

    let patch = request.patch()?;
    let doc = state
        .db
        .collection(DbCollection::Reddit)
        .update_one(json!({ "userId": user.id }), patch)
        .await
        .map_err(|e| failure(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Reddit configuration"))?;

    Ok(ApiResponse::success(decode(doc).map_err(failure)?))
}

async fn feed(state: &AppState, user_id: &str, sources: &[Source<'_>], limit: u32) -> Result<Vec<RedditPost>, String> {
    let reddit = RedditApi::connect(&state.http, &state.config.integrations)
        .await
        .map_err(|e| format!("Failed to initialize Reddit API: {}", e))?;

    let posts = reddit.fetch_many(sources, limit).await;

    let blocked = load(&state.db, user_id)
        .await?
        .map(|config| config.blocked_users)
        .unwrap_or_default();
    Ok(without_blocked(posts, &blocked))
}

/// POST /reddit/subs - newest image posts of the given subreddits
pub async fn post_subs(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidJson { body, .. }: ValidJson<RedditSubsRequest>,
) -> ApiResult<ListResponse<RedditPost>> {
    info!("Fetching posts from {} subreddits with limit {}", body.subs.len(), body.limit);
    let sources: Vec<Source> = body.subs.iter().map(|s| Source::Subreddit(s)).collect();

    let posts = feed(&state, &user.id, &sources, body.limit).await.unwrap_or_else(|e| {
        error!("Failed to fetch sub posts: {}", e);
        Vec::new()
    });
    Ok(ApiResponse::success(ListResponse::new(posts)))
}

/// POST /reddit/users - newest image posts of the given redditors
pub async fn post_users(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidJson { body, .. }: ValidJson<RedditUsersRequest>,
) -> ApiResult<ListResponse<RedditPost>> {
    info!("Fetching posts from {} users with limit {}", body.usernames.len(), body.limit);
    let sources: Vec<Source> = body.usernames.iter().map(|s| Source::User(s)).collect();

    let posts = feed(&state, &user.id, &sources, body.limit).await.unwrap_or_else(|e| {
        error!("Failed to fetch user posts: {}", e);
        Vec::new()
    });
    Ok(ApiResponse::success(ListResponse::new(posts)))
}
