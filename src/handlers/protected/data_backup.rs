// handlers/protected/data_backup.rs - GET /data-backup/email

use axum::{extract::State, Extension};
use tracing::{error, info};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::models::common::MessageResponse;
use crate::services::data_backup;
use crate::services::email::EmailManager;
use crate::state::AppState;

/// Mail every collection of the caller to their own address.
pub async fn get_email(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<MessageResponse> {
    let backup = data_backup::collect(&state.db, &user.id).await.map_err(|e| {
        error!("Error fetching user data: {}", e);
        ApiError::internal("Failed to fetch user data")
    })?;

    EmailManager::new(state.http.clone(), &state.config)
        .send_data_backup(&backup.name, &backup.email, &backup.files)
        .await
        .map_err(|e| {
            error!("Error sending data backup to {}: {}", backup.email, e);
            ApiError::internal("Failed to fetch user data")
        })?;

    info!("Data backup with {} files sent for user {}", backup.files.len(), user.id);
    Ok(ApiResponse::success(MessageResponse::new("Data backup email sent successfully.")))
}
