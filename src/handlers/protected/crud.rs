// handlers/protected/crud.rs - GET/POST /{resource}, GET/PUT/DELETE /{resource}/:id
//
// Used as-is by notes, birthdays, shortcuts, personal-data and visits. Flights add a
// list filter on top.

use axum::{
    extract::{Path, State},
    routing::get,
    Extension, Router,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::database::CrudHandler;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser, ValidJson};
use crate::models::common::{IdResponse, ListResponse};
use crate::models::validation::Validate;
use crate::models::Entity;
use crate::state::AppState;

/// Routes for entity `T`, created and updated from request body `R`.
pub fn routes<T, R>(path: &str) -> Router<AppState>
where
    T: Entity + 'static,
    R: DeserializeOwned + Serialize + Validate + Send + Sync + 'static,
{
    Router::new()
        .route(path, get(list::<T>).post(create::<T, R>))
        .route(
            &format!("{}/:id", path),
            get(show::<T>).put(update::<T, R>).delete(delete::<T>),
        )
}

pub async fn list<T: Entity>(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<ListResponse<T>> {
    let entities = CrudHandler::<T>::new(&state.db, &user.id).get_listed().await?;
    Ok(ApiResponse::success(entities))
}

pub async fn show<T: Entity>(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<T> {
    let entity = CrudHandler::<T>::new(&state.db, &user.id).get_single(&id).await?;
    Ok(ApiResponse::success(entity))
}

pub async fn create<T: Entity, R: Serialize + Validate>(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    request: ValidJson<R>,
) -> ApiResult<T> {
    let entity = CrudHandler::<T>::new(&state.db, &user.id).create(&request.body).await?;
    Ok(ApiResponse::created(entity))
}

/// Only the keys present in the request body are written.
pub async fn update<T: Entity, R: Serialize + Validate>(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    request: ValidJson<R>,
) -> ApiResult<T> {
    let patch = request.patch()?;
    let entity = CrudHandler::<T>::new(&state.db, &user.id).update(&id, patch).await?;
    Ok(ApiResponse::success(entity))
}

pub async fn delete<T: Entity>(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<IdResponse> {
    let deleted = CrudHandler::<T>::new(&state.db, &user.id).delete(&id).await?;
    Ok(ApiResponse::success(deleted))
}
