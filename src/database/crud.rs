// database/crud.rs - per-user list/get/create/update/delete shared by the simple resources
//
// Every query is scoped to the caller's `userId`. Storage failures are logged with the
// user id and surface as 500s naming the entity and the verb.

use std::marker::PhantomData;

use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::{error, info};
use uuid::Uuid;

use super::collection::Collection;
use super::manager::{DatabaseError, DatabaseManager};
use crate::error::ApiError;
use crate::models::common::{IdResponse, ListResponse};
use crate::models::Entity;

pub struct CrudHandler<'a, T: Entity> {
    collection: Collection,
    user_id: &'a str,
    _entity: PhantomData<T>,
}

impl<'a, T: Entity> CrudHandler<'a, T> {
    pub fn new(db: &DatabaseManager, user_id: &'a str) -> Self {
        Self {
            collection: db.collection(T::COLLECTION),
            user_id,
            _entity: PhantomData,
        }
    }

    fn owned(&self, extra: Map<String, Value>) -> Value {
        let mut filter = extra;
        filter.insert("userId".to_string(), Value::String(self.user_id.to_string()));
        Value::Object(filter)
    }

    fn by_id(&self, id: &str) -> Value {
        json!({ "userId": self.user_id, "id": id })
    }

    fn failure(&self, action: &str, err: impl std::fmt::Display) -> ApiError {
        error!("Error {} {} for user {}: {}", action, T::NAME, self.user_id, err);
        ApiError::internal(format!("An error occurred while {} the {}: {}", action, T::NAME, err))
    }

    fn list_failure(&self, err: impl std::fmt::Display) -> ApiError {
        error!("Error retrieving {} list for user {}: {}", T::NAME, self.user_id, err);
        ApiError::internal(format!("An error occurred while retrieving the {} list: {}", T::NAME, err))
    }

    pub async fn get_listed(&self) -> Result<ListResponse<T>, ApiError> {
        self.get_filtered(Map::new()).await
    }

    /// Lists the caller's entities whose document contains every key in `filter`.
    pub async fn get_filtered(&self, filter: Map<String, Value>) -> Result<ListResponse<T>, ApiError> {
        let docs = self
            .collection
            .find(self.owned(filter))
            .await
            .map_err(|e| self.list_failure(e))?;

        let entities = docs
            .into_iter()
            .map(T::from_document)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| self.list_failure(e))?;

        Ok(ListResponse::new(entities))
    }

    pub async fn get_single(&self, id: &str) -> Result<T, ApiError> {
        let doc = self
            .collection
            .find_one(self.by_id(id))
            .await
            .map_err(|e| self.failure("retrieving", e))?
            .ok_or_else(|| ApiError::not_found(T::NAME))?;

        T::from_document(doc).map_err(|e| self.failure("retrieving", e))
    }

    /// Stores `body` under a fresh UUID for the caller and returns the stored entity.
    pub async fn create<R: Serialize>(&self, body: &R) -> Result<T, ApiError> {
        let mut doc = match serde_json::to_value(body) {
            Ok(Value::Object(map)) => map,
            Ok(_) => return Err(self.failure("creating", "request body is not an object")),
            Err(e) => return Err(self.failure("creating", e)),
        };

        let id = Uuid::new_v4().to_string();
        doc.insert("id".to_string(), Value::String(id.clone()));
        doc.insert("userId".to_string(), Value::String(self.user_id.to_string()));
        if T::TIMESTAMPED {
            doc.insert("createdAt".to_string(), Value::String(Utc::now().to_rfc3339()));
        }

        let stored = self
            .collection
            .insert(Value::Object(doc))
            .await
            .map_err(|e| self.failure("creating", e))?;

        info!("Created {} {} for user {}", T::NAME, id, self.user_id);
        T::from_document(stored).map_err(|e| self.failure("creating", e))
    }

    /// Overwrites only the fields in `patch`. Ownership keys are never patched.
    pub async fn update(&self, id: &str, mut patch: Map<String, Value>) -> Result<T, ApiError> {
        for key in ["id", "userId", "createdAt"] {
            patch.remove(key);
        }

        let updated = self
            .collection
            .update_one(self.by_id(id), patch)
            .await
            .map_err(|e| self.failure("updating", e))?
            .ok_or_else(|| ApiError::not_found(T::NAME))?;

        T::from_document(updated).map_err(|e| self.failure("updating", e))
    }

    pub async fn delete(&self, id: &str) -> Result<IdResponse, ApiError> {
        let deleted = self
            .collection
            .delete_one(self.by_id(id))
            .await
            .map_err(|e: DatabaseError| self.failure("deleting", e))?;

        if deleted == 0 {
            return Err(ApiError::not_found(T::NAME));
        }

        info!("Deleted {} {} for user {}", T::NAME, id, self.user_id);
        Ok(IdResponse { id: id.to_string() })
    }
}
