// models - request/response types and their field constraints, one module per resource

pub mod activities;
pub mod birthdays;
pub mod common;
pub mod flights;
pub mod notes;
pub mod personal_data;
pub mod proxy;
pub mod reddit;
pub mod shortcuts;
pub mod start_settings;
pub mod strava;
pub mod trips;
pub mod users;
pub mod validation;
pub mod visits;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::database::{DatabaseError, DbCollection};

/// A per-user document that the generic CRUD handler can list, create, update and delete.
pub trait Entity: DeserializeOwned + Serialize + Send + Sync {
    /// Used in error details, e.g. `Not Found: Flight`.
    const NAME: &'static str;
    const COLLECTION: DbCollection;
    /// Whether `createdAt` is stamped on create.
    const TIMESTAMPED: bool = false;

    fn from_document(doc: Value) -> Result<Self, DatabaseError> {
        serde_json::from_value(doc).map_err(|e| DatabaseError::Document(format!("{}: {}", Self::NAME, e)))
    }
}
