// database/mod.rs - PostgreSQL access: document collections, the generic CRUD
// handler, and the typed Strava route store

pub mod collection; // JSONB document tables
pub mod crud;       // Per-user CRUD on top of a collection
pub mod manager;    // Pools and health checks
pub mod schema;     // CREATE TABLE IF NOT EXISTS bootstrap
pub mod strava;     // strava_activities / strava_sync_metadata

pub use collection::{Collection, DbCollection};
pub use crud::CrudHandler;
pub use manager::{DatabaseError, DatabaseManager};
