// database/schema.rs - idempotent table bootstrap
//
// Statements are executed one by one; the main and the Strava database may be the
// same database, so everything is `IF NOT EXISTS`.

use tracing::info;

use super::collection::DbCollection;
use super::manager::{DatabaseError, DatabaseManager};

pub fn collection_ddl(collection: DbCollection) -> Vec<String> {
    let t = collection.as_str();
    vec![
        format!(
            "CREATE TABLE IF NOT EXISTS {t} (
                seq BIGSERIAL PRIMARY KEY,
                id TEXT NOT NULL UNIQUE,
                user_id TEXT,
                doc JSONB NOT NULL
            )"
        ),
        format!("CREATE INDEX IF NOT EXISTS {t}_user_id_idx ON {t} (user_id)"),
        format!("CREATE INDEX IF NOT EXISTS {t}_doc_idx ON {t} USING GIN (doc jsonb_path_ops)"),
    ]
}

pub const STRAVA_DDL: [&str; 3] = [
    "CREATE TABLE IF NOT EXISTS strava_activities (
        id TEXT PRIMARY KEY,
        strava_id BIGINT NOT NULL,
        user_id TEXT NOT NULL,
        name TEXT NOT NULL,
        start_date TIMESTAMPTZ NOT NULL,
        distance DOUBLE PRECISION NOT NULL,
        type TEXT NOT NULL,
        route JSONB NOT NULL,
        UNIQUE (user_id, strava_id)
    )",
    "CREATE INDEX IF NOT EXISTS strava_activities_user_idx ON strava_activities (user_id, type, start_date)",
    "CREATE TABLE IF NOT EXISTS strava_sync_metadata (
        user_id TEXT PRIMARY KEY,
        synced_ids BIGINT[] NOT NULL DEFAULT '{}',
        last_synced TIMESTAMPTZ
    )",
];

pub async fn bootstrap(db: &DatabaseManager) -> Result<(), DatabaseError> {
    for collection in DbCollection::ALL {
        for statement in collection_ddl(collection) {
            sqlx::query(&statement).execute(db.main_pool()).await?;
        }
    }
    for statement in STRAVA_DDL {
        sqlx::query(statement).execute(db.strava_pool()).await?;
    }
    info!("Database schema is up to date ({} collections)", DbCollection::ALL.len());
    Ok(())
}
