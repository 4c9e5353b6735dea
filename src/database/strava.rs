// database/strava.rs - typed storage for synced Strava activities and the per-user sync cursor

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{PgPool, Row};

use super::manager::DatabaseError;
use crate::models::strava::{Coords, StoredActivity, StravaActivityType, SyncMetadata};

/// Where synced routes live. The sync and routemap code only talk to this trait.
#[async_trait]
pub trait RouteStore: Send + Sync {
    async fn ping(&self) -> Result<(), DatabaseError>;

    async fn load_metadata(&self, user_id: &str) -> Result<Option<SyncMetadata>, DatabaseError>;

    /// Insert or replace the user's cursor.
    async fn save_metadata(&self, meta: &SyncMetadata) -> Result<(), DatabaseError>;

    async fn insert_activity(&self, activity: &StoredActivity) -> Result<(), DatabaseError>;

    async fn count_activities(&self, user_id: &str) -> Result<u64, DatabaseError>;

    /// Activities of the given types whose start date is inside the optional bounds (inclusive).
    async fn find_activities(
        &self,
        user_id: &str,
        types: &[StravaActivityType],
        after: Option<DateTime<Utc>>,
        before: Option<DateTime<Utc>>,
    ) -> Result<Vec<StoredActivity>, DatabaseError>;
}

pub struct PgRouteStore {
    pool: PgPool,
}

impl PgRouteStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn route_from_json(value: Value) -> Result<Vec<Coords>, DatabaseError> {
    serde_json::from_value(value).map_err(|e| DatabaseError::Document(format!("route: {}", e)))
}

#[async_trait]
impl RouteStore for PgRouteStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn load_metadata(&self, user_id: &str) -> Result<Option<SyncMetadata>, DatabaseError> {
        let row = sqlx::query("SELECT user_id, synced_ids, last_synced FROM strava_sync_metadata WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| -> Result<SyncMetadata, DatabaseError> {
            Ok(SyncMetadata {
                user_id: r.try_get("user_id")?,
                synced_ids: r.try_get("synced_ids")?,
                last_synced: r.try_get("last_synced")?,
            })
        })
        .transpose()
    }

    async fn save_metadata(&self, meta: &SyncMetadata) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO strava_sync_metadata (user_id, synced_ids, last_synced) VALUES ($1, $2, $3)
             ON CONFLICT (user_id) DO UPDATE SET synced_ids = EXCLUDED.synced_ids, last_synced = EXCLUDED.last_synced",
        )
        .bind(&meta.user_id)
        .bind(&meta.synced_ids)
        .bind(meta.last_synced)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn insert_activity(&self, activity: &StoredActivity) -> Result<(), DatabaseError> {
        let route = serde_json::to_value(&activity.route).map_err(|e| DatabaseError::Document(e.to_string()))?;
        sqlx::query(
            "INSERT INTO strava_activities (id, strava_id, user_id, name, start_date, distance, type, route)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(&activity.id)
        .bind(activity.strava_id)
        .bind(&activity.user_id)
        .bind(&activity.name)
        .bind(activity.start_date)
        .bind(activity.distance)
        .bind(&activity.kind)
        .bind(route)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn count_activities(&self, user_id: &str) -> Result<u64, DatabaseError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM strava_activities WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get::<i64, _>("n")?.max(0) as u64)
    }

    async fn find_activities(
        &self,
        user_id: &str,
        types: &[StravaActivityType],
        after: Option<DateTime<Utc>>,
        before: Option<DateTime<Utc>>,
    ) -> Result<Vec<StoredActivity>, DatabaseError> {
        let types: Vec<String> = types.iter().map(|t| t.as_str().to_string()).collect();
        let rows = sqlx::query(
            "SELECT id, strava_id, user_id, name, start_date, distance, type, route
             FROM strava_activities
             WHERE user_id = $1
               AND type = ANY($2)
               AND ($3::timestamptz IS NULL OR start_date >= $3)
               AND ($4::timestamptz IS NULL OR start_date <= $4)
             ORDER BY start_date",
        )
        .bind(user_id)
        .bind(&types)
        .bind(after)
        .bind(before)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|r| -> Result<StoredActivity, DatabaseError> {
                Ok(StoredActivity {
                    id: r.try_get("id")?,
                    strava_id: r.try_get("strava_id")?,
                    user_id: r.try_get("user_id")?,
                    name: r.try_get("name")?,
                    start_date: r.try_get("start_date")?,
                    distance: r.try_get("distance")?,
                    kind: r.try_get("type")?,
                    route: route_from_json(r.try_get("route")?)?,
                })
            })
            .collect()
    }
}
