// services/strava_sync.rs - incremental import of Strava activities with GPS tracks

use chrono::Utc;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use super::strava_api::StravaSource;
use super::UpstreamError;
use crate::database::strava::RouteStore;
use crate::database::DatabaseError;
use crate::models::strava::{StoredActivity, StravaActivityType, StravaSyncResponse, SyncMetadata};

#[derive(Debug, Error)]
pub enum SyncCause {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Failed to connect to Strava database. {0}")]
    Connect(DatabaseError),

    #[error("Could not finish syncing routes from Strava. (Synced {synced} before the error.) - {cause}")]
    Interrupted { synced: u64, cause: SyncCause },
}

/// Pull new activities from Strava into the route store.
///
/// Already synced ids and non Walk/Run/Ride activities are skipped, as are
/// activities without a latlng stream. The cursor is saved after every insert,
/// so an interrupted sync resumes where it stopped.
pub async fn sync_routes(
    source: &dyn StravaSource,
    store: &dyn RouteStore,
    user_id: &str,
    force: bool,
) -> Result<StravaSyncResponse, SyncError> {
    store.ping().await.map_err(SyncError::Connect)?;

    let mut synced = 0u64;
    run(source, store, user_id, force, &mut synced).await.map_err(|cause| {
        info!("Synced {} activities for {} before the error", synced, user_id);
        error!("Error syncing routes for user {}: {}", user_id, cause);
        SyncError::Interrupted { synced, cause }
    })
}

async fn run(
    source: &dyn StravaSource,
    store: &dyn RouteStore,
    user_id: &str,
    force: bool,
    synced: &mut u64,
) -> Result<StravaSyncResponse, SyncCause> {
    let mut meta = match store.load_metadata(user_id).await? {
        Some(meta) => meta,
        None => {
            info!("No sync metadata for user {}, creating it", user_id);
            let meta = SyncMetadata {
                user_id: user_id.to_string(),
                ..SyncMetadata::default()
            };
            store.save_metadata(&meta).await?;
            meta
        }
    };

    let athlete = source.get_athlete().await?;
    info!("Authenticated as athlete {} ({})", athlete.username.as_deref().unwrap_or("-"), athlete.id);

    let after = match meta.last_synced {
        Some(last) if !force => {
            info!("Fetching activities since {}", last);
            Some(last.timestamp())
        }
        _ => None,
    };
    let activities = source.get_all_activities(after).await?;
    info!("Fetched {} activities for athlete {}", activities.len(), athlete.id);

    if activities.is_empty() {
        return Ok(StravaSyncResponse {
            routes_synced: 0,
            total_routes: store.count_activities(user_id).await?,
        });
    }

    for activity in activities {
        if meta.synced_ids.contains(&activity.id) {
            continue;
        }
        if StravaActivityType::parse(&activity.kind).is_none() {
            info!("Activity {} is of type {}, skipping", activity.id, activity.kind);
            continue;
        }
        let Some(route) = source.get_latlng_stream(activity.id).await? else {
            info!("No latlng stream for activity {}, skipping", activity.id);
            continue;
        };

        info!("Activity {} has {} points, syncing", activity.id, route.len());
        store
            .insert_activity(&StoredActivity {
                id: Uuid::new_v4().to_string(),
                strava_id: activity.id,
                user_id: user_id.to_string(),
                name: activity.name.unwrap_or_else(|| "Unnamed Activity".to_string()),
                start_date: activity.start_date,
                distance: activity.distance,
                kind: activity.kind,
                route,
            })
            .await?;

        meta.synced_ids.push(activity.id);
        meta.last_synced = Some(Utc::now());
        store.save_metadata(&meta).await?;
        *synced += 1;
    }

    if *synced > 0 {
        info!("Synced {} activities for user {}", synced, user_id);
    } else {
        info!("No new activities were synced");
    }

    Ok(StravaSyncResponse {
        routes_synced: *synced,
        total_routes: meta.synced_ids.len() as u64,
    })
}
