// services/routemap.rs - heatmap points from stored activity routes

use std::collections::BTreeSet;

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::info;

use crate::database::strava::RouteStore;
use crate::database::DatabaseError;
use crate::models::strava::{Coords, StoredActivity, StravaActivityType, StravaRoutemap, StravaRoutesResponse};

const SCALE: f64 = 1e4;

/// Rounded to 4 decimals (roughly 11 m), kept as integers so points can be deduplicated.
fn grid_key(point: Coords) -> (i64, i64) {
    (round4(point.0), round4(point.1))
}

// Decimal formatting rounds the exact value half to even, so 47.03125 becomes 47.0312.
// Scaling first and calling `f64::round` would round that tie away from zero.
fn round4(value: f64) -> i64 {
    let rounded: f64 = format!("{:.4}", value).parse().unwrap_or(value);
    (rounded * SCALE).round() as i64
}

/// Collect the distinct rounded points of every route. The first point of each
/// route is skipped, then every `sampling_rate`-th point is taken.
pub fn generate_routemap(activities: &[StoredActivity], sampling_rate: usize) -> StravaRoutemap {
    let step = sampling_rate.max(1);
    let mut keys: BTreeSet<(i64, i64)> = BTreeSet::new();

    for (index, activity) in activities.iter().enumerate() {
        if activity.route.is_empty() {
            continue;
        }
        let before = keys.len();
        keys.extend(activity.route.iter().skip(1).step_by(step).copied().map(grid_key));
        info!(
            "Activity {}/{} ({}) added {} unique points",
            index + 1,
            activities.len(),
            activity.strava_id,
            keys.len() - before
        );
    }

    let points: Vec<Coords> = keys
        .into_iter()
        .map(|(lat, lng)| (lat as f64 / SCALE, lng as f64 / SCALE))
        .collect();

    info!("Generated routemap with {} unique points", points.len());
    StravaRoutemap { count: points.len(), points }
}

fn iso(date: Option<DateTime<Utc>>) -> Option<String> {
    date.map(|d| d.to_rfc3339_opts(SecondsFormat::AutoSi, false))
}

/// Build the routemap response for a user. No `types` means all of them.
pub async fn create_routemap(
    store: &dyn RouteStore,
    user_id: &str,
    types: &[StravaActivityType],
    after: Option<DateTime<Utc>>,
    before: Option<DateTime<Utc>>,
) -> Result<StravaRoutesResponse, DatabaseError> {
    let types = if types.is_empty() { &StravaActivityType::ALL[..] } else { types };

    info!("Fetching routes for user {} (types {:?}, after {:?}, before {:?})", user_id, types, after, before);
    let routes = store.find_activities(user_id, types, after, before).await?;

    if routes.is_empty() {
        info!("No routes found for user {}", user_id);
        return Ok(StravaRoutesResponse {
            routemap: None,
            after: iso(after),
            before: iso(before),
            types: Vec::new(),
            activity_count: 0,
        });
    }

    let found: BTreeSet<StravaActivityType> = routes
        .iter()
        .filter_map(|r| StravaActivityType::parse(&r.kind))
        .collect();

    Ok(StravaRoutesResponse {
        routemap: Some(generate_routemap(&routes, 1)),
        after: iso(after),
        before: iso(before),
        types: found.into_iter().collect(),
        activity_count: routes.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::strava_sync::tests::MemoryStore;
    use chrono::TimeZone;

    fn activity(strava_id: i64, kind: &str, day: u32, route: Vec<Coords>) -> StoredActivity {
        StoredActivity {
            id: format!("a-{}", strava_id),
            strava_id,
            user_id: "u1".to_string(),
            name: "Walk".to_string(),
            start_date: Utc.with_ymd_and_hms(2024, 5, day, 8, 0, 0).unwrap(),
            distance: 1000.0,
            kind: kind.to_string(),
            route,
        }
    }

    #[test]
    fn skips_first_point_rounds_and_dedups() {
        let routes = vec![
            activity(1, "Walk", 1, vec![(1.0, 1.0), (47.49791, 19.04021), (47.49789, 19.04019), (47.5, 19.05)]),
            activity(2, "Run", 2, vec![]),
            activity(3, "Run", 3, vec![(0.0, 0.0), (47.5, 19.05)]),
        ];
        let map = generate_routemap(&routes, 1);
        assert_eq!(map.count, 2);
        assert_eq!(map.points, vec![(47.4979, 19.0402), (47.5, 19.05)]);
        assert!(!map.points.contains(&(1.0, 1.0)));
    }

    #[test]
    fn exact_ties_round_half_to_even() {
        assert_eq!(grid_key((47.03125, 19.09375)), (470312, 190938));
        assert_eq!(grid_key((-0.03125, 16.37254)), (-312, 163725));
    }

    #[test]
    fn sampling_rate_steps_after_the_first_point() {
        let route: Vec<Coords> = (0..7).map(|i| (i as f64, 0.0)).collect();
        let map = generate_routemap(&[activity(1, "Ride", 1, route)], 3);
        assert_eq!(map.points, vec![(1.0, 0.0), (4.0, 0.0)]);
    }

    #[tokio::test]
    async fn empty_result_has_no_routemap() {
        let store = MemoryStore::default();
        let after = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let response = create_routemap(&store, "u1", &[], Some(after), None).await.unwrap();
        assert!(response.routemap.is_none());
        assert!(response.types.is_empty());
        assert_eq!(response.after.as_deref(), Some("2024-01-01T00:00:00+00:00"));
        assert_eq!(response.before, None);
    }

    #[tokio::test]
    async fn filters_by_type_and_reports_found_types() {
        let store = MemoryStore::default();
        for a in [
            activity(1, "Walk", 1, vec![(0.0, 0.0), (47.1, 19.1)]),
            activity(2, "Ride", 2, vec![(0.0, 0.0), (47.2, 19.2)]),
            activity(3, "Run", 20, vec![(0.0, 0.0), (47.3, 19.3)]),
        ] {
            store.insert_activity(&a).await.unwrap();
        }

        let before = Utc.with_ymd_and_hms(2024, 5, 10, 0, 0, 0).unwrap();
        let response = create_routemap(&store, "u1", &[], None, Some(before)).await.unwrap();
        assert_eq!(response.activity_count, 2);
        assert_eq!(response.types, vec![StravaActivityType::Walk, StravaActivityType::Ride]);

        let response = create_routemap(&store, "u1", &[StravaActivityType::Run], None, None).await.unwrap();
        assert_eq!(response.activity_count, 1);
        assert_eq!(response.routemap.unwrap().points, vec![(47.3, 19.3)]);
    }
}
