// handlers/protected/strava.rs - POST /strava/routes/sync, GET /strava/routes/routemap

use axum::{
    extract::{RawQuery, State},
    Extension,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::error;

use crate::database::strava::{PgRouteStore, RouteStore};
use crate::error::{ApiError, FieldError};
use crate::middleware::{ApiResponse, ApiResult, CurrentUser, ValidQuery};
use crate::models::strava::{StravaActivityType, StravaRoutesResponse, StravaSyncResponse, SyncQuery};
use crate::services::routemap::create_routemap;
use crate::services::strava_api::StravaApi;
use crate::services::strava_sync::sync_routes;
use crate::state::AppState;

/// POST /strava/routes/sync?strava_token=&force=
pub async fn post_sync(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidQuery(query): ValidQuery<SyncQuery>,
) -> ApiResult<StravaSyncResponse> {
    let api = StravaApi::new(state.http.clone(), &state.config.integrations.strava_api_url, &query.strava_token);
    let store = PgRouteStore::new(state.db.strava_pool().clone());

    let response = sync_routes(&api, &store, &user.id, query.force.unwrap_or(false))
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;
    Ok(ApiResponse::success(response))
}

/// Filters of the routemap endpoint. `types` may repeat, so the raw query is parsed by hand.
#[derive(Debug, Default, PartialEq)]
pub struct RoutemapQuery {
    pub after: Option<DateTime<Utc>>,
    pub before: Option<DateTime<Utc>>,
    pub types: Vec<StravaActivityType>,
}

/// RFC 3339, a naive timestamp (taken as UTC) or a plain date.
fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

impl RoutemapQuery {
    pub fn parse(raw: Option<&str>) -> Result<Self, Vec<FieldError>> {
        let mut query = RoutemapQuery::default();
        let mut errors = Vec::new();

        for (key, value) in url::form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
            match key.as_ref() {
                "after" | "before" => match parse_datetime(&value) {
                    Some(dt) if key == "after" => query.after = Some(dt),
                    Some(dt) => query.before = Some(dt),
                    None => errors.push(FieldError::query(&key, "Input should be a valid datetime", "datetime_from_date_parsing")),
                },
                "types" => match StravaActivityType::parse(&value) {
                    Some(kind) => query.types.push(kind),
                    None => errors.push(FieldError::query("types", "Input should be 'Walk', 'Run' or 'Ride'", "enum")),
                },
                _ => {}
            }
        }

        if errors.is_empty() {
            Ok(query)
        } else {
            Err(errors)
        }
    }
}

/// GET /strava/routes/routemap?after=&before=&types=
pub async fn get_routemap(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    RawQuery(raw): RawQuery,
) -> ApiResult<StravaRoutesResponse> {
    let query = RoutemapQuery::parse(raw.as_deref()).map_err(ApiError::unprocessable)?;
    let store = PgRouteStore::new(state.db.strava_pool().clone());

    store.ping().await.map_err(|e| {
        error!("Error connecting to Strava database: {}", e);
        ApiError::internal(format!("Failed to connect to Strava database. {}", e))
    })?;

    let response = create_routemap(&store, &user.id, &query.types, query.after, query.before)
        .await
        .map_err(|e| {
            error!("Error creating routemap for user {}: {}", user.id, e);
            ApiError::internal(format!("Could not create routemap: {}", e))
        })?;
    Ok(ApiResponse::success(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_repeated_types_and_dates() {
        let query = RoutemapQuery::parse(Some("types=Walk&types=Ride&after=2024-01-01T00%3A00%3A00Z&before=2024-02-01")).unwrap();
        assert_eq!(query.types, vec![StravaActivityType::Walk, StravaActivityType::Ride]);
        assert_eq!(query.after, Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
        assert_eq!(query.before, Some(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()));
    }

    #[test]
    fn empty_query_means_no_filters() {
        assert_eq!(RoutemapQuery::parse(None).unwrap(), RoutemapQuery::default());
    }

    #[test]
    fn naive_timestamps_are_utc() {
        let query = RoutemapQuery::parse(Some("after=2023-10-01T06:30:00")).unwrap();
        assert_eq!(query.after, Some(Utc.with_ymd_and_hms(2023, 10, 1, 6, 30, 0).unwrap()));
    }

    #[test]
    fn rejects_unknown_types_and_bad_dates() {
        let errors = RoutemapQuery::parse(Some("types=Swim&after=yesterday")).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].loc, vec!["query", "types"]);
        assert_eq!(errors[1].loc, vec!["query", "after"]);
    }
}
