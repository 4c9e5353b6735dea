use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StravaActivityType {
    Walk,
    Run,
    Ride,
}

impl StravaActivityType {
    pub const ALL: [StravaActivityType; 3] = [Self::Walk, Self::Run, Self::Ride];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Walk => "Walk",
            Self::Run => "Run",
            Self::Ride => "Ride",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }
}

impl fmt::Display for StravaActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `(latitude, longitude)`
pub type Coords = (f64, f64);

/// An activity as listed by `/athlete/activities`.
#[derive(Debug, Clone, Deserialize)]
pub struct StravaSummaryActivity {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub distance: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StravaAthlete {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
}

/// A synced activity and its GPS track.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredActivity {
    pub id: String,
    pub strava_id: i64,
    pub user_id: String,
    pub name: String,
    pub start_date: DateTime<Utc>,
    pub distance: f64,
    pub kind: String,
    pub route: Vec<Coords>,
}

/// Per-user sync cursor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncMetadata {
    pub user_id: String,
    pub synced_ids: Vec<i64>,
    pub last_synced: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StravaSyncResponse {
    pub routes_synced: u64,
    pub total_routes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StravaRoutemap {
    pub count: usize,
    pub points: Vec<Coords>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StravaRoutesResponse {
    pub routemap: Option<StravaRoutemap>,
    pub after: Option<String>,
    pub before: Option<String>,
    pub types: Vec<StravaActivityType>,
    pub activity_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct SyncQuery {
    pub strava_token: String,
    #[serde(default)]
    pub force: Option<bool>,
}

impl super::validation::Validate for SyncQuery {
    fn validate(&self, _v: &mut super::validation::Validator) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn activity_types_round_trip_by_name() {
        assert_eq!(StravaActivityType::parse("Ride"), Some(StravaActivityType::Ride));
        assert_eq!(StravaActivityType::parse("ride"), None);
        assert_eq!(StravaActivityType::parse("Swim"), None);
        assert_eq!(serde_json::to_value(StravaActivityType::Walk).unwrap(), json!("Walk"));
    }

    #[test]
    fn summary_activity_from_api() {
        let activity: StravaSummaryActivity = serde_json::from_value(json!({
            "id": 123456789,
            "name": "Morning Ride",
            "type": "Ride",
            "start_date": "2024-06-01T06:30:00Z",
            "distance": 24150.3,
            "moving_time": 3600
        }))
        .unwrap();
        assert_eq!(activity.kind, "Ride");
        assert_eq!(activity.start_date.timestamp(), 1717223400);
    }

    #[test]
    fn routes_response_shape() {
        let response = StravaRoutesResponse {
            routemap: Some(StravaRoutemap {
                count: 1,
                points: vec![(47.4979, 19.0402)],
            }),
            after: None,
            before: None,
            types: vec![StravaActivityType::Run],
            activity_count: 1,
        };
        let value = serde_json::to_value(response).unwrap();
        assert_eq!(value["routemap"]["points"], json!([[47.4979, 19.0402]]));
        assert_eq!(value["activityCount"], 1);
    }
}
