use serde::{Deserialize, Serialize};

use super::validation::{Validate, Validator};

/// A recurring bike maintenance task, due every `km_interval` kilometres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CyclingChore {
    pub id: String,
    pub name: String,
    pub km_interval: i64,
    pub last_km: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitiesConfig {
    pub id: String,
    #[serde(default)]
    pub chores: Vec<CyclingChore>,
    pub walk_weekly_goal: i64,
    pub walk_monthly_goal: i64,
    pub cycling_weekly_goal: i64,
    pub cycling_monthly_goal: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalsRequest {
    #[serde(alias = "walk_weekly_goal")]
    pub walk_weekly_goal: i64,
    #[serde(alias = "walk_monthly_goal")]
    pub walk_monthly_goal: i64,
    #[serde(alias = "cycling_weekly_goal")]
    pub cycling_weekly_goal: i64,
    #[serde(alias = "cycling_monthly_goal")]
    pub cycling_monthly_goal: i64,
}

impl Validate for GoalsRequest {
    fn validate(&self, v: &mut Validator) {
        v.at_least("walkWeeklyGoal", self.walk_weekly_goal as f64, 0.0);
        v.at_least("walkMonthlyGoal", self.walk_monthly_goal as f64, 0.0);
        v.at_least("cyclingWeeklyGoal", self.cycling_weekly_goal as f64, 0.0);
        v.at_least("cyclingMonthlyGoal", self.cycling_monthly_goal as f64, 0.0);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoreRequest {
    pub name: String,
    #[serde(alias = "km_interval")]
    pub km_interval: i64,
    #[serde(alias = "last_km")]
    pub last_km: f64,
}

impl ChoreRequest {
    pub fn into_chore(self, id: String) -> CyclingChore {
        CyclingChore {
            id,
            name: self.name,
            km_interval: self.km_interval,
            last_km: self.last_km,
        }
    }
}

impl Validate for ChoreRequest {
    fn validate(&self, v: &mut Validator) {
        v.str_len("name", &self.name, 1, None);
        v.greater_than("kmInterval", self.km_interval as f64, 0.0);
        v.at_least("lastKm", self.last_km, 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::validation::validate;
    use serde_json::json;

    #[test]
    fn goals_require_all_fields() {
        let missing = serde_json::from_value::<GoalsRequest>(json!({
            "walkWeeklyGoal": 1000,
            "cyclingWeeklyGoal": 0,
            "cyclingMonthlyGoal": 0
        }));
        assert!(missing.is_err());

        let wrong_type = serde_json::from_value::<GoalsRequest>(json!({
            "walkWeeklyGoal": 1000,
            "walkMonthlyGoal": "bad",
            "cyclingWeeklyGoal": 0,
            "cyclingMonthlyGoal": 0
        }));
        assert!(wrong_type.is_err());

        let negative: GoalsRequest = serde_json::from_value(json!({
            "walkWeeklyGoal": -1,
            "walkMonthlyGoal": 0,
            "cyclingWeeklyGoal": 0,
            "cyclingMonthlyGoal": 0
        }))
        .unwrap();
        assert_eq!(validate(&negative).unwrap_err()[0].loc, vec!["body", "walkWeeklyGoal"]);
    }

    #[test]
    fn chore_constraints() {
        let chore: ChoreRequest =
            serde_json::from_value(json!({ "name": "Chain", "kmInterval": -10, "lastKm": 10.5 })).unwrap();
        assert!(validate(&chore).is_err());

        let chore: ChoreRequest =
            serde_json::from_value(json!({ "name": "Chain", "kmInterval": 30, "lastKm": 0 })).unwrap();
        assert!(validate(&chore).is_ok());
    }

    #[test]
    fn chores_are_stored_with_a_top_level_id() {
        let chore = ChoreRequest { name: "Chain".to_string(), km_interval: 300, last_km: 12.5 }.into_chore("c1".to_string());
        let stored = serde_json::to_value(&chore).unwrap();
        assert_eq!(stored, json!({ "id": "c1", "name": "Chain", "kmInterval": 300, "lastKm": 12.5 }));
    }
}
