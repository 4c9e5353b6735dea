use serde::{Deserialize, Serialize};

use super::validation::{Validate, Validator};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedditConfigSet {
    pub name: String,
    pub subs: Vec<String>,
    pub usernames: Vec<String>,
}

impl Validate for RedditConfigSet {
    fn validate(&self, v: &mut Validator) {
        v.str_len("name", &self.name, 1, Some(128));
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedditConfig {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub sets: Vec<RedditConfigSet>,
    #[serde(default)]
    pub blocked_users: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedditConfigRequest {
    #[serde(default)]
    pub sets: Vec<RedditConfigSet>,
    #[serde(default, alias = "blocked_users")]
    pub blocked_users: Vec<String>,
}

impl Validate for RedditConfigRequest {
    fn validate(&self, v: &mut Validator) {
        v.each("sets", &self.sets);
    }
}

fn default_limit() -> u32 {
    10
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedditSubsRequest {
    pub subs: Vec<String>,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl Validate for RedditSubsRequest {
    fn validate(&self, _v: &mut Validator) {}
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedditUsersRequest {
    pub usernames: Vec<String>,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl Validate for RedditUsersRequest {
    fn validate(&self, _v: &mut Validator) {}
}

/// An image post, reduced to what the dashboard shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedditPost {
    pub url: String,
    pub title: String,
    pub author: String,
    pub subreddit: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::validation::validate;
    use serde_json::json;

    #[test]
    fn limit_defaults_to_ten() {
        let req: RedditSubsRequest = serde_json::from_value(json!({ "subs": ["EarthPorn"] })).unwrap();
        assert_eq!(req.limit, 10);
    }

    #[test]
    fn set_names_are_bounded() {
        let req: RedditConfigRequest = serde_json::from_value(json!({
            "sets": [{ "name": "", "subs": [], "usernames": [] }],
            "blockedUsers": ["spammer"]
        }))
        .unwrap();
        let errors = validate(&req).unwrap_err();
        assert_eq!(errors[0].loc, vec!["body", "sets", "0", "name"]);
        assert_eq!(req.blocked_users, vec!["spammer"]);
    }
}
