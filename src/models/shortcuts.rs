use serde::{Deserialize, Serialize};

use super::common::Record;
use super::validation::{Validate, Validator};
use super::Entity;
use crate::database::DbCollection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ShortcutCategory {
    Top,
    Coding,
    Google,
    Hobbies,
    Fun,
    Others,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortcutRequest {
    pub name: String,
    pub url: String,
    #[serde(alias = "icon_url")]
    pub icon_url: String,
    pub category: ShortcutCategory,
    pub priority: i64,
}

impl Validate for ShortcutRequest {
    fn validate(&self, v: &mut Validator) {
        v.str_len("name", &self.name, 1, Some(100));
        v.http_url("url", &self.url);
        v.http_url("iconUrl", &self.icon_url);
        v.between("priority", self.priority as f64, 1.0, 10.0);
    }
}

pub type Shortcut = Record<ShortcutRequest>;

impl Entity for Shortcut {
    const NAME: &'static str = "Shortcut";
    const COLLECTION: DbCollection = DbCollection::Shortcuts;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::validation::validate;
    use serde_json::json;

    #[test]
    fn category_is_upper_case() {
        let body: ShortcutRequest = serde_json::from_value(json!({
            "name": "GitHub",
            "url": "https://github.com",
            "iconUrl": "https://github.com/favicon.ico",
            "category": "CODING",
            "priority": 1
        }))
        .unwrap();
        assert_eq!(body.category, ShortcutCategory::Coding);
        assert!(validate(&body).is_ok());

        let bad = serde_json::from_value::<ShortcutRequest>(json!({
            "name": "GitHub",
            "url": "https://github.com",
            "iconUrl": "https://github.com/favicon.ico",
            "category": "coding",
            "priority": 1
        }));
        assert!(bad.is_err());
    }

    #[test]
    fn priority_bounds() {
        let mut body = ShortcutRequest {
            name: "x".to_string(),
            url: "https://x.com".to_string(),
            icon_url: "https://x.com/i.png".to_string(),
            category: ShortcutCategory::Fun,
            priority: 11,
        };
        assert!(validate(&body).is_err());
        body.priority = 0;
        assert!(validate(&body).is_err());
        body.priority = 10;
        assert!(validate(&body).is_ok());
    }
}
