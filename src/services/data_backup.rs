// services/data_backup.rs - gather a user's documents as JSON attachments

use serde_json::{json, Value};
use thiserror::Error;

use super::email::EmailAttachment;
use crate::database::{DatabaseError, DatabaseManager, DbCollection};

/// Single-document collections go out as an object (or null), the rest as arrays.
const ATTACHMENTS: [(DbCollection, &str, Scope); 12] = [
    (DbCollection::StartSettings, "start_settings.json", Scope::One),
    (DbCollection::Activities, "activities.json", Scope::One),
    (DbCollection::Flights, "flights.json", Scope::Many),
    (DbCollection::Visits, "visits.json", Scope::Many),
    (DbCollection::Notes, "notes.json", Scope::Many),
    (DbCollection::PersonalData, "personal_data.json", Scope::Many),
    (DbCollection::Reddit, "reddit.json", Scope::One),
    (DbCollection::Shortcuts, "shortcuts.json", Scope::Many),
    (DbCollection::Birthdays, "birthdays.json", Scope::Many),
    (DbCollection::Aircrafts, "aircrafts.json", Scope::Static),
    (DbCollection::Airlines, "airlines.json", Scope::Static),
    (DbCollection::Airports, "airports.json", Scope::Static),
];

#[derive(Debug, Clone, Copy)]
enum Scope {
    One,
    Many,
    Static,
}

#[derive(Debug, Error)]
pub enum BackupError {
    #[error("User email not found")]
    MissingEmail,

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Everything needed to send the backup mail.
#[derive(Debug)]
pub struct Backup {
    pub name: String,
    pub email: String,
    pub files: Vec<EmailAttachment>,
}

fn attachment(filename: &str, value: &Value) -> Result<EmailAttachment, BackupError> {
    Ok(EmailAttachment {
        content: serde_json::to_string(value)?,
        filename: filename.to_string(),
    })
}

/// Recipient name from the start settings document, `User` when unset.
fn display_name(start_settings: &Value) -> String {
    start_settings
        .get("name")
        .and_then(Value::as_str)
        .filter(|n| !n.is_empty())
        .unwrap_or("User")
        .to_string()
}

pub async fn collect(db: &DatabaseManager, user_id: &str) -> Result<Backup, BackupError> {
    let user = db
        .collection(DbCollection::Users)
        .find_one(json!({ "id": user_id }))
        .await?
        .unwrap_or(Value::Null);

    let email = user
        .get("email")
        .and_then(Value::as_str)
        .filter(|e| !e.is_empty())
        .ok_or(BackupError::MissingEmail)?
        .to_string();

    let mut files = vec![attachment("user_data.json", &user)?];
    let mut name = "User".to_string();

    for (collection, filename, scope) in ATTACHMENTS {
        let store = db.collection(collection);
        let value = match scope {
            Scope::One => store
                .find_one(json!({ "userId": user_id }))
                .await?
                .unwrap_or(Value::Null),
            Scope::Many => Value::Array(store.find(json!({ "userId": user_id })).await?),
            Scope::Static => Value::Array(store.find(json!({})).await?),
        };
        if collection == DbCollection::StartSettings {
            name = display_name(&value);
        }
        files.push(attachment(filename, &value)?);
    }

    Ok(Backup { name, email, files })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_falls_back_to_user() {
        assert_eq!(display_name(&json!({ "name": "Kim" })), "Kim");
        assert_eq!(display_name(&json!({ "name": null })), "User");
        assert_eq!(display_name(&json!({ "name": "" })), "User");
        assert_eq!(display_name(&Value::Null), "User");
    }

    #[test]
    fn attachments_cover_every_collection_but_users() {
        let names: Vec<&str> = ATTACHMENTS.iter().map(|(_, f, _)| *f).collect();
        assert_eq!(names.len(), DbCollection::ALL.len() - 1);
        assert!(!names.contains(&"users.json"));
    }

    #[test]
    fn attachment_keeps_unicode() {
        let file = attachment("notes.json", &json!([{ "text": "árvíztűrő" }])).unwrap();
        assert_eq!(file.content, r#"[{"text":"árvíztűrő"}]"#);
    }
}
