// services/accounts.rs - user bootstrap, lookup and login-code issuing

use chrono::Utc;
use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use super::email::{EmailManager, MailerError};
use crate::auth::hashing::{hash_secret, new_login_code};
use crate::database::{DatabaseError, DatabaseManager, DbCollection};
use crate::models::users::User;

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("{what} already exists for user {user_id}")]
    AlreadyExists { what: &'static str, user_id: String },

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Mailer(#[from] MailerError),

    #[error("Invalid user document: {0}")]
    Document(#[from] serde_json::Error),
}

async fn insert_once(
    db: &DatabaseManager,
    collection: DbCollection,
    what: &'static str,
    user_id: &str,
    mut doc: Map<String, Value>,
) -> Result<(), AccountError> {
    let collection = db.collection(collection);
    if collection.count(json!({ "userId": user_id })).await? > 0 {
        warn!("{} already exists for user {}", what, user_id);
        return Err(AccountError::AlreadyExists {
            what,
            user_id: user_id.to_string(),
        });
    }

    doc.insert("id".to_string(), json!(Uuid::new_v4().to_string()));
    doc.insert("userId".to_string(), json!(user_id));
    collection.insert(Value::Object(doc)).await?;

    info!("Initial {} created for user {}", what, user_id);
    Ok(())
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

pub async fn create_initial_settings(db: &DatabaseManager, user_id: &str) -> Result<(), AccountError> {
    let doc = object(json!({
        "createdAt": Utc::now(),
        "name": null,
        "shortcutIconBaseUrl": null,
        "stravaRedirectUri": null,
    }));
    insert_once(db, DbCollection::StartSettings, "Start settings", user_id, doc).await
}

pub async fn create_initial_activities_config(db: &DatabaseManager, user_id: &str) -> Result<(), AccountError> {
    let doc = object(json!({
        "chores": [],
        "walkWeeklyGoal": 0,
        "walkMonthlyGoal": 0,
        "cyclingWeeklyGoal": 0,
        "cyclingMonthlyGoal": 0,
    }));
    insert_once(db, DbCollection::Activities, "Activities config", user_id, doc).await
}

pub async fn create_initial_reddit_config(db: &DatabaseManager, user_id: &str) -> Result<(), AccountError> {
    let doc = object(json!({
        "createdAt": Utc::now(),
        "sets": [{ "name": "Default", "subs": [], "usernames": [] }],
        "blockedUsers": [],
    }));
    insert_once(db, DbCollection::Reddit, "Reddit config", user_id, doc).await
}

pub async fn find_user_by_email(db: &DatabaseManager, email: &str) -> Result<Option<User>, AccountError> {
    let doc = db.collection(DbCollection::Users).find_one(json!({ "email": email })).await?;
    Ok(doc.map(serde_json::from_value).transpose()?)
}

pub async fn find_user_by_id(db: &DatabaseManager, id: &str) -> Result<Option<User>, AccountError> {
    let doc = db.collection(DbCollection::Users).find_one(json!({ "id": id })).await?;
    Ok(doc.map(serde_json::from_value).transpose()?)
}

/// Insert a user document and the per-user configs every account starts with.
pub async fn create_initial_user(db: &DatabaseManager, email: &str) -> Result<User, AccountError> {
    let user = User::new(Uuid::new_v4().to_string(), email.to_string());
    db.collection(DbCollection::Users)
        .insert(serde_json::to_value(&user)?)
        .await?;
    info!("New user created with email {} ({})", email, user.id);

    create_initial_settings(db, &user.id).await?;
    create_initial_activities_config(db, &user.id).await?;
    create_initial_reddit_config(db, &user.id).await?;

    Ok(user)
}

/// Collections holding the documents `create_initial_user` adds next to the user.
const INITIAL_DOCUMENTS: [DbCollection; 3] = [DbCollection::StartSettings, DbCollection::Activities, DbCollection::Reddit];

/// Remove a user and its initial documents by email. Used to undo a half-finished signup.
pub async fn delete_account_by_email(db: &DatabaseManager, email: &str) -> Result<(), AccountError> {
    let Some(user) = find_user_by_email(db, email).await? else {
        return Ok(());
    };
    for collection in INITIAL_DOCUMENTS {
        db.collection(collection)
            .delete_many(json!({ "userId": user.id }))
            .await?;
    }
    db.collection(DbCollection::Users)
        .delete_one(json!({ "id": user.id }))
        .await?;
    info!("Removed account {} ({})", email, user.id);
    Ok(())
}

pub async fn set_password(db: &DatabaseManager, user_id: &str, password: &str) -> Result<(), AccountError> {
    let hashed = hash_secret(password);
    let patch = object(json!({ "passwordHash": hashed.hash, "passwordSalt": hashed.salt }));
    db.collection(DbCollection::Users)
        .update_one(json!({ "id": user_id }), patch)
        .await?;
    Ok(())
}

pub async fn clear_login_code(db: &DatabaseManager, user_id: &str) -> Result<(), AccountError> {
    let patch = object(json!({ "loginCodeHash": null, "loginCodeSalt": null, "loginCodeExpires": null }));
    db.collection(DbCollection::Users)
        .update_one(json!({ "id": user_id }), patch)
        .await?;
    Ok(())
}

/// Find or create the account for `email`, store a fresh login code on it and,
/// when `mailer` is given, email the code. Returns the plain code.
pub async fn sign_up_or_login(
    db: &DatabaseManager,
    mailer: Option<&EmailManager>,
    email: &str,
    expiry_minutes: i64,
) -> Result<String, AccountError> {
    let user = match find_user_by_email(db, email).await? {
        Some(user) => user,
        None => {
            let user = create_initial_user(db, email).await?;
            if let Some(mailer) = mailer {
                mailer.send_signup_notification(email).await?;
            }
            user
        }
    };

    let code = new_login_code(expiry_minutes);
    let patch = object(json!({
        "loginCodeHash": code.hashed.hash,
        "loginCodeSalt": code.hashed.salt,
        "loginCodeExpires": code.expires_at,
    }));
    db.collection(DbCollection::Users)
        .update_one(json!({ "id": user.id }), patch)
        .await?;

    if let Some(mailer) = mailer {
        mailer.send_login_code(email, &code.code).await?;
    }

    Ok(code.code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn already_exists_message_names_the_document() {
        let err = AccountError::AlreadyExists {
            what: "Reddit config",
            user_id: "u1".to_string(),
        };
        assert_eq!(err.to_string(), "Reddit config already exists for user u1");
    }

    #[test]
    fn object_ignores_non_objects() {
        assert!(object(json!([1, 2])).is_empty());
        assert_eq!(object(json!({ "a": 1 }))["a"], 1);
    }
}
