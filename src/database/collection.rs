use serde_json::{Map, Value};
use sqlx::{PgPool, Row};

use super::manager::DatabaseError;

/// Document collections. Each one is a JSONB table of the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DbCollection {
    Users,
    StartSettings,
    Shortcuts,
    Notes,
    PersonalData,
    Activities,
    Birthdays,
    Flights,
    Visits,
    Reddit,
    // Static data collections
    Airlines,
    Airports,
    Aircrafts,
}

impl DbCollection {
    pub const ALL: [DbCollection; 13] = [
        DbCollection::Users,
        DbCollection::StartSettings,
        DbCollection::Shortcuts,
        DbCollection::Notes,
        DbCollection::PersonalData,
        DbCollection::Activities,
        DbCollection::Birthdays,
        DbCollection::Flights,
        DbCollection::Visits,
        DbCollection::Reddit,
        DbCollection::Airlines,
        DbCollection::Airports,
        DbCollection::Aircrafts,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DbCollection::Users => "users",
            DbCollection::StartSettings => "start_settings",
            DbCollection::Shortcuts => "shortcuts",
            DbCollection::Notes => "notes",
            DbCollection::PersonalData => "personal_data",
            DbCollection::Activities => "activities",
            DbCollection::Birthdays => "birthdays",
            DbCollection::Flights => "flights",
            DbCollection::Visits => "visits",
            DbCollection::Reddit => "reddit",
            DbCollection::Airlines => "airlines",
            DbCollection::Airports => "airports",
            DbCollection::Aircrafts => "aircrafts",
        }
    }
}

/// A JSONB document table. Filters are containment matches (`doc @> filter`),
/// updates are shallow merges (`doc || patch`).
pub struct Collection {
    name: DbCollection,
    pool: PgPool,
}

impl Collection {
    pub fn new(name: DbCollection, pool: PgPool) -> Self {
        Self { name, pool }
    }

    pub fn name(&self) -> DbCollection {
        self.name
    }

    fn table(&self) -> &'static str {
        self.name.as_str()
    }

    pub async fn find(&self, filter: Value) -> Result<Vec<Value>, DatabaseError> {
        let sql = format!("SELECT doc FROM {} WHERE doc @> $1 ORDER BY seq", self.table());
        let rows = sqlx::query(&sql).bind(filter).fetch_all(&self.pool).await?;
        rows.iter().map(|r| Ok(r.try_get::<Value, _>("doc")?)).collect()
    }

    pub async fn find_one(&self, filter: Value) -> Result<Option<Value>, DatabaseError> {
        let sql = format!("SELECT doc FROM {} WHERE doc @> $1 ORDER BY seq LIMIT 1", self.table());
        let row = sqlx::query(&sql).bind(filter).fetch_optional(&self.pool).await?;
        Ok(row.map(|r| r.try_get::<Value, _>("doc")).transpose()?)
    }

    pub async fn count(&self, filter: Value) -> Result<i64, DatabaseError> {
        let sql = format!("SELECT COUNT(*) AS n FROM {} WHERE doc @> $1", self.table());
        let row = sqlx::query(&sql).bind(filter).fetch_one(&self.pool).await?;
        Ok(row.try_get::<i64, _>("n")?)
    }

    /// Inserts a document. It must carry a string `id`; `userId` is mirrored into its column when present.
    pub async fn insert(&self, doc: Value) -> Result<Value, DatabaseError> {
        let id = doc
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| DatabaseError::Document("document has no string id".to_string()))?
            .to_string();
        let user_id = doc.get("userId").and_then(Value::as_str).map(str::to_string);

        let sql = format!(
            "INSERT INTO {} (id, user_id, doc) VALUES ($1, $2, $3) RETURNING doc",
            self.table()
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(user_id)
            .bind(doc)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get::<Value, _>("doc")?)
    }

    /// Shallow merge of `patch` into the first matching document. Returns the updated document.
    pub async fn update_one(&self, filter: Value, patch: Map<String, Value>) -> Result<Option<Value>, DatabaseError> {
        let sql = format!(
            "UPDATE {t} SET doc = doc || $2 WHERE seq = (SELECT seq FROM {t} WHERE doc @> $1 ORDER BY seq LIMIT 1) RETURNING doc",
            t = self.table()
        );
        let row = sqlx::query(&sql)
            .bind(filter)
            .bind(Value::Object(patch))
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.try_get::<Value, _>("doc")).transpose()?)
    }

    /// Appends `item` to the array `field` of the first matching document in one statement.
    pub async fn push_one(&self, filter: Value, field: &str, item: Value) -> Result<Option<Value>, DatabaseError> {
        let set = "COALESCE(doc->$2, '[]'::jsonb) || jsonb_build_array($3::jsonb)";
        self.update_array(filter, field, set, "TRUE", item, None).await
    }

    /// Replaces the element of array `field` whose `id` is `item_id`. `None` when no element matched.
    pub async fn replace_in_one(
        &self,
        filter: Value,
        field: &str,
        item_id: &str,
        item: Value,
    ) -> Result<Option<Value>, DatabaseError> {
        let set = "(SELECT jsonb_agg(CASE WHEN e->>'id' = $4 THEN $3::jsonb ELSE e END ORDER BY i) \
                   FROM jsonb_array_elements(doc->$2) WITH ORDINALITY AS x(e, i))";
        self.update_array(filter, field, set, HAS_ITEM, item, Some(item_id)).await
    }

    /// Removes the element of array `field` whose `id` is `item_id`. `None` when no element matched.
    pub async fn pull_one(&self, filter: Value, field: &str, item_id: &str) -> Result<Option<Value>, DatabaseError> {
        let set = "COALESCE((SELECT jsonb_agg(e ORDER BY i) \
                   FROM jsonb_array_elements(doc->$2) WITH ORDINALITY AS x(e, i) \
                   WHERE e->>'id' <> $4), '[]'::jsonb)";
        self.update_array(filter, field, set, HAS_ITEM, Value::Null, Some(item_id)).await
    }

    // The new array is computed from the row being updated, so concurrent edits
    // of the same document serialize on its row lock instead of overwriting each other.
    async fn update_array(
        &self,
        filter: Value,
        field: &str,
        new_array: &str,
        condition: &str,
        item: Value,
        item_id: Option<&str>,
    ) -> Result<Option<Value>, DatabaseError> {
        if !is_valid_field_name(field) {
            return Err(DatabaseError::InvalidFieldName(field.to_string()));
        }
        let sql = format!(
            "UPDATE {t} SET doc = jsonb_set(doc, ARRAY[$2::text], {new_array}) \
             WHERE seq = (SELECT seq FROM {t} WHERE doc @> $1 ORDER BY seq LIMIT 1) AND {condition} \
             RETURNING doc",
            t = self.table(),
        );
        let row = sqlx::query(&sql)
            .bind(filter)
            .bind(field)
            .bind(item)
            .bind(item_id.unwrap_or_default())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.try_get::<Value, _>("doc")).transpose()?)
    }

    pub async fn delete_one(&self, filter: Value) -> Result<u64, DatabaseError> {
        let sql = format!(
            "DELETE FROM {t} WHERE seq = (SELECT seq FROM {t} WHERE doc @> $1 ORDER BY seq LIMIT 1)",
            t = self.table()
        );
        let result = sqlx::query(&sql).bind(filter).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_many(&self, filter: Value) -> Result<u64, DatabaseError> {
        let sql = format!("DELETE FROM {} WHERE doc @> $1", self.table());
        let result = sqlx::query(&sql).bind(filter).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Case-insensitive substring match over top-level string fields.
    pub async fn search(&self, fields: &[&str], term: &str, limit: i64) -> Result<Vec<Value>, DatabaseError> {
        if fields.is_empty() {
            return Ok(Vec::new());
        }
        for field in fields {
            if !is_valid_field_name(field) {
                return Err(DatabaseError::InvalidFieldName(field.to_string()));
            }
        }

        let clause = fields
            .iter()
            .map(|f| format!("doc->>'{}' ILIKE $1", f))
            .collect::<Vec<_>>()
            .join(" OR ");
        let sql = format!(
            "SELECT doc FROM {} WHERE {} ORDER BY seq LIMIT $2",
            self.table(),
            clause
        );
        let rows = sqlx::query(&sql)
            .bind(like_pattern(term))
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(|r| Ok(r.try_get::<Value, _>("doc")?)).collect()
    }

    /// Removes every document, used by the static data importer.
    pub async fn clear(&self) -> Result<u64, DatabaseError> {
        let sql = format!("DELETE FROM {}", self.table());
        Ok(sqlx::query(&sql).execute(&self.pool).await?.rows_affected())
    }
}

// Array `$2` holds an element with id `$4`
const HAS_ITEM: &str = "doc->$2 @> jsonb_build_array(jsonb_build_object('id', $4::text))";

/// Field names are interpolated into SQL, so only `[A-Za-z0-9_]` is accepted.
fn is_valid_field_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// `%term%` with LIKE metacharacters escaped.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_field_names() {
        assert!(is_valid_field_name("name"));
        assert!(is_valid_field_name("icao_code"));
        assert!(!is_valid_field_name(""));
        assert!(!is_valid_field_name("name' OR 1=1 --"));
    }

    #[test]
    fn escapes_like_patterns() {
        assert_eq!(like_pattern("boeing"), "%boeing%");
        assert_eq!(like_pattern("100%_"), "%100\\%\\_%");
    }

    #[test]
    fn collection_names_are_unique_table_names() {
        let names: std::collections::HashSet<&str> = DbCollection::ALL.iter().map(|c| c.as_str()).collect();
        assert_eq!(names.len(), DbCollection::ALL.len());
        assert!(names.iter().all(|n| is_valid_field_name(n)));
    }
}
