use serde_json::json;

use crate::cli::{utils::output_success, OutputFormat};
use crate::config::AppConfig;
use crate::database::{schema, DatabaseManager, DbCollection};

pub async fn handle(config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let db = DatabaseManager::connect_lazy(&config.database)?;
    schema::bootstrap(&db).await?;
    db.close_all().await;

    let collections: Vec<&str> = DbCollection::ALL.iter().map(|c| c.as_str()).collect();
    output_success(
        &output_format,
        "Schema is up to date",
        Some(json!({ "collections": collections })),
    )
}
