use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Args, ValueEnum};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::cli::{utils::output_success, OutputFormat};
use crate::config::AppConfig;
use crate::database::{DatabaseManager, DbCollection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StaticCollection {
    Airlines,
    Airports,
    Aircrafts,
}

impl StaticCollection {
    fn collection(self) -> DbCollection {
        match self {
            StaticCollection::Airlines => DbCollection::Airlines,
            StaticCollection::Airports => DbCollection::Airports,
            StaticCollection::Aircrafts => DbCollection::Aircrafts,
        }
    }
}

#[derive(Args)]
pub struct ImportArgs {
    #[arg(value_enum, help = "Collection to seed")]
    pub collection: StaticCollection,

    #[arg(help = "JSON file holding an array of documents")]
    pub file: PathBuf,

    #[arg(long, help = "Delete existing documents first")]
    pub replace: bool,
}

/// Turns the file content into insertable documents. Documents without a string id get a fresh one.
pub fn prepare_documents(content: Value) -> anyhow::Result<Vec<Value>> {
    let Value::Array(items) = content else {
        bail!("Expected a JSON array of documents");
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(mut doc) => {
                let has_id = doc.get("id").and_then(Value::as_str).is_some_and(|id| !id.is_empty());
                if !has_id {
                    doc.insert("id".to_string(), json!(Uuid::new_v4().to_string()));
                }
                Ok(Value::Object(doc))
            }
            _ => bail!("Item {} is not a JSON object", index),
        })
        .collect()
}

pub async fn handle(args: ImportArgs, config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let raw = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let content: Value =
        serde_json::from_str(&raw).with_context(|| format!("Invalid JSON in {}", args.file.display()))?;
    let documents = prepare_documents(content)?;

    let db = DatabaseManager::connect_lazy(&config.database)?;
    let collection = db.collection(args.collection.collection());

    let removed = if args.replace { collection.clear().await? } else { 0 };
    for doc in &documents {
        collection.insert(doc.clone()).await?;
    }
    db.close_all().await;

    output_success(
        &output_format,
        &format!("Imported {} documents into {}", documents.len(), collection.name().as_str()),
        Some(json!({ "imported": documents.len(), "removed": removed })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assigns_missing_ids() {
        let docs = prepare_documents(json!([
            { "id": "keep", "iata": "OS" },
            { "iata": "LH" },
            { "id": "", "iata": "W6" }
        ]))
        .unwrap();

        assert_eq!(docs[0]["id"], "keep");
        assert!(Uuid::parse_str(docs[1]["id"].as_str().unwrap()).is_ok());
        assert_ne!(docs[2]["id"], "");
    }

    #[test]
    fn rejects_non_array_and_non_object_items() {
        assert!(prepare_documents(json!({ "iata": "OS" })).is_err());
        assert!(prepare_documents(json!([{ "iata": "OS" }, 42])).is_err());
    }

    #[test]
    fn static_collections_map_to_tables() {
        assert_eq!(StaticCollection::Airports.collection(), DbCollection::Airports);
        assert_eq!(StaticCollection::Aircrafts.collection().as_str(), "aircrafts");
    }
}
