// handlers/public/root.rs - GET / service info

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

pub async fn get(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "name": "PK-Central API",
        "version": env!("CARGO_PKG_VERSION"),
        "environment": state.config.environment,
        "description": "API for multiple PK-Central services",
    }))
}
