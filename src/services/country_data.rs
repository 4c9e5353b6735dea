// services/country_data.rs - ISO 3166 alpha-2 codes to country names

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Deserialize;
use tracing::error;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CountryInfo {
    pub name: String,
}

static COUNTRIES: Lazy<HashMap<String, CountryInfo>> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../static_data/countries.json")).unwrap_or_else(|e| {
        error!("Embedded country table is invalid: {}", e);
        HashMap::new()
    })
});

/// Country name for a two-letter code, case-insensitive.
pub fn country_name(code: &str) -> Option<&'static str> {
    COUNTRIES.get(&code.to_uppercase()).map(|c| c.name.as_str())
}

/// Country name for display. Codes missing from the table come back upper-cased
/// instead of failing the whole lookup.
pub fn country_label(code: &str) -> String {
    country_name(code)
        .map(str::to_string)
        .unwrap_or_else(|| code.to_uppercase())
}
