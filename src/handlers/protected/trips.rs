// handlers/protected/trips.rs - /trips overview and the static airport/airline/aircraft lookups

use axum::{extract::State, Extension};
use serde_json::{json, Map, Value};
use tracing::{error, info};

use crate::database::{DatabaseError, DbCollection};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser, ValidQuery};
use crate::models::common::ListResponse;
use crate::models::flights::{Aircraft, Airline, Airport, Flight};
use crate::models::trips::{AircraftQuery, AirlineQuery, AirportQuery, Trips};
use crate::models::visits::Visit;
use crate::models::Entity;
use crate::services::gemini::{airport_data_prompt, GeminiApi};
use crate::state::AppState;

const SEARCH_LIMIT: i64 = 100;

fn decode_all<T: serde::de::DeserializeOwned>(docs: Vec<Value>) -> Result<Vec<T>, DatabaseError> {
    docs.into_iter()
        .map(|doc| serde_json::from_value(doc).map_err(|e| DatabaseError::Document(e.to_string())))
        .collect()
}

/// GET /trips - all flights and visits of the caller
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Trips> {
    let load = async {
        let owner = json!({ "userId": user.id });
        let flights = state.db.collection(DbCollection::Flights).find(owner.clone()).await?;
        let visits = state.db.collection(DbCollection::Visits).find(owner).await?;
        Ok::<_, DatabaseError>(Trips {
            flights: flights.into_iter().map(Flight::from_document).collect::<Result<_, _>>()?,
            visits: visits.into_iter().map(Visit::from_document).collect::<Result<_, _>>()?,
        })
    };

    let trips = load.await.map_err(|e| {
        error!("Error getting trips data for user {}: {}", user.id, e);
        ApiError::internal(format!("Failed to retrieve trips data: {}", e))
    })?;
    Ok(ApiResponse::success(trips))
}

/// Accept a generated record only when it names the requested airport and every field is filled.
fn complete_airport(data: Map<String, Value>, iata: &str) -> Option<Airport> {
    let text = |key: &str| data.get(key).and_then(Value::as_str).filter(|s| !s.is_empty());
    let number = |key: &str| data.get(key).and_then(Value::as_f64).filter(|n| *n != 0.0);

    if text("iata")? != iata {
        return None;
    }
    Some(Airport {
        iata: iata.to_string(),
        icao: text("icao")?.to_string(),
        name: text("name")?.to_string(),
        city: text("city")?.to_string(),
        country: text("country")?.to_string(),
        lat: number("lat")?,
        lng: number("lng")?,
    })
}

/// GET /trips/airports?iata= - local table first, then Gemini with search grounding
pub async fn get_airport(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<AirportQuery>,
) -> ApiResult<Airport> {
    let iata = query.iata.to_uppercase();
    let failure = |e: String| {
        error!("Error fetching airport data for {}: {}", iata, e);
        ApiError::internal(format!("Failed to retrieve airport data: {}", e))
    };

    let stored = state
        .db
        .collection(DbCollection::Airports)
        .find_one(json!({ "iata": iata }))
        .await
        .map_err(|e| failure(e.to_string()))?;

    if let Some(doc) = stored {
        let airport: Airport = serde_json::from_value(doc).map_err(|e| failure(e.to_string()))?;
        return Ok(ApiResponse::success(airport));
    }

    let integrations = &state.config.integrations;
    let gemini = GeminiApi::new(
        &state.http,
        &integrations.gemini_url,
        &integrations.gemini_api_key,
        &integrations.gemini_model,
    );
    let data = gemini
        .generate_json(&airport_data_prompt(&iata))
        .await
        .map_err(|e| failure(e.to_string()))?;

    info!("Gemini answered for airport {}: {:?}", iata, data);
    match complete_airport(data, &iata) {
        Some(airport) => Ok(ApiResponse::success(airport)),
        None => {
            error!("Incomplete airport data received for {}", iata);
            Err(ApiError::not_found("Airport data"))
        }
    }
}

/// GET /trips/aircrafts?search= - name or ICAO contains the term
pub async fn get_aircrafts(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<AircraftQuery>,
) -> ApiResult<ListResponse<Aircraft>> {
    let failure = |e: DatabaseError| {
        error!("Error searching aircrafts for query '{}': {}", query.search, e);
        ApiError::internal(format!("Failed to search aircrafts: {}", e))
    };

    let docs = state
        .db
        .collection(DbCollection::Aircrafts)
        .search(&["name", "icao"], &query.search, SEARCH_LIMIT)
        .await
        .map_err(failure)?;
    let aircrafts = decode_all(docs).map_err(failure)?;

    if aircrafts.is_empty() {
        info!("No aircrafts found for query: {}", query.search);
    }
    Ok(ApiResponse::success(ListResponse::new(aircrafts)))
}

/// GET /trips/airlines?iata=&name= - IATA wins when both are given
pub async fn get_airlines(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<AirlineQuery>,
) -> ApiResult<ListResponse<Airline>> {
    let iata = query.iata.as_deref().filter(|s| !s.is_empty());
    let name = query.name.as_deref().filter(|s| !s.is_empty());

    let (field, term) = match (iata, name) {
        (Some(iata), _) => ("iata", iata),
        (None, Some(name)) => ("name", name),
        (None, None) => return Ok(ApiResponse::success(ListResponse::new(Vec::new()))),
    };

    let failure = |e: DatabaseError| {
        error!("Error searching airlines for iata '{:?}' and name '{:?}': {}", iata, name, e);
        ApiError::internal(format!("Failed to search airlines: {}", e))
    };

    let docs = state
        .db
        .collection(DbCollection::Airlines)
        .search(&[field], term, SEARCH_LIMIT)
        .await
        .map_err(failure)?;
    Ok(ApiResponse::success(ListResponse::new(decode_all(docs).map_err(failure)?)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generated(overrides: Value) -> Map<String, Value> {
        let mut base = json!({
            "iata": "VIE",
            "icao": "LOWW",
            "name": "Vienna International Airport",
            "city": "Vienna",
            "country": "Austria",
            "lat": 48.1103,
            "lng": 16.5697
        });
        if let (Some(base), Value::Object(extra)) = (base.as_object_mut(), overrides) {
            base.extend(extra);
        }
        match base {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn accepts_complete_matching_record() {
        let airport = complete_airport(generated(json!({})), "VIE").unwrap();
        assert_eq!(airport.icao, "LOWW");
        assert_eq!(airport.lat, 48.1103);
    }

    #[test]
    fn rejects_other_airport_or_missing_fields() {
        assert!(complete_airport(generated(json!({ "iata": "BUD" })), "VIE").is_none());
        assert!(complete_airport(generated(json!({ "icao": "" })), "VIE").is_none());
        assert!(complete_airport(generated(json!({ "city": null })), "VIE").is_none());
        assert!(complete_airport(generated(json!({ "lat": 0.0 })), "VIE").is_none());
        assert!(complete_airport(generated(json!({ "lng": "16.5" })), "VIE").is_none());
    }
}
