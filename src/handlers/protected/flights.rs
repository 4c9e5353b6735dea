// handlers/protected/flights.rs - /flights, CRUD plus GET ?is_planned=

use axum::{
    extract::State,
    routing::{get, put},
    Extension, Router,
};
use serde_json::{Map, Value};

use super::crud;
use crate::database::CrudHandler;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser, ValidQuery};
use crate::models::common::ListResponse;
use crate::models::flights::{Flight, FlightRequest, FlightsQuery};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/flights", get(list).post(crud::create::<Flight, FlightRequest>))
        .route(
            "/flights/:id",
            put(crud::update::<Flight, FlightRequest>)
                .get(crud::show::<Flight>)
                .delete(crud::delete::<Flight>),
        )
}

/// GET /flights - every flight, or only planned / only past ones
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidQuery(query): ValidQuery<FlightsQuery>,
) -> ApiResult<ListResponse<Flight>> {
    let mut filter = Map::new();
    if let Some(is_planned) = query.is_planned {
        filter.insert("isPlanned".to_string(), Value::Bool(is_planned));
    }

    let flights = CrudHandler::<Flight>::new(&state.db, &user.id)
        .get_filtered(filter)
        .await?;
    Ok(ApiResponse::success(flights))
}
