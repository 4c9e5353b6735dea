// app.rs - router assembly: public routes, protected routes behind require_user, global layers

use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, patch, post, put},
    Router,
};
use tower::Layer;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    normalize_path::{NormalizePath, NormalizePathLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::handlers::{protected, public};
use crate::middleware::require_user;
use crate::models::{
    birthdays::{Birthday, BirthdayRequest},
    notes::{Note, NoteRequest},
    personal_data::{PersonalData, PersonalDataRequest},
    shortcuts::{Shortcut, ShortcutRequest},
    visits::{Visit, VisitRequest},
};
use crate::state::AppState;

/// The full service. Trailing slashes are trimmed before routing, so `/notes/` and `/notes` match.
pub fn build_app(state: AppState) -> NormalizePath<Router> {
    let router = Router::new()
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .layer(cors_layer(&state.config.security.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    NormalizePathLayer::trim_trailing_slash().layer(router)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

fn public_routes() -> Router<AppState> {
    use public::{auth, health, root};

    Router::new()
        .route("/", get(root::get))
        .route("/health", get(health::get))
        .route("/auth/login-code", post(auth::login_code))
        .route("/auth/instant-login-code", post(auth::instant_login_code))
        .route("/auth/verify-login-code", post(auth::verify_code))
        .route("/auth/password-signup", post(auth::password_signup))
        .route("/auth/password-login", post(auth::password_login))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use protected::{activities, auth, crud, data_backup, flights, proxy, reddit, start_settings, strava, trips};

    Router::new()
        // Session
        .route("/auth/token-refresh", post(auth::token_refresh))
        .route("/auth/set-password", post(auth::set_password))
        // Simple per-user collections
        .merge(crud::routes::<Note, NoteRequest>("/notes"))
        .merge(crud::routes::<Birthday, BirthdayRequest>("/birthdays"))
        .merge(crud::routes::<Shortcut, ShortcutRequest>("/shortcuts"))
        .merge(crud::routes::<PersonalData, PersonalDataRequest>("/personal-data"))
        .merge(crud::routes::<Visit, VisitRequest>("/visits"))
        .merge(flights::routes())
        // Singletons
        .route("/start-settings", get(start_settings::get).put(start_settings::put))
        .route("/activities", get(activities::get))
        .route("/activities/goals", patch(activities::patch_goals))
        .route("/activities/chores", post(activities::post_chore))
        .route(
            "/activities/chores/:id",
            put(activities::put_chore).delete(activities::delete_chore),
        )
        .route("/reddit/config", get(reddit::get_config).put(reddit::put_config))
        .route("/reddit/subs", post(reddit::post_subs))
        .route("/reddit/users", post(reddit::post_users))
        // Trips and lookups
        .route("/trips", get(trips::get))
        .route("/trips/airports", get(trips::get_airport))
        .route("/trips/aircrafts", get(trips::get_aircrafts))
        .route("/trips/airlines", get(trips::get_airlines))
        // Third-party proxies
        .route("/proxy/location/city", get(proxy::get_city))
        .route("/proxy/translate", post(proxy::post_translate))
        // Strava
        .route("/strava/routes/sync", post(strava::post_sync))
        .route("/strava/routes/routemap", get(strava::get_routemap))
        .route("/data-backup/email", get(data_backup::get_email))
        .route_layer(middleware::from_fn_with_state(state, require_user))
}
