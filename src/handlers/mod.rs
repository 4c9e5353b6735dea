// handlers/mod.rs - HTTP handlers in two tiers
//
// Public (no auth) -> Protected (bearer JWT, `CurrentUser` injected by middleware::require_user)

pub mod protected; // Per-user resources, proxies, Strava and backup
pub mod public;    // Service info, health and token acquisition
