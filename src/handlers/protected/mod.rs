// handlers/protected/mod.rs - endpoints behind the bearer JWT
//
// Every handler here receives `Extension<CurrentUser>`, set by middleware::require_user,
// and scopes its queries to that user.

pub mod activities;   // /activities config, goals and chores
pub mod auth;         // /auth/token-refresh, /auth/set-password
pub mod crud;         // Generic list/get/create/update/delete for simple resources
pub mod data_backup;  // /data-backup/email
pub mod flights;      // /flights, with the is_planned filter
pub mod proxy;        // /proxy/location/city, /proxy/translate
pub mod reddit;       // /reddit config and image feeds
pub mod start_settings; // /start-settings
pub mod strava;       // /strava/routes sync and routemap
pub mod trips;        // /trips overview and static lookups
