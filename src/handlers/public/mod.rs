// handlers/public/mod.rs - endpoints that need no token
//
// Route prefix: none (`/`, `/health`, `/auth/*`)

pub mod auth;   // Login codes, password signup and login
pub mod health; // GET /health
pub mod root;   // GET /
