pub mod auth;
pub mod response;
pub mod validated;

pub use auth::{require_user, CurrentUser};
pub use response::{ApiResponse, ApiResult};
pub use validated::{ValidJson, ValidQuery};
