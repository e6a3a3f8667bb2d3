pub mod auth;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod router;
pub mod types;

pub use auth::AuthenticatedUser;
pub use error::ApiError;
pub use extract::{ApiJson, ApiPath};
pub use handlers::AppState;
pub use router::{RouterOptions, create_router};
pub use types::*;
