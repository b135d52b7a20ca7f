pub mod auth_routes;
pub mod errors;
pub mod forms_routes;
pub mod models;
pub mod quotes_routes;
pub mod routes;
pub mod state;

pub use errors::ApiError;
pub use models::*;
pub use routes::{cors_layer, create_router};
pub use state::AppState;
