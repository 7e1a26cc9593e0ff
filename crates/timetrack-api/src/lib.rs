pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::{Cli, Environment, Settings};
pub use error::{ApiError, ErrorResponse};
pub use routes::create_router;
pub use state::ApiState;
