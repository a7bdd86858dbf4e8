//! HTTP layer of the weather proxy.
//!
//! Exposes `/api/health` and `/api/weather` and serves the single-page
//! frontend for every other path.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{build_app, create_router};
pub use state::AppState;
