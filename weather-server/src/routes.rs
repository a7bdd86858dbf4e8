//! Route definitions

use std::path::{Path, PathBuf};

use axum::{Router, middleware, routing::get};
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::{
    handlers,
    middleware::{PanicResponder, api_root_not_found, cors_layer, security_headers},
    state::AppState,
};

/// Routes under `/api`; unknown paths get a JSON 404.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/weather", get(handlers::weather::get_weather))
        .fallback(handlers::api_not_found)
}

/// API routes plus the single-page frontend for every other path.
///
/// Panics inside handlers are converted into a 500 envelope.
pub fn create_router(state: AppState, static_dir: &Path) -> Router {
    let spa = ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));
    let panic_layer = CatchPanicLayer::custom(PanicResponder {
        expose_details: state.expose_errors,
    });

    Router::new()
        .nest("/api", api_router())
        .fallback_service(spa)
        .with_state(state)
        .layer(middleware::from_fn(api_root_not_found))
        .layer(panic_layer)
}

/// Path of the frontend entry point when it is missing from `static_dir`.
pub fn missing_frontend(static_dir: &Path) -> Option<PathBuf> {
    let index = static_dir.join("index.html");
    (!index.is_file()).then_some(index)
}

/// The full application: routes wrapped in the production middleware stack.
pub fn build_app(state: AppState, static_dir: &Path, allowed_origins: &[String]) -> Router {
    create_router(state, static_dir)
        .layer(middleware::from_fn(security_headers))
        .layer(CompressionLayer::new())
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
}
