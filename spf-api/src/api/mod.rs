//! HTTP API handlers for spf-api

pub mod export;
pub mod filter;
pub mod health;
pub mod upload;

use axum::routing::post;
use axum::Router;

use crate::AppState;

pub use export::export_speakers;
pub use filter::filter_speakers;
pub use health::{health_check, health_routes, service_info};
pub use upload::upload_csv;

/// CSV upload, filtering and export routes
pub fn speaker_routes() -> Router<AppState> {
    Router::new()
        .route("/api/upload-csv", post(upload_csv))
        .route("/api/filter-speakers-csv", post(filter_speakers))
        .route("/api/export-csv/:format", post(export_speakers))
}
