use axum::{routing::post, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub mod handlers;
pub mod response;
pub mod state;

pub use response::ApiResponse;
pub use state::AppState;

pub async fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/webhooks/meeting", post(handlers::webhook::receive_meeting))
        .route("/digest/run", post(handlers::digest::run_digest))
        .route("/newsletter/run", post(handlers::newsletter::run_newsletter))
        .route("/summarize", post(handlers::transcript::summarize_video))
        .route("/transcript", post(handlers::transcript::fetch_video_transcript))
        .layer(cors)
        .with_state(Arc::new(state))
}

pub mod prelude {
    pub use crate::{ApiResponse, AppState};
    pub use dg_core::{Error, Result};
}
