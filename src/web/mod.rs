pub mod auth;
pub mod dashboard;
pub mod extract;
pub mod form;
pub mod interview;
pub mod vapi;

use crate::state::SharedState;
use axum::{routing::get, Router};

async fn health() -> &'static str {
    "OK"
}

pub fn routes(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/session", interview::router(state.clone()))
        .nest("/api/dashboard", dashboard::router(state.clone()))
        .nest("/api/vapi", vapi::router(state))
}
