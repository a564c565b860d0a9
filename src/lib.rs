pub mod analytics;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod services;
pub mod state;
pub mod web;

use crate::services::uploads::PUBLIC_PREFIX;
use crate::state::SharedState;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

/// Uploads (answer videos, resume PDFs) may be large.
pub const MAX_BODY_BYTES: usize = 100 * 1024 * 1024;

/// Full application router with static uploads, CORS and request tracing.
pub fn app(state: SharedState, cors_origin: &str) -> anyhow::Result<Router> {
    let origin: HeaderValue = cors_origin.parse()?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    let uploads = ServeDir::new(state.uploads.dir());

    Ok(Router::new()
        .merge(web::routes(state))
        .nest_service(PUBLIC_PREFIX, uploads)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}
