use crate::analytics::dashboard::{self, DashboardSummary};
use crate::analytics::session_report::{self, SessionReport};
use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::state::SharedState;
use crate::web::auth::AuthUser;
use crate::web::interview::parse_id;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/dashboard", get(summary))
        .route("/session/:session_id/details", get(session_details))
        .with_state(state)
}

async fn summary(
    AuthUser(user_id): AuthUser,
    State(state): State<SharedState>,
) -> ApiResult<Json<DashboardSummary>> {
    let sessions = db::list_user_sessions(&state.pool, user_id)
        .await
        .map_err(|e| ApiError::failed("Failed to load dashboard data", e))?;
    let session_ids: Vec<_> = sessions.iter().map(|s| s.id).collect();
    let responses = db::list_responses_for_sessions(&state.pool, &session_ids)
        .await
        .map_err(|e| ApiError::failed("Failed to load dashboard data", e))?;

    let summary = {
        let mut rng = rand::thread_rng();
        dashboard::summarize(&sessions, &responses, &mut rng)
    };
    Ok(Json(summary))
}

async fn session_details(
    AuthUser(user_id): AuthUser,
    State(state): State<SharedState>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<SessionReport>> {
    let session_id = parse_id(&session_id)?;
    let session = db::find_user_session(&state.pool, session_id, user_id)
        .await
        .map_err(|e| ApiError::failed("Failed to load session details", e))?
        .ok_or_else(|| ApiError::not_found("Session not found"))?;

    let responses = db::list_session_responses(&state.pool, session_id)
        .await
        .map_err(|e| ApiError::failed("Failed to load session details", e))?;

    Ok(Json(session_report::build_report(session, responses)))
}
