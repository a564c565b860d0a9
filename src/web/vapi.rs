use crate::error::{ApiError, ApiResult};
use crate::state::SharedState;
use crate::web::extract::ApiJson;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CallRequest {
    #[serde(default)]
    assistant_id: String,
    #[serde(default)]
    question: Option<String>,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/call", post(start_call))
        .with_state(state)
}

async fn start_call(
    State(state): State<SharedState>,
    ApiJson(payload): ApiJson<CallRequest>,
) -> ApiResult<Response> {
    if payload.assistant_id.trim().is_empty() {
        return Err(ApiError::bad_request("assistantId is required."));
    }

    let reply = state
        .vapi
        .start_web_call(&payload.assistant_id, payload.question.as_deref())
        .await
        .map_err(|e| ApiError::failed("Vapi call failed.", e))?;

    Ok((relay_status(reply.status), Json(reply.body)).into_response())
}

/// Any upstream success becomes a plain 200; errors keep their status.
fn relay_status(upstream: u16) -> StatusCode {
    match StatusCode::from_u16(upstream) {
        Ok(status) if status.is_success() => StatusCode::OK,
        Ok(status) => status,
        Err(_) => StatusCode::BAD_GATEWAY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_status() {
        assert_eq!(relay_status(201), StatusCode::OK);
        assert_eq!(relay_status(200), StatusCode::OK);
        assert_eq!(relay_status(401), StatusCode::UNAUTHORIZED);
        assert_eq!(relay_status(503), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(relay_status(42), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_missing_assistant_id_deserializes_blank() {
        let request: CallRequest = serde_json::from_str("{}").unwrap();
        assert!(request.assistant_id.is_empty());
        assert!(request.question.is_none());
    }
}
