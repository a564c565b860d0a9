use crate::db;
use crate::error::ApiError;
use crate::state::SharedState;
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, HeaderMap},
};
use base64::{engine::general_purpose, Engine as _};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Name of the cookie carrying the auth token.
pub const TOKEN_COOKIE: &str = "jwt";
const TOKEN_TTL_DAYS: i64 = 7;

#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub user_id: Uuid,
    pub exp: i64,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("invalid token format")]
    Invalid,
    #[error("signature mismatch")]
    Signature,
    #[error("expired")]
    Expired,
}

fn mac_for(key: &[u8], payload: &[u8]) -> Result<HmacSha256, TokenError> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|_| TokenError::Invalid)?;
    mac.update(payload);
    Ok(mac)
}

/// Issues a token valid for seven days. Tokens are normally minted by the
/// auth service sharing `SESSION_KEY`.
pub fn sign_token(user_id: Uuid, key: &[u8]) -> Result<String, TokenError> {
    let exp = Utc::now() + Duration::days(TOKEN_TTL_DAYS);
    sign_token_until(user_id, exp.timestamp(), key)
}

pub fn sign_token_until(user_id: Uuid, exp: i64, key: &[u8]) -> Result<String, TokenError> {
    let payload = format!("{user_id}|{exp}");
    let sig = mac_for(key, payload.as_bytes())?.finalize().into_bytes();
    Ok(format!(
        "{}.{}",
        general_purpose::STANDARD.encode(payload.as_bytes()),
        general_purpose::STANDARD.encode(sig)
    ))
}

pub fn verify_token(token: &str, key: &[u8]) -> Result<TokenClaims, TokenError> {
    let (payload_b64, sig_b64) = token.split_once('.').ok_or(TokenError::Invalid)?;
    let payload_bytes = general_purpose::STANDARD
        .decode(payload_b64)
        .map_err(|_| TokenError::Invalid)?;
    let sig_bytes = general_purpose::STANDARD
        .decode(sig_b64)
        .map_err(|_| TokenError::Invalid)?;

    mac_for(key, &payload_bytes)?
        .verify_slice(&sig_bytes)
        .map_err(|_| TokenError::Signature)?;

    let payload = String::from_utf8(payload_bytes).map_err(|_| TokenError::Invalid)?;
    let (user_part, exp_part) = payload.split_once('|').ok_or(TokenError::Invalid)?;
    let user_id = Uuid::parse_str(user_part).map_err(|_| TokenError::Invalid)?;
    let exp: i64 = exp_part.parse().map_err(|_| TokenError::Invalid)?;
    if Utc::now().timestamp() > exp {
        return Err(TokenError::Expired);
    }
    Ok(TokenClaims { user_id, exp })
}

/// Reads the token from `Authorization: Bearer` or the auth cookie.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(auth) = headers.get(axum::http::header::AUTHORIZATION) {
        if let Ok(val) = auth.to_str() {
            if let Some(bearer) = val.strip_prefix("Bearer ") {
                return Some(bearer.trim().to_string());
            }
        }
    }
    let cookies = headers.get(axum::http::header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        pair.trim()
            .strip_prefix(TOKEN_COOKIE)
            .and_then(|rest| rest.strip_prefix('='))
            .map(str::to_string)
    })
}

/// Authenticated caller. Rejects with 401 unless the token verifies and the
/// user still exists; a failed lookup is a 500.
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    SharedState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let shared_state = SharedState::from_ref(state);

        let token = extract_token(&parts.headers).ok_or(ApiError::Unauthorized)?;

        let claims = verify_token(&token, &shared_state.session_key).map_err(|e| {
            tracing::warn!("Token verification failed: {}", e);
            ApiError::Unauthorized
        })?;

        let exists = db::user_exists(&shared_state.pool, claims.user_id)
            .await
            .map_err(|e| ApiError::failed("Internal Server Error", e))?;
        if !exists {
            tracing::warn!("Token for unknown user {}", claims.user_id);
            return Err(ApiError::Unauthorized);
        }

        Ok(AuthUser(claims.user_id))
    }
}
