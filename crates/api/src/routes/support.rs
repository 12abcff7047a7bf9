//! Support route handlers: transactional reply email and the session CSRF
//! token.

use axum::{Json, extract::State};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::instrument;

use orbit_market_core::Email;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Session key holding the CSRF token.
pub const SESSION_CSRF_KEY: &str = "csrf_token";

/// Send-email request payload.
#[derive(Debug, Deserialize)]
pub struct SendEmailRequest {
    pub to: String,
    pub text: String,
}

/// Send a reply email to a customer query.
///
/// POST /sendemail
#[instrument(skip(state, request), fields(to = %request.to))]
pub async fn send_email(
    State(state): State<AppState>,
    Json(request): Json<SendEmailRequest>,
) -> Result<Json<Value>> {
    let to = Email::parse(request.to.trim()).map_err(|e| AppError::BadRequest(e.to_string()))?;

    state.mailer().send_reply(to.as_str(), &request.text).await?;

    Ok(Json(json!({ "message": "Email sent successfully" })))
}

/// Issue a CSRF token bound to the caller's session.
///
/// GET /api/getCSRFToken
#[instrument(skip(session))]
pub async fn csrf_token(session: Session) -> Result<Json<Value>> {
    let token = generate_csrf_token();

    session
        .insert(SESSION_CSRF_KEY, token.clone())
        .await
        .map_err(|e| AppError::Internal(format!("session store failed: {e}")))?;

    Ok(Json(json!({ "CSRFToken": token })))
}

/// Generate a URL-safe random token from 32 bytes of OS randomness.
#[must_use]
fn generate_csrf_token() -> String {
    use rand::Rng;
    let bytes: [u8; 32] = rand::rng().random();
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csrf_token_shape() {
        let token = generate_csrf_token();
        // 32 bytes -> 43 base64url chars, no padding
        assert_eq!(token.len(), 43);
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_csrf_tokens_are_unique() {
        let a = generate_csrf_token();
        let b = generate_csrf_token();
        assert_ne!(a, b);
    }
}
