use crate::api::AppState;
use crate::error::{AppError, Result};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};
use std::sync::Arc;

/// Guards routes that write to Plex or to disk.
///
/// Passes every request when no `API_TOKEN` is configured.
pub struct RequireToken;

#[async_trait]
impl FromRequestParts<Arc<AppState>> for RequireToken {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self> {
        let Some(expected) = state.api_token.as_deref() else {
            return Ok(RequireToken);
        };

        let token = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(AppError::Unauthorized)?;

        if token != expected {
            return Err(AppError::Unauthorized);
        }

        Ok(RequireToken)
    }
}
