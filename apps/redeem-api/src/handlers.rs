//! HTTP handlers for the redemption API

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::Utc;
use pdfmate_license::{redeem as redeem_code, RedeemResponse};
use serde_json::Value;

use crate::error::ApiError;
use crate::state::AppState;

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

/// Redeem an activation code
///
/// The body is taken as loose JSON so that a missing or non-string `code`
/// is reported as 400 rather than the extractor's default rejection.
pub async fn redeem(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<RedeemResponse>, ApiError> {
    let Json(body) = payload.map_err(|e| {
        tracing::debug!("Rejected redeem body: {}", e);
        ApiError::InvalidRequest("Valid code is required".into())
    })?;

    let code = body
        .get("code")
        .and_then(Value::as_str)
        .filter(|code| !code.is_empty())
        .ok_or_else(|| ApiError::InvalidRequest("Valid code is required".into()))?;

    let redemption = redeem_code(&state.store, code.trim(), Utc::now()).await?;

    Ok(Json(RedeemResponse::activated(redemption.expires_at)))
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
