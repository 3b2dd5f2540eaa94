//! HTTP handlers for folio-api.

pub mod entities;
pub mod people;

use std::future::Future;

use axum::response::IntoResponse;
use axum::Json;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::ApiError;
use crate::AppState;

pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Parse a numeric path segment; non-integers are a bad request.
pub(crate) fn parse_id(name: &str, raw: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("{} must be an integer, got '{}'", name, raw)))
}

/// Serve a view through the view cache.
pub(crate) async fn cached<T, F, Fut>(
    state: &AppState,
    operation: &str,
    owner_id: i64,
    params: &[(&str, String)],
    compute: F,
) -> Result<Json<T>, ApiError>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = folio_core::Result<T>>,
{
    let key = state.cache.cache_key(operation, owner_id, params);
    let value = state.cache.get_or_compute(&key, compute).await?;
    Ok(Json(value))
}

/// Cache key parameter for an optional query value.
pub(crate) fn param<T: ToString>(name: &'static str, value: Option<T>) -> (&'static str, String) {
    (name, value.map(|v| v.to_string()).unwrap_or_default())
}
