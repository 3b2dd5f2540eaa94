//! Per-record presentation lookup.

use axum::extract::{Path, State};
use axum::Json;

use folio_core::{EntityKind, EntityRef};
use folio_views::RecordView;

use super::{cached, parse_id};
use crate::error::ApiError;
use crate::AppState;

/// `GET /api/v1/entities/:kind/:id/presentation`
pub async fn presentation(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
) -> Result<Json<RecordView>, ApiError> {
    let kind: EntityKind = kind.parse().map_err(ApiError::BadRequest)?;
    let id = parse_id("id", &id)?;
    let entity = EntityRef::new(kind, id);

    let operation = format!("presentation:{}", kind.as_str());
    cached(&state, &operation, id, &[], || state.views.presentation(entity)).await
}
