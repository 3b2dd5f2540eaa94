//! Views over one person's portfolio, addressed by owner id.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use folio_core::{AggregateResult, DevelopmentExperience, SuccessRate, TimelineEntry};
use folio_views::{
    CurrentEducationView, GoalView, LearningView, RecordView, SkillCategoriesView, SkillView,
};

use super::{cached, param, parse_id};
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TopSkillsQuery {
    pub min_level: Option<i32>,
    pub limit: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpcomingQuery {
    pub days_ahead: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

type OwnerPath = Path<String>;

pub async fn timeline(
    State(state): State<AppState>,
    Path(owner): OwnerPath,
) -> Result<Json<Vec<TimelineEntry>>, ApiError> {
    let owner_id = parse_id("owner_id", &owner)?;
    cached(&state, "timeline", owner_id, &[], || {
        state.views.timeline(owner_id)
    })
    .await
}

pub async fn milestones(
    State(state): State<AppState>,
    Path(owner): OwnerPath,
) -> Result<Json<Vec<TimelineEntry>>, ApiError> {
    let owner_id = parse_id("owner_id", &owner)?;
    cached(&state, "milestones", owner_id, &[], || {
        state.views.learning_milestones(owner_id)
    })
    .await
}

pub async fn project_categories(
    State(state): State<AppState>,
    Path(owner): OwnerPath,
) -> Result<Json<AggregateResult>, ApiError> {
    let owner_id = parse_id("owner_id", &owner)?;
    cached(&state, "project_categories", owner_id, &[], || {
        state.views.project_categories(owner_id)
    })
    .await
}

pub async fn success_rate(
    State(state): State<AppState>,
    Path(owner): OwnerPath,
) -> Result<Json<SuccessRate>, ApiError> {
    let owner_id = parse_id("owner_id", &owner)?;
    cached(&state, "success_rate", owner_id, &[], || {
        state.views.success_rate(owner_id)
    })
    .await
}

pub async fn experience(
    State(state): State<AppState>,
    Path(owner): OwnerPath,
) -> Result<Json<DevelopmentExperience>, ApiError> {
    let owner_id = parse_id("owner_id", &owner)?;
    cached(&state, "experience", owner_id, &[], || {
        state.views.development_experience(owner_id)
    })
    .await
}

pub async fn skill_categories(
    State(state): State<AppState>,
    Path(owner): OwnerPath,
) -> Result<Json<SkillCategoriesView>, ApiError> {
    let owner_id = parse_id("owner_id", &owner)?;
    cached(&state, "skill_categories", owner_id, &[], || {
        state.views.skill_categories(owner_id)
    })
    .await
}

pub async fn top_skills(
    State(state): State<AppState>,
    Path(owner): OwnerPath,
    query: Result<Query<TopSkillsQuery>, QueryRejection>,
) -> Result<Json<Vec<SkillView>>, ApiError> {
    let owner_id = parse_id("owner_id", &owner)?;
    let Query(q) = query?;
    let params = [param("min_level", q.min_level), param("limit", q.limit)];
    cached(&state, "top_skills", owner_id, &params, || {
        state.views.top_skills(owner_id, q.min_level, q.limit)
    })
    .await
}

pub async fn featured(
    State(state): State<AppState>,
    Path(owner): OwnerPath,
    query: Result<Query<LimitQuery>, QueryRejection>,
) -> Result<Json<Vec<RecordView>>, ApiError> {
    let owner_id = parse_id("owner_id", &owner)?;
    let Query(q) = query?;
    let params = [param("limit", q.limit)];
    cached(&state, "featured", owner_id, &params, || {
        state.views.featured(owner_id, q.limit)
    })
    .await
}

pub async fn current_education(
    State(state): State<AppState>,
    Path(owner): OwnerPath,
) -> Result<Json<Option<CurrentEducationView>>, ApiError> {
    let owner_id = parse_id("owner_id", &owner)?;
    cached(&state, "current_education", owner_id, &[], || {
        state.views.current_education(owner_id)
    })
    .await
}

pub async fn learning_in_progress(
    State(state): State<AppState>,
    Path(owner): OwnerPath,
) -> Result<Json<Vec<LearningView>>, ApiError> {
    let owner_id = parse_id("owner_id", &owner)?;
    cached(&state, "learning_in_progress", owner_id, &[], || {
        state.views.learning_in_progress(owner_id)
    })
    .await
}

pub async fn upcoming_goals(
    State(state): State<AppState>,
    Path(owner): OwnerPath,
    query: Result<Query<UpcomingQuery>, QueryRejection>,
) -> Result<Json<Vec<GoalView>>, ApiError> {
    let owner_id = parse_id("owner_id", &owner)?;
    let Query(q) = query?;
    let params = [param("days_ahead", q.days_ahead)];
    cached(&state, "upcoming_goals", owner_id, &params, || {
        state.views.upcoming_goals(owner_id, q.days_ahead)
    })
    .await
}

pub async fn search(
    State(state): State<AppState>,
    Path(owner): OwnerPath,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Vec<RecordView>>, ApiError> {
    let owner_id = parse_id("owner_id", &owner)?;
    let Query(q) = query?;
    let term = q.q.unwrap_or_default();
    let params = [("q", term.trim().to_lowercase())];
    cached(&state, "search", owner_id, &params, || {
        state.views.search(owner_id, &term)
    })
    .await
}
