//! folio-api library: router, state, and services for the HTTP server.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use folio_core::defaults::MAX_BODY_SIZE_BYTES;
use folio_views::PortfolioViews;

use handlers::{entities, people};
use middleware::{rate_limit_middleware, GlobalRateLimiter, MakeRequestUuidV7};
use services::ViewCache;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub views: PortfolioViews,
    pub cache: ViewCache,
    /// Global rate limiter (None if rate limiting is disabled).
    pub rate_limiter: Option<Arc<GlobalRateLimiter>>,
}

impl AppState {
    pub fn new(views: PortfolioViews, cache: ViewCache) -> Self {
        Self {
            views,
            cache,
            rate_limiter: None,
        }
    }

    pub fn with_rate_limiter(mut self, limiter: Option<Arc<GlobalRateLimiter>>) -> Self {
        self.rate_limiter = limiter;
        self
    }
}

/// Build the API router. CORS is layered on by the binary.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/v1/people/:owner_id/timeline", get(people::timeline))
        .route("/api/v1/people/:owner_id/milestones", get(people::milestones))
        .route(
            "/api/v1/people/:owner_id/projects/categories",
            get(people::project_categories),
        )
        .route(
            "/api/v1/people/:owner_id/projects/success-rate",
            get(people::success_rate),
        )
        .route("/api/v1/people/:owner_id/experience", get(people::experience))
        .route(
            "/api/v1/people/:owner_id/skills/categories",
            get(people::skill_categories),
        )
        .route("/api/v1/people/:owner_id/skills/top", get(people::top_skills))
        .route("/api/v1/people/:owner_id/featured", get(people::featured))
        .route(
            "/api/v1/people/:owner_id/education/current",
            get(people::current_education),
        )
        .route(
            "/api/v1/people/:owner_id/learning/in-progress",
            get(people::learning_in_progress),
        )
        .route(
            "/api/v1/people/:owner_id/goals/upcoming",
            get(people::upcoming_goals),
        )
        .route("/api/v1/people/:owner_id/search", get(people::search))
        .route(
            "/api/v1/entities/:kind/:id/presentation",
            get(entities::presentation),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE_BYTES))
        .with_state(state)
}
