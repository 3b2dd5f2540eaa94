//! # folio-views
//!
//! Read-side views over a person's portfolio.
//!
//! - [`resolver`]: merges the metadata overlay over computed defaults
//! - [`merger`]: builds cross-entity timelines and milestone lists
//! - [`aggregate`]: distributions, rates, and other pure statistics
//! - [`portfolio`]: the validated query surface used by the HTTP API

pub mod aggregate;
pub mod merger;
pub mod portfolio;
pub mod resolver;

pub use merger::CrossEntityMerger;
pub use portfolio::{
    Badge, CurrentEducationView, GoalView, LearningView, PortfolioViews, RecordView, SkillCategoriesView,
    SkillView,
};
pub use resolver::MetadataResolver;
