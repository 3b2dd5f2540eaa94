//! Centralized default constants for folio.
//!
//! **This module is the single source of truth** for shared default values.
//! Crates reference these constants instead of defining their own magic
//! numbers. Organized by domain area.

// =============================================================================
// PRESENTATION
// =============================================================================

/// Primary color used when no metadata, attribute, or table produced one.
pub const PRIMARY_COLOR: &str = "#3B82F6";

/// Secondary color used when no metadata or table produced one.
pub const SECONDARY_COLOR: &str = "#1E40AF";

/// Neutral gray for "no signal" (e.g. achievement without recognition level).
pub const NEUTRAL_COLOR: &str = "#6B7280";

/// Success green (verified certificates, deployed projects, volunteering).
pub const SUCCESS_COLOR: &str = "#10B981";

/// Bucket name for records whose category is missing or blank.
pub const UNCATEGORIZED: &str = "uncategorized";

// =============================================================================
// THRESHOLDS
// =============================================================================

/// Skill level at or above which a skill counts as expert (milestones).
pub const EXPERT_SKILL_LEVEL: i32 = 90;

/// Highest valid skill level / progress percentage.
pub const MAX_LEVEL: i32 = 100;

/// First year of a study program.
pub const STUDY_YEAR_MIN: i32 = 1;

/// Last year of a study program (business rule, not derived from data).
pub const STUDY_YEAR_MAX: i32 = 6;

// =============================================================================
// VIEW PARAMETERS
// =============================================================================

/// Default number of featured records returned.
pub const FEATURED_LIMIT: i64 = 6;

/// Maximum limit accepted by limit-taking views.
pub const MAX_LIMIT: i64 = 100;

/// Default minimum level for the top-skills view.
pub const TOP_SKILLS_MIN_LEVEL: i32 = 75;

/// Default number of top skills returned.
pub const TOP_SKILLS_LIMIT: i64 = 10;

/// Default look-ahead window for upcoming goals, in days.
pub const UPCOMING_DAYS_AHEAD: i64 = 90;

/// Maximum look-ahead window for upcoming goals, in days.
pub const MAX_DAYS_AHEAD: i64 = 3650;

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 3000;

/// Default rate limit: max requests per period.
pub const RATE_LIMIT_REQUESTS: u64 = 100;

/// Default rate limit: period in seconds.
pub const RATE_LIMIT_PERIOD_SECS: u64 = 60;

/// Default CORS max-age in seconds (1 hour).
pub const CORS_MAX_AGE_SECS: u64 = 3600;

/// Maximum request body size in bytes. The API is read-only.
pub const MAX_BODY_SIZE_BYTES: usize = 64 * 1024;

// =============================================================================
// VIEW CACHE
// =============================================================================

/// Default number of entries held by the in-process view cache.
pub const VIEW_CACHE_CAPACITY: usize = 512;

/// Default view cache entry lifetime in seconds.
pub const VIEW_CACHE_TTL_SECS: u64 = 300;

/// Key prefix for view cache entries in Redis.
pub const VIEW_CACHE_PREFIX: &str = "folio:view:";
