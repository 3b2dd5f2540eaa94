//! Structured logging field name constants for folio.
//!
//! All crates use these constants for consistent structured logging fields so
//! log aggregation can query by the same names across subsystems.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events (startup, shutdown) |
//! | DEBUG | Decision points (cascade step, cache hit/miss), view completions |
//! | TRACE | Per-record iteration |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID propagated through a request (UUIDv7).
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "api", "views", "db", "core"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "resolver", "merger", "view_cache", "pool"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "timeline", "resolve", "find_all_by_owner"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Owner (person) id a view is computed for.
pub const OWNER_ID: &str = "owner_id";

/// EntityKind of the record being operated on.
pub const ENTITY_KIND: &str = "entity_kind";

/// Raw id of the record being operated on.
pub const ENTITY_ID: &str = "entity_id";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of entries returned by a view or query.
pub const RESULT_COUNT: &str = "result_count";

// ─── Resolution fields ─────────────────────────────────────────────────────

/// Name of the cascade step that produced a value.
pub const CASCADE_STEP: &str = "cascade_step";

/// Cache key of a memoized view.
pub const CACHE_KEY: &str = "cache_key";

// ─── Database fields ───────────────────────────────────────────────────────

/// Number of active connections in the pool.
pub const POOL_SIZE: &str = "pool_size";

/// Number of idle connections in the pool.
pub const POOL_IDLE: &str = "pool_idle";

/// Database table affected.
pub const DB_TABLE: &str = "db_table";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
