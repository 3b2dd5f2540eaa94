//! Core traits for folio storage abstractions.
//!
//! Views depend only on these traits; the PostgreSQL implementations live in
//! `folio-db` and an in-memory implementation in [`crate::memory`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::*;

// =============================================================================
// RECORD STORE
// =============================================================================

/// Closed set of count predicates understood by every record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordPredicate {
    /// Every record of the kind owned by the person.
    All,
    /// Projects whose status is one of the given statuses.
    ProjectStatusIn(Vec<ProjectStatus>),
    /// Skills at or above the given level.
    SkillLevelAtLeast(i32),
    /// Learning items marked completed.
    LearningCompleted,
    /// Verified certificates.
    CertificateVerified,
}

impl RecordPredicate {
    /// Projects in a deployed status.
    pub fn deployed() -> Self {
        RecordPredicate::ProjectStatusIn(ProjectStatus::DEPLOYED.to_vec())
    }

    /// Kind the predicate is defined for, or `None` for [`RecordPredicate::All`].
    pub fn applies_to(&self) -> Option<EntityKind> {
        match self {
            RecordPredicate::All => None,
            RecordPredicate::ProjectStatusIn(_) => Some(EntityKind::Project),
            RecordPredicate::SkillLevelAtLeast(_) => Some(EntityKind::Skill),
            RecordPredicate::LearningCompleted => Some(EntityKind::LearningProgress),
            RecordPredicate::CertificateVerified => Some(EntityKind::Certificate),
        }
    }

    /// Evaluate the predicate against a single record.
    ///
    /// A kind-specific predicate never matches records of another kind.
    pub fn matches(&self, record: &Record) -> bool {
        match (self, record) {
            (RecordPredicate::All, _) => true,
            (RecordPredicate::ProjectStatusIn(statuses), Record::Project(p)) => {
                statuses.contains(&p.status)
            }
            (RecordPredicate::SkillLevelAtLeast(min), Record::Skill(s)) => s.level >= *min,
            (RecordPredicate::LearningCompleted, Record::LearningProgress(l)) => l.completed,
            (RecordPredicate::CertificateVerified, Record::Certificate(c)) => c.verified,
            _ => false,
        }
    }
}

/// Read access to the portfolio records of every kind.
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// All records of `kind` owned by `owner_id`, in storage order.
    async fn find_all_by_owner(&self, kind: EntityKind, owner_id: i64) -> Result<Vec<Record>>;

    /// A single record by address.
    async fn find_by_id(&self, entity: EntityRef) -> Result<Option<Record>>;

    /// Count records of `kind` owned by `owner_id` that satisfy `predicate`.
    async fn count_by_owner(
        &self,
        kind: EntityKind,
        owner_id: i64,
        predicate: &RecordPredicate,
    ) -> Result<i64>;
}

// =============================================================================
// METADATA STORE
// =============================================================================

/// Read access to presentation metadata keyed by `(kind, id)`.
///
/// A miss is `Ok(None)`, never an error.
#[async_trait]
pub trait MetadataRepository: Send + Sync {
    /// Metadata for one record.
    async fn find(&self, entity: EntityRef) -> Result<Option<Metadata>>;

    /// Metadata rows that exist for the given ids of one kind.
    async fn find_many(&self, kind: EntityKind, ids: &[i64]) -> Result<Vec<Metadata>>;
}
