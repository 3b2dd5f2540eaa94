//! In-memory record and metadata store.
//!
//! Implements [`RecordRepository`] and [`MetadataRepository`] over owned
//! vectors for tests and demos. Enabled with the `memory` feature.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use folio_core::memory::InMemoryStore;
//! use folio_core::{EntityKind, EntityRef, Metadata, Project};
//!
//! let store = InMemoryStore::new()
//!     .with_record(Project::new(1, 42, "Portfolio site"))
//!     .with_metadata(Metadata::new(EntityRef::new(EntityKind::Project, 1)).featured(true));
//! assert_eq!(store.record_count(), 1);
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::*;
use crate::traits::{MetadataRepository, RecordPredicate, RecordRepository};

#[derive(Debug, Clone, Default)]
struct StoreData {
    records: Vec<Record>,
    metadata: HashMap<EntityRef, Metadata>,
    fail_metadata: bool,
}

/// Record and metadata store backed by process memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    data: Arc<StoreData>,
    record_reads: Arc<AtomicUsize>,
    metadata_reads: Arc<AtomicUsize>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record. Records keep insertion order.
    pub fn with_record(mut self, record: impl Into<Record>) -> Self {
        Arc::make_mut(&mut self.data).records.push(record.into());
        self
    }

    pub fn with_records<I, R>(mut self, records: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Record>,
    {
        Arc::make_mut(&mut self.data)
            .records
            .extend(records.into_iter().map(Into::into));
        self
    }

    /// Attach metadata, replacing any row for the same `(kind, id)`.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        Arc::make_mut(&mut self.data)
            .metadata
            .insert(metadata.entity(), metadata);
        self
    }

    /// Make every metadata read fail with a storage error.
    pub fn with_failing_metadata(mut self) -> Self {
        Arc::make_mut(&mut self.data).fail_metadata = true;
        self
    }

    pub fn record_count(&self) -> usize {
        self.data.records.len()
    }

    /// Number of record store calls served so far.
    pub fn record_reads(&self) -> usize {
        self.record_reads.load(Ordering::Relaxed)
    }

    /// Number of metadata store calls served so far.
    pub fn metadata_reads(&self) -> usize {
        self.metadata_reads.load(Ordering::Relaxed)
    }

    fn owned_by(&self, kind: EntityKind, owner_id: i64) -> impl Iterator<Item = &Record> {
        self.data
            .records
            .iter()
            .filter(move |r| r.kind() == kind && r.owner_id() == owner_id)
    }

    fn check_metadata_available(&self) -> Result<()> {
        self.metadata_reads.fetch_add(1, Ordering::Relaxed);
        if self.data.fail_metadata {
            return Err(Error::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordRepository for InMemoryStore {
    async fn find_all_by_owner(&self, kind: EntityKind, owner_id: i64) -> Result<Vec<Record>> {
        self.record_reads.fetch_add(1, Ordering::Relaxed);
        Ok(self.owned_by(kind, owner_id).cloned().collect())
    }

    async fn find_by_id(&self, entity: EntityRef) -> Result<Option<Record>> {
        self.record_reads.fetch_add(1, Ordering::Relaxed);
        Ok(self
            .data
            .records
            .iter()
            .find(|r| r.entity_ref() == entity)
            .cloned())
    }

    async fn count_by_owner(
        &self,
        kind: EntityKind,
        owner_id: i64,
        predicate: &RecordPredicate,
    ) -> Result<i64> {
        self.record_reads.fetch_add(1, Ordering::Relaxed);
        let count = self
            .owned_by(kind, owner_id)
            .filter(|r| predicate.matches(r))
            .count();
        Ok(count as i64)
    }
}

#[async_trait]
impl MetadataRepository for InMemoryStore {
    async fn find(&self, entity: EntityRef) -> Result<Option<Metadata>> {
        self.check_metadata_available()?;
        Ok(self.data.metadata.get(&entity).cloned())
    }

    async fn find_many(&self, kind: EntityKind, ids: &[i64]) -> Result<Vec<Metadata>> {
        self.check_metadata_available()?;
        Ok(ids
            .iter()
            .filter_map(|id| self.data.metadata.get(&EntityRef::new(kind, *id)))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> InMemoryStore {
        InMemoryStore::new()
            .with_record(Project {
                status: ProjectStatus::Production,
                ..Project::new(1, 10, "Shop")
            })
            .with_record(Project::new(2, 10, "Blog"))
            .with_record(Project::new(3, 99, "Other owner"))
            .with_record(Skill::new(1, 10, "Rust", 95))
            .with_metadata(Metadata::new(EntityRef::new(EntityKind::Project, 1)).featured(true))
    }

    #[tokio::test]
    async fn test_find_all_by_owner_filters_kind_and_owner() {
        let store = store();
        let projects = store
            .find_all_by_owner(EntityKind::Project, 10)
            .await
            .unwrap();
        assert_eq!(projects.len(), 2);
        assert!(projects.iter().all(|r| r.kind() == EntityKind::Project));
        assert_eq!(store.record_reads(), 1);
    }

    #[tokio::test]
    async fn test_find_by_id_distinguishes_kinds() {
        let store = store();
        let skill = store
            .find_by_id(EntityRef::new(EntityKind::Skill, 1))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(skill.title(), "Rust");
        let missing = store
            .find_by_id(EntityRef::new(EntityKind::Hobby, 1))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_count_by_owner_with_predicate() {
        let store = store();
        let deployed = store
            .count_by_owner(EntityKind::Project, 10, &RecordPredicate::deployed())
            .await
            .unwrap();
        assert_eq!(deployed, 1);
        let all = store
            .count_by_owner(EntityKind::Project, 10, &RecordPredicate::All)
            .await
            .unwrap();
        assert_eq!(all, 2);
    }

    #[tokio::test]
    async fn test_metadata_miss_is_none() {
        let store = store();
        let hit = store
            .find(EntityRef::new(EntityKind::Project, 1))
            .await
            .unwrap();
        assert!(hit.map(|m| m.featured).unwrap_or(false));
        let miss = store
            .find(EntityRef::new(EntityKind::Project, 2))
            .await
            .unwrap();
        assert!(miss.is_none());

        let many = store
            .find_many(EntityKind::Project, &[1, 2, 3])
            .await
            .unwrap();
        assert_eq!(many.len(), 1);
    }

    #[tokio::test]
    async fn test_failing_metadata_returns_error() {
        let store = store().with_failing_metadata();
        let result = store.find(EntityRef::new(EntityKind::Project, 1)).await;
        assert!(matches!(result, Err(Error::Database(_))));
        assert_eq!(store.metadata_reads(), 1);
    }
}
