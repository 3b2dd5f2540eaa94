//! Metadata resolution.
//!
//! Combines an optional [`Metadata`] row with a record's computed defaults
//! into a complete [`PresentationBundle`]. Per field, a set metadata value
//! wins; anything else falls through to the default. Resolution never fails:
//! a metadata store error is logged and treated as absence.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use folio_core::{
    resolve_defaults, DefaultBundle, EntityKind, EntityRef, Importance, Metadata,
    MetadataRepository, PresentationBundle, Record,
};

fn set_value(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty()).cloned()
}

/// Merge a metadata row (if any) over computed defaults.
pub fn resolve_with(metadata: Option<&Metadata>, defaults: DefaultBundle) -> PresentationBundle {
    let Some(meta) = metadata else {
        return PresentationBundle {
            color: defaults.color,
            secondary_color: defaults.secondary_color,
            icon: defaults.icon,
            featured: false,
            importance: Importance::default(),
            gradient: None,
            glow_color: None,
        };
    };

    PresentationBundle {
        color: set_value(meta.primary_color.as_ref()).unwrap_or(defaults.color),
        secondary_color: set_value(meta.secondary_color.as_ref())
            .unwrap_or(defaults.secondary_color),
        icon: set_value(meta.icon.as_ref()).unwrap_or(defaults.icon),
        featured: meta.featured,
        importance: meta.importance,
        gradient: set_value(meta.gradient.as_ref()),
        glow_color: set_value(meta.glow_color.as_ref()),
    }
}

/// Resolves presentation bundles against a metadata store.
#[derive(Clone)]
pub struct MetadataResolver {
    store: Arc<dyn MetadataRepository>,
}

impl MetadataResolver {
    pub fn new(store: Arc<dyn MetadataRepository>) -> Self {
        Self { store }
    }

    /// Fetch the metadata row for `entity`; errors degrade to `None`.
    pub async fn lookup(&self, entity: EntityRef) -> Option<Metadata> {
        match self.store.find(entity).await {
            Ok(found) => found,
            Err(e) => {
                warn!(
                    subsystem = "views",
                    component = "resolver",
                    op = "lookup",
                    entity_kind = entity.kind.as_str(),
                    entity_id = entity.id,
                    error = %e,
                    "Metadata lookup failed, using computed defaults"
                );
                None
            }
        }
    }

    /// Resolve one record addressed by `entity` with caller-supplied defaults.
    pub async fn resolve(&self, entity: EntityRef, defaults: DefaultBundle) -> PresentationBundle {
        let metadata = self.lookup(entity).await;
        resolve_with(metadata.as_ref(), defaults)
    }

    /// Resolve one record using its type-specific default cascade.
    pub async fn resolve_record(&self, record: &Record) -> PresentationBundle {
        let entity = record.entity_ref();
        let resolution = resolve_defaults(record);
        debug!(
            subsystem = "views",
            component = "resolver",
            op = "resolve",
            entity_kind = entity.kind.as_str(),
            entity_id = entity.id,
            color_step = resolution.color.step,
            icon_step = resolution.icon.step,
            "Computed default presentation"
        );
        self.resolve(entity, resolution.into_bundle()).await
    }

    /// Metadata for a set of records, one store call per kind present.
    pub async fn lookup_many(&self, records: &[Record]) -> HashMap<EntityRef, Metadata> {
        let mut ids_by_kind: Vec<(EntityKind, Vec<i64>)> = Vec::new();
        for record in records {
            match ids_by_kind.iter_mut().find(|(k, _)| *k == record.kind()) {
                Some((_, ids)) => ids.push(record.id()),
                None => ids_by_kind.push((record.kind(), vec![record.id()])),
            }
        }

        let mut found = HashMap::new();
        for (kind, ids) in ids_by_kind {
            match self.store.find_many(kind, &ids).await {
                Ok(rows) => {
                    trace!(
                        subsystem = "views",
                        component = "resolver",
                        entity_kind = kind.as_str(),
                        requested = ids.len(),
                        result_count = rows.len(),
                        "Batch metadata lookup"
                    );
                    found.extend(rows.into_iter().map(|m| (m.entity(), m)));
                }
                Err(e) => warn!(
                    subsystem = "views",
                    component = "resolver",
                    op = "lookup_many",
                    entity_kind = kind.as_str(),
                    error = %e,
                    "Metadata batch lookup failed, using computed defaults"
                ),
            }
        }
        found
    }

    /// Resolve a list of records, preserving order.
    pub async fn resolve_many(&self, records: &[Record]) -> Vec<PresentationBundle> {
        let metadata = self.lookup_many(records).await;
        records
            .iter()
            .map(|record| {
                resolve_with(
                    metadata.get(&record.entity_ref()),
                    DefaultBundle::for_record(record),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::memory::InMemoryStore;
    use folio_core::{Achievement, Project, RecognitionLevel, Skill};

    fn defaults() -> DefaultBundle {
        DefaultBundle {
            color: "#111111".into(),
            secondary_color: "#222222".into(),
            icon: "folder".into(),
        }
    }

    #[test]
    fn test_resolve_with_no_metadata_uses_defaults() {
        let bundle = resolve_with(None, defaults());
        assert_eq!(bundle.color, "#111111");
        assert_eq!(bundle.icon, "folder");
        assert!(!bundle.featured);
        assert_eq!(bundle.importance, Importance::Medium);
    }

    #[test]
    fn test_resolve_with_partial_metadata_per_field() {
        let meta = Metadata::blank(EntityRef::new(EntityKind::Project, 1))
            .with_icon("rocket")
            .featured(true);
        let bundle = resolve_with(Some(&meta), defaults());
        assert_eq!(bundle.color, "#111111");
        assert_eq!(bundle.secondary_color, "#222222");
        assert_eq!(bundle.icon, "rocket");
        assert!(bundle.featured);
    }

    #[test]
    fn test_resolve_with_blank_metadata_color_falls_through() {
        let meta = Metadata::blank(EntityRef::new(EntityKind::Project, 1)).with_primary_color("  ");
        let bundle = resolve_with(Some(&meta), defaults());
        assert_eq!(bundle.color, "#111111");
    }

    #[tokio::test]
    async fn test_resolve_record_without_metadata_row() {
        let store = Arc::new(InMemoryStore::new());
        let resolver = MetadataResolver::new(store);
        let record: Record = Achievement {
            recognition_level: Some(RecognitionLevel::National),
            ..Achievement::new(1, 1, "Olympiad")
        }
        .into();

        let bundle = resolver.resolve_record(&record).await;
        assert_eq!(bundle.color, "#DC2626");
        assert!(!bundle.featured);
    }

    #[tokio::test]
    async fn test_store_failure_degrades_to_defaults() {
        let store = Arc::new(
            InMemoryStore::new()
                .with_metadata(
                    Metadata::new(EntityRef::new(EntityKind::Skill, 1)).featured(true),
                )
                .with_failing_metadata(),
        );
        let resolver = MetadataResolver::new(store);
        let record: Record = Skill::new(1, 1, "Rust", 95).into();

        let bundle = resolver.resolve_record(&record).await;
        assert!(!bundle.featured);
        assert!(!bundle.color.is_empty());

        let many = resolver.resolve_many(&[record]).await;
        assert_eq!(many.len(), 1);
        assert!(!many[0].featured);
    }

    #[tokio::test]
    async fn test_resolve_many_batches_per_kind() {
        let store = Arc::new(
            InMemoryStore::new()
                .with_metadata(
                    Metadata::blank(EntityRef::new(EntityKind::Project, 7))
                        .with_primary_color("#ABCDEF"),
                ),
        );
        let resolver = MetadataResolver::new(store.clone());
        let records: Vec<Record> = vec![
            Project::new(7, 1, "Shop").into(),
            Skill::new(7, 1, "Rust", 50).into(),
            Project::new(8, 1, "Blog").into(),
        ];

        let bundles = resolver.resolve_many(&records).await;
        assert_eq!(bundles[0].color, "#ABCDEF");
        // same raw id, different kind: no metadata
        assert_ne!(bundles[1].color, "#ABCDEF");
        assert_ne!(bundles[2].color, "#ABCDEF");
        assert_eq!(store.metadata_reads(), 2);
    }
}
