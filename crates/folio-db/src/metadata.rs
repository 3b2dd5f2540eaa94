//! Metadata repository implementation.
//!
//! Rows are keyed by `(entity_kind, entity_id)` with no foreign key to the
//! decorated record; a miss is a normal outcome.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::{debug, warn};

use folio_core::{
    EntityKind, EntityRef, Error, Importance, Metadata, MetadataRepository, Result,
};

const METADATA_COLUMNS: &str = "entity_kind, entity_id, primary_color, secondary_color, \
     gradient, glow_color, importance, icon, featured, custom_properties";

fn map_row(kind: EntityKind, row: &PgRow) -> std::result::Result<Metadata, sqlx::Error> {
    let entity_id: i64 = row.try_get("entity_id")?;
    let importance: String = row.try_get("importance")?;
    let importance = importance.parse().unwrap_or_else(|_| {
        warn!(
            subsystem = "db",
            component = "metadata",
            entity_kind = kind.as_str(),
            entity_id,
            value = importance.as_str(),
            "Unknown importance, using default"
        );
        Importance::default()
    });
    let custom_properties = match row.try_get::<JsonValue, _>("custom_properties")? {
        JsonValue::Object(map) => map,
        _ => serde_json::Map::new(),
    };

    Ok(Metadata {
        entity_kind: kind,
        entity_id,
        primary_color: row.try_get("primary_color")?,
        secondary_color: row.try_get("secondary_color")?,
        gradient: row.try_get("gradient")?,
        glow_color: row.try_get("glow_color")?,
        importance,
        icon: row.try_get("icon")?,
        featured: row.try_get("featured")?,
        custom_properties,
    })
}

/// PostgreSQL implementation of MetadataRepository.
#[derive(Clone)]
pub struct PgMetadataRepository {
    pool: Pool<Postgres>,
}

impl PgMetadataRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MetadataRepository for PgMetadataRepository {
    async fn find(&self, entity: EntityRef) -> Result<Option<Metadata>> {
        let sql = format!(
            "SELECT {} FROM entity_metadata WHERE entity_kind = $1 AND entity_id = $2",
            METADATA_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(entity.kind.as_str())
            .bind(entity.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        row.map(|row| map_row(entity.kind, &row))
            .transpose()
            .map_err(Error::Database)
    }

    async fn find_many(&self, kind: EntityKind, ids: &[i64]) -> Result<Vec<Metadata>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {} FROM entity_metadata WHERE entity_kind = $1 AND entity_id = ANY($2)",
            METADATA_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(kind.as_str())
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        let metadata = rows
            .iter()
            .map(|row| map_row(kind, row))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            component = "metadata",
            op = "find_many",
            entity_kind = kind.as_str(),
            requested = ids.len(),
            result_count = metadata.len(),
            "Loaded metadata batch"
        );
        Ok(metadata)
    }
}
