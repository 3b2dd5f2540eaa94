//! Record repository implementation.
//!
//! One table per entity kind. Enum-like columns are TEXT; values that do not
//! parse degrade to the documented default and are logged.

use std::time::Instant;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::{debug, warn};

use folio_core::{
    Achievement, Certificate, Complexity, EntityKind, EntityRef, Education, Error, FutureGoal,
    Hobby, Interest, LearningProgress, Project, ProjectStatus, RecognitionLevel, Record,
    RecordPredicate, RecordRepository, Result, Skill, Volunteer,
};

/// Table holding records of `kind`.
pub fn table_for(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Project => "project",
        EntityKind::Skill => "skill",
        EntityKind::Achievement => "achievement",
        EntityKind::Education => "education",
        EntityKind::Certificate => "certificate",
        EntityKind::Hobby => "hobby",
        EntityKind::Interest => "interest",
        EntityKind::Volunteer => "volunteer",
        EntityKind::LearningProgress => "learning_progress",
        EntityKind::FutureGoal => "future_goal",
    }
}

fn columns_for(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Project => {
            "id, owner_id, title, description, category, status, complexity, technologies, \
             year, completion_date, major, updated_at"
        }
        EntityKind::Skill => "id, owner_id, name, category, level, years_experience, updated_at",
        EntityKind::Achievement => {
            "id, owner_id, title, description, category, recognition_level, year, achieved_at, \
             technologies, updated_at"
        }
        EntityKind::Education => {
            "id, owner_id, institution, degree, field_of_study, start_date, end_date, \
             graduation_year, current, updated_at"
        }
        EntityKind::Certificate => {
            "id, owner_id, name, issuer, category, verified, issue_date, expiry_date, updated_at"
        }
        EntityKind::Hobby => "id, owner_id, name, category, description, updated_at",
        EntityKind::Interest => "id, owner_id, name, category, relevance_score, updated_at",
        EntityKind::Volunteer => {
            "id, owner_id, organization, role, description, start_date, end_date, updated_at"
        }
        EntityKind::LearningProgress => {
            "id, owner_id, title, category, progress, completed, completed_at, \
             estimated_completion, updated_at"
        }
        EntityKind::FutureGoal => {
            "id, owner_id, title, category, description, target_date, updated_at"
        }
    }
}

fn parse_status(raw: &str, id: i64) -> ProjectStatus {
    raw.parse().unwrap_or_else(|_| {
        warn!(
            subsystem = "db",
            component = "records",
            entity_kind = "PROJECT",
            entity_id = id,
            value = raw,
            "Unknown project status, using default"
        );
        ProjectStatus::default()
    })
}

fn parse_optional<T: std::str::FromStr>(raw: Option<String>, column: &str, id: i64) -> Option<T> {
    let raw = raw?;
    if raw.trim().is_empty() {
        return None;
    }
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(
                subsystem = "db",
                component = "records",
                entity_id = id,
                column,
                value = raw.as_str(),
                "Unparseable enum column, treating as absent"
            );
            None
        }
    }
}

/// Map a row of the table for `kind` into a [`Record`].
fn map_row(kind: EntityKind, row: &PgRow) -> std::result::Result<Record, sqlx::Error> {
    let id: i64 = row.try_get("id")?;
    let owner_id: i64 = row.try_get("owner_id")?;
    let updated_at = row.try_get("updated_at")?;

    let record = match kind {
        EntityKind::Project => {
            let status: String = row.try_get("status")?;
            Record::Project(Project {
                id,
                owner_id,
                title: row.try_get("title")?,
                description: row.try_get("description")?,
                category: row.try_get("category")?,
                status: parse_status(&status, id),
                complexity: parse_optional::<Complexity>(row.try_get("complexity")?, "complexity", id),
                technologies: row.try_get("technologies")?,
                year: row.try_get("year")?,
                completion_date: row.try_get("completion_date")?,
                major: row.try_get("major")?,
                updated_at,
            })
        }
        EntityKind::Skill => Record::Skill(Skill {
            id,
            owner_id,
            name: row.try_get("name")?,
            category: row.try_get("category")?,
            level: row.try_get("level")?,
            years_experience: row.try_get("years_experience")?,
            updated_at,
        }),
        EntityKind::Achievement => Record::Achievement(Achievement {
            id,
            owner_id,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            category: row.try_get("category")?,
            recognition_level: parse_optional::<RecognitionLevel>(
                row.try_get("recognition_level")?,
                "recognition_level",
                id,
            ),
            year: row.try_get("year")?,
            achieved_at: row.try_get("achieved_at")?,
            technologies: row.try_get("technologies")?,
            updated_at,
        }),
        EntityKind::Education => Record::Education(Education {
            id,
            owner_id,
            institution: row.try_get("institution")?,
            degree: row.try_get("degree")?,
            field_of_study: row.try_get("field_of_study")?,
            start_date: row.try_get("start_date")?,
            end_date: row.try_get("end_date")?,
            graduation_year: row.try_get("graduation_year")?,
            current: row.try_get("current")?,
            updated_at,
        }),
        EntityKind::Certificate => Record::Certificate(Certificate {
            id,
            owner_id,
            name: row.try_get("name")?,
            issuer: row.try_get("issuer")?,
            category: row.try_get("category")?,
            verified: row.try_get("verified")?,
            issue_date: row.try_get("issue_date")?,
            expiry_date: row.try_get("expiry_date")?,
            updated_at,
        }),
        EntityKind::Hobby => Record::Hobby(Hobby {
            id,
            owner_id,
            name: row.try_get("name")?,
            category: row.try_get("category")?,
            description: row.try_get("description")?,
            updated_at,
        }),
        EntityKind::Interest => Record::Interest(Interest {
            id,
            owner_id,
            name: row.try_get("name")?,
            category: row.try_get("category")?,
            relevance_score: row.try_get("relevance_score")?,
            updated_at,
        }),
        EntityKind::Volunteer => Record::Volunteer(Volunteer {
            id,
            owner_id,
            organization: row.try_get("organization")?,
            role: row.try_get("role")?,
            description: row.try_get("description")?,
            start_date: row.try_get("start_date")?,
            end_date: row.try_get("end_date")?,
            updated_at,
        }),
        EntityKind::LearningProgress => Record::LearningProgress(LearningProgress {
            id,
            owner_id,
            title: row.try_get("title")?,
            category: row.try_get("category")?,
            progress: row.try_get("progress")?,
            completed: row.try_get("completed")?,
            completed_at: row.try_get("completed_at")?,
            estimated_completion: row.try_get("estimated_completion")?,
            updated_at,
        }),
        EntityKind::FutureGoal => Record::FutureGoal(FutureGoal {
            id,
            owner_id,
            title: row.try_get("title")?,
            category: row.try_get("category")?,
            description: row.try_get("description")?,
            target_date: row.try_get("target_date")?,
            updated_at,
        }),
    };
    Ok(record)
}

/// PostgreSQL implementation of RecordRepository.
#[derive(Clone)]
pub struct PgRecordRepository {
    pool: Pool<Postgres>,
}

impl PgRecordRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordRepository for PgRecordRepository {
    async fn find_all_by_owner(&self, kind: EntityKind, owner_id: i64) -> Result<Vec<Record>> {
        let start = Instant::now();
        let sql = format!(
            "SELECT {} FROM {} WHERE owner_id = $1 ORDER BY id",
            columns_for(kind),
            table_for(kind)
        );
        let rows = sqlx::query(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        let records = rows
            .iter()
            .map(|row| map_row(kind, row))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            component = "records",
            op = "find_all_by_owner",
            db_table = table_for(kind),
            owner_id,
            result_count = records.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Loaded records"
        );
        Ok(records)
    }

    async fn find_by_id(&self, entity: EntityRef) -> Result<Option<Record>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = $1",
            columns_for(entity.kind),
            table_for(entity.kind)
        );
        let row = sqlx::query(&sql)
            .bind(entity.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        row.map(|row| map_row(entity.kind, &row))
            .transpose()
            .map_err(Error::Database)
    }

    async fn count_by_owner(
        &self,
        kind: EntityKind,
        owner_id: i64,
        predicate: &RecordPredicate,
    ) -> Result<i64> {
        if predicate.applies_to().is_some_and(|k| k != kind) {
            return Ok(0);
        }

        let filter = match predicate {
            RecordPredicate::All => "",
            RecordPredicate::ProjectStatusIn(_) => {
                " AND UPPER(REPLACE(REPLACE(TRIM(status), '-', '_'), ' ', '_')) = ANY($2)"
            }
            RecordPredicate::SkillLevelAtLeast(_) => " AND level >= $2",
            RecordPredicate::LearningCompleted => " AND completed",
            RecordPredicate::CertificateVerified => " AND verified",
        };
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE owner_id = $1{}",
            table_for(kind),
            filter
        );

        let query = sqlx::query_scalar::<_, i64>(&sql).bind(owner_id);
        let query = match predicate {
            RecordPredicate::ProjectStatusIn(statuses) => query.bind(
                statuses
                    .iter()
                    .map(|s| s.as_str().to_string())
                    .collect::<Vec<_>>(),
            ),
            RecordPredicate::SkillLevelAtLeast(min) => query.bind(*min),
            _ => query,
        };

        query.fetch_one(&self.pool).await.map_err(Error::Database)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_distinct_table() {
        let tables: std::collections::HashSet<_> =
            EntityKind::ALL.iter().map(|k| table_for(*k)).collect();
        assert_eq!(tables.len(), EntityKind::ALL.len());
    }

    #[test]
    fn test_columns_start_with_address() {
        for kind in EntityKind::ALL {
            assert!(columns_for(kind).starts_with("id, owner_id,"));
            assert!(columns_for(kind).ends_with("updated_at"));
        }
    }

    #[test]
    fn test_parse_status_degrades_to_default() {
        assert_eq!(parse_status("production", 1), ProjectStatus::Production);
        assert_eq!(parse_status("shipped", 1), ProjectStatus::Planning);
    }

    #[test]
    fn test_parse_optional_blank_and_unknown() {
        assert_eq!(
            parse_optional::<Complexity>(Some("advanced".into()), "complexity", 1),
            Some(Complexity::Advanced)
        );
        assert_eq!(parse_optional::<Complexity>(Some("  ".into()), "complexity", 1), None);
        assert_eq!(parse_optional::<Complexity>(Some("godlike".into()), "complexity", 1), None);
        assert_eq!(parse_optional::<Complexity>(None, "complexity", 1), None);
    }
}
