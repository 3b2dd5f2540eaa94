//! Cross-entity merging into timelines.
//!
//! Records of unrelated kinds are projected into [`TimelineEntry`] values,
//! concatenated in a fixed source order, and stable-sorted by year
//! descending. Entries are never deduplicated across kinds.

use std::sync::Arc;
use std::time::Instant;

use chrono::Datelike;
use tracing::debug;

use folio_core::defaults::EXPERT_SKILL_LEVEL;
use folio_core::{
    EntityKind, PresentationBundle, Record, RecordRepository, Result, TimelineEntry, TimelineYear,
};

use crate::resolver::MetadataResolver;

/// Year a record is placed at on a timeline.
///
/// Explicit year field, then the kind's completion/achievement date, then the
/// last update, then `current_year`.
pub fn derive_year(record: &Record, current_year: i32) -> TimelineYear {
    let explicit = match record {
        Record::Achievement(a) => a.year.as_deref().and_then(TimelineYear::parse),
        Record::Project(p) => p.year.map(TimelineYear::from),
        Record::Education(e) => e.graduation_year.map(TimelineYear::from),
        _ => None,
    };
    if let Some(year) = explicit {
        return year;
    }

    let dated = match record {
        Record::Achievement(a) => a.achieved_at.map(|d| d.year()),
        Record::Project(p) => p.completion_date.map(|d| d.year()),
        Record::Education(e) => e.end_date.map(|d| d.year()),
        Record::LearningProgress(l) => l.completed_at.map(|d| d.year()),
        _ => None,
    };

    dated
        .or_else(|| record.updated_at().map(|t| t.year()))
        .unwrap_or(current_year)
        .into()
}

/// Project a record into a timeline entry with its resolved presentation.
pub fn to_entry(record: &Record, bundle: &PresentationBundle, current_year: i32) -> TimelineEntry {
    let entry = TimelineEntry::new(
        record.entity_ref(),
        derive_year(record, current_year),
        record.title(),
        bundle,
    );
    match record {
        Record::Project(p) => entry
            .with_description(p.description.clone())
            .with_technologies(p.technologies.clone()),
        Record::Achievement(a) => entry
            .with_description(a.description.clone())
            .with_technologies(a.technologies.clone()),
        Record::Education(e) => entry.with_description(e.field_of_study.clone()),
        Record::LearningProgress(l) => entry.with_description(l.category.clone()),
        Record::Skill(s) => entry.with_description(s.category.clone()),
        _ => entry,
    }
}

/// Stable sort by year, newest first, in the order of [`TimelineYear`].
pub fn sort_by_year_desc(entries: &mut [TimelineEntry]) {
    entries.sort_by(|a, b| b.year.cmp(&a.year));
}

/// Projects that belong on a timeline: finished or flagged as major.
pub fn is_timeline_project(record: &Record) -> bool {
    matches!(record, Record::Project(p) if p.status.is_finished() || p.major)
}

/// Skills at expert level.
pub fn is_expert_skill(record: &Record) -> bool {
    matches!(record, Record::Skill(s) if s.level >= EXPERT_SKILL_LEVEL)
}

pub fn is_completed_learning(record: &Record) -> bool {
    matches!(record, Record::LearningProgress(l) if l.completed)
}

/// Builds merged cross-entity sequences for one owner.
#[derive(Clone)]
pub struct CrossEntityMerger {
    records: Arc<dyn RecordRepository>,
    resolver: MetadataResolver,
}

impl CrossEntityMerger {
    pub fn new(records: Arc<dyn RecordRepository>, resolver: MetadataResolver) -> Self {
        Self { records, resolver }
    }

    /// Achievements, timeline projects, and education, newest first.
    pub async fn build_timeline(&self, owner_id: i64, current_year: i32) -> Result<Vec<TimelineEntry>> {
        let start = Instant::now();
        let mut sources = self
            .records
            .find_all_by_owner(EntityKind::Achievement, owner_id)
            .await?;
        sources.extend(
            self.records
                .find_all_by_owner(EntityKind::Project, owner_id)
                .await?
                .into_iter()
                .filter(is_timeline_project),
        );
        sources.extend(
            self.records
                .find_all_by_owner(EntityKind::Education, owner_id)
                .await?,
        );

        let entries = self.merge(sources, current_year).await;
        debug!(
            subsystem = "views",
            component = "merger",
            op = "timeline",
            owner_id,
            result_count = entries.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Timeline built"
        );
        Ok(entries)
    }

    /// Expert skills and completed learning items, newest first.
    pub async fn build_learning_milestones(
        &self,
        owner_id: i64,
        current_year: i32,
    ) -> Result<Vec<TimelineEntry>> {
        let start = Instant::now();
        let mut sources: Vec<Record> = self
            .records
            .find_all_by_owner(EntityKind::Skill, owner_id)
            .await?
            .into_iter()
            .filter(is_expert_skill)
            .collect();
        sources.extend(
            self.records
                .find_all_by_owner(EntityKind::LearningProgress, owner_id)
                .await?
                .into_iter()
                .filter(is_completed_learning),
        );

        let entries = self.merge(sources, current_year).await;
        debug!(
            subsystem = "views",
            component = "merger",
            op = "milestones",
            owner_id,
            result_count = entries.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Learning milestones built"
        );
        Ok(entries)
    }

    async fn merge(&self, sources: Vec<Record>, current_year: i32) -> Vec<TimelineEntry> {
        let bundles = self.resolver.resolve_many(&sources).await;
        let mut entries: Vec<TimelineEntry> = sources
            .iter()
            .zip(bundles.iter())
            .map(|(record, bundle)| to_entry(record, bundle, current_year))
            .collect();
        sort_by_year_desc(&mut entries);
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, NaiveDate, Utc};
    use folio_core::{
        Achievement, DefaultBundle, Education, EntityRef, LearningProgress, Project,
        ProjectStatus, Skill,
    };

    fn entry_for(record: Record) -> TimelineEntry {
        let bundle = crate::resolver::resolve_with(None, DefaultBundle::for_record(&record));
        to_entry(&record, &bundle, 2030)
    }

    #[test]
    fn test_derive_year_cascade() {
        let explicit: Record = Project {
            year: Some(2020),
            completion_date: NaiveDate::from_ymd_opt(2022, 5, 1),
            ..Project::new(1, 1, "A")
        }
        .into();
        assert_eq!(derive_year(&explicit, 2030), TimelineYear::Numeric(2020));

        let dated: Record = Project {
            completion_date: NaiveDate::from_ymd_opt(2022, 5, 1),
            ..Project::new(2, 1, "B")
        }
        .into();
        assert_eq!(derive_year(&dated, 2030), TimelineYear::Numeric(2022));

        let updated: Record = Project {
            updated_at: Some("2019-01-02T03:04:05Z".parse::<DateTime<Utc>>().unwrap()),
            ..Project::new(3, 1, "C")
        }
        .into();
        assert_eq!(derive_year(&updated, 2030), TimelineYear::Numeric(2019));

        let bare: Record = Project::new(4, 1, "D").into();
        assert_eq!(derive_year(&bare, 2030), TimelineYear::Numeric(2030));
    }

    #[test]
    fn test_derive_year_keeps_legacy_text() {
        let legacy: Record = Achievement {
            year: Some("2020-21".into()),
            ..Achievement::new(1, 1, "Dean's list")
        }
        .into();
        assert_eq!(
            derive_year(&legacy, 2030),
            TimelineYear::Legacy("2020-21".into())
        );
    }

    fn achievement(id: i64, year: &str, title: &str) -> TimelineEntry {
        entry_for(
            Achievement {
                year: Some(year.into()),
                ..Achievement::new(id, 1, title)
            }
            .into(),
        )
    }

    #[test]
    fn test_sort_descending_and_stable() {
        let mut entries = vec![
            achievement(1, "2021", "first 2021"),
            entry_for(
                Project {
                    year: Some(2023),
                    ..Project::new(1, 1, "2023")
                }
                .into(),
            ),
            entry_for(
                Education {
                    graduation_year: Some(2021),
                    ..Education::new(1, 1, "MIT", "BSc")
                }
                .into(),
            ),
        ];
        sort_by_year_desc(&mut entries);
        let ids: Vec<&str> = entries.iter().map(|e| e.synthetic_id.as_str()).collect();
        assert_eq!(ids, vec!["project_1", "achievement_1", "education_1"]);
    }

    #[test]
    fn test_sort_tolerates_legacy_years() {
        let mut entries = vec![
            achievement(1, "2020-21", "legacy"),
            achievement(2, "2023", "new"),
            achievement(3, "999", "ancient"),
            achievement(4, "2019", "old"),
        ];
        sort_by_year_desc(&mut entries);
        let titles: Vec<&str> = entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["new", "legacy", "old", "ancient"]);
    }

    #[test]
    fn test_sort_order_independent_of_other_entries() {
        let project = |id: i64, year: i32| {
            entry_for(
                Project {
                    year: Some(year),
                    ..Project::new(id, 1, "p")
                }
                .into(),
            )
        };
        let ids = |entries: &[TimelineEntry]| -> Vec<String> {
            entries.iter().map(|e| e.synthetic_id.clone()).collect()
        };

        let mut pair = vec![achievement(1, "2020-21", "legacy"), project(1, 2023)];
        sort_by_year_desc(&mut pair);
        assert_eq!(ids(&pair), vec!["project_1", "achievement_1"]);

        let mut with_far_future = vec![
            achievement(1, "2020-21", "legacy"),
            project(1, 2023),
            project(2, 10000),
        ];
        sort_by_year_desc(&mut with_far_future);
        assert_eq!(
            ids(&with_far_future),
            vec!["project_2", "project_1", "achievement_1"]
        );
    }

    #[test]
    fn test_sort_keeps_negative_years_apart() {
        let mut entries = vec![
            achievement(1, "-300", "older"),
            achievement(2, "-5", "newer"),
            achievement(3, "undated", "text"),
        ];
        sort_by_year_desc(&mut entries);
        let titles: Vec<&str> = entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["newer", "older", "text"]);
    }

    #[test]
    fn test_source_filters() {
        let finished: Record = Project {
            status: ProjectStatus::Maintenance,
            ..Project::new(1, 1, "x")
        }
        .into();
        let major: Record = Project {
            major: true,
            ..Project::new(2, 1, "y")
        }
        .into();
        let planning: Record = Project::new(3, 1, "z").into();
        assert!(is_timeline_project(&finished));
        assert!(is_timeline_project(&major));
        assert!(!is_timeline_project(&planning));

        assert!(is_expert_skill(&Skill::new(1, 1, "Rust", 90).into()));
        assert!(!is_expert_skill(&Skill::new(1, 1, "Go", 89).into()));

        let done: Record = LearningProgress {
            completed: true,
            ..LearningProgress::new(1, 1, "k8s", 100)
        }
        .into();
        assert!(is_completed_learning(&done));
    }

    #[test]
    fn test_entry_carries_source_reference() {
        let entry = entry_for(Skill::new(7, 1, "Rust", 95).into());
        assert_eq!(entry.source, EntityRef::new(EntityKind::Skill, 7));
        assert_eq!(entry.category, "skill");
        assert_eq!(entry.synthetic_id, "skill_7");
    }
}
