//! Query functions over one person's portfolio.
//!
//! [`PortfolioViews`] validates inputs at the boundary and combines the
//! resolver, merger, and aggregates into the views served over HTTP.

use std::cmp::Reverse;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use folio_core::defaults::{
    FEATURED_LIMIT, MAX_DAYS_AHEAD, MAX_LEVEL, MAX_LIMIT, TOP_SKILLS_LIMIT, TOP_SKILLS_MIN_LEVEL,
    UPCOMING_DAYS_AHEAD,
};
use folio_core::presentation::{
    complexity_label, level_label, recognition_color_or_neutral, recognition_css_class,
    status_color, status_css_class,
};
use folio_core::{
    AggregateResult, DevelopmentExperience, Education, EntityKind, EntityRef, Error, FutureGoal,
    LearningProgress, MetadataRepository, PresentationBundle, Record, RecordPredicate,
    RecordRepository, Result, Skill, SkillCategory, SuccessRate, TimelineEntry,
};

use crate::aggregate::{self, category_distribution, diversity_over};
use crate::merger::CrossEntityMerger;
use crate::resolver::{resolve_with, MetadataResolver};

/// Maximum accepted length of a search term.
pub const MAX_SEARCH_TERM_LEN: usize = 200;

// =============================================================================
// VIEW TYPES
// =============================================================================

/// A record of any kind with its resolved presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordView {
    pub entity: EntityRef,
    pub synthetic_id: String,
    pub title: String,
    pub year: Option<i32>,
    pub presentation: PresentationBundle,
    /// Status of a project or recognition of an achievement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<Badge>,
    /// Complexity label of a project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<String>,
}

impl RecordView {
    fn new(record: &Record, presentation: PresentationBundle) -> Self {
        let entity = record.entity_ref();
        let complexity = match record {
            Record::Project(p) => p.complexity.map(|c| complexity_label(c).to_string()),
            _ => None,
        };
        Self {
            entity,
            synthetic_id: entity.synthetic_id(),
            title: record.title(),
            year: record.dated_year(),
            presentation,
            badge: Badge::for_record(record),
            complexity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub label: String,
    pub color: String,
    pub css_class: String,
}

impl Badge {
    /// Badge for kinds that carry one; `None` for the rest.
    pub fn for_record(record: &Record) -> Option<Self> {
        match record {
            Record::Project(p) => Some(Self {
                label: p.status.as_str().to_string(),
                color: status_color(p.status).to_string(),
                css_class: status_css_class(p.status).to_string(),
            }),
            Record::Achievement(a) => Some(Self {
                label: a
                    .recognition_level
                    .map_or("NONE", |level| level.as_str())
                    .to_string(),
                color: recognition_color_or_neutral(a.recognition_level).to_string(),
                css_class: recognition_css_class(a.recognition_level).to_string(),
            }),
            _ => None,
        }
    }
}

/// Skill category distribution with its diversity score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillCategoriesView {
    pub distribution: AggregateResult,
    pub diversity_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillView {
    pub skill: Skill,
    pub level_label: String,
    pub presentation: PresentationBundle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentEducationView {
    pub education: Education,
    pub year_of_study: i32,
    pub presentation: PresentationBundle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningView {
    pub item: LearningProgress,
    /// Parsed estimate; a missing or malformed estimate is "now".
    pub estimated_completion: DateTime<Utc>,
    pub presentation: PresentationBundle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalView {
    pub goal: FutureGoal,
    pub days_remaining: i64,
    pub presentation: PresentationBundle,
}

// =============================================================================
// VALIDATION
// =============================================================================

pub fn validate_owner_id(owner_id: i64) -> Result<()> {
    if owner_id <= 0 {
        return Err(Error::InvalidInput(format!(
            "owner_id must be positive, got {}",
            owner_id
        )));
    }
    Ok(())
}

fn validate_range<T>(name: &str, value: T, min: T, max: T) -> Result<T>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if value < min || value > max {
        return Err(Error::InvalidInput(format!(
            "{} must be between {} and {}, got {}",
            name, min, max, value
        )));
    }
    Ok(value)
}

/// Parse a stored estimated-completion value.
///
/// Accepts RFC 3339 timestamps and `YYYY-MM-DD` dates. Anything else,
/// including a missing value, is `now`.
pub fn parse_estimated_completion(raw: Option<&str>, now: DateTime<Utc>) -> DateTime<Utc> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return now;
    };
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return ts.with_timezone(&Utc);
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_time(NaiveTime::MIN).and_utc();
    }
    warn!(
        subsystem = "views",
        component = "portfolio",
        value = raw,
        "Malformed estimated completion, using current time"
    );
    now
}

// =============================================================================
// PORTFOLIO VIEWS
// =============================================================================

/// Read-only views over one person's records.
#[derive(Clone)]
pub struct PortfolioViews {
    records: Arc<dyn RecordRepository>,
    resolver: MetadataResolver,
    merger: CrossEntityMerger,
    fixed_now: Option<DateTime<Utc>>,
}

impl PortfolioViews {
    pub fn new(records: Arc<dyn RecordRepository>, metadata: Arc<dyn MetadataRepository>) -> Self {
        let resolver = MetadataResolver::new(metadata);
        Self {
            merger: CrossEntityMerger::new(records.clone(), resolver.clone()),
            records,
            resolver,
            fixed_now: None,
        }
    }

    /// Pin the clock used for "now", "today", and the current year.
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.fixed_now = Some(now);
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.fixed_now.unwrap_or_else(Utc::now)
    }

    pub fn resolver(&self) -> &MetadataResolver {
        &self.resolver
    }

    fn finish(&self, op: &'static str, owner_id: i64, count: usize, start: Instant) {
        debug!(
            subsystem = "views",
            component = "portfolio",
            op,
            owner_id,
            result_count = count,
            duration_ms = start.elapsed().as_millis() as u64,
            "View computed"
        );
    }

    pub async fn timeline(&self, owner_id: i64) -> Result<Vec<TimelineEntry>> {
        validate_owner_id(owner_id)?;
        self.merger
            .build_timeline(owner_id, self.now().year())
            .await
    }

    pub async fn learning_milestones(&self, owner_id: i64) -> Result<Vec<TimelineEntry>> {
        validate_owner_id(owner_id)?;
        self.merger
            .build_learning_milestones(owner_id, self.now().year())
            .await
    }

    pub async fn project_categories(&self, owner_id: i64) -> Result<AggregateResult> {
        validate_owner_id(owner_id)?;
        let start = Instant::now();
        let projects = self
            .records
            .find_all_by_owner(EntityKind::Project, owner_id)
            .await?;
        let result = category_distribution(projects.iter().map(Record::category));
        self.finish("project_categories", owner_id, result.buckets.len(), start);
        Ok(result)
    }

    pub async fn skill_categories(&self, owner_id: i64) -> Result<SkillCategoriesView> {
        validate_owner_id(owner_id)?;
        let start = Instant::now();
        let skills = self
            .records
            .find_all_by_owner(EntityKind::Skill, owner_id)
            .await?;
        let distribution = category_distribution(skills.iter().map(Record::category));
        let diversity_score = diversity_over(&distribution, SkillCategory::ALL);
        self.finish("skill_categories", owner_id, distribution.buckets.len(), start);
        Ok(SkillCategoriesView {
            distribution,
            diversity_score,
        })
    }

    /// Deployed share of projects, counted in the store.
    pub async fn success_rate(&self, owner_id: i64) -> Result<SuccessRate> {
        validate_owner_id(owner_id)?;
        let total = self
            .records
            .count_by_owner(EntityKind::Project, owner_id, &RecordPredicate::All)
            .await?;
        let deployed = self
            .records
            .count_by_owner(EntityKind::Project, owner_id, &RecordPredicate::deployed())
            .await?;
        Ok(aggregate::success_rate_from_counts(deployed, total))
    }

    pub async fn development_experience(&self, owner_id: i64) -> Result<DevelopmentExperience> {
        validate_owner_id(owner_id)?;
        let start = Instant::now();
        let projects: Vec<_> = self
            .records
            .find_all_by_owner(EntityKind::Project, owner_id)
            .await?
            .into_iter()
            .filter_map(|r| match r {
                Record::Project(p) => Some(p),
                _ => None,
            })
            .collect();
        let experience = aggregate::development_experience(&projects, self.now().year());
        self.finish("development_experience", owner_id, projects.len(), start);
        Ok(experience)
    }

    /// Records whose metadata marks them featured, most important first.
    pub async fn featured(&self, owner_id: i64, limit: Option<i64>) -> Result<Vec<RecordView>> {
        validate_owner_id(owner_id)?;
        let limit = validate_range("limit", limit.unwrap_or(FEATURED_LIMIT), 1, MAX_LIMIT)?;
        let start = Instant::now();

        let records = self.all_records(owner_id).await?;
        let metadata = self.resolver.lookup_many(&records).await;
        let mut featured: Vec<RecordView> = records
            .iter()
            .filter_map(|record| {
                let meta = metadata.get(&record.entity_ref()).filter(|m| m.featured)?;
                let bundle = resolve_with(
                    Some(meta),
                    folio_core::DefaultBundle::for_record(record),
                );
                Some(RecordView::new(record, bundle))
            })
            .collect();
        featured.sort_by_key(|v| Reverse((v.presentation.importance, v.year)));
        featured.truncate(limit as usize);

        self.finish("featured", owner_id, featured.len(), start);
        Ok(featured)
    }

    /// Presentation for a single record.
    pub async fn presentation(&self, entity: EntityRef) -> Result<RecordView> {
        if entity.id <= 0 {
            return Err(Error::InvalidInput(format!(
                "id must be positive, got {}",
                entity.id
            )));
        }
        let record = self
            .records
            .find_by_id(entity)
            .await?
            .ok_or(Error::RecordNotFound(entity))?;
        let bundle = self.resolver.resolve_record(&record).await;
        Ok(RecordView::new(&record, bundle))
    }

    /// Skills at or above `min_level`, strongest first.
    pub async fn top_skills(
        &self,
        owner_id: i64,
        min_level: Option<i32>,
        limit: Option<i64>,
    ) -> Result<Vec<SkillView>> {
        validate_owner_id(owner_id)?;
        let min_level = validate_range(
            "min_level",
            min_level.unwrap_or(TOP_SKILLS_MIN_LEVEL),
            0,
            MAX_LEVEL,
        )?;
        let limit = validate_range("limit", limit.unwrap_or(TOP_SKILLS_LIMIT), 1, MAX_LIMIT)?;
        let start = Instant::now();

        let mut skills: Vec<Record> = self
            .records
            .find_all_by_owner(EntityKind::Skill, owner_id)
            .await?
            .into_iter()
            .filter(|r| matches!(r, Record::Skill(s) if s.level >= min_level))
            .collect();
        skills.sort_by_key(|r| match r {
            Record::Skill(s) => Reverse(s.level),
            _ => Reverse(0),
        });
        skills.truncate(limit as usize);

        let bundles = self.resolver.resolve_many(&skills).await;
        let views: Vec<SkillView> = skills
            .into_iter()
            .zip(bundles)
            .filter_map(|(record, presentation)| match record {
                Record::Skill(skill) => Some(SkillView {
                    level_label: level_label(skill.level).to_string(),
                    skill,
                    presentation,
                }),
                _ => None,
            })
            .collect();

        self.finish("top_skills", owner_id, views.len(), start);
        Ok(views)
    }

    /// The program currently attended, if any.
    ///
    /// With several current programs, the most recently started one wins.
    pub async fn current_education(&self, owner_id: i64) -> Result<Option<CurrentEducationView>> {
        validate_owner_id(owner_id)?;
        let today = self.now().date_naive();

        let current = self
            .records
            .find_all_by_owner(EntityKind::Education, owner_id)
            .await?
            .into_iter()
            .filter_map(|r| match r {
                Record::Education(e) if e.current => Some(e),
                _ => None,
            })
            .max_by_key(|e| e.start_date);

        let Some(education) = current else {
            return Ok(None);
        };
        let record = Record::Education(education.clone());
        let presentation = self.resolver.resolve_record(&record).await;
        let year_of_study = education
            .start_date
            .map_or(folio_core::defaults::STUDY_YEAR_MIN, |start| {
                aggregate::current_year_of_study(start, today)
            });

        Ok(Some(CurrentEducationView {
            education,
            year_of_study,
            presentation,
        }))
    }

    /// Unfinished learning items, soonest estimated completion first.
    pub async fn learning_in_progress(&self, owner_id: i64) -> Result<Vec<LearningView>> {
        validate_owner_id(owner_id)?;
        let start = Instant::now();
        let now = self.now();

        let items: Vec<Record> = self
            .records
            .find_all_by_owner(EntityKind::LearningProgress, owner_id)
            .await?
            .into_iter()
            .filter(|r| matches!(r, Record::LearningProgress(l) if !l.completed))
            .collect();
        let bundles = self.resolver.resolve_many(&items).await;

        let mut views: Vec<LearningView> = items
            .into_iter()
            .zip(bundles)
            .filter_map(|(record, presentation)| match record {
                Record::LearningProgress(item) => Some(LearningView {
                    estimated_completion: parse_estimated_completion(
                        item.estimated_completion.as_deref(),
                        now,
                    ),
                    item,
                    presentation,
                }),
                _ => None,
            })
            .collect();
        views.sort_by_key(|v| v.estimated_completion);

        self.finish("learning_in_progress", owner_id, views.len(), start);
        Ok(views)
    }

    /// Goals whose target date falls within the next `days_ahead` days.
    pub async fn upcoming_goals(&self, owner_id: i64, days_ahead: Option<i64>) -> Result<Vec<GoalView>> {
        validate_owner_id(owner_id)?;
        let days_ahead = validate_range(
            "days_ahead",
            days_ahead.unwrap_or(UPCOMING_DAYS_AHEAD),
            1,
            MAX_DAYS_AHEAD,
        )?;
        let start = Instant::now();
        let today = self.now().date_naive();
        let horizon = today + Duration::days(days_ahead);

        let mut goals: Vec<Record> = self
            .records
            .find_all_by_owner(EntityKind::FutureGoal, owner_id)
            .await?
            .into_iter()
            .filter(|r| {
                matches!(r, Record::FutureGoal(g)
                    if g.target_date.is_some_and(|d| d >= today && d <= horizon))
            })
            .collect();
        goals.sort_by_key(|r| match r {
            Record::FutureGoal(g) => g.target_date,
            _ => None,
        });

        let bundles = self.resolver.resolve_many(&goals).await;
        let views: Vec<GoalView> = goals
            .into_iter()
            .zip(bundles)
            .filter_map(|(record, presentation)| match record {
                Record::FutureGoal(goal) => {
                    let target = goal.target_date?;
                    Some(GoalView {
                        days_remaining: (target - today).num_days(),
                        goal,
                        presentation,
                    })
                }
                _ => None,
            })
            .collect();

        self.finish("upcoming_goals", owner_id, views.len(), start);
        Ok(views)
    }

    /// Records of any kind whose title contains `query`, case-insensitively.
    pub async fn search(&self, owner_id: i64, query: &str) -> Result<Vec<RecordView>> {
        validate_owner_id(owner_id)?;
        let term = query.trim();
        if term.is_empty() {
            return Err(Error::InvalidInput("search term must not be empty".into()));
        }
        if term.chars().count() > MAX_SEARCH_TERM_LEN {
            return Err(Error::InvalidInput(format!(
                "search term must be at most {} characters",
                MAX_SEARCH_TERM_LEN
            )));
        }
        let start = Instant::now();
        let needle = term.to_lowercase();

        let matches: Vec<Record> = self
            .all_records(owner_id)
            .await?
            .into_iter()
            .filter(|r| r.title().to_lowercase().contains(&needle))
            .collect();
        let bundles = self.resolver.resolve_many(&matches).await;
        let views: Vec<RecordView> = matches
            .iter()
            .zip(bundles)
            .map(|(record, bundle)| RecordView::new(record, bundle))
            .collect();

        self.finish("search", owner_id, views.len(), start);
        Ok(views)
    }

    async fn all_records(&self, owner_id: i64) -> Result<Vec<Record>> {
        let mut all = Vec::new();
        for kind in EntityKind::ALL {
            all.extend(self.records.find_all_by_owner(kind, owner_id).await?);
        }
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_owner_id() {
        assert!(validate_owner_id(1).is_ok());
        assert!(matches!(validate_owner_id(0), Err(Error::InvalidInput(_))));
        assert!(matches!(validate_owner_id(-5), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_validate_range_message() {
        let err = validate_range("limit", 0i64, 1, 100).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid input: limit must be between 1 and 100, got 0"
        );
        assert_eq!(validate_range("limit", 100i64, 1, 100).unwrap(), 100);
    }

    #[test]
    fn test_parse_estimated_completion() {
        let now = "2026-01-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(parse_estimated_completion(None, now), now);
        assert_eq!(parse_estimated_completion(Some("  "), now), now);
        assert_eq!(parse_estimated_completion(Some("next spring"), now), now);
        assert_eq!(
            parse_estimated_completion(Some("2026-03-15"), now),
            "2026-03-15T00:00:00Z".parse::<DateTime<Utc>>().unwrap()
        );
        assert_eq!(
            parse_estimated_completion(Some("2026-03-15T12:00:00+02:00"), now),
            "2026-03-15T10:00:00Z".parse::<DateTime<Utc>>().unwrap()
        );
    }
}
