//! Core data models for folio.
//!
//! These types are shared across all folio crates: the polymorphic entity
//! address, the metadata overlay, and the synthetic view types produced by
//! the resolver, merger, and aggregate calculator.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::cmp::Ordering;
use std::fmt;

use crate::defaults;

mod records;

pub use records::*;

/// Normalize an enum token: trim, uppercase, and map `-`/space to `_`.
pub(crate) fn normalize_token(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            other => other.to_ascii_uppercase(),
        })
        .collect()
}

// =============================================================================
// ENTITY ADDRESSING
// =============================================================================

/// Closed tag identifying a record's concrete type.
///
/// Used as the discriminator of the polymorphic `(kind, id)` address that
/// metadata rows and timeline entries refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    Project,
    Skill,
    Achievement,
    Education,
    Certificate,
    Hobby,
    Interest,
    Volunteer,
    LearningProgress,
    FutureGoal,
}

impl EntityKind {
    /// Every kind, in declaration order.
    pub const ALL: [EntityKind; 10] = [
        EntityKind::Project,
        EntityKind::Skill,
        EntityKind::Achievement,
        EntityKind::Education,
        EntityKind::Certificate,
        EntityKind::Hobby,
        EntityKind::Interest,
        EntityKind::Volunteer,
        EntityKind::LearningProgress,
        EntityKind::FutureGoal,
    ];

    /// Storage / wire representation (`LEARNING_PROGRESS`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Project => "PROJECT",
            Self::Skill => "SKILL",
            Self::Achievement => "ACHIEVEMENT",
            Self::Education => "EDUCATION",
            Self::Certificate => "CERTIFICATE",
            Self::Hobby => "HOBBY",
            Self::Interest => "INTEREST",
            Self::Volunteer => "VOLUNTEER",
            Self::LearningProgress => "LEARNING_PROGRESS",
            Self::FutureGoal => "FUTURE_GOAL",
        }
    }

    /// Short lowercase tag used to namespace synthetic ids and as the
    /// category of timeline entries.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Skill => "skill",
            Self::Achievement => "achievement",
            Self::Education => "education",
            Self::Certificate => "certificate",
            Self::Hobby => "hobby",
            Self::Interest => "interest",
            Self::Volunteer => "volunteer",
            Self::LearningProgress => "learning",
            Self::FutureGoal => "goal",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntityKind {
    type Err = String;

    /// Accepts `LEARNING_PROGRESS`, `learning-progress`, `learning_progress`
    /// and the short tags (`learning`, `goal`).
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let token = normalize_token(s);
        EntityKind::ALL
            .into_iter()
            .find(|k| k.as_str() == token || k.tag().eq_ignore_ascii_case(&token))
            .ok_or_else(|| format!("Invalid entity kind: {}", s))
    }
}

/// Polymorphic address of any record: `(kind, id)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub id: i64,
}

impl EntityRef {
    pub fn new(kind: EntityKind, id: i64) -> Self {
        Self { kind, id }
    }

    /// Kind-namespaced id, unique across kinds (`skill_7`, `project_7`).
    pub fn synthetic_id(&self) -> String {
        format!("{}_{}", self.kind.tag(), self.id)
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind, self.id)
    }
}

// =============================================================================
// METADATA OVERLAY
// =============================================================================

/// Importance of a decorated record.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Importance {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Importance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

impl std::str::FromStr for Importance {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "LOW" => Ok(Self::Low),
            "MEDIUM" => Ok(Self::Medium),
            "HIGH" => Ok(Self::High),
            "CRITICAL" => Ok(Self::Critical),
            _ => Err(format!("Invalid importance: {}", s)),
        }
    }
}

/// Presentation overlay attached to a record by `(kind, id)`.
///
/// Has no knowledge of the decorated type. Color and icon columns are
/// nullable; a null falls through to the record's computed default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub entity_kind: EntityKind,
    pub entity_id: i64,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub gradient: Option<String>,
    pub glow_color: Option<String>,
    pub importance: Importance,
    pub icon: Option<String>,
    pub featured: bool,
    #[serde(default)]
    pub custom_properties: Map<String, JsonValue>,
}

impl Metadata {
    /// A metadata row with the storage defaults for the given record.
    pub fn new(entity: EntityRef) -> Self {
        Self {
            entity_kind: entity.kind,
            entity_id: entity.id,
            primary_color: Some(defaults::PRIMARY_COLOR.to_string()),
            secondary_color: Some(defaults::SECONDARY_COLOR.to_string()),
            gradient: None,
            glow_color: None,
            importance: Importance::Medium,
            icon: None,
            featured: false,
            custom_properties: Map::new(),
        }
    }

    /// A row with every optional presentation column unset.
    pub fn blank(entity: EntityRef) -> Self {
        Self {
            primary_color: None,
            secondary_color: None,
            ..Self::new(entity)
        }
    }

    pub fn entity(&self) -> EntityRef {
        EntityRef::new(self.entity_kind, self.entity_id)
    }

    pub fn with_primary_color(mut self, color: impl Into<String>) -> Self {
        self.primary_color = Some(color.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_importance(mut self, importance: Importance) -> Self {
        self.importance = importance;
        self
    }

    pub fn featured(mut self, featured: bool) -> Self {
        self.featured = featured;
        self
    }
}

/// Type-specific computed defaults for a record with no (or partial) metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultBundle {
    pub color: String,
    pub secondary_color: String,
    pub icon: String,
}

/// Fully-populated presentation attributes for one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationBundle {
    pub color: String,
    pub secondary_color: String,
    pub icon: String,
    pub featured: bool,
    pub importance: Importance,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gradient: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glow_color: Option<String>,
}

// =============================================================================
// TIMELINE
// =============================================================================

/// Year of a timeline entry.
///
/// Legacy rows store years as free text; anything that does not parse as an
/// integer is carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimelineYear {
    Numeric(i32),
    Legacy(String),
}

impl TimelineYear {
    /// Parse stored year text. Blank input yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(match trimmed.parse::<i32>() {
            Ok(year) => Self::Numeric(year),
            Err(_) => Self::Legacy(trimmed.to_string()),
        })
    }

    pub fn as_number(&self) -> Option<i32> {
        match self {
            Self::Numeric(year) => Some(*year),
            Self::Legacy(_) => None,
        }
    }

    /// Year this value stands for: the numeric year, or the first run of
    /// digits in legacy text (`"Spring 2020"` is 2020).
    pub fn ordinal(&self) -> Option<i64> {
        match self {
            Self::Numeric(year) => Some(i64::from(*year)),
            Self::Legacy(text) => {
                let digits: String = text
                    .chars()
                    .skip_while(|c| !c.is_ascii_digit())
                    .take_while(char::is_ascii_digit)
                    .collect();
                digits.parse().ok()
            }
        }
    }
}

/// Chronological order.
///
/// Years compare by [`TimelineYear::ordinal`]. At the same ordinal a numeric
/// year sorts before legacy text (`2020 < "2020-21"`), and legacy texts
/// compare lexicographically. Text without digits sorts before every dated
/// value. The order depends only on the two values compared.
impl Ord for TimelineYear {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Numeric(a), Self::Numeric(b)) => a.cmp(b),
            _ => (self.ordinal(), self.legacy_text())
                .cmp(&(other.ordinal(), other.legacy_text())),
        }
    }
}

impl PartialOrd for TimelineYear {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl TimelineYear {
    fn legacy_text(&self) -> Option<&str> {
        match self {
            Self::Numeric(_) => None,
            Self::Legacy(text) => Some(text),
        }
    }
}

impl fmt::Display for TimelineYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(year) => write!(f, "{}", year),
            Self::Legacy(text) => f.write_str(text),
        }
    }
}

impl From<i32> for TimelineYear {
    fn from(year: i32) -> Self {
        Self::Numeric(year)
    }
}

/// Colors carried by a timeline entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryColors {
    pub primary: String,
    pub secondary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gradient: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glow: Option<String>,
}

/// Unified, synthetic representation of a dated record of any kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    /// Kind-namespaced id, unique across the whole merge.
    pub synthetic_id: String,
    pub source: EntityRef,
    pub year: TimelineYear,
    pub title: String,
    /// Tag derived from the source kind (`project`, `achievement`, ...).
    pub category: String,
    pub description: Option<String>,
    pub technologies: Vec<String>,
    pub icon: String,
    pub colors: EntryColors,
    pub importance: Importance,
}

impl TimelineEntry {
    /// Build an entry for `source`, taking presentation from `bundle`.
    pub fn new(
        source: EntityRef,
        year: TimelineYear,
        title: impl Into<String>,
        bundle: &PresentationBundle,
    ) -> Self {
        Self {
            synthetic_id: source.synthetic_id(),
            source,
            year,
            title: title.into(),
            category: source.kind.tag().to_string(),
            description: None,
            technologies: Vec::new(),
            icon: bundle.icon.clone(),
            colors: EntryColors {
                primary: bundle.color.clone(),
                secondary: bundle.secondary_color.clone(),
                gradient: bundle.gradient.clone(),
                glow: bundle.glow_color.clone(),
            },
            importance: bundle.importance,
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn with_technologies(mut self, technologies: Vec<String>) -> Self {
        self.technologies = technologies;
        self
    }
}

// =============================================================================
// AGGREGATES
// =============================================================================

/// One bucket of a categorical distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBucket {
    pub category: String,
    pub count: i64,
    /// Share of the total, 0.0–100.0 (unrounded).
    pub percentage: f64,
    /// Chart color for the category.
    pub color: String,
    pub icon: String,
}

/// Counts per bucket plus derived percentages.
///
/// Invariant: `Σ count == total` and, when `total > 0`, `Σ percentage ≈ 100`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AggregateResult {
    pub total: i64,
    pub buckets: Vec<CategoryBucket>,
}

impl AggregateResult {
    pub fn get(&self, category: &str) -> Option<&CategoryBucket> {
        self.buckets.iter().find(|b| b.category == category)
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Deployment success rate of a person's projects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessRate {
    pub deployed: i64,
    pub total: i64,
    pub success_rate: f64,
}

/// Summary statistics over a person's projects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevelopmentExperience {
    pub total_projects: i64,
    pub deployed_projects: i64,
    pub success_rate: f64,
    pub first_year: Option<i32>,
    pub latest_year: Option<i32>,
    pub years_active: i32,
    pub most_used_technology: Option<String>,
    pub primary_category: Option<String>,
    pub category_diversity: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_entity_kind_roundtrip_str() {
        for kind in EntityKind::ALL {
            let parsed: EntityKind = kind.as_str().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn test_entity_kind_parse_lenient() {
        assert_eq!(
            "learning-progress".parse::<EntityKind>().unwrap(),
            EntityKind::LearningProgress
        );
        assert_eq!(
            "future_goal".parse::<EntityKind>().unwrap(),
            EntityKind::FutureGoal
        );
        assert_eq!("learning".parse::<EntityKind>().unwrap(), EntityKind::LearningProgress);
        assert_eq!(" Project ".parse::<EntityKind>().unwrap(), EntityKind::Project);
        assert!("widget".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_entity_kind_serde_screaming_snake() {
        let json = serde_json::to_string(&EntityKind::LearningProgress).unwrap();
        assert_eq!(json, "\"LEARNING_PROGRESS\"");
    }

    #[test]
    fn test_synthetic_ids_unique_across_kinds() {
        let ids: HashSet<String> = EntityKind::ALL
            .iter()
            .map(|k| EntityRef::new(*k, 7).synthetic_id())
            .collect();
        assert_eq!(ids.len(), EntityKind::ALL.len());
        assert_eq!(EntityRef::new(EntityKind::Skill, 7).synthetic_id(), "skill_7");
        assert_eq!(
            EntityRef::new(EntityKind::LearningProgress, 7).synthetic_id(),
            "learning_7"
        );
    }

    #[test]
    fn test_metadata_new_has_storage_defaults() {
        let meta = Metadata::new(EntityRef::new(EntityKind::Project, 1));
        assert_eq!(meta.primary_color.as_deref(), Some("#3B82F6"));
        assert_eq!(meta.secondary_color.as_deref(), Some("#1E40AF"));
        assert_eq!(meta.importance, Importance::Medium);
        assert!(!meta.featured);
        assert!(meta.icon.is_none());
    }

    #[test]
    fn test_importance_ordering() {
        assert!(Importance::Critical > Importance::High);
        assert!(Importance::High > Importance::Medium);
        assert!(Importance::Medium > Importance::Low);
        assert_eq!(Importance::default(), Importance::Medium);
    }

    #[test]
    fn test_timeline_year_parse() {
        assert_eq!(TimelineYear::parse("2021"), Some(TimelineYear::Numeric(2021)));
        assert_eq!(TimelineYear::parse(" 2021 "), Some(TimelineYear::Numeric(2021)));
        assert_eq!(
            TimelineYear::parse("2020-21"),
            Some(TimelineYear::Legacy("2020-21".to_string()))
        );
        assert_eq!(TimelineYear::parse("   "), None);
    }

    #[test]
    fn test_timeline_year_serializes_untagged() {
        assert_eq!(serde_json::to_string(&TimelineYear::Numeric(2023)).unwrap(), "2023");
        assert_eq!(
            serde_json::to_string(&TimelineYear::Legacy("Spring 2020".into())).unwrap(),
            "\"Spring 2020\""
        );
    }

    #[test]
    fn test_year_order_is_chronological() {
        let legacy = TimelineYear::Legacy("2020-21".into());
        assert!(TimelineYear::Numeric(999) < TimelineYear::Numeric(2021));
        assert!(TimelineYear::Numeric(-50) < TimelineYear::Numeric(0));
        assert!(TimelineYear::Numeric(2020) < legacy);
        assert!(legacy < TimelineYear::Numeric(2021));
        assert!(legacy < TimelineYear::Numeric(10000));
        assert!(TimelineYear::Legacy("someday".into()) < TimelineYear::Numeric(-50));
        assert_eq!(TimelineYear::Legacy("Spring 2020".into()).ordinal(), Some(2020));
        assert_eq!(TimelineYear::Legacy("someday".into()).ordinal(), None);
    }

    #[test]
    fn test_year_order_is_total() {
        let years = vec![
            TimelineYear::Numeric(10000),
            TimelineYear::Numeric(2023),
            TimelineYear::Numeric(-3),
            TimelineYear::Legacy("2020-21".into()),
            TimelineYear::Legacy("Fall 2020".into()),
            TimelineYear::Legacy("n/a".into()),
        ];
        for a in &years {
            for b in &years {
                assert_eq!(a.cmp(b), b.cmp(a).reverse());
                for c in &years {
                    if a <= b && b <= c {
                        assert!(a <= c, "{a} <= {b} <= {c}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_aggregate_result_get() {
        let result = AggregateResult {
            total: 1,
            buckets: vec![CategoryBucket {
                category: "web".into(),
                count: 1,
                percentage: 100.0,
                color: "#3B82F6".into(),
                icon: "globe".into(),
            }],
        };
        assert_eq!(result.get("web").map(|b| b.count), Some(1));
        assert!(result.get("mobile").is_none());
        assert!(!result.is_empty());
    }
}
