//! Record shapes read from the record store.
//!
//! Only the fields the resolver, merger, and aggregates need are modeled.
//! Enum columns are stored as text; unknown values degrade to a default
//! rather than failing the read.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{normalize_token, EntityKind, EntityRef};

macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $label:literal {
            $( $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $( $variant ),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),+ ];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $text ),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;
            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                let token = normalize_token(s);
                match token.as_str() {
                    $( $text => Ok(Self::$variant), )+
                    _ => Err(format!(concat!("Invalid ", $label, ": {}"), s)),
                }
            }
        }
    };
}

text_enum! {
    /// Lifecycle status of a project.
    ProjectStatus, "project status" {
        Planning => "PLANNING",
        InProgress => "IN_PROGRESS",
        Completed => "COMPLETED",
        Production => "PRODUCTION",
        Maintenance => "MAINTENANCE",
        Archived => "ARCHIVED",
    }
}

impl Default for ProjectStatus {
    fn default() -> Self {
        Self::Planning
    }
}

impl ProjectStatus {
    /// Statuses that count as "deployed" for the success rate.
    pub const DEPLOYED: &'static [ProjectStatus] =
        &[ProjectStatus::Production, ProjectStatus::Maintenance];

    pub fn is_deployed(&self) -> bool {
        Self::DEPLOYED.contains(self)
    }

    /// Finished statuses that qualify a project for the timeline.
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            ProjectStatus::Completed | ProjectStatus::Production | ProjectStatus::Maintenance
        )
    }
}

text_enum! {
    /// Technical complexity of a project.
    Complexity, "complexity" {
        Beginner => "BEGINNER",
        Intermediate => "INTERMEDIATE",
        Advanced => "ADVANCED",
        Expert => "EXPERT",
    }
}

text_enum! {
    /// Reach of an achievement's recognition.
    RecognitionLevel, "recognition level" {
        Local => "LOCAL",
        Regional => "REGIONAL",
        National => "NATIONAL",
        International => "INTERNATIONAL",
    }
}

text_enum! {
    /// Closed project category enumeration used for diversity scoring.
    ProjectCategory, "project category" {
        Web => "WEB",
        Mobile => "MOBILE",
        Desktop => "DESKTOP",
        Backend => "BACKEND",
        DataScience => "DATA_SCIENCE",
        MachineLearning => "MACHINE_LEARNING",
        Devops => "DEVOPS",
        Game => "GAME",
        Embedded => "EMBEDDED",
        Security => "SECURITY",
    }
}

text_enum! {
    /// Closed skill category enumeration used for diversity scoring.
    SkillCategory, "skill category" {
        Programming => "PROGRAMMING",
        Frontend => "FRONTEND",
        Backend => "BACKEND",
        Database => "DATABASE",
        Devops => "DEVOPS",
        Cloud => "CLOUD",
        Mobile => "MOBILE",
        DataScience => "DATA_SCIENCE",
        Design => "DESIGN",
        Tools => "TOOLS",
        SoftSkills => "SOFT_SKILLS",
    }
}

// =============================================================================
// RECORD SHAPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub status: ProjectStatus,
    pub complexity: Option<Complexity>,
    pub technologies: Vec<String>,
    pub year: Option<i32>,
    pub completion_date: Option<NaiveDate>,
    /// Marked as a major project by the owner; qualifies for the timeline
    /// regardless of status.
    pub major: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Project {
    pub fn new(id: i64, owner_id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            owner_id,
            title: title.into(),
            description: None,
            category: None,
            status: ProjectStatus::default(),
            complexity: None,
            technologies: Vec::new(),
            year: None,
            completion_date: None,
            major: false,
            updated_at: None,
        }
    }

    /// Year the project is dated to: explicit year, then completion date.
    pub fn dated_year(&self) -> Option<i32> {
        self.year.or_else(|| self.completion_date.map(|d| d.year()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub category: Option<String>,
    /// Proficiency, 0–100.
    pub level: i32,
    pub years_experience: Option<f64>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Skill {
    pub fn new(id: i64, owner_id: i64, name: impl Into<String>, level: i32) -> Self {
        Self {
            id,
            owner_id,
            name: name.into(),
            category: None,
            level,
            years_experience: None,
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub recognition_level: Option<RecognitionLevel>,
    /// Year as stored by legacy rows; may be non-numeric.
    pub year: Option<String>,
    pub achieved_at: Option<NaiveDate>,
    pub technologies: Vec<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Achievement {
    pub fn new(id: i64, owner_id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            owner_id,
            title: title.into(),
            description: None,
            category: None,
            recognition_level: None,
            year: None,
            achieved_at: None,
            technologies: Vec::new(),
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub id: i64,
    pub owner_id: i64,
    pub institution: String,
    pub degree: String,
    pub field_of_study: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub graduation_year: Option<i32>,
    /// Program currently being attended.
    pub current: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Education {
    pub fn new(
        id: i64,
        owner_id: i64,
        institution: impl Into<String>,
        degree: impl Into<String>,
    ) -> Self {
        Self {
            id,
            owner_id,
            institution: institution.into(),
            degree: degree.into(),
            field_of_study: None,
            start_date: None,
            end_date: None,
            graduation_year: None,
            current: false,
            updated_at: None,
        }
    }

    /// Display title: "Degree, Institution".
    pub fn title(&self) -> String {
        format!("{}, {}", self.degree, self.institution)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certificate {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub issuer: Option<String>,
    pub category: Option<String>,
    pub verified: bool,
    pub issue_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Certificate {
    pub fn new(id: i64, owner_id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            owner_id,
            name: name.into(),
            issuer: None,
            category: None,
            verified: false,
            issue_date: None,
            expiry_date: None,
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hobby {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Hobby {
    pub fn new(id: i64, owner_id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            owner_id,
            name: name.into(),
            category: None,
            description: None,
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interest {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub category: Option<String>,
    /// Relevance to the owner's profile, 0.0–1.0.
    pub relevance_score: Option<f64>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Interest {
    pub fn new(id: i64, owner_id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            owner_id,
            name: name.into(),
            category: None,
            relevance_score: None,
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Volunteer {
    pub id: i64,
    pub owner_id: i64,
    pub organization: String,
    pub role: String,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Volunteer {
    pub fn new(
        id: i64,
        owner_id: i64,
        organization: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            id,
            owner_id,
            organization: organization.into(),
            role: role.into(),
            description: None,
            start_date: None,
            end_date: None,
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningProgress {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub category: Option<String>,
    /// Completion percentage, 0–100.
    pub progress: i32,
    pub completed: bool,
    pub completed_at: Option<NaiveDate>,
    /// Estimated completion as stored by legacy rows (RFC 3339 or
    /// `YYYY-MM-DD`); may be malformed.
    pub estimated_completion: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl LearningProgress {
    pub fn new(id: i64, owner_id: i64, title: impl Into<String>, progress: i32) -> Self {
        Self {
            id,
            owner_id,
            title: title.into(),
            category: None,
            progress,
            completed: false,
            completed_at: None,
            estimated_completion: None,
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FutureGoal {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub target_date: Option<NaiveDate>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl FutureGoal {
    pub fn new(id: i64, owner_id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            owner_id,
            title: title.into(),
            category: None,
            description: None,
            target_date: None,
            updated_at: None,
        }
    }
}

// =============================================================================
// RECORD SUM TYPE
// =============================================================================

/// Any record that can carry metadata or appear in a cross-entity view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "record", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Record {
    Project(Project),
    Skill(Skill),
    Achievement(Achievement),
    Education(Education),
    Certificate(Certificate),
    Hobby(Hobby),
    Interest(Interest),
    Volunteer(Volunteer),
    LearningProgress(LearningProgress),
    FutureGoal(FutureGoal),
}

impl Record {
    pub fn kind(&self) -> EntityKind {
        match self {
            Record::Project(_) => EntityKind::Project,
            Record::Skill(_) => EntityKind::Skill,
            Record::Achievement(_) => EntityKind::Achievement,
            Record::Education(_) => EntityKind::Education,
            Record::Certificate(_) => EntityKind::Certificate,
            Record::Hobby(_) => EntityKind::Hobby,
            Record::Interest(_) => EntityKind::Interest,
            Record::Volunteer(_) => EntityKind::Volunteer,
            Record::LearningProgress(_) => EntityKind::LearningProgress,
            Record::FutureGoal(_) => EntityKind::FutureGoal,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            Record::Project(r) => r.id,
            Record::Skill(r) => r.id,
            Record::Achievement(r) => r.id,
            Record::Education(r) => r.id,
            Record::Certificate(r) => r.id,
            Record::Hobby(r) => r.id,
            Record::Interest(r) => r.id,
            Record::Volunteer(r) => r.id,
            Record::LearningProgress(r) => r.id,
            Record::FutureGoal(r) => r.id,
        }
    }

    pub fn owner_id(&self) -> i64 {
        match self {
            Record::Project(r) => r.owner_id,
            Record::Skill(r) => r.owner_id,
            Record::Achievement(r) => r.owner_id,
            Record::Education(r) => r.owner_id,
            Record::Certificate(r) => r.owner_id,
            Record::Hobby(r) => r.owner_id,
            Record::Interest(r) => r.owner_id,
            Record::Volunteer(r) => r.owner_id,
            Record::LearningProgress(r) => r.owner_id,
            Record::FutureGoal(r) => r.owner_id,
        }
    }

    pub fn entity_ref(&self) -> EntityRef {
        EntityRef::new(self.kind(), self.id())
    }

    /// Free-text title or name shown for the record.
    pub fn title(&self) -> String {
        match self {
            Record::Project(r) => r.title.clone(),
            Record::Skill(r) => r.name.clone(),
            Record::Achievement(r) => r.title.clone(),
            Record::Education(r) => r.title(),
            Record::Certificate(r) => r.name.clone(),
            Record::Hobby(r) => r.name.clone(),
            Record::Interest(r) => r.name.clone(),
            Record::Volunteer(r) => format!("{}, {}", r.role, r.organization),
            Record::LearningProgress(r) => r.title.clone(),
            Record::FutureGoal(r) => r.title.clone(),
        }
    }

    /// Categorical field, if the kind has one.
    pub fn category(&self) -> Option<&str> {
        match self {
            Record::Project(r) => r.category.as_deref(),
            Record::Skill(r) => r.category.as_deref(),
            Record::Achievement(r) => r.category.as_deref(),
            Record::Education(r) => r.field_of_study.as_deref(),
            Record::Certificate(r) => r.category.as_deref(),
            Record::Hobby(r) => r.category.as_deref(),
            Record::Interest(r) => r.category.as_deref(),
            Record::Volunteer(_) => None,
            Record::LearningProgress(r) => r.category.as_deref(),
            Record::FutureGoal(r) => r.category.as_deref(),
        }
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Record::Project(r) => r.updated_at,
            Record::Skill(r) => r.updated_at,
            Record::Achievement(r) => r.updated_at,
            Record::Education(r) => r.updated_at,
            Record::Certificate(r) => r.updated_at,
            Record::Hobby(r) => r.updated_at,
            Record::Interest(r) => r.updated_at,
            Record::Volunteer(r) => r.updated_at,
            Record::LearningProgress(r) => r.updated_at,
            Record::FutureGoal(r) => r.updated_at,
        }
    }

    /// Best-known year for ordering records of mixed kinds: the kind's own
    /// date field, then the update timestamp.
    pub fn dated_year(&self) -> Option<i32> {
        let own = match self {
            Record::Project(r) => r.dated_year(),
            Record::Achievement(r) => r
                .year
                .as_deref()
                .and_then(|y| y.trim().parse().ok())
                .or_else(|| r.achieved_at.map(|d| d.year())),
            Record::Education(r) => r
                .graduation_year
                .or_else(|| r.end_date.map(|d| d.year())),
            Record::Certificate(r) => r.issue_date.map(|d| d.year()),
            Record::Volunteer(r) => r.start_date.map(|d| d.year()),
            Record::LearningProgress(r) => r.completed_at.map(|d| d.year()),
            Record::FutureGoal(r) => r.target_date.map(|d| d.year()),
            Record::Skill(_) | Record::Hobby(_) | Record::Interest(_) => None,
        };
        own.or_else(|| self.updated_at().map(|t| t.year()))
    }
}

macro_rules! record_from {
    ($($variant:ident),+) => {
        $(
            impl From<$variant> for Record {
                fn from(r: $variant) -> Self {
                    Record::$variant(r)
                }
            }
        )+
    };
}

record_from!(
    Project,
    Skill,
    Achievement,
    Education,
    Certificate,
    Hobby,
    Interest,
    Volunteer,
    LearningProgress,
    FutureGoal
);
