//! Presentation lookup tables.
//!
//! Category, level, and recognition values map to colors, icons, labels, and
//! CSS classes. Each table has an `Option`-returning lookup used as a cascade
//! step and, where callers need one, a total variant with an explicit default.
//!
//! Category keys are matched case-insensitively: input is trimmed,
//! lower-cased, and `-`/space are treated as `_`.

use crate::defaults;
use crate::models::{Complexity, ProjectStatus, RecognitionLevel};

/// Lower-case a category key and unify separators.
pub fn normalize_category(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

// =============================================================================
// CATEGORY TABLES
// =============================================================================

/// Color for a category, if the category is known.
pub fn category_color(category: &str) -> Option<&'static str> {
    let color = match normalize_category(category).as_str() {
        // projects
        "web" => "#3B82F6",
        "mobile" => "#8B5CF6",
        "desktop" => "#6366F1",
        "backend" => "#0EA5E9",
        "data_science" => "#F59E0B",
        "machine_learning" => "#EC4899",
        "devops" => "#14B8A6",
        "game" => "#EF4444",
        "embedded" => "#84CC16",
        "security" => "#DC2626",
        // skills
        "programming" => "#2563EB",
        "frontend" => "#06B6D4",
        "database" => "#F97316",
        "cloud" => "#38BDF8",
        "design" => "#DB2777",
        "tools" => "#64748B",
        "soft_skills" => "#A855F7",
        // education fields
        "computer_science" => "#1D4ED8",
        "engineering" => "#0F766E",
        "mathematics" => "#7C3AED",
        "business" => "#B45309",
        // achievements
        "academic" => "#2563EB",
        "competition" => "#F59E0B",
        "hackathon" => "#EA580C",
        "award" => "#CA8A04",
        "publication" => "#4F46E5",
        // hobbies, interests, goals
        "music" => "#A855F7",
        "sports" => "#EF4444",
        "art" => "#EC4899",
        "reading" => "#92400E",
        "travel" => "#0891B2",
        "photography" => "#475569",
        "technology" => "#3B82F6",
        "career" => "#1E40AF",
        "personal" => "#DB2777",
        "volunteer" => defaults::SUCCESS_COLOR,
        _ => return None,
    };
    Some(color)
}

/// Color for a category, or the primary default.
pub fn category_color_or_default(category: Option<&str>) -> &'static str {
    category
        .and_then(category_color)
        .unwrap_or(defaults::PRIMARY_COLOR)
}

/// Icon for a category, if the category is known.
pub fn category_icon(category: &str) -> Option<&'static str> {
    let icon = match normalize_category(category).as_str() {
        "web" => "globe",
        "mobile" => "smartphone",
        "desktop" => "monitor",
        "backend" => "server",
        "data_science" => "bar-chart",
        "machine_learning" => "cpu",
        "devops" => "git-branch",
        "game" => "gamepad",
        "embedded" => "microchip",
        "security" => "shield",
        "programming" => "code",
        "frontend" => "layout",
        "database" => "database",
        "cloud" => "cloud",
        "design" => "pen-tool",
        "tools" => "wrench",
        "soft_skills" => "users",
        "computer_science" => "laptop",
        "engineering" => "settings",
        "mathematics" => "sigma",
        "business" => "briefcase",
        "academic" => "book-open",
        "competition" => "trophy",
        "hackathon" => "zap",
        "award" => "award",
        "publication" => "file-text",
        "music" => "music",
        "sports" => "activity",
        "art" => "palette",
        "reading" => "book",
        "travel" => "map",
        "photography" => "camera",
        "technology" => "cpu",
        "career" => "briefcase",
        "personal" => "user",
        _ => return None,
    };
    Some(icon)
}

/// Icon for a category, or the generic `folder` icon.
pub fn category_icon_or_default(category: Option<&str>) -> &'static str {
    category.and_then(category_icon).unwrap_or("folder")
}

// =============================================================================
// KEYWORD ICONS
// =============================================================================

/// Ordered keyword → icon pairs. Earlier pairs win.
const KEYWORD_ICONS: &[(&str, &str)] = &[
    ("hackathon", "zap"),
    ("scholarship", "graduation-cap"),
    ("bachelor", "graduation-cap"),
    ("master", "graduation-cap"),
    ("phd", "graduation-cap"),
    ("diploma", "graduation-cap"),
    ("award", "award"),
    ("prize", "trophy"),
    ("champion", "trophy"),
    ("api", "server"),
    ("server", "server"),
    ("backend", "server"),
    ("website", "globe"),
    ("web", "globe"),
    ("android", "smartphone"),
    ("ios", "smartphone"),
    ("mobile", "smartphone"),
    ("game", "gamepad"),
    ("machine learning", "cpu"),
    ("neural", "cpu"),
    ("data", "bar-chart"),
    ("analytics", "bar-chart"),
    ("security", "shield"),
    ("cloud", "cloud"),
    ("kubernetes", "cloud"),
    ("docker", "box"),
    ("database", "database"),
    ("sql", "database"),
    ("design", "pen-tool"),
    ("teach", "users"),
    ("mentor", "users"),
    ("tutor", "users"),
    ("community", "users"),
    ("music", "music"),
    ("guitar", "music"),
    ("piano", "music"),
    ("photo", "camera"),
    ("travel", "map"),
    ("book", "book"),
    ("course", "book"),
];

/// First icon whose keyword occurs in `text` (case-insensitive substring).
pub fn keyword_icon(text: &str) -> Option<&'static str> {
    let lowered = text.to_lowercase();
    KEYWORD_ICONS
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, icon)| *icon)
}

// =============================================================================
// RECOGNITION
// =============================================================================

pub fn recognition_color(level: RecognitionLevel) -> &'static str {
    match level {
        RecognitionLevel::Local => "#10B981",
        RecognitionLevel::Regional => "#3B82F6",
        RecognitionLevel::National => "#DC2626",
        RecognitionLevel::International => "#7C3AED",
    }
}

/// Recognition color, or neutral gray when no level is recorded.
pub fn recognition_color_or_neutral(level: Option<RecognitionLevel>) -> &'static str {
    level
        .map(recognition_color)
        .unwrap_or(defaults::NEUTRAL_COLOR)
}

/// Pale tint of the recognition color, used as a background.
pub fn recognition_light_color(level: Option<RecognitionLevel>) -> &'static str {
    match level {
        Some(RecognitionLevel::Local) => "#D1FAE5",
        Some(RecognitionLevel::Regional) => "#DBEAFE",
        Some(RecognitionLevel::National) => "#FEE2E2",
        Some(RecognitionLevel::International) => "#EDE9FE",
        None => "#F3F4F6",
    }
}

pub fn recognition_css_class(level: Option<RecognitionLevel>) -> &'static str {
    match level {
        Some(RecognitionLevel::Local) => "recognition-local",
        Some(RecognitionLevel::Regional) => "recognition-regional",
        Some(RecognitionLevel::National) => "recognition-national",
        Some(RecognitionLevel::International) => "recognition-international",
        None => "recognition-none",
    }
}

// =============================================================================
// COMPLEXITY / LEVEL / PROGRESS
// =============================================================================

pub fn complexity_label(complexity: Complexity) -> &'static str {
    match complexity {
        Complexity::Beginner => "Beginner",
        Complexity::Intermediate => "Intermediate",
        Complexity::Advanced => "Advanced",
        Complexity::Expert => "Expert",
    }
}

pub fn complexity_color(complexity: Complexity) -> &'static str {
    match complexity {
        Complexity::Beginner => "#10B981",
        Complexity::Intermediate => "#3B82F6",
        Complexity::Advanced => "#F59E0B",
        Complexity::Expert => "#DC2626",
    }
}

/// Proficiency label for a 0–100 skill level.
pub fn level_label(level: i32) -> &'static str {
    match level {
        l if l >= defaults::EXPERT_SKILL_LEVEL => "Expert",
        l if l >= 75 => "Advanced",
        l if l >= 50 => "Intermediate",
        _ => "Beginner",
    }
}

/// Color for a 0–100 skill level. `None` for a non-positive level.
pub fn level_color(level: i32) -> Option<&'static str> {
    let color = match level {
        l if l <= 0 => return None,
        l if l >= defaults::EXPERT_SKILL_LEVEL => "#7C3AED",
        l if l >= 75 => "#3B82F6",
        l if l >= 50 => "#10B981",
        l if l >= 25 => "#F59E0B",
        _ => defaults::NEUTRAL_COLOR,
    };
    Some(color)
}

/// Color for a 0–100 progress percentage. `None` before any progress.
pub fn progress_color(progress: i32) -> Option<&'static str> {
    let color = match progress {
        p if p <= 0 => return None,
        p if p >= 75 => "#3B82F6",
        p if p >= 50 => "#F59E0B",
        _ => "#F97316",
    };
    Some(color)
}

/// Color for a 0.0–1.0 relevance score. `None` for low or non-finite scores.
pub fn relevance_color(score: f64) -> Option<&'static str> {
    if !score.is_finite() {
        return None;
    }
    let color = match score {
        s if s >= 0.8 => defaults::SUCCESS_COLOR,
        s if s >= 0.5 => "#3B82F6",
        s if s >= 0.2 => "#F59E0B",
        _ => return None,
    };
    Some(color)
}

// =============================================================================
// PROJECT STATUS
// =============================================================================

pub fn status_color(status: ProjectStatus) -> &'static str {
    match status {
        ProjectStatus::Planning => "#9CA3AF",
        ProjectStatus::InProgress => "#F59E0B",
        ProjectStatus::Completed => "#3B82F6",
        ProjectStatus::Production => defaults::SUCCESS_COLOR,
        ProjectStatus::Maintenance => "#14B8A6",
        ProjectStatus::Archived => defaults::NEUTRAL_COLOR,
    }
}

pub fn status_css_class(status: ProjectStatus) -> &'static str {
    match status {
        ProjectStatus::Planning => "status-planning",
        ProjectStatus::InProgress => "status-in-progress",
        ProjectStatus::Completed => "status-completed",
        ProjectStatus::Production => "status-production",
        ProjectStatus::Maintenance => "status-maintenance",
        ProjectStatus::Archived => "status-archived",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_lookup_is_case_insensitive() {
        assert_eq!(category_color("Web"), Some("#3B82F6"));
        assert_eq!(category_color("  MOBILE "), Some("#8B5CF6"));
        assert_eq!(category_color("data science"), category_color("DATA_SCIENCE"));
        assert_eq!(category_icon("Machine-Learning"), Some("cpu"));
    }

    #[test]
    fn test_unknown_category_uses_default_branch() {
        assert_eq!(category_color("quantum basket weaving"), None);
        assert_eq!(category_color_or_default(Some("unknown")), "#3B82F6");
        assert_eq!(category_color_or_default(None), "#3B82F6");
        assert_eq!(category_icon_or_default(Some("unknown")), "folder");
    }

    #[test]
    fn test_keyword_icon_first_hit_wins() {
        // "hackathon" precedes "web" in the table
        assert_eq!(keyword_icon("Web Hackathon 2021"), Some("zap"));
        assert_eq!(keyword_icon("REST API for inventory"), Some("server"));
        assert_eq!(keyword_icon("Personal Website"), Some("globe"));
        assert_eq!(keyword_icon("Untitled"), None);
    }

    #[test]
    fn test_recognition_tables() {
        assert_eq!(recognition_color(RecognitionLevel::National), "#DC2626");
        assert_eq!(recognition_color_or_neutral(None), "#6B7280");
        assert_eq!(
            recognition_css_class(Some(RecognitionLevel::International)),
            "recognition-international"
        );
        assert_eq!(recognition_light_color(None), "#F3F4F6");
    }

    #[test]
    fn test_level_thresholds() {
        assert_eq!(level_label(95), "Expert");
        assert_eq!(level_label(90), "Expert");
        assert_eq!(level_label(80), "Advanced");
        assert_eq!(level_label(10), "Beginner");
        assert_eq!(level_color(0), None);
        assert_eq!(level_color(92), Some("#7C3AED"));
        assert_eq!(level_color(10), Some("#6B7280"));
    }

    #[test]
    fn test_relevance_color_thresholds() {
        assert_eq!(relevance_color(0.9), Some("#10B981"));
        assert_eq!(relevance_color(0.5), Some("#3B82F6"));
        assert_eq!(relevance_color(0.1), None);
        assert_eq!(relevance_color(f64::NAN), None);
    }

    #[test]
    fn test_status_tables_cover_every_status() {
        for status in ProjectStatus::ALL {
            assert!(status_color(*status).starts_with('#'));
            assert!(status_css_class(*status).starts_with("status-"));
        }
    }
}
