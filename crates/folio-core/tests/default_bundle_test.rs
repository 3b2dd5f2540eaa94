//! Tests for computed presentation defaults across every entity kind.
//!
//! Verifies that a record with no metadata always resolves to a complete
//! default bundle and that the documented cascade order holds per kind.

use folio_core::{
    resolve_defaults, Achievement, DefaultBundle, Education, EntityKind, FutureGoal, Interest,
    LearningProgress, Record, RecognitionLevel, Skill,
};

#[test]
fn test_national_achievement_without_metadata_is_red() {
    let record: Record = Achievement {
        recognition_level: Some(RecognitionLevel::National),
        ..Achievement::new(7, 1, "National coding olympiad")
    }
    .into();

    let bundle = DefaultBundle::for_record(&record);
    assert_eq!(bundle.color, "#DC2626");
}

#[test]
fn test_skill_level_threshold_after_category() {
    let categorized: Record = Skill {
        category: Some("database".into()),
        ..Skill::new(1, 1, "PostgreSQL", 92)
    }
    .into();
    let resolution = resolve_defaults(&categorized);
    assert_eq!(resolution.color.step, "category");
    assert_eq!(resolution.icon.value, "database");

    let uncategorized: Record = Skill::new(2, 1, "Zig", 92).into();
    let resolution = resolve_defaults(&uncategorized);
    assert_eq!(resolution.color.step, "level");
    assert_eq!(resolution.color.value, "#7C3AED");
    assert_eq!(resolution.icon.value, "code");
}

#[test]
fn test_current_education_overrides_field_color() {
    let record: Record = Education {
        current: true,
        field_of_study: Some("Computer Science".into()),
        ..Education::new(1, 1, "ETH Zurich", "MSc Computer Science")
    }
    .into();

    let resolution = resolve_defaults(&record);
    assert_eq!(resolution.color.step, "current");
    assert_eq!(resolution.icon.value, "laptop");
}

#[test]
fn test_interest_relevance_then_category_then_gray() {
    let relevant: Record = Interest {
        relevance_score: Some(0.95),
        category: Some("music".into()),
        ..Interest::new(1, 1, "Jazz")
    }
    .into();
    assert_eq!(resolve_defaults(&relevant).color.step, "relevance");

    let low: Record = Interest {
        relevance_score: Some(0.05),
        category: Some("music".into()),
        ..Interest::new(2, 1, "Opera")
    }
    .into();
    assert_eq!(resolve_defaults(&low).color.step, "category");

    let nothing: Record = Interest::new(3, 1, "Misc").into();
    assert_eq!(DefaultBundle::for_record(&nothing).color, "#6B7280");
}

#[test]
fn test_learning_progress_cascade() {
    let halfway: Record = LearningProgress::new(1, 1, "Distributed systems", 60).into();
    let resolution = resolve_defaults(&halfway);
    assert_eq!(resolution.color.step, "progress");
    assert_eq!(resolution.color.value, "#F59E0B");

    let not_started: Record = LearningProgress::new(2, 1, "Category theory", 0).into();
    assert_eq!(resolve_defaults(&not_started).color.value, "#3B82F6");
}

#[test]
fn test_goal_keyword_icon() {
    let record: Record = FutureGoal::new(1, 1, "Publish a mobile app").into();
    assert_eq!(record.kind(), EntityKind::FutureGoal);
    assert_eq!(DefaultBundle::for_record(&record).icon, "smartphone");
}
