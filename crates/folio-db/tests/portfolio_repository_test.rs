//! Integration tests for the PostgreSQL record and metadata repositories.

use folio_db::test_fixtures::TestPortfolio;
use folio_db::{
    EntityKind, EntityRef, MetadataRepository, ProjectStatus, RecognitionLevel, Record,
    RecordPredicate, RecordRepository,
};

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_find_all_by_owner_maps_projects() {
    let portfolio = TestPortfolio::new().await;
    portfolio
        .insert_project("Shop", "web", "production", 2023)
        .await;
    portfolio
        .insert_project("Blog", "web", "NOT-A-STATUS", 2021)
        .await;

    let records = portfolio
        .db
        .records
        .find_all_by_owner(EntityKind::Project, portfolio.owner_id)
        .await
        .expect("query should succeed");

    assert_eq!(records.len(), 2);
    match &records[0] {
        Record::Project(p) => {
            assert_eq!(p.title, "Shop");
            assert_eq!(p.status, ProjectStatus::Production);
            assert_eq!(p.technologies, vec!["rust".to_string()]);
        }
        other => panic!("expected project, got {:?}", other.kind()),
    }
    match &records[1] {
        Record::Project(p) => assert_eq!(p.status, ProjectStatus::Planning),
        other => panic!("expected project, got {:?}", other.kind()),
    }

    portfolio.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_count_by_owner_predicates() {
    let portfolio = TestPortfolio::new().await;
    portfolio
        .insert_project("Shop", "web", "PRODUCTION", 2023)
        .await;
    portfolio
        .insert_project("Tool", "backend", "maintenance", 2022)
        .await;
    portfolio
        .insert_project("Idea", "mobile", "PLANNING", 2024)
        .await;
    portfolio.insert_skill("Rust", "programming", 95).await;

    let records = &portfolio.db.records;
    let deployed = records
        .count_by_owner(EntityKind::Project, portfolio.owner_id, &RecordPredicate::deployed())
        .await
        .unwrap();
    assert_eq!(deployed, 2);

    let all = records
        .count_by_owner(EntityKind::Project, portfolio.owner_id, &RecordPredicate::All)
        .await
        .unwrap();
    assert_eq!(all, 3);

    let experts = records
        .count_by_owner(
            EntityKind::Skill,
            portfolio.owner_id,
            &RecordPredicate::SkillLevelAtLeast(90),
        )
        .await
        .unwrap();
    assert_eq!(experts, 1);

    // kind-specific predicate on another kind counts nothing
    let mismatched = records
        .count_by_owner(EntityKind::Skill, portfolio.owner_id, &RecordPredicate::deployed())
        .await
        .unwrap();
    assert_eq!(mismatched, 0);

    portfolio.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_metadata_lookup_by_kind_and_id() {
    let portfolio = TestPortfolio::new().await;
    let achievement_id = portfolio
        .insert_achievement("Olympiad", Some("national"), "2021")
        .await;
    let skill_id = portfolio.insert_skill("Rust", "programming", 95).await;
    portfolio
        .insert_metadata(EntityKind::Skill, skill_id, Some("#FF0000"), true)
        .await;

    let metadata = &portfolio.db.metadata;
    let hit = metadata
        .find(EntityRef::new(EntityKind::Skill, skill_id))
        .await
        .unwrap()
        .expect("metadata row should exist");
    assert_eq!(hit.primary_color.as_deref(), Some("#FF0000"));
    assert!(hit.featured);

    let miss = metadata
        .find(EntityRef::new(EntityKind::Achievement, achievement_id))
        .await
        .unwrap();
    assert!(miss.is_none());

    let record = portfolio
        .db
        .records
        .find_by_id(EntityRef::new(EntityKind::Achievement, achievement_id))
        .await
        .unwrap();
    match record {
        Some(Record::Achievement(a)) => {
            assert_eq!(a.recognition_level, Some(RecognitionLevel::National));
            assert_eq!(a.year.as_deref(), Some("2021"));
        }
        _ => panic!("expected achievement"),
    }

    let batch = metadata
        .find_many(EntityKind::Skill, &[skill_id, skill_id + 1_000_000])
        .await
        .unwrap();
    assert_eq!(batch.len(), 1);

    portfolio.cleanup().await;
}
