//! Aggregate statistics over collections of records.
//!
//! Every function is total: empty input yields zeros or `None`, never a
//! panic.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};

use folio_core::defaults::{MAX_LEVEL, STUDY_YEAR_MAX, STUDY_YEAR_MIN, UNCATEGORIZED};
use folio_core::presentation::{
    category_color_or_default, category_icon_or_default, normalize_category,
};
use folio_core::{
    AggregateResult, CategoryBucket, DevelopmentExperience, Project, ProjectCategory,
    ProjectStatus, SuccessRate,
};

/// `100 * part / total`, or `0.0` when `total` is not positive.
pub fn percentage(part: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    100.0 * part as f64 / total as f64
}

/// Most frequent value; ties go to the value seen first.
pub fn most_frequent<T, I>(values: I) -> Option<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    // value -> (count, first index)
    let mut counts: HashMap<T, (usize, usize)> = HashMap::new();
    for (index, value) in values.into_iter().enumerate() {
        counts.entry(value).or_insert((0, index)).0 += 1;
    }
    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(value, _)| value)
}

/// Grouping key for a category value; missing or blank is `uncategorized`.
pub fn category_key(category: Option<&str>) -> String {
    match category.map(normalize_category) {
        Some(key) if !key.is_empty() => key,
        _ => UNCATEGORIZED.to_string(),
    }
}

/// Count records per category and derive each bucket's share.
///
/// Buckets are ordered by count descending, then by first occurrence.
pub fn category_distribution<'a, I>(categories: I) -> AggregateResult
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut buckets: Vec<(String, i64)> = Vec::new();
    for category in categories {
        let key = category_key(category);
        match buckets.iter_mut().find(|(k, _)| *k == key) {
            Some((_, count)) => *count += 1,
            None => buckets.push((key, 1)),
        }
    }

    let total: i64 = buckets.iter().map(|(_, count)| count).sum();
    // stable: equal counts keep first-occurrence order
    buckets.sort_by(|(_, a), (_, b)| b.cmp(a));

    AggregateResult {
        total,
        buckets: buckets
            .into_iter()
            .map(|(category, count)| CategoryBucket {
                percentage: percentage(count, total),
                color: category_color_or_default(Some(&category)).to_string(),
                icon: category_icon_or_default(Some(&category)).to_string(),
                category,
                count,
            })
            .collect(),
    }
}

/// Share of deployed projects among `statuses`.
pub fn success_rate<I>(statuses: I) -> SuccessRate
where
    I: IntoIterator<Item = ProjectStatus>,
{
    let (deployed, total) = statuses
        .into_iter()
        .fold((0i64, 0i64), |(deployed, total), status| {
            (deployed + i64::from(status.is_deployed()), total + 1)
        });
    success_rate_from_counts(deployed, total)
}

pub fn success_rate_from_counts(deployed: i64, total: i64) -> SuccessRate {
    SuccessRate {
        deployed,
        total,
        success_rate: percentage(deployed, total),
    }
}

/// Inclusive span of active years, counting through `current_year`.
///
/// `0` when there is no first year.
pub fn years_active(first_year: Option<i32>, latest_year: Option<i32>, current_year: i32) -> i32 {
    let Some(first) = first_year else {
        return 0;
    };
    let end = latest_year.map_or(current_year, |latest| latest.max(current_year));
    (end - first + 1).max(0)
}

/// `100 * distinct present categories / total_possible`, capped at 100.
///
/// The `uncategorized` bucket does not count as a category.
pub fn diversity_score(distribution: &AggregateResult, total_possible: usize) -> f64 {
    let present = distribution
        .buckets
        .iter()
        .filter(|b| b.count > 0 && b.category != UNCATEGORIZED)
        .count();
    bounded_share(present, total_possible)
}

/// Diversity against a closed enumeration: only buckets that name a member
/// of `E` count, each member once.
pub fn diversity_over<E>(distribution: &AggregateResult, all: &[E]) -> f64
where
    E: FromStr + Eq + Hash,
{
    let present: HashSet<E> = distribution
        .buckets
        .iter()
        .filter(|b| b.count > 0)
        .filter_map(|b| b.category.parse().ok())
        .collect();
    bounded_share(present.len(), all.len())
}

fn bounded_share(present: usize, total_possible: usize) -> f64 {
    if total_possible == 0 {
        return 0.0;
    }
    (100.0 * present as f64 / total_possible as f64).min(MAX_LEVEL as f64)
}

/// Year of study for a program started on `start`, clamped to `[1, 6]`.
pub fn current_year_of_study(start: NaiveDate, today: NaiveDate) -> i32 {
    let mut completed = today.year() - start.year();
    if (today.month(), today.day()) < (start.month(), start.day()) {
        completed -= 1;
    }
    (completed + 1).clamp(STUDY_YEAR_MIN, STUDY_YEAR_MAX)
}

/// Summary statistics over a person's projects.
pub fn development_experience(projects: &[Project], current_year: i32) -> DevelopmentExperience {
    let rate = success_rate(projects.iter().map(|p| p.status));
    let years: Vec<i32> = projects.iter().filter_map(Project::dated_year).collect();
    let first_year = years.iter().copied().min();
    let latest_year = years.iter().copied().max();

    let most_used_technology = most_frequent(
        projects
            .iter()
            .flat_map(|p| p.technologies.iter())
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string),
    );

    let categories = category_distribution(projects.iter().map(|p| p.category.as_deref()));
    let primary_category = most_frequent(
        projects
            .iter()
            .filter_map(|p| p.category.as_deref())
            .map(normalize_category)
            .filter(|c| !c.is_empty()),
    );

    DevelopmentExperience {
        total_projects: rate.total,
        deployed_projects: rate.deployed,
        success_rate: rate.success_rate,
        first_year,
        latest_year,
        years_active: years_active(first_year, latest_year, current_year),
        most_used_technology,
        primary_category,
        category_diversity: diversity_over(&categories, ProjectCategory::ALL),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::SkillCategory;

    #[test]
    fn test_percentage_zero_total() {
        assert_eq!(percentage(5, 0), 0.0);
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(3, -1), 0.0);
    }

    #[test]
    fn test_percentage_monotonic_in_part() {
        let total = 7;
        let values: Vec<f64> = (0..=total).map(|part| percentage(part, total)).collect();
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(values[total as usize], 100.0);
    }

    #[test]
    fn test_most_frequent() {
        assert_eq!(most_frequent(Vec::<&str>::new()), None);
        assert_eq!(most_frequent(vec!["a", "a", "b"]), Some("a"));
        // tie: first seen wins
        assert_eq!(most_frequent(vec!["b", "a", "a", "b"]), Some("b"));
        assert_eq!(most_frequent(vec![3, 1, 2]), Some(3));
    }

    #[test]
    fn test_category_distribution_scenario() {
        let result = category_distribution(vec![Some("web"), Some("web"), Some("mobile")]);
        assert_eq!(result.total, 3);
        assert_eq!(result.buckets[0].category, "web");
        assert_eq!(result.buckets[0].count, 2);
        assert!((result.buckets[0].percentage - 66.666_666).abs() < 1e-3);
        assert_eq!(result.buckets[1].category, "mobile");
        assert!((result.buckets[1].percentage - 33.333_333).abs() < 1e-3);
    }

    #[test]
    fn test_category_buckets_carry_chart_styling() {
        let result = category_distribution(vec![Some("Mobile"), None]);
        let mobile = result.get("mobile").expect("mobile bucket");
        assert_eq!(mobile.color, "#8B5CF6");
        assert_eq!(mobile.icon, "smartphone");
        let other = result.get("uncategorized").expect("uncategorized bucket");
        assert_eq!(other.color, "#3B82F6");
        assert_eq!(other.icon, "folder");
    }

    #[test]
    fn test_category_distribution_sums() {
        let result = category_distribution(vec![
            Some("Web"),
            None,
            Some("  "),
            Some("backend"),
            Some("web"),
            Some("devops"),
            Some("ml"),
        ]);
        let count_sum: i64 = result.buckets.iter().map(|b| b.count).sum();
        let pct_sum: f64 = result.buckets.iter().map(|b| b.percentage).sum();
        assert_eq!(count_sum, result.total);
        assert!((pct_sum - 100.0).abs() < 1e-6);
        assert_eq!(result.get("uncategorized").map(|b| b.count), Some(2));
        assert_eq!(result.get("web").map(|b| b.count), Some(2));
        // ties ordered by first occurrence
        assert_eq!(result.buckets[0].category, "web");
        assert_eq!(result.buckets[1].category, "uncategorized");
        assert_eq!(result.buckets[2].category, "backend");
    }

    #[test]
    fn test_category_distribution_empty() {
        let result = category_distribution(Vec::<Option<&str>>::new());
        assert_eq!(result.total, 0);
        assert!(result.buckets.is_empty());
    }

    #[test]
    fn test_success_rate() {
        let rate = success_rate(vec![
            ProjectStatus::Production,
            ProjectStatus::Maintenance,
            ProjectStatus::Completed,
            ProjectStatus::Planning,
        ]);
        assert_eq!(rate.deployed, 2);
        assert_eq!(rate.total, 4);
        assert_eq!(rate.success_rate, 50.0);
        assert_eq!(success_rate(Vec::new()).success_rate, 0.0);
    }

    #[test]
    fn test_years_active() {
        assert_eq!(years_active(Some(2019), Some(2022), 2024), 6);
        assert_eq!(years_active(Some(2019), Some(2026), 2024), 8);
        assert_eq!(years_active(Some(2019), None, 2024), 6);
        assert_eq!(years_active(None, Some(2022), 2024), 0);
        assert_eq!(years_active(Some(2030), None, 2024), 0);
    }

    #[test]
    fn test_diversity_score() {
        let dist = category_distribution(vec![Some("web"), None, Some("mobile")]);
        assert!((diversity_score(&dist, 10) - 20.0).abs() < 1e-9);
        assert_eq!(diversity_score(&dist, 0), 0.0);
        assert_eq!(diversity_score(&dist, 1), 100.0);
    }

    #[test]
    fn test_diversity_over_closed_enumeration() {
        let dist = category_distribution(vec![
            Some("frontend"),
            Some("Frontend"),
            Some("basket weaving"),
            Some("soft skills"),
        ]);
        let expected = 100.0 * 2.0 / SkillCategory::ALL.len() as f64;
        assert!((diversity_over(&dist, SkillCategory::ALL) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_current_year_of_study_bounds() {
        let start = NaiveDate::from_ymd_opt(2022, 9, 1).unwrap();
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
        assert_eq!(current_year_of_study(start, d(2022, 9, 1)), 1);
        assert_eq!(current_year_of_study(start, d(2023, 8, 31)), 1);
        assert_eq!(current_year_of_study(start, d(2023, 9, 1)), 2);
        assert_eq!(current_year_of_study(start, d(2040, 1, 1)), 6);
        assert_eq!(current_year_of_study(start, d(2010, 1, 1)), 1);
    }

    #[test]
    fn test_development_experience() {
        let projects = vec![
            Project {
                category: Some("web".into()),
                status: ProjectStatus::Production,
                technologies: vec!["rust".into(), "postgres".into()],
                year: Some(2019),
                ..Project::new(1, 1, "Shop")
            },
            Project {
                category: Some("web".into()),
                technologies: vec!["rust".into()],
                year: Some(2022),
                ..Project::new(2, 1, "Blog")
            },
            Project {
                category: Some("mobile".into()),
                status: ProjectStatus::Maintenance,
                technologies: vec!["kotlin".into()],
                ..Project::new(3, 1, "App")
            },
        ];
        let exp = development_experience(&projects, 2024);
        assert_eq!(exp.total_projects, 3);
        assert_eq!(exp.deployed_projects, 2);
        assert_eq!(exp.first_year, Some(2019));
        assert_eq!(exp.latest_year, Some(2022));
        assert_eq!(exp.years_active, 6);
        assert_eq!(exp.most_used_technology.as_deref(), Some("rust"));
        assert_eq!(exp.primary_category.as_deref(), Some("web"));
        assert!((exp.category_diversity - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_development_experience_empty() {
        let exp = development_experience(&[], 2024);
        assert_eq!(exp.total_projects, 0);
        assert_eq!(exp.success_rate, 0.0);
        assert_eq!(exp.years_active, 0);
        assert!(exp.most_used_technology.is_none());
        assert_eq!(exp.category_diversity, 0.0);
    }
}
