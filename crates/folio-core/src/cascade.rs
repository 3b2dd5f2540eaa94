//! Ordered fallback cascades and the per-kind default bundles built on them.
//!
//! A [`Cascade`] is a list of named steps evaluated in order; the first step
//! that yields a non-blank value answers, otherwise the terminal fallback is
//! used. [`Resolved::step`] records which step answered.

use crate::defaults;
use crate::models::*;
use crate::presentation::{
    category_color, category_icon, complexity_color, keyword_icon, level_color, progress_color,
    recognition_color, recognition_light_color, relevance_color,
};

/// Step name reported when no rule produced a value.
pub const FALLBACK_STEP: &str = "fallback";

/// A value-producing step of a cascade.
pub type Step<C> = fn(&C) -> Option<String>;

/// Value chosen by a cascade and the step that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub value: String,
    pub step: &'static str,
}

/// Ordered `(rule, value-producer)` steps with a terminal fallback.
pub struct Cascade<C> {
    steps: Vec<(&'static str, Step<C>)>,
    fallback: &'static str,
}

impl<C> Cascade<C> {
    pub fn new(fallback: &'static str) -> Self {
        Self {
            steps: Vec::new(),
            fallback,
        }
    }

    /// Append a step. Steps are evaluated in insertion order.
    pub fn rule(mut self, name: &'static str, step: Step<C>) -> Self {
        self.steps.push((name, step));
        self
    }

    pub fn resolve(&self, ctx: &C) -> Resolved {
        for (name, step) in &self.steps {
            if let Some(value) = step(ctx).filter(|v| !v.trim().is_empty()) {
                return Resolved { value, step: *name };
            }
        }
        Resolved {
            value: self.fallback.to_string(),
            step: FALLBACK_STEP,
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

fn color_of(category: Option<&str>) -> Option<String> {
    category.and_then(category_color).map(str::to_string)
}

fn icon_of(category: Option<&str>) -> Option<String> {
    category.and_then(category_icon).map(str::to_string)
}

fn keyword_of(text: &str) -> Option<String> {
    keyword_icon(text).map(str::to_string)
}

// =============================================================================
// PER-KIND CASCADES
// =============================================================================

fn project_color() -> Cascade<Project> {
    Cascade::<Project>::new(defaults::PRIMARY_COLOR)
        .rule("category", |p| color_of(p.category.as_deref()))
        .rule("complexity", |p| {
            p.complexity.map(|c| complexity_color(c).to_string())
        })
}

fn project_icon() -> Cascade<Project> {
    Cascade::<Project>::new("folder")
        .rule("category", |p| icon_of(p.category.as_deref()))
        .rule("keyword", |p| keyword_of(&p.title))
}

fn skill_color() -> Cascade<Skill> {
    Cascade::<Skill>::new(defaults::PRIMARY_COLOR)
        .rule("category", |s| color_of(s.category.as_deref()))
        .rule("level", |s| level_color(s.level).map(str::to_string))
}

fn skill_icon() -> Cascade<Skill> {
    Cascade::<Skill>::new("code")
        .rule("category", |s| icon_of(s.category.as_deref()))
        .rule("keyword", |s| keyword_of(&s.name))
}

fn achievement_color() -> Cascade<Achievement> {
    Cascade::<Achievement>::new(defaults::NEUTRAL_COLOR)
        .rule("recognition", |a| {
            a.recognition_level
                .map(|level| recognition_color(level).to_string())
        })
        .rule("category", |a| color_of(a.category.as_deref()))
}

fn achievement_icon() -> Cascade<Achievement> {
    Cascade::<Achievement>::new("award")
        .rule("category", |a| icon_of(a.category.as_deref()))
        .rule("keyword", |a| keyword_of(&a.title))
}

fn education_color() -> Cascade<Education> {
    Cascade::<Education>::new(defaults::PRIMARY_COLOR)
        .rule("current", |e| {
            e.current.then(|| defaults::SUCCESS_COLOR.to_string())
        })
        .rule("category", |e| color_of(e.field_of_study.as_deref()))
}

fn education_icon() -> Cascade<Education> {
    Cascade::<Education>::new("graduation-cap")
        .rule("category", |e| icon_of(e.field_of_study.as_deref()))
        .rule("keyword", |e| keyword_of(&e.degree))
}

fn certificate_color() -> Cascade<Certificate> {
    Cascade::<Certificate>::new(defaults::PRIMARY_COLOR)
        .rule("verified", |c| {
            c.verified.then(|| defaults::SUCCESS_COLOR.to_string())
        })
        .rule("category", |c| color_of(c.category.as_deref()))
}

fn certificate_icon() -> Cascade<Certificate> {
    Cascade::<Certificate>::new("certificate")
        .rule("category", |c| icon_of(c.category.as_deref()))
        .rule("keyword", |c| keyword_of(&c.name))
}

fn hobby_color() -> Cascade<Hobby> {
    Cascade::<Hobby>::new(defaults::PRIMARY_COLOR).rule("category", |h| color_of(h.category.as_deref()))
}

fn hobby_icon() -> Cascade<Hobby> {
    Cascade::<Hobby>::new("heart")
        .rule("category", |h| icon_of(h.category.as_deref()))
        .rule("keyword", |h| keyword_of(&h.name))
}

fn interest_color() -> Cascade<Interest> {
    Cascade::<Interest>::new(defaults::NEUTRAL_COLOR)
        .rule("relevance", |i| {
            i.relevance_score
                .and_then(relevance_color)
                .map(str::to_string)
        })
        .rule("category", |i| color_of(i.category.as_deref()))
}

fn interest_icon() -> Cascade<Interest> {
    Cascade::<Interest>::new("star")
        .rule("category", |i| icon_of(i.category.as_deref()))
        .rule("keyword", |i| keyword_of(&i.name))
}

fn volunteer_color() -> Cascade<Volunteer> {
    Cascade::<Volunteer>::new(defaults::SUCCESS_COLOR).rule("category", |_| color_of(Some("volunteer")))
}

fn volunteer_icon() -> Cascade<Volunteer> {
    Cascade::<Volunteer>::new("hand-heart").rule("keyword", |v| keyword_of(&v.role))
}

fn learning_color() -> Cascade<LearningProgress> {
    Cascade::<LearningProgress>::new(defaults::PRIMARY_COLOR)
        .rule("completion", |l| {
            l.completed.then(|| defaults::SUCCESS_COLOR.to_string())
        })
        .rule("progress", |l| progress_color(l.progress).map(str::to_string))
        .rule("category", |l| color_of(l.category.as_deref()))
}

fn learning_icon() -> Cascade<LearningProgress> {
    Cascade::<LearningProgress>::new("book")
        .rule("category", |l| icon_of(l.category.as_deref()))
        .rule("keyword", |l| keyword_of(&l.title))
}

fn goal_color() -> Cascade<FutureGoal> {
    Cascade::<FutureGoal>::new(defaults::PRIMARY_COLOR).rule("category", |g| color_of(g.category.as_deref()))
}

fn goal_icon() -> Cascade<FutureGoal> {
    Cascade::<FutureGoal>::new("target")
        .rule("category", |g| icon_of(g.category.as_deref()))
        .rule("keyword", |g| keyword_of(&g.title))
}

/// Default color and icon of a record with the step that produced each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultResolution {
    pub color: Resolved,
    pub icon: Resolved,
    pub secondary_color: String,
}

impl DefaultResolution {
    pub fn into_bundle(self) -> DefaultBundle {
        DefaultBundle {
            color: self.color.value,
            secondary_color: self.secondary_color,
            icon: self.icon.value,
        }
    }
}

/// Run the type-specific color and icon cascades for `record`.
pub fn resolve_defaults(record: &Record) -> DefaultResolution {
    let (color, icon) = match record {
        Record::Project(r) => (project_color().resolve(r), project_icon().resolve(r)),
        Record::Skill(r) => (skill_color().resolve(r), skill_icon().resolve(r)),
        Record::Achievement(r) => (achievement_color().resolve(r), achievement_icon().resolve(r)),
        Record::Education(r) => (education_color().resolve(r), education_icon().resolve(r)),
        Record::Certificate(r) => (certificate_color().resolve(r), certificate_icon().resolve(r)),
        Record::Hobby(r) => (hobby_color().resolve(r), hobby_icon().resolve(r)),
        Record::Interest(r) => (interest_color().resolve(r), interest_icon().resolve(r)),
        Record::Volunteer(r) => (volunteer_color().resolve(r), volunteer_icon().resolve(r)),
        Record::LearningProgress(r) => (learning_color().resolve(r), learning_icon().resolve(r)),
        Record::FutureGoal(r) => (goal_color().resolve(r), goal_icon().resolve(r)),
    };
    let secondary_color = match record {
        Record::Achievement(a) => recognition_light_color(a.recognition_level).to_string(),
        _ => defaults::SECONDARY_COLOR.to_string(),
    };
    DefaultResolution {
        color,
        icon,
        secondary_color,
    }
}

impl DefaultBundle {
    /// Computed defaults for a record with no metadata.
    pub fn for_record(record: &Record) -> Self {
        resolve_defaults(record).into_bundle()
    }
}
