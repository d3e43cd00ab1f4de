use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::access::AccessTier;
use crate::model::ids::{CourseId, LessonId, ResourceId};

/// Grouping used by the training hub filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    GettingStarted,
    DigitalAccess,
    PhysicalAccess,
    InclusiveCommunication,
    PlanningAndPolicy,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::GettingStarted,
        Category::DigitalAccess,
        Category::PhysicalAccess,
        Category::InclusiveCommunication,
        Category::PlanningAndPolicy,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::GettingStarted => "getting-started",
            Category::DigitalAccess => "digital-access",
            Category::PhysicalAccess => "physical-access",
            Category::InclusiveCommunication => "inclusive-communication",
            Category::PlanningAndPolicy => "planning-and-policy",
        }
    }

    /// Parses the kebab-case slug used in URLs.
    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == slug.trim())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of standalone resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Guide,
    Checklist,
    Template,
    Video,
}

/// A single lesson inside a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: LessonId,
    pub title: String,
    pub duration_minutes: u32,
    pub access_tier: AccessTier,
    /// Preview lessons open regardless of tier.
    #[serde(default)]
    pub is_preview: bool,
}

/// A course: an ordered sequence of lessons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: CourseId,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub access_tier: AccessTier,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    pub lessons: Vec<Lesson>,
}

impl Course {
    #[must_use]
    pub fn lesson_count(&self) -> usize {
        self.lessons.len()
    }

    #[must_use]
    pub fn total_minutes(&self) -> u32 {
        self.lessons.iter().map(|l| l.duration_minutes).sum()
    }

    #[must_use]
    pub fn lesson(&self, lesson_id: &LessonId) -> Option<&Lesson> {
        self.lessons.iter().find(|l| &l.id == lesson_id)
    }

    /// Zero-based position of a lesson in the course order.
    #[must_use]
    pub fn lesson_position(&self, lesson_id: &LessonId) -> Option<usize> {
        self.lessons.iter().position(|l| &l.id == lesson_id)
    }

    /// The lesson that follows `lesson_id`, if any.
    #[must_use]
    pub fn next_lesson(&self, lesson_id: &LessonId) -> Option<&Lesson> {
        let pos = self.lesson_position(lesson_id)?;
        self.lessons.get(pos + 1)
    }

    #[must_use]
    pub fn first_lesson(&self) -> Option<&Lesson> {
        self.lessons.first()
    }
}

/// Standalone content outside any course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: ResourceId,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub kind: ResourceKind,
    pub access_tier: AccessTier,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub featured: bool,
}
