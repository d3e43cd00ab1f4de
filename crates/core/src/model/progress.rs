use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::{CourseId, LessonId, ResourceId};

//
// ─── COURSE STATUS ────────────────────────────────────────────────────────────
//

/// Lifecycle of a course for one learner.
///
/// Only ever advances: `NotStarted` → `InProgress` → `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CourseStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

//
// ─── COURSE PROGRESS ──────────────────────────────────────────────────────────
//

/// Per-course tracking record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseProgress {
    #[serde(default)]
    course_id: CourseId,
    #[serde(default)]
    status: CourseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    completed_lessons: Vec<LessonId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_lesson_id: Option<LessonId>,
}

impl CourseProgress {
    /// A fresh, not-yet-started record.
    #[must_use]
    pub fn new(course_id: CourseId) -> Self {
        Self {
            course_id,
            status: CourseStatus::NotStarted,
            started_at: None,
            completed_at: None,
            completed_lessons: Vec::new(),
            last_lesson_id: None,
        }
    }

    #[must_use]
    pub fn course_id(&self) -> &CourseId {
        &self.course_id
    }

    #[must_use]
    pub fn status(&self) -> CourseStatus {
        self.status
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Completed lesson ids in the order they were first completed.
    #[must_use]
    pub fn completed_lessons(&self) -> &[LessonId] {
        &self.completed_lessons
    }

    #[must_use]
    pub fn last_lesson_id(&self) -> Option<&LessonId> {
        self.last_lesson_id.as_ref()
    }

    #[must_use]
    pub fn is_lesson_completed(&self, lesson_id: &LessonId) -> bool {
        self.completed_lessons.contains(lesson_id)
    }

    /// `round(completed / total * 100)`, capped at 100. Zero when `total` is zero.
    #[must_use]
    pub fn completion_percentage(&self, total_lessons: usize) -> u8 {
        if total_lessons == 0 {
            return 0;
        }
        #[allow(clippy::cast_precision_loss)]
        let ratio = self.completed_lessons.len() as f64 / total_lessons as f64;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let pct = (ratio * 100.0).round().min(100.0) as u8;
        pct
    }

    /// Moves a not-started record into progress, stamping `started_at` once.
    fn begin(&mut self, now: DateTime<Utc>) -> bool {
        if self.status != CourseStatus::NotStarted {
            return false;
        }
        self.status = CourseStatus::InProgress;
        self.started_at = Some(now);
        true
    }

    fn record_lesson(&mut self, lesson_id: LessonId) {
        if !self.completed_lessons.contains(&lesson_id) {
            self.completed_lessons.push(lesson_id.clone());
        }
        self.last_lesson_id = Some(lesson_id);
    }

    fn dedup(&mut self) {
        let mut seen = HashSet::new();
        self.completed_lessons.retain(|id| seen.insert(id.clone()));
    }

    /// Folds a newer record for the same course into this one.
    ///
    /// Status only advances, lessons are unioned, and the newer record's
    /// last lesson and completion time win when present.
    fn absorb(&mut self, newer: Self) {
        self.status = self.status.max(newer.status);
        self.started_at = self.started_at.or(newer.started_at);
        if newer.completed_at.is_some() {
            self.completed_at = newer.completed_at;
        }
        for lesson in newer.completed_lessons {
            if !self.completed_lessons.contains(&lesson) {
                self.completed_lessons.push(lesson);
            }
        }
        if newer.last_lesson_id.is_some() {
            self.last_lesson_id = newer.last_lesson_id;
        }
    }
}

//
// ─── TRAINING PROGRESS ────────────────────────────────────────────────────────
//

/// Everything one browser profile has done in the training hub.
///
/// This is the persisted document. All mutation goes through the methods
/// below so the set and monotonic-status rules cannot be bypassed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingProgress {
    #[serde(default)]
    courses: BTreeMap<CourseId, CourseProgress>,
    #[serde(default)]
    viewed_resources: Vec<ResourceId>,
}

impl TrainingProgress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Repairs a document read from storage.
    ///
    /// Entries without a `courseId` take the map key, and duplicate lesson or
    /// resource ids are collapsed keeping first occurrence.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        for (key, entry) in &mut self.courses {
            if entry.course_id.is_empty() {
                entry.course_id = key.clone();
            }
            entry.dedup();
        }
        let mut seen = HashSet::new();
        self.viewed_resources.retain(|id| seen.insert(id.clone()));
        self
    }

    /// Assembles a document from entries that were read one by one.
    ///
    /// Later duplicates of a course key replace earlier ones. Call
    /// [`TrainingProgress::normalized`] afterwards to repair the entries.
    #[must_use]
    pub fn from_parts(
        courses: impl IntoIterator<Item = (CourseId, CourseProgress)>,
        viewed_resources: impl IntoIterator<Item = ResourceId>,
    ) -> Self {
        Self {
            courses: courses.into_iter().collect(),
            viewed_resources: viewed_resources.into_iter().collect(),
        }
    }

    /// Folds changes made in `newer` on top of this document.
    ///
    /// Nothing recorded here is lost: lessons and resources are unioned and
    /// course status never moves backwards.
    pub fn merge(&mut self, newer: Self) {
        for (course_id, entry) in newer.courses {
            match self.courses.get_mut(&course_id) {
                Some(existing) => existing.absorb(entry),
                None => {
                    self.courses.insert(course_id, entry);
                }
            }
        }
        for resource_id in newer.viewed_resources {
            if !self.viewed_resources.contains(&resource_id) {
                self.viewed_resources.push(resource_id);
            }
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty() && self.viewed_resources.is_empty()
    }

    pub fn courses(&self) -> impl Iterator<Item = &CourseProgress> {
        self.courses.values()
    }

    #[must_use]
    pub fn course(&self, course_id: &CourseId) -> Option<&CourseProgress> {
        self.courses.get(course_id)
    }

    #[must_use]
    pub fn viewed_resources(&self) -> &[ResourceId] {
        &self.viewed_resources
    }

    /// Starts a course. No-op when it is already in progress or completed.
    ///
    /// Returns `true` if the status changed.
    pub fn start_course(&mut self, course_id: &CourseId, now: DateTime<Utc>) -> bool {
        self.entry(course_id).begin(now)
    }

    /// Records a completed lesson, creating the course entry on demand.
    ///
    /// The lesson is stored once no matter how often this is called, while
    /// `last_lesson_id` always moves to `lesson_id`. A not-started course
    /// moves to in progress; a completed course stays completed.
    pub fn complete_lesson(&mut self, course_id: &CourseId, lesson_id: &LessonId, now: DateTime<Utc>) {
        let entry = self.entry(course_id);
        entry.begin(now);
        entry.record_lesson(lesson_id.clone());
    }

    /// Marks a known course completed and refreshes `completed_at`.
    ///
    /// Unknown courses are left alone. Lesson coverage is not checked here.
    /// Returns `true` if an entry was updated.
    pub fn complete_course(&mut self, course_id: &CourseId, now: DateTime<Utc>) -> bool {
        let Some(entry) = self.courses.get_mut(course_id) else {
            return false;
        };
        entry.status = CourseStatus::Completed;
        entry.completed_at = Some(now);
        true
    }

    /// Returns `true` the first time a resource is recorded.
    pub fn mark_resource_viewed(&mut self, resource_id: &ResourceId) -> bool {
        if self.viewed_resources.contains(resource_id) {
            return false;
        }
        self.viewed_resources.push(resource_id.clone());
        true
    }

    #[must_use]
    pub fn is_lesson_completed(&self, course_id: &CourseId, lesson_id: &LessonId) -> bool {
        self.course(course_id)
            .is_some_and(|c| c.is_lesson_completed(lesson_id))
    }

    #[must_use]
    pub fn completion_percentage(&self, course_id: &CourseId, total_lessons: usize) -> u8 {
        self.course(course_id)
            .map_or(0, |c| c.completion_percentage(total_lessons))
    }

    #[must_use]
    pub fn last_lesson(&self, course_id: &CourseId) -> Option<&LessonId> {
        self.course(course_id).and_then(CourseProgress::last_lesson_id)
    }

    #[must_use]
    pub fn is_resource_viewed(&self, resource_id: &ResourceId) -> bool {
        self.viewed_resources.contains(resource_id)
    }

    pub fn courses_with_status(&self, status: CourseStatus) -> impl Iterator<Item = &CourseProgress> {
        self.courses.values().filter(move |c| c.status == status)
    }

    fn entry(&mut self, course_id: &CourseId) -> &mut CourseProgress {
        self.courses
            .entry(course_id.clone())
            .or_insert_with(|| CourseProgress::new(course_id.clone()))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
