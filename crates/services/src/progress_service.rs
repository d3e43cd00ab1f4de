use serde::Serialize;
use tracing::{debug, info, warn};

use compass_core::model::{
    Course, CourseId, CourseProgress, CourseStatus, Lesson, LessonId, ResourceId, TrainingProgress,
};
use storage::ProgressStore;

use crate::Clock;
use crate::error::TrainingError;

/// Result of [`ProgressManager::finish_lesson`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonCompletion {
    /// `true` when this lesson was the last one and the course was marked completed.
    pub course_completed: bool,
    pub percentage: u8,
    pub next_lesson: Option<LessonId>,
}

/// Dashboard counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingSummary {
    pub courses_in_progress: usize,
    pub courses_completed: usize,
    pub lessons_completed: usize,
    pub resources_viewed: usize,
}

/// Owns the learner's training progress and keeps it persisted.
///
/// The in-memory document is the source of truth. Every mutation writes the
/// whole document through the [`ProgressStore`]; a failed write is logged by
/// the store and the in-memory change is kept.
///
/// If the stored document could not be read at start-up the manager works on
/// an empty document and writes nothing until a later read succeeds. The
/// stored document is then merged with the changes made in the meantime.
pub struct ProgressManager {
    clock: Clock,
    store: ProgressStore,
    progress: TrainingProgress,
    persisted: bool,
    synced: bool,
}

impl ProgressManager {
    /// Load the persisted document, or start empty.
    pub async fn load(clock: Clock, store: ProgressStore) -> Self {
        let (progress, synced) = match store.load().await {
            Ok(progress) => (progress, true),
            Err(err) => {
                warn!(error = %err, "training progress unavailable, changes stay in memory");
                (TrainingProgress::new(), false)
            }
        };
        debug!(
            courses = progress.courses().count(),
            resources = progress.viewed_resources().len(),
            synced,
            "training progress loaded"
        );
        Self {
            clock,
            store,
            progress,
            persisted: synced,
            synced,
        }
    }

    #[must_use]
    pub fn progress(&self) -> &TrainingProgress {
        &self.progress
    }

    /// Whether the last write reached storage.
    #[must_use]
    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    /// Whether the stored document has been read, so writes are allowed.
    #[must_use]
    pub fn is_synced(&self) -> bool {
        self.synced
    }

    // ─── Mutations ────────────────────────────────────────────────────────────

    pub async fn start_course(&mut self, course_id: &CourseId) {
        let now = self.clock.now();
        if self.progress.start_course(course_id, now) {
            info!(course_id = %course_id, "course started");
        }
        self.persist().await;
    }

    /// Record a lesson as completed. Creates the course entry if needed.
    pub async fn complete_lesson(&mut self, course_id: &CourseId, lesson_id: &LessonId) {
        let now = self.clock.now();
        self.progress.complete_lesson(course_id, lesson_id, now);
        debug!(course_id = %course_id, lesson_id = %lesson_id, "lesson completed");
        self.persist().await;
    }

    /// Mark a started course completed.
    ///
    /// Does nothing for a course with no progress entry. Lesson coverage is
    /// not checked; see [`ProgressManager::complete_course_checked`].
    pub async fn complete_course(&mut self, course_id: &CourseId) {
        let now = self.clock.now();
        if self.progress.complete_course(course_id, now) {
            info!(course_id = %course_id, "course completed");
        }
        self.persist().await;
    }

    pub async fn mark_resource_viewed(&mut self, resource_id: &ResourceId) {
        if self.progress.mark_resource_viewed(resource_id) {
            debug!(resource_id = %resource_id, "resource viewed");
        }
        self.persist().await;
    }

    /// Complete a lesson and, if it was the last outstanding one, the course.
    ///
    /// Writes once for both changes.
    ///
    /// # Errors
    ///
    /// Returns `TrainingError::UnknownLesson` if `lesson_id` is not in `course`.
    pub async fn finish_lesson(
        &mut self,
        course: &Course,
        lesson_id: &LessonId,
    ) -> Result<LessonCompletion, TrainingError> {
        if course.lesson(lesson_id).is_none() {
            return Err(TrainingError::UnknownLesson {
                course_id: course.id.clone(),
                lesson_id: lesson_id.clone(),
            });
        }

        let now = self.clock.now();
        self.progress.complete_lesson(&course.id, lesson_id, now);

        let already_completed = self.status(&course.id) == Some(CourseStatus::Completed);
        let mut course_completed = false;
        if !already_completed && self.outstanding_lessons(course) == 0 {
            course_completed = self.progress.complete_course(&course.id, now);
        }
        if course_completed {
            info!(course_id = %course.id, "course completed");
        }
        self.persist().await;

        Ok(LessonCompletion {
            course_completed,
            percentage: self.completion_percentage(&course.id, course.lesson_count()),
            next_lesson: course.next_lesson(lesson_id).map(|l| l.id.clone()),
        })
    }

    /// Mark a course completed only once every lesson in it is done.
    ///
    /// # Errors
    ///
    /// Returns `TrainingError::NotStarted` if the course has no progress, or
    /// `TrainingError::CourseIncomplete` while lessons remain.
    pub async fn complete_course_checked(&mut self, course: &Course) -> Result<(), TrainingError> {
        if self.progress.course(&course.id).is_none() {
            return Err(TrainingError::NotStarted(course.id.clone()));
        }
        let outstanding = self.outstanding_lessons(course);
        if outstanding > 0 {
            return Err(TrainingError::CourseIncomplete {
                course_id: course.id.clone(),
                completed: course.lesson_count() - outstanding,
                total: course.lesson_count(),
            });
        }
        self.complete_course(&course.id).await;
        Ok(())
    }

    // ─── Queries ──────────────────────────────────────────────────────────────

    #[must_use]
    pub fn is_lesson_completed(&self, course_id: &CourseId, lesson_id: &LessonId) -> bool {
        self.progress.is_lesson_completed(course_id, lesson_id)
    }

    #[must_use]
    pub fn course_progress(&self, course_id: &CourseId) -> Option<&CourseProgress> {
        self.progress.course(course_id)
    }

    #[must_use]
    pub fn status(&self, course_id: &CourseId) -> Option<CourseStatus> {
        self.progress.course(course_id).map(CourseProgress::status)
    }

    /// Rounded percentage of `total_lessons` completed; 0 for unknown courses
    /// or an empty course.
    #[must_use]
    pub fn completion_percentage(&self, course_id: &CourseId, total_lessons: usize) -> u8 {
        self.progress.completion_percentage(course_id, total_lessons)
    }

    #[must_use]
    pub fn last_lesson(&self, course_id: &CourseId) -> Option<&LessonId> {
        self.progress.last_lesson(course_id)
    }

    #[must_use]
    pub fn is_resource_viewed(&self, resource_id: &ResourceId) -> bool {
        self.progress.is_resource_viewed(resource_id)
    }

    /// Where "continue" should take the learner.
    ///
    /// The first incomplete lesson after the last one visited, else the first
    /// incomplete lesson in the course. `None` once everything is done.
    #[must_use]
    pub fn resume_lesson<'a>(&self, course: &'a Course) -> Option<&'a Lesson> {
        let done = |l: &&Lesson| self.is_lesson_completed(&course.id, &l.id);
        let start = self
            .last_lesson(&course.id)
            .and_then(|id| course.lesson_position(id))
            .map_or(0, |pos| pos + 1);

        course.lessons[start.min(course.lessons.len())..]
            .iter()
            .find(|l| !done(l))
            .or_else(|| course.lessons.iter().find(|l| !done(l)))
    }

    #[must_use]
    pub fn summary(&self) -> TrainingSummary {
        TrainingSummary {
            courses_in_progress: self
                .progress
                .courses_with_status(CourseStatus::InProgress)
                .count(),
            courses_completed: self
                .progress
                .courses_with_status(CourseStatus::Completed)
                .count(),
            lessons_completed: self
                .progress
                .courses()
                .map(|c| c.completed_lessons().len())
                .sum(),
            resources_viewed: self.progress.viewed_resources().len(),
        }
    }

    fn outstanding_lessons(&self, course: &Course) -> usize {
        course
            .lessons
            .iter()
            .filter(|l| !self.is_lesson_completed(&course.id, &l.id))
            .count()
    }

    async fn persist(&mut self) {
        if !self.synced && !self.resync().await {
            self.persisted = false;
            return;
        }
        self.persisted = self.store.save(&self.progress).await;
    }

    /// Re-reads the stored document and folds in-memory changes on top.
    async fn resync(&mut self) -> bool {
        match self.store.load().await {
            Ok(mut stored) => {
                stored.merge(std::mem::take(&mut self.progress));
                self.progress = stored;
                self.synced = true;
                info!("training progress read after earlier failure");
                true
            }
            Err(err) => {
                warn!(error = %err, "training progress still unreadable, not saving");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use compass_core::time::fixed_clock;
    use storage::{InMemoryRepository, KeyValueStore, StorageError};

    use crate::catalog::Catalog;

    async fn manager() -> ProgressManager {
        let store = ProgressStore::new(Arc::new(InMemoryRepository::new()));
        ProgressManager::load(fixed_clock(), store).await
    }

    /// Wraps a store and fails a set number of upcoming reads.
    #[derive(Clone, Default)]
    struct FlakyReads {
        inner: InMemoryRepository,
        failing_reads: Arc<AtomicUsize>,
    }

    impl FlakyReads {
        fn fail_next_reads(&self, count: usize) {
            self.failing_reads.store(count, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl KeyValueStore for FlakyReads {
        async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            let remaining = self.failing_reads.load(Ordering::SeqCst);
            if remaining > 0 {
                self.failing_reads.store(remaining - 1, Ordering::SeqCst);
                return Err(StorageError::Connection("database is locked".into()));
            }
            self.inner.get_item(key).await
        }

        async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.inner.set_item(key, value).await
        }
    }

    async fn saved_course(backend: &FlakyReads) -> CourseId {
        let course = CourseId::new("c");
        let store = ProgressStore::new(Arc::new(backend.clone()));
        let mut mgr = ProgressManager::load(fixed_clock(), store).await;
        for n in 1..=5 {
            mgr.complete_lesson(&course, &LessonId::new(format!("l{n}"))).await;
        }
        course
    }

    fn ai_course(catalog: &Catalog) -> &Course {
        catalog.course_by_id("course-ai-accessible-resources").unwrap()
    }

    #[tokio::test]
    async fn finish_lesson_rejects_foreign_lesson() {
        let catalog = Catalog::builtin();
        let mut mgr = manager().await;
        let err = mgr
            .finish_lesson(ai_course(&catalog), &LessonId::new("lesson-1-what-is-a-diap"))
            .await
            .unwrap_err();
        assert!(matches!(err, TrainingError::UnknownLesson { .. }));
        assert!(mgr.progress().is_empty());
    }

    #[tokio::test]
    async fn finish_lesson_completes_course_on_last_lesson() {
        let catalog = Catalog::builtin();
        let course = ai_course(&catalog);
        let mut mgr = manager().await;

        let (last, rest) = course.lessons.split_last().unwrap();
        for lesson in rest {
            let outcome = mgr.finish_lesson(course, &lesson.id).await.unwrap();
            assert!(!outcome.course_completed);
        }
        let outcome = mgr.finish_lesson(course, &last.id).await.unwrap();
        assert!(outcome.course_completed);
        assert_eq!(outcome.percentage, 100);
        assert_eq!(outcome.next_lesson, None);
        assert_eq!(mgr.status(&course.id), Some(CourseStatus::Completed));

        // Revisiting a lesson afterwards does not complete it again.
        let again = mgr.finish_lesson(course, &rest[0].id).await.unwrap();
        assert!(!again.course_completed);
        assert_eq!(mgr.status(&course.id), Some(CourseStatus::Completed));
    }

    #[tokio::test]
    async fn complete_course_checked_enforces_coverage() {
        let catalog = Catalog::builtin();
        let course = ai_course(&catalog);
        let mut mgr = manager().await;

        assert_eq!(
            mgr.complete_course_checked(course).await,
            Err(TrainingError::NotStarted(course.id.clone()))
        );

        mgr.complete_lesson(&course.id, &course.lessons[0].id).await;
        assert_eq!(
            mgr.complete_course_checked(course).await,
            Err(TrainingError::CourseIncomplete {
                course_id: course.id.clone(),
                completed: 1,
                total: 7,
            })
        );

        for lesson in &course.lessons {
            mgr.complete_lesson(&course.id, &lesson.id).await;
        }
        mgr.complete_course_checked(course).await.unwrap();
        assert_eq!(mgr.status(&course.id), Some(CourseStatus::Completed));
    }

    #[tokio::test]
    async fn resume_follows_last_lesson_then_wraps() {
        let catalog = Catalog::builtin();
        let course = ai_course(&catalog);
        let mut mgr = manager().await;

        assert_eq!(mgr.resume_lesson(course).unwrap().id, course.lessons[0].id);

        mgr.complete_lesson(&course.id, &course.lessons[1].id).await;
        assert_eq!(mgr.resume_lesson(course).unwrap().id, course.lessons[2].id);

        // Finishing the tail sends the learner back to the skipped first lesson.
        for lesson in &course.lessons[2..] {
            mgr.complete_lesson(&course.id, &lesson.id).await;
        }
        assert_eq!(mgr.resume_lesson(course).unwrap().id, course.lessons[0].id);

        mgr.complete_lesson(&course.id, &course.lessons[0].id).await;
        assert!(mgr.resume_lesson(course).is_none());
    }

    #[tokio::test]
    async fn summary_counts_courses_lessons_and_resources() {
        let mut mgr = manager().await;
        let a = CourseId::new("a");
        let b = CourseId::new("b");
        mgr.start_course(&a).await;
        mgr.complete_lesson(&b, &LessonId::new("b1")).await;
        mgr.complete_lesson(&b, &LessonId::new("b2")).await;
        mgr.complete_course(&b).await;
        mgr.mark_resource_viewed(&ResourceId::new("r")).await;
        mgr.mark_resource_viewed(&ResourceId::new("r")).await;

        assert_eq!(
            mgr.summary(),
            TrainingSummary {
                courses_in_progress: 1,
                courses_completed: 1,
                lessons_completed: 2,
                resources_viewed: 1,
            }
        );
    }

    #[tokio::test]
    async fn failed_read_does_not_overwrite_saved_progress() {
        let backend = FlakyReads::default();
        let course = saved_course(&backend).await;

        backend.fail_next_reads(1);
        let store = ProgressStore::new(Arc::new(backend.clone()));
        let mut mgr = ProgressManager::load(fixed_clock(), store.clone()).await;
        assert!(!mgr.is_synced());

        mgr.mark_resource_viewed(&ResourceId::new("r")).await;
        assert!(mgr.is_synced());
        assert!(mgr.is_persisted());

        let stored = store.load().await.unwrap();
        assert_eq!(stored.course(&course).unwrap().completed_lessons().len(), 5);
        assert!(stored.is_resource_viewed(&ResourceId::new("r")));
        assert_eq!(mgr.progress(), &stored);
    }

    #[tokio::test]
    async fn writes_wait_while_reads_keep_failing() {
        let backend = FlakyReads::default();
        let course = saved_course(&backend).await;

        backend.fail_next_reads(2);
        let store = ProgressStore::new(Arc::new(backend.clone()));
        let mut mgr = ProgressManager::load(fixed_clock(), store.clone()).await;

        mgr.complete_lesson(&course, &LessonId::new("l6")).await;
        assert!(!mgr.is_persisted());
        assert!(mgr.is_lesson_completed(&course, &LessonId::new("l6")));
        let stored = store.load().await.unwrap();
        assert_eq!(stored.course(&course).unwrap().completed_lessons().len(), 5);

        // Reads work again: the pending lesson lands on top of the saved five.
        mgr.start_course(&course).await;
        assert!(mgr.is_persisted());
        let stored = store.load().await.unwrap();
        assert_eq!(stored.course(&course).unwrap().completed_lessons().len(), 6);
        assert_eq!(stored.last_lesson(&course), Some(&LessonId::new("l6")));
    }
}
