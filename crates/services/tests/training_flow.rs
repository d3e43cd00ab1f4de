use std::sync::Arc;

use chrono::Duration;
use compass_core::model::{
    AccessLevel, AccessTier, CourseId, CourseStatus, LessonId, ResourceId, TrainingProgress,
    can_access_training,
};
use compass_core::time::{fixed_clock, fixed_now};
use services::catalog::Catalog;
use services::{Clock, ProgressManager};
use storage::repository::KeyValueStore;
use storage::{InMemoryRepository, PROGRESS_STORAGE_KEY, ProgressStore};

const COURSE: &str = "course-ai-accessible-resources";

fn course_id() -> CourseId {
    CourseId::new(COURSE)
}

async fn manager_over(repo: Arc<InMemoryRepository>, clock: Clock) -> ProgressManager {
    ProgressManager::load(clock, ProgressStore::new(repo)).await
}

#[tokio::test]
async fn fresh_user_completes_a_course() {
    let catalog = Catalog::builtin();
    let course = catalog.course_by_id(COURSE).expect("course");
    let repo = Arc::new(InMemoryRepository::new());
    let mut mgr = manager_over(Arc::clone(&repo), fixed_clock()).await;

    assert_eq!(mgr.progress(), &TrainingProgress::new());

    mgr.start_course(&course.id).await;
    assert_eq!(mgr.status(&course.id), Some(CourseStatus::InProgress));

    let first = LessonId::new("lesson-1-why-accessible");
    mgr.complete_lesson(&course.id, &first).await;
    let entry = mgr.course_progress(&course.id).unwrap();
    assert_eq!(entry.completed_lessons(), &[first.clone()]);
    assert_eq!(entry.last_lesson_id(), Some(&first));

    for lesson in &course.lessons[1..] {
        mgr.complete_lesson(&course.id, &lesson.id).await;
    }
    let done = mgr.course_progress(&course.id).unwrap().completed_lessons().len();
    assert!(done >= course.lesson_count());
    mgr.complete_course(&course.id).await;

    let entry = mgr.course_progress(&course.id).unwrap();
    assert_eq!(entry.status(), CourseStatus::Completed);
    assert_eq!(entry.completed_at(), Some(fixed_now()));
    assert_eq!(mgr.completion_percentage(&course.id, course.lesson_count()), 100);
    assert!(mgr.is_persisted());

    // A new manager over the same storage sees the same document.
    let reloaded = manager_over(repo, fixed_clock()).await;
    assert_eq!(reloaded.progress(), mgr.progress());
}

#[tokio::test]
async fn resume_from_persisted_document() {
    let raw = r#"{
        "courses": {
            "course-ai-accessible-resources": {
                "courseId": "course-ai-accessible-resources",
                "status": "in-progress",
                "startedAt": "2024-02-27T08:00:00Z",
                "completedLessons": [
                    "lesson-1-why-accessible",
                    "lesson-2-plain-language",
                    "lesson-3-alt-text"
                ],
                "lastLessonId": "lesson-3-alt-text"
            }
        },
        "viewedResources": ["resource-alt-text-guide"]
    }"#;
    let repo = Arc::new(InMemoryRepository::new());
    repo.set_item(PROGRESS_STORAGE_KEY, raw).await.unwrap();

    let mgr = manager_over(repo, fixed_clock()).await;
    assert_eq!(
        mgr.last_lesson(&course_id()),
        Some(&LessonId::new("lesson-3-alt-text"))
    );
    assert_eq!(mgr.completion_percentage(&course_id(), 7), 43);
    assert!(mgr.is_resource_viewed(&ResourceId::new("resource-alt-text-guide")));

    let catalog = Catalog::builtin();
    let course = catalog.course_by_id(COURSE).unwrap();
    assert_eq!(
        mgr.resume_lesson(course).map(|l| l.id.as_str()),
        Some("lesson-4-document-structure")
    );
}

#[tokio::test]
async fn unknown_course_reads_as_untouched() {
    let mgr = manager_over(Arc::new(InMemoryRepository::new()), fixed_clock()).await;
    let course = CourseId::new("course-never-started");
    assert!(mgr.course_progress(&course).is_none());
    assert!(!mgr.is_lesson_completed(&course, &LessonId::new("any")));
    assert_eq!(mgr.completion_percentage(&course, 5), 0);
    assert!(mgr.last_lesson(&course).is_none());
}

#[tokio::test]
async fn repeated_operations_are_idempotent() {
    let mut clock = fixed_clock();
    let repo = Arc::new(InMemoryRepository::new());
    let mut mgr = manager_over(Arc::clone(&repo), clock).await;

    mgr.start_course(&course_id()).await;
    let once = mgr.progress().clone();
    mgr.start_course(&course_id()).await;
    assert_eq!(mgr.progress(), &once);

    let lesson = LessonId::new("lesson-2-plain-language");
    mgr.complete_lesson(&course_id(), &lesson).await;
    mgr.complete_lesson(&course_id(), &lesson).await;
    let entry = mgr.course_progress(&course_id()).unwrap();
    assert_eq!(entry.completed_lessons(), &[lesson.clone()]);
    assert_eq!(entry.last_lesson_id(), Some(&lesson));

    // Re-completing refreshes the timestamp.
    mgr.complete_course(&course_id()).await;
    clock.advance(Duration::hours(2));
    let mut later = manager_over(repo, clock).await;
    later.complete_course(&course_id()).await;
    assert_eq!(
        later.course_progress(&course_id()).unwrap().completed_at(),
        Some(fixed_now() + Duration::hours(2))
    );
    assert_eq!(
        later.course_progress(&course_id()).unwrap().started_at(),
        Some(fixed_now())
    );
}

#[tokio::test]
async fn complete_course_without_entry_is_a_no_op() {
    let mut mgr = manager_over(Arc::new(InMemoryRepository::new()), fixed_clock()).await;
    mgr.complete_course(&course_id()).await;
    assert!(mgr.course_progress(&course_id()).is_none());
}

#[tokio::test]
async fn corrupted_storage_starts_fresh() {
    let repo = Arc::new(InMemoryRepository::new());
    repo.set_item(PROGRESS_STORAGE_KEY, "definitely not json")
        .await
        .unwrap();
    let mgr = manager_over(repo, fixed_clock()).await;
    assert!(mgr.progress().is_empty());
}

#[tokio::test]
async fn quota_failure_keeps_in_memory_progress() {
    let repo = Arc::new(InMemoryRepository::with_quota(64));
    let mut mgr = manager_over(Arc::clone(&repo), fixed_clock()).await;

    mgr.start_course(&course_id()).await;
    mgr.complete_lesson(&course_id(), &LessonId::new("lesson-1-why-accessible"))
        .await;

    assert!(!mgr.is_persisted());
    assert!(mgr.is_lesson_completed(&course_id(), &LessonId::new("lesson-1-why-accessible")));
    assert_eq!(repo.get_item(PROGRESS_STORAGE_KEY).await.unwrap(), None);
}

#[test]
fn tier_gating_table() {
    assert!(can_access_training(AccessTier::Free, None));
    assert!(!can_access_training(AccessTier::Premium, None));
    assert!(can_access_training(AccessTier::Premium, Some(AccessLevel::DeepDive)));
    assert!(!can_access_training(AccessTier::Included, Some(AccessLevel::Pulse)));
}
