mod access;
mod catalog;
mod ids;
mod progress;

pub use access::{AccessLevel, AccessTier, ParseAccessError, can_access_training};
pub use catalog::{Category, Course, Lesson, Resource, ResourceKind};
pub use ids::{CourseId, LessonId, ParseIdError, ResourceId};
pub use progress::{CourseProgress, CourseStatus, TrainingProgress};
