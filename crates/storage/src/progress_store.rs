//! JSON persistence for the training progress document.

use std::sync::Arc;

use compass_core::model::{CourseId, CourseProgress, ResourceId, TrainingProgress};
use serde_json::Value;
use tracing::{debug, warn};

use crate::repository::{KeyValueStore, StorageError};

/// Storage key holding the progress document.
pub const PROGRESS_STORAGE_KEY: &str = "access-compass-training-progress";

/// Reads and writes the single `TrainingProgress` document.
///
/// A missing key or a value that is not a JSON object loads as the empty
/// document. Inside a readable document each course entry is decoded on its
/// own, so one malformed entry is dropped without losing the rest. Only a
/// failed backend read is an error.
#[derive(Clone)]
pub struct ProgressStore {
    backend: Arc<dyn KeyValueStore>,
    key: String,
}

impl ProgressStore {
    #[must_use]
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(backend, PROGRESS_STORAGE_KEY)
    }

    /// Store the document under a custom key.
    #[must_use]
    pub fn with_key(backend: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the stored document.
    ///
    /// # Errors
    ///
    /// Returns the backend error if the value could not be read. Callers must
    /// not treat that as "no progress": the stored document may still exist.
    pub async fn load(&self) -> Result<TrainingProgress, StorageError> {
        match self.backend.get_item(&self.key).await? {
            Some(raw) => Ok(self.decode(&raw)),
            None => Ok(TrainingProgress::new()),
        }
    }

    fn decode(&self, raw: &str) -> TrainingProgress {
        let document = match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(document)) => document,
            Ok(_) => {
                debug!(key = %self.key, "discarding training progress that is not an object");
                return TrainingProgress::new();
            }
            Err(err) => {
                debug!(key = %self.key, error = %err, "discarding unreadable training progress");
                return TrainingProgress::new();
            }
        };

        let courses: Vec<(CourseId, CourseProgress)> = match document.get("courses") {
            Some(Value::Object(entries)) => entries
                .iter()
                .filter_map(|(course_id, entry)| self.decode_course(course_id, entry))
                .collect(),
            None | Some(Value::Null) => Vec::new(),
            Some(_) => {
                warn!(key = %self.key, "dropping malformed courses map");
                Vec::new()
            }
        };

        let viewed: Vec<ResourceId> = match document.get("viewedResources") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| match item {
                    Value::String(id) => Some(ResourceId::new(id.as_str())),
                    _ => {
                        warn!(key = %self.key, "dropping malformed viewed resource id");
                        None
                    }
                })
                .collect(),
            None | Some(Value::Null) => Vec::new(),
            Some(_) => {
                warn!(key = %self.key, "dropping malformed viewed resources list");
                Vec::new()
            }
        };

        TrainingProgress::from_parts(courses, viewed).normalized()
    }

    fn decode_course(&self, course_id: &str, entry: &Value) -> Option<(CourseId, CourseProgress)> {
        let mut entry = entry.clone();
        if let Some(Value::Array(lessons)) = entry.get_mut("completedLessons") {
            let before = lessons.len();
            lessons.retain(Value::is_string);
            if lessons.len() < before {
                warn!(
                    key = %self.key,
                    course_id,
                    dropped = before - lessons.len(),
                    "dropping malformed completed lesson ids"
                );
            }
        }

        match serde_json::from_value::<CourseProgress>(entry) {
            Ok(progress) => Some((CourseId::new(course_id), progress)),
            Err(err) => {
                warn!(key = %self.key, course_id, error = %err, "dropping unreadable course progress");
                None
            }
        }
    }

    /// Persist the full document, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if encoding fails, or the
    /// backend error if the write is rejected.
    pub async fn try_save(&self, progress: &TrainingProgress) -> Result<(), StorageError> {
        let raw = serde_json::to_string(progress)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        self.backend.set_item(&self.key, &raw).await
    }

    /// Like [`ProgressStore::try_save`] but logs failures instead of returning them.
    ///
    /// Returns `true` if the document was written.
    pub async fn save(&self, progress: &TrainingProgress) -> bool {
        match self.try_save(progress).await {
            Ok(()) => true,
            Err(err) => {
                warn!(key = %self.key, error = %err, "failed to persist training progress");
                false
            }
        }
    }
}
