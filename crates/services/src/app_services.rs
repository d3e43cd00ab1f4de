use std::sync::Arc;

use compass_core::model::{AccessLevel, Course, Lesson, Resource};
use storage::{ProgressStore, Storage};

use crate::Clock;
use crate::access::{self, Gate};
use crate::catalog::Catalog;
use crate::error::AppServicesError;
use crate::progress_service::ProgressManager;

/// Assembles the training services for one signed-in session.
pub struct AppServices {
    access_level: Option<AccessLevel>,
    catalog: Arc<Catalog>,
    progress: ProgressManager,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        access_level: Option<AccessLevel>,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::with_storage(&storage, clock, access_level).await)
    }

    /// Build services over an existing storage backend.
    pub async fn with_storage(
        storage: &Storage,
        clock: Clock,
        access_level: Option<AccessLevel>,
    ) -> Self {
        let store = ProgressStore::new(Arc::clone(&storage.local));
        let progress = ProgressManager::load(clock, store).await;
        Self {
            access_level,
            catalog: Arc::new(Catalog::builtin()),
            progress,
        }
    }

    pub async fn in_memory(clock: Clock, access_level: Option<AccessLevel>) -> Self {
        Self::with_storage(&Storage::in_memory(), clock, access_level).await
    }

    #[must_use]
    pub fn access_level(&self) -> Option<AccessLevel> {
        self.access_level
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressManager {
        &self.progress
    }

    pub fn progress_mut(&mut self) -> &mut ProgressManager {
        &mut self.progress
    }

    #[must_use]
    pub fn lesson_gate(&self, lesson: &Lesson) -> Gate {
        access::lesson_gate(lesson, self.access_level)
    }

    #[must_use]
    pub fn resource_gate(&self, resource: &Resource) -> Gate {
        access::resource_gate(resource, self.access_level)
    }

    #[must_use]
    pub fn course_gate(&self, course: &Course) -> Gate {
        access::course_gate(course, self.access_level)
    }
}
