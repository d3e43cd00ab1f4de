#![forbid(unsafe_code)]

pub mod access;
pub mod app_services;
pub mod catalog;
pub mod error;
pub mod progress_service;

pub use compass_core::Clock;

pub use access::Gate;
pub use app_services::AppServices;
pub use catalog::{Catalog, CategoryConfig, SearchResults};
pub use error::{AppServicesError, TrainingError};
pub use progress_service::{LessonCompletion, ProgressManager, TrainingSummary};
