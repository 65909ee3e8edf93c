#![forbid(unsafe_code)]

pub mod app_services;
pub mod authoring_service;
pub mod catalog_service;
pub mod error;
pub mod progress_service;
pub mod quiz_service;
pub mod session;

pub use lms_core::Clock;

pub use app_services::AppServices;
pub use authoring_service::AuthoringService;
pub use catalog_service::{AdminCourseSummary, CatalogService, CourseSummary};
pub use error::{AuthoringError, CatalogError, ProgressServiceError, QuizAnswerError};
pub use progress_service::{ProgressOverviewItem, ProgressService, ProgressSnapshot};
pub use quiz_service::QuizService;
pub use session::{AccessError, Role, Session};
