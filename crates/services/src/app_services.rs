use std::sync::Arc;

use storage::repository::Storage;

use crate::authoring_service::AuthoringService;
use crate::catalog_service::CatalogService;
use crate::progress_service::ProgressService;
use crate::quiz_service::QuizService;
use crate::Clock;

/// Assembles the app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    catalog: Arc<CatalogService>,
    authoring: Arc<AuthoringService>,
    progress: Arc<ProgressService>,
    quizzes: Arc<QuizService>,
}

impl AppServices {
    /// Build services over existing storage handles.
    #[must_use]
    pub fn new(clock: Clock, storage: &Storage) -> Self {
        let catalog = Arc::new(CatalogService::new(Arc::clone(&storage.courses)));
        let authoring = Arc::new(AuthoringService::new(clock, Arc::clone(&storage.courses)));
        let progress = Arc::new(ProgressService::new(
            clock,
            Arc::clone(&storage.courses),
            Arc::clone(&storage.progress),
        ));
        let quizzes = Arc::new(QuizService::new(Arc::clone(&storage.courses)));

        Self {
            catalog,
            authoring,
            progress,
            quizzes,
        }
    }

    /// Build services backed by fresh in-memory storage, for tests and
    /// embedding.
    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self::new(clock, &Storage::in_memory())
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn authoring(&self) -> Arc<AuthoringService> {
        Arc::clone(&self.authoring)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn quizzes(&self) -> Arc<QuizService> {
        Arc::clone(&self.quizzes)
    }
}
