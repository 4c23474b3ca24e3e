use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::services::SubmissionService;

/// Shared application context exposing core services to the GraphQL and HTTP layers.
#[derive(Clone)]
pub struct AppContext {
    db: DatabaseConnection,
    submission_service: Arc<SubmissionService>,
}

impl AppContext {
    pub fn new(db: DatabaseConnection) -> Self {
        let submission_service = Arc::new(SubmissionService::new(db.clone()));

        Self {
            db,
            submission_service,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn submission_service(&self) -> Arc<SubmissionService> {
        self.submission_service.clone()
    }
}
