use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_graphql::dataloader::Loader;
use tracing::debug;

use crate::database::entities::quiz_submissions;
use crate::errors::CoreError;
use crate::services::SubmissionService;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct QuizSubmissionKey {
    pub quiz_id: i32,
    pub user_id: i32,
}

/// Counts batched loads, so callers can check that lists are not resolved row by row.
#[derive(Debug, Default)]
pub struct LoaderStats {
    quiz_submission_batches: AtomicUsize,
}

impl LoaderStats {
    pub fn quiz_submission_batches(&self) -> usize {
        self.quiz_submission_batches.load(Ordering::SeqCst)
    }

    fn record_quiz_submission_batch(&self) {
        self.quiz_submission_batches.fetch_add(1, Ordering::SeqCst);
    }
}

/// Loads the quiz submission behind each `online_quiz` submission in one query per batch.
pub struct QuizSubmissionLoader {
    service: Arc<SubmissionService>,
    stats: Arc<LoaderStats>,
}

impl QuizSubmissionLoader {
    pub fn new(service: Arc<SubmissionService>, stats: Arc<LoaderStats>) -> Self {
        Self { service, stats }
    }
}

impl Loader<QuizSubmissionKey> for QuizSubmissionLoader {
    type Value = quiz_submissions::Model;
    type Error = Arc<CoreError>;

    async fn load(
        &self,
        keys: &[QuizSubmissionKey],
    ) -> Result<HashMap<QuizSubmissionKey, Self::Value>, Self::Error> {
        self.stats.record_quiz_submission_batch();
        debug!("Batch loading {} quiz submissions", keys.len());

        let pairs: Vec<(i32, i32)> = keys.iter().map(|key| (key.quiz_id, key.user_id)).collect();
        let rows = self
            .service
            .quiz_submissions_for(&pairs)
            .await
            .map_err(Arc::new)?;

        Ok(rows
            .into_iter()
            .map(|row| {
                (
                    QuizSubmissionKey {
                        quiz_id: row.quiz_id,
                        user_id: row.user_id,
                    },
                    row,
                )
            })
            .collect())
    }
}
