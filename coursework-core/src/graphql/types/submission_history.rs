use std::sync::Arc;

use async_graphql::*;
use chrono::{DateTime, Utc};

use crate::database::entities::{assignments, submission_versions};
use crate::graphql::types::submission::resolve_statuses;
use crate::services::{
    GradingStatus, LatePolicyStatus, StatusInputs, SubmissionCapabilities, SubmissionStatus,
};

/// One attempt of a submission lineage.
///
/// Grade fields follow the capabilities of the submission the history was
/// reached through.
pub struct SubmissionHistory {
    version: submission_versions::Model,
    assignment: Arc<assignments::Model>,
    user_id: i32,
    capabilities: SubmissionCapabilities,
}

impl SubmissionHistory {
    pub fn new(
        version: submission_versions::Model,
        assignment: Arc<assignments::Model>,
        user_id: i32,
        capabilities: SubmissionCapabilities,
    ) -> Self {
        Self {
            version,
            assignment,
            user_id,
            capabilities,
        }
    }

    fn gated<T>(&self, value: Option<T>) -> Option<T> {
        value.filter(|_| self.capabilities.read_grade)
    }
}

#[Object]
impl SubmissionHistory {
    /// Id of the submission every attempt in this lineage belongs to.
    async fn root_id(&self) -> ID {
        ID(self.version.submission_id.to_string())
    }

    async fn attempt(&self) -> i32 {
        self.version.attempt
    }

    async fn state(&self) -> &str {
        &self.version.workflow_state
    }

    async fn excused(&self) -> bool {
        self.version.excused
    }

    async fn submitted_at(&self) -> Option<DateTime<Utc>> {
        self.version.submitted_at
    }

    async fn graded_at(&self) -> Option<DateTime<Utc>> {
        self.version.graded_at
    }

    async fn submission_type(&self) -> Option<&str> {
        self.version.submission_type.as_deref()
    }

    async fn body(&self) -> Option<&str> {
        self.version.body.as_deref()
    }

    async fn late_policy_status(&self) -> Option<LatePolicyStatus> {
        LatePolicyStatus::parse(self.version.late_policy_status.as_deref())
    }

    async fn score(&self) -> Option<f64> {
        self.gated(self.version.score)
    }

    async fn grade(&self) -> Option<String> {
        self.gated(self.version.grade.clone())
    }

    async fn entered_score(&self) -> Option<f64> {
        self.gated(self.version.entered_score)
    }

    async fn entered_grade(&self) -> Option<String> {
        self.gated(self.version.entered_grade.clone())
    }

    async fn deducted_points(&self) -> Option<f64> {
        self.gated(self.version.points_deducted)
    }

    async fn submission_status(&self, ctx: &Context<'_>) -> Result<SubmissionStatus> {
        let inputs = StatusInputs::from(&self.version);
        let (status, _) = resolve_statuses(ctx, &self.assignment, self.user_id, inputs).await?;
        Ok(status)
    }

    async fn grading_status(&self, ctx: &Context<'_>) -> Result<Option<GradingStatus>> {
        let inputs = StatusInputs::from(&self.version);
        let (_, status) = resolve_statuses(ctx, &self.assignment, self.user_id, inputs).await?;
        Ok(status)
    }
}
