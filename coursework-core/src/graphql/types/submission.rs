use std::sync::Arc;

use async_graphql::connection::Connection;
use async_graphql::dataloader::DataLoader;
use async_graphql::*;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::auth::{EnrollmentRole, Viewer};
use crate::database::entities::{assignments, quiz_submissions, submissions};
use crate::errors::{ResultExt, ToGraphQLError};
use crate::graphql::context::{GraphQLContext, RequestContext};
use crate::graphql::cursor::PositionCursor;
use crate::graphql::loaders::{QuizSubmissionKey, QuizSubmissionLoader};
use crate::graphql::pagination::{paginate, PageArgs};
use crate::graphql::types::{Assignment, SubmissionComment, SubmissionHistory, User};
use crate::services::{
    assemble_history, visible_comments, CommentFilter, GradingStatus, LatePolicyStatus,
    StatusContext, StatusInputs, SubmissionCapabilities, SubmissionPolicy, SubmissionStatus,
};

#[derive(InputObject, Default)]
pub struct CommentFilterInput {
    pub all_comments: Option<bool>,
    pub for_attempt: Option<i32>,
    pub include_draft_comments: Option<bool>,
}

impl From<CommentFilterInput> for CommentFilter {
    fn from(input: CommentFilterInput) -> Self {
        Self {
            all_comments: input.all_comments.unwrap_or(false),
            for_attempt: input.for_attempt,
            include_draft_comments: input.include_draft_comments.unwrap_or(false),
        }
    }
}

/// A submission as seen by one viewer.
///
/// Only constructed through [`Submission::authorize`], so holding one means the
/// viewer may read it. Grade fields and comments are further gated by the
/// capabilities captured at construction.
#[derive(Clone)]
pub struct Submission {
    model: submissions::Model,
    assignment: Arc<assignments::Model>,
    capabilities: SubmissionCapabilities,
}

impl Submission {
    pub fn authorize(
        model: submissions::Model,
        assignment: Arc<assignments::Model>,
        viewer: &Viewer,
        course_roles: &[EnrollmentRole],
    ) -> Option<Self> {
        let capabilities = SubmissionPolicy::evaluate(viewer, course_roles, &model, &assignment);
        if !capabilities.read {
            debug!("Viewer {:?} may not read submission {}", viewer, model.id);
            return None;
        }

        Some(Self {
            model,
            assignment,
            capabilities,
        })
    }

    /// Fetch a submission by id for the request's viewer.
    pub async fn load(ctx: &Context<'_>, id: i32) -> Result<Option<Self>> {
        let context = ctx.data::<GraphQLContext>()?;
        let service = context.app.submission_service();
        let viewer = RequestContext::viewer(ctx);

        let Some(model) = service.find_submission(id).await.map_gql_err()? else {
            return Ok(None);
        };
        let Some(assignment) = service
            .find_assignment(model.assignment_id)
            .await
            .map_gql_err()?
        else {
            return Ok(None);
        };
        let roles = service
            .viewer_course_roles(&viewer, assignment.course_id)
            .await
            .map_gql_err()?;

        Ok(Self::authorize(model, Arc::new(assignment), &viewer, &roles))
    }

    fn gated<T>(&self, value: Option<T>) -> Option<T> {
        if self.capabilities.read_grade {
            value
        } else {
            None
        }
    }
}

/// The quiz submission backing an `online_quiz` submission, through the batching loader.
async fn load_quiz_submission(
    ctx: &Context<'_>,
    assignment: &assignments::Model,
    user_id: i32,
    submission_type: Option<&str>,
) -> Result<Option<quiz_submissions::Model>> {
    if !submissions::is_quiz_submission_type(submission_type) {
        return Ok(None);
    }
    let Some(quiz_id) = assignment.quiz_id else {
        return Ok(None);
    };

    let loader = ctx.data::<DataLoader<QuizSubmissionLoader>>()?;
    loader
        .load_one(QuizSubmissionKey { quiz_id, user_id })
        .await
        .map_err(|e| e.to_graphql_error())
}

/// Derive both statuses for a live row or a history snapshot.
pub(crate) async fn resolve_statuses(
    ctx: &Context<'_>,
    assignment: &assignments::Model,
    user_id: i32,
    inputs: StatusInputs<'_>,
) -> Result<(SubmissionStatus, Option<GradingStatus>)> {
    let quiz_submission =
        load_quiz_submission(ctx, assignment, user_id, inputs.submission_type).await?;

    let status_context = StatusContext {
        due_at: assignment.due_at,
        quiz_submission: quiz_submission.as_ref(),
        now: Utc::now(),
    };
    Ok((
        inputs.submission_status(&status_context),
        inputs.grading_status(&status_context),
    ))
}

#[Object]
impl Submission {
    #[graphql(name = "_id")]
    async fn legacy_id(&self) -> ID {
        ID(self.model.id.to_string())
    }

    /// Submissions that predate attempt tracking report attempt 0.
    async fn attempt(&self) -> i32 {
        self.model.current_attempt()
    }

    async fn state(&self) -> &str {
        &self.model.workflow_state
    }

    async fn excused(&self) -> bool {
        self.model.excused
    }

    async fn submitted_at(&self) -> Option<DateTime<Utc>> {
        self.model.submitted_at
    }

    async fn posted_at(&self) -> Option<DateTime<Utc>> {
        self.model.posted_at
    }

    async fn graded_at(&self) -> Option<DateTime<Utc>> {
        self.model.graded_at
    }

    async fn submission_type(&self) -> Option<&str> {
        self.model.submission_type.as_deref()
    }

    async fn body(&self) -> Option<&str> {
        self.model.body.as_deref()
    }

    async fn late_policy_status(&self) -> Option<LatePolicyStatus> {
        LatePolicyStatus::parse(self.model.late_policy_status.as_deref())
    }

    async fn score(&self) -> Option<f64> {
        self.gated(self.model.score)
    }

    async fn grade(&self) -> Option<String> {
        self.gated(self.model.grade.clone())
    }

    async fn entered_score(&self) -> Option<f64> {
        self.gated(self.model.entered_score)
    }

    async fn entered_grade(&self) -> Option<String> {
        self.gated(self.model.entered_grade.clone())
    }

    async fn deducted_points(&self) -> Option<f64> {
        self.gated(self.model.points_deducted)
    }

    async fn submission_status(&self, ctx: &Context<'_>) -> Result<SubmissionStatus> {
        let inputs = StatusInputs::from(&self.model);
        let (status, _) =
            resolve_statuses(ctx, &self.assignment, self.model.user_id, inputs).await?;
        Ok(status)
    }

    async fn grading_status(&self, ctx: &Context<'_>) -> Result<Option<GradingStatus>> {
        let inputs = StatusInputs::from(&self.model);
        let (_, status) =
            resolve_statuses(ctx, &self.assignment, self.model.user_id, inputs).await?;
        Ok(status)
    }

    async fn user(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let context = ctx.data::<GraphQLContext>()?;
        let user = context
            .app
            .submission_service()
            .find_user(self.model.user_id)
            .await
            .map_gql_err()?;

        Ok(user.map(User::from))
    }

    async fn assignment(&self) -> Assignment {
        Assignment::from(self.assignment.clone())
    }

    /// `null` when the viewer may not read comments on this submission.
    async fn comments_connection(
        &self,
        ctx: &Context<'_>,
        filter: Option<CommentFilterInput>,
        after: Option<String>,
        before: Option<String>,
        first: Option<i32>,
        last: Option<i32>,
    ) -> Result<Option<Connection<PositionCursor, SubmissionComment>>> {
        if !self.capabilities.read_comments {
            return Ok(None);
        }

        let context = ctx.data::<GraphQLContext>()?;
        let viewer = RequestContext::viewer(ctx);
        let filter = CommentFilter::from(filter.unwrap_or_default());

        let comments = context
            .app
            .submission_service()
            .comments_for_submission(self.model.id)
            .await
            .map_gql_err()?;
        let visible = visible_comments(comments, self.model.current_attempt(), &filter, &viewer);

        let nodes = visible.into_iter().map(SubmissionComment::from).collect();
        let connection = paginate(nodes, &PageArgs::new(after, before, first, last)).map_gql_err()?;

        Ok(Some(connection))
    }

    /// One node per attempt, oldest first. `includeCurrentSubmission` defaults to true.
    async fn submission_histories_connection(
        &self,
        ctx: &Context<'_>,
        include_current_submission: Option<bool>,
        after: Option<String>,
        before: Option<String>,
        first: Option<i32>,
        last: Option<i32>,
    ) -> Result<Connection<PositionCursor, SubmissionHistory>> {
        let context = ctx.data::<GraphQLContext>()?;
        let versions = context
            .app
            .submission_service()
            .versions_for_submission(self.model.id)
            .await
            .map_gql_err()?;

        let history = assemble_history(
            &self.model,
            versions,
            include_current_submission.unwrap_or(true),
        );
        let nodes = history
            .into_iter()
            .map(|version| {
                SubmissionHistory::new(
                    version,
                    self.assignment.clone(),
                    self.model.user_id,
                    self.capabilities,
                )
            })
            .collect();

        paginate(nodes, &PageArgs::new(after, before, first, last)).map_gql_err()
    }
}
