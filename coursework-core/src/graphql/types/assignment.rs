use std::sync::Arc;

use async_graphql::connection::Connection;
use async_graphql::*;
use chrono::{DateTime, Utc};

use crate::database::entities::assignments;
use crate::errors::ResultExt;
use crate::graphql::context::{GraphQLContext, RequestContext};
use crate::graphql::cursor::PositionCursor;
use crate::graphql::pagination::{paginate, PageArgs};
use crate::graphql::types::Submission;
use crate::services::SubmissionPolicy;

#[derive(Clone)]
pub struct Assignment {
    model: Arc<assignments::Model>,
}

impl From<Arc<assignments::Model>> for Assignment {
    fn from(model: Arc<assignments::Model>) -> Self {
        Self { model }
    }
}

impl Assignment {
    /// Fetch an assignment the request's viewer is enrolled for.
    pub async fn load(ctx: &Context<'_>, id: i32) -> Result<Option<Self>> {
        let context = ctx.data::<GraphQLContext>()?;
        let service = context.app.submission_service();
        let viewer = RequestContext::viewer(ctx);

        let Some(model) = service.find_assignment(id).await.map_gql_err()? else {
            return Ok(None);
        };
        let roles = service
            .viewer_course_roles(&viewer, model.course_id)
            .await
            .map_gql_err()?;

        if !SubmissionPolicy::can_read_assignment(&viewer, &roles) {
            return Ok(None);
        }
        Ok(Some(Self::from(Arc::new(model))))
    }
}

#[Object]
impl Assignment {
    #[graphql(name = "_id")]
    async fn legacy_id(&self) -> ID {
        ID(self.model.id.to_string())
    }

    async fn name(&self) -> &str {
        &self.model.name
    }

    async fn points_possible(&self) -> Option<f64> {
        self.model.points_possible
    }

    async fn grading_type(&self) -> &str {
        &self.model.grading_type
    }

    async fn muted(&self) -> bool {
        self.model.muted
    }

    async fn due_at(&self) -> Option<DateTime<Utc>> {
        self.model.due_at
    }

    /// Submissions the viewer may read; students only see their own.
    async fn submissions_connection(
        &self,
        ctx: &Context<'_>,
        after: Option<String>,
        before: Option<String>,
        first: Option<i32>,
        last: Option<i32>,
    ) -> Result<Connection<PositionCursor, Submission>> {
        let context = ctx.data::<GraphQLContext>()?;
        let service = context.app.submission_service();
        let viewer = RequestContext::viewer(ctx);

        let roles = service
            .viewer_course_roles(&viewer, self.model.course_id)
            .await
            .map_gql_err()?;
        let submissions = service
            .submissions_for_assignment(self.model.id)
            .await
            .map_gql_err()?;

        let readable: Vec<Submission> = submissions
            .into_iter()
            .filter_map(|submission| {
                Submission::authorize(submission, self.model.clone(), &viewer, &roles)
            })
            .collect();

        paginate(readable, &PageArgs::new(after, before, first, last)).map_gql_err()
    }
}
