use async_graphql::*;
use chrono::{DateTime, Utc};

use crate::database::entities::submission_comments;
use crate::errors::ResultExt;
use crate::graphql::context::GraphQLContext;
use crate::graphql::types::User;

pub struct SubmissionComment {
    model: submission_comments::Model,
}

impl From<submission_comments::Model> for SubmissionComment {
    fn from(model: submission_comments::Model) -> Self {
        Self { model }
    }
}

#[Object]
impl SubmissionComment {
    #[graphql(name = "_id")]
    async fn legacy_id(&self) -> ID {
        ID(self.model.id.to_string())
    }

    async fn comment(&self) -> &str {
        &self.model.comment
    }

    /// Comments left before attempts were tracked report attempt 0.
    async fn attempt(&self) -> i32 {
        self.model.attempt_or_zero()
    }

    async fn draft(&self) -> bool {
        self.model.draft
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.model.created_at
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        self.model.updated_at
    }

    async fn author(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let context = ctx.data::<GraphQLContext>()?;
        let author = context
            .app
            .submission_service()
            .find_user(self.model.author_id)
            .await
            .map_gql_err()?;

        Ok(author.map(User::from))
    }
}
