use async_graphql::dataloader::DataLoader;
use async_graphql::*;

use crate::graphql::context::GraphQLContext;
use crate::graphql::loaders::QuizSubmissionLoader;
use crate::graphql::queries::Query;

pub type CourseworkSchema = Schema<Query, EmptyMutation, EmptySubscription>;

pub fn build_schema(context: GraphQLContext) -> CourseworkSchema {
    let quiz_submissions = DataLoader::new(
        QuizSubmissionLoader::new(
            context.app.submission_service(),
            context.loader_stats.clone(),
        ),
        tokio::spawn,
    );

    Schema::build(Query, EmptyMutation, EmptySubscription)
        .data(context)
        .data(quiz_submissions)
        .finish()
}
