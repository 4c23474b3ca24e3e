use async_graphql::*;
use tracing::debug;

use crate::graphql::types::{Assignment, LegacyNode, NodeType, Submission};

pub struct Query;

/// Ids that are not numeric can never match a row.
fn parse_legacy_id(id: &ID) -> Option<i32> {
    id.parse::<i32>().ok()
}

#[Object]
impl Query {
    /// Get an assignment by id
    async fn assignment(&self, ctx: &Context<'_>, id: ID) -> Result<Option<Assignment>> {
        let Some(id) = parse_legacy_id(&id) else {
            return Ok(None);
        };
        Assignment::load(ctx, id).await
    }

    /// Get a submission by id; `null` when the viewer may not read it
    async fn submission(&self, ctx: &Context<'_>, id: ID) -> Result<Option<Submission>> {
        let Some(id) = parse_legacy_id(&id) else {
            return Ok(None);
        };
        Submission::load(ctx, id).await
    }

    /// Look up an object by type and numeric id
    async fn legacy_node(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "type")] node_type: NodeType,
        #[graphql(name = "_id")] id: ID,
    ) -> Result<Option<LegacyNode>> {
        debug!("legacyNode({:?}, {})", node_type, id.as_str());
        let Some(id) = parse_legacy_id(&id) else {
            return Ok(None);
        };
        LegacyNode::load(ctx, node_type, id).await
    }
}
