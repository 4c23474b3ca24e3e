use async_graphql::*;

use crate::graphql::types::{Assignment, Submission};

/// Object kinds addressable by their numeric id through `legacyNode`.
#[derive(Enum, Clone, Copy, Debug, Eq, PartialEq)]
#[graphql(rename_items = "PascalCase")]
pub enum NodeType {
    Assignment,
    Submission,
}

#[derive(Union)]
pub enum LegacyNode {
    Assignment(Assignment),
    Submission(Submission),
}

impl LegacyNode {
    pub async fn load(ctx: &Context<'_>, node_type: NodeType, id: i32) -> Result<Option<Self>> {
        Ok(match node_type {
            NodeType::Assignment => Assignment::load(ctx, id).await?.map(LegacyNode::Assignment),
            NodeType::Submission => Submission::load(ctx, id).await?.map(LegacyNode::Submission),
        })
    }
}
