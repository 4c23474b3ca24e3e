use async_graphql::*;

use crate::database::entities::users;

pub struct User {
    model: users::Model,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self { model }
    }
}

#[Object]
impl User {
    #[graphql(name = "_id")]
    async fn legacy_id(&self) -> ID {
        ID(self.model.id.to_string())
    }

    async fn name(&self) -> &str {
        &self.model.name
    }
}
