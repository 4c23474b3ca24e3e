use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "quizzes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub course_id: i32,
    pub title: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::quiz_submissions::Entity")]
    QuizSubmissions,
}

impl Related<super::quiz_submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuizSubmissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
