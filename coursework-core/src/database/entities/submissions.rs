use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The live row of a submission lineage. Earlier attempts are kept in
/// `submission_versions`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub assignment_id: i32,
    pub user_id: i32,
    /// NULL for rows written before attempts were tracked.
    pub attempt: Option<i32>,
    pub workflow_state: String, // "unsubmitted", "submitted", "pending_review", "graded"
    pub submission_type: Option<String>, // "online_text_entry", "online_upload", "online_quiz"
    pub body: Option<String>,
    pub submitted_at: Option<ChronoDateTimeUtc>,
    pub posted_at: Option<ChronoDateTimeUtc>,
    pub graded_at: Option<ChronoDateTimeUtc>,
    pub grader_id: Option<i32>,
    pub score: Option<f64>,
    pub grade: Option<String>,
    pub entered_score: Option<f64>,
    pub entered_grade: Option<String>,
    pub points_deducted: Option<f64>,
    pub late_policy_status: Option<String>, // "late", "missing", "none"
    pub excused: bool,
    pub grade_matches_current_submission: bool,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignments::Entity",
        from = "Column::AssignmentId",
        to = "super::assignments::Column::Id"
    )]
    Assignments,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(has_many = "super::submission_versions::Entity")]
    SubmissionVersions,
    #[sea_orm(has_many = "super::submission_comments::Entity")]
    SubmissionComments,
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignments.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::submission_versions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubmissionVersions.def()
    }
}

impl Related<super::submission_comments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubmissionComments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Attempt number as exposed to clients; a NULL attempt reads as 0.
    pub fn current_attempt(&self) -> i32 {
        self.attempt.unwrap_or(0)
    }
}

/// Submission type recorded for quiz-backed attempts.
pub const ONLINE_QUIZ: &str = "online_quiz";

/// Quiz submissions take their submitted and review state from the quiz row.
pub fn is_quiz_submission_type(submission_type: Option<&str>) -> bool {
    submission_type == Some(ONLINE_QUIZ)
}
