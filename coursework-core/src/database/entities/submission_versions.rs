use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Snapshot of a submission as it stood at one attempt.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "submission_versions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub submission_id: i32,
    pub attempt: i32,
    pub workflow_state: String,
    pub submission_type: Option<String>,
    pub body: Option<String>,
    pub submitted_at: Option<ChronoDateTimeUtc>,
    pub graded_at: Option<ChronoDateTimeUtc>,
    pub score: Option<f64>,
    pub grade: Option<String>,
    pub entered_score: Option<f64>,
    pub entered_grade: Option<String>,
    pub points_deducted: Option<f64>,
    pub late_policy_status: Option<String>,
    pub excused: bool,
    pub grade_matches_current_submission: bool,
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::submissions::Entity",
        from = "Column::SubmissionId",
        to = "super::submissions::Column::Id"
    )]
    Submissions,
}

impl Related<super::submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Snapshot the live row at its current attempt.
    pub fn snapshot_of(submission: &super::submissions::Model) -> Self {
        Self {
            id: 0,
            submission_id: submission.id,
            attempt: submission.current_attempt(),
            workflow_state: submission.workflow_state.clone(),
            submission_type: submission.submission_type.clone(),
            body: submission.body.clone(),
            submitted_at: submission.submitted_at,
            graded_at: submission.graded_at,
            score: submission.score,
            grade: submission.grade.clone(),
            entered_score: submission.entered_score,
            entered_grade: submission.entered_grade.clone(),
            points_deducted: submission.points_deducted,
            late_policy_status: submission.late_policy_status.clone(),
            excused: submission.excused,
            grade_matches_current_submission: submission.grade_matches_current_submission,
            created_at: submission.updated_at,
        }
    }
}
