use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Submissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Submissions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Submissions::AssignmentId).integer().not_null())
                    .col(ColumnDef::new(Submissions::UserId).integer().not_null())
                    .col(ColumnDef::new(Submissions::Attempt).integer())
                    .col(
                        ColumnDef::new(Submissions::WorkflowState)
                            .string()
                            .not_null()
                            .default("unsubmitted"),
                    )
                    .col(ColumnDef::new(Submissions::SubmissionType).string())
                    .col(ColumnDef::new(Submissions::Body).text())
                    .col(ColumnDef::new(Submissions::SubmittedAt).timestamp())
                    .col(ColumnDef::new(Submissions::PostedAt).timestamp())
                    .col(ColumnDef::new(Submissions::GradedAt).timestamp())
                    .col(ColumnDef::new(Submissions::GraderId).integer())
                    .col(ColumnDef::new(Submissions::Score).double())
                    .col(ColumnDef::new(Submissions::Grade).string())
                    .col(ColumnDef::new(Submissions::EnteredScore).double())
                    .col(ColumnDef::new(Submissions::EnteredGrade).string())
                    .col(ColumnDef::new(Submissions::PointsDeducted).double())
                    .col(ColumnDef::new(Submissions::LatePolicyStatus).string())
                    .col(
                        ColumnDef::new(Submissions::Excused)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Submissions::GradeMatchesCurrentSubmission)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Submissions::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Submissions::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_submissions_assignment_id")
                            .from(Submissions::Table, Submissions::AssignmentId)
                            .to(Assignments::Table, Assignments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_submissions_user_id")
                            .from(Submissions::Table, Submissions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One live submission per student per assignment
        manager
            .create_index(
                Index::create()
                    .name("uq_submissions_assignment_user")
                    .table(Submissions::Table)
                    .col(Submissions::AssignmentId)
                    .col(Submissions::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SubmissionVersions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SubmissionVersions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SubmissionVersions::SubmissionId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SubmissionVersions::Attempt).integer().not_null())
                    .col(
                        ColumnDef::new(SubmissionVersions::WorkflowState)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SubmissionVersions::SubmissionType).string())
                    .col(ColumnDef::new(SubmissionVersions::Body).text())
                    .col(ColumnDef::new(SubmissionVersions::SubmittedAt).timestamp())
                    .col(ColumnDef::new(SubmissionVersions::GradedAt).timestamp())
                    .col(ColumnDef::new(SubmissionVersions::Score).double())
                    .col(ColumnDef::new(SubmissionVersions::Grade).string())
                    .col(ColumnDef::new(SubmissionVersions::EnteredScore).double())
                    .col(ColumnDef::new(SubmissionVersions::EnteredGrade).string())
                    .col(ColumnDef::new(SubmissionVersions::PointsDeducted).double())
                    .col(ColumnDef::new(SubmissionVersions::LatePolicyStatus).string())
                    .col(
                        ColumnDef::new(SubmissionVersions::Excused)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(SubmissionVersions::GradeMatchesCurrentSubmission)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(SubmissionVersions::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_submission_versions_submission_id")
                            .from(SubmissionVersions::Table, SubmissionVersions::SubmissionId)
                            .to(Submissions::Table, Submissions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // A lineage has exactly one snapshot per attempt
        manager
            .create_index(
                Index::create()
                    .name("uq_submission_versions_attempt")
                    .table(SubmissionVersions::Table)
                    .col(SubmissionVersions::SubmissionId)
                    .col(SubmissionVersions::Attempt)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SubmissionComments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SubmissionComments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SubmissionComments::SubmissionId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SubmissionComments::AuthorId).integer().not_null())
                    .col(ColumnDef::new(SubmissionComments::Comment).text().not_null())
                    .col(ColumnDef::new(SubmissionComments::Attempt).integer())
                    .col(
                        ColumnDef::new(SubmissionComments::Draft)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(SubmissionComments::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubmissionComments::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_submission_comments_submission_id")
                            .from(SubmissionComments::Table, SubmissionComments::SubmissionId)
                            .to(Submissions::Table, Submissions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_submission_comments_author_id")
                            .from(SubmissionComments::Table, SubmissionComments::AuthorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_submission_comments_submission_id")
                    .table(SubmissionComments::Table)
                    .col(SubmissionComments::SubmissionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(QuizSubmissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(QuizSubmissions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(QuizSubmissions::QuizId).integer().not_null())
                    .col(ColumnDef::new(QuizSubmissions::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(QuizSubmissions::WorkflowState)
                            .string()
                            .not_null()
                            .default("untaken"),
                    )
                    .col(ColumnDef::new(QuizSubmissions::Score).double())
                    .col(ColumnDef::new(QuizSubmissions::FinishedAt).timestamp())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_quiz_submissions_quiz_id")
                            .from(QuizSubmissions::Table, QuizSubmissions::QuizId)
                            .to(Quizzes::Table, Quizzes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_quiz_submissions_quiz_user")
                    .table(QuizSubmissions::Table)
                    .col(QuizSubmissions::QuizId)
                    .col(QuizSubmissions::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(QuizSubmissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SubmissionComments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SubmissionVersions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Submissions::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum Assignments {
    Table,
    Id,
}

#[derive(Iden)]
enum Quizzes {
    Table,
    Id,
}

#[derive(Iden)]
enum Submissions {
    Table,
    Id,
    AssignmentId,
    UserId,
    Attempt,
    WorkflowState,
    SubmissionType,
    Body,
    SubmittedAt,
    PostedAt,
    GradedAt,
    GraderId,
    Score,
    Grade,
    EnteredScore,
    EnteredGrade,
    PointsDeducted,
    LatePolicyStatus,
    Excused,
    GradeMatchesCurrentSubmission,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum SubmissionVersions {
    Table,
    Id,
    SubmissionId,
    Attempt,
    WorkflowState,
    SubmissionType,
    Body,
    SubmittedAt,
    GradedAt,
    Score,
    Grade,
    EnteredScore,
    EnteredGrade,
    PointsDeducted,
    LatePolicyStatus,
    Excused,
    GradeMatchesCurrentSubmission,
    CreatedAt,
}

#[derive(Iden)]
enum SubmissionComments {
    Table,
    Id,
    SubmissionId,
    AuthorId,
    Comment,
    Attempt,
    Draft,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum QuizSubmissions {
    Table,
    Id,
    QuizId,
    UserId,
    WorkflowState,
    Score,
    FinishedAt,
}
