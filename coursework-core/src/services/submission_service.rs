use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, info, warn};

use crate::auth::{EnrollmentRole, Viewer};
use crate::database::entities::{
    assignments, enrollments, quiz_submissions, submission_comments, submission_versions,
    submissions, users,
};
use crate::errors::{CoreError, CoreResult, SubmissionError};

/// A student turning in work for an assignment.
#[derive(Clone, Debug)]
pub struct HomeworkSubmission {
    pub submission_type: String,
    pub body: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

/// A grader scoring the current attempt.
#[derive(Clone, Debug)]
pub struct GradeInput {
    /// `None` for automatic grading.
    pub grader_id: Option<i32>,
    pub score: Option<f64>,
    pub excused: bool,
    pub late_policy_status: Option<String>,
    pub points_deducted: Option<f64>,
}

impl GradeInput {
    pub fn score(grader_id: i32, score: f64) -> Self {
        Self {
            grader_id: Some(grader_id),
            score: Some(score),
            excused: false,
            late_policy_status: None,
            points_deducted: None,
        }
    }

    pub fn automatic(score: f64) -> Self {
        Self {
            grader_id: None,
            ..Self::score(0, score)
        }
    }
}

#[derive(Clone, Debug)]
pub struct NewComment {
    pub author_id: i32,
    pub comment: String,
    /// Defaults to the submission's current attempt.
    pub attempt: Option<i32>,
    pub draft: bool,
}

/// Reads and writes submission lineages.
///
/// Every write keeps `submission_versions` in step with the live row: a new
/// attempt gets a snapshot row and grading rewrites the snapshot of the
/// attempt being graded.
pub struct SubmissionService {
    db: DatabaseConnection,
}

impl SubmissionService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_submission(&self, id: i32) -> CoreResult<Option<submissions::Model>> {
        Ok(submissions::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn find_assignment(&self, id: i32) -> CoreResult<Option<assignments::Model>> {
        Ok(assignments::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn find_user(&self, id: i32) -> CoreResult<Option<users::Model>> {
        Ok(users::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn find_submission_for(
        &self,
        assignment_id: i32,
        user_id: i32,
    ) -> CoreResult<Option<submissions::Model>> {
        Ok(submissions::Entity::find()
            .filter(submissions::Column::AssignmentId.eq(assignment_id))
            .filter(submissions::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?)
    }

    /// All submissions of an assignment ordered by id.
    pub async fn submissions_for_assignment(
        &self,
        assignment_id: i32,
    ) -> CoreResult<Vec<submissions::Model>> {
        Ok(submissions::Entity::find()
            .filter(submissions::Column::AssignmentId.eq(assignment_id))
            .order_by_asc(submissions::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// The viewer's enrolments in a course. Anonymous and system viewers have none.
    pub async fn viewer_course_roles(
        &self,
        viewer: &Viewer,
        course_id: i32,
    ) -> CoreResult<Vec<EnrollmentRole>> {
        let Some(user_id) = viewer.user_id() else {
            return Ok(Vec::new());
        };

        let rows = enrollments::Entity::find()
            .filter(enrollments::Column::CourseId.eq(course_id))
            .filter(enrollments::Column::UserId.eq(user_id))
            .all(&self.db)
            .await?;

        Ok(rows.iter().filter_map(enrollments::Model::get_role).collect())
    }

    /// Every comment on a submission in creation order, drafts included.
    pub async fn comments_for_submission(
        &self,
        submission_id: i32,
    ) -> CoreResult<Vec<submission_comments::Model>> {
        Ok(submission_comments::Entity::find()
            .filter(submission_comments::Column::SubmissionId.eq(submission_id))
            .order_by_asc(submission_comments::Column::CreatedAt)
            .order_by_asc(submission_comments::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn versions_for_submission(
        &self,
        submission_id: i32,
    ) -> CoreResult<Vec<submission_versions::Model>> {
        Ok(submission_versions::Entity::find()
            .filter(submission_versions::Column::SubmissionId.eq(submission_id))
            .order_by_asc(submission_versions::Column::Attempt)
            .all(&self.db)
            .await?)
    }

    /// Quiz submissions for a batch of `(quiz_id, user_id)` pairs in one query.
    pub async fn quiz_submissions_for(
        &self,
        keys: &[(i32, i32)],
    ) -> CoreResult<Vec<quiz_submissions::Model>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let condition = keys.iter().fold(Condition::any(), |condition, (quiz_id, user_id)| {
            condition.add(
                Condition::all()
                    .add(quiz_submissions::Column::QuizId.eq(*quiz_id))
                    .add(quiz_submissions::Column::UserId.eq(*user_id)),
            )
        });

        debug!("Loading {} quiz submissions in one batch", keys.len());
        Ok(quiz_submissions::Entity::find()
            .filter(condition)
            .all(&self.db)
            .await?)
    }

    /// Record a new attempt, creating the submission row on first submit.
    pub async fn submit_homework(
        &self,
        assignment_id: i32,
        user_id: i32,
        input: HomeworkSubmission,
    ) -> CoreResult<submissions::Model> {
        let txn = self.db.begin().await?;
        let updated = record_attempt(&txn, assignment_id, user_id, input).await?;
        txn.commit().await?;

        info!(
            "Recorded attempt {} for user {} on assignment {}",
            updated.current_attempt(),
            user_id,
            assignment_id
        );
        Ok(updated)
    }

    /// Grade the current attempt. Students that never submitted get a row at attempt 0.
    pub async fn grade_student(
        &self,
        assignment_id: i32,
        user_id: i32,
        input: GradeInput,
    ) -> CoreResult<submissions::Model> {
        let txn = self.db.begin().await?;
        let assignment = assignments::Entity::find_by_id(assignment_id)
            .one(&txn)
            .await?
            .ok_or(SubmissionError::AssignmentNotFound(assignment_id))?;
        let grader_id = input.grader_id;
        let updated = record_grade(&txn, &assignment, user_id, input).await?;
        txn.commit().await?;

        info!(
            "Grader {:?} graded submission {} ({:?})",
            grader_id, updated.id, updated.grade
        );
        Ok(updated)
    }

    /// Record a quiz attempt and reflect it on the assignment's submission.
    ///
    /// A `complete` quiz is auto-graded with its score; `pending_review`
    /// leaves the submission waiting for a grader. The quiz row and the
    /// submission are written in one transaction.
    pub async fn record_quiz_attempt(
        &self,
        assignment_id: i32,
        user_id: i32,
        workflow_state: &str,
        score: Option<f64>,
    ) -> CoreResult<submissions::Model> {
        let txn = self.db.begin().await?;
        let assignment = assignments::Entity::find_by_id(assignment_id)
            .one(&txn)
            .await?
            .ok_or(SubmissionError::AssignmentNotFound(assignment_id))?;
        let quiz_id = assignment.quiz_id.ok_or_else(|| {
            CoreError::validation(format!("Assignment {} is not a quiz", assignment_id))
        })?;
        let now = Utc::now();

        let existing = quiz_submissions::Entity::find()
            .filter(quiz_submissions::Column::QuizId.eq(quiz_id))
            .filter(quiz_submissions::Column::UserId.eq(user_id))
            .one(&txn)
            .await?;
        let finished_at = matches!(workflow_state, "complete" | "pending_review").then_some(now);

        match existing {
            Some(row) => {
                let mut active: quiz_submissions::ActiveModel = row.into();
                active.workflow_state = Set(workflow_state.to_string());
                active.score = Set(score);
                active.finished_at = Set(finished_at);
                active.update(&txn).await?;
            }
            None => {
                quiz_submissions::ActiveModel {
                    quiz_id: Set(quiz_id),
                    user_id: Set(user_id),
                    workflow_state: Set(workflow_state.to_string()),
                    score: Set(score),
                    finished_at: Set(finished_at),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;
            }
        }

        let submitted = record_attempt(
            &txn,
            assignment_id,
            user_id,
            HomeworkSubmission {
                submission_type: submissions::ONLINE_QUIZ.to_string(),
                body: None,
                submitted_at: now,
            },
        )
        .await?;

        let result = match (workflow_state, score) {
            ("complete", Some(score)) => {
                record_grade(&txn, &assignment, user_id, GradeInput::automatic(score)).await?
            }
            ("pending_review", _) => {
                let mut active: submissions::ActiveModel = submitted.into();
                active.workflow_state = Set("pending_review".to_string());
                active.update(&txn).await?
            }
            _ => submitted,
        };
        txn.commit().await?;

        info!(
            "Recorded quiz {} attempt {} for user {} ({})",
            quiz_id,
            result.current_attempt(),
            user_id,
            workflow_state
        );
        Ok(result)
    }

    /// Attach a comment to an attempt that exists on the submission.
    pub async fn add_comment(
        &self,
        submission_id: i32,
        input: NewComment,
    ) -> CoreResult<submission_comments::Model> {
        let submission = self
            .find_submission(submission_id)
            .await?
            .ok_or(SubmissionError::NotFound(submission_id))?;

        let current = submission.current_attempt();
        let attempt = input.attempt.unwrap_or(current);
        if attempt < 0 || attempt > current {
            return Err(SubmissionError::AttemptOutOfRange { attempt, current }.into());
        }

        let now = Utc::now();
        let comment = submission_comments::ActiveModel {
            submission_id: Set(submission_id),
            author_id: Set(input.author_id),
            comment: Set(input.comment),
            attempt: Set((attempt > 0).then_some(attempt)),
            draft: Set(input.draft),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        debug!(
            "Added comment {} to submission {} attempt {}",
            comment.id, submission_id, attempt
        );
        Ok(comment)
    }
}

async fn ensure_submission(
    txn: &DatabaseTransaction,
    assignment_id: i32,
    user_id: i32,
) -> CoreResult<submissions::Model> {
    let existing = submissions::Entity::find()
        .filter(submissions::Column::AssignmentId.eq(assignment_id))
        .filter(submissions::Column::UserId.eq(user_id))
        .one(txn)
        .await?;
    if let Some(existing) = existing {
        return Ok(existing);
    }

    if assignments::Entity::find_by_id(assignment_id)
        .one(txn)
        .await?
        .is_none()
    {
        return Err(SubmissionError::AssignmentNotFound(assignment_id).into());
    }
    if users::Entity::find_by_id(user_id).one(txn).await?.is_none() {
        return Err(SubmissionError::UserNotFound(user_id).into());
    }

    let now = Utc::now();
    let created = submissions::ActiveModel {
        assignment_id: Set(assignment_id),
        user_id: Set(user_id),
        attempt: Set(None),
        workflow_state: Set("unsubmitted".to_string()),
        excused: Set(false),
        grade_matches_current_submission: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(txn)
    .await?;

    Ok(created)
}

/// Bump the attempt on the live row and snapshot it.
async fn record_attempt(
    txn: &DatabaseTransaction,
    assignment_id: i32,
    user_id: i32,
    input: HomeworkSubmission,
) -> CoreResult<submissions::Model> {
    let existing = ensure_submission(txn, assignment_id, user_id).await?;

    let attempt = existing.current_attempt() + 1;
    let previously_graded = existing.score.is_some();

    let mut active: submissions::ActiveModel = existing.into();
    active.attempt = Set(Some(attempt));
    active.workflow_state = Set("submitted".to_string());
    active.submission_type = Set(Some(input.submission_type));
    active.body = Set(input.body);
    active.submitted_at = Set(Some(input.submitted_at));
    active.grade_matches_current_submission = Set(!previously_graded);
    active.updated_at = Set(Utc::now());
    let updated = active.update(txn).await?;

    insert_version(txn, &updated).await?;
    Ok(updated)
}

/// Grade the live row and rewrite the snapshot of its current attempt.
async fn record_grade(
    txn: &DatabaseTransaction,
    assignment: &assignments::Model,
    user_id: i32,
    input: GradeInput,
) -> CoreResult<submissions::Model> {
    let existing = ensure_submission(txn, assignment.id, user_id).await?;
    let now = Utc::now();

    let grade = input
        .score
        .map(|score| format_grade(score, &assignment.grading_type, assignment.points_possible));
    let final_score = input
        .score
        .map(|score| score - input.points_deducted.unwrap_or(0.0));

    let mut active: submissions::ActiveModel = existing.into();
    active.workflow_state = Set("graded".to_string());
    active.entered_score = Set(input.score);
    active.entered_grade = Set(grade);
    active.score = Set(final_score);
    active.grade = Set(final_score.map(|score| {
        format_grade(score, &assignment.grading_type, assignment.points_possible)
    }));
    active.points_deducted = Set(input.points_deducted);
    active.excused = Set(input.excused);
    active.late_policy_status = Set(input.late_policy_status);
    active.grader_id = Set(input.grader_id);
    active.graded_at = Set(Some(now));
    active.grade_matches_current_submission = Set(true);
    active.updated_at = Set(now);
    let updated = active.update(txn).await?;

    if updated.current_attempt() == 0 {
        return Ok(updated);
    }

    let version = submission_versions::Entity::find()
        .filter(submission_versions::Column::SubmissionId.eq(updated.id))
        .filter(submission_versions::Column::Attempt.eq(updated.current_attempt()))
        .one(txn)
        .await?;

    match version {
        Some(version) => {
            let mut active: submission_versions::ActiveModel = version.into();
            active.workflow_state = Set(updated.workflow_state.clone());
            active.graded_at = Set(updated.graded_at);
            active.score = Set(updated.score);
            active.grade = Set(updated.grade.clone());
            active.entered_score = Set(updated.entered_score);
            active.entered_grade = Set(updated.entered_grade.clone());
            active.points_deducted = Set(updated.points_deducted);
            active.late_policy_status = Set(updated.late_policy_status.clone());
            active.excused = Set(updated.excused);
            active.grade_matches_current_submission = Set(true);
            active.update(txn).await?;
        }
        None => {
            warn!(
                "Submission {} has no version row for attempt {}",
                updated.id,
                updated.current_attempt()
            );
        }
    }

    Ok(updated)
}

async fn insert_version(
    txn: &DatabaseTransaction,
    submission: &submissions::Model,
) -> CoreResult<submission_versions::Model> {
    let snapshot = submission_versions::Model::snapshot_of(submission);

    let version = submission_versions::ActiveModel {
        submission_id: Set(snapshot.submission_id),
        attempt: Set(snapshot.attempt),
        workflow_state: Set(snapshot.workflow_state),
        submission_type: Set(snapshot.submission_type),
        body: Set(snapshot.body),
        submitted_at: Set(snapshot.submitted_at),
        graded_at: Set(snapshot.graded_at),
        score: Set(snapshot.score),
        grade: Set(snapshot.grade),
        entered_score: Set(snapshot.entered_score),
        entered_grade: Set(snapshot.entered_grade),
        points_deducted: Set(snapshot.points_deducted),
        late_policy_status: Set(snapshot.late_policy_status),
        excused: Set(snapshot.excused),
        grade_matches_current_submission: Set(snapshot.grade_matches_current_submission),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(txn)
    .await?;

    Ok(version)
}

/// Render a score the way the assignment's grading type displays it.
pub fn format_grade(score: f64, grading_type: &str, points_possible: Option<f64>) -> String {
    match grading_type {
        "percent" => match points_possible {
            Some(points) if points > 0.0 => format!("{}%", trim_float(score / points * 100.0)),
            _ => format!("{}%", trim_float(score)),
        },
        "pass_fail" => {
            if score > 0.0 {
                "complete".to_string()
            } else {
                "incomplete".to_string()
            }
        }
        _ => trim_float(score),
    }
}

fn trim_float(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{}", rounded)
    }
}
