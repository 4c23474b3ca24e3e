//! Derivation of the `submissionStatus` and `gradingStatus` values.
//!
//! Both are computed from the stored row plus, for quiz-backed submissions,
//! the matching quiz submission. Callers are expected to batch the quiz
//! lookups; nothing here touches the database.

use chrono::{DateTime, Utc};

use crate::database::entities::{quiz_submissions, submission_versions, submissions};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "graphql", derive(async_graphql::Enum))]
#[cfg_attr(feature = "graphql", graphql(rename_items = "snake_case"))]
pub enum SubmissionStatus {
    Resubmitted,
    Missing,
    Late,
    Submitted,
    Unsubmitted,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "graphql", derive(async_graphql::Enum))]
#[cfg_attr(feature = "graphql", graphql(rename_items = "snake_case"))]
pub enum GradingStatus {
    Excused,
    NeedsReview,
    NeedsGrading,
    Graded,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "graphql", derive(async_graphql::Enum))]
#[cfg_attr(feature = "graphql", graphql(rename_items = "snake_case"))]
pub enum LatePolicyStatus {
    Late,
    Missing,
    None,
}

impl LatePolicyStatus {
    pub fn parse(value: Option<&str>) -> Option<Self> {
        match value? {
            "late" => Some(LatePolicyStatus::Late),
            "missing" => Some(LatePolicyStatus::Missing),
            "none" => Some(LatePolicyStatus::None),
            _ => None,
        }
    }
}

/// The parts of a submission (live row or history snapshot) that statuses depend on.
#[derive(Clone, Copy, Debug)]
pub struct StatusInputs<'a> {
    pub workflow_state: &'a str,
    pub submission_type: Option<&'a str>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub late_policy_status: Option<LatePolicyStatus>,
    pub excused: bool,
    pub has_score: bool,
    pub grade_matches_current_submission: bool,
}

impl<'a> From<&'a submissions::Model> for StatusInputs<'a> {
    fn from(model: &'a submissions::Model) -> Self {
        Self {
            workflow_state: &model.workflow_state,
            submission_type: model.submission_type.as_deref(),
            submitted_at: model.submitted_at,
            late_policy_status: LatePolicyStatus::parse(model.late_policy_status.as_deref()),
            excused: model.excused,
            has_score: model.score.is_some(),
            grade_matches_current_submission: model.grade_matches_current_submission,
        }
    }
}

impl<'a> From<&'a submission_versions::Model> for StatusInputs<'a> {
    fn from(model: &'a submission_versions::Model) -> Self {
        Self {
            workflow_state: &model.workflow_state,
            submission_type: model.submission_type.as_deref(),
            submitted_at: model.submitted_at,
            late_policy_status: LatePolicyStatus::parse(model.late_policy_status.as_deref()),
            excused: model.excused,
            has_score: model.score.is_some(),
            grade_matches_current_submission: model.grade_matches_current_submission,
        }
    }
}

/// Everything outside the submission row that status derivation consults.
#[derive(Clone, Copy, Debug)]
pub struct StatusContext<'a> {
    pub due_at: Option<DateTime<Utc>>,
    /// Required for `online_quiz` submissions; `None` means the quiz was never taken.
    pub quiz_submission: Option<&'a quiz_submissions::Model>,
    pub now: DateTime<Utc>,
}

impl<'a> StatusInputs<'a> {
    fn is_quiz(&self) -> bool {
        submissions::is_quiz_submission_type(self.submission_type)
    }

    pub fn is_submitted(&self, context: &StatusContext<'_>) -> bool {
        if self.is_quiz() {
            return context
                .quiz_submission
                .map(quiz_submissions::Model::is_finished)
                .unwrap_or(false);
        }

        self.submitted_at.is_some() && self.submission_type.is_some()
    }

    fn is_pending_review(&self, context: &StatusContext<'_>) -> bool {
        if self.workflow_state == "pending_review" {
            return true;
        }

        self.is_quiz()
            && context
                .quiz_submission
                .map(quiz_submissions::Model::is_pending_review)
                .unwrap_or(false)
    }

    fn needs_grading(&self, context: &StatusContext<'_>) -> bool {
        self.is_submitted(context)
            && self.workflow_state == "submitted"
            && (!self.has_score || !self.grade_matches_current_submission)
    }

    fn is_past_due(&self, context: &StatusContext<'_>) -> bool {
        context.due_at.map(|due| due < context.now).unwrap_or(false)
    }

    pub fn is_late(&self, context: &StatusContext<'_>) -> bool {
        if self.excused {
            return false;
        }
        if let Some(status) = self.late_policy_status {
            return status == LatePolicyStatus::Late;
        }

        match (self.submitted_at, context.due_at) {
            (Some(submitted), Some(due)) => self.is_submitted(context) && submitted > due,
            _ => false,
        }
    }

    pub fn is_missing(&self, context: &StatusContext<'_>) -> bool {
        if self.excused {
            return false;
        }
        if let Some(status) = self.late_policy_status {
            return status == LatePolicyStatus::Missing;
        }

        !self.is_submitted(context) && self.is_past_due(context) && self.workflow_state != "graded"
    }

    pub fn submission_status(&self, context: &StatusContext<'_>) -> SubmissionStatus {
        if self.needs_grading(context) && !self.grade_matches_current_submission && self.has_score {
            SubmissionStatus::Resubmitted
        } else if self.is_missing(context) {
            SubmissionStatus::Missing
        } else if self.is_late(context) {
            SubmissionStatus::Late
        } else if self.is_submitted(context) {
            SubmissionStatus::Submitted
        } else {
            SubmissionStatus::Unsubmitted
        }
    }

    pub fn grading_status(&self, context: &StatusContext<'_>) -> Option<GradingStatus> {
        if self.excused {
            Some(GradingStatus::Excused)
        } else if self.is_pending_review(context) {
            Some(GradingStatus::NeedsReview)
        } else if self.needs_grading(context) {
            Some(GradingStatus::NeedsGrading)
        } else if self.workflow_state == "graded" {
            Some(GradingStatus::Graded)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn inputs(workflow_state: &str) -> StatusInputs<'_> {
        StatusInputs {
            workflow_state,
            submission_type: None,
            submitted_at: None,
            late_policy_status: None,
            excused: false,
            has_score: false,
            grade_matches_current_submission: true,
        }
    }

    fn context(now: DateTime<Utc>) -> StatusContext<'static> {
        StatusContext {
            due_at: None,
            quiz_submission: None,
            now,
        }
    }

    fn quiz_submission(state: &str) -> quiz_submissions::Model {
        quiz_submissions::Model {
            id: 1,
            quiz_id: 1,
            user_id: 1,
            workflow_state: state.to_string(),
            score: Some(4.0),
            finished_at: None,
        }
    }

    #[test]
    fn graded_without_submitting_is_unsubmitted_and_graded() {
        let now = Utc::now();
        let mut graded = inputs("graded");
        graded.has_score = true;

        assert_eq!(
            graded.submission_status(&context(now)),
            SubmissionStatus::Unsubmitted
        );
        assert_eq!(
            graded.grading_status(&context(now)),
            Some(GradingStatus::Graded)
        );
    }

    #[test]
    fn fresh_submission_needs_grading() {
        let now = Utc::now();
        let mut submitted = inputs("submitted");
        submitted.submission_type = Some("online_text_entry");
        submitted.submitted_at = Some(now);

        assert_eq!(
            submitted.submission_status(&context(now)),
            SubmissionStatus::Submitted
        );
        assert_eq!(
            submitted.grading_status(&context(now)),
            Some(GradingStatus::NeedsGrading)
        );
    }

    #[test]
    fn regraded_attempt_is_resubmitted() {
        let now = Utc::now();
        let mut resubmitted = inputs("submitted");
        resubmitted.submission_type = Some("online_text_entry");
        resubmitted.submitted_at = Some(now);
        resubmitted.has_score = true;
        resubmitted.grade_matches_current_submission = false;

        assert_eq!(
            resubmitted.submission_status(&context(now)),
            SubmissionStatus::Resubmitted
        );
    }

    #[test]
    fn late_policy_overrides_due_date() {
        let now = Utc::now();
        let mut submission = inputs("submitted");
        submission.submission_type = Some("online_upload");
        submission.submitted_at = Some(now);
        submission.has_score = true;

        let ctx = StatusContext {
            due_at: Some(now - Duration::hours(1)),
            quiz_submission: None,
            now,
        };
        assert_eq!(submission.submission_status(&ctx), SubmissionStatus::Late);

        submission.late_policy_status = Some(LatePolicyStatus::None);
        assert_eq!(submission.submission_status(&ctx), SubmissionStatus::Submitted);

        submission.late_policy_status = Some(LatePolicyStatus::Missing);
        assert_eq!(submission.submission_status(&ctx), SubmissionStatus::Missing);
    }

    #[test]
    fn past_due_without_submission_is_missing_unless_excused() {
        let now = Utc::now();
        let ctx = StatusContext {
            due_at: Some(now - Duration::days(1)),
            quiz_submission: None,
            now,
        };
        let mut nothing = inputs("unsubmitted");
        assert_eq!(nothing.submission_status(&ctx), SubmissionStatus::Missing);

        nothing.excused = true;
        assert_eq!(nothing.submission_status(&ctx), SubmissionStatus::Unsubmitted);
        assert_eq!(nothing.grading_status(&ctx), Some(GradingStatus::Excused));
    }

    #[test]
    fn quiz_submissions_follow_the_quiz_attempt() {
        let now = Utc::now();
        let mut quiz = inputs("graded");
        quiz.submission_type = Some("online_quiz");
        quiz.has_score = true;

        assert_eq!(
            quiz.submission_status(&context(now)),
            SubmissionStatus::Unsubmitted
        );

        let complete = quiz_submission("complete");
        let ctx = StatusContext {
            due_at: None,
            quiz_submission: Some(&complete),
            now,
        };
        assert_eq!(quiz.submission_status(&ctx), SubmissionStatus::Submitted);
        assert_eq!(quiz.grading_status(&ctx), Some(GradingStatus::Graded));

        let pending = quiz_submission("pending_review");
        let ctx = StatusContext {
            due_at: None,
            quiz_submission: Some(&pending),
            now,
        };
        assert_eq!(quiz.grading_status(&ctx), Some(GradingStatus::NeedsReview));
    }

    #[test]
    fn late_policy_status_parsing() {
        assert_eq!(LatePolicyStatus::parse(Some("late")), Some(LatePolicyStatus::Late));
        assert_eq!(LatePolicyStatus::parse(Some("none")), Some(LatePolicyStatus::None));
        assert_eq!(LatePolicyStatus::parse(Some("bogus")), None);
        assert_eq!(LatePolicyStatus::parse(None), None);
    }
}
