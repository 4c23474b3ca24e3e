use crate::auth::{EnrollmentRole, Viewer};
use crate::database::entities::{assignments, submissions};

/// What a viewer may do with one submission.
///
/// Computed once when the submission object is built and then consulted by
/// every gated field, so a single resolution never sees two different answers.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SubmissionCapabilities {
    pub read: bool,
    pub read_grade: bool,
    pub read_comments: bool,
}

impl SubmissionCapabilities {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Self {
            read: true,
            read_grade: true,
            read_comments: true,
        }
    }
}

pub struct SubmissionPolicy;

impl SubmissionPolicy {
    /// `course_roles` are the viewer's enrolments in the assignment's course.
    pub fn evaluate(
        viewer: &Viewer,
        course_roles: &[EnrollmentRole],
        submission: &submissions::Model,
        assignment: &assignments::Model,
    ) -> SubmissionCapabilities {
        if viewer.is_system() || course_roles.iter().any(EnrollmentRole::can_grade) {
            return SubmissionCapabilities::all();
        }

        match viewer.user_id() {
            Some(user_id) if user_id == submission.user_id => SubmissionCapabilities {
                read: true,
                read_grade: !assignment.muted,
                read_comments: true,
            },
            _ => SubmissionCapabilities::none(),
        }
    }

    /// Any enrolment in the course is enough to see the assignment itself.
    pub fn can_read_assignment(viewer: &Viewer, course_roles: &[EnrollmentRole]) -> bool {
        viewer.is_system() || !course_roles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn assignment(muted: bool) -> assignments::Model {
        assignments::Model {
            id: 1,
            course_id: 1,
            name: "Essay".to_string(),
            points_possible: Some(10.0),
            grading_type: "points".to_string(),
            muted,
            due_at: None,
            quiz_id: None,
            created_at: Utc::now(),
        }
    }

    fn submission(user_id: i32) -> submissions::Model {
        let now = Utc::now();
        submissions::Model {
            id: 7,
            assignment_id: 1,
            user_id,
            attempt: Some(1),
            workflow_state: "graded".to_string(),
            submission_type: Some("online_text_entry".to_string()),
            body: None,
            submitted_at: Some(now),
            posted_at: None,
            graded_at: Some(now),
            grader_id: Some(1),
            score: Some(8.0),
            grade: Some("8".to_string()),
            entered_score: Some(8.0),
            entered_grade: Some("8".to_string()),
            points_deducted: None,
            late_policy_status: None,
            excused: false,
            grade_matches_current_submission: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn graders_get_everything_even_when_muted() {
        let caps = SubmissionPolicy::evaluate(
            &Viewer::user(1),
            &[EnrollmentRole::Ta],
            &submission(2),
            &assignment(true),
        );
        assert_eq!(caps, SubmissionCapabilities::all());
    }

    #[test]
    fn system_viewer_needs_no_enrollment() {
        let caps =
            SubmissionPolicy::evaluate(&Viewer::System, &[], &submission(2), &assignment(true));
        assert_eq!(caps, SubmissionCapabilities::all());
    }

    #[test]
    fn owner_loses_grades_while_muted() {
        let owner = Viewer::user(2);
        let roles = [EnrollmentRole::Student];

        let open = SubmissionPolicy::evaluate(&owner, &roles, &submission(2), &assignment(false));
        assert!(open.read && open.read_grade && open.read_comments);

        let muted = SubmissionPolicy::evaluate(&owner, &roles, &submission(2), &assignment(true));
        assert!(muted.read && muted.read_comments);
        assert!(!muted.read_grade);
    }

    #[test]
    fn classmates_and_anonymous_see_nothing() {
        let classmate = SubmissionPolicy::evaluate(
            &Viewer::user(3),
            &[EnrollmentRole::Student],
            &submission(2),
            &assignment(false),
        );
        assert_eq!(classmate, SubmissionCapabilities::none());

        let anonymous =
            SubmissionPolicy::evaluate(&Viewer::Anonymous, &[], &submission(2), &assignment(false));
        assert_eq!(anonymous, SubmissionCapabilities::none());
    }

    #[test]
    fn assignment_visibility_requires_enrollment() {
        assert!(SubmissionPolicy::can_read_assignment(
            &Viewer::user(3),
            &[EnrollmentRole::Student]
        ));
        assert!(!SubmissionPolicy::can_read_assignment(&Viewer::user(3), &[]));
        assert!(SubmissionPolicy::can_read_assignment(&Viewer::System, &[]));
    }
}
