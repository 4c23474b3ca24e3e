use chrono::Utc;
use coursework::auth::{EnrollmentRole, Viewer};
use coursework::errors::CoreErrorKind;
use coursework::services::{
    GradeInput, HomeworkSubmission, NewComment, StatusContext, StatusInputs, SubmissionService,
    SubmissionStatus,
};
use coursework_test_utils::fixtures::create_user;
use coursework_test_utils::{CourseFixture, TestDb};
use sea_orm::DatabaseConnection;

async fn setup() -> (DatabaseConnection, SubmissionService, CourseFixture) {
    let db = TestDb::new_in_memory().connect().await.unwrap();
    let fixture = CourseFixture::create(&db).await.unwrap();
    let service = SubmissionService::new(db.clone());
    (db, service, fixture)
}

fn homework(body: &str) -> HomeworkSubmission {
    HomeworkSubmission {
        submission_type: "online_text_entry".to_string(),
        body: Some(body.to_string()),
        submitted_at: Utc::now(),
    }
}

#[tokio::test]
async fn each_submit_records_a_new_attempt_and_version() {
    let (_db, service, fixture) = setup().await;

    let mut latest = None;
    for body in ["one", "two", "three"] {
        latest = Some(
            service
                .submit_homework(fixture.assignment.id, fixture.student.id, homework(body))
                .await
                .unwrap(),
        );
    }
    let latest = latest.unwrap();
    assert_eq!(latest.attempt, Some(3));
    assert_eq!(latest.workflow_state, "submitted");

    let versions = service.versions_for_submission(latest.id).await.unwrap();
    let attempts: Vec<i32> = versions.iter().map(|v| v.attempt).collect();
    assert_eq!(attempts, vec![1, 2, 3]);
    assert_eq!(versions[0].body.as_deref(), Some("one"));

    let all = service
        .submissions_for_assignment(fixture.assignment.id)
        .await
        .unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn grading_updates_the_current_version() {
    let (_db, service, fixture) = setup().await;
    let submission = service
        .submit_homework(fixture.assignment.id, fixture.student.id, homework("essay"))
        .await
        .unwrap();

    let graded = service
        .grade_student(
            fixture.assignment.id,
            fixture.student.id,
            GradeInput::score(fixture.teacher.id, 9.5),
        )
        .await
        .unwrap();
    assert_eq!(graded.id, submission.id);
    assert_eq!(graded.workflow_state, "graded");
    assert_eq!(graded.grade.as_deref(), Some("9.5"));
    assert_eq!(graded.grader_id, Some(fixture.teacher.id));

    let versions = service.versions_for_submission(graded.id).await.unwrap();
    assert_eq!(versions.len(), 1);
    assert_eq!(versions[0].score, Some(9.5));
    assert_eq!(versions[0].workflow_state, "graded");
}

#[tokio::test]
async fn late_deductions_reduce_the_final_score() {
    let (_db, service, fixture) = setup().await;
    service
        .submit_homework(fixture.assignment.id, fixture.student.id, homework("essay"))
        .await
        .unwrap();

    let graded = service
        .grade_student(
            fixture.assignment.id,
            fixture.student.id,
            GradeInput {
                late_policy_status: Some("late".to_string()),
                points_deducted: Some(1.0),
                ..GradeInput::score(fixture.teacher.id, 9.0)
            },
        )
        .await
        .unwrap();

    assert_eq!(graded.entered_score, Some(9.0));
    assert_eq!(graded.entered_grade.as_deref(), Some("9"));
    assert_eq!(graded.score, Some(8.0));
    assert_eq!(graded.grade.as_deref(), Some("8"));
    assert_eq!(graded.points_deducted, Some(1.0));
}

#[tokio::test]
async fn grading_without_a_submission_creates_attempt_zero() {
    let (_db, service, fixture) = setup().await;

    let graded = service
        .grade_student(
            fixture.assignment.id,
            fixture.classmate.id,
            GradeInput::score(fixture.teacher.id, 0.0),
        )
        .await
        .unwrap();

    assert_eq!(graded.attempt, None);
    assert_eq!(graded.current_attempt(), 0);
    assert!(service
        .versions_for_submission(graded.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn resubmitting_after_grading_marks_the_grade_stale() {
    let (_db, service, fixture) = setup().await;
    service
        .submit_homework(fixture.assignment.id, fixture.student.id, homework("draft"))
        .await
        .unwrap();
    service
        .grade_student(
            fixture.assignment.id,
            fixture.student.id,
            GradeInput::score(fixture.teacher.id, 5.0),
        )
        .await
        .unwrap();
    let resubmitted = service
        .submit_homework(fixture.assignment.id, fixture.student.id, homework("final"))
        .await
        .unwrap();

    assert!(!resubmitted.grade_matches_current_submission);
    let context = StatusContext {
        due_at: None,
        quiz_submission: None,
        now: Utc::now(),
    };
    assert_eq!(
        StatusInputs::from(&resubmitted).submission_status(&context),
        SubmissionStatus::Resubmitted
    );
}

#[tokio::test]
async fn comments_default_to_the_current_attempt_and_are_range_checked() {
    let (_db, service, fixture) = setup().await;
    service
        .submit_homework(fixture.assignment.id, fixture.student.id, homework("one"))
        .await
        .unwrap();
    let submission = service
        .submit_homework(fixture.assignment.id, fixture.student.id, homework("two"))
        .await
        .unwrap();

    let comment = service
        .add_comment(
            submission.id,
            NewComment {
                author_id: fixture.teacher.id,
                comment: "nice".to_string(),
                attempt: None,
                draft: false,
            },
        )
        .await
        .unwrap();
    assert_eq!(comment.attempt, Some(2));

    let err = service
        .add_comment(
            submission.id,
            NewComment {
                author_id: fixture.teacher.id,
                comment: "from the future".to_string(),
                attempt: Some(3),
                draft: false,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), CoreErrorKind::Validation);

    let comments = service.comments_for_submission(submission.id).await.unwrap();
    assert_eq!(comments.len(), 1);
}

#[tokio::test]
async fn unknown_rows_are_not_found() {
    let (_db, service, fixture) = setup().await;

    let err = service
        .submit_homework(fixture.assignment.id, 9_999, homework("ghost"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), CoreErrorKind::NotFound);

    let err = service
        .submit_homework(9_999, fixture.student.id, homework("nowhere"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), CoreErrorKind::NotFound);

    let err = service
        .add_comment(
            9_999,
            NewComment {
                author_id: fixture.teacher.id,
                comment: "hello?".to_string(),
                attempt: None,
                draft: false,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), CoreErrorKind::NotFound);
}

#[tokio::test]
async fn quiz_attempts_require_a_quiz_assignment() {
    let (_db, service, fixture) = setup().await;

    let err = service
        .record_quiz_attempt(fixture.assignment.id, fixture.student.id, "complete", Some(3.0))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), CoreErrorKind::Validation);
}

#[tokio::test]
async fn quiz_submissions_load_in_one_batch_query() {
    let (db, service, fixture) = setup().await;
    let quiz_assignment = fixture.add_quiz_assignment(&db).await.unwrap();
    let quiz_id = quiz_assignment.quiz_id.unwrap();

    service
        .record_quiz_attempt(quiz_assignment.id, fixture.student.id, "complete", Some(3.0))
        .await
        .unwrap();
    service
        .record_quiz_attempt(quiz_assignment.id, fixture.classmate.id, "pending_review", None)
        .await
        .unwrap();

    let rows = service
        .quiz_submissions_for(&[
            (quiz_id, fixture.student.id),
            (quiz_id, fixture.classmate.id),
            (quiz_id, fixture.teacher.id),
        ])
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert!(service.quiz_submissions_for(&[]).await.unwrap().is_empty());

    let graded = service
        .find_submission_for(quiz_assignment.id, fixture.student.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(graded.workflow_state, "graded");
    assert_eq!(graded.grader_id, None);
    assert_eq!(graded.submission_type.as_deref(), Some("online_quiz"));
}

#[tokio::test]
async fn viewer_roles_come_from_enrollments() {
    let (db, service, fixture) = setup().await;
    let outsider = create_user(&db, "Outsider").await.unwrap();
    let course_id = fixture.course.id;

    assert_eq!(
        service
            .viewer_course_roles(&Viewer::user(fixture.teacher.id), course_id)
            .await
            .unwrap(),
        vec![EnrollmentRole::Teacher]
    );
    assert!(service
        .viewer_course_roles(&Viewer::user(outsider.id), course_id)
        .await
        .unwrap()
        .is_empty());
    assert!(service
        .viewer_course_roles(&Viewer::Anonymous, course_id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn failed_quiz_attempt_leaves_no_rows_behind() {
    let (db, service, fixture) = setup().await;
    let quiz_assignment = fixture.add_quiz_assignment(&db).await.unwrap();
    let quiz_id = quiz_assignment.quiz_id.unwrap();

    let err = service
        .record_quiz_attempt(quiz_assignment.id, 9_999, "complete", Some(3.0))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), CoreErrorKind::NotFound);

    assert!(service
        .quiz_submissions_for(&[(quiz_id, 9_999)])
        .await
        .unwrap()
        .is_empty());
    assert!(service
        .find_submission_for(quiz_assignment.id, 9_999)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn pending_review_quiz_keeps_its_attempt_snapshot() {
    let (db, service, fixture) = setup().await;
    let quiz_assignment = fixture.add_quiz_assignment(&db).await.unwrap();

    let pending = service
        .record_quiz_attempt(quiz_assignment.id, fixture.student.id, "pending_review", None)
        .await
        .unwrap();
    assert_eq!(pending.workflow_state, "pending_review");
    assert_eq!(pending.attempt, Some(1));

    let versions = service.versions_for_submission(pending.id).await.unwrap();
    assert_eq!(versions.len(), 1);
    assert_eq!(versions[0].submission_type.as_deref(), Some("online_quiz"));
}
