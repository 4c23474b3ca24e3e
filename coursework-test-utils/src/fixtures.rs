use chrono::{DateTime, Utc};
use coursework::auth::EnrollmentRole;
use coursework::database::entities::{
    assignments, courses, enrollments, quizzes, submission_comments, submissions, users,
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, Set};

pub async fn create_user(db: &DatabaseConnection, name: &str) -> Result<users::Model, DbErr> {
    users::ActiveModel {
        name: Set(name.to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn create_course(db: &DatabaseConnection, name: &str) -> Result<courses::Model, DbErr> {
    courses::ActiveModel {
        name: Set(name.to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn enroll(
    db: &DatabaseConnection,
    course_id: i32,
    user_id: i32,
    role: EnrollmentRole,
) -> Result<enrollments::Model, DbErr> {
    enrollments::ActiveModel {
        course_id: Set(course_id),
        user_id: Set(user_id),
        role: Set(role.as_str().to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn create_quiz(
    db: &DatabaseConnection,
    course_id: i32,
    title: &str,
) -> Result<quizzes::Model, DbErr> {
    quizzes::ActiveModel {
        course_id: Set(course_id),
        title: Set(title.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
}

#[derive(Clone, Debug)]
pub struct AssignmentOptions {
    pub name: String,
    pub points_possible: Option<f64>,
    pub grading_type: String,
    pub muted: bool,
    pub due_at: Option<DateTime<Utc>>,
    pub quiz_id: Option<i32>,
}

impl Default for AssignmentOptions {
    fn default() -> Self {
        Self {
            name: "Essay".to_string(),
            points_possible: Some(10.0),
            grading_type: "points".to_string(),
            muted: false,
            due_at: None,
            quiz_id: None,
        }
    }
}

pub async fn create_assignment(
    db: &DatabaseConnection,
    course_id: i32,
    options: AssignmentOptions,
) -> Result<assignments::Model, DbErr> {
    assignments::ActiveModel {
        course_id: Set(course_id),
        name: Set(options.name),
        points_possible: Set(options.points_possible),
        grading_type: Set(options.grading_type),
        muted: Set(options.muted),
        due_at: Set(options.due_at),
        quiz_id: Set(options.quiz_id),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// A submission row written directly, skipping the workflow service.
///
/// Used for rows that predate attempt tracking: `attempt` may be NULL and no
/// version rows exist.
pub async fn insert_raw_submission(
    db: &DatabaseConnection,
    assignment_id: i32,
    user_id: i32,
    attempt: Option<i32>,
    workflow_state: &str,
) -> Result<submissions::Model, DbErr> {
    let now = Utc::now();
    let submitted = workflow_state != "unsubmitted";

    submissions::ActiveModel {
        assignment_id: Set(assignment_id),
        user_id: Set(user_id),
        attempt: Set(attempt),
        workflow_state: Set(workflow_state.to_string()),
        submission_type: Set(submitted.then(|| "online_text_entry".to_string())),
        body: Set(submitted.then(|| "legacy body".to_string())),
        submitted_at: Set(submitted.then_some(now)),
        excused: Set(false),
        grade_matches_current_submission: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// A comment written directly, so tests can control attempt and timestamps.
pub async fn insert_raw_comment(
    db: &DatabaseConnection,
    submission_id: i32,
    author_id: i32,
    comment: &str,
    attempt: Option<i32>,
    draft: bool,
    created_at: DateTime<Utc>,
) -> Result<submission_comments::Model, DbErr> {
    submission_comments::ActiveModel {
        submission_id: Set(submission_id),
        author_id: Set(author_id),
        comment: Set(comment.to_string()),
        attempt: Set(attempt),
        draft: Set(draft),
        created_at: Set(created_at),
        updated_at: Set(created_at),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// A course with one teacher, two students and a points assignment.
pub struct CourseFixture {
    pub course: courses::Model,
    pub teacher: users::Model,
    pub student: users::Model,
    pub classmate: users::Model,
    pub assignment: assignments::Model,
}

impl CourseFixture {
    pub async fn create(db: &DatabaseConnection) -> Result<Self, DbErr> {
        Self::with_assignment(db, AssignmentOptions::default()).await
    }

    pub async fn with_assignment(
        db: &DatabaseConnection,
        options: AssignmentOptions,
    ) -> Result<Self, DbErr> {
        let course = create_course(db, "Biology 101").await?;
        let teacher = create_user(db, "Terry Teacher").await?;
        let student = create_user(db, "Sam Student").await?;
        let classmate = create_user(db, "Casey Classmate").await?;

        enroll(db, course.id, teacher.id, EnrollmentRole::Teacher).await?;
        enroll(db, course.id, student.id, EnrollmentRole::Student).await?;
        enroll(db, course.id, classmate.id, EnrollmentRole::Student).await?;

        let assignment = create_assignment(db, course.id, options).await?;

        Ok(Self {
            course,
            teacher,
            student,
            classmate,
            assignment,
        })
    }

    /// A further quiz-backed assignment in the same course.
    pub async fn add_quiz_assignment(
        &self,
        db: &DatabaseConnection,
    ) -> Result<assignments::Model, DbErr> {
        let quiz = create_quiz(db, self.course.id, "Cell Quiz").await?;
        create_assignment(
            db,
            self.course.id,
            AssignmentOptions {
                name: "Cell Quiz".to_string(),
                grading_type: "points".to_string(),
                quiz_id: Some(quiz.id),
                ..Default::default()
            },
        )
        .await
    }
}
