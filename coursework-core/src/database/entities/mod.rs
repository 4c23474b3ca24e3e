pub mod assignments;
pub mod courses;
pub mod enrollments;
pub mod quiz_submissions;
pub mod quizzes;
pub mod submission_comments;
pub mod submission_versions;
pub mod submissions;
pub mod users;
