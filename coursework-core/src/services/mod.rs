pub mod access_policy;
pub mod comment_visibility;
pub mod submission_history;
pub mod submission_service;
pub mod submission_status;

pub use access_policy::{SubmissionCapabilities, SubmissionPolicy};
pub use comment_visibility::{visible_comments, CommentFilter};
pub use submission_history::assemble_history;
pub use submission_service::{GradeInput, HomeworkSubmission, NewComment, SubmissionService};
pub use submission_status::{
    GradingStatus, LatePolicyStatus, StatusContext, StatusInputs, SubmissionStatus,
};
