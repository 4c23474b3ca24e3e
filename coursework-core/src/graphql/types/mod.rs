pub mod assignment;
pub mod legacy_node;
pub mod submission;
pub mod submission_comment;
pub mod submission_history;
pub mod user;

pub use assignment::Assignment;
pub use legacy_node::{LegacyNode, NodeType};
pub use submission::{CommentFilterInput, Submission};
pub use submission_comment::SubmissionComment;
pub use submission_history::SubmissionHistory;
pub use user::User;
