use crate::auth::Viewer;
use crate::database::entities::submission_comments;

/// Which comments of a submission a `commentsConnection` lists.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CommentFilter {
    /// Ignore attempts entirely.
    pub all_comments: bool,
    /// Restrict to one attempt instead of the current one.
    pub for_attempt: Option<i32>,
    /// Admit the viewer's own unpublished drafts.
    pub include_draft_comments: bool,
}

impl CommentFilter {
    pub fn admits(
        &self,
        comment: &submission_comments::Model,
        current_attempt: i32,
        viewer: &Viewer,
    ) -> bool {
        if comment.draft {
            let own_draft = viewer.user_id() == Some(comment.author_id);
            if !(self.include_draft_comments && own_draft) {
                return false;
            }
        }

        if self.all_comments {
            return true;
        }

        comment.attempt_or_zero() == self.for_attempt.unwrap_or(current_attempt)
    }
}

/// Filter then order by creation; ties broken by id so positions are stable.
pub fn visible_comments(
    comments: Vec<submission_comments::Model>,
    current_attempt: i32,
    filter: &CommentFilter,
    viewer: &Viewer,
) -> Vec<submission_comments::Model> {
    let mut visible: Vec<_> = comments
        .into_iter()
        .filter(|comment| filter.admits(comment, current_attempt, viewer))
        .collect();
    visible.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    visible
}
