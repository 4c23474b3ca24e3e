//! Typed result tree for the student view.
//!
//! Every nested object sits behind an [`Arc`] so that producing a merged
//! result only rebuilds the path from the root down to the history
//! connection. Untouched subtrees are shared with the previous value.

use std::sync::Arc;

use serde::Deserialize;

/// Standard GraphQL response envelope.
#[derive(Debug, Deserialize)]
pub struct GraphqlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphqlErrorMessage>,
}

#[derive(Debug, Deserialize)]
pub struct GraphqlErrorMessage {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StudentViewData {
    pub assignment: Option<Arc<AssignmentView>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentView {
    #[serde(rename = "_id")]
    pub legacy_id: String,
    pub name: String,
    pub points_possible: Option<f64>,
    pub grading_type: String,
    pub muted: bool,
    pub due_at: Option<String>,
    pub submissions_connection: Option<Arc<SubmissionNodes>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubmissionNodes {
    pub nodes: Vec<Arc<SubmissionView>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionView {
    #[serde(rename = "_id")]
    pub legacy_id: String,
    pub attempt: i32,
    pub state: String,
    pub submission_status: Option<String>,
    pub grading_status: Option<String>,
    pub score: Option<f64>,
    pub grade: Option<String>,
    pub submission_histories_connection: Arc<HistoryConnection>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryConnection {
    pub page_info: PageInfo,
    #[serde(default)]
    pub edges: Vec<Arc<HistoryEdge>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_previous_page: bool,
    pub has_next_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HistoryEdge {
    pub cursor: String,
    pub node: SubmissionHistoryNode,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionHistoryNode {
    pub root_id: String,
    pub attempt: i32,
    pub state: String,
    pub submission_status: Option<String>,
    pub grading_status: Option<String>,
    pub submitted_at: Option<String>,
    pub submission_type: Option<String>,
    pub body: Option<String>,
    pub score: Option<f64>,
    pub grade: Option<String>,
}

/// Result of the `NEXT_SUBMISSION` document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextSubmissionData {
    pub legacy_node: Option<LegacyNodePage>,
}

/// `legacyNode` resolved to a submission. Other node types deserialize with
/// no connection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyNodePage {
    #[serde(default)]
    pub submission_histories_connection: Option<HistoryConnection>,
}

impl StudentViewData {
    /// The viewer's submission, if the assignment lists one.
    pub fn current_submission(&self) -> Option<&Arc<SubmissionView>> {
        self.assignment
            .as_ref()?
            .submissions_connection
            .as_ref()?
            .nodes
            .first()
    }

    pub fn history(&self) -> Option<&HistoryConnection> {
        self.current_submission()
            .map(|submission| submission.submission_histories_connection.as_ref())
    }

    /// Cursor and lineage id to fetch the next older attempt with.
    pub fn load_more_params(&self) -> Option<(String, String)> {
        let history = self.history()?;
        let first = history.edges.first()?;
        let cursor = history.page_info.start_cursor.clone()?;
        Some((cursor, first.node.root_id.clone()))
    }

    /// Whether the server reported attempts older than the loaded ones.
    pub fn has_older_history(&self) -> bool {
        self.history()
            .is_some_and(|history| history.page_info.has_previous_page)
    }

    /// A copy of this result with the current submission's history replaced.
    ///
    /// Returns `None` when there is no current submission to attach it to.
    pub fn with_history(&self, history: HistoryConnection) -> Option<Self> {
        let assignment = self.assignment.as_ref()?;
        let connection = assignment.submissions_connection.as_ref()?;
        let (current, rest) = connection.nodes.split_first()?;

        let submission = SubmissionView {
            submission_histories_connection: Arc::new(history),
            ..SubmissionView::clone(current)
        };
        let mut nodes = Vec::with_capacity(connection.nodes.len());
        nodes.push(Arc::new(submission));
        nodes.extend(rest.iter().cloned());

        let assignment = AssignmentView {
            submissions_connection: Some(Arc::new(SubmissionNodes { nodes })),
            ..AssignmentView::clone(assignment)
        };
        Some(Self {
            assignment: Some(Arc::new(assignment)),
        })
    }
}

impl HistoryEdge {
    pub fn attempt(&self) -> i32 {
        self.node.attempt
    }
}
