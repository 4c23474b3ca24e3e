use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use crate::error::{PagerError, PagerResult};
use crate::model::{GraphqlResponse, HistoryConnection, NextSubmissionData, StudentViewData};
use crate::queries::{NEXT_SUBMISSION, STUDENT_VIEW_QUERY};

/// Header the server reads the viewer's user id from.
pub const VIEWER_HEADER: &str = "x-viewer-id";

/// Fetches the page of history immediately before `cursor` in one lineage.
#[async_trait]
pub trait HistoryPageFetcher: Send + Sync {
    async fn fetch_page(&self, cursor: &str, submission_id: &str)
        -> PagerResult<HistoryConnection>;
}

/// [`HistoryPageFetcher`] over HTTP against a `/graphql` endpoint.
#[derive(Clone)]
pub struct GraphqlHistoryFetcher {
    client: reqwest::Client,
    endpoint: String,
    viewer_id: Option<String>,
}

impl GraphqlHistoryFetcher {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            viewer_id: None,
        }
    }

    pub fn with_viewer(mut self, viewer_id: impl Into<String>) -> Self {
        self.viewer_id = Some(viewer_id.into());
        self
    }

    /// Initial student-view load for one assignment.
    pub async fn fetch_student_view(&self, assignment_lid: &str) -> PagerResult<StudentViewData> {
        self.execute(
            STUDENT_VIEW_QUERY,
            json!({ "assignmentLid": assignment_lid }),
        )
        .await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> PagerResult<T> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "query": query, "variables": variables }));
        if let Some(viewer_id) = &self.viewer_id {
            request = request.header(VIEWER_HEADER, viewer_id);
        }

        let body = request.send().await?.error_for_status()?.text().await?;
        let response: GraphqlResponse<T> = serde_json::from_str(&body)?;

        if !response.errors.is_empty() {
            return Err(PagerError::GraphQL(
                response.errors.into_iter().map(|e| e.message).collect(),
            ));
        }
        response
            .data
            .ok_or_else(|| PagerError::GraphQL(vec!["response carried no data".to_string()]))
    }
}

#[async_trait]
impl HistoryPageFetcher for GraphqlHistoryFetcher {
    async fn fetch_page(
        &self,
        cursor: &str,
        submission_id: &str,
    ) -> PagerResult<HistoryConnection> {
        debug!(
            "Fetching history before {} for submission {}",
            cursor, submission_id
        );

        let data: NextSubmissionData = self
            .execute(
                NEXT_SUBMISSION,
                json!({ "cursor": cursor, "submissionID": submission_id }),
            )
            .await?;

        data.legacy_node
            .and_then(|node| node.submission_histories_connection)
            .ok_or_else(|| PagerError::EmptyPage {
                submission_id: submission_id.to_string(),
                cursor: cursor.to_string(),
            })
    }
}
