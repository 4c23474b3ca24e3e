use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use coursework_client::{
    merge_history_page, HistoryConnection, HistoryPageFetcher, HistoryPager, LoadMore,
    PagerError, PagerResult, StudentViewData,
};
use serde_json::{json, Value};
use tokio::sync::Notify;

fn history_edge(attempt: i32) -> Value {
    let cursor = match attempt {
        1 => "MQ",
        2 => "Mg",
        3 => "Mw",
        _ => "MTA",
    };
    json!({
        "cursor": cursor,
        "node": {
            "rootId": "42",
            "attempt": attempt,
            "state": "submitted",
            "submissionStatus": "submitted",
            "gradingStatus": "needs_grading",
            "submittedAt": "2019-05-01T12:00:00+00:00",
            "submissionType": "online_text_entry",
            "body": format!("attempt {}", attempt),
            "score": null,
            "grade": null
        }
    })
}

fn page(attempt: i32, has_previous_page: bool) -> HistoryConnection {
    let cursor = history_edge(attempt)["cursor"].clone();
    serde_json::from_value(json!({
        "pageInfo": {
            "hasPreviousPage": has_previous_page,
            "hasNextPage": true,
            "startCursor": cursor,
            "endCursor": cursor
        },
        "edges": [history_edge(attempt)]
    }))
    .unwrap()
}

/// Student view holding only attempt 3 of 3.
fn student_view() -> StudentViewData {
    serde_json::from_value(student_view_json()).unwrap()
}

fn student_view_json() -> Value {
    json!({
        "assignment": {
            "_id": "7",
            "name": "Essay",
            "pointsPossible": 10.0,
            "gradingType": "points",
            "muted": false,
            "dueAt": null,
            "submissionsConnection": {
                "nodes": [{
                    "_id": "42",
                    "attempt": 3,
                    "state": "submitted",
                    "submissionStatus": "submitted",
                    "gradingStatus": "needs_grading",
                    "score": null,
                    "grade": null,
                    "submissionHistoriesConnection": {
                        "pageInfo": {
                            "hasPreviousPage": true,
                            "hasNextPage": false,
                            "startCursor": "Mw",
                            "endCursor": "Mw"
                        },
                        "edges": [history_edge(3)]
                    }
                }]
            }
        }
    })
}

fn attempts(data: &StudentViewData) -> Vec<i32> {
    data.history()
        .unwrap()
        .edges
        .iter()
        .map(|edge| edge.attempt())
        .collect()
}

/// Serves pages from the lineage's full attempt list and records every call.
struct FakeFetcher {
    total: i32,
    calls: Mutex<Vec<(String, String)>>,
}

impl FakeFetcher {
    fn new(total: i32) -> Self {
        Self {
            total,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl HistoryPageFetcher for FakeFetcher {
    async fn fetch_page(
        &self,
        cursor: &str,
        submission_id: &str,
    ) -> PagerResult<HistoryConnection> {
        self.calls
            .lock()
            .unwrap()
            .push((cursor.to_string(), submission_id.to_string()));

        let before = match cursor {
            "MQ" => 1,
            "Mg" => 2,
            "Mw" => 3,
            _ => self.total + 1,
        };
        let attempt = before - 1;
        if attempt < 1 {
            return Ok(HistoryConnection::default());
        }
        Ok(page(attempt, attempt > 1))
    }
}

struct FailingFetcher;

#[async_trait]
impl HistoryPageFetcher for FailingFetcher {
    async fn fetch_page(&self, _: &str, _: &str) -> PagerResult<HistoryConnection> {
        Err(PagerError::GraphQL(vec!["boom".to_string()]))
    }
}

/// Blocks every fetch until released.
struct GatedFetcher {
    started: AtomicUsize,
    release: Notify,
}

#[async_trait]
impl HistoryPageFetcher for GatedFetcher {
    async fn fetch_page(&self, cursor: &str, _: &str) -> PagerResult<HistoryConnection> {
        self.started.fetch_add(1, Ordering::SeqCst);
        self.release.notified().await;
        assert_eq!(cursor, "Mw");
        Ok(page(2, true))
    }
}

#[test]
fn merge_prepends_the_new_edge_and_replaces_page_info() {
    let previous = student_view();
    let original_edge = previous.history().unwrap().edges[0].clone();
    let next = page(2, true);
    let new_edge = next.edges[0].clone();
    let next_page_info = next.page_info.clone();

    let merged = merge_history_page(&previous, next).unwrap();

    let history = merged.history().unwrap();
    assert_eq!(history.edges.len(), 2);
    assert_eq!(history.edges[0], new_edge);
    assert_eq!(history.edges[1], original_edge);
    assert_eq!(history.page_info, next_page_info);

    // previous is untouched and shares its edge with the merged value
    assert_eq!(previous, student_view());
    assert!(Arc::ptr_eq(
        &history.edges[1],
        &previous.history().unwrap().edges[0]
    ));
    assert_eq!(
        merged.assignment.as_ref().unwrap().name,
        previous.assignment.as_ref().unwrap().name
    );
}

#[test]
fn merging_an_empty_page_is_an_error() {
    let previous = student_view();
    let err = merge_history_page(&previous, HistoryConnection::default()).unwrap_err();
    assert!(matches!(
        err,
        PagerError::EmptyPage { ref cursor, ref submission_id } if cursor == "Mw" && submission_id == "42"
    ));
}

#[tokio::test]
async fn load_more_walks_back_to_the_first_attempt() {
    let pager = HistoryPager::new(FakeFetcher::new(3));
    let mut data = student_view();

    for _ in 0..2 {
        match pager.load_more(&data).await.unwrap() {
            LoadMore::Merged {
                data: merged,
                boundary,
            } => {
                assert_eq!(
                    Some(boundary.as_str()),
                    data.history().unwrap().page_info.start_cursor.as_deref()
                );
                data = merged;
            }
            other => panic!("expected a merge, got {:?}", other),
        }
    }

    assert_eq!(attempts(&data), vec![1, 2, 3]);
    let page_info = &data.history().unwrap().page_info;
    assert!(!page_info.has_previous_page);
    assert_eq!(page_info.start_cursor.as_deref(), Some("MQ"));
    assert_eq!(
        pager.fetcher().calls(),
        vec![
            ("Mw".to_string(), "42".to_string()),
            ("Mg".to_string(), "42".to_string())
        ]
    );

    // The first attempt is loaded, so there is nothing older to ask for.
    assert!(matches!(
        pager.load_more(&data).await.unwrap(),
        LoadMore::NothingToFetch
    ));
    assert_eq!(pager.fetcher().calls().len(), 2);
}

/// Student view whose only edge is attempt 1.
fn first_attempt_view(has_previous_page: bool) -> StudentViewData {
    let mut value = student_view_json();
    let connection = &mut value["assignment"]["submissionsConnection"]["nodes"][0]
        ["submissionHistoriesConnection"];
    connection["pageInfo"]["hasPreviousPage"] = json!(has_previous_page);
    connection["pageInfo"]["startCursor"] = json!("MQ");
    connection["pageInfo"]["endCursor"] = json!("MQ");
    connection["edges"] = json!([history_edge(1)]);
    serde_json::from_value(value).unwrap()
}

#[tokio::test]
async fn fully_loaded_history_does_not_fetch() {
    let pager = HistoryPager::new(FakeFetcher::new(1));
    let data = first_attempt_view(false);

    assert!(matches!(
        pager.load_more(&data).await.unwrap(),
        LoadMore::NothingToFetch
    ));
    assert!(pager.fetcher().calls().is_empty());
}

#[tokio::test]
async fn empty_page_despite_older_history_is_an_error() {
    let pager = HistoryPager::new(FakeFetcher::new(1));
    let data = first_attempt_view(true);

    let err = pager.load_more(&data).await.unwrap_err();
    assert!(matches!(
        err,
        PagerError::EmptyPage { ref cursor, ref submission_id } if cursor == "MQ" && submission_id == "42"
    ));
    assert_eq!(
        pager.fetcher().calls(),
        vec![("MQ".to_string(), "42".to_string())]
    );
}

#[tokio::test]
async fn nothing_to_fetch_without_a_history_boundary() {
    let pager = HistoryPager::new(FakeFetcher::new(3));

    let no_assignment = StudentViewData { assignment: None };
    assert!(matches!(
        pager.load_more(&no_assignment).await.unwrap(),
        LoadMore::NothingToFetch
    ));

    let mut value = json!({
        "assignment": {
            "_id": "7",
            "name": "Essay",
            "pointsPossible": 10.0,
            "gradingType": "points",
            "muted": false,
            "dueAt": null,
            "submissionsConnection": { "nodes": [] }
        }
    });
    let no_submission: StudentViewData = serde_json::from_value(value.clone()).unwrap();
    assert!(matches!(
        pager.load_more(&no_submission).await.unwrap(),
        LoadMore::NothingToFetch
    ));

    value["assignment"]["submissionsConnection"]["nodes"] = json!([{
        "_id": "42",
        "attempt": 0,
        "state": "unsubmitted",
        "submissionStatus": "unsubmitted",
        "gradingStatus": null,
        "score": null,
        "grade": null,
        "submissionHistoriesConnection": {
            "pageInfo": {
                "hasPreviousPage": false,
                "hasNextPage": false,
                "startCursor": null,
                "endCursor": null
            },
            "edges": []
        }
    }]);
    let no_history: StudentViewData = serde_json::from_value(value).unwrap();
    assert!(matches!(
        pager.load_more(&no_history).await.unwrap(),
        LoadMore::NothingToFetch
    ));

    assert!(pager.fetcher().calls().is_empty());
}

#[tokio::test]
async fn failed_fetch_leaves_previous_untouched() {
    let pager = HistoryPager::new(FailingFetcher);
    let previous = student_view();

    let err = pager.load_more(&previous).await.unwrap_err();
    assert!(matches!(err, PagerError::GraphQL(ref messages) if messages == &["boom"]));
    assert_eq!(previous, student_view());

    // The guard was released, so a retry fetches again.
    assert!(pager.load_more(&previous).await.is_err());
}

#[tokio::test]
async fn concurrent_load_more_for_the_same_boundary_is_single_flight() {
    let pager = Arc::new(HistoryPager::new(GatedFetcher {
        started: AtomicUsize::new(0),
        release: Notify::new(),
    }));
    let data = student_view();

    let first = tokio::spawn({
        let pager = pager.clone();
        let data = data.clone();
        async move { pager.load_more(&data).await }
    });
    while pager.fetcher().started.load(Ordering::SeqCst) == 0 {
        tokio::task::yield_now().await;
    }

    assert!(matches!(
        pager.load_more(&data).await.unwrap(),
        LoadMore::AlreadyInFlight
    ));

    pager.fetcher().release.notify_one();
    let result = first.await.unwrap().unwrap();
    assert!(result.applies_to(&data));
    let LoadMore::Merged { data: merged, .. } = result else {
        panic!("expected a merge");
    };
    assert_eq!(attempts(&merged), vec![2, 3]);
    assert_eq!(pager.fetcher().started.load(Ordering::SeqCst), 1);

    // Once merged, the old boundary no longer describes the current value.
    let stale = LoadMore::Merged {
        data: merged.clone(),
        boundary: "Mw".to_string(),
    };
    assert!(!stale.applies_to(&merged));
}
