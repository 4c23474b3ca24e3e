//! Load-more stitching for submission history.
//!
//! The student view starts with only the newest attempt. Each load-more call
//! fetches the attempt just before the current start cursor and prepends it,
//! replacing `pageInfo` with the fetched page's.

use std::collections::HashSet;
use std::sync::Mutex;

use tracing::{debug, warn};

use crate::error::{PagerError, PagerResult};
use crate::fetch::HistoryPageFetcher;
use crate::model::{HistoryConnection, StudentViewData};

#[derive(Debug)]
pub enum LoadMore {
    /// No current submission, no history edge, no start cursor, or the
    /// oldest attempt is already loaded.
    NothingToFetch,
    /// A fetch against the same boundary cursor has not resolved yet.
    AlreadyInFlight,
    Merged {
        data: StudentViewData,
        /// Start cursor the page was fetched against.
        boundary: String,
    },
}

impl LoadMore {
    /// Whether a merged result still extends `current`.
    ///
    /// A caller that moved on (a different merge landed first, or the view was
    /// reloaded) drops results whose boundary no longer matches.
    pub fn applies_to(&self, current: &StudentViewData) -> bool {
        match self {
            LoadMore::Merged { boundary, .. } => current
                .history()
                .and_then(|history| history.page_info.start_cursor.as_deref())
                .is_some_and(|cursor| cursor == boundary),
            _ => false,
        }
    }
}

/// Prepend `page`'s edges to the current submission's history.
///
/// `previous` is left untouched. The result shares every subtree outside the
/// path to the history connection, and every existing edge, with `previous`.
pub fn merge_history_page(
    previous: &StudentViewData,
    page: HistoryConnection,
) -> PagerResult<StudentViewData> {
    let Some(history) = previous.history() else {
        return Ok(previous.clone());
    };

    if page.edges.is_empty() {
        let (cursor, submission_id) = previous.load_more_params().unwrap_or_default();
        return Err(PagerError::EmptyPage {
            submission_id,
            cursor,
        });
    }

    let mut edges = Vec::with_capacity(page.edges.len() + history.edges.len());
    edges.extend(page.edges);
    edges.extend(history.edges.iter().cloned());

    let merged = HistoryConnection {
        page_info: page.page_info,
        edges,
    };
    Ok(previous.with_history(merged).unwrap_or_else(|| previous.clone()))
}

/// Drives load-more for one student view.
pub struct HistoryPager<F> {
    fetcher: F,
    in_flight: Mutex<HashSet<String>>,
}

impl<F: HistoryPageFetcher> HistoryPager<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Fetch the attempt before `previous`'s start cursor and merge it in.
    ///
    /// On error `previous` remains the caller's current value; nothing is
    /// merged.
    pub async fn load_more(&self, previous: &StudentViewData) -> PagerResult<LoadMore> {
        let Some((cursor, submission_id)) = previous.load_more_params() else {
            debug!("No history boundary to load more from");
            return Ok(LoadMore::NothingToFetch);
        };
        if !previous.has_older_history() {
            debug!("History before {} is already fully loaded", cursor);
            return Ok(LoadMore::NothingToFetch);
        }

        let Some(_guard) = InFlightGuard::acquire(&self.in_flight, &cursor) else {
            warn!("Load more before {} is already in flight", cursor);
            return Ok(LoadMore::AlreadyInFlight);
        };

        let page = self.fetcher.fetch_page(&cursor, &submission_id).await?;
        debug!(
            "Fetched {} history edge(s) before {} for submission {}",
            page.edges.len(),
            cursor,
            submission_id
        );

        let data = merge_history_page(previous, page)?;
        Ok(LoadMore::Merged {
            data,
            boundary: cursor,
        })
    }
}

/// Marks a boundary cursor as in flight until dropped, including when the
/// load-more future is cancelled mid-fetch.
struct InFlightGuard<'a> {
    set: &'a Mutex<HashSet<String>>,
    key: String,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(set: &'a Mutex<HashSet<String>>, key: &str) -> Option<Self> {
        let inserted = set
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string());

        inserted.then(|| Self {
            set,
            key: key.to_string(),
        })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.set
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_releases_on_drop() {
        let set = Mutex::new(HashSet::new());

        let guard = InFlightGuard::acquire(&set, "Mg");
        assert!(guard.is_some());
        assert!(InFlightGuard::acquire(&set, "Mg").is_none());
        assert!(InFlightGuard::acquire(&set, "MQ").is_some());

        drop(guard);
        assert!(InFlightGuard::acquire(&set, "Mg").is_some());
    }

    #[test]
    fn merge_without_submission_returns_previous() {
        let previous = StudentViewData { assignment: None };
        let merged = merge_history_page(&previous, HistoryConnection::default()).unwrap();
        assert_eq!(merged, previous);
    }

    #[test]
    fn applies_to_is_false_for_non_merges() {
        let data = StudentViewData { assignment: None };
        assert!(!LoadMore::NothingToFetch.applies_to(&data));
        assert!(!LoadMore::AlreadyInFlight.applies_to(&data));
    }
}
