//! Relay-style slicing of fully materialised lists.
//!
//! Histories and comment threads are small, so connections are built by
//! loading the filtered list and slicing it by position.

use async_graphql::connection::{Connection, Edge};
use async_graphql::OutputType;

use crate::errors::{SubmissionError, SubmissionResult};
use crate::graphql::cursor::PositionCursor;

/// The four Relay arguments as received from the client.
#[derive(Clone, Debug, Default)]
pub struct PageArgs {
    pub after: Option<String>,
    pub before: Option<String>,
    pub first: Option<i32>,
    pub last: Option<i32>,
}

impl PageArgs {
    pub fn new(
        after: Option<String>,
        before: Option<String>,
        first: Option<i32>,
        last: Option<i32>,
    ) -> Self {
        Self {
            after,
            before,
            first,
            last,
        }
    }

    pub fn window(&self, total: usize) -> SubmissionResult<PageWindow> {
        let after = self.after.as_deref().map(PositionCursor::decode).transpose()?;
        let before = self.before.as_deref().map(PositionCursor::decode).transpose()?;
        let first = count_argument("first", self.first)?;
        let last = count_argument("last", self.last)?;

        Ok(PageWindow::compute(total, after, before, first, last))
    }
}

fn count_argument(name: &str, value: Option<i32>) -> SubmissionResult<Option<usize>> {
    match value {
        Some(count) if count < 0 => Err(SubmissionError::InvalidPageArgument {
            argument: name.to_string(),
            reason: "must be non-negative".to_string(),
        }),
        Some(count) => Ok(Some(count as usize)),
        None => Ok(None),
    }
}

/// Half-open index range `[start, end)` into the full list.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PageWindow {
    pub start: usize,
    pub end: usize,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl PageWindow {
    /// `after` and `before` are 1-based positions.
    pub fn compute(
        total: usize,
        after: Option<usize>,
        before: Option<usize>,
        first: Option<usize>,
        last: Option<usize>,
    ) -> Self {
        let mut start = after.map(|position| position.min(total)).unwrap_or(0);
        let mut end = before
            .map(|position| position.saturating_sub(1).min(total))
            .unwrap_or(total);
        if end < start {
            end = start;
        }

        if let Some(first) = first {
            end = end.min(start + first);
        }
        if let Some(last) = last {
            start = start.max(end.saturating_sub(last));
        }

        Self {
            start,
            end,
            has_previous_page: start > 0,
            has_next_page: end < total,
        }
    }
}

/// Slice `items` into a connection whose cursors are absolute positions.
pub fn paginate<T>(
    items: Vec<T>,
    args: &PageArgs,
) -> SubmissionResult<Connection<PositionCursor, T>>
where
    T: OutputType,
{
    let window = args.window(items.len())?;
    let mut connection = Connection::new(window.has_previous_page, window.has_next_page);

    connection.edges.extend(
        items
            .into_iter()
            .enumerate()
            .skip(window.start)
            .take(window.end - window.start)
            .map(|(index, node)| Edge::new(PositionCursor(index + 1), node)),
    );

    Ok(connection)
}
