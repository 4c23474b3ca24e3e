pub mod error;
pub mod fetch;
pub mod model;
pub mod pager;
pub mod queries;

pub use error::{PagerError, PagerResult};
pub use fetch::{GraphqlHistoryFetcher, HistoryPageFetcher};
pub use model::{HistoryConnection, HistoryEdge, PageInfo, StudentViewData};
pub use pager::{merge_history_page, HistoryPager, LoadMore};
