//! Cursor pagination aggregator.
//!
//! List queries return bounded pages with an opaque `after` cursor.
//! [`collect_pages`] drives a page-fetch callback until the server reports no
//! further pages, accumulating every node in server order. The whole result
//! set is held in memory; there is no streaming and no partial result on
//! failure.

use std::future::Future;

use serde::Deserialize;

use crate::client::PageInfo;
use crate::error::ProviderError;

/// One page of a paginated connection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// The nodes of this page, in server order.
    #[serde(default)]
    pub nodes: Vec<T>,
    /// Cursor state for the page that follows.
    #[serde(default)]
    pub page_info: PageInfo,
}

/// Fetch every page of a connection and return the concatenated nodes.
///
/// `fetch_page` is called with `None` for the first page, then with the
/// previous page's end cursor while `has_next_page` holds. Any page failure
/// aborts the whole aggregation: the error is returned and no partial node
/// list escapes. No retry, no backoff.
pub async fn collect_pages<T, F, Fut>(mut fetch_page: F) -> Result<Vec<T>, ProviderError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, ProviderError>>,
{
    let mut nodes = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let page = fetch_page(cursor.take()).await?;
        nodes.extend(page.nodes);

        if !page.page_info.has_next_page {
            break;
        }
        match page.page_info.end_cursor {
            Some(end) => cursor = Some(end),
            // A next page with no cursor would refetch the first page forever.
            None => break,
        }
    }

    Ok(nodes)
}
