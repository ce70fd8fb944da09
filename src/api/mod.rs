/*!
 * Access to the remote record API.
 *
 * The pipeline only needs two calls: the tag dictionary and one page of
 * records. Both are expressed by [`RecordSource`] so the pagination loop and
 * the controller can run against the HTTP client or against a scripted mock:
 * - `client`: reqwest implementation with retry and backoff
 * - `mock`: in-memory implementation for tests
 * - `models`: wire types of both endpoints
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::FetchError;

pub mod client;
pub mod mock;
pub mod models;

pub use client::ApiClient;
pub use mock::{MockFailure, MockSource};
pub use models::{DictEntry, RawRecord};

/// Source of tag dictionary entries and record pages
#[async_trait]
pub trait RecordSource: Send + Sync + Debug {
    /// Fetch every entry of the tag dictionary
    ///
    /// # Returns
    /// * `Result<Vec<DictEntry>, FetchError>` - The entries, or an error when the call
    ///   fails after retries or the API reports a non-success code
    async fn fetch_dictionary(&self) -> Result<Vec<DictEntry>, FetchError>;

    /// Fetch one page of records
    ///
    /// # Arguments
    /// * `page_num` - 1-based page number
    /// * `page_size` - Records per page
    ///
    /// # Returns
    /// * `Result<Vec<RawRecord>, FetchError>` - The page in API order; empty past the last page
    async fn fetch_page(&self, page_num: u32, page_size: u32) -> Result<Vec<RawRecord>, FetchError>;
}
