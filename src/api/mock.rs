/*!
 * Mock record source for testing.
 *
 * `MockSource` serves a scripted dictionary and a scripted list of pages:
 * - `MockSource::new(dict, pages)` - pages are served in order, an empty page past the end
 * - `failing_page(n, error)` - page `n` fails with an API error
 * - `failing_dictionary(error)` - the dictionary call fails
 */

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::api::models::{DictEntry, RawRecord};
use crate::api::RecordSource;
use crate::errors::FetchError;

/// Scripted failure returned by the mock
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockFailure {
    /// Non-success `code` in the payload
    Api { code: i64 },
    /// Retries exhausted on a transport failure
    Transport,
}

impl MockFailure {
    fn to_error(self, context: String) -> FetchError {
        match self {
            MockFailure::Api { code } => FetchError::ApiError { code, context },
            MockFailure::Transport => FetchError::RetriesExhausted {
                attempts: 4,
                last_error: format!("connection refused while {}", context),
            },
        }
    }
}

/// In-memory [`RecordSource`]
#[derive(Debug, Default)]
pub struct MockSource {
    dictionary: Vec<DictEntry>,
    pages: Vec<Vec<RawRecord>>,
    dictionary_failure: Option<MockFailure>,
    page_failure: Option<(u32, MockFailure)>,
    /// Number of page requests served, failures included
    page_requests: AtomicUsize,
}

impl MockSource {
    /// Create a mock serving `dictionary` and `pages` (page 1 is `pages[0]`)
    pub fn new(dictionary: Vec<DictEntry>, pages: Vec<Vec<RawRecord>>) -> Self {
        Self {
            dictionary,
            pages,
            ..Self::default()
        }
    }

    /// Split `records` into pages of `page_size`
    pub fn paged(dictionary: Vec<DictEntry>, records: Vec<RawRecord>, page_size: usize) -> Self {
        let pages = records
            .chunks(page_size.max(1))
            .map(|chunk| chunk.to_vec())
            .collect();
        Self::new(dictionary, pages)
    }

    /// Make page `page_num` fail with `failure`
    pub fn failing_page(mut self, page_num: u32, failure: MockFailure) -> Self {
        self.page_failure = Some((page_num, failure));
        self
    }

    /// Make the dictionary call fail with `failure`
    pub fn failing_dictionary(mut self, failure: MockFailure) -> Self {
        self.dictionary_failure = Some(failure);
        self
    }

    /// Number of page requests made so far
    pub fn page_requests(&self) -> usize {
        self.page_requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordSource for MockSource {
    async fn fetch_dictionary(&self) -> Result<Vec<DictEntry>, FetchError> {
        if let Some(failure) = self.dictionary_failure {
            return Err(failure.to_error("fetching the tag dictionary".to_string()));
        }
        Ok(self.dictionary.clone())
    }

    async fn fetch_page(&self, page_num: u32, _page_size: u32) -> Result<Vec<RawRecord>, FetchError> {
        self.page_requests.fetch_add(1, Ordering::SeqCst);

        if let Some((failing, failure)) = self.page_failure {
            if failing == page_num {
                return Err(failure.to_error(format!("fetching page {}", page_num)));
            }
        }

        let index = page_num.saturating_sub(1) as usize;
        Ok(self.pages.get(index).cloned().unwrap_or_default())
    }
}
