/*!
 * Paginated fetch loop.
 *
 * Pages are requested one after another starting at page 1. The loop stops
 * at the first record whose id equals the stop id (that record and the rest
 * of its page are dropped) or at the first empty page, whichever comes first.
 */

use indicatif::ProgressBar;
use log::{debug, info};

use crate::api::{RawRecord, RecordSource};
use crate::errors::FetchError;

/// Why the loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A record carrying the stop id was reached on this page
    StopIdFound { page: u32 },
    /// This page came back empty
    EmptyPage { page: u32 },
}

/// Records collected by one run of the loop
#[derive(Debug, Clone, PartialEq)]
pub struct Harvest {
    /// Records in fetch order, stop record excluded
    pub records: Vec<RawRecord>,
    /// Number of page requests made
    pub pages_fetched: u32,
    pub stop_reason: StopReason,
}

/// Fetch pages from `source` until `stop_id` or an empty page is reached
pub async fn collect_records<S: RecordSource + ?Sized>(
    source: &S,
    stop_id: u64,
    page_size: u32,
    progress: &ProgressBar,
) -> Result<Harvest, FetchError> {
    info!("Fetching records, stop id: {}", stop_id);

    let mut records = Vec::new();
    let mut page_num: u32 = 1;

    let stop_reason = loop {
        progress.set_message(format!("page {} ({} records so far)", page_num, records.len()));
        let page = source.fetch_page(page_num, page_size).await?;
        progress.tick();

        if page.is_empty() {
            info!("Page {} is empty, stopping", page_num);
            break StopReason::EmptyPage { page: page_num };
        }

        debug!("Page {} returned {} records", page_num, page.len());

        if let Some(position) = page.iter().position(|record| record.id == stop_id) {
            records.extend(page.into_iter().take(position));
            info!("Found stop id {} on page {}, stopping", stop_id, page_num);
            break StopReason::StopIdFound { page: page_num };
        }

        records.extend(page);
        page_num += 1;
    };

    Ok(Harvest {
        records,
        pages_fetched: page_num,
        stop_reason,
    })
}
