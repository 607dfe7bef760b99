// @file: kline_ingestion/src/core/interfaces.rs
// @description: Seam between the paginator and whatever serves kline pages.
// @author: LAS.

use crate::core::error::Result;
use crate::core::models::FetchOutcome;
use async_trait::async_trait;
use url::Url;

//
// TRAIT DEFINITIONS
//

#[async_trait]
pub trait KlineSource: Send + Sync {
    // #1. Fetch exactly one page
    // No retries here; the caller decides what to do with `Throttled`.
    async fn fetch_page(&self, url: &Url) -> Result<FetchOutcome>;
}
