// @file: kline_ingestion/src/core/paginator.rs
// @description: Walks a symbol's time window page by page, retrying throttled pages and normalizing rows.
// @author: LAS.

use std::sync::Arc;

use log::{debug, info, warn};
use tokio::time::sleep;
use url::Url;

use crate::core::error::{IngestionError, Result};
use crate::core::interfaces::KlineSource;
use crate::core::models::{FetchOutcome, KlineRow, KlineTable, KlineWindow, RawKline, SymbolRequest};
use crate::core::retry::RetryPolicy;


//
// PAGINATOR
//

#[derive(Clone)]
pub struct KlinePaginator {
    source: Arc<dyn KlineSource>,
    endpoint: Url,
    retry: RetryPolicy,
}

impl KlinePaginator {
    /// `endpoint` is the full klines URL without a query, e.g. `https://fapi.binance.com/fapi/v1/klines`.
    pub fn new(source: Arc<dyn KlineSource>, endpoint: Url, retry: RetryPolicy) -> Self {
        KlinePaginator { source, endpoint, retry }
    }

    //
    // PUBLIC INTERFACE
    //

    pub async fn run(&self, request: &SymbolRequest) -> Result<KlineTable> {
        // #1. RESOLVING_WINDOW
        let window = KlineWindow::resolve(request)?;
        let (table, _) = self.run_window(request, window).await?;
        Ok(table)
    }

    /// Runs over an already resolved window. Also hands back the cursor where the run stopped.
    pub async fn run_window(&self, request: &SymbolRequest, mut window: KlineWindow) -> Result<(KlineTable, KlineWindow)> {
        let mut table = KlineTable::new();
        let mut pages: usize = 0;

        debug!(
            "{}: window {} -> {} ({} per page)",
            request.symbol, window.start_ms, window.end_ms, request.limit
        );

        loop {
            // #2. FETCHING_PAGE
            let url = self.page_url(request, &window);
            let raw = self.fetch_with_retry(&request.symbol, &url).await?;
            pages += 1;

            // #3. EMPTY_PAGE
            let Some(last) = raw.last() else {
                debug!("{}: empty page after {} pages, done", request.symbol, pages);
                break;
            };
            let last_close = last.close_time;

            // #4. GOT_ROWS
            let rows = normalize_page(&raw, window.end_ms)?;
            debug!(
                "{}: page {} -> {} rows (cursor {})",
                request.symbol, pages, rows.len(), last_close
            );

            // A page that does not move the cursor is a repeat of the previous one.
            if !window.advance(last_close) {
                warn!(
                    "{}: cursor stalled at {} (page ended at {}), stopping",
                    request.symbol, window.next_start(), last_close
                );
                break;
            }
            table.extend(rows);

            if window.reached_end() {
                break;
            }
        }

        info!("{}: collected {} rows over {} pages", request.symbol, table.len(), pages);
        Ok((table, window))
    }

    pub fn page_url(&self, request: &SymbolRequest, window: &KlineWindow) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .clear()
            .append_pair("symbol", &request.symbol.to_uppercase())
            .append_pair("interval", &request.interval)
            .append_pair("limit", &request.limit.to_string())
            .append_pair("startTime", &window.next_start().to_string())
            .append_pair("endTime", &window.end_ms.to_string());
        url
    }


    //
    // INTERNAL HELPERS
    //

    // RATE_LIMITED loops back to FETCHING_PAGE with the same URL.
    async fn fetch_with_retry(&self, symbol: &str, url: &Url) -> Result<Vec<RawKline>> {
        let mut attempts: u32 = 0;

        loop {
            match self.source.fetch_page(url).await? {
                FetchOutcome::Page(raw) => return Ok(raw),
                FetchOutcome::Throttled { code, message } => {
                    attempts += 1;
                    if !self.retry.allows(attempts) {
                        return Err(IngestionError::RetriesExhausted {
                            symbol: symbol.to_string(),
                            attempts,
                        });
                    }

                    let delay = self.retry.delay_for(attempts);
                    warn!(
                        "{}: throttled (code {:?}, {}), retry {} in {:?}",
                        symbol,
                        code,
                        message.as_deref().unwrap_or("no message"),
                        attempts,
                        delay
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

/// Converts a raw page into output rows, dropping candles that open after `end_ms`.
pub fn normalize_page(raw: &[RawKline], end_ms: i64) -> Result<Vec<KlineRow>> {
    raw.iter()
        .filter(|kline| kline.open_time <= end_ms)
        .map(KlineRow::from_raw)
        .collect()
}
