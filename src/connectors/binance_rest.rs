// @file: kline_ingestion/src/connectors/binance_rest.rs
// @description: HTTP client for fetching historical kline pages from Binance.
// @author: LAS.

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tokio::time::Duration;
use url::Url;

use crate::core::error::{IngestionError, Result};
use crate::core::interfaces::KlineSource;
use crate::core::models::{FetchOutcome, MarketType, RawKline};


//
// CLIENT
//

#[derive(Clone)]
pub struct BinanceRestClient {
    client: Client,
}

impl BinanceRestClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("kline_ingestion/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(BinanceRestClient { client })
    }

    pub fn with_client(client: Client) -> Self {
        BinanceRestClient { client }
    }
}

/// Joins a REST base URL (e.g. `https://fapi.binance.com`) with the market's klines path.
pub fn klines_endpoint(base_url: &str, market: MarketType) -> Result<Url> {
    let base = Url::parse(base_url)?;
    Ok(base.join(market.klines_path())?)
}


//
// PUBLIC INTERFACE
//

#[async_trait]
impl KlineSource for BinanceRestClient {
    async fn fetch_page(&self, url: &Url) -> Result<FetchOutcome> {
        // #1. Execute Request
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        // #2. Decode
        // Binance answers throttling (429/418) and request errors with a JSON object.
        let body = response.text().await?;
        debug!("GET {} -> {} ({} bytes)", url, status, body.len());

        let json: Value = serde_json::from_str(&body).map_err(|e| {
            IngestionError::UnexpectedPayload(format!("status {}: {} ({})", status, e, preview(&body)))
        })?;

        classify_body(status, json)
    }
}


//
// INTERNAL HELPERS
//

pub fn classify_body(status: StatusCode, json: Value) -> Result<FetchOutcome> {
    match json {
        Value::Array(items) => {
            // #1. Iterate and Map
            let mut klines: Vec<RawKline> = Vec::with_capacity(items.len());
            for item in items {
                klines.push(serde_json::from_value(item)?);
            }
            Ok(FetchOutcome::Page(klines))
        }
        Value::Object(map) => {
            let code = map.get("code").and_then(Value::as_i64);
            let message = map.get("msg").and_then(Value::as_str).map(str::to_string);

            // #2. Retrying a malformed request cannot succeed
            if is_rejection(status) {
                return Err(IngestionError::Rejected { status: status.as_u16(), code, message });
            }
            Ok(FetchOutcome::Throttled { code, message })
        }
        other => Err(IngestionError::UnexpectedPayload(format!(
            "expected array or object, got {}",
            preview(&other.to_string())
        ))),
    }
}

// 4xx other than 429 (rate limit) and 418 (IP ban while throttled).
fn is_rejection(status: StatusCode) -> bool {
    status.is_client_error()
        && status != StatusCode::TOO_MANY_REQUESTS
        && status != StatusCode::IM_A_TEAPOT
}

fn preview(body: &str) -> String {
    body.chars().take(120).collect()
}
