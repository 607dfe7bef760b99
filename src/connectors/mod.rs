// @file: kline_ingestion/src/connectors/mod.rs
// @description: Factory for the exchange-facing kline source.
// @author: LAS.

pub mod binance_rest;

use std::sync::Arc;

use crate::core::error::Result;
use crate::core::interfaces::KlineSource;
use crate::utils::config::AppConfig;
use binance_rest::BinanceRestClient;
use tokio::time::Duration;
use url::Url;

//
// FACTORY FUNCTION
//

/// Builds the shared HTTP source and the klines endpoint for the configured market.
pub fn build_source(config: &AppConfig) -> Result<(Arc<dyn KlineSource>, Url)> {
    let client = BinanceRestClient::new(Duration::from_secs(config.request_timeout_secs))?;
    let endpoint = binance_rest::klines_endpoint(config.rest_base_url(), config.market)?;
    Ok((Arc::new(client), endpoint))
}
