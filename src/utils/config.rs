// @file: kline_ingestion/src/utils/config.rs
// @description: Run configuration: symbols to backfill, market endpoints, output and retry settings.
// @author: LAS.

use serde::Deserialize;
use config::{Config, ConfigError, File, Environment};
use tokio::time::Duration;

use crate::core::models::{MarketType, SymbolRequest};
use crate::core::retry::RetryPolicy;

//
// TYPE DEFINITIONS
//

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SymbolSpec {
    pub symbol: String,
    pub start: String,
    #[serde(default)]
    pub end: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,

    // Binance REST
    pub market: MarketType,
    pub binance_spot_rest_url: String,
    pub binance_linear_future_rest_url: String,
    pub binance_inverse_future_rest_url: String,
    pub request_timeout_secs: u64,

    // Pagination
    pub interval: String,
    pub page_limit: u32,
    #[serde(default = "default_symbols")]
    pub symbols: Vec<SymbolSpec>,

    // Throttling
    pub retry_base_delay_secs: u64,
    pub retry_multiplier: f64,
    pub retry_max_delay_secs: u64,
    pub retry_max_attempts: u32,

    // Output
    pub output_dir: String,
}

fn default_symbols() -> Vec<SymbolSpec> {
    vec![
        SymbolSpec { symbol: "BTCUSDT".to_string(), start: "2022-10-25".to_string(), end: None },
        SymbolSpec { symbol: "1INCHUSDT".to_string(), start: "2022-10-20".to_string(), end: None },
    ]
}

impl AppConfig {
    //
    // PUBLIC INTERFACE
    //

    pub fn load() -> Result<Self, ConfigError> {
        Self::builder()?
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("APP"))
            .build()?
            .try_deserialize()
    }

    /// Defaults only, no file or environment overrides.
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::builder()?.build()?.try_deserialize()
    }

    fn builder() -> Result<config::builder::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("log_level", "info")?

            // Binance Endpoints
            .set_default("market", "LINEAR_FUTURE")?
            .set_default("binance_spot_rest_url", "https://api.binance.com")?
            .set_default("binance_linear_future_rest_url", "https://fapi.binance.com")?
            .set_default("binance_inverse_future_rest_url", "https://dapi.binance.com")?
            .set_default("request_timeout_secs", 30)?

            // Pagination
            .set_default("interval", "1m")?
            .set_default("page_limit", 1000)?

            // Throttling (60s doubling, capped at 8 minutes)
            .set_default("retry_base_delay_secs", 60)?
            .set_default("retry_multiplier", 2.0)?
            .set_default("retry_max_delay_secs", 480)?
            .set_default("retry_max_attempts", 10)?

            .set_default("output_dir", "./csv_data_futures")
    }

    pub fn rest_base_url(&self) -> &str {
        match self.market {
            MarketType::Spot => &self.binance_spot_rest_url,
            MarketType::LinearFuture => &self.binance_linear_future_rest_url,
            MarketType::InverseFuture => &self.binance_inverse_future_rest_url,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            base_delay: Duration::from_secs(self.retry_base_delay_secs),
            multiplier: self.retry_multiplier,
            max_delay: Duration::from_secs(self.retry_max_delay_secs),
            max_attempts: self.retry_max_attempts,
        }
    }

    pub fn symbol_requests(&self) -> Vec<SymbolRequest> {
        self.symbols
            .iter()
            .map(|spec| {
                SymbolRequest::new(&spec.symbol, &self.interval, &spec.start)
                    .with_end(spec.end.clone())
                    .with_limit(self.page_limit)
            })
            .collect()
    }
}
