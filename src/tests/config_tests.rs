// @file: kline_ingestion/src/tests/config_tests.rs
// @description: Built-in configuration defaults and the requests derived from them.
// @author: LAS.

use crate::core::models::{MarketType, DEFAULT_PAGE_LIMIT};
use crate::core::retry::RetryPolicy;
use crate::utils::config::{AppConfig, SymbolSpec};

#[test]
fn defaults_target_usdt_futures() {
    let config = AppConfig::defaults().unwrap();

    assert_eq!(config.market, MarketType::LinearFuture);
    assert_eq!(config.rest_base_url(), "https://fapi.binance.com");
    assert_eq!(config.interval, "1m");
    assert_eq!(config.page_limit, DEFAULT_PAGE_LIMIT);
    assert_eq!(config.output_dir, "./csv_data_futures");
    assert_eq!(config.retry_policy(), RetryPolicy::default());
}

#[test]
fn default_symbols_become_requests() {
    let mut config = AppConfig::defaults().unwrap();
    config.symbols.push(SymbolSpec {
        symbol: "ethusdt".to_string(),
        start: "2023-01-01".to_string(),
        end: Some("2023-02-01".to_string()),
    });

    let requests = config.symbol_requests();

    assert_eq!(requests.len(), 3);
    assert_eq!(requests[0].symbol, "BTCUSDT");
    assert_eq!(requests[0].start, "2022-10-25");
    assert_eq!(requests[1].symbol, "1INCHUSDT");
    assert_eq!(requests[1].start, "2022-10-20");
    assert_eq!(requests[2].symbol, "ETHUSDT");
    assert_eq!(requests[2].end.as_deref(), Some("2023-02-01"));
    assert_eq!(requests[0].end, None);
    assert!(requests.iter().all(|r| r.interval == "1m" && r.limit == 1000));
}

#[test]
fn spot_market_switches_base_url() {
    let mut config = AppConfig::defaults().unwrap();
    config.market = MarketType::Spot;
    assert_eq!(config.rest_base_url(), "https://api.binance.com");
}
