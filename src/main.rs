// @file: kline_ingestion/src/main.rs
// @description: Backfills historical klines for every configured symbol, one file per symbol.
// @author: LAS.

use anyhow::{bail, Context, Result};
use kline_ingestion::connectors;
use kline_ingestion::core::engine::IngestionEngine;
use kline_ingestion::core::paginator::KlinePaginator;
use kline_ingestion::utils::config::AppConfig;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration (.env, optional config file, APP_* overrides)
    dotenv::dotenv().ok();
    let config: AppConfig = AppConfig::load().context("Failed to load configuration")?;

    // 2. Initialize Logger, RUST_LOG wins over the configured level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_level.as_str())).init();

    info!(
        ">>> Kline ingestion starting: {} symbols, {} on {} <<<",
        config.symbols.len(),
        config.interval,
        config.market
    );

    // 3. Setup Source & Engine
    let (source, endpoint) = connectors::build_source(&config).context("Failed to build kline source")?;
    let paginator = KlinePaginator::new(source, endpoint, config.retry_policy());
    let engine = IngestionEngine::new(paginator, &config.output_dir);

    // 4. Run every symbol to completion
    let outcomes = engine.run_all(config.symbol_requests()).await;

    let failed: Vec<&str> = outcomes
        .iter()
        .filter(|(_, outcome)| outcome.is_err())
        .map(|(symbol, _)| symbol.as_str())
        .collect();

    if !failed.is_empty() {
        bail!("ingestion failed for: {}", failed.join(", "));
    }

    info!(">>> All {} symbols written to {} <<<", outcomes.len(), config.output_dir);
    Ok(())
}
