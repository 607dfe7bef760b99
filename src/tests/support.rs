// @file: kline_ingestion/src/tests/support.rs
// @description: Scripted KlineSource that replays canned outcomes and records every requested URL.
// @author: LAS.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::core::error::Result;
use crate::core::interfaces::KlineSource;
use crate::core::models::{FetchOutcome, RawKline};


//
// MOCK SOURCE
//

pub struct ScriptedSource {
    script: Mutex<VecDeque<FetchOutcome>>,
    // Served once the script runs dry.
    fallback: FetchOutcome,
    pub calls: Mutex<Vec<Url>>,
}

impl ScriptedSource {
    pub fn new(script: Vec<FetchOutcome>) -> Self {
        Self::with_fallback(script, FetchOutcome::Page(Vec::new()))
    }

    pub fn with_fallback(script: Vec<FetchOutcome>, fallback: FetchOutcome) -> Self {
        ScriptedSource {
            script: Mutex::new(script.into()),
            fallback,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Url> {
        self.calls.lock().unwrap().clone()
    }

    pub fn start_times(&self) -> Vec<i64> {
        self.calls()
            .iter()
            .map(|url| query_value(url, "startTime").parse().unwrap())
            .collect()
    }
}

#[async_trait]
impl KlineSource for ScriptedSource {
    async fn fetch_page(&self, url: &Url) -> Result<FetchOutcome> {
        self.calls.lock().unwrap().push(url.clone());
        let next = self.script.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| self.fallback.clone()))
    }
}


//
// FIXTURES
//

pub fn kline(open_time: i64, close_time: i64) -> RawKline {
    RawKline {
        open_time,
        open: "20000.10".to_string(),
        high: "20010.00".to_string(),
        low: "19990.50".to_string(),
        close: "20005.00".to_string(),
        volume: "12.345".to_string(),
        close_time,
        quote_asset_volume: "246913.58".to_string(),
        number_of_trades: 42,
        taker_buy_base_volume: "6.1".to_string(),
        taker_buy_quote_volume: "122000.00".to_string(),
        ignore: Value::String("0".to_string()),
    }
}

pub fn minute_page(first_open: i64, count: i64) -> FetchOutcome {
    FetchOutcome::Page(
        (0..count)
            .map(|i| {
                let open = first_open + i * 60_000;
                kline(open, open + 59_999)
            })
            .collect(),
    )
}

pub fn throttled() -> FetchOutcome {
    FetchOutcome::Throttled {
        code: Some(-1003),
        message: Some("Too many requests".to_string()),
    }
}

pub fn query_value(url: &Url, key: &str) -> String {
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
        .unwrap_or_default()
}

pub fn scratch_dir(label: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    std::env::temp_dir().join(format!("kline_ingestion_{}_{}_{}", label, std::process::id(), nanos))
}
