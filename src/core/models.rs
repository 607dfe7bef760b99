// @file: kline_ingestion/src/core/models.rs
// @description: Request, cursor, raw and normalized kline structures shared by the fetch pipeline.
// @author: LAS.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::core::error::{IngestionError, Result};


//
// EXCHANGE & MARKET TYPES
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketType {
    Spot,
    LinearFuture, // USDT-M
    InverseFuture, // COIN-M
}

impl MarketType {
    pub fn klines_path(&self) -> &'static str {
        match self {
            MarketType::Spot => "/api/v3/klines",
            MarketType::LinearFuture => "/fapi/v1/klines",
            MarketType::InverseFuture => "/dapi/v1/klines",
        }
    }
}

impl fmt::Display for MarketType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}


//
// REQUEST
//

pub const DEFAULT_PAGE_LIMIT: u32 = 1000;
/// Largest `limit` the klines endpoints accept.
pub const MAX_PAGE_LIMIT: u32 = 1500;

/// One symbol's fetch job. Built once from configuration and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolRequest {
    pub symbol: String,
    pub interval: String,
    pub start: String,
    pub end: Option<String>,
    pub limit: u32,
}

impl SymbolRequest {
    pub fn new(symbol: impl Into<String>, interval: impl Into<String>, start: impl Into<String>) -> Self {
        SymbolRequest {
            symbol: symbol.into().to_uppercase(),
            interval: interval.into(),
            start: start.into(),
            end: None,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }

    pub fn with_end(mut self, end: Option<String>) -> Self {
        self.end = end;
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit.clamp(1, MAX_PAGE_LIMIT);
        self
    }
}


//
// CURSOR
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KlineWindow {
    pub start_ms: i64,
    pub end_ms: i64,
    pub last_close_ms: Option<i64>,
}

impl KlineWindow {
    // #1. Resolve against the wall clock
    pub fn resolve(request: &SymbolRequest) -> Result<Self> {
        Self::resolve_at(request, Utc::now())
    }

    // #2. Resolve against an explicit "now"
    // An open end is pinned to `now` truncated to whole seconds.
    pub fn resolve_at(request: &SymbolRequest, now: DateTime<Utc>) -> Result<Self> {
        let start_ms = parse_calendar_ms(&request.start)?;
        let end_ms = match &request.end {
            Some(end) => parse_calendar_ms(end)?,
            None => now.timestamp() * 1000,
        };

        if end_ms < start_ms {
            return Err(IngestionError::InvalidWindow { start_ms, end_ms });
        }

        Ok(KlineWindow { start_ms, end_ms, last_close_ms: None })
    }

    /// `startTime` for the next page request.
    pub fn next_start(&self) -> i64 {
        self.last_close_ms.unwrap_or(self.start_ms)
    }

    pub fn reached_end(&self) -> bool {
        matches!(self.last_close_ms, Some(last) if last >= self.end_ms)
    }

    /// Moves the cursor forward. Returns false when `close_ms` would not advance it.
    pub fn advance(&mut self, close_ms: i64) -> bool {
        if let Some(last) = self.last_close_ms {
            if close_ms <= last {
                return false;
            }
        }
        self.last_close_ms = Some(close_ms);
        true
    }
}

/// Accepts `YYYY-MM-DD` (midnight UTC) or `YYYY-MM-DDTHH:MM:SS` / `YYYY-MM-DD HH:MM:SS`.
pub fn parse_calendar_ms(value: &str) -> Result<i64> {
    let trimmed = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&midnight).timestamp_millis());
        }
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(Utc.from_utc_datetime(&naive).timestamp_millis());
        }
    }

    Err(IngestionError::InvalidDate(value.to_string()))
}


//
// RAW WIRE RECORD
//

// Binance returns klines positionally:
// [ Open Time, Open, High, Low, Close, Volume, Close Time, Quote Volume, Trades,
//   Taker Buy Base, Taker Buy Quote, Ignore ]
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RawKline {
    pub open_time: i64,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: String,
    pub close_time: i64,
    pub quote_asset_volume: String,
    pub number_of_trades: u64,
    pub taker_buy_base_volume: String,
    pub taker_buy_quote_volume: String,
    pub ignore: Value,
}

/// What a single page request produced.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Page(Vec<RawKline>),
    Throttled { code: Option<i64>, message: Option<String> },
}


//
// NORMALIZED OUTPUT
//

pub const OUTPUT_COLUMNS: [&str; 7] = ["Date", "Time", "Open", "High", "Low", "Close", "Volume"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KlineRow {
    pub date: String,
    pub time: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: String,
}

impl KlineRow {
    pub fn from_raw(raw: &RawKline) -> Result<Self> {
        let opened = Utc
            .timestamp_millis_opt(raw.open_time)
            .single()
            .ok_or_else(|| IngestionError::UnexpectedPayload(format!(
                "open time {} is out of range", raw.open_time
            )))?;

        Ok(KlineRow {
            date: opened.format("%d/%m/%Y").to_string(),
            time: opened.format("%H:%M:%S").to_string(),
            open: raw.open.clone(),
            high: raw.high.clone(),
            low: raw.low.clone(),
            close: raw.close.clone(),
            volume: raw.volume.clone(),
        })
    }

    pub fn as_record(&self) -> [&str; 7] {
        [
            self.date.as_str(),
            self.time.as_str(),
            self.open.as_str(),
            self.high.as_str(),
            self.low.as_str(),
            self.close.as_str(),
            self.volume.as_str(),
        ]
    }
}

/// Accumulated rows for one symbol, in arrival order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KlineTable {
    rows: Vec<KlineRow>,
}

impl KlineTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, rows: impl IntoIterator<Item = KlineRow>) {
        self.rows.extend(rows);
    }

    pub fn rows(&self) -> &[KlineRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
