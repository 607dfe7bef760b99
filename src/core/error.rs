// @file: kline_ingestion/src/core/error.rs
// @description: Error type shared by the fetcher, paginator and output writer.
// @author: LAS.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, IngestionError>;

#[derive(Debug, Error)]
pub enum IngestionError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Url(#[from] url::ParseError),
    #[error(transparent)]
    Join(#[from] tokio::task::JoinError),
    #[error("invalid calendar date `{0}` (expected YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("window end {end_ms} precedes window start {start_ms}")]
    InvalidWindow { start_ms: i64, end_ms: i64 },
    #[error("unexpected payload: {0}")]
    UnexpectedPayload(String),
    #[error("request rejected with status {status} (code {code:?}): {}", .message.as_deref().unwrap_or("no message"))]
    Rejected { status: u16, code: Option<i64>, message: Option<String> },
    #[error("{symbol}: still throttled after {attempts} attempts")]
    RetriesExhausted { symbol: String, attempts: u32 },
}
