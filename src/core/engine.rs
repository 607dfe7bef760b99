// @file: kline_ingestion/src/core/engine.rs
// @description: Runs one paginator per configured symbol concurrently and writes each symbol's file.
// @author: LAS.

use std::path::PathBuf;
use std::time::Instant;

use futures_util::future::join_all;
use log::{error, info};
use tokio::task::{self, JoinHandle};
use tokio::time::Duration;

use crate::core::error::{IngestionError, Result};
use crate::core::models::SymbolRequest;
use crate::core::paginator::KlinePaginator;
use crate::utils::output;


//
// TYPE DEFINITIONS
//

#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub symbol: String,
    pub rows: usize,
    pub path: PathBuf,
    pub elapsed: Duration,
}

pub type SymbolOutcome = (String, Result<RunReport>);


//
// ENGINE STRUCT
//

#[derive(Clone)]
pub struct IngestionEngine {
    paginator: KlinePaginator,
    output_dir: PathBuf,
}

impl IngestionEngine {
    pub fn new(paginator: KlinePaginator, output_dir: impl Into<PathBuf>) -> Self {
        IngestionEngine { paginator, output_dir: output_dir.into() }
    }

    //
    // PUBLIC INTERFACE
    //

    /// Spawns every symbol at once. Runs share nothing, so one failure does not stop the others.
    pub async fn run_all(&self, requests: Vec<SymbolRequest>) -> Vec<SymbolOutcome> {
        // #1. Fan out
        let (symbols, handles): (Vec<String>, Vec<JoinHandle<Result<RunReport>>>) = requests
            .into_iter()
            .map(|request| {
                let engine = self.clone();
                let symbol = request.symbol.clone();
                (symbol, tokio::spawn(async move { engine.run_symbol(&request).await }))
            })
            .unzip();

        // #2. Collect in configuration order
        let joined = join_all(handles).await;
        let mut outcomes: Vec<SymbolOutcome> = Vec::with_capacity(joined.len());
        for (symbol, joined) in symbols.into_iter().zip(joined) {
            let outcome = match joined {
                Ok(result) => result,
                Err(e) => Err(IngestionError::from(e)),
            };

            if let Err(e) = &outcome {
                error!("{}: ingestion failed: {}", symbol, e);
            }
            outcomes.push((symbol, outcome));
        }

        outcomes
    }

    pub async fn run_symbol(&self, request: &SymbolRequest) -> Result<RunReport> {
        let started = Instant::now();
        info!("{}: fetching {} klines from {}", request.symbol, request.interval, request.start);

        // Nothing is written unless the whole window was fetched.
        let table = self.paginator.run(request).await?;

        // WRITING_OUTPUT
        // File I/O runs on the blocking pool so other symbols keep fetching.
        let rows = table.len();
        let dir = self.output_dir.clone();
        let symbol = request.symbol.clone();
        let interval = request.interval.clone();
        let path = task::spawn_blocking(move || output::write_table(&dir, &symbol, &interval, &table)).await??;
        let elapsed = started.elapsed();

        info!(
            "{}: wrote {} rows to {} in {:.3}s",
            request.symbol,
            rows,
            path.display(),
            elapsed.as_secs_f64()
        );

        Ok(RunReport {
            symbol: request.symbol.clone(),
            rows,
            path,
            elapsed,
        })
    }
}
