// @file: kline_ingestion/src/utils/output.rs
// @description: Writes a finished kline table as a tab-separated file with a fixed header.
// @author: LAS.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::core::error::Result;
use crate::core::models::{KlineTable, OUTPUT_COLUMNS};

pub fn output_path(dir: impl AsRef<Path>, symbol: &str, interval: &str) -> PathBuf {
    dir.as_ref().join(format!("{}_{}_data.csv", symbol, interval))
}

/// Writes the whole table in one go. The header is emitted even when there are no rows.
pub fn write_table(dir: impl AsRef<Path>, symbol: &str, interval: &str, table: &KlineTable) -> Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let path = output_path(dir, symbol, interval);
    let file = fs::File::create(&path)?;
    write_tsv(file, table)?;
    Ok(path)
}

pub fn write_tsv<W: Write>(sink: W, table: &KlineTable) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(sink);

    writer.write_record(OUTPUT_COLUMNS)?;
    for row in table.rows() {
        writer.write_record(row.as_record())?;
    }

    writer.flush()?;
    Ok(())
}
