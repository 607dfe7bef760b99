// @file: kline_ingestion/src/tests/output_tests.rs
// @description: Tab-separated output layout and file naming.
// @author: LAS.

use std::fs;

use crate::core::models::{KlineRow, KlineTable};
use crate::tests::support::{kline, scratch_dir};
use crate::utils::output::{output_path, write_table, write_tsv};

const HEADER: &str = "Date\tTime\tOpen\tHigh\tLow\tClose\tVolume";

fn table_of(opens: &[i64]) -> KlineTable {
    let mut table = KlineTable::new();
    table.extend(opens.iter().map(|open| KlineRow::from_raw(&kline(*open, open + 59_999)).unwrap()));
    table
}

#[test]
fn every_line_has_seven_tab_separated_columns() {
    // Two "pages" merged into one table
    let mut table = table_of(&[1_666_656_000_000, 1_666_656_060_000]);
    table.extend(table_of(&[1_666_656_120_000]).rows().to_vec());

    let mut buffer: Vec<u8> = Vec::new();
    write_tsv(&mut buffer, &table).unwrap();
    let text = String::from_utf8(buffer).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], HEADER);
    assert_eq!(lines[1], "25/10/2022\t00:00:00\t20000.10\t20010.00\t19990.50\t20005.00\t12.345");
    assert_eq!(lines[3].split('\t').nth(1), Some("00:02:00"));
    assert!(lines.iter().all(|line| line.split('\t').count() == 7));
}

#[test]
fn empty_table_still_gets_a_header() {
    let mut buffer: Vec<u8> = Vec::new();
    write_tsv(&mut buffer, &KlineTable::new()).unwrap();

    assert_eq!(String::from_utf8(buffer).unwrap(), format!("{}\n", HEADER));
}

#[test]
fn writes_named_file_and_creates_directory() {
    let dir = scratch_dir("output").join("csv_data_futures");
    let path = write_table(&dir, "BTCUSDT", "1m", &table_of(&[1_666_656_000_000])).unwrap();

    assert_eq!(path, output_path(&dir, "BTCUSDT", "1m"));
    assert_eq!(path.file_name().unwrap(), "BTCUSDT_1m_data.csv");

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.starts_with(HEADER));
    assert_eq!(written.lines().count(), 2);

    let _ = fs::remove_dir_all(dir.parent().unwrap());
}
