// @file: kline_ingestion/src/tests/mod.rs
// @description: Test suites and the scripted kline source they share.
// @author: LAS.

#[cfg(test)]
pub mod support;
#[cfg(test)]
mod output_tests;
#[cfg(test)]
mod config_tests;
