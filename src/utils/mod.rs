// @file: kline_ingestion/src/utils/mod.rs
// @description: Configuration loading and file output helpers.
// @author: LAS.

pub mod config;
pub mod output;
