// @file: kline_ingestion/src/core/mod.rs
// @description: Exports domain logic and data structures.
// @author: LAS.

pub mod error;
pub mod models;
pub mod retry;
pub mod paginator;
pub mod engine;
pub mod interfaces;
