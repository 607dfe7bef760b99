// @file: kline_ingestion/src/lib.rs
// @description: Exposes the modular architecture for integration testing and external usage.
// @author: LAS.


pub mod core;
pub mod connectors;
pub mod utils;
mod tests;
