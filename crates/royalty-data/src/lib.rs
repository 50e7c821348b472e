//! Data ingestion and aggregation layer for the royalty ledger.
//!
//! Responsible for discovering statement CSVs, reconciling their vendor
//! schemas into canonical records, accumulating the monthly ledgers,
//! persisting them as flat tables, and running the trailing-window
//! valuation over the persisted ledger.

pub mod aggregator;
pub mod ledger;
pub mod locator;
pub mod pipeline;
pub mod reader;
pub mod schema;
pub mod valuation;

pub use royalty_core as core;
