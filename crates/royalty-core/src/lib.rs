//! Domain model and calculation layer for the royalty ledger.
//!
//! Holds the canonical record and ledger types shared by every stage of the
//! pipeline, period-key resolution, the statistical helpers used by the
//! valuation engine, the pipeline error type and the CLI settings.

pub mod error;
pub mod models;
pub mod period;
pub mod settings;
pub mod stats;
