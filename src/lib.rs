//! # u-toll
//!
//! Table transformations for toll networks: cumulative distance matrices,
//! matrix unrolling, threshold filters, and time-windowed vehicle toll rates.
//!
//! ## Modules
//!
//! - [`models`] — Row types (Edge, TollRow, ScheduledTollRow) and ingestion records
//! - [`distance`] — Symmetric distance matrix and its unrolling
//! - [`filter`] — Percentage band filter around a reference location
//! - [`toll`] — Per-class toll rates, time discounts, and window coverage
//! - [`config`] — Tariff configuration loaded from JSON
//! - [`pipeline`] — Whole-table flows from raw records to toll tables
//! - [`error`] — Crate error type

pub mod config;
pub mod distance;
pub mod error;
pub mod filter;
pub mod models;
pub mod pipeline;
pub mod toll;

pub use error::TollError;

#[cfg(test)]
pub(crate) mod test_support {
    use tracing::Level;

    /// Routes tracing output through the test harness's captured writer.
    pub(crate) fn init_test_logging() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(Level::TRACE)
            .with_test_writer()
            .try_init();
    }
}
