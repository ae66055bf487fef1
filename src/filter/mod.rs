//! Row filters over edge tables.

mod threshold;

pub use threshold::{IdMean, ThresholdFilter, DEFAULT_THRESHOLD_RATIO};
