//! Vehicle toll pricing.
//!
//! - [`TollRateEngine`] — Fixed per-class multipliers on distance
//! - [`TimeDiscountScheduler`] — Weekday interval and weekend discounts
//! - [`incorrect_timestamps`] — Per-pair travel-window completeness check

mod coverage;
mod discount;
mod rates;

pub use coverage::incorrect_timestamps;
pub use discount::{
    is_weekend, DiscountInterval, DiscountSchedule, IntervalMatch, TimeDiscountScheduler,
};
pub use rates::{TollRateEngine, STANDARD_MULTIPLIERS};
