//! Time-of-day and day-of-week toll discounts.
//!
//! # Rules
//!
//! A row is classified by the weekday of its start. Weekend rows take one
//! flat factor. Weekday rows are tested against an ordered list of
//! closed intervals on the time of day; the first interval that matches
//! supplies the factor and later intervals are not consulted.
//!
//! ```text
//! weekday  00:00:00 ..= 10:00:00   x0.8
//!          10:00:00 ..= 18:00:00   x1.2
//!          18:00:00 ..= 23:59:59   x0.8
//! weekend  all day                 x0.7
//! ```
//!
//! A start at exactly 10:00:00 or 18:00:00 therefore takes the earlier
//! interval's factor.

use std::collections::BTreeSet;

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use crate::error::TollError;
use crate::models::{ScheduledTollRow, VehicleClass, WeekTime};

/// A closed time-of-day interval with its discount factor.
///
/// # Examples
///
/// ```
/// use chrono::NaiveTime;
/// use u_toll::toll::DiscountInterval;
///
/// let t = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap();
/// let iv = DiscountInterval::new(t(10), t(18), 1.2).unwrap();
/// assert!(iv.contains(t(10)));
/// assert!(iv.contains(t(18)));
/// assert!(!iv.contains(t(19)));
/// assert!(DiscountInterval::new(t(18), t(10), 1.2).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscountInterval {
    start: NaiveTime,
    end: NaiveTime,
    factor: f64,
}

impl DiscountInterval {
    /// Creates an interval.
    ///
    /// Returns `None` if `start > end` or the factor is negative or
    /// non-finite.
    pub fn new(start: NaiveTime, end: NaiveTime, factor: f64) -> Option<Self> {
        if start > end || !factor.is_finite() || factor < 0.0 {
            return None;
        }
        Some(Self { start, end, factor })
    }

    /// First time of day covered.
    pub fn start(&self) -> NaiveTime {
        self.start
    }

    /// Last time of day covered.
    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// Multiplier applied to discounted columns.
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Returns `true` if `time` lies within `[start, end]`.
    pub fn contains(&self, time: NaiveTime) -> bool {
        time >= self.start && time <= self.end
    }
}

/// Which part of a row's travel window must fall inside a weekday interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalMatch {
    /// Only the start time is tested.
    #[default]
    StartTime,
    /// Start and end time must both lie in the same interval. Rows that cross
    /// an interval boundary match nothing and stay undiscounted.
    StartAndEnd,
}

/// The full set of discount rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscountSchedule {
    /// Weekday intervals in matching order.
    pub weekday: Vec<DiscountInterval>,
    /// Flat factor for Saturday and Sunday.
    pub weekend_factor: f64,
    /// Columns that get rescaled. A class listed twice is still rescaled once.
    pub classes: BTreeSet<VehicleClass>,
    /// Interval matching policy for weekdays.
    pub matching: IntervalMatch,
}

impl Default for DiscountSchedule {
    fn default() -> Self {
        let hms = |h, m, s| NaiveTime::from_hms_opt(h, m, s).expect("literal time is valid");
        let interval = |start, end, factor| DiscountInterval { start, end, factor };
        Self {
            weekday: vec![
                interval(hms(0, 0, 0), hms(10, 0, 0), 0.8),
                interval(hms(10, 0, 0), hms(18, 0, 0), 1.2),
                interval(hms(18, 0, 0), hms(23, 59, 59), 0.8),
            ],
            weekend_factor: 0.7,
            classes: BTreeSet::from([VehicleClass::Car, VehicleClass::Bus, VehicleClass::Truck]),
            matching: IntervalMatch::StartTime,
        }
    }
}

impl DiscountSchedule {
    /// Checks that every factor is finite and nonnegative and every interval
    /// is ordered.
    pub fn validate(&self) -> Result<(), TollError> {
        if !self.weekend_factor.is_finite() || self.weekend_factor < 0.0 {
            return Err(TollError::InvalidConfig(format!(
                "weekend factor {} must be finite and nonnegative",
                self.weekend_factor
            )));
        }
        for (k, iv) in self.weekday.iter().enumerate() {
            if DiscountInterval::new(iv.start, iv.end, iv.factor).is_none() {
                return Err(TollError::InvalidConfig(format!(
                    "weekday interval {k} ({} - {}, x{}) is invalid",
                    iv.start, iv.end, iv.factor
                )));
            }
        }
        Ok(())
    }
}

/// Returns `true` for Saturday and Sunday.
pub fn is_weekend(day: Weekday) -> bool {
    matches!(day, Weekday::Sat | Weekday::Sun)
}

/// Rescales toll columns according to a [`DiscountSchedule`].
///
/// # Examples
///
/// ```
/// use u_toll::models::{Edge, ScheduledTollRow, WeekTime, TravelWindow};
/// use u_toll::toll::{TimeDiscountScheduler, TollRateEngine};
///
/// let toll = TollRateEngine::default().price(Edge::new(1, 2, 10.0).unwrap());
/// let window = TravelWindow::new(
///     WeekTime::parse("Saturday", "12:00:00").unwrap(),
///     WeekTime::parse("Saturday", "14:00:00").unwrap(),
/// );
/// let mut rows = vec![ScheduledTollRow::new(toll, window)];
///
/// TimeDiscountScheduler::default().apply(&mut rows);
/// assert!((rows[0].toll.rates.car - 12.0 * 0.7).abs() < 1e-10);
/// assert!((rows[0].toll.rates.moto - 8.0).abs() < 1e-10);
/// assert_eq!(rows[0].discount(), Some(0.7));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeDiscountScheduler {
    schedule: DiscountSchedule,
}

impl TimeDiscountScheduler {
    /// Creates a scheduler from validated rules.
    pub fn new(schedule: DiscountSchedule) -> Result<Self, TollError> {
        schedule.validate()?;
        Ok(Self { schedule })
    }

    /// Switches the weekday matching policy.
    pub fn with_matching(mut self, matching: IntervalMatch) -> Self {
        self.schedule.matching = matching;
        self
    }

    /// Replaces the set of discounted columns.
    pub fn with_classes(mut self, classes: impl IntoIterator<Item = VehicleClass>) -> Self {
        self.schedule.classes = classes.into_iter().collect();
        self
    }

    /// Rules in use.
    pub fn schedule(&self) -> &DiscountSchedule {
        &self.schedule
    }

    /// The factor for a travel window, or `None` if no rule matches.
    pub fn factor_for(&self, start: WeekTime, end: WeekTime) -> Option<f64> {
        if is_weekend(start.day()) {
            return Some(self.schedule.weekend_factor);
        }
        self.schedule
            .weekday
            .iter()
            .find(|iv| match self.schedule.matching {
                IntervalMatch::StartTime => iv.contains(start.time()),
                IntervalMatch::StartAndEnd => {
                    iv.contains(start.time()) && iv.contains(end.time())
                }
            })
            .map(DiscountInterval::factor)
    }

    /// Rescales the configured columns of each row by its factor.
    ///
    /// Rows that already carry a discount are left untouched, so applying
    /// the scheduler twice never compounds factors. Returns the number of
    /// rows that were rescaled by this call.
    #[instrument(level = "debug", skip_all, fields(rows = rows.len()))]
    pub fn apply(&self, rows: &mut [ScheduledTollRow]) -> usize {
        let mut applied = 0;
        for row in rows.iter_mut() {
            if row.discount().is_some() {
                continue;
            }
            let Some(factor) = self.factor_for(row.start(), row.end()) else {
                trace!(
                    id_start = row.toll.edge.id_start(),
                    id_end = row.toll.edge.id_end(),
                    start = %row.start_time,
                    end = %row.end_time,
                    "no discount interval matched"
                );
                continue;
            };
            for &class in &self.schedule.classes {
                *row.toll.rates.get_mut(class) *= factor;
            }
            row.mark_discounted(factor);
            applied += 1;
        }
        debug!(applied, "applied time discounts");
        applied
    }
}
