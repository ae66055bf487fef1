//! Rate and discount configuration.
//!
//! All constants the transformations use live here as read-only data. The
//! defaults reproduce the standard tariff; a JSON document may override any
//! subset of fields.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::TollError;
use crate::filter::{ThresholdFilter, DEFAULT_THRESHOLD_RATIO};
use crate::models::{TollRates, VehicleClass};
use crate::toll::{DiscountSchedule, TimeDiscountScheduler, TollRateEngine, STANDARD_MULTIPLIERS};

/// Tariff configuration.
///
/// # Examples
///
/// ```
/// use u_toll::config::TollConfig;
///
/// let config = TollConfig::from_json(r#"{"multipliers": {"moto": 1.0, "car": 1.2,
///     "rv": 1.5, "bus": 2.2, "truck": 3.6}, "threshold_ratio": 0.05}"#).unwrap();
/// assert_eq!(config.multipliers.moto, 1.0);
/// assert_eq!(config.threshold_ratio, 0.05);
/// assert_eq!(config.discounts.weekend_factor, 0.7);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TollConfig {
    /// Toll per unit distance for each vehicle class. Classes left out of a
    /// JSON document keep their standard multiplier.
    #[serde(deserialize_with = "multipliers_over_standard")]
    pub multipliers: TollRates,
    /// Time-of-day and weekend discount rules.
    pub discounts: DiscountSchedule,
    /// Half-width of the threshold filter band.
    pub threshold_ratio: f64,
}

impl Default for TollConfig {
    fn default() -> Self {
        Self {
            multipliers: STANDARD_MULTIPLIERS,
            discounts: DiscountSchedule::default(),
            threshold_ratio: DEFAULT_THRESHOLD_RATIO,
        }
    }
}

#[derive(Deserialize)]
struct MultiplierOverrides {
    moto: Option<f64>,
    car: Option<f64>,
    rv: Option<f64>,
    bus: Option<f64>,
    truck: Option<f64>,
}

fn multipliers_over_standard<'de, D>(deserializer: D) -> Result<TollRates, D::Error>
where
    D: Deserializer<'de>,
{
    let o = MultiplierOverrides::deserialize(deserializer)?;
    let standard = STANDARD_MULTIPLIERS;
    Ok(TollRates {
        moto: o.moto.unwrap_or(standard.moto),
        car: o.car.unwrap_or(standard.car),
        rv: o.rv.unwrap_or(standard.rv),
        bus: o.bus.unwrap_or(standard.bus),
        truck: o.truck.unwrap_or(standard.truck),
    })
}

impl TollConfig {
    /// Parses and validates a JSON configuration. Missing fields keep their
    /// defaults.
    pub fn from_json(json: &str) -> Result<Self, TollError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every multiplier, factor, and ratio.
    pub fn validate(&self) -> Result<(), TollError> {
        for class in VehicleClass::ALL {
            let m = self.multipliers.get(class);
            if !m.is_finite() || m < 0.0 {
                return Err(TollError::InvalidConfig(format!(
                    "{} multiplier {m} must be finite and nonnegative",
                    class.column()
                )));
            }
        }
        if ThresholdFilter::new(self.threshold_ratio).is_none() {
            return Err(TollError::InvalidConfig(format!(
                "threshold ratio {} must be finite and nonnegative",
                self.threshold_ratio
            )));
        }
        self.discounts.validate()
    }

    /// Sets the multiplier of one class.
    pub fn with_multiplier(mut self, class: VehicleClass, multiplier: f64) -> Self {
        *self.multipliers.get_mut(class) = multiplier;
        self
    }

    /// Sets the threshold band half-width.
    pub fn with_threshold_ratio(mut self, ratio: f64) -> Self {
        self.threshold_ratio = ratio;
        self
    }

    /// Sets the discount rules.
    pub fn with_discounts(mut self, discounts: DiscountSchedule) -> Self {
        self.discounts = discounts;
        self
    }

    /// Toll engine for these multipliers.
    pub fn rate_engine(&self) -> TollRateEngine {
        TollRateEngine::new(self.multipliers)
    }

    /// Discount scheduler for these rules.
    pub fn scheduler(&self) -> Result<TimeDiscountScheduler, TollError> {
        TimeDiscountScheduler::new(self.discounts.clone())
    }

    /// Threshold filter for this ratio.
    pub fn threshold_filter(&self) -> Result<ThresholdFilter, TollError> {
        ThresholdFilter::new(self.threshold_ratio).ok_or_else(|| {
            TollError::InvalidConfig(format!("invalid threshold ratio {}", self.threshold_ratio))
        })
    }
}
