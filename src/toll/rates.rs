//! Distance-based toll rates per vehicle class.

use tracing::{debug, instrument};

use crate::models::{Edge, TollRates, TollRow, VehicleClass};

/// Toll per unit distance for each vehicle class.
pub const STANDARD_MULTIPLIERS: TollRates = TollRates {
    moto: 0.8,
    car: 1.2,
    rv: 1.5,
    bus: 2.2,
    truck: 3.6,
};

/// Prices edges with a fixed multiplier per vehicle class.
///
/// # Examples
///
/// ```
/// use u_toll::models::Edge;
/// use u_toll::toll::TollRateEngine;
///
/// let engine = TollRateEngine::default();
/// let row = engine.price(Edge::new(1, 2, 10.0).unwrap());
/// assert!((row.rates.moto - 8.0).abs() < 1e-10);
/// assert!((row.rates.truck - 36.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TollRateEngine {
    multipliers: TollRates,
}

impl Default for TollRateEngine {
    fn default() -> Self {
        Self::new(STANDARD_MULTIPLIERS)
    }
}

impl TollRateEngine {
    /// Creates an engine with the given per-class multipliers.
    pub fn new(multipliers: TollRates) -> Self {
        Self { multipliers }
    }

    /// Overrides the multiplier of one class.
    pub fn with_multiplier(mut self, class: VehicleClass, multiplier: f64) -> Self {
        *self.multipliers.get_mut(class) = multiplier;
        self
    }

    /// Multipliers in use.
    pub fn multipliers(&self) -> &TollRates {
        &self.multipliers
    }

    /// Tolls for a single distance.
    pub fn rates_for(&self, distance: f64) -> TollRates {
        let mut rates = self.multipliers;
        for class in VehicleClass::ALL {
            *rates.get_mut(class) *= distance;
        }
        rates
    }

    /// Prices one edge.
    pub fn price(&self, edge: Edge) -> TollRow {
        TollRow {
            edge,
            rates: self.rates_for(edge.distance()),
        }
    }

    /// Prices every edge of a table, preserving row order.
    #[instrument(level = "debug", skip_all, fields(rows = edges.len()))]
    pub fn price_all(&self, edges: &[Edge]) -> Vec<TollRow> {
        #[cfg(feature = "parallel")]
        let rows: Vec<TollRow> = {
            use rayon::prelude::*;
            edges.par_iter().map(|&e| self.price(e)).collect()
        };
        #[cfg(not(feature = "parallel"))]
        let rows: Vec<TollRow> = edges.iter().map(|&e| self.price(e)).collect();

        debug!(rows = rows.len(), "priced toll rows");
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linearity_at_ten() {
        let rates = TollRateEngine::default().rates_for(10.0);
        assert!((rates.moto - 8.0).abs() < 1e-10);
        assert!((rates.car - 12.0).abs() < 1e-10);
        assert!((rates.rv - 15.0).abs() < 1e-10);
        assert!((rates.bus - 22.0).abs() < 1e-10);
        assert!((rates.truck - 36.0).abs() < 1e-10);
    }

    #[test]
    fn test_zero_distance() {
        assert_eq!(TollRateEngine::default().rates_for(0.0), TollRates::default());
    }

    #[test]
    fn test_with_multiplier() {
        let engine = TollRateEngine::default().with_multiplier(VehicleClass::Car, 2.0);
        assert_eq!(engine.multipliers().car, 2.0);
        assert_eq!(engine.multipliers().bus, 2.2);
        assert!((engine.rates_for(5.0).car - 10.0).abs() < 1e-10);
    }

    #[test]
    fn test_price_all_preserves_order() {
        let edges = vec![
            Edge::new(1, 2, 1.0).expect("valid"),
            Edge::new(2, 1, 2.0).expect("valid"),
            Edge::new(3, 1, 3.0).expect("valid"),
        ];
        let rows = TollRateEngine::default().price_all(&edges);
        assert_eq!(rows.len(), 3);
        for (row, edge) in rows.iter().zip(&edges) {
            assert_eq!(&row.edge, edge);
            assert!((row.rates.rv - edge.distance() * 1.5).abs() < 1e-10);
        }
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_price_all_matches_price() {
        let engine = TollRateEngine::default().with_multiplier(VehicleClass::Truck, 4.1);
        let edges: Vec<Edge> = (0u64..5000)
            .filter_map(|i| Edge::new(i, i + 1, i as f64 * 0.25))
            .collect();
        let rows = engine.price_all(&edges);
        let expected: Vec<TollRow> = edges.iter().map(|&e| engine.price(e)).collect();
        assert_eq!(rows, expected);
    }
}
