//! Percentage band filter around a reference location's mean distance.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::TollError;
use crate::models::{Edge, NodeId};

/// Default half-width of the band, as a fraction of the reference mean.
pub const DEFAULT_THRESHOLD_RATIO: f64 = 0.1;

/// A location with the mean distance of its outgoing edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IdMean {
    /// Location (the `id_start` of the grouped edges).
    pub id: NodeId,
    /// Mean distance over all edges starting at `id`.
    pub mean_distance: f64,
}

/// Finds locations whose mean outgoing distance lies close to a reference.
///
/// The band is `[ref_mean × (1 − ratio), ref_mean × (1 + ratio)]`, closed on
/// both ends. It is not taken in absolute value; edges are nonnegative, so
/// the reference mean is too.
///
/// # Examples
///
/// ```
/// use u_toll::models::Edge;
/// use u_toll::filter::ThresholdFilter;
///
/// let edges = vec![
///     Edge::new(1, 9, 100.0).unwrap(),
///     Edge::new(2, 9, 105.0).unwrap(),
///     Edge::new(3, 9, 111.0).unwrap(),
/// ];
/// let found = ThresholdFilter::default().within(&edges, 1).unwrap();
/// let ids: Vec<u64> = found.iter().map(|m| m.id).collect();
/// assert_eq!(ids, vec![1, 2]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdFilter {
    ratio: f64,
}

impl Default for ThresholdFilter {
    fn default() -> Self {
        Self {
            ratio: DEFAULT_THRESHOLD_RATIO,
        }
    }
}

impl ThresholdFilter {
    /// Creates a filter with the given band half-width.
    ///
    /// Returns `None` if `ratio` is negative or non-finite.
    pub fn new(ratio: f64) -> Option<Self> {
        if !ratio.is_finite() || ratio < 0.0 {
            return None;
        }
        Some(Self { ratio })
    }

    /// Band half-width as a fraction of the reference mean.
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// Mean outgoing distance per `id_start`, in ascending ID order.
    pub fn mean_distances(edges: &[Edge]) -> Vec<IdMean> {
        let mut sums: BTreeMap<NodeId, (f64, usize)> = BTreeMap::new();
        for e in edges {
            let entry = sums.entry(e.id_start()).or_insert((0.0, 0));
            entry.0 += e.distance();
            entry.1 += 1;
        }
        sums.into_iter()
            .map(|(id, (sum, n))| IdMean {
                id,
                mean_distance: sum / n as f64,
            })
            .collect()
    }

    /// Returns every location whose mean falls inside the band around
    /// `reference_id`'s mean, sorted by ID. The reference itself is included.
    ///
    /// Fails with [`TollError::NotFound`] if no edge starts at `reference_id`.
    #[instrument(level = "debug", skip(self, edges), fields(edges = edges.len()))]
    pub fn within(&self, edges: &[Edge], reference_id: NodeId) -> Result<Vec<IdMean>, TollError> {
        let means = Self::mean_distances(edges);
        let reference = means
            .iter()
            .find(|m| m.id == reference_id)
            .ok_or(TollError::NotFound { reference_id })?;

        let lower = reference.mean_distance - reference.mean_distance * self.ratio;
        let upper = reference.mean_distance + reference.mean_distance * self.ratio;
        debug!(
            reference_mean = reference.mean_distance,
            lower, upper, "threshold band"
        );

        let found: Vec<IdMean> = means
            .into_iter()
            .filter(|m| m.mean_distance >= lower && m.mean_distance <= upper)
            .collect();
        debug!(found = found.len(), "ids within threshold");
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::init_test_logging;

    fn edge(s: NodeId, e: NodeId, d: f64) -> Edge {
        Edge::new(s, e, d).expect("valid edge")
    }

    #[test]
    fn test_inclusion_band() {
        init_test_logging();
        let edges = vec![
            edge(10, 1, 90.0),
            edge(10, 2, 110.0),
            edge(20, 1, 105.0),
            edge(30, 1, 111.0),
            edge(40, 1, 89.0),
            edge(50, 1, 95.0),
            edge(50, 2, 95.0),
        ];
        let found = ThresholdFilter::default().within(&edges, 10).expect("found");
        let ids: Vec<NodeId> = found.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![10, 20, 50]);
        assert!((found[0].mean_distance - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_missing_reference() {
        let edges = vec![edge(1, 2, 10.0)];
        // 2 only appears as id_end
        match ThresholdFilter::default().within(&edges, 2) {
            Err(TollError::NotFound { reference_id }) => assert_eq!(reference_id, 2),
            other => panic!("unexpected {other:?}"),
        }
        assert!(ThresholdFilter::default().within(&[], 1).is_err());
    }

    #[test]
    fn test_zero_ratio_keeps_exact_matches() {
        let edges = vec![edge(1, 2, 5.0), edge(3, 2, 5.0), edge(4, 2, 5.5)];
        let found = ThresholdFilter::new(0.0).expect("ratio").within(&edges, 1).expect("found");
        let ids: Vec<NodeId> = found.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_invalid_ratio() {
        assert!(ThresholdFilter::new(-0.1).is_none());
        assert!(ThresholdFilter::new(f64::NAN).is_none());
    }

    #[test]
    fn test_mean_distances_sorted() {
        let means =
            ThresholdFilter::mean_distances(&[edge(3, 1, 2.0), edge(1, 3, 4.0), edge(3, 2, 6.0)]);
        assert_eq!(
            means,
            vec![
                IdMean { id: 1, mean_distance: 4.0 },
                IdMean { id: 3, mean_distance: 4.0 },
            ]
        );
    }
}
