//! Edge rows and their ingestion records.

use serde::{Deserialize, Serialize};

use crate::error::TollError;

/// Identifier of a toll location.
pub type NodeId = u64;

/// A validated distance observation between two distinct locations.
///
/// The distance is finite and nonnegative, and `id_start != id_end`.
/// Both are checked on construction, so every `Edge` in a table is usable
/// by the matrix builder and the toll engine without further checks.
///
/// # Examples
///
/// ```
/// use u_toll::models::Edge;
///
/// let e = Edge::new(1001400, 1001402, 9.7).unwrap();
/// assert_eq!(e.id_start(), 1001400);
/// assert_eq!(e.id_end(), 1001402);
/// assert_eq!(e.distance(), 9.7);
///
/// assert!(Edge::new(1, 1, 2.0).is_none());
/// assert!(Edge::new(1, 2, -2.0).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Edge {
    id_start: NodeId,
    id_end: NodeId,
    distance: f64,
}

impl Edge {
    /// Creates an edge.
    ///
    /// Returns `None` for self-loops and for negative or non-finite distances.
    pub fn new(id_start: NodeId, id_end: NodeId, distance: f64) -> Option<Self> {
        if id_start == id_end || !distance.is_finite() || distance < 0.0 {
            return None;
        }
        Some(Self {
            id_start,
            id_end,
            distance,
        })
    }

    /// Builds an edge from matrix cells, which are already known to be valid.
    pub(crate) fn from_matrix_cell(id_start: NodeId, id_end: NodeId, distance: f64) -> Self {
        Self {
            id_start,
            id_end,
            distance,
        }
    }

    /// Origin location.
    pub fn id_start(&self) -> NodeId {
        self.id_start
    }

    /// Destination location.
    pub fn id_end(&self) -> NodeId {
        self.id_end
    }

    /// Distance between the two locations.
    pub fn distance(&self) -> f64 {
        self.distance
    }
}

/// One row of an edge table as produced by an external loader.
///
/// Every field is optional so that a loader can hand over incomplete rows
/// and let ingestion report exactly which row was bad.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// Origin location.
    pub id_start: Option<NodeId>,
    /// Destination location.
    pub id_end: Option<NodeId>,
    /// Distance between the two locations.
    pub distance: Option<f64>,
}

impl EdgeRecord {
    /// Creates a complete record.
    pub fn new(id_start: NodeId, id_end: NodeId, distance: f64) -> Self {
        Self {
            id_start: Some(id_start),
            id_end: Some(id_end),
            distance: Some(distance),
        }
    }

    /// Validates this record, which sits at position `row` of its table.
    pub fn validate(&self, row: usize) -> Result<Edge, TollError> {
        let id_start = self
            .id_start
            .ok_or_else(|| TollError::malformed_row(row, "missing id_start"))?;
        let id_end = self
            .id_end
            .ok_or_else(|| TollError::malformed_row(row, "missing id_end"))?;
        let distance = self
            .distance
            .ok_or_else(|| TollError::malformed_row(row, "missing distance"))?;

        if id_start == id_end {
            return Err(TollError::malformed_row(
                row,
                format!("self-loop edge on id {id_start}"),
            ));
        }
        if !distance.is_finite() {
            return Err(TollError::malformed_row(row, "distance is not a number"));
        }
        if distance < 0.0 {
            return Err(TollError::malformed_row(
                row,
                format!("negative distance {distance}"),
            ));
        }
        Ok(Edge {
            id_start,
            id_end,
            distance,
        })
    }
}

/// Validates a whole edge table.
///
/// Either every record is valid and the full table is returned, or the first
/// bad row is reported.
pub fn ingest_edges<'a, I>(records: I) -> Result<Vec<Edge>, TollError>
where
    I: IntoIterator<Item = &'a EdgeRecord>,
{
    records
        .into_iter()
        .enumerate()
        .map(|(row, record)| record.validate(row))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_new_valid() {
        let e = Edge::new(1, 2, 0.0).expect("valid");
        assert_eq!(e.id_start(), 1);
        assert_eq!(e.id_end(), 2);
        assert_eq!(e.distance(), 0.0);
    }

    #[test]
    fn test_edge_new_invalid() {
        assert!(Edge::new(3, 3, 1.0).is_none());
        assert!(Edge::new(1, 2, -0.5).is_none());
        assert!(Edge::new(1, 2, f64::NAN).is_none());
        assert!(Edge::new(1, 2, f64::INFINITY).is_none());
    }

    #[test]
    fn test_record_missing_fields() {
        let rec = EdgeRecord {
            id_start: Some(1),
            id_end: None,
            distance: Some(4.0),
        };
        match rec.validate(7) {
            Err(TollError::MalformedRow { row, reason }) => {
                assert_eq!(row, 7);
                assert_eq!(reason, "missing id_end");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_record_self_loop_rejected() {
        let err = EdgeRecord::new(5, 5, 1.0).validate(0).unwrap_err();
        assert!(matches!(err, TollError::MalformedRow { row: 0, .. }));
    }

    #[test]
    fn test_record_non_numeric_distance_rejected() {
        let err = EdgeRecord::new(1, 2, f64::NAN).validate(2).unwrap_err();
        assert!(err.to_string().contains("not a number"));
    }

    #[test]
    fn test_ingest_is_atomic() {
        let records = vec![
            EdgeRecord::new(1, 2, 1.0),
            EdgeRecord::new(2, 3, -1.0),
            EdgeRecord::new(3, 4, 1.0),
        ];
        let err = ingest_edges(&records).unwrap_err();
        assert!(matches!(err, TollError::MalformedRow { row: 1, .. }));

        let edges = ingest_edges(&records[..1]).expect("valid");
        assert_eq!(edges.len(), 1);
    }

    #[test]
    fn test_record_deserialize() {
        let rec: EdgeRecord =
            serde_json::from_str(r#"{"id_start": 1001400, "id_end": 1001402, "distance": 9.7}"#)
                .expect("json");
        assert_eq!(rec, EdgeRecord::new(1001400, 1001402, 9.7));

        let partial: EdgeRecord = serde_json::from_str(r#"{"id_start": 1}"#).expect("json");
        assert!(partial.validate(0).is_err());
    }
}
