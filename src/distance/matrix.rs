//! Dense distance matrix keyed by location IDs.

use tracing::{debug, instrument};

use crate::error::TollError;
use crate::models::{Edge, NodeId};

/// A dense symmetric n×n distance matrix stored in row-major order.
///
/// Rows and columns share one index: the sorted, deduplicated set of IDs the
/// matrix was built over. The index is fixed at construction. Every cell is
/// written through both `(i, j)` and `(j, i)` and the diagonal is never
/// written, so the matrix is symmetric with a zero diagonal by construction.
///
/// # Examples
///
/// ```
/// use u_toll::models::Edge;
/// use u_toll::distance::DistanceMatrix;
///
/// let edges = vec![
///     Edge::new(1001402, 1001400, 9.7).unwrap(),
///     Edge::new(1001400, 1001404, 20.2).unwrap(),
/// ];
/// let dm = DistanceMatrix::from_edges(&edges);
/// assert_eq!(dm.ids(), &[1001400, 1001402, 1001404]);
/// assert_eq!(dm.get(1001400, 1001402), Some(9.7));
/// assert_eq!(dm.get(1001402, 1001400), Some(9.7));
/// assert_eq!(dm.get(1001402, 1001404), Some(0.0));
/// assert_eq!(dm.get(1001400, 1001400), Some(0.0));
/// assert_eq!(dm.get(42, 1001400), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    ids: Vec<NodeId>,
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Creates a zero matrix indexed by the given IDs.
    ///
    /// The IDs are sorted and deduplicated.
    pub fn new(ids: impl IntoIterator<Item = NodeId>) -> Self {
        let mut ids: Vec<NodeId> = ids.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        let size = ids.len();
        Self {
            ids,
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Folds an edge list into a cumulative distance matrix.
    ///
    /// The index is the sorted union of all `id_start` and `id_end` values.
    /// Each edge adds its distance to both `(start, end)` and `(end, start)`,
    /// so repeated edges between one pair accumulate in either direction.
    /// An empty edge list yields an empty matrix.
    #[instrument(level = "debug", skip(edges), fields(edges = edges.len()))]
    pub fn from_edges(edges: &[Edge]) -> Self {
        let mut dm = Self::new(
            edges
                .iter()
                .flat_map(|e| [e.id_start(), e.id_end()]),
        );
        for e in edges {
            let i = dm.index_of(e.id_start());
            let j = dm.index_of(e.id_end());
            dm.accumulate(i, j, e.distance());
        }
        debug!(size = dm.size, "built distance matrix");
        dm
    }

    /// Creates a matrix from an explicit row-major grid over `ids`.
    ///
    /// `ids` must be strictly increasing and `data` must hold `ids.len()²`
    /// finite, nonnegative values that are symmetric with a zero diagonal.
    pub fn from_dense(ids: Vec<NodeId>, data: Vec<f64>) -> Result<Self, TollError> {
        if ids.windows(2).any(|w| w[0] >= w[1]) {
            return Err(TollError::MalformedMatrix(
                "ids must be sorted and unique".into(),
            ));
        }
        let size = ids.len();
        if data.len() != size * size {
            return Err(TollError::MalformedMatrix(format!(
                "expected {} cells for {} ids, got {}",
                size * size,
                size,
                data.len()
            )));
        }
        let dm = Self { ids, data, size };
        for i in 0..size {
            if dm.get_by_index(i, i) != 0.0 {
                return Err(TollError::MalformedMatrix(format!(
                    "non-zero diagonal at id {}",
                    dm.ids[i]
                )));
            }
            for j in 0..size {
                let d = dm.get_by_index(i, j);
                if !d.is_finite() || d < 0.0 {
                    return Err(TollError::MalformedMatrix(format!(
                        "invalid distance {} between {} and {}",
                        d, dm.ids[i], dm.ids[j]
                    )));
                }
            }
        }
        if !dm.is_symmetric(0.0) {
            return Err(TollError::MalformedMatrix("matrix is not symmetric".into()));
        }
        Ok(dm)
    }

    // Insertion point of `id`; only meaningful for ids already in the index.
    fn index_of(&self, id: NodeId) -> usize {
        self.ids.partition_point(|&x| x < id)
    }

    fn accumulate(&mut self, i: usize, j: usize, distance: f64) {
        if i == j {
            return;
        }
        self.data[i * self.size + j] += distance;
        self.data[j * self.size + i] += distance;
    }

    /// Returns the distance between two IDs, or `None` if either is not in
    /// the index.
    pub fn get(&self, from: NodeId, to: NodeId) -> Option<f64> {
        let i = self.position(from)?;
        let j = self.position(to)?;
        Some(self.get_by_index(i, j))
    }

    /// Returns the cell at row `i`, column `j` of the index.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get_by_index(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.size + j]
    }

    /// Returns row `i` of the matrix.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of bounds.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.size..(i + 1) * self.size]
    }

    /// Position of `id` in the index.
    pub fn position(&self, id: NodeId) -> Option<usize> {
        self.ids.binary_search(&id).ok()
    }

    /// The sorted index shared by rows and columns.
    pub fn ids(&self) -> &[NodeId] {
        &self.ids
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if the matrix has no locations.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if (self.get_by_index(i, j) - self.get_by_index(j, i)).abs() > tol {
                    return false;
                }
            }
        }
        true
    }
}
