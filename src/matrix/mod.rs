pub mod edge;

pub use edge::*;

use crate::errors::InvariantCheck;
use itertools::Itertools;
use std::{fmt, ops::Range};
use thiserror::Error;

pub type Vertex = u32;
pub type NumVertices = Vertex;
pub type Cost = u64;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MatrixError {
    #[error("a cost matrix needs at least two vertices, got {0}")]
    TooSmall(NumVertices),

    #[error("row {row} has {found} entries, expected {expected}")]
    NotSquare {
        row: Vertex,
        expected: NumVertices,
        found: usize,
    },

    #[error("diagonal entry ({0}, {0}) must be absent")]
    FiniteDiagonal(Vertex),
}

/// Square matrix of edge costs. An absent entry (`None`) marks a missing or
/// forbidden edge; it never takes part in arithmetic, only in comparisons.
/// The diagonal is always absent as a tour may not contain self-loops.
///
/// The matrix never physically shrinks: fixing edges during the search blanks
/// whole rows and columns instead, so cell coordinates keep their original
/// meaning throughout.
#[derive(Clone, PartialEq, Eq)]
pub struct CostMatrix {
    entries: Vec<Option<Cost>>,
    number_of_vertices: NumVertices,
}

impl CostMatrix {
    /// Builds a matrix from its rows. Rejects matrices with fewer than two
    /// vertices, ragged rows, and finite diagonal entries.
    pub fn try_from_rows(rows: Vec<Vec<Option<Cost>>>) -> Result<Self, MatrixError> {
        let n = rows.len();
        if n < 2 {
            return Err(MatrixError::TooSmall(n as NumVertices));
        }

        let mut entries = Vec::with_capacity(n * n);
        for (r, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(MatrixError::NotSquare {
                    row: r as Vertex,
                    expected: n as NumVertices,
                    found: row.len(),
                });
            }
            if row[r].is_some() {
                return Err(MatrixError::FiniteDiagonal(r as Vertex));
            }
            entries.extend(row.iter().copied());
        }

        Ok(Self {
            entries,
            number_of_vertices: n as NumVertices,
        })
    }

    pub fn number_of_vertices(&self) -> NumVertices {
        self.number_of_vertices
    }

    /// Returns the number of vertices as usize
    pub fn len(&self) -> usize {
        self.number_of_vertices as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn vertices_range(&self) -> Range<Vertex> {
        0..self.number_of_vertices
    }

    fn cell(&self, row: Vertex, col: Vertex) -> usize {
        debug_assert!(row < self.number_of_vertices && col < self.number_of_vertices);
        row as usize * self.len() + col as usize
    }

    pub fn get(&self, row: Vertex, col: Vertex) -> Option<Cost> {
        self.entries[self.cell(row, col)]
    }

    /// Marks the cell of `edge` as absent.
    pub fn forbid(&mut self, edge: Edge) {
        let cell = self.cell(edge.row(), edge.col());
        self.entries[cell] = None;
    }

    fn rows(&self) -> impl Iterator<Item = &[Option<Cost>]> {
        self.entries.chunks(self.len())
    }

    /// Per-row minimum over the finite entries; 0 for a row without any.
    pub fn row_minima(&self) -> Vec<Cost> {
        self.rows()
            .map(|row| row.iter().copied().flatten().min().unwrap_or(0))
            .collect()
    }

    /// Per-column minimum over the finite entries; 0 for a column without any.
    pub fn col_minima(&self) -> Vec<Cost> {
        self.vertices_range()
            .map(|c| {
                self.vertices_range()
                    .filter_map(|r| self.get(r, c))
                    .min()
                    .unwrap_or(0)
            })
            .collect()
    }

    /// Subtracts each row's minimum from all finite entries of that row and
    /// returns the sum of the subtracted minima. Every complete tour leaves
    /// each vertex exactly once, so the sum is a valid lower-bound
    /// contribution and the relative order of tour costs is preserved.
    pub fn reduce_rows(&mut self) -> Cost {
        let minima = self.row_minima();
        let n = self.len();

        for (r, min) in minima.iter().copied().enumerate() {
            if min == 0 {
                continue;
            }
            for entry in &mut self.entries[r * n..(r + 1) * n] {
                if let Some(value) = entry.as_mut() {
                    *value -= min;
                }
            }
        }

        minima.into_iter().sum()
    }

    /// Column analogue of [`CostMatrix::reduce_rows`].
    pub fn reduce_cols(&mut self) -> Cost {
        let minima = self.col_minima();
        let n = self.len();

        for (c, min) in minima.iter().copied().enumerate() {
            if min == 0 {
                continue;
            }
            for r in 0..n {
                if let Some(value) = self.entries[r * n + c].as_mut() {
                    *value -= min;
                }
            }
        }

        minima.into_iter().sum()
    }

    /// Bound penalty for *not* taking the edge (`row`, `col`): the cheapest
    /// finite way to leave `row` through another column plus the cheapest
    /// finite way to enter `col` from another row. The cell (`row`, `col`)
    /// itself is never examined; a fully absent remainder contributes 0.
    pub fn vertex_exclusion_cost(&self, row: Vertex, col: Vertex) -> Cost {
        let leave = self
            .vertices_range()
            .filter(|&c| c != col)
            .filter_map(|c| self.get(row, c))
            .min()
            .unwrap_or(0);
        let enter = self
            .vertices_range()
            .filter(|&r| r != row)
            .filter_map(|r| self.get(r, col))
            .min()
            .unwrap_or(0);

        leave + enter
    }

    /// Row-major iterator over all finite cells and their costs.
    pub fn finite_cells(&self) -> impl Iterator<Item = (Edge, Cost)> + '_ {
        let n = self.number_of_vertices;
        self.entries.iter().enumerate().filter_map(move |(i, entry)| {
            entry.map(|cost| (Edge(i as Vertex / n, i as Vertex % n), cost))
        })
    }
}

impl fmt::Display for CostMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            writeln!(
                f,
                "{}",
                row.iter()
                    .map(|entry| entry.map_or_else(|| "INF".to_string(), |c| c.to_string()))
                    .join(" ")
            )?;
        }
        Ok(())
    }
}

impl fmt::Debug for CostMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl InvariantCheck<MatrixError> for CostMatrix {
    fn is_correct(&self) -> Result<(), MatrixError> {
        if self.number_of_vertices < 2 {
            return Err(MatrixError::TooSmall(self.number_of_vertices));
        }

        if self.entries.len() != self.len() * self.len() {
            return Err(MatrixError::NotSquare {
                row: 0,
                expected: self.number_of_vertices,
                found: self.entries.len(),
            });
        }

        for v in self.vertices_range() {
            if self.get(v, v).is_some() {
                return Err(MatrixError::FiniteDiagonal(v));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testing::{matrix_from_rows, random_matrix};
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    #[test]
    fn construction_rejects_malformed_input() {
        assert_eq!(
            CostMatrix::try_from_rows(vec![vec![None]]),
            Err(MatrixError::TooSmall(1))
        );

        assert_eq!(
            CostMatrix::try_from_rows(vec![
                vec![None, Some(1), Some(2)],
                vec![Some(1), None, Some(2)],
            ]),
            Err(MatrixError::NotSquare {
                row: 0,
                expected: 2,
                found: 3
            })
        );

        assert_eq!(
            CostMatrix::try_from_rows(vec![vec![None, Some(1)], vec![Some(1), Some(0)]]),
            Err(MatrixError::FiniteDiagonal(1))
        );

        let matrix =
            CostMatrix::try_from_rows(vec![vec![None, Some(1)], vec![Some(1), None]]).unwrap();
        assert_eq!(matrix.number_of_vertices(), 2);
        assert!(matrix.is_correct().is_ok());
    }

    #[test]
    fn minima_ignore_absent_entries() {
        let matrix = matrix_from_rows(&[&[-1, 2, 4], &[-1, -1, -1], &[6, 1, -1]]);

        assert_eq!(matrix.row_minima(), vec![2, 0, 1]);
        assert_eq!(matrix.col_minima(), vec![6, 1, 4]);
    }

    #[test]
    fn reduction_returns_subtracted_sum() {
        let mut matrix = matrix_from_rows(&[
            &[-1, 10, 15, 20],
            &[10, -1, 35, 25],
            &[15, 35, -1, 30],
            &[20, 25, 30, -1],
        ]);

        assert_eq!(matrix.reduce_rows(), 55);
        assert_eq!(matrix.reduce_cols(), 15);

        assert_eq!(matrix.get(0, 1), Some(0));
        assert_eq!(matrix.get(0, 2), Some(0));
        assert_eq!(matrix.get(1, 2), Some(20));
        assert_eq!(matrix.get(0, 0), None);
    }

    #[test]
    fn reduction_leaves_a_zero_in_every_finite_line() {
        let mut rng = Pcg64::seed_from_u64(12345);

        for n in 2..10 {
            let mut matrix = random_matrix(&mut rng, n, false);
            matrix.reduce_rows();
            matrix.reduce_cols();

            for v in matrix.vertices_range() {
                assert!(
                    matrix.vertices_range().any(|c| matrix.get(v, c) == Some(0)),
                    "no zero in row {v} of\n{matrix}"
                );
                assert!(
                    matrix.vertices_range().any(|r| matrix.get(r, v) == Some(0)),
                    "no zero in column {v} of\n{matrix}"
                );
            }
        }
    }

    #[test]
    fn exclusion_cost_skips_its_own_cell() {
        let matrix = matrix_from_rows(&[&[-1, 0, 7], &[3, -1, 9], &[5, 8, -1]]);

        // row 0 without column 1 -> 7; column 1 without row 0 -> 8
        assert_eq!(matrix.vertex_exclusion_cost(0, 1), 15);
        assert_eq!(matrix.vertex_exclusion_cost(1, 0), 14);
    }

    #[test]
    fn exclusion_cost_of_absent_remainder_is_zero() {
        let matrix = matrix_from_rows(&[&[-1, 3], &[4, -1]]);

        // neither another way out of row 0 nor another way into column 1 exists
        assert_eq!(matrix.vertex_exclusion_cost(0, 1), 0);
    }

    #[test]
    fn finite_cells_scan_in_row_major_order() {
        let matrix = matrix_from_rows(&[&[-1, 1, -1], &[-1, -1, 2], &[3, -1, -1]]);

        let cells: Vec<_> = matrix.finite_cells().collect();
        assert_eq!(
            cells,
            vec![(Edge(0, 1), 1), (Edge(1, 2), 2), (Edge(2, 0), 3)]
        );
    }

    #[test]
    fn display_marks_absent_entries() {
        let matrix = matrix_from_rows(&[&[-1, 5], &[5, -1]]);
        assert_eq!(format!("{matrix}"), "INF 5\n5 INF\n");
    }
}
