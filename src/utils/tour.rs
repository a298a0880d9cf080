use crate::matrix::{Cost, CostMatrix, NumVertices, Vertex};
use itertools::Itertools;
use serde::Serialize;
use std::io::Write;

/// Ordered vertex sequence of a closed tour; the edge from the last vertex
/// back to the first is implicit.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Tour {
    vertices: Vec<Vertex>,
}

impl Tour {
    pub fn new(vertices: Vec<Vertex>) -> Self {
        Self { vertices }
    }

    /// Returns the number of vertices on the tour.
    ///
    /// # Example
    /// ```
    /// use tss::utils::Tour;
    /// let tour = Tour::new(vec![0, 1, 3, 2]);
    /// assert_eq!(tour.len(), 4);
    /// ```
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Returns an iterator over the vertices in visiting order.
    ///
    /// # Example
    /// ```
    /// use tss::utils::Tour;
    /// let tour = Tour::new(vec![2, 0, 1]);
    /// assert_eq!(tour.iter().collect::<Vec<_>>(), vec![2, 0, 1]);
    /// ```
    pub fn iter(&self) -> impl Iterator<Item = Vertex> + '_ {
        self.vertices.iter().copied()
    }

    /// True iff the tour visits each of the `number_of_vertices` vertices
    /// exactly once.
    ///
    /// # Example
    /// ```
    /// use tss::utils::Tour;
    /// assert!(Tour::new(vec![1, 0, 2]).is_permutation_of(3));
    /// assert!(!Tour::new(vec![1, 1, 2]).is_permutation_of(3));
    /// assert!(!Tour::new(vec![1, 0]).is_permutation_of(3));
    /// ```
    pub fn is_permutation_of(&self, number_of_vertices: NumVertices) -> bool {
        if self.vertices.len() != number_of_vertices as usize {
            return false;
        }

        let mut seen = vec![false; number_of_vertices as usize];
        self.vertices.iter().all(|&v| {
            v < number_of_vertices && !std::mem::replace(&mut seen[v as usize], true)
        })
    }

    /// Exact tour cost recomputed from `matrix`, i.e. the sum over all
    /// consecutive edges plus the closing edge back to the start. None if the
    /// tour crosses an absent edge.
    pub fn cost(&self, matrix: &CostMatrix) -> Option<Cost> {
        let mut total: Cost = 0;
        for (&u, &v) in self.vertices.iter().tuple_windows() {
            total += matrix.get(u, v)?;
        }
        total += matrix.get(*self.vertices.last()?, self.vertices[0])?;

        Some(total)
    }

    /// The same cyclic tour rotated to begin at `start`; None if `start` is
    /// not on the tour.
    ///
    /// # Example
    /// ```
    /// use tss::utils::Tour;
    /// let tour = Tour::new(vec![2, 0, 1]);
    /// assert_eq!(tour.rotated_to(0).unwrap().vertices(), [0, 1, 2]);
    /// ```
    pub fn rotated_to(&self, start: Vertex) -> Option<Tour> {
        let pos = self.vertices.iter().position(|&v| v == start)?;

        let mut vertices = Vec::with_capacity(self.vertices.len());
        vertices.extend_from_slice(&self.vertices[pos..]);
        vertices.extend_from_slice(&self.vertices[..pos]);

        Some(Tour::new(vertices))
    }

    /// Writes the tour as a single line of 1-based vertex indices.
    pub fn write<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        writeln!(writer, "{}", self.vertices.iter().map(|v| v + 1).join(" "))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testing::matrix_from_rows;

    #[test]
    fn cost_includes_closing_edge() {
        let matrix = matrix_from_rows(&[
            &[-1, 10, 15, 20],
            &[10, -1, 35, 25],
            &[15, 35, -1, 30],
            &[20, 25, 30, -1],
        ]);

        assert_eq!(Tour::new(vec![0, 1, 3, 2]).cost(&matrix), Some(80));
        assert_eq!(Tour::new(vec![0, 1, 2, 3]).cost(&matrix), Some(95));
    }

    #[test]
    fn cost_of_tour_over_absent_edge_is_none() {
        let matrix = matrix_from_rows(&[&[-1, 1, -1], &[1, -1, 1], &[-1, 1, -1]]);

        assert_eq!(Tour::new(vec![0, 1, 2]).cost(&matrix), None);
    }

    #[test]
    fn write_is_one_based() {
        let mut buffer = Vec::new();
        Tour::new(vec![0, 2, 1]).write(&mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "1 3 2\n");
    }
}
