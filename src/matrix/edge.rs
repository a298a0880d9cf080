use super::*;

/// A matrix cell addressed as (row, col). It identifies the directed edge
/// `row -> col` that a search step fixes or forbids, not a vertex on its own.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub struct Edge(pub Vertex, pub Vertex);

impl Edge {
    pub fn row(&self) -> Vertex {
        self.0
    }

    pub fn col(&self) -> Vertex {
        self.1
    }

    pub fn reversed(&self) -> Self {
        Edge(self.1, self.0)
    }

    pub fn is_loop(&self) -> bool {
        self.0 == self.1
    }
}

/// A zero cell of a reduced matrix together with the bound penalty incurred
/// by excluding it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CandidateEdge {
    pub edge: Edge,
    pub exclusion_cost: Cost,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn accessors() {
        let edge = Edge(2, 5);
        assert_eq!(edge.row(), 2);
        assert_eq!(edge.col(), 5);
        assert_eq!(edge.reversed(), Edge(5, 2));
        assert!(!edge.is_loop());
        assert!(Edge(3, 3).is_loop());
    }
}
