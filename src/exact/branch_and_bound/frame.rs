use smallvec::SmallVec;

use crate::matrix::{CandidateEdge, Cost, CostMatrix, Edge};
use crate::utils::Tour;

/// One node of the search tree: a private snapshot of the cost matrix, the
/// edges fixed so far (insertion order matters for reconstruction), the edges
/// excluded along this lineage, and the lower bound accumulated along it. The
/// level of a node equals the number of fixed edges; along one lineage the
/// bound never decreases.
///
/// Frames never share mutable state: mutating one frame's matrix is not
/// observable from any other frame on the stack.
pub(super) struct Frame {
    matrix: CostMatrix,
    fixed_edges: SmallVec<[Edge; 16]>,
    excluded_edges: SmallVec<[Edge; 16]>,
    lower_bound: Cost,
}

impl Frame {
    pub(super) fn root(matrix: CostMatrix) -> Self {
        Self {
            matrix,
            fixed_edges: SmallVec::new(),
            excluded_edges: SmallVec::new(),
            lower_bound: 0,
        }
    }

    /// The sibling of a just-deepened node: a fresh copy of the *original*
    /// matrix with every exclusion of this lineage plus `forbidden` removed.
    /// The sibling restarts its own reduction from that base, since the
    /// exclusion changes which reductions are valid; only the penalized bound
    /// is carried over and it is used solely for pruning before the level-0
    /// bound reset. Accumulating the exclusions makes every sibling's search
    /// space a strict subset of its parent's, so under non-strict pruning two
    /// tie-bound siblings cannot regenerate one another.
    pub(super) fn excluded_branch(
        &self,
        original: &CostMatrix,
        forbidden: Edge,
        lower_bound: Cost,
    ) -> Self {
        let mut excluded_edges = self.excluded_edges.clone();
        excluded_edges.push(forbidden);

        let mut matrix = original.clone();
        for &edge in &excluded_edges {
            matrix.forbid(edge);
        }

        Self {
            matrix,
            fixed_edges: SmallVec::new(),
            excluded_edges,
            lower_bound,
        }
    }

    pub(super) fn level(&self) -> usize {
        self.fixed_edges.len()
    }

    pub(super) fn lower_bound(&self) -> Cost {
        self.lower_bound
    }

    pub(super) fn reset_lower_bound(&mut self) {
        self.lower_bound = 0;
    }

    pub(super) fn add_to_bound(&mut self, delta: Cost) {
        self.lower_bound += delta;
    }

    /// Reduces rows, then columns; returns the bound delta of this step.
    pub(super) fn reduce(&mut self) -> Cost {
        self.matrix.reduce_rows() + self.matrix.reduce_cols()
    }

    /// Among all zero cells of the reduced matrix, picks the one whose
    /// exclusion would raise the bound the most, i.e. the most "forced" edge.
    /// On ties the first cell in row-major order wins. None if the matrix has
    /// no zero cell at all.
    pub(super) fn select_next_edge(&self) -> Option<CandidateEdge> {
        let mut best: Option<CandidateEdge> = None;

        for (edge, cost) in self.matrix.finite_cells() {
            if cost != 0 {
                continue;
            }

            let exclusion_cost = self.matrix.vertex_exclusion_cost(edge.row(), edge.col());
            if best.is_none_or(|b| exclusion_cost > b.exclusion_cost) {
                best = Some(CandidateEdge {
                    edge,
                    exclusion_cost,
                });
            }
        }

        best
    }

    pub(super) fn fix_edge(&mut self, edge: Edge) {
        self.fixed_edges.push(edge);
    }

    /// Taking `edge` forbids leaving its row and entering its column a second
    /// time; additionally the reverse cell is forbidden, as it would close a
    /// premature two-cycle between the endpoints. All three constraints are a
    /// fixed rule of the algorithm.
    pub(super) fn apply_edge_constraints(&mut self, edge: Edge) {
        for v in self.matrix.vertices_range() {
            self.matrix.forbid(Edge(edge.row(), v));
            self.matrix.forbid(Edge(v, edge.col()));
        }
        self.matrix.forbid(edge.reversed());
    }

    /// Called on terminal nodes only: completes the fixed-edge set from the
    /// residual matrix and stitches it into a single vertex ordering. None if
    /// the node's restrictions do not admit one closed tour.
    pub(super) fn reconstruct_tour(&mut self) -> Option<Tour> {
        // the residual still admits one reduction and its delta belongs to
        // the bound, which thereby reaches the finished tour's cost before
        // becoming the incumbent. This also hands the 2-vertex root, which
        // never passes through the deepening loop, the zero cells selection
        // scans for
        let delta = self.reduce();
        self.add_to_bound(delta);

        // a residual of three finite cells can offer a zero that would close
        // the two open paths into separate subcycles instead of one tour;
        // trying the candidates in selection order keeps the completion that
        // stitches
        let mut candidates: Vec<CandidateEdge> = self
            .matrix
            .finite_cells()
            .filter(|&(_, cost)| cost == 0)
            .map(|(edge, _)| CandidateEdge {
                edge,
                exclusion_cost: self.matrix.vertex_exclusion_cost(edge.row(), edge.col()),
            })
            .collect();
        // the sort is stable, so tied candidates keep their row-major order
        candidates.sort_by(|a, b| b.exclusion_cost.cmp(&a.exclusion_cost));

        candidates
            .into_iter()
            .find_map(|candidate| self.close_with(candidate.edge))
    }

    /// Completes the tour through `closing`: blanks its row and column (the
    /// reverse-cell guard is a no-op here for three or more vertices and
    /// would cut the final back edge of a 2-vertex instance), adopts the
    /// leftover finite cells and stitches.
    fn close_with(&self, closing: Edge) -> Option<Tour> {
        let mut matrix = self.matrix.clone();
        for v in matrix.vertices_range() {
            matrix.forbid(Edge(closing.row(), v));
            matrix.forbid(Edge(v, closing.col()));
        }

        let mut fixed_edges = self.fixed_edges.clone();
        fixed_edges.push(closing);
        fixed_edges.extend(matrix.finite_cells().map(|(edge, _)| edge));

        stitch(&fixed_edges, self.matrix.len())
    }
}

/// Follows row -> col links starting from the first fixed edge until every
/// vertex is consumed; None unless the fixed edges form exactly one
/// Hamiltonian cycle.
fn stitch(fixed_edges: &[Edge], n: usize) -> Option<Tour> {
    if fixed_edges.len() != n {
        return None;
    }

    let mut successor: Vec<Option<_>> = vec![None; n];
    for edge in fixed_edges {
        if successor[edge.row() as usize].replace(edge.col()).is_some() {
            return None;
        }
    }

    let start = fixed_edges[0].col();
    let mut vertices = Vec::with_capacity(n);
    let mut seen = vec![false; n];

    let mut current = start;
    for _ in 0..n {
        if std::mem::replace(&mut seen[current as usize], true) {
            return None;
        }
        vertices.push(current);
        current = successor[current as usize]?;
    }

    (current == start).then(|| Tour::new(vertices))
}
