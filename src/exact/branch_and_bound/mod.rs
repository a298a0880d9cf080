use log::trace;

use super::{Solution, Solutions, filter_optimal};
use crate::algorithm::{IterativeAlgorithm, TerminatingIterativeAlgorithm};
use crate::matrix::{Cost, CostMatrix};

mod frame;
use frame::Frame;

/// Depth-first branch and bound over partial tours with matrix-reduction
/// lower bounds. The explicit stack replaces recursive call frames; each
/// entry owns an independent matrix snapshot.
///
/// One call to [`IterativeAlgorithm::execute_step`] pops a single node and
/// deepens it in place until it is pruned or reaches the terminal residual,
/// pushing one "edge excluded" sibling per deepening step. Pruning uses
/// `bound <= best` rather than a strict comparison, which deliberately keeps
/// tied branches alive so that *every* minimum-cost tour is reported.
pub struct BranchAndBound {
    original: CostMatrix,
    stack: Vec<Frame>,
    best_lower_bound: Option<Cost>,
    solutions: Solutions,
    terminal_level: usize,
    iterations: usize,
}

impl BranchAndBound {
    pub fn new(matrix: CostMatrix) -> Self {
        // the search deepens one level per step until the matrix collapses
        // to its terminal 2x2 residual
        let terminal_level = matrix.len() - 2;

        let mut stack = Vec::with_capacity(3 * (matrix.len() + 2));
        stack.push(Frame::root(matrix.clone()));

        Self {
            original: matrix,
            stack,
            best_lower_bound: None,
            solutions: Vec::new(),
            terminal_level,
            iterations: 0,
        }
    }

    /// Returns the number of nodes popped from the search stack so far.
    pub fn number_of_iterations(&self) -> usize {
        self.iterations
    }

    fn within_best(&self, bound: Cost) -> bool {
        self.best_lower_bound.is_none_or(|best| bound <= best)
    }

    fn explore(&mut self, mut frame: Frame) {
        while frame.level() != self.terminal_level && self.within_best(frame.lower_bound()) {
            // a freshly popped sibling starts from a clean copy of the
            // original matrix; its carried bound served the pop-time pruning
            // check above and is now recomputed from its own reductions
            if frame.level() == 0 {
                frame.reset_lower_bound();
            }

            let delta = frame.reduce();
            frame.add_to_bound(delta);
            if !self.within_best(frame.lower_bound()) {
                break;
            }

            let Some(candidate) = frame.select_next_edge() else {
                // no zero cell anywhere: the restrictions of this branch
                // admit no completion
                return;
            };

            frame.fix_edge(candidate.edge);
            frame.apply_edge_constraints(candidate.edge);

            // the sibling represents "what if we had not taken that edge",
            // on top of everything this lineage already excludes
            let sibling_bound = frame.lower_bound() + candidate.exclusion_cost;
            self.stack
                .push(frame.excluded_branch(&self.original, candidate.edge, sibling_bound));
        }

        if frame.level() != self.terminal_level || !self.within_best(frame.lower_bound()) {
            return;
        }

        if let Some(tour) = frame.reconstruct_tour() {
            // reconstruction folds the residual reduction into the bound;
            // completions that end up above the incumbent are discarded like
            // pruned nodes
            if !self.within_best(frame.lower_bound()) {
                return;
            }

            // the recorded cost is recomputed exactly from the raw input
            // matrix; the pruning bound keeps the node's lower bound
            if let Some(cost) = tour.cost(&self.original) {
                trace!(
                    "tour {:?} with cost {cost} (bound {})",
                    tour.vertices(),
                    frame.lower_bound()
                );

                self.best_lower_bound = Some(frame.lower_bound());
                self.solutions.push(Solution { cost, tour });
            }
        }
    }
}

impl TerminatingIterativeAlgorithm<Solutions> for BranchAndBound {}

impl IterativeAlgorithm<Solutions> for BranchAndBound {
    fn execute_step(&mut self) {
        if let Some(frame) = self.stack.pop() {
            self.iterations += 1;
            self.explore(frame);
        }
    }

    fn is_completed(&self) -> bool {
        self.stack.is_empty()
    }

    fn best_known_solution(&mut self) -> Option<Solutions> {
        if self.solutions.is_empty() {
            return None;
        }
        Some(filter_optimal(self.solutions.clone()))
    }
}
