pub mod branch_and_bound;

pub use branch_and_bound::*;

use crate::algorithm::TerminatingIterativeAlgorithm;
use crate::matrix::{Cost, CostMatrix};
use crate::utils::Tour;
use itertools::Itertools;
use log::info;
use serde::Serialize;

/// A complete tour together with its exact cost recomputed from the raw
/// input matrix.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Solution {
    pub cost: Cost,
    pub tour: Tour,
}

pub type Solutions = Vec<Solution>;

/// Keeps only the solutions tied at the minimum recorded cost, dropping
/// duplicate entries.
pub fn filter_optimal(solutions: Solutions) -> Solutions {
    let Some(optimal) = solutions.iter().map(|s| s.cost).min() else {
        return solutions;
    };

    solutions
        .into_iter()
        .filter(|s| s.cost == optimal)
        .unique()
        .collect()
}

/// Solves the instance to optimality and returns every minimum-cost tour.
pub fn branch_and_bound_solver(matrix: &CostMatrix) -> Solutions {
    let mut algo = BranchAndBound::new(matrix.clone());
    let solutions = algo
        .run_to_completion()
        .expect("a complete cost matrix always admits a tour");

    info!(
        "explored {} nodes, found {} optimal tour(s) of cost {}",
        algo.number_of_iterations(),
        solutions.len(),
        solutions[0].cost
    );

    solutions
}
