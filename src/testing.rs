use crate::matrix::{Cost, CostMatrix, NumVertices};
use crate::utils::Tour;
use itertools::Itertools as _;
use rand::Rng;

/// Builds a matrix from signed literals where -1 marks an absent entry.
pub fn matrix_from_rows(rows: &[&[i64]]) -> CostMatrix {
    CostMatrix::try_from_rows(
        rows.iter()
            .map(|row| {
                row.iter()
                    .map(|&value| (value >= 0).then_some(value as Cost))
                    .collect()
            })
            .collect(),
    )
    .expect("malformed test matrix")
}

/// A complete instance with uniform costs; `symmetric` mirrors the upper
/// triangle into the lower one.
pub fn random_matrix(rng: &mut impl Rng, n: NumVertices, symmetric: bool) -> CostMatrix {
    let mut rows = vec![vec![None; n as usize]; n as usize];

    for r in 0..n as usize {
        for c in 0..n as usize {
            if r == c {
                continue;
            }
            if symmetric && c < r {
                rows[r][c] = rows[c][r];
                continue;
            }
            rows[r][c] = Some(rng.gen_range(1..=50u64));
        }
    }

    CostMatrix::try_from_rows(rows).expect("random matrix must be well-formed")
}

/// Enumerates every tour starting at vertex 0 and returns the minimum cost
/// together with all tours attaining it. Exponential; test-sized inputs only.
pub fn brute_force_optimum(matrix: &CostMatrix) -> (Cost, Vec<Tour>) {
    let n = matrix.number_of_vertices();
    let mut best: Option<(Cost, Vec<Tour>)> = None;

    for perm in (1..n).permutations(n as usize - 1) {
        let tour = Tour::new(std::iter::once(0).chain(perm).collect());
        let Some(cost) = tour.cost(matrix) else {
            continue;
        };

        match &mut best {
            Some((optimum, tours)) => {
                if cost < *optimum {
                    *optimum = cost;
                    *tours = vec![tour];
                } else if cost == *optimum {
                    tours.push(tour);
                }
            }
            None => best = Some((cost, vec![tour])),
        }
    }

    best.expect("a complete matrix admits at least one tour")
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    #[test]
    fn brute_force_on_known_instance() {
        let matrix = matrix_from_rows(&[
            &[-1, 10, 15, 20],
            &[10, -1, 35, 25],
            &[15, 35, -1, 30],
            &[20, 25, 30, -1],
        ]);

        let (optimum, tours) = brute_force_optimum(&matrix);
        assert_eq!(optimum, 80);
        // the unique optimal cycle, traversed in both directions
        assert_eq!(tours.len(), 2);
    }

    #[test]
    fn random_symmetric_matrix_is_symmetric() {
        let mut rng = Pcg64::seed_from_u64(42);
        let matrix = random_matrix(&mut rng, 8, true);

        for r in matrix.vertices_range() {
            for c in matrix.vertices_range() {
                assert_eq!(matrix.get(r, c), matrix.get(c, r));
            }
        }
    }
}
