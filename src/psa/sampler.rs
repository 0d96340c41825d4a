//! Transition-matrix ensemble sampling.
//!
//! Each draw builds a complete transition matrix by sampling every row from
//! a Dirichlet distribution whose concentration parameters are that row's
//! observed transition counts. Which entries may be zero is declared per
//! row through [`RowStructure`], never inferred from count positions:
//! structurally impossible targets are excluded from the draw and spliced
//! back as exact zeros, and absorbing rows are pinned to the unit vector.
//!
//! Dirichlet vectors are drawn by Gamma-normalization — one `Gamma(α_i, 1)`
//! per reachable target, divided by their sum — which handles the
//! variable-length sub-ranges the structural masks produce. Draws are
//! seeded per simulation index, so the ensemble is a pure function of
//! (counts, structures, n_sims, seed) regardless of thread count.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Gamma};
use rayon::prelude::*;

use crate::types::{ModelError, TransitionCounts, TransitionMatrix};

/// How one matrix row participates in sampling.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RowStructure {
    /// Every target state is reachable; sample over the full row.
    Free,
    /// The listed target indices are structurally impossible and stay at
    /// exactly zero; the Dirichlet is drawn over the remaining targets.
    Forbidden(Vec<usize>),
    /// All mass stays in the state itself; the row is never sampled.
    Absorbing,
}

impl RowStructure {
    /// Target indices sampled for this row, given `n_states` columns.
    fn sampled_targets(&self, n_states: usize) -> Vec<usize> {
        match self {
            RowStructure::Free => (0..n_states).collect(),
            RowStructure::Forbidden(excluded) => {
                (0..n_states).filter(|j| !excluded.contains(j)).collect()
            }
            RowStructure::Absorbing => Vec::new(),
        }
    }
}

/// Draw `n_sims` independent transition matrices from per-row Dirichlet
/// distributions over `counts`.
///
/// All concentration parameters are validated before any sampling happens,
/// so the call either returns a full ensemble or fails without drawing.
/// Every returned matrix satisfies the row-stochastic invariant; rows
/// declared [`RowStructure::Absorbing`] are exact unit vectors in every
/// draw.
pub fn sample_transition_matrices(
    counts: &TransitionCounts,
    structures: &[RowStructure],
    n_sims: usize,
    seed: u64,
) -> Result<Vec<TransitionMatrix>, ModelError> {
    let n = counts.n_states();
    if structures.len() != n {
        return Err(ModelError::Shape {
            context: "row structures",
            expected: n,
            actual: structures.len(),
        });
    }
    if n_sims == 0 {
        return Err(ModelError::Shape {
            context: "simulation count",
            expected: 1,
            actual: 0,
        });
    }

    for (i, structure) in structures.iter().enumerate() {
        if let RowStructure::Forbidden(excluded) = structure {
            if let Some(&bad) = excluded.iter().find(|&&j| j >= n) {
                return Err(ModelError::Shape {
                    context: "forbidden target index",
                    expected: n,
                    actual: bad,
                });
            }
        }
        let targets = structure.sampled_targets(n);
        if matches!(structure, RowStructure::Forbidden(_)) && targets.is_empty() {
            // A mask covering every target leaves nothing to distribute
            return Err(ModelError::InvalidConcentration { row: i, index: 0 });
        }
        for &j in &targets {
            if counts.row(i)[j] == 0 {
                return Err(ModelError::InvalidConcentration { row: i, index: j });
            }
        }
    }

    Ok((0..n_sims)
        .into_par_iter()
        .map(|k| {
            let mut rng = SmallRng::seed_from_u64(seed.wrapping_add(k as u64));
            sample_one(counts, structures, &mut rng)
        })
        .collect())
}

/// Sample one complete transition matrix.
fn sample_one(
    counts: &TransitionCounts,
    structures: &[RowStructure],
    rng: &mut SmallRng,
) -> TransitionMatrix {
    let n = counts.n_states();
    let mut rows = Vec::with_capacity(n);

    for (i, structure) in structures.iter().enumerate() {
        let mut row = vec![0.0; n];
        match structure {
            RowStructure::Absorbing => row[i] = 1.0,
            _ => {
                let targets = structure.sampled_targets(n);
                let alphas: Vec<f64> =
                    targets.iter().map(|&j| counts.row(i)[j] as f64).collect();
                for (&j, p) in targets.iter().zip(sample_dirichlet(&alphas, rng)) {
                    row[j] = p;
                }
            }
        }
        rows.push(row);
    }

    TransitionMatrix::from_rows(&rows)
        .expect("normalized Dirichlet rows are row-stochastic")
}

/// One Dirichlet(α) vector via Gamma-normalization.
fn sample_dirichlet(alphas: &[f64], rng: &mut SmallRng) -> Vec<f64> {
    let draws: Vec<f64> = alphas
        .iter()
        .map(|&a| {
            Gamma::new(a, 1.0)
                .expect("concentration validated positive")
                .sample(rng)
        })
        .collect();
    let total: f64 = draws.iter().sum();
    draws.into_iter().map(|g| g / total).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{example_row_structures, example_transition_counts};

    #[test]
    fn test_ensemble_size_and_shape() {
        let counts = example_transition_counts(100);
        let ensemble =
            sample_transition_matrices(&counts, &example_row_structures(), 25, 42).unwrap();
        assert_eq!(ensemble.len(), 25);
        for m in &ensemble {
            assert_eq!(m.n_states(), 3);
        }
    }

    #[test]
    fn test_same_seed_is_deterministic() {
        let counts = example_transition_counts(100);
        let structures = example_row_structures();
        let a = sample_transition_matrices(&counts, &structures, 10, 7).unwrap();
        let b = sample_transition_matrices(&counts, &structures, 10, 7).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_differ() {
        let counts = example_transition_counts(100);
        let structures = example_row_structures();
        let a = sample_transition_matrices(&counts, &structures, 10, 1).unwrap();
        let b = sample_transition_matrices(&counts, &structures, 10, 2).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_forbidden_targets_stay_zero() {
        let counts = example_transition_counts(100);
        let ensemble =
            sample_transition_matrices(&counts, &example_row_structures(), 50, 42).unwrap();
        for m in &ensemble {
            assert_eq!(m.row(1)[0], 0.0);
            assert!(m.row(1)[1] > 0.0);
            assert!(m.row(1)[2] > 0.0);
        }
    }

    #[test]
    fn test_absorbing_rows_are_exact_unit_vectors() {
        let counts = example_transition_counts(100);
        let ensemble =
            sample_transition_matrices(&counts, &example_row_structures(), 50, 42).unwrap();
        for m in &ensemble {
            assert_eq!(m.row(2), &[0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn test_rejects_zero_concentration_in_free_row() {
        // Row 1 has a zero count but is declared Free
        let counts = example_transition_counts(100);
        let structures = vec![
            RowStructure::Free,
            RowStructure::Free,
            RowStructure::Absorbing,
        ];
        let err = sample_transition_matrices(&counts, &structures, 10, 42).unwrap_err();
        assert_eq!(
            err,
            ModelError::InvalidConcentration { row: 1, index: 0 }
        );
    }

    #[test]
    fn test_rejects_zero_sims() {
        let counts = example_transition_counts(100);
        let err =
            sample_transition_matrices(&counts, &example_row_structures(), 0, 42).unwrap_err();
        assert!(matches!(err, ModelError::Shape { .. }));
    }

    #[test]
    fn test_rejects_structure_count_mismatch() {
        let counts = example_transition_counts(100);
        let err = sample_transition_matrices(&counts, &[RowStructure::Free], 10, 42).unwrap_err();
        assert!(matches!(
            err,
            ModelError::Shape {
                expected: 3,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_fully_forbidden_row() {
        let counts = example_transition_counts(100);
        let structures = vec![
            RowStructure::Free,
            RowStructure::Forbidden(vec![0, 1, 2]),
            RowStructure::Absorbing,
        ];
        let err = sample_transition_matrices(&counts, &structures, 10, 42).unwrap_err();
        assert!(matches!(err, ModelError::InvalidConcentration { row: 1, .. }));
    }

    #[test]
    fn test_rejects_out_of_range_forbidden_index() {
        let counts = example_transition_counts(100);
        let structures = vec![
            RowStructure::Free,
            RowStructure::Forbidden(vec![5]),
            RowStructure::Absorbing,
        ];
        let err = sample_transition_matrices(&counts, &structures, 10, 42).unwrap_err();
        assert!(matches!(err, ModelError::Shape { .. }));
    }
}
