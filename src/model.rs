//! The fixed example disease model: three health states with annual
//! transition probabilities.
//!
//! The numbers are illustrative, not fitted to epidemiological data.
//! Everything is exposed as constructor functions rather than module-level
//! globals so analyses and tests can substitute arbitrary matrices.

use crate::psa::RowStructure;
use crate::types::{TransitionCounts, TransitionMatrix};

/// Health-state names, in matrix row order.
pub const STATE_NAMES: [&str; 3] = ["Sick", "Sicker", "Dead"];

/// Default annual discount rate for the example analyses.
pub const DISCOUNT_RATE: f64 = 0.03;

/// Default per-row sample size when scaling the example matrix into counts.
pub const SAMPLE_SIZE: u64 = 100;

/// Example 3×3 transition-probability matrix.
///
/// Sick patients can stay, worsen, or die; Sicker patients cannot recover;
/// Dead is absorbing.
pub fn example_transition_matrix() -> TransitionMatrix {
    TransitionMatrix::from_rows(&[
        vec![0.8, 0.1, 0.1],
        vec![0.0, 0.5, 0.5],
        vec![0.0, 0.0, 1.0],
    ])
    .expect("example matrix is row-stochastic")
}

/// Scale the example matrix into integer transition counts, as if each row
/// had been estimated from `sample_size` observed patients.
pub fn example_transition_counts(sample_size: u64) -> TransitionCounts {
    let m = example_transition_matrix();
    let rows: Vec<Vec<u64>> = (0..m.n_states())
        .map(|i| {
            m.row(i)
                .iter()
                .map(|p| (p * sample_size as f64).round() as u64)
                .collect()
        })
        .collect();
    TransitionCounts::from_rows(&rows).expect("scaled counts keep the matrix shape")
}

/// Per-row sampling structure for the example model.
///
/// Sick transitions everywhere; Sicker → Sick is structurally impossible
/// (index 0 excluded, not merely rare); Dead is absorbing and never sampled.
pub fn example_row_structures() -> Vec<RowStructure> {
    vec![
        RowStructure::Free,
        RowStructure::Forbidden(vec![0]),
        RowStructure::Absorbing,
    ]
}

/// Quality-of-life weight per state. Dead contributes nothing.
pub fn example_qol_weights() -> Vec<f64> {
    vec![0.8, 0.6, 0.0]
}
