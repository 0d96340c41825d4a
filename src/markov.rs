//! Deterministic cohort simulation — propagate state occupancy through the
//! transition matrix cycle by cycle.
//!
//! Starting with unit mass in the first state, push the occupancy
//! distribution forward one cycle at a time: `cycle(t+1) = cycle(t) · M`.
//! Plain linear recurrence — no randomness, no branching; identical inputs
//! give bit-identical traces.

use crate::types::{validate_probability_row, ModelError, TransitionMatrix};

/// State-occupancy trace: one occupancy distribution per model cycle.
///
/// Flat row-major storage, `n_states` entries per cycle `0..=n_cycles`.
/// Invariants: `cycle(0)` is the starting distribution, every later cycle
/// is the previous one pushed through the matrix, and each cycle's mass
/// sums to 1 up to floating-point rounding.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkovTrace {
    n_states: usize,
    probs: Vec<f64>,
}

impl MarkovTrace {
    /// Number of health states.
    pub fn n_states(&self) -> usize {
        self.n_states
    }

    /// Number of simulated cycles; the trace holds `n_cycles + 1` rows.
    pub fn n_cycles(&self) -> usize {
        self.probs.len() / self.n_states - 1
    }

    /// Occupancy distribution at cycle `t`.
    pub fn cycle(&self, t: usize) -> &[f64] {
        &self.probs[t * self.n_states..(t + 1) * self.n_states]
    }

    /// All cycles in order, one distribution per item.
    pub fn cycles(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.probs.chunks_exact(self.n_states)
    }

    /// The underlying cycle-major buffer.
    pub fn as_flat(&self) -> &[f64] {
        &self.probs
    }
}

/// Simulate disease progression for a cohort starting in the first state.
///
/// The matrix is valid by construction and the start vector is derived from
/// its dimension, so this cannot fail.
pub fn simulate(trans_probs: &TransitionMatrix, n_cycles: usize) -> MarkovTrace {
    let n = trans_probs.n_states();
    let mut start = vec![0.0; n];
    start[0] = 1.0;
    propagate(&start, trans_probs, n_cycles)
}

/// Simulate from an arbitrary starting distribution.
///
/// Fails with [`ModelError::Shape`] on a length mismatch against the matrix
/// and [`ModelError::InvalidProbability`] if the start is not a
/// distribution.
pub fn simulate_from(
    start: &[f64],
    trans_probs: &TransitionMatrix,
    n_cycles: usize,
) -> Result<MarkovTrace, ModelError> {
    let n = trans_probs.n_states();
    if start.len() != n {
        return Err(ModelError::Shape {
            context: "starting distribution",
            expected: n,
            actual: start.len(),
        });
    }
    validate_probability_row(start, 0)?;
    Ok(propagate(start, trans_probs, n_cycles))
}

/// Forward fill of the trace buffer, the only in-place mutation in the
/// crate; local to the buffer being built.
fn propagate(start: &[f64], trans_probs: &TransitionMatrix, n_cycles: usize) -> MarkovTrace {
    let n = trans_probs.n_states();
    let mut probs = vec![0.0; (n_cycles + 1) * n];
    probs[..n].copy_from_slice(start);

    for t in 0..n_cycles {
        let (filled, rest) = probs.split_at_mut((t + 1) * n);
        let current = &filled[t * n..];
        let next = &mut rest[..n];
        for (j, slot) in next.iter_mut().enumerate() {
            *slot = (0..n).map(|i| current[i] * trans_probs.row(i)[j]).sum();
        }
    }

    MarkovTrace {
        n_states: n,
        probs,
    }
}
