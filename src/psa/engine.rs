//! Batched cohort simulation over a sampled transition-matrix ensemble.
//!
//! Runs the deterministic recurrence once per ensemble member, in parallel
//! across the simulation axis. Results are observably identical to calling
//! [`crate::markov::simulate`] member by member in any order; the batch
//! exists only so draws can run concurrently and land in one buffer.

use rayon::prelude::*;

use crate::markov::{self, MarkovTrace};
use crate::types::{ModelError, TransitionMatrix};

/// Occupancy traces for every PSA draw.
///
/// `n_sims` parallel Markov traces sharing cycle and state indexing, stored
/// flat as `[sim][cycle][state]`.
#[derive(Clone, Debug, PartialEq)]
pub struct PsaTrace {
    n_sims: usize,
    n_cycles: usize,
    n_states: usize,
    probs: Vec<f64>,
}

impl PsaTrace {
    /// Number of draws.
    pub fn n_sims(&self) -> usize {
        self.n_sims
    }

    /// Number of simulated cycles; each draw holds `n_cycles + 1` rows.
    pub fn n_cycles(&self) -> usize {
        self.n_cycles
    }

    /// Number of health states.
    pub fn n_states(&self) -> usize {
        self.n_states
    }

    /// Occupancy distribution for draw `sim` at cycle `t`.
    pub fn cycle(&self, sim: usize, t: usize) -> &[f64] {
        let offset = (sim * (self.n_cycles + 1) + t) * self.n_states;
        &self.probs[offset..offset + self.n_states]
    }

    /// The full cycle-major trace of one draw.
    pub fn sim_trace(&self, sim: usize) -> &[f64] {
        let stride = (self.n_cycles + 1) * self.n_states;
        &self.probs[sim * stride..(sim + 1) * stride]
    }

    /// The underlying sim-major buffer.
    pub fn as_flat(&self) -> &[f64] {
        &self.probs
    }
}

/// Run the cohort recurrence independently for every ensemble member, unit
/// mass in the first state for each.
///
/// Fails with [`ModelError::Shape`] on an empty ensemble or members of
/// differing dimension.
pub fn simulate_batch(
    ensemble: &[TransitionMatrix],
    n_cycles: usize,
) -> Result<PsaTrace, ModelError> {
    let first = ensemble.first().ok_or(ModelError::Shape {
        context: "ensemble",
        expected: 1,
        actual: 0,
    })?;
    let n_states = first.n_states();
    for m in ensemble {
        if m.n_states() != n_states {
            return Err(ModelError::Shape {
                context: "ensemble member",
                expected: n_states,
                actual: m.n_states(),
            });
        }
    }

    let traces: Vec<MarkovTrace> = ensemble
        .par_iter()
        .map(|m| markov::simulate(m, n_cycles))
        .collect();

    let mut probs = Vec::with_capacity(ensemble.len() * (n_cycles + 1) * n_states);
    for trace in &traces {
        probs.extend_from_slice(trace.as_flat());
    }

    Ok(PsaTrace {
        n_sims: ensemble.len(),
        n_cycles,
        n_states,
        probs,
    })
}
