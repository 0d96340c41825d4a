//! Named-axis view over a PSA trace for downstream inspection.
//!
//! Attaches axis names (`sim`, `cycle`, `state`) and per-axis labels to the
//! raw 3-axis occupancy array so results can be indexed and reduced by name
//! instead of position. Pure relabeling: construction and reduction never
//! alter a stored occupancy value.

use serde::Serialize;

use crate::psa::PsaTrace;
use crate::types::ModelError;

/// The three named axes of a labeled PSA trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Sim,
    Cycle,
    State,
}

impl Axis {
    /// Resolve an axis by name.
    pub fn from_name(name: &str) -> Option<Axis> {
        match name {
            "sim" => Some(Axis::Sim),
            "cycle" => Some(Axis::Cycle),
            "state" => Some(Axis::State),
            _ => None,
        }
    }

    /// The axis name.
    pub fn name(self) -> &'static str {
        match self {
            Axis::Sim => "sim",
            Axis::Cycle => "cycle",
            Axis::State => "state",
        }
    }
}

/// PSA trace with named axes: `sim` × `cycle` × `state`.
#[derive(Clone, Debug, Serialize)]
pub struct LabeledTrace {
    /// Simulation index labels, `0..n_sims`.
    sims: Vec<usize>,
    /// Cycle labels, `0..=n_cycles`.
    cycles: Vec<usize>,
    /// Health-state names, in matrix order.
    states: Vec<String>,
    /// Flat `[sim][cycle][state]` occupancy values, copied unchanged.
    values: Vec<f64>,
}

impl LabeledTrace {
    /// Attach state names to a PSA trace.
    ///
    /// Fails with [`ModelError::Shape`] if the name count does not match
    /// the trace's state dimension.
    pub fn new(trace: &PsaTrace, state_names: &[&str]) -> Result<Self, ModelError> {
        if state_names.len() != trace.n_states() {
            return Err(ModelError::Shape {
                context: "state names",
                expected: trace.n_states(),
                actual: state_names.len(),
            });
        }
        Ok(Self {
            sims: (0..trace.n_sims()).collect(),
            cycles: (0..=trace.n_cycles()).collect(),
            states: state_names.iter().map(|s| s.to_string()).collect(),
            values: trace.as_flat().to_vec(),
        })
    }

    /// Number of draws.
    pub fn n_sims(&self) -> usize {
        self.sims.len()
    }

    /// Number of cycle rows (`n_cycles + 1`).
    pub fn n_cycle_rows(&self) -> usize {
        self.cycles.len()
    }

    /// State names in axis order.
    pub fn state_names(&self) -> &[String] {
        &self.states
    }

    /// The flat `[sim][cycle][state]` buffer.
    pub fn as_flat(&self) -> &[f64] {
        &self.values
    }

    /// Occupancy of the named state for draw `sim` at cycle `t`, or `None`
    /// if the state name or either index is unknown.
    pub fn value(&self, sim: usize, cycle: usize, state: &str) -> Option<f64> {
        let s = self.states.iter().position(|name| name == state)?;
        if sim >= self.sims.len() || cycle >= self.cycles.len() {
            return None;
        }
        let n_states = self.states.len();
        Some(self.values[(sim * self.cycles.len() + cycle) * n_states + s])
    }

    /// Mean along one named axis; the result keeps the other two axes.
    pub fn mean_over(&self, axis: Axis) -> LabeledPlane {
        let (n_sims, n_rows, n_states) =
            (self.sims.len(), self.cycles.len(), self.states.len());
        let at = |sim: usize, cycle: usize, state: usize| {
            self.values[(sim * n_rows + cycle) * n_states + state]
        };

        match axis {
            Axis::Sim => {
                let mut values = vec![0.0; n_rows * n_states];
                for (c, slot) in values.chunks_exact_mut(n_states).enumerate() {
                    for (s, v) in slot.iter_mut().enumerate() {
                        *v = (0..n_sims).map(|k| at(k, c, s)).sum::<f64>() / n_sims as f64;
                    }
                }
                LabeledPlane {
                    row_axis: Axis::Cycle,
                    col_axis: Axis::State,
                    row_labels: self.cycles.iter().map(|c| c.to_string()).collect(),
                    col_labels: self.states.clone(),
                    values,
                }
            }
            Axis::Cycle => {
                let mut values = vec![0.0; n_sims * n_states];
                for (k, slot) in values.chunks_exact_mut(n_states).enumerate() {
                    for (s, v) in slot.iter_mut().enumerate() {
                        *v = (0..n_rows).map(|c| at(k, c, s)).sum::<f64>() / n_rows as f64;
                    }
                }
                LabeledPlane {
                    row_axis: Axis::Sim,
                    col_axis: Axis::State,
                    row_labels: self.sims.iter().map(|k| k.to_string()).collect(),
                    col_labels: self.states.clone(),
                    values,
                }
            }
            Axis::State => {
                let mut values = vec![0.0; n_sims * n_rows];
                for (k, slot) in values.chunks_exact_mut(n_rows).enumerate() {
                    for (c, v) in slot.iter_mut().enumerate() {
                        *v = (0..n_states).map(|s| at(k, c, s)).sum::<f64>() / n_states as f64;
                    }
                }
                LabeledPlane {
                    row_axis: Axis::Sim,
                    col_axis: Axis::Cycle,
                    row_labels: self.sims.iter().map(|k| k.to_string()).collect(),
                    col_labels: self.cycles.iter().map(|c| c.to_string()).collect(),
                    values,
                }
            }
        }
    }
}

/// Two-axis reduction result, e.g. mean occupancy per cycle and state.
#[derive(Clone, Debug, Serialize)]
pub struct LabeledPlane {
    pub row_axis: Axis,
    pub col_axis: Axis,
    pub row_labels: Vec<String>,
    pub col_labels: Vec<String>,
    /// Row-major values, `row_labels.len()` × `col_labels.len()`.
    values: Vec<f64>,
}

impl LabeledPlane {
    /// Value at (`row`, `col`).
    pub fn value(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.col_labels.len() + col]
    }

    /// One full row.
    pub fn row(&self, row: usize) -> &[f64] {
        let w = self.col_labels.len();
        &self.values[row * w..(row + 1) * w]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{example_transition_matrix, STATE_NAMES};
    use crate::psa::simulate_batch;

    fn labeled_fixture(n_sims: usize, n_cycles: usize) -> (PsaTrace, LabeledTrace) {
        let m = example_transition_matrix();
        let psa = simulate_batch(&vec![m; n_sims], n_cycles).unwrap();
        let labeled = LabeledTrace::new(&psa, &STATE_NAMES).unwrap();
        (psa, labeled)
    }

    #[test]
    fn test_axis_names_round_trip() {
        for axis in [Axis::Sim, Axis::Cycle, Axis::State] {
            assert_eq!(Axis::from_name(axis.name()), Some(axis));
        }
        assert_eq!(Axis::from_name("draw"), None);
    }

    #[test]
    fn test_values_pass_through_unchanged() {
        let (psa, labeled) = labeled_fixture(4, 5);
        assert_eq!(labeled.as_flat(), psa.as_flat());
    }

    #[test]
    fn test_value_lookup_by_state_name() {
        let (psa, labeled) = labeled_fixture(2, 5);
        assert_eq!(labeled.value(1, 3, "Sicker"), Some(psa.cycle(1, 3)[1]));
        assert_eq!(labeled.value(0, 0, "Sick"), Some(1.0));
        assert_eq!(labeled.value(0, 0, "Cured"), None);
        assert_eq!(labeled.value(9, 0, "Sick"), None);
    }

    #[test]
    fn test_mean_over_sim_shape() {
        let (_, labeled) = labeled_fixture(3, 5);
        let plane = labeled.mean_over(Axis::Sim);
        assert_eq!(plane.row_axis, Axis::Cycle);
        assert_eq!(plane.col_axis, Axis::State);
        assert_eq!(plane.row_labels.len(), 6);
        assert_eq!(plane.col_labels, STATE_NAMES);
    }

    #[test]
    fn test_mean_over_identical_draws_reproduces_each() {
        let (psa, labeled) = labeled_fixture(5, 4);
        let plane = labeled.mean_over(Axis::Sim);
        for t in 0..=4 {
            for (s, &expected) in psa.cycle(0, t).iter().enumerate() {
                assert!((plane.value(t, s) - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_mean_over_state_averages_mass() {
        // Occupancy sums to 1 per cycle, so the state-mean is 1/n_states
        let (_, labeled) = labeled_fixture(2, 3);
        let plane = labeled.mean_over(Axis::State);
        for k in 0..2 {
            for c in 0..=3 {
                assert!((plane.value(k, c) - 1.0 / 3.0).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_rejects_wrong_name_count() {
        let m = example_transition_matrix();
        let psa = simulate_batch(&[m], 2).unwrap();
        let err = LabeledTrace::new(&psa, &["A", "B"]).unwrap_err();
        assert!(matches!(
            err,
            ModelError::Shape {
                expected: 3,
                actual: 2,
                ..
            }
        ));
    }
}
