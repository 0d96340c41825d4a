//! Core value types: transition matrices, observed transition counts, and
//! the crate error type.
//!
//! Matrices are stored flat in row-major order with an `n_states` stride.
//! [`TransitionMatrix`] can only be built through its validating
//! constructor, so everything downstream of construction may assume a
//! well-formed row-stochastic matrix and stay infallible.

use std::fmt;

/// Tolerance for validating that a probability row sums to 1.
pub const ROW_SUM_TOLERANCE: f64 = 1e-6;

/// Errors surfaced by model construction, simulation, and sampling.
///
/// Every error is raised synchronously at the call that detects it; nothing
/// is retried or recovered internally.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// A vector, matrix, or label list had the wrong dimension for the
    /// operation.
    Shape {
        context: &'static str,
        expected: usize,
        actual: usize,
    },
    /// A supplied probability row is not a distribution: a negative or
    /// non-finite entry, or a sum outside [`ROW_SUM_TOLERANCE`] of 1.
    InvalidProbability { row: usize, sum: f64 },
    /// A Dirichlet concentration parameter was non-positive at a position
    /// that is not structurally forbidden.
    InvalidConcentration { row: usize, index: usize },
    /// A negative discount rate.
    InvalidDiscount { rate: f64 },
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::Shape {
                context,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "shape mismatch in {}: expected {}, got {}",
                    context, expected, actual
                )
            }
            ModelError::InvalidProbability { row, sum } => {
                write!(
                    f,
                    "row {} is not a probability distribution (sum = {})",
                    row, sum
                )
            }
            ModelError::InvalidConcentration { row, index } => {
                write!(
                    f,
                    "row {} has a non-positive Dirichlet concentration at index {}",
                    row, index
                )
            }
            ModelError::InvalidDiscount { rate } => {
                write!(f, "discount rate must be non-negative, got {}", rate)
            }
        }
    }
}

impl std::error::Error for ModelError {}

/// Validate one probability row: finite, non-negative entries summing to 1
/// within [`ROW_SUM_TOLERANCE`].
pub(crate) fn validate_probability_row(row: &[f64], index: usize) -> Result<(), ModelError> {
    let sum: f64 = row.iter().sum();
    if row.iter().any(|&p| !p.is_finite() || p < 0.0) || (sum - 1.0).abs() > ROW_SUM_TOLERANCE {
        return Err(ModelError::InvalidProbability { row: index, sum });
    }
    Ok(())
}

/// A row-stochastic transition-probability matrix over health states.
///
/// Row `i` is the distribution over next-state conditional on occupying
/// state `i` for one cycle. Valid by construction: [`Self::from_rows`]
/// rejects ragged input and rows that are not probability distributions.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionMatrix {
    n_states: usize,
    probs: Vec<f64>,
}

impl TransitionMatrix {
    /// Build from row slices, validating shape and row sums.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, ModelError> {
        let n_states = rows.len();
        if n_states == 0 {
            return Err(ModelError::Shape {
                context: "transition matrix",
                expected: 1,
                actual: 0,
            });
        }
        let mut probs = Vec::with_capacity(n_states * n_states);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n_states {
                return Err(ModelError::Shape {
                    context: "transition matrix row",
                    expected: n_states,
                    actual: row.len(),
                });
            }
            validate_probability_row(row, i)?;
            probs.extend_from_slice(row);
        }
        Ok(Self { n_states, probs })
    }

    /// Number of health states (the matrix is `n_states` × `n_states`).
    pub fn n_states(&self) -> usize {
        self.n_states
    }

    /// Probability row for state `i`.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.probs[i * self.n_states..(i + 1) * self.n_states]
    }
}

/// Observed transition counts per starting state.
///
/// Used only as Dirichlet concentration parameters by the uncertainty
/// sampler; which entries are allowed to be zero is declared separately by
/// the caller, not inferred from the counts.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionCounts {
    n_states: usize,
    counts: Vec<u64>,
}

impl TransitionCounts {
    /// Build from row slices, validating squareness.
    pub fn from_rows(rows: &[Vec<u64>]) -> Result<Self, ModelError> {
        let n_states = rows.len();
        if n_states == 0 {
            return Err(ModelError::Shape {
                context: "transition counts",
                expected: 1,
                actual: 0,
            });
        }
        let mut counts = Vec::with_capacity(n_states * n_states);
        for row in rows {
            if row.len() != n_states {
                return Err(ModelError::Shape {
                    context: "transition counts row",
                    expected: n_states,
                    actual: row.len(),
                });
            }
            counts.extend_from_slice(row);
        }
        Ok(Self { n_states, counts })
    }

    /// Number of health states.
    pub fn n_states(&self) -> usize {
        self.n_states
    }

    /// Count row for starting state `i`.
    pub fn row(&self, i: usize) -> &[u64] {
        &self.counts[i * self.n_states..(i + 1) * self.n_states]
    }
}
