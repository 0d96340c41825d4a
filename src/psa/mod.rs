//! Probabilistic sensitivity analysis.
//!
//! - [`sampler`]: draw an ensemble of plausible transition matrices from
//!   observed transition counts (per-row Dirichlet)
//! - [`engine`]: run the cohort recurrence across every ensemble member

pub mod engine;
pub mod sampler;

pub use engine::{simulate_batch, PsaTrace};
pub use sampler::{sample_transition_matrices, RowStructure};
