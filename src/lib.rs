//! # Cohort — Markov cohort disease modeling with probabilistic sensitivity analysis
//!
//! Computes state-occupancy trajectories for a small multi-state disease model
//! used in health-economic evaluation. A cohort starts with all mass in the
//! first health state and is pushed forward through a row-stochastic
//! transition matrix, one annual cycle at a time; the resulting trace is
//! aggregated into discounted quality-adjusted life years (QALYs).
//!
//! A second analysis mode propagates parameter uncertainty: transition
//! matrices are drawn from per-row Dirichlet distributions fit to observed
//! transition counts, the cohort recurrence is re-run for every draw, and the
//! resulting bundle of traces is summarized as a distribution of outcomes.
//!
//! ## Pipeline
//!
//! | Stage | Module | Description |
//! |-------|--------|-------------|
//! | Model | [`model`] | Fixed example model: states, transition matrix, counts, QoL weights |
//! | Simulate | [`markov`] | Deterministic cohort recurrence producing a [`markov::MarkovTrace`] |
//! | Aggregate | [`outcomes`] | Discounted QALY series and distribution summaries |
//! | Sample | [`psa::sampler`] | Dirichlet ensemble of plausible transition matrices |
//! | Batch | [`psa::engine`] | The same recurrence run across every ensemble member |
//! | Label | [`labeled`] | Named-axis view (`sim` × `cycle` × `state`) with reductions |
//!
//! The deterministic path is `model` → `markov` → `outcomes`; the
//! probabilistic path scales the example matrix into integer counts, then
//! runs `psa::sampler` → `psa::engine` → `labeled`. The two paths share no
//! mutable state; every stage is a pure function from inputs to a new value.

pub mod labeled;
pub mod markov;
pub mod model;
pub mod outcomes;
pub mod psa;
pub mod types;
