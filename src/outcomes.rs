//! Outcome aggregation: discounted quality-adjusted life years.
//!
//! Each cycle contributes the dot product of its occupancy distribution
//! with the quality-of-life weights, discounted at `(1 + r)^-t` with one
//! cycle per year. The probabilistic analysis additionally summarizes the
//! per-draw totals as a distribution.

use serde::Serialize;

use crate::markov::MarkovTrace;
use crate::psa::PsaTrace;
use crate::types::ModelError;

/// Discounted QALYs per cycle: `(occupancy · qol) / (1 + r)^t`.
///
/// Same length as the trace; cycle 0 is undiscounted.
pub fn discounted_qalys(
    trace: &MarkovTrace,
    qol_weights: &[f64],
    discount_rate: f64,
) -> Result<Vec<f64>, ModelError> {
    check_weights(qol_weights, trace.n_states(), discount_rate)?;
    Ok(trace
        .cycles()
        .enumerate()
        .map(|(t, occ)| dot(occ, qol_weights) / (1.0 + discount_rate).powi(t as i32))
        .collect())
}

/// Total discounted QALYs over the whole trace, the scalar an evaluation
/// reports per strategy.
pub fn total_discounted_qalys(
    trace: &MarkovTrace,
    qol_weights: &[f64],
    discount_rate: f64,
) -> Result<f64, ModelError> {
    Ok(discounted_qalys(trace, qol_weights, discount_rate)?
        .iter()
        .sum())
}

/// Distribution of total discounted QALYs across PSA draws.
#[derive(Debug, Clone, Serialize)]
pub struct QalyDistribution {
    pub n_sims: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub percentiles: Percentiles,
}

#[derive(Debug, Clone, Serialize)]
pub struct Percentiles {
    pub p5: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p95: f64,
}

/// Summarize total discounted QALYs per draw across a PSA trace.
pub fn qaly_distribution(
    psa: &PsaTrace,
    qol_weights: &[f64],
    discount_rate: f64,
) -> Result<QalyDistribution, ModelError> {
    check_weights(qol_weights, psa.n_states(), discount_rate)?;

    let n_sims = psa.n_sims();
    let mut totals: Vec<f64> = (0..n_sims)
        .map(|sim| {
            (0..=psa.n_cycles())
                .map(|t| dot(psa.cycle(sim, t), qol_weights) / (1.0 + discount_rate).powi(t as i32))
                .sum()
        })
        .collect();
    totals.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let n = n_sims as f64;
    let mean: f64 = totals.iter().sum::<f64>() / n;
    let variance: f64 = totals.iter().map(|&q| (q - mean).powi(2)).sum::<f64>() / n;

    let percentile = |p: f64| -> f64 {
        let idx = ((p / 100.0) * (totals.len() - 1) as f64).round() as usize;
        totals[idx.min(totals.len() - 1)]
    };

    Ok(QalyDistribution {
        n_sims,
        mean,
        std_dev: variance.sqrt(),
        min: totals[0],
        max: *totals.last().unwrap(),
        median: percentile(50.0),
        percentiles: Percentiles {
            p5: percentile(5.0),
            p25: percentile(25.0),
            p50: percentile(50.0),
            p75: percentile(75.0),
            p95: percentile(95.0),
        },
    })
}

fn check_weights(qol_weights: &[f64], n_states: usize, discount_rate: f64) -> Result<(), ModelError> {
    if qol_weights.len() != n_states {
        return Err(ModelError::Shape {
            context: "quality-of-life weights",
            expected: n_states,
            actual: qol_weights.len(),
        });
    }
    if discount_rate < 0.0 {
        return Err(ModelError::InvalidDiscount {
            rate: discount_rate,
        });
    }
    Ok(())
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
