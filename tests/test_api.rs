//! End-to-end pipeline tests with exact expected values.

use cohort::labeled::{Axis, LabeledTrace};
use cohort::markov;
use cohort::model::{
    example_qol_weights, example_row_structures, example_transition_counts,
    example_transition_matrix, STATE_NAMES,
};
use cohort::outcomes::{discounted_qalys, qaly_distribution, total_discounted_qalys};
use cohort::psa::{sample_transition_matrices, simulate_batch, RowStructure};
use cohort::types::{ModelError, TransitionMatrix};

#[test]
fn deterministic_pipeline_exact_values() {
    let trans_probs = example_transition_matrix();
    let trace = markov::simulate(&trans_probs, 5);

    assert_eq!(trace.n_cycles(), 5);
    assert_eq!(trace.cycle(0), &[1.0, 0.0, 0.0]);
    // One cycle from unit mass reproduces the first matrix row exactly
    assert_eq!(trace.cycle(1), &[0.8, 0.1, 0.1]);

    // Cycle 2 by hand: [0.64, 0.08 + 0.05, 0.08 + 0.05 + 0.1]
    let occ = trace.cycle(2);
    assert!((occ[0] - 0.64).abs() < 1e-12);
    assert!((occ[1] - 0.13).abs() < 1e-12);
    assert!((occ[2] - 0.23).abs() < 1e-12);

    let qol = example_qol_weights();
    let qalys = discounted_qalys(&trace, &qol, 0.03).unwrap();
    assert_eq!(qalys.len(), 6);
    assert_eq!(qalys[0], 0.8);
    assert!((qalys[1] - 0.7 / 1.03).abs() < 1e-12);

    let total = total_discounted_qalys(&trace, &qol, 0.03).unwrap();
    assert_eq!(total, qalys.iter().sum::<f64>());
}

#[test]
fn psa_pipeline_end_to_end() {
    let counts = example_transition_counts(100);
    let structures = example_row_structures();

    let ensemble = sample_transition_matrices(&counts, &structures, 200, 42).unwrap();
    assert_eq!(ensemble.len(), 200);

    let psa_trace = simulate_batch(&ensemble, 5).unwrap();
    assert_eq!(psa_trace.n_sims(), 200);
    assert_eq!(psa_trace.n_cycles(), 5);
    assert_eq!(psa_trace.n_states(), 3);

    // Every draw is a valid Markov trace
    for sim in [0, 99, 199] {
        assert_eq!(psa_trace.cycle(sim, 0), &[1.0, 0.0, 0.0]);
        let mut dead = 0.0;
        for t in 0..=5 {
            let occ = psa_trace.cycle(sim, t);
            let sum: f64 = occ.iter().sum();
            assert!((sum - 1.0).abs() < 1e-9);
            assert!(occ[2] >= dead, "Dead occupancy decreased");
            dead = occ[2];
        }
    }

    let dist = qaly_distribution(&psa_trace, &example_qol_weights(), 0.03).unwrap();
    assert_eq!(dist.n_sims, 200);
    assert!(dist.min <= dist.median && dist.median <= dist.max);
    assert!(dist.std_dev > 0.0);

    // The Dirichlet rows are centered on the example probabilities, so the
    // PSA mean lands near the deterministic total
    let deterministic = total_discounted_qalys(
        &markov::simulate(&example_transition_matrix(), 5),
        &example_qol_weights(),
        0.03,
    )
    .unwrap();
    assert!(
        (dist.mean - deterministic).abs() < 0.15,
        "PSA mean {} far from deterministic total {}",
        dist.mean,
        deterministic
    );
}

#[test]
fn single_draw_psa_matches_deterministic_simulator() {
    let counts = example_transition_counts(100);
    let ensemble =
        sample_transition_matrices(&counts, &example_row_structures(), 1, 7).unwrap();
    let psa_trace = simulate_batch(&ensemble, 5).unwrap();
    let single = markov::simulate(&ensemble[0], 5);
    assert_eq!(psa_trace.sim_trace(0), single.as_flat());
}

#[test]
fn mean_over_identical_draws_equals_deterministic_trace() {
    let m = example_transition_matrix();
    let psa_trace = simulate_batch(&vec![m.clone(); 16], 5).unwrap();
    let labeled = LabeledTrace::new(&psa_trace, &STATE_NAMES).unwrap();
    let mean = labeled.mean_over(Axis::Sim);

    let single = markov::simulate(&m, 5);
    for (t, occ) in single.cycles().enumerate() {
        for (s, &expected) in occ.iter().enumerate() {
            assert!((mean.value(t, s) - expected).abs() < 1e-12);
        }
    }
}

#[test]
fn error_paths_surface_the_right_variants() {
    // A row that does not sum to 1
    let err = TransitionMatrix::from_rows(&[
        vec![0.9, 0.2, 0.0],
        vec![0.0, 0.5, 0.5],
        vec![0.0, 0.0, 1.0],
    ])
    .unwrap_err();
    assert!(matches!(err, ModelError::InvalidProbability { row: 0, .. }));

    // QoL weight vector of the wrong length
    let trace = markov::simulate(&example_transition_matrix(), 5);
    let err = discounted_qalys(&trace, &[1.0], 0.03).unwrap_err();
    assert!(matches!(err, ModelError::Shape { .. }));

    // A zero count used as a Dirichlet concentration
    let counts = example_transition_counts(100);
    let all_free = vec![RowStructure::Free; 3];
    let err = sample_transition_matrices(&counts, &all_free, 10, 42).unwrap_err();
    assert!(matches!(err, ModelError::InvalidConcentration { .. }));
}
