use std::time::Instant;

use cohort::labeled::{Axis, LabeledTrace};
use cohort::model::{
    example_qol_weights, example_row_structures, example_transition_counts,
    example_transition_matrix, DISCOUNT_RATE, SAMPLE_SIZE, STATE_NAMES,
};
use cohort::outcomes::{discounted_qalys, qaly_distribution, total_discounted_qalys};
use cohort::types::ModelError;
use cohort::{markov, psa};

struct Args {
    cycles: usize,
    sims: usize,
    seed: u64,
    discount: f64,
    sample_size: u64,
    output: Option<String>,
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut cycles = 5usize;
    let mut sims = 1000usize;
    let mut seed = 42u64;
    let mut discount = DISCOUNT_RATE;
    let mut sample_size = SAMPLE_SIZE;
    let mut output: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--cycles" => {
                i += 1;
                if i < args.len() {
                    cycles = args[i].parse().unwrap_or_else(|_| {
                        eprintln!("Invalid --cycles value: {}", args[i]);
                        std::process::exit(1);
                    });
                }
            }
            "--sims" => {
                i += 1;
                if i < args.len() {
                    sims = args[i].parse().unwrap_or_else(|_| {
                        eprintln!("Invalid --sims value: {}", args[i]);
                        std::process::exit(1);
                    });
                }
            }
            "--seed" => {
                i += 1;
                if i < args.len() {
                    seed = args[i].parse().unwrap_or_else(|_| {
                        eprintln!("Invalid --seed value: {}", args[i]);
                        std::process::exit(1);
                    });
                }
            }
            "--discount" => {
                i += 1;
                if i < args.len() {
                    discount = args[i].parse().unwrap_or_else(|_| {
                        eprintln!("Invalid --discount value: {}", args[i]);
                        std::process::exit(1);
                    });
                }
            }
            "--sample-size" => {
                i += 1;
                if i < args.len() {
                    sample_size = args[i].parse().unwrap_or_else(|_| {
                        eprintln!("Invalid --sample-size value: {}", args[i]);
                        std::process::exit(1);
                    });
                }
            }
            "--output" => {
                i += 1;
                if i < args.len() {
                    output = Some(args[i].clone());
                }
            }
            "--help" | "-h" => {
                println!(
                    "Usage: cohort-simulate [--cycles N] [--sims N] [--seed S] [--discount R] [--sample-size N] [--output DIR]"
                );
                println!();
                println!("Options:");
                println!("  --cycles N        Number of annual model cycles (default: 5)");
                println!("  --sims N          Number of PSA draws (default: 1000)");
                println!("  --seed S          RNG seed (default: 42)");
                println!("  --discount R      Annual discount rate (default: 0.03)");
                println!("  --sample-size N   Patients per row when scaling counts (default: 100)");
                println!("  --output DIR      Write psa_results.json to DIR");
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!(
                    "Usage: cohort-simulate [--cycles N] [--sims N] [--seed S] [--discount R] [--sample-size N] [--output DIR]"
                );
                std::process::exit(1);
            }
        }
        i += 1;
    }

    Args {
        cycles,
        sims,
        seed,
        discount,
        sample_size,
        output,
    }
}

fn unwrap_or_exit<T>(result: Result<T, ModelError>) -> T {
    result.unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    })
}

fn main() {
    let args = parse_args();

    // ── Deterministic analysis ──────────────────────────────────────────
    println!("Markov cohort model ({} cycles)", args.cycles);
    println!();

    let trans_probs = example_transition_matrix();
    println!("Transition probabilities:");
    print_header();
    for i in 0..trans_probs.n_states() {
        print_row(STATE_NAMES[i], trans_probs.row(i));
    }
    println!();

    let trace = markov::simulate(&trans_probs, args.cycles);
    println!("State occupancy by cycle:");
    print_header();
    for (t, occ) in trace.cycles().enumerate() {
        print_row(&format!("cycle {}", t), occ);
    }
    println!();

    let qol = example_qol_weights();
    let qalys = unwrap_or_exit(discounted_qalys(&trace, &qol, args.discount));
    let total = unwrap_or_exit(total_discounted_qalys(&trace, &qol, args.discount));
    println!("Discounted QALYs (r = {}):", args.discount);
    for (t, q) in qalys.iter().enumerate() {
        println!("  cycle {:>2}:  {:.5}", t, q);
    }
    println!("  total:     {:.5}", total);
    println!();

    // ── Probabilistic sensitivity analysis ──────────────────────────────
    println!(
        "PSA: {} draws, counts scaled from {} patients per row, seed {}",
        args.sims, args.sample_size, args.seed
    );

    let counts = example_transition_counts(args.sample_size);
    let structures = example_row_structures();

    let t0 = Instant::now();
    let ensemble = unwrap_or_exit(psa::sample_transition_matrices(
        &counts,
        &structures,
        args.sims,
        args.seed,
    ));
    let psa_trace = unwrap_or_exit(psa::simulate_batch(&ensemble, args.cycles));
    let elapsed_ms = t0.elapsed().as_secs_f64() * 1000.0;
    println!("  Sampled and simulated in {:.1} ms", elapsed_ms);
    println!();

    let labeled = unwrap_or_exit(LabeledTrace::new(&psa_trace, &STATE_NAMES));
    let mean_occupancy = labeled.mean_over(Axis::Sim);
    println!("Mean state occupancy across draws:");
    print_header();
    for (t, label) in mean_occupancy.row_labels.iter().enumerate() {
        print_row(&format!("cycle {}", label), mean_occupancy.row(t));
    }
    println!();

    let dist = unwrap_or_exit(qaly_distribution(&psa_trace, &qol, args.discount));
    println!("Total discounted QALYs across draws:");
    println!("  Mean:    {:.5}", dist.mean);
    println!("  Std dev: {:.5}", dist.std_dev);
    println!("  Min:     {:.5}", dist.min);
    println!("  Median:  {:.5}", dist.median);
    println!("  Max:     {:.5}", dist.max);
    println!(
        "  90% interval: [{:.5}, {:.5}]",
        dist.percentiles.p5, dist.percentiles.p95
    );

    if let Some(ref output_dir) = args.output {
        if let Err(e) = std::fs::create_dir_all(output_dir) {
            eprintln!("Failed to create {}: {}", output_dir, e);
            std::process::exit(1);
        }
        let results = serde_json::json!({
            "trace": labeled,
            "mean_occupancy": mean_occupancy,
            "qalys": dist,
        });
        let json_path = format!("{}/psa_results.json", output_dir);
        let payload = serde_json::to_string_pretty(&results).expect("results serialize");
        if let Err(e) = std::fs::write(&json_path, payload) {
            eprintln!("Failed to write {}: {}", json_path, e);
            std::process::exit(1);
        }
        println!();
        println!("  Results: {}", json_path);
    }
}

fn print_header() {
    print!("  {:<10}", "");
    for name in STATE_NAMES {
        print!("{:>9}", name);
    }
    println!();
}

fn print_row(label: &str, values: &[f64]) {
    print!("  {:<10}", label);
    for v in values {
        print!("{:>9.5}", v);
    }
    println!();
}
