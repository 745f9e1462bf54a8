//! Analysis Pipeline Example
//!
//! Builds a small learning-rate sweep, stores it, and runs a typical
//! dashboard pipeline: average over seeds with a std band, smooth, and shift
//! the floor for log axes.
//!
//! Run with: cargo run --example analysis_pipeline

use anyhow::Result;
use serde_json::json;
use trazado::experiment::{
    AnalysisRecord, AnalysisSpec, ConfigurationRecord, ExperimentRecord, ExperimentStore,
};
use trazado::step::Step;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Trazado Analysis Pipeline ===\n");

    // -------------------------------------------------------------------------
    // 1. Build an experiment: 3 learning rates x 2 seeds
    // -------------------------------------------------------------------------
    println!("1. Building experiment...");

    let mut store = ExperimentStore::new();
    let mut experiment = ExperimentRecord::new("exp-sweep-001", "LR sweep");
    for (index, lr) in [0.01f64, 0.1, 0.5].into_iter().enumerate() {
        for seed in 0..2u32 {
            let noise = f64::from(seed).mul_add(0.05, 0.0);
            let y: Vec<f64> = (0..50)
                .map(|i| lr.mul_add(-0.01, 1.0 / (f64::from(i) + 1.0)) + noise)
                .collect();
            let x: Vec<u32> = (0..50).collect();
            experiment.add_configuration(
                ConfigurationRecord::builder(format!("cfg-{index}-{seed}"))
                    .parameter("lr", lr)
                    .parameter("seed", seed)
                    .series_source(json!({"line": {"points": x, "data": y}}))
                    .build(),
            );
        }
    }
    println!("   {} configurations", experiment.configurations().len());
    store.add_experiment(experiment);

    // -------------------------------------------------------------------------
    // 2. Author an analysis
    // -------------------------------------------------------------------------
    println!("\n2. Authoring analysis...");

    let spec = AnalysisSpec::new("smoothed loss", "line.points", "line.data")
        .step(Step::Average {
            parameters: vec!["seed".to_string()],
            with_std: true,
        })
        .step(Step::MovingAverage { window_size: 5 })
        .step(Step::SubtractMin { epsilon: 1e-10 });
    store.add_analysis(AnalysisRecord::new("an-001", "exp-sweep-001", spec));

    // -------------------------------------------------------------------------
    // 3. Evaluate
    // -------------------------------------------------------------------------
    println!("\n3. Evaluating pipeline...");

    let experiment = store
        .get_experiment("exp-sweep-001")
        .expect("experiment was just stored");
    let analysis = store
        .get_analysis("an-001")
        .expect("analysis was just stored");
    let output = trazado::evaluate(experiment.configurations(), analysis.spec())?;

    for trace in &output.traces {
        println!(
            "   {:<12} {} points, final y = {:.4}, std band: {}",
            trace.name,
            trace.y.len(),
            trace.y.last().copied().unwrap_or(f64::NAN),
            if trace.error_y.is_some() { "yes" } else { "no" },
        );
    }
    println!("\n   y axis type: {}", output.layout["yaxis"]["type"]);

    Ok(())
}
