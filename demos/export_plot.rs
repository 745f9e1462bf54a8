//! Plot Export Example
//!
//! Evaluates a small pipeline and writes the resulting traces to a JSON file
//! in the export format (a top-level array of trace descriptors).
//!
//! Run with: cargo run --example export_plot

use anyhow::Result;
use serde_json::json;
use trazado::experiment::{AnalysisSpec, ConfigurationRecord};
use trazado::plot::write_traces;
use trazado::step::{ScoreMethod, Step};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let configs: Vec<ConfigurationRecord> = (0..4)
        .map(|seed| {
            let y: Vec<f64> = (0..20)
                .map(|i| 1.0 / (f64::from(i) + 1.0) + f64::from(seed) * 0.02)
                .collect();
            let x: Vec<u32> = (0..20).collect();
            ConfigurationRecord::builder(format!("cfg-{seed}"))
                .parameter("lr", 0.1)
                .parameter("seed", seed)
                .series_source(json!({"line": {"points": x, "data": y}}))
                .build()
        })
        .collect();

    let spec = AnalysisSpec::new("best run", "line.points", "line.data").step(Step::Best {
        score: ScoreMethod::MinFinal,
        parameters: vec!["seed".to_string()],
    });

    let output = trazado::evaluate(&configs, &spec)?;
    let path = "plot_exp-sweep-001_best-run.json";
    write_traces(&output.traces, path)?;

    println!("wrote {} trace(s) to {path}", output.traces.len());
    Ok(())
}
