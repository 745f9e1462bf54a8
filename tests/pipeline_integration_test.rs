//! End-to-end pipeline evaluation tests
//!
//! Drives the full path: configuration records -> series extraction ->
//! ordered step fold -> labeled traces + resolved layout.

use serde_json::json;
use trazado::experiment::{AnalysisSpec, ConfigurationRecord};
use trazado::step::{Axis, ScoreMethod, Step};

fn config(id: &str, params: &[(&str, serde_json::Value)], y: &[f64]) -> ConfigurationRecord {
    let x: Vec<usize> = (0..y.len()).collect();
    let mut builder = ConfigurationRecord::builder(id);
    for (key, value) in params {
        builder = builder.parameter(*key, value.clone());
    }
    builder
        .series_source(json!({"line": {"points": x, "data": y}}))
        .build()
}

fn spec(steps: Vec<Step>) -> AnalysisSpec {
    let mut spec = AnalysisSpec::new("test", "line.points", "line.data");
    spec.steps = steps;
    spec
}

// =============================================================================
// Worked examples from the analysis semantics
// =============================================================================

#[test]
fn test_average_with_std_worked_example() {
    let configs = vec![
        config("cfg-a", &[("lr", json!(0.1))], &[1.0, 2.0, 3.0]),
        config("cfg-b", &[("lr", json!(0.1))], &[3.0, 2.0, 1.0]),
    ];
    let output = trazado::evaluate(
        &configs,
        &spec(vec![Step::Average {
            parameters: vec![],
            with_std: true,
        }]),
    )
    .unwrap();

    assert_eq!(output.traces.len(), 1);
    assert_eq!(output.traces[0].y, vec![2.0, 2.0, 2.0]);
    assert_eq!(
        output.traces[0].error_y.as_ref().unwrap().values,
        vec![1.0, 0.0, 1.0]
    );
    assert_eq!(output.traces[0].name, "lr:0.1");
}

#[test]
fn test_filter_worked_example() {
    let configs = vec![
        config("cfg-a", &[("lr", json!(0.1))], &[1.0]),
        config("cfg-b", &[("lr", json!(0.2))], &[2.0]),
        config("cfg-c", &[("lr", json!(0.1))], &[3.0]),
    ];
    let output = trazado::evaluate(
        &configs,
        &spec(vec![Step::Filter {
            parameters: vec![[("lr".to_string(), json!(0.1))].into_iter().collect()],
        }]),
    )
    .unwrap();

    assert_eq!(output.traces.len(), 2);
    assert_eq!(output.traces[0].y, vec![1.0]);
    assert_eq!(output.traces[1].y, vec![3.0]);
}

// =============================================================================
// Step composition
// =============================================================================

#[test]
fn test_typical_dashboard_pipeline() {
    // drop the seed, average the family, smooth, then label on lr only
    let configs = vec![
        config(
            "cfg-a",
            &[("lr", json!(0.1)), ("seed", json!(1))],
            &[4.0, 2.0, 1.0],
        ),
        config(
            "cfg-b",
            &[("lr", json!(0.1)), ("seed", json!(2))],
            &[2.0, 2.0, 3.0],
        ),
        config(
            "cfg-c",
            &[("lr", json!(0.5)), ("seed", json!(1))],
            &[9.0, 9.0, 9.0],
        ),
    ];
    let output = trazado::evaluate(
        &configs,
        &spec(vec![
            Step::Average {
                parameters: vec!["seed".to_string()],
                with_std: false,
            },
            Step::MovingAverage { window_size: 1 },
        ]),
    )
    .unwrap();

    assert_eq!(output.traces.len(), 2);
    assert_eq!(output.traces[0].name, "lr:0.1");
    assert_eq!(output.traces[0].y, vec![3.0, 2.0, 2.0]);
    assert_eq!(output.traces[1].name, "lr:0.5");
}

#[test]
fn test_subtract_min_then_log_supports_log_axes() {
    let configs = vec![
        config("cfg-a", &[("lr", json!(0.1))], &[5.0, 3.0]),
        config("cfg-b", &[("lr", json!(0.2))], &[7.0, 11.0]),
    ];
    let output = trazado::evaluate(
        &configs,
        &spec(vec![
            Step::SubtractMin { epsilon: 1e-10 },
            Step::LogTransform { axis: Axis::Y },
        ]),
    )
    .unwrap();

    // global min 3.0 was shifted to ~0, so ln(1 + y) stays finite everywhere
    for trace in &output.traces {
        assert!(trace.y.iter().all(|v| v.is_finite()));
    }
    assert!((output.traces[0].y[1] - 0.0).abs() < 1e-9);
}

#[test]
fn test_best_then_compare_labels() {
    let configs = vec![
        config(
            "cfg-a",
            &[("lr", json!(0.1)), ("seed", json!(1))],
            &[1.0, 5.0],
        ),
        config(
            "cfg-b",
            &[("lr", json!(0.1)), ("seed", json!(2))],
            &[1.0, 9.0],
        ),
    ];
    let output = trazado::evaluate(
        &configs,
        &spec(vec![
            Step::Best {
                score: ScoreMethod::MaxFinal,
                parameters: vec!["seed".to_string()],
            },
            Step::Compare {
                parameters: vec!["lr".to_string()],
            },
        ]),
    )
    .unwrap();

    assert_eq!(output.traces.len(), 1);
    assert_eq!(output.traces[0].y, vec![1.0, 9.0]);
    assert_eq!(output.traces[0].name, "lr:0.1");
}

// =============================================================================
// Tolerance and atomicity
// =============================================================================

#[test]
fn test_unknown_step_in_stored_spec_is_noop() {
    let configs = vec![config("cfg-a", &[("lr", json!(0.1))], &[1.0, 2.0])];
    let analysis: AnalysisSpec = serde_json::from_value(json!({
        "name": "with unknown step",
        "x_data": "line.points",
        "y_data": "line.data",
        "steps": [
            {"action": "sharpen", "window_size": 3},
            {"action": "moving_average", "window_size": 1}
        ]
    }))
    .unwrap();

    let output = trazado::evaluate(&configs, &analysis).unwrap();
    assert_eq!(output.traces[0].y, vec![1.0, 2.0]);
}

#[test]
fn test_missing_series_key_is_empty_not_fatal() {
    let configs = vec![ConfigurationRecord::builder("cfg-a")
        .parameter("lr", 0.1)
        .series_source(json!({"other": 1}))
        .build()];
    let output = trazado::evaluate(&configs, &spec(vec![])).unwrap();
    assert_eq!(output.traces.len(), 1);
    assert!(output.traces[0].x.is_empty());
    assert!(output.traces[0].y.is_empty());
}

#[test]
fn test_fatal_step_aborts_whole_evaluation() {
    let configs = vec![
        config("cfg-a", &[("lr", json!(0.1))], &[1.0, 2.0]),
        config("cfg-b", &[("lr", json!(0.1))], &[1.0]),
    ];
    let err = trazado::evaluate(
        &configs,
        &spec(vec![
            Step::Drop { parameters: vec![] },
            Step::Average {
                parameters: vec![],
                with_std: false,
            },
        ]),
    )
    .unwrap_err();

    let msg = err.to_string();
    assert!(msg.contains("step 1"), "unexpected message: {msg}");
    assert!(msg.contains("average"), "unexpected message: {msg}");
}

#[test]
fn test_log_transform_domain_violation_is_fatal() {
    let configs = vec![config("cfg-a", &[], &[-3.0])];
    let err = trazado::evaluate(
        &configs,
        &spec(vec![Step::LogTransform { axis: Axis::Y }]),
    )
    .unwrap_err();
    assert!(matches!(err, trazado::Error::NonFinite { .. }));
}

// =============================================================================
// Layout resolution
// =============================================================================

#[test]
fn test_layout_override_merged_onto_defaults() {
    let configs = vec![config("cfg-a", &[], &[1.0])];
    let analysis = spec(vec![]).layout(json!({"yaxis": {"type": "linear"}, "title": "loss"}));

    let output = trazado::evaluate(&configs, &analysis).unwrap();
    assert_eq!(output.layout["yaxis"]["type"], json!("linear"));
    assert_eq!(output.layout["yaxis"]["autorange"], json!(true));
    assert_eq!(output.layout["title"], json!("loss"));
    assert_eq!(output.layout["plot_bgcolor"], json!("#ddd"));
}

#[test]
fn test_no_override_yields_default_layout() {
    let configs = vec![config("cfg-a", &[], &[1.0])];
    let output = trazado::evaluate(&configs, &spec(vec![])).unwrap();
    assert_eq!(output.layout, trazado::plot::default_layout());
}
