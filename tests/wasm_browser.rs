//! WASM Browser Tests
//!
//! These tests run in a real browser environment using wasm-pack test.
//! They exercise the JSON bindings the way a web front end calls them.
//!
//! Run with:
//!   wasm-pack test --headless --chrome
//!   wasm-pack test --headless --firefox
//!   wasm-pack test --node

#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

use helmholtz_resonator::wasm::{evaluate_json, hole_count, sweep_json};
use helmholtz_resonator::{EvaluationResult, SweepRow};

const REFERENCE_PANEL: &str = r#"{
    "temperature_c": 20.0,
    "material_diameter_mm": 100.0,
    "material_thickness_mm": 1.0,
    "correction_factor": 1.0,
    "volume": {"mode": "standard", "air_gap_mm": 10.0},
    "holes": {"mode": "standard", "hole_diameter_mm": 5.0, "count": {"mode": "number", "count": 100}}
}"#;

#[wasm_bindgen_test]
fn test_evaluate_reference_panel() {
    let json = evaluate_json(REFERENCE_PANEL).expect("evaluation should succeed");
    let result: EvaluationResult = serde_json::from_str(&json).expect("valid result JSON");

    assert_eq!(result.hole_count, 100);
    assert!((result.frequency_hz - 3770.247).abs() < 0.01);
    assert!((result.open_area_percent - 25.0).abs() < 1e-9);
}

#[wasm_bindgen_test]
fn test_evaluate_reports_invalid_geometry() {
    let params = REFERENCE_PANEL.replace("\"count\": 100", "\"count\": 0");
    assert!(evaluate_json(&params).is_err());
}

#[wasm_bindgen_test]
fn test_evaluate_rejects_malformed_json() {
    assert!(evaluate_json("{not json").is_err());
}

#[wasm_bindgen_test]
fn test_sweep_rows() {
    let json = sweep_json(REFERENCE_PANEL, "temperature", 0.0, 40.0, 5).expect("sweep should run");
    let rows: Vec<SweepRow> = serde_json::from_str(&json).expect("valid rows JSON");

    assert_eq!(rows.len(), 5);
    for window in rows.windows(2) {
        assert!(window[0].f0 < window[1].f0);
    }
}

#[wasm_bindgen_test]
fn test_sweep_rejects_unknown_field() {
    assert!(sweep_json(REFERENCE_PANEL, "humidity", 0.0, 1.0, 5).is_err());
}

#[wasm_bindgen_test]
fn test_hole_count_binding() {
    assert_eq!(hole_count(100.0, 10.0).unwrap(), 80.0);
    assert_eq!(hole_count(100.0, 150.0).unwrap(), 1.0);
}

#[wasm_bindgen_test]
fn test_hole_count_rejects_dense_grid() {
    assert!(hole_count(100.0, 1e-12).is_err());
}
