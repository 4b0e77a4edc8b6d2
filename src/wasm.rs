//! WASM bindings for browser front ends.
//!
//! JSON in, JSON out: the page builds a parameter set, renders the returned
//! result or sweep rows, and shows the error string on failure.

#![cfg(target_arch = "wasm32")]

use wasm_bindgen::prelude::*;

use crate::evaluator::Evaluator;
use crate::layout::resolve_hole_count;
use crate::sweep::{LinearRange, Sweep, SweepField};
use crate::types::ParameterSet;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Evaluate one parameter set.
///
/// # Arguments
/// * `params_json` - JSON `ParameterSet`, e.g.
///   `{"temperature_c": 20.0, "holes": {"mode": "standard", "hole_diameter_mm": 5.0,
///   "count": {"mode": "number", "count": 100}}}`
///
/// # Returns
/// JSON `EvaluationResult`
#[wasm_bindgen]
pub fn evaluate_json(params_json: &str) -> Result<String, JsValue> {
    let params: ParameterSet = serde_json::from_str(params_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid parameters JSON: {}", e)))?;

    let result = Evaluator::new()
        .evaluate(&params)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_json::to_string(&result)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Sweep one field of a parameter set.
///
/// # Arguments
/// * `params_json` - JSON `ParameterSet` used as the base
/// * `field` - Field key, e.g. `"air-gap"` or `"hole-spacing"`
/// * `min`, `max` - Inclusive range
/// * `steps` - Number of values (>= 2)
///
/// # Returns
/// JSON array of rows `{x, f0, "OA%", density, spacing, N}`; failed points are omitted
#[wasm_bindgen]
pub fn sweep_json(
    params_json: &str,
    field: &str,
    min: f64,
    max: f64,
    steps: usize,
) -> Result<String, JsValue> {
    let params: ParameterSet = serde_json::from_str(params_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid parameters JSON: {}", e)))?;
    let field: SweepField = field
        .parse()
        .map_err(|e: crate::HelmholtzError| JsValue::from_str(&e.to_string()))?;

    let series = LinearRange::new(min, max, steps)
        .and_then(|range| Sweep::new(params, field, range))
        .and_then(|sweep| sweep.run(&Evaluator::with_layout_cache()))
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_json::to_string(&series.rows())
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Number of holes of a centred square grid on a circular panel.
///
/// Errors when the grid would need more than `MAX_LATTICE_LINES` lines per axis.
#[wasm_bindgen]
pub fn hole_count(material_diameter_mm: f64, spacing_mm: f64) -> Result<f64, JsValue> {
    resolve_hole_count(material_diameter_mm, spacing_mm)
        .map(|count| count as f64)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
