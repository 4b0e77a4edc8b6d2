//! Helmholtz resonance of perforated panels.
//!
//! A circular panel with round holes in front of an air gap behaves as a
//! Helmholtz resonator: the holes form the neck, the gap the cavity. This crate
//! resolves a [`ParameterSet`] (which may give the holes as a count, a density,
//! an open-area percentage or a grid spacing) into a consistent physical state
//! and evaluates its resonance frequency and perforation metrics. Sweeps repeat
//! the evaluation over a range of one input.
//!
//! # Example
//!
//! ```
//! use helmholtz_resonator::{
//!     evaluate, run_sweep, HoleCount, HoleSpec, LinearRange, ParameterSet, SpacingMethod,
//!     SweepField, VolumeSpec,
//! };
//!
//! let params = ParameterSet::default()
//!     .with_temperature(22.0)
//!     .with_material(300.0, 6.0)
//!     .with_volume(VolumeSpec::Standard { air_gap_mm: 50.0 })
//!     .with_holes(HoleSpec::Standard {
//!         hole_diameter_mm: 8.0,
//!         count: HoleCount::Spacing { spacing_mm: 32.0, method: SpacingMethod::Lattice },
//!     });
//!
//! let result = evaluate(&params).unwrap();
//! println!("f0 = {:.1} Hz with {} holes", result.frequency_hz, result.hole_count);
//!
//! let range = LinearRange::new(20.0, 100.0, 9).unwrap();
//! let series = run_sweep(&params, SweepField::AirGap, range).unwrap();
//! assert_eq!(series.len(), 9);
//! ```

pub mod acoustics;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod layout;
pub mod sweep;
pub mod types;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use acoustics::{
    circle_area, density_from_spacing_mm, effective_neck_length, end_correction,
    grid_open_area_percent, helmholtz_frequency, spacing_mm_from_density, speed_of_sound,
};
pub use config::{EvaluatorConfig, RunConfig, SweepConfig};
pub use error::{GeometryFault, GeometryQuantity, HelmholtzError, Result};
pub use evaluator::{evaluate, Evaluator};
pub use layout::{lattice_axis_positions, lattice_points, resolve_hole_count, HoleLayoutCache};
pub use sweep::{
    run_sweep, LinearRange, SkippedPoint, Sweep, SweepField, SweepPoint, SweepRow, SweepSeries,
    CSV_HEADER,
};
pub use types::{
    EvaluationResult, HoleCount, HoleSpec, ParameterSet, SpacingMethod, VolumeSpec,
    DEFAULT_LAYOUT_CACHE_CAPACITY, END_CORRECTION_COEFF, KELVIN_OFFSET, MAX_LATTICE_LINES,
    MAX_LATTICE_POINT_LINES, SPEED_OF_SOUND_COEFF,
};
