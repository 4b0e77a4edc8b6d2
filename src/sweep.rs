//! Parameter sweeps over one numeric input.
//!
//! A sweep overrides a single field of a base [`ParameterSet`] with each value
//! of an ordered sequence and evaluates every resulting set. Points whose
//! geometry is invalid are dropped from the series and the sweep carries on.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use log::{info, warn};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{HelmholtzError, Result};
use crate::evaluator::Evaluator;
use crate::types::{EvaluationResult, HoleCount, HoleSpec, ParameterSet, SpacingMethod, VolumeSpec};

/// Numeric input that a sweep varies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SweepField {
    Temperature,
    MaterialDiameter,
    MaterialThickness,
    CorrectionFactor,
    /// Forces the standard (footprint × gap) volume.
    AirGap,
    /// Forces a directly given volume.
    CavityVolume,
    HoleDiameter,
    /// Forces the explicit-count rule; values are truncated to integers.
    HoleCount,
    HoleDensity,
    OpenAreaPercent,
    HoleSpacing,
    DirectOpenArea,
    DirectEffectiveLength,
}

impl SweepField {
    pub const ALL: [SweepField; 13] = [
        SweepField::Temperature,
        SweepField::MaterialDiameter,
        SweepField::MaterialThickness,
        SweepField::CorrectionFactor,
        SweepField::AirGap,
        SweepField::CavityVolume,
        SweepField::HoleDiameter,
        SweepField::HoleCount,
        SweepField::HoleDensity,
        SweepField::OpenAreaPercent,
        SweepField::HoleSpacing,
        SweepField::DirectOpenArea,
        SweepField::DirectEffectiveLength,
    ];

    /// Kebab-case key, as accepted by [`FromStr`] and used in config files.
    pub fn key(self) -> &'static str {
        match self {
            SweepField::Temperature => "temperature",
            SweepField::MaterialDiameter => "material-diameter",
            SweepField::MaterialThickness => "material-thickness",
            SweepField::CorrectionFactor => "correction-factor",
            SweepField::AirGap => "air-gap",
            SweepField::CavityVolume => "cavity-volume",
            SweepField::HoleDiameter => "hole-diameter",
            SweepField::HoleCount => "hole-count",
            SweepField::HoleDensity => "hole-density",
            SweepField::OpenAreaPercent => "open-area-percent",
            SweepField::HoleSpacing => "hole-spacing",
            SweepField::DirectOpenArea => "direct-open-area",
            SweepField::DirectEffectiveLength => "direct-effective-length",
        }
    }

    /// Axis label with unit.
    pub fn label(self) -> &'static str {
        match self {
            SweepField::Temperature => "Temperature (°C)",
            SweepField::MaterialDiameter => "Material diameter (mm)",
            SweepField::MaterialThickness => "Material thickness (mm)",
            SweepField::CorrectionFactor => "Correction factor k",
            SweepField::AirGap => "Air gap (mm)",
            SweepField::CavityVolume => "Cavity volume (L)",
            SweepField::HoleDiameter => "Hole diameter (mm)",
            SweepField::HoleCount => "Number of holes",
            SweepField::HoleDensity => "Hole density (holes/cm²)",
            SweepField::OpenAreaPercent => "Open area (%)",
            SweepField::HoleSpacing => "Hole spacing (mm)",
            SweepField::DirectOpenArea => "Open area (mm²)",
            SweepField::DirectEffectiveLength => "Effective neck length (mm)",
        }
    }

    /// Override this field of `params` with `value`, switching the volume or
    /// hole-count mode the field belongs to.
    ///
    /// Fails when the field needs companion values `params` does not carry:
    /// per-hole fields on a directly given open area, or direct neck fields
    /// on individually specified holes.
    pub fn apply(self, params: &mut ParameterSet, value: f64) -> Result<()> {
        match self {
            SweepField::Temperature => params.temperature_c = value,
            SweepField::MaterialDiameter => params.material_diameter_mm = value,
            SweepField::MaterialThickness => params.material_thickness_mm = value,
            SweepField::CorrectionFactor => params.correction_factor = value,
            SweepField::AirGap => params.volume = VolumeSpec::Standard { air_gap_mm: value },
            SweepField::CavityVolume => {
                params.volume = VolumeSpec::Direct {
                    volume_liters: value,
                }
            }
            SweepField::HoleDiameter
            | SweepField::HoleCount
            | SweepField::HoleDensity
            | SweepField::OpenAreaPercent
            | SweepField::HoleSpacing => {
                let HoleSpec::Standard {
                    hole_diameter_mm,
                    count,
                } = &mut params.holes
                else {
                    return Err(HelmholtzError::incompatible_sweep(format!(
                        "'{}' needs individually specified holes, but the open area is given directly",
                        self.key()
                    )));
                };
                match self {
                    SweepField::HoleDiameter => *hole_diameter_mm = value,
                    SweepField::HoleCount => {
                        *count = HoleCount::Number {
                            count: value as u64,
                        }
                    }
                    SweepField::HoleDensity => *count = HoleCount::Density { per_cm2: value },
                    SweepField::OpenAreaPercent => {
                        *count = HoleCount::OpenAreaPercent { percent: value }
                    }
                    _ => {
                        let method = match *count {
                            HoleCount::Spacing { method, .. } => method,
                            _ => SpacingMethod::default(),
                        };
                        *count = HoleCount::Spacing {
                            spacing_mm: value,
                            method,
                        };
                    }
                }
            }
            SweepField::DirectOpenArea | SweepField::DirectEffectiveLength => {
                let HoleSpec::Direct {
                    open_area_mm2,
                    effective_length_mm,
                } = &mut params.holes
                else {
                    return Err(HelmholtzError::incompatible_sweep(format!(
                        "'{}' needs a directly given open area and neck length",
                        self.key()
                    )));
                };
                if self == SweepField::DirectOpenArea {
                    *open_area_mm2 = value;
                } else {
                    *effective_length_mm = value;
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for SweepField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SweepField {
    type Err = HelmholtzError;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase().replace('_', "-");
        SweepField::ALL
            .iter()
            .copied()
            .find(|field| field.key() == key)
            .ok_or_else(|| {
                let known: Vec<&str> = SweepField::ALL.iter().map(|f| f.key()).collect();
                HelmholtzError::config(format!(
                    "unknown sweep field '{}' (expected one of: {})",
                    s,
                    known.join(", ")
                ))
            })
    }
}

/// Inclusive, evenly spaced range of sweep values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearRange {
    pub min: f64,
    pub max: f64,
    /// Number of values including both ends (>= 2)
    pub steps: usize,
}

impl LinearRange {
    pub fn new(min: f64, max: f64, steps: usize) -> Result<Self> {
        let range = Self { min, max, steps };
        range.validate()?;
        Ok(range)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(HelmholtzError::invalid_range(format!(
                "bounds must be finite (min={}, max={})",
                self.min, self.max
            )));
        }
        if self.steps < 2 {
            return Err(HelmholtzError::invalid_range(format!(
                "at least 2 steps are required, got {}",
                self.steps
            )));
        }
        Ok(())
    }

    /// The `steps` values from `min` to `max`; the last value is exactly `max`.
    pub fn values(&self) -> Vec<f64> {
        if self.steps == 0 {
            return Vec::new();
        }
        if self.steps == 1 {
            return vec![self.min];
        }
        let step = (self.max - self.min) / (self.steps - 1) as f64;
        let mut values: Vec<f64> = (0..self.steps)
            .map(|i| self.min + i as f64 * step)
            .collect();
        if let Some(last) = values.last_mut() {
            *last = self.max;
        }
        values
    }
}

/// One successfully evaluated sweep value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub x: f64,
    pub result: EvaluationResult,
}

/// A sweep value whose evaluation failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedPoint {
    pub x: f64,
    pub reason: String,
}

/// Export row: swept value, frequency and perforation metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepRow {
    pub x: f64,
    pub f0: f64,
    #[serde(rename = "OA%")]
    pub open_area_percent: f64,
    pub density: f64,
    pub spacing: f64,
    #[serde(rename = "N")]
    pub hole_count: u64,
}

impl From<&SweepPoint> for SweepRow {
    fn from(point: &SweepPoint) -> Self {
        Self {
            x: point.x,
            f0: point.result.frequency_hz,
            open_area_percent: point.result.open_area_percent,
            density: point.result.hole_density_per_cm2,
            spacing: point.result.hole_spacing_mm,
            hole_count: point.result.hole_count,
        }
    }
}

pub const CSV_HEADER: &str = "x,f0,OA%,density,spacing,N";

/// Ordered results of a sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepSeries {
    pub field: SweepField,
    /// Successful points, in input order
    pub points: Vec<SweepPoint>,
    /// Failed points, in input order
    pub skipped: Vec<SkippedPoint>,
}

impl SweepSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn xs(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.x).collect()
    }

    pub fn frequencies(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.result.frequency_hz).collect()
    }

    pub fn rows(&self) -> Vec<SweepRow> {
        self.points.iter().map(SweepRow::from).collect()
    }

    /// CSV text with a `x,f0,OA%,density,spacing,N` header.
    pub fn to_csv(&self) -> String {
        let mut out = String::from(CSV_HEADER);
        out.push('\n');
        for row in self.rows() {
            out.push_str(&format!(
                "{},{},{},{},{},{}\n",
                row.x, row.f0, row.open_area_percent, row.density, row.spacing, row.hole_count
            ));
        }
        out
    }

    pub fn write_csv<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(self.to_csv().as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Rows as a JSON array.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.rows())?)
    }
}

impl fmt::Display for SweepSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Sweep over {}: {} points, {} skipped",
            self.field.label(),
            self.points.len(),
            self.skipped.len()
        )?;
        for point in &self.points {
            writeln!(f, "  {:>12.4}  {:>10.1} Hz", point.x, point.result.frequency_hz)?;
        }
        if let Some(last) = self.points.last() {
            writeln!(f, "Final values:")?;
            writeln!(f, "  - OA%: {:.1}%", last.result.open_area_percent)?;
            writeln!(f, "  - Density: {:.1}/cm²", last.result.hole_density_per_cm2)?;
            writeln!(f, "  - Spacing: {:.1} mm", last.result.hole_spacing_mm)?;
            writeln!(f, "  - Holes: {}", last.result.hole_count)?;
        }
        Ok(())
    }
}

/// A configured sweep: base parameters, the varied field and its values.
#[derive(Debug, Clone, PartialEq)]
pub struct Sweep {
    base: ParameterSet,
    field: SweepField,
    values: Vec<f64>,
}

impl Sweep {
    /// Sweep `field` of `base` over `range`.
    ///
    /// Rejects invalid ranges and fields that cannot apply to `base` before
    /// anything is evaluated.
    pub fn new(base: ParameterSet, field: SweepField, range: LinearRange) -> Result<Self> {
        range.validate()?;
        Self::from_values(base, field, range.values())
    }

    /// Sweep `field` of `base` over an explicit, ordered list of values.
    pub fn from_values(base: ParameterSet, field: SweepField, values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(HelmholtzError::invalid_range("no sweep values"));
        }
        field.apply(&mut base.clone(), values[0])?;
        Ok(Self {
            base,
            field,
            values,
        })
    }

    pub fn base(&self) -> &ParameterSet {
        &self.base
    }

    pub fn field(&self) -> SweepField {
        self.field
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// One parameter set per sweep value, in order.
    pub fn parameter_sets(&self) -> Result<Vec<(f64, ParameterSet)>> {
        self.values
            .iter()
            .map(|&x| {
                let mut params = self.base.clone();
                self.field.apply(&mut params, x)?;
                Ok((x, params))
            })
            .collect()
    }

    /// Evaluate every sweep value, dropping the ones with invalid geometry.
    pub fn run(&self, evaluator: &Evaluator) -> Result<SweepSeries> {
        let outcomes = evaluate_points(evaluator, self.parameter_sets()?);

        let mut points = Vec::with_capacity(outcomes.len());
        let mut skipped = Vec::new();
        for (x, outcome) in outcomes {
            match outcome {
                Ok(result) => points.push(SweepPoint { x, result }),
                Err(err) => {
                    warn!("skipping {}={}: {}", self.field, x, err);
                    skipped.push(SkippedPoint {
                        x,
                        reason: err.to_string(),
                    });
                }
            }
        }

        info!(
            "sweep over {}: {} of {} points evaluated",
            self.field,
            points.len(),
            self.values.len()
        );

        Ok(SweepSeries {
            field: self.field,
            points,
            skipped,
        })
    }
}

/// Evaluate sweep points in parallel when the `parallel` feature is enabled.
/// Output order matches input order.
#[cfg(feature = "parallel")]
fn evaluate_points(
    evaluator: &Evaluator,
    sets: Vec<(f64, ParameterSet)>,
) -> Vec<(f64, Result<EvaluationResult>)> {
    sets.into_par_iter()
        .map(|(x, params)| (x, evaluator.evaluate(&params)))
        .collect()
}

/// Evaluate sweep points sequentially.
#[cfg(not(feature = "parallel"))]
fn evaluate_points(
    evaluator: &Evaluator,
    sets: Vec<(f64, ParameterSet)>,
) -> Vec<(f64, Result<EvaluationResult>)> {
    sets.into_iter()
        .map(|(x, params)| (x, evaluator.evaluate(&params)))
        .collect()
}

/// Sweep `field` of `base` over `range` with a layout-caching evaluator.
pub fn run_sweep(base: &ParameterSet, field: SweepField, range: LinearRange) -> Result<SweepSeries> {
    Sweep::new(base.clone(), field, range)?.run(&Evaluator::with_layout_cache())
}
