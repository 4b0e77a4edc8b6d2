//! Constants, parameter sets and evaluation results for the resonator engine.
//!
//! Inputs are expressed in the units a user measures a perforated panel in
//! (mm, °C, litres). Everything is converted to SI inside the evaluator.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Coefficient of the speed-of-sound relation c = 20.05 * sqrt(T_K) (m/s).
pub const SPEED_OF_SOUND_COEFF: f64 = 20.05;

/// Offset between degrees Celsius and kelvin.
pub const KELVIN_OFFSET: f64 = 273.15;

/// Neck end correction in units of hole radius (2 × 0.85 r, flanged on both ends).
pub const END_CORRECTION_COEFF: f64 = 1.7;

pub const MM_TO_M: f64 = 1e-3;
pub const MM2_TO_M2: f64 = 1e-6;
pub const LITERS_TO_M3: f64 = 1e-3;
pub const M2_TO_CM2: f64 = 1e4;
pub const CM_TO_MM: f64 = 10.0;

/// Upper bound on memoised hole layouts held by a [`crate::HoleLayoutCache`].
pub const DEFAULT_LAYOUT_CACHE_CAPACITY: usize = 4096;

/// Most grid lines per axis the lattice count enumerates (1000 mm at 0.1 mm).
pub const MAX_LATTICE_LINES: usize = 10_000;

/// Most grid lines per axis for which hole centres are listed.
pub const MAX_LATTICE_POINT_LINES: usize = 1_000;

/// How the cavity volume is specified.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum VolumeSpec {
    /// Cavity behind the panel: footprint area × air-gap depth.
    Standard {
        /// Air-gap depth (mm)
        air_gap_mm: f64,
    },
    /// Cavity volume given directly.
    Direct {
        /// Cavity volume (L)
        volume_liters: f64,
    },
}

impl Default for VolumeSpec {
    fn default() -> Self {
        VolumeSpec::Standard { air_gap_mm: 10.0 }
    }
}

/// Spacing-to-count conversion used by [`HoleCount::Spacing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpacingMethod {
    /// Closed form: density = 1 / spacing², N = density × footprint area.
    #[default]
    Areal,
    /// Exact count of square-lattice points inside the footprint circle.
    Lattice,
}

/// Which quantity fixes the number of holes in a standard perforation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum HoleCount {
    /// Explicit number of holes.
    Number { count: u64 },
    /// Areal density (holes/cm²).
    Density { per_cm2: f64 },
    /// Open area as a percentage of the footprint.
    OpenAreaPercent { percent: f64 },
    /// Centre-to-centre spacing of a square grid (mm).
    Spacing {
        spacing_mm: f64,
        #[serde(default)]
        method: SpacingMethod,
    },
}

impl Default for HoleCount {
    fn default() -> Self {
        HoleCount::Number { count: 100 }
    }
}

/// How the openings (the resonator "neck") are specified.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum HoleSpec {
    /// Identical circular holes; the count comes from a [`HoleCount`] rule.
    Standard {
        /// Hole diameter (mm)
        hole_diameter_mm: f64,
        count: HoleCount,
    },
    /// Total open area and effective neck length given directly.
    Direct {
        /// Total open area (mm²)
        open_area_mm2: f64,
        /// Effective neck length including end corrections (mm)
        effective_length_mm: f64,
    },
}

impl Default for HoleSpec {
    fn default() -> Self {
        HoleSpec::Standard {
            hole_diameter_mm: 5.0,
            count: HoleCount::default(),
        }
    }
}

impl HoleSpec {
    /// The active hole-count rule, if holes are specified individually.
    pub fn hole_count_rule(&self) -> Option<&HoleCount> {
        match self {
            HoleSpec::Standard { count, .. } => Some(count),
            HoleSpec::Direct { .. } => None,
        }
    }
}

/// Complete input to one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    /// Air temperature (°C)
    #[serde(default = "ParameterSet::default_temperature_c")]
    pub temperature_c: f64,
    /// Diameter of the circular panel footprint (mm)
    #[serde(default = "ParameterSet::default_material_diameter_mm")]
    pub material_diameter_mm: f64,
    /// Panel thickness (mm)
    #[serde(default = "ParameterSet::default_material_thickness_mm")]
    pub material_thickness_mm: f64,
    /// Empirical correction factor k applied to the resonance frequency
    #[serde(default = "ParameterSet::default_correction_factor")]
    pub correction_factor: f64,
    #[serde(default)]
    pub volume: VolumeSpec,
    #[serde(default)]
    pub holes: HoleSpec,
}

impl ParameterSet {
    fn default_temperature_c() -> f64 {
        20.0
    }
    fn default_material_diameter_mm() -> f64 {
        100.0
    }
    fn default_material_thickness_mm() -> f64 {
        1.0
    }
    fn default_correction_factor() -> f64 {
        1.0
    }

    pub fn with_temperature(mut self, temperature_c: f64) -> Self {
        self.temperature_c = temperature_c;
        self
    }

    pub fn with_material(mut self, diameter_mm: f64, thickness_mm: f64) -> Self {
        self.material_diameter_mm = diameter_mm;
        self.material_thickness_mm = thickness_mm;
        self
    }

    pub fn with_correction_factor(mut self, k: f64) -> Self {
        self.correction_factor = k;
        self
    }

    pub fn with_volume(mut self, volume: VolumeSpec) -> Self {
        self.volume = volume;
        self
    }

    pub fn with_holes(mut self, holes: HoleSpec) -> Self {
        self.holes = holes;
        self
    }
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            temperature_c: Self::default_temperature_c(),
            material_diameter_mm: Self::default_material_diameter_mm(),
            material_thickness_mm: Self::default_material_thickness_mm(),
            correction_factor: Self::default_correction_factor(),
            volume: VolumeSpec::default(),
            holes: HoleSpec::default(),
        }
    }
}

/// Resolved physical state and resonance of one parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Resonance frequency f0 (Hz)
    pub frequency_hz: f64,
    /// Speed of sound at the given temperature (m/s)
    pub speed_of_sound: f64,
    /// Number of holes; 0 when the open area was given directly
    pub hole_count: u64,
    /// Total open area A (m²)
    pub open_area_m2: f64,
    /// Cavity volume V (m³)
    pub volume_m3: f64,
    /// Cavity volume V (L)
    pub volume_liters: f64,
    /// Effective neck length L_eff (m)
    pub effective_length_m: f64,
    /// Effective neck length L_eff (mm)
    pub effective_length_mm: f64,
    /// Open area relative to the footprint (%), not clamped to 100
    pub open_area_percent: f64,
    /// Areal hole density (holes/cm²)
    pub hole_density_per_cm2: f64,
    /// Square-lattice spacing implied by the density (mm)
    pub hole_spacing_mm: f64,
}

impl fmt::Display for EvaluationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Resonance frequency: {:.1} Hz", self.frequency_hz)?;
        writeln!(f, "  Open area: {:.1}%", self.open_area_percent)?;
        writeln!(f, "  Hole density: {:.1}/cm²", self.hole_density_per_cm2)?;
        writeln!(f, "  Hole spacing: {:.1} mm", self.hole_spacing_mm)?;
        writeln!(f, "  Holes: {}", self.hole_count)?;
        writeln!(f, "  Open area A: {:.4e} m²", self.open_area_m2)?;
        writeln!(f, "  Cavity volume: {:.4} L", self.volume_liters)?;
        writeln!(f, "  Effective neck length: {:.3} mm", self.effective_length_mm)?;
        write!(f, "  Speed of sound: {:.2} m/s", self.speed_of_sound)
    }
}
