//! Closed-form acoustic relations for a perforated-panel Helmholtz resonator.
//!
//! The panel's holes act as the resonator neck and the air gap behind it as
//! the cavity:
//!
//! ```text
//! f0 = k · c / (2π) · sqrt(A / (V · L_eff))
//! ```
//!
//! All functions here take and return SI units unless the name says otherwise.

use std::f64::consts::PI;

use crate::types::{CM_TO_MM, END_CORRECTION_COEFF, KELVIN_OFFSET, M2_TO_CM2, SPEED_OF_SOUND_COEFF};

/// Speed of sound in air (m/s) at `temperature_c` (°C).
///
/// c = 20.05 * sqrt(273.15 + T)
#[inline]
pub fn speed_of_sound(temperature_c: f64) -> f64 {
    SPEED_OF_SOUND_COEFF * (KELVIN_OFFSET + temperature_c).sqrt()
}

/// Area of a circle from its diameter.
#[inline]
pub fn circle_area(diameter: f64) -> f64 {
    let r = diameter / 2.0;
    PI * r * r
}

/// End correction added to the physical neck length (m).
///
/// 1.7 * r for a hole of diameter `hole_diameter` (m).
#[inline]
pub fn end_correction(hole_diameter: f64) -> f64 {
    END_CORRECTION_COEFF * (hole_diameter / 2.0)
}

/// Effective neck length: panel thickness plus the end correction (m).
#[inline]
pub fn effective_neck_length(thickness: f64, hole_diameter: f64) -> f64 {
    thickness + end_correction(hole_diameter)
}

/// Helmholtz resonance frequency (Hz).
///
/// Callers validate that `open_area`, `volume` and `neck_length` are positive;
/// otherwise the result is NaN or zero.
#[inline]
pub fn helmholtz_frequency(
    correction_factor: f64,
    speed_of_sound: f64,
    open_area: f64,
    volume: f64,
    neck_length: f64,
) -> f64 {
    correction_factor * (speed_of_sound / (2.0 * PI)) * (open_area / (volume * neck_length)).sqrt()
}

/// Open-area percentage of a square grid of round holes (dimensionless %).
///
/// OA% = π d² / (4 s²) × 100, with `hole_diameter` and `spacing` in the same unit.
#[inline]
pub fn grid_open_area_percent(hole_diameter: f64, spacing: f64) -> f64 {
    PI * hole_diameter * hole_diameter / (4.0 * spacing * spacing) * 100.0
}

/// Holes per cm² of a square grid with the given spacing (mm).
#[inline]
pub fn density_from_spacing_mm(spacing_mm: f64) -> f64 {
    let spacing_cm = spacing_mm / CM_TO_MM;
    1.0 / (spacing_cm * spacing_cm)
}

/// Square-grid spacing (mm) implied by a density (holes/cm²); 0 when the
/// density is not positive.
#[inline]
pub fn spacing_mm_from_density(density_per_cm2: f64) -> f64 {
    if density_per_cm2 > 0.0 {
        (1.0 / density_per_cm2).sqrt() * CM_TO_MM
    } else {
        0.0
    }
}

/// Convert an area from m² to cm².
#[inline]
pub fn m2_to_cm2(area_m2: f64) -> f64 {
    area_m2 * M2_TO_CM2
}
