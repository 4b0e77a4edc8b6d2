//! Hole layout of a square perforation grid on a circular panel.
//!
//! The grid is centred on the panel and its pitch equals the hole spacing.
//! A hole exists wherever a grid point lies inside the panel footprint
//! (closed disk: distance from centre <= radius).

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use log::debug;
use nalgebra::Vector2;

use crate::error::{HelmholtzError, Result};
use crate::types::{DEFAULT_LAYOUT_CACHE_CAPACITY, MAX_LATTICE_LINES, MAX_LATTICE_POINT_LINES};

/// Grid lines per axis, `floor(diameter / spacing)`, checked against `limit`.
///
/// Non-positive or NaN inputs give 0 lines.
fn lines_per_axis(material_diameter_mm: f64, spacing_mm: f64, limit: usize) -> Result<usize> {
    if !(material_diameter_mm > 0.0 && spacing_mm > 0.0) {
        return Ok(0);
    }
    let per_axis = (material_diameter_mm / spacing_mm).floor();
    if !(per_axis <= limit as f64) {
        return Err(HelmholtzError::invalid_layout(format!(
            "spacing {} mm on a {} mm panel needs {} grid lines per axis (limit {})",
            spacing_mm, material_diameter_mm, per_axis, limit
        )));
    }
    Ok(per_axis as usize)
}

fn axis_positions(n: usize, spacing_mm: f64) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    let start = -((n - 1) as f64 * spacing_mm) / 2.0;
    (0..n).map(|i| start + i as f64 * spacing_mm).collect()
}

/// Positions of the grid lines along one axis (mm), symmetric about zero.
///
/// There are `floor(diameter / spacing)` positions spaced `spacing` apart.
/// Empty for non-positive or NaN inputs. Fails with
/// [`HelmholtzError::InvalidLayout`] above [`MAX_LATTICE_LINES`] lines.
pub fn lattice_axis_positions(material_diameter_mm: f64, spacing_mm: f64) -> Result<Vec<f64>> {
    let n = lines_per_axis(material_diameter_mm, spacing_mm, MAX_LATTICE_LINES)?;
    Ok(axis_positions(n, spacing_mm))
}

/// Grid points (mm, panel centre at the origin) that fall inside the footprint.
///
/// Points are ordered row by row, x fastest. No centre point is added when the
/// grid is empty; see [`resolve_hole_count`] for the counting rule. The grid
/// is limited to [`MAX_LATTICE_POINT_LINES`] lines per axis.
pub fn lattice_points(material_diameter_mm: f64, spacing_mm: f64) -> Result<Vec<Vector2<f64>>> {
    let radius = material_diameter_mm / 2.0;
    let n = lines_per_axis(material_diameter_mm, spacing_mm, MAX_LATTICE_POINT_LINES)?;
    let positions = axis_positions(n, spacing_mm);

    let mut points = Vec::with_capacity(n * n);
    for &y in &positions {
        for &x in &positions {
            let p = Vector2::new(x, y);
            if p.x.hypot(p.y) <= radius {
                points.push(p);
            }
        }
    }
    Ok(points)
}

/// Number of holes of a centred square grid that fit on a circular panel.
///
/// O(n²) in `n = diameter / spacing`, so `n` is capped at
/// [`MAX_LATTICE_LINES`]. Never returns less than 1: a spacing at or beyond
/// the panel diameter leaves the single central hole, and a grid that
/// degenerates to no lines at all is treated the same way.
pub fn resolve_hole_count(material_diameter_mm: f64, spacing_mm: f64) -> Result<u64> {
    let radius = material_diameter_mm / 2.0;
    let positions = lattice_axis_positions(material_diameter_mm, spacing_mm)?;

    let count = positions
        .iter()
        .map(|&y| {
            positions
                .iter()
                .filter(|&&x| x.hypot(y) <= radius)
                .count() as u64
        })
        .sum::<u64>();

    Ok(count.max(1))
}

/// Memoised [`resolve_hole_count`] keyed by the exact `(diameter, spacing)` pair.
///
/// Entries are never invalidated since the count is a pure function of its key.
/// Once `capacity` entries are held, further layouts are computed but not stored.
#[derive(Debug)]
pub struct HoleLayoutCache {
    entries: Mutex<HashMap<(u64, u64), u64>>,
    capacity: usize,
}

impl HoleLayoutCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_LAYOUT_CACHE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            capacity,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<(u64, u64), u64>> {
        // A panic mid-insert cannot leave a wrong count behind, so a poisoned
        // map is still valid.
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Cached equivalent of [`resolve_hole_count`]. Failures are not stored.
    pub fn hole_count(&self, material_diameter_mm: f64, spacing_mm: f64) -> Result<u64> {
        let key = (material_diameter_mm.to_bits(), spacing_mm.to_bits());
        if let Some(&count) = self.lock().get(&key) {
            debug!(
                "hole layout cache hit: D={} mm, spacing={} mm -> {}",
                material_diameter_mm, spacing_mm, count
            );
            return Ok(count);
        }

        let count = resolve_hole_count(material_diameter_mm, spacing_mm)?;
        let mut entries = self.lock();
        if entries.len() < self.capacity {
            entries.insert(key, count);
        }
        Ok(count)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl Default for HoleLayoutCache {
    fn default() -> Self {
        Self::new()
    }
}
