//! Error types for resonator evaluation, sweeps and configuration.

use std::fmt;

use thiserror::Error;

/// Result type for resonator operations.
pub type Result<T> = std::result::Result<T, HelmholtzError>;

/// Physical quantity that failed the positivity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryQuantity {
    OpenArea,
    Volume,
    NeckLength,
}

impl GeometryQuantity {
    fn label(self) -> &'static str {
        match self {
            GeometryQuantity::OpenArea => "open area",
            GeometryQuantity::Volume => "cavity volume",
            GeometryQuantity::NeckLength => "effective neck length",
        }
    }

    fn unit(self) -> &'static str {
        match self {
            GeometryQuantity::OpenArea => "m²",
            GeometryQuantity::Volume => "m³",
            GeometryQuantity::NeckLength => "m",
        }
    }
}

/// A resolved quantity that must be strictly positive but is not.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryFault {
    pub quantity: GeometryQuantity,
    /// The offending value in SI units (may be NaN).
    pub value: f64,
}

impl GeometryFault {
    pub fn new(quantity: GeometryQuantity, value: f64) -> Self {
        Self { quantity, value }
    }
}

impl fmt::Display for GeometryFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value == 0.0 {
            write!(f, "zero {}", self.quantity.label())
        } else {
            write!(
                f,
                "non-positive {} ({} {})",
                self.quantity.label(),
                self.value,
                self.quantity.unit()
            )
        }
    }
}

/// Errors that can occur while evaluating or sweeping a resonator.
#[derive(Error, Debug)]
pub enum HelmholtzError {
    /// Open area, cavity volume or neck length resolved to a non-positive value.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(GeometryFault),

    /// Sweep range cannot produce a usable sequence.
    #[error("Invalid sweep range: {0}")]
    InvalidRange(String),

    /// Hole grid too dense to enumerate.
    #[error("Invalid hole layout: {0}")]
    InvalidLayout(String),

    /// Swept field has no meaning for the base parameter set.
    #[error("Incompatible sweep: {0}")]
    IncompatibleSweep(String),

    /// Configuration could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HelmholtzError {
    pub fn invalid_geometry(quantity: GeometryQuantity, value: f64) -> Self {
        Self::InvalidGeometry(GeometryFault::new(quantity, value))
    }

    pub fn invalid_range(msg: impl Into<String>) -> Self {
        Self::InvalidRange(msg.into())
    }

    pub fn invalid_layout(msg: impl Into<String>) -> Self {
        Self::InvalidLayout(msg.into())
    }

    pub fn incompatible_sweep(msg: impl Into<String>) -> Self {
        Self::IncompatibleSweep(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// The geometry fault carried by this error, if it is one.
    pub fn geometry_fault(&self) -> Option<GeometryFault> {
        match self {
            Self::InvalidGeometry(fault) => Some(*fault),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_values_read_as_zero_quantity() {
        let err = HelmholtzError::invalid_geometry(GeometryQuantity::OpenArea, 0.0);
        assert_eq!(err.to_string(), "Invalid geometry: zero open area");
    }

    #[test]
    fn negative_values_name_quantity_and_unit() {
        let fault = GeometryFault::new(GeometryQuantity::Volume, -0.5);
        assert_eq!(fault.to_string(), "non-positive cavity volume (-0.5 m³)");
    }

    #[test]
    fn geometry_fault_only_for_geometry_errors() {
        let err = HelmholtzError::invalid_geometry(GeometryQuantity::NeckLength, -1.0);
        assert_eq!(
            err.geometry_fault().map(|f| f.quantity),
            Some(GeometryQuantity::NeckLength)
        );
        assert!(HelmholtzError::config("bad").geometry_fault().is_none());
    }
}
