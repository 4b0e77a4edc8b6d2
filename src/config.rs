//! TOML run configuration: base parameters, an optional sweep and evaluator settings.
//!
//! ```toml
//! [parameters]
//! temperature_c = 20.0
//! material_diameter_mm = 100.0
//!
//! [parameters.volume]
//! mode = "standard"
//! air_gap_mm = 10.0
//!
//! [parameters.holes]
//! mode = "standard"
//! hole_diameter_mm = 5.0
//!
//! [parameters.holes.count]
//! mode = "spacing"
//! spacing_mm = 10.0
//! method = "lattice"
//!
//! [sweep]
//! field = "air-gap"
//! min = 5.0
//! max = 50.0
//! steps = 46
//! ```

use std::fs;
use std::path::Path;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{HelmholtzError, Result};
use crate::evaluator::Evaluator;
use crate::layout::HoleLayoutCache;
use crate::sweep::{LinearRange, SweepField};
use crate::types::{ParameterSet, DEFAULT_LAYOUT_CACHE_CAPACITY};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    pub field: SweepField,
    #[serde(default = "SweepConfig::default_min")]
    pub min: f64,
    #[serde(default = "SweepConfig::default_max")]
    pub max: f64,
    #[serde(default = "SweepConfig::default_steps")]
    pub steps: usize,
}

impl SweepConfig {
    fn default_min() -> f64 {
        1.0
    }
    fn default_max() -> f64 {
        10.0
    }
    fn default_steps() -> usize {
        50
    }

    pub fn new(field: SweepField) -> Self {
        Self {
            field,
            min: Self::default_min(),
            max: Self::default_max(),
            steps: Self::default_steps(),
        }
    }

    pub fn range(&self) -> Result<LinearRange> {
        LinearRange::new(self.min, self.max, self.steps)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    /// Memoise lattice hole counts across evaluations
    #[serde(default = "EvaluatorConfig::default_cache_layouts")]
    pub cache_layouts: bool,
    #[serde(default = "EvaluatorConfig::default_cache_capacity")]
    pub cache_capacity: usize,
}

impl EvaluatorConfig {
    fn default_cache_layouts() -> bool {
        true
    }
    fn default_cache_capacity() -> usize {
        DEFAULT_LAYOUT_CACHE_CAPACITY
    }

    pub fn build(&self) -> Evaluator {
        if self.cache_layouts {
            Evaluator::with_cache(HoleLayoutCache::with_capacity(self.cache_capacity))
        } else {
            Evaluator::new()
        }
    }
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            cache_layouts: Self::default_cache_layouts(),
            cache_capacity: Self::default_cache_capacity(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub parameters: ParameterSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sweep: Option<SweepConfig>,
    #[serde(default)]
    pub evaluator: EvaluatorConfig,
}

impl RunConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|err| HelmholtzError::config(err.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|err| HelmholtzError::config(err.to_string()))
    }

    /// Read and parse a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| {
            HelmholtzError::config(format!("failed to read {}: {}", path.display(), err))
        })?;
        let config = Self::from_toml_str(&text).map_err(|err| match err {
            HelmholtzError::Config(msg) => {
                HelmholtzError::config(format!("failed to parse {}: {}", path.display(), msg))
            }
            other => other,
        })?;
        debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to the defaults.
    ///
    /// A file that exists but cannot be read or parsed is still an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            warn!("config {} not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Write the configuration as pretty TOML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }
}
