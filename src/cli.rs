use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use helmholtz_resonator::{
    HelmholtzError, HoleCount, HoleSpec, ParameterSet, Result, SpacingMethod, SweepField,
    VolumeSpec,
};

/// Helmholtz resonance calculator for perforated panels
#[derive(Parser, Debug)]
#[command(name = "helmholtz", author, version, about)]
pub struct Cli {
    /// Path to a TOML run configuration
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate the resonance frequency of one configuration
    Evaluate {
        #[command(flatten)]
        overrides: ParameterOverrides,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Vary one parameter over a range and evaluate each value
    Sweep {
        #[command(flatten)]
        overrides: ParameterOverrides,

        /// Parameter to vary, e.g. temperature, air-gap, hole-spacing
        #[arg(long)]
        field: Option<SweepField>,

        /// First value of the range
        #[arg(long, allow_hyphen_values = true)]
        min: Option<f64>,

        /// Last value of the range
        #[arg(long, allow_hyphen_values = true)]
        max: Option<f64>,

        /// Number of values including both ends
        #[arg(long)]
        steps: Option<usize>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Write the output to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Count the holes of a square grid on a circular panel
    Layout {
        /// Panel diameter (mm)
        #[arg(long)]
        diameter: f64,

        /// Hole spacing (mm)
        #[arg(long)]
        spacing: f64,

        /// Also print the hole centres as x,y (mm)
        #[arg(long)]
        points: bool,
    },

    /// Write a default configuration file
    InitConfig {
        /// Destination path
        #[arg(short, long, default_value = "helmholtz.toml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Csv,
    Json,
}

/// Command-line overrides applied on top of the configured parameter set.
#[derive(Args, Debug, Clone, Default)]
pub struct ParameterOverrides {
    /// Air temperature (°C)
    #[arg(long, allow_hyphen_values = true)]
    pub temperature: Option<f64>,

    /// Panel diameter (mm)
    #[arg(long)]
    pub material_diameter: Option<f64>,

    /// Panel thickness (mm)
    #[arg(long)]
    pub thickness: Option<f64>,

    /// Empirical correction factor k
    #[arg(short = 'k', long)]
    pub correction_factor: Option<f64>,

    /// Air-gap depth (mm)
    #[arg(long, conflicts_with = "volume")]
    pub air_gap: Option<f64>,

    /// Cavity volume (L)
    #[arg(long)]
    pub volume: Option<f64>,

    /// Hole diameter (mm)
    #[arg(long)]
    pub hole_diameter: Option<f64>,

    /// Number of holes
    #[arg(long, group = "hole_count")]
    pub holes: Option<u64>,

    /// Hole density (holes/cm²)
    #[arg(long, group = "hole_count")]
    pub density: Option<f64>,

    /// Open area (%)
    #[arg(long, group = "hole_count")]
    pub open_area: Option<f64>,

    /// Hole spacing (mm)
    #[arg(long, group = "hole_count")]
    pub spacing: Option<f64>,

    /// Count holes from spacing by exact grid enumeration
    #[arg(long, conflicts_with_all = ["holes", "density", "open_area"])]
    pub lattice: bool,
}

impl ParameterOverrides {
    fn count_override(&self) -> Option<HoleCount> {
        if let Some(count) = self.holes {
            Some(HoleCount::Number { count })
        } else if let Some(per_cm2) = self.density {
            Some(HoleCount::Density { per_cm2 })
        } else if let Some(percent) = self.open_area {
            Some(HoleCount::OpenAreaPercent { percent })
        } else {
            self.spacing.map(|spacing_mm| HoleCount::Spacing {
                spacing_mm,
                method: SpacingMethod::Areal,
            })
        }
    }

    pub fn apply(&self, params: &mut ParameterSet) -> Result<()> {
        if let Some(t) = self.temperature {
            params.temperature_c = t;
        }
        if let Some(d) = self.material_diameter {
            params.material_diameter_mm = d;
        }
        if let Some(t) = self.thickness {
            params.material_thickness_mm = t;
        }
        if let Some(k) = self.correction_factor {
            params.correction_factor = k;
        }
        if let Some(air_gap_mm) = self.air_gap {
            params.volume = VolumeSpec::Standard { air_gap_mm };
        }
        if let Some(volume_liters) = self.volume {
            params.volume = VolumeSpec::Direct { volume_liters };
        }

        let count_override = self.count_override();
        if self.hole_diameter.is_some() || count_override.is_some() || self.lattice {
            let (base_diameter, base_count) = match params.holes {
                HoleSpec::Standard {
                    hole_diameter_mm,
                    count,
                } => (Some(hole_diameter_mm), count),
                HoleSpec::Direct { .. } => (None, HoleCount::default()),
            };
            let hole_diameter_mm = self.hole_diameter.or(base_diameter).ok_or_else(|| {
                HelmholtzError::config(
                    "--hole-diameter is required when the open area is configured directly",
                )
            })?;
            let mut count = count_override.unwrap_or(base_count);
            if self.lattice {
                let HoleCount::Spacing { method, .. } = &mut count else {
                    return Err(HelmholtzError::config(
                        "--lattice needs a spacing-based hole count; pass --spacing",
                    ));
                };
                *method = SpacingMethod::Lattice;
            }
            params.holes = HoleSpec::Standard {
                hole_diameter_mm,
                count,
            };
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn overrides_switch_modes() {
        let cli = Cli::parse_from([
            "helmholtz",
            "evaluate",
            "--temperature",
            "-5",
            "--volume",
            "2.0",
            "--spacing",
            "12",
            "--lattice",
        ]);
        let Command::Evaluate { overrides, .. } = cli.command else {
            panic!("expected evaluate");
        };
        let mut params = ParameterSet::default();
        overrides.apply(&mut params).unwrap();
        assert_eq!(params.temperature_c, -5.0);
        assert_eq!(params.volume, VolumeSpec::Direct { volume_liters: 2.0 });
        assert_eq!(
            params.holes.hole_count_rule(),
            Some(&HoleCount::Spacing {
                spacing_mm: 12.0,
                method: SpacingMethod::Lattice,
            })
        );
    }

    #[test]
    fn hole_diameter_required_over_direct_area() {
        let mut params = ParameterSet::default().with_holes(HoleSpec::Direct {
            open_area_mm2: 50.0,
            effective_length_mm: 3.0,
        });
        let overrides = ParameterOverrides {
            holes: Some(10),
            ..Default::default()
        };
        assert!(overrides.apply(&mut params).is_err());
    }

    #[test]
    fn lattice_conflicts_with_other_count_flags() {
        let parsed = Cli::try_parse_from(["helmholtz", "evaluate", "--lattice", "--holes", "50"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn lattice_rejected_without_spacing_rule() {
        let overrides = ParameterOverrides {
            lattice: true,
            ..Default::default()
        };
        let mut params = ParameterSet::default();
        let err = overrides.apply(&mut params).unwrap_err();
        assert!(matches!(err, HelmholtzError::Config(_)));
        assert_eq!(params, ParameterSet::default());
    }

    #[test]
    fn lattice_upgrades_configured_spacing_rule() {
        let mut params = ParameterSet::default().with_holes(HoleSpec::Standard {
            hole_diameter_mm: 3.0,
            count: HoleCount::Spacing {
                spacing_mm: 8.0,
                method: SpacingMethod::Areal,
            },
        });
        let overrides = ParameterOverrides {
            lattice: true,
            ..Default::default()
        };
        overrides.apply(&mut params).unwrap();
        assert_eq!(
            params.holes.hole_count_rule(),
            Some(&HoleCount::Spacing {
                spacing_mm: 8.0,
                method: SpacingMethod::Lattice,
            })
        );
    }

    #[test]
    fn layout_rejects_dense_grid() {
        use helmholtz_resonator::resolve_hole_count;
        let cli = Cli::parse_from(["helmholtz", "layout", "--diameter", "100", "--spacing", "1e-12"]);
        let Command::Layout {
            diameter, spacing, ..
        } = cli.command
        else {
            panic!("expected layout");
        };
        assert!(matches!(
            resolve_hole_count(diameter, spacing),
            Err(HelmholtzError::InvalidLayout(_))
        ));
    }

    #[test]
    fn sweep_field_parses_from_flag() {
        let cli = Cli::parse_from([
            "helmholtz", "sweep", "--field", "air-gap", "--min", "5", "--max", "50", "--steps",
            "10",
        ]);
        let Command::Sweep { field, steps, .. } = cli.command else {
            panic!("expected sweep");
        };
        assert_eq!(field, Some(SweepField::AirGap));
        assert_eq!(steps, Some(10));
    }
}
