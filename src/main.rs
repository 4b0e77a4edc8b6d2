//! `helmholtz` command-line front end.
//!
//! ```bash
//! helmholtz evaluate --holes 100 --hole-diameter 5 --air-gap 10
//! helmholtz sweep --field temperature --min 0 --max 40 --steps 5 --format csv
//! helmholtz layout --diameter 100 --spacing 10 --points
//! ```

mod cli;

use std::fs::File;
use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use cli::{Cli, Command, OutputFormat, ParameterOverrides};
use helmholtz_resonator::{
    lattice_points, resolve_hole_count, HelmholtzError, LinearRange, Result, RunConfig, Sweep,
    SweepConfig, SweepField,
};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Result<RunConfig> {
    match &cli.config {
        Some(path) => RunConfig::load(path),
        None => Ok(RunConfig::default()),
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;

    match cli.command {
        Command::Evaluate { overrides, format } => evaluate(config, &overrides, format),
        Command::Sweep {
            overrides,
            field,
            min,
            max,
            steps,
            format,
            output,
        } => {
            let mut sweep_config = match (field, config.sweep.clone()) {
                (Some(field), Some(mut configured)) => {
                    configured.field = field;
                    configured
                }
                (Some(field), None) => SweepConfig::new(field),
                (None, Some(configured)) => configured,
                (None, None) => {
                    return Err(HelmholtzError::config(
                        "no sweep field given; pass --field or add a [sweep] section",
                    ))
                }
            };
            sweep_config.min = min.unwrap_or(sweep_config.min);
            sweep_config.max = max.unwrap_or(sweep_config.max);
            sweep_config.steps = steps.unwrap_or(sweep_config.steps);

            let text = sweep(config, &overrides, &sweep_config, format)?;
            match output {
                Some(path) => {
                    File::create(&path)?.write_all(text.as_bytes())?;
                    info!("wrote {}", path.display());
                }
                None => io::stdout().write_all(text.as_bytes())?,
            }
            Ok(())
        }
        Command::Layout {
            diameter,
            spacing,
            points,
        } => {
            println!("Holes: {}", resolve_hole_count(diameter, spacing)?);
            if points {
                println!("x,y");
                for p in lattice_points(diameter, spacing)? {
                    println!("{},{}", p.x, p.y);
                }
            }
            Ok(())
        }
        Command::InitConfig { output, force } => {
            if output.exists() && !force {
                return Err(HelmholtzError::config(format!(
                    "{} already exists (use --force to overwrite)",
                    output.display()
                )));
            }
            let config = RunConfig {
                sweep: Some(SweepConfig::new(SweepField::AirGap)),
                ..RunConfig::default()
            };
            config.save(&output)?;
            info!("wrote default configuration to {}", output.display());
            Ok(())
        }
    }
}

fn evaluate(config: RunConfig, overrides: &ParameterOverrides, format: OutputFormat) -> Result<()> {
    let mut params = config.parameters;
    overrides.apply(&mut params)?;

    let result = config.evaluator.build().evaluate(&params)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Csv => {
            println!("f0,OA%,density,spacing,N");
            println!(
                "{},{},{},{},{}",
                result.frequency_hz,
                result.open_area_percent,
                result.hole_density_per_cm2,
                result.hole_spacing_mm,
                result.hole_count
            );
        }
        OutputFormat::Text => println!("{}", result),
    }
    Ok(())
}

fn sweep(
    config: RunConfig,
    overrides: &ParameterOverrides,
    sweep_config: &SweepConfig,
    format: OutputFormat,
) -> Result<String> {
    let mut params = config.parameters;
    overrides.apply(&mut params)?;

    let range = LinearRange::new(sweep_config.min, sweep_config.max, sweep_config.steps)?;
    let series = Sweep::new(params, sweep_config.field, range)?.run(&config.evaluator.build())?;

    Ok(match format {
        OutputFormat::Csv => series.to_csv(),
        OutputFormat::Json => {
            let mut json = series.to_json()?;
            json.push('\n');
            json
        }
        OutputFormat::Text => series.to_string(),
    })
}
