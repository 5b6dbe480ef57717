//! `lbl` command-line entry point.
//!
//! Line-by-line molecular absorption from a HITRAN-style CSV line database.

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::LblConfig;
use lbl_db::{ParametricStore, SpectralDatabase};
use lbl_spectra::{synthesize_batch, Spectrum, SynthesisRequest};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

/// lbl version from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug)]
#[command(name = "lbl")]
#[command(version = VERSION)]
#[command(about = "Line-by-line molecular absorption synthesis", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Line database directory (overrides [database].path)
    #[arg(long, global = true)]
    database: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute absorption spectra and write them as JSON
    Absorption(AbsorptionArgs),

    /// List the molecules in the line database
    Molecules,

    /// Print total partition sums Q(T) of one isotopologue
    Tips {
        /// Molecule formula or alias
        molecule: String,

        /// HITRAN local isotopologue id (0 denotes the tenth)
        #[arg(short, long, default_value = "1")]
        isotopologue: i64,

        /// Temperatures [K]
        #[arg(short, long, num_args = 1.., default_value = "296")]
        temperature: Vec<f64>,
    },
}

#[derive(clap::Args, Debug, Default)]
struct AbsorptionArgs {
    /// Molecule formulae or aliases, each synthesized independently
    #[arg(required = true)]
    molecules: Vec<String>,

    /// Temperature [K]
    #[arg(long)]
    temperature: Option<f64>,

    /// Pressure [Pa]
    #[arg(long)]
    pressure: Option<f64>,

    /// Mole fraction of the absorber
    #[arg(long)]
    abundance: Option<f64>,

    /// Inclusive lower grid bound [cm-1]
    #[arg(long, allow_hyphen_values = true)]
    lower: Option<i32>,

    /// Inclusive upper grid bound [cm-1]
    #[arg(long)]
    upper: Option<i32>,

    /// Samples per wavenumber
    #[arg(long)]
    density: Option<u32>,

    /// Line window half-width [cm-1]
    #[arg(long)]
    cutoff: Option<u32>,

    /// Subtract the window-edge pedestal after each line
    #[arg(long)]
    remove_pedestal: bool,

    /// Output JSON file (overrides [output].path)
    #[arg(short, long)]
    output: Option<String>,
}

impl AbsorptionArgs {
    /// Command-line flags take precedence over file values.
    fn apply(&self, config: &mut LblConfig) {
        if let Some(t) = self.temperature {
            config.atmosphere.temperature = t;
        }
        if let Some(p) = self.pressure {
            config.atmosphere.pressure = p;
        }
        if let Some(x) = self.abundance {
            config.atmosphere.abundance = x;
        }
        if let Some(lower) = self.lower {
            config.grid.lower = lower;
        }
        if let Some(upper) = self.upper {
            config.grid.upper = upper;
        }
        if let Some(density) = self.density {
            config.grid.density = density;
        }
        if let Some(cutoff) = self.cutoff {
            config.synthesis.cutoff = cutoff;
        }
        if self.remove_pedestal {
            config.synthesis.remove_pedestal = true;
        }
        if let Some(ref path) = self.output {
            config.output.path = Some(path.clone());
        }
    }
}

/// JSON document written by `lbl absorption`.
#[derive(Serialize)]
struct AbsorptionDocument<'a> {
    version: &'static str,
    temperature: f64,
    pressure: f64,
    abundance: f64,
    wavenumbers: Vec<f64>,
    spectra: &'a [Spectrum],
}

fn open_database(config: &LblConfig) -> Result<SpectralDatabase> {
    SpectralDatabase::open(&config.database.path)
        .with_context(|| format!("Failed to open line database {}", config.database.path))
}

fn run_absorption(config: &LblConfig, args: &AbsorptionArgs) -> Result<()> {
    let conditions = config.conditions()?;
    let grid = config.spectral_grid()?;
    let db = open_database(config)?;

    let requests: Vec<SynthesisRequest> = args
        .molecules
        .iter()
        .map(|m| SynthesisRequest::new(m.as_str(), conditions, grid).with_options(config.synthesis))
        .collect();

    log::info!(
        "Grid [{}, {}] cm-1 at {} per cm-1 ({} samples), cutoff {} cm-1",
        grid.lower,
        grid.upper,
        grid.density,
        grid.len(),
        config.synthesis.cutoff
    );

    let mut spectra = Vec::with_capacity(requests.len());
    for (request, result) in requests.iter().zip(synthesize_batch(&db, &requests)) {
        let spectrum =
            result.with_context(|| format!("Synthesis failed for {}", request.molecule))?;
        log::info!(
            "{}: {} lines evaluated, {} skipped ({:?})",
            spectrum.molecule,
            spectrum.report.lines_evaluated,
            spectrum.report.lines_skipped,
            spectrum.report.termination
        );
        spectra.push(spectrum);
    }

    let document = AbsorptionDocument {
        version: VERSION,
        temperature: conditions.temperature,
        pressure: conditions.pressure,
        abundance: conditions.abundance,
        wavenumbers: grid.wavenumbers(),
        spectra: &spectra,
    };
    let json = if config.output.pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };

    match config.output.path {
        Some(ref path) => {
            std::fs::write(path, json).with_context(|| format!("Failed to write {}", path))?;
            log::info!("Absorption written to: {}", path);
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", json)?;
        }
    }
    Ok(())
}

fn run_molecules(config: &LblConfig) -> Result<()> {
    let db = open_database(config)?;
    let mut stdout = std::io::stdout().lock();
    for formula in db.molecules()? {
        writeln!(stdout, "{}", formula)?;
    }
    Ok(())
}

fn run_tips(
    config: &LblConfig,
    molecule: &str,
    isotopologue: i64,
    temperatures: &[f64],
) -> Result<()> {
    let db = open_database(config)?;
    let id = db.molecule_id(molecule)?;
    let formula = db.formula(id)?;
    let table = db
        .partition_table(id)?
        .with_context(|| format!("No partition data for {}", formula))?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "# {} isotopologue {}", formula, isotopologue)?;
    writeln!(stdout, "# T [K]\tQ(T)")?;
    for &t in temperatures {
        let q = table.total_partition_function(t, isotopologue)?;
        writeln!(stdout, "{}\t{:.6}", t, q)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logger
    let filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    log::debug!("lbl {} - Starting", VERSION);

    let mut config = match args.config {
        Some(ref path) => LblConfig::from_file(path)?,
        None => LblConfig::default(),
    };
    if let Some(ref path) = args.database {
        config.database.path = path.clone();
    }

    match args.command {
        Command::Absorption(ref absorption) => {
            absorption.apply(&mut config);
            config.validate()?;
            run_absorption(&config, absorption)
        }
        Command::Molecules => run_molecules(&config),
        Command::Tips {
            ref molecule,
            isotopologue,
            ref temperature,
        } => run_tips(&config, molecule, isotopologue, temperature),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_absorption() {
        let args = Args::try_parse_from([
            "lbl",
            "absorption",
            "CO2",
            "H2O",
            "--temperature",
            "250",
            "--lower",
            "-10",
            "--upper",
            "700",
            "--remove-pedestal",
        ])
        .unwrap();

        match args.command {
            Command::Absorption(a) => {
                assert_eq!(a.molecules, vec!["CO2", "H2O"]);
                assert_eq!(a.temperature, Some(250.0));
                assert_eq!(a.lower, Some(-10));
                assert!(a.remove_pedestal);
            }
            other => panic!("Expected absorption, got {:?}", other),
        }
    }

    #[test]
    fn test_flags_override_file_values() {
        let mut config =
            LblConfig::from_str("[atmosphere]\ntemperature = 220.0\npressure = 5000.0\n").unwrap();
        let args = AbsorptionArgs {
            molecules: vec!["CO2".into()],
            temperature: Some(300.0),
            cutoff: Some(5),
            ..Default::default()
        };
        args.apply(&mut config);

        assert_eq!(config.atmosphere.temperature, 300.0);
        assert_eq!(config.atmosphere.pressure, 5000.0);
        assert_eq!(config.synthesis.cutoff, 5);
        assert!(!config.synthesis.remove_pedestal);
    }

    #[test]
    fn test_cli_parses_tips() {
        let args =
            Args::try_parse_from(["lbl", "tips", "CO2", "-t", "200", "296", "-i", "0"]).unwrap();
        match args.command {
            Command::Tips {
                molecule,
                isotopologue,
                temperature,
            } => {
                assert_eq!(molecule, "CO2");
                assert_eq!(isotopologue, 0);
                assert_eq!(temperature, vec![200.0, 296.0]);
            }
            other => panic!("Expected tips, got {:?}", other),
        }
    }

    #[test]
    fn test_absorption_requires_a_molecule() {
        assert!(Args::try_parse_from(["lbl", "absorption"]).is_err());
    }
}
