use clap::{Args, Parser, Subcommand};
use laes_app::{
    AppError, AppResult, ConfigOverrides, RteSummary, load_config, resolve_schedule,
    run_economics, run_rte, run_simulation, write_json, write_partial_ledger, write_simulation,
};
use laes_fluids::CoolPropBackend;
use laes_project::PlantConfig;
use laes_sim::{Simulation, SimulationOptions};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser)]
#[command(name = "laes")]
#[command(about = "LAES model - liquid air energy storage cycle and operation", long_about = None)]
struct Cli {
    #[command(flatten)]
    plant: PlantArgs,

    /// More log output (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct PlantArgs {
    /// Plant configuration file (YAML, or JSON by extension)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Charge and discharge power rating [MW]
    #[arg(long, global = true)]
    power: Option<f64>,
    /// Storage duration [hours]
    #[arg(long, global = true)]
    hours: Option<f64>,
    /// Tank capacity [tonnes]
    #[arg(long, global = true)]
    tank: Option<f64>,
    /// Off-peak electricity price [$/MWh]
    #[arg(long, global = true)]
    offpeak: Option<f64>,
    /// On-peak electricity price [$/MWh]
    #[arg(long, global = true)]
    onpeak: Option<f64>,
}

impl PlantArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            power_mw: self.power,
            storage_hours: self.hours,
            tank_tonnes: self.tank,
            price_offpeak_mwh: self.offpeak,
            price_onpeak_mwh: self.onpeak,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Steady-state round-trip efficiency with and without cold recycling
    Rte {
        /// Write the report as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run an operating schedule through the storage-coupled simulator
    Simulate {
        /// Preset schedule (default, two_day, peak_shaving)
        #[arg(long, conflicts_with = "custom")]
        schedule: Option<String>,
        /// Custom schedule, e.g. "charge:8,idle:4,discharge:6"
        #[arg(long)]
        custom: Option<String>,
        /// Split intervals into steps of at most this many hours
        #[arg(long)]
        max_step_hours: Option<f64>,
        /// Initial tank level as a fraction of capacity
        #[arg(long, default_value_t = 0.5)]
        initial_tank: f64,
        /// Fail instead of spilling liquid when the tank is full
        #[arg(long)]
        no_spill: bool,
        /// Write the ledger (.csv) or full run (.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Capital cost, cash flow, NPV and LCOS at the steady-state RTE
    Economics {
        /// Write the report as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let config = load_config(cli.plant.config.as_deref(), &cli.plant.overrides())?;
    let backend = CoolPropBackend::air();
    if !cli.quiet {
        println!("{}\n", config.summary());
    }

    match cli.command {
        Commands::Rte { output } => cmd_rte(&config, &backend, output.as_deref()),
        Commands::Simulate {
            schedule,
            custom,
            max_step_hours,
            initial_tank,
            no_spill,
            output,
        } => {
            let options = SimulationOptions {
                initial_tank_fraction: initial_tank,
                allow_spillage: !no_spill,
                max_step_hours,
                ..SimulationOptions::default()
            };
            cmd_simulate(
                &config,
                &backend,
                schedule.as_deref(),
                custom.as_deref(),
                options,
                output.as_deref(),
            )
        }
        Commands::Economics { output } => cmd_economics(&config, &backend, output.as_deref()),
    }
}

/// Log level selected by the command-line flags alone.
fn flag_level(verbose: u8, quiet: bool) -> Level {
    if quiet {
        return Level::ERROR;
    }
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Directives in `RUST_LOG` take precedence over the flag level.
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(flag_level(verbose, quiet)).into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_rte(config: &PlantConfig, backend: &CoolPropBackend, output: Option<&Path>) -> AppResult<()> {
    let report = run_rte(config, backend)?;
    let summary = RteSummary::from(&report);
    println!("{}", summary.render());

    if let Some(path) = output {
        write_json(path, &summary)?;
        println!("\nReport written to {}", path.display());
    }
    Ok(())
}

fn cmd_simulate(
    config: &PlantConfig,
    backend: &CoolPropBackend,
    preset: Option<&str>,
    custom: Option<&str>,
    options: SimulationOptions,
    output: Option<&Path>,
) -> AppResult<()> {
    let schedule = resolve_schedule(preset, custom)?;
    println!(
        "Simulating {} intervals over {:.1} h",
        schedule.len(),
        schedule.total_hours()
    );

    let run = match run_simulation(config, backend, &schedule, options) {
        Ok(run) => run,
        Err(err) => {
            if let (Some(path), AppError::Simulation { completed, .. }) = (output, &err) {
                write_partial_ledger(path, completed)?;
                eprintln!(
                    "Partial ledger ({} steps) written to {}",
                    completed.len(),
                    path.display()
                );
            }
            return Err(err);
        }
    };

    print_simulation(&run);
    if let Some(path) = output {
        write_simulation(path, &run)?;
        println!("\nResults written to {}", path.display());
    }
    Ok(())
}

fn print_simulation(run: &Simulation) {
    println!(
        "\n{:>4} {:>9} {:>7} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "step", "mode", "hours", "in [MWh]", "out [MWh]", "tank [t]", "hot [MWh]", "cold [MWh]"
    );
    for entry in &run.ledger {
        println!(
            "{:>4} {:>9} {:>7.2} {:>10.2} {:>10.2} {:>10.1} {:>10.2} {:>10.2}",
            entry.step,
            entry.mode.as_str(),
            entry.duration_hours,
            entry.energy_in_kwh / 1e3,
            entry.energy_out_kwh / 1e3,
            entry.tank_mass_kg / 1e3,
            entry.hot_soc_kwh / 1e3,
            entry.cold_soc_kwh / 1e3,
        );
    }

    let s = &run.summary;
    let pct = |v: Option<f64>| v.map_or("n/a".to_string(), |v| format!("{:.1} %", v * 100.0));
    println!("\nSummary");
    println!("  Energy in:        {:.2} MWh", s.energy_in_kwh / 1e3);
    println!("  Energy out:       {:.2} MWh", s.energy_out_kwh / 1e3);
    println!("  RTE (simulated):  {}", pct(s.rte));
    println!("  Liquid produced:  {:.1} t", s.liquid_produced_kg / 1e3);
    println!("  Liquid consumed:  {:.1} t", s.liquid_consumed_kg / 1e3);
    println!("  Liquid spilled:   {:.1} t", s.liquid_spilled_kg / 1e3);
    println!("  Boil-off:         {:.2} t", s.boiloff_kg / 1e3);
    println!("  Hot shortfall:    {:.2} MWh", s.hot_shortfall_kwh / 1e3);
    println!("  Hot retention:    {}", pct(s.hot_retention));
    println!("  Cold retention:   {}", pct(s.cold_retention));
    println!("  Tank retention:   {}", pct(s.tank_retention));
    println!("  Final tank level: {:.1} %", s.final_tank_level * 100.0);
    if s.jt_fallback_steps > 0 {
        println!("  J-T fallback used in {} steps", s.jt_fallback_steps);
    }
}

fn cmd_economics(
    config: &PlantConfig,
    backend: &CoolPropBackend,
    output: Option<&Path>,
) -> AppResult<()> {
    let report = run_economics(config, backend)?;
    println!("{}", report.render(config));

    if let Some(path) = output {
        write_json(path, &report)?;
        println!("\nReport written to {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_flags_map_to_levels() {
        assert_eq!(flag_level(0, false), Level::WARN);
        assert_eq!(flag_level(1, false), Level::INFO);
        assert_eq!(flag_level(2, false), Level::DEBUG);
        assert_eq!(flag_level(5, false), Level::TRACE);
        assert_eq!(flag_level(0, true), Level::ERROR);
    }

    #[test]
    fn counted_verbose_flag_parses() {
        let cli = Cli::try_parse_from(["laes", "-vv", "rte"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(!cli.quiet);
        assert!(Cli::try_parse_from(["laes", "-q", "-v", "rte"]).is_err());
    }
}
