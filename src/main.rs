use keplerlab::{load_scenario, scenario_path, ScenarioConfig};
use keplerlab::{OrbitScenario, OrbitRun, OrbitalParameters};
use keplerlab::{bench_rk4_convergence, print_convergence};
use keplerlab::{parse_table, CatalogueReader, CatalogueTable};
use keplerlab::init_logging;

use clap::{Parser, Subcommand};
use anyhow::{Context, Result};

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(version, about = "Two-body RK4 orbit diagnostics and catalogue column reader")]
struct Args {
    /// Scenario YAML, either a path or a name under scenarios/
    #[arg(short, long = "file", global = true, default_value = "mercury.yaml")]
    file_name: String,

    /// Log level used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Integrate one orbital period and report conservation errors
    Orbit {
        /// Also print the per-step table as CSV
        #[arg(long)]
        table: bool,
    },
    /// Repeat the orbit with halved step sizes and report observed orders
    Convergence {
        #[arg(long, default_value_t = 4)]
        levels: usize,
    },
    /// Fetch the configured catalogue table and print its columns as CSV
    Catalogue {
        /// Parse a local copy instead of fetching over HTTP
        #[arg(long)]
        local: Option<PathBuf>,
    },
}

// load here to keep main clean
fn load_config(file_name: &str) -> Result<ScenarioConfig> {
    let path = scenario_path(file_name);
    load_scenario(&path)
}

fn print_parameters(p: &OrbitalParameters) {
    println!("reduced mass      mu  = {:.6e} kg", p.mu);
    println!("total mass        M   = {:.6e} kg", p.M);
    println!("semi-latus rectum r_L = {:.6e} m", p.r_l);
    println!("semi-major axis   a   = {:.6e} m", p.a);
    println!("total energy      E   = {:.6e} J", p.E);
    println!("period            T   = {:.6e} s ({:.3} days)", p.T, p.T / 86_400.0);
}

fn print_run(run: &OrbitRun, table: bool) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if table {
        writeln!(out, "t,phi,r,x,y,energy_err,momentum_err,time_err")?;
        let d = &run.derived;
        for i in 0..run.phase.len() {
            writeln!(
                out,
                "{:.6e},{:.9},{:.6e},{:.6e},{:.6e},{:.3e},{:.3e},{:.3e}",
                run.phase.t[i],
                run.phase.phi[i],
                d.r[i],
                d.positions[i].x,
                d.positions[i].y,
                d.energy_error[i],
                d.momentum_error[i],
                d.time_error[i],
            )?;
        }
    }

    let s = &run.summary;
    writeln!(out, "steps                     = {}", run.phase.steps())?;
    writeln!(out, "max energy error (inner)  = {:.3e}", s.max_energy_error)?;
    writeln!(out, "max L error (inner)       = {:.3e}", s.max_momentum_error)?;
    writeln!(out, "max time error (inner)    = {:.3e}", s.max_time_error)?;
    writeln!(out, "energy error (endpoints)  = {:.3e}", s.endpoint_energy_error)?;
    writeln!(out, "L error (endpoints)       = {:.3e}", s.endpoint_momentum_error)?;
    writeln!(out, "final time error          = {:.3e}", s.final_time_error)?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let cfg = load_config(&args.file_name)?;

    match args.command {
        Command::Orbit { table } => {
            let orbit = cfg.orbit.context("scenario has no `orbit` section")?;
            let scenario = OrbitScenario::build_scenario(&orbit)?;
            print_parameters(&scenario.parameters);
            let run = scenario.run();
            print_run(&run, table)?;
        }
        Command::Convergence { levels } => {
            let orbit = cfg.orbit.context("scenario has no `orbit` section")?;
            let params = OrbitalParameters::from_config(&orbit);
            let rows = bench_rk4_convergence(&params, orbit.steps.max(1), levels)?;
            print_convergence(&rows);
        }
        Command::Catalogue { local } => {
            let catalogue = cfg.catalogue.context("scenario has no `catalogue` section")?;
            let query = catalogue.query();

            let table: CatalogueTable = match local {
                Some(path) => {
                    let text = std::fs::read_to_string(&path)
                        .with_context(|| format!("failed to read {}", path.display()))?;
                    parse_table(&text, &query)?
                }
                None => {
                    let reader = CatalogueReader::new(Duration::from_secs(catalogue.timeout_secs))?;
                    reader.read_source(&catalogue.source(), &query)?
                }
            };

            table.write_csv(io::stdout().lock())?;
        }
    }

    Ok(())
}
