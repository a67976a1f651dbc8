#![deny(unsafe_code)]
//! Command-line driver for zeilrace.
//!
//! Subcommands:
//! - `run` configures a world from flags or a scenario file and steps it
//! - `sample` prints the wind velocity at a point
//! - `params` prints the sailboat coefficient schema

mod error;
mod scenario_file;

use clap::{Parser, Subcommand};
use error::CliError;
use std::path::PathBuf;
use std::process;
use zeilrace_core::{Scenario, WindField};
use zeilrace_sailboat::{BoatState, SailboatParams};
use zeilrace_sim::{SimConfig, Simulation};

#[derive(Parser)]
#[command(name = "zeilrace", about = "Wind field and sailboat simulation")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a simulation and report where everything ended up.
    Run {
        /// Scenario JSON file. Replaces the world flags below.
        #[arg(long)]
        scenario: Option<PathBuf>,

        /// World width in world units.
        #[arg(short = 'W', long, default_value_t = 1200.0)]
        width: f64,

        /// World height in world units.
        #[arg(short = 'H', long, default_value_t = 800.0)]
        height: f64,

        /// Number of tracer particles.
        #[arg(short, long, default_value_t = 1000)]
        particles: usize,

        /// Number of boats.
        #[arg(short, long, default_value_t = 3)]
        boats: usize,

        /// PRNG seed for deterministic output.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Number of `step` calls.
        #[arg(short, long, default_value_t = 1000)]
        steps: usize,

        /// Frame ticks per step.
        #[arg(long, default_value_t = 1.0)]
        dt: f64,

        /// Noise time coordinate for the wind field.
        #[arg(long, default_value_t = 0.0)]
        time: f64,

        /// Dynamics overrides as a JSON object.
        #[arg(long, default_value = "{}")]
        params: String,
    },
    /// Print the wind velocity at a world coordinate.
    Sample {
        x: f64,
        y: f64,

        #[arg(short = 'W', long, default_value_t = 1200.0)]
        width: f64,

        #[arg(short = 'H', long, default_value_t = 800.0)]
        height: f64,

        #[arg(long, default_value_t = 42)]
        seed: u64,

        #[arg(long, default_value_t = 0.0)]
        time: f64,
    },
    /// Print the sailboat parameter schema.
    Params,
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Params => {
            let schema = SailboatParams::param_schema();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&schema)?);
            } else if let Some(entries) = schema.as_object() {
                for (key, entry) in entries {
                    println!(
                        "{key:<14} default {:<8} {}",
                        entry["default"].to_string(),
                        entry["description"].as_str().unwrap_or_default()
                    );
                }
            }
        }
        Command::Sample {
            x,
            y,
            width,
            height,
            seed,
            time,
        } => {
            let field = WindField::generate(seed, width, height, time)?;
            let v = field.sample_velocity(x, y)?;
            if cli.json {
                let info = serde_json::json!({
                    "x": x,
                    "y": y,
                    "velocity": [v.x, v.y],
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("wind at ({x}, {y}): ({:.4}, {:.4})", v.x, v.y);
            }
        }
        Command::Run {
            scenario,
            width,
            height,
            particles,
            boats,
            seed,
            steps,
            dt,
            time,
            params,
        } => {
            let scenario = match scenario {
                Some(path) => scenario_file::load(&path)?,
                None => {
                    let mut s = Scenario::new(width, height, particles, boats, seed);
                    s.steps = steps;
                    s.dt = dt;
                    s.time_param = time;
                    s.params = scenario_file::parse_params(&params)?;
                    s
                }
            };

            let mut sim = Simulation::configure(SimConfig::from_scenario(&scenario)?)?;
            for _ in 0..scenario.steps {
                sim.step(scenario.dt)?;
            }

            if cli.json {
                let info = serde_json::json!({
                    "scenario": scenario,
                    "ticks": sim.ticks(),
                    "boats": sim.boat_snapshot(),
                    "particles": sim.particle_snapshot(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                let fleet = sim.boat_snapshot();
                let sunk = fleet.iter().filter(|b| b.state == BoatState::Sunk).count();
                eprintln!(
                    "ran {} ticks ({}x{}, seed {}): {} particles, {} boats, {sunk} sunk",
                    sim.ticks(),
                    scenario.world_width,
                    scenario.world_height,
                    scenario.seed,
                    scenario.particles,
                    fleet.len(),
                );
                for b in &fleet {
                    println!(
                        "boat {} {:?} at ({:.1}, {:.1}) heading {:.3}",
                        b.id, b.state, b.position.x, b.position.y, b.heading
                    );
                }
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
