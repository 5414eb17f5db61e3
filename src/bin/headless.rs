//! Runs the hourglass without a window and prints it as text.

use std::process;

use anyhow::Result;
use hourglass_sand::display::{render_ascii, NullSink};
use hourglass_sand::{Config, GravityDirection, RelaxationEngine, RunStats, Session, Simulation};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config_path = std::env::var("HOURGLASS_CONFIG").unwrap_or_else(|_| "hourglass.toml".to_string());
    let config = Config::load_or_default(&config_path)?;

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        None | Some("timed") => run_timed(&config),
        Some("drain") => {
            let direction = match args.get(2) {
                Some(name) => name.parse()?,
                None => GravityDirection::S,
            };
            run_drain(&config, direction)
        }
        Some("calibrate") => run_calibration(&config),
        Some("help") | Some("--help") | Some("-h") => {
            print_help();
            Ok(())
        }
        Some(other) => {
            eprintln!("Unknown command: {}", other);
            print_help();
            process::exit(1);
        }
    }
}

fn print_help() {
    println!("Hourglass sand simulation (headless)");
    println!();
    println!("USAGE:");
    println!("  hourglass-headless                  Fill the hourglass and time it standing upright");
    println!("  hourglass-headless timed            Same as above");
    println!("  hourglass-headless drain [DIR]      Tilt towards DIR until nothing moves (flat, n, s, e, w, ne, nw, se, sw)");
    println!("  hourglass-headless calibrate        Derive the pass delay for the configured timer");
    println!("  hourglass-headless help             Show this help message");
    println!();
    println!("Configuration is read from $HOURGLASS_CONFIG or ./hourglass.toml when present.");
}

fn filled(config: &Config) -> Result<Simulation> {
    let mut sim = Simulation::new(config.load_silhouette()?);
    let bounds = sim.reset(config.seed_rows, &mut NullSink)?;
    info!(?bounds, grains = sim.grain_count(), "filled");
    println!("{}", render_ascii(sim.grid()));
    Ok(sim)
}

fn run_timed(config: &Config) -> Result<()> {
    let mut sim = filled(config)?;
    let stats = RelaxationEngine::new(config.engine_config()).run_timed(&mut sim, &mut NullSink);
    report(&sim, &stats)
}

fn run_drain(config: &Config, direction: GravityDirection) -> Result<()> {
    let mut sim = filled(config)?;
    let mut source = direction;
    let stats = RelaxationEngine::new(config.engine_config()).run_continuous(
        &mut sim,
        &mut source,
        &mut NullSink,
        |report| report.moves > 0,
    );
    report(&sim, &stats)
}

fn report(sim: &Simulation, stats: &RunStats) -> Result<()> {
    sim.check_invariants()?;
    println!("{}", render_ascii(sim.grid()));
    println!(
        "{} passes, {} moves, {:.3} s",
        stats.passes,
        stats.total_moves,
        stats.elapsed.as_secs_f64()
    );
    Ok(())
}

fn run_calibration(config: &Config) -> Result<()> {
    let mut session = Session::new(config.load_silhouette()?, config);
    let delay = session.calibrate(config.timer(), &mut NullSink)?;
    println!(
        "pass_delay_ms = {} # for a {} s timer",
        delay.as_millis(),
        config.timer_secs
    );
    Ok(())
}
