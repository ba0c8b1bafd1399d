mod render;
mod script;
mod sensor;
mod session;
mod settings;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use shake_core::{RollEngine, SensorStatus};

use crate::sensor::{Accelerometer, SampleSource, SyntheticShaker};
use crate::session::{Session, SessionOptions};
use crate::settings::Settings;

#[derive(Parser)]
#[command(name = "shake", about = "Roll dice by shaking the device")]
struct Cli {
    /// Settings file (TOML). Falls back to $SHAKE_CONFIG, then defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Number of sides per die
    #[arg(long, global = true)]
    sides: Option<f64>,

    /// Number of dice
    #[arg(long, global = true)]
    dice: Option<f64>,

    /// Seed for committed rolls (random if omitted)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Override the sensor update interval in milliseconds
    #[arg(long, global = true)]
    interval_ms: Option<u64>,

    /// Print a JSON snapshot instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Show the tumbling faces while shaking
    #[arg(long, global = true)]
    animate: bool,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Feed a recorded JSON-lines session through the engine
    Replay {
        /// Script file
        file: PathBuf,
    },

    /// Run a synthetic shaking session
    Simulate {
        /// Number of shakes to perform
        #[arg(long, default_value_t = 3)]
        shakes: u32,

        /// Seed for the synthetic sensor
        #[arg(long, default_value_t = 0)]
        sensor_seed: u64,

        /// Behave as if the device has no accelerometer
        #[arg(long)]
        unavailable: bool,
    },

    /// Commit a single roll without a sensor
    Roll,

    /// Print the effective settings as TOML
    Config,
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = Settings::load(cli.config.as_deref()).context("failed to load settings")?;

    match &cli.command {
        Commands::Replay { file } => cmd_replay(&cli, &settings, file).await,
        Commands::Simulate {
            shakes,
            sensor_seed,
            unavailable,
        } => cmd_simulate(&cli, &settings, *shakes, *sensor_seed, *unavailable).await,
        Commands::Roll => cmd_roll(&cli, &settings),
        Commands::Config => cmd_config(&settings),
    }
}

fn rng_for(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    }
}

/// Engine with settings applied and CLI slider overrides clamped to the UI ranges.
fn build_engine(cli: &Cli, settings: &Settings) -> Result<RollEngine<SmallRng>> {
    let mut engine = RollEngine::with_config(&settings.engine, rng_for(cli.seed))
        .context("invalid engine settings")?;
    if let Some(sides) = cli.sides {
        engine.set_sides(settings.ui.clamp_sides(sides));
    }
    if let Some(dice) = cli.dice {
        engine.set_dice_count(settings.ui.clamp_dice_count(dice));
    }
    Ok(engine)
}

fn build_session(cli: &Cli, settings: &Settings) -> Result<Session<SmallRng>> {
    let engine = build_engine(cli, settings)?;
    // Display faces are cosmetic; derive their seed so output stays reproducible
    let display_rng = rng_for(cli.seed.map(|s| s.wrapping_add(1)));
    Ok(Session::new(
        engine,
        settings.ui.clone(),
        SessionOptions {
            json: cli.json,
            animate: cli.animate,
        },
        display_rng,
    ))
}

fn update_interval(cli: &Cli, settings: &Settings) -> Duration {
    cli.interval_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| settings.sensor.update_interval())
}

async fn run_session(cli: &Cli, settings: &Settings, source: SampleSource) -> Result<()> {
    let mut session = build_session(cli, settings)?;

    let mut sensor = Accelerometer::new(source);
    sensor.set_update_interval(update_interval(cli, settings));

    session.emit(&render::banner(session.engine().dice_config()));
    if sensor.is_available() {
        session.run(sensor.subscribe()).await?;
    } else {
        let status = SensorStatus::Unavailable;
        session.set_sensor_status(status);
        if let Some(notice) = status.notice() {
            session.emit(notice);
        }
    }

    session.finish()
}

async fn cmd_replay(cli: &Cli, settings: &Settings, file: &Path) -> Result<()> {
    let events = script::load(file)?;
    tracing::info!("replaying {} events from {}", events.len(), file.display());
    run_session(cli, settings, SampleSource::Recorded(events)).await
}

async fn cmd_simulate(
    cli: &Cli,
    settings: &Settings,
    shakes: u32,
    sensor_seed: u64,
    unavailable: bool,
) -> Result<()> {
    let source = if unavailable {
        SampleSource::Unavailable
    } else {
        SampleSource::Synthetic(SyntheticShaker::new(shakes, sensor_seed))
    };
    run_session(cli, settings, source).await
}

fn cmd_roll(cli: &Cli, settings: &Settings) -> Result<()> {
    let mut engine = build_engine(cli, settings)?;
    let record = engine.commit_roll();

    if cli.json {
        let json = serde_json::to_string_pretty(&engine.snapshot())
            .context("failed to serialize snapshot")?;
        println!("{json}");
    } else {
        println!("{}", render::roll_line(&record, engine.committed_faces()));
    }
    Ok(())
}

fn cmd_config(settings: &Settings) -> Result<()> {
    print!("{}", settings.to_toml()?);
    Ok(())
}
