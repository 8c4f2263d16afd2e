//! Command-line entry point for the gesture game controller.

use anyhow::{bail, Context, Result};
use clap::Parser;
use gesture_controller::config::{Config, EXAMPLE_CONFIG};
use gesture_controller::dispatcher::Dispatcher;
use gesture_controller::engines::EngineKind;
use gesture_controller::landmarks::FrameSlot;
use gesture_controller::sink::{InjectionSink, NullSink, X11Sink};
use gesture_controller::source;
use log::{info, warn, LevelFilter};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about = "Hand and body gesture game controller")]
struct Args {
    /// Control mode: shooter, racing-hands, racing-posture, flight
    #[arg(short, long, default_value = "shooter")]
    mode: String,

    /// Path to a YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Replay landmark frames from a capture file instead of stdin
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Replay rate in frames per second when reading from a file
    #[arg(long, default_value_t = 40)]
    replay_rate: u32,

    /// Log transitions instead of injecting them into the X server
    #[arg(long)]
    dry_run: bool,

    /// Print the example configuration to stdout and exit
    #[arg(long)]
    print_config: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if args.debug {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .init();

    if args.print_config {
        print!("{EXAMPLE_CONFIG}");
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    config.validate().context("Invalid configuration")?;

    let Some(mode) = EngineKind::parse(&args.mode) else {
        bail!(
            "Unknown mode '{}'; expected shooter, racing-hands, racing-posture, or flight",
            args.mode
        );
    };

    let sink: Box<dyn InjectionSink> = if args.dry_run {
        info!("Dry run: transitions will be logged, not injected");
        Box::new(NullSink)
    } else {
        match X11Sink::new() {
            Ok(sink) => Box::new(sink),
            Err(e) => {
                warn!("X11 unavailable ({e}), falling back to dry run");
                Box::new(NullSink)
            }
        }
    };

    let slot = Arc::new(FrameSlot::new());
    let reader = match &args.input {
        Some(path) => source::spawn_file_reader(path, Arc::clone(&slot), args.replay_rate)
            .context("Failed to start replay reader")?,
        None => source::spawn_stdin_reader(Arc::clone(&slot)),
    };

    let mut dispatcher = Dispatcher::new(config, sink);
    dispatcher.switch_mode(Some(mode));
    dispatcher.run(&slot, || reader.is_finished())?;

    for entry in dispatcher.session_log().entries() {
        info!(
            "[{}] {}: {} {} {}",
            entry.timestamp, entry.event, entry.data, entry.remedy, entry.gain
        );
    }

    Ok(())
}
