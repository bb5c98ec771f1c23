use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info, warn};

use gameflow::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "gameflow", version, about = "Run a game session in a window")]
struct Cli {
    /// Session settings file (RON). Built-in defaults when omitted.
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Session ticks per second
    #[arg(long, default_value_t = 60.0, value_parser = parse_tps)]
    tps: f64,
}

fn parse_tps(arg: &str) -> Result<f64, String> {
    let tps: f64 = arg.parse().map_err(|e| format!("{e}"))?;
    match frame_duration(tps) {
        Some(_) => Ok(tps),
        None => Err(format!("expected a positive, finite rate, got {arg}")),
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => {
            let (settings, warning) = SessionSettings::load_or_default(path);
            if let Some(warning) = warning {
                warn!("{warning}");
            } else {
                info!("Loaded settings from {}", path.display());
            }
            settings
        }
        None => SessionSettings::default(),
    };

    for warning in settings.validate() {
        warn!("config: {warning}");
    }

    let engine = match EngineBuilder::new(settings).with_tps(cli.tps).build() {
        Ok(engine) => engine,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match engine.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
