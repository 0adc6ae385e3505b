use std::process::ExitCode;

use starfield::{app, args, Mode, Settings};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    let mode = args::parse(std::env::args().skip(1));
    tracing::debug!(?mode, "parsed command line");

    let settings_path = match Settings::default_path() {
        Ok(path) => Some(path),
        Err(e) => {
            tracing::warn!(error = %e, "settings will not be persisted");
            None
        }
    };
    let settings = settings_path
        .as_deref()
        .map(Settings::load_or_default)
        .unwrap_or_default();

    if cfg!(not(feature = "egui")) && matches!(mode, Mode::Settings { .. }) {
        // No editor compiled in: show where the settings live instead.
        match &settings_path {
            Some(path) => println!("Settings file: {}", path.display()),
            None => println!("No configuration directory available"),
        }
        match serde_json::to_string_pretty(&settings) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("Could not format settings: {e}"),
        }
        return ExitCode::SUCCESS;
    }

    match app::run(mode, settings, settings_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "starfield failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
