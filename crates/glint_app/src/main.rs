//! CI Automation Runner
//!
//! Runs the demo application with the test engine enabled and exits with a
//! nonzero status if any scripted test fails.
//!
//! Usage:
//!   glint-ci-automation                       # Run on the detected host
//!   glint-ci-automation --headless            # No window, CPU frames
//!   glint-ci-automation --settings glint.toml # Load runner settings
//!   glint-ci-automation --capture-dir shots   # Write screenshots as PNG

use anyhow::{Context, Result};
use glint_app::demo::ci_automation_config;
use glint_app::{HeadlessBackend, RunnerSettings};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match std::panic::catch_unwind(run) {
        Ok(Ok(true)) => {
            println!("\nAll tests passed!");
            ExitCode::SUCCESS
        }
        Ok(Ok(false)) => ExitCode::FAILURE,
        Ok(Err(e)) => {
            tracing::error!("CI automation failed: {:#}", e);
            ExitCode::FAILURE
        }
        Err(_) => {
            tracing::error!("CI automation panicked");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<bool> {
    let args: Vec<String> = std::env::args().collect();
    let value_of = |flag: &str| {
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1))
            .cloned()
    };

    let mut settings = match value_of("--settings") {
        Some(path) => RunnerSettings::load(Path::new(&path))
            .with_context(|| format!("loading settings from {}", path))?,
        None => RunnerSettings::default(),
    };
    if let Some(dir) = value_of("--capture-dir") {
        settings.test_engine.capture_dir = Some(PathBuf::from(dir));
    }
    settings.test_engine.enabled = true;

    let config = ci_automation_config(&settings);
    let report = if args.iter().any(|a| a == "--headless") {
        let backend = HeadlessBackend::new(settings.window.width, settings.window.height);
        glint_app::run_with_backend(config, Box::new(backend))?
    } else {
        glint_app::run(config)?
    };

    let report = report.context("test engine did not run on this host")?;
    println!("{}", report);
    Ok(report.all_passed())
}
