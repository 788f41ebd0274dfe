//! Application startup
//!
//! Parses the command line, merges the configuration file, installs logging
//! and signal handlers, performs one run and prints the summary report.

use super::cli::{
    Args, RunConfig, DEFAULT_MAX_CONSUMER_WAIT, DEFAULT_MAX_PRODUCER_WAIT, DEFAULT_WAIT_UNIT_MS,
};
use super::runner::{self, RunOutcome};
use crate::core::error_handling::log_error_with_context;
use crate::core::logging::init_logging;
use crate::core::shutdown::{CancellationToken, ShutdownCoordinator};
use crate::core::system::{format_time, SystemInfo};
use crate::queue::DEFAULT_MAX_CAPACITY;
use crate::worker::MAX_ITEM_VALUE;
use std::io::IsTerminal;

/// Exit status for a run that completed
pub const EXIT_OK: i32 = 0;
/// Exit status for configuration errors and failed runs
pub const EXIT_FAILURE: i32 = 1;

/// Run the program and return its exit status
pub fn startup() -> i32 {
    let stdout_is_tty = std::io::stdout().is_terminal();
    let cli = Args::parse_with_color(stdout_is_tty);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start the async runtime: {}", e);
            return EXIT_FAILURE;
        }
    };

    runtime.block_on(run_app(cli, stdout_is_tty))
}

// Logging for errors found before the configured logger could be set up
fn fallback_logging(color: bool) {
    let _ = init_logging(None, None, None, color);
}

async fn run_app(cli: Args, stdout_is_tty: bool) -> i32 {
    let cli_color = cli.color_choice().unwrap_or(stdout_is_tty);

    let (config_path, merged) = match Args::load_config_file(cli.config_file.as_deref()).await {
        Ok(Some((path, from_file))) => (Some(path), cli.overlay(from_file)),
        Ok(None) => (None, cli),
        Err(e) => {
            fallback_logging(cli_color);
            log_error_with_context(&e, "Loading configuration");
            return EXIT_FAILURE;
        }
    };

    let config = match merged.resolve() {
        Ok(config) => config,
        Err(e) => {
            fallback_logging(merged.color_choice().unwrap_or(stdout_is_tty));
            log_error_with_context(&e, "Validating configuration");
            return EXIT_FAILURE;
        }
    };

    let color = config.color.unwrap_or(stdout_is_tty);
    let log_file = config
        .log
        .file
        .as_ref()
        .map(|path| path.to_string_lossy().into_owned());
    if let Err(e) = init_logging(
        Some(config.log.level.as_str()),
        Some(config.log.format.as_str()),
        log_file.as_deref(),
        color,
    ) {
        eprintln!("Error: failed to initialise logging: {}", e);
        return EXIT_FAILURE;
    }

    if let Some(path) = config_path {
        log::debug!("Configuration loaded from {}", path.display());
    }
    for line in banner_lines(&config, &SystemInfo::collect()) {
        log::info!("{}", line);
    }

    let coordinator = ShutdownCoordinator::new(CancellationToken::new());
    coordinator.install_signal_handlers();

    let outcome = match runner::run(&config, &coordinator).await {
        Ok(outcome) => outcome,
        Err(e) => {
            log_error_with_context(&e, "Running producers and consumers");
            return EXIT_FAILURE;
        }
    };

    finish(&config, &outcome, color)
}

fn finish(config: &RunConfig, outcome: &RunOutcome, color: bool) -> i32 {
    log::info!(
        "Run complete at {} after {:.2} seconds ({:?})",
        format_time(&chrono::Local::now()),
        outcome.runtime.as_secs_f64(),
        outcome.reason
    );

    match outcome.report(config).render(config.summary_format, color) {
        Ok(rendered) => println!("{}", rendered),
        Err(e) => {
            log::error!("Failed to render the summary report: {}", e);
            return EXIT_FAILURE;
        }
    }

    if outcome.failures > 0 {
        log::error!("{} worker thread(s) did not terminate cleanly", outcome.failures);
        EXIT_FAILURE
    } else {
        log::info!("All threads terminated cleanly");
        EXIT_OK
    }
}

/// Program identity, host details, the effective configuration and the
/// compiled defaults
pub fn banner_lines(config: &RunConfig, info: &SystemInfo) -> Vec<String> {
    let uid = info
        .uid
        .map_or_else(String::new, |uid| format!(" (uid {})", uid));

    vec![
        format!(
            "prioqueue {} (built {}, commit {})",
            env!("CARGO_PKG_VERSION"),
            crate::BUILD_TIME,
            crate::GIT_HASH
        ),
        format!("User: {}{} on {} (pid {})", info.user, uid, info.host, info.pid),
        format!(
            "Runtime configuration: producers={}, consumers={}, capacity={}, timeout={}s",
            config.producers,
            config.consumers,
            config.capacity,
            config.run_for.as_secs()
        ),
        format!(
            "Pacing: max producer wait={}, max consumer wait={}, wait unit={}ms, seed={}",
            config.producer.max_wait,
            config.consumer.max_wait,
            config.producer.wait_unit.as_millis(),
            config
                .producer
                .seed
                .map_or_else(|| "entropy".to_string(), |seed| seed.to_string())
        ),
        format!(
            "Compiled defaults: max producer wait={}, max consumer wait={}, wait unit={}ms, values 0..={}, max capacity={}",
            DEFAULT_MAX_PRODUCER_WAIT,
            DEFAULT_MAX_CONSUMER_WAIT,
            DEFAULT_WAIT_UNIT_MS,
            MAX_ITEM_VALUE,
            DEFAULT_MAX_CAPACITY
        ),
        format!("Starting run at {}", format_time(&info.started_at)),
    ]
}
