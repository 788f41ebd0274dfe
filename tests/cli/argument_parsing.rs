//! CLI argument parsing and validation through the public API

use clap::Parser;
use prioqueue::app::cli::{Args, ConfigError, MAX_CONSUMERS, MAX_PRODUCERS};
use prioqueue::metrics::SummaryFormat;
use std::time::Duration;

static COMMAND_NAME: &str = "prioqueue";

fn parse(rest: &[&str]) -> Result<Args, clap::Error> {
    Args::try_parse_from(std::iter::once(COMMAND_NAME).chain(rest.iter().copied()))
}

#[test]
fn test_original_argument_order() {
    let config = parse(&["5", "3", "10", "30"]).unwrap().resolve().unwrap();

    assert_eq!(config.producers, 5);
    assert_eq!(config.consumers, 3);
    assert_eq!(config.capacity, 10);
    assert_eq!(config.run_for, Duration::from_secs(30));
}

#[test]
fn test_worker_limits() {
    let at_limit = [
        MAX_PRODUCERS.to_string(),
        MAX_CONSUMERS.to_string(),
        "20".to_string(),
        "1".to_string(),
    ];
    let argv: Vec<&str> = at_limit.iter().map(String::as_str).collect();
    assert!(parse(&argv).unwrap().resolve().is_ok());

    let over = (MAX_PRODUCERS + 1).to_string();
    let error = parse(&[over.as_str(), "1", "1", "1"])
        .unwrap()
        .resolve()
        .unwrap_err();
    assert!(error.to_string().contains("PRODUCERS must be between 1 and 10"));
}

#[test]
fn test_non_numeric_arguments_rejected_by_parser() {
    assert!(parse(&["five", "3", "10", "30"]).is_err());
    assert!(parse(&["5", "3", "10", "-30"]).is_err());
    assert!(parse(&["5", "3", "10", "30", "extra"]).is_err());
}

#[test]
fn test_all_problems_listed_together() {
    let error = parse(&["0", "0", "0", "0"]).unwrap().resolve().unwrap_err();

    match error {
        ConfigError::Invalid { problems } => assert_eq!(problems.len(), 4),
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_summary_format_option() {
    let config = parse(&["1", "1", "1", "1", "--summary-format", "json"])
        .unwrap()
        .resolve()
        .unwrap();
    assert_eq!(config.summary_format, SummaryFormat::Json);

    assert!(parse(&["1", "1", "1", "1", "--summary-format", "yaml"]).is_err());
}

#[test]
fn test_color_flags() {
    assert_eq!(
        parse(&["1", "1", "1", "1", "--color"]).unwrap().color_choice(),
        Some(true)
    );
    assert_eq!(
        parse(&["1", "1", "1", "1", "--no-color"])
            .unwrap()
            .color_choice(),
        Some(false)
    );
    // The last of the two wins
    assert_eq!(
        parse(&["1", "1", "1", "1", "--no-color", "--color"])
            .unwrap()
            .color_choice(),
        Some(true)
    );
}
