//! Configuration file loading and precedence

use clap::Parser;
use prioqueue::app::cli::{Args, ConfigError};
use std::io::Write;
use std::time::Duration;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_config_file_supplies_everything() {
    let file = write_config(
        r#"
producers = 3
consumers = 2
capacity = 7
timeout = 12
max-producer-wait = 1
max-consumer-wait = 2
wait-unit-ms = 50
seed = 11
summary-format = "json"
log-format = "json"
"#,
    );

    let (_, from_file) = Args::load_config_file(Some(file.path()))
        .await
        .unwrap()
        .unwrap();
    let config = from_file.resolve().unwrap();

    assert_eq!(config.producers, 3);
    assert_eq!(config.capacity, 7);
    assert_eq!(config.run_for, Duration::from_secs(12));
    assert_eq!(config.producer.wait_unit, Duration::from_millis(50));
    assert_eq!(config.consumer.max_wait, 2);
    assert_eq!(config.consumer.seed, Some(11));
    assert_eq!(config.log.format, "json");
}

#[tokio::test]
async fn test_cli_values_override_file_values() {
    let file = write_config("producers = 3\nconsumers = 2\ncapacity = 7\ntimeout = 12\n");
    let (_, from_file) = Args::load_config_file(Some(file.path()))
        .await
        .unwrap()
        .unwrap();

    let cli = Args::try_parse_from(["prioqueue", "9", "--wait-unit-ms", "5"]).unwrap();
    let config = cli.overlay(from_file).resolve().unwrap();

    assert_eq!(config.producers, 9);
    assert_eq!(config.consumers, 2);
    assert_eq!(config.producer.wait_unit, Duration::from_millis(5));
}

#[tokio::test]
async fn test_out_of_range_file_values_are_reported() {
    let file = write_config("producers = 30\nconsumers = 2\ncapacity = 50\ntimeout = 1\n");
    let (_, from_file) = Args::load_config_file(Some(file.path()))
        .await
        .unwrap()
        .unwrap();

    let message = from_file.resolve().unwrap_err().to_string();
    assert!(message.contains("PRODUCERS"));
    assert!(message.contains("CAPACITY"));
}

#[tokio::test]
async fn test_wrong_value_type() {
    let file = write_config("color = \"yes\"\n");

    let error = Args::load_config_file(Some(file.path())).await.unwrap_err();
    assert!(matches!(error, ConfigError::InvalidValue { .. }));
    assert!(error.to_string().contains("'color'"));
}
