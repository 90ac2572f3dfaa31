//! Tests for config loading

mod common;

use std::path::Path;

use forkast::config::Config;
use forkast::cuisine::CuisineEntry;
use serial_test::serial;

const ENV_VARS: &[&str] = &[
    "FORKAST_POSITIVE_THRESHOLD",
    "FORKAST_NEGATIVE_THRESHOLD",
    "FORKAST_LEXICON_PATH",
    "FORKAST_MIN_CUISINE_SCORE",
    "FORKAST_GAZETTEER_PATH",
    "FORKAST_MAX_ENTITIES_PER_CATEGORY",
    "FORKAST_HOST",
    "FORKAST_PORT",
    "FORKAST_MIN_REVIEW_CHARS",
    "FORKAST_LOG_LEVEL",
    "FORKAST_LOG_FORMAT",
];

fn clear_env() {
    for name in ENV_VARS {
        std::env::remove_var(name);
    }
}

#[test]
#[serial]
fn test_shipped_config_is_valid() {
    clear_env();
    let config = Config::load(Some(Path::new("config.toml"))).unwrap();
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.sentiment.positive_threshold, 0.1);
    assert_eq!(config.cuisine.min_score, 0.3);
}

#[test]
fn test_from_file_partial() {
    let file = common::temp_file(
        r#"
        [cuisine]
        min_score = 0.5

        [entities]
        max_per_category = 3

        [logging]
        format = "json"
        "#,
    );

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.cuisine.min_score, 0.5);
    assert_eq!(config.entities.max_per_category, 3);
    assert_eq!(config.logging.format, "json");
    assert_eq!(config.server, Config::default().server);
    assert!(config.validate().is_ok());
}

#[test]
fn test_small_cuisine_table_rejected() {
    let file = common::temp_file(
        r#"
        [[cuisine.cuisines]]
        label = "Peruvian"
        keywords = ["ceviche", "lomo saltado"]
        "#,
    );

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.cuisine.cuisines.len(), 1);
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("cuisine.cuisines"));
}

#[test]
fn test_extended_cuisine_table() {
    let mut config = Config::default();
    config.cuisine.cuisines.push(CuisineEntry {
        label: "Peruvian".to_string(),
        keywords: vec!["ceviche".to_string(), "lomo saltado".to_string()],
        aliases: Vec::new(),
    });
    assert!(config.validate().is_ok());

    let report = common::analyzer_with(&config).analyze_text("The ceviche and lomo saltado were superb");
    assert_eq!(report.cuisine.label, "Peruvian");
    assert_eq!(report.cuisine.score, 1.0);
}

#[test]
fn test_from_file_missing() {
    let err = Config::from_file(Path::new("/nonexistent/forkast.toml")).unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}

#[test]
fn test_from_file_invalid_toml() {
    let file = common::temp_file("[server\nport = ");
    let err = Config::from_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse TOML"));
}

#[test]
#[serial]
fn test_load_rejects_invalid_values() {
    clear_env();
    let file = common::temp_file("[sentiment]\npositive_threshold = -0.5\n");
    assert!(Config::load(Some(file.path())).is_err());
}

#[test]
#[serial]
fn test_env_overrides() {
    clear_env();
    std::env::set_var("FORKAST_PORT", "9191");
    std::env::set_var("FORKAST_MIN_CUISINE_SCORE", "0.45");
    std::env::set_var("FORKAST_LOG_FORMAT", "json");

    let config = Config::from_env().unwrap();
    clear_env();

    assert_eq!(config.server.port, 9191);
    assert_eq!(config.cuisine.min_score, 0.45);
    assert_eq!(config.logging.format, "json");
}

#[test]
#[serial]
fn test_env_overrides_file() {
    clear_env();
    let file = common::temp_file("[server]\nport = 7000\nhost = \"0.0.0.0\"\n");
    std::env::set_var("FORKAST_PORT", "7100");

    let config = Config::load(Some(file.path())).unwrap();
    clear_env();

    assert_eq!(config.server.port, 7100);
    assert_eq!(config.server.host, "0.0.0.0");
}

#[test]
#[serial]
fn test_env_invalid_number() {
    clear_env();
    std::env::set_var("FORKAST_PORT", "eighty");
    let err = Config::from_env().unwrap_err();
    clear_env();

    assert!(err.to_string().contains("FORKAST_PORT"));
}
