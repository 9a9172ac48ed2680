//! Tests for the shipped settings file and sample data.

use std::fs;
use std::path::Path;
use std::time::Duration;

use outreach_pack::config::load_settings_from;
use outreach_pack::leads::{LeadField, load_sample};

#[test]
fn test_default_settings_file_exists() {
    assert!(fs::metadata("config/default.toml").is_ok(), "config/default.toml missing");
}

#[test]
fn test_default_settings_parse() {
    let settings = load_settings_from(Path::new("config/default.toml")).unwrap();
    assert_eq!(settings.llm.pacing, Duration::from_millis(200));
    assert!(settings.llm.api_base_url.ends_with("/chat/completions"));
    assert_eq!(settings.report.title, "Outreach Pack");
}

#[test]
fn test_sample_leads_have_all_columns() {
    let table = load_sample(Path::new("data/leads.csv")).unwrap();
    assert_eq!(table.columns, LeadField::ALL.to_vec());
    assert!(!table.is_empty());
}

#[test]
fn test_env_example_leaves_rust_log_in_charge() {
    let example = fs::read_to_string(".env.example").unwrap();
    assert!(
        !example.lines().any(|l| l.trim_start().starts_with("OUTREACH_LOG_LEVEL=")),
        "an active OUTREACH_LOG_LEVEL would override RUST_LOG"
    );
}
