//! End-to-end pipeline tests: CSV in, batch, CSV/HTML out.

use std::cell::Cell;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::time::Duration;

use outreach_pack::config::{Configuration, resolve_config};
use outreach_pack::export::{self, ReportMeta};
use outreach_pack::leads::{LeadField, read_leads};
use outreach_pack::llm::{Complete, ProviderError};
use outreach_pack::outreach::{BatchRunner, ERROR_MARKER, run_outreach};
use rand::{SeedableRng, rngs::StdRng};

fn mock_config(max_rows: usize, word_limit: usize) -> Configuration {
    let source: HashMap<String, String> = [
        ("MAX_ROWS".to_string(), max_rows.to_string()),
        ("WORD_LIMIT".to_string(), word_limit.to_string()),
    ]
    .into_iter()
    .collect();
    resolve_config(&source).unwrap()
}

fn leads_csv(rows: usize) -> String {
    let mut csv = String::from("id,name,company,email,role,notes\n");
    for i in 0..rows {
        let _ = writeln!(csv, "{i},Lead {i},Company {i},lead{i}@example.com,Role {i},n/a");
    }
    csv
}

#[test]
fn test_row_cap_keeps_first_rows_in_order() {
    let table = read_leads(leads_csv(150).as_bytes()).unwrap();
    let out = run_outreach(&table, &mock_config(5, 75));

    assert_eq!(out.len(), 5);
    let names: Vec<&str> = out.rows.iter().map(|r| r.lead.name()).collect();
    assert_eq!(names, ["Lead 0", "Lead 1", "Lead 2", "Lead 3", "Lead 4"]);
}

#[test]
fn test_output_count_is_min_of_cap_and_distinct_emails() {
    let csv = "name,email\nA,a@x\nB,b@x\nA again,a@x\nC,c@x\nB again,b@x\n";
    let table = read_leads(csv.as_bytes()).unwrap();

    assert_eq!(run_outreach(&table, &mock_config(100, 75)).len(), 3);
    assert_eq!(run_outreach(&table, &mock_config(2, 75)).len(), 2);

    let out = run_outreach(&table, &mock_config(100, 75));
    let names: Vec<&str> = out.rows.iter().map(|r| r.lead.name()).collect();
    assert_eq!(names, ["A", "B", "C"]);
}

#[test]
fn test_without_email_column_every_row_survives() {
    let csv = "name,company\nA,X\nA,X\nA,X\n";
    let table = read_leads(csv.as_bytes()).unwrap();
    let out = run_outreach(&table, &mock_config(100, 75));
    assert_eq!(out.len(), 3);
    assert_eq!(out.columns, vec![LeadField::Name, LeadField::Company]);
}

#[test]
fn test_every_message_is_non_empty_and_capped() {
    let table = read_leads(leads_csv(20).as_bytes()).unwrap();
    let out = run_outreach(&table, &mock_config(100, 10));
    for row in &out.rows {
        let msg = row.outreach_message();
        assert!(!msg.is_empty());
        assert!(msg.split_whitespace().count() <= 11, "over limit: {msg}");
    }
}

struct FailsOnThird {
    calls: Cell<usize>,
}

impl Complete for FailsOnThird {
    fn complete(&self, _prompt: &str) -> Result<String, ProviderError> {
        let n = self.calls.get() + 1;
        self.calls.set(n);
        if n == 3 {
            Err(ProviderError::Request("connection reset".into()))
        } else {
            Ok(format!("Message {n}"))
        }
    }
}

#[test]
fn test_remote_failure_does_not_abort_batch_and_exports_marker() {
    let table = read_leads(leads_csv(5).as_bytes()).unwrap();
    let config = Configuration {
        mock_mode: false,
        api_key: "sk-test".into(),
        ..mock_config(100, 75)
    };
    let mut runner = BatchRunner::new(StdRng::seed_from_u64(11))
        .with_remote(FailsOnThird { calls: Cell::new(0) }, Duration::ZERO);

    let out = runner.run(&table, &config);
    assert_eq!(out.len(), 5);
    assert_eq!(out.failed_count(), 1);
    assert!(out.rows[2].outreach_message().starts_with(ERROR_MARKER));
    for i in [0, 1, 3, 4] {
        assert!(out.rows[i].outreach_message().starts_with("Message "));
    }

    let dir = tempfile::tempdir().unwrap();
    let meta = ReportMeta { title: "Outreach Pack".into(), mode: config.mode_label().into(), word_limit: 75 };
    let paths = export::export_all(&out, &meta, dir.path()).unwrap();

    let csv = fs::read_to_string(&paths.csv).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("name,company,email,role,outreach_message"));
    assert_eq!(csv.matches("[ERROR] provider request failed: connection reset").count(), 1);

    let html = fs::read_to_string(&paths.html).unwrap();
    assert!(html.contains(">API</span>"));
    assert!(html.contains("Messages: 5"));
}

#[test]
fn test_empty_input_degrades_to_empty_output() {
    let table = read_leads("name,company,email,role\n".as_bytes()).unwrap();
    let out = run_outreach(&table, &mock_config(100, 75));
    assert!(out.is_empty());
}
