//! Result exports: CSV for CRMs and a standalone HTML report for review.

pub mod csv_writer;
pub mod html;

use std::{fs, path::{Path, PathBuf}};

use tracing::info;

use crate::error::AppError;
use crate::outreach::OutreachTable;

pub use csv_writer::write_csv;
pub use html::{ReportMeta, render_html};

pub const CSV_FILE_NAME: &str = "outreach_results.csv";
pub const HTML_FILE_NAME: &str = "outreach_report.html";

/// Column header for the generated text.
pub const MESSAGE_COLUMN: &str = "outreach_message";

/// Paths written by [`export_all`].
#[derive(Debug, Clone)]
pub struct ExportPaths {
    pub csv: PathBuf,
    pub html: PathBuf,
}

/// Write both exports into `out_dir`, creating it if needed.
pub fn export_all(table: &OutreachTable, meta: &ReportMeta, out_dir: &Path) -> Result<ExportPaths, AppError> {
    fs::create_dir_all(out_dir)?;

    let csv_path = out_dir.join(CSV_FILE_NAME);
    let file = fs::File::create(&csv_path)?;
    write_csv(table, file)?;

    let html_path = out_dir.join(HTML_FILE_NAME);
    fs::write(&html_path, render_html(table, meta))?;

    info!(csv = %csv_path.display(), html = %html_path.display(), rows = table.len(), "exports written");
    Ok(ExportPaths { csv: csv_path, html: html_path })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leads::{Lead, LeadField};
    use crate::outreach::{MessageOutcome, OutreachResult};

    #[test]
    fn export_all_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let table = OutreachTable {
            columns: vec![LeadField::Name],
            rows: vec![OutreachResult {
                lead: Lead { name: Some("Ada".into()), ..Lead::default() },
                message: MessageOutcome::Generated("Hi Ada".into()),
            }],
        };
        let meta = ReportMeta { title: "Pack".into(), mode: "MOCK".into(), word_limit: 75 };
        let out = dir.path().join("nested");

        let paths = export_all(&table, &meta, &out).unwrap();
        let csv = fs::read_to_string(&paths.csv).unwrap();
        assert_eq!(csv, "name,outreach_message\nAda,Hi Ada\n");
        let html = fs::read_to_string(&paths.html).unwrap();
        assert!(html.contains("Hi Ada"));
    }
}
