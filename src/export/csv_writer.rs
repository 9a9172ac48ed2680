//! CSV export via the `csv` crate (UTF-8, RFC 4180 quoting).

use std::io::Write;

use csv::Writer;

use crate::error::AppError;
use crate::outreach::OutreachTable;

use super::MESSAGE_COLUMN;

/// Write `table` as CSV: present lead columns, then `outreach_message`.
pub fn write_csv<W: Write>(table: &OutreachTable, writer: W) -> Result<(), AppError> {
    let mut wtr = Writer::from_writer(writer);

    let mut header: Vec<&str> = table.columns.iter().map(|c| c.as_str()).collect();
    header.push(MESSAGE_COLUMN);
    wtr.write_record(&header)?;

    for row in &table.rows {
        let message = row.outreach_message();
        let mut record: Vec<&str> = table
            .columns
            .iter()
            .map(|&c| row.lead.get(c).unwrap_or_default())
            .collect();
        record.push(&message);
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}
