//! Lead records and CSV loading.
//!
//! Input tables may carry any columns; only `name`, `company`, `email` and
//! `role` are recognised. Unknown columns are dropped at load time, so every
//! [`Lead`] already holds just the allow-listed fields.

use std::{fmt, fs::File, io::Read, path::Path};

use csv::ReaderBuilder;
use tabled::builder::Builder;
use tracing::{debug, info};

use crate::error::AppError;

/// A recognised lead column, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeadField {
    Name,
    Company,
    Email,
    Role,
}

impl LeadField {
    pub const ALL: [LeadField; 4] = [LeadField::Name, LeadField::Company, LeadField::Email, LeadField::Role];

    pub fn as_str(self) -> &'static str {
        match self {
            LeadField::Name => "name",
            LeadField::Company => "company",
            LeadField::Email => "email",
            LeadField::Role => "role",
        }
    }

    pub fn from_header(header: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == header.trim())
    }
}

impl fmt::Display for LeadField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A prospective contact. Absent fields read as `""` via the accessors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lead {
    pub name: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

impl Lead {
    pub fn get(&self, field: LeadField) -> Option<&str> {
        match field {
            LeadField::Name => self.name.as_deref(),
            LeadField::Company => self.company.as_deref(),
            LeadField::Email => self.email.as_deref(),
            LeadField::Role => self.role.as_deref(),
        }
    }

    fn slot(&mut self, field: LeadField) -> &mut Option<String> {
        match field {
            LeadField::Name => &mut self.name,
            LeadField::Company => &mut self.company,
            LeadField::Email => &mut self.email,
            LeadField::Role => &mut self.role,
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn company(&self) -> &str {
        self.company.as_deref().unwrap_or_default()
    }

    pub fn email(&self) -> &str {
        self.email.as_deref().unwrap_or_default()
    }

    pub fn role(&self) -> &str {
        self.role.as_deref().unwrap_or_default()
    }
}

/// Leads plus the recognised columns that were present in the source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadTable {
    /// Present columns, canonical order.
    pub columns: Vec<LeadField>,
    pub rows: Vec<Lead>,
}

impl LeadTable {
    /// Build a table from rows; `columns` is normalised to canonical order
    /// and duplicates are dropped.
    pub fn new(columns: impl IntoIterator<Item = LeadField>, rows: Vec<Lead>) -> Self {
        let wanted: Vec<LeadField> = columns.into_iter().collect();
        let columns = LeadField::ALL.into_iter().filter(|f| wanted.contains(f)).collect();
        Self { columns, rows }
    }

    pub fn has_column(&self, field: LeadField) -> bool {
        self.columns.contains(&field)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Parse a leads CSV from any reader. The first row is the header.
pub fn read_leads<R: Read>(reader: R) -> Result<LeadTable, AppError> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = rdr.headers()?.clone();
    let mapping: Vec<(usize, LeadField)> = headers
        .iter()
        .enumerate()
        .filter_map(|(idx, h)| LeadField::from_header(h).map(|f| (idx, f)))
        .fold(Vec::new(), |mut acc, (idx, f)| {
            // A repeated header keeps its first position.
            if !acc.iter().any(|(_, seen)| *seen == f) {
                acc.push((idx, f));
            }
            acc
        });

    let dropped = headers.len() - mapping.len();
    if dropped > 0 {
        debug!(dropped, "leads: ignoring unrecognised columns");
    }

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let mut lead = Lead::default();
        for &(idx, field) in &mapping {
            *lead.slot(field) = record
                .get(idx)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string);
        }
        rows.push(lead);
    }

    Ok(LeadTable::new(mapping.into_iter().map(|(_, f)| f), rows))
}

/// Load leads from a CSV file. A missing file is an error.
pub fn load_leads(path: &Path) -> Result<LeadTable, AppError> {
    let file = File::open(path)?;
    let table = read_leads(file)?;
    info!(path = %path.display(), rows = table.len(), columns = ?table.columns, "leads loaded");
    Ok(table)
}

pub const SAMPLE_LEADS_PATH: &str = "data/leads.csv";

/// Load the bundled sample, or an empty table when it is absent.
pub fn load_sample(path: &Path) -> Result<LeadTable, AppError> {
    if path.exists() {
        load_leads(path)
    } else {
        debug!(path = %path.display(), "leads: sample file absent, using empty table");
        Ok(LeadTable::new(LeadField::ALL, Vec::new()))
    }
}

/// Text table of the present columns and the first `limit` rows.
pub fn preview_table(table: &LeadTable, limit: usize) -> String {
    let mut builder = Builder::default();
    builder.push_record(table.columns.iter().map(|c| c.as_str().to_string()));
    for lead in table.rows.iter().take(limit) {
        builder.push_record(table.columns.iter().map(|&c| lead.get(c).unwrap_or_default().to_string()));
    }
    builder.build().to_string()
}
