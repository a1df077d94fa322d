//! Seating CSV reader.
//!
//! Header names are matched case-insensitively against a small alias table,
//! so `Name`, `name` and `Full Name` all resolve to the full-name column.
//! Missing columns and short rows produce empty strings; only I/O and
//! reader-level CSV failures are reported as errors.

use std::fs::File;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GuestListError, Result};

const FULL_NAME_ALIASES: &[&str] = &["name", "full name", "guest", "guest name"];
const FIRST_NAME_ALIASES: &[&str] = &["first name", "first", "firstname", "first_name", "given name"];
const LAST_NAME_ALIASES: &[&str] = &[
    "last name",
    "last",
    "lastname",
    "last_name",
    "surname",
    "family name",
];
const TABLE_ALIASES: &[&str] = &["table no.", "table", "table number", "table #", "table no"];

/// One seated guest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestRecord {
    pub first_name: String,
    pub last_name: String,
    pub table: String,
}

impl GuestRecord {
    pub fn new(first_name: &str, last_name: &str, table: &str) -> Self {
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            table: table.to_string(),
        }
    }

    /// Build a record from a single "First Middle Last" field.
    pub fn from_full_name(full_name: &str, table: &str) -> Self {
        let (first_name, last_name) = split_full_name(full_name);
        Self {
            first_name,
            last_name,
            table: table.trim().to_string(),
        }
    }
}

/// How first and last names are derived from a CSV row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NameFormat {
    /// Separate first/last columns when the header has a last-name column,
    /// otherwise a single full-name column.
    #[default]
    Auto,
    /// One "Name" column, split on its last space.
    FullName,
    /// Separate "First Name" / "Last Name" columns.
    SplitColumns,
}

/// Split a full name on its last space: everything before is the first
/// name, the final token is the last name. A name without a space is
/// last-name-only.
pub fn split_full_name(full_name: &str) -> (String, String) {
    let full_name = full_name.trim();
    match full_name.rfind(' ') {
        Some(idx) => (
            full_name[..idx].trim().to_string(),
            full_name[idx + 1..].trim().to_string(),
        ),
        None => (String::new(), full_name.to_string()),
    }
}

/// Column indices resolved from the header row.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ColumnMap {
    format: NameFormat,
    full_name: Option<usize>,
    first_name: Option<usize>,
    last_name: Option<usize>,
    table: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &[String], requested: NameFormat) -> Self {
        let full_name = find_column(headers, FULL_NAME_ALIASES);
        let first_name = find_column(headers, FIRST_NAME_ALIASES);
        let last_name = find_column(headers, LAST_NAME_ALIASES);
        let table = find_column(headers, TABLE_ALIASES);

        let has_split = first_name.is_some() || last_name.is_some();
        let format = match requested {
            NameFormat::Auto if last_name.is_some() => NameFormat::SplitColumns,
            NameFormat::Auto => NameFormat::FullName,
            // A preferred layout the header cannot satisfy falls back to the other one.
            NameFormat::SplitColumns if !has_split && full_name.is_some() => {
                log::info!("No first/last name columns; reading the full-name column instead");
                NameFormat::FullName
            }
            NameFormat::FullName if full_name.is_none() && has_split => {
                log::info!("No full-name column; reading first/last name columns instead");
                NameFormat::SplitColumns
            }
            explicit => explicit,
        };

        match format {
            NameFormat::FullName if full_name.is_none() => {
                log::warn!("No name column found in header {headers:?}; names will be empty")
            }
            NameFormat::SplitColumns if first_name.is_none() && last_name.is_none() => {
                log::warn!("No first/last name columns found in header {headers:?}; names will be empty")
            }
            _ => {}
        }
        if table.is_none() {
            log::warn!("No table column found in header {headers:?}; tables will be empty");
        }

        Self {
            format,
            full_name,
            first_name,
            last_name,
            table,
        }
    }

    fn guest_from_row(&self, row: &[String]) -> GuestRecord {
        let table = field(row, self.table);

        match self.format {
            NameFormat::SplitColumns => GuestRecord {
                first_name: field(row, self.first_name).trim().to_string(),
                last_name: field(row, self.last_name).trim().to_string(),
                table: table.trim().to_string(),
            },
            _ => GuestRecord::from_full_name(field(row, self.full_name), table),
        }
    }
}

fn field(row: &[String], idx: Option<usize>) -> &str {
    idx.and_then(|i| row.get(i)).map(String::as_str).unwrap_or("")
}

fn normalize_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}').trim().to_lowercase()
}

fn find_column(headers: &[String], aliases: &[&str]) -> Option<usize> {
    aliases
        .iter()
        .find_map(|alias| headers.iter().position(|h| h == alias))
}

fn lossy_fields(record: &csv::ByteRecord) -> Vec<String> {
    record
        .iter()
        .map(|f| String::from_utf8_lossy(f).into_owned())
        .collect()
}

/// Read guests from any CSV source with a header row.
pub fn read_guests_from_reader<R: io::Read>(
    reader: R,
    format: NameFormat,
) -> std::result::Result<Vec<GuestRecord>, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = lossy_fields(rdr.byte_headers()?)
        .iter()
        .map(|h| normalize_header(h))
        .collect();
    let columns = ColumnMap::from_headers(&headers, format);
    log::debug!("CSV columns resolved: {columns:?}");

    let mut guests = Vec::new();
    let mut nameless = 0usize;
    for record in rdr.byte_records() {
        let guest = columns.guest_from_row(&lossy_fields(&record?));
        if guest.first_name.is_empty() && guest.last_name.is_empty() {
            nameless += 1;
        }
        guests.push(guest);
    }
    if nameless > 0 {
        log::warn!("{nameless} row(s) have no name; they are listed under '#'");
    }
    Ok(guests)
}

/// Read guests from a CSV file on disk.
pub fn read_guests(path: &Path, format: NameFormat) -> Result<Vec<GuestRecord>> {
    let file = File::open(path).map_err(|source| GuestListError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let guests = read_guests_from_reader(file, format).map_err(|source| GuestListError::Csv {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Loaded {} guest(s) from '{}'", guests.len(), path.display());
    Ok(guests)
}
