use crate::config::AuditMode;
use crate::results::{ValidationRecord, columns};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while writing the report
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("cannot write report {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot encode report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Tabular output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Csv,
    Tsv,
    Json,
}

impl ReportFormat {
    pub fn ext(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Tsv => "tsv",
            ReportFormat::Json => "json",
        }
    }

    fn separator(&self) -> Option<char> {
        match self {
            ReportFormat::Csv => Some(','),
            ReportFormat::Tsv => Some('\t'),
            ReportFormat::Json => None,
        }
    }
}

fn needs_quotes(field: &str, sep: char) -> bool {
    field.contains(sep) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV/TSV row to any writer.
pub fn write_row<W: Write>(mut w: W, row: &[&str], sep: char) -> io::Result<()> {
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            write!(w, "{}", sep)?;
        }
        if needs_quotes(cell, sep) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

/// Render the records as a header row plus one row per record
pub fn to_delimited_string(mode: AuditMode, records: &[ValidationRecord], sep: char) -> String {
    let mut out = Vec::new();
    // Writing into a Vec cannot fail
    let _ = write_row(&mut out, columns(mode), sep);
    for record in records {
        let row = record.to_row(mode);
        let cells: Vec<&str> = row.iter().map(|(_, value)| value.as_str()).collect();
        let _ = write_row(&mut out, &cells, sep);
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Render the report in the requested format
pub fn render(
    mode: AuditMode,
    format: ReportFormat,
    records: &[ValidationRecord],
) -> Result<String, ReportError> {
    match format.separator() {
        Some(sep) => Ok(to_delimited_string(mode, records, sep)),
        None => Ok(serde_json::to_string_pretty(records)?),
    }
}

/// Write the report to `path`, creating parent directories as needed.
/// Returns the path written to.
pub fn write_report(
    path: &Path,
    mode: AuditMode,
    format: ReportFormat,
    records: &[ValidationRecord],
) -> Result<PathBuf, ReportError> {
    let contents = render(mode, format, records)?;
    let io_err = |source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
    }
    std::fs::write(path, contents).map_err(io_err)?;

    ::log::info!("Wrote {} records to {}", records.len(), path.display());
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::Status;

    fn record(product: &str, status: Status, reasons: &[&str]) -> ValidationRecord {
        ValidationRecord::new(
            "2026-10-19 10:00:00",
            product.to_string(),
            status,
            reasons.iter().map(|r| r.to_string()).collect(),
        )
    }

    #[test]
    fn test_csv_has_header_and_quotes() {
        let records = vec![
            record("Clio", Status::Pass, &[]).with_price(Some("$20.000".to_string())),
            record("Kwid, Zen", Status::Fail, &["PRICE_NOT_FOUND"]),
        ];
        let csv = to_delimited_string(AuditMode::Products, &records, ',');
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Date,Product,Price,Image,Status,Details");
        assert_eq!(lines[1], "2026-10-19 10:00:00,Clio,$20.000,,PASS,");
        assert_eq!(
            lines[2],
            "2026-10-19 10:00:00,\"Kwid, Zen\",,,FAIL,PRICE_NOT_FOUND"
        );
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_tsv_escapes_embedded_quotes() {
        let records = vec![record("17\" wheels", Status::Check, &[])];
        let tsv = to_delimited_string(AuditMode::Listing, &records, '\t');
        assert!(tsv.lines().nth(1).unwrap().contains("\"17\"\" wheels\""));
    }

    #[test]
    fn test_json_keeps_record_order() {
        let records = vec![record("A", Status::Pass, &[]), record("B", Status::Fail, &["x"])];
        let json = render(AuditMode::Products, ReportFormat::Json, &records).unwrap();
        let parsed: Vec<ValidationRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, records);
    }

    #[test]
    fn test_write_report_creates_directories() {
        let dir = std::env::temp_dir().join(format!("storefront-audit-report-{}", std::process::id()));
        let path = dir.join("nested").join("report.csv");
        let records = vec![ValidationRecord::no_candidates("2026-10-19 10:00:00")];

        let written = write_report(&path, AuditMode::Products, ReportFormat::Csv, &records).unwrap();
        let contents = std::fs::read_to_string(&written).unwrap();
        assert!(contents.contains("FAIL,no elements found"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
