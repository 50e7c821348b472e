//! Statement file reading and row canonicalization.
//!
//! Each file is decoded tolerantly (UTF-8 with a BOM allowed), its header
//! row reconciled through the alias table, and every data row coerced into
//! a [`CanonicalRecord`]. One bad row never aborts a file: it is dropped
//! with a typed [`SkipReason`] and counted.

use std::path::Path;

use regex::Regex;
use tracing::debug;

use royalty_core::error::{PipelineError, Result};
use royalty_core::models::{
    CanonicalRecord, SkipCounts, SkipReason, ADJUSTMENT_ISRC, ADJUSTMENT_TRACK, NO_ISRC, UNKNOWN,
};
use royalty_core::period::resolve_period;

use crate::schema::{CanonicalField, HeaderMap};

// ── Public types ──────────────────────────────────────────────────────────────

/// The outcome of reading one statement file.
#[derive(Debug, Default)]
pub struct StatementRead {
    /// Rows that survived canonicalization, in file order.
    pub records: Vec<CanonicalRecord>,
    /// Data rows encountered (excluding the header).
    pub rows_read: u64,
    /// Rows dropped, broken down by reason.
    pub skips: SkipCounts,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Read one statement CSV into canonical records.
///
/// File-open and header-decode failures are errors (the caller decides
/// whether to abort or skip the file); row-level problems are isolated and
/// reported through [`StatementRead::skips`].
pub fn read_statement(path: &Path) -> Result<StatementRead> {
    let bytes = std::fs::read(path).map_err(|source| PipelineError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    // Tolerant decode: strip a UTF-8 BOM if present, replace anything
    // undecodable rather than failing the file.
    let text = String::from_utf8_lossy(&bytes);
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());
    let headers = reader.headers()?.clone();
    let map = HeaderMap::from_headers(headers.iter());

    if map.is_empty() {
        debug!(
            "No known headers in {}; every row will carry defaults",
            path.display()
        );
    }

    // Some vendors omit the period per row but encode it in the export
    // filename (e.g. "25-11 digital.csv"). Resolve that once per file.
    let fallback_period = filename_period(path);

    let mut read = StatementRead::default();
    for result in reader.records() {
        read.rows_read += 1;
        let record = match result {
            Ok(r) => r,
            Err(_) => {
                read.skips.bump(SkipReason::MalformedRow);
                continue;
            }
        };

        match canonicalize(&map, &record, fallback_period.as_deref()) {
            Ok(canonical) => read.records.push(canonical),
            Err(reason) => read.skips.bump(reason),
        }
    }

    debug!(
        "File {}: {} rows read, {} kept, {} skipped",
        path.display(),
        read.rows_read,
        read.records.len(),
        read.skips.total(),
    );

    Ok(read)
}

/// Recover a period key from the file's base name, when it starts with the
/// `YY-MM` shorthand. Used as the per-file fallback for rows whose own
/// period is unresolvable.
pub fn filename_period(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let re = Regex::new(r"^\d{2}-\d{2}").expect("regex is valid");
    let prefix = re.find(name)?.as_str();

    let key = resolve_period(prefix);
    (key != UNKNOWN).then_some(key)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Coerce one raw row into a [`CanonicalRecord`].
fn canonicalize(
    map: &HeaderMap,
    record: &csv::StringRecord,
    fallback_period: Option<&str>,
) -> std::result::Result<CanonicalRecord, SkipReason> {
    let period_raw = map.field(CanonicalField::Period, record).unwrap_or("");
    let mut period_key = resolve_period(period_raw);
    if period_key == UNKNOWN {
        if let Some(fallback) = fallback_period {
            period_key = fallback.to_string();
        }
    }

    let isrc = string_field(map, record, CanonicalField::Isrc, NO_ISRC);
    let track_name = string_field(map, record, CanonicalField::Track, UNKNOWN);
    let transaction_type = map
        .field(CanonicalField::Type, record)
        .unwrap_or("")
        .to_lowercase();

    // Adjustment rule: ISRC-less rows that are account adjustments get their
    // own bucket instead of polluting the untracked-sales one.
    let (isrc, track_name) = if isrc == NO_ISRC && transaction_type.contains("adjustment") {
        (ADJUSTMENT_ISRC.to_string(), ADJUSTMENT_TRACK.to_string())
    } else {
        (isrc, track_name)
    };

    let gross_amount = numeric_field(map, record, CanonicalField::Gross, SkipReason::BadGross)?;
    let net_amount = numeric_field(map, record, CanonicalField::Net, SkipReason::BadNet)?;
    let units = numeric_field(map, record, CanonicalField::Units, SkipReason::BadUnits)?;

    let is_physical = transaction_type.contains("physical");

    Ok(CanonicalRecord {
        period_key,
        isrc,
        track_name,
        gross_amount,
        net_amount,
        units,
        transaction_type,
        is_physical,
    })
}

/// Trimmed string field, with the sentinel substituted for missing or empty.
fn string_field(
    map: &HeaderMap,
    record: &csv::StringRecord,
    field: CanonicalField,
    sentinel: &str,
) -> String {
    match map.field(field, record).map(str::trim) {
        Some("") | None => sentinel.to_string(),
        Some(value) => value.to_string(),
    }
}

/// Numeric field: missing or empty defaults to 0; anything present but
/// unparseable drops the row with `reason`. Non-finite literals (`NaN`,
/// `inf`) count as unparseable — one such cell in the ledger would poison
/// every downstream sum.
fn numeric_field(
    map: &HeaderMap,
    record: &csv::StringRecord,
    field: CanonicalField,
    reason: SkipReason,
) -> std::result::Result<f64, SkipReason> {
    match map.field(field, record).map(str::trim) {
        Some("") | None => Ok(0.0),
        Some(value) => value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or(reason),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const HEADER: &str = "STATEMENT PERIOD,ISRC,TRACK,GROSS REVENUE ACCOUNT CURRENCY,NET SHARE ACCOUNT CURRENCY,QUANTITY,TRANSACTION TYPE";

    fn write_statement(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut content = String::from(HEADER);
        for line in lines {
            content.push('\n');
            content.push_str(line);
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    // ── read_statement ────────────────────────────────────────────────────────

    #[test]
    fn test_reads_well_formed_rows() {
        let tmp = TempDir::new().unwrap();
        let path = write_statement(
            tmp.path(),
            "statement.csv",
            &["2024-11,US1234567,Song A,200.5,100.25,3,Streaming"],
        );

        let read = read_statement(&path).expect("read");
        assert_eq!(read.rows_read, 1);
        assert_eq!(read.records.len(), 1);

        let rec = &read.records[0];
        assert_eq!(rec.period_key, "2024-11");
        assert_eq!(rec.isrc, "US1234567");
        assert_eq!(rec.track_name, "Song A");
        assert!((rec.gross_amount - 200.5).abs() < 1e-9);
        assert!((rec.net_amount - 100.25).abs() < 1e-9);
        assert!((rec.units - 3.0).abs() < 1e-9);
        assert_eq!(rec.transaction_type, "streaming");
        assert!(!rec.is_physical);
    }

    #[test]
    fn test_strips_byte_order_mark() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bom.csv");
        let content = format!("\u{feff}{HEADER}\n2024-11,US1234567,Song A,1,1,1,");
        std::fs::write(&path, content).unwrap();

        let read = read_statement(&path).expect("read");
        assert_eq!(read.records.len(), 1);
        assert_eq!(read.records[0].isrc, "US1234567");
    }

    #[test]
    fn test_bad_numeric_row_dropped_file_continues() {
        let tmp = TempDir::new().unwrap();
        let path = write_statement(
            tmp.path(),
            "statement.csv",
            &[
                "2024-11,US1234567,Song A,not-a-number,50,1,Streaming",
                "2024-11,US7654321,Song B,10,5,1,Streaming",
            ],
        );

        let read = read_statement(&path).expect("read");
        assert_eq!(read.rows_read, 2);
        assert_eq!(read.records.len(), 1);
        assert_eq!(read.records[0].isrc, "US7654321");
        assert_eq!(read.skips.bad_gross, 1);
    }

    #[test]
    fn test_non_finite_numeric_row_dropped() {
        let tmp = TempDir::new().unwrap();
        let path = write_statement(
            tmp.path(),
            "statement.csv",
            &[
                "2024-11,US1234567,Song A,0,NaN,1,Streaming",
                "2024-11,US7654321,Song B,inf,5,1,Streaming",
                "2024-11,US1111111,Song C,0,-inf,1,Streaming",
                "2024-11,US2222222,Song D,10,5,1,Streaming",
            ],
        );

        let read = read_statement(&path).expect("read");
        assert_eq!(read.rows_read, 4);
        assert_eq!(read.records.len(), 1);
        assert_eq!(read.records[0].isrc, "US2222222");
        assert_eq!(read.skips.bad_net, 2);
        assert_eq!(read.skips.bad_gross, 1);
        assert!(read.records.iter().all(|r| r.net_amount.is_finite()));
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let tmp = TempDir::new().unwrap();
        // Only a period and a net column are known.
        let path = tmp.path().join("sparse.csv");
        std::fs::write(
            &path,
            "STATEMENT PERIOD,NET_SHARE_ACCOUNT_CURRENCY\n2024-11,42.5",
        )
        .unwrap();

        let read = read_statement(&path).expect("read");
        let rec = &read.records[0];
        assert_eq!(rec.isrc, NO_ISRC);
        assert_eq!(rec.track_name, UNKNOWN);
        assert_eq!(rec.gross_amount, 0.0);
        assert!((rec.net_amount - 42.5).abs() < 1e-9);
        assert_eq!(rec.units, 0.0);
    }

    #[test]
    fn test_empty_numeric_value_defaults_to_zero() {
        let tmp = TempDir::new().unwrap();
        let path = write_statement(
            tmp.path(),
            "statement.csv",
            &["2024-11,US1234567,Song A,,25.0,,Streaming"],
        );

        let read = read_statement(&path).expect("read");
        let rec = &read.records[0];
        assert_eq!(rec.gross_amount, 0.0);
        assert_eq!(rec.units, 0.0);
        assert!((rec.net_amount - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_adjustment_rule_rebuckets_row() {
        let tmp = TempDir::new().unwrap();
        let path = write_statement(
            tmp.path(),
            "statement.csv",
            &[",,,0,-12.34,0,Manual Adjustment"],
        );

        let read = read_statement(&path).expect("read");
        let rec = &read.records[0];
        assert_eq!(rec.isrc, ADJUSTMENT_ISRC);
        assert_eq!(rec.track_name, ADJUSTMENT_TRACK);
        assert!((rec.net_amount + 12.34).abs() < 1e-9);
    }

    #[test]
    fn test_adjustment_rule_spares_rows_with_isrc() {
        let tmp = TempDir::new().unwrap();
        let path = write_statement(
            tmp.path(),
            "statement.csv",
            &["2024-11,US1234567,Song A,0,-5,0,Manual Adjustment"],
        );

        let read = read_statement(&path).expect("read");
        assert_eq!(read.records[0].isrc, "US1234567");
    }

    #[test]
    fn test_physical_flag_from_transaction_type() {
        let tmp = TempDir::new().unwrap();
        let path = write_statement(
            tmp.path(),
            "statement.csv",
            &[
                "2024-11,US1234567,Song A,0,10,1,Physical Sale",
                "2024-11,US1234567,Song A,0,10,1,Download",
            ],
        );

        let read = read_statement(&path).expect("read");
        assert!(read.records[0].is_physical);
        assert!(!read.records[1].is_physical);
    }

    #[test]
    fn test_unknown_period_falls_back_to_filename() {
        let tmp = TempDir::new().unwrap();
        let path = write_statement(
            tmp.path(),
            "25-11 statement.csv",
            &[
                ",US1234567,Song A,0,10,1,Streaming",
                "2024-01,US1234567,Song A,0,10,1,Streaming",
            ],
        );

        let read = read_statement(&path).expect("read");
        // Row with no period uses the filename; row with a period keeps its own.
        assert_eq!(read.records[0].period_key, "2025-11");
        assert_eq!(read.records[1].period_key, "2024-01");
    }

    #[test]
    fn test_unresolvable_period_stays_unknown() {
        let tmp = TempDir::new().unwrap();
        let path = write_statement(
            tmp.path(),
            "statement.csv",
            &["sometime,US1234567,Song A,0,10,1,Streaming"],
        );

        let read = read_statement(&path).expect("read");
        assert_eq!(read.records[0].period_key, UNKNOWN);
    }

    #[test]
    fn test_missing_file_is_error() {
        let result = read_statement(Path::new("/tmp/no-such-statement.csv"));
        assert!(matches!(result, Err(PipelineError::FileRead { .. })));
    }

    // ── filename_period ───────────────────────────────────────────────────────

    #[test]
    fn test_filename_period_with_shorthand_prefix() {
        assert_eq!(
            filename_period(Path::new("/in/25-01 digital.csv")),
            Some("2025-01".to_string())
        );
        assert_eq!(
            filename_period(Path::new("24-12.csv")),
            Some("2024-12".to_string())
        );
    }

    #[test]
    fn test_filename_period_without_prefix() {
        assert_eq!(filename_period(Path::new("/in/statement.csv")), None);
        // Invalid month in the prefix resolves to Unknown, so no fallback.
        assert_eq!(filename_period(Path::new("25-99.csv")), None);
    }
}
