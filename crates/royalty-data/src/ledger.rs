//! Ledger persistence.
//!
//! The flat CSV tables written here are the contract boundary with any
//! downstream consumer (the valuation stage re-reads the track ledger
//! rather than reusing in-memory state). Files are always freshly
//! overwritten with a header row, rows sorted ascending by key.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use royalty_core::error::{PipelineError, Result};
use royalty_core::models::{FormatLedgerEntry, LedgerEntry};

use crate::aggregator::LedgerKey;

/// Track ledger header: `Month, ISRC, Track, Gross, Net, Units`.
pub const TRACK_LEDGER_COLUMNS: [&str; 6] = ["Month", "ISRC", "Track", "Gross", "Net", "Units"];

/// Format split header: `Month, Digital_Net, Physical_Net, Total_Net`.
pub const FORMAT_SPLIT_COLUMNS: [&str; 4] = ["Month", "Digital_Net", "Physical_Net", "Total_Net"];

// ── Writing ───────────────────────────────────────────────────────────────────

/// Write the per-track ledger. Currency at 4 decimal places, units
/// truncated to an integer count.
pub fn write_track_ledger(path: &Path, tracks: &BTreeMap<LedgerKey, LedgerEntry>) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(TRACK_LEDGER_COLUMNS)?;

    for ((month, isrc), entry) in tracks {
        let gross = format!("{:.4}", entry.gross_sum);
        let net = format!("{:.4}", entry.net_sum);
        let units = format!("{}", entry.units_sum as i64);
        writer.write_record([
            month.as_str(),
            isrc.as_str(),
            entry.track_name.as_str(),
            gross.as_str(),
            net.as_str(),
            units.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write the per-month digital/physical split at 2 decimal places.
pub fn write_format_split(
    path: &Path,
    formats: &BTreeMap<String, FormatLedgerEntry>,
) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(FORMAT_SPLIT_COLUMNS)?;

    for (month, entry) in formats {
        let digital = format!("{:.2}", entry.digital_net);
        let physical = format!("{:.2}", entry.physical_net);
        let total = format!("{:.2}", entry.total_net());
        writer.write_record([month.as_str(), digital.as_str(), physical.as_str(), total.as_str()])?;
    }

    writer.flush()?;
    Ok(())
}

// ── Reading ───────────────────────────────────────────────────────────────────

/// One persisted track-ledger row, as read back for valuation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LedgerRow {
    #[serde(rename = "Month")]
    pub month: String,
    #[serde(rename = "ISRC")]
    pub isrc: String,
    #[serde(rename = "Track")]
    pub track: String,
    #[serde(rename = "Gross")]
    pub gross: f64,
    #[serde(rename = "Net")]
    pub net: f64,
    #[serde(rename = "Units")]
    pub units: i64,
}

/// Read the persisted track ledger back into typed rows.
///
/// Unlike statement ingestion, a malformed row here is a hard error: the
/// ledger is our own output and corruption means the run cannot be trusted.
pub fn read_track_ledger(path: &Path) -> Result<Vec<LedgerRow>> {
    let file = std::fs::File::open(path).map_err(|source| PipelineError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::Reader::from_reader(file);

    let mut rows = Vec::new();
    for (index, result) in reader.deserialize::<LedgerRow>().enumerate() {
        let row = result.map_err(|e| PipelineError::LedgerParse {
            path: path.to_path_buf(),
            // Header occupies line 1; data starts at line 2.
            line: index as u64 + 2,
            reason: e.to_string(),
        })?;
        rows.push(row);
    }
    Ok(rows)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
