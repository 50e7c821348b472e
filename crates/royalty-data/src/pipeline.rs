//! Pipeline orchestration.
//!
//! Two independently runnable phases: aggregation (statements in, ledgers
//! out) and valuation (track ledger in, statistics report out). The full
//! run chains them through the persisted track ledger, never through
//! in-memory state, so each phase stays replayable on its own.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use royalty_core::error::Result;
use royalty_core::models::SkipCounts;

use crate::aggregator::LedgerAccumulator;
use crate::ledger;
use crate::locator::find_statement_files;
use crate::reader::read_statement;
use crate::valuation::{self, ValuationReport};

/// Per-track monthly ledger file name.
pub const TRACK_LEDGER_FILE: &str = "track_monthly_performance.csv";

/// Per-month digital/physical split file name.
pub const FORMAT_SPLIT_FILE: &str = "monthly_format_split.csv";

/// Trailing-window valuation report file name.
pub const VALUATION_FILE: &str = "track_ltm_valuation_stats.csv";

// ── Aggregation ───────────────────────────────────────────────────────────────

/// Summary of one aggregation run.
#[derive(Debug)]
pub struct AggregationOutcome {
    pub files_found: usize,
    pub files_read: usize,
    pub files_failed: usize,
    pub rows_read: u64,
    pub records_kept: u64,
    pub skips: SkipCounts,
    pub track_ledger: PathBuf,
    pub format_split: PathBuf,
}

/// Discover, read and aggregate every statement under `root`, writing both
/// ledgers into `out_dir`.
///
/// An unreadable file is logged and skipped; the run continues with the
/// remaining files. Zero discovered files still produces header-only
/// ledgers, so a stale previous run never survives.
pub fn run_aggregation(root: &Path, out_dir: &Path) -> Result<AggregationOutcome> {
    let files = find_statement_files(root);
    info!(
        "Found {} statement file(s) under {}",
        files.len(),
        root.display()
    );

    let mut acc = LedgerAccumulator::new();
    let mut outcome = AggregationOutcome {
        files_found: files.len(),
        files_read: 0,
        files_failed: 0,
        rows_read: 0,
        records_kept: 0,
        skips: SkipCounts::default(),
        track_ledger: out_dir.join(TRACK_LEDGER_FILE),
        format_split: out_dir.join(FORMAT_SPLIT_FILE),
    };

    for path in &files {
        let read = match read_statement(path) {
            Ok(read) => read,
            Err(e) => {
                warn!("Skipping unreadable statement {}: {e}", path.display());
                outcome.files_failed += 1;
                continue;
            }
        };

        outcome.files_read += 1;
        outcome.rows_read += read.rows_read;
        if read.skips.total() > 0 {
            warn!("{}: dropped rows ({})", path.display(), read.skips);
        }
        outcome.skips.absorb(&read.skips);

        for record in &read.records {
            acc.add(record);
        }
    }
    outcome.records_kept = acc.records_seen();

    std::fs::create_dir_all(out_dir)?;
    ledger::write_track_ledger(&outcome.track_ledger, acc.tracks())?;
    ledger::write_format_split(&outcome.format_split, acc.formats())?;

    info!(
        "Aggregation complete: {}/{} file(s) read, {} rows in, {} records kept, {} dropped",
        outcome.files_read,
        outcome.files_found,
        outcome.rows_read,
        outcome.records_kept,
        outcome.skips.total(),
    );
    info!("Track ledger: {}", outcome.track_ledger.display());
    info!("Format split: {}", outcome.format_split.display());

    Ok(outcome)
}

// ── Valuation ─────────────────────────────────────────────────────────────────

/// Run the valuation phase: re-read the persisted track ledger, build the
/// trailing-window report and persist it.
///
/// A missing or corrupt ledger is a hard error here; run aggregation first.
pub fn run_valuation(
    ledger_path: &Path,
    report_path: &Path,
    window_months: usize,
) -> Result<ValuationReport> {
    let rows = ledger::read_track_ledger(ledger_path)?;
    info!(
        "Read {} ledger row(s) from {}",
        rows.len(),
        ledger_path.display()
    );

    let report = valuation::build_report(&rows, window_months);
    valuation::write_report(report_path, &report)?;
    Ok(report)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
