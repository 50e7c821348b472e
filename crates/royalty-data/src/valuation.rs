//! Trailing-window valuation and concentration analysis.
//!
//! Consumes the persisted track ledger (not in-memory aggregation state —
//! valuation is an independent run), restricts it to the trailing window of
//! distinct period keys, and derives per-track revenue statistics plus
//! catalog-level concentration scalars.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

use tracing::{debug, info};

use royalty_core::error::Result;
use royalty_core::models::ValuationRow;
use royalty_core::stats::{self, ConcentrationSummary};

use crate::ledger::LedgerRow;

/// Valuation report header.
pub const VALUATION_COLUMNS: [&str; 8] = [
    "ISRC",
    "Track",
    "Total_Net",
    "Mean_Monthly",
    "Std_Dev",
    "CV",
    "Pct_Contribution",
    "Cumulative_Pct",
];

// ── Report type ───────────────────────────────────────────────────────────────

/// The complete output of the valuation phase.
#[derive(Debug, Clone)]
pub struct ValuationReport {
    /// The trailing period keys analysed, ascending. The `"Unknown"` bucket
    /// sorts after every `YYYY-MM` key, so unresolved revenue stays visible
    /// inside the window rather than being silently dropped.
    pub window: Vec<String>,
    /// Per-track rows, sorted by `total_net` descending (stable).
    pub rows: Vec<ValuationRow>,
    /// Grand total net over the window.
    pub grand_total_net: f64,
    /// Concentration scalars; `None` for an empty or zero-total window.
    pub summary: Option<ConcentrationSummary>,
}

impl ValuationReport {
    /// First period of the window, when any.
    pub fn window_start(&self) -> Option<&str> {
        self.window.first().map(String::as_str)
    }

    /// Last period of the window, when any.
    pub fn window_end(&self) -> Option<&str> {
        self.window.last().map(String::as_str)
    }
}

// ── Building ──────────────────────────────────────────────────────────────────

/// Build the valuation report over the trailing `window_months` distinct
/// period keys present in `ledger`.
///
/// Tracks active in only part of the window are zero-filled, not excluded;
/// their mean and deviation are taken over the full window width.
pub fn build_report(ledger: &[LedgerRow], window_months: usize) -> ValuationReport {
    // Distinct period keys, ascending; keep the trailing `window_months`.
    let periods: BTreeSet<&str> = ledger.iter().map(|row| row.month.as_str()).collect();
    let window: Vec<String> = periods
        .iter()
        .rev()
        .take(window_months)
        .rev()
        .map(|m| m.to_string())
        .collect();

    let column: HashMap<&str, usize> = window
        .iter()
        .enumerate()
        .map(|(index, month)| (month.as_str(), index))
        .collect();
    let width = window.len();

    // Pivot (isrc, track) × period → net, zero-filled. BTreeMap keeps the
    // pre-sort row order deterministic, which makes the later stable sort's
    // tie-breaking reproducible across runs.
    let mut pivot: BTreeMap<(String, String), Vec<f64>> = BTreeMap::new();
    for row in ledger {
        if let Some(&index) = column.get(row.month.as_str()) {
            pivot
                .entry((row.isrc.clone(), row.track.clone()))
                .or_insert_with(|| vec![0.0; width])[index] += row.net;
        }
    }

    let grand_total_net: f64 = pivot.values().map(|series| series.iter().sum::<f64>()).sum();

    let mut rows: Vec<ValuationRow> = pivot
        .into_iter()
        .map(|((isrc, track_name), series)| {
            let total_net: f64 = series.iter().sum();
            let mean_monthly = stats::mean(&series);
            let std_dev = stats::sample_std_dev(&series);
            // Both quotients go non-finite exactly when their denominator is
            // zero; serialization flags that as an empty field.
            let cv = std_dev / mean_monthly;
            let pct_contribution = 100.0 * total_net / grand_total_net;
            ValuationRow {
                isrc,
                track_name,
                total_net,
                mean_monthly,
                std_dev,
                cv,
                pct_contribution,
                cumulative_pct: f64::NAN,
            }
        })
        .collect();

    // Stable sort: ties keep their pivot (key-sorted) order.
    rows.sort_by(|a, b| {
        b.total_net
            .partial_cmp(&a.total_net)
            .unwrap_or(Ordering::Equal)
    });

    let mut running = 0.0;
    for row in &mut rows {
        running += row.pct_contribution;
        row.cumulative_pct = running;
    }

    let shares: Vec<f64> = rows.iter().map(|row| row.pct_contribution).collect();
    let summary = ConcentrationSummary::from_sorted_shares(&shares);

    debug!(
        "Valuation window {:?}..{:?}: {} rows, grand total {:.4}",
        window.first(),
        window.last(),
        rows.len(),
        grand_total_net,
    );

    ValuationReport {
        window,
        rows,
        grand_total_net,
        summary,
    }
}

// ── Writing ───────────────────────────────────────────────────────────────────

/// Persist the report, rows sorted by `Total_Net` descending. Non-finite
/// statistics (zero-mean CV, zero-total shares) serialize as empty fields.
pub fn write_report(path: &Path, report: &ValuationReport) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(VALUATION_COLUMNS)?;

    for row in &report.rows {
        writer.write_record([
            row.isrc.as_str(),
            row.track_name.as_str(),
            fmt_stat(row.total_net).as_str(),
            fmt_stat(row.mean_monthly).as_str(),
            fmt_stat(row.std_dev).as_str(),
            fmt_stat(row.cv).as_str(),
            fmt_stat(row.pct_contribution).as_str(),
            fmt_stat(row.cumulative_pct).as_str(),
        ])?;
    }

    writer.flush()?;
    info!(
        "Wrote valuation report ({} rows) to {}",
        report.rows.len(),
        path.display()
    );
    Ok(())
}

/// Fixed 4-decimal formatting; empty string for undefined statistics.
fn fmt_stat(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.4}")
    } else {
        String::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
