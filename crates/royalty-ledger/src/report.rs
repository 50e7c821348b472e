//! Console concentration report.
//!
//! Rendered to a `String` so the layout is testable without capturing
//! stdout. The numbers shown here come straight from the already-built
//! [`ValuationReport`]; nothing is recomputed.

use royalty_data::valuation::ValuationReport;

/// Render the post-valuation console report: window range, top-10 revenue
/// table, concentration lines and the HHI with its interpretation.
pub fn render(report: &ValuationReport) -> String {
    let mut out = String::new();

    match (report.window_start(), report.window_end()) {
        (Some(start), Some(end)) => {
            out.push_str(&format!("LTM Period: {start} to {end}\n"));
        }
        _ => {
            out.push_str("LTM Period: no data\n");
            return out;
        }
    }

    out.push_str("\nTOP 10 TRACKS BY LTM NET REVENUE:\n");
    let top: Vec<_> = report.rows.iter().take(10).collect();
    let track_width = top
        .iter()
        .map(|row| row.track_name.len())
        .chain(std::iter::once("Track".len()))
        .max()
        .unwrap_or(5);

    out.push_str(&format!(
        "{:<track_width$}  {:>12}  {:>16}  {:>8}\n",
        "Track", "Total_Net", "Pct_Contribution", "CV"
    ));
    for row in &top {
        out.push_str(&format!(
            "{:<track_width$}  {:>12}  {:>16}  {:>8}\n",
            row.track_name,
            fmt_cell(row.total_net, 2),
            fmt_cell(row.pct_contribution, 2),
            fmt_cell(row.cv, 4),
        ));
    }

    out.push_str("\nCONCENTRATION RISK:\n");
    match &report.summary {
        Some(summary) => {
            out.push_str(&format!("Top 1 Track: {:.1}% of Revenue\n", summary.top1_pct));
            out.push_str(&format!("Top 5 Tracks: {:.1}% of Revenue\n", summary.top5_pct));
            out.push_str(&format!(
                "Top 10 Tracks: {:.1}% of Revenue\n",
                summary.top10_pct
            ));
            out.push_str(&format!(
                "HHI (Herfindahl-Hirschman Index): {:.0}\n",
                summary.hhi
            ));
            out.push_str(
                "  (Low Score < 1500 = Diversified, High Score > 2500 = Highly Concentrated)\n",
            );
        }
        None => {
            out.push_str("No revenue in the window; shares are undefined.\n");
        }
    }

    out
}

/// Fixed-precision cell; `n/a` for undefined statistics.
fn fmt_cell(value: f64, precision: usize) -> String {
    if value.is_finite() {
        format!("{value:.precision$}")
    } else {
        "n/a".to_string()
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use royalty_data::ledger::LedgerRow;
    use royalty_data::valuation::build_report;

    fn ledger_row(month: &str, isrc: &str, track: &str, net: f64) -> LedgerRow {
        LedgerRow {
            month: month.to_string(),
            isrc: isrc.to_string(),
            track: track.to_string(),
            gross: net * 2.0,
            net,
            units: 1,
        }
    }

    #[test]
    fn test_report_layout() {
        let ledger = vec![
            ledger_row("2024-11", "US1", "Song A", 100.0),
            ledger_row("2024-12", "US1", "Song A", 300.0),
            ledger_row("2024-12", "US2", "Song B", 100.0),
        ];
        let rendered = render(&build_report(&ledger, 12));

        assert!(rendered.contains("LTM Period: 2024-11 to 2024-12"));
        assert!(rendered.contains("TOP 10 TRACKS BY LTM NET REVENUE:"));
        assert!(rendered.contains("CONCENTRATION RISK:"));
        assert!(rendered.contains("Top 1 Track: 80.0% of Revenue"));
        assert!(rendered.contains("Top 5 Tracks: 100.0% of Revenue"));
        // HHI = 80^2 + 20^2 = 6800.
        assert!(rendered.contains("HHI (Herfindahl-Hirschman Index): 6800"));
        assert!(rendered.contains("Low Score < 1500 = Diversified"));
    }

    #[test]
    fn test_table_limited_to_ten_rows() {
        let ledger: Vec<LedgerRow> = (0..15)
            .map(|i| {
                ledger_row(
                    "2024-11",
                    &format!("US{i:02}"),
                    &format!("Song {i:02}"),
                    100.0 - i as f64,
                )
            })
            .collect();
        let rendered = render(&build_report(&ledger, 12));

        assert!(rendered.contains("Song 09"));
        assert!(!rendered.contains("Song 10"));
    }

    #[test]
    fn test_undefined_cv_prints_placeholder() {
        // Single-period window: CV is undefined for every row.
        let ledger = vec![ledger_row("2024-11", "US1", "Song A", 100.0)];
        let rendered = render(&build_report(&ledger, 12));

        assert!(rendered.contains("n/a"));
    }

    #[test]
    fn test_empty_report() {
        let rendered = render(&build_report(&[], 12));
        assert!(rendered.contains("LTM Period: no data"));
        assert!(!rendered.contains("CONCENTRATION RISK:"));
    }

    #[test]
    fn test_zero_total_window_has_no_shares() {
        let ledger = vec![
            ledger_row("2024-11", "US1", "Song A", 50.0),
            ledger_row("2024-12", "US1", "Song A", -50.0),
        ];
        let rendered = render(&build_report(&ledger, 12));

        assert!(rendered.contains("shares are undefined"));
        assert!(!rendered.contains("HHI"));
    }
}
