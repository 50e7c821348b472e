//! Statistical helpers for the valuation engine.

// ── Basic moments ─────────────────────────────────────────────────────────────

/// Arithmetic mean. Returns `0.0` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (delta degrees of freedom = 1).
///
/// Returns NaN when fewer than two values are present — the statistic is
/// undefined there, and NaN keeps that visible downstream.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    (sum_sq / (n as f64 - 1.0)).sqrt()
}

// ── Concentration ─────────────────────────────────────────────────────────────

/// Below this HHI a catalog counts as diversified.
pub const HHI_DIVERSIFIED_MAX: f64 = 1500.0;

/// Above this HHI a catalog counts as highly concentrated.
pub const HHI_CONCENTRATED_MIN: f64 = 2500.0;

/// Herfindahl-Hirschman Index: the sum of squared percentage shares.
///
/// Shares are percentage points, so the result lands on the 0–10,000 scale
/// (10,000 = one contributor holds 100%).
pub fn herfindahl_index(shares_pct: &[f64]) -> f64 {
    shares_pct.iter().map(|s| s * s).sum()
}

/// Reporting-only concentration scalars derived from the sorted valuation rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConcentrationSummary {
    /// Largest single contributor's share of window revenue.
    pub top1_pct: f64,
    /// Cumulative share of the top 5 rows (fewer when fewer rows exist).
    pub top5_pct: f64,
    /// Cumulative share of the top 10 rows (fewer when fewer rows exist).
    pub top10_pct: f64,
    /// Herfindahl-Hirschman Index over all rows.
    pub hhi: f64,
    /// Number of contributing rows.
    pub row_count: usize,
}

impl ConcentrationSummary {
    /// Build the summary from percentage contributions already sorted by
    /// total net descending.
    ///
    /// Returns `None` when there are no rows or when any share is
    /// non-finite — the zero-grand-total window, where shares are
    /// undefined by construction.
    pub fn from_sorted_shares(shares_pct: &[f64]) -> Option<Self> {
        if shares_pct.is_empty() || shares_pct.iter().any(|s| !s.is_finite()) {
            return None;
        }
        let cumulative = |n: usize| shares_pct.iter().take(n).sum::<f64>();
        Some(ConcentrationSummary {
            top1_pct: shares_pct[0],
            top5_pct: cumulative(5),
            top10_pct: cumulative(10),
            hhi: herfindahl_index(shares_pct),
            row_count: shares_pct.len(),
        })
    }

    /// Human-readable interpretation of the HHI value.
    pub fn hhi_label(&self) -> &'static str {
        if self.hhi < HHI_DIVERSIFIED_MAX {
            "diversified"
        } else if self.hhi > HHI_CONCENTRATED_MIN {
            "highly concentrated"
        } else {
            "moderately concentrated"
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
