use serde::{Deserialize, Serialize};

// ── Sentinels ─────────────────────────────────────────────────────────────────

/// Placeholder used for unresolvable period keys and missing track names.
pub const UNKNOWN: &str = "Unknown";

/// Identifier assigned to rows that carry no ISRC.
pub const NO_ISRC: &str = "NO-ISRC";

/// Identifier assigned to non-royalty ledger adjustments.
pub const ADJUSTMENT_ISRC: &str = "ADJUSTMENT";

/// Track name assigned to non-royalty ledger adjustments.
pub const ADJUSTMENT_TRACK: &str = "Account Adjustment";

// ── CanonicalRecord ───────────────────────────────────────────────────────────

/// One statement row after header reconciliation and type coercion,
/// independent of the source file's original schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    /// Canonical period key, `YYYY-MM` or [`UNKNOWN`].
    pub period_key: String,
    /// Per-track identifier, or the [`NO_ISRC`] / [`ADJUSTMENT_ISRC`] sentinel.
    pub isrc: String,
    /// Track name, or the [`UNKNOWN`] sentinel.
    pub track_name: String,
    /// Gross revenue in account currency.
    pub gross_amount: f64,
    /// Net share in account currency.
    pub net_amount: f64,
    /// Units sold. Kept fractional until output, where it is truncated.
    pub units: f64,
    /// Lower-cased free-text transaction type; may be empty.
    pub transaction_type: String,
    /// Whether the transaction type marks a physical-format sale.
    pub is_physical: bool,
}

impl CanonicalRecord {
    /// The `(period_key, isrc)` tuple this record aggregates under.
    pub fn ledger_key(&self) -> (String, String) {
        (self.period_key.clone(), self.isrc.clone())
    }
}

// ── SkipReason / SkipCounts ───────────────────────────────────────────────────

/// Why a raw statement row was dropped instead of canonicalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The CSV layer could not produce a row at all.
    MalformedRow,
    /// The gross-revenue field was present but not a number.
    BadGross,
    /// The net-share field was present but not a number.
    BadNet,
    /// The units field was present but not a number.
    BadUnits,
}

impl SkipReason {
    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            SkipReason::MalformedRow => "malformed row",
            SkipReason::BadGross => "unparseable gross",
            SkipReason::BadNet => "unparseable net",
            SkipReason::BadUnits => "unparseable units",
        }
    }
}

/// Per-reason counts of dropped rows, for data-quality reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkipCounts {
    pub malformed: u64,
    pub bad_gross: u64,
    pub bad_net: u64,
    pub bad_units: u64,
}

impl SkipCounts {
    /// Record one dropped row.
    pub fn bump(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::MalformedRow => self.malformed += 1,
            SkipReason::BadGross => self.bad_gross += 1,
            SkipReason::BadNet => self.bad_net += 1,
            SkipReason::BadUnits => self.bad_units += 1,
        }
    }

    /// Add another set of counts into this one.
    pub fn absorb(&mut self, other: &SkipCounts) {
        self.malformed += other.malformed;
        self.bad_gross += other.bad_gross;
        self.bad_net += other.bad_net;
        self.bad_units += other.bad_units;
    }

    /// Total rows dropped across all reasons.
    pub fn total(&self) -> u64 {
        self.malformed + self.bad_gross + self.bad_net + self.bad_units
    }
}

impl std::fmt::Display for SkipCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} malformed, {} bad gross, {} bad net, {} bad units",
            self.malformed, self.bad_gross, self.bad_net, self.bad_units
        )
    }
}

// ── LedgerEntry ───────────────────────────────────────────────────────────────

/// Running totals for one `(period_key, isrc)` ledger key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Display name; the last non-[`UNKNOWN`] contributing name wins.
    pub track_name: String,
    pub gross_sum: f64,
    pub net_sum: f64,
    pub units_sum: f64,
}

impl LedgerEntry {
    /// Fresh entry carrying the first record's track name and zero sums.
    pub fn seeded(track_name: &str) -> Self {
        LedgerEntry {
            track_name: track_name.to_string(),
            ..Default::default()
        }
    }

    /// Add one record's amounts into the running totals.
    pub fn absorb(&mut self, record: &CanonicalRecord) {
        self.gross_sum += record.gross_amount;
        self.net_sum += record.net_amount;
        self.units_sum += record.units;
        if record.track_name != UNKNOWN {
            self.track_name = record.track_name.clone();
        }
    }

    /// Fold another entry for the same key into this one (partial-ledger merge).
    pub fn combine(&mut self, other: &LedgerEntry) {
        self.gross_sum += other.gross_sum;
        self.net_sum += other.net_sum;
        self.units_sum += other.units_sum;
        if other.track_name != UNKNOWN {
            self.track_name = other.track_name.clone();
        }
    }
}

// ── FormatLedgerEntry ─────────────────────────────────────────────────────────

/// Per-month net revenue split by digital vs physical format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FormatLedgerEntry {
    pub digital_net: f64,
    pub physical_net: f64,
}

impl FormatLedgerEntry {
    /// Add one record's net amount into the matching format bucket.
    pub fn absorb(&mut self, record: &CanonicalRecord) {
        if record.is_physical {
            self.physical_net += record.net_amount;
        } else {
            self.digital_net += record.net_amount;
        }
    }

    /// Fold another entry for the same month into this one.
    pub fn combine(&mut self, other: &FormatLedgerEntry) {
        self.digital_net += other.digital_net;
        self.physical_net += other.physical_net;
    }

    /// Combined net across both formats.
    pub fn total_net(&self) -> f64 {
        self.digital_net + self.physical_net
    }
}

// ── ValuationRow ──────────────────────────────────────────────────────────────

/// Derived, read-only statistics for one `(isrc, track_name)` over the
/// trailing window. Share fields are non-finite when the window's grand
/// total is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationRow {
    pub isrc: String,
    pub track_name: String,
    /// Sum of net over the window.
    pub total_net: f64,
    /// Row mean over the window width, counting inactive months as zero.
    pub mean_monthly: f64,
    /// Sample standard deviation (ddof = 1); NaN for a one-period window.
    pub std_dev: f64,
    /// `std_dev / mean_monthly`; non-finite when the mean is zero.
    pub cv: f64,
    /// `100 × total_net / grand total` over all rows in the window.
    pub pct_contribution: f64,
    /// Running share after sorting rows by `total_net` descending.
    pub cumulative_pct: f64,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
