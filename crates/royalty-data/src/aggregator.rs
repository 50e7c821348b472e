//! Ledger accumulation.
//!
//! An explicit, owned accumulator (rather than module-level state) so the
//! aggregation step is unit-testable in isolation and partial ledgers can
//! be merged associatively if files are ever processed in parallel.

use std::collections::BTreeMap;

use royalty_core::models::{CanonicalRecord, FormatLedgerEntry, LedgerEntry};

/// The `(period_key, isrc)` aggregation key.
pub type LedgerKey = (String, String);

/// Accumulating state for a full aggregation run: the per-track ledger and
/// the per-month format split, both in key-sorted maps.
#[derive(Debug, Default)]
pub struct LedgerAccumulator {
    tracks: BTreeMap<LedgerKey, LedgerEntry>,
    formats: BTreeMap<String, FormatLedgerEntry>,
    records_seen: u64,
}

impl LedgerAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one canonical record into both ledgers.
    pub fn add(&mut self, record: &CanonicalRecord) {
        self.tracks
            .entry(record.ledger_key())
            .or_insert_with(|| LedgerEntry::seeded(&record.track_name))
            .absorb(record);

        self.formats
            .entry(record.period_key.clone())
            .or_default()
            .absorb(record);

        self.records_seen += 1;
    }

    /// Merge another accumulator into this one by summing per key.
    ///
    /// Partial ledgers built from disjoint file sets combine without any
    /// ordering requirement beyond track-name preference.
    pub fn merge(&mut self, other: LedgerAccumulator) {
        for (key, entry) in other.tracks {
            match self.tracks.entry(key) {
                std::collections::btree_map::Entry::Occupied(mut occupied) => {
                    occupied.get_mut().combine(&entry);
                }
                std::collections::btree_map::Entry::Vacant(vacant) => {
                    vacant.insert(entry);
                }
            }
        }
        for (month, entry) in other.formats {
            self.formats.entry(month).or_default().combine(&entry);
        }
        self.records_seen += other.records_seen;
    }

    /// The per-track ledger, sorted ascending by `(period_key, isrc)`.
    pub fn tracks(&self) -> &BTreeMap<LedgerKey, LedgerEntry> {
        &self.tracks
    }

    /// The format split, sorted ascending by `period_key`.
    pub fn formats(&self) -> &BTreeMap<String, FormatLedgerEntry> {
        &self.formats
    }

    /// Total canonical records folded in.
    pub fn records_seen(&self) -> u64 {
        self.records_seen
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
