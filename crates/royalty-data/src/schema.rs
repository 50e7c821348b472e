//! Vendor header reconciliation.
//!
//! Statement exports disagree on column naming — the same revenue figure
//! arrives as `GROSS REVENUE ACCOUNT CURRENCY` from one vendor and
//! `GROSS_REVENUE_ACCOUNT_CURRENCY` from another. A static alias table maps
//! every known spelling onto a small canonical field set; matching is
//! exact-string, deliberately without fuzzy logic.

use std::collections::HashMap;

// ── CanonicalField ────────────────────────────────────────────────────────────

/// The canonical field set every statement schema reduces to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    Gross,
    Net,
    Track,
    Isrc,
    Units,
    Period,
    Type,
}

/// Known vendor header spellings. Exact match, case- and
/// punctuation-sensitive; extend this table when a new vendor shows up.
pub const HEADER_ALIASES: &[(&str, CanonicalField)] = &[
    ("GROSS REVENUE ACCOUNT CURRENCY", CanonicalField::Gross),
    ("GROSS_REVENUE_ACCOUNT_CURRENCY", CanonicalField::Gross),
    ("NET SHARE ACCOUNT CURRENCY", CanonicalField::Net),
    ("NET_SHARE_ACCOUNT_CURRENCY", CanonicalField::Net),
    ("TRACK", CanonicalField::Track),
    ("ISRC", CanonicalField::Isrc),
    ("QUANTITY", CanonicalField::Units),
    ("UNITS SOLD", CanonicalField::Units),
    ("STATEMENT PERIOD", CanonicalField::Period),
    ("TRANSACTION TYPE", CanonicalField::Type),
];

// ── HeaderMap ─────────────────────────────────────────────────────────────────

/// Per-file mapping from canonical field to column index, restricted to the
/// headers actually present in that file.
#[derive(Debug, Default)]
pub struct HeaderMap {
    columns: HashMap<CanonicalField, usize>,
}

impl HeaderMap {
    /// Build the mapping from a file's header row. Headers with no alias are
    /// ignored; when a field appears under several headers, the last one wins.
    pub fn from_headers<'a>(headers: impl IntoIterator<Item = &'a str>) -> Self {
        let mut columns = HashMap::new();
        for (index, header) in headers.into_iter().enumerate() {
            if let Some((_, field)) = HEADER_ALIASES.iter().find(|(alias, _)| *alias == header) {
                columns.insert(*field, index);
            }
        }
        HeaderMap { columns }
    }

    /// Column index carrying `field`, if the file has one.
    pub fn column(&self, field: CanonicalField) -> Option<usize> {
        self.columns.get(&field).copied()
    }

    /// Extract `field`'s raw value from a row. `None` when the file has no
    /// matching column or the row is short.
    pub fn field<'r>(&self, field: CanonicalField, record: &'r csv::StringRecord) -> Option<&'r str> {
        self.column(field).and_then(|index| record.get(index))
    }

    /// `true` when no known header was recognized at all.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
