//! Free-form statement period resolution.
//!
//! Vendor exports spell the statement period many ways: `"January 2025"`,
//! `"2025-01"`, `"01/2025"`, full dates, or a bare `"25-01"` shorthand.
//! Everything funnels into a canonical `YYYY-MM` key, or the
//! [`UNKNOWN`](crate::models::UNKNOWN) sentinel when nothing matches.

use chrono::NaiveDate;

use crate::models::UNKNOWN;

/// Known period formats, tried in order; first successful parse wins.
/// The flag marks formats that already carry a day component.
const PERIOD_FORMATS: &[(&str, bool)] = &[
    ("%B %Y", false),
    ("%Y-%m", false),
    ("%m/%Y", false),
    ("%d/%m/%Y", true),
    ("%Y-%m-%d", true),
];

/// Resolve a free-form period string to a `YYYY-MM` key, or [`UNKNOWN`].
pub fn resolve_period(raw: &str) -> String {
    let s = raw.trim();
    if s.is_empty() {
        return UNKNOWN.to_string();
    }

    // The `YY-MM` shorthand is checked first: chrono's `%Y` accepts short
    // year fields, so "25-01" would otherwise parse as the year 25.
    if let Some(key) = resolve_shorthand(s) {
        return key;
    }

    for (fmt, has_day) in PERIOD_FORMATS {
        // Month-granularity formats get a synthetic first-of-month day so
        // they parse into a full NaiveDate.
        let parsed = if *has_day {
            NaiveDate::parse_from_str(s, fmt)
        } else {
            NaiveDate::parse_from_str(&format!("{s} 1"), &format!("{fmt} %d"))
        };
        if let Ok(date) = parsed {
            return date.format("%Y-%m").to_string();
        }
    }

    UNKNOWN.to_string()
}

/// Interpret a 5-character `YY-MM` string as `20YY-MM`.
///
/// Years before 2000 are not supported, and the month part must be a real
/// month. Returns `None` when the shape or the month does not fit.
fn resolve_shorthand(s: &str) -> Option<String> {
    let b = s.as_bytes();
    if b.len() != 5 || b[2] != b'-' {
        return None;
    }
    if ![b[0], b[1], b[3], b[4]].iter().all(u8::is_ascii_digit) {
        return None;
    }

    let expanded = format!("20{}-{}", &s[..2], &s[3..]);
    NaiveDate::parse_from_str(&format!("{expanded} 1"), "%Y-%m %d")
        .ok()
        .map(|date| date.format("%Y-%m").to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
