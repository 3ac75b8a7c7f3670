//! Parser for the free-text reference range mini-language.
//!
//! Ranges arrive as whatever the lab typed into the test catalog: `70-110`,
//! `13 – 17`, `<5`, `>10`, `Negative`, or plain prose. Parsing turns them
//! into a [`ReferenceRange`] variant the classifier can match on.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::trace;

static QUALITATIVE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)negative|positive").expect("valid qualitative pattern"));

static INTERVAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+(?:\.\d+)?)-(\d+(?:\.\d+)?)$").expect("valid interval pattern")
});

const EN_DASH: char = '–';

/// Parsed form of a reference range
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReferenceRange {
    /// The range names a qualitative outcome ("Negative", "Positive/Negative")
    Qualitative,

    /// Closed interval `low-high`
    Between { low: f64, high: f64 },

    /// Upper bound only, e.g. `<5`
    Below { high: f64 },

    /// Lower bound only, e.g. `>10`
    Above { low: f64 },

    /// Empty, free text or malformed
    Unparseable,
}

/// Which of the two historical range readings to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RangeDialect {
    /// Trim, detect qualitative ranges, swap the en-dash for a hyphen, strip
    /// spaces, then require a strict `NUMBER-NUMBER` interval.
    #[default]
    Normalized,

    /// Split the raw text on the en-dash and read a leading number from each
    /// side. No qualitative detection, no trimming.
    EnDashSplit,
}

impl ReferenceRange {
    /// Parse with the normalized dialect
    pub fn parse(raw: &str) -> Self {
        Self::parse_with(raw, RangeDialect::Normalized)
    }

    /// Parse with an explicit dialect. Never fails; anything unrecognized
    /// comes back as [`ReferenceRange::Unparseable`].
    pub fn parse_with(raw: &str, dialect: RangeDialect) -> Self {
        let parsed = match dialect {
            RangeDialect::Normalized => parse_normalized(raw),
            RangeDialect::EnDashSplit => parse_en_dash_split(raw),
        };
        trace!(range = raw, ?dialect, ?parsed, "parsed reference range");
        parsed
    }
}

fn parse_normalized(raw: &str) -> ReferenceRange {
    let trimmed = raw.trim();
    if QUALITATIVE_RE.is_match(trimmed) {
        return ReferenceRange::Qualitative;
    }

    let normalized = trimmed.replacen(EN_DASH, "-", 1).replace(' ', "");

    if let Some(captures) = INTERVAL_RE.captures(&normalized) {
        let low = captures[1].parse::<f64>();
        let high = captures[2].parse::<f64>();
        return match (low, high) {
            (Ok(low), Ok(high)) => ReferenceRange::Between { low, high },
            _ => ReferenceRange::Unparseable,
        };
    }

    if let Some(rest) = normalized.strip_prefix('<') {
        return leading_number(rest)
            .map(|high| ReferenceRange::Below { high })
            .unwrap_or(ReferenceRange::Unparseable);
    }

    if let Some(rest) = normalized.strip_prefix('>') {
        return leading_number(rest)
            .map(|low| ReferenceRange::Above { low })
            .unwrap_or(ReferenceRange::Unparseable);
    }

    ReferenceRange::Unparseable
}

fn parse_en_dash_split(raw: &str) -> ReferenceRange {
    if raw.contains(EN_DASH) {
        let mut sides = raw.split(EN_DASH);
        let low = sides.next().and_then(leading_number);
        let high = sides.next().and_then(leading_number);
        return match (low, high) {
            (Some(low), Some(high)) => ReferenceRange::Between { low, high },
            (Some(low), None) => ReferenceRange::Above { low },
            (None, Some(high)) => ReferenceRange::Below { high },
            (None, None) => ReferenceRange::Unparseable,
        };
    }

    if raw.starts_with('<') {
        return leading_number(&numeric_residue(raw))
            .map(|high| ReferenceRange::Below { high })
            .unwrap_or(ReferenceRange::Unparseable);
    }

    if raw.starts_with('>') {
        return leading_number(&numeric_residue(raw))
            .map(|low| ReferenceRange::Above { low })
            .unwrap_or(ReferenceRange::Unparseable);
    }

    ReferenceRange::Unparseable
}

/// Keep only digits, dots and minus signs: `"< 5 mg/dL"` becomes `"5"`
fn numeric_residue(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect()
}

/// Read the longest decimal number at the start of `text`.
///
/// Leading whitespace is skipped and trailing text ignored, so `"12.5 H"`
/// reads as 12.5 and `"5."` as 5. Returns `None` when no digits lead.
pub fn leading_number(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }

    if text[end..].starts_with("Infinity") {
        let magnitude = f64::INFINITY;
        return Some(if bytes[0] == b'-' { -magnitude } else { magnitude });
    }

    let integer_start = end;
    end = skip_digits(bytes, end);
    let mut mantissa_digits = end - integer_start;

    if bytes.get(end) == Some(&b'.') {
        let fraction_end = skip_digits(bytes, end + 1);
        let fraction_digits = fraction_end - (end + 1);
        if mantissa_digits + fraction_digits > 0 {
            mantissa_digits += fraction_digits;
            end = fraction_end;
        }
    }

    if mantissa_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exponent_end = end + 1;
        if matches!(bytes.get(exponent_end), Some(b'+') | Some(b'-')) {
            exponent_end += 1;
        }
        let digits_end = skip_digits(bytes, exponent_end);
        if digits_end > exponent_end {
            end = digits_end;
        }
    }

    text[..end].parse::<f64>().ok()
}

fn skip_digits(bytes: &[u8], mut index: usize) -> usize {
    while bytes.get(index).is_some_and(u8::is_ascii_digit) {
        index += 1;
    }
    index
}
