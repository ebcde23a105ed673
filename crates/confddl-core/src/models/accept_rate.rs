//! Acceptance-rate payloads.
//!
//! Venue files come from hand-edited YAML and show up in three layouts:
//! a list of year-stamped entries, a single entry (optionally wrapping an
//! `accept_rates` history), or a bare number/string. `AcceptRatePayload`
//! captures those layouts and `display_rate` is the one place they are
//! normalized into a display string.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RateValue {
    Number(f64),
    Text(String),
}

impl RateValue {
    /// The rate as a fraction in `[0, 1]`.
    ///
    /// Text accepts a comma as decimal separator and takes the first number
    /// found. Values outside the range (percentages, garbage) are rejected.
    pub fn as_fraction(&self) -> Option<f64> {
        let value = match self {
            RateValue::Number(n) => *n,
            RateValue::Text(s) => first_number(&s.trim().replace(',', "."))?,
        };
        (value.is_finite() && (0.0..=1.0).contains(&value)).then_some(value)
    }
}

/// One year of acceptance data, possibly holding the full per-year history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AcceptRateEntry {
    /// Pre-formatted display string, e.g. `22.1%(2878/13008 25')`.
    #[serde(default, rename = "str", skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<RateValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accept_rates: Option<Vec<AcceptRateEntry>>,
}

impl AcceptRateEntry {
    fn history(&self) -> Option<&[AcceptRateEntry]> {
        self.accept_rates.as_deref().filter(|h| !h.is_empty())
    }

    /// Display rate of the newest history entry, else of this entry itself.
    pub fn display_rate(&self) -> Option<String> {
        self.history()
            .and_then(latest_entry)
            .and_then(AcceptRateEntry::own_display_rate)
            .or_else(|| self.own_display_rate())
    }

    fn own_display_rate(&self) -> Option<String> {
        if let Some(display) = self.display.as_deref().filter(|s| !s.is_empty()) {
            return Some(display.to_string());
        }
        self.rate
            .as_ref()
            .and_then(RateValue::as_fraction)
            .map(format_percentage)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AcceptRatePayload {
    Entries(Vec<AcceptRateEntry>),
    Entry(AcceptRateEntry),
    Scalar(RateValue),
}

impl AcceptRatePayload {
    pub fn display_rate(&self) -> Option<String> {
        match self {
            AcceptRatePayload::Entries(entries) => {
                let first = entries.first()?;
                if first.history().is_some() {
                    first.display_rate()
                } else {
                    latest_entry(entries).and_then(AcceptRateEntry::own_display_rate)
                }
            }
            AcceptRatePayload::Entry(entry) => entry.display_rate(),
            AcceptRatePayload::Scalar(value) => value.as_fraction().map(format_percentage),
        }
    }

    /// Rate for a bundled index entry. A list is read through its first element only.
    pub fn index_display_rate(&self) -> Option<String> {
        match self {
            AcceptRatePayload::Entries(entries) => entries.first()?.display_rate(),
            other => other.display_rate(),
        }
    }
}

/// Pick the entry with the highest `year`.
///
/// An entry without a year never wins against the one that follows it,
/// and equal years keep the earlier entry.
pub fn latest_entry(entries: &[AcceptRateEntry]) -> Option<&AcceptRateEntry> {
    entries.iter().fold(None, |acc: Option<&AcceptRateEntry>, cur| match acc {
        None => Some(cur),
        Some(best) => match (best.year, cur.year) {
            (None, _) => Some(cur),
            (Some(best_year), Some(year)) if year > best_year => Some(cur),
            _ => Some(best),
        },
    })
}

/// Format a fraction as a percentage with one decimal place.
pub fn format_percentage(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

/// First `[0-9]*\.?[0-9]+` run in the input, parsed as a float.
fn first_number(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    for start in 0..bytes.len() {
        let int_end = digits_from(start);
        if int_end < bytes.len() && bytes[int_end] == b'.' {
            let frac_end = digits_from(int_end + 1);
            if frac_end > int_end + 1 {
                return s[start..frac_end].parse().ok();
            }
        }
        if int_end > start {
            return s[start..int_end].parse().ok();
        }
    }
    None
}
