//! Deadline selection and timezone normalization.
//!
//! Each conference edition lists a timeline of rounds. We keep the soonest
//! deadline that is not more than `RECENT_WINDOW_DAYS` in the past, fall back
//! to TBD when nothing is announced, and convert the chosen timestamp from the
//! edition's timezone to the display zone (UTC+8).

use chrono::{Duration, NaiveDate, NaiveDateTime, Utc};

use crate::models::RawTimelineItem;

/// Hours east of UTC for displayed timestamps.
pub const DISPLAY_UTC_OFFSET_HOURS: i64 = 8;

/// "Anywhere on Earth" is UTC-12, and also the default when a timezone is missing.
pub const AOE_UTC_OFFSET_HOURS: i64 = -12;

/// Deadlines that passed less than this many days ago are still shown.
pub const RECENT_WINDOW_DAYS: i64 = 30;

/// Real-world offsets stay within UTC-12..UTC+14; anything beyond is not a timezone.
const MAX_UTC_OFFSET_HOURS: i64 = 14;

/// Output format for every normalized timestamp.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// The deadline picked for one edition.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedDeadline {
    Concrete { raw: String, at: NaiveDateTime },
    Tbd,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeadlineSelection {
    pub deadline: ResolvedDeadline,
    /// Raw value of the first parseable `abstract_deadline` in the timeline.
    pub abstract_deadline: Option<String>,
}

impl DeadlineSelection {
    /// Deadline string in the display zone, or `TBD`.
    pub fn display_deadline(&self, timezone: Option<&str>) -> String {
        match &self.deadline {
            ResolvedDeadline::Concrete { raw, .. } => normalize(raw, timezone),
            ResolvedDeadline::Tbd => crate::models::TBD.to_string(),
        }
    }

    /// Abstract deadline string in the display zone, or the "none yet" placeholder.
    pub fn display_abstract_deadline(&self, timezone: Option<&str>) -> String {
        self.abstract_deadline
            .as_deref()
            .map(|raw| normalize(raw, timezone))
            .unwrap_or_else(|| crate::models::NOT_AVAILABLE.to_string())
    }
}

/// Current time expressed in the display zone.
pub fn display_now() -> NaiveDateTime {
    Utc::now().naive_utc() + Duration::hours(DISPLAY_UTC_OFFSET_HOURS)
}

/// Parse a feed or display timestamp. Date-only values mean midnight.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn is_tbd(deadline: Option<&str>) -> bool {
    match deadline {
        None => true,
        Some(d) => d.trim().is_empty() || d.contains(crate::models::TBD),
    }
}

/// Pick the relevant deadline from a timeline.
///
/// Returns `None` when the timeline has neither a usable concrete deadline
/// nor a TBD round, in which case the edition is dropped.
pub fn select_deadline(timeline: &[RawTimelineItem], now: NaiveDateTime) -> Option<DeadlineSelection> {
    let window_start = now - Duration::days(RECENT_WINDOW_DAYS);
    let mut best: Option<ResolvedDeadline> = None;
    let mut abstract_deadline: Option<String> = None;

    for item in timeline {
        if abstract_deadline.is_none() {
            if let Some(raw) = item.abstract_deadline.as_deref() {
                if parse_timestamp(raw).is_some() {
                    abstract_deadline = Some(raw.to_string());
                }
            }
        }

        let raw = item.deadline.as_deref();
        if is_tbd(raw) {
            if best.is_none() {
                best = Some(ResolvedDeadline::Tbd);
            }
            continue;
        }

        let Some(raw) = raw else { continue };
        let Some(at) = parse_timestamp(raw) else {
            continue;
        };
        if at <= window_start {
            continue;
        }

        let replace = match &best {
            Some(ResolvedDeadline::Concrete { at: current, .. }) => at < *current,
            _ => true,
        };
        if replace {
            best = Some(ResolvedDeadline::Concrete {
                raw: raw.to_string(),
                at,
            });
        }
    }

    best.map(|deadline| DeadlineSelection {
        deadline,
        abstract_deadline,
    })
}

/// UTC offset in hours for a feed timezone.
///
/// Missing, `AoE` and `UTC-12` all mean -12. `UTC±N` yields N (a trailing
/// `:MM` part is ignored). Offsets beyond 14 hours and anything else are
/// not convertible.
pub fn utc_offset_hours(timezone: Option<&str>) -> Option<i64> {
    let tz = match timezone.map(str::trim) {
        None | Some("") | Some("AoE") => return Some(AOE_UTC_OFFSET_HOURS),
        Some(tz) => tz,
    };
    let rest = tz.strip_prefix("UTC")?.replace('+', "");
    if rest.is_empty() {
        return Some(0);
    }
    leading_integer(&rest).filter(|hours| hours.abs() <= MAX_UTC_OFFSET_HOURS)
}

fn leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Convert a raw timestamp in `timezone` to the display zone.
///
/// Returns `None` when the timestamp does not parse or the timezone is not
/// a UTC offset.
pub fn to_display_time(raw: &str, timezone: Option<&str>) -> Option<String> {
    let at = parse_timestamp(raw)?;
    let offset = utc_offset_hours(timezone)?;
    let local = at
        .checked_sub_signed(Duration::hours(offset))?
        .checked_add_signed(Duration::hours(DISPLAY_UTC_OFFSET_HOURS))?;
    Some(local.format(DISPLAY_FORMAT).to_string())
}

/// Like `to_display_time`, but passes the raw value through when it cannot be converted.
pub fn normalize(raw: &str, timezone: Option<&str>) -> String {
    to_display_time(raw, timezone).unwrap_or_else(|| raw.to_string())
}
