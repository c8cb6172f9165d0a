//! Timestamp display helpers.

use chrono::{DateTime, Datelike, NaiveDateTime, Timelike, Utc};

use crate::observation::{BasicInfo, FieldValue};
use crate::NOT_AVAILABLE;

/// Date/time parts of an observation, rendered with per-part fallbacks.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationTime {
    pub year: String,
    pub month: String,
    pub day: String,
    pub hhmm: Option<String>,
}

impl ObservationTime {
    pub fn from_basic_info(info: &BasicInfo) -> Self {
        let part = |v: &Option<FieldValue>| {
            v.as_ref()
                .map(|f| f.to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string())
        };
        Self {
            year: part(&info.year),
            month: part(&info.month),
            day: part(&info.day),
            hhmm: info.time.as_ref().map(|t| pad_time(&t.to_string())),
        }
    }

    /// `YYYY-MM-DD at HH:MM`.
    pub fn display(&self) -> String {
        let clock = match &self.hhmm {
            Some(t) => match (t.get(..2), t.get(2..)) {
                (Some(h), Some(m)) if !m.is_empty() => format!("{}:{}", h, m),
                _ => t.clone(),
            },
            None => NOT_AVAILABLE.to_string(),
        };
        format!("{}-{}-{} at {}", self.year, self.month, self.day, clock)
    }
}

/// Times are `HHMM` digit strings; numeric sources drop the leading zero.
fn pad_time(raw: &str) -> String {
    if !raw.is_empty() && raw.len() < 4 && raw.chars().all(|c| c.is_ascii_digit()) {
        format!("{:0>4}", raw)
    } else {
        raw.to_string()
    }
}

/// Parse a catalog timestamp such as `2024-06-19T1234` or RFC 3339.
pub fn parse_mission_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H%M", "%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H%M%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|ndt| ndt.and_utc())
}

/// Format a catalog timestamp as `June 19th, 2024 at 12:34 UTC`.
///
/// Empty or `N/A` input gives `N/A`; unparseable input is returned as-is.
pub fn format_mission_timestamp(s: &str) -> String {
    let s = s.trim();
    if s.is_empty() || s == NOT_AVAILABLE {
        return NOT_AVAILABLE.to_string();
    }
    match parse_mission_timestamp(s) {
        Some(dt) => format!(
            "{} {}{}, {} at {:02}:{:02} UTC",
            dt.format("%B"),
            dt.day(),
            day_suffix(dt.day()),
            dt.year(),
            dt.hour(),
            dt.minute()
        ),
        None => s.to_string(),
    }
}

fn day_suffix(day: u32) -> &'static str {
    if day > 3 && day < 21 {
        return "th";
    }
    match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mission_timestamp_compact() {
        assert_eq!(
            format_mission_timestamp("2024-06-19T1234"),
            "June 19th, 2024 at 12:34 UTC"
        );
    }

    #[test]
    fn test_mission_timestamp_suffixes() {
        assert_eq!(format_mission_timestamp("2024-07-01T0005"), "July 1st, 2024 at 00:05 UTC");
        assert_eq!(format_mission_timestamp("2024-07-22T2359"), "July 22nd, 2024 at 23:59 UTC");
        assert_eq!(format_mission_timestamp("2024-07-13T1200"), "July 13th, 2024 at 12:00 UTC");
        assert_eq!(format_mission_timestamp("2024-07-23T1200"), "July 23rd, 2024 at 12:00 UTC");
    }

    #[test]
    fn test_mission_timestamp_fallbacks() {
        assert_eq!(format_mission_timestamp(""), "N/A");
        assert_eq!(format_mission_timestamp("N/A"), "N/A");
        assert_eq!(format_mission_timestamp("sometime"), "sometime");
    }

    #[test]
    fn test_observation_time_display() {
        let info = BasicInfo {
            year: Some(2024i64.into()),
            month: Some("06".into()),
            day: Some("19".into()),
            time: Some(930i64.into()),
            ..Default::default()
        };
        assert_eq!(ObservationTime::from_basic_info(&info).display(), "2024-06-19 at 09:30");

        let empty = ObservationTime::from_basic_info(&BasicInfo::default());
        assert_eq!(empty.display(), "N/A-N/A-N/A at N/A");
    }
}
