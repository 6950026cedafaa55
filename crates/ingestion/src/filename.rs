//! Radar filename parsing.
//!
//! Grounded on `original_source/trunk/Radar/RadarFactory.cpp`'s filename
//! recognition, which tolerates several Level II naming conventions used by
//! different data feeds (NCDC archive, LDM realtime feed, and an ar2v
//! variant). spec.md §6 tightens this to four concrete patterns:
//!
//! - `<ID>_<yyyyMMdd>_<hhmmss>.nc`
//! - `Level2_<ID>_<yyyyMMdd>_<hhmm>.ar2v`
//! - `<ID>.<yyyyMMdd><hhmmss>`
//! - `<ID>_<yyyyMMdd>_<hhmm>`

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use tracing::warn;

/// A filename successfully parsed into a radar ID and volume timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFilename {
    pub radar_id: String,
    pub time: DateTime<Utc>,
}

fn build_time(date: &str, time: &str) -> Option<DateTime<Utc>> {
    let naive_date = NaiveDate::parse_from_str(date, "%Y%m%d").ok()?;
    let (hh, mm, ss) = match time.len() {
        6 => (&time[0..2], &time[2..4], &time[4..6]),
        4 => (&time[0..2], &time[2..4], "00"),
        _ => return None,
    };
    let hh: u32 = hh.parse().ok()?;
    let mm: u32 = mm.parse().ok()?;
    let ss: u32 = ss.parse().ok()?;
    let naive_time = naive_date.and_hms_opt(hh, mm, ss)?;
    Some(Utc.from_utc_datetime(&naive_time))
}

/// Parse a radar volume filename against all four recognized conventions.
/// Returns `None` (after logging a warning) if no convention matches,
/// mirroring `RadarFactory::hasUnprocessedData`'s behavior of silently
/// skipping files it cannot timestamp.
pub fn parse_filename(name: &str) -> Option<ParsedFilename> {
    if let Some(stripped) = name.strip_suffix(".nc") {
        // <ID>_<yyyyMMdd>_<hhmmss>.nc
        let parts: Vec<&str> = stripped.split('_').collect();
        if parts.len() == 3 {
            if let Some(time) = build_time(parts[1], parts[2]) {
                return Some(ParsedFilename {
                    radar_id: parts[0].to_string(),
                    time,
                });
            }
        }
    }

    if let Some(stripped) = name.strip_suffix(".ar2v") {
        // Level2_<ID>_<yyyyMMdd>_<hhmm>.ar2v
        let parts: Vec<&str> = stripped.split('_').collect();
        if parts.len() == 4 && parts[0] == "Level2" {
            if let Some(time) = build_time(parts[2], parts[3]) {
                return Some(ParsedFilename {
                    radar_id: parts[1].to_string(),
                    time,
                });
            }
        }
    }

    if let Some((id, rest)) = name.split_once('.') {
        // <ID>.<yyyyMMdd><hhmmss>
        if rest.len() == 14 && rest.chars().all(|c| c.is_ascii_digit()) {
            if let Some(time) = build_time(&rest[0..8], &rest[8..14]) {
                return Some(ParsedFilename {
                    radar_id: id.to_string(),
                    time,
                });
            }
        }
    }

    {
        // <ID>_<yyyyMMdd>_<hhmm> (bare, no extension)
        let parts: Vec<&str> = name.split('_').collect();
        if parts.len() == 3 {
            if let Some(time) = build_time(parts[1], parts[2]) {
                return Some(ParsedFilename {
                    radar_id: parts[0].to_string(),
                    time,
                });
            }
        }
    }

    warn!(filename = name, "could not parse radar filename against any known convention");
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dotted_nc_convention() {
        let parsed = parse_filename("KAMX_20050825_060837.nc").unwrap();
        assert_eq!(parsed.radar_id, "KAMX");
        assert_eq!(parsed.time.to_string(), "2005-08-25 06:08:37 UTC");
    }

    #[test]
    fn parses_level2_ar2v_convention() {
        let parsed = parse_filename("Level2_KAMX_20050825_0608.ar2v").unwrap();
        assert_eq!(parsed.radar_id, "KAMX");
        assert_eq!(parsed.time.to_string(), "2005-08-25 06:08:00 UTC");
    }

    #[test]
    fn parses_dotted_compact_convention() {
        let parsed = parse_filename("KAMX.20050825060837").unwrap();
        assert_eq!(parsed.radar_id, "KAMX");
        assert_eq!(parsed.time.to_string(), "2005-08-25 06:08:37 UTC");
    }

    #[test]
    fn parses_bare_underscore_convention() {
        let parsed = parse_filename("KAMX_20050825_0608").unwrap();
        assert_eq!(parsed.radar_id, "KAMX");
        assert_eq!(parsed.time.to_string(), "2005-08-25 06:08:00 UTC");
    }

    #[test]
    fn rejects_unrecognized_filename() {
        assert!(parse_filename("not_a_radar_file.txt").is_none());
    }
}
