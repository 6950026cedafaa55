//! Line-oriented reader for the pressure-observation stream (spec.md §6):
//! fixed columns `unix_time lat lon pressure_hPa station_id`.

use chrono::{DateTime, TimeZone, Utc};
use vortrac_core::PressureObservation;

use crate::error::{IngestionError, Result};

fn parse_line(line: &str) -> Result<PressureObservation> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 5 {
        return Err(IngestionError::MalformedPressureLine(line.to_string()));
    }
    let unix_time: i64 = fields[0]
        .parse()
        .map_err(|_| IngestionError::MalformedPressureLine(line.to_string()))?;
    let lat: f64 = fields[1]
        .parse()
        .map_err(|_| IngestionError::MalformedPressureLine(line.to_string()))?;
    let lon: f64 = fields[2]
        .parse()
        .map_err(|_| IngestionError::MalformedPressureLine(line.to_string()))?;
    let pressure: f64 = fields[3]
        .parse()
        .map_err(|_| IngestionError::MalformedPressureLine(line.to_string()))?;
    let station_id = fields[4].to_string();

    let time: DateTime<Utc> = Utc
        .timestamp_opt(unix_time, 0)
        .single()
        .ok_or_else(|| IngestionError::MalformedPressureLine(line.to_string()))?;

    Ok(PressureObservation::new(station_id, time, lat, lon, pressure))
}

/// Parse every non-blank, non-comment line of a pressure-observation
/// stream. Malformed lines are returned as errors rather than silently
/// skipped, since a corrupted obs file should fail loudly before it can
/// poison a pressure estimate.
pub fn parse_stream(contents: &str) -> Result<Vec<PressureObservation>> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(parse_line)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_lines() {
        let text = "1124949600 25.791 -80.277 1008.3 KMIA\n# comment\n1124949900 25.653 -80.433 1007.9 KFLL\n";
        let obs = parse_stream(text).unwrap();
        assert_eq!(obs.len(), 2);
        assert_eq!(obs[0].station_id, "KMIA");
        assert!((obs[1].sea_level_pressure_hpa - 1007.9).abs() < 1e-9);
    }

    #[test]
    fn rejects_malformed_line() {
        let text = "not enough columns\n";
        assert!(parse_stream(text).is_err());
    }
}
