//! Optional ATCF best-track reader, used only to seed the first volume's
//! best-guess center (spec.md §6).
//!
//! Parses the subset of ATCF b-deck columns VORTRAC needs: storm ID, fix
//! time, lat/lon (tenths of a degree, hemisphere-suffixed), max wind, and
//! minimum sea-level pressure.

use chrono::{NaiveDateTime, TimeZone, Utc};
use vortrac_core::AtcfRecord;

use crate::error::{IngestionError, Result};

fn parse_coord(field: &str) -> Result<f64> {
    let field = field.trim();
    let (digits, hemi) = field.split_at(field.len().saturating_sub(1));
    let magnitude: f64 = digits
        .parse::<f64>()
        .map_err(|_| IngestionError::MalformedAtcfLine(field.to_string()))?
        / 10.0;
    match hemi {
        "N" | "E" => Ok(magnitude),
        "S" | "W" => Ok(-magnitude),
        _ => Err(IngestionError::MalformedAtcfLine(field.to_string())),
    }
}

/// Parse one ATCF b-deck line. Fields are comma-separated and
/// whitespace-padded, per convention; unused trailing fields are ignored.
pub fn parse_line(line: &str) -> Result<AtcfRecord> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() < 9 {
        return Err(IngestionError::MalformedAtcfLine(line.to_string()));
    }

    let storm_id = format!("{}{}", fields[0], fields[1]);
    let naive = NaiveDateTime::parse_from_str(fields[2], "%Y%m%d%H")
        .map_err(|_| IngestionError::MalformedAtcfLine(line.to_string()))?;
    let time = Utc.from_utc_datetime(&naive);

    let lat = parse_coord(fields[6])?;
    let lon = parse_coord(fields[7])?;
    let max_wind_kt: f64 = fields[8]
        .parse()
        .map_err(|_| IngestionError::MalformedAtcfLine(line.to_string()))?;
    let min_slp_hpa = fields.get(9).and_then(|f| f.parse().ok());

    Ok(AtcfRecord {
        storm_id,
        time,
        lat,
        lon,
        max_wind_kt,
        min_slp_hpa,
    })
}

/// Parse every non-blank line of a b-deck file.
pub fn parse_stream(contents: &str) -> Result<Vec<AtcfRecord>> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(parse_line)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_typical_bdeck_line() {
        let line = "AL, 09, 2005082412, 03, BEST, 0, 252N, 801W, 65, 985";
        let record = parse_line(line).unwrap();
        assert_eq!(record.storm_id, "AL09");
        assert!((record.lat - 25.2).abs() < 1e-9);
        assert!((record.lon - (-80.1)).abs() < 1e-9);
        assert!((record.max_wind_kt - 65.0).abs() < 1e-9);
        assert_eq!(record.min_slp_hpa, Some(985.0));
    }
}
