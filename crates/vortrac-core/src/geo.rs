//! Earth-geometry helpers shared by the gridder and polar-sampling code.
//!
//! Grounded on `original_source/trunk/DataObjects/Cartesian.cpp`, which
//! computes beam height with the standard 4/3-earth-radius model and
//! converts a radar-relative lat/lon pair into a local Cartesian offset.

/// Mean earth radius in km, matching spec.md §4.1.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// 4/3-earth effective radius, used in the standard beam-height model.
fn effective_radius_km() -> f64 {
    4.0 * EARTH_RADIUS_KM / 3.0
}

/// Height (km) of a radar beam above the surface at slant range `range_km`
/// and elevation angle `elevation_deg`, per spec.md §4.1:
/// `z = sqrt(r² + (4R/3)² + 2r(4R/3)sin(el)) - 4R/3`.
pub fn beam_height_km(range_km: f64, elevation_deg: f64) -> f64 {
    let r = effective_radius_km();
    let el = elevation_deg.to_radians();
    (range_km * range_km + r * r + 2.0 * range_km * r * el.sin()).sqrt() - r
}

/// Approximate local (x, y) offset in km of `(lat, lon)` relative to
/// `(ref_lat, ref_lon)`, with +x east and +y north. Uses an equirectangular
/// approximation (adequate over the ~200 km scale of a single radar's CAPPI
/// domain), matching the scale at which `original_source` did the same
/// relative-location conversion.
pub fn relative_location_km(ref_lat: f64, ref_lon: f64, lat: f64, lon: f64) -> (f64, f64) {
    let lat_rad = ref_lat.to_radians();
    let dlat = lat - ref_lat;
    let dlon = lon - ref_lon;
    let km_per_deg_lat = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;
    let km_per_deg_lon = km_per_deg_lat * lat_rad.cos();
    (dlon * km_per_deg_lon, dlat * km_per_deg_lat)
}

/// Inverse of [`relative_location_km`]: recover `(lat, lon)` from a local
/// (x, y) km offset relative to `(ref_lat, ref_lon)`.
pub fn location_from_offset(ref_lat: f64, ref_lon: f64, x_km: f64, y_km: f64) -> (f64, f64) {
    let lat_rad = ref_lat.to_radians();
    let km_per_deg_lat = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;
    let km_per_deg_lon = km_per_deg_lat * lat_rad.cos();
    let lat = ref_lat + y_km / km_per_deg_lat;
    let lon = ref_lon + x_km / km_per_deg_lon;
    (lat, lon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn beam_height_is_zero_at_zero_range() {
        assert!((beam_height_km(0.0, 0.5)).abs() < 1e-9);
    }

    #[test]
    fn beam_height_increases_with_range() {
        let h1 = beam_height_km(50.0, 0.5);
        let h2 = beam_height_km(100.0, 0.5);
        assert!(h2 > h1);
    }

    #[test]
    fn relative_location_round_trips() {
        let (x, y) = relative_location_km(25.0, -80.0, 25.2, -79.7);
        let (lat, lon) = location_from_offset(25.0, -80.0, x, y);
        assert!((lat - 25.2).abs() < 1e-6);
        assert!((lon - (-79.7)).abs() < 1e-6);
    }
}
