//! Geographic query value objects
//!
//! [`Coordinates`] and [`RadiusAtCoordinates`] encode themselves into ordered
//! URL query parameter pairs via [`QueryItems`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Query parameter key for latitude
pub const LAT_KEY: &str = "Lat";
/// Query parameter key for longitude
pub const LON_KEY: &str = "Lon";
/// Query parameter key for the search radius
pub const RADIUS_KEY: &str = "Radius";

/// Values that can be appended to a URL query string
///
/// The returned pairs are ordered; callers building a query string by hand may
/// rely on the position of each entry.
pub trait QueryItems {
    /// Encode `self` as `(key, value)` query parameter pairs
    fn query_items(&self) -> Vec<(String, String)>;
}

/// A latitude/longitude pair
///
/// No range validation is performed; out-of-range or non-finite values are
/// encoded as-is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Create a coordinate pair
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Get the latitude
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Get the longitude
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance to another point in meters (Haversine)
    #[must_use]
    pub fn distance_m(&self, other: &Self) -> f64 {
        const EARTH_RADIUS_M: f64 = 6_371_000.0;

        let lat1_rad = self.latitude.to_radians();
        let lat2_rad = other.latitude.to_radians();
        let delta_lat = (other.latitude - self.latitude).to_radians();
        let delta_lon = (other.longitude - self.longitude).to_radians();

        let a = (lat1_rad.cos() * lat2_rad.cos()).mul_add(
            (delta_lon / 2.0).sin().powi(2),
            (delta_lat / 2.0).sin().powi(2),
        );
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_M * c
    }
}

impl QueryItems for Coordinates {
    fn query_items(&self) -> Vec<(String, String)> {
        // f64 Display: shortest round-trip decimal, never exponent notation
        vec![
            (LAT_KEY.to_string(), self.latitude.to_string()),
            (LON_KEY.to_string(), self.longitude.to_string()),
        ]
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// A search radius in meters around a coordinate pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadiusAtCoordinates {
    radius: u32,
    coordinates: Coordinates,
}

impl RadiusAtCoordinates {
    /// Create a radius around existing coordinates
    #[must_use]
    pub const fn new(radius: u32, coordinates: Coordinates) -> Self {
        Self {
            radius,
            coordinates,
        }
    }

    /// Create a radius around a raw latitude/longitude pair
    #[must_use]
    pub const fn from_lat_lon(radius: u32, latitude: f64, longitude: f64) -> Self {
        Self::new(radius, Coordinates::new(latitude, longitude))
    }

    /// Radius in meters
    #[must_use]
    pub const fn radius(&self) -> u32 {
        self.radius
    }

    /// Center of the search area
    #[must_use]
    pub const fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    /// Whether `point` lies within the radius (inclusive)
    #[must_use]
    pub fn contains(&self, point: &Coordinates) -> bool {
        self.coordinates.distance_m(point) <= f64::from(self.radius)
    }
}

impl QueryItems for RadiusAtCoordinates {
    fn query_items(&self) -> Vec<(String, String)> {
        let mut items = self.coordinates.query_items();
        items.push((RADIUS_KEY.to_string(), self.radius.to_string()));
        items
    }
}

impl fmt::Display for RadiusAtCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m @ {}", self.radius, self.coordinates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn white_house_coordinates_encode() {
        let coords = Coordinates::new(38.8977, -77.0365);
        assert_eq!(
            coords.query_items(),
            pairs(&[("Lat", "38.8977"), ("Lon", "-77.0365")])
        );
    }

    #[test]
    fn radius_appends_after_coordinates() {
        let coords = Coordinates::new(38.8977, -77.0365);
        let area = RadiusAtCoordinates::new(500, coords);
        assert_eq!(
            area.query_items(),
            pairs(&[("Lat", "38.8977"), ("Lon", "-77.0365"), ("Radius", "500")])
        );
    }

    #[test]
    fn constructors_are_equivalent() {
        let coords = Coordinates::new(38.898_303, -77.028_099);
        let a = RadiusAtCoordinates::new(1000, coords);
        let b = RadiusAtCoordinates::from_lat_lon(1000, 38.898_303, -77.028_099);
        assert_eq!(a, b);
        assert_eq!(a.query_items(), b.query_items());
    }

    #[test]
    fn whole_numbers_have_no_fraction() {
        let coords = Coordinates::new(39.0, -77.0);
        assert_eq!(coords.query_items(), pairs(&[("Lat", "39"), ("Lon", "-77")]));
    }

    #[test]
    fn large_values_avoid_exponent_notation() {
        let coords = Coordinates::new(1e20, 0.000_1);
        let items = coords.query_items();
        assert_eq!(items[0].1, "100000000000000000000");
        assert_eq!(items[1].1, "0.0001");
    }

    #[test]
    fn non_finite_values_pass_through() {
        let coords = Coordinates::new(f64::NAN, f64::INFINITY);
        assert_eq!(coords.query_items(), pairs(&[("Lat", "NaN"), ("Lon", "inf")]));
    }

    #[test]
    fn zero_radius_is_encoded() {
        let area = RadiusAtCoordinates::from_lat_lon(0, 0.0, 0.0);
        assert_eq!(
            area.query_items(),
            pairs(&[("Lat", "0"), ("Lon", "0"), ("Radius", "0")])
        );
    }

    #[test]
    fn accessors_return_inputs() {
        let area = RadiusAtCoordinates::from_lat_lon(250, 38.9, -77.03);
        assert_eq!(area.radius(), 250);
        assert!((area.coordinates().latitude() - 38.9).abs() < f64::EPSILON);
        assert!((area.coordinates().longitude() + 77.03).abs() < f64::EPSILON);
    }

    #[test]
    fn display_formats() {
        let area = RadiusAtCoordinates::from_lat_lon(500, 38.8977, -77.0365);
        assert_eq!(area.to_string(), "500m @ 38.897700, -77.036500");
    }

    #[test]
    fn distance_to_self_is_zero() {
        let metro_center = Coordinates::new(38.898_303, -77.028_099);
        assert!(metro_center.distance_m(&metro_center).abs() < 0.001);
    }

    #[test]
    fn contains_nearby_station() {
        // Metro Center to Gallery Place is roughly 600m
        let metro_center = RadiusAtCoordinates::from_lat_lon(1000, 38.898_303, -77.028_099);
        let gallery_place = Coordinates::new(38.898_303, -77.021_998);
        assert!(metro_center.contains(&gallery_place));

        let tight = RadiusAtCoordinates::from_lat_lon(100, 38.898_303, -77.028_099);
        assert!(!tight.contains(&gallery_place));
    }

    #[test]
    fn serialization_roundtrip() {
        let area = RadiusAtCoordinates::from_lat_lon(500, 38.8977, -77.0365);
        let json = serde_json::to_string(&area).expect("serialize");
        let back: RadiusAtCoordinates = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(area, back);
    }
}
