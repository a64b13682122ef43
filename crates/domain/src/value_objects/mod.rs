//! Value Objects - Immutable, identity-less domain primitives

mod coordinates;

pub use coordinates::{Coordinates, LAT_KEY, LON_KEY, QueryItems, RADIUS_KEY, RadiusAtCoordinates};
