//! Earth model
use crate::constants::{EARTH_ECCENTRICITY, EARTH_EQUATORIAL_RADIUS_M};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// [Ellipsoid] describes the oblate spheroid used to model the Earth.
/// It is passed explicitly to all coordinates transforms, so a
/// [MeasurementSystem](crate::prelude::MeasurementSystem) always
/// remembers which model it was converted with.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ellipsoid {
    /// Equatorial radius (semi major axis) in meters
    pub equatorial_radius_m: f64,
    /// First eccentricity
    pub eccentricity: f64,
}

impl Default for Ellipsoid {
    /// Builds the [Ellipsoid::HO_CHAN] model
    fn default() -> Self {
        Self::HO_CHAN
    }
}

impl Ellipsoid {
    /// Earth ellipsoid used by Ho & Chan (1997), numerically equal to WGS84.
    pub const HO_CHAN: Self = Self {
        equatorial_radius_m: EARTH_EQUATORIAL_RADIUS_M,
        eccentricity: EARTH_ECCENTRICITY,
    };

    /// Defines a custom [Ellipsoid]
    pub fn new(equatorial_radius_m: f64, eccentricity: f64) -> Self {
        Self {
            equatorial_radius_m,
            eccentricity,
        }
    }

    /// Squared first eccentricity e²
    pub fn eccentricity_squared(&self) -> f64 {
        self.eccentricity * self.eccentricity
    }

    /// Polar radius (semi minor axis) in meters
    pub fn polar_radius_m(&self) -> f64 {
        self.equatorial_radius_m * (1.0 - self.eccentricity_squared()).sqrt()
    }

    /// Prime vertical radius of curvature γ (meters), at given geodetic latitude (radians).
    pub(crate) fn prime_vertical_radius_m(&self, geodetic_lat_rad: f64) -> f64 {
        let sin_lat = geodetic_lat_rad.sin();
        self.equatorial_radius_m / (1.0 - self.eccentricity_squared() * sin_lat * sin_lat).sqrt()
    }

    /// Local Earth radius (meters), that is the distance from the Earth center
    /// to the ellipsoid surface, at given (geocentric) latitude and longitude,
    /// both in degrees.
    pub fn local_radius_m(&self, lat_deg: f64, lon_deg: f64) -> f64 {
        self.geographic2cartesian(lat_deg, lon_deg, 0.0, true).norm()
    }
}

/// Local Earth radius (meters) at given geocentric latitude and longitude (degrees),
/// using the [Ellipsoid::HO_CHAN] model.
pub fn local_earth_radius(lat_deg: f64, lon_deg: f64) -> f64 {
    Ellipsoid::HO_CHAN.local_radius_m(lat_deg, lon_deg)
}
