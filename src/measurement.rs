//! Receiver measurements
use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Geographic coordinates a [Measurement] was built from.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeographicPosition {
    /// Radial distance to the Earth center (meters)
    pub r_m: f64,
    /// Geocentric latitude (degrees)
    pub lat_deg: f64,
    /// Longitude (degrees)
    pub lon_deg: f64,
    /// Height above the local Earth radius (meters)
    pub h_m: f64,
}

/// [Measurement] gathers everything we know about one receiver,
/// once expressed in SI units and cartesian coordinates.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Measurement {
    /// Cartesian (ECEF) position in meters
    pub position_m: Vector3<f64>,
    /// Original geographic coordinates, when provided that way
    pub geographic: Option<GeographicPosition>,
    /// Velocity in m/s
    pub velocity_m_s: Option<Vector3<f64>>,
    /// Time difference of arrival to the reference receiver (s).
    /// Null for the reference receiver itself.
    pub tdoa_s: f64,
    /// Frequency difference of arrival to the reference receiver.
    /// Null for the reference receiver itself.
    pub fdoa: Option<f64>,
}

impl Measurement {
    /// Distance (meters) from this receiver to given cartesian position.
    pub fn range_m(&self, position_m: &Vector3<f64>) -> f64 {
        (self.position_m - position_m).norm()
    }

    /// Range difference (meters) to the reference receiver,
    /// corresponding to this TDOA.
    pub fn range_difference_m(&self) -> f64 {
        self.tdoa_s * crate::constants::SPEED_OF_LIGHT_M_S
    }
}
