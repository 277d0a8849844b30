#[cfg(feature = "serde")]
use serde::Deserialize;

use crate::earth::Ellipsoid;

fn default_geographic_coords() -> bool {
    true
}

fn default_ellipsoid() -> Ellipsoid {
    Ellipsoid::HO_CHAN
}

/// [MeasurementSystem](crate::prelude::MeasurementSystem) construction parameters.
///
/// Scale factors always *multiply* the input values to obtain SI units:
/// positions given in kilometers need `scale_distance = 1000.0`,
/// velocities given in km/h need `scale_velocity = 1.0 / 3.6`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct Config {
    /// Receivers positions are expressed as (radius, latitude, longitude)
    /// when true, as (x, y, z) when false. Latitudes are geocentric, in degrees.
    #[cfg_attr(feature = "serde", serde(default = "default_geographic_coords"))]
    pub geographic_coords: bool,
    /// Multiplying factor converting the input distances (radius, or x, y, z) to meters.
    #[cfg_attr(feature = "serde", serde(default))]
    pub scale_distance: Option<f64>,
    /// Multiplying factor converting the input velocities to m/s.
    #[cfg_attr(feature = "serde", serde(default))]
    pub scale_velocity: Option<f64>,
    /// Known emitter radial distance from the Earth center, in meters.
    /// Mandatory for the closed form TDOA solution.
    #[cfg_attr(feature = "serde", serde(default))]
    pub r_emitter_m: Option<f64>,
    /// Only use the first `n_sats` rows of a tabular source.
    #[cfg_attr(feature = "serde", serde(default))]
    pub n_sats: Option<usize>,
    /// Earth model used in geographic conversions.
    #[cfg_attr(feature = "serde", serde(default = "default_ellipsoid"))]
    pub ellipsoid: Ellipsoid,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            geographic_coords: default_geographic_coords(),
            scale_distance: None,
            scale_velocity: None,
            r_emitter_m: None,
            n_sats: None,
            ellipsoid: default_ellipsoid(),
        }
    }
}

impl Config {
    /// Copies and returns [Config] with receivers positions expressed
    /// in geographic coordinates (true) or cartesian coordinates (false).
    pub fn with_geographic_coords(&self, geographic: bool) -> Self {
        let mut s = self.clone();
        s.geographic_coords = geographic;
        s
    }

    /// Copies and returns [Config] with distance scaling factor (to meters).
    pub fn with_scale_distance(&self, scale: f64) -> Self {
        let mut s = self.clone();
        s.scale_distance = Some(scale);
        s
    }

    /// Copies and returns [Config] with velocity scaling factor (to m/s).
    pub fn with_scale_velocity(&self, scale: f64) -> Self {
        let mut s = self.clone();
        s.scale_velocity = Some(scale);
        s
    }

    /// Copies and returns [Config] with known emitter radius (meters).
    pub fn with_emitter_radius(&self, r_emitter_m: f64) -> Self {
        let mut s = self.clone();
        s.r_emitter_m = Some(r_emitter_m);
        s
    }

    /// Copies and returns [Config] limited to the first `n_sats` measurements.
    pub fn with_n_sats(&self, n_sats: usize) -> Self {
        let mut s = self.clone();
        s.n_sats = Some(n_sats);
        s
    }

    /// Copies and returns [Config] with custom [Ellipsoid].
    pub fn with_ellipsoid(&self, ellipsoid: Ellipsoid) -> Self {
        let mut s = self.clone();
        s.ellipsoid = ellipsoid;
        s
    }

    pub(crate) fn distance_to_m(&self, value: f64) -> f64 {
        value * self.scale_distance.unwrap_or(1.0)
    }

    pub(crate) fn velocity_to_m_s(&self, value: f64) -> f64 {
        value * self.scale_velocity.unwrap_or(1.0)
    }
}
