//! Emitter solutions
use nalgebra::{DVector, Vector3};

use crate::{earth::Ellipsoid, error::Error};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod validator;

/// [Solution] is one candidate emitter position.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Solution {
    /// Range from the emitter to the reference receiver (r1), in meters.
    pub root_m: f64,
    /// Emitter position (ECEF, meters)
    pub position_m: Vector3<f64>,
    /// Relative TDOA error, for each non-reference receiver.
    /// A null observed TDOA leads to an infinite (or NaN) residual.
    pub residuals: DVector<f64>,
}

impl Solution {
    /// Largest absolute relative TDOA error, used to rank [Solution]s.
    /// NaN residuals count as infinite, so they always rank last.
    pub fn max_residual(&self) -> f64 {
        self.residuals.iter().fold(0.0_f64, |max, residual| {
            if residual.is_nan() {
                f64::INFINITY
            } else {
                max.max(residual.abs())
            }
        })
    }

    /// Distance (meters) between this [Solution] and given position.
    pub fn distance_m(&self, position_m: &Vector3<f64>) -> f64 {
        (self.position_m - position_m).norm()
    }

    /// Expresses this [Solution] as (geocentric latitude (°), longitude (°), height (m)).
    pub fn geographic(&self, ellipsoid: &Ellipsoid) -> Result<(f64, f64, f64), Error> {
        ellipsoid.cartesian2geographic(&self.position_m)
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "x: {} m, y: {} m, z: {} m (r1={} m, max. TDOA relative error: {:.3E})",
            self.position_m[0],
            self.position_m[1],
            self.position_m[2],
            self.root_m,
            self.max_residual()
        )
    }
}
