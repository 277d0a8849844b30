//! Synthetic TDOA generator
use log::debug;
use nalgebra::Vector3;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::{constants::SPEED_OF_LIGHT_M_S, error::Error, system::MeasurementSystem};

/// [TdoaGenerator] synthesizes TDOA measurements for a known emitter,
/// so the [Solver](crate::prelude::Solver) can be exercised without real data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TdoaGenerator {
    /// Emitter geocentric latitude (degrees)
    pub lat_deg: f64,
    /// Emitter longitude (degrees)
    pub lon_deg: f64,
    /// Emitter radial distance to the Earth center (meters)
    pub r_emitter_m: f64,
    /// TDOA noise variance (s²)
    pub variance_s2: f64,
}

impl TdoaGenerator {
    /// Builds a new [TdoaGenerator]
    /// ## Inputs
    /// - lat_deg, lon_deg: emitter geocentric latitude and longitude (degrees)
    /// - r_emitter_m: emitter radial distance (meters)
    /// - variance_s2: noise variance (s²) added to each non-reference TDOA.
    ///   Use 0.0 for noiseless TDOA.
    pub fn new(lat_deg: f64, lon_deg: f64, r_emitter_m: f64, variance_s2: f64) -> Self {
        Self {
            lat_deg,
            lon_deg,
            r_emitter_m,
            variance_s2,
        }
    }

    /// Emitter position (ECEF, meters), for this [MeasurementSystem] Earth model.
    pub fn emitter_position_m(&self, system: &MeasurementSystem) -> Vector3<f64> {
        let ellipsoid = system.ellipsoid();
        let h_m = self.r_emitter_m - ellipsoid.local_radius_m(self.lat_deg, self.lon_deg);
        ellipsoid.geographic2cartesian(self.lat_deg, self.lon_deg, h_m, true)
    }

    /// Noiseless TDOA (s) for every receiver of this [MeasurementSystem],
    /// reference receiver included (always null).
    pub fn clean_tdoa(&self, system: &MeasurementSystem) -> Vec<f64> {
        let emitter = self.emitter_position_m(system);
        let reference_m = system.reference().range_m(&emitter);

        system
            .measurements()
            .iter()
            .map(|m| (m.range_m(&emitter) - reference_m) / SPEED_OF_LIGHT_M_S)
            .collect()
    }

    /// Generates noisy TDOA (s) for every receiver of this [MeasurementSystem],
    /// reference receiver included (always null).
    /// Noise is zero-mean Gaussian, drawn from `rng`: a seeded generator
    /// gives reproducible results.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        system: &MeasurementSystem,
        rng: &mut R,
    ) -> Result<Vec<f64>, Error> {
        if !self.variance_s2.is_finite() || self.variance_s2 < 0.0 {
            return Err(Error::InvalidNoiseVariance(self.variance_s2));
        }

        let normal = Normal::new(0.0, self.variance_s2.sqrt())
            .map_err(|_| Error::InvalidNoiseVariance(self.variance_s2))?;

        let mut tdoa = self.clean_tdoa(system);

        for value in tdoa.iter_mut().skip(1) {
            *value += normal.sample(rng);
        }

        debug!("generated tdoa: {:?}", tdoa);
        Ok(tdoa)
    }
}
