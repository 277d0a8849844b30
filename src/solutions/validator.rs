use log::{debug, error};
use nalgebra::{DVector, Vector3};

use crate::{
    constants::{REFERENCE_TDOA_TOLERANCE_S, SPEED_OF_LIGHT_M_S},
    error::Error,
    system::MeasurementSystem,
};

/// [Validator] verifies the internal consistency of a candidate solution
/// and reports its TDOA residuals.
pub struct Validator<'a> {
    system: &'a MeasurementSystem,
}

impl<'a> Validator<'a> {
    /// Builds a new [Validator] for this [MeasurementSystem].
    pub fn new(system: &'a MeasurementSystem) -> Self {
        Self { system }
    }

    /// TDOA (s) implied by a candidate position, for every receiver (reference included).
    /// ## Inputs
    /// - root_m: candidate range from the emitter to the reference receiver
    /// - position_m: candidate emitter position (ECEF, meters)
    pub fn implied_tdoa(&self, root_m: f64, position_m: &Vector3<f64>) -> DVector<f64> {
        DVector::from_iterator(
            self.system.len(),
            self.system
                .measurements()
                .iter()
                .map(|m| (m.range_m(position_m) - root_m) / SPEED_OF_LIGHT_M_S),
        )
    }

    /// Validates a candidate solution and returns the relative TDOA error
    /// for each non-reference receiver: (implied - observed) / observed.
    /// Residuals are diagnostics: they never invalidate a solution.
    /// An implied TDOA to the reference receiver that is not null means
    /// the candidate is inconsistent: [Error::InvalidSolution].
    pub fn validate(&self, root_m: f64, position_m: &Vector3<f64>) -> Result<DVector<f64>, Error> {
        let implied = self.implied_tdoa(root_m, position_m);

        if implied[0].abs() > REFERENCE_TDOA_TOLERANCE_S {
            error!(
                "r1={:.3}m pos=({:.3}, {:.3}, {:.3})m: implied reference tdoa={:.3E}s",
                root_m, position_m[0], position_m[1], position_m[2], implied[0]
            );
            return Err(Error::InvalidSolution(format!(
                "non null implied TDOA to the reference receiver: {:.3E}s",
                implied[0]
            )));
        }

        let residuals = DVector::from_iterator(
            self.system.len() - 1,
            self.system
                .measurements()
                .iter()
                .zip(implied.iter())
                .skip(1)
                .map(|(m, implied)| (implied - m.tdoa_s) / m.tdoa_s),
        );

        debug!("r1={:.3}m: relative tdoa residuals {}", root_m, residuals.transpose());
        Ok(residuals)
    }
}
