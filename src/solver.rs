//! Closed form emitter solver (Ho & Chan, 1997)
use itertools::Itertools;
use log::{debug, info, warn};
use nalgebra::{Matrix3, Vector3};

use crate::{
    error::Error,
    polynomial::Polynomial,
    prelude::{Solution, Validator},
    system::{Case, MeasurementSystem},
};

/// G1 matrices whose normalized determinant falls below this value
/// are considered singular (degenerate receivers geometry).
const MIN_NORMALIZED_DETERMINANT: f64 = 1.0E-12;

/// [Solver] resolves the emitter location from a [MeasurementSystem],
/// using the spherical interpolation method.
pub struct Solver<'a> {
    system: &'a MeasurementSystem,
}

impl<'a> Solver<'a> {
    /// Builds a new [Solver] for this [MeasurementSystem].
    /// The [MeasurementSystem] is never modified.
    pub fn new(system: &'a MeasurementSystem) -> Self {
        Self { system }
    }

    /// Resolves all physically admissible [Solution]s, using all the
    /// available measurements. [Solution]s are validated and ranked by
    /// ascending largest TDOA residual. An empty list means the geometry
    /// (or noise) does not allow a physical solution.
    pub fn solve(&self) -> Result<Vec<Solution>, Error> {
        let candidates = self.candidates()?;
        self.validate(candidates)
    }

    /// Resolves all physically admissible [Solution]s, using TDOA only:
    /// FDOA is ignored, when present.
    pub fn solve_tdoa(&self) -> Result<Vec<Solution>, Error> {
        let candidates = self.tdoa_candidates()?;
        self.validate(candidates)
    }

    /// Returns all candidate (r1, position) pairs, without validation.
    pub fn candidates(&self) -> Result<Vec<(f64, Vector3<f64>)>, Error> {
        match self.system.case() {
            Case::TdoaOnlyExact => self.exact_tdoa(),
            Case::TdoaOnlyOverdetermined => Err(Error::NotImplemented(
                "TDOA solution for 4 satellites or more".to_string(),
            )),
            Case::TfdoaMinimal => Err(Error::NotImplemented(
                "T/FDOA solution for 2 satellites".to_string(),
            )),
            Case::TfdoaOverdetermined => Err(Error::NotImplemented(
                "T/FDOA solution for 3 satellites or more".to_string(),
            )),
        }
    }

    /// Returns all candidate (r1, position) pairs, ignoring FDOA.
    pub fn tdoa_candidates(&self) -> Result<Vec<(f64, Vector3<f64>)>, Error> {
        match Case::new(self.system.len(), false)? {
            Case::TdoaOnlyExact => self.exact_tdoa(),
            Case::TdoaOnlyOverdetermined => Err(Error::NotImplemented(
                "TDOA solution for 4 satellites or more".to_string(),
            )),
            case => Err(Error::UnknownCase(format!(
                "{} while solving for TDOA only",
                case
            ))),
        }
    }

    /// Forms G1 = -2 [s1; s2 - s1; s3 - s1]
    pub(crate) fn g1(&self) -> Matrix3<f64> {
        let measurements = self.system.measurements();
        let s1 = measurements[0].position_m;
        let s2_1 = measurements[1].position_m - s1;
        let s3_1 = measurements[2].position_m - s1;

        Matrix3::from_rows(&[s1.transpose(), s2_1.transpose(), s3_1.transpose()]) * -2.0
    }

    /// Forms h, whose rows are the coefficients of [1, r1, r1²]
    /// in each linearized range equation.
    pub(crate) fn h(&self, r_emitter_m: f64) -> Matrix3<f64> {
        let measurements = self.system.measurements();

        let s1sq = measurements[0].position_m.norm_squared();

        let mut h = Matrix3::<f64>::zeros();

        h[(0, 0)] = -r_emitter_m.powi(2) - s1sq;
        h[(0, 2)] = 1.0;

        for (i, measurement) in measurements.iter().enumerate().take(3).skip(1) {
            let d_i1 = measurement.range_difference_m();
            let sisq = measurement.position_m.norm_squared();
            h[(i, 0)] = d_i1.powi(2) - sisq + s1sq;
            h[(i, 1)] = 2.0 * d_i1;
        }

        h
    }

    /// Forms the quartic in r1 from M = G1⁻¹ h, whose columns
    /// are the constant, linear and quadratic terms of the position.
    pub(crate) fn quartic(m: &Matrix3<f64>, r_emitter_m: f64) -> Polynomial {
        let (c0, c1, c2) = (m.column(0), m.column(1), m.column(2));

        Polynomial::new(&[
            c0.norm_squared() - r_emitter_m.powi(2),
            2.0 * c0.dot(&c1),
            c1.norm_squared() + 2.0 * c0.dot(&c2),
            2.0 * c1.dot(&c2),
            c2.norm_squared(),
        ])
    }

    /// Inverts G1, rejecting degenerate geometries.
    fn g1_inverse(g1: &Matrix3<f64>) -> Result<Matrix3<f64>, Error> {
        let rows_norm = g1.row_iter().map(|row| row.norm()).product::<f64>();

        if rows_norm == 0.0 || (g1.determinant() / rows_norm).abs() < MIN_NORMALIZED_DETERMINANT {
            warn!("degenerate receivers geometry");
            return Err(Error::MatrixInversion);
        }

        g1.try_inverse().ok_or(Error::MatrixInversion)
    }

    /// Three satellites, known emitter radius
    fn exact_tdoa(&self) -> Result<Vec<(f64, Vector3<f64>)>, Error> {
        let r_emitter_m = self.system.r_emitter_m().ok_or_else(|| {
            Error::NotImplemented("TDOA solution for unknown emitter radius".to_string())
        })?;

        let g1 = self.g1();
        let h = self.h(r_emitter_m);

        debug!("G1: {}", g1);
        debug!("h: {}", h);

        let g1_inv = Self::g1_inverse(&g1)?;
        let m = g1_inv * h;

        let quartic = Self::quartic(&m, r_emitter_m);
        debug!("r1 polynomial coefficients: {:?}", quartic.coefficients());

        let candidates = quartic
            .positive_real_roots()?
            .into_iter()
            .map(|r1| (r1, m * Vector3::new(1.0, r1, r1 * r1)))
            .collect::<Vec<_>>();

        if candidates.is_empty() {
            warn!("no physically admissible solution");
        }

        for (r1, pos) in candidates.iter() {
            debug!(
                "candidate r1={:.3}m pos=({:.3}, {:.3}, {:.3})m",
                r1, pos[0], pos[1], pos[2]
            );
        }

        Ok(candidates)
    }

    /// Validates all candidates and ranks them.
    fn validate(&self, candidates: Vec<(f64, Vector3<f64>)>) -> Result<Vec<Solution>, Error> {
        let validator = Validator::new(self.system);

        let solutions = candidates
            .into_iter()
            .map(|(root_m, position_m)| {
                let residuals = validator.validate(root_m, &position_m)?;
                Ok(Solution {
                    root_m,
                    position_m,
                    residuals,
                })
            })
            .collect::<Result<Vec<_>, Error>>()?
            .into_iter()
            .sorted_by(|a, b| a.max_residual().total_cmp(&b.max_residual()))
            .collect::<Vec<_>>();

        info!("{} solution(s) found", solutions.len());

        for (nth, solution) in solutions.iter().enumerate() {
            info!("solution #{}: {}", nth, solution);
        }

        Ok(solutions)
    }
}
