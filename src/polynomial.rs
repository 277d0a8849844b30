//! Real polynomials and their roots
use log::{debug, error, trace};
use nalgebra::{Complex, DMatrix, Schur};

use crate::error::Error;

/// Roots whose imaginary part is below this fraction of their modulus
/// are real.
const IMAGINARY_TOLERANCE: f64 = 1.0E-9;

/// Close roots come out of the eigen solver as a complex pair whose imaginary
/// part is about sqrt(ε)|z|. Pairs below this fraction of their modulus are
/// kept when their polished real part is a root.
const NEAR_REAL_TOLERANCE: f64 = 1.0E-6;

/// Polished roots whose |p(x)| is below this fraction of Σ|c_k||x|^k are
/// numerically null.
const NEGLIGIBLE_RESIDUAL: f64 = 1.0E-10;

/// Maximal number of QR iterations in the companion matrix decomposition
const MAX_SCHUR_ITERATIONS: usize = 10_000;

/// Maximal number of Newton iterations when polishing a real root
const MAX_POLISH_ITERATIONS: usize = 16;

/// [Polynomial] with real coefficients, stored in ascending order:
/// `c[0] + c[1] x + c[2] x² + ..`
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    coefficients: Vec<f64>,
}

impl Polynomial {
    /// Builds a new [Polynomial] from coefficients in ascending order.
    pub fn new(coefficients: &[f64]) -> Self {
        let mut coefficients = coefficients.to_vec();

        while coefficients.last() == Some(&0.0) {
            coefficients.pop();
        }

        Self { coefficients }
    }

    /// Degree of this [Polynomial]. The null polynomial has degree 0.
    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Coefficients, in ascending order
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Evaluates this [Polynomial] at x (Horner scheme).
    pub fn eval(&self, x: f64) -> f64 {
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, c| acc * x + c)
    }

    /// Returns the first derivative
    pub fn derivative(&self) -> Self {
        let coefficients = self
            .coefficients
            .iter()
            .enumerate()
            .skip(1)
            .map(|(k, c)| k as f64 * c)
            .collect::<Vec<_>>();

        Self::new(&coefficients)
    }

    /// Returns all complex roots, with multiplicity.
    /// Roots are the eigenvalues of the companion matrix of the
    /// (rescaled) monic polynomial.
    /// NaN or infinite coefficients are [Error::NonFiniteValue].
    pub fn roots(&self) -> Result<Vec<Complex<f64>>, Error> {
        if self.coefficients.iter().any(|c| !c.is_finite()) {
            error!("polynomial coefficients {:?}", self.coefficients);
            return Err(Error::NonFiniteValue(
                "polynomial coefficients".to_string(),
            ));
        }

        let mut roots = Vec::with_capacity(self.degree());

        // x = 0 roots
        let nb_zeros = self
            .coefficients
            .iter()
            .take_while(|c| **c == 0.0)
            .count();

        let reduced = &self.coefficients[nb_zeros.min(self.coefficients.len())..];

        for _ in 0..nb_zeros {
            roots.push(Complex::new(0.0, 0.0));
        }

        if reduced.len() < 2 {
            return Ok(roots);
        }

        let n = reduced.len() - 1;

        // scale x = s.t so the roots of the scaled polynomial are close to unity
        let mut scale = (reduced[0].abs() / reduced[n].abs()).powf(1.0 / n as f64);
        if !scale.is_finite() || scale == 0.0 {
            scale = 1.0;
        }

        let leading = reduced[n] * scale.powi(n as i32);

        let mut companion = DMatrix::<f64>::zeros(n, n);

        for i in 1..n {
            companion[(i, i - 1)] = 1.0;
        }

        for (i, c) in reduced.iter().take(n).enumerate() {
            companion[(i, n - 1)] = -c * scale.powi(i as i32) / leading;
        }

        trace!("companion matrix: {}", companion);

        let schur = Schur::try_new(companion, f64::EPSILON, MAX_SCHUR_ITERATIONS)
            .ok_or(Error::RootFinding)?;

        for root in schur.complex_eigenvalues().iter() {
            roots.push(Complex::new(root.re * scale, root.im * scale));
        }

        Ok(roots)
    }

    /// True when |p(x)| is negligible compared to the magnitude of its terms.
    fn is_negligible_at(&self, x: f64) -> bool {
        let magnitude = self
            .coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, c| acc * x.abs() + c.abs());

        self.eval(x).abs() <= NEGLIGIBLE_RESIDUAL * magnitude
    }

    /// Newton iterations, starting from an (accurate) real root estimate.
    fn polish(&self, x0: f64) -> f64 {
        let derivative = self.derivative();

        let mut x = x0;
        let mut residual = self.eval(x).abs();

        for _ in 0..MAX_POLISH_ITERATIONS {
            if residual == 0.0 {
                break;
            }

            let slope = derivative.eval(x);
            if slope == 0.0 || !slope.is_finite() {
                break;
            }

            let next = x - self.eval(x) / slope;
            let next_residual = self.eval(next).abs();

            if next_residual.is_nan() || next_residual >= residual {
                break;
            }

            x = next;
            residual = next_residual;
        }

        x
    }

    /// Returns the real roots of this [Polynomial], polished, in ascending order.
    /// A near-real complex pair (close or double real roots) contributes
    /// a single root, when its polished real part nulls the polynomial.
    pub fn real_roots(&self) -> Result<Vec<f64>, Error> {
        let mut real = Vec::with_capacity(self.degree());

        for root in self.roots()? {
            let imaginary = root.im.abs();
            let modulus = root.norm();

            if imaginary <= IMAGINARY_TOLERANCE * modulus {
                real.push(self.polish(root.re));
            } else if imaginary <= NEAR_REAL_TOLERANCE * modulus && root.im > 0.0 {
                let x = self.polish(root.re);
                if self.is_negligible_at(x) {
                    debug!("near real root {} polished to {}", root, x);
                    real.push(x);
                }
            }
        }

        real.sort_by(|a, b| a.total_cmp(b));
        Ok(real)
    }

    /// Returns the strictly positive real roots of this [Polynomial], in ascending order.
    pub fn positive_real_roots(&self) -> Result<Vec<f64>, Error> {
        Ok(self
            .real_roots()?
            .into_iter()
            .filter(|root| *root > 0.0)
            .collect())
    }
}
