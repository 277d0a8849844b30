use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A required measurement is missing: TDOA (always required)
    /// or receiver velocities (required as soon as FDOA is provided).
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// The number of measurements, or the length of the TDOA/FDOA vectors,
    /// does not match any supported setup.
    #[error("unknown case: {0}")]
    UnknownCase(String),

    /// The setup is recognized, but no closed-form solution is implemented for it.
    /// This is the case of overdetermined TDOA-only systems and all TDOA/FDOA systems.
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// A solution (or coordinates inversion) failed an internal consistency check.
    /// This is an algebraic or construction issue, not measurement noise.
    #[error("invalid solution: {0}")]
    InvalidSolution(String),

    /// A position, velocity, TDOA, FDOA or emitter radius is NaN or infinite.
    #[error("non finite value: {0}")]
    NonFiniteValue(String),

    /// Polynomial roots could not be resolved: the eigenvalue decomposition
    /// of the companion matrix did not converge.
    #[error("roots finding did not converge")]
    RootFinding,

    /// Degenerate receivers geometry (collinear or coplanar with the origin)
    /// will cause us to wind up here.
    #[error("failed to invert matrix")]
    MatrixInversion,

    /// The synthetic TDOA generator requires a positive, finite, variance.
    #[error("invalid noise variance {0}")]
    InvalidNoiseVariance(f64),

    /// Tabular source ingestion error (I/O, malformed cell..).
    #[error("table error: {0}")]
    Table(String),
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        Self::Table(e.to_string())
    }
}
