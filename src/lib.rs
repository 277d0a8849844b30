#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

// private modules
mod cfg;
mod coords;
mod earth;
mod error;
mod generator;
mod measurement;
mod polynomial;
mod solutions;
mod solver;
mod system;
mod table;

pub mod constants;

#[cfg(test)]
mod tests;

// prelude
pub mod prelude {
    pub use crate::cfg::Config;
    pub use crate::constants::SPEED_OF_LIGHT_M_S;
    pub use crate::coords::{cartesian2geographic, geographic2cartesian};
    pub use crate::earth::{local_earth_radius, Ellipsoid};
    pub use crate::error::Error;
    pub use crate::generator::TdoaGenerator;
    pub use crate::measurement::{GeographicPosition, Measurement};
    pub use crate::polynomial::Polynomial;
    pub use crate::solutions::{validator::Validator, Solution};
    pub use crate::solver::Solver;
    pub use crate::system::{Case, MeasurementSystem};
    pub use crate::table::{Column, CsvSource, MeasurementRow, TabularSource};
    // re-export
    pub use nalgebra::{DVector, Vector3};
}

// pub export
pub use error::Error;
