mod conversion;
mod system;

use log::LevelFilter;
use std::sync::Once;

use crate::prelude::{local_earth_radius, Config, MeasurementSystem, Vector3};

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        env_logger::builder()
            .is_test(true)
            .filter_level(LevelFilter::Debug)
            .init();
    });
}

/// Section VI of Ho & Chan (1997): first three geostationary satellites
/// (radius in km, latitude, longitude)
pub const HO_CHAN_SATELLITES_KM: [[f64; 3]; 3] = [
    [42164.0, 2.0, -50.0],
    [42164.0, 0.0, -47.0],
    [42164.0, 0.0, -53.0],
];

/// Section VI of Ho & Chan (1997): emitter (latitude, longitude) at sea level
pub const HO_CHAN_EMITTER: (f64, f64) = (45.35, 75.9);

/// Emitter radius, at sea level
pub fn ho_chan_emitter_radius_m() -> f64 {
    local_earth_radius(HO_CHAN_EMITTER.0, HO_CHAN_EMITTER.1)
}

/// Emitter ECEF position
pub fn ho_chan_emitter_ecef_m() -> Vector3<f64> {
    crate::prelude::geographic2cartesian(HO_CHAN_EMITTER.0, HO_CHAN_EMITTER.1, 0.0)
}

pub fn ho_chan_config() -> Config {
    Config::default()
        .with_geographic_coords(true)
        .with_scale_distance(1000.0)
        .with_emitter_radius(ho_chan_emitter_radius_m())
}

/// Ho & Chan geometry, with dummy (null) TDOA
pub fn ho_chan_geometry() -> MeasurementSystem {
    MeasurementSystem::from_arrays(
        &ho_chan_config(),
        &HO_CHAN_SATELLITES_KM,
        None,
        Some(&[0.0, 0.0, 0.0]),
        None,
    )
    .unwrap_or_else(|e| panic!("failed to build Ho & Chan geometry: {}", e))
}
