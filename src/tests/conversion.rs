use rand::{rngs::SmallRng, Rng, SeedableRng};
use rstest::*;

use crate::{
    prelude::{cartesian2geographic, geographic2cartesian, local_earth_radius, Ellipsoid},
    tests::init_logger,
};

/// Relative tolerance, falling back to absolute tolerance close to zero.
fn assert_close(value: f64, expected: f64, what: &str) {
    let tolerance = 1.0E-6 * expected.abs().max(1.0);
    assert!(
        (value - expected).abs() < tolerance,
        "{}: {} != {}",
        what,
        value,
        expected
    );
}

#[rstest]
#[case(0.0, 0.0, 0.0)]
#[case(45.35, 75.9, 0.0)]
#[case(-45.35, -75.9, 1000.0)]
#[case(2.0, -50.0, 35786000.0)]
#[case(88.9, 179.9, 40.0E6)]
#[case(-88.9, -179.9, 10.0)]
#[case(30.0, 90.0, 12345.678)]
#[case(60.0, 10.0, 1.0E6)]
fn geographic_round_trip(#[case] lat: f64, #[case] lon: f64, #[case] h: f64) {
    init_logger();

    let ecef = geographic2cartesian(lat, lon, h);
    let (lat_rt, lon_rt, h_rt) = cartesian2geographic(ecef[0], ecef[1], ecef[2])
        .unwrap_or_else(|e| panic!("inversion failed for ({}, {}, {}): {}", lat, lon, h, e));

    assert_close(lat_rt, lat, "latitude");
    assert_close(lon_rt, lon, "longitude");
    assert_close(h_rt, h, "height");
}

#[test]
fn randomized_round_trip() {
    let mut rng = SmallRng::seed_from_u64(0x1997);

    for _ in 0..10_000 {
        let lat = rng.random_range(-89.0..89.0);
        let lon = rng.random_range(-180.0..180.0);
        let h = rng.random_range(0.0..40.0E6);

        let ecef = geographic2cartesian(lat, lon, h);
        let (lat_rt, lon_rt, h_rt) = cartesian2geographic(ecef[0], ecef[1], ecef[2]).unwrap();

        assert_close(lat_rt, lat, "latitude");
        assert_close(lon_rt, lon, "longitude");
        assert_close(h_rt, h, "height");
    }
}

#[test]
fn surface_height_is_null() {
    let mut rng = SmallRng::seed_from_u64(42);

    for _ in 0..1000 {
        let lat = rng.random_range(-89.0..89.0);
        let lon = rng.random_range(-180.0..180.0);

        let ecef = geographic2cartesian(lat, lon, 0.0);
        assert!((ecef.norm() - local_earth_radius(lat, lon)).abs() < 1.0E-6);

        let (_, _, h) = cartesian2geographic(ecef[0], ecef[1], ecef[2]).unwrap();
        assert!(h.abs() < 1.0E-6, "surface height {}", h);
    }
}

#[test]
fn spherical_earth() {
    let sphere = Ellipsoid::new(6371.0E3, 0.0);
    let ecef = sphere.geographic2cartesian(45.0, 45.0, 1000.0, true);
    assert!((ecef.norm() - 6372.0E3).abs() < 1.0E-6);

    let (lat, lon, h) = sphere.cartesian2geographic(&ecef).unwrap();
    assert!((lat - 45.0).abs() < 1.0E-9);
    assert!((lon - 45.0).abs() < 1.0E-9);
    assert!((h - 1000.0).abs() < 1.0E-6);
}

#[test]
fn height_along_normal() {
    // away from the equator and the poles, the normal and radial directions differ
    let model = Ellipsoid::HO_CHAN;
    let ecef = model.geographic2cartesian(60.0, 10.0, 1.0E6, true);

    let (lat, lon, h) = model.cartesian2geographic(&ecef).unwrap();
    assert!((h - 1.0E6).abs() < 1.0E-6, "h={}", h);

    let radial = ecef.norm() - model.local_radius_m(lat, lon);
    assert!((radial - h).abs() > 1.0, "radial={} h={}", radial, h);
}
