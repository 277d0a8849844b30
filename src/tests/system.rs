use rstest::*;

use crate::{
    prelude::{Case, Config, Error, MeasurementSystem, Solver},
    tests::{ho_chan_config, ho_chan_geometry, init_logger, HO_CHAN_SATELLITES_KM},
};

const TDOA_S: [f64; 2] = [-1.0218949338798125E-4, 1.0794655117862117E-3];

#[fixture]
fn cfg() -> Config {
    ho_chan_config()
}

#[rstest]
fn full_and_short_tdoa(cfg: Config) {
    init_logger();

    let short = MeasurementSystem::from_arrays(&cfg, &HO_CHAN_SATELLITES_KM, None, Some(&TDOA_S), None)
        .unwrap();

    let full = MeasurementSystem::from_arrays(
        &cfg,
        &HO_CHAN_SATELLITES_KM,
        None,
        Some(&[0.0, TDOA_S[0], TDOA_S[1]]),
        None,
    )
    .unwrap();

    assert_eq!(short, full);
    assert_eq!(short.tdoa_s(), vec![0.0, TDOA_S[0], TDOA_S[1]]);
    assert_eq!(short.reference().tdoa_s, 0.0);
    assert_eq!(short.case(), Case::TdoaOnlyExact);
    assert_eq!(short.len(), 3);
    assert!(!short.has_fdoa());
    assert!(short.fdoa().is_none());
}

#[rstest]
#[case(&[1.0E-3, TDOA_S[0], TDOA_S[1]])]
#[case(&[TDOA_S[0]])]
#[case(&[0.0, 0.0, 0.0, 0.0])]
#[case(&[])]
fn invalid_tdoa_format(cfg: Config, #[case] tdoa: &[f64]) {
    match MeasurementSystem::from_arrays(&cfg, &HO_CHAN_SATELLITES_KM, None, Some(tdoa), None) {
        Err(Error::UnknownCase(_)) => {},
        other => panic!("expecting unknown case, got {:?}", other),
    }
}

#[rstest]
fn missing_tdoa(cfg: Config) {
    match MeasurementSystem::from_arrays(&cfg, &HO_CHAN_SATELLITES_KM, None, None, None) {
        Err(Error::InsufficientData(_)) => {},
        other => panic!("expecting insufficient data, got {:?}", other),
    }
}

#[rstest]
fn not_enough_satellites(cfg: Config) {
    match MeasurementSystem::from_arrays(&cfg, &HO_CHAN_SATELLITES_KM[..2], None, Some(&[0.0]), None)
    {
        Err(Error::UnknownCase(_)) => {},
        other => panic!("expecting unknown case, got {:?}", other),
    }

    // with FDOA, 1 satellite is never enough
    let velocities = [[0.0, 0.0, 0.0]];
    match MeasurementSystem::from_arrays(
        &cfg,
        &HO_CHAN_SATELLITES_KM[..1],
        Some(&velocities),
        Some(&[0.0]),
        Some(&[0.0]),
    ) {
        Err(Error::UnknownCase(_)) => {},
        other => panic!("expecting unknown case, got {:?}", other),
    }
}

#[rstest]
fn overdetermined_tdoa(cfg: Config) {
    let positions = [
        HO_CHAN_SATELLITES_KM[0],
        HO_CHAN_SATELLITES_KM[1],
        HO_CHAN_SATELLITES_KM[2],
        [42164.0, -2.0, -49.0],
    ];

    let system =
        MeasurementSystem::from_arrays(&cfg, &positions, None, Some(&[1.0E-4, 2.0E-4, 3.0E-4]), None)
            .unwrap();

    assert_eq!(system.case(), Case::TdoaOnlyOverdetermined);

    match Solver::new(&system).solve() {
        Err(Error::NotImplemented(_)) => {},
        other => panic!("expecting not implemented, got {:?}", other),
    }
}

#[rstest]
fn fdoa_requires_velocities(cfg: Config) {
    match MeasurementSystem::from_arrays(
        &cfg,
        &HO_CHAN_SATELLITES_KM,
        None,
        Some(&TDOA_S),
        Some(&[1.0, 2.0]),
    ) {
        Err(Error::InsufficientData(_)) => {},
        other => panic!("expecting insufficient data, got {:?}", other),
    }
}

#[rstest]
fn tfdoa_cases(cfg: Config) {
    let velocities = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

    let minimal = MeasurementSystem::from_arrays(
        &cfg,
        &HO_CHAN_SATELLITES_KM[..2],
        Some(&velocities[..2]),
        Some(&[TDOA_S[0]]),
        Some(&[0.0, 5.0]),
    )
    .unwrap();

    assert_eq!(minimal.case(), Case::TfdoaMinimal);
    assert_eq!(minimal.fdoa(), Some(vec![0.0, 5.0]));

    let overdetermined = MeasurementSystem::from_arrays(
        &cfg,
        &HO_CHAN_SATELLITES_KM,
        Some(&velocities),
        Some(&TDOA_S),
        Some(&[5.0, 6.0]),
    )
    .unwrap();

    assert_eq!(overdetermined.case(), Case::TfdoaOverdetermined);
    assert!(overdetermined.has_fdoa());

    for system in [minimal, overdetermined] {
        match Solver::new(&system).solve() {
            Err(Error::NotImplemented(_)) => {},
            other => panic!("expecting not implemented, got {:?}", other),
        }
    }

    match MeasurementSystem::from_arrays(
        &cfg,
        &HO_CHAN_SATELLITES_KM,
        Some(&velocities[..2]),
        Some(&TDOA_S),
        None,
    ) {
        Err(Error::UnknownCase(_)) => {},
        other => panic!("expecting unknown case, got {:?}", other),
    }
}

#[test]
fn velocity_scaling() {
    let cfg = ho_chan_config().with_scale_velocity(1.0 / 3.6);
    let velocities = [[36.0, 0.0, 0.0], [0.0, 72.0, 0.0], [0.0, 0.0, -3.6]];

    let system = MeasurementSystem::from_arrays(
        &cfg,
        &HO_CHAN_SATELLITES_KM,
        Some(&velocities),
        Some(&TDOA_S),
        None,
    )
    .unwrap();

    let measurements = system.measurements();
    assert!((measurements[0].velocity_m_s.unwrap()[0] - 10.0).abs() < 1.0E-12);
    assert!((measurements[1].velocity_m_s.unwrap()[1] - 20.0).abs() < 1.0E-12);
    assert!((measurements[2].velocity_m_s.unwrap()[2] + 1.0).abs() < 1.0E-12);
}

#[test]
fn distance_scaling_and_coordinates() {
    let km = ho_chan_geometry();

    // same geometry, radius in meters
    let positions_m = HO_CHAN_SATELLITES_KM.map(|[r, lat, lon]| [r * 1000.0, lat, lon]);
    let cfg = ho_chan_config();
    let cfg = Config {
        scale_distance: None,
        ..cfg
    };

    let m = MeasurementSystem::from_arrays(&cfg, &positions_m, None, Some(&[0.0, 0.0]), None)
        .unwrap();

    for (km, m) in km.measurements().iter().zip(m.measurements().iter()) {
        assert!((km.position_m - m.position_m).norm() < 1.0E-6);

        let geo = km.geographic.unwrap();
        assert_eq!(geo.r_m, 42164.0E3);
        assert!((km.position_m.norm() - geo.r_m).abs() < 1.0, "radius not preserved");
    }

    // same geometry, cartesian coordinates in kilometers
    let cartesian_km = km
        .measurements()
        .iter()
        .map(|m| {
            [
                m.position_m[0] / 1000.0,
                m.position_m[1] / 1000.0,
                m.position_m[2] / 1000.0,
            ]
        })
        .collect::<Vec<_>>();

    let cfg = ho_chan_config().with_geographic_coords(false);
    let cartesian =
        MeasurementSystem::from_arrays(&cfg, &cartesian_km, None, Some(&[0.0, 0.0]), None)
            .unwrap();

    for (km, cartesian) in km.measurements().iter().zip(cartesian.measurements().iter()) {
        assert!((km.position_m - cartesian.position_m).norm() < 1.0E-6);
        assert!(cartesian.geographic.is_none());
    }
}

#[test]
fn replace_tdoa() {
    let system = ho_chan_geometry();

    let updated = system.with_tdoa(&TDOA_S).unwrap();
    assert_eq!(updated.tdoa_s(), vec![0.0, TDOA_S[0], TDOA_S[1]]);
    assert_eq!(system.tdoa_s(), vec![0.0, 0.0, 0.0], "source system modified");

    for (a, b) in system.measurements().iter().zip(updated.measurements().iter()) {
        assert_eq!(a.position_m, b.position_m);
    }

    assert!(matches!(
        system.with_tdoa(&[1.0, 2.0, 3.0]),
        Err(Error::UnknownCase(_))
    ));

    let unknown = system.with_emitter_radius(1.0).unwrap();
    assert_eq!(unknown.r_emitter_m(), Some(1.0));
}

#[rstest]
#[case(f64::NAN)]
#[case(f64::INFINITY)]
#[case(f64::NEG_INFINITY)]
fn non_finite_values(cfg: Config, #[case] value: f64) {
    init_logger();

    let system = ho_chan_geometry();

    // TDOA, in both formats
    for tdoa in [vec![value, 1.0E-4], vec![0.0, 1.0E-4, value]] {
        match system.with_tdoa(&tdoa) {
            Err(Error::NonFiniteValue(_)) => {},
            other => panic!("expecting non finite value, got {:?}", other),
        }
    }

    match MeasurementSystem::from_arrays(
        &cfg,
        &HO_CHAN_SATELLITES_KM,
        None,
        Some(&[value, 1.0E-4]),
        None,
    ) {
        Err(Error::NonFiniteValue(_)) => {},
        other => panic!("expecting non finite value, got {:?}", other),
    }

    // positions
    let mut positions = HO_CHAN_SATELLITES_KM;
    positions[1][1] = value;

    match MeasurementSystem::from_arrays(&cfg, &positions, None, Some(&TDOA_S), None) {
        Err(Error::NonFiniteValue(_)) => {},
        other => panic!("expecting non finite value, got {:?}", other),
    }

    // velocities and FDOA
    let mut velocities = [[0.0, 3.0, 0.0]; 3];
    velocities[2][0] = value;

    match MeasurementSystem::from_arrays(
        &cfg,
        &HO_CHAN_SATELLITES_KM,
        Some(&velocities),
        Some(&TDOA_S),
        None,
    ) {
        Err(Error::NonFiniteValue(_)) => {},
        other => panic!("expecting non finite value, got {:?}", other),
    }

    match MeasurementSystem::from_arrays(
        &cfg,
        &HO_CHAN_SATELLITES_KM,
        Some(&[[0.0, 3.0, 0.0]; 3]),
        Some(&TDOA_S),
        Some(&[1.0, value]),
    ) {
        Err(Error::NonFiniteValue(_)) => {},
        other => panic!("expecting non finite value, got {:?}", other),
    }

    // emitter radius
    match MeasurementSystem::from_arrays(
        &cfg.with_emitter_radius(value),
        &HO_CHAN_SATELLITES_KM,
        None,
        Some(&TDOA_S),
        None,
    ) {
        Err(Error::NonFiniteValue(_)) => {},
        other => panic!("expecting non finite value, got {:?}", other),
    }

    assert!(matches!(
        system.with_emitter_radius(value),
        Err(Error::NonFiniteValue(_))
    ));
}

#[cfg(feature = "serde")]
mod serialization {
    use serde_json::json;

    use crate::{
        prelude::MeasurementSystem,
        tests::{ho_chan_geometry, init_logger},
    };

    #[test]
    fn round_trip() {
        init_logger();

        let system = ho_chan_geometry().with_tdoa(&super::TDOA_S).unwrap();
        let content = serde_json::to_string(&system).unwrap();

        let parsed: MeasurementSystem = serde_json::from_str(&content).unwrap();

        assert_eq!(parsed.case(), system.case());
        assert_eq!(parsed.len(), system.len());
        assert_eq!(parsed.r_emitter_m().is_some(), system.r_emitter_m().is_some());

        for (parsed, measurement) in parsed.measurements().iter().zip(system.measurements()) {
            assert!((parsed.position_m - measurement.position_m).norm() < 1.0E-6);
            assert!((parsed.tdoa_s - measurement.tdoa_s).abs() < 1.0E-18);
        }
    }

    #[test]
    fn invalid_content() {
        let system = ho_chan_geometry();
        let valid = serde_json::to_value(&system).unwrap();

        // no measurements
        let mut content = valid.clone();
        content["measurements"] = json!([]);
        assert!(serde_json::from_value::<MeasurementSystem>(content).is_err());

        // not enough measurements
        let mut content = valid.clone();
        content["measurements"]
            .as_array_mut()
            .unwrap()
            .truncate(2);
        assert!(serde_json::from_value::<MeasurementSystem>(content).is_err());

        // non null reference TDOA
        let mut content = valid.clone();
        content["measurements"][0]["tdoa_s"] = json!(1.0E-3);
        assert!(serde_json::from_value::<MeasurementSystem>(content).is_err());

        // case does not match the measurements
        let mut content = valid.clone();
        content["case"] = json!("TdoaOnlyOverdetermined");
        assert!(serde_json::from_value::<MeasurementSystem>(content).is_err());

        // FDOA without velocity
        let mut content = valid;
        for measurement in content["measurements"].as_array_mut().unwrap() {
            measurement["fdoa"] = json!(0.0);
        }
        content["case"] = json!("TfdoaOverdetermined");
        assert!(serde_json::from_value::<MeasurementSystem>(content).is_err());
    }
}
