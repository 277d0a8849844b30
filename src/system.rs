//! Measurement system
use log::{debug, info, warn};
use nalgebra::Vector3;

use crate::{
    cfg::Config,
    earth::Ellipsoid,
    error::Error,
    measurement::{GeographicPosition, Measurement},
    table::{MeasurementRow, TabularSource},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// [Case] describes the configuration of a [MeasurementSystem]:
/// number of measurements and type of measurements.
/// It is selected once when building the [MeasurementSystem].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Case {
    /// 3 receivers, TDOA only
    TdoaOnlyExact,
    /// 4 receivers or more, TDOA only
    TdoaOnlyOverdetermined,
    /// 2 receivers, TDOA and FDOA
    TfdoaMinimal,
    /// 3 receivers or more, TDOA and FDOA
    TfdoaOverdetermined,
}

impl std::fmt::Display for Case {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::TdoaOnlyExact => write!(f, "TDOA (exact)"),
            Self::TdoaOnlyOverdetermined => write!(f, "TDOA (overdetermined)"),
            Self::TfdoaMinimal => write!(f, "T/FDOA (minimal)"),
            Self::TfdoaOverdetermined => write!(f, "T/FDOA (overdetermined)"),
        }
    }
}

impl Case {
    /// Selects the [Case] for `m` measurements, with or without FDOA.
    pub fn new(m: usize, has_fdoa: bool) -> Result<Self, Error> {
        match (m, has_fdoa) {
            (3, false) => Ok(Self::TdoaOnlyExact),
            (m, false) if m >= 4 => Ok(Self::TdoaOnlyOverdetermined),
            (2, true) => Ok(Self::TfdoaMinimal),
            (m, true) if m >= 3 => Ok(Self::TfdoaOverdetermined),
            (m, false) => Err(Error::UnknownCase(format!(
                "TDOA solution requires measurements from at least 3 satellites (got {})",
                m
            ))),
            (m, true) => Err(Error::UnknownCase(format!(
                "T/FDOA solution requires measurements from at least 2 satellites (got {})",
                m
            ))),
        }
    }

    /// True if this [Case] makes use of FDOA.
    pub fn has_fdoa(&self) -> bool {
        matches!(self, Self::TfdoaMinimal | Self::TfdoaOverdetermined)
    }
}

/// [MeasurementSystem] is the validated, immutable, set of measurements
/// to be resolved. First measurement is the reference receiver.
/// Deserialization goes through the same checks as construction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "SystemFields"))]
pub struct MeasurementSystem {
    measurements: Vec<Measurement>,
    r_emitter_m: Option<f64>,
    ellipsoid: Ellipsoid,
    case: Case,
}

/// Unchecked [MeasurementSystem] content, as deserialized.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct SystemFields {
    measurements: Vec<Measurement>,
    r_emitter_m: Option<f64>,
    ellipsoid: Ellipsoid,
    case: Case,
}

#[cfg(feature = "serde")]
impl TryFrom<SystemFields> for MeasurementSystem {
    type Error = Error;
    fn try_from(fields: SystemFields) -> Result<Self, Self::Error> {
        let system =
            Self::validated(fields.measurements, fields.r_emitter_m, fields.ellipsoid)?;

        if system.case != fields.case {
            return Err(Error::UnknownCase(format!(
                "declared {}, measurements describe {}",
                fields.case, system.case
            )));
        }

        Ok(system)
    }
}

/// Rejects NaN and infinite components.
fn finite_vector(what: &str, nth: usize, vector: &Vector3<f64>) -> Result<(), Error> {
    if vector.iter().all(|value| value.is_finite()) {
        Ok(())
    } else {
        Err(Error::NonFiniteValue(format!(
            "measurement #{}: {} ({}, {}, {})",
            nth, what, vector[0], vector[1], vector[2]
        )))
    }
}

/// Rejects NaN and infinite emitter radius.
fn check_emitter_radius(r_emitter_m: f64) -> Result<(), Error> {
    if r_emitter_m.is_finite() {
        Ok(())
    } else {
        Err(Error::NonFiniteValue(format!("emitter radius {}m", r_emitter_m)))
    }
}

/// Normalizes a TDOA or FDOA vector to full length (reference entry included).
/// Accepts full length vectors, with null first entry, or (m-1) vectors
/// where the reference entry is implied.
fn normalize_doa(name: &str, values: &[f64], m: usize) -> Result<Vec<f64>, Error> {
    if let Some(nth) = values.iter().position(|value| !value.is_finite()) {
        return Err(Error::NonFiniteValue(format!(
            "{} entry #{}: {}",
            name, nth, values[nth]
        )));
    }

    if values.len() == m && values.first() == Some(&0.0) {
        Ok(values.to_vec())
    } else if values.len() + 1 == m {
        let mut full = Vec::with_capacity(m);
        full.push(0.0);
        full.extend_from_slice(values);
        Ok(full)
    } else {
        Err(Error::UnknownCase(format!(
            "unknown {} format: {} values for {} measurements",
            name,
            values.len(),
            m
        )))
    }
}

/// Collects one column of the table, that must either be entirely missing (None)
/// or entirely defined.
fn table_column(
    name: &str,
    rows: &[MeasurementRow],
    cell: impl Fn(&MeasurementRow) -> Option<f64>,
) -> Result<Option<Vec<f64>>, Error> {
    if rows.iter().all(|row| cell(row).is_none()) {
        return Ok(None);
    }

    let values = rows
        .iter()
        .enumerate()
        .map(|(nth, row)| {
            cell(row).ok_or_else(|| {
                Error::InsufficientData(format!("measurement #{}: missing {}", nth, name))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(values))
}

impl MeasurementSystem {
    /// Builds a [MeasurementSystem] from explicit arrays.
    /// ## Inputs
    /// - cfg: [Config] describing the coordinates and units in use
    /// - positions: (radius, latitude, longitude) or (x, y, z) for each receiver,
    ///   depending on [Config::geographic_coords]
    /// - velocities: (vx, vy, vz) for each receiver, mandatory with FDOA
    /// - tdoa: TDOA (s), either full length (first entry null) or one entry per
    ///   non-reference receiver
    /// - fdoa: FDOA, same format as TDOA
    pub fn from_arrays(
        cfg: &Config,
        positions: &[[f64; 3]],
        velocities: Option<&[[f64; 3]]>,
        tdoa: Option<&[f64]>,
        fdoa: Option<&[f64]>,
    ) -> Result<Self, Error> {
        if let Some(velocities) = velocities {
            if velocities.len() != positions.len() {
                return Err(Error::UnknownCase(format!(
                    "{} velocities for {} positions",
                    velocities.len(),
                    positions.len()
                )));
            }
        }

        let rows = positions
            .iter()
            .enumerate()
            .map(|(nth, pos)| {
                let row = if cfg.geographic_coords {
                    MeasurementRow::geographic(pos[0], pos[1], pos[2])
                } else {
                    MeasurementRow::cartesian(pos[0], pos[1], pos[2])
                };
                match velocities {
                    Some(velocities) => {
                        let vel = velocities[nth];
                        row.with_velocity(vel[0], vel[1], vel[2])
                    },
                    None => row,
                }
            })
            .collect::<Vec<_>>();

        Self::from_rows(cfg, rows, tdoa, fdoa)
    }

    /// Builds a [MeasurementSystem] from a [TabularSource].
    /// TDOA and FDOA vectors, when provided, replace the table content.
    /// The table is truncated to [Config::n_sats] rows, when defined.
    pub fn from_table<T: TabularSource + ?Sized>(
        cfg: &Config,
        source: &T,
        tdoa: Option<&[f64]>,
        fdoa: Option<&[f64]>,
    ) -> Result<Self, Error> {
        let rows = source.rows()?;
        Self::from_rows(cfg, rows, tdoa, fdoa)
    }

    fn from_rows(
        cfg: &Config,
        mut rows: Vec<MeasurementRow>,
        tdoa: Option<&[f64]>,
        fdoa: Option<&[f64]>,
    ) -> Result<Self, Error> {
        if let Some(n_sats) = cfg.n_sats {
            if n_sats > rows.len() {
                warn!(
                    "requested {} satellites, only {} available",
                    n_sats,
                    rows.len()
                );
            }
            rows.truncate(n_sats);
        }

        let m = rows.len();

        let tdoa = match tdoa {
            Some(tdoa) => normalize_doa("TDOA", tdoa, m)?,
            None => match table_column("TDOA", &rows, |row| row.tdoa)? {
                Some(tdoa) => normalize_doa("TDOA", &tdoa, m)?,
                None => {
                    return Err(Error::InsufficientData(
                        "TDOA must be provided (see TdoaGenerator for testing purposes)"
                            .to_string(),
                    ));
                },
            },
        };

        let fdoa = match fdoa {
            Some(fdoa) => Some(normalize_doa("FDOA", fdoa, m)?),
            None => match table_column("FDOA", &rows, |row| row.fdoa)? {
                Some(fdoa) => Some(normalize_doa("FDOA", &fdoa, m)?),
                None => {
                    info!("system does not contain FDOA information");
                    None
                },
            },
        };

        let mut measurements = Vec::with_capacity(m);

        for (nth, row) in rows.iter().enumerate() {
            let (position_m, geographic) = Self::position(cfg, nth, row)?;

            let velocity_m_s = match (row.vx, row.vy, row.vz) {
                (Some(vx), Some(vy), Some(vz)) => Some(Vector3::new(
                    cfg.velocity_to_m_s(vx),
                    cfg.velocity_to_m_s(vy),
                    cfg.velocity_to_m_s(vz),
                )),
                _ => None,
            };

            debug!(
                "measurement #{}: pos=({:.3}, {:.3}, {:.3})m tdoa={:.6E}s",
                nth, position_m[0], position_m[1], position_m[2], tdoa[nth]
            );

            measurements.push(Measurement {
                position_m,
                geographic,
                velocity_m_s,
                tdoa_s: tdoa[nth],
                fdoa: fdoa.as_ref().map(|fdoa| fdoa[nth]),
            });
        }

        Self::validated(measurements, cfg.r_emitter_m, cfg.ellipsoid)
    }

    /// Verifies the [Measurement]s and selects the [Case].
    fn validated(
        measurements: Vec<Measurement>,
        r_emitter_m: Option<f64>,
        ellipsoid: Ellipsoid,
    ) -> Result<Self, Error> {
        let m = measurements.len();

        if let Some(r_emitter_m) = r_emitter_m {
            check_emitter_radius(r_emitter_m)?;
        }

        let tdoa = measurements
            .iter()
            .map(|measurement| measurement.tdoa_s)
            .collect::<Vec<_>>();
        normalize_doa("TDOA", &tdoa, m)?;

        let has_fdoa = measurements
            .iter()
            .any(|measurement| measurement.fdoa.is_some());

        for (nth, measurement) in measurements.iter().enumerate() {
            finite_vector("position", nth, &measurement.position_m)?;

            if let Some(velocity_m_s) = &measurement.velocity_m_s {
                finite_vector("velocity", nth, velocity_m_s)?;
            }

            if has_fdoa {
                if measurement.fdoa.is_none() {
                    return Err(Error::InsufficientData(format!(
                        "measurement #{}: missing FDOA",
                        nth
                    )));
                }
                if measurement.velocity_m_s.is_none() {
                    return Err(Error::InsufficientData(format!(
                        "measurement #{}: FDOA requires velocity",
                        nth
                    )));
                }
            }
        }

        if has_fdoa {
            let fdoa = measurements
                .iter()
                .filter_map(|measurement| measurement.fdoa)
                .collect::<Vec<_>>();
            normalize_doa("FDOA", &fdoa, m)?;
        }

        let case = Case::new(m, has_fdoa)?;
        info!("{} measurements: {}", m, case);

        Ok(Self {
            measurements,
            r_emitter_m,
            ellipsoid,
            case,
        })
    }

    /// Converts one row to cartesian coordinates, in meters.
    fn position(
        cfg: &Config,
        nth: usize,
        row: &MeasurementRow,
    ) -> Result<(Vector3<f64>, Option<GeographicPosition>), Error> {
        if cfg.geographic_coords {
            let (Some(r), Some(lat_deg), Some(lon_deg)) = (row.r, row.latitude, row.longitude)
            else {
                return Err(Error::InsufficientData(format!(
                    "measurement #{}: missing geographic coordinates",
                    nth
                )));
            };

            let r_m = cfg.distance_to_m(r);
            let h_m = r_m - cfg.ellipsoid.local_radius_m(lat_deg, lon_deg);

            let position_m = cfg
                .ellipsoid
                .geographic2cartesian(lat_deg, lon_deg, h_m, true);

            let geo = GeographicPosition {
                r_m,
                lat_deg,
                lon_deg,
                h_m,
            };

            Ok((position_m, Some(geo)))
        } else {
            let (Some(x), Some(y), Some(z)) = (row.x, row.y, row.z) else {
                return Err(Error::InsufficientData(format!(
                    "measurement #{}: missing cartesian coordinates",
                    nth
                )));
            };

            let position_m = Vector3::new(
                cfg.distance_to_m(x),
                cfg.distance_to_m(y),
                cfg.distance_to_m(z),
            );

            Ok((position_m, None))
        }
    }

    /// Copies and returns [MeasurementSystem] with new TDOA, in either accepted format.
    /// Geometry, FDOA and emitter radius are preserved.
    pub fn with_tdoa(&self, tdoa: &[f64]) -> Result<Self, Error> {
        let tdoa = normalize_doa("TDOA", tdoa, self.measurements.len())?;
        let mut s = self.clone();
        for (measurement, tdoa) in s.measurements.iter_mut().zip(tdoa) {
            measurement.tdoa_s = tdoa;
        }
        Ok(s)
    }

    /// Copies and returns [MeasurementSystem] with known emitter radius (meters).
    /// NaN or infinite radius is [Error::NonFiniteValue].
    pub fn with_emitter_radius(&self, r_emitter_m: f64) -> Result<Self, Error> {
        check_emitter_radius(r_emitter_m)?;
        let mut s = self.clone();
        s.r_emitter_m = Some(r_emitter_m);
        Ok(s)
    }

    /// All [Measurement]s, reference first.
    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    /// Reference [Measurement]
    pub fn reference(&self) -> &Measurement {
        // construction guarantees at least two measurements
        &self.measurements[0]
    }

    /// Number of measurements
    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    /// Never true for a valid [MeasurementSystem]
    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    /// Known emitter radius (meters)
    pub fn r_emitter_m(&self) -> Option<f64> {
        self.r_emitter_m
    }

    /// [Ellipsoid] used in the geographic conversions
    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }

    /// Selected [Case]
    pub fn case(&self) -> Case {
        self.case
    }

    /// True if FDOA was provided
    pub fn has_fdoa(&self) -> bool {
        self.case.has_fdoa()
    }

    /// Full length TDOA vector (s), reference entry included.
    pub fn tdoa_s(&self) -> Vec<f64> {
        self.measurements.iter().map(|m| m.tdoa_s).collect()
    }

    /// Full length FDOA vector, reference entry included.
    pub fn fdoa(&self) -> Option<Vec<f64>> {
        self.measurements.iter().map(|m| m.fdoa).collect()
    }
}
