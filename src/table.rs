//! Tabular measurement sources
use std::{fs::File, io::Read, path::Path, str::FromStr};

use log::debug;

use crate::error::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Columns a tabular source may describe.
/// Geographic (r, latitude, longitude) and cartesian (x, y, z) columns
/// are mutually exclusive: the [Config](crate::prelude::Config) declares which one is in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    R,
    Latitude,
    Longitude,
    X,
    Y,
    Z,
    Vx,
    Vy,
    Vz,
    TDoA,
    FDoA,
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::R => write!(f, "r"),
            Self::Latitude => write!(f, "latitude"),
            Self::Longitude => write!(f, "longitude"),
            Self::X => write!(f, "x"),
            Self::Y => write!(f, "y"),
            Self::Z => write!(f, "z"),
            Self::Vx => write!(f, "vx"),
            Self::Vy => write!(f, "vy"),
            Self::Vz => write!(f, "vz"),
            Self::TDoA => write!(f, "TDoA"),
            Self::FDoA => write!(f, "FDoA"),
        }
    }
}

impl FromStr for Column {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "r" => Ok(Self::R),
            "latitude" | "lat" => Ok(Self::Latitude),
            "longitude" | "lon" => Ok(Self::Longitude),
            "x" => Ok(Self::X),
            "y" => Ok(Self::Y),
            "z" => Ok(Self::Z),
            "vx" => Ok(Self::Vx),
            "vy" => Ok(Self::Vy),
            "vz" => Ok(Self::Vz),
            "tdoa" => Ok(Self::TDoA),
            "fdoa" => Ok(Self::FDoA),
            _ => Err(Error::Table(format!("unknown column \"{}\"", s))),
        }
    }
}

/// One row of a tabular source: one receiver, in the source units.
/// Missing cells are `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MeasurementRow {
    pub r: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    pub vx: Option<f64>,
    pub vy: Option<f64>,
    pub vz: Option<f64>,
    pub tdoa: Option<f64>,
    pub fdoa: Option<f64>,
}

impl MeasurementRow {
    /// Builds a geographic [MeasurementRow] (radius, latitude, longitude).
    pub fn geographic(r: f64, latitude: f64, longitude: f64) -> Self {
        Self {
            r: Some(r),
            latitude: Some(latitude),
            longitude: Some(longitude),
            ..Default::default()
        }
    }

    /// Builds a cartesian [MeasurementRow] (x, y, z).
    pub fn cartesian(x: f64, y: f64, z: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            z: Some(z),
            ..Default::default()
        }
    }

    /// Copies and returns [MeasurementRow] with velocity.
    pub fn with_velocity(&self, vx: f64, vy: f64, vz: f64) -> Self {
        let mut s = *self;
        s.vx = Some(vx);
        s.vy = Some(vy);
        s.vz = Some(vz);
        s
    }

    /// Copies and returns [MeasurementRow] with TDOA (s).
    pub fn with_tdoa(&self, tdoa: f64) -> Self {
        let mut s = *self;
        s.tdoa = Some(tdoa);
        s
    }

    /// Copies and returns [MeasurementRow] with FDOA.
    pub fn with_fdoa(&self, fdoa: f64) -> Self {
        let mut s = *self;
        s.fdoa = Some(fdoa);
        s
    }

    /// Returns cell value for this [Column].
    pub fn get(&self, column: Column) -> Option<f64> {
        match column {
            Column::R => self.r,
            Column::Latitude => self.latitude,
            Column::Longitude => self.longitude,
            Column::X => self.x,
            Column::Y => self.y,
            Column::Z => self.z,
            Column::Vx => self.vx,
            Column::Vy => self.vy,
            Column::Vz => self.vz,
            Column::TDoA => self.tdoa,
            Column::FDoA => self.fdoa,
        }
    }

    fn set(&mut self, column: Column, value: Option<f64>) {
        match column {
            Column::R => self.r = value,
            Column::Latitude => self.latitude = value,
            Column::Longitude => self.longitude = value,
            Column::X => self.x = value,
            Column::Y => self.y = value,
            Column::Z => self.z = value,
            Column::Vx => self.vx = value,
            Column::Vy => self.vy = value,
            Column::Vz => self.vz = value,
            Column::TDoA => self.tdoa = value,
            Column::FDoA => self.fdoa = value,
        }
    }
}

/// Any tabular source of receivers measurements.
pub trait TabularSource {
    /// Returns all rows, in order. First row is the reference receiver.
    fn rows(&self) -> Result<Vec<MeasurementRow>, Error>;
}

impl TabularSource for [MeasurementRow] {
    fn rows(&self) -> Result<Vec<MeasurementRow>, Error> {
        Ok(self.to_vec())
    }
}

impl TabularSource for Vec<MeasurementRow> {
    fn rows(&self) -> Result<Vec<MeasurementRow>, Error> {
        Ok(self.clone())
    }
}

/// [CsvSource] is a [TabularSource] read from CSV content with a header line.
/// Columns that are not part of the measurement schema are ignored.
/// Empty cells and `nan` are considered missing, infinite values are rejected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvSource {
    rows: Vec<MeasurementRow>,
}

impl CsvSource {
    /// Parses CSV content from any [Read]able.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, Error> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns = reader
            .headers()?
            .iter()
            .map(|name| match Column::from_str(name) {
                Ok(column) => Some(column),
                Err(_) => {
                    debug!("csv: ignoring column \"{}\"", name);
                    None
                },
            })
            .collect::<Vec<_>>();

        let mut rows = Vec::new();

        for (nth, record) in reader.records().enumerate() {
            let record = record?;
            let mut row = MeasurementRow::default();

            for (cell, column) in record.iter().zip(columns.iter()) {
                let Some(column) = column else {
                    continue;
                };

                row.set(*column, parse_cell(cell, nth, *column)?);
            }

            rows.push(row);
        }

        debug!("csv: {} rows", rows.len());
        Ok(Self { rows })
    }

    /// Parses a CSV file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let fd = File::open(path.as_ref())
            .map_err(|e| Error::Table(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::from_reader(fd)
    }
}

impl FromStr for CsvSource {
    type Err = Error;
    fn from_str(content: &str) -> Result<Self, Self::Err> {
        Self::from_reader(content.as_bytes())
    }
}

impl TabularSource for CsvSource {
    fn rows(&self) -> Result<Vec<MeasurementRow>, Error> {
        Ok(self.rows.clone())
    }
}

fn parse_cell(cell: &str, nth: usize, column: Column) -> Result<Option<f64>, Error> {
    if cell.is_empty() || cell.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }

    let value = cell.parse::<f64>().map_err(|e| {
        Error::Table(format!(
            "row #{} column \"{}\": invalid value \"{}\" ({})",
            nth, column, cell, e
        ))
    })?;

    if !value.is_finite() {
        return Err(Error::NonFiniteValue(format!(
            "row #{} column \"{}\": {}",
            nth, column, cell
        )));
    }

    Ok(Some(value))
}
