//! Geographic <=> geocentric cartesian coordinates
use log::error;
use nalgebra::Vector3;

use crate::{earth::Ellipsoid, error::Error};

impl Ellipsoid {
    /// Converts geocentric latitude (radians) to geodetic latitude (radians).
    /// Eq. (58) of Ho & Chan (1997).
    pub fn geocentric_to_geodetic(&self, lat_rad: f64) -> f64 {
        (lat_rad.tan() / (1.0 - self.eccentricity_squared())).atan()
    }

    /// Converts geodetic latitude (radians) to geocentric latitude (radians).
    pub fn geodetic_to_geocentric(&self, lat_rad: f64) -> f64 {
        ((1.0 - self.eccentricity_squared()) * lat_rad.tan()).atan()
    }

    /// Converts geographic coordinates to geocentric cartesian (ECEF) coordinates.
    /// Eq. (57) to (59) of Ho & Chan (1997).
    /// ## Inputs
    /// - lat_deg: latitude in degrees (negative south) [-90, 90]
    /// - lon_deg: longitude in degrees (negative west) [-180, 180]
    /// - h_m: height above the ellipsoid, in meters
    /// - lat_is_geocentric: true when latitude is geocentric, false when geodetic
    /// ## Returns
    /// - (x, y, z) in meters. x passes through (0°, 0°), y through (0°, 90°E),
    ///   z through the north pole.
    pub fn geographic2cartesian(
        &self,
        lat_deg: f64,
        lon_deg: f64,
        h_m: f64,
        lat_is_geocentric: bool,
    ) -> Vector3<f64> {
        let mut lat = lat_deg.to_radians();
        let lon = lon_deg.to_radians();

        if lat_is_geocentric {
            lat = self.geocentric_to_geodetic(lat);
        }

        let e2 = self.eccentricity_squared();
        let gamma = self.prime_vertical_radius_m(lat);

        Vector3::new(
            (gamma + h_m) * lat.cos() * lon.cos(),
            (gamma + h_m) * lat.cos() * lon.sin(),
            ((1.0 - e2) * gamma + h_m) * lat.sin(),
        )
    }

    /// Flattening, obtained as the unique root of f² - 2f + e² = 0 lying in [0, 1].
    fn flattening(&self) -> Result<f64, Error> {
        let e2 = self.eccentricity_squared();
        let delta = 4.0 - 4.0 * e2;

        if delta < 0.0 {
            error!("ellipsoid inversion: e²={} leads to imaginary flattening", e2);
            return Err(Error::InvalidSolution(
                "no real flattening for this ellipsoid".to_string(),
            ));
        }

        let roots = [1.0 - delta.sqrt() / 2.0, 1.0 + delta.sqrt() / 2.0];

        let mut admissible = roots.iter().filter(|f| (0.0..=1.0).contains(*f));

        match (admissible.next(), admissible.next()) {
            (Some(f), None) => Ok(*f),
            (None, _) => Err(Error::InvalidSolution(
                "ellipsoid inversion: no admissible flattening".to_string(),
            )),
            (Some(_), Some(_)) => Err(Error::InvalidSolution(
                "ellipsoid inversion: flattening is not unique".to_string(),
            )),
        }
    }

    /// Converts geocentric cartesian (ECEF) coordinates to geographic coordinates,
    /// in closed form.
    /// ## Inputs
    /// - ecef: (x, y, z) in meters
    /// ## Returns
    /// - (latitude, longitude, height): geocentric latitude and longitude in degrees,
    ///   height above the ellipsoid in meters. Height is measured along the ellipsoid
    ///   normal, so [Ellipsoid::geographic2cartesian] is the exact inverse. It differs
    ///   from `r - local_radius_m(lat, lon)` away from the equator and the poles.
    pub fn cartesian2geographic(&self, ecef: &Vector3<f64>) -> Result<(f64, f64, f64), Error> {
        let (x, y, z) = (ecef[0], ecef[1], ecef[2]);

        let a = self.equatorial_radius_m;
        let e2 = self.eccentricity_squared();
        let f = self.flattening()?;

        let r = ecef.norm();
        let p = (x * x + y * y).sqrt();

        if r == 0.0 {
            return Err(Error::InvalidSolution(
                "ellipsoid inversion: earth center".to_string(),
            ));
        }

        let mu = (z * ((1.0 - f) + e2 * a / r)).atan2(p);

        let (sin_mu, cos_mu) = mu.sin_cos();

        let num = z * (1.0 - f) + e2 * a * sin_mu.powi(3);
        let den = (1.0 - f) * (p - e2 * a * cos_mu.powi(3));

        // points on the polar axis have an undefined (null) denominator
        let geodetic = num.atan2(den.max(0.0));

        let (sin_lat, cos_lat) = geodetic.sin_cos();
        let h = p * cos_lat + z * sin_lat - a * (1.0 - e2 * sin_lat * sin_lat).sqrt();

        let lat = self.geodetic_to_geocentric(geodetic).to_degrees();
        let lon = y.atan2(x).to_degrees();

        Ok((lat, lon, h))
    }
}

/// Converts geographic coordinates to cartesian coordinates, using the
/// default [Ellipsoid]. Latitude is geocentric, see [Ellipsoid::geographic2cartesian].
pub fn geographic2cartesian(lat_deg: f64, lon_deg: f64, h_m: f64) -> Vector3<f64> {
    Ellipsoid::default().geographic2cartesian(lat_deg, lon_deg, h_m, true)
}

/// Converts cartesian coordinates to geographic coordinates, using the
/// default [Ellipsoid]. See [Ellipsoid::cartesian2geographic].
pub fn cartesian2geographic(x_m: f64, y_m: f64, z_m: f64) -> Result<(f64, f64, f64), Error> {
    Ellipsoid::default().cartesian2geographic(&Vector3::new(x_m, y_m, z_m))
}
