/// Speed of light in vacuum, in m.s⁻¹
pub const SPEED_OF_LIGHT_M_S: f64 = 2.99792458E8;

/// Earth equatorial radius (meters), Ho & Chan (1997) ellipsoid
pub const EARTH_EQUATORIAL_RADIUS_M: f64 = 6378137.0_f64;

/// Earth ellipsoid first eccentricity, Ho & Chan (1997) ellipsoid
pub const EARTH_ECCENTRICITY: f64 = 0.0818191908426214957;

/// Largest implied TDOA to the reference receiver (s) we tolerate
/// on a resolved solution.
pub const REFERENCE_TDOA_TOLERANCE_S: f64 = 1.0E-12;
