#![allow(clippy::unreadable_literal)]

// Airy 1830 semi-major axis a
pub(crate) const AIRY_1830_A: f64 = 6_377_563.396;
// Airy 1830 semi-minor axis b
pub(crate) const AIRY_1830_B: f64 = 6_356_256.909;

// WGS84 semi-major axis a
pub(crate) const WGS84_A: f64 = 6_378_137.;
// WGS84 semi-minor axis b
pub(crate) const WGS84_B: f64 = 6_356_752.3141;

/// Ordnance Survey National Grid definition
pub(crate) mod national_grid {
    /// Easting of the false origin
    pub(crate) const E0: f64 = 400_000.;
    /// Northing of the false origin
    pub(crate) const N0: f64 = -100_000.;
    /// Latitude of the true origin in degrees
    pub(crate) const PHI0_DEG: f64 = 49.;
    /// Longitude of the true origin in degrees
    pub(crate) const LAMBDA0_DEG: f64 = -2.;
    /// Central meridian scale factor
    pub(crate) const F0: f64 = 0.9996012717;

    /// Extent of the grid in metres `[min_e, min_n, max_e, max_n]`
    pub(crate) const EXTENT: [f64; 4] = [0., 0., 700_000., 1_300_000.];
    /// Size of a lettered grid square
    pub(crate) const SQUARE: f64 = 100_000.;
}

/// OSGB36 to WGS84 Helmert parameters
pub(crate) mod osgb36_to_wgs84 {
    /// Translations in metres
    pub(crate) const T: [f64; 3] = [446.448, -124.157, 542.060];
    /// Rotations in arc-seconds
    pub(crate) const R_ARCSEC: [f64; 3] = [0.1502, 0.2470, 0.8421];
    /// Scale in parts per million
    pub(crate) const S_PPM: f64 = -20.4894;
}

/// Meridional arc residual in metres at which the inverse projection stops
pub(crate) const ARC_TOLERANCE_M: f64 = 0.001;
/// Latitude change in radians at which geocentric inversion stops
pub(crate) const LATITUDE_TOLERANCE_RAD: f64 = 1e-12;
pub(crate) const MAX_ARC_ITERATIONS: usize = 20;
pub(crate) const MAX_LATITUDE_ITERATIONS: usize = 10;
