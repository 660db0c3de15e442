#![warn(clippy::pedantic)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::module_name_repetitions
)]

//! Converts Ordnance Survey National Grid coordinates (OSGB36) into WGS84
//! latitude/longitude.
//!
//! ```
//! let latlon = gridconvert::convert(651409.903, 313177.270).unwrap();
//!
//! assert!((latlon.latitude() - 52.657978).abs() < 1e-4);
//! assert!((latlon.longitude() - 1.716067).abs() < 1e-4);
//! ```

use thiserror::Error;

pub mod cartesian;
pub mod convergence;
pub mod ellipsoid;
pub mod geodetic;
pub mod grid;
pub mod gridref;
pub mod helmert;
pub mod latlon;
pub mod pipeline;
pub(crate) mod utility;

pub use cartesian::GeocentricCoordinate;
pub use convergence::{Convergence, Stage};
pub use ellipsoid::Ellipsoid;
pub use geodetic::GeodeticCoordinate;
pub use grid::GridCoordinate;
pub use gridref::GridRef;
pub use helmert::HelmertParameters;
pub use latlon::LatLon;
pub use pipeline::{Converted, DatumConversion};
pub use projections::transverse_mercator::{ProjectionRangeWarning, TransverseMercator};

pub mod projections {
    pub mod transverse_mercator;
}

pub(crate) mod constants;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Coordinate parameters are not valid: {0}")]
    InvalidCoord(String),
    #[error("Grid reference is invalid: {0}")]
    InvalidGridRef(String),
    #[error("The {stage} iteration did not converge after {iterations} iterations (residual {residual:e})")]
    NonConvergence {
        stage: Stage,
        iterations: usize,
        residual: f64,
    },
}

pub trait ParseCoord {
    /// Parses a coordinate from a string.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] describing why `value` could not be parsed.
    fn parse_coord(value: &str) -> Result<Self, Error>
    where Self: Sized;
}

/// Parses any coordinate type implementing [`ParseCoord`].
///
/// # Errors
///
/// Returns an [`Error`] describing why `value` could not be parsed.
///
/// # Usage
///
/// ```
/// use gridconvert::{GridCoordinate, GridRef};
///
/// let grid: GridCoordinate = gridconvert::from_str("TG 51409 13177").unwrap();
/// let gridref: GridRef = gridconvert::from_str("TG 51409 13177").unwrap();
///
/// assert_eq!(grid, gridref.to_grid());
/// ```
pub fn from_str<S, T>(value: S) -> Result<T, Error>
where
    S: AsRef<str>,
    T: ParseCoord
{
    T::parse_coord(value.as_ref())
}

/// Converts an OSGB36 National Grid easting/northing in metres into WGS84
/// latitude/longitude in decimal degrees.
///
/// # Errors
///
/// Returns [`Error::InvalidCoord`] if either value is not finite, or
/// [`Error::NonConvergence`] if an iterative stage fails to converge.
pub fn convert(easting: f64, northing: f64) -> Result<LatLon, Error> {
    GridCoordinate::create(easting, northing)?.to_latlon()
}
