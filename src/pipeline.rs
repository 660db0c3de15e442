use lazy_static::lazy_static;
use log::{debug, warn};
use rayon::prelude::*;

use crate::{
    convergence::Convergence,
    ellipsoid::{Ellipsoid, WGS84},
    grid::GridCoordinate,
    helmert::HelmertParameters,
    latlon::LatLon,
    projections::transverse_mercator::{ProjectionRangeWarning, TransverseMercator},
    Error,
};

lazy_static! {
    static ref OSGB36_TO_WGS84: DatumConversion = DatumConversion::new(
        TransverseMercator::national_grid(),
        HelmertParameters::osgb36_to_wgs84(),
        WGS84,
    );
}

/// The result of converting one grid coordinate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Converted {
    latlon: LatLon,
    height: f64,
    warning: Option<ProjectionRangeWarning>,
}

impl Converted {
    /// Position on the target datum in decimal degrees.
    #[inline]
    pub fn latlon(&self) -> LatLon {
        self.latlon
    }

    /// Height in metres above the target ellipsoid.
    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Set when the input lay outside the grid footprint.
    #[inline]
    pub fn warning(&self) -> Option<&ProjectionRangeWarning> {
        self.warning.as_ref()
    }
}

/// Converts grid coordinates on a source datum into latitude/longitude on a
/// target datum:
///
/// 1. inverse projection onto the source ellipsoid
/// 2. geodetic to geocentric on the source ellipsoid
/// 3. Helmert transform into the target frame
/// 4. geocentric to geodetic on the target ellipsoid
///
/// A conversion holds only immutable parameters, so one instance can be
/// shared freely between threads.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DatumConversion {
    projection: TransverseMercator,
    helmert: HelmertParameters,
    target: Ellipsoid,
    convergence: Convergence,
}

impl DatumConversion {
    /// Builds a conversion from a grid definition (which carries the source
    /// ellipsoid), the source to target Helmert parameters and the target
    /// ellipsoid.
    pub fn new(projection: TransverseMercator, helmert: HelmertParameters, target: Ellipsoid) -> DatumConversion {
        Self {
            projection,
            helmert,
            target,
            convergence: Convergence::default(),
        }
    }

    /// The Ordnance Survey National Grid (OSGB36) to WGS84 conversion.
    pub fn osgb36_to_wgs84() -> &'static DatumConversion {
        &OSGB36_TO_WGS84
    }

    /// Returns a copy using different iteration settings.
    pub fn with_convergence(&self, convergence: Convergence) -> DatumConversion {
        Self { convergence, ..*self }
    }

    #[inline]
    pub fn projection(&self) -> &TransverseMercator {
        &self.projection
    }

    #[inline]
    pub fn helmert(&self) -> &HelmertParameters {
        &self.helmert
    }

    #[inline]
    pub fn target(&self) -> &Ellipsoid {
        &self.target
    }

    #[inline]
    pub fn convergence(&self) -> &Convergence {
        &self.convergence
    }

    /// Converts a grid coordinate assuming zero height above the source
    /// ellipsoid.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NonConvergence`] if either iterative stage exhausts
    /// its iteration cap.
    ///
    /// # Usage
    ///
    /// ```
    /// use gridconvert::{DatumConversion, GridCoordinate};
    ///
    /// let grid = GridCoordinate::create(651409.903, 313177.270).unwrap();
    /// let converted = DatumConversion::osgb36_to_wgs84().convert(&grid).unwrap();
    ///
    /// assert!((converted.latlon().latitude() - 52.657978).abs() < 1e-4);
    /// assert!((converted.latlon().longitude() - 1.716067).abs() < 1e-4);
    /// assert!(converted.warning().is_none());
    /// ```
    pub fn convert(&self, grid: &GridCoordinate) -> Result<Converted, Error> {
        self.convert_with_height(grid, 0.)
    }

    /// Converts a grid coordinate at `height` metres above the source
    /// ellipsoid.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NonConvergence`] if either iterative stage exhausts
    /// its iteration cap, or [`Error::InvalidCoord`] if `height` is not finite.
    pub fn convert_with_height(&self, grid: &GridCoordinate, height: f64) -> Result<Converted, Error> {
        if !height.is_finite() {
            return Err(Error::InvalidCoord(format!("Height {height} is not a finite number.")));
        }

        let (source, warning) = self.projection.invert(grid, &self.convergence)?;
        if let Some(warning) = &warning {
            warn!("{warning}");
        }

        let shifted = self.helmert.apply(
            &source
                .with_height(height)
                .to_geocentric(self.projection.ellipsoid())
        );
        let target = shifted.to_geodetic(&self.target, &self.convergence)?;

        debug!("Converted {grid} to {target:?}");

        Ok(Converted {
            latlon: target.to_latlon()?,
            height: target.height(),
            warning,
        })
    }

    /// Converts a batch of coordinates in parallel. Results are returned in
    /// input order.
    ///
    /// # Usage
    ///
    /// ```
    /// use gridconvert::{DatumConversion, GridCoordinate};
    ///
    /// let coords = [
    ///     GridCoordinate::create(651409.903, 313177.270).unwrap(),
    ///     GridCoordinate::create(530000.0, 180000.0).unwrap(),
    /// ];
    /// let converted = DatumConversion::osgb36_to_wgs84().convert_all(&coords);
    ///
    /// assert_eq!(converted.len(), 2);
    /// assert!((converted[1].as_ref().unwrap().latlon().latitude() - 51.50399).abs() < 1e-4);
    /// ```
    pub fn convert_all(&self, coords: &[GridCoordinate]) -> Vec<Result<Converted, Error>> {
        coords
            .par_iter()
            .map(|coord| self.convert(coord))
            .collect()
    }
}
