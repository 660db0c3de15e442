use log::trace;

use crate::{convergence::{Convergence, Stage}, ellipsoid::Ellipsoid, geodetic::GeodeticCoordinate, Error};

/// Earth-centred Cartesian position in metres relative to the centre of
/// an ellipsoid.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeocentricCoordinate {
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) z: f64,
}

impl GeocentricCoordinate {
    pub fn new(x: f64, y: f64, z: f64) -> GeocentricCoordinate {
        Self { x, y, z }
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn z(&self) -> f64 {
        self.z
    }

    /// Recovers latitude, longitude and height on `ellipsoid`.
    ///
    /// Latitude is refined by fixed-point iteration until successive
    /// estimates differ by less than the latitude tolerance of `convergence`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NonConvergence`] if the tolerance is not reached within
    /// the configured number of iterations.
    ///
    /// # Usage
    ///
    /// ```
    /// use gridconvert::{Convergence, GeocentricCoordinate, ellipsoid::WGS84};
    ///
    /// // A point on the equator at the prime meridian
    /// let point = GeocentricCoordinate::new(6_378_137.0, 0.0, 0.0);
    /// let geodetic = point.to_geodetic(&WGS84, &Convergence::default()).unwrap();
    ///
    /// assert!(geodetic.latitude().abs() < 1e-12);
    /// assert!(geodetic.longitude().abs() < 1e-12);
    /// assert!(geodetic.height().abs() < 1e-6);
    /// ```
    pub fn to_geodetic(&self, ellipsoid: &Ellipsoid, convergence: &Convergence) -> Result<GeodeticCoordinate, Error> {
        let e2 = ellipsoid.eccentricity_squared();
        let longitude = self.y.atan2(self.x);
        let p = self.x.hypot(self.y);

        let mut latitude = self.z.atan2(p * (1. - e2));
        let mut change = f64::INFINITY;
        let mut iterations = 0;

        while iterations < convergence.max_latitude_iterations() {
            let nu = ellipsoid.prime_vertical_radius(latitude);
            let next = (self.z + e2 * nu * latitude.sin()).atan2(p);
            change = (next - latitude).abs();
            latitude = next;
            iterations += 1;

            if change < convergence.latitude_tolerance() {
                trace!("Latitude recovered after {iterations} iterations");

                let (sin_lat, cos_lat) = latitude.sin_cos();
                let height = p * cos_lat + self.z * sin_lat
                    - ellipsoid.a * (1. - e2 * sin_lat.powi(2)).sqrt();

                return Ok(GeodeticCoordinate::new(latitude, longitude, height));
            }
        }

        Err(Error::NonConvergence {
            stage: Stage::LatitudeRecovery,
            iterations,
            residual: change,
        })
    }
}

impl GeodeticCoordinate {
    /// Converts to Earth-centred Cartesian coordinates on `ellipsoid`.
    ///
    /// # Usage
    ///
    /// ```
    /// use gridconvert::{GeodeticCoordinate, ellipsoid::AIRY_1830};
    ///
    /// let pole = GeodeticCoordinate::from_degrees(90.0, 0.0, 0.0);
    /// let cartesian = pole.to_geocentric(&AIRY_1830);
    ///
    /// assert!(cartesian.x().abs() < 1e-6);
    /// assert!((cartesian.z() - AIRY_1830.semi_minor()).abs() < 1e-3);
    /// ```
    pub fn to_geocentric(&self, ellipsoid: &Ellipsoid) -> GeocentricCoordinate {
        let e2 = ellipsoid.eccentricity_squared();
        let nu = ellipsoid.prime_vertical_radius(self.latitude);
        let (sin_lat, cos_lat) = self.latitude.sin_cos();
        let (sin_lon, cos_lon) = self.longitude.sin_cos();

        GeocentricCoordinate {
            x: (nu + self.height) * cos_lat * cos_lon,
            y: (nu + self.height) * cos_lat * sin_lon,
            z: ((1. - e2) * nu + self.height) * sin_lat,
        }
    }
}
