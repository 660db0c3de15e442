use crate::{latlon::LatLon, utility::GeoMath, Error};

/// A position referenced to an ellipsoid. Latitude and longitude are held
/// in radians, height in metres above the ellipsoid.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeodeticCoordinate {
    pub(crate) latitude: f64,
    pub(crate) longitude: f64,
    pub(crate) height: f64,
}

impl GeodeticCoordinate {
    /// Creates a geodetic coordinate from radians and metres.
    pub fn new(latitude: f64, longitude: f64, height: f64) -> GeodeticCoordinate {
        Self {
            latitude,
            longitude,
            height,
        }
    }

    /// Creates a geodetic coordinate from degrees and metres.
    ///
    /// # Usage
    ///
    /// ```
    /// use gridconvert::GeodeticCoordinate;
    ///
    /// let coord = GeodeticCoordinate::from_degrees(49.0, -2.0, 0.0);
    /// assert!((coord.latitude() - 49_f64.to_radians()).abs() < 1e-15);
    /// ```
    pub fn from_degrees(latitude: f64, longitude: f64, height: f64) -> GeodeticCoordinate {
        Self::new(latitude.to_radians(), longitude.to_radians(), height)
    }

    /// Latitude in radians.
    #[inline]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in radians.
    #[inline]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Height above the ellipsoid in metres.
    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Returns a copy with the height replaced.
    pub fn with_height(&self, height: f64) -> GeodeticCoordinate {
        Self { height, ..*self }
    }

    /// Converts to decimal degrees, normalising longitude to `(-180, 180]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoord`] if the latitude falls outside
    /// `[-90, 90]`, which only happens when an upstream stage is broken.
    ///
    /// # Usage
    ///
    /// ```
    /// use gridconvert::GeodeticCoordinate;
    ///
    /// let coord = GeodeticCoordinate::from_degrees(52.5, -180.0, 10.0);
    /// let latlon = coord.to_latlon().unwrap();
    ///
    /// assert!((latlon.latitude() - 52.5).abs() < 1e-12);
    /// assert!((latlon.longitude() - 180.0).abs() < 1e-12);
    /// ```
    pub fn to_latlon(&self) -> Result<LatLon, Error> {
        LatLon::create(
            self.latitude.to_degrees(),
            self.longitude.to_degrees().ang_normalize(),
        )
    }
}
