use std::fmt::Display;

use crate::{Error, grid::GridCoordinate, utility::dms};

/// Mean radius of Earth in meters
///
/// <https://en.wikipedia.org/wiki/Earth_radius#Arithmetic_mean_radius>
const EARTH_MEAN_RADIUS_M: f64 = 6371.0088 * 1000.0;

/// Representation of a Latitude/Longitude point in decimal degrees. This is
/// the output of every grid conversion and is referenced to the target datum
/// (WGS84 for the built-in conversion).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LatLon {
    #[cfg_attr(feature = "serde", serde(alias = "lat"))]
    pub(crate) latitude: f64,
    #[cfg_attr(feature = "serde", serde(alias = "lon"))]
    pub(crate) longitude: f64,
}

impl LatLon {
    /// Internal-only constructor that doesn't check the bounds of lat/lon
    pub(crate) fn new(lat: f64, lon: f64) -> LatLon {
        Self {
            latitude: lat,
            longitude: lon,
        }
    }

    /// Tries to create a latitude/longitude point from a lat/lon pair. First checks if the
    /// values are valid:
    /// * Latitude must be in range [-90,90]
    /// * Longitude must be in range (-180,180]
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoord`] if either latitude or longitude are invalid.
    ///
    /// # Usage
    ///
    /// ```
    /// use gridconvert::LatLon;
    ///
    /// let coord = LatLon::create(52.657978, 1.716067);
    ///
    /// assert!(coord.is_ok());
    ///
    /// let coord = coord.unwrap();
    ///
    /// assert_eq!(coord.latitude(), 52.657978);
    /// assert_eq!(coord.longitude(), 1.716067);
    ///
    /// let invalid_coord_lat = LatLon::create(100.0, 0.0);
    /// assert!(invalid_coord_lat.is_err());
    ///
    /// let invalid_coord_lon = LatLon::create(0.0, -180.0);
    /// assert!(invalid_coord_lon.is_err());
    /// ```
    pub fn create(lat: f64, lon: f64) -> Result<LatLon, Error> {
        let qd = f64::from(dms::QD);
        let hd = f64::from(dms::HD);

        if !(-qd..=qd).contains(&lat) {
            Err(Error::InvalidCoord(format!("Latitude {lat} outside of valid range [-90, 90].")))
        } else if !(lon > -hd && lon <= hd) {
            Err(Error::InvalidCoord(format!("Longitude {lon} outside of valid range (-180, 180].")))
        } else {
            Ok(LatLon::new(lat, lon))
        }
    }

    /// Returns the latitude value.
    ///
    /// # Example
    /// ```
    /// use gridconvert::LatLon;
    ///
    /// let coord = LatLon::create(52.657978, 1.716067).unwrap();
    /// assert_eq!(coord.latitude(), 52.657978);
    /// ```
    #[inline]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Returns the longitude value.
    ///
    /// # Example
    /// ```
    /// use gridconvert::LatLon;
    ///
    /// let coord = LatLon::create(52.657978, 1.716067).unwrap();
    /// assert_eq!(coord.longitude(), 1.716067);
    /// ```
    #[inline]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Returns the distance in meters between two [`LatLon`] points
    /// using the [haversine formula](https://en.wikipedia.org/wiki/Haversine_formula).
    /// Uses the [mean radius of the Earth](https://en.wikipedia.org/wiki/Earth_radius#Arithmetic_mean_radius)
    /// in the calculation: `6371.0088`
    ///
    /// # Usage
    ///
    /// ```
    /// use gridconvert::LatLon;
    ///
    /// let osgb36 = LatLon::create(52.657570, 1.717922).unwrap();
    /// let wgs84 = LatLon::create(52.657978, 1.716067).unwrap();
    ///
    /// // The datum shift in East Anglia is on the order of a hundred metres
    /// let shift = osgb36.haversine(&wgs84);
    /// assert!(shift > 100.0 && shift < 150.0);
    /// ```
    pub fn haversine(&self, other: &LatLon) -> f64 {
        let lat1_r = self.latitude.to_radians();
        let lat2_r = other.latitude.to_radians();

        2.0 * EARTH_MEAN_RADIUS_M * (
            ((other.latitude - self.latitude).to_radians() / 2.0).sin().powi(2) +
            lat1_r.cos() * lat2_r.cos() *
            ((other.longitude - self.longitude).to_radians() / 2.0).sin().powi(2)
        ).sqrt().asin()
    }

    /// Converts from a National Grid [`GridCoordinate`] to WGS84 [`LatLon`]
    /// using the built-in OSGB36 to WGS84 conversion.
    ///
    /// # Errors
    ///
    /// See [`DatumConversion::convert`](crate::DatumConversion::convert).
    ///
    /// # Usage
    ///
    /// ```
    /// use gridconvert::{GridCoordinate, LatLon};
    ///
    /// let grid = GridCoordinate::create(651409.903, 313177.270).unwrap();
    /// let converted = LatLon::from_grid(&grid).unwrap();
    ///
    /// assert!((converted.latitude() - 52.657978).abs() < 1e-4);
    /// assert!((converted.longitude() - 1.716067).abs() < 1e-4);
    /// ```
    pub fn from_grid(value: &GridCoordinate) -> Result<LatLon, Error> {
        value.to_latlon()
    }
}

impl Display for LatLon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut buf = ryu::Buffer::new();
        let lat = buf.format(self.latitude);
        let mut buf = ryu::Buffer::new();
        let lon = buf.format(self.longitude);
        write!(
            f,
            "{lat} {lon}",
        )
    }
}
