use std::fmt::Display;

use crate::{gridref::GridRef, latlon::LatLon, pipeline::DatumConversion, Error, ParseCoord};

/// A National Grid position in metres east and north of the grid's false
/// origin (the south-west corner of square SV).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridCoordinate {
    #[cfg_attr(feature = "serde", serde(alias = "e", alias = "x"))]
    pub(crate) easting: f64,
    #[cfg_attr(feature = "serde", serde(alias = "n", alias = "y"))]
    pub(crate) northing: f64,
}

impl GridCoordinate {
    /// Internal-only constructor that doesn't check the coordinate
    pub(crate) fn new(easting: f64, northing: f64) -> GridCoordinate {
        Self {
            easting,
            northing,
        }
    }

    /// Tries to create a grid coordinate from an easting/northing pair in
    /// metres. Any finite pair is accepted; positions far outside the grid
    /// are flagged during conversion rather than rejected here.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoord`] if either value is NaN or infinite.
    ///
    /// # Usage
    ///
    /// ```
    /// use gridconvert::GridCoordinate;
    ///
    /// let coord = GridCoordinate::create(651409.903, 313177.270);
    /// assert!(coord.is_ok());
    ///
    /// let coord = coord.unwrap();
    /// assert_eq!(coord.easting(), 651409.903);
    /// assert_eq!(coord.northing(), 313177.270);
    ///
    /// assert!(GridCoordinate::create(f64::NAN, 0.0).is_err());
    /// assert!(GridCoordinate::create(0.0, f64::INFINITY).is_err());
    /// ```
    pub fn create(easting: f64, northing: f64) -> Result<GridCoordinate, Error> {
        if !easting.is_finite() {
            Err(Error::InvalidCoord(format!("Easting {easting} is not a finite number.")))
        } else if !northing.is_finite() {
            Err(Error::InvalidCoord(format!("Northing {northing} is not a finite number.")))
        } else {
            Ok(GridCoordinate::new(easting, northing))
        }
    }

    #[inline]
    pub fn easting(&self) -> f64 {
        self.easting
    }

    #[inline]
    pub fn northing(&self) -> f64 {
        self.northing
    }

    /// Converts to WGS84 [`LatLon`] using the built-in OSGB36 to WGS84
    /// conversion. Range warnings are logged and otherwise dropped, use
    /// [`DatumConversion::convert`] to inspect them.
    ///
    /// # Errors
    ///
    /// See [`DatumConversion::convert`].
    ///
    /// # Usage
    ///
    /// ```
    /// use gridconvert::GridCoordinate;
    ///
    /// let coord = GridCoordinate::create(651409.903, 313177.270).unwrap();
    /// let converted = coord.to_latlon().unwrap();
    ///
    /// assert!((converted.latitude() - 52.657978).abs() < 1e-4);
    /// assert!((converted.longitude() - 1.716067).abs() < 1e-4);
    /// ```
    pub fn to_latlon(&self) -> Result<LatLon, Error> {
        DatumConversion::osgb36_to_wgs84()
            .convert(self)
            .map(|converted| converted.latlon())
    }

    /// Converts to a [`GridRef`] with `digits` digits per axis.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGridRef`] if the coordinate lies outside the
    /// lettered squares or `digits` is greater than 5.
    ///
    /// # Usage
    ///
    /// ```
    /// use gridconvert::GridCoordinate;
    ///
    /// let coord = GridCoordinate::create(651409.903, 313177.270).unwrap();
    ///
    /// assert_eq!(coord.to_gridref(5).unwrap().to_string(), "TG 51409 13177");
    /// assert_eq!(coord.to_gridref(3).unwrap().to_string(), "TG 514 131");
    /// ```
    pub fn to_gridref(&self, digits: usize) -> Result<GridRef, Error> {
        GridRef::from_grid(self, digits)
    }
}

impl ParseCoord for GridCoordinate {
    /// Parses either a numeric `"easting northing"` pair (separated by
    /// whitespace and/or a comma) or a lettered grid reference.
    ///
    /// # Usage
    ///
    /// ```
    /// use gridconvert::{GridCoordinate, ParseCoord};
    ///
    /// let numeric = GridCoordinate::parse_coord("651409.903, 313177.270").unwrap();
    /// assert_eq!(numeric.easting(), 651409.903);
    ///
    /// let lettered = GridCoordinate::parse_coord("TG5140913177").unwrap();
    /// assert_eq!(lettered.easting(), 651409.0);
    /// assert_eq!(lettered.northing(), 313177.0);
    ///
    /// assert!(GridCoordinate::parse_coord("651409.903").is_err());
    /// ```
    fn parse_coord(value: &str) -> Result<Self, Error> {
        let value = value.trim();

        if value.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return GridRef::parse_str(value).map(|gridref| gridref.grid);
        }

        let pieces = value
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|piece| !piece.is_empty())
            .collect::<Vec<_>>();

        let [easting, northing] = pieces[..] else {
            return Err(Error::InvalidCoord(format!("Expected an easting and a northing, got \"{value}\".")));
        };

        let parse = |piece: &str| piece
            .parse::<f64>()
            .map_err(|e| Error::InvalidCoord(format!("\"{piece}\" is not a number: {e}")));

        GridCoordinate::create(parse(easting)?, parse(northing)?)
    }
}

impl Display for GridCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut buf = ryu::Buffer::new();
        let easting = buf.format(self.easting);
        let mut buf = ryu::Buffer::new();
        let northing = buf.format(self.northing);
        write!(
            f,
            "{easting} {northing}",
        )
    }
}
