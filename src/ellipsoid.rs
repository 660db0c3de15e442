use crate::constants::{AIRY_1830_A, AIRY_1830_B, WGS84_A, WGS84_B};

/// An ellipsoid of revolution described by its semi-major and semi-minor
/// axes in metres.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ellipsoid {
    pub(crate) a: f64,
    pub(crate) b: f64,
}

/// Airy 1830, the ellipsoid of the OSGB36 datum.
pub const AIRY_1830: Ellipsoid = Ellipsoid { a: AIRY_1830_A, b: AIRY_1830_B };

/// The WGS84 ellipsoid.
pub const WGS84: Ellipsoid = Ellipsoid { a: WGS84_A, b: WGS84_B };

impl Ellipsoid {
    /// Creates an ellipsoid from its semi-major and semi-minor axes.
    ///
    /// # Usage
    ///
    /// ```
    /// use gridconvert::ellipsoid::{Ellipsoid, WGS84};
    ///
    /// let ellipsoid = Ellipsoid::new(6_378_137.0, 6_356_752.3141);
    /// assert_eq!(ellipsoid, WGS84);
    /// ```
    pub const fn new(semi_major: f64, semi_minor: f64) -> Ellipsoid {
        Self {
            a: semi_major,
            b: semi_minor,
        }
    }

    #[inline]
    pub fn semi_major(&self) -> f64 {
        self.a
    }

    #[inline]
    pub fn semi_minor(&self) -> f64 {
        self.b
    }

    /// The squared eccentricity *e² = (a² - b²) / a²*.
    ///
    /// # Example
    /// ```
    /// use gridconvert::ellipsoid::AIRY_1830;
    ///
    /// assert!((AIRY_1830.eccentricity_squared() - 0.006_670_54).abs() < 1e-8);
    /// ```
    pub fn eccentricity_squared(&self) -> f64 {
        (self.a.powi(2) - self.b.powi(2)) / self.a.powi(2)
    }

    /// The third flattening *n = (a - b) / (a + b)*.
    pub fn third_flattening(&self) -> f64 {
        (self.a - self.b) / (self.a + self.b)
    }

    /// Prime vertical radius of curvature at the given latitude in radians.
    pub(crate) fn prime_vertical_radius(&self, lat: f64) -> f64 {
        self.a / (1. - self.eccentricity_squared() * lat.sin().powi(2)).sqrt()
    }
}
