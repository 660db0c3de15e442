use crate::{cartesian::GeocentricCoordinate, constants::osgb36_to_wgs84, utility::arcsec_to_radians};

/// Seven parameter similarity transform between two Earth-centred frames.
///
/// Rotations are applied in the linearised small-angle form that published
/// parameter sets are calibrated against.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HelmertParameters {
    /// Translations in metres
    pub(crate) t: [f64; 3],
    /// Rotations about the x, y and z axes in radians
    pub(crate) r: [f64; 3],
    /// Scale change, dimensionless
    pub(crate) s: f64,
}

impl HelmertParameters {
    /// Creates a transform from translations in metres, rotations in
    /// radians and a dimensionless scale change.
    pub fn new(translation: [f64; 3], rotation: [f64; 3], scale: f64) -> HelmertParameters {
        Self {
            t: translation,
            r: rotation,
            s: scale,
        }
    }

    /// Creates a transform from the units parameters are usually published
    /// in: translations in metres, rotations in arc-seconds and scale in
    /// parts per million.
    ///
    /// # Usage
    ///
    /// ```
    /// use gridconvert::HelmertParameters;
    ///
    /// let helmert = HelmertParameters::from_published([446.448, -124.157, 542.060], [0.1502, 0.2470, 0.8421], -20.4894);
    /// assert_eq!(helmert, HelmertParameters::osgb36_to_wgs84());
    /// assert!((helmert.scale() + 0.000_020_489_4).abs() < 1e-15);
    /// ```
    pub fn from_published(translation: [f64; 3], rotation_arcsec: [f64; 3], scale_ppm: f64) -> HelmertParameters {
        Self::new(
            translation,
            rotation_arcsec.map(arcsec_to_radians),
            scale_ppm * 1e-6,
        )
    }

    /// The OSGB36 to WGS84 parameter set.
    pub fn osgb36_to_wgs84() -> HelmertParameters {
        Self::from_published(
            osgb36_to_wgs84::T,
            osgb36_to_wgs84::R_ARCSEC,
            osgb36_to_wgs84::S_PPM,
        )
    }

    #[inline]
    pub fn translation(&self) -> [f64; 3] {
        self.t
    }

    #[inline]
    pub fn rotation(&self) -> [f64; 3] {
        self.r
    }

    #[inline]
    pub fn scale(&self) -> f64 {
        self.s
    }

    /// Transforms a point from the source frame into the target frame.
    ///
    /// # Usage
    ///
    /// ```
    /// use gridconvert::{GeocentricCoordinate, HelmertParameters};
    ///
    /// let shift = HelmertParameters::new([1.0, 2.0, 3.0], [0.0; 3], 0.0);
    /// let moved = shift.apply(&GeocentricCoordinate::new(10.0, 20.0, 30.0));
    ///
    /// assert_eq!(moved, GeocentricCoordinate::new(11.0, 22.0, 33.0));
    /// ```
    pub fn apply(&self, p: &GeocentricCoordinate) -> GeocentricCoordinate {
        let [tx, ty, tz] = self.t;
        let [rx, ry, rz] = self.r;
        let m = 1. + self.s;

        GeocentricCoordinate {
            x: tx + m * p.x - rz * p.y + ry * p.z,
            y: ty + rz * p.x + m * p.y - rx * p.z,
            z: tz - ry * p.x + rx * p.y + m * p.z,
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;

    #[test]
    fn rotation_signs() {
        // A quarter of a milliradian about z carries +x towards +y
        let rz = HelmertParameters::new([0.; 3], [0., 0., 2.5e-4], 0.);
        let moved = rz.apply(&GeocentricCoordinate::new(1000., 0., 0.));
        assert!(approx_eq!(f64, moved.y, 0.25, epsilon = 1e-12));
        assert!(approx_eq!(f64, moved.x, 1000.));

        let rx = HelmertParameters::new([0.; 3], [2.5e-4, 0., 0.], 0.);
        let moved = rx.apply(&GeocentricCoordinate::new(0., 1000., 0.));
        assert!(approx_eq!(f64, moved.z, 0.25, epsilon = 1e-12));

        let ry = HelmertParameters::new([0.; 3], [0., 2.5e-4, 0.], 0.);
        let moved = ry.apply(&GeocentricCoordinate::new(1000., 0., 0.));
        assert!(approx_eq!(f64, moved.z, -0.25, epsilon = 1e-12));
    }

    #[test]
    fn scale_is_applied_to_every_axis() {
        let scale = HelmertParameters::new([0.; 3], [0.; 3], 1e-5);
        let moved = scale.apply(&GeocentricCoordinate::new(1e6, -2e6, 3e6));

        assert!(approx_eq!(f64, moved.x, 1e6 + 10., epsilon = 1e-8));
        assert!(approx_eq!(f64, moved.y, -2e6 - 20., epsilon = 1e-8));
        assert!(approx_eq!(f64, moved.z, 3e6 + 30., epsilon = 1e-8));
    }

    #[test]
    fn osgb36_rotations_in_radians() {
        let helmert = HelmertParameters::osgb36_to_wgs84();
        assert!(approx_eq!(f64, helmert.r[2], 0.000_233_916_67_f64.to_radians(), epsilon = 1e-12));
    }
}
