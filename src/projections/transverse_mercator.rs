use log::trace;

use crate::{
    constants::national_grid,
    convergence::{Convergence, Stage},
    ellipsoid::{Ellipsoid, AIRY_1830},
    geodetic::GeodeticCoordinate,
    grid::GridCoordinate,
    utility::{polyval, GeoMath},
    Error,
};

// ================================
// Transverse Mercator Constants
// ================================

// Meridional arc series, each term a polynomial in n of order 3
const ARC_COEFF: [[f64; 4]; 4] = [
    // (phi - phi0)
    [5. / 4., 5. / 4., 1., 1.],
    // sin(phi - phi0) cos(phi + phi0)
    [21. / 8., 3., 3., 0.],
    // sin(2(phi - phi0)) cos(2(phi + phi0))
    [15. / 8., 15. / 8., 0., 0.],
    // sin(3(phi - phi0)) cos(3(phi + phi0))
    [35. / 24., 0., 0., 0.],
];

// Redfearn series terms, polynomials in tan^2
const IX_COEFF: [f64; 3] = [45., 90., 61.];
const XII_COEFF: [f64; 3] = [24., 28., 5.];
const XIIA_COEFF: [f64; 4] = [720., 1320., 662., 61.];

/// Raised when a grid coordinate lies outside the footprint a projection is
/// defined for. The conversion still succeeds but the series expansion is
/// being extrapolated, so the result should not be trusted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectionRangeWarning {
    pub(crate) easting: f64,
    pub(crate) northing: f64,
    pub(crate) distance: f64,
}

impl ProjectionRangeWarning {
    #[inline]
    pub fn easting(&self) -> f64 {
        self.easting
    }

    #[inline]
    pub fn northing(&self) -> f64 {
        self.northing
    }

    /// Distance in metres of the coordinate from the projection false origin.
    #[inline]
    pub fn distance_from_false_origin(&self) -> f64 {
        self.distance
    }
}

impl std::fmt::Display for ProjectionRangeWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Grid coordinate ({:.3}, {:.3}) is outside the projection footprint, {:.2}km from the false origin",
            self.easting,
            self.northing,
            self.distance / 1000.0,
        )
    }
}

/// A Transverse Mercator grid definition, inverted with the Redfearn series
/// as published by the Ordnance Survey.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransverseMercator {
    ellipsoid: Ellipsoid,
    /// False origin (E0, N0) in metres
    e0: f64,
    n0: f64,
    /// True origin (phi0, lambda0) in radians
    phi0: f64,
    lambda0: f64,
    /// Central meridian scale factor
    f0: f64,
    /// `[min_e, min_n, max_e, max_n]` in metres
    extent: [f64; 4],
    /// Margin in metres applied around `extent` before warning
    margin: f64,
}

impl TransverseMercator {
    /// Defines a grid. Origins are given in metres and degrees, `extent` as
    /// `[min_e, min_n, max_e, max_n]` in metres. Coordinates further than
    /// `margin` metres outside `extent` raise a [`ProjectionRangeWarning`].
    pub fn new(
        ellipsoid: Ellipsoid,
        false_origin: (f64, f64),
        true_origin_deg: (f64, f64),
        scale_factor: f64,
        extent: [f64; 4],
        margin: f64,
    ) -> TransverseMercator {
        Self {
            ellipsoid,
            e0: false_origin.0,
            n0: false_origin.1,
            phi0: true_origin_deg.0.to_radians(),
            lambda0: true_origin_deg.1.to_radians(),
            f0: scale_factor,
            extent,
            margin,
        }
    }

    /// The Ordnance Survey National Grid on the Airy 1830 ellipsoid.
    pub fn national_grid() -> TransverseMercator {
        Self::new(
            AIRY_1830,
            (national_grid::E0, national_grid::N0),
            (national_grid::PHI0_DEG, national_grid::LAMBDA0_DEG),
            national_grid::F0,
            national_grid::EXTENT,
            national_grid::SQUARE,
        )
    }

    #[inline]
    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }

    /// False origin `(E0, N0)` in metres.
    #[inline]
    pub fn false_origin(&self) -> (f64, f64) {
        (self.e0, self.n0)
    }

    /// True origin `(latitude, longitude)` in radians.
    #[inline]
    pub fn true_origin(&self) -> (f64, f64) {
        (self.phi0, self.lambda0)
    }

    #[inline]
    pub fn scale_factor(&self) -> f64 {
        self.f0
    }

    /// Warning margin around the extent in metres.
    #[inline]
    pub fn margin(&self) -> f64 {
        self.margin
    }

    /// Meridional arc from the true origin latitude to `phi`, scaled by F0.
    fn meridional_arc(&self, phi: f64) -> f64 {
        let n = self.ellipsoid.third_flattening();
        let d = phi - self.phi0;
        let s = phi + self.phi0;

        self.ellipsoid.b * self.f0 * (
            polyval(&ARC_COEFF[0], n) * d
            - polyval(&ARC_COEFF[1], n) * d.sin() * s.cos()
            + polyval(&ARC_COEFF[2], n) * (2. * d).sin() * (2. * s).cos()
            - polyval(&ARC_COEFF[3], n) * (3. * d).sin() * (3. * s).cos()
        )
    }

    /// Solves for the footpoint latitude phi' whose meridional arc matches
    /// the northing.
    fn footpoint_latitude(&self, northing: f64, convergence: &Convergence) -> Result<f64, Error> {
        let af0 = self.ellipsoid.a * self.f0;
        let dn = northing - self.n0;

        let mut phi = dn / af0 + self.phi0;
        let mut residual = dn - self.meridional_arc(phi);
        let mut iterations = 0;

        while residual.abs() >= convergence.arc_tolerance() {
            if iterations == convergence.max_arc_iterations() {
                return Err(Error::NonConvergence {
                    stage: Stage::MeridionalArc,
                    iterations,
                    residual,
                });
            }

            phi += residual / af0;
            residual = dn - self.meridional_arc(phi);
            iterations += 1;
        }

        trace!("Meridional arc converged after {iterations} iterations");

        Ok(phi)
    }

    /// Checks the coordinate against the grid footprint.
    pub fn check_footprint(&self, grid: &GridCoordinate) -> Option<ProjectionRangeWarning> {
        let [min_e, min_n, max_e, max_n] = self.extent;
        let (x, y) = (grid.easting, grid.northing);

        if x < min_e - self.margin || x > max_e + self.margin || y < min_n - self.margin || y > max_n + self.margin {
            Some(ProjectionRangeWarning {
                easting: x,
                northing: y,
                distance: (x - self.e0).hypot(y - self.n0),
            })
        } else {
            None
        }
    }

    /// Inverts the projection, returning the position on the grid's own
    /// ellipsoid with zero height, together with a warning if the coordinate
    /// lies outside the grid footprint.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NonConvergence`] if the meridional arc solve does not
    /// reach its tolerance within the configured number of iterations, or
    /// [`Error::InvalidCoord`] if the coordinate is so far from the central
    /// meridian that the series overflows.
    ///
    /// # Usage
    ///
    /// ```
    /// use gridconvert::{Convergence, GridCoordinate, TransverseMercator};
    ///
    /// let grid = GridCoordinate::create(651409.903, 313177.270).unwrap();
    /// let (osgb36, warning) = TransverseMercator::national_grid()
    ///     .invert(&grid, &Convergence::default())
    ///     .unwrap();
    ///
    /// // 52°39'27.2531"N 1°43'4.5177"E
    /// assert!((osgb36.latitude().to_degrees() - 52.657570).abs() < 1e-6);
    /// assert!((osgb36.longitude().to_degrees() - 1.717922).abs() < 1e-6);
    /// assert!(warning.is_none());
    /// ```
    pub fn invert(
        &self,
        grid: &GridCoordinate,
        convergence: &Convergence,
    ) -> Result<(GeodeticCoordinate, Option<ProjectionRangeWarning>), Error> {
        let warning = self.check_footprint(grid);

        let phi_p = self.footpoint_latitude(grid.northing, convergence)?;

        let e2 = self.ellipsoid.eccentricity_squared();
        let af0 = self.ellipsoid.a * self.f0;
        let w = 1. - e2 * phi_p.sin_squared();

        // Transverse and meridional radii of curvature
        let nu = af0 / w.sqrt();
        let rho = af0 * (1. - e2) / w.powf(1.5);
        let eta2 = nu / rho - 1.;

        let tan_p = phi_p.tan();
        let tan2 = phi_p.tan_squared();
        let sec_p = phi_p.sec();

        let vii = tan_p / (2. * rho * nu);
        let viii = tan_p / (24. * rho * nu.powi(3)) * polyval(&[3. - 9. * eta2, 5. + eta2], tan2);
        let ix = tan_p / (720. * rho * nu.powi(5)) * polyval(&IX_COEFF, tan2);
        let x = sec_p / nu;
        let xi = sec_p / (6. * nu.powi(3)) * (nu / rho + 2. * tan2);
        let xii = sec_p / (120. * nu.powi(5)) * polyval(&XII_COEFF, tan2);
        let xiia = sec_p / (5040. * nu.powi(7)) * polyval(&XIIA_COEFF, tan2);

        let de = grid.easting - self.e0;

        let lat = phi_p - vii * de.powi(2) + viii * de.powi(4) - ix * de.powi(6);
        let lon = self.lambda0 + x * de - xi * de.powi(3) + xii * de.powi(5) - xiia * de.powi(7);

        if !lat.is_finite() || !lon.is_finite() {
            return Err(Error::InvalidCoord(format!(
                "Grid coordinate ({}, {}) overflows the inverse projection series",
                grid.easting, grid.northing,
            )));
        }

        Ok((GeodeticCoordinate::new(lat, lon, 0.), warning))
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;

    #[test]
    fn arc_vanishes_at_true_origin() {
        let tm = TransverseMercator::national_grid();
        assert!(tm.meridional_arc(tm.phi0).abs() < f64::EPSILON);
    }

    #[test]
    fn origin_inverts_to_true_origin() {
        let tm = TransverseMercator::national_grid();
        let grid = GridCoordinate::new(national_grid::E0, national_grid::N0);
        let convergence = Convergence::default().with_max_arc_iterations(0);

        let (coord, warning) = tm.invert(&grid, &convergence).unwrap();

        assert!(approx_eq!(f64, coord.latitude.to_degrees(), 49., epsilon = 1e-12));
        assert!(approx_eq!(f64, coord.longitude.to_degrees(), -2., epsilon = 1e-12));
        assert!(warning.is_none());
    }

    #[test]
    fn arc_iteration_cap_is_enforced() {
        let tm = TransverseMercator::national_grid();
        let grid = GridCoordinate::new(651_409.903, 313_177.270);
        let convergence = Convergence::default().with_max_arc_iterations(1);

        match tm.invert(&grid, &convergence) {
            Err(Error::NonConvergence { stage, iterations, residual }) => {
                assert_eq!(stage, Stage::MeridionalArc);
                assert_eq!(iterations, 1);
                assert!(residual.abs() >= 0.001);
            }
            other => panic!("expected non-convergence, got {other:?}"),
        }
    }

    #[test]
    fn negative_residuals_converge() {
        // Southern offsets start above the footpoint and approach from the other side
        let tm = TransverseMercator::national_grid();
        let grid = GridCoordinate::new(400_000., -900_000.);
        let (coord, warning) = tm.invert(&grid, &Convergence::default()).unwrap();

        assert!(coord.latitude.to_degrees() < 49.);
        assert!(warning.is_some());
    }

    #[test]
    fn overflowing_series_is_invalid_input() {
        let tm = TransverseMercator::national_grid();
        let grid = GridCoordinate::new(1e45, 300_000.);

        match tm.invert(&grid, &Convergence::default()) {
            Err(Error::InvalidCoord(message)) => assert!(message.contains("overflows")),
            other => panic!("expected invalid coordinate, got {other:?}"),
        }
    }

    #[test]
    fn margin_is_part_of_the_grid_definition() {
        let tight = TransverseMercator::new(
            AIRY_1830,
            (national_grid::E0, national_grid::N0),
            (national_grid::PHI0_DEG, national_grid::LAMBDA0_DEG),
            national_grid::F0,
            [0., 0., 100_000., 100_000.],
            0.,
        );

        assert!(approx_eq!(f64, tight.margin(), 0.));
        assert!(tight.check_footprint(&GridCoordinate::new(100_000., 50_000.)).is_none());
        assert!(tight.check_footprint(&GridCoordinate::new(100_001., 50_000.)).is_some());
        assert!(approx_eq!(f64, TransverseMercator::national_grid().margin(), national_grid::SQUARE));
    }

    #[test]
    fn footprint_allows_one_square_of_margin() {
        let tm = TransverseMercator::national_grid();

        assert!(tm.check_footprint(&GridCoordinate::new(-99_000., 0.)).is_none());
        assert!(tm.check_footprint(&GridCoordinate::new(799_000., 1_399_000.)).is_none());

        let warning = tm.check_footprint(&GridCoordinate::new(400_000., 1_500_000.)).unwrap();
        assert!(approx_eq!(f64, warning.distance_from_false_origin(), 1_600_000.));
    }
}
