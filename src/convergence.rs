use crate::constants::{ARC_TOLERANCE_M, LATITUDE_TOLERANCE_RAD, MAX_ARC_ITERATIONS, MAX_LATITUDE_ITERATIONS};

/// The iterative stage that failed to converge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Meridional arc solve of the inverse Transverse Mercator projection.
    MeridionalArc,
    /// Latitude recovery of the geocentric to geodetic conversion.
    LatitudeRecovery,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::MeridionalArc => write!(f, "meridional arc"),
            Stage::LatitudeRecovery => write!(f, "latitude recovery"),
        }
    }
}

/// Termination settings of the two iterative stages of a conversion.
///
/// # Usage
///
/// ```
/// use gridconvert::Convergence;
///
/// let settings = Convergence::default().with_max_arc_iterations(5);
/// assert_eq!(settings.max_arc_iterations(), 5);
/// assert_eq!(settings.arc_tolerance(), 0.001);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Convergence {
    arc_tolerance: f64,
    max_arc_iterations: usize,
    latitude_tolerance: f64,
    max_latitude_iterations: usize,
}

impl Default for Convergence {
    fn default() -> Self {
        Self {
            arc_tolerance: ARC_TOLERANCE_M,
            max_arc_iterations: MAX_ARC_ITERATIONS,
            latitude_tolerance: LATITUDE_TOLERANCE_RAD,
            max_latitude_iterations: MAX_LATITUDE_ITERATIONS,
        }
    }
}

impl Convergence {
    /// Northing residual in metres below which the meridional arc solve stops.
    #[inline]
    pub fn arc_tolerance(&self) -> f64 {
        self.arc_tolerance
    }

    #[inline]
    pub fn max_arc_iterations(&self) -> usize {
        self.max_arc_iterations
    }

    /// Latitude change in radians below which latitude recovery stops.
    #[inline]
    pub fn latitude_tolerance(&self) -> f64 {
        self.latitude_tolerance
    }

    #[inline]
    pub fn max_latitude_iterations(&self) -> usize {
        self.max_latitude_iterations
    }

    pub fn with_arc_tolerance(self, arc_tolerance: f64) -> Self {
        Self { arc_tolerance, ..self }
    }

    pub fn with_max_arc_iterations(self, max_arc_iterations: usize) -> Self {
        Self { max_arc_iterations, ..self }
    }

    pub fn with_latitude_tolerance(self, latitude_tolerance: f64) -> Self {
        Self { latitude_tolerance, ..self }
    }

    pub fn with_max_latitude_iterations(self, max_latitude_iterations: usize) -> Self {
        Self { max_latitude_iterations, ..self }
    }
}
