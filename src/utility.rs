pub(crate) mod dms {
    /// Degrees per quarter turn
    pub const QD: i32 = 90;
    /// Minutes per degree
    pub const DM: i32 = 60;
    /// Seconds per minute
    pub const MS: i32 = 60;
    /// Degrees per half turn
    pub const HD: i32 = 2 * QD;
    /// Degrees per turn
    pub const TD: i32 = 2 * HD;
    /// Seconds per degree
    pub const DS: i32 = DM * MS;
}

/// Evaluate a polynomial, coefficients ordered from the highest power down
pub(crate) fn polyval(p: &[f64], x: f64) -> f64 {
    p
        .iter()
        .fold(0_f64, |acc, val| acc*x + val)
}

/// Convert arc-seconds to radians
pub(crate) fn arcsec_to_radians(value: f64) -> f64 {
    (value / f64::from(dms::DS)).to_radians()
}

pub(crate) trait GeoMath {
    fn eps_eq(&self, other: Self) -> bool;
    fn ang_normalize(&self) -> Self;
    fn remainder(&self, denom: Self) -> Self;
    fn sec(&self) -> Self;
    fn sin_squared(&self) -> Self;
    fn tan_squared(&self) -> Self;
}

impl GeoMath for f64 {
    fn eps_eq(&self, other: f64) -> bool {
        (*self - other).abs() < f64::EPSILON
    }

    /// Reduce an angle in degrees to the range (-180, 180]
    fn ang_normalize(&self) -> f64 {
        let value = self.remainder(f64::from(dms::TD));
        let hd = f64::from(dms::HD);

        if value.abs().eps_eq(hd) {
            hd
        }
        else {
            value
        }
    }

    fn remainder(&self, denom: Self) -> Self {
        *self - (*self / denom).round() * denom
    }

    fn sec(&self) -> f64 {
        self.cos().recip()
    }

    fn sin_squared(&self) -> f64 {
        self.sin().powi(2)
    }

    fn tan_squared(&self) -> f64 {
        self.tan().powi(2)
    }
}
