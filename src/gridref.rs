use std::{fmt::Display, str::FromStr};

use crate::{constants::national_grid::{EXTENT, SQUARE}, grid::GridCoordinate, Error, ParseCoord};

// Grid letters skip I
const LETTERS: &str = "ABCDEFGHJKLMNOPQRSTUVWXYZ";

/// Letters per row of the 5x5 lettering pattern
const WIDTH: i32 = 5;
/// Number of 100km rows the lettering pattern is offset from the false origin
const ROW_OFFSET: i32 = 19;

pub const MAX_DIGITS: usize = 5;
pub const BASE: u32 = 10;

/// An Ordnance Survey alphanumeric grid reference such as `TG 51409 13177`:
/// two letters selecting a 100km square followed by an equal number of
/// easting and northing digits within it.
///
/// With the `serde` feature a grid reference serializes as its string form
/// and is validated by [`GridRef::parse_str`] when deserialized.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "String", try_from = "String")
)]
pub struct GridRef {
    pub(crate) grid: GridCoordinate,
    pub(crate) digits: usize,
}

/// Index of the 100km square `(column, row)` containing a coordinate.
#[allow(clippy::cast_possible_truncation)]
fn square_index(value: f64) -> i32 {
    (value / SQUARE).floor() as i32
}

/// Size in metres of the smallest square a reference with `digits` digits
/// per axis can name.
fn unit(digits: usize) -> f64 {
    let mut unit = SQUARE;
    for _ in 0..digits {
        unit /= f64::from(BASE);
    }
    unit
}

fn max_squares() -> (i32, i32) {
    (square_index(EXTENT[2]), square_index(EXTENT[3]))
}

/// Letters naming the 100km square at `(e100, n100)`.
#[allow(clippy::cast_sign_loss)]
fn square_letters(e100: i32, n100: i32) -> Option<[u8; 2]> {
    let (max_e, max_n) = max_squares();
    if !(0..max_e).contains(&e100) || !(0..max_n).contains(&n100) {
        return None;
    }

    let row = ROW_OFFSET - n100;
    let first = row - row.rem_euclid(WIDTH) + (e100 + 2 * WIDTH).div_euclid(WIDTH);
    let second = (row * WIDTH).rem_euclid(WIDTH * WIDTH) + e100.rem_euclid(WIDTH);

    let letters = LETTERS.as_bytes();
    Some([letters[first as usize], letters[second as usize]])
}

/// Inverse of [`square_letters`].
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn square_index_from_letters(first: u8, second: u8) -> Option<(i32, i32)> {
    let letters = LETTERS.as_bytes();
    let l1 = letters.iter().position(|c| *c == first)? as i32;
    let l2 = letters.iter().position(|c| *c == second)? as i32;

    let e100 = (l1 - 2).rem_euclid(WIDTH) * WIDTH + l2.rem_euclid(WIDTH);
    let n100 = ROW_OFFSET - l1.div_euclid(WIDTH) * WIDTH - l2.div_euclid(WIDTH);

    // Only accept letters that round trip, the pattern extends past the grid
    (square_letters(e100, n100)? == [first, second]).then_some((e100, n100))
}

impl GridRef {
    /// Builds the grid reference of `value` truncated to `digits` digits per
    /// axis (5 digits resolve to 1m, 0 names just the 100km square).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGridRef`] if `digits` exceeds 5 or the
    /// coordinate is outside the lettered squares.
    ///
    /// # Usage
    ///
    /// ```
    /// use gridconvert::{GridCoordinate, GridRef};
    ///
    /// let coord = GridCoordinate::create(530000.0, 180000.0).unwrap();
    /// let gridref = GridRef::from_grid(&coord, 4).unwrap();
    ///
    /// assert_eq!(gridref.to_string(), "TQ 3000 8000");
    /// assert_eq!(gridref.digits(), 4);
    ///
    /// assert!(GridRef::from_grid(&coord, 6).is_err());
    /// ```
    pub fn from_grid(value: &GridCoordinate, digits: usize) -> Result<GridRef, Error> {
        if digits > MAX_DIGITS {
            return Err(Error::InvalidGridRef(format!("Precision {digits} not in range [0, {MAX_DIGITS}]")));
        }

        let e100 = square_index(value.easting);
        let n100 = square_index(value.northing);
        if square_letters(e100, n100).is_none() {
            return Err(Error::InvalidGridRef(
                format!(
                    "Coordinate ({:.2}km, {:.2}km) is outside the lettered grid [{:.2}km, {:.2}km] x [{:.2}km, {:.2}km]",
                    value.easting / 1000.0,
                    value.northing / 1000.0,
                    EXTENT[0] / 1000.0,
                    EXTENT[2] / 1000.0,
                    EXTENT[1] / 1000.0,
                    EXTENT[3] / 1000.0,
                )
            ));
        }

        // Truncate towards the south-west corner at the requested resolution
        let unit = unit(digits);
        let grid = GridCoordinate::new(
            (value.easting / unit).floor() * unit,
            (value.northing / unit).floor() * unit,
        );

        Ok(Self { grid, digits })
    }

    /// Parses a grid reference. Spaces are optional, letters are case
    /// insensitive and both axes must have the same number of digits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGridRef`] if the reference is malformed.
    ///
    /// # Usage
    ///
    /// ```
    /// use gridconvert::GridRef;
    ///
    /// let gridref = GridRef::parse_str("TG 51409 13177").unwrap();
    /// assert_eq!(gridref.easting(), 651409.0);
    /// assert_eq!(gridref.northing(), 313177.0);
    ///
    /// let square = GridRef::parse_str("hp").unwrap();
    /// assert_eq!(square.easting(), 400000.0);
    /// assert_eq!(square.northing(), 1200000.0);
    ///
    /// assert!(GridRef::parse_str("TG 514 13177").is_err());
    /// assert!(GridRef::parse_str("TG 5141317").is_err());
    /// assert!(GridRef::parse_str("AA 123 456").is_err());
    /// assert!(GridRef::parse_str("IT 123 456").is_err());
    /// ```
    pub fn parse_str(value: &str) -> Result<GridRef, Error> {
        let trimmed = value.trim();
        let mut chars = trimmed.chars();

        let (Some(first), Some(second)) = (chars.next(), chars.next()) else {
            return Err(Error::InvalidGridRef(format!("Grid reference \"{value}\" is too short")));
        };

        let square = if first.is_ascii() && second.is_ascii() {
            #[allow(clippy::cast_possible_truncation)]
            square_index_from_letters(first.to_ascii_uppercase() as u8, second.to_ascii_uppercase() as u8)
        } else {
            None
        };
        let Some((e100, n100)) = square else {
            return Err(Error::InvalidGridRef(format!("Grid reference \"{value}\" does not start with a valid square")));
        };

        let groups = chars.as_str().split_whitespace().collect::<Vec<_>>();
        let (eastings, northings) = match groups[..] {
            [] => ("", ""),
            [both] if both.is_ascii() && both.len() % 2 == 0 => both.split_at(both.len() / 2),
            [eastings, northings] if eastings.len() == northings.len() => (eastings, northings),
            _ => return Err(Error::InvalidGridRef(format!("Grid reference \"{value}\" has an unequal number of easting and northing digits"))),
        };

        let digits = eastings.len();
        if digits > MAX_DIGITS {
            return Err(Error::InvalidGridRef(format!("Grid reference \"{value}\" has more than {MAX_DIGITS} digits per axis")));
        }

        let parse = |group: &str| group
            .chars()
            .try_fold(0_u32, |acc, c| c.to_digit(BASE).map(|d| acc * BASE + d))
            .ok_or_else(|| Error::InvalidGridRef(format!("Encountered a non-digit in grid reference \"{value}\"")));

        let x = parse(eastings)?;
        let y = parse(northings)?;

        let unit = unit(digits);

        Ok(Self {
            grid: GridCoordinate::new(
                f64::from(e100) * SQUARE + f64::from(x) * unit,
                f64::from(n100) * SQUARE + f64::from(y) * unit,
            ),
            digits,
        })
    }

    /// Easting in metres of the south-west corner of the referenced square.
    #[inline]
    pub fn easting(&self) -> f64 {
        self.grid.easting
    }

    /// Northing in metres of the south-west corner of the referenced square.
    #[inline]
    pub fn northing(&self) -> f64 {
        self.grid.northing
    }

    /// Number of digits per axis.
    #[inline]
    pub fn digits(&self) -> usize {
        self.digits
    }

    /// Converts to a [`GridCoordinate`] at the south-west corner.
    pub fn to_grid(&self) -> GridCoordinate {
        self.grid
    }
}

impl ParseCoord for GridRef {
    fn parse_coord(value: &str) -> Result<Self, Error> {
        GridRef::parse_str(value)
    }
}

impl FromStr for GridRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GridRef::parse_str(s)
    }
}

impl TryFrom<String> for GridRef {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        GridRef::parse_str(&value)
    }
}

impl From<GridRef> for String {
    fn from(value: GridRef) -> Self {
        value.to_string()
    }
}

impl Display for GridRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let e100 = square_index(self.grid.easting);
        let n100 = square_index(self.grid.northing);
        // Construction guarantees the square exists
        let [first, second] = square_letters(e100, n100).ok_or(std::fmt::Error)?;

        write!(f, "{}{}", char::from(first), char::from(second))?;

        if self.digits > 0 {
            let unit = unit(self.digits);
            #[allow(clippy::cast_possible_truncation)]
            let x = ((self.grid.easting - f64::from(e100) * SQUARE) / unit).round() as i64;
            #[allow(clippy::cast_possible_truncation)]
            let y = ((self.grid.northing - f64::from(n100) * SQUARE) / unit).round() as i64;

            write!(f, " {x:0width$} {y:0width$}", width = self.digits)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_squares() {
        assert_eq!(square_letters(0, 0), Some(*b"SV"));
        assert_eq!(square_letters(4, 12), Some(*b"HP"));
        assert_eq!(square_letters(6, 12), Some(*b"JM"));
        assert_eq!(square_letters(5, 1), Some(*b"TQ"));
        assert_eq!(square_letters(1, 9), Some(*b"NB"));
        assert_eq!(square_letters(7, 0), None);
        assert_eq!(square_letters(0, 13), None);
        assert_eq!(square_letters(-1, 0), None);
    }

    #[test]
    fn every_square_round_trips() {
        let (max_e, max_n) = max_squares();
        for e100 in 0..max_e {
            for n100 in 0..max_n {
                let [first, second] = square_letters(e100, n100).unwrap();
                assert_eq!(square_index_from_letters(first, second), Some((e100, n100)));
            }
        }
    }

    #[test]
    fn zero_padded_output() {
        let gridref = GridRef::parse_str("SV0123400567").unwrap();
        assert_eq!(gridref.easting(), 1234.);
        assert_eq!(gridref.northing(), 567.);
        assert_eq!(gridref.to_string(), "SV 01234 00567");
    }

    #[test]
    fn string_conversions_are_checked() {
        let gridref = GridRef::try_from("tq 300 800".to_owned()).unwrap();
        assert_eq!(String::from(gridref), "TQ 300 800");

        assert!(GridRef::try_from("ZZ 123 456".to_owned()).is_err());
    }

    #[test]
    fn rejects_non_digits() {
        assert!(GridRef::parse_str("TG 5140x 13177").is_err());
        assert!(GridRef::parse_str("T").is_err());
        assert!(GridRef::parse_str("TG 123456 123456").is_err());
    }
}
