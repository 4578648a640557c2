//! Pixel-space and map-space value types.
//!
//! All types here are plain values: constructed per call and never shared
//! through global state. A [`Roi`] lives in image pixel space, a
//! [`GeodeticBBox`] in lon/lat degrees, and [`UtmBBox`]/[`UtmRoi`] in the
//! easting/northing meters of a given [`UtmZone`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CoreError, Pt2, Pt3, Real};

/// Rectangular region of interest in pixel space.
///
/// `(x, y)` is the top-left corner, `(w, h)` the extent. [`Roi::new`] enforces
/// `w > 0` and `h > 0`; the bounding-box constructors never produce an empty
/// region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Roi {
    pub x: i64,
    pub y: i64,
    pub w: i64,
    pub h: i64,
}

impl Roi {
    pub fn new(x: i64, y: i64, w: i64, h: i64) -> Result<Self, CoreError> {
        if w <= 0 || h <= 0 {
            return Err(CoreError::InvalidRoi { w, h });
        }
        Ok(Self { x, y, w, h })
    }

    /// Corners in the order top-left, top-right, bottom-right, bottom-left.
    pub fn corners(&self) -> [Pt2; 4] {
        let (x0, y0) = (self.x as Real, self.y as Real);
        let (x1, y1) = ((self.x + self.w) as Real, (self.y + self.h) as Real);
        [
            Pt2::new(x0, y0),
            Pt2::new(x1, y0),
            Pt2::new(x1, y1),
            Pt2::new(x0, y1),
        ]
    }

    pub fn center(&self) -> Pt2 {
        Pt2::new(
            self.x as Real + 0.5 * self.w as Real,
            self.y as Real + 0.5 * self.h as Real,
        )
    }

    /// The 8 vertices of the prism `{roi} × [alt_lo, alt_hi]` as `(col, row, alt)`.
    ///
    /// Order: for each of the columns `x`, `x + w`, rows `y`, `y + h`, the
    /// low altitude comes before the high one.
    pub fn prism_vertices(&self, alt_lo: Real, alt_hi: Real) -> [Pt3; 8] {
        let (x0, y0) = (self.x as Real, self.y as Real);
        let (x1, y1) = ((self.x + self.w) as Real, (self.y + self.h) as Real);
        [
            Pt3::new(x0, y0, alt_lo),
            Pt3::new(x0, y0, alt_hi),
            Pt3::new(x0, y1, alt_lo),
            Pt3::new(x0, y1, alt_hi),
            Pt3::new(x1, y0, alt_lo),
            Pt3::new(x1, y0, alt_hi),
            Pt3::new(x1, y1, alt_lo),
            Pt3::new(x1, y1, alt_hi),
        ]
    }

    /// Smallest integer ROI enclosing all points (floor of the minimum, ceil
    /// of the maximum).
    ///
    /// Returns `None` for an empty input or if any coordinate is not finite.
    pub fn enclosing<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Pt2>,
    {
        let (min, max) = extent(points)?;
        let x = min.x.floor() as i64;
        let y = min.y.floor() as i64;
        let w = (max.x.ceil() as i64 - x).max(1);
        let h = (max.y.ceil() as i64 - y).max(1);
        Some(Self { x, y, w, h })
    }

    /// Bounding box of the points with every component rounded to the
    /// nearest integer.
    pub fn rounded<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Pt2>,
    {
        let (min, max) = extent(points)?;
        Some(Self {
            x: min.x.round() as i64,
            y: min.y.round() as i64,
            w: ((max.x - min.x).round() as i64).max(1),
            h: ((max.y - min.y).round() as i64).max(1),
        })
    }
}

fn extent<I>(points: I) -> Option<(Pt2, Pt2)>
where
    I: IntoIterator<Item = Pt2>,
{
    let mut it = points.into_iter();
    let first = it.next()?;
    let mut min = first;
    let mut max = first;
    let mut finite = first.x.is_finite() && first.y.is_finite();
    for p in it {
        finite &= p.x.is_finite() && p.y.is_finite();
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    finite.then_some((min, max))
}

/// Axis-aligned bounding box in geodetic coordinates (degrees).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeodeticBBox {
    pub lon_min: Real,
    pub lon_max: Real,
    pub lat_min: Real,
    pub lat_max: Real,
}

impl GeodeticBBox {
    /// Bounding box of `(lon, lat)` points. Longitudes crossing the
    /// antimeridian are not unwrapped.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Pt2>,
    {
        let (min, max) = extent(points)?;
        Some(Self {
            lon_min: min.x,
            lon_max: max.x,
            lat_min: min.y,
            lat_max: max.y,
        })
    }

    /// Box center as `(lon, lat)`.
    pub fn center(&self) -> Pt2 {
        Pt2::new(
            0.5 * (self.lon_min + self.lon_max),
            0.5 * (self.lat_min + self.lat_max),
        )
    }
}

/// Hemisphere of a UTM zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hemisphere {
    North,
    South,
}

/// UTM zone identifier, written as e.g. `"31N"` or `"18S"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UtmZone {
    /// Zone number in `1..=60`.
    pub number: u8,
    pub hemisphere: Hemisphere,
}

impl UtmZone {
    pub fn new(number: u8, hemisphere: Hemisphere) -> Result<Self, CoreError> {
        if !(1..=60).contains(&number) {
            return Err(CoreError::InvalidUtmZone(format!("{number}")));
        }
        Ok(Self { number, hemisphere })
    }

    /// Longitude of the zone's central meridian, in degrees.
    pub fn central_meridian(&self) -> Real {
        6.0 * self.number as Real - 183.0
    }
}

impl fmt::Display for UtmZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = match self.hemisphere {
            Hemisphere::North => 'N',
            Hemisphere::South => 'S',
        };
        write!(f, "{}{}", self.number, h)
    }
}

impl FromStr for UtmZone {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let bad = || CoreError::InvalidUtmZone(s.to_string());
        let last = s.chars().last().ok_or_else(bad)?;
        let digits = &s[..s.len() - last.len_utf8()];
        let hemisphere = match last.to_ascii_uppercase() {
            'N' => Hemisphere::North,
            'S' => Hemisphere::South,
            _ => return Err(bad()),
        };
        let number: u8 = digits.parse().map_err(|_| bad())?;
        Self::new(number, hemisphere).map_err(|_| bad())
    }
}

impl TryFrom<String> for UtmZone {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<UtmZone> for String {
    fn from(zone: UtmZone) -> Self {
        zone.to_string()
    }
}

/// Bounding box in UTM easting/northing meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UtmBBox {
    pub east_min: Real,
    pub east_max: Real,
    pub north_min: Real,
    pub north_max: Real,
}

impl UtmBBox {
    /// Bounding box of `(easting, northing)` points.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Pt2>,
    {
        let (min, max) = extent(points)?;
        Some(Self {
            east_min: min.x,
            east_max: max.x,
            north_min: min.y,
            north_max: max.y,
        })
    }
}

/// Rectangle in a UTM frame: `(x, y)` is the `(easting, northing)` origin
/// and `(w, h)` the extent in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UtmRoi {
    pub zone: UtmZone,
    pub x: Real,
    pub y: Real,
    pub w: Real,
    pub h: Real,
}

impl UtmRoi {
    /// Corners `(x, y)`, `(x + w, y)`, `(x + w, y + h)`, `(x, y + h)`.
    pub fn corners(&self) -> [Pt2; 4] {
        [
            Pt2::new(self.x, self.y),
            Pt2::new(self.x + self.w, self.y),
            Pt2::new(self.x + self.w, self.y + self.h),
            Pt2::new(self.x, self.y + self.h),
        ]
    }
}
