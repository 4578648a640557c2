//! Exogenous elevation data.
//!
//! [`ElevationSource`] answers min/max height queries over a geodetic box;
//! [`DemRaster`] implements it for an in-memory raster georeferenced with a
//! GDAL-style affine transform, gridded either in lon/lat degrees or in the
//! easting/northing of a UTM zone. [`GeoidModel`] gives the geoid undulation
//! used to bring geoid-referenced heights onto the ellipsoid.

use satgeo_core::{lonlat_to_utm, GeodeticBBox, Mat3, Pt2, Real, UtmZone};
use serde::{Deserialize, Serialize};

use crate::StereoError;

/// Source of terrain heights.
pub trait ElevationSource {
    /// Lowest and highest height inside `bbox`, or `None` when the source has
    /// no valid sample there.
    fn height_range(&self, bbox: &GeodeticBBox) -> Option<(Real, Real)>;
}

/// Geoid height above the WGS84 ellipsoid.
pub trait GeoidModel {
    fn geoid_height(&self, lon: Real, lat: Real) -> Real;
}

/// Geoid with the same undulation everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstantGeoid(pub Real);

impl GeoidModel for ConstantGeoid {
    fn geoid_height(&self, _lon: Real, _lat: Real) -> Real {
        self.0
    }
}

impl<F> GeoidModel for F
where
    F: Fn(Real, Real) -> Real,
{
    fn geoid_height(&self, lon: Real, lat: Real) -> Real {
        self(lon, lat)
    }
}

/// Affine pixel → map transform in GDAL coefficient order.
///
/// `lon = c[0] + col · c[1] + row · c[2]`, `lat = c[3] + col · c[4] + row · c[5]`,
/// with `(col, row)` measured from the top-left corner of the top-left pixel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform(pub [Real; 6]);

impl GeoTransform {
    /// North-up transform from the top-left corner and pixel size.
    pub fn north_up(lon0: Real, lat0: Real, dlon: Real, dlat: Real) -> Self {
        Self([lon0, dlon, 0.0, lat0, 0.0, -dlat])
    }

    fn matrix(&self) -> Mat3 {
        let c = &self.0;
        Mat3::new(
            c[1], c[2], c[0], //
            c[4], c[5], c[3], //
            0.0, 0.0, 1.0,
        )
    }

    /// Map coordinates of a (fractional) pixel position.
    pub fn apply(&self, pixel: &Pt2) -> Pt2 {
        let m = self.matrix();
        Pt2::from((m * pixel.to_homogeneous()).xy())
    }

    /// Pixel position of a map coordinate, `None` if the transform is singular.
    pub fn invert(&self, lonlat: &Pt2) -> Option<Pt2> {
        let inv = self.matrix().try_inverse()?;
        Some(Pt2::from((inv * lonlat.to_homogeneous()).xy()))
    }
}

/// Row-major elevation raster.
///
/// With `crs` unset the transform maps pixels to lon/lat degrees; with a UTM
/// zone it maps them to easting/northing meters in that zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemRaster {
    width: usize,
    height: usize,
    data: Vec<f32>,
    transform: GeoTransform,
    #[serde(default)]
    nodata: Option<f32>,
    #[serde(default)]
    crs: Option<UtmZone>,
}

impl DemRaster {
    pub fn new(
        width: usize,
        height: usize,
        data: Vec<f32>,
        transform: GeoTransform,
        nodata: Option<f32>,
    ) -> Result<Self, StereoError> {
        let raster = Self {
            width,
            height,
            data,
            transform,
            nodata,
            crs: None,
        };
        raster.validate()?;
        Ok(raster)
    }

    /// Interpret the transform as mapping to easting/northing in `zone`.
    pub fn with_utm_crs(mut self, zone: UtmZone) -> Self {
        self.crs = Some(zone);
        self
    }

    /// Check that the sample count matches the declared size; needed after
    /// deserialization.
    pub fn validate(&self) -> Result<(), StereoError> {
        let Some(expected) = self.width.checked_mul(self.height) else {
            return Err(StereoError::RasterTooLarge {
                width: self.width,
                height: self.height,
            });
        };
        if self.data.len() != expected {
            return Err(StereoError::InvalidRaster {
                width: self.width,
                height: self.height,
                expected,
                got: self.data.len(),
            });
        }
        Ok(())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn crs(&self) -> Option<&UtmZone> {
        self.crs.as_ref()
    }

    fn sample(&self, col: usize, row: usize) -> Option<f32> {
        let v = *self.data.get(row * self.width + col)?;
        if v.is_nan() || self.nodata == Some(v) {
            None
        } else {
            Some(v)
        }
    }

    /// Inclusive pixel window covering `bbox` plus one pixel past the far
    /// edge on each axis, clipped to the raster.
    fn window(&self, bbox: &GeodeticBBox) -> Option<(usize, usize, usize, usize)> {
        let corners = [
            Pt2::new(bbox.lon_min, bbox.lat_min),
            Pt2::new(bbox.lon_max, bbox.lat_min),
            Pt2::new(bbox.lon_max, bbox.lat_max),
            Pt2::new(bbox.lon_min, bbox.lat_max),
        ];
        let mut lo = Pt2::new(Real::INFINITY, Real::INFINITY);
        let mut hi = Pt2::new(Real::NEG_INFINITY, Real::NEG_INFINITY);
        for c in &corners {
            let map = match &self.crs {
                Some(zone) => lonlat_to_utm(c.x, c.y, zone),
                None => *c,
            };
            let px = self.transform.invert(&map)?;
            lo = Pt2::new(lo.x.min(px.x), lo.y.min(px.y));
            hi = Pt2::new(hi.x.max(px.x), hi.y.max(px.y));
        }
        if !(lo.x.is_finite() && lo.y.is_finite() && hi.x.is_finite() && hi.y.is_finite()) {
            return None;
        }

        let clip = |lo: Real, hi: Real, size: usize| -> Option<(usize, usize)> {
            let first = lo.floor().max(0.0);
            let last = (hi.floor() + 1.0).min(size as Real - 1.0);
            (size > 0 && first <= last).then(|| (first as usize, last as usize))
        };
        let (c0, c1) = clip(lo.x, hi.x, self.width)?;
        let (r0, r1) = clip(lo.y, hi.y, self.height)?;
        Some((c0, c1, r0, r1))
    }
}

impl ElevationSource for DemRaster {
    fn height_range(&self, bbox: &GeodeticBBox) -> Option<(Real, Real)> {
        let (c0, c1, r0, r1) = self.window(bbox)?;
        let mut range: Option<(f32, f32)> = None;
        for row in r0..=r1 {
            for col in c0..=c1 {
                if let Some(v) = self.sample(col, row) {
                    range = Some(match range {
                        Some((lo, hi)) => (lo.min(v), hi.max(v)),
                        None => (v, v),
                    });
                }
            }
        }
        range.map(|(lo, hi)| (lo as Real, hi as Real))
    }
}
