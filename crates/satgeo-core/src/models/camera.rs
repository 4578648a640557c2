use crate::{Pt2, Real};

/// Pixel ↔ ground mapping of a satellite image.
///
/// Geodetic points are `Pt2 { x: lon, y: lat }` in degrees, pixels are
/// `Pt2 { x: col, y: row }`, altitudes are meters above the WGS84 ellipsoid.
/// Implementations return non-finite coordinates when a mapping is
/// undefined rather than panicking.
pub trait CameraModel {
    /// Ground point `(lon, lat)` imaged at `pixel` for the given altitude.
    fn localization(&self, pixel: &Pt2, alt: Real) -> Pt2;

    /// Pixel `(col, row)` where the ground point `(lon, lat, alt)` is imaged.
    fn projection(&self, lonlat: &Pt2, alt: Real) -> Pt2;

    /// Center of the model's nominal altitude range.
    fn alt_offset(&self) -> Real;

    /// Half-width of the model's nominal altitude range.
    fn alt_scale(&self) -> Real;

    /// Elementwise [`CameraModel::localization`] over a batch.
    fn localization_many(&self, pixels: &[Pt2], alts: &[Real]) -> Vec<Pt2> {
        pixels
            .iter()
            .zip(alts)
            .map(|(p, &a)| self.localization(p, a))
            .collect()
    }

    /// Elementwise [`CameraModel::projection`] over a batch.
    fn projection_many(&self, lonlats: &[Pt2], alts: &[Real]) -> Vec<Pt2> {
        lonlats
            .iter()
            .zip(alts)
            .map(|(p, &a)| self.projection(p, a))
            .collect()
    }
}

impl<C: CameraModel + ?Sized> CameraModel for &C {
    fn localization(&self, pixel: &Pt2, alt: Real) -> Pt2 {
        (**self).localization(pixel, alt)
    }

    fn projection(&self, lonlat: &Pt2, alt: Real) -> Pt2 {
        (**self).projection(lonlat, alt)
    }

    fn alt_offset(&self) -> Real {
        (**self).alt_offset()
    }

    fn alt_scale(&self) -> Real {
        (**self).alt_scale()
    }
}
