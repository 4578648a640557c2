//! Altitude and disparity search ranges for a region of interest.

use log::{debug, warn};
use satgeo_core::{CameraModel, GeodeticBBox, Mat3, Pt2, Real, Roi};
use satgeo_linear::{apply_homography_to_points, invert_homography};
use serde::{Deserialize, Serialize};

use crate::{find_corresponding_point, ElevationSource, GeoidModel, RangeConfig, StereoError};

/// Altitude interval in meters above the WGS84 ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AltitudeRange {
    pub min: Real,
    pub max: Real,
}

/// Where an altitude range came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeSource {
    /// Elevation data over the region.
    Exogenous,
    /// The camera model's own altitude validity range.
    Coarse,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AltitudeRangeEstimate {
    pub range: AltitudeRange,
    pub source: RangeSource,
}

/// Horizontal disparity interval in rectified pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisparityRange {
    pub min: Real,
    pub max: Real,
}

/// Rectifying homographies of a stereo pair, plus the optional pointing
/// correction of the secondary view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectification {
    pub h1: Mat3,
    pub h2: Mat3,
    /// Maps corrected pixels of view B to observed ones; its inverse is
    /// applied to B before rectification.
    pub pointing: Option<Mat3>,
}

impl Rectification {
    pub fn new(h1: Mat3, h2: Mat3) -> Self {
        Self {
            h1,
            h2,
            pointing: None,
        }
    }

    pub fn with_pointing(mut self, pointing: Mat3) -> Self {
        self.pointing = Some(pointing);
        self
    }
}

/// Lon/lat box of the ROI localized at both ends of the camera's nominal
/// altitude range `alt_offset ± alt_scale`.
///
/// `None` when the camera is undefined at one of the corners.
pub fn geodesic_bounding_box<C: CameraModel + ?Sized>(camera: &C, roi: &Roi) -> Option<GeodeticBBox> {
    let lo = camera.alt_offset() - camera.alt_scale();
    let hi = camera.alt_offset() + camera.alt_scale();
    GeodeticBBox::from_points(
        roi.prism_vertices(lo, hi)
            .iter()
            .map(|v| camera.localization(&v.xy(), v.z)),
    )
}

/// `alt_offset ± k · alt_scale`.
pub fn altitude_range_coarse<C: CameraModel + ?Sized>(camera: &C, k: Real) -> AltitudeRange {
    AltitudeRange {
        min: camera.alt_offset() - k * camera.alt_scale(),
        max: camera.alt_offset() + k * camera.alt_scale(),
    }
}

/// Altitude range estimation with optional elevation and geoid data.
///
/// Borrowed collaborators are only read, so one estimator can serve many
/// regions.
#[derive(Clone, Copy, Default)]
pub struct AltitudeRangeEstimator<'a> {
    pub config: RangeConfig,
    pub elevation: Option<&'a dyn ElevationSource>,
    pub geoid: Option<&'a dyn GeoidModel>,
}

impl<'a> AltitudeRangeEstimator<'a> {
    pub fn new(config: RangeConfig) -> Self {
        Self {
            config,
            elevation: None,
            geoid: None,
        }
    }

    pub fn with_elevation(mut self, elevation: &'a dyn ElevationSource) -> Self {
        self.elevation = Some(elevation);
        self
    }

    pub fn with_geoid(mut self, geoid: &'a dyn GeoidModel) -> Self {
        self.geoid = Some(geoid);
        self
    }

    /// Altitude range of the ground imaged inside `roi`.
    ///
    /// Uses the elevation source over [`geodesic_bounding_box`] when it has
    /// data there, shifted by the geoid height at the box center in geoid
    /// mode; otherwise falls back to [`altitude_range_coarse`] with the
    /// configured scale factor. `margin_bottom` (usually negative) is added
    /// to the lower bound and `margin_top` to the upper one.
    pub fn altitude_range<C: CameraModel + ?Sized>(
        &self,
        camera: &C,
        roi: &Roi,
        margin_top: Real,
        margin_bottom: Real,
    ) -> AltitudeRangeEstimate {
        let (range, source) = match self.exogenous_range(camera, roi) {
            Some(range) => (range, RangeSource::Exogenous),
            None => {
                warn!("using the coarse altitude range of the camera model over {roi:?}");
                (
                    altitude_range_coarse(camera, self.config.alt_range_scale_factor),
                    RangeSource::Coarse,
                )
            }
        };
        AltitudeRangeEstimate {
            range: AltitudeRange {
                min: range.min + margin_bottom,
                max: range.max + margin_top,
            },
            source,
        }
    }

    fn exogenous_range<C: CameraModel + ?Sized>(&self, camera: &C, roi: &Roi) -> Option<AltitudeRange> {
        let Some(elevation) = self.elevation else {
            debug!("no elevation source attached");
            return None;
        };
        let Some(bbox) = geodesic_bounding_box(camera, roi) else {
            warn!("camera model is undefined at a corner of {roi:?}, cannot bound it on the ground");
            return None;
        };
        let Some((mut min, mut max)) = elevation.height_range(&bbox) else {
            warn!("no elevation data over {bbox:?}");
            return None;
        };

        if self.config.geoid_mode {
            match self.geoid {
                Some(geoid) => {
                    let c = bbox.center();
                    let n = geoid.geoid_height(c.x, c.y);
                    debug!("geoid height {n:.2} m at ({:.5}, {:.5})", c.x, c.y);
                    min += n;
                    max += n;
                }
                None => warn!("geoid mode is enabled but no geoid model is attached"),
            }
        }
        Some(AltitudeRange { min, max })
    }

    /// Altitude range of `roi` converted to a disparity range between the
    /// rectified views.
    pub fn exogenous_disp_range<A, B>(
        &self,
        a: &A,
        b: &B,
        roi: &Roi,
        rect: &Rectification,
        margin_top: Real,
        margin_bottom: Real,
    ) -> Result<DisparityRange, StereoError>
    where
        A: CameraModel + ?Sized,
        B: CameraModel + ?Sized,
    {
        let est = self.altitude_range(a, roi, margin_top, margin_bottom);
        altitude_range_to_disp_range(a, b, roi, &est.range, rect)
    }
}

/// Rectified horizontal disparity of each pixel of view A assumed to see
/// the ground at the matching altitude.
pub fn alt_to_disp<A, B>(
    a: &A,
    b: &B,
    pixels: &[Pt2],
    alts: &[Real],
    rect: &Rectification,
) -> Result<Vec<Real>, StereoError>
where
    A: CameraModel + ?Sized,
    B: CameraModel + ?Sized,
{
    if pixels.len() != alts.len() {
        return Err(StereoError::MismatchedLengths {
            left: pixels.len(),
            right: alts.len(),
        });
    }

    let mut p2: Vec<Pt2> = pixels
        .iter()
        .zip(alts)
        .map(|(p, &h)| find_corresponding_point(a, b, p, h))
        .collect();
    if let Some(pointing) = &rect.pointing {
        let inv = invert_homography(pointing).map_err(|_| StereoError::SingularHomography)?;
        p2 = apply_homography_to_points(&inv, &p2);
    }

    let p1 = apply_homography_to_points(&rect.h1, pixels);
    let p2 = apply_homography_to_points(&rect.h2, &p2);
    Ok(p1.iter().zip(&p2).map(|(q1, q2)| q2.x - q1.x).collect())
}

/// Disparity range spanned by the 8 vertices of `roi × [range.min, range.max]`.
///
/// Only the prism vertices are sampled, so interior points of a strongly
/// non-linear pair may fall slightly outside the returned interval.
pub fn altitude_range_to_disp_range<A, B>(
    a: &A,
    b: &B,
    roi: &Roi,
    range: &AltitudeRange,
    rect: &Rectification,
) -> Result<DisparityRange, StereoError>
where
    A: CameraModel + ?Sized,
    B: CameraModel + ?Sized,
{
    let vertices = roi.prism_vertices(range.min, range.max);
    let pixels: Vec<Pt2> = vertices.iter().map(|v| v.xy()).collect();
    let alts: Vec<Real> = vertices.iter().map(|v| v.z).collect();

    let disp = alt_to_disp(a, b, &pixels, &alts, rect)?;
    if disp.iter().any(|d| !d.is_finite()) {
        return Err(StereoError::UndefinedProjection);
    }
    let min = disp.iter().copied().fold(Real::INFINITY, Real::min);
    let max = disp.iter().copied().fold(Real::NEG_INFINITY, Real::max);
    Ok(DisparityRange { min, max })
}
