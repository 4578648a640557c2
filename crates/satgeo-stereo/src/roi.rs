//! Conversions between ground regions and image regions of interest.

use log::debug;
use satgeo_core::{
    compute_utm_zone, lonlat_to_geocentric, lonlat_to_utm, utm_to_lonlat, CameraModel, Pt2, Pt3,
    Real, Roi, UtmBBox, UtmRoi, UtmZone,
};
use satgeo_linear::{generate_point_mesh, SampleRange};
use serde::{Deserialize, Serialize};

use crate::{find_corresponding_point, AltitudeRange, AltitudeRangeEstimator, StereoError};

/// Altitude margins around the estimated range when sampling tie points.
const MATCH_MARGIN_TOP: Real = 100.0;
const MATCH_MARGIN_BOTTOM: Real = -100.0;

/// Image ROI of a ground polygon together with the UTM frame it was
/// measured in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoiProcessResult {
    pub roi: Roi,
    pub utm_zone: UtmZone,
    /// Bounding box of the polygon vertices in `utm_zone`.
    pub utm_bbox: UtmBBox,
}

/// A pair of pixels seeing the same ground point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TiePoint {
    pub left: Pt2,
    pub right: Pt2,
}

/// Image ROI covering a `(lon, lat)` polygon projected at the camera's
/// altitude offset.
///
/// The UTM zone defaults to the one containing the mean vertex.
pub fn polygon_to_roi<C: CameraModel + ?Sized>(
    camera: &C,
    polygon: &[Pt2],
    utm_zone: Option<UtmZone>,
) -> Result<RoiProcessResult, StereoError> {
    if polygon.is_empty() || polygon.iter().any(|p| !(p.x.is_finite() && p.y.is_finite())) {
        return Err(StereoError::EmptyPolygon);
    }

    let zone = match utm_zone {
        Some(zone) => zone,
        None => {
            let mean = polygon.iter().fold(Pt2::origin().coords, |acc, p| acc + p.coords)
                / polygon.len() as Real;
            compute_utm_zone(mean.x, mean.y)
        }
    };
    let utm_bbox = UtmBBox::from_points(polygon.iter().map(|p| lonlat_to_utm(p.x, p.y, &zone)))
        .ok_or(StereoError::EmptyPolygon)?;

    let alt = camera.alt_offset();
    let roi = Roi::enclosing(polygon.iter().map(|p| camera.projection(p, alt)))
        .ok_or(StereoError::UndefinedProjection)?;
    debug!("polygon of {} vertices in zone {zone} -> {roi:?}", polygon.len());

    Ok(RoiProcessResult {
        roi,
        utm_zone: zone,
        utm_bbox,
    })
}

/// Image ROI covering a UTM rectangle projected at the camera's altitude
/// offset.
pub fn utm_roi_to_image_roi<C: CameraModel + ?Sized>(
    camera: &C,
    utm_roi: &UtmRoi,
) -> Result<Roi, StereoError> {
    let alt = camera.alt_offset();
    Roi::enclosing(utm_roi.corners().iter().map(|c| {
        let ll = utm_to_lonlat(c.x, c.y, &utm_roi.zone);
        camera.projection(&ll, alt)
    }))
    .ok_or(StereoError::UndefinedProjection)
}

/// ROI of view B seeing the same ground as `roi` in view A.
///
/// The 8 vertices of `roi` times the altitude range of A are mapped into B
/// and their bounding box is rounded to whole pixels.
pub fn corresponding_roi<A, B>(
    a: &A,
    b: &B,
    roi: &Roi,
    estimator: &AltitudeRangeEstimator<'_>,
) -> Result<Roi, StereoError>
where
    A: CameraModel + ?Sized,
    B: CameraModel + ?Sized,
{
    let range = estimator.altitude_range(a, roi, 0.0, 0.0).range;
    Roi::rounded(
        roi.prism_vertices(range.min, range.max)
            .iter()
            .map(|v| find_corresponding_point(a, b, &v.xy(), v.z)),
    )
    .ok_or(StereoError::UndefinedProjection)
}

/// `n³` ground points `(lon, lat, alt)` imaged inside `roi`.
///
/// Pixels are sampled on an `n × n` grid inset by `1/(2n)` of the ROI size,
/// so successive `n` do not keep hitting the corners, and altitudes on `n`
/// levels spanning `range`.
pub fn ground_control_points<C: CameraModel + ?Sized>(
    camera: &C,
    roi: &Roi,
    range: &AltitudeRange,
    n: usize,
) -> Vec<Pt3> {
    let inset = |origin: i64, size: i64| {
        let (o, s, k) = (origin as Real, size as Real, n as Real);
        SampleRange::new(o + s / (2.0 * k), o + (2.0 * k - 1.0) * s / (2.0 * k), n)
    };
    let mesh = generate_point_mesh(
        &inset(roi.x, roi.w),
        &inset(roi.y, roi.h),
        &SampleRange::new(range.min, range.max, n),
    );
    let alts = mesh.alts();
    camera
        .localization_many(&mesh.pixels(), &alts)
        .iter()
        .zip(&alts)
        .map(|(ll, &z)| Pt3::new(ll.x, ll.y, z))
        .collect()
}

/// `n³` synthetic tie points between the two views over `roi`.
///
/// Ground control points are drawn in the altitude range of `roi` widened
/// by 100 m on both ends and projected into both cameras.
pub fn synthesize_matches<A, B>(
    a: &A,
    b: &B,
    roi: &Roi,
    n: usize,
    estimator: &AltitudeRangeEstimator<'_>,
) -> Vec<TiePoint>
where
    A: CameraModel + ?Sized,
    B: CameraModel + ?Sized,
{
    let range = estimator
        .altitude_range(a, roi, MATCH_MARGIN_TOP, MATCH_MARGIN_BOTTOM)
        .range;
    let gcps = ground_control_points(a, roi, &range, n);
    let lonlats: Vec<Pt2> = gcps.iter().map(|g| g.xy()).collect();
    let alts: Vec<Real> = gcps.iter().map(|g| g.z).collect();
    a.projection_many(&lonlats, &alts)
        .into_iter()
        .zip(b.projection_many(&lonlats, &alts))
        .map(|(left, right)| TiePoint { left, right })
        .collect()
}

/// UTM zone of the ground seen at the ROI center at the camera's altitude
/// offset.
pub fn utm_zone_for_roi<C: CameraModel + ?Sized>(camera: &C, roi: &Roi) -> Result<UtmZone, StereoError> {
    let ll = camera.localization(&roi.center(), camera.alt_offset());
    if !(ll.x.is_finite() && ll.y.is_finite()) {
        return Err(StereoError::UndefinedProjection);
    }
    Ok(compute_utm_zone(ll.x, ll.y))
}

/// Ground distance in meters between the footprints of pixels `(0, 0)` and
/// `(1, 0)` at altitude zero.
pub fn ground_sample_distance<C: CameraModel + ?Sized>(camera: &C) -> Real {
    let a = camera.localization(&Pt2::new(0.0, 0.0), 0.0);
    let b = camera.localization(&Pt2::new(1.0, 0.0), 0.0);
    (lonlat_to_geocentric(b.x, b.y, 0.0) - lonlat_to_geocentric(a.x, a.y, 0.0)).norm()
}
