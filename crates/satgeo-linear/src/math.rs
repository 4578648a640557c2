//! Hartley normalization and nullspace extraction.
//!
//! Normalizing points before a DLT solve recenters them at the origin and
//! rescales them so that the mean distance to the origin is `√2` (2D) or
//! `√3` (3D). Without it the entries of the design matrix span many orders
//! of magnitude (pixels vs. meters vs. unit weights) and the smallest
//! singular vector is dominated by rounding noise.
//!
//! Reference: Hartley & Zisserman, *Multiple View Geometry*, 2nd ed.,
//! Algorithm 4.2.

use nalgebra::{DMatrix, SVector};
use satgeo_core::{Mat3, Mat34, Mat4, Pt2, Pt3, Real};

/// Centroid and isotropic scale bringing the mean radius to `√D`.
///
/// `None` for an empty set, coincident points or non-finite input.
fn similarity<const D: usize>(points: &[SVector<Real, D>]) -> Option<(SVector<Real, D>, Real)> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as Real;
    let centroid = points
        .iter()
        .fold(SVector::<Real, D>::zeros(), |acc, p| acc + p)
        / n;
    let mean_dist = points.iter().map(|p| (p - centroid).norm()).sum::<Real>() / n;

    if !mean_dist.is_finite() || mean_dist <= Real::EPSILON {
        return None;
    }
    Some((centroid, (D as Real).sqrt() / mean_dist))
}

/// Normalize 2D points; returns the points and `T` with `p_n = T · p`.
pub fn normalize_points_2d(points: &[Pt2]) -> Option<(Vec<Pt2>, Mat3)> {
    let coords: Vec<_> = points.iter().map(|p| p.coords).collect();
    let (c, s) = similarity(&coords)?;

    let t = Mat3::new(
        s, 0.0, -s * c.x, //
        0.0, s, -s * c.y, //
        0.0, 0.0, 1.0,
    );
    let normalized = coords.iter().map(|v| Pt2::from((v - c) * s)).collect();
    Some((normalized, t))
}

/// Normalize 3D points; returns the points and `U` with `X_n = U · X`.
pub fn normalize_points_3d(points: &[Pt3]) -> Option<(Vec<Pt3>, Mat4)> {
    let coords: Vec<_> = points.iter().map(|p| p.coords).collect();
    let (c, s) = similarity(&coords)?;

    let u = Mat4::new(
        s, 0.0, 0.0, -s * c.x, //
        0.0, s, 0.0, -s * c.y, //
        0.0, 0.0, s, -s * c.z, //
        0.0, 0.0, 0.0, 1.0,
    );
    let normalized = coords.iter().map(|v| Pt3::from((v - c) * s)).collect();
    Some((normalized, u))
}

/// Reshape row `row_idx` of a 12-column `Vᵀ` into a 3×4 matrix (row-major).
///
/// # Panics
///
/// Panics if `v_t` does not have 12 columns.
pub fn mat34_from_svd_row(v_t: &DMatrix<Real>, row_idx: usize) -> Mat34 {
    assert_eq!(v_t.ncols(), 12, "expected 12 columns for a 3x4 matrix");
    Mat34::from_fn(|r, c| v_t[(row_idx, 4 * r + c)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_2d_points_are_centered_at_radius_sqrt2() {
        let pts = [
            Pt2::new(1200.0, 340.0),
            Pt2::new(1800.0, 390.0),
            Pt2::new(1510.0, 2100.0),
            Pt2::new(40.0, 8.0),
        ];
        let (norm, t) = normalize_points_2d(&pts).unwrap();

        let c = norm.iter().fold(Pt2::origin().coords, |a, p| a + p.coords) / 4.0;
        assert!(c.norm() < 1e-12);
        let r = norm.iter().map(|p| p.coords.norm()).sum::<Real>() / 4.0;
        assert!((r - 2.0_f64.sqrt()).abs() < 1e-12);

        for (p, q) in pts.iter().zip(&norm) {
            let tp = t * p.to_homogeneous();
            assert!((tp.xy() / tp.z - q.coords).norm() < 1e-12);
        }
    }

    #[test]
    fn normalized_3d_points_match_transform() {
        let pts = [
            Pt3::new(4_201_000.0, 168_900.0, 4_780_100.0),
            Pt3::new(4_201_900.0, 169_200.0, 4_779_400.0),
            Pt3::new(4_200_500.0, 168_100.0, 4_780_900.0),
        ];
        let (norm, u) = normalize_points_3d(&pts).unwrap();

        let r = norm.iter().map(|p| p.coords.norm()).sum::<Real>() / 3.0;
        assert!((r - 3.0_f64.sqrt()).abs() < 1e-12);
        for (p, q) in pts.iter().zip(&norm) {
            let up = u * p.to_homogeneous();
            assert!((up.xyz() - q.coords).norm() < 1e-9);
        }
    }

    #[test]
    fn coincident_or_empty_sets_are_rejected() {
        assert!(normalize_points_2d(&[]).is_none());
        assert!(normalize_points_2d(&[Pt2::new(1.0, 1.0); 5]).is_none());
        assert!(normalize_points_3d(&[Pt3::new(Real::NAN, 0.0, 0.0)]).is_none());
    }

    #[test]
    fn svd_row_is_read_row_major() {
        let mut v_t = DMatrix::zeros(12, 12);
        for i in 0..12 {
            v_t[(11, i)] = (i + 1) as Real;
        }
        let m = mat34_from_svd_row(&v_t, 11);
        assert_eq!(m[(0, 3)], 4.0);
        assert_eq!(m[(1, 0)], 5.0);
        assert_eq!(m[(2, 3)], 12.0);
    }
}
