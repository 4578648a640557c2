//! Normalized DLT for the 3×4 projection matrix `P`.
//!
//! Each correspondence `X ↔ x` contributes the two independent rows of the
//! cross product `x × (P X) = 0`:
//!
//! ```text
//! [ 0ᵀ   -Xᵀ   y·Xᵀ ]
//! [ Xᵀ    0ᵀ  -x·Xᵀ ]  · vec(P) = 0
//! ```
//!
//! Both point sets are Hartley-normalized first, the right singular vector of
//! the smallest singular value gives `Pn`, and `P = T⁻¹ · Pn · U`.

use crate::math::{mat34_from_svd_row, normalize_points_2d, normalize_points_3d};
use crate::LinearError;
use log::trace;
use nalgebra::DMatrix;
use satgeo_core::{project_point, Mat34, Pt2, Pt3, Real};

/// Six correspondences give twelve equations for the eleven degrees of
/// freedom of `P`.
pub const MIN_CORRESPONDENCES: usize = 6;

/// Relative magnitude below which the second-smallest singular value means
/// the nullspace is not one-dimensional.
const RANK_TOLERANCE: Real = 1e-10;

/// Estimate `P` (up to scale) from world/image correspondences.
///
/// `world` may be in any metric frame; geocentric coordinates with their large
/// offsets are handled by the normalization. Fails on fewer than
/// [`MIN_CORRESPONDENCES`] points, on mismatched lengths, and on
/// configurations (coincident or coplanar world points) that do not
/// determine `P` uniquely.
pub fn estimate_camera_matrix(world: &[Pt3], image: &[Pt2]) -> Result<Mat34, LinearError> {
    let n = world.len();
    if n != image.len() {
        return Err(LinearError::MismatchedLengths {
            world: n,
            image: image.len(),
        });
    }
    if n < MIN_CORRESPONDENCES {
        return Err(LinearError::InsufficientCorrespondences {
            needed: MIN_CORRESPONDENCES,
            got: n,
        });
    }

    let (world_n, u) = normalize_points_3d(world)
        .ok_or(LinearError::DegenerateGeometry("world points are coincident"))?;
    let (image_n, t) = normalize_points_2d(image)
        .ok_or(LinearError::DegenerateGeometry("image points are coincident"))?;

    let mut a = DMatrix::<Real>::zeros(2 * n, 12);
    for (i, (pw, pi)) in world_n.iter().zip(&image_n).enumerate() {
        let xh = pw.to_homogeneous();
        let (r0, r1) = (2 * i, 2 * i + 1);
        for k in 0..4 {
            a[(r0, 4 + k)] = -xh[k];
            a[(r0, 8 + k)] = pi.y * xh[k];
            a[(r1, k)] = xh[k];
            a[(r1, 8 + k)] = -pi.x * xh[k];
        }
    }

    let svd = a.svd(false, true);
    let v_t = svd.v_t.ok_or(LinearError::SvdFailed)?;

    let mut sv: Vec<Real> = svd.singular_values.iter().copied().collect();
    let min_idx = sv
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i)
        .ok_or(LinearError::SvdFailed)?;
    sv.sort_by(|a, b| b.total_cmp(a));
    trace!("dlt singular values: {:?}", sv);
    if sv.len() < 12 || sv[10] <= RANK_TOLERANCE * sv[0] {
        return Err(LinearError::DegenerateGeometry(
            "world points do not span three dimensions",
        ));
    }

    let p_norm = mat34_from_svd_row(&v_t, min_idx);
    let t_inv = t.try_inverse().ok_or(LinearError::SingularTransform)?;
    Ok(t_inv * p_norm * u)
}

/// Pixel distance between `P · X` and the observed `x` for each pair.
pub fn reprojection_errors(p: &Mat34, world: &[Pt3], image: &[Pt2]) -> Vec<Real> {
    world
        .iter()
        .zip(image)
        .map(|(w, x)| (project_point(p, w) - x).norm())
        .collect()
}

/// Mean of [`reprojection_errors`]; `0` for empty input.
pub fn mean_reprojection_error(p: &Mat34, world: &[Pt3], image: &[Pt2]) -> Real {
    let errs = reprojection_errors(p, world, image);
    if errs.is_empty() {
        return 0.0;
    }
    errs.iter().sum::<Real>() / errs.len() as Real
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use satgeo_core::mat34_from_rows;

    fn ground_truth() -> Mat34 {
        mat34_from_rows(&[
            [800.0, 12.0, 320.0, 1500.0],
            [-5.0, 790.0, 240.0, -300.0],
            [0.01, -0.02, 1.0, 10.0],
        ])
    }

    fn scene() -> Vec<Pt3> {
        let mut pts = Vec::new();
        for i in 0..4 {
            for j in 0..3 {
                for k in 0..2 {
                    pts.push(Pt3::new(
                        -1.5 + i as Real + 0.1 * j as Real,
                        -1.0 + j as Real,
                        2.0 + 1.5 * k as Real + 0.05 * i as Real,
                    ));
                }
            }
        }
        pts
    }

    fn same_up_to_scale(a: &Mat34, b: &Mat34) -> Real {
        let a = a / a.norm();
        let b = b / b.norm();
        (a - b).norm().min((a + b).norm())
    }

    #[test]
    fn recovers_exact_projection() {
        let p = ground_truth();
        let world = scene();
        let image: Vec<Pt2> = world.iter().map(|w| project_point(&p, w)).collect();

        let est = estimate_camera_matrix(&world, &image).unwrap();
        assert!(same_up_to_scale(&est, &p) < 1e-9);
        assert!(mean_reprojection_error(&est, &world, &image) < 1e-6);
    }

    #[test]
    fn invariant_to_scale_of_input_matrix() {
        let p = ground_truth();
        let world = scene();
        let image: Vec<Pt2> = world.iter().map(|w| project_point(&(p * -37.0), w)).collect();

        let est = estimate_camera_matrix(&world, &image).unwrap();
        for e in reprojection_errors(&est, &world, &image) {
            assert!(e < 1e-6);
        }
    }

    #[test]
    fn recovers_projection_from_random_scene() {
        let mut rng = StdRng::seed_from_u64(0x5a7);
        let p = ground_truth();
        let world: Vec<Pt3> = (0..40)
            .map(|_| {
                Pt3::new(
                    rng.random_range(-2.0..2.0),
                    rng.random_range(-2.0..2.0),
                    rng.random_range(2.0..6.0),
                )
            })
            .collect();
        let image: Vec<Pt2> = world.iter().map(|w| project_point(&p, w)).collect();

        let est = estimate_camera_matrix(&world, &image).unwrap();
        assert!(same_up_to_scale(&est, &p) < 1e-9);
    }

    #[test]
    fn rejects_too_few_points() {
        let world = scene();
        let image: Vec<Pt2> = world.iter().map(|w| project_point(&ground_truth(), w)).collect();
        let err = estimate_camera_matrix(&world[..5], &image[..5]).unwrap_err();
        assert!(matches!(
            err,
            LinearError::InsufficientCorrespondences { needed: 6, got: 5 }
        ));
    }

    #[test]
    fn rejects_mismatched_lengths() {
        let world = scene();
        let image = vec![Pt2::new(0.0, 0.0); 7];
        assert!(matches!(
            estimate_camera_matrix(&world, &image),
            Err(LinearError::MismatchedLengths { .. })
        ));
    }

    #[test]
    fn rejects_coplanar_world_points() {
        let p = ground_truth();
        let world: Vec<Pt3> = scene().iter().map(|w| Pt3::new(w.x, w.y, 3.0)).collect();
        let image: Vec<Pt2> = world.iter().map(|w| project_point(&p, w)).collect();
        assert!(matches!(
            estimate_camera_matrix(&world, &image),
            Err(LinearError::DegenerateGeometry(_))
        ));
    }

    #[test]
    fn reprojection_error_of_empty_set_is_zero() {
        assert_eq!(mean_reprojection_error(&ground_truth(), &[], &[]), 0.0);
    }
}
