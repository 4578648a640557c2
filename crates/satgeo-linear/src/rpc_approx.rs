//! Local projective approximation of a camera model.
//!
//! Samples the image/altitude volume, localizes every sample, lifts the
//! ground points to WGS84 geocentric coordinates and fits a 3×4 matrix with
//! the normalized DLT. Stereo pipelines use the result as a pinhole stand-in
//! for an RPC camera over a small tile.

use crate::{estimate_camera_matrix, generate_point_mesh, mean_reprojection_error, SampleRange};
use anyhow::{Context, Result};
use log::debug;
use satgeo_core::{lonlat_to_geocentric, CameraModel, Mat34, Pt3, Real};

/// Fitted matrix and its mean reprojection error over the sampling mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionApproximation {
    /// Maps homogeneous geocentric `(X, Y, Z, 1)` to homogeneous pixels.
    pub matrix: Mat34,
    /// Mean pixel distance between the model and the fit at the mesh points.
    pub mean_error: Real,
}

/// Fit a geocentric projection matrix to `camera` over the given sampling.
///
/// Mesh samples whose localization is not finite are skipped.
pub fn approximate_projection_matrix<C: CameraModel + ?Sized>(
    camera: &C,
    cols: &SampleRange,
    rows: &SampleRange,
    alts: &SampleRange,
) -> Result<ProjectionApproximation> {
    let mesh = generate_point_mesh(cols, rows, alts);

    let (world, image): (Vec<Pt3>, Vec<_>) = mesh
        .points()
        .iter()
        .filter_map(|s| {
            let pixel = s.xy();
            let ll = camera.localization(&pixel, s.z);
            let xyz = lonlat_to_geocentric(ll.x, ll.y, s.z);
            xyz.iter()
                .all(|v| v.is_finite())
                .then(|| (Pt3::from(xyz), pixel))
        })
        .unzip();

    if world.len() < mesh.len() {
        debug!(
            "skipped {} mesh samples with undefined localization",
            mesh.len() - world.len()
        );
    }

    let matrix = estimate_camera_matrix(&world, &image)
        .context("projection matrix fit over the sampling mesh failed")?;
    let mean_error = mean_reprojection_error(&matrix, &world, &image);
    debug!(
        "projective approximation over {} samples: mean error {:.3e} px",
        world.len(),
        mean_error
    );

    Ok(ProjectionApproximation { matrix, mean_error })
}

#[cfg(test)]
mod tests {
    use super::*;
    use satgeo_core::synthetic;

    #[test]
    fn small_tile_is_nearly_projective() {
        let (left, _) = synthetic::stereo_pair();
        let approx = approximate_projection_matrix(
            &left,
            &SampleRange::new(600.0, 800.0, 5),
            &SampleRange::new(900.0, 1100.0, 5),
            &SampleRange::new(-100.0, 300.0, 5),
        )
        .unwrap();
        assert!(approx.mean_error < 0.05, "mean error {}", approx.mean_error);
    }

    #[test]
    fn too_sparse_a_mesh_is_rejected() {
        let (left, _) = synthetic::stereo_pair();
        let res = approximate_projection_matrix(
            &left,
            &SampleRange::new(0.0, 1500.0, 2),
            &SampleRange::new(0.0, 2200.0, 2),
            &SampleRange::new(0.0, 0.0, 1),
        );
        assert!(res.is_err());
    }
}
