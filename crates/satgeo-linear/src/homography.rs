use crate::LinearError;
use satgeo_core::{apply_homography, Mat3, Pt2};

/// Map every point through `h`.
pub fn apply_homography_to_points(h: &Mat3, points: &[Pt2]) -> Vec<Pt2> {
    points.iter().map(|p| apply_homography(h, p)).collect()
}

/// Inverse of a 3×3 homography.
pub fn invert_homography(h: &Mat3) -> Result<Mat3, LinearError> {
    h.try_inverse().ok_or(LinearError::SingularTransform)
}

#[cfg(test)]
mod tests {
    use super::*;
    use satgeo_core::mat3_from_rows;

    #[test]
    fn inverse_undoes_mapping() {
        let h = mat3_from_rows(&[[1.02, 0.01, -35.0], [-0.003, 0.98, 12.0], [1e-6, 2e-6, 1.0]]);
        let pts = [Pt2::new(0.0, 0.0), Pt2::new(1500.0, 900.0), Pt2::new(-20.0, 3000.0)];
        let mapped = apply_homography_to_points(&h, &pts);
        let back = apply_homography_to_points(&invert_homography(&h).unwrap(), &mapped);
        for (a, b) in pts.iter().zip(&back) {
            assert!((a - b).norm() < 1e-8);
        }
    }

    #[test]
    fn singular_homography_is_rejected() {
        let h = mat3_from_rows(&[[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [0.0, 0.0, 1.0]]);
        assert!(matches!(
            invert_homography(&h),
            Err(LinearError::SingularTransform)
        ));
    }
}
