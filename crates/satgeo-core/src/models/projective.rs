use nalgebra::{Matrix2, Vector2};

use crate::{project_point, CameraModel, Mat34, Pt2, Pt3, Real};

/// Pure projective camera acting directly on `(lon, lat, alt, 1)`.
///
/// `(col, row, 1) ~ P · (lon, lat, alt, 1)`. Localization inverts the two
/// image equations for `(lon, lat)` at a known altitude.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectiveModel {
    matrix: Mat34,
    alt_offset: Real,
    alt_scale: Real,
}

impl ProjectiveModel {
    pub fn new(matrix: Mat34, alt_offset: Real, alt_scale: Real) -> Self {
        Self {
            matrix,
            alt_offset,
            alt_scale,
        }
    }

    pub fn matrix(&self) -> &Mat34 {
        &self.matrix
    }
}

impl CameraModel for ProjectiveModel {
    fn localization(&self, pixel: &Pt2, alt: Real) -> Pt2 {
        let p = &self.matrix;
        let r0 = p.row(0) - p.row(2) * pixel.x;
        let r1 = p.row(1) - p.row(2) * pixel.y;

        let a = Matrix2::new(r0[0], r0[1], r1[0], r1[1]);
        let b = Vector2::new(-(r0[2] * alt + r0[3]), -(r1[2] * alt + r1[3]));
        match a.try_inverse() {
            Some(a_inv) => {
                let ll = a_inv * b;
                Pt2::new(ll.x, ll.y)
            }
            None => Pt2::new(Real::NAN, Real::NAN),
        }
    }

    fn projection(&self, lonlat: &Pt2, alt: Real) -> Pt2 {
        project_point(&self.matrix, &Pt3::new(lonlat.x, lonlat.y, alt))
    }

    fn alt_offset(&self) -> Real {
        self.alt_offset
    }

    fn alt_scale(&self) -> Real {
        self.alt_scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn localization_inverts_projection() {
        let p = Mat34::new(
            2.0e5, 0.0, 0.1, -2.0e5 * 10.0, //
            0.0, -2.0e5, 0.0, 2.0e5 * 45.0, //
            1.0e-3, 0.0, 0.0, 1.0 - 1.0e-2,
        );
        let cam = ProjectiveModel::new(p, 0.0, 100.0);
        let ll = Pt2::new(10.003, 44.996);
        let px = cam.projection(&ll, 42.0);
        let back = cam.localization(&px, 42.0);
        assert!((back - ll).norm() < 1e-10, "{back:?}");
    }

    #[test]
    fn degenerate_matrix_localizes_to_nan() {
        let p = Mat34::new(0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0);
        let cam = ProjectiveModel::new(p, 0.0, 1.0);
        let ll = cam.localization(&Pt2::new(3.0, 4.0), 10.0);
        assert!(ll.x.is_nan() && ll.y.is_nan());
    }
}
