//! Mathematical type aliases and homogeneous-coordinate helpers.

use nalgebra::{Matrix3, Matrix3x4, Matrix4, Point2, Point3, Vector2, Vector3, Vector4};

/// Scalar type used throughout the workspace (currently `f64`).
pub type Real = f64;

/// 2D vector with [`Real`] components.
pub type Vec2 = Vector2<Real>;
/// 3D vector with [`Real`] components.
pub type Vec3 = Vector3<Real>;
/// 4D vector with [`Real`] components.
pub type Vec4 = Vector4<Real>;
/// 2D point with [`Real`] coordinates.
pub type Pt2 = Point2<Real>;
/// 3D point with [`Real`] coordinates.
pub type Pt3 = Point3<Real>;
/// 3×3 matrix with [`Real`] entries (homographies, 2D normalizations).
pub type Mat3 = Matrix3<Real>;
/// 4×4 matrix with [`Real`] entries (3D normalizations).
pub type Mat4 = Matrix4<Real>;
/// 3×4 projective camera matrix.
pub type Mat34 = Matrix3x4<Real>;

/// Lift a 2D point to homogeneous coordinates `(x, y, 1)`.
pub fn to_homogeneous(p: &Pt2) -> Vec3 {
    Vec3::new(p.x, p.y, 1.0)
}

/// Lift a 3D point to homogeneous coordinates `(x, y, z, 1)`.
pub fn to_homogeneous_3d(p: &Pt3) -> Vec4 {
    Vec4::new(p.x, p.y, p.z, 1.0)
}

/// Divide a homogeneous 3-vector by its last component.
///
/// The caller is responsible for ensuring that `w != 0`; a zero `w` yields
/// non-finite coordinates.
pub fn from_homogeneous(v: &Vec3) -> Pt2 {
    Pt2::new(v.x / v.z, v.y / v.z)
}

/// Apply a 3×3 homography to a single point.
pub fn apply_homography(h: &Mat3, p: &Pt2) -> Pt2 {
    from_homogeneous(&(h * to_homogeneous(p)))
}

/// Project a 3D point through a 3×4 camera matrix.
pub fn project_point(p: &Mat34, x: &Pt3) -> Pt2 {
    from_homogeneous(&(p * to_homogeneous_3d(x)))
}

/// Build a [`Mat3`] from a row-major nested array.
pub fn mat3_from_rows(rows: &[[Real; 3]; 3]) -> Mat3 {
    Mat3::from_fn(|r, c| rows[r][c])
}

/// Build a [`Mat34`] from a row-major nested array.
pub fn mat34_from_rows(rows: &[[Real; 4]; 3]) -> Mat34 {
    Mat34::from_fn(|r, c| rows[r][c])
}

/// Row-major nested array view of a [`Mat34`] (for serialization).
pub fn mat34_to_rows(m: &Mat34) -> [[Real; 4]; 3] {
    let mut rows = [[0.0; 4]; 3];
    for (r, row) in rows.iter_mut().enumerate() {
        for (c, v) in row.iter_mut().enumerate() {
            *v = m[(r, c)];
        }
    }
    rows
}
