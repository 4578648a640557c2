//! Linear estimation for satellite camera geometry.
//!
//! - [`generate_point_mesh`]: regular `(col, row, alt)` sampling grids,
//! - [`estimate_camera_matrix`]: normalized DLT for a 3×4 projection matrix,
//! - [`approximate_projection_matrix`]: fit of a camera model by a projective
//!   camera in geocentric coordinates, with its reprojection error,
//! - homography helpers used for rectified-disparity computations.

mod camera_matrix;
mod homography;
pub mod math;
mod mesh;
mod rpc_approx;

pub use camera_matrix::*;
pub use homography::*;
pub use mesh::*;
pub use rpc_approx::*;

use thiserror::Error;

/// Errors raised by the linear estimators.
#[derive(Debug, Error)]
pub enum LinearError {
    /// Fewer correspondences than unknowns allow.
    #[error("need at least {needed} point correspondences, got {got}")]
    InsufficientCorrespondences { needed: usize, got: usize },
    /// World and image point lists differ in length.
    #[error("mismatched number of world points ({world}) and image points ({image})")]
    MismatchedLengths { world: usize, image: usize },
    /// The points do not constrain a unique solution.
    #[error("degenerate point configuration: {0}")]
    DegenerateGeometry(&'static str),
    /// The SVD did not produce right singular vectors.
    #[error("svd failed")]
    SvdFailed,
    /// A normalization or correction transform could not be inverted.
    #[error("transform is not invertible")]
    SingularTransform,
}
