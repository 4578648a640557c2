//! High-level entry crate for the `satgeo` toolbox.
//!
//! `satgeo` covers the projective-geometry core of a satellite stereo
//! pipeline: camera models (RPC and projective), height triangulation from
//! matched pixels, altitude and disparity search ranges, and conversions
//! between ground regions and image regions of interest.
//!
//! ## Triangulating matched pixels
//!
//! ```
//! use satgeo::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let (left, right) = satgeo::core::synthetic::stereo_pair();
//!
//! let p1 = Pt2::new(640.0, 1200.0);
//! let p2 = find_corresponding_point(&left, &right, &p1, 42.0);
//!
//! let report = triangulate_heights(&left, &right, &[p1], &[p2], &TriangulationOptions::default())?;
//! let h = report.estimates[0].height().unwrap();
//! assert!((h - 42.0).abs() < 1e-3);
//! # Ok(())
//! # }
//! ```
//!
//! ## Search ranges for an ROI
//!
//! ```
//! use satgeo::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let (left, right) = satgeo::core::synthetic::stereo_pair();
//! let roi = Roi::new(200, 300, 512, 512)?;
//!
//! // No elevation data attached: the camera's own altitude range is used.
//! let estimator = AltitudeRangeEstimator::new(RangeConfig::default());
//! let alt = estimator.altitude_range(&left, &roi, 0.0, 0.0);
//! assert_eq!(alt.source, RangeSource::Coarse);
//!
//! let other = corresponding_roi(&left, &right, &roi, &estimator)?;
//! assert!(other.w > 0 && other.h > 0);
//! # Ok(())
//! # }
//! ```

/// Math types, geodesy, and camera models.
pub mod core {
    pub use satgeo_core::*;
}

/// Normalized DLT, sampling meshes, and homography helpers.
pub mod linear {
    pub use satgeo_linear::*;
}

/// Triangulation, altitude/disparity ranges, ROI utilities, polygon readers.
pub mod stereo {
    pub use satgeo_stereo::*;
}

/// Commonly used types and functions.
pub mod prelude {
    pub use crate::core::{
        AnyCamera, CameraModel, CameraParams, GeodeticBBox, Mat3, Mat34, ProjectiveModel, Pt2,
        Pt3, Real, Roi, RpcModel, UtmBBox, UtmRoi, UtmZone,
    };

    pub use crate::linear::{
        approximate_projection_matrix, estimate_camera_matrix, generate_point_mesh,
        ProjectionApproximation, SampleRange,
    };

    pub use crate::stereo::{
        altitude_range_to_disp_range, corresponding_roi, find_corresponding_point,
        ground_control_points, polygon_to_roi, synthesize_matches, triangulate_heights,
        utm_roi_to_image_roi, AltitudeRange, AltitudeRangeEstimator, DemRaster, ElevationSource,
        HeightEstimate, RangeConfig, RangeSource, Rectification, StereoConfig,
        TriangulationOptions,
    };
}
