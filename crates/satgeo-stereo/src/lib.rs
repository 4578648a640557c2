//! Stereo geometry on top of satellite camera models.
//!
//! - [`triangulate_heights`]: altitude of matched pixel pairs by fixed-point
//!   iteration along the ray of the first view,
//! - [`AltitudeRangeEstimator`]: altitude search range of an ROI from elevation
//!   data or the camera's own validity range, and its conversion to a
//!   rectified disparity range,
//! - ROI utilities: polygon/UTM rectangle to image ROI, corresponding ROI in
//!   the other view, synthetic tie points,
//! - polygon readers for GeoJSON and KML.
//!
//! Every function takes its collaborators explicitly; nothing here keeps
//! state between calls.

mod config;
mod elevation;
mod error;
mod polygon;
mod range;
mod roi;
mod triangulation;

pub use config::*;
pub use elevation::*;
pub use error::*;
pub use polygon::*;
pub use range::*;
pub use roi::*;
pub use triangulation::*;
