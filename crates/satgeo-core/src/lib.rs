//! Core math, geodesy and camera-model primitives for `satgeo`.
//!
//! This crate contains:
//! - linear algebra type aliases (`Real`, `Pt2`, `Pt3`, `Mat34`, ...),
//! - pixel/geodetic/UTM value types (`Roi`, `GeodeticBBox`, `UtmZone`, ...),
//! - WGS84 geodesy (geocentric conversion, UTM projection),
//! - the [`CameraModel`] capability shared by RPC and projective cameras.
//!
//! Camera mapping:
//! `pixel = projection(lon, lat, alt)` and `(lon, lat) = localization(pixel, alt)`.
//!
//! Points in geodetic space are stored as [`Pt2`] with `x = lon`, `y = lat`
//! (degrees); altitudes are meters above the WGS84 ellipsoid.

mod error;
/// WGS84 geodesy and UTM projection.
pub mod geodesy;
/// Linear algebra type aliases and helpers.
pub mod math;
/// Camera models and the variant-selecting factory.
pub mod models;
/// Deterministic synthetic cameras for tests and examples.
pub mod synthetic;
/// Region-of-interest and bounding-box value types.
pub mod types;

pub use error::CoreError;
pub use geodesy::*;
pub use math::*;
pub use models::*;
pub use types::*;
