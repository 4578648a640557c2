use satgeo_core::CoreError;
use satgeo_linear::LinearError;
use thiserror::Error;

/// Errors raised by the stereo geometry operations.
#[derive(Debug, Error)]
pub enum StereoError {
    /// Paired point batches differ in length.
    #[error("mismatched batch lengths: {left} vs {right}")]
    MismatchedLengths { left: usize, right: usize },
    /// A polygon without any usable vertex.
    #[error("polygon has no finite vertices")]
    EmptyPolygon,
    /// A rectifying or pointing-correction matrix is not invertible.
    #[error("homography is singular")]
    SingularHomography,
    /// The camera maps the region to non-finite image coordinates.
    #[error("camera model is undefined over the region")]
    UndefinedProjection,
    /// Raster data does not match its declared size.
    #[error("raster of {width}x{height} needs {expected} samples, got {got}")]
    InvalidRaster {
        width: usize,
        height: usize,
        expected: usize,
        got: usize,
    },
    /// Declared raster size overflows the address space.
    #[error("raster of {width}x{height} is too large")]
    RasterTooLarge { width: usize, height: usize },
    #[error(transparent)]
    Linear(#[from] LinearError),
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Errors raised while reading a polygon from GeoJSON or KML.
#[derive(Debug, Error)]
pub enum PolygonError {
    #[error("failed to read polygon file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid GeoJSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Top-level GeoJSON type other than FeatureCollection, Feature or Polygon.
    #[error("unsupported GeoJSON type {0:?}")]
    UnsupportedType(String),
    #[error("polygon has no coordinates")]
    MissingCoordinates,
    #[error("invalid coordinate {0:?}")]
    InvalidCoordinate(String),
    /// File extension other than `.json`, `.geojson` or `.kml`.
    #[error("unknown polygon file format: {0}")]
    UnknownFormat(String),
}
