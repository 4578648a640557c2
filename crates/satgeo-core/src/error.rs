use thiserror::Error;

/// Errors raised while building core value types or camera models.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A region of interest with a non-positive extent.
    #[error("invalid roi: width and height must be positive, got {w}x{h}")]
    InvalidRoi { w: i64, h: i64 },
    /// A required RPC metadata key is missing.
    #[error("missing rpc tag `{0}`")]
    MissingTag(String),
    /// An RPC metadata value could not be parsed as a number.
    #[error("invalid value for rpc tag `{key}`: {value:?}")]
    InvalidTag { key: String, value: String },
    /// An RPC coefficient list does not have 20 entries.
    #[error("rpc tag `{key}` must hold 20 coefficients, got {got}")]
    WrongCoefficientCount { key: String, got: usize },
    /// A UTM zone string such as `"31N"` could not be parsed.
    #[error("invalid utm zone {0:?}")]
    InvalidUtmZone(String),
}
