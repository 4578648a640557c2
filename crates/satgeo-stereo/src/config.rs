use satgeo_core::Real;
use serde::{Deserialize, Serialize};

/// Scale factor applied to `alt_scale` on the coarse altitude path.
pub const DEFAULT_ALT_RANGE_SCALE_FACTOR: Real = 1.0;
/// Altitude probe used to measure sensitivity in image B, meters.
pub const DEFAULT_HEIGHT_STEP: Real = 1.0;
/// Stop once every height increment is below this, in units of the probe step.
pub const DEFAULT_TOLERANCE: Real = 1e-3;
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Options for the altitude range estimator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeConfig {
    /// `k` in `alt_offset ± k · alt_scale` when no elevation data answers.
    #[serde(default = "default_alt_range_scale_factor")]
    pub alt_range_scale_factor: Real,
    /// Elevation heights are above the geoid and must be shifted to the
    /// ellipsoid.
    #[serde(default)]
    pub geoid_mode: bool,
}

impl Default for RangeConfig {
    fn default() -> Self {
        Self {
            alt_range_scale_factor: DEFAULT_ALT_RANGE_SCALE_FACTOR,
            geoid_mode: false,
        }
    }
}

fn default_alt_range_scale_factor() -> Real {
    DEFAULT_ALT_RANGE_SCALE_FACTOR
}

/// Iteration budget of the height triangulation solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriangulationOptions {
    pub max_iterations: usize,
    pub tolerance: Real,
    pub height_step: Real,
}

impl Default for TriangulationOptions {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
            height_step: DEFAULT_HEIGHT_STEP,
        }
    }
}

/// Top-level stereo configuration, typically read from JSON.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StereoConfig {
    #[serde(default)]
    pub range: RangeConfig,
    #[serde(default)]
    pub triangulation: TriangulationOptions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_yields_defaults() {
        let cfg: StereoConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, StereoConfig::default());
        assert_eq!(cfg.triangulation.max_iterations, 100);
        assert_eq!(cfg.range.alt_range_scale_factor, 1.0);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let cfg: StereoConfig = serde_json::from_str(
            r#"{ "range": { "geoid_mode": true }, "triangulation": { "tolerance": 0.01 } }"#,
        )
        .unwrap();
        assert!(cfg.range.geoid_mode);
        assert_eq!(cfg.range.alt_range_scale_factor, 1.0);
        assert_eq!(cfg.triangulation.tolerance, 0.01);
        assert_eq!(cfg.triangulation.height_step, 1.0);
    }
}
