use std::collections::HashMap;

use log::debug;
use nalgebra::{Matrix2, Vector2};
use serde::{Deserialize, Serialize};

use crate::{CameraModel, CoreError, Pt2, Real};

const LOCALIZATION_MAX_ITERS: usize = 50;
const LOCALIZATION_TOL: Real = 1e-12;
const JACOBIAN_STEP: Real = 1e-6;

/// Rational polynomial camera (RPC00B term ordering).
///
/// Image coordinates are ratios of cubic polynomials in the normalized
/// ground coordinates `L = (lon - lon_offset) / lon_scale`,
/// `P = (lat - lat_offset) / lat_scale`, `H = (alt - alt_offset) / alt_scale`.
/// Only the direct (ground → image) coefficients are stored; localization
/// is solved iteratively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcModel {
    pub row_offset: Real,
    pub col_offset: Real,
    pub lat_offset: Real,
    pub lon_offset: Real,
    pub alt_offset: Real,
    pub row_scale: Real,
    pub col_scale: Real,
    pub lat_scale: Real,
    pub lon_scale: Real,
    pub alt_scale: Real,
    pub row_num: [Real; 20],
    pub row_den: [Real; 20],
    pub col_num: [Real; 20],
    pub col_den: [Real; 20],
}

fn monomials(l: Real, p: Real, h: Real) -> [Real; 20] {
    [
        1.0,
        l,
        p,
        h,
        l * p,
        l * h,
        p * h,
        l * l,
        p * p,
        h * h,
        p * l * h,
        l * l * l,
        l * p * p,
        l * h * h,
        l * l * p,
        p * p * p,
        p * h * h,
        l * l * h,
        p * p * h,
        h * h * h,
    ]
}

fn dot20(c: &[Real; 20], m: &[Real; 20]) -> Real {
    c.iter().zip(m).map(|(a, b)| a * b).sum()
}

fn scalar_tag(tags: &HashMap<String, String>, key: &str) -> Result<Real, CoreError> {
    let raw = tags
        .get(key)
        .ok_or_else(|| CoreError::MissingTag(key.to_string()))?;
    raw.split_whitespace()
        .next()
        .and_then(|tok| tok.parse().ok())
        .ok_or_else(|| CoreError::InvalidTag {
            key: key.to_string(),
            value: raw.clone(),
        })
}

fn coeff_tag(tags: &HashMap<String, String>, key: &str) -> Result<[Real; 20], CoreError> {
    let raw = tags
        .get(key)
        .ok_or_else(|| CoreError::MissingTag(key.to_string()))?;
    let values = raw
        .split_whitespace()
        .map(|tok| tok.parse::<Real>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| CoreError::InvalidTag {
            key: key.to_string(),
            value: raw.clone(),
        })?;
    values
        .try_into()
        .map_err(|v: Vec<Real>| CoreError::WrongCoefficientCount {
            key: key.to_string(),
            got: v.len(),
        })
}

impl RpcModel {
    /// Parse the GDAL/GeoTIFF `RPC` metadata domain (`LINE_OFF`, `SAMP_OFF`,
    /// ..., `SAMP_DEN_COEFF`).
    pub fn from_tags(tags: &HashMap<String, String>) -> Result<Self, CoreError> {
        Ok(Self {
            row_offset: scalar_tag(tags, "LINE_OFF")?,
            col_offset: scalar_tag(tags, "SAMP_OFF")?,
            lat_offset: scalar_tag(tags, "LAT_OFF")?,
            lon_offset: scalar_tag(tags, "LONG_OFF")?,
            alt_offset: scalar_tag(tags, "HEIGHT_OFF")?,
            row_scale: scalar_tag(tags, "LINE_SCALE")?,
            col_scale: scalar_tag(tags, "SAMP_SCALE")?,
            lat_scale: scalar_tag(tags, "LAT_SCALE")?,
            lon_scale: scalar_tag(tags, "LONG_SCALE")?,
            alt_scale: scalar_tag(tags, "HEIGHT_SCALE")?,
            row_num: coeff_tag(tags, "LINE_NUM_COEFF")?,
            row_den: coeff_tag(tags, "LINE_DEN_COEFF")?,
            col_num: coeff_tag(tags, "SAMP_NUM_COEFF")?,
            col_den: coeff_tag(tags, "SAMP_DEN_COEFF")?,
        })
    }

    /// Normalized image coordinates `(col_n, row_n)` of normalized ground
    /// coordinates.
    fn project_normalized(&self, l: Real, p: Real, h: Real) -> Vector2<Real> {
        let m = monomials(l, p, h);
        Vector2::new(
            dot20(&self.col_num, &m) / dot20(&self.col_den, &m),
            dot20(&self.row_num, &m) / dot20(&self.row_den, &m),
        )
    }
}

impl CameraModel for RpcModel {
    fn projection(&self, lonlat: &Pt2, alt: Real) -> Pt2 {
        let l = (lonlat.x - self.lon_offset) / self.lon_scale;
        let p = (lonlat.y - self.lat_offset) / self.lat_scale;
        let h = (alt - self.alt_offset) / self.alt_scale;
        let n = self.project_normalized(l, p, h);
        Pt2::new(
            n.x * self.col_scale + self.col_offset,
            n.y * self.row_scale + self.row_offset,
        )
    }

    /// Newton iterations on the normalized ground coordinates, starting at
    /// the model center, with a central-difference Jacobian.
    fn localization(&self, pixel: &Pt2, alt: Real) -> Pt2 {
        let target = Vector2::new(
            (pixel.x - self.col_offset) / self.col_scale,
            (pixel.y - self.row_offset) / self.row_scale,
        );
        let h = (alt - self.alt_offset) / self.alt_scale;

        let mut lp = Vector2::new(0.0, 0.0);
        let mut converged = false;
        for _ in 0..LOCALIZATION_MAX_ITERS {
            let f = self.project_normalized(lp.x, lp.y, h) - target;
            if !f.iter().all(|v| v.is_finite()) {
                return Pt2::new(Real::NAN, Real::NAN);
            }
            if f.norm() < LOCALIZATION_TOL {
                converged = true;
                break;
            }

            let d = JACOBIAN_STEP;
            let dl = (self.project_normalized(lp.x + d, lp.y, h)
                - self.project_normalized(lp.x - d, lp.y, h))
                / (2.0 * d);
            let dp = (self.project_normalized(lp.x, lp.y + d, h)
                - self.project_normalized(lp.x, lp.y - d, h))
                / (2.0 * d);
            let jac = Matrix2::from_columns(&[dl, dp]);
            let Some(jac_inv) = jac.try_inverse() else {
                return Pt2::new(Real::NAN, Real::NAN);
            };
            lp -= jac_inv * f;
        }
        if !converged {
            debug!(
                "rpc localization of ({:.3}, {:.3}) at {alt} m stopped after {LOCALIZATION_MAX_ITERS} iterations",
                pixel.x, pixel.y
            );
        }

        Pt2::new(
            lp.x * self.lon_scale + self.lon_offset,
            lp.y * self.lat_scale + self.lat_offset,
        )
    }

    fn alt_offset(&self) -> Real {
        self.alt_offset
    }

    fn alt_scale(&self) -> Real {
        self.alt_scale
    }
}
