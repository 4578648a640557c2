use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{CameraModel, ProjectiveModel, RpcModel};
use crate::{mat34_from_rows, mat34_to_rows, CoreError, Pt2, Real};

/// Serializable camera parameters, tagged by model variant.
///
/// ```json
/// { "type": "projective", "matrix": [[...], [...], [...]], "alt_offset": 0.0, "alt_scale": 500.0 }
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CameraParams {
    /// Rational polynomial camera.
    Rpc {
        #[serde(flatten)]
        params: RpcModel,
    },
    /// 3×4 projective camera on `(lon, lat, alt, 1)`.
    Projective {
        matrix: [[Real; 4]; 3],
        alt_offset: Real,
        alt_scale: Real,
    },
}

impl CameraParams {
    /// Parameters from a GeoTIFF RPC metadata dictionary.
    pub fn from_rpc_tags(tags: &HashMap<String, String>) -> Result<Self, CoreError> {
        Ok(Self::Rpc {
            params: RpcModel::from_tags(tags)?,
        })
    }

    /// Build the runtime camera model.
    pub fn build(&self) -> AnyCamera {
        match self {
            CameraParams::Rpc { params } => AnyCamera::Rpc(params.clone()),
            CameraParams::Projective {
                matrix,
                alt_offset,
                alt_scale,
            } => AnyCamera::Projective(ProjectiveModel::new(
                mat34_from_rows(matrix),
                *alt_offset,
                *alt_scale,
            )),
        }
    }
}

impl From<&ProjectiveModel> for CameraParams {
    fn from(model: &ProjectiveModel) -> Self {
        CameraParams::Projective {
            matrix: mat34_to_rows(model.matrix()),
            alt_offset: model.alt_offset(),
            alt_scale: model.alt_scale(),
        }
    }
}

/// Runtime camera built from [`CameraParams`].
#[derive(Clone, Debug)]
pub enum AnyCamera {
    Rpc(RpcModel),
    Projective(ProjectiveModel),
}

impl CameraModel for AnyCamera {
    fn localization(&self, pixel: &Pt2, alt: Real) -> Pt2 {
        match self {
            AnyCamera::Rpc(m) => m.localization(pixel, alt),
            AnyCamera::Projective(m) => m.localization(pixel, alt),
        }
    }

    fn projection(&self, lonlat: &Pt2, alt: Real) -> Pt2 {
        match self {
            AnyCamera::Rpc(m) => m.projection(lonlat, alt),
            AnyCamera::Projective(m) => m.projection(lonlat, alt),
        }
    }

    fn alt_offset(&self) -> Real {
        match self {
            AnyCamera::Rpc(m) => m.alt_offset(),
            AnyCamera::Projective(m) => m.alt_offset(),
        }
    }

    fn alt_scale(&self) -> Real {
        match self {
            AnyCamera::Rpc(m) => m.alt_scale(),
            AnyCamera::Projective(m) => m.alt_scale(),
        }
    }
}
