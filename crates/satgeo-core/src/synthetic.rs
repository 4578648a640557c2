//! Deterministic synthetic cameras.
//!
//! The scene is a small tile around Paris (lon ≈ 2.30..2.32°,
//! lat ≈ 48.85..48.87°) with altitudes in `100 ± 500` m. The cameras are
//! shaped like sub-meter push-broom acquisitions: about 1500 × 2200 pixels
//! over the tile, and a few tenths of a pixel of parallax per meter of
//! altitude between the two views.

use crate::{Mat34, ProjectiveModel, Real, RpcModel};

/// Nominal altitude offset of the synthetic cameras.
pub const ALT_OFFSET: Real = 100.0;
/// Nominal altitude scale of the synthetic cameras.
pub const ALT_SCALE: Real = 500.0;

/// Two projective cameras observing the same tile from different angles.
pub fn stereo_pair() -> (ProjectiveModel, ProjectiveModel) {
    let left = Mat34::new(
        1.5e5, 0.0, 0.2, -1.5e5 * 2.30, //
        0.0, -2.2e5, 0.1, 2.2e5 * 48.87, //
        0.0, 0.0, 1.0e-6, 1.0,
    );
    let right = Mat34::new(
        1.48e5, 1.0e4, -0.4, -(1.48e5 * 2.30 + 1.0e4 * 48.87) + 25.0, //
        5.0e3, -2.2e5, 0.05, -5.0e3 * 2.30 + 2.2e5 * 48.87 - 10.0, //
        2.0e-3, 0.0, 1.2e-6, 1.0 - 2.0e-3 * 2.30,
    );
    (
        ProjectiveModel::new(left, ALT_OFFSET, ALT_SCALE),
        ProjectiveModel::new(right, ALT_OFFSET, ALT_SCALE),
    )
}

/// A mildly non-linear RPC over the same tile.
pub fn rpc_model() -> RpcModel {
    let mut col_num = [0.0; 20];
    col_num[..8].copy_from_slice(&[0.0133, 1.0, 0.02, 0.0667, 0.001, 0.0, 0.0, 0.002]);
    let mut col_den = [0.0; 20];
    col_den[..4].copy_from_slice(&[1.0, 0.001, 0.0, 0.0005]);

    let mut row_num = [0.0; 20];
    row_num[..9].copy_from_slice(&[0.0, 0.01, -1.0, 0.03, 0.0, 0.0, 0.001, 0.0, -0.002]);
    let mut row_den = [0.0; 20];
    row_den[..4].copy_from_slice(&[1.0, 0.0, 0.0008, 0.0003]);

    RpcModel {
        row_offset: 2200.0,
        col_offset: 1500.0,
        lat_offset: 48.86,
        lon_offset: 2.31,
        alt_offset: ALT_OFFSET,
        row_scale: 2200.0,
        col_scale: 1500.0,
        lat_scale: 0.01,
        lon_scale: 0.01,
        alt_scale: ALT_SCALE,
        row_num,
        row_den,
        col_num,
        col_den,
    }
}
