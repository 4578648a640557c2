//! Camera models mapping between image pixels and geodetic world points.
//!
//! Every model implements [`CameraModel`]:
//!
//! - `projection(lon, lat, alt) -> (col, row)`
//! - `localization(col, row, alt) -> (lon, lat)`
//!
//! plus the nominal altitude validity range `alt_offset ± alt_scale`.
//! Two variants exist, [`RpcModel`] and [`ProjectiveModel`]. Serialized
//! parameters ([`CameraParams`]) are turned into a runtime [`AnyCamera`] in a
//! single step; downstream code only sees the trait.

mod camera;
mod params;
mod projective;
mod rpc;

pub use camera::*;
pub use params::*;
pub use projective::*;
pub use rpc::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{synthetic, Pt2};

    fn roundtrip_error<C: CameraModel>(cam: &C, px: Pt2, alt: f64) -> f64 {
        let ll = cam.localization(&px, alt);
        let back = cam.projection(&ll, alt);
        (back - px).norm()
    }

    #[test]
    fn every_variant_roundtrips_through_any_camera() {
        let (left, _) = synthetic::stereo_pair();
        let cams = [
            CameraParams::from(&left).build(),
            CameraParams::Rpc {
                params: synthetic::rpc_model(),
            }
            .build(),
        ];
        for cam in &cams {
            for &alt in &[-200.0, 0.0, 350.0] {
                let err = roundtrip_error(cam, Pt2::new(812.0, 1433.0), alt);
                assert!(err < 1e-6, "roundtrip error {err} at alt {alt}");
            }
        }
    }

    #[test]
    fn batch_mappings_match_single_point_calls() {
        let (left, _) = synthetic::stereo_pair();
        let pixels = [Pt2::new(10.0, 20.0), Pt2::new(640.0, 1200.0), Pt2::new(1500.0, 90.0)];
        let alts = [-50.0, 0.0, 275.0];

        let lonlats = left.localization_many(&pixels, &alts);
        assert_eq!(lonlats.len(), 3);
        for ((p, &a), ll) in pixels.iter().zip(&alts).zip(&lonlats) {
            assert_eq!(*ll, left.localization(p, a));
        }
        let back = left.projection_many(&lonlats, &alts);
        for (p, q) in pixels.iter().zip(&back) {
            assert!((p - q).norm() < 1e-6);
        }
    }
}
