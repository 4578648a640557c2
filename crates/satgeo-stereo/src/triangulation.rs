//! Height triangulation between two views.
//!
//! For a pixel `p1` in view A and its match `p2` in view B, the solver looks
//! for the altitude `h` such that the ground point seen at `p1` with altitude
//! `h` reprojects onto `p2`. Over a small altitude interval the map
//! `h ↦ B(A⁻¹(p1, h))` is close to linear, so each iteration probes it at `h`
//! and `h + step`, projects the residual on the probe direction and moves
//! `h` by the resulting fraction of the step.

use log::{debug, warn};
use satgeo_core::{CameraModel, Pt2, Real};
use serde::{Deserialize, Serialize};

use crate::{StereoError, TriangulationOptions};

/// Squared probe displacement (pixels²) below which view B is considered
/// insensitive to altitude at a point.
const MIN_SENSITIVITY_SQ: Real = 1e-20;

/// Pixel of view B seeing the ground point imaged at `pixel` in view A at
/// altitude `alt`.
pub fn find_corresponding_point<A, B>(a: &A, b: &B, pixel: &Pt2, alt: Real) -> Pt2
where
    A: CameraModel + ?Sized,
    B: CameraModel + ?Sized,
{
    let ll = a.localization(pixel, alt);
    b.projection(&ll, alt)
}

/// Why no height could be assigned to a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UndefinedReason {
    /// Moving along the ray of view A does not move the point in view B.
    ZeroSensitivity,
    /// A camera model returned NaN or an infinite coordinate.
    NonFinite,
}

/// Outcome for one point of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HeightEstimate {
    Height {
        /// Altitude above the ellipsoid, meters.
        height: Real,
        /// Pixel distance in view B predicted by the last linearized step.
        residual: Real,
        /// The last increment was below the tolerance.
        converged: bool,
    },
    Undefined { reason: UndefinedReason },
}

impl HeightEstimate {
    pub fn height(&self) -> Option<Real> {
        match self {
            Self::Height { height, .. } => Some(*height),
            Self::Undefined { .. } => None,
        }
    }

    pub fn residual(&self) -> Option<Real> {
        match self {
            Self::Height { residual, .. } => Some(*residual),
            Self::Undefined { .. } => None,
        }
    }
}

/// Result of [`triangulate_heights`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriangulationReport {
    /// One entry per input pair, in input order.
    pub estimates: Vec<HeightEstimate>,
    /// Iterations performed on the batch.
    pub iterations: usize,
    /// Every defined point reached the tolerance before the iteration cap.
    pub converged: bool,
}

#[derive(Debug, Clone, Copy)]
struct PointState {
    height: Real,
    residual: Real,
    last_increment: Real,
    undefined: Option<UndefinedReason>,
}

/// Altitudes of the ground points observed at `pts1` in view A and `pts2`
/// in view B.
///
/// All points start at `h = 0` and are iterated together until the largest
/// increment among defined points is below `options.tolerance`, or
/// `options.max_iterations` is reached. Points whose geometry is degenerate
/// are frozen as [`HeightEstimate::Undefined`] and no longer take part in the
/// stopping test.
pub fn triangulate_heights<A, B>(
    a: &A,
    b: &B,
    pts1: &[Pt2],
    pts2: &[Pt2],
    options: &TriangulationOptions,
) -> Result<TriangulationReport, StereoError>
where
    A: CameraModel + ?Sized,
    B: CameraModel + ?Sized,
{
    if pts1.len() != pts2.len() {
        return Err(StereoError::MismatchedLengths {
            left: pts1.len(),
            right: pts2.len(),
        });
    }

    let step = options.height_step;
    let mut states = vec![
        PointState {
            height: 0.0,
            residual: Real::INFINITY,
            last_increment: Real::INFINITY,
            undefined: None,
        };
        pts1.len()
    ];

    let mut iterations = 0;
    let mut converged = false;
    while iterations < options.max_iterations {
        iterations += 1;
        let mut max_increment: Real = 0.0;

        for ((state, p1), p2) in states.iter_mut().zip(pts1).zip(pts2) {
            if state.undefined.is_some() {
                continue;
            }
            let r0 = find_corresponding_point(a, b, p1, state.height);
            let r1 = find_corresponding_point(a, b, p1, state.height + step);
            let dir = r1 - r0;
            let diff = p2 - r0;

            let aa = dir.norm_squared();
            if !aa.is_finite() || !diff.norm_squared().is_finite() {
                state.undefined = Some(UndefinedReason::NonFinite);
                continue;
            }
            if aa < MIN_SENSITIVITY_SQ {
                state.undefined = Some(UndefinedReason::ZeroSensitivity);
                continue;
            }

            let inc = dir.dot(&diff) / aa;
            state.residual = (dir * inc - diff).norm();
            state.height += inc * step;
            state.last_increment = inc;
            max_increment = max_increment.max(inc.abs());
        }

        if max_increment < options.tolerance {
            converged = true;
            break;
        }
    }
    debug!(
        "height triangulation of {} points: {} iterations",
        states.len(),
        iterations
    );

    let estimates: Vec<HeightEstimate> = states
        .iter()
        .map(|s| match s.undefined {
            Some(reason) => HeightEstimate::Undefined { reason },
            None => HeightEstimate::Height {
                height: s.height,
                residual: s.residual,
                converged: s.last_increment.abs() < options.tolerance,
            },
        })
        .collect();

    let undefined = estimates
        .iter()
        .filter(|e| matches!(e, HeightEstimate::Undefined { .. }))
        .count();
    if undefined > 0 {
        warn!("{undefined} of {} points have no defined height", estimates.len());
    }
    if !converged {
        warn!(
            "height triangulation stopped after {} iterations without reaching tolerance {}",
            iterations, options.tolerance
        );
    }

    Ok(TriangulationReport {
        estimates,
        iterations,
        converged,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use satgeo_core::synthetic;

    #[test]
    fn corresponding_point_matches_direct_projection() {
        let (left, right) = synthetic::stereo_pair();
        let ll = left.localization(&Pt2::new(700.0, 1200.0), 250.0);
        let expected = right.projection(&ll, 250.0);
        let got = find_corresponding_point(&left, &right, &Pt2::new(700.0, 1200.0), 250.0);
        assert!((got - expected).norm() < 1e-12);
    }

    #[test]
    fn recovers_single_height() {
        let (left, right) = synthetic::stereo_pair();
        let p1 = Pt2::new(400.0, 1700.0);
        let p2 = find_corresponding_point(&left, &right, &p1, 137.25);

        let report =
            triangulate_heights(&left, &right, &[p1], &[p2], &TriangulationOptions::default())
                .unwrap();
        assert!(report.converged);
        let h = report.estimates[0].height().unwrap();
        assert!((h - 137.25).abs() < 1e-3, "h = {h}");
        assert!(report.estimates[0].residual().unwrap() < 1e-3);
    }

    #[test]
    fn mismatched_batches_are_rejected() {
        let (left, right) = synthetic::stereo_pair();
        let res = triangulate_heights(
            &left,
            &right,
            &[Pt2::new(0.0, 0.0)],
            &[],
            &TriangulationOptions::default(),
        );
        assert!(matches!(
            res,
            Err(StereoError::MismatchedLengths { left: 1, right: 0 })
        ));
    }

    #[test]
    fn iteration_cap_is_reported() {
        let (left, right) = synthetic::stereo_pair();
        let p1 = Pt2::new(400.0, 1700.0);
        let p2 = find_corresponding_point(&left, &right, &p1, 300.0);
        let opts = TriangulationOptions {
            max_iterations: 1,
            tolerance: 0.0,
            ..Default::default()
        };
        let report = triangulate_heights(&left, &right, &[p1], &[p2], &opts).unwrap();
        assert_eq!(report.iterations, 1);
        assert!(!report.converged);
        assert!(matches!(
            report.estimates[0],
            HeightEstimate::Height {
                converged: false,
                ..
            }
        ));
    }

    #[test]
    fn empty_batch_converges_immediately() {
        let (left, right) = synthetic::stereo_pair();
        let report =
            triangulate_heights(&left, &right, &[], &[], &TriangulationOptions::default())
                .unwrap();
        assert!(report.converged);
        assert!(report.estimates.is_empty());
    }
}
