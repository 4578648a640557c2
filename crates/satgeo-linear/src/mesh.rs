use satgeo_core::{Pt2, Pt3, Real};
use serde::{Deserialize, Serialize};

/// Closed interval sampled at `count` evenly spaced values.
///
/// `count == 1` samples only `min`; `count == 0` is empty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleRange {
    pub min: Real,
    pub max: Real,
    pub count: usize,
}

impl SampleRange {
    pub fn new(min: Real, max: Real, count: usize) -> Self {
        Self { min, max, count }
    }

    /// Evenly spaced samples; the last one is exactly `max`.
    pub fn values(&self) -> Vec<Real> {
        match self.count {
            0 => Vec::new(),
            1 => vec![self.min],
            n => {
                let step = (self.max - self.min) / (n - 1) as Real;
                (0..n)
                    .map(|i| {
                        if i + 1 == n {
                            self.max
                        } else {
                            self.min + step * i as Real
                        }
                    })
                    .collect()
            }
        }
    }
}

/// Regular grid of `(col, row, alt)` samples.
///
/// Points are ordered with the column index varying fastest, then row, then
/// altitude.
#[derive(Debug, Clone, PartialEq)]
pub struct PointMesh {
    points: Vec<Pt3>,
}

impl PointMesh {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Grid samples as `(col, row, alt)`.
    pub fn points(&self) -> &[Pt3] {
        &self.points
    }

    /// Image coordinates of every sample.
    pub fn pixels(&self) -> Vec<Pt2> {
        self.points.iter().map(|p| Pt2::new(p.x, p.y)).collect()
    }

    /// Altitude of every sample.
    pub fn alts(&self) -> Vec<Real> {
        self.points.iter().map(|p| p.z).collect()
    }
}

/// Cartesian product of three sample ranges.
///
/// Yields `cols.count · rows.count · alts.count` points; any empty range
/// makes the mesh empty.
pub fn generate_point_mesh(cols: &SampleRange, rows: &SampleRange, alts: &SampleRange) -> PointMesh {
    let (cs, rs, hs) = (cols.values(), rows.values(), alts.values());
    let mut points = Vec::with_capacity(cs.len() * rs.len() * hs.len());
    for &h in &hs {
        for &r in &rs {
            for &c in &cs {
                points.push(Pt3::new(c, r, h));
            }
        }
    }
    PointMesh { points }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_range_edge_counts() {
        assert!(SampleRange::new(0.0, 10.0, 0).values().is_empty());
        assert_eq!(SampleRange::new(3.0, 10.0, 1).values(), vec![3.0]);
        assert_eq!(SampleRange::new(0.0, 1.0, 2).values(), vec![0.0, 1.0]);

        let v = SampleRange::new(-400.0, 0.3, 7).values();
        assert_eq!(v.len(), 7);
        assert_eq!(v[6], 0.3);
        assert!((v[3] - (-400.0 + 3.0 * 400.3 / 6.0)).abs() < 1e-12);
    }

    #[test]
    fn mesh_is_complete_and_column_major() {
        let mesh = generate_point_mesh(
            &SampleRange::new(0.0, 100.0, 3),
            &SampleRange::new(10.0, 20.0, 2),
            &SampleRange::new(-5.0, 5.0, 4),
        );
        assert_eq!(mesh.len(), 24);
        assert_eq!(mesh.points()[0], Pt3::new(0.0, 10.0, -5.0));
        assert_eq!(mesh.points()[1], Pt3::new(50.0, 10.0, -5.0));
        assert_eq!(mesh.points()[3], Pt3::new(0.0, 20.0, -5.0));
        assert!((mesh.points()[6] - Pt3::new(0.0, 10.0, -5.0 + 10.0 / 3.0)).norm() < 1e-12);
        assert_eq!(mesh.points()[23], Pt3::new(100.0, 20.0, 5.0));

        for c in [0.0, 50.0, 100.0] {
            for r in [10.0, 20.0] {
                let n = mesh
                    .points()
                    .iter()
                    .filter(|p| p.x == c && p.y == r)
                    .count();
                assert_eq!(n, 4);
            }
        }
        assert_eq!(mesh.pixels().len(), 24);
        assert_eq!(mesh.alts()[23], 5.0);
    }

    #[test]
    fn empty_range_gives_empty_mesh() {
        let mesh = generate_point_mesh(
            &SampleRange::new(0.0, 1.0, 0),
            &SampleRange::new(0.0, 1.0, 5),
            &SampleRange::new(0.0, 1.0, 5),
        );
        assert!(mesh.is_empty());
    }
}
