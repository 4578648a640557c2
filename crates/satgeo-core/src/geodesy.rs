//! WGS84 geodesy: geocentric coordinates and the UTM projection.
//!
//! The UTM implementation uses the Krüger series truncated at third order in
//! the third flattening `n`, which is accurate to well below a millimeter
//! inside a zone and remains usable a few degrees beyond its edges.

use crate::{Hemisphere, Pt2, Real, UtmZone, Vec3};

/// WGS84 semi-major axis in meters.
pub const WGS84_A: Real = 6_378_137.0;
/// WGS84 flattening.
pub const WGS84_F: Real = 1.0 / 298.257_223_563;

const UTM_K0: Real = 0.9996;
const UTM_FALSE_EASTING: Real = 500_000.0;
const UTM_FALSE_NORTHING_SOUTH: Real = 10_000_000.0;

/// UTM zone containing `(lon, lat)` (degrees).
///
/// Uses the regular 6° grid; the Norway/Svalbard exceptions are ignored.
pub fn compute_utm_zone(lon: Real, lat: Real) -> UtmZone {
    let number = (((lon + 180.0) / 6.0).floor().rem_euclid(60.0) as u8) + 1;
    let hemisphere = if lat >= 0.0 {
        Hemisphere::North
    } else {
        Hemisphere::South
    };
    UtmZone { number, hemisphere }
}

/// Geodetic `(lon, lat)` in degrees plus ellipsoidal height to ECEF meters.
pub fn lonlat_to_geocentric(lon: Real, lat: Real, alt: Real) -> Vec3 {
    let e2 = WGS84_F * (2.0 - WGS84_F);
    let (sin_lat, cos_lat) = lat.to_radians().sin_cos();
    let (sin_lon, cos_lon) = lon.to_radians().sin_cos();
    let n = WGS84_A / (1.0 - e2 * sin_lat * sin_lat).sqrt();
    Vec3::new(
        (n + alt) * cos_lat * cos_lon,
        (n + alt) * cos_lat * sin_lon,
        (n * (1.0 - e2) + alt) * sin_lat,
    )
}

struct KruegerSeries {
    /// Rectifying radius scaled by `k0`.
    k0_a: Real,
    alpha: [Real; 3],
    beta: [Real; 3],
    delta: [Real; 3],
    /// First eccentricity.
    e: Real,
}

impl KruegerSeries {
    fn wgs84() -> Self {
        let n = WGS84_F / (2.0 - WGS84_F);
        let (n2, n3) = (n * n, n * n * n);
        let a = WGS84_A / (1.0 + n) * (1.0 + n2 / 4.0 + n2 * n2 / 64.0);
        Self {
            k0_a: UTM_K0 * a,
            alpha: [
                n / 2.0 - 2.0 * n2 / 3.0 + 5.0 * n3 / 16.0,
                13.0 * n2 / 48.0 - 3.0 * n3 / 5.0,
                61.0 * n3 / 240.0,
            ],
            beta: [
                n / 2.0 - 2.0 * n2 / 3.0 + 37.0 * n3 / 96.0,
                n2 / 48.0 + n3 / 15.0,
                17.0 * n3 / 480.0,
            ],
            delta: [
                2.0 * n - 2.0 * n2 / 3.0 - 2.0 * n3,
                7.0 * n2 / 3.0 - 8.0 * n3 / 5.0,
                56.0 * n3 / 15.0,
            ],
            e: 2.0 * n.sqrt() / (1.0 + n),
        }
    }
}

fn false_northing(zone: &UtmZone) -> Real {
    match zone.hemisphere {
        Hemisphere::North => 0.0,
        Hemisphere::South => UTM_FALSE_NORTHING_SOUTH,
    }
}

/// Project `(lon, lat)` degrees to `(easting, northing)` meters in `zone`.
pub fn lonlat_to_utm(lon: Real, lat: Real, zone: &UtmZone) -> Pt2 {
    let s = KruegerSeries::wgs84();
    let phi = lat.to_radians();
    let dlambda = (lon - zone.central_meridian()).to_radians();

    let t = (phi.sin().atanh() - s.e * (s.e * phi.sin()).atanh()).sinh();
    let xi_p = t.atan2(dlambda.cos());
    let eta_p = (dlambda.sin() / (1.0 + t * t).sqrt()).atanh();

    let mut xi = xi_p;
    let mut eta = eta_p;
    for (j, a) in s.alpha.iter().enumerate() {
        let k = 2.0 * (j + 1) as Real;
        xi += a * (k * xi_p).sin() * (k * eta_p).cosh();
        eta += a * (k * xi_p).cos() * (k * eta_p).sinh();
    }

    Pt2::new(
        UTM_FALSE_EASTING + s.k0_a * eta,
        false_northing(zone) + s.k0_a * xi,
    )
}

/// Inverse of [`lonlat_to_utm`]: `(easting, northing)` meters to `(lon, lat)` degrees.
pub fn utm_to_lonlat(easting: Real, northing: Real, zone: &UtmZone) -> Pt2 {
    let s = KruegerSeries::wgs84();
    let xi = (northing - false_northing(zone)) / s.k0_a;
    let eta = (easting - UTM_FALSE_EASTING) / s.k0_a;

    let mut xi_p = xi;
    let mut eta_p = eta;
    for (j, b) in s.beta.iter().enumerate() {
        let k = 2.0 * (j + 1) as Real;
        xi_p -= b * (k * xi).sin() * (k * eta).cosh();
        eta_p -= b * (k * xi).cos() * (k * eta).sinh();
    }

    let chi = (xi_p.sin() / eta_p.cosh()).asin();
    let mut phi = chi;
    for (j, d) in s.delta.iter().enumerate() {
        let k = 2.0 * (j + 1) as Real;
        phi += d * (k * chi).sin();
    }
    let dlambda = eta_p.sinh().atan2(xi_p.cos());

    Pt2::new(zone.central_meridian() + dlambda.to_degrees(), phi.to_degrees())
}
