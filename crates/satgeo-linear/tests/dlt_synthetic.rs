use nalgebra::{Rotation3, Vector3};
use satgeo_core::{lonlat_to_geocentric, project_point, synthetic, Mat3, Mat34, Pt2, Pt3, Real};
use satgeo_linear::{
    approximate_projection_matrix, estimate_camera_matrix, mean_reprojection_error, SampleRange,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Pinhole looking down on Paris from 600 km, acting on geocentric points.
fn orbital_camera() -> Mat34 {
    let center = lonlat_to_geocentric(2.25, 48.80, 600_000.0);
    let target = lonlat_to_geocentric(2.31, 48.86, 0.0);
    let rot = Rotation3::look_at_rh(&(target - center), &Vector3::z());
    let k = Mat3::new(
        9.0e5, 0.0, 1500.0, //
        0.0, 9.0e5, 2200.0, //
        0.0, 0.0, 1.0,
    );
    let mut rt = Mat34::zeros();
    rt.fixed_view_mut::<3, 3>(0, 0).copy_from(rot.matrix());
    rt.set_column(3, &(-(rot * center)));
    k * rt
}

fn ground_points() -> Vec<Pt3> {
    let mut pts = Vec::new();
    for i in 0..6 {
        for j in 0..6 {
            for h in [-50.0, 120.0, 400.0] {
                let lon = 2.30 + 0.004 * i as Real;
                let lat = 48.85 + 0.004 * j as Real;
                pts.push(Pt3::from(lonlat_to_geocentric(lon, lat, h)));
            }
        }
    }
    pts
}

#[test]
fn dlt_handles_geocentric_offsets() {
    init_logging();
    let p = orbital_camera();
    let world = ground_points();
    let image: Vec<Pt2> = world.iter().map(|w| project_point(&p, w)).collect();

    let est = estimate_camera_matrix(&world, &image).unwrap();
    let err = mean_reprojection_error(&est, &world, &image);
    assert!(err < 1e-5, "mean reprojection error {err}");
}

#[test]
fn rpc_tile_is_approximated_by_a_finite_matrix() {
    init_logging();
    let rpc = synthetic::rpc_model();
    let approx = approximate_projection_matrix(
        &rpc,
        &SampleRange::new(1000.0, 1400.0, 5),
        &SampleRange::new(1800.0, 2200.0, 5),
        &SampleRange::new(0.0, 200.0, 3),
    )
    .unwrap();

    assert!(approx.matrix.iter().all(|v| v.is_finite()));
    assert!(approx.mean_error.is_finite());
}
