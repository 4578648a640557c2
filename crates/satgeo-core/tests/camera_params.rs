use satgeo_core::{synthetic, AnyCamera, CameraModel, CameraParams, Pt2};

#[test]
fn rpc_params_from_json_build_the_same_camera() {
    let rpc = synthetic::rpc_model();
    let json = serde_json::to_string(&CameraParams::Rpc {
        params: rpc.clone(),
    })
    .unwrap();
    assert!(json.contains(r#""type":"rpc""#));

    let params: CameraParams = serde_json::from_str(&json).unwrap();
    let camera = params.build();
    assert!(matches!(camera, AnyCamera::Rpc(_)));

    for px in [Pt2::new(10.0, 20.0), Pt2::new(1500.0, 2200.0), Pt2::new(2900.0, 4300.0)] {
        for alt in [-250.0, 100.0, 480.0] {
            let a = camera.localization(&px, alt);
            let b = rpc.localization(&px, alt);
            assert_eq!(a, b);
        }
    }
    assert_eq!(camera.alt_offset(), synthetic::ALT_OFFSET);
    assert_eq!(camera.alt_scale(), synthetic::ALT_SCALE);
}

#[test]
fn projective_params_require_a_matrix() {
    let res = serde_json::from_str::<CameraParams>(
        r#"{ "type": "projective", "alt_offset": 0.0, "alt_scale": 1.0 }"#,
    );
    assert!(res.is_err());

    let res = serde_json::from_str::<CameraParams>(r#"{ "type": "pushbroom" }"#);
    assert!(res.is_err());
}
