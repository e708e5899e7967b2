use super::*;
use crate::filters::contents::FilterKind;
use crate::scene::entity::Entity;

#[test]
fn gaussian_blur_request_builds_two_pass_chain() {
    let req = EffectRequest::from_json(
        r#"{
            "kind": "gaussian_blur",
            "sigma_x": 2.0,
            "sigma_y": 3.0,
            "style": "solid",
            "input": { "kind": "solid", "width": 8, "height": 8, "color": [255, 0, 0, 255] }
        }"#,
    )
    .unwrap();
    let mut r = CpuRenderer::default();
    let root = req.build_root(&mut r).unwrap();
    match root.kind() {
        FilterKind::DirectionalGaussianBlur(b) => {
            assert_eq!(b.sigma(), Sigma(3.0));
            assert_eq!(b.style(), BlurStyle::Solid);
        }
        other => panic!("unexpected root {}", other.name()),
    }
    assert!(root.inputs()[0].as_filter().is_some());
}

#[test]
fn solid_leaf_honors_rect_and_offset() {
    let req = EffectRequest::from_json(
        r#"{ "kind": "solid", "width": 4, "height": 4, "color": [0, 0, 255, 255],
             "rect": { "x0": 0.0, "y0": 0.0, "x1": 2.0, "y1": 4.0 }, "offset": [10.0, 0.0] }"#,
    )
    .unwrap();
    let mut r = CpuRenderer::default();
    let input = req.build(&mut r).unwrap();
    let FilterInput::Snapshot(snap) = &input else {
        panic!("leaf should build a snapshot");
    };
    assert_eq!(snap.transform, Affine::translate((10.0, 0.0)));
    assert_eq!(snap.texture.pixel(0, 0), Some([0, 0, 255, 255]));
    assert_eq!(snap.texture.pixel(3, 0), Some([0, 0, 0, 0]));
    assert_eq!(
        input.coverage(&Entity::new()),
        Some(Rect::new(10.0, 0.0, 14.0, 4.0))
    );
}

#[test]
fn path_leaf_rasterizes_svg_data() {
    let req = EffectRequest::Path {
        width: 8,
        height: 8,
        d: "M0,0 L8,0 L8,8 L0,8 Z".to_string(),
        color: [255, 255, 255, 255],
        offset: [0.0, 0.0],
    };
    let mut r = CpuRenderer::default();
    let FilterInput::Snapshot(snap) = req.build(&mut r).unwrap() else {
        panic!("leaf should build a snapshot");
    };
    assert_eq!(snap.texture.pixel(4, 4), Some([255, 255, 255, 255]));
}

#[test]
fn leaf_root_is_wrapped_in_source_over() {
    let req = EffectRequest::Solid {
        width: 2,
        height: 2,
        rect: None,
        color: [1, 2, 3, 255],
        offset: [0.0, 0.0],
    };
    let mut r = CpuRenderer::default();
    let root = req.build_root(&mut r).unwrap();
    assert_eq!(root.dump().lines().next(), Some("blend mode=SourceOver"));
}

#[test]
fn invalid_requests_are_validation_errors() {
    let mut r = CpuRenderer::default();
    let leaf = || {
        Box::new(EffectRequest::Solid {
            width: 2,
            height: 2,
            rect: None,
            color: [0; 4],
            offset: [0.0, 0.0],
        })
    };
    let cases = vec![
        EffectRequest::Blend {
            mode: BlendMode::Hue,
            inputs: vec![*leaf(), *leaf()],
        },
        EffectRequest::Blend {
            mode: BlendMode::SourceOver,
            inputs: vec![],
        },
        EffectRequest::GaussianBlur {
            input: leaf(),
            sigma_x: Sigma(-1.0),
            sigma_y: Sigma(1.0),
            style: BlurStyle::Normal,
        },
        EffectRequest::BorderMaskBlur {
            input: leaf(),
            sigma_x: Sigma(1.0),
            sigma_y: Sigma(f32::NAN),
            style: BlurStyle::Normal,
        },
        EffectRequest::DirectionalBlur {
            input: leaf(),
            sigma: Sigma(1.0),
            direction: [0.0, 0.0],
            style: BlurStyle::Normal,
            source_override: None,
        },
        EffectRequest::Solid {
            width: 0,
            height: 2,
            rect: None,
            color: [0; 4],
            offset: [0.0, 0.0],
        },
        EffectRequest::Path {
            width: 2,
            height: 2,
            d: "not a path".to_string(),
            color: [0; 4],
            offset: [0.0, 0.0],
        },
    ];
    for case in cases {
        let err = case.build(&mut r).unwrap_err();
        assert!(matches!(err, FilterError::Validation(_)), "{case:?}: {err}");
    }
}

#[test]
fn malformed_json_is_a_validation_error() {
    let err = EffectRequest::from_json(r#"{ "kind": "sparkle" }"#).unwrap_err();
    assert!(err.to_string().starts_with("validation error: invalid effect request"));
    let err = EffectRequest::from_json(
        r#"{ "kind": "solid", "width": 1, "height": 1, "color": [0,0,0,0], "extra": 1 }"#,
    )
    .unwrap_err();
    assert!(matches!(err, FilterError::Validation(_)));
}
