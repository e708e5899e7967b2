use super::*;
use crate::foundation::core::{Affine, Rgba8Premul};
use crate::render::texture::Texture;
use crate::scene::entity::Entity;

fn leaf(shade: u8) -> FilterInput {
    let t = Texture::solid(2, 2, Rgba8Premul::opaque(shade, shade, shade)).unwrap();
    FilterInput::from_texture(t, Affine::IDENTITY)
}

fn blend_mode_of(node: &FilterContents) -> BlendMode {
    match node.kind() {
        FilterKind::Blend(b) => b.blend_mode(),
        other => panic!("expected blend, got {}", other.name()),
    }
}

fn blur_of(node: &FilterContents) -> &DirectionalGaussianBlur {
    match node.kind() {
        FilterKind::DirectionalGaussianBlur(b) => b,
        other => panic!("expected directional blur, got {}", other.name()),
    }
}

#[test]
fn pipeline_mode_builds_one_node_over_all_inputs() {
    let (a, b, c) = (leaf(1), leaf(2), leaf(3));
    let node = make_blend(BlendMode::SourceOver, [a.clone(), b.clone(), c.clone()]).unwrap();
    assert_eq!(blend_mode_of(&node), BlendMode::SourceOver);
    let inputs = node.inputs();
    assert_eq!(inputs.len(), 3);
    assert!(inputs[0].ptr_eq(&a));
    assert!(inputs[1].ptr_eq(&b));
    assert!(inputs[2].ptr_eq(&c));
}

#[test]
fn advanced_mode_folds_left_in_order() {
    let (a, b, c) = (leaf(1), leaf(2), leaf(3));
    let root = make_blend(BlendMode::Multiply, [a.clone(), b.clone(), c.clone()]).unwrap();
    assert_eq!(blend_mode_of(&root), BlendMode::Multiply);
    assert_eq!(root.inputs().len(), 2);
    assert!(root.inputs()[1].ptr_eq(&c));

    let inner = root.inputs()[0].as_filter().unwrap();
    assert_eq!(blend_mode_of(inner), BlendMode::Multiply);
    assert_eq!(inner.inputs().len(), 2);
    assert!(inner.inputs()[0].ptr_eq(&a));
    assert!(inner.inputs()[1].ptr_eq(&b));
}

#[test]
fn advanced_mode_with_two_inputs_is_one_binary_node() {
    let (a, b) = (leaf(1), leaf(2));
    let node = make_blend(BlendMode::Screen, [a.clone(), b.clone()]).unwrap();
    assert_eq!(node.inputs().len(), 2);
    assert!(node.inputs()[0].ptr_eq(&a));
    assert!(node.inputs()[1].ptr_eq(&b));
}

#[test]
fn short_advanced_requests_are_single_nodes() {
    let one = make_blend(BlendMode::Overlay, [leaf(1)]).unwrap();
    assert_eq!(one.inputs().len(), 1);

    let none = make_blend(BlendMode::Overlay, Vec::new()).unwrap();
    assert!(none.inputs().is_empty());
    assert_eq!(none.coverage(&Entity::new()), None);
}

#[test]
fn non_separable_modes_are_rejected() {
    for mode in [
        BlendMode::Hue,
        BlendMode::Saturation,
        BlendMode::Color,
        BlendMode::Luminosity,
    ] {
        assert!(make_blend(mode, [leaf(1), leaf(2)]).is_none(), "{mode:?}");
    }
    assert!(make_blend(BlendMode::LAST_ADVANCED, [leaf(1), leaf(2)]).is_some());
}

#[test]
fn gaussian_blur_is_horizontal_then_vertical() {
    let input = leaf(9);
    let y = make_gaussian_blur(input.clone(), Sigma(3.0), Sigma(5.0), BlurStyle::Outer);

    let y_blur = blur_of(&y);
    assert_eq!(y_blur.direction(), Vec2::new(0.0, 1.0));
    assert_eq!(y_blur.sigma(), Sigma(5.0));
    assert_eq!(y_blur.style(), BlurStyle::Outer);
    assert!(y_blur.source_override().unwrap().ptr_eq(&input));
    assert_eq!(y.inputs().len(), 1);

    let x = y.inputs()[0].as_filter().unwrap();
    let x_blur = blur_of(x);
    assert_eq!(x_blur.direction(), Vec2::new(1.0, 0.0));
    assert_eq!(x_blur.sigma(), Sigma(3.0));
    assert_eq!(x_blur.style(), BlurStyle::Normal);
    assert!(x_blur.source_override().is_none());
    assert!(x.inputs()[0].ptr_eq(&input));
}

#[test]
fn directional_blur_keeps_parameters() {
    let over = leaf(4);
    let node = make_directional_gaussian_blur(
        leaf(1),
        Sigma(2.0),
        Vec2::new(1.0, 1.0),
        BlurStyle::Solid,
        Some(over.clone()),
    );
    let blur = blur_of(&node);
    assert_eq!(blur.direction(), Vec2::new(1.0, 1.0));
    assert_eq!(blur.style(), BlurStyle::Solid);
    assert!(blur.source_override().unwrap().ptr_eq(&over));
}

#[test]
fn border_mask_blur_is_one_node() {
    let input = leaf(1);
    let node = make_border_mask_blur(input.clone(), Sigma(1.0), Sigma(2.0), BlurStyle::Inner);
    match node.kind() {
        FilterKind::BorderMaskBlur(b) => {
            assert_eq!(b.sigma(), (Sigma(1.0), Sigma(2.0)));
            assert_eq!(b.style(), BlurStyle::Inner);
        }
        other => panic!("expected border mask blur, got {}", other.name()),
    }
    assert!(node.inputs()[0].ptr_eq(&input));
}

#[test]
fn factories_are_idempotent_but_allocate_fresh_nodes() {
    let input = leaf(7);
    let a = make_gaussian_blur(input.clone(), Sigma(2.0), Sigma(2.0), BlurStyle::Normal);
    let b = make_gaussian_blur(input, Sigma(2.0), Sigma(2.0), BlurStyle::Normal);
    assert_eq!(a.fingerprint(), b.fingerprint());
    assert!(!Arc::ptr_eq(&a, &b));
}
