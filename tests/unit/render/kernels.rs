use super::*;
use crate::filters::sigma::BlurStyle;

const RED: [u8; 4] = [255, 0, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];
const HALF_GREEN: [u8; 4] = [0, 128, 0, 128];

fn run(mode: BlendMode, s: [u8; 4], d: [u8; 4]) -> [u8; 4] {
    from_px(blend_kernel(mode)(to_px(s), to_px(d)))
}

#[test]
fn porter_duff_endpoints() {
    assert_eq!(run(BlendMode::Clear, RED, BLUE), [0, 0, 0, 0]);
    assert_eq!(run(BlendMode::Source, RED, BLUE), RED);
    assert_eq!(run(BlendMode::Destination, RED, BLUE), BLUE);
    assert_eq!(run(BlendMode::SourceOver, RED, BLUE), RED);
    assert_eq!(run(BlendMode::DestinationOver, RED, BLUE), BLUE);
    assert_eq!(run(BlendMode::SourceIn, RED, [0, 0, 0, 0]), [0, 0, 0, 0]);
    assert_eq!(run(BlendMode::SourceOut, RED, [0, 0, 0, 0]), RED);
    assert_eq!(run(BlendMode::Xor, RED, BLUE), [0, 0, 0, 0]);
    assert_eq!(run(BlendMode::Plus, RED, BLUE), [255, 0, 255, 255]);
}

#[test]
fn source_over_with_translucent_source_mixes() {
    let out = run(BlendMode::SourceOver, HALF_GREEN, BLUE);
    assert_eq!(out[3], 255);
    assert_eq!(out[1], 128);
    assert!(out[2] > 120 && out[2] < 130);
}

#[test]
fn advanced_modes_match_reference_values_on_opaque_pixels() {
    let gray = [128, 128, 128, 255];
    let white = [255, 255, 255, 255];
    assert_eq!(run(BlendMode::Multiply, white, gray), gray);
    assert_eq!(run(BlendMode::Screen, [0, 0, 0, 255], gray), gray);
    assert_eq!(run(BlendMode::Darken, RED, BLUE), [0, 0, 0, 255]);
    assert_eq!(run(BlendMode::Lighten, RED, BLUE), [255, 0, 255, 255]);
    assert_eq!(run(BlendMode::Difference, white, white), [0, 0, 0, 255]);
}

#[test]
fn advanced_modes_are_not_commutative() {
    let a = [200, 40, 10, 255];
    let b = [30, 90, 220, 255];
    let (light, mid) = ([200, 200, 200, 255], [100, 150, 220, 255]);
    assert_ne!(
        run(BlendMode::ColorBurn, light, mid),
        run(BlendMode::ColorBurn, mid, light)
    );
    assert_ne!(run(BlendMode::HardLight, a, b), run(BlendMode::HardLight, b, a));
    assert_ne!(run(BlendMode::Overlay, a, b), run(BlendMode::Overlay, b, a));
}

#[test]
fn advanced_modes_onto_transparent_return_source() {
    for mode in BlendMode::ALL.iter().copied().filter(|m| !m.is_pipeline()) {
        assert_eq!(run(mode, HALF_GREEN, [0, 0, 0, 0]), HALF_GREEN, "{mode:?}");
    }
}

#[test]
fn luminosity_of_gray_over_color_keeps_hue() {
    let out = run(BlendMode::Luminosity, [128, 128, 128, 255], RED);
    assert_eq!(out[3], 255);
    assert!(out[0] > out[1] && out[0] > out[2]);
}

#[test]
fn nearest_sampling_is_bounded() {
    let data = [RED, BLUE].concat();
    let size = ISize::new(2, 1);
    assert_eq!(sample_nearest(&data, size, Point::new(0.5, 0.5)), Some(RED));
    assert_eq!(sample_nearest(&data, size, Point::new(1.9, 0.2)), Some(BLUE));
    assert_eq!(sample_nearest(&data, size, Point::new(2.0, 0.2)), None);
    assert_eq!(sample_nearest(&data, size, Point::new(-0.1, 0.2)), None);
    assert_eq!(sample_clamped(&data, size, Point::new(9.0, -3.0)), BLUE);
}

#[test]
fn rasterize_places_texture_with_translation() {
    let src = RED.repeat(4);
    let mut dst = vec![0u8; ISize::new(4, 4).rgba8_len()];
    rasterize_placed(
        &src,
        ISize::new(2, 2),
        Affine::translate((1.0, 2.0)),
        &mut dst,
        ISize::new(4, 4),
    )
    .unwrap();
    let px = |x: usize, y: usize| &dst[(y * 4 + x) * 4..(y * 4 + x) * 4 + 4];
    assert_eq!(px(1, 2), &RED);
    assert_eq!(px(2, 3), &RED);
    assert_eq!(px(0, 0), &[0, 0, 0, 0]);
    assert_eq!(px(3, 2), &[0, 0, 0, 0]);
}

#[test]
fn kernel_radius_0_is_identity() {
    assert_eq!(gaussian_kernel_q16(0, 1.0).unwrap(), vec![1 << 16]);
    assert!(gaussian_kernel_q16(2, 0.0).is_err());
}

#[test]
fn kernel_weights_sum_to_one() {
    let k = gaussian_kernel_q16(5, 2.0).unwrap();
    assert_eq!(k.len(), 11);
    assert_eq!(k.iter().map(|&w| u64::from(w)).sum::<u64>(), 65536);
    assert_eq!(k[0], k[10]);
}

#[test]
fn horizontal_blur_spreads_only_horizontally() {
    let size = ISize::new(5, 3);
    let mut src = vec![0u8; size.rgba8_len()];
    let center = (5 + 2) * 4;
    src[center..center + 4].copy_from_slice(&[255, 255, 255, 255]);
    let mut dst = vec![0u8; size.rgba8_len()];
    let k = gaussian_kernel_q16(2, 1.2).unwrap();
    directional_blur_q16(&src, &mut dst, size, Vec2::new(1.0, 0.0), &k);

    let alpha = |x: usize, y: usize| dst[(y * 5 + x) * 4 + 3];
    assert!(alpha(1, 1) > 0 && alpha(3, 1) > 0);
    assert_eq!(alpha(2, 0), 0);
    assert_eq!(alpha(2, 2), 0);
    let row_sum: u32 = (0..5).map(|x| u32::from(alpha(x, 1))).sum();
    assert!((row_sum as i32 - 255).abs() <= 3);
}

#[test]
fn blur_edges_fade_to_transparent() {
    let size = ISize::new(4, 1);
    let src = [255u8, 255, 255, 255].repeat(4);
    let mut dst = vec![0u8; size.rgba8_len()];
    let k = gaussian_kernel_q16(2, 1.0).unwrap();
    directional_blur_q16(&src, &mut dst, size, Vec2::new(1.0, 0.0), &k);
    assert!(dst[3] < 255);
    assert!(dst[3] > 0);
}

#[test]
fn outer_style_removes_blur_inside_source() {
    let mut blurred = [[100u8, 100, 100, 200], [100, 100, 100, 200]].concat();
    let source = [[255u8, 0, 0, 255], [0, 0, 0, 0]].concat();
    apply_blur_style(&mut blurred, Some(&source), BlurStyle::Outer.factors());
    assert_eq!(&blurred[0..4], &[0, 0, 0, 0]);
    assert_eq!(&blurred[4..8], &[100, 100, 100, 200]);
}

#[test]
fn solid_style_puts_source_on_top() {
    let mut blurred = [[100u8, 100, 100, 200], [100, 100, 100, 200]].concat();
    let source = [[255u8, 0, 0, 255], [0, 0, 0, 0]].concat();
    apply_blur_style(&mut blurred, Some(&source), BlurStyle::Solid.factors());
    assert_eq!(&blurred[0..4], &[255, 0, 0, 255]);
    assert_eq!(&blurred[4..8], &[100, 100, 100, 200]);
}

#[test]
fn border_mask_is_opaque_inside_and_fades_outside() {
    let src_size = ISize::new(20, 20);
    let src = [255u8, 255, 255, 255].repeat(400);
    let dst_size = ISize::new(40, 40);
    let mut dst = vec![0u8; dst_size.rgba8_len()];
    let mask = BorderMask {
        src: &src,
        src_size,
        to_texture: Affine::translate((-10.0, -10.0)),
        sigma_x: 2.0,
        sigma_y: 2.0,
        factors: BlurStyle::Normal.factors(),
    };
    border_mask_blur(&mask, &mut dst, dst_size);

    let alpha = |x: usize, y: usize| dst[(y * 40 + x) * 4 + 3];
    assert!(alpha(20, 20) >= 254);
    assert!(alpha(10, 20) > 80 && alpha(10, 20) < 180);
    assert!(alpha(8, 20) > 0);
    assert_eq!(alpha(0, 0), 0);
}
