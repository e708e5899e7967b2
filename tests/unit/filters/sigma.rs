use super::*;

#[test]
fn small_sigmas_have_no_radius() {
    assert_eq!(Radius::from(Sigma(0.0)), Radius(0.0));
    assert_eq!(Radius::from(Sigma(0.5)), Radius(0.0));
    assert_eq!(Sigma::from(Radius(0.0)), Sigma(0.0));
    assert_eq!(Sigma(0.4).support_px(), 0);
}

#[test]
fn sigma_radius_conversions_invert_each_other() {
    for s in [0.75f32, 1.0, 2.5, 8.0, 40.0] {
        let back = Sigma::from(Radius::from(Sigma(s)));
        assert!((back.0 - s).abs() < 1e-4, "{s} -> {}", back.0);
    }
}

#[test]
fn support_rounds_radius_up() {
    // (4 - 0.5) * sqrt(3) = 6.06...
    assert_eq!(Sigma(4.0).support_px(), 7);
    assert_eq!(Sigma(f32::INFINITY).support_px(), 0);
}

#[test]
fn validity_rejects_negative_and_nan() {
    assert!(Sigma(0.0).is_valid());
    assert!(!Sigma(-1.0).is_valid());
    assert!(!Sigma(f32::NAN).is_valid());
}

#[test]
fn normal_style_keeps_blur_everywhere() {
    let f = BlurStyle::Normal.factors();
    assert_eq!((f.inner, f.outer, f.src), (1.0, 1.0, 0.0));
    let f = BlurStyle::Solid.factors();
    assert_eq!((f.inner, f.outer, f.src), (0.0, 1.0, 1.0));
}
