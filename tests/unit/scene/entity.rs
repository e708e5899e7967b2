use super::*;

#[test]
fn empty_path_has_no_coverage() {
    assert_eq!(Entity::new().path_coverage(), None);
}

#[test]
fn path_coverage_is_transformed() {
    let e = Entity::new()
        .with_path(Rect::new(0.0, 0.0, 10.0, 5.0).to_path(0.1))
        .with_transform(Affine::translate((3.0, 4.0)));
    assert_eq!(e.path_coverage(), Some(Rect::new(3.0, 4.0, 13.0, 9.0)));
}

#[test]
fn coverage_entity_inherits_blend_and_stencil_only() {
    let e = Entity::new()
        .with_transform(Affine::scale(2.0))
        .with_blend_mode(BlendMode::Screen)
        .with_stencil_depth(3);
    let derived = e.for_coverage(Rect::new(1.0, 2.0, 5.0, 6.0));
    assert_eq!(derived.transform(), Affine::IDENTITY);
    assert_eq!(derived.blend_mode(), BlendMode::Screen);
    assert_eq!(derived.stencil_depth(), 3);
    assert_eq!(derived.path_coverage(), Some(Rect::new(1.0, 2.0, 5.0, 6.0)));
}
