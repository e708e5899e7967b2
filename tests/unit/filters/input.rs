use super::*;
use crate::filters::contents::{FilterContents, FilterKind};
use crate::filters::blend::BlendFilter;
use crate::foundation::core::{Rgba8Premul, Vec2};
use crate::render::cpu::CpuRenderer;
use crate::scene::blend::BlendMode;

fn texture(w: u32, h: u32) -> Texture {
    Texture::solid(w, h, Rgba8Premul::opaque(1, 2, 3)).unwrap()
}

#[test]
fn snapshot_coverage_composes_entity_transform() {
    let input = FilterInput::from_texture(texture(4, 2), Affine::translate((1.0, 1.0)));
    let entity = Entity::new().with_transform(Affine::scale(2.0));
    assert_eq!(input.coverage(&entity), Some(Rect::new(2.0, 2.0, 10.0, 6.0)));
    assert_eq!(
        input.coverage(&Entity::new()),
        Some(Rect::new(1.0, 1.0, 5.0, 3.0))
    );
}

#[test]
fn snapshot_resolves_into_target_space() {
    let mut r = CpuRenderer::default();
    let input = FilterInput::from_texture(texture(1, 1), Affine::translate((1.0, 0.0)));
    let entity = Entity::new().with_transform(Affine::translate(Vec2::new(0.0, 5.0)));
    let snap = input.snapshot(&mut r, &entity).unwrap().unwrap();
    assert_eq!(snap.transform, Affine::translate((1.0, 5.0)));
    assert_eq!(r.stats().subpasses, 0);
}

#[test]
fn filter_input_delegates_to_node() {
    let empty = Arc::new(FilterContents::new(FilterKind::Blend(BlendFilter::new(
        BlendMode::SourceOver,
    ))));
    let input = FilterInput::from(empty.clone());
    assert_eq!(input.coverage(&Entity::new()), None);
    assert!(Arc::ptr_eq(input.as_filter().unwrap(), &empty));

    let mut r = CpuRenderer::default();
    assert!(input.snapshot(&mut r, &Entity::new()).unwrap().is_none());
}

#[test]
fn ptr_eq_tracks_identity_not_structure() {
    let t = texture(2, 2);
    let a = FilterInput::from_texture(t.clone(), Affine::IDENTITY);
    let same = FilterInput::from_texture(t, Affine::IDENTITY);
    let other = FilterInput::from_texture(texture(2, 2), Affine::IDENTITY);
    assert!(a.ptr_eq(&same));
    assert!(!a.ptr_eq(&other));
    assert!(a.as_filter().is_none());
}
