use crate::filters::contents::place_in_subpass;
use crate::filters::input::FilterInput;
use crate::foundation::core::Rect;
use crate::foundation::error::FilterResult;
use crate::render::backend::{RenderPass, Renderer, TextureDraw};
use crate::scene::blend::BlendMode;
use crate::scene::entity::Entity;

/// Composites its inputs in order: the first replaces the target, every later one is blended
/// on top with `blend_mode`.
///
/// With two inputs and an advanced mode the result is `mode(src = inputs[1], dst = inputs[0])`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlendFilter {
    blend_mode: BlendMode,
}

impl BlendFilter {
    /// Blend with `blend_mode`.
    pub fn new(blend_mode: BlendMode) -> Self {
        Self { blend_mode }
    }

    /// Mode applied to every input after the first.
    pub fn blend_mode(&self) -> BlendMode {
        self.blend_mode
    }

    pub(crate) fn render_filter(
        &self,
        inputs: &[FilterInput],
        renderer: &mut dyn Renderer,
        entity: &Entity,
        pass: &mut dyn RenderPass,
        coverage: Rect,
    ) -> FilterResult<()> {
        for (i, input) in inputs.iter().enumerate() {
            let Some(snapshot) = input.snapshot(renderer, entity)? else {
                continue;
            };
            let mode = if i == 0 {
                BlendMode::Source
            } else {
                self.blend_mode
            };
            pass.draw_texture(&TextureDraw {
                source: place_in_subpass(&snapshot, coverage),
                source_rect: snapshot.texture.bounds(),
                blend_mode: mode,
                stencil_depth: 0,
            })?;
            renderer.recycle(snapshot.texture);
        }
        Ok(())
    }
}
