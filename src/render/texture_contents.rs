use crate::foundation::core::{Affine, Rect, rect_is_empty};
use crate::foundation::error::FilterResult;
use crate::render::backend::{PlacedTexture, RenderPass, TextureDraw};
use crate::render::texture::Texture;
use crate::scene::entity::Entity;
use kurbo::Shape;

/// Draws a region of a texture into the bounds of an entity's path.
#[derive(Clone, Debug)]
pub struct TextureContents {
    texture: Texture,
    source_rect: Rect,
}

impl TextureContents {
    /// Draw all of `texture`.
    pub fn new(texture: Texture) -> Self {
        let source_rect = texture.bounds();
        Self {
            texture,
            source_rect,
        }
    }

    /// Restrict drawing to `rect`, in texture pixels.
    pub fn with_source_rect(mut self, rect: Rect) -> Self {
        self.source_rect = rect;
        self
    }

    /// The texture being drawn.
    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    /// Region of the texture being drawn.
    pub fn source_rect(&self) -> Rect {
        self.source_rect
    }

    /// Stretch `source_rect` over the entity path's bounding box, placed by the entity transform,
    /// using the entity's blend mode and stencil depth. Empty paths and empty source regions draw
    /// nothing.
    pub fn render(&self, entity: &Entity, pass: &mut dyn RenderPass) -> FilterResult<()> {
        let path = entity.path();
        if path.elements().is_empty() {
            return Ok(());
        }
        let dst = path.bounding_box();
        let src = self.source_rect.abs();
        if rect_is_empty(dst) || rect_is_empty(src) {
            return Ok(());
        }

        let fit = Affine::translate(dst.origin().to_vec2())
            * Affine::scale_non_uniform(dst.width() / src.width(), dst.height() / src.height())
            * Affine::translate(-src.origin().to_vec2());
        pass.draw_texture(&TextureDraw {
            source: PlacedTexture {
                texture: &self.texture,
                transform: entity.transform() * fit,
            },
            source_rect: src,
            blend_mode: entity.blend_mode(),
            stencil_depth: entity.stencil_depth(),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/texture_contents.rs"]
mod tests;
