use crate::filters::sigma::BlurStyle;
use crate::foundation::core::{Affine, ISize, Rect, Vec2};
use crate::foundation::error::FilterResult;
use crate::render::texture::Texture;
use crate::scene::blend::BlendMode;

/// A rendered frame as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixel at `(x, y)`.
    ///
    /// Panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    /// Convert the pixels to straight alpha. Does nothing when they already are.
    pub fn unpremultiply(&mut self) {
        if !self.premultiplied {
            return;
        }
        for px in self.data.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            match a {
                0 => px[..3].fill(0),
                255 => {}
                _ => {
                    for c in &mut px[..3] {
                        *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
                    }
                }
            }
        }
        self.premultiplied = false;
    }
}

/// Deferred work that populates an offscreen target.
///
/// The callback owns everything it touches so the renderer may run it after the caller returns.
pub type SubpassCallback =
    Box<dyn FnOnce(&mut dyn Renderer, &mut dyn RenderPass) -> FilterResult<()> + Send>;

/// Allocates offscreen targets and records work into them.
pub trait Renderer {
    /// Allocate a `size` target, run `callback` against it, and hand back the resulting texture.
    ///
    /// Fails when the target cannot be allocated or the callback fails.
    fn make_subpass(&mut self, size: ISize, callback: SubpassCallback) -> FilterResult<Texture>;

    /// Take back a texture whose contents have been consumed.
    ///
    /// Renderers without a target pool simply drop it.
    fn recycle(&mut self, texture: Texture) {
        drop(texture);
    }
}

/// A target that accepts draw submissions.
///
/// Each method corresponds to one pipeline a GPU backend would bind.
pub trait RenderPass {
    /// Target extent in pixels.
    fn size(&self) -> ISize;

    /// Draw a textured rectangle.
    fn draw_texture(&mut self, draw: &TextureDraw<'_>) -> FilterResult<()>;

    /// Run a one-dimensional Gaussian blur, writing the result into the target.
    fn draw_directional_blur(&mut self, draw: &DirectionalBlurDraw<'_>) -> FilterResult<()>;

    /// Run the border-mask blur, writing the result into the target.
    fn draw_border_mask_blur(&mut self, draw: &BorderMaskBlurDraw<'_>) -> FilterResult<()>;
}

/// A texture and the transform from its pixel space into pass pixel space.
#[derive(Clone, Copy, Debug)]
pub struct PlacedTexture<'a> {
    /// Source pixels.
    pub texture: &'a Texture,
    /// Texture pixel space to pass pixel space.
    pub transform: Affine,
}

/// Textured rectangle submission.
#[derive(Clone, Copy, Debug)]
pub struct TextureDraw<'a> {
    /// Source texture and placement.
    pub source: PlacedTexture<'a>,
    /// Region of the texture to draw, in texture pixels.
    pub source_rect: Rect,
    /// Blend applied against the target.
    pub blend_mode: BlendMode,
    /// Pixels are written only where the stencil buffer equals this value.
    pub stencil_depth: u32,
}

/// One-dimensional Gaussian blur submission.
#[derive(Clone, Copy, Debug)]
pub struct DirectionalBlurDraw<'a> {
    /// Content to blur.
    pub source: PlacedTexture<'a>,
    /// Unit blur direction in pass space.
    pub direction: Vec2,
    /// Standard deviation in pass pixels.
    pub sigma: f32,
    /// Kernel half-width in pass pixels.
    pub half_width: u32,
    /// How blurred content combines with `style_source`.
    pub style: BlurStyle,
    /// Unblurred content consulted by non-normal styles.
    pub style_source: StyleSource<'a>,
}

/// Where a blur style reads the unblurred coverage from.
#[derive(Clone, Copy, Debug)]
pub enum StyleSource<'a> {
    /// The blurred input before blurring.
    Input,
    /// A separate override; `None` when it has nothing to draw, which reads as transparent.
    Override(Option<PlacedTexture<'a>>),
}

/// Border-mask blur submission.
#[derive(Clone, Copy, Debug)]
pub struct BorderMaskBlurDraw<'a> {
    /// Content to mask.
    pub source: PlacedTexture<'a>,
    /// Horizontal standard deviation in texture pixels.
    pub sigma_x: f32,
    /// Vertical standard deviation in texture pixels.
    pub sigma_y: f32,
    /// Inner/outer/source weighting.
    pub style: BlurStyle,
}
