use crate::filters::sigma::BlurStyle;
use crate::foundation::core::{Affine, BezPath, ISize, Point, Rect, Rgba8Premul};
use crate::foundation::error::{FilterError, FilterResult};
use crate::render::backend::{
    BorderMaskBlurDraw, DirectionalBlurDraw, FrameRGBA, PlacedTexture, RenderPass, Renderer,
    StyleSource, SubpassCallback, TextureDraw,
};
use crate::render::kernels::{
    BorderMask, apply_blur_style, blend_kernel, border_mask_blur, directional_blur_q16, from_px,
    gaussian_kernel_q16, rasterize_placed, sample_nearest, to_px,
};
use crate::render::surface_pool::{SurfacePool, SurfacePoolOpts, SurfacePoolStats};
use crate::render::texture::{Texture, new_pixmap};
use kurbo::Shape;
use serde::{Deserialize, Serialize};

/// Options for [`CpuRenderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuRendererOpts {
    /// Target pool limits.
    pub pool: SurfacePoolOpts,
    /// Largest width or height a subpass may request.
    pub max_texture_dim: u32,
    /// Straight RGBA8 color frames start from; `None` leaves them transparent.
    pub clear_rgba: Option<[u8; 4]>,
}

impl Default for CpuRendererOpts {
    fn default() -> Self {
        Self {
            pool: SurfacePoolOpts::default(),
            max_texture_dim: 8192,
            clear_rgba: None,
        }
    }
}

impl CpuRendererOpts {
    /// Return options with a different pool configuration.
    pub fn with_pool(mut self, pool: SurfacePoolOpts) -> Self {
        self.pool = pool;
        self
    }

    /// Return options with a different subpass size limit.
    pub fn with_max_texture_dim(mut self, dim: u32) -> Self {
        self.max_texture_dim = dim;
        self
    }

    /// Return options with a configured clear color for frames.
    pub fn with_clear_rgba(mut self, clear: Option<[u8; 4]>) -> Self {
        self.clear_rgba = clear;
        self
    }
}

/// Counters reported by [`CpuRenderer::stats`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RenderStats {
    /// Subpasses whose callback completed.
    pub subpasses: u64,
    /// Subpasses rejected at allocation or failed in their callback.
    pub failed_subpasses: u64,
    /// Target pool counters.
    pub pool: SurfacePoolStats,
}

/// Deterministic CPU implementation of [`Renderer`].
///
/// Targets are premultiplied RGBA8 `vello_cpu` pixmaps drawn from a bounded pool. Shapes used to
/// build inputs are rasterized with `vello_cpu`; every filter pipeline runs on the kernels in
/// `render::kernels`.
pub struct CpuRenderer {
    opts: CpuRendererOpts,
    pool: SurfacePool,
    ctx: Option<vello_cpu::RenderContext>,
    subpasses: u64,
    failed_subpasses: u64,
}

impl Default for CpuRenderer {
    fn default() -> Self {
        Self::new(CpuRendererOpts::default())
    }
}

impl CpuRenderer {
    /// Create a renderer with its own target pool.
    pub fn new(opts: CpuRendererOpts) -> Self {
        Self {
            pool: SurfacePool::new(opts.pool),
            opts,
            ctx: None,
            subpasses: 0,
            failed_subpasses: 0,
        }
    }

    /// Active options.
    pub fn opts(&self) -> &CpuRendererOpts {
        &self.opts
    }

    /// Snapshot of the counters.
    pub fn stats(&self) -> RenderStats {
        RenderStats {
            subpasses: self.subpasses,
            failed_subpasses: self.failed_subpasses,
            pool: self.pool.stats(),
        }
    }

    /// Rasterize `rect` filled with straight RGBA8 `rgba` into a transparent `width` x `height`
    /// texture.
    pub fn solid_texture(
        &mut self,
        width: u32,
        height: u32,
        rect: Rect,
        rgba: [u8; 4],
    ) -> FilterResult<Texture> {
        self.path_texture(
            ISize::new(width, height),
            &rect.to_path(0.1),
            Affine::IDENTITY,
            rgba,
        )
    }

    /// Rasterize `path` placed by `transform` and filled with straight RGBA8 `rgba`.
    pub fn path_texture(
        &mut self,
        size: ISize,
        path: &BezPath,
        transform: Affine,
        rgba: [u8; 4],
    ) -> FilterResult<Texture> {
        self.check_size(size)?;
        let mut pixmap = self.pool.borrow(size)?;
        pixmap.data_as_u8_slice_mut().fill(0);
        let (w, h) = (pixmap.width(), pixmap.height());
        self.with_ctx_mut(w, h, |ctx| {
            let [r, g, b, a] = rgba;
            ctx.set_transform(affine_to_cpu(transform));
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
            ctx.fill_path(&bezpath_to_cpu(path));
            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);
            Ok(())
        })?;
        Ok(Texture::from_pixmap(pixmap))
    }

    /// Copy a texture out as premultiplied RGBA8.
    pub fn readback(&self, texture: &Texture) -> FrameRGBA {
        let size = texture.size();
        FrameRGBA {
            width: size.width,
            height: size.height,
            data: texture.data().to_vec(),
            premultiplied: true,
        }
    }

    /// Render a full frame: a `size` pass cleared to the configured color is handed to `draw`,
    /// then read back.
    #[tracing::instrument(level = "debug", skip(self, draw), fields(w = size.width, h = size.height))]
    pub fn render_frame<F>(&mut self, size: ISize, draw: F) -> FilterResult<FrameRGBA>
    where
        F: FnOnce(&mut CpuRenderer, &mut CpuRenderPass) -> FilterResult<()>,
    {
        self.check_size(size)?;
        let mut pass = CpuRenderPass::from_pixmap(self.pool.borrow(size)?);
        let clear = self
            .opts
            .clear_rgba
            .map(|[r, g, b, a]| Rgba8Premul::from_straight_rgba(r, g, b, a))
            .unwrap_or_else(Rgba8Premul::transparent);
        pass.clear(clear);

        let result = draw(self, &mut pass);
        let pixmap = pass.into_pixmap();
        let frame = FrameRGBA {
            width: size.width,
            height: size.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        };
        self.pool.release(pixmap);
        result.map(|()| frame)
    }

    fn check_size(&self, size: ISize) -> FilterResult<()> {
        if size.is_empty() {
            return Err(FilterError::render(format!(
                "target size must be non-empty, got {}x{}",
                size.width, size.height
            )));
        }
        let max = self.opts.max_texture_dim;
        if size.width > max || size.height > max {
            return Err(FilterError::render(format!(
                "target size {}x{} exceeds max_texture_dim {max}",
                size.width, size.height
            )));
        }
        Ok(())
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut vello_cpu::RenderContext) -> FilterResult<R>,
    ) -> FilterResult<R> {
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(&mut ctx)?;
        self.ctx = Some(ctx);
        Ok(out)
    }
}

impl Renderer for CpuRenderer {
    fn make_subpass(&mut self, size: ISize, callback: SubpassCallback) -> FilterResult<Texture> {
        if let Err(err) = self.check_size(size) {
            self.failed_subpasses = self.failed_subpasses.saturating_add(1);
            tracing::debug!(error = %err, "subpass rejected");
            return Err(err);
        }
        let mut pixmap = self.pool.borrow(size)?;
        pixmap.data_as_u8_slice_mut().fill(0);
        let mut pass = CpuRenderPass::from_pixmap(pixmap);
        tracing::trace!(w = size.width, h = size.height, "subpass begin");

        match callback(self, &mut pass) {
            Ok(()) => {
                self.subpasses = self.subpasses.saturating_add(1);
                tracing::trace!(draws = pass.draw_count(), "subpass end");
                Ok(Texture::from_pixmap(pass.into_pixmap()))
            }
            Err(err) => {
                self.failed_subpasses = self.failed_subpasses.saturating_add(1);
                self.pool.release(pass.into_pixmap());
                tracing::debug!(error = %err, "subpass callback failed");
                Err(err)
            }
        }
    }

    /// Hand a texture's pixels back to the pool.
    ///
    /// Textures that are still shared are simply dropped.
    fn recycle(&mut self, texture: Texture) {
        if let Ok(pixmap) = texture.try_into_pixmap() {
            self.pool.release(pixmap);
        }
    }
}

/// Premultiplied RGBA8 target with a per-pixel stencil buffer.
pub struct CpuRenderPass {
    target: vello_cpu::Pixmap,
    size: ISize,
    stencil: Vec<u32>,
    draws: u64,
}

impl CpuRenderPass {
    /// Transparent pass with a zeroed stencil buffer.
    pub fn new(size: ISize) -> FilterResult<Self> {
        Ok(Self::from_pixmap(new_pixmap(size)?))
    }

    fn from_pixmap(target: vello_cpu::Pixmap) -> Self {
        let size = ISize::new(u32::from(target.width()), u32::from(target.height()));
        Self {
            target,
            size,
            stencil: vec![0; (size.width as usize) * (size.height as usize)],
            draws: 0,
        }
    }

    fn into_pixmap(self) -> vello_cpu::Pixmap {
        self.target
    }

    /// Fill every pixel with `color`.
    pub fn clear(&mut self, color: Rgba8Premul) {
        let px = color.to_array();
        for dst in self.target.data_as_u8_slice_mut().chunks_exact_mut(4) {
            dst.copy_from_slice(&px);
        }
    }

    /// Write `value` into the stencil buffer for every pixel whose center lies inside `rect`.
    pub fn set_stencil_rect(&mut self, rect: Rect, value: u32) {
        let Some((x0, y0, x1, y1)) = self.pixel_span(rect) else {
            return;
        };
        let w = self.size.width as usize;
        for y in y0..y1 {
            self.stencil[y * w + x0..y * w + x1].fill(value);
        }
    }

    /// Stencil value at `(x, y)`.
    pub fn stencil(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        Some(self.stencil[(y as usize) * (self.size.width as usize) + (x as usize)])
    }

    /// Premultiplied RGBA8 bytes of the target.
    pub fn pixels(&self) -> &[u8] {
        self.target.data_as_u8_slice()
    }

    /// Pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let idx = ((y as usize) * (self.size.width as usize) + (x as usize)) * 4;
        let d = self.pixels();
        Some([d[idx], d[idx + 1], d[idx + 2], d[idx + 3]])
    }

    /// Draw submissions accepted so far.
    pub fn draw_count(&self) -> u64 {
        self.draws
    }

    /// Half-open pixel ranges whose centers fall inside `rect`, clipped to the target.
    fn pixel_span(&self, rect: Rect) -> Option<(usize, usize, usize, usize)> {
        let clamp_x = |v: f64| (v - 0.5).ceil().clamp(0.0, f64::from(self.size.width)) as usize;
        let clamp_y = |v: f64| (v - 0.5).ceil().clamp(0.0, f64::from(self.size.height)) as usize;
        let rect = rect.abs();
        let (x0, x1) = (clamp_x(rect.x0), clamp_x(rect.x1));
        let (y0, y1) = (clamp_y(rect.y0), clamp_y(rect.y1));
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }

    fn rasterize(&self, placed: &PlacedTexture<'_>) -> FilterResult<Vec<u8>> {
        let mut out = vec![0u8; self.size.rgba8_len()];
        rasterize_placed(
            placed.texture.data(),
            placed.texture.size(),
            placed.transform,
            &mut out,
            self.size,
        )?;
        Ok(out)
    }
}

impl RenderPass for CpuRenderPass {
    fn size(&self) -> ISize {
        self.size
    }

    fn draw_texture(&mut self, draw: &TextureDraw<'_>) -> FilterResult<()> {
        self.draws = self.draws.saturating_add(1);
        let texture = draw.source.texture;
        let region = draw.source_rect.abs().intersect(texture.bounds());
        if region.width() <= 0.0 || region.height() <= 0.0 {
            return Ok(());
        }
        let to_pass = draw.source.transform;
        let Some((x0, y0, x1, y1)) = self.pixel_span(to_pass.transform_rect_bbox(region)) else {
            return Ok(());
        };

        let inv = to_pass.inverse();
        let kernel = blend_kernel(draw.blend_mode);
        let (src, src_size) = (texture.data(), texture.size());
        let w = self.size.width as usize;
        let dst = self.target.data_as_u8_slice_mut();
        for y in y0..y1 {
            for x in x0..x1 {
                if self.stencil[y * w + x] != draw.stencil_depth {
                    continue;
                }
                let p = inv * Point::new(x as f64 + 0.5, y as f64 + 0.5);
                if !region.contains(p) {
                    continue;
                }
                let Some(s) = sample_nearest(src, src_size, p) else {
                    continue;
                };
                let idx = (y * w + x) * 4;
                let d = [dst[idx], dst[idx + 1], dst[idx + 2], dst[idx + 3]];
                dst[idx..idx + 4].copy_from_slice(&from_px(kernel(to_px(s), to_px(d))));
            }
        }
        Ok(())
    }

    fn draw_directional_blur(&mut self, draw: &DirectionalBlurDraw<'_>) -> FilterResult<()> {
        self.draws = self.draws.saturating_add(1);
        let source = self.rasterize(&draw.source)?;

        let radius = if draw.sigma > 0.0 { draw.half_width } else { 0 };
        let k = gaussian_kernel_q16(radius, draw.sigma)?;
        let mut blurred = vec![0u8; source.len()];
        directional_blur_q16(&source, &mut blurred, self.size, draw.direction, &k);

        if draw.style != BlurStyle::Normal {
            let style_source = match &draw.style_source {
                StyleSource::Input => source,
                StyleSource::Override(Some(placed)) => self.rasterize(placed)?,
                StyleSource::Override(None) => vec![0u8; self.size.rgba8_len()],
            };
            apply_blur_style(&mut blurred, Some(&style_source), draw.style.factors());
        }

        self.target.data_as_u8_slice_mut().copy_from_slice(&blurred);
        Ok(())
    }

    fn draw_border_mask_blur(&mut self, draw: &BorderMaskBlurDraw<'_>) -> FilterResult<()> {
        self.draws = self.draws.saturating_add(1);
        let texture = draw.source.texture;
        let mask = BorderMask {
            src: texture.data(),
            src_size: texture.size(),
            to_texture: draw.source.transform.inverse(),
            sigma_x: draw.sigma_x,
            sigma_y: draw.sigma_y,
            factors: draw.style.factors(),
        };
        let size = self.size;
        border_mask_blur(&mask, self.target.data_as_u8_slice_mut(), size);
        Ok(())
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
