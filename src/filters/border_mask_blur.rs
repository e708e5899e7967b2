use crate::filters::contents::{inputs_coverage, place_in_subpass};
use crate::filters::input::FilterInput;
use crate::filters::sigma::{BlurStyle, Radius, Sigma};
use crate::foundation::core::{Affine, Rect, Vec2, transform_vector};
use crate::foundation::error::FilterResult;
use crate::render::backend::{BorderMaskBlurDraw, RenderPass, Renderer};
use crate::scene::entity::Entity;

/// Blurs an input's edges toward transparency with a Gaussian falloff on both axes at once.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BorderMaskBlur {
    sigma_x: Sigma,
    sigma_y: Sigma,
    style: BlurStyle,
}

impl BorderMaskBlur {
    /// Falloff with per-axis standard deviations in entity-local units.
    pub fn new(sigma_x: Sigma, sigma_y: Sigma, style: BlurStyle) -> Self {
        Self {
            sigma_x,
            sigma_y,
            style,
        }
    }

    /// `(sigma_x, sigma_y)`.
    pub fn sigma(&self) -> (Sigma, Sigma) {
        (self.sigma_x, self.sigma_y)
    }

    /// Style applied to the mask.
    pub fn style(&self) -> BlurStyle {
        self.style
    }

    pub(crate) fn coverage(&self, inputs: &[FilterInput], entity: &Entity) -> Option<Rect> {
        let bounds = inputs_coverage(inputs, entity)?;
        let rx = f64::from(Radius::from(self.sigma_x).0).ceil();
        let ry = f64::from(Radius::from(self.sigma_y).0).ceil();
        let [a, b, c, d, _, _] = entity.transform().as_coeffs();
        let grow_x = (a.abs() * rx + c.abs() * ry).ceil();
        let grow_y = (b.abs() * rx + d.abs() * ry).ceil();
        if !grow_x.is_finite() || !grow_y.is_finite() {
            return Some(bounds);
        }
        Some(bounds.inflate(grow_x, grow_y))
    }

    pub(crate) fn render_filter(
        &self,
        inputs: &[FilterInput],
        renderer: &mut dyn Renderer,
        entity: &Entity,
        pass: &mut dyn RenderPass,
        coverage: Rect,
    ) -> FilterResult<()> {
        let Some(input) = inputs.first() else {
            return Ok(());
        };
        let Some(source) = input.snapshot(renderer, entity)? else {
            return Ok(());
        };

        // Sigma is given in local units; the mask is evaluated in texture pixels.
        let (local, texel) = (entity.transform(), source.transform);
        let sigma_x = sigma_in_texels(self.sigma_x, local, texel, Vec2::new(1.0, 0.0));
        let sigma_y = sigma_in_texels(self.sigma_y, local, texel, Vec2::new(0.0, 1.0));
        pass.draw_border_mask_blur(&BorderMaskBlurDraw {
            source: place_in_subpass(&source, coverage),
            sigma_x,
            sigma_y,
            style: self.style,
        })?;
        renderer.recycle(source.texture);
        Ok(())
    }
}

fn sigma_in_texels(sigma: Sigma, local: Affine, texel: Affine, axis: Vec2) -> f32 {
    let target_len = transform_vector(local, axis).length();
    let texel_len = transform_vector(texel, axis).length();
    if !(texel_len > 0.0) {
        return 0.0;
    }
    let s = f64::from(sigma.0) * target_len / texel_len;
    if s.is_finite() { s.max(0.0) as f32 } else { 0.0 }
}

#[cfg(test)]
#[path = "../../tests/unit/filters/border_mask_blur.rs"]
mod tests;
