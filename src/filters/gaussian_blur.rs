use crate::filters::contents::{inputs_coverage, place_in_subpass};
use crate::filters::input::FilterInput;
use crate::filters::sigma::{BlurStyle, Radius, Sigma};
use crate::foundation::core::{Rect, Vec2, transform_vector};
use crate::foundation::error::FilterResult;
use crate::render::backend::{DirectionalBlurDraw, RenderPass, Renderer, StyleSource};
use crate::scene::entity::Entity;

/// One-dimensional Gaussian blur along `direction`.
///
/// Sigma and direction are in entity-local units; both are carried into target space by the
/// entity transform.
#[derive(Clone, Debug)]
pub struct DirectionalGaussianBlur {
    sigma: Sigma,
    direction: Vec2,
    style: BlurStyle,
    source_override: Option<FilterInput>,
}

/// Blur parameters resolved in target space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct TargetBlur {
    /// Unit direction, or zero when the blur collapses.
    pub(crate) direction: Vec2,
    pub(crate) sigma: f32,
    /// Pixels the kernel reaches on each side.
    pub(crate) half_width: u32,
}

impl DirectionalGaussianBlur {
    /// Blur over `sigma` along `direction`.
    pub fn new(
        sigma: Sigma,
        direction: Vec2,
        style: BlurStyle,
        source_override: Option<FilterInput>,
    ) -> Self {
        Self {
            sigma,
            direction,
            style,
            source_override,
        }
    }

    /// Standard deviation along the blur direction.
    pub fn sigma(&self) -> Sigma {
        self.sigma
    }

    /// Blur direction.
    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    /// Style applied after blurring.
    pub fn style(&self) -> BlurStyle {
        self.style
    }

    /// Unblurred content consulted by the style instead of the primary input.
    pub fn source_override(&self) -> Option<&FilterInput> {
        self.source_override.as_ref()
    }

    pub(crate) fn target_blur(&self, entity: &Entity) -> TargetBlur {
        let collapsed = TargetBlur {
            direction: Vec2::ZERO,
            sigma: 0.0,
            half_width: 0,
        };
        let unit = self.direction.normalize();
        if !unit.is_finite() {
            return collapsed;
        }
        let step = transform_vector(entity.transform(), unit);
        let scale = step.length();
        if !(scale > 0.0) || !scale.is_finite() {
            return collapsed;
        }
        let reach = f64::from(Radius::from(self.sigma).0) * scale;
        TargetBlur {
            direction: step / scale,
            sigma: (f64::from(self.sigma.0) * scale) as f32,
            half_width: reach.ceil().max(0.0) as u32,
        }
    }

    pub(crate) fn coverage(&self, inputs: &[FilterInput], entity: &Entity) -> Option<Rect> {
        let bounds = inputs_coverage(inputs, entity)?;
        let blur = self.target_blur(entity);
        let reach = f64::from(blur.half_width);
        Some(bounds.inflate(
            blur.direction.x.abs() * reach,
            blur.direction.y.abs() * reach,
        ))
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
        // `None`: the style reads the input itself. `Some(None)`: the override draws nothing.
        let override_snapshot = match (&self.source_override, self.style) {
            (Some(over), style) if style != BlurStyle::Normal => {
                Some(over.snapshot(renderer, entity)?)
            }
            _ => None,
        };

        let blur = self.target_blur(entity);
        tracing::trace!(
            sigma = blur.sigma,
            half_width = blur.half_width,
            "directional blur"
        );
        let style_source = match &override_snapshot {
            None => StyleSource::Input,
            Some(snapshot) => {
                StyleSource::Override(snapshot.as_ref().map(|s| place_in_subpass(s, coverage)))
            }
        };
        pass.draw_directional_blur(&DirectionalBlurDraw {
            source: place_in_subpass(&source, coverage),
            direction: blur.direction,
            sigma: blur.sigma,
            half_width: blur.half_width,
            style: self.style,
            style_source,
        })?;

        renderer.recycle(source.texture);
        if let Some(Some(snapshot)) = override_snapshot {
            renderer.recycle(snapshot.texture);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filters/gaussian_blur.rs"]
mod tests;
