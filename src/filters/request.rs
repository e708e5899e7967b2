use crate::filters::contents::FilterContents;
use crate::filters::factory::{
    make_blend, make_border_mask_blur, make_directional_gaussian_blur, make_gaussian_blur,
};
use crate::filters::input::FilterInput;
use crate::filters::sigma::{BlurStyle, Sigma};
use crate::foundation::core::{Affine, BezPath, ISize, Rect, Vec2};
use crate::foundation::error::{FilterError, FilterResult};
use crate::render::cpu::CpuRenderer;
use crate::render::texture::Snapshot;
use crate::scene::blend::BlendMode;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Declarative description of an effect tree.
///
/// Leaves (`solid`, `path`) are rasterized into textures; every other variant maps onto one of
/// the graph factories.
///
/// ```json
/// { "kind": "gaussian_blur", "sigma_x": 4.0, "sigma_y": 4.0,
///   "input": { "kind": "solid", "width": 32, "height": 32, "color": [255, 0, 0, 255] } }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum EffectRequest {
    /// A `width` x `height` texture with `rect` (default: all of it) filled with `color`.
    Solid {
        /// Texture width in pixels.
        width: u32,
        /// Texture height in pixels.
        height: u32,
        /// Filled region; defaults to the whole texture.
        #[serde(default)]
        rect: Option<Rect>,
        /// Straight RGBA8 fill.
        color: [u8; 4],
        /// Placement of the texture in entity-local space.
        #[serde(default)]
        offset: [f64; 2],
    },
    /// A `width` x `height` texture with an SVG path filled with `color`.
    Path {
        /// Texture width in pixels.
        width: u32,
        /// Texture height in pixels.
        height: u32,
        /// SVG path data.
        d: String,
        /// Straight RGBA8 fill.
        color: [u8; 4],
        /// Placement of the texture in entity-local space.
        #[serde(default)]
        offset: [f64; 2],
    },
    /// Blend of `inputs` in order.
    Blend {
        /// Blend mode.
        mode: BlendMode,
        /// Operands, bottom first.
        inputs: Vec<EffectRequest>,
    },
    /// Separable two-axis Gaussian blur.
    GaussianBlur {
        /// Content to blur.
        input: Box<EffectRequest>,
        /// Horizontal sigma.
        sigma_x: Sigma,
        /// Vertical sigma.
        sigma_y: Sigma,
        /// Blur style.
        #[serde(default)]
        style: BlurStyle,
    },
    /// One-dimensional Gaussian blur.
    DirectionalBlur {
        /// Content to blur.
        input: Box<EffectRequest>,
        /// Sigma along `direction`.
        sigma: Sigma,
        /// Blur direction; need not be unit length.
        direction: [f64; 2],
        /// Blur style.
        #[serde(default)]
        style: BlurStyle,
        /// Unblurred content for the style.
        #[serde(default)]
        source_override: Option<Box<EffectRequest>>,
    },
    /// Border-mask blur.
    BorderMaskBlur {
        /// Content to mask.
        input: Box<EffectRequest>,
        /// Horizontal sigma.
        sigma_x: Sigma,
        /// Vertical sigma.
        sigma_y: Sigma,
        /// Blur style.
        #[serde(default)]
        style: BlurStyle,
    },
}

impl EffectRequest {
    /// Parse a request from JSON.
    pub fn from_json(json: &str) -> FilterResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| FilterError::validation(format!("invalid effect request: {e}")))
    }

    /// Build the request into a filter input, rasterizing leaves on `renderer`.
    pub fn build(&self, renderer: &mut CpuRenderer) -> FilterResult<FilterInput> {
        match self {
            EffectRequest::Solid {
                width,
                height,
                rect,
                color,
                offset,
            } => {
                let size = leaf_size(*width, *height)?;
                let rect =
                    rect.unwrap_or_else(|| Rect::from_origin_size((0.0, 0.0), size.to_size()));
                let texture = renderer.solid_texture(size.width, size.height, rect, *color)?;
                Ok(FilterInput::Snapshot(Snapshot::new(
                    texture,
                    Affine::translate((offset[0], offset[1])),
                )))
            }
            EffectRequest::Path {
                width,
                height,
                d,
                color,
                offset,
            } => {
                let size = leaf_size(*width, *height)?;
                let path = BezPath::from_svg(d)
                    .map_err(|e| FilterError::validation(format!("invalid path data: {e}")))?;
                let texture = renderer.path_texture(size, &path, Affine::IDENTITY, *color)?;
                Ok(FilterInput::Snapshot(Snapshot::new(
                    texture,
                    Affine::translate((offset[0], offset[1])),
                )))
            }
            EffectRequest::Blend { mode, inputs } => {
                if inputs.is_empty() {
                    return Err(FilterError::validation("blend requires at least one input"));
                }
                let built = inputs
                    .iter()
                    .map(|r| r.build(renderer))
                    .collect::<FilterResult<Vec<_>>>()?;
                make_blend(*mode, built).map(FilterInput::Filter).ok_or_else(|| {
                    FilterError::validation(format!("blend mode {mode:?} is not supported"))
                })
            }
            EffectRequest::GaussianBlur {
                input,
                sigma_x,
                sigma_y,
                style,
            } => {
                check_sigma("sigma_x", *sigma_x)?;
                check_sigma("sigma_y", *sigma_y)?;
                let input = input.build(renderer)?;
                Ok(make_gaussian_blur(input, *sigma_x, *sigma_y, *style).into())
            }
            EffectRequest::DirectionalBlur {
                input,
                sigma,
                direction,
                style,
                source_override,
            } => {
                check_sigma("sigma", *sigma)?;
                let direction = Vec2::new(direction[0], direction[1]);
                if !direction.is_finite() || direction.hypot2() == 0.0 {
                    return Err(FilterError::validation(
                        "blur direction must be finite and non-zero",
                    ));
                }
                let input = input.build(renderer)?;
                let source_override = source_override
                    .as_ref()
                    .map(|r| r.build(renderer))
                    .transpose()?;
                Ok(
                    make_directional_gaussian_blur(input, *sigma, direction, *style, source_override)
                        .into(),
                )
            }
            EffectRequest::BorderMaskBlur {
                input,
                sigma_x,
                sigma_y,
                style,
            } => {
                check_sigma("sigma_x", *sigma_x)?;
                check_sigma("sigma_y", *sigma_y)?;
                let input = input.build(renderer)?;
                Ok(make_border_mask_blur(input, *sigma_x, *sigma_y, *style).into())
            }
        }
    }

    /// Build the request into a root node.
    ///
    /// Leaves are wrapped in a single-input source-over blend so they render like any node.
    pub fn build_root(&self, renderer: &mut CpuRenderer) -> FilterResult<Arc<FilterContents>> {
        match self.build(renderer)? {
            FilterInput::Filter(f) => Ok(f),
            leaf @ FilterInput::Snapshot(_) => make_blend(BlendMode::SourceOver, [leaf])
                .ok_or_else(|| FilterError::validation("source-over blend was rejected")),
        }
    }
}

fn leaf_size(width: u32, height: u32) -> FilterResult<ISize> {
    let size = ISize::new(width, height);
    if size.is_empty() {
        return Err(FilterError::validation(format!(
            "leaf size must be non-empty, got {width}x{height}"
        )));
    }
    Ok(size)
}

fn check_sigma(name: &str, sigma: Sigma) -> FilterResult<()> {
    if !sigma.is_valid() {
        return Err(FilterError::validation(format!(
            "{name} must be finite and >= 0, got {}",
            sigma.0
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/filters/request.rs"]
mod tests;
