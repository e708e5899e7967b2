//! Functions that validate parameters and assemble small filter graphs.

use crate::filters::blend::BlendFilter;
use crate::filters::border_mask_blur::BorderMaskBlur;
use crate::filters::contents::{FilterContents, FilterKind};
use crate::filters::gaussian_blur::DirectionalGaussianBlur;
use crate::filters::input::{FilterInput, FilterInputs};
use crate::filters::sigma::{BlurStyle, Sigma};
use crate::foundation::core::Vec2;
use crate::scene::blend::BlendMode;
use std::sync::Arc;

/// Blend `inputs` in order with `blend_mode`.
///
/// Pipeline modes, and any request with fewer than two inputs, produce one node over all inputs.
/// Advanced modes take exactly two operands, so longer lists fold left:
/// `blend(blend(a, b), c)`. Modes above [`BlendMode::LAST_ADVANCED`] are rejected with an error
/// log and `None`.
pub fn make_blend(
    blend_mode: BlendMode,
    inputs: impl IntoIterator<Item = FilterInput>,
) -> Option<Arc<FilterContents>> {
    if blend_mode > BlendMode::LAST_ADVANCED {
        tracing::error!(
            blend_mode = ?blend_mode,
            "invalid blend mode {} passed to make_blend",
            blend_mode.as_u8()
        );
        return None;
    }

    let inputs: FilterInputs = inputs.into_iter().collect();
    let node = |operands: FilterInputs| {
        Arc::new(
            FilterContents::new(FilterKind::Blend(BlendFilter::new(blend_mode)))
                .with_inputs(operands),
        )
    };

    if inputs.len() < 2 || blend_mode <= BlendMode::LAST_PIPELINE {
        return Some(node(inputs));
    }

    if blend_mode <= BlendMode::LAST_ADVANCED {
        let mut operands = inputs.into_iter().peekable();
        if let Some(mut acc) = operands.next() {
            while let Some(next) = operands.next() {
                let blend = node(smallvec::smallvec![acc, next]);
                if operands.peek().is_none() {
                    return Some(blend);
                }
                acc = FilterInput::Filter(blend);
            }
        }
    }

    unreachable!("make_blend: no strategy for {blend_mode:?}")
}

/// One-dimensional Gaussian blur of `input` along `direction`.
///
/// `source_override`, when set, is the unblurred content the style consults instead of `input`.
pub fn make_directional_gaussian_blur(
    input: FilterInput,
    sigma: Sigma,
    direction: Vec2,
    style: BlurStyle,
    source_override: Option<FilterInput>,
) -> Arc<FilterContents> {
    Arc::new(
        FilterContents::new(FilterKind::DirectionalGaussianBlur(
            DirectionalGaussianBlur::new(sigma, direction, style, source_override),
        ))
        .with_inputs([input]),
    )
}

/// Two-dimensional Gaussian blur as a horizontal pass followed by a vertical pass.
///
/// The horizontal pass always uses [`BlurStyle::Normal`]; the vertical pass applies `style`
/// against the original `input`.
pub fn make_gaussian_blur(
    input: FilterInput,
    sigma_x: Sigma,
    sigma_y: Sigma,
    style: BlurStyle,
) -> Arc<FilterContents> {
    let x_blur = make_directional_gaussian_blur(
        input.clone(),
        sigma_x,
        Vec2::new(1.0, 0.0),
        BlurStyle::Normal,
        None,
    );
    make_directional_gaussian_blur(
        FilterInput::Filter(x_blur),
        sigma_y,
        Vec2::new(0.0, 1.0),
        style,
        Some(input),
    )
}

/// Border-mask blur of `input` with per-axis sigmas.
pub fn make_border_mask_blur(
    input: FilterInput,
    sigma_x: Sigma,
    sigma_y: Sigma,
    style: BlurStyle,
) -> Arc<FilterContents> {
    Arc::new(
        FilterContents::new(FilterKind::BorderMaskBlur(BorderMaskBlur::new(
            sigma_x, sigma_y, style,
        )))
        .with_inputs([input]),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/filters/factory.rs"]
mod tests;
