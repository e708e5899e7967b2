//! Coverage-aware filter composition graphs for the Wavyte renderer.
//!
//! A filter graph is built bottom-up from [`FilterInput`]s (existing pixels or other nodes) by
//! the factory functions:
//!
//! - [`make_blend`] folds any number of inputs into blend nodes
//! - [`make_gaussian_blur`] splits a 2-D blur into a horizontal and a vertical pass
//! - [`make_directional_gaussian_blur`] and [`make_border_mask_blur`] build single blur nodes
//!
//! Every node knows its coverage before any pixel is touched, so offscreen targets are sized
//! exactly. Evaluation goes through the [`Renderer`] and [`RenderPass`] traits; [`CpuRenderer`]
//! is the deterministic reference implementation.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// The filter composition graph.
pub mod filters;
/// Render collaborators and the CPU reference renderer.
pub mod render;
mod scene;

pub use crate::foundation::core::{
    Affine, BezPath, ISize, Point, Rect, Rgba8Premul, Size, Vec2,
};
pub use crate::foundation::error::{FilterError, FilterResult};

pub use crate::filters::blend::BlendFilter;
pub use crate::filters::border_mask_blur::BorderMaskBlur;
pub use crate::filters::contents::{FilterContents, FilterKind};
pub use crate::filters::factory::{
    make_blend, make_border_mask_blur, make_directional_gaussian_blur, make_gaussian_blur,
};
pub use crate::filters::gaussian_blur::DirectionalGaussianBlur;
pub use crate::filters::input::{FilterInput, FilterInputs};
pub use crate::filters::request::EffectRequest;
pub use crate::filters::sigma::{BlurStyle, KERNEL_RADIUS_PER_SIGMA, Radius, Sigma};
pub use crate::render::backend::{
    BorderMaskBlurDraw, DirectionalBlurDraw, FrameRGBA, PlacedTexture, RenderPass, Renderer,
    StyleSource, SubpassCallback, TextureDraw,
};
pub use crate::render::cpu::{CpuRenderPass, CpuRenderer, CpuRendererOpts, RenderStats};
pub use crate::render::surface_pool::{SurfacePoolOpts, SurfacePoolStats};
pub use crate::render::texture::{Snapshot, Texture};
pub use crate::render::texture_contents::TextureContents;
pub use crate::scene::blend::BlendMode;
pub use crate::scene::entity::Entity;
