//! The filter composition graph: inputs, nodes, node kinds, and the factories that assemble them.

/// Blend node kind.
pub mod blend;
/// Border-mask blur node kind.
pub mod border_mask_blur;
/// Filter nodes.
pub mod contents;
/// Graph factories.
pub mod factory;
/// Directional Gaussian blur node kind.
pub mod gaussian_blur;
/// Graph edges.
pub mod input;
/// Declarative effect requests.
pub mod request;
/// Blur parameters.
pub mod sigma;
