//! Render collaborators: the renderer/pass traits, textures, and the CPU reference renderer.

/// Renderer and pass traits plus the draw submissions they accept.
pub mod backend;
/// CPU reference renderer.
pub mod cpu;
pub(crate) mod kernels;
pub(crate) mod surface_pool;
/// Texture and snapshot handles.
pub mod texture;
/// Drawing a texture into an entity's bounds.
pub mod texture_contents;
