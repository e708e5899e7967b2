use crate::foundation::core::{Affine, BezPath, Rect};
use crate::scene::blend::BlendMode;
use kurbo::Shape;

/// Placement context a filter is evaluated against.
///
/// Filters only read an entity. The one exception is [`Entity::for_coverage`], which derives the
/// entity a filter uses to draw its own result.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    transform: Affine,
    path: BezPath,
    blend_mode: BlendMode,
    stencil_depth: u32,
}

impl Default for Entity {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            path: BezPath::new(),
            blend_mode: BlendMode::SourceOver,
            stencil_depth: 0,
        }
    }
}

impl Entity {
    /// Identity transform, empty path, source-over, stencil depth 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the transform.
    pub fn with_transform(mut self, transform: Affine) -> Self {
        self.transform = transform;
        self
    }

    /// Replace the path.
    pub fn with_path(mut self, path: BezPath) -> Self {
        self.path = path;
        self
    }

    /// Replace the blend mode.
    pub fn with_blend_mode(mut self, blend_mode: BlendMode) -> Self {
        self.blend_mode = blend_mode;
        self
    }

    /// Replace the stencil depth.
    pub fn with_stencil_depth(mut self, depth: u32) -> Self {
        self.stencil_depth = depth;
        self
    }

    /// Local-to-target transform.
    pub fn transform(&self) -> Affine {
        self.transform
    }

    /// Geometry the entity draws into, in local space.
    pub fn path(&self) -> &BezPath {
        &self.path
    }

    /// Blend mode used when presenting into the pass.
    pub fn blend_mode(&self) -> BlendMode {
        self.blend_mode
    }

    /// Stencil reference value.
    pub fn stencil_depth(&self) -> u32 {
        self.stencil_depth
    }

    /// Bounds of the path in target space, or `None` for an empty path.
    pub fn path_coverage(&self) -> Option<Rect> {
        if self.path.elements().is_empty() {
            return None;
        }
        Some(self.transform.transform_rect_bbox(self.path.bounding_box()))
    }

    /// Entity that draws a filter result: identity transform, path = `coverage`, blend mode and
    /// stencil depth inherited from `self`.
    pub fn for_coverage(&self, coverage: Rect) -> Self {
        Self {
            transform: Affine::IDENTITY,
            path: coverage.to_path(0.1),
            blend_mode: self.blend_mode,
            stencil_depth: self.stencil_depth,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/entity.rs"]
mod tests;
