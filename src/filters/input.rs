use crate::filters::contents::FilterContents;
use crate::foundation::core::{Affine, Rect};
use crate::foundation::error::FilterResult;
use crate::render::backend::Renderer;
use crate::render::texture::{Snapshot, Texture};
use crate::scene::entity::Entity;
use smallvec::SmallVec;
use std::sync::Arc;

/// Ordered inputs of a filter node.
pub type FilterInputs = SmallVec<[FilterInput; 2]>;

/// An edge of the filter graph: pixels that already exist, or another node to evaluate.
///
/// A snapshot input is placed in the entity's local space: its transform is composed with the
/// entity transform. A filter input already resolves to target space.
#[derive(Clone, Debug)]
pub enum FilterInput {
    /// Existing pixels.
    Snapshot(Snapshot),
    /// A node evaluated on demand.
    Filter(Arc<FilterContents>),
}

impl FilterInput {
    /// Input over `texture` placed with `transform` in entity-local space.
    pub fn from_texture(texture: Texture, transform: Affine) -> Self {
        Self::Snapshot(Snapshot::new(texture, transform))
    }

    /// Target-space bounds this input contributes, or `None` when it draws nothing.
    pub fn coverage(&self, entity: &Entity) -> Option<Rect> {
        match self {
            FilterInput::Snapshot(s) => Some(
                (entity.transform() * s.transform).transform_rect_bbox(s.texture.bounds()),
            ),
            FilterInput::Filter(f) => f.coverage(entity),
        }
    }

    /// Resolve to pixels placed in target space.
    ///
    /// Nested nodes are rendered here; `Ok(None)` means the input has nothing to draw.
    pub fn snapshot(
        &self,
        renderer: &mut dyn Renderer,
        entity: &Entity,
    ) -> FilterResult<Option<Snapshot>> {
        match self {
            FilterInput::Snapshot(s) => Ok(Some(Snapshot::new(
                s.texture.clone(),
                entity.transform() * s.transform,
            ))),
            FilterInput::Filter(f) => f.render_to_snapshot(renderer, entity),
        }
    }

    /// The node behind this input, if any.
    pub fn as_filter(&self) -> Option<&Arc<FilterContents>> {
        match self {
            FilterInput::Filter(f) => Some(f),
            FilterInput::Snapshot(_) => None,
        }
    }

    /// Return `true` when both inputs refer to the same node or the same pixels and placement.
    pub fn ptr_eq(&self, other: &FilterInput) -> bool {
        match (self, other) {
            (FilterInput::Filter(a), FilterInput::Filter(b)) => Arc::ptr_eq(a, b),
            (FilterInput::Snapshot(a), FilterInput::Snapshot(b)) => {
                a.texture.ptr_eq(&b.texture) && a.transform == b.transform
            }
            _ => false,
        }
    }
}

impl From<Snapshot> for FilterInput {
    fn from(snapshot: Snapshot) -> Self {
        FilterInput::Snapshot(snapshot)
    }
}

impl From<Arc<FilterContents>> for FilterInput {
    fn from(filter: Arc<FilterContents>) -> Self {
        FilterInput::Filter(filter)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filters/input.rs"]
mod tests;
