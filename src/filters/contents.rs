use crate::filters::blend::BlendFilter;
use crate::filters::border_mask_blur::BorderMaskBlur;
use crate::filters::gaussian_blur::DirectionalGaussianBlur;
use crate::filters::input::{FilterInput, FilterInputs};
use crate::foundation::core::{Affine, ISize, Rect, rect_is_empty, union_coverage};
use crate::foundation::error::{FilterError, FilterResult};
use crate::foundation::math::Fnv1a64;
use crate::render::backend::{PlacedTexture, RenderPass, Renderer};
use crate::render::texture::Snapshot;
use crate::render::texture_contents::TextureContents;
use crate::scene::entity::Entity;
use std::fmt::Write as _;

/// The operation a node performs over its inputs.
#[derive(Clone, Debug)]
pub enum FilterKind {
    /// Composite inputs in order with one blend mode.
    Blend(BlendFilter),
    /// One-dimensional Gaussian blur.
    DirectionalGaussianBlur(DirectionalGaussianBlur),
    /// Gaussian falloff toward the input's borders.
    BorderMaskBlur(BorderMaskBlur),
}

impl FilterKind {
    /// Short stable name, used in logs and dumps.
    pub fn name(&self) -> &'static str {
        match self {
            FilterKind::Blend(_) => "blend",
            FilterKind::DirectionalGaussianBlur(_) => "directional_gaussian_blur",
            FilterKind::BorderMaskBlur(_) => "border_mask_blur",
        }
    }

    fn tag(&self) -> u8 {
        match self {
            FilterKind::Blend(_) => 1,
            FilterKind::DirectionalGaussianBlur(_) => 2,
            FilterKind::BorderMaskBlur(_) => 3,
        }
    }

    fn coverage(&self, inputs: &[FilterInput], entity: &Entity) -> Option<Rect> {
        match self {
            FilterKind::Blend(_) => inputs_coverage(inputs, entity),
            FilterKind::DirectionalGaussianBlur(k) => k.coverage(inputs, entity),
            FilterKind::BorderMaskBlur(k) => k.coverage(inputs, entity),
        }
    }

    fn render_filter(
        &self,
        inputs: &[FilterInput],
        renderer: &mut dyn Renderer,
        entity: &Entity,
        pass: &mut dyn RenderPass,
        coverage: Rect,
    ) -> FilterResult<()> {
        match self {
            FilterKind::Blend(k) => k.render_filter(inputs, renderer, entity, pass, coverage),
            FilterKind::DirectionalGaussianBlur(k) => {
                k.render_filter(inputs, renderer, entity, pass, coverage)
            }
            FilterKind::BorderMaskBlur(k) => {
                k.render_filter(inputs, renderer, entity, pass, coverage)
            }
        }
    }

    fn hash_params(&self, h: &mut Fnv1a64) {
        h.write_u8(self.tag());
        match self {
            FilterKind::Blend(k) => h.write_u8(k.blend_mode().as_u8()),
            FilterKind::DirectionalGaussianBlur(k) => {
                h.write_f64(f64::from(k.sigma().0));
                h.write_f64(k.direction().x);
                h.write_f64(k.direction().y);
                h.write_u8(k.style().as_u8());
                match k.source_override() {
                    Some(input) => {
                        h.write_u8(1);
                        hash_input(h, input);
                    }
                    None => h.write_u8(0),
                }
            }
            FilterKind::BorderMaskBlur(k) => {
                let (sx, sy) = k.sigma();
                h.write_f64(f64::from(sx.0));
                h.write_f64(f64::from(sy.0));
                h.write_u8(k.style().as_u8());
            }
        }
    }

    fn describe(&self) -> String {
        match self {
            FilterKind::Blend(k) => format!("blend mode={:?}", k.blend_mode()),
            FilterKind::DirectionalGaussianBlur(k) => format!(
                "directional_gaussian_blur sigma={} direction=({}, {}) style={:?} override={}",
                k.sigma().0,
                k.direction().x,
                k.direction().y,
                k.style(),
                k.source_override().is_some()
            ),
            FilterKind::BorderMaskBlur(k) => {
                let (sx, sy) = k.sigma();
                format!(
                    "border_mask_blur sigma=({}, {}) style={:?}",
                    sx.0,
                    sy.0,
                    k.style()
                )
            }
        }
    }
}

/// A deferred, coverage-aware rendering operation over an ordered list of inputs.
///
/// Nodes are immutable once shared; graphs are built bottom-up and linked with `Arc`, so one
/// node may feed several parents and cycles cannot occur.
#[derive(Clone, Debug)]
pub struct FilterContents {
    inputs: FilterInputs,
    kind: FilterKind,
}

impl FilterContents {
    /// Node of `kind` with no inputs.
    pub fn new(kind: FilterKind) -> Self {
        Self {
            inputs: FilterInputs::new(),
            kind,
        }
    }

    /// Return the node with `inputs` replacing its input list.
    pub fn with_inputs(mut self, inputs: impl IntoIterator<Item = FilterInput>) -> Self {
        self.set_inputs(inputs);
        self
    }

    /// Replace the input list. No validation happens here.
    pub fn set_inputs(&mut self, inputs: impl IntoIterator<Item = FilterInput>) {
        self.inputs = inputs.into_iter().collect();
    }

    /// Inputs in operand order.
    pub fn inputs(&self) -> &[FilterInput] {
        &self.inputs
    }

    /// Kind and parameters.
    pub fn kind(&self) -> &FilterKind {
        &self.kind
    }

    /// Target-space bounds this node draws into, or `None` when it draws nothing.
    pub fn coverage(&self, entity: &Entity) -> Option<Rect> {
        self.kind.coverage(&self.inputs, entity)
    }

    /// Evaluate the node and draw its result into `pass` over the coverage rectangle.
    ///
    /// No coverage means nothing to draw and succeeds. The result is presented with the entity's
    /// blend mode and stencil depth.
    #[tracing::instrument(level = "debug", skip_all, fields(kind = self.kind.name()))]
    pub fn render(
        &self,
        renderer: &mut dyn Renderer,
        entity: &Entity,
        pass: &mut dyn RenderPass,
    ) -> FilterResult<()> {
        let Some(coverage) = self.coverage(entity) else {
            tracing::trace!("no coverage, nothing to draw");
            return Ok(());
        };

        let snapshot = self.render_to_snapshot(renderer, entity)?.ok_or_else(|| {
            FilterError::render(format!(
                "{} produced no snapshot for coverage {coverage:?}",
                self.kind.name()
            ))
        })?;

        let source_rect = snapshot.texture.bounds();
        TextureContents::new(snapshot.texture)
            .with_source_rect(source_rect)
            .render(&entity.for_coverage(coverage), pass)
    }

    /// Evaluate the node into an offscreen texture sized to its coverage.
    ///
    /// Returns `Ok(None)` for absent or zero-area coverage. The snapshot is placed at the
    /// coverage origin.
    pub fn render_to_snapshot(
        &self,
        renderer: &mut dyn Renderer,
        entity: &Entity,
    ) -> FilterResult<Option<Snapshot>> {
        let Some(bounds) = self.coverage(entity) else {
            return Ok(None);
        };
        if rect_is_empty(bounds) {
            return Ok(None);
        }

        let size = ISize::from_size_ceil(bounds.size());
        tracing::debug!(
            kind = self.kind.name(),
            w = size.width,
            h = size.height,
            "render filter subpass"
        );

        let inputs = self.inputs.clone();
        let kind = self.kind.clone();
        let entity = entity.clone();
        let texture = renderer.make_subpass(
            size,
            Box::new(
                move |renderer: &mut dyn Renderer, pass: &mut dyn RenderPass| {
                    kind.render_filter(&inputs, renderer, &entity, pass, bounds)
                },
            ),
        )?;

        Ok(Some(Snapshot::new(
            texture,
            Affine::translate(bounds.origin().to_vec2()),
        )))
    }

    /// Structural hash over kinds, parameters and input placement.
    ///
    /// Snapshot inputs contribute their size and transform, not their pixels.
    pub fn fingerprint(&self) -> u64 {
        let mut h = Fnv1a64::new_default();
        self.hash_into(&mut h);
        h.finish()
    }

    fn hash_into(&self, h: &mut Fnv1a64) {
        self.kind.hash_params(h);
        h.write_u32(self.inputs.len() as u32);
        for input in &self.inputs {
            hash_input(h, input);
        }
    }

    /// Deterministic, indented description of the graph rooted here.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_into(&mut out, 0);
        out
    }

    fn dump_into(&self, out: &mut String, depth: usize) {
        let _ = writeln!(out, "{:indent$}{}", "", self.kind.describe(), indent = depth * 2);
        for input in &self.inputs {
            match input {
                FilterInput::Filter(f) => f.dump_into(out, depth + 1),
                FilterInput::Snapshot(s) => {
                    let size = s.texture.size();
                    let _ = writeln!(
                        out,
                        "{:indent$}snapshot {}x{} transform={:?}",
                        "",
                        size.width,
                        size.height,
                        s.transform.as_coeffs(),
                        indent = (depth + 1) * 2
                    );
                }
            }
        }
    }
}

fn hash_input(h: &mut Fnv1a64, input: &FilterInput) {
    match input {
        FilterInput::Snapshot(s) => {
            h.write_u8(0);
            let size = s.texture.size();
            h.write_u32(size.width);
            h.write_u32(size.height);
            for c in s.transform.as_coeffs() {
                h.write_f64(c);
            }
        }
        FilterInput::Filter(f) => {
            h.write_u8(1);
            f.hash_into(h);
        }
    }
}

/// Union of all input coverages, skipping inputs that draw nothing.
pub(crate) fn inputs_coverage(inputs: &[FilterInput], entity: &Entity) -> Option<Rect> {
    inputs
        .iter()
        .fold(None, |acc, input| union_coverage(acc, input.coverage(entity)))
}

/// Place a target-space snapshot into a subpass whose origin sits at `coverage.origin()`.
pub(crate) fn place_in_subpass(snapshot: &Snapshot, coverage: Rect) -> PlacedTexture<'_> {
    PlacedTexture {
        texture: &snapshot.texture,
        transform: Affine::translate(-coverage.origin().to_vec2()) * snapshot.transform,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filters/contents.rs"]
mod tests;
