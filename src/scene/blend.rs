/// Blend modes understood by entities and the blend filter.
///
/// The enumeration is totally ordered. Modes up to [`BlendMode::LAST_PIPELINE`] are Porter-Duff
/// operators a single hardware blend op can express, so any number of operands can be blended in
/// one pass. Modes after it, up to [`BlendMode::LAST_ADVANCED`], are separable "advanced" modes
/// that read the destination in a shader and therefore take exactly two operands. The remaining
/// non-separable modes are valid on entities but rejected by [`crate::make_blend`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum BlendMode {
    /// `0`
    Clear,
    /// `src`
    Source,
    /// `dst`
    Destination,
    /// `src + dst * (1 - sa)`
    #[default]
    SourceOver,
    /// `dst + src * (1 - da)`
    DestinationOver,
    /// `src * da`
    SourceIn,
    /// `dst * sa`
    DestinationIn,
    /// `src * (1 - da)`
    SourceOut,
    /// `dst * (1 - sa)`
    DestinationOut,
    /// `src * da + dst * (1 - sa)`
    SourceATop,
    /// `dst * sa + src * (1 - da)`
    DestinationATop,
    /// `src * (1 - da) + dst * (1 - sa)`
    Xor,
    /// `min(src + dst, 1)`
    Plus,
    /// `src * dst`, alpha included.
    Modulate,
    /// Screen.
    Screen,
    /// Overlay.
    Overlay,
    /// Darken.
    Darken,
    /// Lighten.
    Lighten,
    /// Color dodge.
    ColorDodge,
    /// Color burn.
    ColorBurn,
    /// Hard light.
    HardLight,
    /// Soft light.
    SoftLight,
    /// Difference.
    Difference,
    /// Exclusion.
    Exclusion,
    /// Multiply, composited source-over.
    Multiply,
    /// Hue of the source with saturation and luminosity of the destination.
    Hue,
    /// Saturation of the source with hue and luminosity of the destination.
    Saturation,
    /// Hue and saturation of the source with luminosity of the destination.
    Color,
    /// Luminosity of the source with hue and saturation of the destination.
    Luminosity,
}

impl BlendMode {
    /// Last mode a fixed-function blend op can express.
    pub const LAST_PIPELINE: BlendMode = BlendMode::Modulate;

    /// Last mode the blend filter accepts.
    pub const LAST_ADVANCED: BlendMode = BlendMode::Multiply;

    /// Every mode in declaration order.
    pub const ALL: [BlendMode; 29] = [
        BlendMode::Clear,
        BlendMode::Source,
        BlendMode::Destination,
        BlendMode::SourceOver,
        BlendMode::DestinationOver,
        BlendMode::SourceIn,
        BlendMode::DestinationIn,
        BlendMode::SourceOut,
        BlendMode::DestinationOut,
        BlendMode::SourceATop,
        BlendMode::DestinationATop,
        BlendMode::Xor,
        BlendMode::Plus,
        BlendMode::Modulate,
        BlendMode::Screen,
        BlendMode::Overlay,
        BlendMode::Darken,
        BlendMode::Lighten,
        BlendMode::ColorDodge,
        BlendMode::ColorBurn,
        BlendMode::HardLight,
        BlendMode::SoftLight,
        BlendMode::Difference,
        BlendMode::Exclusion,
        BlendMode::Multiply,
        BlendMode::Hue,
        BlendMode::Saturation,
        BlendMode::Color,
        BlendMode::Luminosity,
    ];

    /// Return `true` for Porter-Duff modes.
    pub fn is_pipeline(self) -> bool {
        self <= Self::LAST_PIPELINE
    }

    /// Return `true` for the separable modes that need a dedicated shader pass.
    pub fn is_advanced(self) -> bool {
        self > Self::LAST_PIPELINE && self <= Self::LAST_ADVANCED
    }

    /// Stable numeric id (declaration index).
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Look up a mode by its numeric id.
    pub fn from_u8(v: u8) -> Option<Self> {
        Self::ALL.get(usize::from(v)).copied()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/blend.rs"]
mod tests;
