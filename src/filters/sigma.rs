/// Ratio between kernel radius and standard deviation, `sqrt(3)`.
pub const KERNEL_RADIUS_PER_SIGMA: f32 = 1.732_050_8;

/// Gaussian standard deviation.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Sigma(pub f32);

/// Blur radius: the distance the blur spreads content.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Radius(pub f32);

impl From<Sigma> for Radius {
    fn from(sigma: Sigma) -> Self {
        if sigma.0 > 0.5 {
            Radius((sigma.0 - 0.5) * KERNEL_RADIUS_PER_SIGMA)
        } else {
            Radius(0.0)
        }
    }
}

impl From<Radius> for Sigma {
    fn from(radius: Radius) -> Self {
        if radius.0 > 0.0 {
            Sigma(radius.0 / KERNEL_RADIUS_PER_SIGMA + 0.5)
        } else {
            Sigma(0.0)
        }
    }
}

impl Sigma {
    /// Return `true` for finite, non-negative values.
    pub fn is_valid(self) -> bool {
        self.0.is_finite() && self.0 >= 0.0
    }

    /// Whole pixels the kernel reaches on each side of a sample.
    pub fn support_px(self) -> u32 {
        let r = Radius::from(self).0;
        if !r.is_finite() || r <= 0.0 {
            return 0;
        }
        r.ceil() as u32
    }
}

/// How blurred content combines with the unblurred source.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BlurStyle {
    /// Blurred content everywhere.
    #[default]
    Normal,
    /// Blurred content outside the source, the source itself inside.
    Solid,
    /// Blurred content outside the source only.
    Outer,
    /// Blurred content inside the source only.
    Inner,
}

/// Weights applied per pixel: `blur * (inner * a + outer * (1 - a)) + source * src`, where `a`
/// is the source coverage at that pixel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct StyleFactors {
    pub(crate) inner: f32,
    pub(crate) outer: f32,
    pub(crate) src: f32,
}

impl BlurStyle {
    pub(crate) fn factors(self) -> StyleFactors {
        match self {
            BlurStyle::Normal => StyleFactors {
                inner: 1.0,
                outer: 1.0,
                src: 0.0,
            },
            BlurStyle::Solid => StyleFactors {
                inner: 0.0,
                outer: 1.0,
                src: 1.0,
            },
            BlurStyle::Outer => StyleFactors {
                inner: 0.0,
                outer: 1.0,
                src: 0.0,
            },
            BlurStyle::Inner => StyleFactors {
                inner: 1.0,
                outer: 0.0,
                src: 0.0,
            },
        }
    }

    pub(crate) fn as_u8(self) -> u8 {
        match self {
            BlurStyle::Normal => 0,
            BlurStyle::Solid => 1,
            BlurStyle::Outer => 2,
            BlurStyle::Inner => 3,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filters/sigma.rs"]
mod tests;
