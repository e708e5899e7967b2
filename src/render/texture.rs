use crate::foundation::core::{Affine, ISize, Point, Rect, Rgba8Premul};
use crate::foundation::error::{FilterError, FilterResult};
use std::fmt;
use std::sync::Arc;

/// Shared handle to a premultiplied RGBA8 texture.
///
/// Cloning is cheap; the pixels are reference counted and never mutated once the texture exists.
#[derive(Clone)]
pub struct Texture {
    pixmap: Arc<vello_cpu::Pixmap>,
}

impl Texture {
    pub(crate) fn from_pixmap(pixmap: vello_cpu::Pixmap) -> Self {
        Self {
            pixmap: Arc::new(pixmap),
        }
    }

    /// Build a texture from tightly packed premultiplied RGBA8 bytes.
    pub fn from_premul_bytes(width: u32, height: u32, bytes: &[u8]) -> FilterResult<Self> {
        let size = ISize::new(width, height);
        if bytes.len() != size.rgba8_len() {
            return Err(FilterError::validation(
                "texture bytes must match width*height*4",
            ));
        }
        let mut pixmap = new_pixmap(size)?;
        pixmap.data_as_u8_slice_mut().copy_from_slice(bytes);
        Ok(Self::from_pixmap(pixmap))
    }

    /// Texture filled with one color.
    pub fn solid(width: u32, height: u32, color: Rgba8Premul) -> FilterResult<Self> {
        let mut pixmap = new_pixmap(ISize::new(width, height))?;
        let px = color.to_array();
        for dst in pixmap.data_as_u8_slice_mut().chunks_exact_mut(4) {
            dst.copy_from_slice(&px);
        }
        Ok(Self::from_pixmap(pixmap))
    }

    /// Pixel extent.
    pub fn size(&self) -> ISize {
        ISize::new(
            u32::from(self.pixmap.width()),
            u32::from(self.pixmap.height()),
        )
    }

    /// Bounds in texture pixel space, anchored at the origin.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(Point::ORIGIN, self.size().to_size())
    }

    /// Premultiplied RGBA8 bytes, row-major, tightly packed.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    /// Pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let size = self.size();
        if x >= size.width || y >= size.height {
            return None;
        }
        let idx = ((y as usize) * (size.width as usize) + (x as usize)) * 4;
        let d = self.data();
        Some([d[idx], d[idx + 1], d[idx + 2], d[idx + 3]])
    }

    /// Return `true` when both handles refer to the same pixels.
    pub fn ptr_eq(&self, other: &Texture) -> bool {
        Arc::ptr_eq(&self.pixmap, &other.pixmap)
    }

    /// Take the pixmap back when this is the last handle.
    pub(crate) fn try_into_pixmap(self) -> Result<vello_cpu::Pixmap, Texture> {
        Arc::try_unwrap(self.pixmap).map_err(|pixmap| Texture { pixmap })
    }
}

impl fmt::Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = self.size();
        f.debug_struct("Texture")
            .field("width", &size.width)
            .field("height", &size.height)
            .finish()
    }
}

/// A resolved texture and the transform that places it in target space.
#[derive(Clone, Debug)]
pub struct Snapshot {
    /// The pixels.
    pub texture: Texture,
    /// Texture pixel space to target space.
    pub transform: Affine,
}

impl Snapshot {
    /// Snapshot placed with `transform`.
    pub fn new(texture: Texture, transform: Affine) -> Self {
        Self { texture, transform }
    }

    /// Target-space bounds of the placed texture.
    pub fn coverage(&self) -> Rect {
        self.transform.transform_rect_bbox(self.texture.bounds())
    }
}

pub(crate) fn new_pixmap(size: ISize) -> FilterResult<vello_cpu::Pixmap> {
    let w: u16 = size
        .width
        .try_into()
        .map_err(|_| FilterError::render(format!("texture width exceeds u16: {}", size.width)))?;
    let h: u16 = size
        .height
        .try_into()
        .map_err(|_| FilterError::render(format!("texture height exceeds u16: {}", size.height)))?;
    Ok(vello_cpu::Pixmap::new(w, h))
}
