use crate::foundation::core::ISize;
use crate::foundation::error::FilterResult;
use crate::render::texture::new_pixmap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Pool configuration for cached render targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfacePoolOpts {
    /// Maximum bytes retained across all buckets.
    pub max_pool_bytes: usize,
    /// Maximum number of retained targets per size bucket.
    pub max_surfaces_per_bucket: usize,
}

impl Default for SurfacePoolOpts {
    fn default() -> Self {
        Self {
            max_pool_bytes: 256 * 1024 * 1024,
            max_surfaces_per_bucket: 8,
        }
    }
}

impl SurfacePoolOpts {
    /// Return options with a different global byte cap.
    pub fn with_max_pool_bytes(mut self, bytes: usize) -> Self {
        self.max_pool_bytes = bytes;
        self
    }

    /// Return options with a different per-bucket cap.
    pub fn with_max_surfaces_per_bucket(mut self, n: usize) -> Self {
        self.max_surfaces_per_bucket = n;
        self
    }
}

/// Pool counters, reported through [`crate::CpuRenderer::stats`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SurfacePoolStats {
    /// Targets currently parked in the pool.
    pub retained_surfaces: usize,
    /// Bytes currently parked in the pool.
    pub retained_bytes: usize,
    /// Fresh allocations.
    pub alloc_surfaces: u64,
    /// Bytes of fresh allocations.
    pub alloc_bytes: u64,
    /// Borrows served from the pool.
    pub reused_surfaces: u64,
    /// Releases rejected by a cap.
    pub dropped_on_release: u64,
}

struct Bucket {
    surfaces: Vec<vello_cpu::Pixmap>,
}

/// Bounded pooled allocator for CPU pixmaps, keyed by size.
///
/// Borrowed pixmaps are not cleared; callers reset them before drawing.
pub(crate) struct SurfacePool {
    opts: SurfacePoolOpts,
    stats: SurfacePoolStats,

    // Op-level lookup, never per pixel.
    bucket_idx_by_size: HashMap<ISize, usize>,
    buckets: Vec<Bucket>,
}

impl SurfacePool {
    pub(crate) fn new(opts: SurfacePoolOpts) -> Self {
        Self {
            opts,
            stats: SurfacePoolStats::default(),
            bucket_idx_by_size: HashMap::new(),
            buckets: Vec::new(),
        }
    }

    pub(crate) fn stats(&self) -> SurfacePoolStats {
        self.stats.clone()
    }

    pub(crate) fn borrow(&mut self, size: ISize) -> FilterResult<vello_cpu::Pixmap> {
        let bytes = size.rgba8_len();
        if let Some(&bi) = self.bucket_idx_by_size.get(&size)
            && let Some(p) = self.buckets[bi].surfaces.pop()
        {
            self.stats.retained_surfaces = self.stats.retained_surfaces.saturating_sub(1);
            self.stats.retained_bytes = self.stats.retained_bytes.saturating_sub(bytes);
            self.stats.reused_surfaces = self.stats.reused_surfaces.saturating_add(1);
            return Ok(p);
        }

        let pixmap = new_pixmap(size)?;
        self.stats.alloc_surfaces = self.stats.alloc_surfaces.saturating_add(1);
        self.stats.alloc_bytes = self.stats.alloc_bytes.saturating_add(bytes as u64);
        Ok(pixmap)
    }

    pub(crate) fn release(&mut self, pixmap: vello_cpu::Pixmap) {
        if self.opts.max_pool_bytes == 0 || self.opts.max_surfaces_per_bucket == 0 {
            self.stats.dropped_on_release = self.stats.dropped_on_release.saturating_add(1);
            return;
        }

        let size = ISize::new(u32::from(pixmap.width()), u32::from(pixmap.height()));
        let bytes = size.rgba8_len();

        if self.stats.retained_bytes.saturating_add(bytes) > self.opts.max_pool_bytes {
            self.stats.dropped_on_release = self.stats.dropped_on_release.saturating_add(1);
            return;
        }

        let bi = match self.bucket_idx_by_size.get(&size).copied() {
            Some(i) => i,
            None => {
                let i = self.buckets.len();
                self.buckets.push(Bucket {
                    surfaces: Vec::new(),
                });
                self.bucket_idx_by_size.insert(size, i);
                i
            }
        };

        let bucket = &mut self.buckets[bi];
        if bucket.surfaces.len() >= self.opts.max_surfaces_per_bucket {
            self.stats.dropped_on_release = self.stats.dropped_on_release.saturating_add(1);
            return;
        }

        bucket.surfaces.push(pixmap);
        self.stats.retained_surfaces = self.stats.retained_surfaces.saturating_add(1);
        self.stats.retained_bytes = self.stats.retained_bytes.saturating_add(bytes);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface_pool.rs"]
mod tests;
