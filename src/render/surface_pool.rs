use std::collections::HashMap;

use crate::foundation::error::{ExportError, ExportResult};

/// Pool configuration for cached surfaces.
#[derive(Debug, Clone, Copy)]
pub struct SurfacePoolOpts {
    /// Maximum bytes retained across all buckets.
    pub max_pool_bytes: usize,
    /// Maximum number of retained surfaces per (w,h) bucket.
    pub max_surfaces_per_bucket: usize,
}

impl Default for SurfacePoolOpts {
    fn default() -> Self {
        Self {
            max_pool_bytes: 256 * 1024 * 1024,
            // A frame needs at most accumulation + layer + un-premultiply target.
            max_surfaces_per_bucket: 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SurfaceKey {
    w: u16,
    h: u16,
}

impl SurfaceKey {
    fn byte_len(self) -> usize {
        (self.w as usize).saturating_mul(self.h as usize) * 4
    }
}

/// Surface allocation counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SurfacePoolStats {
    /// Surfaces currently parked in the pool.
    pub retained_surfaces: usize,
    /// Bytes currently parked in the pool.
    pub retained_bytes: usize,
    /// Surfaces allocated since creation.
    pub alloc_surfaces: u64,
    /// Surfaces dropped, either on release past the caps or by [`SurfacePool::clear`].
    pub dropped_surfaces: u64,
}

/// Bounded pool of offscreen surfaces keyed by `(width, height)`.
///
/// Surfaces borrowed from the pool are owned by the borrower until released; the pool never
/// hands the same surface out twice. Everything retained is dropped by [`SurfacePool::clear`].
pub struct SurfacePool {
    opts: SurfacePoolOpts,
    stats: SurfacePoolStats,
    buckets: HashMap<SurfaceKey, Vec<vello_cpu::Pixmap>>,
}

impl SurfacePool {
    /// Create an empty pool.
    pub fn new(opts: SurfacePoolOpts) -> Self {
        Self {
            opts,
            stats: SurfacePoolStats::default(),
            buckets: HashMap::new(),
        }
    }

    /// Current counters.
    pub fn stats(&self) -> SurfacePoolStats {
        self.stats
    }

    /// Take a `width x height` surface. Contents are unspecified; callers clear before use.
    pub fn borrow(&mut self, width: u32, height: u32) -> ExportResult<vello_cpu::Pixmap> {
        let key = surface_key(width, height)?;
        if let Some(p) = self.buckets.get_mut(&key).and_then(Vec::pop) {
            self.stats.retained_surfaces = self.stats.retained_surfaces.saturating_sub(1);
            self.stats.retained_bytes = self.stats.retained_bytes.saturating_sub(key.byte_len());
            return Ok(p);
        }

        self.stats.alloc_surfaces = self.stats.alloc_surfaces.saturating_add(1);
        Ok(vello_cpu::Pixmap::new(key.w, key.h))
    }

    /// Return a surface borrowed from this pool.
    pub fn release(&mut self, pixmap: vello_cpu::Pixmap) {
        let key = SurfaceKey {
            w: pixmap.width(),
            h: pixmap.height(),
        };
        let bytes = key.byte_len();

        if self.opts.max_pool_bytes == 0
            || self.opts.max_surfaces_per_bucket == 0
            || self.stats.retained_bytes.saturating_add(bytes) > self.opts.max_pool_bytes
        {
            self.stats.dropped_surfaces = self.stats.dropped_surfaces.saturating_add(1);
            return;
        }

        let bucket = self.buckets.entry(key).or_default();
        if bucket.len() >= self.opts.max_surfaces_per_bucket {
            self.stats.dropped_surfaces = self.stats.dropped_surfaces.saturating_add(1);
            return;
        }

        bucket.push(pixmap);
        self.stats.retained_surfaces = self.stats.retained_surfaces.saturating_add(1);
        self.stats.retained_bytes = self.stats.retained_bytes.saturating_add(bytes);
    }

    /// Drop every retained surface.
    pub fn clear(&mut self) {
        let dropped: usize = self.buckets.values().map(Vec::len).sum();
        self.buckets.clear();
        self.stats.dropped_surfaces = self.stats.dropped_surfaces.saturating_add(dropped as u64);
        self.stats.retained_surfaces = 0;
        self.stats.retained_bytes = 0;
    }
}

fn surface_key(width: u32, height: u32) -> ExportResult<SurfaceKey> {
    let w: u16 = width
        .try_into()
        .map_err(|_| ExportError::render(format!("surface width {width} exceeds u16")))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ExportError::render(format!("surface height {height} exceeds u16")))?;
    if w == 0 || h == 0 {
        return Err(ExportError::render("surface must not be empty"));
    }
    Ok(SurfaceKey { w, h })
}
