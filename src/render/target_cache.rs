//! Export geometry cache.
//!
//! Holds the resolved surface size and viewport for the fixed-resolution slot and for every
//! ordered model set seen in automatic-resolution mode, together with the pool of offscreen
//! surfaces reused between frames. Everything is dropped by [`RenderTargetCache::clear`], which
//! the exporter calls at the start and end of each export run.

use std::collections::HashMap;

use crate::export::config::ExportConfig;
use crate::foundation::core::{Rect, Size, Viewport};
use crate::foundation::error::{ExportError, ExportResult};
use crate::geometry::canvas::{auto_view, constrained_view, overflow_view, surface_size};
use crate::model::Renderable;
use crate::render::surface_pool::{SurfacePool, SurfacePoolOpts, SurfacePoolStats};

/// Resolved output geometry for one cache entry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderTarget {
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// World region mapped onto the surface.
    pub viewport: Viewport,
}

/// Cache counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Geometry entries created.
    pub targets_created: u64,
    /// Geometry entries dropped by [`RenderTargetCache::clear`].
    pub targets_released: u64,
    /// Calls to [`RenderTargetCache::clear`].
    pub clears: u64,
    /// Offscreen surface counters.
    pub surfaces: SurfacePoolStats,
}

/// Geometry and surface cache for one exporter.
pub struct RenderTargetCache {
    fixed: Option<RenderTarget>,
    auto: HashMap<String, RenderTarget>,
    pool: SurfacePool,
    targets_created: u64,
    targets_released: u64,
    clears: u64,
}

impl RenderTargetCache {
    /// Create an empty cache.
    pub fn new(opts: SurfacePoolOpts) -> Self {
        Self {
            fixed: None,
            auto: HashMap::new(),
            pool: SurfacePool::new(opts),
            targets_created: 0,
            targets_released: 0,
            clears: 0,
        }
    }

    /// Cache key for an ordered model set: ids joined with `|`.
    ///
    /// Order matters: `[a, b]` and `[b, a]` are distinct entries.
    pub fn key_for(models: &[&dyn Renderable]) -> String {
        models.iter().map(|m| m.id()).collect::<Vec<_>>().join("|")
    }

    /// Resolve (creating on first use) the target for `models` under `config`.
    pub fn target_for(
        &mut self,
        config: &ExportConfig,
        models: &[&dyn Renderable],
    ) -> ExportResult<RenderTarget> {
        if config.auto_resolution {
            self.auto_target(config, models)
        } else {
            Ok(self.fixed_target(config))
        }
    }

    fn fixed_target(&mut self, config: &ExportConfig) -> RenderTarget {
        if let Some(t) = self.fixed {
            return t;
        }

        let viewport = if config.allow_content_overflow {
            overflow_view(
                &config.preview_view,
                config.resolution,
                config.margin,
                config.padding,
            )
        } else {
            constrained_view(
                &config.preview_view,
                config.resolution,
                config.margin,
                config.padding,
            )
        };
        let (width, height) = surface_size(config.resolution, config.margin).to_surface_dims();
        let target = RenderTarget {
            width,
            height,
            viewport,
        };

        self.fixed = Some(target);
        self.targets_created += 1;
        target
    }

    fn auto_target(
        &mut self,
        config: &ExportConfig,
        models: &[&dyn Renderable],
    ) -> ExportResult<RenderTarget> {
        let key = Self::key_for(models);
        if let Some(t) = self.auto.get(&key) {
            return Ok(*t);
        }

        let bounds = models
            .iter()
            .map(|m| m.bounds())
            .reduce(|a, b| a.union(b))
            .ok_or_else(|| ExportError::render("automatic resolution needs at least one model"))?;

        let resolution = content_resolution(bounds);
        let viewport = auto_view(bounds, resolution, config.margin);
        let (width, height) = surface_size(resolution, config.margin).to_surface_dims();

        tracing::info!(
            width = resolution.width,
            height = resolution.height,
            models = models.len(),
            "auto resolution"
        );

        let target = RenderTarget {
            width,
            height,
            viewport,
        };
        self.auto.insert(key, target);
        self.targets_created += 1;
        Ok(target)
    }

    /// Number of cached geometry entries.
    pub fn len(&self) -> usize {
        self.auto.len() + usize::from(self.fixed.is_some())
    }

    /// Return `true` when no geometry is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Take a cleared-by-caller offscreen surface of the given size.
    pub fn borrow_surface(&mut self, width: u32, height: u32) -> ExportResult<vello_cpu::Pixmap> {
        self.pool.borrow(width, height)
    }

    /// Return a surface obtained from [`RenderTargetCache::borrow_surface`].
    pub fn release_surface(&mut self, pixmap: vello_cpu::Pixmap) {
        self.pool.release(pixmap);
    }

    /// Drop every cached viewport and pooled surface.
    pub fn clear(&mut self) {
        let released = self.auto.len() + usize::from(self.fixed.take().is_some());
        self.auto.clear();
        self.pool.clear();
        self.targets_released += released as u64;
        self.clears += 1;
    }

    /// Current counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            targets_created: self.targets_created,
            targets_released: self.targets_released,
            clears: self.clears,
            surfaces: self.pool.stats(),
        }
    }
}

impl Default for RenderTargetCache {
    fn default() -> Self {
        Self::new(SurfacePoolOpts::default())
    }
}

/// Content size rounded up to whole pixels, coerced like any user resolution.
fn content_resolution(bounds: Rect) -> Size {
    let dim = |v: f64| {
        let v = v.abs().ceil();
        if v >= f64::from(i32::MAX) {
            i32::MAX
        } else {
            v as i32
        }
    };
    Size::new(dim(bounds.width()), dim(bounds.height())).clamped()
}

#[cfg(test)]
#[path = "../../tests/unit/render/target_cache.rs"]
mod tests;
