//! Offscreen rendering: target geometry, pooled surfaces and frame compositing.

/// Layered compositing into export-ready frames.
pub mod compositor;
/// Rendered frame buffers.
pub mod frame;
pub mod surface_pool;
/// Per-export geometry cache.
pub mod target_cache;
