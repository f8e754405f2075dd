//! Per-pixel compositing operations on RGBA8 buffers.

/// Blend, clear and un-premultiply passes.
pub mod composite;
