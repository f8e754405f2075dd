//! Pure viewport and canvas geometry.

/// Canvas bounds and export viewport construction.
pub mod canvas;
