//! Export orchestration: configuration, formats, file naming and the exporter itself.

pub mod cancel;
/// Shared export settings.
pub mod config;
/// Orchestrator.
pub mod exporter;
pub mod format;
pub mod naming;
