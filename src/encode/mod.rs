//! Frame sinks: ffmpeg streams, still images and in-memory capture.

/// ffmpeg process sink.
pub mod ffmpeg;
/// Still image and image sequence sinks.
pub mod image;
/// Sink contract.
pub mod sink;
