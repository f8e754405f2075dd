//! Frame compositing and export for skeletal-animation viewers.
//!
//! Models are composited back to front into an offscreen premultiplied buffer, converted to
//! straight alpha when the background is not opaque, and streamed into a [`FrameSink`]:
//!
//! - Configure an [`ExportConfig`] and pick an [`ExportFormat`]
//! - Create an [`Exporter`]
//! - Call [`Exporter::export`] with the models, optionally with a [`CancelToken`]
#![forbid(unsafe_code)]

mod foundation;

/// Text atlas writer.
pub mod atlas;
pub(crate) mod effects;
/// Frame sinks.
pub mod encode;
/// Export orchestration.
pub mod export;
/// Canvas geometry.
pub mod geometry;
pub mod logging;
/// Renderable models.
pub mod model;
/// Offscreen rendering and compositing.
pub mod render;

pub use crate::foundation::core::{
    Affine, BezPath, FrameIndex, Insets, MIN_RESOLUTION, PixelRect, Point, Rect, Rgba8, Size,
    Vec2, Viewport,
};
pub use crate::foundation::error::{ExportError, ExportResult};

pub use crate::atlas::{AtlasImage, AtlasRegion, write_atlas, write_atlas_file};
pub use crate::encode::ffmpeg::{FfmpegOutput, FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::image::{ImageSequenceSink, ImageSink, StillImageKind};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::export::cancel::CancelToken;
pub use crate::export::config::ExportConfig;
pub use crate::export::exporter::{ExportReport, Exporter};
pub use crate::export::format::{
    ExportFormat, FORMAT_NAMES, FrameTiming, VideoOpts, format_by_name, format_with_video,
};
pub use crate::model::Renderable;
pub use crate::model::draw::DrawContext;
pub use crate::model::sprite::{SceneFile, SpriteModel};
pub use crate::model::texture::Texture;
pub use crate::render::compositor::{CompositorStats, FrameCompositor};
pub use crate::render::frame::Frame;
pub use crate::render::target_cache::{CacheStats, RenderTarget, RenderTargetCache};
