//! Export formats and their registry.

/// Still image and image sequence formats.
pub mod still;
/// ffmpeg-backed video formats.
pub mod video;

use std::path::Path;

use crate::encode::sink::FrameSink;
use crate::foundation::error::ExportResult;
use crate::model::Renderable;

pub use still::{FrameFormat, FrameSequenceFormat};
pub use video::{
    CustomFormat, DEFAULT_FPS, FfmpegFormat, GifFormat, MkvFormat, MovFormat, Mp4Format,
    VideoOpts, WebmFormat, WebpFormat,
};

/// How many frames an export unit produces and how time advances between them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameTiming {
    /// A single frame; models are not advanced.
    Still,
    /// `fps` frames per second for `duration_secs` (negative: longest model animation).
    Video { fps: f32, duration_secs: f32 },
}

impl FrameTiming {
    /// Frame rate written into file names and sink configs.
    pub fn fps(self) -> Option<f32> {
        match self {
            Self::Still => None,
            Self::Video { fps, .. } => Some(fps.max(1.0)),
        }
    }

    /// Seconds the models advance after each frame.
    pub fn frame_delta(self) -> f32 {
        self.fps().map_or(0.0, |fps| 1.0 / fps)
    }

    /// Number of frames to render for `models`. Always at least one.
    pub fn frame_count(self, models: &[&mut dyn Renderable]) -> u64 {
        match self {
            Self::Still => 1,
            Self::Video { duration_secs, .. } => {
                let fps = f64::from(self.fps().unwrap_or(1.0));
                let duration = if duration_secs < 0.0 {
                    models
                        .iter()
                        .map(|m| m.animation_duration())
                        .fold(0.0f32, f32::max)
                } else {
                    duration_secs
                };
                let n = (f64::from(duration) * fps).floor();
                if n.is_finite() && n >= 1.0 {
                    n as u64
                } else {
                    1
                }
            }
        }
    }
}

/// One user-selectable export format.
pub trait ExportFormat: std::fmt::Debug {
    /// Registry name, e.g. `"mp4"`.
    fn name(&self) -> &'static str;

    /// File name stem for combined exports.
    fn tag(&self) -> &'static str;

    /// File name suffix including the leading dot; empty for directory outputs.
    fn suffix(&self) -> String;

    /// Short settings note appended to file names; blank means none.
    fn file_name_note_suffix(&self) -> String {
        String::new()
    }

    /// Format-specific checks, run after the shared configuration checks.
    fn validate(&self) -> Option<String> {
        None
    }

    fn timing(&self) -> FrameTiming;

    /// Frame rate written into file names.
    fn file_name_fps(&self) -> f32 {
        self.timing().fps().unwrap_or(DEFAULT_FPS)
    }

    /// Open a sink writing to `out_path`.
    fn open_sink(&self, out_path: &Path) -> ExportResult<Box<dyn FrameSink>>;
}

/// Registry names, in display order.
pub const FORMAT_NAMES: &[&str] = &[
    "frame", "frames", "gif", "webp", "mp4", "webm", "mov", "mkv", "custom",
];

/// Build a format by registry name with default options.
pub fn format_by_name(name: &str) -> Option<Box<dyn ExportFormat>> {
    format_with_video(name, VideoOpts::default())
}

/// Build a format by registry name; video formats take `video` as their timing options.
pub fn format_with_video(name: &str, video: VideoOpts) -> Option<Box<dyn ExportFormat>> {
    let format: Box<dyn ExportFormat> = match name.trim().to_ascii_lowercase().as_str() {
        "frame" => Box::new(FrameFormat {
            fps: video.fps,
            ..FrameFormat::default()
        }),
        "frames" => Box::new(FrameSequenceFormat { video }),
        "gif" => Box::new(GifFormat {
            video,
            ..GifFormat::default()
        }),
        "webp" => Box::new(WebpFormat {
            video,
            ..WebpFormat::default()
        }),
        "mp4" => Box::new(Mp4Format {
            video,
            ..Mp4Format::default()
        }),
        "webm" => Box::new(WebmFormat {
            video,
            ..WebmFormat::default()
        }),
        "mov" => Box::new(MovFormat {
            video,
            ..MovFormat::default()
        }),
        "mkv" => Box::new(MkvFormat {
            video,
            ..MkvFormat::default()
        }),
        "custom" => Box::new(CustomFormat {
            video,
            ..CustomFormat::default()
        }),
        _ => return None,
    };
    Some(format)
}

#[cfg(test)]
#[path = "../../../tests/unit/export/format.rs"]
mod tests;
