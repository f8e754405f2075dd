use std::path::Path;

use crate::encode::image::{ImageSequenceSink, ImageSink, StillImageKind};
use crate::encode::sink::FrameSink;
use crate::export::format::video::{DEFAULT_FPS, VideoOpts};
use crate::export::format::{ExportFormat, FrameTiming};
use crate::foundation::error::ExportResult;

/// One still image of the current pose.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FrameFormat {
    pub image: StillImageKind,
    /// Nominal rate written into file names; a still never advances its models.
    pub fps: f32,
}

impl Default for FrameFormat {
    fn default() -> Self {
        Self {
            image: StillImageKind::default(),
            fps: DEFAULT_FPS,
        }
    }
}

impl ExportFormat for FrameFormat {
    fn name(&self) -> &'static str {
        "frame"
    }

    fn tag(&self) -> &'static str {
        "frame"
    }

    fn suffix(&self) -> String {
        self.image.extension().to_owned()
    }

    fn timing(&self) -> FrameTiming {
        FrameTiming::Still
    }

    fn file_name_fps(&self) -> f32 {
        self.fps.max(1.0)
    }

    fn open_sink(&self, out_path: &Path) -> ExportResult<Box<dyn FrameSink>> {
        Ok(Box::new(ImageSink::new(out_path, self.image)))
    }
}

/// Numbered PNG frames written into a directory per export unit.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FrameSequenceFormat {
    #[serde(flatten)]
    pub video: VideoOpts,
}

impl ExportFormat for FrameSequenceFormat {
    fn name(&self) -> &'static str {
        "frames"
    }

    fn tag(&self) -> &'static str {
        "frames"
    }

    fn suffix(&self) -> String {
        String::new()
    }

    fn timing(&self) -> FrameTiming {
        self.video.timing()
    }

    fn open_sink(&self, out_path: &Path) -> ExportResult<Box<dyn FrameSink>> {
        Ok(Box::new(ImageSequenceSink::new(out_path)))
    }
}
