use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::encode::ffmpeg::ensure_parent_dir;
use crate::encode::sink::{FrameSink, SinkConfig, check_frame, straight_bytes};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ExportError, ExportResult};
use crate::render::frame::Frame;

/// Still image container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StillImageKind {
    #[default]
    Png,
    Jpeg,
    Bmp,
    Tiff,
    Webp,
}

impl StillImageKind {
    /// File extension including the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => ".png",
            Self::Jpeg => ".jpg",
            Self::Bmp => ".bmp",
            Self::Tiff => ".tif",
            Self::Webp => ".webp",
        }
    }

    fn image_format(self) -> ::image::ImageFormat {
        match self {
            Self::Png => ::image::ImageFormat::Png,
            Self::Jpeg => ::image::ImageFormat::Jpeg,
            Self::Bmp => ::image::ImageFormat::Bmp,
            Self::Tiff => ::image::ImageFormat::Tiff,
            Self::Webp => ::image::ImageFormat::WebP,
        }
    }

    fn keeps_alpha(self) -> bool {
        !matches!(self, Self::Jpeg)
    }
}

/// Write one straight-alpha frame to `path`.
///
/// Containers without an alpha channel receive the color channels only.
pub fn save_frame(path: &Path, frame: &Frame, kind: StillImageKind) -> ExportResult<()> {
    let mut scratch = Vec::new();
    let rgba = straight_bytes(frame, &mut scratch);

    let (bytes, color) = if kind.keeps_alpha() {
        (rgba.to_vec(), ::image::ColorType::Rgba8)
    } else {
        let rgb = rgba
            .chunks_exact(4)
            .flat_map(|p| [p[0], p[1], p[2]])
            .collect::<Vec<_>>();
        (rgb, ::image::ColorType::Rgb8)
    };

    ::image::save_buffer_with_format(
        path,
        &bytes,
        frame.width,
        frame.height,
        color,
        kind.image_format(),
    )
    .with_context(|| format!("write image '{}'", path.display()))?;
    Ok(())
}

/// Sink writing exactly one frame to a single image file.
#[derive(Debug)]
pub struct ImageSink {
    path: PathBuf,
    kind: StillImageKind,
    cfg: Option<SinkConfig>,
    written: bool,
}

impl ImageSink {
    pub fn new(path: impl Into<PathBuf>, kind: StillImageKind) -> Self {
        Self {
            path: path.into(),
            kind,
            cfg: None,
            written: false,
        }
    }
}

impl FrameSink for ImageSink {
    fn begin(&mut self, cfg: SinkConfig) -> ExportResult<()> {
        ensure_parent_dir(&self.path)?;
        self.cfg = Some(cfg);
        self.written = false;
        Ok(())
    }

    fn push_frame(&mut self, _idx: FrameIndex, frame: &Frame) -> ExportResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| ExportError::encode("image sink not started"))?;
        if self.written {
            return Err(ExportError::encode("image sink accepts a single frame"));
        }
        check_frame(cfg, frame)?;
        save_frame(&self.path, frame, self.kind)?;
        self.written = true;
        Ok(())
    }

    fn end(&mut self) -> ExportResult<()> {
        self.cfg = None;
        if !self.written {
            return Err(ExportError::encode(format!(
                "no frame was written to '{}'",
                self.path.display()
            )));
        }
        Ok(())
    }
}

/// Sink writing every frame as a numbered PNG inside one directory.
#[derive(Debug)]
pub struct ImageSequenceSink {
    dir: PathBuf,
    cfg: Option<SinkConfig>,
    count: u64,
}

impl ImageSequenceSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cfg: None,
            count: 0,
        }
    }

    /// Path of the `idx`-th frame.
    pub fn frame_path(&self, idx: FrameIndex) -> PathBuf {
        self.dir.join(format!("{:06}.png", idx.0))
    }
}

impl FrameSink for ImageSequenceSink {
    fn begin(&mut self, cfg: SinkConfig) -> ExportResult<()> {
        if self.dir.is_file() {
            return Err(ExportError::validation(format!(
                "frame directory '{}' is a file",
                self.dir.display()
            )));
        }
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create frame directory '{}'", self.dir.display()))?;
        self.cfg = Some(cfg);
        self.count = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> ExportResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| ExportError::encode("image sequence sink not started"))?;
        check_frame(cfg, frame)?;
        save_frame(&self.frame_path(idx), frame, StillImageKind::Png)?;
        self.count += 1;
        Ok(())
    }

    fn end(&mut self) -> ExportResult<()> {
        self.cfg = None;
        tracing::debug!(frames = self.count, dir = %self.dir.display(), "frame sequence written");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/image.rs"]
mod tests;
