use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ExportError, ExportResult};
use crate::render::frame::Frame;

/// Stream parameters handed to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SinkConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Frames per second; `None` for still outputs.
    pub fps: Option<f32>,
}

/// Consumer of composited frames for one output unit.
///
/// `push_frame` is called in strictly increasing `FrameIndex` order between one `begin` and one
/// `end`. Frames are produced lazily: the next frame is only rendered after the previous one was
/// accepted.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> ExportResult<()>;
    /// Push one frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> ExportResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> ExportResult<()>;
}

/// Sink that keeps every frame in memory.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, Frame)>,
    ended: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Captured frames in push order.
    pub fn frames(&self) -> &[(FrameIndex, Frame)] {
        &self.frames
    }

    /// Whether `end` was called after the last `begin`.
    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> ExportResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> ExportResult<()> {
        if self.cfg.is_none() {
            return Err(ExportError::encode("in-memory sink not started"));
        }
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> ExportResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Reject frames whose size differs from the configured stream.
pub(crate) fn check_frame(cfg: &SinkConfig, frame: &Frame) -> ExportResult<()> {
    if frame.width != cfg.width || frame.height != cfg.height {
        return Err(ExportError::validation(format!(
            "frame size mismatch: got {}x{}, expected {}x{}",
            frame.width, frame.height, cfg.width, cfg.height
        )));
    }
    if frame.data.len() != frame.width as usize * frame.height as usize * 4 {
        return Err(ExportError::validation(
            "frame.data size mismatch with width*height*4",
        ));
    }
    Ok(())
}

/// Straight-alpha bytes of `frame`, converting only when it is premultiplied.
pub(crate) fn straight_bytes<'a>(frame: &'a Frame, scratch: &'a mut Vec<u8>) -> &'a [u8] {
    if !frame.premultiplied {
        return &frame.data;
    }
    scratch.clear();
    scratch.extend(
        frame
            .data
            .chunks_exact(4)
            .flat_map(|p| crate::effects::composite::unpremultiply([p[0], p[1], p[2], p[3]])),
    );
    scratch
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
