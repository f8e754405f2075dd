use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use anyhow::Context as _;

use crate::encode::sink::{FrameSink, SinkConfig, check_frame, straight_bytes};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ExportError, ExportResult};
use crate::render::frame::Frame;

/// Output-side ffmpeg arguments for one container/codec choice.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FfmpegOutput {
    /// Forced container (`-f`).
    pub format: String,
    /// Video codec (`-c:v`).
    pub codec: Option<String>,
    /// Output pixel format (`-pix_fmt`).
    pub pixel_format: Option<String>,
    /// Simple filter graph (`-vf`).
    pub filter: Option<String>,
    /// Complex filter graph (`-filter_complex`).
    pub filter_complex: Option<String>,
    /// Extra arguments, appended last so they override everything above.
    pub args: Vec<String>,
}

impl FfmpegOutput {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            ..Self::default()
        }
    }

    /// Append `key value` pairs.
    pub fn arg_pair(&mut self, key: &str, value: impl ToString) -> &mut Self {
        self.args.push(key.to_owned());
        self.args.push(value.to_string());
        self
    }

    /// Append a free-form argument string, split on whitespace.
    pub fn custom(&mut self, extra: &str) -> &mut Self {
        self.args
            .extend(extra.split_whitespace().map(str::to_owned));
        self
    }

    /// Arguments placed between the input and the output path.
    pub fn to_args(&self) -> Vec<String> {
        let mut out = vec!["-an".to_owned()];
        if let Some(c) = &self.codec {
            out.extend(["-c:v".to_owned(), c.clone()]);
        }
        if let Some(p) = &self.pixel_format {
            out.extend(["-pix_fmt".to_owned(), p.clone()]);
        }
        if let Some(f) = &self.filter {
            out.extend(["-vf".to_owned(), f.clone()]);
        }
        if let Some(f) = &self.filter_complex {
            out.extend(["-filter_complex".to_owned(), f.clone()]);
        }
        out.extend(self.args.iter().cloned());
        if !self.format.is_empty() {
            out.extend(["-f".to_owned(), self.format.clone()]);
        }
        out
    }
}

/// Options for [`FfmpegSink`].
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output file path.
    pub out_path: PathBuf,
    /// Overwrite the output file if it already exists.
    pub overwrite: bool,
    /// Output arguments.
    pub output: FfmpegOutput,
}

impl FfmpegSinkOpts {
    pub fn new(out_path: impl Into<PathBuf>, output: FfmpegOutput) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            output,
        }
    }
}

/// Sink that spawns the system `ffmpeg` and streams straight RGBA8 frames to its stdin.
///
/// Dropping a sink whose `end` was never reached kills the child process.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    scratch: Vec<u8>,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
}

impl FfmpegSink {
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            scratch: Vec::new(),
            cfg: None,
            last_idx: None,
        }
    }

    /// Full argument list for a stream described by `cfg`.
    pub fn command_args(&self, cfg: &SinkConfig, fps: f32) -> Vec<String> {
        let mut args = vec![if self.opts.overwrite { "-y" } else { "-n" }.to_owned()];
        args.extend(
            [
                "-loglevel",
                "error",
                "-f",
                "rawvideo",
                "-pix_fmt",
                "rgba",
                "-s",
            ]
            .map(str::to_owned),
        );
        args.push(format!("{}x{}", cfg.width, cfg.height));
        args.extend(["-r".to_owned(), fps.to_string()]);
        args.extend(["-i".to_owned(), "pipe:0".to_owned()]);
        args.extend(self.opts.output.to_args());
        args.push(self.opts.out_path.to_string_lossy().into_owned());
        args
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> ExportResult<()> {
        let fps = match cfg.fps {
            Some(f) if f > 0.0 && f.is_finite() => f,
            _ => return Err(ExportError::validation("ffmpeg sink needs a positive fps")),
        };
        if cfg.width == 0 || cfg.height == 0 {
            return Err(ExportError::validation(
                "ffmpeg sink width/height must be non-zero",
            ));
        }

        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(ExportError::validation(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }

        let args = self.command_args(&cfg, fps);
        tracing::debug!(?args, "spawning ffmpeg");

        let mut child = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                ExportError::encode(format!(
                    "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
                ))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ExportError::encode("failed to open ffmpeg stdin"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| ExportError::encode("failed to open ffmpeg stderr"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> ExportResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| ExportError::encode("ffmpeg sink not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(ExportError::encode(
                "ffmpeg sink received out-of-order frame index",
            ));
        }
        check_frame(cfg, frame)?;
        self.last_idx = Some(idx);

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(ExportError::encode("ffmpeg sink is already finalized"));
        };

        use std::io::Write as _;
        stdin
            .write_all(straight_bytes(frame, &mut self.scratch))
            .map_err(|e| ExportError::encode(format!("failed to write frame to ffmpeg stdin: {e}")))?;
        Ok(())
    }

    fn end(&mut self) -> ExportResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| ExportError::encode("ffmpeg sink not started"))?;

        let status = child
            .wait()
            .map_err(|e| ExportError::encode(format!("failed to wait for ffmpeg to finish: {e}")))?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| ExportError::encode("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| ExportError::encode(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };

        self.cfg = None;
        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(ExportError::encode(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
            tracing::warn!(
                path = %self.opts.out_path.display(),
                "ffmpeg stopped before the output was finalized"
            );
        }
    }
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> ExportResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
