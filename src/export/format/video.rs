use std::path::Path;

use crate::encode::ffmpeg::{FfmpegOutput, FfmpegSink, FfmpegSinkOpts};
use crate::encode::sink::FrameSink;
use crate::export::format::{ExportFormat, FrameTiming};
use crate::foundation::error::ExportResult;

/// Frame rate, length and pass-through arguments shared by video formats.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct VideoOpts {
    /// Frames per second; values below 1 are treated as 1.
    pub fps: f32,
    /// Length in seconds; negative means the longest model animation.
    pub duration_secs: f32,
    /// Extra ffmpeg output arguments, split on whitespace.
    pub custom_argument: String,
}

/// Frame rate used when none is configured.
pub const DEFAULT_FPS: f32 = 30.0;

impl Default for VideoOpts {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            duration_secs: -1.0,
            custom_argument: String::new(),
        }
    }
}

impl VideoOpts {
    pub fn timing(&self) -> FrameTiming {
        FrameTiming::Video {
            fps: self.fps.max(1.0),
            duration_secs: self.duration_secs,
        }
    }
}

/// A video format encoded by the system `ffmpeg`.
///
/// Every implementor is an [`ExportFormat`] with tag `ffmpeg`.
pub trait FfmpegFormat: std::fmt::Debug {
    fn registry_name(&self) -> &'static str;

    fn video(&self) -> &VideoOpts;

    /// Container passed to `-f`.
    fn container(&self) -> String;

    /// File extension including the dot.
    fn extension(&self) -> String;

    /// Settings summary for file names.
    fn settings_note(&self) -> String {
        String::new()
    }

    /// Codec, pixel format and filter arguments.
    fn configure_output(&self, _out: &mut FfmpegOutput) {}

    /// Complete output arguments, custom argument last.
    fn output(&self) -> FfmpegOutput {
        let mut out = FfmpegOutput::new(self.container());
        self.configure_output(&mut out);
        out.custom(&self.video().custom_argument);
        out
    }
}

impl<T: FfmpegFormat> ExportFormat for T {
    fn name(&self) -> &'static str {
        self.registry_name()
    }

    fn tag(&self) -> &'static str {
        "ffmpeg"
    }

    fn suffix(&self) -> String {
        self.extension()
    }

    fn file_name_note_suffix(&self) -> String {
        self.settings_note()
    }

    fn validate(&self) -> Option<String> {
        if self.container().trim().is_empty() {
            return Some("an ffmpeg container format is required".to_owned());
        }
        if self.extension().trim().is_empty() {
            return Some("a file extension is required".to_owned());
        }
        None
    }

    fn timing(&self) -> FrameTiming {
        self.video().timing()
    }

    fn open_sink(&self, out_path: &Path) -> ExportResult<Box<dyn FrameSink>> {
        Ok(Box::new(FfmpegSink::new(FfmpegSinkOpts::new(
            out_path,
            self.output(),
        ))))
    }
}

/// Pads odd dimensions up to the next even size, required by 4:2:0 chroma subsampling.
const EVEN_PAD_FILTER: &str = "pad=ceil(iw/2)*2:ceil(ih/2)*2";

/// Animated GIF with a generated palette that keeps transparency.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GifFormat {
    #[serde(flatten)]
    pub video: VideoOpts,
    /// Palette size, 2..=256.
    pub max_colors: u32,
    /// `paletteuse` dither mode.
    pub dither: String,
    /// Pixels with alpha below this become fully transparent.
    pub alpha_threshold: u8,
    pub loop_forever: bool,
}

impl Default for GifFormat {
    fn default() -> Self {
        Self {
            video: VideoOpts::default(),
            max_colors: 256,
            dither: "bayer".to_owned(),
            alpha_threshold: 128,
            loop_forever: true,
        }
    }
}

impl FfmpegFormat for GifFormat {
    fn registry_name(&self) -> &'static str {
        "gif"
    }
    fn video(&self) -> &VideoOpts {
        &self.video
    }
    fn container(&self) -> String {
        "gif".to_owned()
    }
    fn extension(&self) -> String {
        ".gif".to_owned()
    }
    fn settings_note(&self) -> String {
        format!("{}c", self.max_colors.clamp(2, 256))
    }
    fn configure_output(&self, out: &mut FfmpegOutput) {
        out.filter_complex = Some(format!(
            "split[s0][s1];[s0]palettegen=reserve_transparent=1:max_colors={}[p];[s1][p]paletteuse=dither={}:alpha_threshold={}",
            self.max_colors.clamp(2, 256),
            self.dither,
            self.alpha_threshold
        ));
        out.arg_pair("-loop", if self.loop_forever { 0 } else { -1 });
    }
}

/// Animated WebP.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct WebpFormat {
    #[serde(flatten)]
    pub video: VideoOpts,
    pub lossless: bool,
    /// 0..=100, ignored when lossless.
    pub quality: u8,
    pub loop_forever: bool,
}

impl Default for WebpFormat {
    fn default() -> Self {
        Self {
            video: VideoOpts::default(),
            lossless: false,
            quality: 75,
            loop_forever: true,
        }
    }
}

impl FfmpegFormat for WebpFormat {
    fn registry_name(&self) -> &'static str {
        "webp"
    }
    fn video(&self) -> &VideoOpts {
        &self.video
    }
    fn container(&self) -> String {
        "webp".to_owned()
    }
    fn extension(&self) -> String {
        ".webp".to_owned()
    }
    fn settings_note(&self) -> String {
        if self.lossless {
            "lossless".to_owned()
        } else {
            format!("q{}", self.quality.min(100))
        }
    }
    fn configure_output(&self, out: &mut FfmpegOutput) {
        out.codec = Some("libwebp_anim".to_owned());
        out.pixel_format = Some("yuva420p".to_owned());
        out.arg_pair("-lossless", u8::from(self.lossless))
            .arg_pair("-quality", self.quality.min(100))
            .arg_pair("-loop", if self.loop_forever { 0 } else { 1 });
    }
}

/// H.264 in MP4. No alpha channel.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Mp4Format {
    #[serde(flatten)]
    pub video: VideoOpts,
    /// Constant rate factor, 0..=51.
    pub crf: u8,
    /// x264 preset name.
    pub preset: String,
}

impl Default for Mp4Format {
    fn default() -> Self {
        Self {
            video: VideoOpts::default(),
            crf: 23,
            preset: "medium".to_owned(),
        }
    }
}

impl FfmpegFormat for Mp4Format {
    fn registry_name(&self) -> &'static str {
        "mp4"
    }
    fn video(&self) -> &VideoOpts {
        &self.video
    }
    fn container(&self) -> String {
        "mp4".to_owned()
    }
    fn extension(&self) -> String {
        ".mp4".to_owned()
    }
    fn settings_note(&self) -> String {
        format!("{}_crf{}", self.preset, self.crf.min(51))
    }
    fn configure_output(&self, out: &mut FfmpegOutput) {
        out.codec = Some("libx264".to_owned());
        out.pixel_format = Some("yuv420p".to_owned());
        out.filter = Some(EVEN_PAD_FILTER.to_owned());
        out.arg_pair("-crf", self.crf.min(51))
            .arg_pair("-preset", &self.preset)
            .arg_pair("-movflags", "+faststart");
    }
}

/// VP9 in WebM, with alpha.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct WebmFormat {
    #[serde(flatten)]
    pub video: VideoOpts,
    /// Constant rate factor, 0..=63.
    pub crf: u8,
}

impl Default for WebmFormat {
    fn default() -> Self {
        Self {
            video: VideoOpts::default(),
            crf: 30,
        }
    }
}

impl FfmpegFormat for WebmFormat {
    fn registry_name(&self) -> &'static str {
        "webm"
    }
    fn video(&self) -> &VideoOpts {
        &self.video
    }
    fn container(&self) -> String {
        "webm".to_owned()
    }
    fn extension(&self) -> String {
        ".webm".to_owned()
    }
    fn settings_note(&self) -> String {
        format!("crf{}", self.crf.min(63))
    }
    fn configure_output(&self, out: &mut FfmpegOutput) {
        out.codec = Some("libvpx-vp9".to_owned());
        out.pixel_format = Some("yuva420p".to_owned());
        out.arg_pair("-crf", self.crf.min(63)).arg_pair("-b:v", 0);
    }
}

/// ProRes profile for [`MovFormat`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProresProfile {
    Proxy,
    Lt,
    Standard,
    Hq,
    #[default]
    #[serde(rename = "4444")]
    P4444,
    #[serde(rename = "4444xq")]
    P4444Xq,
}

impl ProresProfile {
    fn id(self) -> u8 {
        match self {
            Self::Proxy => 0,
            Self::Lt => 1,
            Self::Standard => 2,
            Self::Hq => 3,
            Self::P4444 => 4,
            Self::P4444Xq => 5,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Proxy => "proxy",
            Self::Lt => "lt",
            Self::Standard => "standard",
            Self::Hq => "hq",
            Self::P4444 => "4444",
            Self::P4444Xq => "4444xq",
        }
    }

    fn has_alpha(self) -> bool {
        matches!(self, Self::P4444 | Self::P4444Xq)
    }
}

/// ProRes in QuickTime.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MovFormat {
    #[serde(flatten)]
    pub video: VideoOpts,
    pub profile: ProresProfile,
}

impl FfmpegFormat for MovFormat {
    fn registry_name(&self) -> &'static str {
        "mov"
    }
    fn video(&self) -> &VideoOpts {
        &self.video
    }
    fn container(&self) -> String {
        "mov".to_owned()
    }
    fn extension(&self) -> String {
        ".mov".to_owned()
    }
    fn settings_note(&self) -> String {
        format!("prores{}", self.profile.label())
    }
    fn configure_output(&self, out: &mut FfmpegOutput) {
        out.codec = Some("prores_ks".to_owned());
        out.pixel_format = Some(
            if self.profile.has_alpha() {
                "yuva444p10le"
            } else {
                "yuv422p10le"
            }
            .to_owned(),
        );
        out.arg_pair("-profile:v", self.profile.id())
            .arg_pair("-vendor", "apl0");
    }
}

/// H.265 in Matroska.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MkvFormat {
    #[serde(flatten)]
    pub video: VideoOpts,
    /// Constant rate factor, 0..=51.
    pub crf: u8,
}

impl Default for MkvFormat {
    fn default() -> Self {
        Self {
            video: VideoOpts::default(),
            crf: 23,
        }
    }
}

impl FfmpegFormat for MkvFormat {
    fn registry_name(&self) -> &'static str {
        "mkv"
    }
    fn video(&self) -> &VideoOpts {
        &self.video
    }
    fn container(&self) -> String {
        "matroska".to_owned()
    }
    fn extension(&self) -> String {
        ".mkv".to_owned()
    }
    fn settings_note(&self) -> String {
        format!("crf{}", self.crf.min(51))
    }
    fn configure_output(&self, out: &mut FfmpegOutput) {
        out.codec = Some("libx265".to_owned());
        out.pixel_format = Some("yuv420p".to_owned());
        out.filter = Some(EVEN_PAD_FILTER.to_owned());
        out.arg_pair("-crf", self.crf.min(51));
    }
}

/// User-assembled ffmpeg output.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CustomFormat {
    #[serde(flatten)]
    pub video: VideoOpts,
    /// Container passed to `-f`.
    pub format: String,
    /// Video codec; empty lets ffmpeg choose.
    pub codec: String,
    /// Output pixel format; empty lets ffmpeg choose.
    pub pixel_format: String,
    /// Target bitrate such as `8M`; empty for codec default.
    pub bitrate: String,
    /// File extension, with or without the leading dot.
    pub suffix: String,
}

impl Default for CustomFormat {
    fn default() -> Self {
        Self {
            video: VideoOpts::default(),
            format: "mp4".to_owned(),
            codec: "libx264".to_owned(),
            pixel_format: "yuv420p".to_owned(),
            bitrate: String::new(),
            suffix: ".mp4".to_owned(),
        }
    }
}

impl FfmpegFormat for CustomFormat {
    fn registry_name(&self) -> &'static str {
        "custom"
    }
    fn video(&self) -> &VideoOpts {
        &self.video
    }
    fn container(&self) -> String {
        self.format.trim().to_owned()
    }
    fn extension(&self) -> String {
        let s = self.suffix.trim();
        if s.is_empty() || s.starts_with('.') {
            s.to_owned()
        } else {
            format!(".{s}")
        }
    }
    fn configure_output(&self, out: &mut FfmpegOutput) {
        let non_blank = |s: &str| Some(s.trim().to_owned()).filter(|s| !s.is_empty());
        out.codec = non_blank(&self.codec);
        out.pixel_format = non_blank(&self.pixel_format);
        if let Some(b) = non_blank(&self.bitrate) {
            out.arg_pair("-b:v", b);
        }
    }
}
