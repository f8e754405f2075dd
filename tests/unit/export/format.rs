use super::*;
use crate::encode::image::StillImageKind;

#[test]
fn every_registered_name_resolves() {
    for name in FORMAT_NAMES {
        let format = format_by_name(name).unwrap();
        assert_eq!(format.name(), *name);
        assert_eq!(format.validate(), None, "{name}");
    }
    assert!(format_by_name("avi").is_none());
    assert_eq!(format_by_name(" MP4 ").unwrap().name(), "mp4");
}

#[test]
fn ffmpeg_formats_share_the_ffmpeg_tag() {
    for name in ["gif", "webp", "mp4", "webm", "mov", "mkv", "custom"] {
        assert_eq!(format_by_name(name).unwrap().tag(), "ffmpeg");
    }
    assert_eq!(format_by_name("frame").unwrap().tag(), "frame");
    assert_eq!(format_by_name("frames").unwrap().tag(), "frames");
}

#[test]
fn still_frame_renders_once_under_a_nominal_rate() {
    let format = FrameFormat {
        image: StillImageKind::Jpeg,
        fps: 24.0,
    };
    assert_eq!(format.suffix(), ".jpg");
    assert_eq!(format.timing(), FrameTiming::Still);
    assert_eq!(format.timing().fps(), None);
    assert_eq!(format.timing().frame_count(&[]), 1);
    assert_eq!(format.file_name_fps(), 24.0);

    let video = VideoOpts {
        fps: 12.0,
        ..VideoOpts::default()
    };
    assert_eq!(format_with_video("frame", video).unwrap().file_name_fps(), 12.0);
    assert_eq!(format_by_name("frame").unwrap().file_name_fps(), 30.0);
    assert_eq!(format_by_name("mp4").unwrap().file_name_fps(), 30.0);
}

#[test]
fn video_timing_clamps_fps_and_counts_frames() {
    let timing = VideoOpts {
        fps: 0.25,
        duration_secs: 3.0,
        custom_argument: String::new(),
    }
    .timing();
    assert_eq!(timing.fps(), Some(1.0));
    assert_eq!(timing.frame_count(&[]), 3);

    let timing = FrameTiming::Video {
        fps: 30.0,
        duration_secs: 0.01,
    };
    assert_eq!(timing.frame_count(&[]), 1);
    assert!((timing.frame_delta() - 1.0 / 30.0).abs() < 1e-6);
}

#[test]
fn mp4_output_pads_to_even_size_and_appends_custom_args() {
    let mp4 = Mp4Format {
        video: VideoOpts {
            custom_argument: "-tune animation".to_owned(),
            ..VideoOpts::default()
        },
        ..Mp4Format::default()
    };
    let out = mp4.output();
    assert_eq!(out.format, "mp4");
    assert_eq!(out.codec.as_deref(), Some("libx264"));
    assert_eq!(out.filter.as_deref(), Some("pad=ceil(iw/2)*2:ceil(ih/2)*2"));
    assert_eq!(out.args[out.args.len() - 2..], ["-tune", "animation"]);
    assert_eq!(mp4.file_name_note_suffix(), "medium_crf23");
}

#[test]
fn gif_keeps_transparency_in_palette() {
    let out = GifFormat::default().output();
    let graph = out.filter_complex.unwrap();
    assert!(graph.contains("reserve_transparent=1"));
    assert!(graph.contains("alpha_threshold=128"));
    assert_eq!(out.args, ["-loop", "0"]);
}

#[test]
fn mov_uses_alpha_capable_prores() {
    let out = MovFormat::default().output();
    assert_eq!(out.codec.as_deref(), Some("prores_ks"));
    assert_eq!(out.pixel_format.as_deref(), Some("yuva444p10le"));
    assert_eq!(MovFormat::default().file_name_note_suffix(), "prores4444");
}

#[test]
fn custom_format_validates_container_and_suffix() {
    let mut custom = CustomFormat::default();
    assert_eq!(custom.validate(), None);

    custom.suffix = "mkv".to_owned();
    assert_eq!(ExportFormat::suffix(&custom), ".mkv");

    custom.format = " ".to_owned();
    assert!(custom.validate().unwrap().contains("container"));

    custom.format = "matroska".to_owned();
    custom.suffix = String::new();
    assert!(custom.validate().unwrap().contains("extension"));
}

#[test]
fn custom_format_skips_blank_codec_settings() {
    let custom = CustomFormat {
        codec: String::new(),
        pixel_format: " ".to_owned(),
        bitrate: "8M".to_owned(),
        ..CustomFormat::default()
    };
    let out = custom.output();
    assert_eq!(out.codec, None);
    assert_eq!(out.pixel_format, None);
    assert_eq!(out.args, ["-b:v", "8M"]);
}

#[test]
fn format_options_deserialize_with_flattened_video_opts() {
    let webp: WebpFormat =
        serde_json::from_str(r#"{"fps":12,"lossless":true,"custom_argument":"-an"}"#).unwrap();
    assert_eq!(webp.video.fps, 12.0);
    assert_eq!(webp.video.duration_secs, -1.0);
    assert_eq!(webp.file_name_note_suffix(), "lossless");
}
