use super::*;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "spine_export_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn frame() -> Frame {
    Frame {
        width: 2,
        height: 1,
        data: vec![255, 0, 0, 255, 0, 0, 255, 0],
        premultiplied: false,
    }
}

fn cfg() -> SinkConfig {
    SinkConfig {
        width: 2,
        height: 1,
        fps: None,
    }
}

#[test]
fn image_sink_writes_png_with_alpha() {
    let tmp = temp_dir("image_sink_png");
    let path = tmp.join("nested").join("still.png");

    let mut sink = ImageSink::new(&path, StillImageKind::Png);
    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(0), &frame()).unwrap();
    sink.end().unwrap();

    let img = ::image::open(&path).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (2, 1));
    assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_eq!(img.get_pixel(1, 0).0, [0, 0, 255, 0]);

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn image_sink_drops_alpha_for_jpeg() {
    let tmp = temp_dir("image_sink_jpeg");
    let path = tmp.join("still.jpg");

    let mut sink = ImageSink::new(&path, StillImageKind::Jpeg);
    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(0), &frame()).unwrap();
    sink.end().unwrap();

    let img = ::image::open(&path).unwrap();
    assert!(!img.color().has_alpha());

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn image_sink_accepts_exactly_one_frame() {
    let tmp = temp_dir("image_sink_one");
    let mut sink = ImageSink::new(tmp.join("a.png"), StillImageKind::Png);
    sink.begin(cfg()).unwrap();
    assert!(sink.end().is_err());

    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(0), &frame()).unwrap();
    assert!(sink.push_frame(FrameIndex(1), &frame()).is_err());

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn sequence_sink_numbers_frames() {
    let tmp = temp_dir("sequence_sink");
    let dir = tmp.join("hero_240101000000_30");

    let mut sink = ImageSequenceSink::new(&dir);
    sink.begin(SinkConfig {
        fps: Some(30.0),
        ..cfg()
    })
    .unwrap();
    for i in 0..3 {
        sink.push_frame(FrameIndex(i), &frame()).unwrap();
    }
    sink.end().unwrap();

    assert!(dir.join("000000.png").is_file());
    assert!(dir.join("000002.png").is_file());
    assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 3);

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn sequence_sink_refuses_file_target() {
    let tmp = temp_dir("sequence_sink_file");
    std::fs::create_dir_all(&tmp).unwrap();
    let file = tmp.join("taken");
    std::fs::write(&file, b"x").unwrap();

    let mut sink = ImageSequenceSink::new(&file);
    assert!(sink.begin(cfg()).is_err());

    std::fs::remove_dir_all(&tmp).ok();
}
