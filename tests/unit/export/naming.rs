use super::*;

#[test]
fn video_name_has_rounded_fps_and_note() {
    assert_eq!(
        file_name("ffmpeg", "240131154502", 30.0, "medium_crf23", ".mp4"),
        "ffmpeg_240131154502_30_medium_crf23.mp4"
    );
    assert_eq!(
        file_name("hero", "240131154502", 23.976, "", ".gif"),
        "hero_240131154502_24.gif"
    );
}

#[test]
fn blank_note_is_omitted() {
    assert_eq!(
        file_name("hero", "240131154502", 30.0, "  ", ".png"),
        "hero_240131154502_30.png"
    );
}

#[test]
fn timestamp_has_twelve_digits() {
    let ts = timestamp_now();
    assert_eq!(ts.len(), 12);
    assert!(ts.chars().all(|c| c.is_ascii_digit()));
}
