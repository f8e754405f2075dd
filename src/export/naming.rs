//! Output file names.

/// Format used for the per-export timestamp, e.g. `240131154502`.
pub const TIMESTAMP_FORMAT: &str = "%y%m%d%H%M%S";

/// Timestamp for an export started now, in local time.
pub fn timestamp_now() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Build `{stem}_{timestamp}_{fps}[_{note}]{suffix}`.
///
/// `fps` is rendered without decimals; blank notes are omitted.
pub fn file_name(stem: &str, timestamp: &str, fps: f32, note: &str, suffix: &str) -> String {
    let mut name = format!("{stem}_{timestamp}_{fps:.0}");
    let note = note.trim();
    if !note.is_empty() {
        name.push('_');
        name.push_str(note);
    }
    name.push_str(suffix);
    name
}

#[cfg(test)]
#[path = "../../tests/unit/export/naming.rs"]
mod tests;
