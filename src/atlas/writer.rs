use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Context as _;

use crate::atlas::AtlasImage;
use crate::foundation::error::ExportResult;

/// Write `images` as a text atlas.
///
/// Each page is its head line, one `key: value` line per page property, then for each region
/// its name line followed by its properties, and finally a blank line. Regions carrying a
/// `name` property do not repeat it.
pub fn write_atlas<W: Write>(w: &mut W, images: &[AtlasImage]) -> std::io::Result<()> {
    for image in images {
        writeln!(w, "{}", image.head)?;
        for (key, value) in &image.pages {
            write_entry(w, key, value)?;
        }
        for region in &image.regions {
            writeln!(w, "{}", region.name)?;
            for (key, value) in region.entries.iter().filter(|(k, _)| k != "name") {
                write_entry(w, key, value)?;
            }
        }
        writeln!(w)?;
    }
    Ok(())
}

/// Write `images` to `path`, replacing any existing file.
pub fn write_atlas_file(path: &Path, images: &[AtlasImage]) -> ExportResult<()> {
    let file = File::create(path).with_context(|| format!("create atlas '{}'", path.display()))?;
    let mut w = BufWriter::new(file);
    write_atlas(&mut w, images)
        .and_then(|()| w.flush())
        .with_context(|| format!("write atlas '{}'", path.display()))?;
    tracing::debug!(path = %path.display(), pages = images.len(), "atlas written");
    Ok(())
}

fn write_entry<W: Write>(w: &mut W, key: &str, value: &str) -> std::io::Result<()> {
    writeln!(w, "{key}: {value}")
}

#[cfg(test)]
#[path = "../../tests/unit/atlas/writer.rs"]
mod tests;
