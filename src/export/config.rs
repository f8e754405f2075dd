use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::core::{Insets, Rgba8, Size, Viewport};
use crate::foundation::error::{ExportError, ExportResult};

/// Settings shared by every export format.
///
/// Values are coerced rather than rejected: non-positive resolution components become 100,
/// negative margin/padding components become 0. See [`ExportConfig::normalize`].
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Output directory. Required for combined exports; individual exports fall back to each
    /// model's assets directory when unset.
    pub output_dir: Option<PathBuf>,
    /// Produce one combined output instead of one output per model.
    pub export_single: bool,
    /// Content resolution in pixels, excluding margin.
    pub resolution: Size,
    /// Snapshot of the interactive preview's view.
    pub preview_view: Viewport,
    /// Export only models flagged as selected.
    pub render_selected_only: bool,
    /// Straight-alpha background color.
    pub background: Rgba8,
    /// Transparent border added around the content, in pixels.
    pub margin: Insets,
    /// Inner spacing between content and the output edge, in pixels.
    pub padding: Insets,
    /// Expand the visible region into the padding instead of shrinking content into it.
    pub allow_content_overflow: bool,
    /// Derive resolution from the content bounds of the models being exported.
    pub auto_resolution: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            export_single: false,
            resolution: Size::default(),
            preview_view: Viewport::default(),
            render_selected_only: false,
            background: Rgba8::transparent(),
            margin: Insets::default(),
            padding: Insets::default(),
            allow_content_overflow: false,
            auto_resolution: false,
        }
    }
}

impl ExportConfig {
    /// Load from a JSON file; missing fields take their defaults.
    pub fn from_path(path: &Path) -> ExportResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read export config '{}'", path.display()))?;
        let mut cfg: Self = serde_json::from_str(&text).map_err(|e| {
            ExportError::serde(format!("invalid export config '{}': {e}", path.display()))
        })?;
        cfg.normalize();
        Ok(cfg)
    }

    /// Coerce out-of-range values into range.
    pub fn normalize(&mut self) {
        self.resolution = self.resolution.clamped();
        self.margin = self.margin.clamped();
        self.padding = self.padding.clamped();
        if self
            .output_dir
            .as_ref()
            .is_some_and(|d| d.as_os_str().to_string_lossy().trim().is_empty())
        {
            self.output_dir = None;
        }
    }

    /// Check the output location. Returns the first problem found, or `None`.
    ///
    /// On success a relative output directory is replaced by its absolute form.
    pub fn validate(&mut self) -> Option<String> {
        self.normalize();

        match self.output_dir.as_ref() {
            Some(dir) if dir.is_file() => {
                return Some(format!(
                    "output folder '{}' is a file, not a folder",
                    dir.display()
                ));
            }
            Some(dir) if !dir.is_dir() => {
                return Some(format!("output folder '{}' does not exist", dir.display()));
            }
            None if self.export_single => {
                return Some("an output folder is required when exporting a single file".to_owned());
            }
            _ => {}
        }

        if let Some(dir) = self.output_dir.as_mut()
            && let Ok(abs) = std::path::absolute(&*dir)
        {
            *dir = abs;
        }
        None
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/config.rs"]
mod tests;
