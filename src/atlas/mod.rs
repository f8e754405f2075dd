//! Text atlas output for converted texture atlases.

/// Atlas text serialization.
pub mod writer;

pub use writer::{write_atlas, write_atlas_file};

/// One atlas page image with its page properties and regions.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AtlasImage {
    /// Page image file name, written as the page's first line.
    pub head: String,
    /// Page properties in output order, e.g. `("size", "1024,1024")`.
    pub pages: Vec<(String, String)>,
    /// Regions in output order.
    pub regions: Vec<AtlasRegion>,
}

/// One named region of a page.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AtlasRegion {
    pub name: String,
    /// Region properties in output order, e.g. `("bounds", "2,2,100,200")`.
    pub entries: Vec<(String, String)>,
}

impl AtlasRegion {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Append a property.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.push((key.into(), value.into()));
        self
    }
}

/// Read a JSON list of [`AtlasImage`]s.
pub fn images_from_json(text: &str) -> crate::ExportResult<Vec<AtlasImage>> {
    serde_json::from_str(text)
        .map_err(|e| crate::ExportError::serde(format!("invalid atlas description: {e}")))
}
