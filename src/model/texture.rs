use std::path::Path;
use std::sync::{Arc, OnceLock};

use anyhow::Context as _;

use crate::effects::composite::premultiply;
use crate::foundation::error::{ExportError, ExportResult};

/// An RGBA8 raster ready to be used as image paint.
///
/// Bytes are kept exactly as supplied. Whether they are already premultiplied is a property of
/// the model that draws them (see [`crate::Renderable::use_pma`]); the rasterizer needs
/// premultiplied paint, so straight bytes are premultiplied once on first use and cached.
#[derive(Clone)]
pub struct Texture {
    width: u16,
    height: u16,
    bytes: Arc<[u8]>,
    as_premultiplied: Arc<OnceLock<vello_cpu::Image>>,
    as_straight: Arc<OnceLock<vello_cpu::Image>>,
}

impl Texture {
    /// Wrap tightly packed RGBA8 bytes.
    pub fn from_rgba8(bytes: &[u8], width: u32, height: u32) -> ExportResult<Self> {
        let w: u16 = width
            .try_into()
            .map_err(|_| ExportError::render("texture width exceeds u16"))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| ExportError::render("texture height exceeds u16"))?;
        if w == 0 || h == 0 {
            return Err(ExportError::render("texture must not be empty"));
        }
        if bytes.len() != (width as usize) * (height as usize) * 4 {
            return Err(ExportError::render("texture byte length mismatch"));
        }

        Ok(Self {
            width: w,
            height: h,
            bytes: Arc::from(bytes),
            as_premultiplied: Arc::default(),
            as_straight: Arc::default(),
        })
    }

    /// Decode an image file (any format supported by `image`).
    pub fn load(path: &Path) -> ExportResult<Self> {
        let img = image::open(path)
            .with_context(|| format!("decode texture '{}'", path.display()))?
            .to_rgba8();
        let (width, height) = img.dimensions();
        Self::from_rgba8(img.as_raw(), width, height)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        u32::from(self.width)
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        u32::from(self.height)
    }

    /// Image paint with the bytes read as premultiplied (`true`) or straight (`false`).
    pub(crate) fn paint(&self, source_premultiplied: bool) -> vello_cpu::Image {
        let slot = if source_premultiplied {
            &self.as_premultiplied
        } else {
            &self.as_straight
        };
        slot.get_or_init(|| self.build_paint(source_premultiplied)).clone()
    }

    fn build_paint(&self, source_premultiplied: bool) -> vello_cpu::Image {
        let mut may_have_opacities = false;
        let pixels: Vec<_> = self
            .bytes
            .chunks_exact(4)
            .map(|px| {
                let px = [px[0], px[1], px[2], px[3]];
                may_have_opacities |= px[3] != 255;
                let px = if source_premultiplied {
                    px
                } else {
                    premultiply(px)
                };
                vello_cpu::peniko::color::PremulRgba8::from_u8_array(px)
            })
            .collect();
        let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(
            pixels,
            self.width,
            self.height,
            may_have_opacities,
        );

        vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        }
    }
}

impl std::fmt::Debug for Texture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Texture")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}
