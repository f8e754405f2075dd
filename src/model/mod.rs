//! Renderable models and the drawing surface they paint into.

/// Drawing context handed to models.
pub mod draw;
/// Image-backed model loaded from a scene file.
pub mod sprite;
/// Raster textures usable as image paint.
pub mod texture;

use std::path::Path;

use crate::foundation::core::Rect;
use crate::model::draw::DrawContext;

/// A model the compositor can place and draw.
///
/// Models are owned by the caller; the exporter only borrows them for the duration of an export
/// call. Identity (`id`) must be stable for the lifetime of the model: it keys the automatic
/// resolution cache.
pub trait Renderable {
    /// Stable identity used in cache keys.
    fn id(&self) -> &str;

    /// Display name, used as the file name stem for individual exports.
    fn name(&self) -> &str;

    /// Current world-space bounding box.
    fn bounds(&self) -> Rect;

    /// Draw the model's current pose.
    ///
    /// Textures drawn through `dc` are read according to [`Renderable::use_pma`]: premultiplied
    /// bytes are used as is, straight bytes are premultiplied once. The resulting layer is
    /// blended with `ONE, ONE_MINUS_SRC_ALPHA` either way.
    fn draw(&self, dc: &mut DrawContext<'_>);

    /// Whether the model is selected in the host's model list.
    fn is_selected(&self) -> bool;

    /// Hidden models are listed but never drawn.
    fn is_hidden(&self) -> bool {
        false
    }

    /// Whether the model's source pixels are premultiplied.
    fn use_pma(&self) -> bool;

    /// Directory holding the model's source assets.
    fn assets_dir(&self) -> &Path;

    /// Primary source file, for diagnostics.
    fn source_path(&self) -> &Path;

    /// Advance the model's animation clock.
    fn update(&mut self, _delta_secs: f32) {}

    /// Length of the current animation in seconds, `0.0` when static.
    fn animation_duration(&self) -> f32 {
        0.0
    }
}
