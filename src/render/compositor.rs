//! Frame compositing.
//!
//! A frame is built in two passes. Models are rendered one premultiplied layer at a time, each
//! reading its texture bytes per its own alpha preference, and blended into a
//! premultiplied accumulation surface that starts out cleared to the premultiplied background.
//! If the background is opaque the accumulation surface already holds straight pixels and is
//! returned as is; otherwise it is drawn in replace mode through the inverse-premultiplication
//! transform onto a second surface cleared to the straight background color.

use crate::effects::composite::{
    blend_layer_in_place, clear_in_place, unpremultiply_replace_in_place,
};
use crate::export::config::ExportConfig;
use crate::foundation::core::Rgba8;
use crate::foundation::error::{ExportError, ExportResult};
use crate::model::Renderable;
use crate::model::draw::DrawContext;
use crate::render::frame::Frame;
use crate::render::target_cache::{RenderTarget, RenderTargetCache};

/// Compositor counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompositorStats {
    /// Frames produced by [`FrameCompositor::compose`].
    pub frames: u64,
    /// Layers rendered and blended.
    pub layers: u64,
    /// Inverse-premultiplication passes run.
    pub unpremultiply_passes: u64,
}

/// Turns an ordered model list into export-ready frames.
#[derive(Default)]
pub struct FrameCompositor {
    ctx: Option<vello_cpu::RenderContext>,
    stats: CompositorStats,
}

impl FrameCompositor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> CompositorStats {
        self.stats
    }

    /// Whether a render context is currently held.
    pub fn has_context(&self) -> bool {
        self.ctx.is_some()
    }

    /// Drop the render context. The next frame builds a fresh one.
    pub fn clear(&mut self) {
        self.ctx = None;
    }

    /// Render `models` (drawn in slice order) into a straight-alpha frame.
    ///
    /// Surfaces come from and go back to `cache`, on failure as well.
    pub fn compose(
        &mut self,
        cache: &mut RenderTargetCache,
        config: &ExportConfig,
        models: &[&dyn Renderable],
    ) -> ExportResult<Frame> {
        let target = cache.target_for(config, models)?;
        let mut accum = cache.borrow_surface(target.width, target.height)?;

        let result = self
            .accumulate(cache, config.background, &target, models, &mut accum)
            .and_then(|()| {
                if config.background.is_opaque() {
                    Ok(pixmap_frame(&accum, false))
                } else {
                    self.unpremultiply(cache, config.background, &accum)
                }
            });

        cache.release_surface(accum);
        if result.is_ok() {
            self.stats.frames += 1;
        }
        result
    }

    /// Run the accumulation pass only and return its premultiplied contents.
    pub fn compose_premultiplied(
        &mut self,
        cache: &mut RenderTargetCache,
        config: &ExportConfig,
        models: &[&dyn Renderable],
    ) -> ExportResult<Frame> {
        let target = cache.target_for(config, models)?;
        let mut accum = cache.borrow_surface(target.width, target.height)?;
        let result = self
            .accumulate(cache, config.background, &target, models, &mut accum)
            .map(|()| pixmap_frame(&accum, true));
        cache.release_surface(accum);
        result
    }

    fn accumulate(
        &mut self,
        cache: &mut RenderTargetCache,
        background: Rgba8,
        target: &RenderTarget,
        models: &[&dyn Renderable],
        accum: &mut vello_cpu::Pixmap,
    ) -> ExportResult<()> {
        clear_in_place(accum.data_as_u8_slice_mut(), background.premultiplied());

        let mut layer = cache.borrow_surface(target.width, target.height)?;
        let result = self.draw_layers(target, models, accum, &mut layer);
        cache.release_surface(layer);
        result
    }

    fn draw_layers(
        &mut self,
        target: &RenderTarget,
        models: &[&dyn Renderable],
        accum: &mut vello_cpu::Pixmap,
        layer: &mut vello_cpu::Pixmap,
    ) -> ExportResult<()> {
        let view = target.viewport.transform(target.width, target.height);
        let clip = target.viewport.target_rect(target.width, target.height);

        for model in models.iter().filter(|m| !m.is_hidden()) {
            clear_in_place(layer.data_as_u8_slice_mut(), [0, 0, 0, 0]);

            let ctx = self.context_for(target.width, target.height)?;
            ctx.reset();
            {
                let mut dc = DrawContext::new(ctx, view, model.use_pma());
                model.draw(&mut dc);
            }
            ctx.flush();
            ctx.render_to_pixmap(layer);

            blend_layer_in_place(
                accum.data_as_u8_slice_mut(),
                layer.data_as_u8_slice(),
                target.width,
                clip,
            )?;
            self.stats.layers += 1;
        }
        Ok(())
    }

    fn unpremultiply(
        &mut self,
        cache: &mut RenderTargetCache,
        background: Rgba8,
        accum: &vello_cpu::Pixmap,
    ) -> ExportResult<Frame> {
        let mut out = cache.borrow_surface(u32::from(accum.width()), u32::from(accum.height()))?;
        clear_in_place(out.data_as_u8_slice_mut(), background.to_array());

        let result = unpremultiply_replace_in_place(
            out.data_as_u8_slice_mut(),
            accum.data_as_u8_slice(),
        )
        .map(|()| pixmap_frame(&out, false));

        cache.release_surface(out);
        if result.is_ok() {
            self.stats.unpremultiply_passes += 1;
        }
        result
    }

    fn context_for(
        &mut self,
        width: u32,
        height: u32,
    ) -> ExportResult<&mut vello_cpu::RenderContext> {
        let w = u16::try_from(width)
            .map_err(|_| ExportError::render("render width exceeds u16::MAX"))?;
        let h = u16::try_from(height)
            .map_err(|_| ExportError::render("render height exceeds u16::MAX"))?;

        let reuse = self
            .ctx
            .as_ref()
            .is_some_and(|c| c.width() == w && c.height() == h);
        if !reuse {
            self.ctx = Some(vello_cpu::RenderContext::new(w, h));
        }
        self.ctx
            .as_mut()
            .ok_or_else(|| ExportError::render("render context unavailable"))
    }
}

fn pixmap_frame(pixmap: &vello_cpu::Pixmap, premultiplied: bool) -> Frame {
    Frame {
        width: u32::from(pixmap.width()),
        height: u32::from(pixmap.height()),
        data: pixmap.data_as_u8_slice().to_vec(),
        premultiplied,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
