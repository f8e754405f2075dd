use crate::foundation::core::{Affine, BezPath, Rect, Rgba8};
use crate::model::texture::Texture;

/// Drawing surface for one model layer.
///
/// All transforms passed to the drawing helpers are model-to-world; the context prepends the
/// world-to-pixel view transform of the current export target.
///
/// The layer underneath is always premultiplied. Solid colors are straight and premultiplied by
/// the rasterizer; texture bytes are read according to the drawing model's
/// [`crate::Renderable::use_pma`].
pub struct DrawContext<'a> {
    ctx: &'a mut vello_cpu::RenderContext,
    view: Affine,
    source_pma: bool,
}

impl<'a> DrawContext<'a> {
    pub(crate) fn new(
        ctx: &'a mut vello_cpu::RenderContext,
        view: Affine,
        source_pma: bool,
    ) -> Self {
        Self {
            ctx,
            view,
            source_pma,
        }
    }

    /// World-to-pixel transform of the current target.
    pub fn view_transform(&self) -> Affine {
        self.view
    }

    /// Whether texture bytes are taken as already premultiplied.
    pub fn source_pma(&self) -> bool {
        self.source_pma
    }

    /// Fill `rect` (model space) with a solid straight-alpha color.
    pub fn fill_rect(&mut self, rect: Rect, transform: Affine, color: Rgba8) {
        self.prepare(transform);
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        self.ctx.fill_rect(&rect_to_cpu(rect));
    }

    /// Fill `path` (model space) with a solid straight-alpha color.
    pub fn fill_path(&mut self, path: &BezPath, transform: Affine, color: Rgba8) {
        self.prepare(transform);
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        self.ctx.fill_path(&bezpath_to_cpu(path));
    }

    /// Draw `texture` with its top-left corner at the model-space origin.
    pub fn draw_texture(&mut self, texture: &Texture, transform: Affine, opacity: f32) {
        let opacity = opacity.clamp(0.0, 1.0);
        if opacity <= 0.0 {
            return;
        }
        self.prepare(transform);
        self.ctx.set_paint(texture.paint(self.source_pma));
        if opacity < 1.0 {
            self.ctx.push_opacity_layer(opacity);
        }
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(texture.width()),
            f64::from(texture.height()),
        ));
        if opacity < 1.0 {
            self.ctx.pop_layer();
        }
    }

    /// Raw access for models that need more than the helpers above.
    ///
    /// The caller is responsible for applying [`DrawContext::view_transform`].
    pub fn render_context(&mut self) -> &mut vello_cpu::RenderContext {
        self.ctx
    }

    fn prepare(&mut self, transform: Affine) {
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(affine_to_cpu(self.view * transform));
    }
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn point_to_cpu(p: kurbo::Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}
