//! Fitting content into an output canvas.
//!
//! Every function here is pure: inputs are clamped (resolution components `<= 0` become 100,
//! negative insets become 0) and identical inputs always produce identical outputs.

use crate::foundation::core::{Affine, Insets, PixelRect, Point, Rect, Size, Vec2, Viewport};

/// Compute the world rectangle that maps onto a `resolution + margin` pixel canvas.
///
/// `content` is fitted with a uniform scale into the inner box (`resolution - padding`) and
/// centered there; padding is then added inside and margin outside, per side. The returned
/// rectangle never has negative width or height.
pub fn canvas_bounds(content: Rect, resolution: Size, margin: Insets, padding: Insets) -> Rect {
    let resolution = resolution.clamped();
    let margin = margin.clamped();
    let padding = padding.clamped();
    let content = content.abs();

    let inner_w = f64::from(resolution.width.saturating_sub(padding.horizontal()).max(1));
    let inner_h = f64::from(resolution.height.saturating_sub(padding.vertical()).max(1));

    // World units per output pixel.
    let scale = (content.width() / inner_w).max(content.height() / inner_h);
    let scale = if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    };

    let x0 = content.x0
        - (inner_w * scale - content.width()) / 2.0
        - f64::from(margin.left.saturating_add(padding.left)) * scale;
    let y0 = content.y0
        - (inner_h * scale - content.height()) / 2.0
        - f64::from(margin.top.saturating_add(padding.top)) * scale;
    let w = f64::from(resolution.width.saturating_add(margin.horizontal())) * scale;
    let h = f64::from(resolution.height.saturating_add(margin.vertical())) * scale;

    Rect::new(x0, y0, x0 + w, y0 + h)
}

/// Grow `view` so the whole `resolution + margin` canvas shows world content.
///
/// The current visible area fills the inner box and content may overflow into the padding and
/// margin. Axis orientation and rotation of `view` are preserved.
pub fn overflow_view(
    view: &Viewport,
    resolution: Size,
    margin: Insets,
    padding: Insets,
) -> Viewport {
    let extent = Vec2::new(view.size.x.abs(), view.size.y.abs());
    let signs = Vec2::new(axis_sign(view.size.x), axis_sign(view.size.y));
    expand_view(
        view.center,
        extent,
        signs,
        view.rotation_deg,
        resolution,
        margin,
        padding,
    )
}

/// Keep `view` as-is but confine it to the inner box of the `resolution + margin` canvas.
///
/// The inner box starts after margin and padding and spans `resolution - padding`.
pub fn constrained_view(
    view: &Viewport,
    resolution: Size,
    margin: Insets,
    padding: Insets,
) -> Viewport {
    let resolution = resolution.clamped();
    let margin = margin.clamped();
    let padding = padding.clamped();

    let mut out = *view;
    out.target = Some(PixelRect {
        x: margin.left.saturating_add(padding.left) as u32,
        y: margin.top.saturating_add(padding.top) as u32,
        width: resolution.width.saturating_sub(padding.horizontal()).max(1) as u32,
        height: resolution.height.saturating_sub(padding.vertical()).max(1) as u32,
    });
    out
}

/// Viewport for automatic resolution: `content` (world space, y-up) fitted into `resolution`
/// with `margin` around it and the vertical axis flipped so world "up" is the top of the output.
pub fn auto_view(content: Rect, resolution: Size, margin: Insets) -> Viewport {
    let content = content.abs();
    expand_view(
        content.center(),
        content.size().to_vec2(),
        Vec2::new(1.0, -1.0),
        0.0,
        resolution,
        margin,
        Insets::default(),
    )
}

/// Output size in pixels for `resolution` plus `margin`, after clamping both.
pub fn surface_size(resolution: Size, margin: Insets) -> Size {
    resolution.clamped().expanded(margin.clamped())
}

// Canvas bounds are computed in view-local, screen-oriented units (x right, y down on the
// output) so per-side insets land on the right side regardless of axis flips or rotation.
fn expand_view(
    center: Point,
    extent: Vec2,
    signs: Vec2,
    rotation_deg: f64,
    resolution: Size,
    margin: Insets,
    padding: Insets,
) -> Viewport {
    let local = Rect::new(
        -extent.x / 2.0,
        -extent.y / 2.0,
        extent.x / 2.0,
        extent.y / 2.0,
    );
    let bounds = canvas_bounds(local, resolution, margin, padding);
    let c = bounds.center();
    let offset =
        Affine::rotate(rotation_deg.to_radians()) * Point::new(c.x * signs.x, c.y * signs.y);

    Viewport {
        center: center + offset.to_vec2(),
        size: Vec2::new(bounds.width() * signs.x, bounds.height() * signs.y),
        rotation_deg,
        target: None,
    }
}

fn axis_sign(v: f64) -> f64 {
    if v < 0.0 { -1.0 } else { 1.0 }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/canvas.rs"]
mod tests;
