use std::str::FromStr;

use crate::foundation::error::{ExportError, ExportResult};
use crate::foundation::math::mul_div255_u8;

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Resolutions at or below zero are coerced to this many pixels.
pub const MIN_RESOLUTION: i32 = 100;

/// Absolute 0-based frame index within one exported sequence.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Pixel dimensions as entered by the user. May hold invalid values until clamped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Size {
    /// Create a size without clamping.
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Coerce non-positive components to [`MIN_RESOLUTION`].
    pub fn clamped(self) -> Self {
        let fix = |v: i32| if v <= 0 { MIN_RESOLUTION } else { v };
        Self {
            width: fix(self.width),
            height: fix(self.height),
        }
    }

    /// Grow by the horizontal/vertical totals of `insets`.
    pub fn expanded(self, insets: Insets) -> Self {
        Self {
            width: self.width.saturating_add(insets.horizontal()),
            height: self.height.saturating_add(insets.vertical()),
        }
    }

    /// Convert to unsigned surface dimensions. Non-positive components become 1.
    pub fn to_surface_dims(self) -> (u32, u32) {
        (self.width.max(1) as u32, self.height.max(1) as u32)
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::new(MIN_RESOLUTION, MIN_RESOLUTION)
    }
}

/// Per-side pixel insets, used for both margin and padding.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(default)]
pub struct Insets {
    /// Left inset in pixels.
    pub left: i32,
    /// Top inset in pixels.
    pub top: i32,
    /// Right inset in pixels.
    pub right: i32,
    /// Bottom inset in pixels.
    pub bottom: i32,
}

impl Insets {
    /// Same inset on every side.
    pub const fn uniform(v: i32) -> Self {
        Self {
            left: v,
            top: v,
            right: v,
            bottom: v,
        }
    }

    /// Clamp negative components to zero.
    pub fn clamped(self) -> Self {
        Self {
            left: self.left.max(0),
            top: self.top.max(0),
            right: self.right.max(0),
            bottom: self.bottom.max(0),
        }
    }

    /// `left + right`.
    pub fn horizontal(self) -> i32 {
        self.left.saturating_add(self.right)
    }

    /// `top + bottom`.
    pub fn vertical(self) -> i32 {
        self.top.saturating_add(self.bottom)
    }

    /// Component-wise sum.
    pub fn plus(self, other: Insets) -> Self {
        Self {
            left: self.left.saturating_add(other.left),
            top: self.top.saturating_add(other.top),
            right: self.right.saturating_add(other.right),
            bottom: self.bottom.saturating_add(other.bottom),
        }
    }
}

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Create a color from straight RGBA8 components.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully transparent black.
    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Return `true` when alpha is 255.
    pub fn is_opaque(self) -> bool {
        self.a == 255
    }

    /// Straight components as a byte quad.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Premultiplied byte quad: color channels scaled by `a / 255`, alpha unchanged.
    pub fn premultiplied(self) -> [u8; 4] {
        let a = u16::from(self.a);
        [
            mul_div255_u8(u16::from(self.r), a),
            mul_div255_u8(u16::from(self.g), a),
            mul_div255_u8(u16::from(self.b), a),
            self.a,
        ]
    }
}

impl Default for Rgba8 {
    fn default() -> Self {
        Self::transparent()
    }
}

impl FromStr for Rgba8 {
    type Err = ExportError;

    /// Parse `#RRGGBB` or `#RRGGBBAA` (leading `#` optional).
    fn from_str(s: &str) -> ExportResult<Self> {
        let hex = s.trim().trim_start_matches('#');
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(ExportError::validation(format!(
                "color '{s}' must be #RRGGBB or #RRGGBBAA"
            )));
        }
        let byte = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| ExportError::validation(format!("color '{s}' is not valid hex")))
        };
        let a = if hex.len() == 8 { byte(6)? } else { 255 };
        Ok(Self::new(byte(0)?, byte(2)?, byte(4)?, a))
    }
}

/// Integer pixel rectangle on a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PixelRect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelRect {
    /// Whole-surface rectangle.
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    /// Clip to a `width x height` surface.
    pub fn clipped_to(self, width: u32, height: u32) -> Self {
        let x = self.x.min(width);
        let y = self.y.min(height);
        Self {
            x,
            y,
            width: self.width.min(width - x),
            height: self.height.min(height - y),
        }
    }

    fn to_rect(self) -> Rect {
        Rect::new(
            f64::from(self.x),
            f64::from(self.y),
            f64::from(self.x) + f64::from(self.width),
            f64::from(self.y) + f64::from(self.height),
        )
    }
}

/// Region of world space mapped onto an output surface.
///
/// `size` is signed: a negative component flips that axis (world "up" rendered toward the top
/// of the output uses a negative height). `target` restricts the mapping to a sub-rectangle of
/// the surface; nothing is drawn outside it.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// World-space center.
    pub center: Point,
    /// Signed world-space extent.
    pub size: Vec2,
    /// Rotation in degrees.
    #[serde(default)]
    pub rotation_deg: f64,
    /// Surface sub-rectangle this view maps onto; `None` means the whole surface.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<PixelRect>,
}

impl Viewport {
    /// View centered at `center` covering `size` world units, no rotation, whole surface.
    pub fn new(center: Point, size: Vec2) -> Self {
        Self {
            center,
            size,
            rotation_deg: 0.0,
            target: None,
        }
    }

    /// View covering `rect` with the vertical axis flipped (world y-up).
    pub fn flipped_from_rect(rect: Rect) -> Self {
        Self::new(rect.center(), Vec2::new(rect.width(), -rect.height()))
    }

    /// Visible world rectangle, normalized to non-negative extents.
    ///
    /// Rotation is ignored; the result is the axis-aligned extent before rotating.
    pub fn visible_rect(&self) -> Rect {
        let half = Vec2::new(self.size.x.abs() * 0.5, self.size.y.abs() * 0.5);
        Rect::new(
            self.center.x - half.x,
            self.center.y - half.y,
            self.center.x + half.x,
            self.center.y + half.y,
        )
    }

    /// Surface rectangle this view draws into on a `width x height` surface.
    pub fn target_rect(&self, width: u32, height: u32) -> PixelRect {
        self.target
            .map(|t| t.clipped_to(width, height))
            .unwrap_or_else(|| PixelRect::full(width, height))
    }

    /// World-to-pixel transform for a `width x height` surface.
    pub fn transform(&self, width: u32, height: u32) -> Affine {
        let target = self.target_rect(width, height).to_rect();
        let sx = if self.size.x == 0.0 {
            1.0
        } else {
            target.width() / self.size.x
        };
        let sy = if self.size.y == 0.0 {
            1.0
        } else {
            target.height() / self.size.y
        };
        Affine::translate(target.center().to_vec2())
            * Affine::scale_non_uniform(sx, sy)
            * Affine::rotate(-self.rotation_deg.to_radians())
            * Affine::translate(-self.center.to_vec2())
    }
}

impl Default for Viewport {
    fn default() -> Self {
        let side = f64::from(MIN_RESOLUTION);
        Self::new(Point::ORIGIN, Vec2::new(side, side))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
