use crate::foundation::core::PixelRect;
use crate::foundation::error::{ExportError, ExportResult};
use crate::foundation::math::{div255_by_alpha, mul_div255_u8};

pub type Rgba8Px = [u8; 4];

/// Source-over of a premultiplied layer pixel onto a premultiplied destination pixel
/// (`ONE, ONE_MINUS_SRC_ALPHA`).
pub fn over(dst: Rgba8Px, src: Rgba8Px) -> Rgba8Px {
    let sa = src[3];
    if sa == 255 {
        return src;
    }
    if src == [0, 0, 0, 0] {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255_u8(u16::from(dst[i]), inv));
    }
    out
}

/// Scale each color channel by the pixel's alpha.
pub fn premultiply(px: Rgba8Px) -> Rgba8Px {
    let a = px[3];
    if a == 255 {
        return px;
    }
    let a16 = u16::from(a);
    [
        mul_div255_u8(u16::from(px[0]), a16),
        mul_div255_u8(u16::from(px[1]), a16),
        mul_div255_u8(u16::from(px[2]), a16),
        a,
    ]
}

/// Inverse premultiplication: each color channel divided by its own alpha.
///
/// Fully transparent pixels are returned untouched.
pub fn unpremultiply(px: Rgba8Px) -> Rgba8Px {
    let a = px[3];
    if a == 0 || a == 255 {
        return px;
    }
    [
        div255_by_alpha(px[0], a),
        div255_by_alpha(px[1], a),
        div255_by_alpha(px[2], a),
        a,
    ]
}

/// Fill an RGBA8 buffer with one pixel value.
pub fn clear_in_place(dst: &mut [u8], px: Rgba8Px) {
    for d in dst.chunks_exact_mut(4) {
        d.copy_from_slice(&px);
    }
}

/// Blend the premultiplied `layer` over `dst` inside `clip` only.
pub fn blend_layer_in_place(
    dst: &mut [u8],
    layer: &[u8],
    width: u32,
    clip: PixelRect,
) -> ExportResult<()> {
    if dst.len() != layer.len() || !dst.len().is_multiple_of(4) {
        return Err(ExportError::render(
            "blend_layer_in_place expects equal-length rgba8 buffers",
        ));
    }
    let stride = width as usize * 4;
    if stride == 0 {
        return Ok(());
    }
    let height = (dst.len() / stride) as u32;
    let clip = clip.clipped_to(width, height);

    for y in clip.y..clip.y + clip.height {
        let row = y as usize * stride;
        let start = row + clip.x as usize * 4;
        let end = start + clip.width as usize * 4;
        for (d, s) in dst[start..end]
            .chunks_exact_mut(4)
            .zip(layer[start..end].chunks_exact(4))
        {
            let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
            d.copy_from_slice(&out);
        }
    }
    Ok(())
}

/// Draw `src` onto `dst` in replace mode through the inverse-premultiplication transform.
///
/// Every destination pixel is overwritten, so whatever `dst` was cleared to only survives where
/// the source itself carries it.
pub fn unpremultiply_replace_in_place(dst: &mut [u8], src: &[u8]) -> ExportResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(ExportError::render(
            "unpremultiply_replace_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        d.copy_from_slice(&unpremultiply([s[0], s[1], s[2], s[3]]));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
