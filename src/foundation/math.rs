pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y).min(255) as u8
}

/// Inverse of premultiplication for one channel: `c * 255 / a`, rounded and saturated.
///
/// `a` must be non-zero.
pub(crate) fn div255_by_alpha(c: u8, a: u8) -> u8 {
    let c = u32::from(c);
    let a = u32::from(a);
    ((c * 255 + a / 2) / a).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
