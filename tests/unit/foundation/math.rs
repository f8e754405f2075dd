use super::*;

#[test]
fn mul_div255_rounds_to_nearest() {
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(255, 128), 128);
    assert_eq!(mul_div255_u16(0, 200), 0);
    assert_eq!(mul_div255_u8(100, 51), 20);
}

#[test]
fn div255_by_alpha_undoes_premultiplication() {
    assert_eq!(div255_by_alpha(128, 128), 255);
    assert_eq!(div255_by_alpha(200, 255), 200);
    assert_eq!(div255_by_alpha(64, 128), 128);
    // Inconsistent input (color above alpha) saturates instead of wrapping.
    assert_eq!(div255_by_alpha(200, 100), 255);
}
