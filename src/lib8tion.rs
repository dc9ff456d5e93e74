//! Fixed-point 8-bit math used for LED fading
//!
//! Values in `0..=255` represent fractions `0.0..=1.0`. All operations
//! are total and never overflow.

/// Scale `i` by fraction `scale/256`, with `scale = 255` meaning "keep all of `i`"
pub const fn scale8(i: u8, scale: u8) -> u8 {
    ((i as u16 * (1 + scale as u16)) >> 8) as u8
}

/// Linear interpolation between `a` and `b` by fraction `frac`
///
/// The result always lies between `a` and `b` (inclusive), regardless of
/// which one is larger.
pub const fn lerp8by8(a: u8, b: u8, frac: u8) -> u8 {
    if b > a {
        a + scale8(b - a, frac)
    } else {
        a - scale8(a - b, frac)
    }
}

/// Ease-in-out cubic curve: `3x^2 - 2x^3` on 8-bit fractions
pub const fn ease8_in_out_cubic(i: u8) -> u8 {
    let ii = scale8(i, i);
    let iii = scale8(ii, i);
    let r = 3 * ii as u16 - 2 * iii as u16;
    // Rounding may give exactly 256 at the top end
    if r > 255 { 255 } else { r as u8 }
}
