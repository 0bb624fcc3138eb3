/// Largest number of decimal digits a position may be rounded to.
pub const MAX_PRECISION: u32 = 15;

/// Rounds `x` to `digits` decimal places, ties away from zero.
///
/// Values whose scaled magnitude is already past the 53-bit mantissa are
/// integral at that scale and returned unchanged.
pub fn round_half_up(x: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits.min(MAX_PRECISION) as i32);
    let scaled = x * factor;
    if !scaled.is_finite() || scaled.abs() >= 2f64.powi(52) {
        return x;
    }
    scaled.round() / factor
}
