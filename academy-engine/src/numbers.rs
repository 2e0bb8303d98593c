//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Round a f64 to the nearest i64 with halves rounding toward positive
/// infinity (so `-13.5` becomes `-13`). Returns 0 for non-finite values.
#[must_use]
pub fn round_half_up_f64_to_i64(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    let min = cast::<i64, f64>(i64::MIN).unwrap_or(f64::MIN);
    let max = cast::<i64, f64>(i64::MAX).unwrap_or(f64::MAX);
    let rounded = (value + 0.5).floor().clamp(min, max);
    cast::<f64, i64>(rounded).unwrap_or(0)
}

/// Scale an integer delta by a multiplier and round it back to an integer.
#[must_use]
pub fn scale_delta(delta: i32, multiplier: f64) -> i64 {
    round_half_up_f64_to_i64(f64::from(delta) * multiplier)
}

/// Add a signed delta to an unsigned stat, flooring at zero and saturating
/// at `u32::MAX`.
#[must_use]
pub fn add_floored(value: u32, delta: i64) -> u32 {
    let sum = i64::from(value).saturating_add(delta);
    u32::try_from(sum.max(0)).unwrap_or(u32::MAX)
}
