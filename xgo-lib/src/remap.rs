//! Linear mapping of domain values onto the device's `0..=255` byte range.

/// Map `value` from `[from_low, from_high]` onto `[to_low, to_high]`.
///
/// The result is rounded half away from zero, so `remap(0, -20, 20, 0, 255)`
/// lands on `128`. Inputs are expected to be clamped by the caller already.
pub fn remap(value: f64, from_low: f64, from_high: f64, to_low: f64, to_high: f64) -> f64 {
    (to_low + (value - from_low) * (to_high - to_low) / (from_high - from_low)).round()
}

/// Map a domain value onto a wire byte.
///
/// Values outside the domain saturate at `0` or `255` through the float cast.
pub fn to_device_byte(value: f64, (low, high): (f64, f64)) -> u8 {
    let (to_low, to_high) = crate::constants::DEVICE_RANGE;
    remap(value, low, high, to_low, to_high) as u8
}
