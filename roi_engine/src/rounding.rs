/// Round `value` to `decimals` places, correctly rounded from the exact
/// binary value (same result as formatting with `{:.N}`).
///
/// Non-finite values are returned unchanged.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.*}", decimals as usize, value)
        .parse()
        .unwrap_or(value)
}
