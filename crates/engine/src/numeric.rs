//! Tolerant number parsing for grid input.

/// Parse a number typed into a cell.
///
/// Surrounding whitespace is ignored and the first `,` is read as a decimal
/// separator, so `"2,5"` is 2.5. Empty and non-finite input is `None`.
pub fn to_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .replacen(',', ".", 1)
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

/// Parse a calendar-day count.
///
/// Fractions are truncated toward zero. Negative counts are rejected:
/// a duration is never stored negative.
pub fn coerce_days(raw: &str) -> Option<u32> {
    let n = to_number(raw)?.trunc();
    if n < 0.0 || n > u32::MAX as f64 {
        return None;
    }
    Some(n as u32)
}
