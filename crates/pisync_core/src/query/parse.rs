//! Lenient integer parsing for query-string values.

/// Parses the leading integer of `raw`.
///
/// Leading whitespace and a single sign are accepted, then ASCII digits up
/// to the first non-digit; anything after that is ignored, so `"5abc"`
/// parses as 5. Returns `None` when no digit follows. Values beyond the
/// `i64` range saturate.
pub fn parse_int_prefix(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let mut value: i64 = 0;
    for b in digits[..end].bytes() {
        let digit = i64::from(b - b'0');
        value = value.saturating_mul(10).saturating_add(digit);
    }

    Some(if negative { value.saturating_neg() } else { value })
}

/// Parses a `page` or `limit` value.
///
/// Zero counts as absent, so `limit=0` falls back to the default rather
/// than clamping to 1.
pub fn parse_page_number(raw: &str) -> Option<i64> {
    parse_int_prefix(raw).filter(|value| *value != 0)
}
