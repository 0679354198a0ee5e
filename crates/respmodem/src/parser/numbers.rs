//! Decimal helpers for the `:`, `,` and `(` decoders and for length
//! prefixes.

/// Validates an optional leading `-` followed by ASCII digits only.
///
/// Returns the in-slice position and value of the first offending byte.
pub(crate) fn check_decimal(raw: &[u8]) -> Result<(), (usize, u8)> {
    let body_start = usize::from(raw.first() == Some(&b'-'));
    match raw
        .iter()
        .enumerate()
        .skip(body_start)
        .find(|(_, b)| !b.is_ascii_digit())
    {
        Some((at, &byte)) => Err((at, byte)),
        None => Ok(()),
    }
}

/// Checked decimal accumulation into an `i64`.
///
/// Empty input and a lone `-` decode to `0`. Returns `None` when the value
/// does not fit; callers fall back to the textual representation.
pub(crate) fn parse_i64(raw: &[u8]) -> Option<i64> {
    let (negative, digits) = match raw.split_first() {
        Some((&b'-', rest)) => (true, rest),
        _ => (false, raw),
    };
    let mut value: i64 = 0;
    for &digit in digits {
        value = value.checked_mul(10)?;
        let digit = i64::from(digit - b'0');
        value = if negative {
            value.checked_sub(digit)?
        } else {
            value.checked_add(digit)?
        };
    }
    Some(value)
}

/// Parses a `,` double body. `inf` and `-inf` map to the infinities; empty
/// bodies decode to `0` like their integer counterparts.
pub(crate) fn parse_double(raw: &[u8]) -> Option<f64> {
    match raw {
        b"" | b"-" => Some(0.0),
        b"inf" => Some(f64::INFINITY),
        b"-inf" => Some(f64::NEG_INFINITY),
        _ => std::str::from_utf8(raw).ok()?.parse().ok(),
    }
}

/// The `string_numbers` rendering of a `,` double body.
pub(crate) fn double_text(raw: &[u8]) -> String {
    match raw {
        b"inf" => "Infinity".to_string(),
        b"-inf" => "-Infinity".to_string(),
        _ => String::from_utf8_lossy(raw).into_owned(),
    }
}

/// The text form of a big number. Empty bodies and a lone `-` normalize
/// to `"0"`.
pub(crate) fn big_number_text(raw: &[u8]) -> String {
    if raw.is_empty() || raw == b"-".as_slice() {
        return "0".to_string();
    }
    String::from_utf8_lossy(raw).into_owned()
}
