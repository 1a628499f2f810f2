//! `"min-max"` encoding used by numeric column filters.

/// Encode a numeric range. Only a max implies a minimum of 0; only a min is
/// sent as the bare value; neither means no filter.
pub fn encode_range(min: &str, max: &str) -> Option<String> {
    let (min, max) = (min.trim(), max.trim());
    match (min.is_empty(), max.is_empty()) {
        (false, false) => Some(format!("{}-{}", min, max)),
        (false, true) => Some(min.to_string()),
        (true, false) => Some(format!("0-{}", max)),
        (true, true) => None,
    }
}

/// Byte offset of the `-` joining min and max. A leading sign and an
/// exponent sign (`1e-3`) belong to the number, so only a `-` that follows
/// a digit or `.` separates the bounds.
fn separator(value: &str) -> Option<usize> {
    let bytes = value.as_bytes();
    (1..bytes.len()).find(|&i| bytes[i] == b'-' && (bytes[i - 1].is_ascii_digit() || bytes[i - 1] == b'.'))
}

/// Lower bound of an encoded range; empty when the value is not a range
pub fn extract_min_value(value: &str) -> &str {
    separator(value).map_or("", |at| &value[..at])
}

/// Upper bound of an encoded range; empty when the value is not a range
pub fn extract_max_value(value: &str) -> &str {
    separator(value).map_or("", |at| &value[at + 1..])
}

/// Inverse of [`encode_range`] for refilling the min/max inputs
pub fn decode_range(value: &str) -> (String, String) {
    match separator(value) {
        Some(at) => (value[..at].to_string(), value[at + 1..].to_string()),
        None => (value.to_string(), String::new()),
    }
}
