//! Polish-locale number parsing.

/// Parse an amount written the Polish way, e.g. `"1 234,56 zł"`.
///
/// Whitespace (including non-breaking spaces used as thousands separators)
/// is dropped and a trailing unit is ignored. When a comma is present it is
/// the decimal separator and dots are thousands separators; otherwise a dot
/// is read as the decimal point. Empty or malformed input yields `0.0`.
pub fn parse_decimal(raw: &str) -> f64 {
    parse_decimal_strict(raw).unwrap_or(0.0)
}

/// Like [`parse_decimal`], but `None` for blank or malformed input.
pub fn parse_decimal_strict(raw: &str) -> Option<f64> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let number = compact.trim_end_matches(|c: char| !c.is_ascii_digit());

    let normalized = if number.contains(',') {
        number.replace('.', "").replace(',', ".")
    } else {
        number.to_string()
    };

    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}
