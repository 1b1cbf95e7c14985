use num_format::{Locale, ToFormattedString};

/// Whole units with thousands separators: `53900.4` -> `53,900`.
pub fn format_whole(value: f64) -> String {
    (value.round() as i64).to_formatted_string(&Locale::en)
}

/// Two decimals with thousands separators: `64123.456` -> `64,123.46`.
pub fn format_cents(value: f64) -> String {
    let cents = (value * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.abs();
    format!(
        "{sign}{}.{:02}",
        (cents / 100).to_formatted_string(&Locale::en),
        cents % 100
    )
}
