/// Formats with a fixed number of decimals and `,` between thousands
/// (e.g., `1234567.891` with 2 decimals is `1,234,567.89`).
pub fn format_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value);
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(formatted.len() + int_part.len() / 3);
    grouped.push_str(sign);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }

    grouped
}

/// Whole currency units, grouped by thousands
pub fn format_currency(value: f64) -> String {
    format_thousands(value, 0)
}

/// Fraction in [0, 1] as a percentage with one decimal
pub fn format_percent(share: f64) -> String {
    format!("{:.1}%", share * 100.0)
}

pub fn format_coefficient(value: f64) -> String {
    format!("{:.4}", value)
}

/// Two decimals, or `N/A` when the ratio is undefined
pub fn format_ratio(ratio: Option<f64>) -> String {
    match ratio {
        Some(r) => format!("{:.2}", r),
        None => "N/A".to_string(),
    }
}

/// Percentile label without a trailing `.0` for whole numbers
pub fn format_percentile(percentile: f64) -> String {
    if percentile.fract() == 0.0 {
        format!("{}%", percentile as i64)
    } else {
        format!("{}%", percentile)
    }
}
