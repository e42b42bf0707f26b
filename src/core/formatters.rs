//! Display strings for the dashboard views. Numbers use en-US digit grouping.

/// Rounds to at most `max_fraction_digits`, drops trailing zeros and groups thousands with commas.
fn format_grouped(val: f64, max_fraction_digits: usize) -> String {
    if !val.is_finite() {
        return val.to_string();
    }

    let fixed = format!("{:.*}", max_fraction_digits, val.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part.trim_end_matches('0')),
        None => (fixed.as_str(), ""),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let is_zero = int_part.chars().all(|c| c == '0') && frac_part.is_empty();
    let sign = if val < 0.0 && !is_zero { "-" } else { "" };

    if frac_part.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac_part)
    }
}

pub fn format_emissions(val: f64) -> String {
    format!("{} t", format_grouped(val, 2))
}

pub fn format_intensity(val: f64) -> String {
    format!("{:.2} gCO₂e/MJ", val)
}

pub fn format_percentage(val: f64) -> String {
    let sign = if val > 0.0 { "+" } else { "" };
    format!("{}{:.2}%", sign, val)
}

/// Compliance balance and banked amounts.
pub fn format_balance(val: f64) -> String {
    format_grouped(val, 3)
}

/// Pool contributions and totals: surplus values get an explicit plus sign.
pub fn format_signed(val: f64) -> String {
    let sign = if val > 0.0 { "+" } else { "" };
    format!("{}{}", sign, format_grouped(val, 3))
}
