//! Display strings for money, percentages and volumes.

const BILLION: f64 = 1_000_000_000.0;
const TRILLION: f64 = 1_000_000_000_000.0;

/// `$1.23T`
pub fn format_trillions(value: f64) -> String {
    format!("${:.2}T", value / TRILLION)
}

/// `$45.60B`
pub fn format_billions(value: f64) -> String {
    format!("${:.2}B", value / BILLION)
}

/// Signed change: `+1.23%`, `-4.56%`. Zero counts as positive.
pub fn format_change(percent: f64) -> String {
    let sign = if percent >= 0.0 { "+" } else { "" };
    format!("{sign}{percent:.2}%")
}

/// `52.31%`
pub fn format_percent(percent: f64) -> String {
    format!("{percent:.2}%")
}

/// `$65,432.1` style: grouped thousands, trailing zeros trimmed.
///
/// Sub-dollar prices keep up to 8 decimals so small caps do not read as `$0`.
pub fn format_price(price: f64) -> String {
    let decimals = if price.abs() < 1.0 { 8 } else { 3 };
    let fixed = format!("{:.*}", decimals, price.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::with_capacity(fixed.len() + 4);
    if price < 0.0 {
        out.push('-');
    }
    out.push('$');
    out.push_str(&group_thousands(int_part));
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
