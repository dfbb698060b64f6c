use crate::ui::ui_text::ICON_CANDLE;

/// Formats a price with precision that follows its magnitude.
pub fn format_price(price: f64) -> String {
    if !price.is_finite() {
        return "-".to_string();
    }
    let abs_price = price.abs();
    if abs_price >= 1.0 {
        format!("{:.2}", price)
    } else if abs_price >= 0.01 {
        format!("{:.4}", price)
    } else if abs_price == 0.0 {
        "0.00".to_string()
    } else {
        format!("{:.6}", price)
    }
}

/// Ratios hover around 1.0, so they always get four decimals.
pub fn format_ratio(ratio: f64) -> String {
    if ratio.is_finite() {
        format!("{:.4}", ratio)
    } else {
        "-".to_string()
    }
}

pub fn format_bar_count(count: usize) -> String {
    format!("{} {}", count, ICON_CANDLE)
}

pub fn format_volume(volume: Option<i64>) -> String {
    match volume {
        Some(v) => v.to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_precision_follows_magnitude() {
        assert_eq!(format_price(123.456), "123.46");
        assert_eq!(format_price(0.5), "0.5000");
        assert_eq!(format_price(0.000123), "0.000123");
        assert_eq!(format_price(0.0), "0.00");
        assert_eq!(format_price(f64::NAN), "-");
    }

    #[test]
    fn test_ratio_format() {
        assert_eq!(format_ratio(1.0), "1.0000");
        assert_eq!(format_ratio(f64::INFINITY), "-");
    }
}
