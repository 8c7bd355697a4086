//! Shared HTML rendering helpers
//!
//! The view components produce HTML strings (the server pages slot them into
//! existing containers). Everything interpolated from API data goes through
//! [`escape`] first.

use std::fmt::Write;

/// Escape text for safe interpolation into HTML
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Format a number with thousands separators and at most two fraction digits
///
/// `None` renders as "0", matching what the summary cards show before any
/// data arrives. Integral values drop the fraction entirely.
pub fn format_number(value: Option<f64>) -> String {
    let value = match value {
        Some(v) if v.is_finite() => v,
        _ => return "0".to_string(),
    };

    // Round to two fraction digits first so 1234.567 renders as 1,234.57
    let rounded = (value * 100.0).round() / 100.0;
    let negative = rounded < 0.0;
    let abs = rounded.abs();

    let int_part = abs.trunc() as u64;
    let frac = abs.fract();

    let mut int_str = String::new();
    let digits = int_part.to_string();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            int_str.push(',');
        }
        int_str.push(c);
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&int_str);

    if frac > 0.0 {
        // Up to two digits, trailing zeros trimmed
        let mut frac_str = format!("{frac:.2}");
        frac_str.drain(..2); // drop "0."
        while frac_str.ends_with('0') {
            frac_str.pop();
        }
        if !frac_str.is_empty() {
            out.push('.');
            out.push_str(&frac_str);
        }
    }

    out
}

/// Render a `<li>` list from items, or a single placeholder entry when empty
pub fn list_or_placeholder(items: &[String], icon_class: &str, placeholder: &str) -> String {
    if items.is_empty() {
        return format!("<li>{}</li>\n", escape(placeholder));
    }

    let mut html = String::new();
    for item in items {
        let _ = writeln!(
            html,
            "<li><i class=\"{icon_class}\"></i><span>{}</span></li>",
            escape(item)
        );
    }
    html
}

/// Render an ISO-8601 timestamp as a plain date, passing through unparseable
/// values untouched
pub fn date_of(timestamp: &str) -> String {
    chrono::NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| timestamp.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn escape_neutralizes_markup() {
        assert_eq!(
            escape("<script>\"x\" & 'y'</script>"),
            "&lt;script&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/script&gt;"
        );
    }

    #[test]
    fn format_number_handles_null() {
        assert_eq!(format_number(None), "0");
    }

    #[test]
    fn format_number_keeps_one_fraction_digit() {
        assert_eq!(format_number(Some(1234.5)), "1,234.5");
    }

    #[test]
    fn format_number_rounds_to_two_digits() {
        assert_eq!(format_number(Some(1234.567)), "1,234.57");
    }

    #[test]
    fn format_number_drops_zero_fraction() {
        assert_eq!(format_number(Some(1_000_000.0)), "1,000,000");
    }

    #[test]
    fn date_of_takes_date_part() {
        assert_eq!(date_of("2025-03-14T09:26:53.123456"), "2025-03-14");
        assert_eq!(date_of("not a date"), "not a date");
    }
}
