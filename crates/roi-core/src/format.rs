//! Display text formatting and parsing
//!
//! Slider values are shown in a compact form (`850`, `1.500`, `12K`, `1,5M`)
//! using the page's locale convention: `.` groups thousands and `,` marks
//! decimals. [`parse_display`] reads that text back, tolerating currency
//! symbols and unit suffixes around the number.

use serde::{Deserialize, Serialize};

/// Thousands separator used by compact display text
pub const GROUP_SEPARATOR: char = '.';

/// Decimal mark used by compact display text
pub const DECIMAL_MARK: char = ',';

/// Render a value as compact display text.
///
/// - `>= 1_000_000`: millions with at most one decimal, e.g. `2M`, `1,5M`
/// - `>= 10_000`: rounded thousands, e.g. `12K`
/// - `>= 1_000`: rounded and grouped, e.g. `1.500`
/// - otherwise the rounded integer
pub fn format_compact(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }

    // Tiers are chosen on the rendered magnitude, so 999.6 reads `1.000`
    let rounded = value.round();
    if rounded >= 1_000_000.0 {
        let tenths = (value / 100_000.0).round() as i64;
        let (whole, decimal) = (tenths / 10, tenths % 10);
        if decimal == 0 {
            format!("{whole}M")
        } else {
            format!("{whole}{DECIMAL_MARK}{decimal}M")
        }
    } else if rounded >= 10_000.0 {
        let thousands = (value / 1_000.0).round() as i64;
        if thousands >= 1_000 {
            "1M".to_string()
        } else {
            format!("{thousands}K")
        }
    } else if rounded >= 1_000.0 {
        group_thousands(rounded as i64, GROUP_SEPARATOR)
    } else {
        format!("{}", rounded as i64)
    }
}

/// Read a number back from display text.
///
/// Everything except digits, `K`/`k`, `M`/`m`, `.` and `,` is dropped. A
/// `K` or `M` suffix scales the number (with `,` read as a decimal mark);
/// otherwise `.` is a thousands separator and `,` the decimal mark. Empty or
/// unreadable text yields `0`.
pub fn parse_display(text: &str) -> f64 {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, 'K' | 'k' | 'M' | 'm' | '.' | ','))
        .collect();

    if cleaned.is_empty() {
        return 0.0;
    }

    if cleaned.contains(&['K', 'k'][..]) {
        let body: String = cleaned.chars().filter(|c| !matches!(c, 'K' | 'k')).collect();
        return leading_number(&body.replace(DECIMAL_MARK, ".")) * 1_000.0;
    }

    if cleaned.contains(&['M', 'm'][..]) {
        let body: String = cleaned.chars().filter(|c| !matches!(c, 'M' | 'm')).collect();
        return leading_number(&body.replace(DECIMAL_MARK, ".")) * 1_000_000.0;
    }

    let body = cleaned
        .replace(GROUP_SEPARATOR, "")
        .replacen(DECIMAL_MARK, ".", 1);
    leading_number(&body)
}

/// Longest leading `digits[.digits]` run, parsed; `0` when there is none.
fn leading_number(body: &str) -> f64 {
    let mut end = 0;
    let mut seen_dot = false;

    for (i, c) in body.char_indices() {
        match c {
            '0'..='9' => end = i + 1,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
    }

    body[..end].parse().unwrap_or(0.0)
}

/// Insert `separator` between groups of three digits.
pub fn group_thousands(value: i64, separator: char) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if value < 0 {
        grouped.push('-');
    }
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(digit);
    }
    grouped
}

/// Where a currency symbol goes relative to the amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolPosition {
    Prefix,
    Suffix,
}

/// Whole-unit currency rendering used by calculator outputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyFormat {
    /// Currency symbol, e.g. `€`
    pub symbol: String,

    /// Separator between digit groups
    pub group_separator: char,

    /// Placement of the symbol
    pub symbol_position: SymbolPosition,

    /// Text placed between the amount and the symbol
    pub symbol_spacing: String,
}

impl Default for CurrencyFormat {
    /// French euro formatting: `35 600 €`
    fn default() -> Self {
        Self {
            symbol: "€".to_string(),
            group_separator: '\u{202f}',
            symbol_position: SymbolPosition::Suffix,
            symbol_spacing: "\u{a0}".to_string(),
        }
    }
}

/// Render a monetary amount rounded to whole units.
pub fn format_currency(value: f64, format: &CurrencyFormat) -> String {
    let rounded = if value.is_finite() { value.round() as i64 } else { 0 };
    let amount = group_thousands(rounded, format.group_separator);

    match format.symbol_position {
        SymbolPosition::Suffix => format!("{amount}{}{}", format.symbol_spacing, format.symbol),
        SymbolPosition::Prefix => format!("{}{}{amount}", format.symbol, format.symbol_spacing),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_thresholds() {
        assert_eq!(format_compact(0.0), "0");
        assert_eq!(format_compact(850.4), "850");
        assert_eq!(format_compact(1_500.0), "1.500");
        assert_eq!(format_compact(9_999.0), "9.999");
        assert_eq!(format_compact(12_000.0), "12K");
        assert_eq!(format_compact(12_600.0), "13K");
        assert_eq!(format_compact(2_000_000.0), "2M");
        assert_eq!(format_compact(1_540_000.0), "1,5M");
        assert_eq!(format_compact(-42.0), "-42");
        assert_eq!(format_compact(f64::NAN), "0");
    }

    #[test]
    fn test_tier_follows_rounded_value() {
        assert_eq!(format_compact(999.4), "999");
        assert_eq!(format_compact(999.6), "1.000");
        assert_eq!(format_compact(9_999.4), "9.999");
        assert_eq!(format_compact(9_999.6), "10K");
        assert_eq!(format_compact(999_600.0), "1M");
        assert_eq!(parse_display(&format_compact(9_999.6)), 10_000.0);
    }

    #[test]
    fn test_parse_representative_values() {
        assert_eq!(parse_display(&format_compact(1_500.0)), 1_500.0);
        assert_eq!(parse_display(&format_compact(12_000.0)), 12_000.0);
        assert_eq!(parse_display("2.500"), 2_500.0);
        assert_eq!(parse_display("1,5K"), 1_500.0);
    }

    #[test]
    fn test_parse_tolerates_symbols() {
        assert_eq!(parse_display("1.250 €"), 1_250.0);
        assert_eq!(parse_display("€ 99,5"), 99.5);
        assert_eq!(parse_display("2,5M€"), 2_500_000.0);
        assert_eq!(parse_display("15k"), 15_000.0);
    }

    #[test]
    fn test_parse_garbage_is_zero() {
        assert_eq!(parse_display(""), 0.0);
        assert_eq!(parse_display("n/a"), 0.0);
        assert_eq!(parse_display(","), 0.0);
    }

    #[test]
    fn test_round_trip_exact_ranges() {
        for value in (0..10_000).step_by(7) {
            let value = value as f64;
            assert_eq!(parse_display(&format_compact(value)), value, "{value}");
        }
        for thousands in [10, 55, 999] {
            let value = thousands as f64 * 1_000.0;
            assert_eq!(parse_display(&format_compact(value)), value);
        }
        assert_eq!(parse_display(&format_compact(3_000_000.0)), 3_000_000.0);
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0, '.'), "0");
        assert_eq!(group_thousands(999, '.'), "999");
        assert_eq!(group_thousands(1_234_567, ' '), "1 234 567");
        assert_eq!(group_thousands(-1_234, '.'), "-1.234");
    }

    #[test]
    fn test_format_currency() {
        let euro = CurrencyFormat::default();
        assert_eq!(format_currency(35_600.0, &euro), "35\u{202f}600\u{a0}€");
        assert_eq!(format_currency(-1_234.4, &euro), "-1\u{202f}234\u{a0}€");

        let dollars = CurrencyFormat {
            symbol: "$".to_string(),
            group_separator: ',',
            symbol_position: SymbolPosition::Prefix,
            symbol_spacing: String::new(),
        };
        assert_eq!(format_currency(350.0, &dollars), "$350");
    }
}
