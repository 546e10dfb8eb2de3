//! Locale number codec - Converts between typed text and numeric values.
//!
//! One fixed convention is supported: `.` groups thousands, `,` separates decimals and
//! money always carries exactly two decimal digits. Money fields are typed using the cents
//! convention, where the digits entered so far are read as hundredths, so typing `1234`
//! shows `12,34`. Nothing in here returns an error; unusable text degrades to zero or to an
//! empty string.

use once_cell::sync::Lazy;
use regex::Regex;

/// Groups the integer part of a number, every three digits from the right.
pub const THOUSANDS_SEPARATOR: char = '.';

/// Separates the integer part from the decimal digits.
pub const DECIMAL_SEPARATOR: char = ',';

/// Currency prefix used in display text and tolerated in typed currency text.
pub const CURRENCY_SYMBOL: &str = "R$";

#[allow(clippy::expect_used)]
static CURRENCY_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"R\$\s?").expect("valid currency prefix regex"));

#[allow(clippy::expect_used)]
static CURRENCY_TEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{1,3}(\.[0-9]{3})*(,[0-9]{0,2})?$").expect("valid currency text regex")
});

/// Strips every character that is not an ASCII decimal digit.
#[must_use]
pub fn sanitize_digits(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Inserts the thousands separator into a run of ASCII digits.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (len - index) % 3 == 0 {
            grouped.push(THOUSANDS_SEPARATOR);
        }
        grouped.push(digit);
    }
    grouped
}

/// Formats typed text as a grouped integer, e.g. `1234567` becomes `1.234.567`.
///
/// Non-digits are dropped first, so empty or digit-free input yields an empty string.
/// Leading zeros are kept as typed.
#[must_use]
pub fn format_integer(input: &str) -> String {
    group_thousands(&sanitize_digits(input))
}

/// Reads typed digits as a number of cents and renders them as money text.
///
/// `1234` becomes `12,34` and `5` becomes `0,05`. The digit string is split rather than
/// divided, so there is no upper bound on the magnitude and no float rounding.
#[must_use]
pub fn format_cents_as_currency(input: &str) -> String {
    let digits = sanitize_digits(input);
    if digits.is_empty() {
        return String::new();
    }

    let significant = digits.trim_start_matches('0');
    let padded = format!("{significant:0>3}");
    let (units, cents) = padded.split_at(padded.len() - 2);

    format!("{}{DECIMAL_SEPARATOR}{cents}", group_thousands(units))
}

/// Renders a number with two decimal digits and a `.` decimal point, without grouping.
///
/// Half-hundredth ties round away from zero, so `0.125` becomes `0.13` and `-0.125`
/// becomes `-0.13`. A value that rounds to zero carries no sign.
#[must_use]
pub fn format_hundredths(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let hundredths = format!("{:.0}", (value.abs() * 100.0).round());
    let padded = format!("{hundredths:0>3}");
    let (units, cents) = padded.split_at(padded.len() - 2);
    let sign = if value < 0.0 && hundredths != "0" {
        "-"
    } else {
        ""
    };

    format!("{sign}{units}.{cents}")
}

/// Renders a number with two decimal digits in the display convention, without a
/// currency prefix. `1234.5` becomes `1.234,50`. Rounding follows [`format_hundredths`].
#[must_use]
pub fn format_decimal(value: f64) -> String {
    let rendered = format_hundredths(value);
    let Some((whole, cents)) = rendered.split_once('.') else {
        return rendered;
    };
    let (sign, units) = whole
        .strip_prefix('-')
        .map_or(("", whole), |units| ("-", units));

    format!("{sign}{}{DECIMAL_SEPARATOR}{cents}", group_thousands(units))
}

/// Renders a number without grouping, using the decimal separator only when there is a
/// fraction. `550.0` becomes `550` and `12.5` becomes `12,5`, both of which
/// [`parse_to_number`] reads back unchanged.
#[must_use]
pub fn format_plain_number(value: f64) -> String {
    value.to_string().replacen('.', &DECIMAL_SEPARATOR.to_string(), 1)
}

/// Parses display text back into a number.
///
/// Thousands separators are removed and the first `,` becomes the decimal point. The
/// longest numeric prefix is then read, so trailing junk is ignored. Empty text, text
/// without a numeric prefix and non-finite results all give `0`.
#[must_use]
pub fn parse_to_number(text: &str) -> f64 {
    if text.is_empty() {
        return 0.0;
    }

    let normalized = text
        .replace(THOUSANDS_SEPARATOR, "")
        .replacen(DECIMAL_SEPARATOR, ".", 1);

    leading_number(&normalized).unwrap_or(0.0)
}

/// Parses text as a whole quantity. Fractions are truncated, negatives clamp to zero and
/// quantities above `u32::MAX` are capped there.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn parse_to_count(text: &str) -> u32 {
    // `as` saturates at both ends of the range
    parse_to_number(text).trunc() as u32
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Reads the longest prefix of `text` that forms a decimal number with an optional
/// sign, fraction and exponent.
fn leading_number(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    text[..end].parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Checks plain number text: digits and `.` only. Grouping positions are not checked,
/// so `1.2.3` passes.
#[must_use]
pub fn is_valid_plain_number_text(text: &str) -> bool {
    text.chars()
        .filter(|&c| c != THOUSANDS_SEPARATOR)
        .all(|c| c.is_ascii_digit())
}

/// Checks currency text: a correctly grouped integer with an optional `,` and up to two
/// decimal digits. A leading `R$` (with or without a space) is ignored.
#[must_use]
pub fn is_valid_currency_text(text: &str) -> bool {
    if text.is_empty() {
        return true;
    }

    let cleaned = CURRENCY_PREFIX.replace_all(text, "");
    CURRENCY_TEXT.is_match(&cleaned)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_sanitize_digits() {
        assert_eq!(sanitize_digits(""), "");
        assert_eq!(sanitize_digits("R$ 1.234,56"), "123456");
        assert_eq!(sanitize_digits("a--b//7"), "7");
        assert_eq!(sanitize_digits("no digits"), "");
    }

    #[test]
    fn test_format_integer_groups_from_the_right() {
        assert_eq!(format_integer("1234567"), "1.234.567");
        assert_eq!(format_integer("123"), "123");
        assert_eq!(format_integer("1234"), "1.234");
        assert_eq!(format_integer("12.34x5"), "12.345");
        assert_eq!(format_integer(""), "");
    }

    #[test]
    fn test_format_cents_as_currency() {
        assert_eq!(format_cents_as_currency("1234"), "12,34");
        assert_eq!(format_cents_as_currency("5"), "0,05");
        assert_eq!(format_cents_as_currency("15000"), "150,00");
        assert_eq!(format_cents_as_currency("000"), "0,00");
        assert_eq!(format_cents_as_currency("0042"), "0,42");
        assert_eq!(format_cents_as_currency("123456789"), "1.234.567,89");
        assert_eq!(format_cents_as_currency("R$ 2,50"), "2,50");
        assert_eq!(format_cents_as_currency(""), "");
        assert_eq!(format_cents_as_currency("abc"), "");
    }

    #[test]
    fn test_format_cents_has_no_magnitude_limit() {
        assert_eq!(
            format_cents_as_currency("12345678901234567890"),
            "123.456.789.012.345.678,90"
        );
    }

    #[test]
    fn test_parse_round_trips_cents_text() {
        for digits in ["1", "5", "10", "99", "1234", "15000", "250", "100000", "987654321"] {
            let expected = digits.parse::<u64>().unwrap() as f64 / 100.0;
            assert_eq!(
                parse_to_number(&format_cents_as_currency(digits)),
                expected,
                "round trip failed for {digits}"
            );
        }
    }

    #[test]
    fn test_parse_to_number() {
        assert_eq!(parse_to_number(""), 0.0);
        assert_eq!(parse_to_number("550"), 550.0);
        assert_eq!(parse_to_number("1.234"), 1234.0);
        assert_eq!(parse_to_number("1.234,56"), 1234.56);
        assert_eq!(parse_to_number("150,00"), 150.0);
        assert_eq!(parse_to_number(",5"), 0.5);
        assert_eq!(parse_to_number("  42"), 42.0);
    }

    #[test]
    fn test_parse_to_number_reads_numeric_prefix() {
        assert_eq!(parse_to_number("12abc"), 12.0);
        assert_eq!(parse_to_number("1,2,3"), 1.2);
        assert_eq!(parse_to_number("3e2"), 300.0);
        assert_eq!(parse_to_number("3e"), 3.0);
        assert_eq!(parse_to_number("-7"), -7.0);
    }

    #[test]
    fn test_parse_to_number_defaults_to_zero() {
        assert_eq!(parse_to_number("abc"), 0.0);
        assert_eq!(parse_to_number("."), 0.0);
        assert_eq!(parse_to_number(","), 0.0);
        assert_eq!(parse_to_number("R$ 10,00"), 0.0);
        assert_eq!(parse_to_number("1e999"), 0.0);
    }

    #[test]
    fn test_parse_to_count() {
        assert_eq!(parse_to_count("12"), 12);
        assert_eq!(parse_to_count("1.200"), 1200);
        assert_eq!(parse_to_count("2,9"), 2);
        assert_eq!(parse_to_count("-3"), 0);
        assert_eq!(parse_to_count(""), 0);
    }

    #[test]
    fn test_parse_to_count_caps_large_quantities() {
        assert_eq!(parse_to_count("5000000000"), u32::MAX);
        assert_eq!(parse_to_count("4.294.967.295"), u32::MAX);
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(0.0), "0,00");
        assert_eq!(format_decimal(2.5), "2,50");
        assert_eq!(format_decimal(150.0), "150,00");
        assert_eq!(format_decimal(2670.0), "2.670,00");
        assert_eq!(format_decimal(1_234_567.891), "1.234.567,89");
        assert_eq!(format_decimal(-12.5), "-12,50");
        assert_eq!(format_decimal(-0.001), "0,00");
    }

    #[test]
    fn test_half_hundredths_round_away_from_zero() {
        assert_eq!(format_hundredths(0.125), "0.13");
        assert_eq!(format_hundredths(0.625), "0.63");
        assert_eq!(format_hundredths(-0.125), "-0.13");
        assert_eq!(format_hundredths(0.004), "0.00");
        assert_eq!(format_hundredths(17.6), "17.60");
        assert_eq!(format_decimal(1234.625), "1.234,63");
    }

    #[test]
    fn test_format_plain_number_reads_back() {
        assert_eq!(format_plain_number(550.0), "550");
        assert_eq!(format_plain_number(12.5), "12,5");
        assert_eq!(format_plain_number(1234.0), "1234");
        for value in [550.0, 12.5, 1234.0, 0.25] {
            assert_eq!(parse_to_number(&format_plain_number(value)), value);
        }
    }

    #[test]
    fn test_plain_number_validation_is_lenient() {
        assert!(is_valid_plain_number_text(""));
        assert!(is_valid_plain_number_text("550"));
        assert!(is_valid_plain_number_text("1.234"));
        assert!(is_valid_plain_number_text("1.2.3"));
        assert!(is_valid_plain_number_text("..."));
        assert!(!is_valid_plain_number_text("12,5"));
        assert!(!is_valid_plain_number_text("12a"));
        assert!(!is_valid_plain_number_text("-1"));
    }

    #[test]
    fn test_currency_validation() {
        assert!(is_valid_currency_text(""));
        assert!(is_valid_currency_text("150,00"));
        assert!(is_valid_currency_text("1.234,5"));
        assert!(is_valid_currency_text("12,"));
        assert!(is_valid_currency_text("999"));
        assert!(is_valid_currency_text("R$ 1.234,56"));
        assert!(is_valid_currency_text("R$2,50"));
        assert!(!is_valid_currency_text("1234,56"));
        assert!(!is_valid_currency_text("1.23,00"));
        assert!(!is_valid_currency_text("12,345"));
        assert!(!is_valid_currency_text("12.50"));
        assert!(!is_valid_currency_text(",50"));
    }
}
