//! Text-to-value parsing for manual and voice/shortcut entry.

mod duration;

pub use duration::parse_duration_text;

use crate::types::ValueFormat;

/// Parse flexible user text according to the target value format.
///
/// This is the voice/shortcut entry path: integer and decimal inputs accept
/// thousands separators; duration inputs go through the loose free-text
/// grammar of [`parse_duration_text`] rather than the strict
/// [`ValueFormat::parse`]. Returns `None` when the text cannot be
/// understood; the caller owns the user-facing message.
pub fn parse_value_input(input: &str, format: ValueFormat) -> Option<f64> {
    let trimmed = input.trim();
    match format {
        ValueFormat::Integer | ValueFormat::Decimal => {
            let cleaned = trimmed.replace(',', "");
            cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
        }
        ValueFormat::Duration => parse_duration_text(trimmed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_input_with_separators() {
        assert_eq!(parse_value_input("12,500", ValueFormat::Integer), Some(12500.0));
    }

    #[test]
    fn test_decimal_input() {
        assert_eq!(parse_value_input("5.5", ValueFormat::Decimal), Some(5.5));
        assert_eq!(parse_value_input(" 8 ", ValueFormat::Decimal), Some(8.0));
    }

    #[test]
    fn test_duration_input_uses_loose_grammar() {
        // the strict format parser would reject this; the voice path accepts it
        assert_eq!(ValueFormat::Duration.parse("1.5 hours"), None);
        assert_eq!(parse_value_input("1.5 hours", ValueFormat::Duration), Some(90.0));
    }

    #[test]
    fn test_unparseable_is_none() {
        assert_eq!(parse_value_input("lots", ValueFormat::Integer), None);
        assert_eq!(parse_value_input("a bit", ValueFormat::Duration), None);
    }
}
