use crate::error::AmountFormatError;

const CURRENCY_SYMBOLS: &[char] = &['₸', '₽', '$', '€', '£'];

/// Parses a locale formatted amount such as `"1 234,50₸"` or `"- 1 500,00 ₸"`.
///
/// Currency symbols and every whitespace character (including no-break spaces
/// used as thousands separators) are removed, dashes become a minus sign and a
/// decimal comma becomes a period.
pub fn normalize_amount(raw: &str) -> Result<f64, AmountFormatError> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && !CURRENCY_SYMBOLS.contains(c))
        .map(|c| match c {
            '–' | '—' | '−' => '-',
            ',' => '.',
            c => c,
        })
        .collect();

    match cleaned.parse::<f64>() {
        Ok(amount) if amount.is_finite() => Ok(amount),
        _ => Err(AmountFormatError(raw.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_grouped_amount_with_decimal_comma() {
        assert_eq!(normalize_amount("1 234,50₸"), Ok(1234.50));
        assert_eq!(normalize_amount("1500"), Ok(1500.0));
        assert_eq!(normalize_amount(" 42,5 "), Ok(42.5));
    }

    #[test]
    fn keeps_sign_of_statement_amounts() {
        assert_eq!(normalize_amount("- 1 500,00 ₸"), Ok(-1500.0));
        assert_eq!(normalize_amount("+ 5 000,00 ₸"), Ok(5000.0));
        assert_eq!(normalize_amount("– 200,00"), Ok(-200.0));
    }

    #[test]
    fn strips_no_break_space_separators() {
        assert_eq!(normalize_amount("12\u{a0}000,00\u{a0}₸"), Ok(12000.0));
        assert_eq!(normalize_amount("3\u{202f}100"), Ok(3100.0));
    }

    #[test]
    fn rejects_non_numeric_input() {
        assert_eq!(
            normalize_amount("abc"),
            Err(AmountFormatError("abc".to_owned()))
        );
        assert!(normalize_amount("").is_err());
        assert!(normalize_amount("₸").is_err());
        assert!(normalize_amount("1,2,3").is_err());
        assert!(normalize_amount("12a").is_err());
        assert!(normalize_amount("inf").is_err());
        assert!(normalize_amount("NaN").is_err());
    }
}
