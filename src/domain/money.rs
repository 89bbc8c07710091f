use std::fmt;

/// Amounts are integer cents, so 12.50 is stored as 1250.
pub type Cents = i64;

/// Format cents as a plain decimal string.
/// Example: 1250 -> "12.50", -99 -> "-0.99"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

/// Format cents with the symbol of the given currency code.
/// Unknown codes fall back to a "CODE 12.50" form.
pub fn format_money(cents: Cents, currency: &str) -> String {
    let amount = format_cents(cents.abs());
    let sign = if cents < 0 { "-" } else { "" };
    match currency_symbol(currency) {
        Some(symbol) => format!("{}{}{}", sign, symbol, amount),
        None => format!("{}{} {}", sign, currency, amount),
    }
}

fn currency_symbol(currency: &str) -> Option<&'static str> {
    match currency {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "JPY" => Some("¥"),
        "CAD" => Some("C$"),
        _ => None,
    }
}

/// Parse a decimal amount into cents.
/// Example: "12.5" -> 1250, "139" -> 13900, ".99" -> 99
///
/// Digits past the second decimal place are truncated.
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    let (negative, digits) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };

    let (units_str, fraction_str) = digits.split_once('.').unwrap_or((digits, ""));
    if units_str.is_empty() && fraction_str.is_empty() {
        return Err(ParseCentsError::Empty);
    }
    if !units_str.chars().all(|c| c.is_ascii_digit())
        || !fraction_str.chars().all(|c| c.is_ascii_digit())
    {
        return Err(ParseCentsError::InvalidFormat);
    }

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        units_str
            .parse()
            .map_err(|_| ParseCentsError::InvalidFormat)?
    };

    let fraction: i64 = match fraction_str.len() {
        0 => 0,
        1 => fraction_str.parse::<i64>().map_err(|_| ParseCentsError::InvalidFormat)? * 10,
        _ => fraction_str[..2]
            .parse()
            .map_err(|_| ParseCentsError::InvalidFormat)?,
    };

    let cents = units
        .checked_mul(100)
        .and_then(|c| c.checked_add(fraction))
        .ok_or(ParseCentsError::Overflow)?;
    Ok(if negative { -cents } else { cents })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseCentsError {
    Empty,
    InvalidFormat,
    Overflow,
}

impl fmt::Display for ParseCentsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseCentsError::Empty => write!(f, "empty amount"),
            ParseCentsError::InvalidFormat => write!(f, "invalid money format"),
            ParseCentsError::Overflow => write!(f, "amount is too large"),
        }
    }
}

impl std::error::Error for ParseCentsError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(1250), "12.50");
        assert_eq!(format_cents(13900), "139.00");
        assert_eq!(format_cents(5), "0.05");
        assert_eq!(format_cents(0), "0.00");
        assert_eq!(format_cents(-99), "-0.99");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(1599, "USD"), "$15.99");
        assert_eq!(format_money(1599, "EUR"), "€15.99");
        assert_eq!(format_money(-1599, "GBP"), "-£15.99");
        assert_eq!(format_money(1599, "CHF"), "CHF 15.99");
    }

    #[test]
    fn test_parse_cents() {
        assert_eq!(parse_cents("12.50"), Ok(1250));
        assert_eq!(parse_cents("12.5"), Ok(1250));
        assert_eq!(parse_cents("139"), Ok(13900));
        assert_eq!(parse_cents(".99"), Ok(99));
        assert_eq!(parse_cents("4."), Ok(400));
        assert_eq!(parse_cents(" 87.32 "), Ok(8732));
        assert_eq!(parse_cents("-5.00"), Ok(-500));
        assert_eq!(parse_cents("1.999"), Ok(199));
    }

    #[test]
    fn test_parse_cents_invalid() {
        assert_eq!(parse_cents(""), Err(ParseCentsError::Empty));
        assert_eq!(parse_cents("."), Err(ParseCentsError::Empty));
        assert_eq!(parse_cents("ten"), Err(ParseCentsError::InvalidFormat));
        assert_eq!(parse_cents("1.2.3"), Err(ParseCentsError::InvalidFormat));
        assert_eq!(parse_cents("1e3"), Err(ParseCentsError::InvalidFormat));
        assert_eq!(
            parse_cents("999999999999999999999"),
            Err(ParseCentsError::InvalidFormat)
        );
        assert_eq!(parse_cents("92233720368547759"), Err(ParseCentsError::Overflow));
    }
}
