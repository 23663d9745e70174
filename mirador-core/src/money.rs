use serde::{Deserialize, Serialize};

/// Currencies the back office prices addons in. Each carries its own
/// display convention: symbol first, then the amount with
/// currency-specific thousands and decimal separators.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Eur,
    Usd,
    Gbp,
}

impl Currency {
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Eur => "€",
            Currency::Usd => "$",
            Currency::Gbp => "£",
        }
    }

    fn thousands_sep(&self) -> char {
        match self {
            Currency::Eur => '.',
            Currency::Usd | Currency::Gbp => ',',
        }
    }

    fn decimal_sep(&self) -> char {
        match self {
            Currency::Eur => ',',
            Currency::Usd | Currency::Gbp => '.',
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::Eur
    }
}

/// Format an amount in minor units as a display price, e.g.
/// `format_cents(123456, Currency::Eur)` -> `"€1.234,56"`.
pub fn format_cents(cents: i64, currency: Currency) -> String {
    let negative = cents < 0;
    let cents = cents.unsigned_abs();
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(currency.thousands_sep());
        }
        grouped.push(c);
    }

    format!(
        "{}{}{}{}{:02}",
        if negative { "-" } else { "" },
        currency.symbol(),
        grouped,
        currency.decimal_sep(),
        frac
    )
}

/// Recover minor units from a display price produced by [`format_cents`].
///
/// The separator roles are inferred rather than fixed: the last `.` or `,`
/// counts as the decimal separator when at most two digits follow it,
/// otherwise it is a thousands separator. This makes the parser accept
/// both `€1.234,56` and `$1,234.56` without being told the currency.
///
/// Anything that does not contain a digit parses to 0. Callers at the
/// cart layer rely on that: a malformed legacy price contributes nothing
/// to the total instead of failing the whole sum.
pub fn parse_display(text: &str) -> i64 {
    let negative = text.contains('-');
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();

    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return 0;
    }

    let decimal_pos = cleaned
        .rfind(|c| c == '.' || c == ',')
        .filter(|pos| cleaned.len() - pos - 1 <= 2);

    let (whole_part, frac_part) = match decimal_pos {
        Some(pos) => (&cleaned[..pos], &cleaned[pos + 1..]),
        None => (cleaned.as_str(), ""),
    };

    let whole: i64 = whole_part
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect::<String>()
        .parse()
        .unwrap_or(0);

    let mut frac_digits: String = frac_part
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    while frac_digits.len() < 2 {
        frac_digits.push('0');
    }
    let frac: i64 = frac_digits.parse().unwrap_or(0);

    let cents = whole * 100 + frac;
    if negative {
        -cents
    } else {
        cents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_eur() {
        assert_eq!(format_cents(123456, Currency::Eur), "€1.234,56");
        assert_eq!(format_cents(500, Currency::Eur), "€5,00");
        assert_eq!(format_cents(0, Currency::Eur), "€0,00");
    }

    #[test]
    fn test_format_usd_grouping() {
        assert_eq!(format_cents(123456789, Currency::Usd), "$1,234,567.89");
    }

    #[test]
    fn test_format_negative() {
        assert_eq!(format_cents(-1250, Currency::Eur), "-€12,50");
    }

    #[test]
    fn test_parse_both_conventions() {
        assert_eq!(parse_display("€1,234.56"), 123456);
        assert_eq!(parse_display("€1.234,56"), 123456);
        assert_eq!(parse_display("$45.00"), 4500);
        assert_eq!(parse_display("£1,000"), 100000);
    }

    #[test]
    fn test_parse_malformed_is_zero() {
        assert_eq!(parse_display(""), 0);
        assert_eq!(parse_display("free upgrade"), 0);
        assert_eq!(parse_display("€"), 0);
    }

    #[test]
    fn test_round_trip() {
        let amounts = [0i64, 1, 99, 100, 999, 123456, 100000000, -4250];
        for currency in [Currency::Eur, Currency::Usd, Currency::Gbp] {
            for cents in amounts {
                let text = format_cents(cents, currency);
                assert_eq!(parse_display(&text), cents, "round trip of {text}");
            }
        }
    }
}
