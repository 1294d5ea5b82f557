use std::fmt;

/// Money is stored as a plain floating-point decimal.
/// Positive amounts are income, negative amounts are expenses.
pub type Amount = f64;

/// Format an amount with two decimal places.
/// Example: 50.0 -> "50.00", -12.345 -> "-12.35"
pub fn format_amount(amount: Amount) -> String {
    let formatted = format!("{:.2}", amount);
    // A value that rounds to zero keeps its sign in `{:.2}`
    if formatted == "-0.00" {
        "0.00".to_string()
    } else {
        formatted
    }
}

/// Parse user-entered text into an amount.
/// Example: "50" -> 50.0, " 12.5 " -> 12.5, "-3" -> -3.0
pub fn parse_amount(input: &str) -> Result<Amount, ParseAmountError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseAmountError::Empty);
    }

    let amount: Amount = input.parse().map_err(|_| ParseAmountError::InvalidFormat)?;
    if !amount.is_finite() {
        return Err(ParseAmountError::NotFinite);
    }

    Ok(amount)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    Empty,
    InvalidFormat,
    NotFinite,
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAmountError::Empty => write!(f, "empty amount"),
            ParseAmountError::InvalidFormat => write!(f, "invalid money format"),
            ParseAmountError::NotFinite => write!(f, "amount must be a finite number"),
        }
    }
}

impl std::error::Error for ParseAmountError {}
