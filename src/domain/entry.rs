use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Amount;

pub type EntryId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Try,
}

impl Currency {
    pub const ALL: [Currency; 3] = [Currency::Usd, Currency::Eur, Currency::Try];

    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Try => "TRY",
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = ParseCurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "TRY" => Ok(Currency::Try),
            _ => Err(ParseCurrencyError(s.to_string())),
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCurrencyError(pub String);

impl std::fmt::Display for ParseCurrencyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown currency '{}' (expected USD, EUR or TRY)", self.0)
    }
}

impl std::error::Error for ParseCurrencyError {}

/// A single income or expense record.
/// Entries are immutable: the ledger only appends and removes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Row identity for list views, never a business key
    pub id: EntryId,
    /// Positive for income, negative for an expense
    pub amount: Amount,
    pub currency: Currency,
    pub date: NaiveDate,
}

impl Entry {
    pub fn new(amount: Amount, currency: Currency, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount,
            currency,
            date,
        }
    }

    pub fn is_income(&self) -> bool {
        self.amount > 0.0
    }

    pub fn is_expense(&self) -> bool {
        self.amount < 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[test]
    fn test_currency_roundtrip() {
        for currency in Currency::ALL {
            let parsed: Currency = currency.as_str().parse().unwrap();
            assert_eq!(currency, parsed);
        }
    }

    #[test]
    fn test_currency_parse_is_case_insensitive() {
        assert_eq!("eur".parse::<Currency>(), Ok(Currency::Eur));
        assert_eq!(" Try ".parse::<Currency>(), Ok(Currency::Try));
    }

    #[test]
    fn test_currency_parse_unknown() {
        let err = "GBP".parse::<Currency>().unwrap_err();
        assert_eq!(err, ParseCurrencyError("GBP".into()));
        assert!(err.to_string().contains("GBP"));
    }

    #[test]
    fn test_currency_serializes_as_code() {
        assert_eq!(serde_json::to_string(&Currency::Try).unwrap(), "\"TRY\"");
    }

    #[test]
    fn test_new_entries_get_distinct_ids() {
        let a = Entry::new(10.0, Currency::Usd, date());
        let b = Entry::new(10.0, Currency::Usd, date());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_income_and_expense() {
        assert!(Entry::new(10.0, Currency::Usd, date()).is_income());
        assert!(Entry::new(-10.0, Currency::Eur, date()).is_expense());

        let zero = Entry::new(0.0, Currency::Try, date());
        assert!(!zero.is_income());
        assert!(!zero.is_expense());
    }
}
