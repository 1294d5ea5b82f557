use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{parse_amount, Amount, Currency, EntryId, Ledger};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Income,
    Expense,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Income => "income",
            EntryKind::Expense => "expense",
        }
    }

    /// Apply the sign this kind of form gives to a user-entered amount.
    /// Expenses negate whatever was typed, so "-5" on an expense form is income.
    pub fn apply_sign(&self, amount: Amount) -> Amount {
        match self {
            EntryKind::Income => amount,
            EntryKind::Expense => -amount,
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The add-income / add-expense form.
/// The amount is kept as free text until submission.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryForm {
    pub kind: EntryKind,
    pub amount: String,
    pub currency: Currency,
    pub date: NaiveDate,
}

impl EntryForm {
    pub fn new(kind: EntryKind, currency: Currency, date: NaiveDate) -> Self {
        Self {
            kind,
            amount: String::new(),
            currency,
            date,
        }
    }

    pub fn income(currency: Currency, date: NaiveDate) -> Self {
        Self::new(EntryKind::Income, currency, date)
    }

    pub fn expense(currency: Currency, date: NaiveDate) -> Self {
        Self::new(EntryKind::Expense, currency, date)
    }

    pub fn with_amount(mut self, amount: impl Into<String>) -> Self {
        self.amount = amount.into();
        self
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    /// The amount that would be recorded, or None if the text is not a number.
    pub fn signed_amount(&self) -> Option<Amount> {
        parse_amount(&self.amount)
            .ok()
            .map(|amount| self.kind.apply_sign(amount))
    }

    /// Record the form in the ledger.
    ///
    /// Unparseable amount text is silently discarded: nothing is appended and the
    /// form is left as it was.
    pub fn submit(&self, ledger: &mut Ledger) -> Option<EntryId> {
        let Some(amount) = self.signed_amount() else {
            debug!(kind = %self.kind, input = %self.amount, "discarding submission");
            return None;
        };
        Some(ledger.add_entry(amount, self.currency, self.date))
    }
}
