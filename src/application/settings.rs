use chrono::NaiveDate;
use chrono::format::{Item, StrftimeItems};

use crate::domain::Currency;

use super::{try_format_date, AppError};

/// Short date form used by list rows, e.g. "1/15/24".
pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%y";

/// Presentation settings for a tracking session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Currency preselected in the entry forms
    pub default_currency: Currency,
    /// strftime pattern for the list view dates
    pub date_format: String,
    /// Whether the balance overlay starts visible
    pub show_balance: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_currency: Currency::default(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            show_balance: false,
        }
    }
}

impl Settings {
    pub fn with_default_currency(mut self, currency: Currency) -> Self {
        self.default_currency = currency;
        self
    }

    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    pub fn with_show_balance(mut self, show: bool) -> Self {
        self.show_balance = show;
        self
    }

    /// Reject date patterns chrono cannot render.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.date_format.is_empty() {
            return Err(AppError::InvalidDateFormat("empty pattern".into()));
        }
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(AppError::InvalidDateFormat(self.date_format.clone()));
        }
        // Time and offset fields parse fine but cannot be rendered from a date
        try_format_date(NaiveDate::default(), &self.date_format)
            .map_err(|_| AppError::InvalidDateFormat(self.date_format.clone()))?;
        Ok(())
    }
}
