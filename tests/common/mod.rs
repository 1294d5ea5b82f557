// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use chrono::NaiveDate;
use kasa::application::{Settings, Tracker};
use kasa::cli::Session;
use kasa::domain::{Amount, Currency, Ledger};

/// Helper to parse a date string into NaiveDate
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Helper to create a tracker with default settings
pub fn test_tracker() -> Tracker {
    Tracker::new(Settings::default()).unwrap()
}

/// Helper to create a session pinned to 2024-01-15
pub fn test_session(settings: Settings) -> Session {
    Session::new(Tracker::new(settings).unwrap()).with_today(parse_date("2024-01-15"))
}

/// Build a ledger holding the given amounts, all in USD on the same day
pub fn ledger_with(amounts: &[Amount]) -> Ledger {
    let mut ledger = Ledger::new();
    for &amount in amounts {
        ledger.add_entry(amount, Currency::Usd, parse_date("2024-01-15"));
    }
    ledger
}

pub fn amounts(ledger: &Ledger) -> Vec<Amount> {
    ledger.entries().iter().map(|e| e.amount).collect()
}
