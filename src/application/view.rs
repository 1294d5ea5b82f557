use std::cell::RefCell;
use std::fmt::Write;
use std::rc::Rc;

use chrono::NaiveDate;

use crate::domain::{compute_balance, format_amount, Entry, EntryId, LedgerChange, LedgerObserver};

/// One rendered line of the entry list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    pub id: EntryId,
    /// Position in the ledger, used by the removal gesture
    pub position: usize,
    /// Currency code followed by the amount, e.g. "USD 100.00"
    pub label: String,
    pub date: String,
}

/// Render a date, failing when the pattern asks for fields a date does not have
/// (`%H`, `%z`, ...).
pub fn try_format_date(date: NaiveDate, date_format: &str) -> Result<String, std::fmt::Error> {
    let mut rendered = String::new();
    write!(rendered, "{}", date.format(date_format))?;
    Ok(rendered)
}

/// Like `try_format_date`, falling back to ISO 8601 on an unrenderable pattern.
pub fn format_date(date: NaiveDate, date_format: &str) -> String {
    try_format_date(date, date_format).unwrap_or_else(|_| date.format("%Y-%m-%d").to_string())
}

pub fn build_rows(entries: &[Entry], date_format: &str) -> Vec<ListRow> {
    entries
        .iter()
        .enumerate()
        .map(|(position, entry)| ListRow {
            id: entry.id,
            position,
            label: format!("{} {}", entry.currency, format_amount(entry.amount)),
            date: format_date(entry.date, date_format),
        })
        .collect()
}

/// Toggleable aggregate display. Carries no currency label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceOverlay {
    pub visible: bool,
    pub text: String,
}

impl BalanceOverlay {
    pub fn new(visible: bool) -> Self {
        Self {
            visible,
            text: format_amount(0.0),
        }
    }

    pub fn toggle(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    /// The rendered text, if the overlay is showing.
    pub fn shown(&self) -> Option<&str> {
        self.visible.then_some(self.text.as_str())
    }
}

/// Everything the screen shows, derived from the ledger.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub rows: Vec<ListRow>,
    pub overlay: BalanceOverlay,
    date_format: String,
}

impl ViewState {
    pub fn new(date_format: impl Into<String>, show_balance: bool) -> Self {
        Self {
            rows: Vec::new(),
            overlay: BalanceOverlay::new(show_balance),
            date_format: date_format.into(),
        }
    }

    pub fn refresh(&mut self, entries: &[Entry]) {
        self.rows = build_rows(entries, &self.date_format);
        self.overlay.text = format_amount(compute_balance(entries));
    }
}

/// Ledger observer that keeps a shared `ViewState` in sync with every mutation.
pub struct ViewRefresher {
    state: Rc<RefCell<ViewState>>,
}

impl ViewRefresher {
    pub fn new(state: Rc<RefCell<ViewState>>) -> Self {
        Self { state }
    }
}

impl LedgerObserver for ViewRefresher {
    fn ledger_changed(&mut self, _change: &LedgerChange, entries: &[Entry]) {
        self.state.borrow_mut().refresh(entries);
    }
}
