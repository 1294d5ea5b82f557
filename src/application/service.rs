use std::cell::RefCell;
use std::rc::Rc;

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{Amount, Currency, Entry, EntryId, Ledger, LedgerSummary};

use super::{AppError, EntryForm, ListRow, Settings, ViewRefresher, ViewState};

/// Application service for one tracking session.
/// This is the primary interface for any client (terminal session, tests, etc.).
pub struct Tracker {
    ledger: Ledger,
    view: Rc<RefCell<ViewState>>,
    settings: Settings,
}

impl Tracker {
    /// Create an empty session. Fails only on unusable settings.
    pub fn new(settings: Settings) -> Result<Self, AppError> {
        settings.validate()?;

        let view = Rc::new(RefCell::new(ViewState::new(
            settings.date_format.clone(),
            settings.show_balance,
        )));
        let mut ledger = Ledger::new();
        ledger.subscribe(ViewRefresher::new(Rc::clone(&view)));

        Ok(Self {
            ledger,
            view,
            settings,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // ========================
    // Forms
    // ========================

    /// A blank income form with the default currency preselected.
    pub fn income_form(&self, date: NaiveDate) -> EntryForm {
        EntryForm::income(self.settings.default_currency, date)
    }

    /// A blank expense form with the default currency preselected.
    pub fn expense_form(&self, date: NaiveDate) -> EntryForm {
        EntryForm::expense(self.settings.default_currency, date)
    }

    /// Submit a form. Returns None, leaving the ledger untouched, when the amount
    /// text is not a number.
    pub fn submit(&mut self, form: &EntryForm) -> Option<EntryId> {
        form.submit(&mut self.ledger)
    }

    pub fn add_income(
        &mut self,
        amount: &str,
        currency: Currency,
        date: NaiveDate,
    ) -> Option<EntryId> {
        let form = EntryForm::income(currency, date).with_amount(amount);
        self.submit(&form)
    }

    pub fn add_expense(
        &mut self,
        amount: &str,
        currency: Currency,
        date: NaiveDate,
    ) -> Option<EntryId> {
        let form = EntryForm::expense(currency, date).with_amount(amount);
        self.submit(&form)
    }

    // ========================
    // List
    // ========================

    /// Remove the rows at the given list positions.
    /// Every position is checked before anything is removed.
    pub fn remove(&mut self, positions: &[usize]) -> Result<Vec<Entry>, AppError> {
        let len = self.ledger.len();
        if let Some(&position) = positions.iter().find(|&&p| p >= len) {
            return Err(AppError::PositionNotFound { position, len });
        }

        let removed = self.ledger.remove_entries(positions.iter().copied());
        debug!(count = removed.len(), "rows removed");
        Ok(removed)
    }

    pub fn rows(&self) -> Vec<ListRow> {
        self.view.borrow().rows.clone()
    }

    pub fn entries(&self) -> &[Entry] {
        self.ledger.entries()
    }

    pub fn len(&self) -> usize {
        self.ledger.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ledger.is_empty()
    }

    // ========================
    // Balance
    // ========================

    /// Show or hide the balance overlay. Returns the new visibility.
    pub fn toggle_balance(&mut self) -> bool {
        self.view.borrow_mut().overlay.toggle()
    }

    /// Overlay text when the overlay is visible.
    pub fn balance_overlay(&self) -> Option<String> {
        self.view.borrow().overlay.shown().map(str::to_string)
    }

    pub fn total_balance(&self) -> Amount {
        self.ledger.total_balance()
    }

    pub fn summary(&self) -> LedgerSummary {
        self.ledger.summary()
    }
}
