use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{Amount, Currency, Entry, EntryId};

/// Describes a mutation that has just been applied to a ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerChange {
    Added { id: EntryId, index: usize },
    Removed { ids: Vec<EntryId> },
}

/// Receives every ledger mutation synchronously, after it has been applied.
pub trait LedgerObserver {
    fn ledger_changed(&mut self, change: &LedgerChange, entries: &[Entry]);
}

impl<F> LedgerObserver for F
where
    F: FnMut(&LedgerChange, &[Entry]),
{
    fn ledger_changed(&mut self, change: &LedgerChange, entries: &[Entry]) {
        self(change, entries)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Totals derived from the current entries.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub count: usize,
    /// Sum of positive amounts
    pub income: Amount,
    /// Sum of negative amounts (zero or negative)
    pub expense: Amount,
    pub balance: Amount,
}

/// In-memory ordered collection of entries.
///
/// The sequence is kept in insertion order. Amounts are summed without looking at
/// the currency, so a mixed-currency ledger reports a unit-less balance.
#[derive(Default)]
pub struct Ledger {
    entries: Vec<Entry>,
    observers: Vec<(SubscriptionId, Box<dyn LedgerObserver>)>,
    next_subscription: u64,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new entry and return its id.
    /// The amount must already be parsed; the ledger does not validate it.
    pub fn add_entry(&mut self, amount: Amount, currency: Currency, date: NaiveDate) -> EntryId {
        let entry = Entry::new(amount, currency, date);
        let id = entry.id;
        let index = self.entries.len();
        self.entries.push(entry);

        debug!(%id, index, amount, %currency, "entry added");
        self.notify(&LedgerChange::Added { id, index });
        id
    }

    /// Remove the entries at the given positions.
    ///
    /// Positions refer to the sequence as it was before the call, so removing
    /// several at once never shifts the meaning of another position. Positions past
    /// the end are skipped. Returns the removed entries in their original order.
    pub fn remove_entries<I>(&mut self, positions: I) -> Vec<Entry>
    where
        I: IntoIterator<Item = usize>,
    {
        let positions: BTreeSet<usize> = positions.into_iter().collect();
        if positions.is_empty() {
            return Vec::new();
        }

        let len = self.entries.len();
        if let Some(&last) = positions.last()
            && last >= len
        {
            let skipped: Vec<usize> = positions.range(len..).copied().collect();
            warn!(?skipped, len, "ignoring out-of-range positions");
        }

        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(len);
        for (index, entry) in self.entries.drain(..).enumerate() {
            if positions.contains(&index) {
                removed.push(entry);
            } else {
                kept.push(entry);
            }
        }
        self.entries = kept;

        if !removed.is_empty() {
            let ids: Vec<EntryId> = removed.iter().map(|e| e.id).collect();
            debug!(count = ids.len(), "entries removed");
            self.notify(&LedgerChange::Removed { ids });
        }

        removed
    }

    /// Sum of all amounts, income positive and expenses negative.
    pub fn total_balance(&self) -> Amount {
        compute_balance(&self.entries)
    }

    pub fn summary(&self) -> LedgerSummary {
        compute_summary(&self.entries)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Register an observer. It is called after every mutation, in subscription order.
    pub fn subscribe<O>(&mut self, observer: O) -> SubscriptionId
    where
        O: LedgerObserver + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns false if the subscription was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    fn notify(&mut self, change: &LedgerChange) {
        for (_, observer) in self.observers.iter_mut() {
            observer.ledger_changed(change, &self.entries);
        }
    }
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger")
            .field("entries", &self.entries)
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// Compute the balance of a list of entries.
pub fn compute_balance(entries: &[Entry]) -> Amount {
    entries.iter().map(|e| e.amount).sum()
}

pub fn compute_summary(entries: &[Entry]) -> LedgerSummary {
    entries
        .iter()
        .fold(LedgerSummary::default(), |mut summary, entry| {
            summary.count += 1;
            if entry.amount > 0.0 {
                summary.income += entry.amount;
            } else {
                summary.expense += entry.amount;
            }
            summary.balance += entry.amount;
            summary
        })
}
