//! Turns a list of transactions into the grouped and totalled view shown on
//! the transactions, accounts and account pages.
//!
//! Everything here is pure: the current time and timezone are passed in as a
//! [LocalClock], so the same inputs always give the same view.

mod clock;
mod date_range;
mod filter;
mod grouping;
mod summary;

pub use clock::LocalClock;
pub use date_range::{
    DateRangeSpec, RangePreset, ResolvedRange, is_valid_transaction_date, parse_transaction_date,
    resolve_date_range,
};
pub use filter::{FilterParams, filter_transactions};
pub use grouping::{ALL_GROUP_KEY, DateGroup, UNDATED_GROUP_KEY, group_by_calendar_day};
pub use summary::{Summary, compute_summary};

use serde::Serialize;

use crate::transaction::Transaction;

/// The filtered transactions grouped by day, with totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionView<'a> {
    /// The filtered transactions, most recent day first.
    pub groups: Vec<DateGroup<'a>>,
    /// Totals over every filtered transaction.
    pub summary: Summary,
}

impl TransactionView<'_> {
    /// The number of transactions across all groups.
    pub fn transaction_count(&self) -> usize {
        self.groups
            .iter()
            .map(|group| group.transactions.len())
            .sum()
    }
}

/// Filter `transactions`, group the survivors by day and total them.
///
/// Dates are read in the timezone of `clock`, and named ranges are resolved
/// against its current time.
pub fn aggregate_transactions<'a>(
    transactions: &'a [Transaction],
    filters: &FilterParams,
    group_by_date: bool,
    clock: &LocalClock,
) -> TransactionView<'a> {
    let filtered = filter_transactions(transactions, filters, clock);
    let summary = compute_summary(filtered.iter().copied());

    tracing::debug!(
        "aggregated {} of {} transactions",
        filtered.len(),
        transactions.len()
    );

    TransactionView {
        groups: group_by_calendar_day(filtered, group_by_date, clock),
        summary,
    }
}
