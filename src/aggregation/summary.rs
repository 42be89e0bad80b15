//! Income and expense totals over a list of transactions.

use serde::Serialize;

use crate::transaction::{Transaction, TransactionType};

/// Income and expense totals for a list of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// The sum of all income amounts.
    pub total_income: f64,
    /// The sum of all expense amounts.
    pub total_expenses: f64,
    /// Income minus expenses. Negative when more was spent than earned.
    pub net_balance: f64,
}

/// Total the income and expenses in `transactions`.
///
/// Transfers and debts move money between the user's own accounts and
/// obligations, so they count towards neither total.
pub fn compute_summary<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Summary {
    let (total_income, total_expenses) =
        transactions
            .into_iter()
            .fold((0.0, 0.0), |(income, expenses), transaction| {
                match transaction.kind {
                    TransactionType::Income => (income + transaction.amount, expenses),
                    TransactionType::Expense => (income, expenses + transaction.amount),
                    TransactionType::Transfer
                    | TransactionType::DebtGive
                    | TransactionType::DebtTake
                    | TransactionType::DebtRepay => (income, expenses),
                }
            });

    Summary {
        total_income,
        total_expenses,
        net_balance: total_income - total_expenses,
    }
}
