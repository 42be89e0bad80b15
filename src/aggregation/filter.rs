//! Filtering a list of transactions by the user's chosen criteria.

use std::collections::BTreeSet;

use crate::{
    database_id::{AccountId, CategoryId},
    transaction::{Transaction, TransactionType},
};

use super::{
    clock::LocalClock,
    date_range::{DateRangeSpec, ResolvedRange, parse_transaction_date, resolve_date_range},
};

/// The criteria a transaction must meet to be shown.
///
/// Every field is independent and the default value of a field disables it.
/// A transaction is kept only if it passes every enabled field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterParams {
    /// Keep only transactions of this type. `None` keeps every type.
    pub transaction_type: Option<TransactionType>,
    /// Keep only transactions dated within this range.
    pub date_range: DateRangeSpec,
    /// Keep only transactions in one of these accounts. Empty keeps all.
    pub account_ids: BTreeSet<AccountId>,
    /// Keep only transactions in one of these categories. Empty keeps all.
    pub category_ids: BTreeSet<CategoryId>,
    /// Keep only transactions with at least this amount.
    pub min_amount: Option<f64>,
    /// Keep only transactions with at most this amount.
    pub max_amount: Option<f64>,
    /// Keep only transactions whose description or category name contains
    /// this text, ignoring case. Blank text keeps all.
    pub search_term: Option<String>,
}

/// The filters resolved against a clock, ready to test transactions.
struct ActiveFilter<'f> {
    params: &'f FilterParams,
    search_term: Option<String>,
    range: ResolvedRange,
    clock: &'f LocalClock,
}

impl<'f> ActiveFilter<'f> {
    fn new(params: &'f FilterParams, clock: &'f LocalClock) -> Self {
        let search_term = params
            .search_term
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_lowercase);

        Self {
            params,
            search_term,
            range: resolve_date_range(params.date_range, clock),
            clock,
        }
    }

    fn matches(&self, transaction: &Transaction) -> bool {
        self.matches_search(transaction)
            && self.matches_account(transaction)
            && self.matches_category(transaction)
            && self.matches_type(transaction)
            && self.matches_amount(transaction)
            && self.matches_date(transaction)
    }

    fn matches_search(&self, transaction: &Transaction) -> bool {
        let Some(term) = &self.search_term else {
            return true;
        };

        let contains_term = |text: &str| text.to_lowercase().contains(term.as_str());

        transaction.description.as_deref().is_some_and(contains_term)
            || transaction
                .category
                .as_ref()
                .is_some_and(|category| contains_term(&category.name))
    }

    fn matches_account(&self, transaction: &Transaction) -> bool {
        self.params.account_ids.is_empty()
            || transaction
                .account_id
                .is_some_and(|id| self.params.account_ids.contains(&id))
    }

    fn matches_category(&self, transaction: &Transaction) -> bool {
        self.params.category_ids.is_empty()
            || transaction
                .category_id
                .is_some_and(|id| self.params.category_ids.contains(&id))
    }

    fn matches_type(&self, transaction: &Transaction) -> bool {
        self.params
            .transaction_type
            .is_none_or(|kind| transaction.kind == kind)
    }

    fn matches_amount(&self, transaction: &Transaction) -> bool {
        self.params
            .min_amount
            .is_none_or(|min| transaction.amount >= min)
            && self
                .params
                .max_amount
                .is_none_or(|max| transaction.amount <= max)
    }

    fn matches_date(&self, transaction: &Transaction) -> bool {
        if !self.range.is_bounded() {
            return true;
        }

        parse_transaction_date(&transaction.date, self.clock)
            .is_some_and(|moment| self.range.contains(moment))
    }
}

/// Keep the transactions that pass every enabled filter in `filters`.
///
/// Named date ranges are resolved against `clock`, and transaction dates are
/// read in its timezone. A transaction whose date cannot be parsed fails any bounded date
/// range but is otherwise treated like any other. The order of `transactions`
/// is preserved.
pub fn filter_transactions<'a>(
    transactions: &'a [Transaction],
    filters: &FilterParams,
    clock: &LocalClock,
) -> Vec<&'a Transaction> {
    let filter = ActiveFilter::new(filters, clock);

    transactions
        .iter()
        .filter(|transaction| filter.matches(transaction))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use time::macros::datetime;

    use crate::{
        aggregation::{DateRangeSpec, FilterParams, LocalClock},
        test_utils::clock_at,
        transaction::{CategorySnapshot, Transaction, TransactionType},
    };

    use super::filter_transactions;

    fn transaction(id: i64, kind: TransactionType, amount: f64, date: &str) -> Transaction {
        Transaction {
            id,
            kind,
            amount,
            date: date.to_owned(),
            description: None,
            account_id: None,
            category_id: None,
            category: None,
        }
    }

    fn sample() -> Vec<Transaction> {
        vec![
            transaction(1, TransactionType::Income, 100.0, "2024-01-02"),
            transaction(2, TransactionType::Expense, 40.0, "2024-01-02"),
            transaction(3, TransactionType::Expense, 25.0, "2024-01-01"),
        ]
    }

    fn ids(transactions: &[&Transaction]) -> Vec<i64> {
        transactions.iter().map(|transaction| transaction.id).collect()
    }

    fn clock() -> LocalClock {
        clock_at("Etc/UTC", datetime!(2024-01-02 12:00 UTC))
    }

    #[test]
    fn no_filters_keeps_everything_in_order() {
        let transactions = sample();

        let got = filter_transactions(&transactions, &FilterParams::default(), &clock());

        assert_eq!(ids(&got), [1, 2, 3]);
    }

    #[test]
    fn filters_by_type() {
        let transactions = sample();
        let filters = FilterParams {
            transaction_type: Some(TransactionType::Income),
            ..Default::default()
        };

        let got = filter_transactions(&transactions, &filters, &clock());

        assert_eq!(ids(&got), [1]);
    }

    #[test]
    fn min_amount_is_inclusive() {
        let transactions = sample();
        let filters = FilterParams {
            min_amount: Some(40.0),
            ..Default::default()
        };

        let got = filter_transactions(&transactions, &filters, &clock());

        assert_eq!(ids(&got), [1, 2]);
    }

    #[test]
    fn max_amount_is_inclusive() {
        let transactions = sample();
        let filters = FilterParams {
            max_amount: Some(40.0),
            ..Default::default()
        };

        let got = filter_transactions(&transactions, &filters, &clock());

        assert_eq!(ids(&got), [2, 3]);
    }

    #[test]
    fn search_matches_description_or_category_ignoring_case() {
        let mut transactions = sample();
        transactions[0].description = Some("Monthly SALARY".to_owned());
        transactions[1].category = Some(CategorySnapshot {
            name: "Salary adjustments".to_owned(),
        });
        transactions[2].description = Some("Coffee".to_owned());
        let filters = FilterParams {
            search_term: Some("  salary ".to_owned()),
            ..Default::default()
        };

        let got = filter_transactions(&transactions, &filters, &clock());

        assert_eq!(ids(&got), [1, 2]);
    }

    #[test]
    fn blank_search_term_is_ignored() {
        let transactions = sample();
        let filters = FilterParams {
            search_term: Some("   ".to_owned()),
            ..Default::default()
        };

        let got = filter_transactions(&transactions, &filters, &clock());

        assert_eq!(ids(&got), [1, 2, 3]);
    }

    #[test]
    fn account_and_category_sets_require_membership() {
        let mut transactions = sample();
        transactions[0].account_id = Some(1);
        transactions[0].category_id = Some(10);
        transactions[1].account_id = Some(2);
        transactions[1].category_id = Some(10);
        let filters = FilterParams {
            account_ids: BTreeSet::from([1, 3]),
            category_ids: BTreeSet::from([10]),
            ..Default::default()
        };

        let got = filter_transactions(&transactions, &filters, &clock());

        assert_eq!(ids(&got), [1]);
    }

    #[test]
    fn date_range_uses_local_day_boundaries() {
        let transactions = vec![
            transaction(1, TransactionType::Expense, 1.0, "2024-01-02T08:00"),
            // 2024-01-02 09:00 in UTC+13.
            transaction(2, TransactionType::Expense, 1.0, "2024-01-01T20:00:00Z"),
            transaction(3, TransactionType::Expense, 1.0, "2024-01-01T23:59"),
        ];
        let clock = clock_at("Pacific/Auckland", datetime!(2024-01-02 12:00 +13));
        let filters = FilterParams {
            date_range: DateRangeSpec::Today,
            ..Default::default()
        };

        let got = filter_transactions(&transactions, &filters, &clock);

        assert_eq!(ids(&got), [1, 2]);
    }

    #[test]
    fn unparseable_date_fails_bounded_range_only() {
        let transactions = vec![
            transaction(1, TransactionType::Expense, 1.0, "not a date"),
            transaction(2, TransactionType::Expense, 1.0, "2024-01-02"),
        ];
        let bounded = FilterParams {
            date_range: DateRangeSpec::ThisMonth,
            ..Default::default()
        };

        assert_eq!(ids(&filter_transactions(&transactions, &bounded, &clock())), [2]);
        assert_eq!(
            ids(&filter_transactions(
                &transactions,
                &FilterParams::default(),
                &clock()
            )),
            [1, 2]
        );
    }

    #[test]
    fn every_excluded_transaction_fails_some_filter() {
        let transactions = sample();
        let filters = FilterParams {
            transaction_type: Some(TransactionType::Expense),
            min_amount: Some(30.0),
            ..Default::default()
        };

        let got = filter_transactions(&transactions, &filters, &clock());

        assert_eq!(ids(&got), [2]);
        for transaction in &transactions {
            let kept = got.iter().any(|kept| kept.id == transaction.id);
            let passes =
                transaction.kind == TransactionType::Expense && transaction.amount >= 30.0;
            assert_eq!(kept, passes, "transaction {}", transaction.id);
        }
    }
}
