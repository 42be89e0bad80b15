//! Bucketing transactions by local calendar day.

use std::collections::HashMap;

use serde::Serialize;
use time::{Date, Duration, format_description::BorrowedFormatItem, macros::format_description};

use crate::transaction::Transaction;

use super::{clock::LocalClock, date_range::parse_transaction_date};

/// The key of the group holding every transaction when grouping is disabled.
pub const ALL_GROUP_KEY: &str = "all";
/// The key of the group holding transactions whose date could not be parsed.
pub const UNDATED_GROUP_KEY: &str = "undated";

const UNDATED_LABEL: &str = "Unknown date";
const LABEL_FORMAT: &[BorrowedFormatItem] =
    format_description!("[weekday repr:short] [day padding:none] [month repr:short] [year]");

/// Transactions that share a calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateGroup<'a> {
    /// The day as `YYYY-MM-DD`, or one of [ALL_GROUP_KEY] and
    /// [UNDATED_GROUP_KEY].
    pub date_key: String,
    /// A heading for the group, e.g. "Today" or "Tue 2 Jan 2024".
    pub label: String,
    /// The transactions in the order they were given.
    pub transactions: Vec<&'a Transaction>,
    /// The day of the group, `None` for the synthetic groups.
    #[serde(skip)]
    pub date: Option<Date>,
}

impl<'a> DateGroup<'a> {
    fn for_date(date: Date, today: Date) -> Self {
        Self {
            date_key: date.to_string(),
            label: day_label(date, today),
            transactions: Vec::new(),
            date: Some(date),
        }
    }

    fn undated() -> Self {
        Self {
            date_key: UNDATED_GROUP_KEY.to_owned(),
            label: UNDATED_LABEL.to_owned(),
            transactions: Vec::new(),
            date: None,
        }
    }
}

/// A heading for `date` relative to `today`.
pub fn day_label(date: Date, today: Date) -> String {
    if date == today {
        return "Today".to_owned();
    }

    if date == today.saturating_sub(Duration::DAY) {
        return "Yesterday".to_owned();
    }

    date.format(LABEL_FORMAT).unwrap_or_else(|error| {
        tracing::warn!("could not format group label for {date}: {error}");
        date.to_string()
    })
}

/// Split `transactions` into one group per calendar day in the timezone of
/// `clock`, most recent day first.
///
/// Within a group the input order is kept. Transactions whose date cannot be
/// parsed are collected in a final [UNDATED_GROUP_KEY] group.
///
/// When `group_by_date` is false a single [ALL_GROUP_KEY] group with an empty
/// label holds every transaction. An empty list gives no groups either way.
pub fn group_by_calendar_day<'a>(
    transactions: Vec<&'a Transaction>,
    group_by_date: bool,
    clock: &LocalClock,
) -> Vec<DateGroup<'a>> {
    if transactions.is_empty() {
        return Vec::new();
    }

    if !group_by_date {
        return vec![DateGroup {
            date_key: ALL_GROUP_KEY.to_owned(),
            label: String::new(),
            transactions,
            date: None,
        }];
    }

    let today = clock.today();
    let mut groups: Vec<DateGroup<'a>> = Vec::new();
    let mut group_index: HashMap<Date, usize> = HashMap::new();
    let mut undated = DateGroup::undated();

    for transaction in transactions {
        let Some(date) =
            parse_transaction_date(&transaction.date, clock).map(|moment| moment.date())
        else {
            undated.transactions.push(transaction);
            continue;
        };

        let index = *group_index.entry(date).or_insert_with(|| {
            groups.push(DateGroup::for_date(date, today));
            groups.len() - 1
        });

        groups[index].transactions.push(transaction);
    }

    groups.sort_by(|a, b| b.date.cmp(&a.date));

    if !undated.transactions.is_empty() {
        groups.push(undated);
    }

    groups
}

#[cfg(test)]
mod tests {
    use time::macros::{date, datetime};

    use crate::{
        test_utils::clock_at,
        transaction::{Transaction, TransactionType},
    };

    use super::{ALL_GROUP_KEY, DateGroup, UNDATED_GROUP_KEY, day_label, group_by_calendar_day};

    fn transaction(id: i64, date: &str) -> Transaction {
        Transaction {
            id,
            kind: TransactionType::Expense,
            amount: 1.0,
            date: date.to_owned(),
            description: None,
            account_id: None,
            category_id: None,
            category: None,
        }
    }

    fn keys_and_ids(groups: &[DateGroup]) -> Vec<(String, Vec<i64>)> {
        groups
            .iter()
            .map(|group| {
                (
                    group.date_key.clone(),
                    group.transactions.iter().map(|t| t.id).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn groups_are_most_recent_first_and_keep_input_order() {
        let transactions = vec![
            transaction(1, "2024-01-01T09:00"),
            transaction(2, "2024-01-03"),
            transaction(3, "2024-01-01T08:00"),
            transaction(4, "2024-01-02"),
            transaction(5, "2024-01-03T23:00"),
        ];

        let groups = group_by_calendar_day(
            transactions.iter().collect(),
            true,
            &clock_at("Etc/UTC", datetime!(2024-01-10 12:00 UTC)),
        );

        assert_eq!(
            keys_and_ids(&groups),
            vec![
                ("2024-01-03".to_owned(), vec![2, 5]),
                ("2024-01-02".to_owned(), vec![4]),
                ("2024-01-01".to_owned(), vec![1, 3]),
            ]
        );
    }

    #[test]
    fn buckets_by_local_day() {
        // Both are 2024-01-02 in UTC+13.
        let transactions = vec![
            transaction(1, "2024-01-01T11:00:00Z"),
            transaction(2, "2024-01-02T22:00"),
        ];

        let groups = group_by_calendar_day(
            transactions.iter().collect(),
            true,
            &clock_at("Pacific/Auckland", datetime!(2024-01-05 12:00 +13)),
        );

        assert_eq!(
            keys_and_ids(&groups),
            vec![("2024-01-02".to_owned(), vec![1, 2])]
        );
    }

    #[test]
    fn undated_transactions_go_last() {
        let transactions = vec![
            transaction(1, "garbage"),
            transaction(2, "2024-01-01"),
            transaction(3, ""),
        ];

        let groups = group_by_calendar_day(
            transactions.iter().collect(),
            true,
            &clock_at("Etc/UTC", datetime!(2024-01-05 12:00 UTC)),
        );

        assert_eq!(
            keys_and_ids(&groups),
            vec![
                ("2024-01-01".to_owned(), vec![2]),
                (UNDATED_GROUP_KEY.to_owned(), vec![1, 3]),
            ]
        );
        assert_eq!(groups[1].label, "Unknown date");
    }

    #[test]
    fn disabled_grouping_gives_one_unlabelled_group() {
        let transactions = vec![transaction(1, "2024-01-01"), transaction(2, "garbage")];

        let groups = group_by_calendar_day(
            transactions.iter().collect(),
            false,
            &clock_at("Etc/UTC", datetime!(2024-01-05 12:00 UTC)),
        );

        assert_eq!(
            keys_and_ids(&groups),
            vec![(ALL_GROUP_KEY.to_owned(), vec![1, 2])]
        );
        assert_eq!(groups[0].label, "");
    }

    #[test]
    fn empty_input_gives_no_groups() {
        let clock = clock_at("Etc/UTC", datetime!(2024-01-05 12:00 UTC));

        assert!(group_by_calendar_day(Vec::new(), true, &clock).is_empty());
        assert!(group_by_calendar_day(Vec::new(), false, &clock).is_empty());
    }

    #[test]
    fn labels_are_relative_to_today() {
        let today = date!(2024-01-03);

        assert_eq!(day_label(today, today), "Today");
        assert_eq!(day_label(date!(2024-01-02), today), "Yesterday");
        assert_eq!(day_label(date!(2024-01-01), today), "Mon 1 Jan 2024");
    }

    #[test]
    fn buckets_use_the_offset_of_each_date() {
        // 11:30 UTC is 00:30 the next day in Auckland daylight time (+13),
        // but still the same day after daylight saving ends (+12).
        let transactions = vec![
            transaction(1, "2024-03-14T11:30:00Z"),
            transaction(2, "2024-04-09T11:30:00Z"),
        ];

        let groups = group_by_calendar_day(
            transactions.iter().collect(),
            true,
            &clock_at("Pacific/Auckland", datetime!(2024-04-12 12:00 +12)),
        );

        assert_eq!(
            keys_and_ids(&groups),
            vec![
                ("2024-04-09".to_owned(), vec![2]),
                ("2024-03-15".to_owned(), vec![1]),
            ]
        );
    }
}
