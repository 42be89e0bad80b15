//! HTML rendering for lists of transactions.
//!
//! The summary cards and grouped table are shared by the transactions page
//! and the account page.

use maud::{Markup, html};

use crate::{
    aggregation::{ALL_GROUP_KEY, DateGroup, Summary, TransactionView, UNDATED_GROUP_KEY},
    alert::error_alert,
    html::{
        CARD_STYLE, CATEGORY_BADGE_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        format_currency, format_description, signed_amount,
    },
    loadable::Loadable,
};

use super::Transaction;

const COLUMN_COUNT: u8 = 4;

fn summary_card(label: &str, amount: f64, amount_class: &str) -> Markup {
    html! {
        div class=(CARD_STYLE) data-summary-card=(label)
        {
            p class="text-sm text-gray-500 dark:text-gray-400" { (label) }
            p class={ "text-2xl font-bold tabular-nums " (amount_class) }
            {
                (format_currency(amount))
            }
        }
    }
}

/// Cards for total income, total expenses and the net balance.
pub fn summary_cards(summary: &Summary) -> Markup {
    let net_class = if summary.net_balance < 0.0 {
        "text-red-600 dark:text-red-400"
    } else {
        "text-gray-900 dark:text-white"
    };

    html! {
        div class="flex flex-wrap gap-4 w-full"
        {
            (summary_card("Income", summary.total_income, "text-green-600 dark:text-green-400"))
            (summary_card("Expenses", summary.total_expenses, "text-red-600 dark:text-red-400"))
            (summary_card("Net balance", summary.net_balance, net_class))
        }
    }
}

fn group_header_row(group: &DateGroup) -> Markup {
    html! {
        tr class="bg-gray-50 dark:bg-gray-800" data-group-header=(group.date_key)
        {
            td
                colspan=(COLUMN_COUNT)
                class="px-6 py-2 text-xs font-semibold uppercase text-gray-600 dark:text-gray-300"
            {
                @if group.date_key == UNDATED_GROUP_KEY {
                    (group.label)
                } @else {
                    time datetime=(group.date_key) { (group.label) }
                }
            }
        }
    }
}

fn transaction_row(transaction: &Transaction) -> Markup {
    let description = transaction.description.as_deref().unwrap_or_default();
    let (description, tooltip) = format_description(description);

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction.id)
        {
            td class="px-6 py-4 text-right tabular-nums"
            {
                (signed_amount(transaction.kind, transaction.amount))
            }
            td class=(TABLE_CELL_STYLE) { (transaction.kind.label()) }
            td class=(TABLE_CELL_STYLE) title=[tooltip] { (description) }
            td class=(TABLE_CELL_STYLE)
            {
                @if let Some(ref category) = transaction.category {
                    span class=(CATEGORY_BADGE_STYLE) { (category.name) }
                } @else {
                    span class="text-gray-400 dark:text-gray-500" { "-" }
                }
            }
        }
    }
}

/// A table of `groups`, with a header row before each day.
pub fn transactions_table(groups: &[DateGroup], empty_message: &str) -> Markup {
    html! {
        div class="w-full overflow-x-auto"
        {
            table class="w-full my-2 text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class="px-6 py-3 text-right" { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                    }
                }

                tbody
                {
                    @for group in groups {
                        @if group.date_key != ALL_GROUP_KEY {
                            (group_header_row(group))
                        }

                        @for transaction in &group.transactions {
                            (transaction_row(transaction))
                        }
                    }

                    @if groups.is_empty() {
                        tr
                        {
                            td
                                colspan=(COLUMN_COUNT)
                                data-empty-state="true"
                                class="px-6 py-4 text-center"
                            {
                                (empty_message)
                            }
                        }
                    }
                }
            }
        }
    }
}

/// The summary cards and table for a [TransactionView], or an alert if the
/// transactions could not be loaded.
pub fn transaction_view_content(view: Loadable<&TransactionView>, empty_message: &str) -> Markup {
    match view {
        Loadable::Loading => html! {},
        Loadable::Failed(message) => error_alert(&message, "Try reloading the page."),
        Loadable::Ready(view) => html! {
            div class="flex flex-col gap-4 w-full"
            {
                (summary_cards(&view.summary))
                (transactions_table(&view.groups, empty_message))
            }
        },
    }
}
