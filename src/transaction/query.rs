//! The query string shared by the transactions page and the JSON view.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    aggregation::{FilterParams, LocalClock, RangePreset},
    database_id::{AccountId, CategoryId},
};

use super::TransactionType;

/// Filters and display options read from the query string.
///
/// Empty values (e.g. `search=`) are treated as not set, and `account_id` and
/// `category_id` may be repeated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionsQuery {
    /// Only show transactions of this type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<TransactionType>,
    /// A named range. Defaults to custom when dates are given, all otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<RangePreset>,
    /// The first local day of a custom range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Date>,
    /// The last local day of a custom range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Date>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub account_id: Vec<AccountId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub category_id: Vec<CategoryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Whether to split the list into days. Defaults to true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_by_date: Option<bool>,
}

impl TransactionsQuery {
    /// The selected range, falling back to custom if only dates were given.
    pub fn range_preset(&self) -> RangePreset {
        match self.range {
            Some(range) => range,
            None if self.start_date.is_some() || self.end_date.is_some() => RangePreset::Custom,
            None => RangePreset::All,
        }
    }

    pub fn group_by_date(&self) -> bool {
        self.group_by_date.unwrap_or(true)
    }

    /// Convert to [FilterParams], reading custom dates as whole local days.
    pub fn to_filter_params(&self, clock: &LocalClock) -> FilterParams {
        let start = self.start_date.map(|date| clock.start_of_day(date));
        let end = self.end_date.map(|date| clock.end_of_day(date));

        FilterParams {
            transaction_type: self.transaction_type,
            date_range: self.range_preset().to_spec(start, end),
            account_ids: self.account_id.iter().copied().collect(),
            category_ids: self.category_id.iter().copied().collect(),
            min_amount: self.min_amount,
            max_amount: self.max_amount,
            search_term: self.search.clone(),
        }
    }

    /// Encode as a query string, e.g. for links that keep the current filters.
    pub fn to_query_string(&self) -> String {
        serde_html_form::to_string(self)
            .inspect_err(|error| tracing::error!("could not encode transactions query: {error}"))
            .unwrap_or_default()
    }
}
