//! Monthly revenue series
//!
//! Groups paid invoices into calendar-month buckets and exposes them as two
//! parallel sequences (labels and totals) ready for plotting.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::models::Invoice;

/// Calendar month used as a bucket key.
///
/// Ordering is (year, month), which matches the lexicographic order of the
/// `YYYY-MM` rendering for four-digit years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Paid revenue per month, oldest first
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RevenueSeries {
    /// `YYYY-MM` keys in chronological order
    pub labels: Vec<String>,
    /// Summed amounts, parallel to `labels`
    pub values: Vec<f64>,
}

impl RevenueSeries {
    /// Build the series from an unfiltered invoice list; only `paid`
    /// invoices contribute.
    pub fn from_invoices(invoices: &[Invoice]) -> Self {
        let mut buckets: BTreeMap<MonthKey, f64> = BTreeMap::new();

        for invoice in invoices.iter().filter(|i| i.is_paid()) {
            *buckets.entry(MonthKey::from_date(invoice.due_date)).or_insert(0.0) += invoice.amount;
        }

        let (labels, values) = buckets
            .into_iter()
            .map(|(key, total)| (key.to_string(), total))
            .unzip();

        Self { labels, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Greatest single-month total, `None` for an empty series
    pub fn max_value(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::max)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.labels.iter().map(String::as_str).zip(self.values.iter().copied())
    }
}
