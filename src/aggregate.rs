//! Time-bucketed category totals.
//!
//! Every view in the crate is a projection of a [`ClassifiedHistory`]: the
//! records are classified and assigned a calendar day once, then grouped by
//! day, by month, or filtered to a single date. The free functions
//! ([`daily_breakdown`], [`monthly_breakdown`], ...) are shorthands that
//! build the history and run one query.

use alloc::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive as _;
use serde::{Deserialize, Serialize};

use crate::calendar::MonthKey;
use crate::classify::{ClassifiedTransaction, Perspective, classify_all};
use crate::format::{format_long_date, format_short_date};
use crate::models::{Category, TransactionRecord};

/// Per-category sums for one bucket.
///
/// All four categories are always present; an untouched category is zero.
/// Sums are exact, so totals do not depend on the order records are added.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CategoryTotals {
    /// Sum of deposits.
    pub deposit: Decimal,
    /// Sum of withdrawals.
    pub withdrawal: Decimal,
    /// Sum of outgoing transfers.
    pub transfer: Decimal,
    /// Sum of incoming transfers.
    pub credit: Decimal,
}

impl CategoryTotals {
    /// Adds `amount` to the total of `category`.
    #[inline]
    pub fn add(&mut self, category: Category, amount: Decimal) {
        let slot = match category {
            Category::Deposit => &mut self.deposit,
            Category::Withdrawal => &mut self.withdrawal,
            Category::Transfer => &mut self.transfer,
            Category::Credit => &mut self.credit,
        };
        *slot += amount;
    }

    /// Returns the total of `category`.
    #[inline]
    #[must_use]
    pub const fn get(&self, category: Category) -> Decimal {
        match category {
            Category::Deposit => self.deposit,
            Category::Withdrawal => self.withdrawal,
            Category::Transfer => self.transfer,
            Category::Credit => self.credit,
        }
    }

    /// Returns `true` if no category has a positive total.
    ///
    /// Views use this to show their "nothing on this date" state.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        Category::ALL
            .iter()
            .all(|&category| self.get(category) <= Decimal::ZERO)
    }

    /// Returns the sum over all four categories.
    #[inline]
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.deposit + self.withdrawal + self.transfer + self.credit
    }

    /// Iterates `(category, total)` pairs in [`Category::ALL`] order.
    #[inline]
    pub fn pairs(&self) -> impl Iterator<Item = (Category, Decimal)> + '_ {
        Category::ALL
            .iter()
            .map(move |&category| (category, self.get(category)))
    }
}

/// Category totals for one calendar period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket<K> {
    /// The period: a [`NaiveDate`] for days, a [`MonthKey`] for months.
    pub key: K,
    /// Totals of the records falling in the period.
    pub totals: CategoryTotals,
}

/// Groups entries by `key_fn`, in ascending key order.
fn bucket_by<'rec, K, I>(entries: I, key_fn: fn(&ClassifiedTransaction) -> K) -> Vec<Bucket<K>>
where
    K: Ord,
    I: IntoIterator<Item = &'rec ClassifiedTransaction>,
{
    let mut buckets: BTreeMap<K, CategoryTotals> = BTreeMap::new();
    for entry in entries {
        buckets
            .entry(key_fn(entry))
            .or_default()
            .add(entry.category, entry.amount);
    }
    buckets
        .into_iter()
        .map(|(key, totals)| Bucket { key, totals })
        .collect()
}

/// Records classified and placed on the calendar from one viewer's
/// perspective.
///
/// Construction does all the per-record work; queries only group and sum.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedHistory {
    /// Well-formed records, in input order.
    entries: Vec<ClassifiedTransaction>,
}

impl ClassifiedHistory {
    /// Classifies `records` from `perspective`, skipping malformed ones.
    #[inline]
    #[must_use]
    pub fn from_records(records: &[TransactionRecord], perspective: &Perspective) -> Self {
        Self {
            entries: classify_all(records, perspective),
        }
    }

    /// Returns the classified entries in input order.
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[ClassifiedTransaction] {
        &self.entries
    }

    /// Returns the entry classified from the record at `position`, or
    /// `None` if that record was malformed.
    #[inline]
    #[must_use]
    pub fn entry_at(&self, position: usize) -> Option<&ClassifiedTransaction> {
        self.entries
            .binary_search_by_key(&position, |entry| entry.position)
            .ok()
            .and_then(|index| self.entries.get(index))
    }

    /// Totals per calendar day, oldest first.
    #[inline]
    #[must_use]
    pub fn daily_breakdown(&self) -> Vec<Bucket<NaiveDate>> {
        bucket_by(&self.entries, |entry| entry.day)
    }

    /// Totals per calendar month, oldest first.
    #[inline]
    #[must_use]
    pub fn monthly_breakdown(&self) -> Vec<Bucket<MonthKey>> {
        bucket_by(&self.entries, |entry| MonthKey::of(entry.day))
    }

    /// Totals per day within `month`, oldest first.
    ///
    /// Days without transactions are absent rather than zero-filled.
    #[inline]
    #[must_use]
    pub fn daily_breakdown_for_month(&self, month: MonthKey) -> Vec<Bucket<NaiveDate>> {
        bucket_by(
            self.entries.iter().filter(|entry| month.contains(entry.day)),
            |entry| entry.day,
        )
    }

    /// Totals for the single calendar day `date`.
    #[inline]
    #[must_use]
    pub fn date_snapshot(&self, date: NaiveDate) -> CategoryTotals {
        let mut totals = CategoryTotals::default();
        for entry in self.entries.iter().filter(|entry| entry.day == date) {
            totals.add(entry.category, entry.amount);
        }
        totals
    }

    /// Distinct years that have at least one transaction, ascending.
    #[inline]
    #[must_use]
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.entries.iter().map(|entry| entry.day.year()).collect();
        years.sort_unstable();
        years.dedup();
        years
    }
}

/// Totals per calendar day of `records`, oldest first.
#[inline]
#[must_use]
pub fn daily_breakdown(
    records: &[TransactionRecord],
    perspective: &Perspective,
) -> Vec<Bucket<NaiveDate>> {
    ClassifiedHistory::from_records(records, perspective).daily_breakdown()
}

/// Totals per calendar month of `records`, oldest first.
#[inline]
#[must_use]
pub fn monthly_breakdown(
    records: &[TransactionRecord],
    perspective: &Perspective,
) -> Vec<Bucket<MonthKey>> {
    ClassifiedHistory::from_records(records, perspective).monthly_breakdown()
}

/// Totals per day of `records` that fall in `month`, oldest first.
#[inline]
#[must_use]
pub fn daily_breakdown_for_month(
    records: &[TransactionRecord],
    perspective: &Perspective,
    month: MonthKey,
) -> Vec<Bucket<NaiveDate>> {
    ClassifiedHistory::from_records(records, perspective).daily_breakdown_for_month(month)
}

/// Totals of `records` dated on `date`.
#[inline]
#[must_use]
pub fn date_snapshot(
    records: &[TransactionRecord],
    perspective: &Perspective,
    date: NaiveDate,
) -> CategoryTotals {
    ClassifiedHistory::from_records(records, perspective).date_snapshot(date)
}

/// Distinct years of `records`, ascending.
#[inline]
#[must_use]
pub fn transaction_years(records: &[TransactionRecord], perspective: &Perspective) -> Vec<i32> {
    ClassifiedHistory::from_records(records, perspective).years()
}

/// One category's values across a [`ChartSeries`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    /// Category plotted.
    pub category: Category,
    /// Legend label.
    pub label: &'static str,
    /// Fill/stroke colour (CSS hex).
    pub color: &'static str,
    /// One value per label, aligned by index, as plotted.
    pub values: Vec<f64>,
}

/// Buckets laid out for a chart: one label per bucket and one aligned
/// value series per category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    /// Axis labels, one per bucket.
    pub labels: Vec<String>,
    /// One dataset per category, in [`Category::ALL`] order.
    pub datasets: Vec<Dataset>,
}

impl ChartSeries {
    /// Builds a series from buckets, labelling each with `label`.
    #[inline]
    #[must_use]
    pub fn from_buckets<K>(buckets: &[Bucket<K>], label: fn(&K) -> String) -> Self {
        let labels = buckets.iter().map(|bucket| label(&bucket.key)).collect();
        let datasets = Category::ALL
            .iter()
            .map(|&category| Dataset {
                category,
                label: category.label(),
                color: category.color(),
                values: buckets
                    .iter()
                    .map(|bucket| bucket.totals.get(category).to_f64().unwrap_or_default())
                    .collect(),
            })
            .collect();
        Self { labels, datasets }
    }

    /// Daily chart with short labels (`Mar 1`).
    #[inline]
    #[must_use]
    pub fn daily(buckets: &[Bucket<NaiveDate>]) -> Self {
        Self::from_buckets(buckets, |day| format_short_date(*day))
    }

    /// Monthly chart with month labels (`March 2025`).
    #[inline]
    #[must_use]
    pub fn monthly(buckets: &[Bucket<MonthKey>]) -> Self {
        Self::from_buckets(buckets, |month| month.label())
    }

    /// Month-scoped daily chart with full date labels (`March 1, 2025`).
    #[inline]
    #[must_use]
    pub fn month_days(buckets: &[Bucket<NaiveDate>]) -> Self {
        Self::from_buckets(buckets, |day| format_long_date(*day))
    }

    /// Returns the dataset of `category`.
    #[inline]
    #[must_use]
    pub fn dataset(&self, category: Category) -> Option<&Dataset> {
        self.datasets
            .iter()
            .find(|dataset| dataset.category == category)
    }
}
