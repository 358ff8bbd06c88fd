//! Filtered, paginated transaction table.
//!
//! The table filters on the raw [`TransactionType`](crate::models::TransactionType)
//! rather than on the viewer-relative category, so the `Transfer` filter
//! keeps incoming credits too. Pages are 1-based and hold [`PAGE_SIZE`] rows.
//! Row statuses and dates come from the [`ClassifiedHistory`] built at
//! ingestion; records are not classified again for display.

use crate::aggregate::ClassifiedHistory;
use crate::calendar::ViewerZone;
use crate::classify::ClassifiedTransaction;
use crate::format::{format_table_date, format_usd};
use crate::models::{TransactionRecord, TypeFilter};

/// Rows per table page.
pub const PAGE_SIZE: usize = 10;

/// Status shown for records that cannot be classified.
const UNKNOWN_STATUS: &str = "Unknown";

/// Returns the records passing `filter`, in their original order.
#[inline]
#[must_use]
pub fn filter_records(records: &[TransactionRecord], filter: TypeFilter) -> Vec<&TransactionRecord> {
    records
        .iter()
        .filter(|record| filter.matches(record.transaction_type.as_ref()))
        .collect()
}

/// Number of pages needed for `len` rows.
#[inline]
#[must_use]
pub const fn page_count(len: usize) -> usize {
    len.div_ceil(PAGE_SIZE)
}

/// Returns the rows of 1-based `page`.
///
/// Page `0` and pages past the end are empty.
#[inline]
#[must_use]
pub fn page_slice<T>(items: &[T], page: usize) -> &[T] {
    let Some(start) = page
        .checked_sub(1)
        .and_then(|index| index.checked_mul(PAGE_SIZE))
    else {
        return &[];
    };
    let end = start.saturating_add(PAGE_SIZE).min(items.len());
    items.get(start..end).unwrap_or(&[])
}

/// Selection state of the history table: the active filter and page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryView {
    /// Active type filter.
    filter: TypeFilter,
    /// Current 1-based page.
    current_page: usize,
}

impl Default for HistoryView {
    #[inline]
    fn default() -> Self {
        Self {
            filter: TypeFilter::All,
            current_page: 1,
        }
    }
}

impl HistoryView {
    /// Creates a view showing page 1 of all records.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the active filter.
    #[inline]
    #[must_use]
    pub const fn filter(&self) -> TypeFilter {
        self.filter
    }

    /// Returns the current 1-based page.
    #[inline]
    #[must_use]
    pub const fn current_page(&self) -> usize {
        self.current_page
    }

    /// Changes the filter and returns to page 1.
    #[inline]
    pub const fn set_filter(&mut self, filter: TypeFilter) {
        self.filter = filter;
        self.reset_page();
    }

    /// Returns to page 1, keeping the filter.
    #[inline]
    pub const fn reset_page(&mut self) {
        self.current_page = 1;
    }

    /// Number of pages of `records` under the active filter.
    #[inline]
    #[must_use]
    pub fn page_count(&self, records: &[TransactionRecord]) -> usize {
        page_count(filter_records(records, self.filter).len())
    }

    /// Moves to `page` if it exists, returning whether the page changed.
    ///
    /// Out-of-range pages leave the view untouched.
    #[inline]
    pub fn go_to_page(&mut self, page: usize, records: &[TransactionRecord]) -> bool {
        if page == 0 || page > self.page_count(records) || page == self.current_page {
            return false;
        }
        self.current_page = page;
        true
    }

    /// Moves one page forward, if there is one.
    #[inline]
    pub fn next_page(&mut self, records: &[TransactionRecord]) -> bool {
        self.go_to_page(self.current_page.saturating_add(1), records)
    }

    /// Moves one page back, if there is one.
    #[inline]
    pub fn previous_page(&mut self, records: &[TransactionRecord]) -> bool {
        self.go_to_page(self.current_page.saturating_sub(1), records)
    }

    /// Records on the current page under the active filter.
    #[inline]
    #[must_use]
    pub fn visible<'rec>(&self, records: &'rec [TransactionRecord]) -> Vec<&'rec TransactionRecord> {
        self.visible_positions(records)
            .into_iter()
            .map(|(_, record)| record)
            .collect()
    }

    /// Display rows for the current page.
    ///
    /// `history` must have been built from `records`; `zone` only places
    /// malformed records, which `history` does not hold, on the calendar.
    #[inline]
    #[must_use]
    pub fn rows(
        &self,
        records: &[TransactionRecord],
        history: &ClassifiedHistory,
        zone: &ViewerZone,
    ) -> Vec<TableRow> {
        self.visible_positions(records)
            .into_iter()
            .map(|(position, record)| TableRow::new(record, history.entry_at(position), zone))
            .collect()
    }

    /// Current-page records paired with their index in `records`.
    fn visible_positions<'rec>(
        &self,
        records: &'rec [TransactionRecord],
    ) -> Vec<(usize, &'rec TransactionRecord)> {
        let filtered: Vec<(usize, &TransactionRecord)> = records
            .iter()
            .enumerate()
            .filter(|&(_, record)| self.filter.matches(record.transaction_type.as_ref()))
            .collect();
        page_slice(&filtered, self.current_page).to_vec()
    }
}

/// One rendered line of the history table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// Transaction identifier.
    pub id: String,
    /// Amount formatted as US dollars.
    pub amount: String,
    /// Calendar day, `YYYY-MM-DD`.
    pub date: String,
    /// Viewer-relative category label, or `Unknown`.
    pub status: &'static str,
    /// Initiating account.
    pub source: String,
    /// Receiving account, empty when absent.
    pub target: String,
}

impl TableRow {
    /// Renders `record` using its classified `entry`.
    ///
    /// Without an entry the record was malformed: its status is `Unknown`
    /// and its day is taken in `zone`.
    #[inline]
    #[must_use]
    pub fn new(
        record: &TransactionRecord,
        entry: Option<&ClassifiedTransaction>,
        zone: &ViewerZone,
    ) -> Self {
        let (status, day) = entry.map_or_else(
            || (UNKNOWN_STATUS, record.transaction_date.local_day(zone)),
            |classified| (classified.category.label(), classified.day),
        );
        Self {
            id: record.id.to_string(),
            amount: format_usd(record.amount),
            date: format_table_date(day),
            status,
            source: record.source_account_number.to_string(),
            target: record
                .target_account_number
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::classify::Perspective;
    use crate::models::{AccountNumber, TransactionDate, TransactionId, TransactionType};

    const VIEWER: &str = "100001";

    fn record(index: usize, kind: Option<TransactionType>) -> TransactionRecord {
        TransactionRecord {
            id: TransactionId::from(format!("tx-{index}")),
            amount: Decimal::TEN,
            transaction_date: "2025-03-01T10:00:00".parse::<TransactionDate>().unwrap(),
            transaction_type: kind,
            source_account_number: AccountNumber::from("200002"),
            target_account_number: Some(AccountNumber::from(VIEWER)),
        }
    }

    fn deposits(count: usize) -> Vec<TransactionRecord> {
        (0..count)
            .map(|index| record(index, Some(TransactionType::CashDeposit)))
            .collect()
    }

    #[test]
    fn twenty_five_records_paginate_ten_ten_five() {
        let records = deposits(25);
        assert_eq!(page_count(records.len()), 3);
        assert_eq!(page_slice(&records, 1).len(), 10);
        assert_eq!(page_slice(&records, 2).len(), 10);
        assert_eq!(page_slice(&records, 3).len(), 5);
        assert!(page_slice(&records, 4).is_empty());
        assert!(page_slice(&records, 0).is_empty());
    }

    #[test]
    fn out_of_range_page_is_ignored() {
        let records = deposits(25);
        let mut view = HistoryView::new();
        assert!(view.go_to_page(3, &records));
        assert!(!view.go_to_page(4, &records));
        assert_eq!(view.current_page(), 3);
        assert!(!view.go_to_page(0, &records));
        assert_eq!(view.current_page(), 3);
        assert_eq!(view.visible(&records).len(), 5);
    }

    #[test]
    fn next_and_previous_stop_at_edges() {
        let records = deposits(15);
        let mut view = HistoryView::new();
        assert!(!view.previous_page(&records));
        assert!(view.next_page(&records));
        assert!(!view.next_page(&records));
        assert_eq!(view.current_page(), 2);
        assert!(view.previous_page(&records));
        assert_eq!(view.current_page(), 1);
    }

    #[test]
    fn changing_filter_resets_page() {
        let records = deposits(25);
        let mut view = HistoryView::new();
        assert!(view.go_to_page(2, &records));
        view.set_filter(TypeFilter::Withdrawal);
        assert_eq!(view.current_page(), 1);
        assert_eq!(view.filter(), TypeFilter::Withdrawal);
        assert!(view.visible(&records).is_empty());
        assert_eq!(view.page_count(&records), 0);
    }

    #[test]
    fn filter_preserves_order_and_uses_raw_type() {
        let records = vec![
            record(0, Some(TransactionType::CashTransfer)),
            record(1, Some(TransactionType::CashDeposit)),
            record(2, Some(TransactionType::CashTransfer)),
            record(3, None),
        ];
        let transfers: Vec<&str> = filter_records(&records, TypeFilter::Transfer)
            .iter()
            .map(|record| record.id.as_inner())
            .collect();
        assert_eq!(transfers, ["tx-0", "tx-2"]);
        assert_eq!(filter_records(&records, TypeFilter::All).len(), 4);
    }

    #[test]
    fn rows_use_classified_status_and_day() {
        let records = vec![
            record(7, Some(TransactionType::CashTransfer)),
            record(8, None),
        ];
        let perspective = Perspective::for_account(AccountNumber::from(VIEWER));
        let history = ClassifiedHistory::from_records(&records, &perspective);
        let rows = HistoryView::new().rows(&records, &history, &perspective.zone);

        let credit = rows.first().unwrap();
        assert_eq!(credit.status, "Credit");
        assert_eq!(credit.amount, "$10.00");
        assert_eq!(credit.date, "2025-03-01");
        assert_eq!(credit.target, VIEWER);

        let unknown = rows.get(1).unwrap();
        assert_eq!(unknown.status, "Unknown");
        assert_eq!(unknown.date, "2025-03-01");
    }

    #[test]
    fn rows_follow_ingested_classification() {
        // The table reads the history it is given rather than re-deriving it.
        let records = vec![record(1, Some(TransactionType::CashTransfer))];
        let stale = ClassifiedHistory::from_records(&records, &Perspective::default());
        let rows = HistoryView::new().rows(
            &records,
            &stale,
            &ViewerZone::Named(chrono_tz::UTC),
        );
        assert_eq!(rows.first().map(|row| row.status), Some("Transfer"));
    }

    #[test]
    fn instant_rows_use_ingested_day() {
        let mut late = record(3, Some(TransactionType::CashDeposit));
        late.transaction_date = "2025-03-01T02:30:00Z".parse::<TransactionDate>().unwrap();
        let records = vec![late];
        let new_york = Perspective::default()
            .with_zone(ViewerZone::Named(chrono_tz::America::New_York));
        let history = ClassifiedHistory::from_records(&records, &new_york);
        let rows = HistoryView::new().rows(&records, &history, &new_york.zone);
        assert_eq!(rows.first().map(|row| row.date.as_str()), Some("2025-02-28"));
    }

    #[test]
    fn rows_follow_current_page() {
        let records = deposits(12);
        let history = ClassifiedHistory::from_records(&records, &Perspective::default());
        let mut view = HistoryView::new();
        assert!(view.next_page(&records));
        let rows = view.rows(&records, &history, &ViewerZone::System);
        let ids: Vec<&str> = rows.iter().map(|row| row.id.as_str()).collect();
        assert_eq!(ids, ["tx-10", "tx-11"]);
    }

    #[test]
    fn filtered_rows_keep_their_positions() {
        let records = vec![
            record(0, None),
            record(1, Some(TransactionType::CashDeposit)),
            record(2, Some(TransactionType::CashTransfer)),
        ];
        let perspective = Perspective::for_account(AccountNumber::from(VIEWER));
        let history = ClassifiedHistory::from_records(&records, &perspective);
        let mut view = HistoryView::new();
        view.set_filter(TypeFilter::Transfer);
        let rows = view.rows(&records, &history, &perspective.zone);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows.first().map(|row| row.status), Some("Credit"));
    }
}
