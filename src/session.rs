//! Explicit application state for one viewer's history screen.
//!
//! A [`HistorySession`] owns the fetched records, the viewer's
//! [`Perspective`], the load status and the table selection. Fetches are
//! ticketed: only the result of the most recently started fetch is
//! applied, so a slow response can never overwrite a newer one.

use std::io;

use chrono::NaiveDate;

use crate::aggregate::{Bucket, CategoryTotals, ClassifiedHistory};
use crate::calendar::{MonthKey, ViewerZone};
use crate::classify::Perspective;
use crate::error::Result;
use crate::export::write_csv;
use crate::history::{HistoryView, TableRow};
use crate::models::{AccountNumber, TransactionRecord, TypeFilter};
use crate::source::BlockingTransactionSource;
#[cfg(feature = "async")]
use crate::source::TransactionSource;

/// Where the session is in its fetch lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadStatus {
    /// Nothing fetched yet.
    #[default]
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The latest fetch succeeded.
    Ready,
    /// The latest fetch failed; the record list is empty.
    Failed,
}

/// Handle for one started fetch.
///
/// Tickets are issued in increasing order by [`HistorySession::begin_fetch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchTicket(u64);

/// State of one viewer's transaction history.
#[derive(Debug, Clone, Default)]
pub struct HistorySession {
    /// Records of the last successful fetch, as received.
    records: Vec<TransactionRecord>,
    /// Who is viewing, and in which zone.
    perspective: Perspective,
    /// Records classified from `perspective`.
    history: ClassifiedHistory,
    /// Fetch lifecycle state.
    status: LoadStatus,
    /// Table filter and page.
    view: HistoryView,
    /// Most recently issued ticket number.
    latest_ticket: u64,
    /// User-facing message about the last failure.
    notice: Option<String>,
}

impl HistorySession {
    /// Creates an empty session for `perspective`.
    #[inline]
    #[must_use]
    pub fn new(perspective: Perspective) -> Self {
        Self {
            perspective,
            ..Self::default()
        }
    }

    /// Creates an empty session with an unknown viewer in `zone`.
    #[inline]
    #[must_use]
    pub fn in_zone(zone: ViewerZone) -> Self {
        Self::new(Perspective::new(None, zone))
    }

    /// Returns the viewer's perspective.
    #[inline]
    #[must_use]
    pub const fn perspective(&self) -> &Perspective {
        &self.perspective
    }

    /// Sets the viewer account and reclassifies the loaded records.
    #[inline]
    pub fn set_viewer(&mut self, account: Option<AccountNumber>) {
        self.perspective.account = account;
        self.reclassify();
    }

    /// Returns the fetch lifecycle state.
    #[inline]
    #[must_use]
    pub const fn status(&self) -> LoadStatus {
        self.status
    }

    /// Returns the message describing the last failed fetch, if any.
    #[inline]
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Returns the loaded records, unfiltered.
    #[inline]
    #[must_use]
    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    /// Returns the classified history backing every aggregate.
    #[inline]
    #[must_use]
    pub const fn history(&self) -> &ClassifiedHistory {
        &self.history
    }

    /// Starts a fetch and returns its ticket.
    ///
    /// Any earlier ticket becomes stale.
    #[inline]
    pub const fn begin_fetch(&mut self) -> FetchTicket {
        self.latest_ticket = self.latest_ticket.saturating_add(1);
        self.status = LoadStatus::Loading;
        FetchTicket(self.latest_ticket)
    }

    /// Applies the result of the fetch identified by `ticket`.
    ///
    /// Returns `false`, leaving the session untouched, if a newer fetch has
    /// been started since. A failed fetch empties the record list and sets a
    /// notice; a successful one replaces the records and returns the table
    /// to page 1.
    #[inline]
    pub fn finish_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<TransactionRecord>>,
    ) -> bool {
        if ticket.0 != self.latest_ticket {
            tracing::debug!(
                ticket = ticket.0,
                latest = self.latest_ticket,
                "discarding stale fetch result"
            );
            return false;
        }

        match result {
            Ok(records) => {
                tracing::debug!(count = records.len(), "transactions loaded");
                self.records = records;
                self.status = LoadStatus::Ready;
                self.notice = None;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to load transactions");
                self.records.clear();
                self.status = LoadStatus::Failed;
                self.notice = Some(format!("Unable to load transactions: {err}"));
            }
        }
        self.view.reset_page();
        self.reclassify();
        true
    }

    /// Fetches the history from `source`, resolving the viewer first if it
    /// is not known yet.
    ///
    /// A failed viewer lookup is logged and the history still loads, with
    /// no transfer shown as a credit.
    #[cfg(feature = "async")]
    #[inline]
    #[tracing::instrument(skip_all)]
    pub async fn refresh<S: TransactionSource>(&mut self, source: &S) -> LoadStatus {
        let ticket = self.begin_fetch();
        if self.perspective.account.is_none() {
            let viewer = source.resolve_viewer_account().await;
            self.apply_viewer(viewer);
        }
        let result = source.fetch_transactions().await;
        let _applied = self.finish_fetch(ticket, result);
        self.status
    }

    /// Blocking counterpart of [`Self::refresh`].
    #[inline]
    #[tracing::instrument(skip_all)]
    pub fn refresh_blocking<S: BlockingTransactionSource>(&mut self, source: &S) -> LoadStatus {
        let ticket = self.begin_fetch();
        if self.perspective.account.is_none() {
            let viewer = source.resolve_viewer_account();
            self.apply_viewer(viewer);
        }
        let result = source.fetch_transactions();
        let _applied = self.finish_fetch(ticket, result);
        self.status
    }

    /// Totals per calendar day.
    #[inline]
    #[must_use]
    pub fn daily_breakdown(&self) -> Vec<Bucket<NaiveDate>> {
        self.history.daily_breakdown()
    }

    /// Totals per calendar month.
    #[inline]
    #[must_use]
    pub fn monthly_breakdown(&self) -> Vec<Bucket<MonthKey>> {
        self.history.monthly_breakdown()
    }

    /// Totals per day within `month`.
    #[inline]
    #[must_use]
    pub fn daily_breakdown_for_month(&self, month: MonthKey) -> Vec<Bucket<NaiveDate>> {
        self.history.daily_breakdown_for_month(month)
    }

    /// Totals for `date`, or for today in the viewer's zone when `None`.
    #[inline]
    #[must_use]
    pub fn date_snapshot(&self, date: Option<NaiveDate>) -> CategoryTotals {
        let day = date.unwrap_or_else(|| self.perspective.zone.today());
        self.history.date_snapshot(day)
    }

    /// Years present in the history, ascending.
    #[inline]
    #[must_use]
    pub fn years(&self) -> Vec<i32> {
        self.history.years()
    }

    /// Returns the table selection.
    #[inline]
    #[must_use]
    pub const fn view(&self) -> &HistoryView {
        &self.view
    }

    /// Changes the table filter, returning to page 1.
    #[inline]
    pub const fn set_filter(&mut self, filter: TypeFilter) {
        self.view.set_filter(filter);
    }

    /// Moves the table to `page` if it exists.
    #[inline]
    pub fn go_to_page(&mut self, page: usize) -> bool {
        self.view.go_to_page(page, &self.records)
    }

    /// Moves the table one page forward, if possible.
    #[inline]
    pub fn next_page(&mut self) -> bool {
        self.view.next_page(&self.records)
    }

    /// Moves the table one page back, if possible.
    #[inline]
    pub fn previous_page(&mut self) -> bool {
        self.view.previous_page(&self.records)
    }

    /// Number of table pages under the active filter.
    #[inline]
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.view.page_count(&self.records)
    }

    /// Display rows of the current table page.
    #[inline]
    #[must_use]
    pub fn rows(&self) -> Vec<TableRow> {
        self.view
            .rows(&self.records, &self.history, &self.perspective.zone)
    }

    /// Writes every loaded record as CSV, ignoring the table filter.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::BankViewError::NothingToExport`] if nothing is loaded, or an
    /// export error if writing fails.
    #[inline]
    pub fn export_csv<W: io::Write>(&self, writer: W) -> Result<usize> {
        write_csv(&self.records, writer)
    }

    /// Records the outcome of a viewer lookup.
    fn apply_viewer(&mut self, viewer: Result<Option<AccountNumber>>) {
        match viewer {
            Ok(account) => self.perspective.account = account,
            Err(err) => {
                tracing::warn!(error = %err, "could not resolve viewer account");
            }
        }
    }

    /// Rebuilds the classified history from the records and perspective.
    fn reclassify(&mut self) {
        self.history = ClassifiedHistory::from_records(&self.records, &self.perspective);
    }
}
