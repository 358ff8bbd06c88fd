//! In-memory transaction source.
//!
//! Provides [`InMemorySource`], a thread-safe source serving a fixed
//! history. Useful for tests, offline rendering, and replaying exported
//! data.

use std::sync::{Mutex, PoisonError};

#[cfg(feature = "async")]
use core::future::{self, Future};

use crate::error::{BankViewError, Result};
use crate::models::{AccountNumber, TransactionRecord};

/// Thread-safe source serving records held in memory.
///
/// Implements both [`super::TransactionSource`] (async) and
/// [`super::BlockingTransactionSource`] (blocking). A source created with
/// [`InMemorySource::failing`] answers every call with an error, which
/// lets callers exercise their fetch-failure paths.
///
/// # Example
///
/// ```rust
/// use bankview_rs::models::AccountNumber;
/// use bankview_rs::source::{BlockingTransactionSource, InMemorySource};
///
/// let source = InMemorySource::new(Vec::new()).with_viewer(AccountNumber::from("100001"));
/// assert!(source.fetch_transactions().unwrap().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct InMemorySource {
    /// All state behind a single mutex for thread-safe interior mutability.
    inner: Mutex<Inner>,
}

/// Inner mutable state.
#[derive(Debug, Default)]
struct Inner {
    /// Records returned by every fetch.
    records: Vec<TransactionRecord>,
    /// Viewer account returned by identity resolution.
    viewer: Option<AccountNumber>,
    /// Injected failure message.
    failure: Option<String>,
    /// Number of fetches served so far.
    fetches: usize,
}

impl InMemorySource {
    /// Creates a source serving `records` with an unknown viewer.
    #[inline]
    #[must_use]
    pub fn new(records: Vec<TransactionRecord>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                records,
                ..Inner::default()
            }),
        }
    }

    /// Creates a source whose every call fails with `message`.
    #[inline]
    #[must_use]
    pub fn failing<T: Into<String>>(message: T) -> Self {
        Self {
            inner: Mutex::new(Inner {
                failure: Some(message.into()),
                ..Inner::default()
            }),
        }
    }

    /// Sets the viewer account reported by identity resolution.
    #[inline]
    #[must_use]
    pub fn with_viewer(mut self, viewer: AccountNumber) -> Self {
        if let Ok(inner) = self.inner.get_mut() {
            inner.viewer = Some(viewer);
        }
        self
    }

    /// Replaces the served records.
    ///
    /// # Errors
    ///
    /// Returns an error if the internal lock is poisoned.
    #[inline]
    pub fn set_records(&self, records: Vec<TransactionRecord>) -> Result<()> {
        self.with_lock(|inner| inner.records = records)
    }

    /// Makes subsequent calls fail with `message`, or succeed again with
    /// `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the internal lock is poisoned.
    #[inline]
    pub fn set_failure(&self, message: Option<String>) -> Result<()> {
        self.with_lock(|inner| inner.failure = message)
    }

    /// Returns how many fetches have been served, failed ones included.
    ///
    /// # Errors
    ///
    /// Returns an error if the internal lock is poisoned.
    #[inline]
    pub fn fetch_count(&self) -> Result<usize> {
        self.with_lock(|inner| inner.fetches)
    }

    /// Acquires the inner lock and applies a closure.
    fn with_lock<R, F: FnOnce(&mut Inner) -> R>(&self, f: F) -> Result<R> {
        let mut inner = self.inner.lock().map_err(|err| lock_error(&err))?;
        Ok(f(&mut inner))
    }

    /// Serves one fetch.
    fn load_records(&self) -> Result<Vec<TransactionRecord>> {
        self.with_lock(|inner| {
            inner.fetches = inner.fetches.saturating_add(1);
            match inner.failure.as_deref() {
                Some(message) => Err(injected_error(message)),
                None => Ok(inner.records.clone()),
            }
        })?
    }

    /// Serves one identity lookup.
    fn load_viewer(&self) -> Result<Option<AccountNumber>> {
        self.with_lock(|inner| match inner.failure.as_deref() {
            Some(message) => Err(injected_error(message)),
            None => Ok(inner.viewer.clone()),
        })?
    }
}

/// Wraps a mutex poison error.
fn lock_error<T>(err: &PoisonError<T>) -> BankViewError {
    BankViewError::Source(err.to_string().into())
}

/// Builds the error for an injected failure.
fn injected_error(message: &str) -> BankViewError {
    BankViewError::Source(message.to_owned().into())
}

// ── BlockingTransactionSource implementation ────────────────────────────

impl super::BlockingTransactionSource for InMemorySource {
    #[inline]
    fn fetch_transactions(&self) -> Result<Vec<TransactionRecord>> {
        self.load_records()
    }

    #[inline]
    fn resolve_viewer_account(&self) -> Result<Option<AccountNumber>> {
        self.load_viewer()
    }
}

// ── TransactionSource implementation ────────────────────────────────────

#[cfg(feature = "async")]
impl super::TransactionSource for InMemorySource {
    #[inline]
    fn fetch_transactions(&self) -> impl Future<Output = Result<Vec<TransactionRecord>>> + Send {
        future::ready(self.load_records())
    }

    #[inline]
    fn resolve_viewer_account(&self) -> impl Future<Output = Result<Option<AccountNumber>>> + Send {
        future::ready(self.load_viewer())
    }
}
