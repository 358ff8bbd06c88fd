//! Transaction history views for a banking customer portal.
//!
//! This crate fetches a viewer's raw transaction log from the bank's REST
//! API and derives the views a portal shows from it: daily and monthly
//! category totals, a single-date breakdown, a filtered and paginated
//! table, and a CSV export.
//!
//! Every view goes through one classification rule: a transfer whose
//! target is the viewer's own account is a `Credit`, any other transfer is
//! a `Transfer`. Each record is placed on the viewer's calendar once, when
//! it is ingested; see [`models::TransactionDate::local_day`].
//!
//! # Example
//!
//! ```rust
//! use bankview_rs::aggregate::date_snapshot;
//! use bankview_rs::classify::Perspective;
//! use bankview_rs::models::{AccountNumber, Decimal, NaiveDate, TransactionRecord};
//!
//! let records: Vec<TransactionRecord> = serde_json::from_str(r#"[
//!     {"id": 1, "amount": 100, "transactionDate": "2025-03-01",
//!      "transactionType": "CASH_DEPOSIT", "sourceAccountNumber": "100001"},
//!     {"id": 2, "amount": 50, "transactionDate": "2025-03-01",
//!      "transactionType": "CASH_TRANSFER", "sourceAccountNumber": "200002",
//!      "targetAccountNumber": "100001"}
//! ]"#).unwrap();
//!
//! let viewer = Perspective::for_account(AccountNumber::from("100001"));
//! let day = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
//! let totals = date_snapshot(&records, &viewer, day);
//! assert_eq!(totals.deposit, Decimal::from(100));
//! assert_eq!(totals.credit, Decimal::from(50));
//! ```

extern crate alloc;

pub mod aggregate;
pub mod calendar;
pub mod classify;
#[cfg(any(feature = "async", feature = "blocking"))]
pub mod client;
pub mod error;
pub mod export;
pub mod format;
pub mod history;
pub mod models;
pub mod session;
pub mod source;
