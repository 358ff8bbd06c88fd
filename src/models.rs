//! Data models for the banking API and the derived history views.
//!
//! This module contains strongly-typed representations of transaction
//! records and account details, newtype ID wrappers, and enumeration types
//! for constrained values.

mod account;
mod enums;
mod ids;
mod transaction;

pub use account::AccountDetails;
pub use chrono::NaiveDate;
pub use enums::{Category, TransactionType, TypeFilter};
pub use ids::{AccountNumber, TransactionId};
pub use rust_decimal::Decimal;
pub use transaction::{TransactionDate, TransactionRecord};
