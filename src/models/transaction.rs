//! Transaction record model.

use core::fmt;
use core::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::{AccountNumber, TransactionId, TransactionType};
use crate::calendar::ViewerZone;
use crate::error::BankViewError;

/// Offset layouts accepted besides RFC 3339 (offset written without a colon).
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Accepted layouts for timestamps without a UTC offset.
const LOCAL_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Layout used when writing local timestamps back out.
const LOCAL_OUTPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// A single entry of the account's transaction history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    /// Identifier issued by the banking API.
    pub id: TransactionId,
    /// Positive amount in USD, kept exact so sums do not depend on
    /// grouping order.
    pub amount: Decimal,
    /// When the transaction happened.
    pub transaction_date: TransactionDate,
    /// Raw transaction type (`None` if the API omitted it).
    #[serde(default)]
    pub transaction_type: Option<TransactionType>,
    /// Account that initiated the transaction.
    pub source_account_number: AccountNumber,
    /// Receiving account (only meaningful for transfers).
    #[serde(default)]
    pub target_account_number: Option<AccountNumber>,
}

/// Timestamp of a transaction.
///
/// The API is not consistent: some deployments send instants (RFC 3339 with
/// an offset, or epoch milliseconds), others send wall-clock times without
/// any offset. Both are kept as received; [`TransactionDate::local_day`]
/// turns either into the viewer's calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum TransactionDate {
    /// Wall-clock time in the viewer's zone (no offset on the wire).
    Local(NaiveDateTime),
    /// An absolute instant.
    Instant(DateTime<FixedOffset>),
}

impl TransactionDate {
    /// Returns the calendar day this transaction falls on for the viewer.
    ///
    /// Instants are converted into the viewer's zone; local timestamps are
    /// already wall-clock and are never shifted.
    #[inline]
    #[must_use]
    pub fn local_day(&self, zone: &ViewerZone) -> NaiveDate {
        match *self {
            Self::Local(naive) => naive.date(),
            Self::Instant(instant) => zone.day_of(&instant),
        }
    }
}

impl FromStr for TransactionDate {
    type Err = BankViewError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self::Instant(instant));
        }
        if let Some(instant) = OFFSET_FORMATS
            .iter()
            .find_map(|format| DateTime::parse_from_str(trimmed, format).ok())
        {
            return Ok(Self::Instant(instant));
        }
        if let Some(naive) = LOCAL_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        {
            return Ok(Self::Local(naive));
        }
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .map(|date| Self::Local(date.and_time(NaiveTime::MIN)))
            .map_err(|err| BankViewError::InvalidDate(format!("{trimmed}: {err}")))
    }
}

impl fmt::Display for TransactionDate {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Local(naive) => write!(f, "{}", naive.format(LOCAL_OUTPUT_FORMAT)),
            Self::Instant(instant) => f.write_str(&instant.to_rfc3339()),
        }
    }
}

impl From<TransactionDate> for String {
    #[inline]
    fn from(date: TransactionDate) -> Self {
        date.to_string()
    }
}

/// Wire representation of a transaction date.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTransactionDate {
    /// Textual timestamp in one of the accepted layouts.
    Text(String),
    /// Milliseconds since the Unix epoch.
    EpochMillis(i64),
}

impl RawTransactionDate {
    /// Parses the wire value into a [`TransactionDate`].
    fn into_date(self) -> Result<TransactionDate, BankViewError> {
        match self {
            Self::Text(text) => text.parse(),
            Self::EpochMillis(millis) => DateTime::from_timestamp_millis(millis)
                .map(|utc| TransactionDate::Instant(utc.fixed_offset()))
                .ok_or_else(|| BankViewError::InvalidDate(format!("{millis} ms is out of range"))),
        }
    }
}

impl<'de> Deserialize<'de> for TransactionDate {
    #[inline]
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        RawTransactionDate::deserialize(deserializer)?
            .into_date()
            .map_err(serde::de::Error::custom)
    }
}
