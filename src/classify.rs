//! Viewer-relative classification of transaction records.
//!
//! A record's [`Category`] depends on who is looking at it: the same
//! `CASH_TRANSFER` is a [`Category::Transfer`] for the sender and a
//! [`Category::Credit`] for the recipient. [`classify`] is the single place
//! that decides this; every view consumes its output through
//! [`classify_all`].

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::calendar::ViewerZone;
use crate::models::{AccountNumber, Category, TransactionId, TransactionRecord, TransactionType};

/// Who is looking at the history, and in which time zone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Perspective {
    /// The viewer's own account number, if known.
    pub account: Option<AccountNumber>,
    /// Zone used to map timestamps to calendar days.
    pub zone: ViewerZone,
}

impl Perspective {
    /// Creates a perspective for the given account and zone.
    #[inline]
    #[must_use]
    pub const fn new(account: Option<AccountNumber>, zone: ViewerZone) -> Self {
        Self { account, zone }
    }

    /// Creates a perspective for `account` in the host's local zone.
    #[inline]
    #[must_use]
    pub const fn for_account(account: AccountNumber) -> Self {
        Self {
            account: Some(account),
            zone: ViewerZone::System,
        }
    }

    /// Returns a copy of this perspective using `zone`.
    #[inline]
    #[must_use]
    pub fn with_zone(mut self, zone: ViewerZone) -> Self {
        self.zone = zone;
        self
    }
}

/// Why a record could not be classified.
///
/// Never fatal: the record is logged and left out of every aggregate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedRecord {
    /// The API sent no transaction type.
    #[error("transaction {id} has no transaction type")]
    MissingType {
        /// Offending record.
        id: TransactionId,
    },

    /// The API sent a type token outside the documented set.
    #[error("transaction {id} has unrecognized transaction type {token:?}")]
    UnrecognizedType {
        /// Offending record.
        id: TransactionId,
        /// Token as received.
        token: String,
    },

    /// The amount is negative.
    #[error("transaction {id} has invalid amount {amount}")]
    InvalidAmount {
        /// Offending record.
        id: TransactionId,
        /// Amount as received.
        amount: Decimal,
    },
}

/// Classifies one record from the point of view of `viewer`.
///
/// A transfer whose target is the viewer's account is a
/// [`Category::Credit`]; every other transfer is a [`Category::Transfer`].
/// With no known viewer, no transfer is treated as incoming.
///
/// # Errors
///
/// Returns [`MalformedRecord`] if the record has no type, an unknown type,
/// or a negative amount.
#[inline]
pub fn classify(
    record: &TransactionRecord,
    viewer: Option<&AccountNumber>,
) -> Result<Category, MalformedRecord> {
    if record.amount < Decimal::ZERO {
        return Err(MalformedRecord::InvalidAmount {
            id: record.id.clone(),
            amount: record.amount,
        });
    }

    let kind = record
        .transaction_type
        .as_ref()
        .ok_or_else(|| MalformedRecord::MissingType {
            id: record.id.clone(),
        })?;

    match *kind {
        TransactionType::CashDeposit => Ok(Category::Deposit),
        TransactionType::CashWithdrawal => Ok(Category::Withdrawal),
        TransactionType::CashTransfer => {
            let incoming = viewer
                .is_some_and(|account| record.target_account_number.as_ref() == Some(account));
            Ok(if incoming {
                Category::Credit
            } else {
                Category::Transfer
            })
        }
        TransactionType::Unrecognized(_) => Err(MalformedRecord::UnrecognizedType {
            id: record.id.clone(),
            token: kind.as_str().to_owned(),
        }),
    }
}

/// A record reduced to what the aggregators and the table need.
///
/// The category and calendar day are computed once, at ingestion, so every
/// view agrees on both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedTransaction {
    /// Index of the source record in the ingested list.
    pub position: usize,
    /// Source record identifier.
    pub id: TransactionId,
    /// Amount in USD.
    pub amount: Decimal,
    /// Viewer-relative category.
    pub category: Category,
    /// Calendar day in the viewer's zone.
    pub day: NaiveDate,
}

/// Classifies every record, skipping (and logging) malformed ones.
///
/// Output order follows input order.
#[inline]
#[must_use]
pub fn classify_all(
    records: &[TransactionRecord],
    perspective: &Perspective,
) -> Vec<ClassifiedTransaction> {
    let viewer = perspective.account.as_ref();
    records
        .iter()
        .enumerate()
        .filter_map(|(position, record)| match classify(record, viewer) {
            Ok(category) => Some(ClassifiedTransaction {
                position,
                id: record.id.clone(),
                amount: record.amount,
                category,
                day: record.transaction_date.local_day(&perspective.zone),
            }),
            Err(err) => {
                tracing::warn!(error = %err, "skipping malformed transaction");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionDate;

    const VIEWER: &str = "100001";
    const OTHER: &str = "200002";

    fn record(id: &str, kind: Option<TransactionType>, source: &str, target: &str) -> TransactionRecord {
        TransactionRecord {
            id: TransactionId::from(id),
            amount: Decimal::new(50, 0),
            transaction_date: "2025-03-01T10:00:00".parse::<TransactionDate>().unwrap(),
            transaction_type: kind,
            source_account_number: AccountNumber::from(source),
            target_account_number: Some(AccountNumber::from(target)),
        }
    }

    fn viewer() -> AccountNumber {
        AccountNumber::from(VIEWER)
    }

    #[test]
    fn incoming_transfer_is_credit() {
        let tx = record("t1", Some(TransactionType::CashTransfer), OTHER, VIEWER);
        assert_eq!(classify(&tx, Some(&viewer())), Ok(Category::Credit));
    }

    #[test]
    fn outgoing_transfer_is_transfer() {
        let tx = record("t2", Some(TransactionType::CashTransfer), VIEWER, OTHER);
        assert_eq!(classify(&tx, Some(&viewer())), Ok(Category::Transfer));
    }

    #[test]
    fn transfer_to_self_is_credit() {
        // Only the target decides; the viewer also being the source does not matter.
        let tx = record("t3", Some(TransactionType::CashTransfer), VIEWER, VIEWER);
        assert_eq!(classify(&tx, Some(&viewer())), Ok(Category::Credit));
    }

    #[test]
    fn unknown_viewer_never_credits() {
        let tx = record("t4", Some(TransactionType::CashTransfer), OTHER, VIEWER);
        assert_eq!(classify(&tx, None), Ok(Category::Transfer));
    }

    #[test]
    fn deposits_and_withdrawals_ignore_viewer() {
        let deposit = record("d", Some(TransactionType::CashDeposit), VIEWER, VIEWER);
        let withdrawal = record("w", Some(TransactionType::CashWithdrawal), VIEWER, VIEWER);
        assert_eq!(classify(&deposit, Some(&viewer())), Ok(Category::Deposit));
        assert_eq!(
            classify(&withdrawal, Some(&viewer())),
            Ok(Category::Withdrawal)
        );
    }

    #[test]
    fn missing_type_is_malformed() {
        let tx = record("m", None, VIEWER, VIEWER);
        assert!(matches!(
            classify(&tx, Some(&viewer())),
            Err(MalformedRecord::MissingType { .. })
        ));
    }

    #[test]
    fn unrecognized_type_is_malformed() {
        let tx = record(
            "u",
            Some(TransactionType::Unrecognized("CASH_REFUND".to_owned())),
            VIEWER,
            VIEWER,
        );
        let err = classify(&tx, Some(&viewer())).unwrap_err();
        assert!(err.to_string().contains("CASH_REFUND"));
    }

    #[test]
    fn invalid_amount_is_malformed() {
        let mut tx = record("n", Some(TransactionType::CashDeposit), VIEWER, VIEWER);
        tx.amount = Decimal::new(-5, 0);
        assert!(matches!(
            classify(&tx, None),
            Err(MalformedRecord::InvalidAmount { .. })
        ));
        tx.amount = Decimal::ZERO;
        assert_eq!(classify(&tx, None), Ok(Category::Deposit));
    }

    #[test]
    fn classify_all_skips_malformed_and_keeps_order() {
        let records = vec![
            record("a", Some(TransactionType::CashDeposit), VIEWER, VIEWER),
            record("b", None, VIEWER, VIEWER),
            record("c", Some(TransactionType::CashTransfer), OTHER, VIEWER),
        ];
        let perspective = Perspective::for_account(viewer());
        let classified = classify_all(&records, &perspective);
        let ids: Vec<&str> = classified.iter().map(|c| c.id.as_inner()).collect();
        assert_eq!(ids, ["a", "c"]);
        let positions: Vec<usize> = classified.iter().map(|c| c.position).collect();
        assert_eq!(positions, [0, 2]);
        assert_eq!(classified.get(1).map(|c| c.category), Some(Category::Credit));
        assert_eq!(
            classified.first().map(|c| c.day),
            NaiveDate::from_ymd_opt(2025, 3, 1)
        );
    }
}
