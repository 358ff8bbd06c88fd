//! Enumeration types for constrained API and view values.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BankViewError;

/// Prefix shared by every transaction type token the API emits.
const CASH_PREFIX: &str = "CASH_";

/// Raw transaction type as sent by the banking API.
///
/// Tokens the crate does not know are kept verbatim in
/// [`TransactionType::Unrecognized`] so the record can still be listed and
/// exported; the classifier skips such records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionType {
    /// `CASH_DEPOSIT`.
    CashDeposit,
    /// `CASH_WITHDRAWAL`.
    CashWithdrawal,
    /// `CASH_TRANSFER`.
    CashTransfer,
    /// Any other token, preserved as received.
    Unrecognized(String),
}

impl TransactionType {
    /// Returns the wire token for this type.
    #[inline]
    #[must_use]
    #[allow(
        clippy::ref_patterns,
        reason = "the raw token is borrowed out of a dereferenced match"
    )]
    pub fn as_str(&self) -> &str {
        match *self {
            Self::CashDeposit => "CASH_DEPOSIT",
            Self::CashWithdrawal => "CASH_WITHDRAWAL",
            Self::CashTransfer => "CASH_TRANSFER",
            Self::Unrecognized(ref raw) => raw,
        }
    }

    /// Returns `true` for the three types the API documents.
    #[inline]
    #[must_use]
    pub const fn is_recognized(&self) -> bool {
        !matches!(*self, Self::Unrecognized(_))
    }
}

impl From<String> for TransactionType {
    #[inline]
    fn from(raw: String) -> Self {
        let upper = raw.trim().to_ascii_uppercase();
        match upper.strip_prefix(CASH_PREFIX) {
            Some("DEPOSIT") => Self::CashDeposit,
            Some("WITHDRAWAL") => Self::CashWithdrawal,
            Some("TRANSFER") => Self::CashTransfer,
            Some(_) | None => Self::Unrecognized(raw),
        }
    }
}

impl From<TransactionType> for String {
    #[inline]
    fn from(kind: TransactionType) -> Self {
        match kind {
            TransactionType::Unrecognized(raw) => raw,
            TransactionType::CashDeposit
            | TransactionType::CashWithdrawal
            | TransactionType::CashTransfer => kind.as_str().to_owned(),
        }
    }
}

impl fmt::Display for TransactionType {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Viewer-relative category of a transaction.
///
/// Unlike [`TransactionType`], this depends on who is looking: a transfer
/// into the viewer's account is a [`Category::Credit`], a transfer out of it
/// is a [`Category::Transfer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Cash deposited into the account.
    Deposit,
    /// Cash withdrawn from the account.
    Withdrawal,
    /// Funds the viewer sent to another account.
    Transfer,
    /// Funds another account sent to the viewer.
    Credit,
}

impl Category {
    /// Every category, in the order charts and totals list them.
    pub const ALL: [Self; 4] = [Self::Deposit, Self::Withdrawal, Self::Transfer, Self::Credit];

    /// Returns the display label.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Deposit => "Deposit",
            Self::Withdrawal => "Withdrawal",
            Self::Transfer => "Transfer",
            Self::Credit => "Credit",
        }
    }

    /// Returns the chart colour used for this category (CSS hex).
    #[inline]
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Deposit => "#4CAF50",
            Self::Withdrawal => "#F44336",
            Self::Transfer => "#2196F3",
            Self::Credit => "#FFC107",
        }
    }
}

impl fmt::Display for Category {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Transaction type filter for the history table.
///
/// Matches the raw [`TransactionType`], so [`TypeFilter::Transfer`] keeps
/// both outgoing transfers and incoming credits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TypeFilter {
    /// No filtering.
    #[default]
    All,
    /// Only `CASH_DEPOSIT` records.
    Deposit,
    /// Only `CASH_WITHDRAWAL` records.
    Withdrawal,
    /// Only `CASH_TRANSFER` records.
    Transfer,
}

impl TypeFilter {
    /// Returns `true` if a record of the given type passes the filter.
    #[inline]
    #[must_use]
    pub fn matches(self, kind: Option<&TransactionType>) -> bool {
        match self {
            Self::All => true,
            Self::Deposit => kind == Some(&TransactionType::CashDeposit),
            Self::Withdrawal => kind == Some(&TransactionType::CashWithdrawal),
            Self::Transfer => kind == Some(&TransactionType::CashTransfer),
        }
    }

    /// Returns the filter's selector value (`""` for [`TypeFilter::All`]).
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "",
            Self::Deposit => "Deposit",
            Self::Withdrawal => "Withdrawal",
            Self::Transfer => "Transfer",
        }
    }
}

impl FromStr for TypeFilter {
    type Err = BankViewError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Ok(Self::All),
            value if value.eq_ignore_ascii_case("all") => Ok(Self::All),
            value if value.eq_ignore_ascii_case("deposit") => Ok(Self::Deposit),
            value if value.eq_ignore_ascii_case("withdrawal") => Ok(Self::Withdrawal),
            value if value.eq_ignore_ascii_case("transfer") => Ok(Self::Transfer),
            other => Err(BankViewError::InvalidFilter(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_type_parses_known_tokens() {
        let variants = [
            (r#""CASH_DEPOSIT""#, TransactionType::CashDeposit),
            (r#""CASH_WITHDRAWAL""#, TransactionType::CashWithdrawal),
            (r#""CASH_TRANSFER""#, TransactionType::CashTransfer),
        ];
        for (json, expected) in variants {
            let parsed: TransactionType = serde_json::from_str(json).unwrap();
            assert_eq!(parsed, expected);
            assert_eq!(serde_json::to_string(&parsed).unwrap(), json);
        }
    }

    #[test]
    fn transaction_type_is_case_insensitive() {
        let parsed: TransactionType = serde_json::from_str(r#""cash_transfer""#).unwrap();
        assert_eq!(parsed, TransactionType::CashTransfer);
    }

    #[test]
    fn unknown_transaction_type_is_preserved() {
        let parsed: TransactionType = serde_json::from_str(r#""LOAN_PAYMENT""#).unwrap();
        assert_eq!(
            parsed,
            TransactionType::Unrecognized("LOAN_PAYMENT".to_owned())
        );
        assert!(!parsed.is_recognized());
        assert_eq!(serde_json::to_string(&parsed).unwrap(), r#""LOAN_PAYMENT""#);
    }

    #[test]
    fn bare_cash_prefix_is_unrecognized() {
        let parsed = TransactionType::from("CASH_".to_owned());
        assert!(!parsed.is_recognized());
    }

    #[test]
    fn category_labels_and_order() {
        let labels: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();
        assert_eq!(labels, ["Deposit", "Withdrawal", "Transfer", "Credit"]);
        assert_eq!(Category::Credit.to_string(), "Credit");
    }

    #[test]
    fn type_filter_from_selector_values() {
        assert_eq!("".parse::<TypeFilter>().unwrap(), TypeFilter::All);
        assert_eq!("Deposit".parse::<TypeFilter>().unwrap(), TypeFilter::Deposit);
        assert_eq!(
            "withdrawal".parse::<TypeFilter>().unwrap(),
            TypeFilter::Withdrawal
        );
        assert_eq!("Transfer".parse::<TypeFilter>().unwrap(), TypeFilter::Transfer);
        assert!("Credit".parse::<TypeFilter>().is_err());
    }

    #[test]
    fn type_filter_matches_raw_type() {
        assert!(TypeFilter::Transfer.matches(Some(&TransactionType::CashTransfer)));
        assert!(!TypeFilter::Transfer.matches(Some(&TransactionType::CashDeposit)));
        assert!(!TypeFilter::Deposit.matches(None));
        assert!(TypeFilter::All.matches(None));
    }
}
