//! Account details model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::AccountNumber;

/// Summary of the authenticated viewer's account.
///
/// Returned by the account-details endpoint; the crate only needs
/// `account_number` to decide which transfers are incoming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDetails {
    /// The viewer's account number.
    pub account_number: AccountNumber,
    /// Account type label (e.g. "Savings").
    #[serde(default)]
    pub account_type: Option<String>,
    /// Current balance in USD.
    #[serde(default)]
    pub balance: Option<Decimal>,
    /// Branch the account belongs to.
    #[serde(default)]
    pub branch: Option<String>,
}
