//! Presentation formatting for amounts and dates.
//!
//! Aggregation never goes through these: totals stay exact [`Decimal`]
//! sums and are only turned into strings when rendered.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive as _;
use rust_decimal::{Decimal, RoundingStrategy};

/// Formats an amount as US dollars with two decimals and thousands
/// separators, e.g. `$1,234.56` or `-$12.30`.
///
/// The amount is rounded to whole cents first (half away from zero), so
/// `-0.001` renders as `$0.00` rather than `-$0.00`.
#[inline]
#[must_use]
pub fn format_usd(amount: Decimal) -> String {
    let rounded = amount
        .abs()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let dollars = rounded.trunc();
    let cents = ((rounded - dollars) * Decimal::ONE_HUNDRED)
        .to_u32()
        .unwrap_or_default();
    let sign = if amount.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    format!("{sign}${}.{cents:02}", group_thousands(&dollars.to_string()))
}

/// Inserts a comma between every group of three digits.
fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len().saturating_mul(2));
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

/// Long-form date for display, e.g. `March 1, 2025`.
#[inline]
#[must_use]
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Short date for chart axes, e.g. `Mar 1`.
#[inline]
#[must_use]
pub fn format_short_date(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

/// Sortable date for tables and exports, e.g. `2025-03-01`.
#[inline]
#[must_use]
pub fn format_table_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
