//! Transaction data aggregation for the monthly dashboard.
//!
//! Pure functions that reduce a month's transactions into the summary
//! totals, the per-category expense breakdown, and the dense per-day
//! revenue/expense series the charts are drawn from. All arithmetic uses
//! exact decimals; rounding only happens when amounts are formatted for
//! display.

use rust_decimal::Decimal;
use time::{Date, util::days_in_year_month};

use crate::transaction::Transaction;

/// The label used to group expenses that have no category.
pub(super) const OTHER_CATEGORY_LABEL: &str = "Other";

/// The scalar aggregates for a month of transactions.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct MonthlySummary {
    /// The sum of all revenue amounts.
    pub(super) total_revenue: Decimal,
    /// The sum of all expense-family amounts.
    pub(super) total_expenses: Decimal,
    /// `total_revenue - total_expenses`. May be negative.
    pub(super) balance: Decimal,
}

/// The revenue and expense totals for a single calendar day.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct DailyTotal {
    /// The day the totals are for.
    pub(super) date: Date,
    /// The sum of revenue amounts dated exactly on this day.
    pub(super) revenue: Decimal,
    /// The sum of expense-family amounts dated exactly on this day.
    pub(super) expenses: Decimal,
}

/// The first and last day of the calendar month containing `anchor`.
pub(super) fn month_bounds(anchor: Date) -> (Date, Date) {
    let year = anchor.year();
    let month = anchor.month();
    let start = Date::from_calendar_date(year, month, 1).expect("invalid month start date");
    let end = Date::from_calendar_date(year, month, days_in_year_month(year, month))
        .expect("invalid month end date");

    (start, end)
}

/// Sum the transactions into revenue and expense totals and the balance.
///
/// Revenue counts transactions whose type is exactly `Revenue`; expenses
/// count exact membership in the expense family. The balance is the plain
/// subtraction with no clamping, so it may be negative.
pub(super) fn summarize(transactions: &[Transaction]) -> MonthlySummary {
    let mut total_revenue = Decimal::ZERO;
    let mut total_expenses = Decimal::ZERO;

    for transaction in transactions {
        if transaction.transaction_type.is_expense() {
            total_expenses += transaction.amount;
        } else {
            total_revenue += transaction.amount;
        }
    }

    MonthlySummary {
        total_revenue,
        total_expenses,
        balance: total_revenue - total_expenses,
    }
}

/// Group expense amounts by category.
///
/// Only expense-family transactions contribute; revenue never appears in the
/// breakdown regardless of its category. Transactions without a category are
/// grouped under [OTHER_CATEGORY_LABEL]. Categories are matched exactly and
/// case-sensitively, and the result preserves the order in which each
/// category first occurs in `transactions`.
pub(super) fn expenses_by_category(transactions: &[Transaction]) -> Vec<(String, Decimal)> {
    let mut breakdown: Vec<(String, Decimal)> = Vec::new();

    for transaction in transactions
        .iter()
        .filter(|transaction| transaction.transaction_type.is_expense())
    {
        let label = transaction
            .category
            .as_deref()
            .filter(|category| !category.is_empty())
            .unwrap_or(OTHER_CATEGORY_LABEL);

        match breakdown
            .iter_mut()
            .find(|(category, _)| category.as_str() == label)
        {
            Some((_, total)) => *total += transaction.amount,
            None => breakdown.push((label.to_owned(), transaction.amount)),
        }
    }

    breakdown
}

/// Bucket the transactions into one entry per calendar day from `start` to
/// `end`, inclusive of both endpoints.
///
/// The series is dense: days with no transactions get zero sums, so the
/// length always equals the number of days in the period. A transaction is
/// bucketed into a day by exact calendar-date equality, never by timestamp
/// proximity.
pub(super) fn daily_series(transactions: &[Transaction], start: Date, end: Date) -> Vec<DailyTotal> {
    let mut series = Vec::new();
    let mut day = start;

    loop {
        let mut revenue = Decimal::ZERO;
        let mut expenses = Decimal::ZERO;

        for transaction in transactions
            .iter()
            .filter(|transaction| transaction.date == day)
        {
            if transaction.transaction_type.is_expense() {
                expenses += transaction.amount;
            } else {
                revenue += transaction.amount;
            }
        }

        series.push(DailyTotal {
            date: day,
            revenue,
            expenses,
        });

        if day >= end {
            break;
        }
        day = match day.next_day() {
            Some(next_day) => next_day,
            None => break,
        };
    }

    series
}
