//! Summary card components for the monthly dashboard.

use maud::{Markup, html};
use rust_decimal::Decimal;

use crate::html::format_currency;

use super::aggregation::MonthlySummary;

const CARD_STYLE: &str = "bg-white dark:bg-gray-800 border border-gray-200 \
    dark:border-gray-700 rounded-lg p-4 shadow-md flex flex-col gap-2";

const CARD_TITLE_STYLE: &str = "text-sm font-medium text-gray-500 dark:text-gray-400";

/// The CSS class for coloring the balance by its sign.
///
/// Positive, negative and zero balances are visually distinguishable; the
/// value itself is the plain subtraction with no clamping.
fn balance_color_class(balance: Decimal) -> &'static str {
    if balance > Decimal::ZERO {
        "text-green-600 dark:text-green-400"
    } else if balance < Decimal::ZERO {
        "text-red-600 dark:text-red-400"
    } else {
        "text-gray-900 dark:text-white"
    }
}

fn summary_card(title: &str, value: Decimal, value_class: &str) -> Markup {
    html!(
        div class=(CARD_STYLE)
        {
            h3 class=(CARD_TITLE_STYLE) { (title) }

            p class={"text-2xl font-bold " (value_class)}
            {
                (format_currency(value))
            }
        }
    )
}

/// Renders the three month-to-date summary cards: revenue, expenses and balance.
pub(super) fn summary_cards(summary: &MonthlySummary) -> Markup {
    html!(
        section id="summary-cards" class="w-full grid gap-4 md:grid-cols-2 lg:grid-cols-3 mb-6"
        {
            (summary_card(
                "Revenue",
                summary.total_revenue,
                "text-green-600 dark:text-green-400",
            ))
            (summary_card(
                "Expenses",
                summary.total_expenses,
                "text-red-600 dark:text-red-400",
            ))
            (summary_card(
                "Balance",
                summary.balance,
                balance_color_class(summary.balance),
            ))
        }
    )
}
