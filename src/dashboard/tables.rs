//! Table views for dashboard data display.

use maud::{Markup, html};
use rust_decimal::Decimal;

use crate::html::{TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency};

/// Renders the expenses-by-category breakdown as a table.
///
/// The rows keep the order of `breakdown` (first occurrence order); each
/// category shows its summed amount and its share of the expense total.
pub(super) fn category_breakdown_table(breakdown: &[(String, Decimal)]) -> Markup {
    if breakdown.is_empty() {
        return html! {};
    }

    let total: Decimal = breakdown.iter().map(|(_, amount)| *amount).sum();

    html! {
        div class="w-full"
        {
            h3 class="text-xl font-semibold mb-4" { "Expenses by Category" }

            div class="overflow-x-auto rounded-lg shadow"
            {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Share" }
                        }
                    }

                    tbody
                    {
                        @for (category, amount) in breakdown {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                th
                                    scope="row"
                                    class={(TABLE_CELL_STYLE) " font-medium text-gray-900 dark:text-white"}
                                {
                                    (category)
                                }

                                td class={(TABLE_CELL_STYLE) " text-red-600 dark:text-red-400"}
                                {
                                    (format_currency(*amount))
                                }

                                td class=(TABLE_CELL_STYLE)
                                {
                                    (format_share(*amount, total))
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// The category's share of the expense total, e.g. "85.7%".
///
/// Rounding happens only here at presentation time.
fn format_share(amount: Decimal, total: Decimal) -> String {
    if total.is_zero() {
        return "0%".to_owned();
    }

    let percent = (amount * Decimal::ONE_HUNDRED / total).round_dp(1);
    format!("{percent}%")
}
