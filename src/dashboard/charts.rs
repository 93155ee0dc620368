//! Chart generation and rendering for the dashboard.
//!
//! Builds the daily revenue/expense bar chart as JSON configuration for the
//! ECharts library, plus the JavaScript that initializes it with dark mode
//! support and responsive resizing.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, ItemStyle, JsFunction, Tooltip, Trigger,
    },
    series::Bar,
};
use maud::PreEscaped;
use rust_decimal::prelude::ToPrimitive;

use crate::html::HeadElement;

use super::aggregation::DailyTotal;

/// The bar color for revenue sums.
const REVENUE_COLOR: &str = "#22c55e";
/// The bar color for expense sums.
const EXPENSE_COLOR: &str = "#ef4444";

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// Builds the bar chart with one revenue/expense bar pair per day of the month.
///
/// The series length always matches the number of days in the month, so the
/// x-axis shows every day even when nothing happened on it. Amounts are
/// converted to floats here purely for display.
pub(super) fn daily_summary_chart(series: &[DailyTotal]) -> Chart {
    let labels: Vec<String> = series.iter().map(|day| day.date.day().to_string()).collect();
    let revenue_values: Vec<f64> = series
        .iter()
        .map(|day| day.revenue.to_f64().unwrap_or_default())
        .collect();
    let expense_values: Vec<f64> = series
        .iter()
        .map(|day| day.expenses.to_f64().unwrap_or_default())
        .collect();

    Chart::new()
        .title(
            Title::new()
                .text("Daily Summary")
                .subtext("Current month, day by day"),
        )
        .tooltip(currency_tooltip())
        .legend(Legend::new().top("6%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(
            Bar::new()
                .name("Revenue")
                .item_style(ItemStyle::new().color(REVENUE_COLOR))
                .data(revenue_values),
        )
        .series(
            Bar::new()
                .name("Expenses")
                .item_style(ItemStyle::new().color(EXPENSE_COLOR))
                .data(expense_values),
        )
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}
