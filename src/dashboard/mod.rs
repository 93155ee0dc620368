//! Dashboard module
//!
//! Provides an overview page showing the current month's totals, the
//! expenses-by-category breakdown, and the daily revenue/expense chart.

mod aggregation;
mod cards;
mod charts;
mod handlers;
mod tables;

pub use handlers::get_dashboard_page;
