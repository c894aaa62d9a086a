//! Revenue reports: daily, monthly and per-outlet rollups over the recorded
//! transactions.

mod aggregation;
mod handlers;
mod tables;
mod transaction;

pub use handlers::get_reports_page;
