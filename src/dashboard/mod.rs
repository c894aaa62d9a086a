//! Dashboard module
//!
//! Provides an overview page showing summary cards and the most recent
//! transactions.

mod cards;
mod handlers;
mod summary;

pub use handlers::get_dashboard_page;
