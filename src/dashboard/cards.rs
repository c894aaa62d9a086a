//! Maud templates for the dashboard summary cards.

use maud::{Markup, html};

use crate::html::format_rupiah;

use super::summary::Summary;

fn card(label: &str, value: &str) -> Markup {
    html!(
        div class="rounded border border-gray-200 bg-white px-6 py-4 shadow-sm dark:border-gray-700 dark:bg-gray-800"
        {
            p class="text-xs font-semibold uppercase text-gray-500 dark:text-gray-400" { (label) }
            p class="text-2xl font-bold text-gray-900 dark:text-white" { (value) }
        }
    )
}

pub(super) fn summary_cards(summary: &Summary) -> Markup {
    html!(
        div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-4"
        {
            (card("Total Revenue", &format_rupiah(summary.total_revenue)))
            (card("Total Transactions", &summary.transaction_count.to_string()))
            (card("Pending", &summary.pending_count.to_string()))
            (card("Completed", &summary.completed_count.to_string()))
        }
    )
}
