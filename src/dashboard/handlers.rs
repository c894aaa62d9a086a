//! Dashboard HTTP handler and view rendering.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::{Connection, params};

use crate::{
    AppState, Error,
    endpoints,
    html::{
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        format_rupiah,
    },
    navigation::NavBar,
    outlet::OutletId,
    transaction::TransactionStatus,
    user::{CurrentUser, Role},
};

use super::{
    cards::summary_cards,
    summary::{Summary, SummaryTransaction, summarize},
};

/// How many of the latest transactions to show on the dashboard.
const RECENT_TRANSACTION_LIMIT: u32 = 5;

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A recent transaction to display on the dashboard.
struct RecentTransaction {
    invoice_number: String,
    customer_name: String,
    grand_total: i64,
    status: TransactionStatus,
}

fn recent_transactions_table(transactions: &[RecentTransaction]) -> Markup {
    html!(
        section class="w-full overflow-x-auto lg:overflow-visible dark:bg-gray-800"
        {
            table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Invoice" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Customer" }
                        th scope="col" class="px-6 py-3 text-right" { "Grand Total" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                    }
                }

                tbody
                {
                    @for transaction in transactions {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            th
                                scope="row"
                                class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                            {
                                (transaction.invoice_number)
                            }

                            td class=(TABLE_CELL_STYLE) { (transaction.customer_name) }

                            td class="px-6 py-4 text-right"
                            {
                                (format_rupiah(transaction.grand_total))
                            }

                            td class=(TABLE_CELL_STYLE) { (transaction.status.label()) }
                        }
                    }

                    @if transactions.is_empty() {
                        tr
                        {
                            td
                                colspan="4"
                                class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                            {
                                "No transactions recorded yet."
                            }
                        }
                    }
                }
            }
        }
    )
}

fn dashboard_view(
    summary: &Summary,
    recent_transactions: &[RecentTransaction],
    current_user: &CurrentUser,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW, current_user.role).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full lg:max-w-5xl space-y-6"
            {
                header
                {
                    h1 class="text-xl font-bold" { "Dashboard" }

                    p class="text-sm text-gray-500 dark:text-gray-400"
                    {
                        "Welcome back, " (current_user.full_name) "."
                    }
                }

                (summary_cards(summary))

                section class="space-y-2"
                {
                    h2 class="text-lg font-bold" { "Recent Transactions" }

                    (recent_transactions_table(recent_transactions))
                }
            }
        }
    );

    base("Dashboard", &[], &content)
}

/// Display a page with an overview of the business.
///
/// A kasir only sees the numbers for their own outlet.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let outlet_filter = match current_user.role {
        Role::Kasir => current_user.outlet_id,
        _ => None,
    };

    let summary_transactions = get_summary_transactions(outlet_filter, &connection)
        .inspect_err(|error| tracing::error!("could not get summary transactions: {error}"))?;
    let summary = summarize(&summary_transactions);

    let recent_transactions = get_recent_transactions(outlet_filter, &connection)
        .inspect_err(|error| tracing::error!("could not get recent transactions: {error}"))?;

    Ok(dashboard_view(&summary, &recent_transactions, &current_user).into_response())
}

fn get_summary_transactions(
    outlet_filter: Option<OutletId>,
    connection: &Connection,
) -> Result<Vec<SummaryTransaction>, Error> {
    let base_query = "SELECT grand_total, status FROM \"transaction\"";

    let map_row = |row: &rusqlite::Row| {
        Ok(SummaryTransaction {
            grand_total: row.get(0)?,
            status: row.get(1)?,
        })
    };

    let rows = match outlet_filter {
        Some(outlet_id) => connection
            .prepare(&format!("{base_query} WHERE outlet_id = ?1"))?
            .query_map(params![outlet_id], map_row)?
            .collect::<Result<Vec<_>, rusqlite::Error>>(),
        None => connection
            .prepare(base_query)?
            .query_map([], map_row)?
            .collect::<Result<Vec<_>, rusqlite::Error>>(),
    };

    rows.map_err(|error| error.into())
}

fn get_recent_transactions(
    outlet_filter: Option<OutletId>,
    connection: &Connection,
) -> Result<Vec<RecentTransaction>, Error> {
    let base_query = "SELECT t.invoice_number, customer.name, t.grand_total, t.status
        FROM \"transaction\" t
        JOIN customer ON customer.id = t.customer_id";

    let map_row = |row: &rusqlite::Row| {
        Ok(RecentTransaction {
            invoice_number: row.get(0)?,
            customer_name: row.get(1)?,
            grand_total: row.get(2)?,
            status: row.get(3)?,
        })
    };

    let rows = match outlet_filter {
        Some(outlet_id) => connection
            .prepare(&format!(
                "{base_query} WHERE t.outlet_id = ?1
                ORDER BY t.transaction_date DESC LIMIT ?2"
            ))?
            .query_map(params![outlet_id, RECENT_TRANSACTION_LIMIT], map_row)?
            .collect::<Result<Vec<_>, rusqlite::Error>>(),
        None => connection
            .prepare(&format!(
                "{base_query} ORDER BY t.transaction_date DESC LIMIT ?1"
            ))?
            .query_map(params![RECENT_TRANSACTION_LIMIT], map_row)?
            .collect::<Result<Vec<_>, rusqlite::Error>>(),
    };

    rows.map_err(|error| error.into())
}
