//! Displays transactions with status controls and pagination.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::{Connection, params, params_from_iter};
use serde::Deserialize;
use time::{OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_rupiah,
    },
    navigation::NavBar,
    outlet::OutletId,
    pagination::{PaginationConfig, PaginationIndicator, create_pagination_indicators},
    transaction::{PaymentStatus, TransactionId, TransactionStatus},
    user::{CurrentUser, Role},
};

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for TransactionsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The query parameters for the transactions page.
#[derive(Debug, Deserialize)]
pub struct TransactionsQuery {
    /// The page number to display.
    pub page: Option<u64>,
}

/// The transaction data to display in the view
#[derive(Debug)]
struct TransactionTableRow {
    invoice_number: String,
    customer_name: String,
    outlet_name: Option<String>,
    transaction_date: Option<OffsetDateTime>,
    status: TransactionStatus,
    payment_status: PaymentStatus,
    grand_total: i64,
    status_url: String,
    payment_url: String,
    delete_url: String,
}

const DISPLAY_DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");

fn format_transaction_date(date: Option<OffsetDateTime>) -> String {
    date.and_then(|date| date.format(DISPLAY_DATE_FORMAT).ok())
        .unwrap_or_else(|| "-".to_owned())
}

fn status_select(row: &TransactionTableRow) -> Markup {
    html!(
        select
            name="status"
            hx-put=(row.status_url)
            hx-trigger="change"
            hx-target="#alert-container"
            hx-target-error="#alert-container"
            class="block p-1.5 rounded text-xs text-gray-900 dark:text-white bg-gray-50
                dark:bg-gray-700 border border-gray-300 dark:border-gray-600"
        {
            @for status in TransactionStatus::ALL {
                option
                    value=(status.as_str())
                    selected[row.status == status]
                {
                    (status.label())
                }
            }
        }
    )
}

fn payment_select(row: &TransactionTableRow) -> Markup {
    html!(
        select
            name="payment_status"
            hx-put=(row.payment_url)
            hx-trigger="change"
            hx-target="#alert-container"
            hx-target-error="#alert-container"
            class="block p-1.5 rounded text-xs text-gray-900 dark:text-white bg-gray-50
                dark:bg-gray-700 border border-gray-300 dark:border-gray-600"
        {
            @for payment_status in PaymentStatus::ALL {
                option
                    value=(payment_status.as_str())
                    selected[row.payment_status == payment_status]
                {
                    (payment_status.label())
                }
            }
        }
    )
}

fn pagination_nav(indicators: &[PaginationIndicator]) -> Markup {
    let page_url = |page: u64| format!("{}?page={}", endpoints::TRANSACTIONS_VIEW, page);

    html!(
        nav aria-label="Transaction list pages"
        {
            ul class="flex items-center gap-2 text-sm"
            {
                @for indicator in indicators {
                    li
                    {
                        @match indicator {
                            PaginationIndicator::BackButton(page) => {
                                a href=(page_url(*page)) class=(LINK_STYLE) { "Back" }
                            }
                            PaginationIndicator::Page(page) => {
                                a href=(page_url(*page)) class=(LINK_STYLE) { (page) }
                            }
                            PaginationIndicator::CurrPage(page) => {
                                span class="font-bold" aria-current="page" { (page) }
                            }
                            PaginationIndicator::Ellipsis => {
                                span { "..." }
                            }
                            PaginationIndicator::NextButton(page) => {
                                a href=(page_url(*page)) class=(LINK_STYLE) { "Next" }
                            }
                        }
                    }
                }
            }
        }
    )
}

fn transactions_view(
    transactions: &[TransactionTableRow],
    indicators: &[PaginationIndicator],
    current_user: &CurrentUser,
) -> Markup {
    let create_transaction_page_url = endpoints::NEW_TRANSACTION_VIEW;
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW, current_user.role).into_html();

    let table_row = |transaction: &TransactionTableRow| {
        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                th
                    scope="row"
                    class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                {
                    (transaction.invoice_number)
                }

                td class=(TABLE_CELL_STYLE) { (transaction.customer_name) }

                td class=(TABLE_CELL_STYLE)
                {
                    (transaction.outlet_name.as_deref().unwrap_or("-"))
                }

                td class=(TABLE_CELL_STYLE)
                {
                    (format_transaction_date(transaction.transaction_date))
                }

                td class="px-6 py-4 text-right"
                {
                    (format_rupiah(transaction.grand_total))
                }

                td class=(TABLE_CELL_STYLE) { (status_select(transaction)) }

                td class=(TABLE_CELL_STYLE) { (payment_select(transaction)) }

                td class=(TABLE_CELL_STYLE)
                {
                    button
                        type="button"
                        hx-delete=(transaction.delete_url)
                        hx-confirm=(format!(
                            "Are you sure you want to delete invoice {}? This cannot be undone.",
                            transaction.invoice_number
                        ))
                        hx-target="closest tr"
                        hx-swap="delete"
                        hx-target-error="#alert-container"
                        class=(BUTTON_DELETE_STYLE)
                    {
                        "Delete"
                    }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Transactions" }

                    a href=(create_transaction_page_url) class=(LINK_STYLE)
                    {
                        "Record Transaction"
                    }
                }

                section class="w-full overflow-x-auto lg:overflow-visible dark:bg-gray-800 lg:max-w-6xl lg:w-full lg:mx-auto"
                {
                    table class="w-full text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Invoice" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Customer" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Outlet" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class="px-6 py-3 text-right" { "Grand Total" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Payment" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for transaction in transactions {
                                (table_row(transaction))
                            }

                            @if transactions.is_empty() {
                                tr
                                {
                                    td
                                        colspan="8"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No transactions found. Record a transaction "
                                        a href=(create_transaction_page_url) class=(LINK_STYLE)
                                        {
                                            "here"
                                        }
                                        "."
                                    }
                                }
                            }
                        }
                    }
                }

                (pagination_nav(indicators))
            }
        }
    );

    base("Transactions", &[], &content)
}

/// Renders the transactions page.
///
/// A kasir only sees the transactions of their own outlet; admins see all
/// transactions.
pub async fn get_transactions_page(
    State(state): State<TransactionsPageState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<TransactionsQuery>,
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

    let page_size = state.pagination_config.default_page_size;
    let transaction_count = count_transactions(outlet_filter, &connection)
        .inspect_err(|error| tracing::error!("could not count transactions: {error}"))?;
    let page_count = transaction_count.div_ceil(page_size).max(1);
    let curr_page = query
        .page
        .unwrap_or(state.pagination_config.default_page)
        .clamp(1, page_count);

    let transactions = get_transaction_rows(
        outlet_filter,
        page_size as i64,
        ((curr_page - 1) * page_size) as i64,
        &connection,
    )
    .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;

    let indicators =
        create_pagination_indicators(curr_page, page_count, state.pagination_config.max_pages);

    Ok(transactions_view(&transactions, &indicators, &current_user).into_response())
}

fn count_transactions(
    outlet_filter: Option<OutletId>,
    connection: &Connection,
) -> Result<u64, Error> {
    let count: i64 = match outlet_filter {
        Some(outlet_id) => connection.query_one(
            "SELECT COUNT(id) FROM \"transaction\" WHERE outlet_id = ?1",
            params![outlet_id],
            |row| row.get(0),
        )?,
        None => connection.query_one("SELECT COUNT(id) FROM \"transaction\"", [], |row| {
            row.get(0)
        })?,
    };

    Ok(count as u64)
}

fn get_transaction_rows(
    outlet_filter: Option<OutletId>,
    limit: i64,
    offset: i64,
    connection: &Connection,
) -> Result<Vec<TransactionTableRow>, Error> {
    let base_query = "SELECT t.id, t.invoice_number, customer.name, outlet.name, \
        t.transaction_date, t.status, t.payment_status, t.grand_total
        FROM \"transaction\" t
        JOIN customer ON customer.id = t.customer_id
        LEFT JOIN outlet ON outlet.id = t.outlet_id";

    let (query, params) = match outlet_filter {
        Some(outlet_id) => (
            format!(
                "{base_query} WHERE t.outlet_id = ?1
                ORDER BY t.transaction_date DESC LIMIT ?2 OFFSET ?3"
            ),
            vec![outlet_id, limit, offset],
        ),
        None => (
            format!("{base_query} ORDER BY t.transaction_date DESC LIMIT ?1 OFFSET ?2"),
            vec![limit, offset],
        ),
    };

    connection
        .prepare(&query)?
        .query_map(params_from_iter(params), |row| {
            let id: TransactionId = row.get(0)?;

            Ok(TransactionTableRow {
                invoice_number: row.get(1)?,
                customer_name: row.get(2)?,
                outlet_name: row.get(3)?,
                transaction_date: row.get(4)?,
                status: row.get(5)?,
                payment_status: row.get(6)?,
                grand_total: row.get(7)?,
                status_url: format_endpoint(endpoints::TRANSACTION_STATUS, id),
                payment_url: format_endpoint(endpoints::TRANSACTION_PAYMENT, id),
                delete_url: format_endpoint(endpoints::DELETE_TRANSACTION, id),
            })
        })?
        .map(|transaction_result| transaction_result.map_err(Error::from))
        .collect()
}
