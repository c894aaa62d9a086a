//! The report page: daily, monthly and per-outlet revenue rollups with
//! role-scoped outlet filtering.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    endpoints,
    forms::empty_string_as_none,
    html::{
        FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, base, format_rupiah,
    },
    navigation::NavBar,
    outlet::{Outlet, OutletId, get_all_outlets},
    timezone::get_local_offset,
    user::{CurrentUser, Role},
};

use super::{
    aggregation::{aggregate_by_outlet, aggregate_daily, aggregate_monthly},
    tables::{daily_report_table, monthly_report_table, outlet_report_table},
    transaction::get_report_transactions,
};

/// The state needed for the report page.
#[derive(Debug, Clone)]
pub struct ReportState {
    /// The database connection the report transactions are read from.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Jakarta".
    pub local_timezone: String,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query parameters for the report page.
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    /// The calendar year for the monthly report. Defaults to the current year.
    pub year: Option<i32>,
    /// Only report on this outlet. Ignored for kasir users, who are always
    /// scoped to their own outlet.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub outlet: Option<OutletId>,
}

fn stat_card(label: &str, value: &str) -> Markup {
    html!(
        div class="rounded border border-gray-200 bg-white px-6 py-4 shadow-sm dark:border-gray-700 dark:bg-gray-800"
        {
            p class="text-xs font-semibold uppercase text-gray-500 dark:text-gray-400" { (label) }
            p class="text-2xl font-bold text-gray-900 dark:text-white" { (value) }
        }
    )
}

fn filter_form(
    outlets: &[Outlet],
    selected_outlet: Option<OutletId>,
    selected_year: i32,
    current_year: i32,
    show_outlet_select: bool,
) -> Markup {
    html!(
        form method="get" action=(endpoints::REPORTS_VIEW) class="flex flex-wrap items-end gap-4"
        {
            @if show_outlet_select {
                div
                {
                    label for="outlet" class=(FORM_LABEL_STYLE) { "Outlet" }

                    select name="outlet" id="outlet" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        option value="" { "All outlets" }

                        @for outlet in outlets {
                            option
                                value=(outlet.id)
                                selected[selected_outlet == Some(outlet.id)]
                            {
                                (outlet.name)
                            }
                        }
                    }
                }
            }

            div
            {
                label for="year" class=(FORM_LABEL_STYLE) { "Year" }

                select name="year" id="year" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for year in [current_year, current_year - 1] {
                        option value=(year) selected[selected_year == year] { (year) }
                    }
                }
            }

            button
                type="submit"
                class="px-4 py-2 bg-blue-500 dark:bg-blue-600 hover:bg-blue-600
                    hover:dark:bg-blue-700 text-white rounded text-sm"
            {
                "Apply"
            }
        }
    )
}

#[allow(clippy::too_many_arguments)]
fn reports_view(
    daily_table: Markup,
    monthly_table: Markup,
    outlet_table: Option<Markup>,
    filter: Markup,
    total_revenue: i64,
    transaction_count: u32,
    selected_year: i32,
    current_user: &CurrentUser,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::REPORTS_VIEW, current_user.role).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full lg:max-w-5xl space-y-6"
            {
                header class="flex justify-between flex-wrap items-end gap-4"
                {
                    h1 class="text-xl font-bold" { "Reports" }

                    (filter)
                }

                div class="grid grid-cols-1 sm:grid-cols-2 gap-4"
                {
                    (stat_card("Total Revenue", &format_rupiah(total_revenue)))
                    (stat_card("Total Transactions", &transaction_count.to_string()))
                }

                section class="space-y-2"
                {
                    h2 class="text-lg font-bold" { "Daily Report" }

                    (daily_table)
                }

                section class="space-y-2"
                {
                    h2 class="text-lg font-bold" { "Monthly Report " (selected_year) }

                    (monthly_table)
                }

                @if let Some(outlet_table) = outlet_table {
                    section class="space-y-2"
                    {
                        h2 class="text-lg font-bold" { "Per-Outlet Recap" }

                        (outlet_table)
                    }
                }
            }
        }
    );

    base("Reports", &[], &content)
}

/// Renders the report page.
///
/// A kasir is always scoped to their own outlet; admins and owners may
/// filter by outlet and additionally see the per-outlet recap with its
/// consolidated total.
pub async fn get_reports_page(
    State(state): State<ReportState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, Error> {
    let local_offset = get_local_offset(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;
    let current_year = OffsetDateTime::now_utc().to_offset(local_offset).year();
    let selected_year = query.year.unwrap_or(current_year);

    let is_kasir = current_user.role == Role::Kasir;
    let outlet_filter = if is_kasir {
        current_user.outlet_id
    } else {
        query.outlet
    };

    let (transactions, outlets) = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        let transactions = get_report_transactions(&connection)
            .inspect_err(|error| tracing::error!("could not get report transactions: {error}"))?;
        let outlets = get_all_outlets(&connection)
            .inspect_err(|error| tracing::error!("could not get all outlets: {error}"))?;

        (transactions, outlets)
    };

    let daily_rows = aggregate_daily(&transactions, outlet_filter);
    let monthly_rows = aggregate_monthly(&transactions, selected_year, outlet_filter);

    let total_revenue: i64 = daily_rows.iter().map(|row| row.total_revenue).sum();
    let transaction_count: u32 = daily_rows.iter().map(|row| row.transaction_count).sum();

    let outlet_table = (!is_kasir)
        .then(|| outlet_report_table(&aggregate_by_outlet(&transactions, &outlets)));

    let filter = filter_form(
        &outlets,
        outlet_filter,
        selected_year,
        current_year,
        !is_kasir,
    );

    Ok(reports_view(
        daily_report_table(&daily_rows),
        monthly_report_table(&monthly_rows),
        outlet_table,
        filter,
        total_revenue,
        transaction_count,
        selected_year,
        &current_user,
    )
    .into_response())
}

#[cfg(test)]
mod reports_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Query, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use scraper::{Html, Selector};

    use crate::{
        db::initialize,
        test_utils::{assert_valid_html, parse_html_document, test_current_user},
        user::Role,
    };

    use super::{ReportQuery, ReportState, get_reports_page};

    fn get_test_state() -> ReportState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        ReportState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    fn insert_transaction(
        state: &ReportState,
        invoice: &str,
        date: &str,
        outlet_id: Option<i64>,
        grand_total: i64,
        payment_status: &str,
    ) {
        let connection = state.db_connection.lock().unwrap();
        connection
            .execute(
                "INSERT INTO \"transaction\" (invoice_number, customer_id, outlet_id, \
                transaction_date, status, payment_status, total_amount, discount, tax, grand_total)
                VALUES (?1, 1, ?2, ?3, 'pending', ?4, ?5, 0, 0, ?5)",
                (invoice, outlet_id, date, payment_status, grand_total),
            )
            .unwrap();
    }

    fn seed_outlet(state: &ReportState, name: &str) -> i64 {
        let connection = state.db_connection.lock().unwrap();
        connection
            .execute(
                "INSERT INTO outlet (name, address) VALUES (?1, 'Jl. Test')",
                (name,),
            )
            .unwrap();
        connection.last_insert_rowid()
    }

    fn section_text(html: &Html, heading: &str) -> String {
        let section_selector = Selector::parse("main section section").unwrap();
        html.select(&section_selector)
            .map(|section| section.text().collect::<String>())
            .find(|text| text.contains(heading))
            .unwrap_or_else(|| panic!("Could not find section with heading {heading}"))
    }

    #[tokio::test]
    async fn admin_sees_all_three_reports() {
        let state = get_test_state();
        let outlet_id = seed_outlet(&state, "Outlet Pusat");
        insert_transaction(
            &state,
            "INV-1",
            "2026-03-15T09:00:00Z",
            Some(outlet_id),
            90000,
            "paid",
        );
        insert_transaction(&state, "INV-2", "2026-03-16T09:00:00Z", None, 50000, "unpaid");

        let response = get_reports_page(
            State(state),
            Extension(test_current_user(Role::Admin)),
            Query(ReportQuery {
                year: Some(2026),
                outlet: None,
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let daily = section_text(&html, "Daily Report");
        assert!(daily.contains("2026-03-15"));
        assert!(daily.contains("Rp 90.000"));

        let monthly = section_text(&html, "Monthly Report");
        assert!(monthly.contains("Maret"));
        assert!(monthly.contains("Rp 140.000"));

        let per_outlet = section_text(&html, "Per-Outlet Recap");
        assert!(per_outlet.contains("Outlet Pusat"));
        assert!(per_outlet.contains("Outlet Utama"));
        assert!(per_outlet.contains("Rp 140.000"));
    }

    #[tokio::test]
    async fn kasir_is_scoped_to_their_outlet_without_recap() {
        let state = get_test_state();
        let outlet_id = seed_outlet(&state, "Outlet Pusat");
        insert_transaction(
            &state,
            "INV-1",
            "2026-03-15T09:00:00Z",
            Some(outlet_id),
            90000,
            "paid",
        );
        insert_transaction(&state, "INV-2", "2026-03-16T09:00:00Z", None, 50000, "unpaid");

        let mut kasir = test_current_user(Role::Kasir);
        kasir.outlet_id = Some(outlet_id);

        let response = get_reports_page(
            State(state),
            Extension(kasir),
            Query(ReportQuery {
                year: Some(2026),
                outlet: None,
            }),
        )
        .await
        .unwrap();

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let daily = section_text(&html, "Daily Report");
        assert!(daily.contains("Rp 90.000"));
        assert!(!daily.contains("Rp 50.000"));

        let heading_selector = Selector::parse("h2").unwrap();
        let headings: Vec<String> = html
            .select(&heading_selector)
            .map(|heading| heading.text().collect())
            .collect();
        assert!(
            !headings.iter().any(|heading| heading.contains("Per-Outlet")),
            "kasir should not see the per-outlet recap"
        );
    }

    #[tokio::test]
    async fn outlet_filter_narrows_daily_and_monthly_reports() {
        let state = get_test_state();
        let outlet_id = seed_outlet(&state, "Outlet Pusat");
        insert_transaction(
            &state,
            "INV-1",
            "2026-03-15T09:00:00Z",
            Some(outlet_id),
            90000,
            "paid",
        );
        insert_transaction(&state, "INV-2", "2026-03-16T09:00:00Z", None, 50000, "unpaid");

        let response = get_reports_page(
            State(state),
            Extension(test_current_user(Role::Owner)),
            Query(ReportQuery {
                year: Some(2026),
                outlet: Some(outlet_id),
            }),
        )
        .await
        .unwrap();

        let html = parse_html_document(response).await;

        let daily = section_text(&html, "Daily Report");
        assert!(daily.contains("Rp 90.000"));
        assert!(!daily.contains("Rp 50.000"));

        let monthly = section_text(&html, "Monthly Report");
        assert!(monthly.contains("Rp 90.000"));
    }
}
