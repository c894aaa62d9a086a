//! Displays service packages and handles package deletion.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    endpoints::{self, format_endpoint},
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, edit_delete_action_links, format_rupiah,
    },
    navigation::NavBar,
    package::{PackageId, PackageKind},
    user::CurrentUser,
};

/// The state needed for the package list page and the delete endpoint.
#[derive(Debug, Clone)]
pub struct PackageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for PackageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The package data to display in the view
#[derive(Debug, PartialEq)]
struct PackageTableRow {
    name: String,
    kind: PackageKind,
    price: i64,
    outlet_name: Option<String>,
    edit_url: String,
    delete_url: String,
}

fn packages_view(packages: &[PackageTableRow], current_user: &CurrentUser) -> Markup {
    let create_package_page_url = endpoints::NEW_PACKAGE_VIEW;
    let nav_bar = NavBar::new(endpoints::PACKAGES_VIEW, current_user.role).into_html();

    let table_row = |package: &PackageTableRow| {
        let action_links = edit_delete_action_links(
            &package.edit_url,
            &package.delete_url,
            &format!(
                "Are you sure you want to delete the package '{}'? This cannot be undone.",
                package.name
            ),
            "closest tr",
            "delete",
        );

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                th
                    scope="row"
                    class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                {
                    (package.name)
                }

                td class=(TABLE_CELL_STYLE)
                {
                    (package.kind.label())
                }

                td class="px-6 py-4 text-right"
                {
                    (format_rupiah(package.price))
                }

                td class=(TABLE_CELL_STYLE)
                {
                    (package.outlet_name.as_deref().unwrap_or("All outlets"))
                }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        (action_links)
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
                    h1 class="text-xl font-bold" { "Packages" }

                    a href=(create_package_page_url) class=(LINK_STYLE)
                    {
                        "Add Package"
                    }
                }

                section class="w-full overflow-x-auto lg:overflow-visible dark:bg-gray-800 lg:max-w-5xl lg:w-full lg:mx-auto"
                {
                    table class="w-full text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Kind" }
                                th scope="col" class="px-6 py-3 text-right" { "Price" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Outlet" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for package in packages {
                                (table_row(package))
                            }

                            @if packages.is_empty() {
                                tr
                                {
                                    td
                                        colspan="5"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No packages found. Create a package "
                                        a href=(create_package_page_url) class=(LINK_STYLE)
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
            }
        }
    );

    base("Packages", &[], &content)
}

/// Renders the packages page showing all packages.
pub async fn get_packages_page(
    State(state): State<PackageState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let packages = get_package_rows(&connection)
        .inspect_err(|error| tracing::error!("could not get all packages: {error}"))?;

    Ok(packages_view(&packages, &current_user).into_response())
}

fn get_package_rows(connection: &Connection) -> Result<Vec<PackageTableRow>, Error> {
    connection
        .prepare(
            "SELECT p.id, p.name, p.kind, p.price, outlet.name
            FROM package p
            LEFT JOIN outlet ON outlet.id = p.outlet_id
            ORDER BY p.name ASC;",
        )?
        .query_map([], |row| {
            let id: PackageId = row.get(0)?;

            Ok(PackageTableRow {
                name: row.get(1)?,
                kind: row.get(2)?,
                price: row.get(3)?,
                outlet_name: row.get(4)?,
                edit_url: format_endpoint(endpoints::EDIT_PACKAGE_VIEW, id),
                delete_url: format_endpoint(endpoints::DELETE_PACKAGE, id),
            })
        })?
        .map(|package_result| package_result.map_err(Error::from))
        .collect()
}

/// A route handler for deleting a package, responds with an alert.
pub async fn delete_package_endpoint(
    State(state): State<PackageState>,
    Path(package_id): Path<PackageId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_package(package_id, &connection) {
        // The status code has to be 200 OK or HTMX will not delete the table row.
        Ok(rows_affected) if rows_affected != 0 => {
            Alert::success("Package deleted successfully").into_response()
        }
        Ok(_) => Error::DeleteMissingPackage.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not delete package {package_id}: {error}");
            error.into_alert_response()
        }
    }
}

type RowsAffected = usize;

fn delete_package(id: PackageId, connection: &Connection) -> Result<RowsAffected, Error> {
    connection
        .execute("DELETE FROM package WHERE id = :id", &[(":id", &id)])
        .map_err(Error::from)
}

#[cfg(test)]
mod packages_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State, http::StatusCode};
    use rusqlite::Connection;
    use scraper::Selector;

    use crate::{
        db::initialize,
        package::{
            PackageKind,
            create::{PackageForm, create_package},
        },
        test_utils::{assert_valid_html, parse_html_document, test_current_user},
        user::Role,
    };

    use super::{PackageState, get_packages_page};

    #[tokio::test]
    async fn displays_packages_with_formatted_price() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        create_package(
            &PackageForm {
                name: "Cuci Kering Kiloan".to_owned(),
                kind: PackageKind::Kiloan,
                price: 7000,
                outlet_id: None,
            },
            &connection,
        )
        .unwrap();
        let state = PackageState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_packages_page(
            State(state),
            Extension(test_current_user(Role::Admin)),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let row_selector = Selector::parse("tbody tr").unwrap();
        let rows: Vec<_> = html.select(&row_selector).collect();
        assert_eq!(rows.len(), 1);
        let row_text: String = rows[0].text().collect();
        assert!(row_text.contains("Cuci Kering Kiloan"));
        assert!(row_text.contains("Kiloan"));
        assert!(row_text.contains("Rp 7.000"));
        assert!(row_text.contains("All outlets"));
    }
}
