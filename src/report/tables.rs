//! Maud tables for the report page.

use maud::{Markup, html};

use crate::html::{TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_rupiah};

use super::aggregation::{DailyReportRow, MonthlyReportRow, OutletReport};

fn report_table_shell(headers: &[(&str, bool)], body: Markup) -> Markup {
    html!(
        section class="w-full overflow-x-auto lg:overflow-visible dark:bg-gray-800"
        {
            table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        @for (header, numeric) in headers {
                            @if *numeric {
                                th scope="col" class="px-6 py-3 text-right" { (header) }
                            } @else {
                                th scope="col" class=(TABLE_CELL_STYLE) { (header) }
                            }
                        }
                    }
                }

                (body)
            }
        }
    )
}

pub(super) fn daily_report_table(rows: &[DailyReportRow]) -> Markup {
    let body = html!(
        tbody
        {
            @for row in rows {
                tr class=(TABLE_ROW_STYLE)
                {
                    th
                        scope="row"
                        class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                    {
                        (row.date)
                    }

                    td class="px-6 py-4 text-right" { (row.transaction_count) }

                    td class="px-6 py-4 text-right" { (format_rupiah(row.total_revenue)) }

                    td class="px-6 py-4 text-right text-red-600 dark:text-red-500"
                    {
                        (format_rupiah(row.total_unpaid))
                    }
                }
            }

            @if rows.is_empty() {
                tr
                {
                    td colspan="4" class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                    {
                        "No transactions recorded yet."
                    }
                }
            }
        }
    );

    report_table_shell(
        &[
            ("Date", false),
            ("Transactions", true),
            ("Revenue", true),
            ("Unpaid", true),
        ],
        body,
    )
}

pub(super) fn monthly_report_table(rows: &[MonthlyReportRow]) -> Markup {
    let body = html!(
        tbody
        {
            @for row in rows {
                tr class=(TABLE_ROW_STYLE)
                {
                    th
                        scope="row"
                        class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                    {
                        (row.month)
                    }

                    td class="px-6 py-4 text-right" { (row.transaction_count) }

                    td class="px-6 py-4 text-right" { (format_rupiah(row.total_revenue)) }

                    td class="px-6 py-4 text-right" { (format_rupiah(row.average_per_day)) }
                }
            }

            @if rows.is_empty() {
                tr
                {
                    td colspan="4" class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                    {
                        "No transactions recorded for this year."
                    }
                }
            }
        }
    );

    report_table_shell(
        &[
            ("Month", false),
            ("Transactions", true),
            ("Revenue", true),
            ("Average / Day", true),
        ],
        body,
    )
}

pub(super) fn outlet_report_table(report: &OutletReport) -> Markup {
    let body = html!(
        tbody
        {
            @for row in &report.rows {
                tr class=(TABLE_ROW_STYLE)
                {
                    th
                        scope="row"
                        class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                    {
                        (row.outlet_name)
                    }

                    td class="px-6 py-4 text-right" { (row.transaction_count) }

                    td class="px-6 py-4 text-right" { (format_rupiah(row.total_revenue)) }
                }
            }

            @if report.rows.is_empty() {
                tr
                {
                    td colspan="3" class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                    {
                        "No transactions recorded yet."
                    }
                }
            }
        }

        tfoot
        {
            tr class="font-semibold text-gray-900 dark:text-white bg-gray-50 dark:bg-gray-700"
            {
                th scope="row" class=(TABLE_CELL_STYLE) { "Consolidated total" }
                td class="px-6 py-4 text-right" {}
                td class="px-6 py-4 text-right" { (format_rupiah(report.grand_total)) }
            }
        }
    );

    report_table_shell(
        &[("Outlet", false), ("Transactions", true), ("Revenue", true)],
        body,
    )
}

#[cfg(test)]
mod report_table_tests {
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::report::aggregation::{
        DailyReportRow, MonthlyReportRow, OutletReport, OutletReportRow, ReportDate,
    };

    use super::{daily_report_table, monthly_report_table, outlet_report_table};

    #[test]
    fn daily_table_shows_formatted_amounts() {
        let rows = vec![DailyReportRow {
            date: ReportDate::Day(date!(2026 - 01 - 31)),
            transaction_count: 2,
            total_revenue: 85000,
            total_unpaid: 50000,
        }];

        let rendered = daily_report_table(&rows).into_string();

        assert!(rendered.contains("2026-01-31"));
        assert!(rendered.contains("Rp 85.000"));
        assert!(rendered.contains("Rp 50.000"));
    }

    #[test]
    fn monthly_table_shows_month_names() {
        let rows = vec![MonthlyReportRow {
            month: "Maret",
            transaction_count: 1,
            total_revenue: 90000,
            average_per_day: 3000,
        }];

        let rendered = monthly_report_table(&rows).into_string();

        assert!(rendered.contains("Maret"));
        assert!(rendered.contains("Rp 3.000"));
    }

    #[test]
    fn outlet_table_has_consolidated_total_row() {
        let report = OutletReport {
            rows: vec![OutletReportRow {
                outlet_id: Some(1),
                outlet_name: "Outlet Pusat".to_owned(),
                transaction_count: 42,
                total_revenue: 5400000,
            }],
            grand_total: 10100000,
        };

        let rendered = outlet_report_table(&report).into_string();
        let html = Html::parse_fragment(&rendered);

        let footer_selector = Selector::parse("tfoot tr").unwrap();
        let footer: String = html
            .select(&footer_selector)
            .next()
            .expect("Could not find consolidated total row")
            .text()
            .collect();
        assert!(footer.contains("Consolidated total"));
        assert!(footer.contains("Rp 10.100.000"));
    }
}
