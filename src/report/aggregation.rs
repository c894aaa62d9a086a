//! Pure grouping and summation behind the report screens.
//!
//! Every function here is a side-effect-free transformation from a slice of
//! [ReportTransaction]s into report rows. Revenue is recognized at
//! transaction time regardless of payment status; unpaid amounts are
//! tracked separately. Buckets with no transactions are omitted.

use std::{cmp::Ordering, collections::HashMap, fmt::Display};

use time::Date;

use crate::{
    outlet::{Outlet, OutletId},
    transaction::PaymentStatus,
};

use super::transaction::ReportTransaction;

/// Indonesian month names, indexed by month number - 1.
pub(super) const MONTH_NAMES: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// The label of the bucket that collects transactions whose outlet is
/// missing or unknown.
pub(super) const DEFAULT_OUTLET_LABEL: &str = "Outlet Utama";

/// The calendar date a daily report row covers.
///
/// Transactions without a usable date are reported under [ReportDate::Unknown]
/// rather than dropped, so that every transaction is accounted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(super) enum ReportDate {
    Day(Date),
    Unknown,
}

impl Display for ReportDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportDate::Day(date) => date.fmt(f),
            ReportDate::Unknown => f.write_str("Unknown"),
        }
    }
}

/// One day of revenue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct DailyReportRow {
    pub date: ReportDate,
    pub transaction_count: u32,
    pub total_revenue: i64,
    pub total_unpaid: i64,
}

/// One month of revenue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct MonthlyReportRow {
    pub month: &'static str,
    pub transaction_count: u32,
    pub total_revenue: i64,
    pub average_per_day: i64,
}

/// One outlet's share of revenue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct OutletReportRow {
    pub outlet_id: Option<OutletId>,
    pub outlet_name: String,
    pub transaction_count: u32,
    pub total_revenue: i64,
}

/// The per-outlet rollup plus the consolidated total across all
/// transactions for the total row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct OutletReport {
    pub rows: Vec<OutletReportRow>,
    pub grand_total: i64,
}

fn matches_outlet_filter(
    transaction: &ReportTransaction,
    outlet_filter: Option<OutletId>,
) -> bool {
    match outlet_filter {
        Some(outlet_id) => transaction.outlet_id == Some(outlet_id),
        None => true,
    }
}

/// Groups transactions by calendar date.
///
/// When `outlet_filter` is given, only transactions recorded at that outlet
/// participate; transactions without an outlet are excluded. A transaction
/// without a date lands in the "Unknown" bucket.
///
/// Rows are returned sorted by date descending, with the "Unknown" bucket
/// last.
pub(super) fn aggregate_daily(
    transactions: &[ReportTransaction],
    outlet_filter: Option<OutletId>,
) -> Vec<DailyReportRow> {
    let mut buckets: HashMap<ReportDate, DailyReportRow> = HashMap::new();

    for transaction in transactions {
        if !matches_outlet_filter(transaction, outlet_filter) {
            continue;
        }

        let date = transaction
            .date
            .map(ReportDate::Day)
            .unwrap_or(ReportDate::Unknown);
        let row = buckets.entry(date).or_insert_with(|| DailyReportRow {
            date,
            transaction_count: 0,
            total_revenue: 0,
            total_unpaid: 0,
        });

        row.transaction_count += 1;
        row.total_revenue += transaction.grand_total;
        if transaction.payment_status != PaymentStatus::Paid {
            row.total_unpaid += transaction.grand_total;
        }
    }

    let mut rows: Vec<DailyReportRow> = buckets.into_values().collect();
    rows.sort_by(|a, b| match (a.date, b.date) {
        (ReportDate::Day(a), ReportDate::Day(b)) => b.cmp(&a),
        (ReportDate::Unknown, ReportDate::Unknown) => Ordering::Equal,
        (ReportDate::Unknown, ReportDate::Day(_)) => Ordering::Greater,
        (ReportDate::Day(_), ReportDate::Unknown) => Ordering::Less,
    });

    rows
}

/// The fixed-30-day month length used for the monthly average.
///
/// Carried over from the reference behavior: the average ignores the true
/// day count of the month so that historical figures stay stable.
const AVERAGING_DAYS_PER_MONTH: i64 = 30;

fn average_per_day(total_revenue: i64) -> i64 {
    // Round to the nearest Rupiah; revenue is never negative.
    (total_revenue + AVERAGING_DAYS_PER_MONTH / 2) / AVERAGING_DAYS_PER_MONTH
}

/// Groups the given year's transactions by month.
///
/// Only transactions dated within `year` participate, whatever their time
/// of day. Transactions without a date cannot be assigned a month and are
/// skipped. Months with no transactions are omitted; the rest are returned
/// in calendar order with Indonesian month names.
pub(super) fn aggregate_monthly(
    transactions: &[ReportTransaction],
    year: i32,
    outlet_filter: Option<OutletId>,
) -> Vec<MonthlyReportRow> {
    let mut buckets: HashMap<usize, MonthlyReportRow> = HashMap::new();

    for transaction in transactions {
        if !matches_outlet_filter(transaction, outlet_filter) {
            continue;
        }

        let Some(date) = transaction.date else {
            continue;
        };
        if date.year() != year {
            continue;
        }

        let month_index = date.month() as usize - 1;
        let row = buckets
            .entry(month_index)
            .or_insert_with(|| MonthlyReportRow {
                month: MONTH_NAMES[month_index],
                transaction_count: 0,
                total_revenue: 0,
                average_per_day: 0,
            });

        row.transaction_count += 1;
        row.total_revenue += transaction.grand_total;
    }

    let mut indexed_rows: Vec<(usize, MonthlyReportRow)> = buckets.into_iter().collect();
    indexed_rows.sort_by_key(|(month_index, _)| *month_index);

    indexed_rows
        .into_iter()
        .map(|(_, mut row)| {
            row.average_per_day = average_per_day(row.total_revenue);
            row
        })
        .collect()
}

/// Folds every transaction into its outlet's bucket.
///
/// One zero-valued bucket is prepared per known outlet; transactions whose
/// outlet is missing or matches no known outlet fold into a synthetic
/// "Outlet Utama" bucket rather than being dropped. Outlets with no
/// transactions are omitted from the result. The consolidated grand total
/// covers every transaction regardless of bucket.
pub(super) fn aggregate_by_outlet(
    transactions: &[ReportTransaction],
    outlets: &[Outlet],
) -> OutletReport {
    let mut rows: Vec<OutletReportRow> = outlets
        .iter()
        .map(|outlet| OutletReportRow {
            outlet_id: Some(outlet.id),
            outlet_name: outlet.name.clone(),
            transaction_count: 0,
            total_revenue: 0,
        })
        .collect();
    rows.push(OutletReportRow {
        outlet_id: None,
        outlet_name: DEFAULT_OUTLET_LABEL.to_owned(),
        transaction_count: 0,
        total_revenue: 0,
    });
    let default_index = rows.len() - 1;

    let index_by_outlet: HashMap<OutletId, usize> = outlets
        .iter()
        .enumerate()
        .map(|(index, outlet)| (outlet.id, index))
        .collect();

    let mut grand_total = 0;

    for transaction in transactions {
        grand_total += transaction.grand_total;

        let index = transaction
            .outlet_id
            .and_then(|outlet_id| index_by_outlet.get(&outlet_id).copied())
            .unwrap_or(default_index);

        rows[index].transaction_count += 1;
        rows[index].total_revenue += transaction.grand_total;
    }

    rows.retain(|row| row.transaction_count > 0);

    OutletReport { rows, grand_total }
}
