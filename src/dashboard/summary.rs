//! One-pass summary statistics over transactions for the dashboard cards.

use crate::transaction::TransactionStatus;

/// A simplified transaction view for the dashboard summary.
#[derive(Debug)]
pub(super) struct SummaryTransaction {
    pub grand_total: i64,
    pub status: TransactionStatus,
}

/// The headline numbers shown at the top of the dashboard.
///
/// Revenue is recognized at transaction time, matching the report screens,
/// so the total includes unpaid transactions.
#[derive(Debug, Default, PartialEq, Eq)]
pub(super) struct Summary {
    pub transaction_count: u32,
    pub total_revenue: i64,
    pub pending_count: u32,
    pub completed_count: u32,
}

/// Computes the dashboard summary in a single pass.
pub(super) fn summarize(transactions: &[SummaryTransaction]) -> Summary {
    let mut summary = Summary::default();

    for transaction in transactions {
        summary.transaction_count += 1;
        summary.total_revenue += transaction.grand_total;

        match transaction.status {
            TransactionStatus::Pending => summary.pending_count += 1,
            TransactionStatus::Completed => summary.completed_count += 1,
            _ => {}
        }
    }

    summary
}

#[cfg(test)]
mod summarize_tests {
    use crate::transaction::TransactionStatus;

    use super::{Summary, SummaryTransaction, summarize};

    fn transaction(grand_total: i64, status: TransactionStatus) -> SummaryTransaction {
        SummaryTransaction {
            grand_total,
            status,
        }
    }

    #[test]
    fn counts_revenue_and_statuses_in_one_pass() {
        let transactions = vec![
            transaction(35000, TransactionStatus::Pending),
            transaction(50000, TransactionStatus::Completed),
            transaction(15000, TransactionStatus::Processing),
            transaction(20000, TransactionStatus::Pending),
        ];

        let summary = summarize(&transactions);

        assert_eq!(
            summary,
            Summary {
                transaction_count: 4,
                total_revenue: 120000,
                pending_count: 2,
                completed_count: 1,
            }
        );
    }

    #[test]
    fn empty_input_gives_zeroed_summary() {
        assert_eq!(summarize(&[]), Summary::default());
    }
}
