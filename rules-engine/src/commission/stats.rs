//! Commission statistics

use rust_decimal::Decimal;
use shared::models::{CommissionStats, CommissionTransaction, StatBucket, TransactionStatus};

use crate::money::{to_decimal, to_f64};

#[derive(Default)]
struct Accumulator {
    total: Decimal,
    count: u64,
}

impl Accumulator {
    fn add(&mut self, amount: f64) {
        self.total += to_decimal(amount);
        self.count += 1;
    }

    fn bucket(&self) -> StatBucket {
        StatBucket {
            total: to_f64(self.total),
            count: self.count,
        }
    }
}

/// Totals and counts per status over `transactions`
///
/// Rejected transactions are reported in the `cancelled` bucket. The result
/// is always computed from the records passed in, never cached.
pub fn recompute_stats<'a>(
    transactions: impl IntoIterator<Item = &'a CommissionTransaction>,
) -> CommissionStats {
    let mut pending = Accumulator::default();
    let mut approved = Accumulator::default();
    let mut paid = Accumulator::default();
    let mut cancelled = Accumulator::default();

    for tx in transactions {
        let bucket = match tx.status {
            TransactionStatus::Pending => &mut pending,
            TransactionStatus::Approved => &mut approved,
            TransactionStatus::Paid => &mut paid,
            TransactionStatus::Cancelled | TransactionStatus::Rejected => &mut cancelled,
        };
        bucket.add(tx.commission_amount);
    }

    CommissionStats {
        pending: pending.bucket(),
        approved: approved.bucket(),
        paid: paid.bucket(),
        cancelled: cancelled.bucket(),
    }
}
