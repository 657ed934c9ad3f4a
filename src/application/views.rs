use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Cents, Direction, Status, Transaction, TransactionId, interest};

/// Consumer-facing read shape for a transaction: the stored record plus
/// interest figures computed at serialization time. The derived fields
/// go stale the moment the clock moves, which is why they are built
/// fresh on every read instead of being persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionView {
    pub id: TransactionId,
    pub counterparty_name: String,
    pub direction: Direction,
    pub principal_cents: Cents,
    pub monthly_rate_pct: f64,
    pub start_date: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: Status,
    pub overdue: bool,
    pub elapsed_days: i64,
    pub elapsed_months: f64,
    pub interest_cents: Cents,
    pub total_due_cents: Cents,
}

impl TransactionView {
    /// Build the view for a transaction as of `now`.
    pub fn build(tx: &Transaction, now: DateTime<Utc>) -> Self {
        let breakdown = interest::compute(
            tx.principal_cents,
            tx.monthly_rate_pct,
            tx.start_date,
            now,
        );

        Self {
            id: tx.id,
            counterparty_name: tx.counterparty_name.clone(),
            direction: tx.direction,
            principal_cents: tx.principal_cents,
            monthly_rate_pct: tx.monthly_rate_pct,
            start_date: tx.start_date,
            due_date: tx.due_date,
            status: tx.status,
            overdue: tx.is_overdue(now),
            elapsed_days: breakdown.elapsed_days,
            elapsed_months: breakdown.elapsed_months,
            interest_cents: breakdown.interest_cents,
            total_due_cents: breakdown.total_due_cents,
        }
    }
}

/// Aggregate position across a profile's active transactions.
/// Principals only; settled records are excluded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub total_given_outstanding: Cents,
    pub total_taken_outstanding: Cents,
    pub net_balance: Cents,
    pub active_count: usize,
    pub settled_count: usize,
    pub overdue_count: usize,
}
