use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::{LedgerService, LedgerSummary, TransactionView};
use crate::domain::ProfileId;

/// One profile's ledger at a point in time, for JSON export.
/// Interest figures inside the views were computed at `exported_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub profile: String,
    pub transactions: Vec<TransactionView>,
    pub summary: LedgerSummary,
}

/// Exporter for converting ledger data to various formats
pub struct Exporter<'a> {
    service: &'a LedgerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Export a profile's transactions to CSV, interest computed as of `now`.
    pub async fn export_transactions_csv<W: Write>(
        &self,
        owner: ProfileId,
        now: DateTime<Utc>,
        writer: W,
    ) -> Result<usize> {
        let views = self.service.list_with_interest(owner, now).await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        // Write header
        csv_writer.write_record([
            "id",
            "counterparty",
            "direction",
            "principal_cents",
            "monthly_rate_pct",
            "start_date",
            "due_date",
            "status",
            "overdue",
            "elapsed_days",
            "interest_cents",
            "total_due_cents",
        ])?;

        let mut count = 0;
        for view in &views {
            csv_writer.write_record([
                view.id.to_string(),
                view.counterparty_name.clone(),
                view.direction.to_string(),
                view.principal_cents.to_string(),
                view.monthly_rate_pct.to_string(),
                view.start_date.to_rfc3339(),
                view.due_date.map(|d| d.to_rfc3339()).unwrap_or_default(),
                view.status.to_string(),
                view.overdue.to_string(),
                view.elapsed_days.to_string(),
                view.interest_cents.to_string(),
                view.total_due_cents.to_string(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export a full snapshot of a profile's ledger as pretty JSON.
    pub async fn export_snapshot_json<W: Write>(
        &self,
        owner: ProfileId,
        profile_name: &str,
        now: DateTime<Utc>,
        writer: W,
    ) -> Result<usize> {
        let transactions = self.service.list_with_interest(owner, now).await?;
        let summary = self.service.summary(owner, now).await?;
        let count = transactions.len();

        let snapshot = LedgerSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: now,
            profile: profile_name.to_string(),
            transactions,
            summary,
        };

        serde_json::to_writer_pretty(writer, &snapshot)?;
        Ok(count)
    }
}
