// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use lendbook::application::{LedgerService, NewTransaction};
use lendbook::domain::{Cents, Direction};
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = LedgerService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Helper to parse a date string into DateTime<Utc>
pub fn parse_date(date_str: &str) -> DateTime<Utc> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
}

/// Minimal valid transaction input, to be tweaked per test
pub fn new_tx(direction: Direction, principal_cents: Cents, rate: f64) -> NewTransaction {
    NewTransaction {
        counterparty_name: "Counterparty".to_string(),
        direction,
        principal_cents,
        monthly_rate_pct: rate,
        start_date: None,
        due_date: None,
    }
}

pub fn given(principal_cents: Cents) -> NewTransaction {
    new_tx(Direction::Given, principal_cents, 0.0)
}

pub fn taken(principal_cents: Cents) -> NewTransaction {
    new_tx(Direction::Taken, principal_cents, 0.0)
}
