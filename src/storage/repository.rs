use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::domain::{Direction, ProfileId, Status, Transaction, TransactionId};

use super::MIGRATION_001_INITIAL;

/// Repository for persisting and querying profiles and transactions.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given path.
    /// Creates the database file if it doesn't exist.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    // ========================
    // Profile operations
    // ========================

    /// Look a profile up by name, creating it on first use.
    pub async fn get_or_create_profile(&self, name: &str) -> Result<ProfileId> {
        let row = sqlx::query("SELECT id FROM profiles WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch profile")?;

        if let Some(row) = row {
            let id_str: String = row.get("id");
            return Uuid::parse_str(&id_str).context("Invalid profile ID");
        }

        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO profiles (id, name, created_at) VALUES (?, ?, ?)")
            .bind(id.to_string())
            .bind(name)
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await
            .context("Failed to create profile")?;

        Ok(id)
    }

    /// List all profiles, ordered by name.
    pub async fn list_profiles(&self) -> Result<Vec<(ProfileId, String)>> {
        let rows = sqlx::query("SELECT id, name FROM profiles ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list profiles")?;

        rows.iter()
            .map(|row| {
                let id_str: String = row.get("id");
                let id = Uuid::parse_str(&id_str).context("Invalid profile ID")?;
                Ok((id, row.get("name")))
            })
            .collect()
    }

    // ========================
    // Transaction operations
    // ========================

    /// Save a new transaction to the database.
    pub async fn save_transaction(&self, transaction: &Transaction) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO transactions (id, owner_id, counterparty_name, direction, principal_cents, monthly_rate_pct, start_date, due_date, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(transaction.id.to_string())
        .bind(transaction.owner_id.to_string())
        .bind(&transaction.counterparty_name)
        .bind(transaction.direction.as_str())
        .bind(transaction.principal_cents)
        .bind(transaction.monthly_rate_pct)
        .bind(transaction.start_date.to_rfc3339())
        .bind(transaction.due_date.map(|dt| dt.to_rfc3339()))
        .bind(transaction.status.as_str())
        .bind(transaction.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save transaction")?;

        Ok(())
    }

    /// Get a transaction by ID.
    pub async fn get_transaction(&self, id: TransactionId) -> Result<Option<Transaction>> {
        let row = sqlx::query(
            r#"
            SELECT id, owner_id, counterparty_name, direction, principal_cents, monthly_rate_pct, start_date, due_date, status, created_at
            FROM transactions
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch transaction")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_transaction(&row)?)),
            None => Ok(None),
        }
    }

    /// List all transactions for one owner, newest disbursement first.
    pub async fn list_transactions_for_owner(&self, owner: ProfileId) -> Result<Vec<Transaction>> {
        let rows = sqlx::query(
            r#"
            SELECT id, owner_id, counterparty_name, direction, principal_cents, monthly_rate_pct, start_date, due_date, status, created_at
            FROM transactions
            WHERE owner_id = ?
            ORDER BY start_date DESC
            "#,
        )
        .bind(owner.to_string())
        .fetch_all(&self.pool)
        .await
        .context("Failed to list transactions")?;

        rows.iter().map(Self::row_to_transaction).collect()
    }

    /// Update the status of a transaction. Status is the only mutable
    /// column; everything else is write-once.
    pub async fn update_transaction_status(
        &self,
        id: TransactionId,
        status: Status,
    ) -> Result<()> {
        sqlx::query("UPDATE transactions SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .context("Failed to update transaction status")?;
        Ok(())
    }

    /// Hard-delete a transaction.
    pub async fn delete_transaction(&self, id: TransactionId) -> Result<()> {
        sqlx::query("DELETE FROM transactions WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .context("Failed to delete transaction")?;
        Ok(())
    }

    fn row_to_transaction(row: &sqlx::sqlite::SqliteRow) -> Result<Transaction> {
        let id_str: String = row.get("id");
        let owner_str: String = row.get("owner_id");
        let direction_str: String = row.get("direction");
        let status_str: String = row.get("status");
        let start_date_str: String = row.get("start_date");
        let due_date_str: Option<String> = row.get("due_date");
        let created_at_str: String = row.get("created_at");

        Ok(Transaction {
            id: Uuid::parse_str(&id_str).context("Invalid transaction ID")?,
            owner_id: Uuid::parse_str(&owner_str).context("Invalid owner ID")?,
            counterparty_name: row.get("counterparty_name"),
            direction: Direction::from_str(&direction_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid direction: {}", direction_str))?,
            principal_cents: row.get("principal_cents"),
            monthly_rate_pct: row.get("monthly_rate_pct"),
            start_date: DateTime::parse_from_rfc3339(&start_date_str)
                .context("Invalid start_date timestamp")?
                .with_timezone(&Utc),
            due_date: due_date_str
                .map(|s| DateTime::parse_from_rfc3339(&s))
                .transpose()
                .context("Invalid due_date timestamp")?
                .map(|dt| dt.with_timezone(&Utc)),
            status: Status::from_str(&status_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid status: {}", status_str))?,
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .context("Invalid created_at timestamp")?
                .with_timezone(&Utc),
        })
    }
}
