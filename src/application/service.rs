use chrono::{DateTime, Utc};

use crate::domain::{
    Cents, Direction, ProfileId, Transaction, TransactionId, net_balance, outstanding_principal,
};
use crate::storage::Repository;

use super::{AppError, LedgerSummary, TransactionView};

/// Application service providing high-level operations for the ledger.
/// This is the primary interface for any client (CLI, API, TUI, etc.).
///
/// Every operation takes the owning profile explicitly; there is no
/// ambient "current user" anywhere in the crate. A caller that cannot
/// produce a ProfileId cannot touch a record.
pub struct LedgerService {
    repo: Repository,
}

/// Caller-supplied fields for a new transaction.
pub struct NewTransaction {
    pub counterparty_name: String,
    pub direction: Direction,
    pub principal_cents: Cents,
    pub monthly_rate_pct: f64,
    /// Disbursement date; defaults to now when omitted
    pub start_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
}

impl LedgerService {
    /// Create a new ledger service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }

    // ========================
    // Profile operations
    // ========================

    /// Resolve a profile name to its id, creating the profile on first use.
    /// The rest of the service only ever deals in the opaque id.
    pub async fn open_profile(&self, name: &str) -> Result<ProfileId, AppError> {
        Ok(self.repo.get_or_create_profile(name).await?)
    }

    /// List all known profile names.
    pub async fn list_profiles(&self) -> Result<Vec<(ProfileId, String)>, AppError> {
        Ok(self.repo.list_profiles().await?)
    }

    // ========================
    // Transaction operations
    // ========================

    /// Record a new lending/borrowing transaction. Nothing is persisted
    /// when validation fails.
    pub async fn create(
        &self,
        owner: ProfileId,
        new: NewTransaction,
    ) -> Result<Transaction, AppError> {
        let name = new.counterparty_name.trim();
        if name.chars().count() < 2 {
            return Err(AppError::Validation {
                field: "counterparty_name",
                reason: "must be at least 2 characters".to_string(),
            });
        }
        if new.principal_cents <= 0 {
            return Err(AppError::Validation {
                field: "principal",
                reason: "must be positive".to_string(),
            });
        }
        if !new.monthly_rate_pct.is_finite()
            || new.monthly_rate_pct < 0.0
            || new.monthly_rate_pct > 100.0
        {
            return Err(AppError::Validation {
                field: "interest_rate",
                reason: "must be between 0 and 100".to_string(),
            });
        }

        let start_date = new.start_date.unwrap_or_else(Utc::now);
        let mut transaction = Transaction::new(
            owner,
            name,
            new.direction,
            new.principal_cents,
            new.monthly_rate_pct,
            start_date,
        );
        if let Some(due) = new.due_date {
            transaction = transaction.with_due_date(due);
        }

        self.repo.save_transaction(&transaction).await?;
        Ok(transaction)
    }

    /// List a profile's transactions, newest disbursement first.
    pub async fn list(&self, owner: ProfileId) -> Result<Vec<Transaction>, AppError> {
        Ok(self.repo.list_transactions_for_owner(owner).await?)
    }

    /// List a profile's transactions paired with interest computed as of
    /// `now`. Figures are derived per call, never read from storage.
    pub async fn list_with_interest(
        &self,
        owner: ProfileId,
        now: DateTime<Utc>,
    ) -> Result<Vec<TransactionView>, AppError> {
        let transactions = self.list(owner).await?;
        Ok(transactions
            .iter()
            .map(|tx| TransactionView::build(tx, now))
            .collect())
    }

    /// Get a single transaction view with fresh interest figures.
    pub async fn get_with_interest(
        &self,
        owner: ProfileId,
        id: TransactionId,
        now: DateTime<Utc>,
    ) -> Result<TransactionView, AppError> {
        let transaction = self.fetch_owned(owner, id).await?;
        Ok(TransactionView::build(&transaction, now))
    }

    /// Flip a transaction between Active and Settled. No guard in either
    /// direction: a settled loan can always be reopened.
    pub async fn toggle_settle(
        &self,
        owner: ProfileId,
        id: TransactionId,
    ) -> Result<Transaction, AppError> {
        let mut transaction = self.fetch_owned(owner, id).await?;
        transaction.status = transaction.status.toggled();
        self.repo
            .update_transaction_status(id, transaction.status)
            .await?;
        Ok(transaction)
    }

    /// Hard-delete a transaction. Returns the removed record.
    pub async fn delete(
        &self,
        owner: ProfileId,
        id: TransactionId,
    ) -> Result<Transaction, AppError> {
        let transaction = self.fetch_owned(owner, id).await?;
        self.repo.delete_transaction(id).await?;
        Ok(transaction)
    }

    /// Aggregate position over the profile's records as of `now`.
    pub async fn summary(
        &self,
        owner: ProfileId,
        now: DateTime<Utc>,
    ) -> Result<LedgerSummary, AppError> {
        let transactions = self.list(owner).await?;

        Ok(LedgerSummary {
            total_given_outstanding: outstanding_principal(&transactions, Direction::Given),
            total_taken_outstanding: outstanding_principal(&transactions, Direction::Taken),
            net_balance: net_balance(&transactions),
            active_count: transactions.iter().filter(|tx| tx.is_active()).count(),
            settled_count: transactions.iter().filter(|tx| !tx.is_active()).count(),
            overdue_count: transactions.iter().filter(|tx| tx.is_overdue(now)).count(),
        })
    }

    /// Fetch a transaction, verifying it exists and belongs to `owner`.
    /// The two failure modes stay distinct: a missing id and someone
    /// else's id are different errors.
    async fn fetch_owned(
        &self,
        owner: ProfileId,
        id: TransactionId,
    ) -> Result<Transaction, AppError> {
        let transaction = self
            .repo
            .get_transaction(id)
            .await?
            .ok_or(AppError::TransactionNotFound(id))?;

        if transaction.owner_id != owner {
            return Err(AppError::NotOwner(id));
        }

        Ok(transaction)
    }
}
